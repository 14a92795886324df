/// Una muestra de aceleración de 3 ejes en m/s². Efímera: se consume en el
/// momento de la lectura, nunca se almacena cruda.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
}

impl Sample {
    pub fn new(ax: f32, ay: f32, az: f32) -> Self {
        Self { ax, ay, az }
    }

    /// Magnitud de la aceleración: sqrt(ax² + ay² + az²)
    pub fn magnitude(&self) -> f32 {
        (self.ax * self.ax + self.ay * self.ay + self.az * self.az).sqrt()
    }
}

/// Vector de características de una ventana, en orden fijo:
/// [ax_mean, ax_std, ax_rms, ax_p2p,
///  ay_mean, ay_std, ay_rms, ay_p2p,
///  az_mean, az_std, az_rms, az_p2p, amag_rms]
///
/// El orden es un contrato compartido con el entrenamiento offline;
/// cambiarlo corrompe las predicciones sin aviso.
pub type FeatureVector = [f32; FEATURE_COUNT];

/// Una captura etiquetada: etiqueta entera del operador + características.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    pub label: i32,
    pub features: FeatureVector,
}

/// Constantes del sistema
pub const FEATURE_COUNT: usize = 13;
pub const SAMPLE_INTERVAL_MS: u64 = 10;
pub const WINDOW_MS: u64 = 3000;
pub const MAX_RECORDS: usize = 100;

/// Nombres de columna para exportar características (mismo orden que el vector)
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "ax_mean", "ax_std", "ax_rms", "ax_p2p",
    "ay_mean", "ay_std", "ay_rms", "ay_p2p",
    "az_mean", "az_std", "az_rms", "az_p2p",
    "amag_rms",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude() {
        // 3-4-12 → 13
        let s = Sample::new(3.0, 4.0, 12.0);
        assert!((s.magnitude() - 13.0).abs() < 1e-6);
    }

    #[test]
    fn test_magnitude_zero() {
        assert_eq!(Sample::default().magnitude(), 0.0);
    }
}
