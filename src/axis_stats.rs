use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    #[error("el acumulador no tiene muestras")]
    Empty,
}

/// Estadísticas en streaming para un eje (o para la magnitud).
///
/// Memoria O(1): las muestras crudas nunca se retienen, solo los agregados.
/// Las estadísticas derivadas son inválidas con `count == 0` y devuelven
/// `StatsError::Empty` en lugar de producir NaN.
#[derive(Debug, Clone, Copy)]
pub struct AxisStats {
    sum: f32,
    sum_sq: f32,
    min: f32,
    max: f32,
    count: u32,
}

impl AxisStats {
    pub fn new() -> Self {
        Self {
            sum: 0.0,
            sum_sq: 0.0,
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
            count: 0,
        }
    }

    /// Incorpora un valor en O(1)
    pub fn add(&mut self, v: f32) {
        self.sum += v;
        self.sum_sq += v * v;
        if v < self.min {
            self.min = v;
        }
        if v > self.max {
            self.max = v;
        }
        self.count += 1;
    }

    /// Vacía el acumulador para reutilizarlo en otra ventana
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Media aritmética
    pub fn mean(&self) -> Result<f32, StatsError> {
        if self.count == 0 {
            return Err(StatsError::Empty);
        }
        Ok(self.sum / self.count as f32)
    }

    /// Desviación típica poblacional.
    ///
    /// La varianza `sum_sq/n - media²` puede salir ligeramente negativa por
    /// redondeo en f32 con entradas casi constantes; se recorta a cero antes
    /// de la raíz para no producir NaN.
    pub fn stddev(&self) -> Result<f32, StatsError> {
        let m = self.mean()?;
        let variance = (self.sum_sq / self.count as f32 - m * m).max(0.0);
        Ok(variance.sqrt())
    }

    /// Media cuadrática: resalta los valores grandes
    pub fn rms(&self) -> Result<f32, StatsError> {
        if self.count == 0 {
            return Err(StatsError::Empty);
        }
        Ok((self.sum_sq / self.count as f32).sqrt())
    }

    /// Diferencia entre el máximo y el mínimo observados
    pub fn peak_to_peak(&self) -> Result<f32, StatsError> {
        if self.count == 0 {
            return Err(StatsError::Empty);
        }
        Ok(self.max - self.min)
    }
}

impl Default for AxisStats {
    fn default() -> Self {
        Self::new()
    }
}
