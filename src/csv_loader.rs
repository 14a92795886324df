use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;

use crate::capture::SensorSource;
use crate::types::Sample;

/// Carga una grabación de muestras desde un CSV con formato
/// `sample,ax,ay,az` ordenado por número de muestra.
pub fn load_samples_from_csv(path: impl AsRef<Path>) -> Result<Vec<Sample>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;

    let mut samples = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record =
            result.with_context(|| format!("Fila {} inválida en {:?}", row_idx + 1, path))?;
        if record.len() < 4 {
            bail!("La fila {} no tiene 4 columnas", row_idx + 1);
        }

        let ax: f32 = record[1]
            .parse()
            .with_context(|| format!("ax inválido en fila {}", row_idx + 1))?;
        let ay: f32 = record[2]
            .parse()
            .with_context(|| format!("ay inválido en fila {}", row_idx + 1))?;
        let az: f32 = record[3]
            .parse()
            .with_context(|| format!("az inválido en fila {}", row_idx + 1))?;

        samples.push(Sample::new(ax, ay, az));
    }

    if samples.is_empty() {
        bail!("El CSV {:?} no contiene muestras", path);
    }

    Ok(samples)
}

/// Fuente de sensor que reproduce una grabación.
///
/// Al agotarse la grabación repite la última muestra, igual que un sensor
/// real que sigue devolviendo su última lectura en reposo.
pub struct ReplaySource {
    samples: Vec<Sample>,
    cursor: usize,
}

impl ReplaySource {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples, cursor: 0 }
    }

    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(load_samples_from_csv(path)?))
    }

    /// Vuelve al principio de la grabación
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SensorSource for ReplaySource {
    fn read(&mut self) -> Sample {
        if self.samples.is_empty() {
            return Sample::default();
        }
        let idx = self.cursor.min(self.samples.len() - 1);
        self.cursor += 1;
        self.samples[idx]
    }
}
