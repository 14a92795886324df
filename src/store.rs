use std::fmt::Write;

use thiserror::Error;

use crate::types::{FeatureRow, FEATURE_COLUMNS, MAX_RECORDS};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("almacén de capturas lleno ({0} registros)")]
    Full(usize),
}

/// Almacén de capacidad fija para capturas etiquetadas.
///
/// Propiedad explícita en lugar de arrays globales: el bucle de captura
/// recibe el almacén prestado y lo muta secuencialmente. Cuando se llena,
/// `push` devuelve un error recuperable y el bucle sigue aceptando comandos.
pub struct FeatureStore {
    rows: Vec<FeatureRow>,
    capacity: usize,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_RECORDS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, row: FeatureRow) -> Result<(), StoreError> {
        if self.rows.len() >= self.capacity {
            return Err(StoreError::Full(self.capacity));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Exporta todas las capturas en el formato de entrenamiento:
    /// cabecera `label,ax_mean,...,amag_rms` y una fila por captura con la
    /// etiqueta entera y las 13 características a 6 decimales.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("label,");
        csv.push_str(&FEATURE_COLUMNS.join(","));
        csv.push('\n');

        for row in &self.rows {
            let _ = write!(csv, "{}", row.label);
            for value in row.features {
                let _ = write!(csv, ",{:.6}", value);
            }
            csv.push('\n');
        }

        csv
    }
}

impl Default for FeatureStore {
    fn default() -> Self {
        Self::new()
    }
}
