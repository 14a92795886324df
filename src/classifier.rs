use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::network::{gesture_topology, NetworkError, NetworkRuntime};
use crate::types::FeatureVector;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("error de red: {0}")]
    Network(#[from] NetworkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("el fichero de pesos debe ser f32 little-endian: {0} bytes no es múltiplo de 4")]
    MalformedWeightBlob(usize),

    #[error("el mapa de etiquetas no cubre la salida de la red: {expected} clases, {actual} entradas")]
    LabelMapMismatch { expected: usize, actual: usize },

    #[error("índices de etiqueta no contiguos: falta el índice {0}")]
    LabelIndexGap(usize),
}

#[derive(Debug, Deserialize)]
struct LabelsJson {
    index_to_label: HashMap<String, i32>,
}

/// Resultado de clasificar una ventana
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub probabilities: Vec<f32>,
    pub class_index: usize,
    /// Etiqueta del operador correspondiente al índice ganador
    pub label: i32,
}

/// Clasificador de gestos: red feed-forward + mapa índice → etiqueta.
///
/// El mapa de etiquetas es configuración explícita y comprobada: debe tener
/// exactamente una entrada por clase de salida, con índices contiguos desde
/// cero. Así el convenio ordinal entre el entrenamiento y el dispositivo
/// deja de ser implícito.
pub struct GestureClassifier {
    network: NetworkRuntime,
    labels: Vec<i32>,
}

impl GestureClassifier {
    /// Carga los pesos (blob plano f32 little-endian) y el mapa de etiquetas
    /// (JSON `{"index_to_label": {"0": 1, ...}}`) y construye la red con la
    /// topología fija del clasificador.
    pub fn new(
        weights_path: impl AsRef<Path>,
        labels_path: impl AsRef<Path>,
    ) -> Result<Self, ClassifierError> {
        let blob = load_weight_blob(weights_path)?;
        let labels = load_labels(labels_path)?;
        let network = NetworkRuntime::build(&gesture_topology(), &blob)?;
        Self::from_parts(network, labels)
    }

    pub fn from_parts(network: NetworkRuntime, labels: Vec<i32>) -> Result<Self, ClassifierError> {
        if labels.len() != network.output_width() {
            return Err(ClassifierError::LabelMapMismatch {
                expected: network.output_width(),
                actual: labels.len(),
            });
        }
        Ok(Self { network, labels })
    }

    /// Clasifica un vector de características de una ventana
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError> {
        let result = self.network.predict(features)?;
        Ok(Prediction {
            label: self.labels[result.class_index],
            class_index: result.class_index,
            probabilities: result.probabilities,
        })
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }
}

/// Lee un blob de pesos: secuencia plana de f32 IEEE-754 little-endian,
/// en orden estricto de capas
pub fn load_weight_blob(path: impl AsRef<Path>) -> Result<Vec<f32>, ClassifierError> {
    let bytes = fs::read(path)?;
    if bytes.len() % 4 != 0 {
        return Err(ClassifierError::MalformedWeightBlob(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

fn load_labels(path: impl AsRef<Path>) -> Result<Vec<i32>, ClassifierError> {
    let content = fs::read_to_string(path)?;
    let data: LabelsJson = serde_json::from_str(&content)?;

    // Convertir el mapa a Vec ordenado por índice, comprobando contigüidad
    let mut pairs: Vec<(usize, i32)> = data
        .index_to_label
        .into_iter()
        .filter_map(|(k, v)| k.parse::<usize>().ok().map(|idx| (idx, v)))
        .collect();
    pairs.sort_by_key(|(idx, _)| *idx);

    for (position, (idx, _)) in pairs.iter().enumerate() {
        if *idx != position {
            return Err(ClassifierError::LabelIndexGap(position));
        }
    }

    Ok(pairs.into_iter().map(|(_, label)| label).collect())
}
