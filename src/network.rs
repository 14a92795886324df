use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    #[error("el blob de pesos no cuadra con la topología: esperados {expected} valores, recibidos {actual}")]
    TopologyMismatch { expected: usize, actual: usize },

    #[error("topología inválida: {0}")]
    InvalidTopology(&'static str),

    #[error("ancho de entrada inválido: la red espera {expected}, recibido {actual}")]
    InputWidthMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    None,
    Relu,
    Softmax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Input,
    Dense,
    Output,
}

/// Descriptor de capa: variante etiquetada en un array contiguo, en lugar de
/// capas polimórficas apiladas en el heap. La validación de topología queda
/// como función pura sobre la secuencia de descriptores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerDescriptor {
    pub kind: LayerKind,
    pub width: usize,
    pub activation: Activation,
}

impl LayerDescriptor {
    pub fn input(width: usize) -> Self {
        Self {
            kind: LayerKind::Input,
            width,
            activation: Activation::None,
        }
    }

    pub fn dense(width: usize, activation: Activation) -> Self {
        Self {
            kind: LayerKind::Dense,
            width,
            activation,
        }
    }

    pub fn output(width: usize, activation: Activation) -> Self {
        Self {
            kind: LayerKind::Output,
            width,
            activation,
        }
    }
}

/// Topología fija del clasificador de gestos: 13 → 32 (ReLU) → 6 (Softmax)
pub fn gesture_topology() -> [LayerDescriptor; 3] {
    [
        LayerDescriptor::input(13),
        LayerDescriptor::dense(32, Activation::Relu),
        LayerDescriptor::output(6, Activation::Softmax),
    ]
}

/// Número exacto de f32 que la topología consume del blob de pesos:
/// por cada capa densa/salida, `ancho_in × ancho_out` pesos + `ancho_out`
/// sesgos, en orden de capas.
pub fn required_weights(descriptors: &[LayerDescriptor]) -> Result<usize, NetworkError> {
    validate_shape(descriptors)?;
    let mut total = 0;
    let mut width_in = descriptors[0].width;
    for layer in &descriptors[1..] {
        total += width_in * layer.width + layer.width;
        width_in = layer.width;
    }
    Ok(total)
}

fn validate_shape(descriptors: &[LayerDescriptor]) -> Result<(), NetworkError> {
    if descriptors.len() < 2 {
        return Err(NetworkError::InvalidTopology(
            "hacen falta al menos una capa de entrada y una de salida",
        ));
    }
    if descriptors[0].kind != LayerKind::Input {
        return Err(NetworkError::InvalidTopology(
            "la primera capa debe ser Input",
        ));
    }
    if descriptors[1..].iter().any(|l| l.kind == LayerKind::Input) {
        return Err(NetworkError::InvalidTopology(
            "solo puede haber una capa Input, al principio",
        ));
    }
    if descriptors.last().map(|l| l.kind) != Some(LayerKind::Output) {
        return Err(NetworkError::InvalidTopology(
            "la última capa debe ser Output",
        ));
    }
    if descriptors.iter().any(|l| l.width == 0) {
        return Err(NetworkError::InvalidTopology(
            "todas las capas necesitan ancho > 0",
        ));
    }
    Ok(())
}

/// Pesos de una capa densa: matriz row-major `width_out × width_in` + sesgos
struct DenseLayer {
    width_in: usize,
    width_out: usize,
    activation: Activation,
    weights: Vec<f32>,
    biases: Vec<f32>,
}

impl DenseLayer {
    /// `salida = activación(W · entrada + b)`
    fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.width_out);
        for o in 0..self.width_out {
            let row = &self.weights[o * self.width_in..(o + 1) * self.width_in];
            let mut acc = self.biases[o];
            for (w, x) in row.iter().zip(input) {
                acc += w * x;
            }
            out.push(acc);
        }
        match self.activation {
            Activation::None => {}
            Activation::Relu => relu(&mut out),
            Activation::Softmax => softmax(&mut out),
        }
        out
    }
}

/// ReLU elemento a elemento
fn relu(values: &mut [f32]) {
    for v in values.iter_mut() {
        if *v < 0.0 {
            *v = 0.0;
        }
    }
}

/// Softmax con resta del máximo, obligatoria para estabilidad en f32
fn softmax(values: &mut [f32]) {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut total = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        total += *v;
    }
    for v in values.iter_mut() {
        *v /= total;
    }
}

/// Índice del valor máximo; en empate exacto gana el índice más bajo
pub fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0;
    let mut best = f32::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > best {
            best = v;
            best_idx = i;
        }
    }
    best_idx
}

/// Resultado transitorio de una inferencia
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub probabilities: Vec<f32>,
    pub class_index: usize,
}

/// Red feed-forward de topología fija.
///
/// Se construye una sola vez a partir de los descriptores y el blob plano de
/// pesos; es inmutable después y de solo lectura durante la inferencia. Un
/// desajuste entre blob y topología (modelo reentrenado contra firmware
/// antiguo) es un error fatal de construcción: no se llega a inferir nunca
/// con un modelo inconsistente.
pub struct NetworkRuntime {
    input_width: usize,
    layers: Vec<DenseLayer>,
}

impl NetworkRuntime {
    /// Construye la red consumiendo el blob en orden estricto de capas:
    /// para cada capa densa/salida, su matriz row-major y después sus sesgos.
    pub fn build(descriptors: &[LayerDescriptor], blob: &[f32]) -> Result<Self, NetworkError> {
        let expected = required_weights(descriptors)?;
        if blob.len() != expected {
            return Err(NetworkError::TopologyMismatch {
                expected,
                actual: blob.len(),
            });
        }

        let input_width = descriptors[0].width;
        let mut layers = Vec::with_capacity(descriptors.len() - 1);
        let mut width_in = input_width;
        let mut cursor = 0;

        for layer in &descriptors[1..] {
            let width_out = layer.width;
            let weight_count = width_in * width_out;

            let weights = blob[cursor..cursor + weight_count].to_vec();
            cursor += weight_count;
            let biases = blob[cursor..cursor + width_out].to_vec();
            cursor += width_out;

            layers.push(DenseLayer {
                width_in,
                width_out,
                activation: layer.activation,
                weights,
                biases,
            });
            width_in = width_out;
        }

        Ok(Self {
            input_width,
            layers,
        })
    }

    pub fn input_width(&self) -> usize {
        self.input_width
    }

    pub fn output_width(&self) -> usize {
        self.layers.last().map(|l| l.width_out).unwrap_or(0)
    }

    /// Pasada hacia delante: un vector entra, un vector de probabilidades
    /// sale. Sin estado entre llamadas más allá de los pesos.
    pub fn predict(&self, input: &[f32]) -> Result<PredictionResult, NetworkError> {
        if input.len() != self.input_width {
            return Err(NetworkError::InputWidthMismatch {
                expected: self.input_width,
                actual: input.len(),
            });
        }

        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.forward(&current);
        }

        let class_index = argmax(&current);
        Ok(PredictionResult {
            probabilities: current,
            class_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_topology() -> [LayerDescriptor; 3] {
        [
            LayerDescriptor::input(2),
            LayerDescriptor::dense(2, Activation::Relu),
            LayerDescriptor::output(2, Activation::Softmax),
        ]
    }

    #[test]
    fn test_required_weights_gesture_topology() {
        // 13·32 + 32 + 32·6 + 6 = 646
        assert_eq!(required_weights(&gesture_topology()).unwrap(), 646);
    }

    #[test]
    fn test_wrong_blob_length_is_topology_mismatch() {
        let blob = vec![0.0; 11]; // la topología diminuta necesita 12
        let result = NetworkRuntime::build(&tiny_topology(), &blob);
        assert_eq!(
            result.err(),
            Some(NetworkError::TopologyMismatch {
                expected: 12,
                actual: 11,
            })
        );
    }

    #[test]
    fn test_invalid_topologies_rejected() {
        let no_input = [
            LayerDescriptor::dense(4, Activation::Relu),
            LayerDescriptor::output(2, Activation::Softmax),
        ];
        assert!(matches!(
            required_weights(&no_input),
            Err(NetworkError::InvalidTopology(_))
        ));

        let no_output = [
            LayerDescriptor::input(4),
            LayerDescriptor::dense(2, Activation::Relu),
        ];
        assert!(matches!(
            required_weights(&no_output),
            Err(NetworkError::InvalidTopology(_))
        ));

        let zero_width = [
            LayerDescriptor::input(4),
            LayerDescriptor::output(0, Activation::Softmax),
        ];
        assert!(matches!(
            required_weights(&zero_width),
            Err(NetworkError::InvalidTopology(_))
        ));

        let only_input = [LayerDescriptor::input(4)];
        assert!(matches!(
            required_weights(&only_input),
            Err(NetworkError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_softmax_sums_to_one_and_preserves_order() {
        let mut values = vec![3.0f32, -1.0, 0.5, 7.25, 7.0];
        let original = values.clone();
        softmax(&mut values);

        let total: f32 = values.iter().sum();
        assert!((total - 1.0).abs() < 1e-5, "suma = {}", total);

        for i in 0..original.len() {
            for j in 0..original.len() {
                if original[i] > original[j] {
                    assert!(values[i] >= values[j]);
                }
            }
        }
    }

    #[test]
    fn test_softmax_stable_with_large_logits() {
        // Sin la resta del máximo, exp(90) desborda f32
        let mut values = vec![90.0f32, 89.0, 85.0];
        softmax(&mut values);
        assert!(values.iter().all(|v| v.is_finite()));
        let total: f32 = values.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_argmax_tie_returns_lowest_index() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax(&[0.5, 0.5, 0.5]), 0);
        assert_eq!(argmax(&[1.0]), 0);
    }

    #[test]
    fn test_relu() {
        let mut values = vec![-3.0f32, 0.0, 2.5];
        relu(&mut values);
        assert_eq!(values, vec![0.0, 0.0, 2.5]);
    }

    #[test]
    fn test_golden_forward_pass() {
        // Densa: W = identidad, b = 0; Salida: W = identidad, b = [0, 1]
        // Entrada [1, 2] → ReLU([1, 2]) → logits [1, 3] → softmax
        #[rustfmt::skip]
        let blob = vec![
            1.0, 0.0,
            0.0, 1.0,
            0.0, 0.0,
            1.0, 0.0,
            0.0, 1.0,
            0.0, 1.0,
        ];
        let network = NetworkRuntime::build(&tiny_topology(), &blob).unwrap();
        let result = network.predict(&[1.0, 2.0]).unwrap();

        // A mano: e⁻² / (1 + e⁻²) y 1 / (1 + e⁻²)
        assert!((result.probabilities[0] - 0.119_202_92).abs() < 1e-5);
        assert!((result.probabilities[1] - 0.880_797_08).abs() < 1e-5);
        assert_eq!(result.class_index, 1);
    }

    #[test]
    fn test_relu_clamps_negative_path() {
        // La rama negativa de la densa queda a cero antes de la salida
        #[rustfmt::skip]
        let blob = vec![
            -1.0, 0.0,
             0.0, 1.0,
             0.0, 0.0,
             1.0, 1.0,
             0.0, 0.0,
             0.0, 0.0,
        ];
        let network = NetworkRuntime::build(&tiny_topology(), &blob).unwrap();
        let result = network.predict(&[5.0, 2.0]).unwrap();
        // dense: [-5, 2] → relu [0, 2] → salida [2, 0] → softmax, gana la 0
        assert_eq!(result.class_index, 0);
    }

    #[test]
    fn test_input_width_checked() {
        let blob = vec![0.0; 12];
        let network = NetworkRuntime::build(&tiny_topology(), &blob).unwrap();
        assert_eq!(
            network.predict(&[1.0, 2.0, 3.0]).err(),
            Some(NetworkError::InputWidthMismatch {
                expected: 2,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_full_gesture_topology_builds() {
        let blob = vec![0.0; 646];
        let network = NetworkRuntime::build(&gesture_topology(), &blob).unwrap();
        assert_eq!(network.input_width(), 13);
        assert_eq!(network.output_width(), 6);

        // Todos los pesos a cero → logits iguales → softmax uniforme y el
        // empate se resuelve con el índice más bajo
        let result = network.predict(&[0.5; 13]).unwrap();
        assert_eq!(result.class_index, 0);
        for p in &result.probabilities {
            assert!((p - 1.0 / 6.0).abs() < 1e-5);
        }
    }
}
