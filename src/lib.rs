//! Gestoscopio — clasificación de gestos de movimiento con acelerómetro
//!
//! Pipeline cooperativo de una sola tarea:
//! muestreo a intervalo fijo → estadísticas en streaming (O(1) de memoria) →
//! vector de 13 características → red feed-forward → índice de clase.
//!
//! La red es de topología fija y se construye una única vez al arranque a
//! partir de un blob plano de pesos f32; no hay entrenamiento en dispositivo.

pub mod axis_stats;
pub mod capture;
pub mod classifier;
pub mod csv_loader;
pub mod features;
pub mod network;
pub mod scheduler;
pub mod store;
pub mod types;
