use crate::axis_stats::{AxisStats, StatsError};
use crate::types::FeatureVector;

/// Ensambla el vector de 13 características a partir de los acumuladores de
/// los tres ejes y el de magnitud.
///
/// Orden fijo (contrato con el entrenamiento offline):
/// mean/std/rms/p2p por eje x, y, z y después el rms de la magnitud. De la
/// magnitud solo se usa el rms; media, desviación y p2p no se calculan.
///
/// Falla con `StatsError::Empty` si algún acumulador está vacío.
pub fn build_feature_vector(
    ax: &AxisStats,
    ay: &AxisStats,
    az: &AxisStats,
    amag: &AxisStats,
) -> Result<FeatureVector, StatsError> {
    Ok([
        ax.mean()?,
        ax.stddev()?,
        ax.rms()?,
        ax.peak_to_peak()?,
        ay.mean()?,
        ay.stddev()?,
        ay.rms()?,
        ay.peak_to_peak()?,
        az.mean()?,
        az.stddev()?,
        az.rms()?,
        az.peak_to_peak()?,
        amag.rms()?,
    ])
}
