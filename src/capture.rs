use std::time::Duration;

use crate::axis_stats::{AxisStats, StatsError};
use crate::features::build_feature_vector;
use crate::scheduler::{Clock, SampleScheduler, SchedulerEvent};
use crate::types::{FeatureVector, Sample, SAMPLE_INTERVAL_MS, WINDOW_MS};

/// Fuente de muestras de aceleración.
///
/// Se asume que la lectura responde en sub-milisegundos respecto al intervalo
/// de muestreo y que no falla una vez inicializada.
pub trait SensorSource {
    fn read(&mut self) -> Sample;
}

/// Una ventana de captura en curso.
///
/// Posee en exclusiva sus cuatro acumuladores (x, y, z, magnitud) y su
/// planificador durante toda la ventana; no hay estado compartido ni global.
pub struct CaptureWindow {
    scheduler: SampleScheduler,
    ax: AxisStats,
    ay: AxisStats,
    az: AxisStats,
    amag: AxisStats,
}

impl CaptureWindow {
    /// Abre una ventana con el intervalo y duración por defecto del sistema
    pub fn begin(now: Duration) -> Self {
        Self::begin_with(
            now,
            Duration::from_millis(SAMPLE_INTERVAL_MS),
            Duration::from_millis(WINDOW_MS),
        )
    }

    pub fn begin_with(now: Duration, interval: Duration, window: Duration) -> Self {
        Self {
            scheduler: SampleScheduler::start(now, interval, window),
            ax: AxisStats::new(),
            ay: AxisStats::new(),
            az: AxisStats::new(),
            amag: AxisStats::new(),
        }
    }

    /// Consulta el planificador; en `Tick` el llamador debe leer el sensor
    /// y pasar la muestra a `ingest`
    pub fn poll(&mut self, now: Duration) -> SchedulerEvent {
        self.scheduler.poll(now)
    }

    /// Incorpora una muestra a los cuatro acumuladores
    pub fn ingest(&mut self, sample: Sample) {
        self.ax.add(sample.ax);
        self.ay.add(sample.ay);
        self.az.add(sample.az);
        self.amag.add(sample.magnitude());
    }

    /// ¿Ha cerrado ya la ventana? (tras un `poll` que devolvió `WindowClosed`)
    pub fn is_complete(&self) -> bool {
        self.scheduler.is_closed()
    }

    /// Número de muestras incorporadas hasta ahora
    pub fn sample_count(&self) -> u32 {
        self.amag.count()
    }

    /// Emite el vector de características de la ventana.
    ///
    /// Una ventana sin muestras (cero ticks) devuelve `StatsError::Empty`,
    /// nunca un vector de ceros o NaN.
    pub fn finalize_features(&self) -> Result<FeatureVector, StatsError> {
        build_feature_vector(&self.ax, &self.ay, &self.az, &self.amag)
    }
}

/// Ejecuta una ventana completa de captura de forma cooperativa.
///
/// Ocupa el hilo llamador hasta el cierre de la ventana: sondea el reloj, lee
/// el sensor en cada tick y duerme 1 ms entre consultas. No se atiende
/// ninguna otra entrada mientras tanto.
pub fn run_window<C: Clock, S: SensorSource>(
    clock: &C,
    sensor: &mut S,
) -> Result<FeatureVector, StatsError> {
    let mut window = CaptureWindow::begin(clock.now());
    loop {
        match window.poll(clock.now()) {
            SchedulerEvent::Tick => window.ingest(sensor.read()),
            SchedulerEvent::Idle => std::thread::sleep(Duration::from_millis(1)),
            SchedulerEvent::WindowClosed => break,
        }
    }
    window.finalize_features()
}
