use std::time::{Duration, Instant};

/// Reloj monotónico inyectable.
///
/// El planificador solo consulta el tiempo transcurrido, así que la lógica de
/// ticks y cierre de ventana se puede probar con tiempos sintéticos sin
/// esperar tiempo real.
pub trait Clock {
    /// Tiempo transcurrido desde un origen arbitrario fijo
    fn now(&self) -> Duration;
}

/// Reloj del sistema: tiempo transcurrido desde su creación
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// Toca muestrear ahora
    Tick,
    /// Aún no toca nada
    Idle,
    /// La ventana ha terminado; no se emiten más ticks
    WindowClosed,
}

/// Planificador de muestreo a intervalo fijo dentro de una ventana fija.
///
/// El objetivo del siguiente tick avanza siempre en `objetivo += intervalo`,
/// nunca en `ahora + intervalo`: una ejecución tardía no desplaza los ticks
/// posteriores y no se acumula deriva. La ventana cierra estrictamente al
/// alcanzar la duración configurada, con independencia de cuántos ticks
/// llegaron a dispararse.
#[derive(Debug, Clone, Copy)]
pub struct SampleScheduler {
    interval: Duration,
    window: Duration,
    started_at: Duration,
    next_tick: Duration,
    closed: bool,
}

impl SampleScheduler {
    /// Arranca una ventana en `now`; el primer tick se dispara inmediatamente
    pub fn start(now: Duration, interval: Duration, window: Duration) -> Self {
        Self {
            interval,
            window,
            started_at: now,
            next_tick: now,
            closed: false,
        }
    }

    /// Consulta el estado en el instante `now`.
    ///
    /// Cada llamada dispara como mucho un tick; si el llamador va atrasado,
    /// las llamadas sucesivas recuperan los ticks pendientes uno a uno sin
    /// mover sus instantes objetivo.
    pub fn poll(&mut self, now: Duration) -> SchedulerEvent {
        if self.closed {
            return SchedulerEvent::WindowClosed;
        }

        if now.saturating_sub(self.started_at) >= self.window {
            self.closed = true;
            return SchedulerEvent::WindowClosed;
        }

        if now >= self.next_tick {
            self.next_tick += self.interval;
            SchedulerEvent::Tick
        } else {
            SchedulerEvent::Idle
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn scheduler() -> SampleScheduler {
        SampleScheduler::start(ms(0), ms(10), ms(3000))
    }

    #[test]
    fn test_first_tick_fires_at_start() {
        let mut s = scheduler();
        assert_eq!(s.poll(ms(0)), SchedulerEvent::Tick);
    }

    #[test]
    fn test_no_double_firing() {
        let mut s = scheduler();
        assert_eq!(s.poll(ms(0)), SchedulerEvent::Tick);
        assert_eq!(s.poll(ms(0)), SchedulerEvent::Idle);
        assert_eq!(s.poll(ms(9)), SchedulerEvent::Idle);
        assert_eq!(s.poll(ms(10)), SchedulerEvent::Tick);
        assert_eq!(s.poll(ms(10)), SchedulerEvent::Idle);
    }

    #[test]
    fn test_late_poll_does_not_shift_schedule() {
        let mut s = scheduler();
        assert_eq!(s.poll(ms(0)), SchedulerEvent::Tick);

        // Llegamos tarde al tick de t=10: se recupera, y el siguiente
        // objetivo sigue siendo t=20, no t=25+10
        assert_eq!(s.poll(ms(25)), SchedulerEvent::Tick);
        assert_eq!(s.poll(ms(25)), SchedulerEvent::Tick); // recupera t=20
        assert_eq!(s.poll(ms(25)), SchedulerEvent::Idle);
        assert_eq!(s.poll(ms(30)), SchedulerEvent::Tick);
    }

    #[test]
    fn test_window_closes_exactly_at_duration() {
        let mut s = scheduler();
        assert_eq!(s.poll(ms(2999)), SchedulerEvent::Tick);
        assert_eq!(s.poll(ms(3000)), SchedulerEvent::WindowClosed);
        assert!(s.is_closed());
        // Tras el cierre no se emiten más ticks
        assert_eq!(s.poll(ms(5000)), SchedulerEvent::WindowClosed);
    }

    #[test]
    fn test_window_closes_even_with_pending_ticks() {
        let mut s = scheduler();
        assert_eq!(s.poll(ms(0)), SchedulerEvent::Tick);
        // Retraso catastrófico: saltamos directamente al final de la ventana
        assert_eq!(s.poll(ms(3000)), SchedulerEvent::WindowClosed);
    }

    #[test]
    fn test_exact_tick_count_with_fine_polling() {
        let mut s = scheduler();
        let mut ticks = 0;
        let mut now = ms(0);
        loop {
            match s.poll(now) {
                SchedulerEvent::Tick => ticks += 1,
                SchedulerEvent::Idle => now += ms(1),
                SchedulerEvent::WindowClosed => break,
            }
        }
        // Ticks en t = 0, 10, ..., 2990
        assert_eq!(ticks, 300);
    }

    #[test]
    fn test_zero_ticks_representable() {
        let mut s = scheduler();
        // La primera consulta llega ya fuera de la ventana: cero ticks
        assert_eq!(s.poll(ms(4000)), SchedulerEvent::WindowClosed);
    }
}
