//! Drosselung hochfrequenter Ereignisse und Zeitmessung der Render-Pässe.

use std::time::{Duration, Instant};

/// Koalesziert Rescale-Benachrichtigungen auf ein Mindestintervall.
///
/// Der Host meldet jede View-Skalierung; tatsächlich weitergereicht wird nur,
/// wenn seit dem letzten Durchlass mindestens das Intervall vergangen ist.
#[derive(Debug)]
pub struct RescaleGate {
    min_interval: Duration,
    last_fired: Option<Instant>,
}

impl RescaleGate {
    /// Erstellt ein Gate mit dem gegebenen Mindestintervall in Millisekunden.
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval: Duration::from_millis(min_interval_ms),
            last_fired: None,
        }
    }

    /// Meldet ein Ereignis an. Gibt `true` zurück, wenn es durchgelassen wird.
    pub fn should_fire(&mut self) -> bool {
        let now = Instant::now();
        match self.last_fired {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }
}

/// Misst Zeitspannen zwischen Render-Pässen und loggt sie auf Debug-Level.
pub struct TimeSpanClock {
    enabled: bool,
    last: Instant,
}

impl TimeSpanClock {
    /// Erstellt eine Uhr; bei `enabled == false` sind `tic`/`toc` No-ops.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last: Instant::now(),
        }
    }

    /// Loggt die Spanne seit dem letzten `tic` unter dem Label und startet neu.
    pub fn tic(&mut self, label: &str) {
        if !self.enabled {
            return;
        }
        let now = Instant::now();
        log::debug!("[{}ms] {}", now.duration_since(self.last).as_millis(), label);
        self.last = now;
    }
}
