// SPDX-License-Identifier: MIT
//
// Session statistics: how long each document has been the active one.
//
// Only one document is timed at a time. Activating a document stops the
// running timer and starts one for the new document; totals accumulate
// across activations until the document is opened afresh.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Source of the current instant.
pub trait Clock: fmt::Debug {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Accumulated active time per document name.
#[derive(Debug)]
pub struct SessionStats {
    clock: Box<dyn Clock>,
    totals: HashMap<String, Duration>,
    /// The document being timed and when its timer started.
    running: Option<(String, Instant)>,
}

impl SessionStats {
    #[must_use]
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            totals: HashMap::new(),
            running: None,
        }
    }

    /// Start timing `name`, stopping whatever was running.
    pub fn activate(&mut self, name: &str) {
        self.stop();
        self.running = Some((name.to_string(), self.clock.now()));
    }

    /// Stop timing `name` if it is the one running.
    pub fn deactivate(&mut self, name: &str) {
        if self.is_running(name) {
            self.stop();
        }
    }

    /// Forget `name`'s total. A running timer for it restarts from now.
    pub fn reset(&mut self, name: &str) {
        self.totals.remove(name);
        let now = self.clock.now();
        if let Some((running, started)) = &mut self.running {
            if running == name {
                *started = now;
            }
        }
    }

    /// Total active time for `name`, including the running stretch.
    #[must_use]
    pub fn duration(&self, name: &str) -> Duration {
        let total = self.totals.get(name).copied().unwrap_or_default();
        match &self.running {
            Some((running, started)) if running == name => {
                total + self.clock.now().saturating_duration_since(*started)
            }
            _ => total,
        }
    }

    fn is_running(&self, name: &str) -> bool {
        self.running.as_ref().is_some_and(|(running, _)| running == name)
    }

    fn stop(&mut self) {
        if let Some((name, started)) = self.running.take() {
            let elapsed = self.clock.now().saturating_duration_since(started);
            *self.totals.entry(name).or_default() += elapsed;
        }
    }
}

/// `42s` under a minute, `7m` under an hour, `1h 5m` beyond.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        return format!("{secs}s");
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{mins}m");
    }
    format!("{}h {}m", mins / 60, mins % 60)
}
