//! Per-phase wall-clock instrumentation.
//!
//! The scheduling algorithms themselves have no suspension points (§5): the
//! only thing worth timing is how long each synchronous phase takes to run
//! to completion. Instrumentation is toggleable per call so ordinary unit
//! tests don't pay for timer syscalls.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Accumulates named phase durations for one scheduling run.
#[derive(Debug, Default)]
pub struct PhaseTimings {
    enabled: bool,
    durations: HashMap<String, Duration>,
}

impl PhaseTimings {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            durations: HashMap::new(),
        }
    }

    /// Runs `f`, recording its wall-clock duration under `phase` if
    /// instrumentation is enabled; always returns `f`'s result.
    pub fn time<T>(&mut self, phase: &str, f: impl FnOnce() -> T) -> T {
        if !self.enabled {
            return f();
        }
        let start = Instant::now();
        let result = f();
        self.durations.insert(phase.to_string(), start.elapsed());
        result
    }

    pub fn get(&self, phase: &str) -> Option<Duration> {
        self.durations.get(phase).copied()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn phases(&self) -> impl Iterator<Item = (&str, Duration)> {
        self.durations.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
