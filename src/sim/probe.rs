use std::time::Duration;

use crate::dynamics::state::State;
use super::integrator::Method;

// ---------------------------------------------------------------------------
// Instrumentation hooks
// ---------------------------------------------------------------------------

/// Trait for passive observers of a solve.
///
/// Implement this to time, trace, or sample a run without touching the
/// integration loop. Every hook defaults to a no-op.
pub trait Probe {
    /// Called once before the first step, after the start state is recorded.
    fn on_solve_start(&mut self, _method: Method, _steps: usize) {}

    /// Called after step `index` (1-based) with the newly recorded state.
    fn on_step(&mut self, _index: usize, _state: &State) {}

    /// Called once after the last step with the wall-clock run time.
    fn on_solve_end(&mut self, _method: Method, _elapsed: Duration) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Observes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProbe;

impl Probe for NoopProbe {
    fn name(&self) -> &str {
        "noop"
    }
}

/// One finished solve as seen by a [`TimingProbe`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolveTiming {
    pub method: Method,
    pub steps: usize,
    pub elapsed: Duration,
}

impl SolveTiming {
    pub fn per_step(&self) -> Duration {
        if self.steps == 0 {
            Duration::ZERO
        } else {
            self.elapsed.div_f64(self.steps as f64)
        }
    }
}

/// Records how long each solve took and how many steps it ran.
#[derive(Debug, Clone, Default)]
pub struct TimingProbe {
    pub runs: Vec<SolveTiming>,
    steps_seen: usize,
}

impl TimingProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> Duration {
        self.runs.iter().map(|r| r.elapsed).sum()
    }

    pub fn last(&self) -> Option<&SolveTiming> {
        self.runs.last()
    }
}

impl Probe for TimingProbe {
    fn on_solve_start(&mut self, _method: Method, _steps: usize) {
        self.steps_seen = 0;
    }

    fn on_step(&mut self, _index: usize, _state: &State) {
        self.steps_seen += 1;
    }

    fn on_solve_end(&mut self, method: Method, elapsed: Duration) {
        log::debug!(
            "{} solve: {} steps in {:?}",
            method,
            self.steps_seen,
            elapsed
        );
        self.runs.push(SolveTiming {
            method,
            steps: self.steps_seen,
            elapsed,
        });
    }

    fn name(&self) -> &str {
        "timing"
    }
}
