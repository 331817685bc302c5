use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Phase-space state: (x, y, z)
// ---------------------------------------------------------------------------

/// A point in phase space. `Copy`, so every history entry is an independent
/// snapshot of the live state.
pub type State = Vector3<f64>;

/// Returns true when every component is finite.
pub fn is_finite(state: &State) -> bool {
    state.iter().all(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Lorenz parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LorenzParams {
    pub sigma: f64,
    pub beta: f64,
    pub rho: f64,
}

impl LorenzParams {
    pub fn new(sigma: f64, beta: f64, rho: f64) -> Self {
        Self { sigma, beta, rho }
    }
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            beta: 2.667, // truncated 8/3
            rho: 28.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

/// What `solve` starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Rewind to the initial state before every run.
    #[default]
    Restart,
    /// Start from the live state, i.e. where the previous run ended.
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub dt: f64,
    pub steps: usize,
    pub mode: RunMode,
}

impl SimConfig {
    pub fn new(dt: f64, steps: usize) -> Self {
        Self { dt, steps, ..Self::default() }
    }

    pub fn continuing(mut self) -> Self {
        self.mode = RunMode::Continue;
        self
    }

    /// Simulated time spanned by one full run.
    pub fn horizon(&self) -> f64 {
        self.dt * self.steps as f64
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            steps: 5000,
            mode: RunMode::Restart,
        }
    }
}
