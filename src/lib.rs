pub mod dynamics;
pub mod error;
pub mod sim;
pub mod cases;
pub mod io;
pub mod render;

pub use error::LorenzError;

// Flat re-exports for the common path: build, solve, inspect
pub mod integrator {
    pub use crate::sim::runner::{simulate, Lorenz};
    pub use crate::sim::integrator::{euler_step, rk4_step, Method};
    pub use crate::sim::probe::{NoopProbe, Probe, TimingProbe};
}

pub mod types {
    pub use crate::dynamics::state::{LorenzParams, RunMode, SimConfig, State};
    pub use crate::cases::Case;
}
