pub mod integrator;
pub mod runner;
pub mod probe;

pub use integrator::{euler_step, rk4_step, Method};
pub use probe::{NoopProbe, Probe, SolveTiming, TimingProbe};
pub use runner::{simulate, Lorenz};
