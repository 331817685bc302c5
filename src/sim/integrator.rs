use std::fmt;
use std::str::FromStr;

use crate::dynamics;
use crate::dynamics::state::{LorenzParams, State};
use crate::error::LorenzError;

// ---------------------------------------------------------------------------
// Integration schemes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// First-order explicit Euler.
    #[default]
    Euler,
    /// Classical 4th-order Runge-Kutta.
    Rk4,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::Euler, Method::Rk4];

    pub fn name(&self) -> &'static str {
        match self {
            Method::Euler => "euler",
            Method::Rk4 => "rk4",
        }
    }

    /// Advance `state` by one step of this scheme.
    pub fn step(&self, state: &State, params: &LorenzParams, dt: f64) -> State {
        match self {
            Method::Euler => euler_step(state, params, dt),
            Method::Rk4 => rk4_step(state, params, dt),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Method {
    type Err = LorenzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euler" => Ok(Method::Euler),
            "rk4" => Ok(Method::Rk4),
            other => Err(LorenzError::invalid("method", other, "\"euler\" or \"rk4\"")),
        }
    }
}

/// Single explicit Euler step: s + f(s) dt.
pub fn euler_step(state: &State, params: &LorenzParams, dt: f64) -> State {
    state + dynamics::derivatives(state, params) * dt
}

/// Single RK4 step: advance state by dt.
pub fn rk4_step(state: &State, params: &LorenzParams, dt: f64) -> State {
    let k1 = dynamics::derivatives(state, params);
    let k2 = dynamics::derivatives(&(state + k1 * (dt * 0.5)), params);
    let k3 = dynamics::derivatives(&(state + k2 * (dt * 0.5)), params);
    let k4 = dynamics::derivatives(&(state + k3 * dt), params);

    state + (k1 + 2.0 * k2 + 2.0 * k3 + k4) * (dt / 6.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
