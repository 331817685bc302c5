pub mod state;

use state::{LorenzParams, State};

// ---------------------------------------------------------------------------
// Lorenz vector field
// ---------------------------------------------------------------------------

/// Time derivative of the state:
///
///   dx/dt = sigma (y - x)
///   dy/dt = x (rho - z) - y
///   dz/dt = x y - beta z
///
/// No guarding: divergent parameters produce inf/NaN like any other float
/// arithmetic.
pub fn derivatives(state: &State, params: &LorenzParams) -> State {
    let (x, y, z) = (state.x, state.y, state.z);
    State::new(
        params.sigma * (y - x),
        x * (params.rho - z) - y,
        x * y - params.beta * z,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
