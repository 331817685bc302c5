//! Accuracy of the Euler and RK4 schemes against a fine-step reference.

use lorenz_sim::integrator::{rk4_step, simulate, Lorenz, Method};
use lorenz_sim::types::{LorenzParams, SimConfig, State};

/// State at t = 0.1 from (1, 1, 1) with (10, 2.667, 28), from a 30-digit Taylor series solver.
const EXACT_AT_0_1: [f64; 3] = [2.133_108_213_203_529, 4.471_422_804_304_239, 1.113_869_923_035_774];

fn unit() -> State {
    State::new(1.0, 1.0, 1.0)
}

fn params() -> LorenzParams {
    LorenzParams::new(10.0, 2.667, 28.0)
}

/// RK4 with `substeps` internal steps per output step. With dt/64 or finer
/// its error is orders of magnitude below anything measured here.
fn reference(initial: State, p: &LorenzParams, dt: f64, steps: usize, substeps: usize) -> Vec<State> {
    let h = dt / substeps as f64;
    let mut s = initial;
    let mut out = Vec::with_capacity(steps + 1);
    out.push(s);
    for _ in 0..steps {
        for _ in 0..substeps {
            s = rk4_step(&s, p, h);
        }
        out.push(s);
    }
    out
}

/// Largest componentwise relative error. Any non-finite state counts as infinite error.
fn max_rel_error(a: &[State], b: &[State]) -> f64 {
    assert_eq!(a.len(), b.len(), "trajectory lengths differ");
    a.iter()
        .zip(b)
        .flat_map(|(x, y)| x.iter().zip(y.iter()).map(|(u, v)| (u - v).abs() / v.abs()).collect::<Vec<_>>())
        .map(|e| if e.is_nan() { f64::INFINITY } else { e })
        .fold(0.0, f64::max)
}

/// Distance to the reference at the end of a run of duration `horizon`.
fn final_error(method: Method, dt: f64, horizon: f64, reference_end: &State) -> f64 {
    let steps = (horizon / dt).round() as usize;
    let traj = simulate(unit(), params(), SimConfig::new(dt, steps), method);
    (traj.last().unwrap() - reference_end).norm()
}

#[test]
fn euler_tracks_reference_pointwise() {
    let (dt, n) = (0.001, 100);
    let mut lorenz = Lorenz::new(unit(), params(), SimConfig::new(dt, n));
    lorenz.solve("euler").unwrap();

    let reference = reference(unit(), &params(), dt, n, 64);
    assert_eq!(lorenz.history().len(), reference.len());
    assert!(lorenz.history().iter().all(|s| s.iter().all(|v| v.is_finite())));
    let err = max_rel_error(lorenz.history(), &reference);
    assert!(err < 1e-2, "Euler deviates {:.3}% from reference", err * 100.0);
}

#[test]
fn reference_matches_high_precision_solution() {
    let end = *reference(unit(), &params(), 0.001, 100, 64).last().unwrap();
    let exact = State::from(EXACT_AT_0_1);
    assert!((end - exact).norm() < 1e-10, "reference {} vs exact {}", end, exact);

    let rk4 = simulate(unit(), params(), SimConfig::new(0.001, 100), Method::Rk4);
    assert!((rk4[100] - exact).norm() < 1e-8, "RK4 {} vs exact {}", rk4[100], exact);
}

#[test]
fn error_measure_flags_non_finite_states() {
    let reference = reference(unit(), &params(), 0.001, 3, 4);
    let mut broken = reference.clone();
    broken[2] = State::new(f64::NAN, f64::NAN, f64::NAN);
    assert_eq!(max_rel_error(&broken, &reference), f64::INFINITY);
    assert_eq!(max_rel_error(&reference, &reference), 0.0);
}

#[test]
fn rk4_tracks_reference_much_tighter_than_euler() {
    let (dt, n) = (0.001, 100);
    let reference = reference(unit(), &params(), dt, n, 64);

    let rk4 = simulate(unit(), params(), SimConfig::new(dt, n), Method::Rk4);
    let euler = simulate(unit(), params(), SimConfig::new(dt, n), Method::Euler);

    let rk4_err = max_rel_error(&rk4, &reference);
    let euler_err = max_rel_error(&euler, &reference);
    assert!(rk4_err < 1e-8, "RK4 relative error {}", rk4_err);
    assert!(rk4_err * 1e4 < euler_err);
}

#[test]
fn schemes_agree_over_short_horizon() {
    let rk4 = simulate(unit(), params(), SimConfig::new(0.001, 100), Method::Rk4);
    let euler = simulate(unit(), params(), SimConfig::new(0.001, 100), Method::Euler);
    let err = max_rel_error(&euler, &rk4);
    assert!(err < 1e-2, "Euler and RK4 differ by {:.3}%", err * 100.0);
}

#[test]
fn convergence_orders() {
    let (dt, horizon): (f64, f64) = (0.0025, 0.25);
    let steps = (horizon / dt).round() as usize;
    let reference_end = *reference(unit(), &params(), dt, steps, 256).last().unwrap();

    let e1 = final_error(Method::Euler, dt, horizon, &reference_end);
    let e2 = final_error(Method::Euler, dt / 2.0, horizon, &reference_end);
    let euler_ratio = e1 / e2;
    assert!(
        (1.7..2.3).contains(&euler_ratio),
        "Halving dt should halve Euler error, ratio {:.3}",
        euler_ratio
    );

    let r1 = final_error(Method::Rk4, dt, horizon, &reference_end);
    let r2 = final_error(Method::Rk4, dt / 2.0, horizon, &reference_end);
    let rk4_ratio = r1 / r2;
    assert!(
        (12.0..20.0).contains(&rk4_ratio),
        "Halving dt should cut RK4 error ~16x, ratio {:.3}",
        rk4_ratio
    );
}

#[test]
fn non_chaotic_regime_settles_on_fixed_point() {
    // rho = 6: trajectories spiral into C+ = (sqrt(beta (rho-1)), same, rho-1)
    let p = LorenzParams::new(10.0, 8.0 / 3.0, 6.0);
    let traj = simulate(unit(), p, SimConfig::default(), Method::Rk4);
    let c = (p.beta * (p.rho - 1.0)).sqrt();
    let end = traj.last().unwrap();
    assert!((end - State::new(c, c, p.rho - 1.0)).norm() < 1e-3, "Ended at {}", end);
}
