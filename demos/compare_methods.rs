use lorenz_sim::integrator::{Lorenz, Method, TimingProbe};
use lorenz_sim::types::{LorenzParams, SimConfig, State};

/// Runs the classic attractor with both schemes and reports where and when
/// they part ways, then shows what continuing a run looks like.
fn main() {
    let params = LorenzParams::new(10.0, 8.0 / 3.0, 28.0);
    let config = SimConfig::new(0.01, 5000);
    let mut lorenz = Lorenz::new(State::new(1.0, 1.0, 1.0), params, config);
    let mut probe = TimingProbe::new();

    let euler = lorenz.solve_with(Method::Euler, &mut probe).to_vec();
    let rk4 = lorenz.solve_with(Method::Rk4, &mut probe).to_vec();

    for run in &probe.runs {
        println!("{:>5}: {} steps in {:?} ({:?}/step)", run.method, run.steps, run.elapsed, run.per_step());
    }

    let split = euler
        .iter()
        .zip(&rk4)
        .position(|(e, r)| (e - r).norm() > 1.0);
    match split {
        Some(i) => println!("Euler and RK4 drift more than 1.0 apart at step {} (t = {:.2})", i, lorenz.time_of(i)),
        None => println!("Euler and RK4 stay within 1.0 over the whole run"),
    }

    // Opt-in continuation: the second run starts where the first ended
    let mut cont = Lorenz::new(State::new(1.0, 1.0, 1.0), params, SimConfig::new(0.01, 1000).continuing());
    let first_end = *cont.integrate(Method::Rk4).last().unwrap();
    let second_start = cont.integrate(Method::Rk4)[0];
    println!("Continuation: first run ended at {:?}, second started at {:?}", first_end.as_slice(), second_start.as_slice());
}
