use std::time::Instant;

use crate::dynamics::state::{self, LorenzParams, RunMode, SimConfig, State};
use crate::error::LorenzError;
use super::integrator::Method;
use super::probe::{NoopProbe, Probe};

// ---------------------------------------------------------------------------
// Lorenz integrator: owns parameters, live state, and trajectory history
// ---------------------------------------------------------------------------

/// Steps the Lorenz system and records its trajectory.
///
/// Parameters and the run config are fixed at construction. Only the live
/// state and the history change, and only through `&mut self`.
#[derive(Debug, Clone)]
pub struct Lorenz {
    params: LorenzParams,
    config: SimConfig,
    initial: State,
    state: State,
    history: Vec<State>,
}

impl Lorenz {
    pub fn new(initial: State, params: LorenzParams, config: SimConfig) -> Self {
        Self {
            params,
            config,
            initial,
            state: initial,
            history: Vec::new(),
        }
    }

    /// Default parameters (sigma 10, beta 2.667, rho 28) and config
    /// (dt 0.01, 5000 steps, restart mode).
    pub fn from_state(initial: State) -> Self {
        Self::new(initial, LorenzParams::default(), SimConfig::default())
    }

    pub fn params(&self) -> &LorenzParams {
        &self.params
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn dt(&self) -> f64 {
        self.config.dt
    }

    pub fn steps(&self) -> usize {
        self.config.steps
    }

    /// Live state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// State restored at the start of every run in restart mode.
    pub fn initial_state(&self) -> &State {
        &self.initial
    }

    pub fn history(&self) -> &[State] {
        &self.history
    }

    pub fn is_solved(&self) -> bool {
        !self.history.is_empty()
    }

    /// Simulated time of history entry `index`, relative to the run start.
    pub fn time_of(&self, index: usize) -> f64 {
        index as f64 * self.config.dt
    }

    // -----------------------------------------------------------------------
    // Single steps
    // -----------------------------------------------------------------------

    /// Advance the live state one explicit Euler step.
    pub fn step_euler(&mut self) -> State {
        self.step(Method::Euler)
    }

    /// Advance the live state one RK4 step.
    pub fn step_rk4(&mut self) -> State {
        self.step(Method::Rk4)
    }

    pub fn step(&mut self, method: Method) -> State {
        self.state = method.step(&self.state, &self.params, self.config.dt);
        self.state
    }

    // -----------------------------------------------------------------------
    // Full runs
    // -----------------------------------------------------------------------

    /// Run `steps` integration steps with the method named `method`
    /// ("euler" or "rk4").
    ///
    /// An unknown name is rejected before anything is touched: history and
    /// live state stay as they were.
    pub fn solve(&mut self, method: &str) -> Result<&[State], LorenzError> {
        let method: Method = method.parse()?;
        Ok(self.integrate(method))
    }

    pub fn integrate(&mut self, method: Method) -> &[State] {
        self.solve_with(method, &mut NoopProbe)
    }

    /// Solve with an instrumentation probe observing the run.
    pub fn solve_with(&mut self, method: Method, probe: &mut dyn Probe) -> &[State] {
        if self.config.mode == RunMode::Restart {
            self.state = self.initial;
        }

        let steps = self.config.steps;
        self.history.clear();
        self.history.reserve(steps + 1);
        self.history.push(self.state);

        probe.on_solve_start(method, steps);
        let started = Instant::now();

        for i in 1..=steps {
            let next = self.step(method);
            self.history.push(next);
            probe.on_step(i, &next);
        }

        let elapsed = started.elapsed();
        probe.on_solve_end(method, elapsed);

        log::debug!(
            "Solved {} steps with {} (dt={}, {:?}) via probe {}",
            steps,
            method,
            self.config.dt,
            elapsed,
            probe.name()
        );
        if let Some(first_bad) = self.history.iter().position(|s| !state::is_finite(s)) {
            log::warn!(
                "Trajectory became non-finite at step {} (t={:.4})",
                first_bad,
                self.time_of(first_bad)
            );
        }

        &self.history
    }

    /// History, solving with the default method first if it is empty.
    pub fn ensure_solved(&mut self) -> &[State] {
        if self.history.is_empty() {
            self.integrate(Method::default());
        }
        &self.history
    }

    /// Start over from `initial`: replaces the stored initial state and the
    /// live state, and drops the history.
    pub fn reset(&mut self, initial: State) {
        self.initial = initial;
        self.state = initial;
        self.history.clear();
    }
}

/// One-shot convenience: build an integrator, solve, return the trajectory.
pub fn simulate(
    initial: State,
    params: LorenzParams,
    config: SimConfig,
    method: Method,
) -> Vec<State> {
    let mut lorenz = Lorenz::new(initial, params, config);
    lorenz.integrate(method);
    lorenz.history
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::probe::TimingProbe;

    fn unit() -> State {
        State::new(1.0, 1.0, 1.0)
    }

    fn rel_close(a: &State, b: &State, rel: f64) -> bool {
        a.iter()
            .zip(b.iter())
            .all(|(x, y)| (x - y).abs() <= rel * y.abs().max(1e-12))
    }

    #[test]
    fn step_euler_from_unit_state() {
        let mut l = Lorenz::from_state(unit());
        let s = l.step_euler();
        assert!(rel_close(&s, &State::new(1.0, 1.26, 0.9833), 1e-2), "got {}", s);
        assert_eq!(*l.state(), s);
        assert!(!l.is_solved(), "Stepping alone must not record history");
    }

    #[test]
    fn step_rk4_updates_live_state() {
        let mut l = Lorenz::from_state(unit());
        let s = l.step_rk4();
        assert_eq!(*l.state(), s);
        assert_ne!(s, unit());
    }

    #[test]
    fn solve_euler_history_length_and_second_entry() {
        let mut l = Lorenz::from_state(unit());
        let traj = l.solve("euler").unwrap();
        assert_eq!(traj.len(), 5001);
        assert!(rel_close(&traj[1], &State::new(1.0, 1.26, 0.9833), 1e-2));
        assert_eq!(l.history().len(), l.steps() + 1);
    }

    #[test]
    fn history_length_is_steps_plus_one() {
        for n in [0usize, 1, 2, 17, 250] {
            for m in Method::ALL {
                let mut l = Lorenz::new(unit(), LorenzParams::default(), SimConfig::new(0.01, n));
                assert_eq!(l.integrate(m).len(), n + 1, "{} with N={}", m, n);
            }
        }
    }

    #[test]
    fn zero_steps_records_only_start_state() {
        let mut l = Lorenz::new(unit(), LorenzParams::default(), SimConfig::new(0.01, 0));
        assert_eq!(l.solve("rk4").unwrap(), &[unit()]);
        assert_eq!(*l.state(), unit());
    }

    #[test]
    fn first_entry_is_state_at_invocation_when_continuing() {
        let config = SimConfig::new(0.01, 50).continuing();
        let mut l = Lorenz::new(unit(), LorenzParams::default(), config);

        l.step_euler();
        l.step_euler();
        let before = *l.state();
        let first = l.solve("euler").unwrap()[0];
        assert_eq!(first, before);

        // Second run picks up where the first ended
        let end = *l.history().last().unwrap();
        assert_eq!(*l.state(), end);
        let second = l.solve("rk4").unwrap();
        assert_eq!(second[0], end);
        assert_eq!(second.len(), 51);
    }

    #[test]
    fn restart_mode_repeats_identical_runs() {
        let mut l = Lorenz::new(unit(), LorenzParams::default(), SimConfig::new(0.01, 200));
        let first = l.solve("rk4").unwrap().to_vec();
        let second = l.solve("rk4").unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(second[0], unit());
    }

    #[test]
    fn history_entries_are_snapshots() {
        let mut l = Lorenz::new(unit(), LorenzParams::default(), SimConfig::new(0.01, 10).continuing());
        l.integrate(Method::Euler);
        let recorded = l.history().to_vec();
        l.step_euler();
        l.step_rk4();
        assert_eq!(l.history(), recorded.as_slice());
        assert_ne!(*l.state(), *recorded.last().unwrap());
    }

    #[test]
    fn invalid_method_leaves_everything_untouched() {
        let mut l = Lorenz::new(unit(), LorenzParams::default(), SimConfig::new(0.01, 20));

        let err = l.solve("leapfrog").unwrap_err();
        assert!(matches!(err, LorenzError::InvalidArgument { argument: "method", .. }));
        assert!(l.history().is_empty());
        assert_eq!(*l.state(), unit());

        let before = l.solve("euler").unwrap().to_vec();
        let live = *l.state();
        assert!(l.solve("RK4").is_err());
        assert_eq!(l.history(), before.as_slice());
        assert_eq!(*l.state(), live);
    }

    #[test]
    fn reset_replaces_initial_state_and_clears_history() {
        let mut l = Lorenz::new(unit(), LorenzParams::default(), SimConfig::new(0.01, 10));
        l.integrate(Method::Rk4);
        let fresh = State::new(-5.0, 2.0, 30.0);
        l.reset(fresh);
        assert!(l.history().is_empty());
        assert_eq!(*l.state(), fresh);
        assert_eq!(*l.initial_state(), fresh);
        assert_eq!(l.integrate(Method::Euler)[0], fresh);
    }

    #[test]
    fn ensure_solved_uses_euler_only_when_empty() {
        let mut l = Lorenz::new(unit(), LorenzParams::default(), SimConfig::new(0.01, 30));
        let lazy = l.ensure_solved().to_vec();
        assert_eq!(lazy, simulate(unit(), LorenzParams::default(), SimConfig::new(0.01, 30), Method::Euler));

        let rk4 = l.integrate(Method::Rk4).to_vec();
        assert_eq!(l.ensure_solved(), rk4.as_slice());
    }

    #[test]
    fn probe_sees_every_step() {
        let mut l = Lorenz::new(unit(), LorenzParams::default(), SimConfig::new(0.01, 64));
        let mut probe = TimingProbe::new();
        l.solve_with(Method::Rk4, &mut probe);
        l.solve_with(Method::Euler, &mut probe);
        assert_eq!(probe.runs.len(), 2);
        assert_eq!(probe.runs[0].method, Method::Rk4);
        assert!(probe.runs.iter().all(|r| r.steps == 64));
    }

    struct Recorder(Vec<(usize, State)>);

    impl Probe for Recorder {
        fn on_step(&mut self, index: usize, state: &State) {
            self.0.push((index, *state));
        }
    }

    #[test]
    fn probe_receives_recorded_states_in_order() {
        let mut l = Lorenz::new(unit(), LorenzParams::default(), SimConfig::new(0.01, 5));
        let mut rec = Recorder(Vec::new());
        let traj = l.solve_with(Method::Euler, &mut rec).to_vec();
        let indices: Vec<usize> = rec.0.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        for (i, s) in &rec.0 {
            assert_eq!(traj[*i], *s);
        }
    }

    #[test]
    fn divergence_passes_through_as_non_finite_values() {
        // dt = 1 is far past Euler's stability limit for these parameters
        let mut l = Lorenz::new(unit(), LorenzParams::default(), SimConfig::new(1.0, 200));
        let traj = l.solve("euler").unwrap();
        assert_eq!(traj.len(), 201);
        assert!(traj.iter().any(|s| !state::is_finite(s)));
    }

    #[test]
    fn instances_run_independently_on_threads() {
        let handles: Vec<_> = [6.0, 16.0, 28.0]
            .into_iter()
            .map(|rho| {
                std::thread::spawn(move || {
                    let p = LorenzParams::new(10.0, 8.0 / 3.0, rho);
                    simulate(unit(), p, SimConfig::new(0.01, 500), Method::Rk4)
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().len(), 501);
        }
    }

    #[test]
    fn time_of_scales_with_dt() {
        let l = Lorenz::new(unit(), LorenzParams::default(), SimConfig::new(0.005, 10));
        assert!((l.time_of(10) - 0.05).abs() < 1e-12);
        assert_eq!(l.time_of(0), 0.0);
    }
}
