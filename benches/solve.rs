use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lorenz_sim::integrator::{Lorenz, Method};
use lorenz_sim::render::{self, View3d};
use lorenz_sim::types::State;

fn start() -> State {
    State::new(0.01, 0.01, 0.01)
}

fn bench_step_euler(c: &mut Criterion) {
    c.bench_function("step_euler", |b| {
        b.iter(|| {
            let mut lorenz = Lorenz::from_state(black_box(start()));
            lorenz.step_euler()
        })
    });
}

fn bench_step_rk4(c: &mut Criterion) {
    c.bench_function("step_rk4", |b| {
        b.iter(|| {
            let mut lorenz = Lorenz::from_state(black_box(start()));
            lorenz.step_rk4()
        })
    });
}

/// Default config: 5000 steps at dt = 0.01
fn bench_solve(c: &mut Criterion) {
    for method in Method::ALL {
        c.bench_function(&format!("solve_{}", method), |b| {
            b.iter(|| {
                let mut lorenz = Lorenz::from_state(black_box(start()));
                lorenz.integrate(method).len()
            })
        });
    }
}

fn bench_render(c: &mut Criterion) {
    let mut lorenz = Lorenz::from_state(start());
    let trajectory = lorenz.integrate(Method::Euler).to_vec();

    c.bench_function("plot_euler2D", |b| {
        b.iter(|| render::render_2d(black_box(&trajectory), &render::Projection::ALL))
    });
    c.bench_function("plot_euler3D", |b| {
        b.iter(|| render::render_3d(black_box(&trajectory), &View3d::default(), 500))
    });
}

criterion_group!(
    benches,
    bench_step_euler,
    bench_step_rk4,
    bench_solve,
    bench_render
);
criterion_main!(benches);
