use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use lorenz_sim::cases::{self, presets, Case};
use lorenz_sim::integrator::{Lorenz, Method, TimingProbe};
use lorenz_sim::io::json::{self, TrajectorySummary};
use lorenz_sim::io::report::{self, MethodArtifacts};
use lorenz_sim::io::csv;
use lorenz_sim::render::{self, AnimationConfig, View3d};
use lorenz_sim::types::State;

/// Run Lorenz system cases and write plots, data and a README per case.
#[derive(Parser, Debug)]
#[command(name = "lorenz-sim", version)]
struct Args {
    /// JSON case file (defaults to the five built-in presets)
    #[arg(long)]
    cases: Option<PathBuf>,
    /// Only run these case ids (repeatable)
    #[arg(long = "case")]
    only: Vec<u32>,
    /// Output directory
    #[arg(long, default_value = "results")]
    out: PathBuf,
    /// Override the integration methods of every case ("euler", "rk4")
    #[arg(long)]
    method: Vec<Method>,
    /// Override the step count N
    #[arg(long)]
    steps: Option<usize>,
    /// Override the time step
    #[arg(long)]
    dt: Option<f64>,
    /// Also write a GIF animation per method
    #[arg(long)]
    animate: bool,
    /// Skip PNG/GIF output
    #[arg(long)]
    no_plots: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cases = match &args.cases {
        Some(path) => cases::load_cases(path)?,
        None => presets::all(),
    };
    if !args.only.is_empty() {
        cases.retain(|c| args.only.contains(&c.id));
    }
    for case in &mut cases {
        apply_overrides(case, &args)?;
    }
    if cases.is_empty() {
        log::warn!("No cases selected");
        return Ok(());
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create output directory {:?}", args.out))?;

    println!();
    println!("====================================================================");
    println!("  LORENZ SYSTEM — {} case(s) -> {}", cases.len(), args.out.display());
    println!("====================================================================");
    println!(
        "  {:>4}  {:>6}  {:>6}  {:>6}  {:>6}  {:>9}  {:>28}",
        "case", "method", "sigma", "beta", "rho", "time", "final (x, y, z)"
    );
    println!("  {}", "─".repeat(78));

    for case in &cases {
        run_case(case, &args)?;
    }

    println!("====================================================================");
    println!();
    Ok(())
}

fn apply_overrides(case: &mut Case, args: &Args) -> Result<()> {
    if !args.method.is_empty() {
        case.methods.clear();
        for &m in &args.method {
            if !case.methods.contains(&m) {
                case.methods.push(m);
            }
        }
    }
    if let Some(n) = args.steps {
        case.config.steps = n;
    }
    if let Some(dt) = args.dt {
        anyhow::ensure!(dt.is_finite() && dt > 0.0, "--dt must be positive, got {}", dt);
        case.config.dt = dt;
    }
    Ok(())
}

fn run_case(case: &Case, args: &Args) -> Result<()> {
    let dir = args.out.join(case.dir_name());
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
    log::info!("Running case {} into {:?}", case.id, dir);

    let mut lorenz = case.lorenz();
    let mut probe = TimingProbe::new();
    let mut trajectories: Vec<(Method, Vec<State>)> = Vec::new();
    let mut artifacts = Vec::new();

    for &method in &case.methods {
        let trajectory = lorenz.solve_with(method, &mut probe).to_vec();
        let summary = TrajectorySummary::from_trajectory(&trajectory, case.config.dt);

        csv::write_trajectory_file(dir.join(format!("trajectory_{}.csv", method)), &trajectory, case.config.dt)?;
        json::write_summary_file(dir.join(format!("summary_{}.json", method)), case, method, &summary)?;

        let images = if args.no_plots {
            vec![]
        } else {
            write_plots(&mut lorenz, &dir, method, args.animate)?
        };

        print_row(case, method, &summary, &probe);
        artifacts.push(MethodArtifacts { method, summary, images });
        trajectories.push((method, trajectory));
    }

    let datasets: Vec<(Method, &[State])> = trajectories
        .iter()
        .map(|(m, t)| (*m, t.as_slice()))
        .collect();
    json::write_datasets_file(dir.join("lorenz.json"), &datasets)?;
    report::write_readme_file(dir.join("README.md"), case, chrono::Local::now(), &artifacts)?;

    Ok(())
}

/// Plot the integrator's current history; returns the file names written.
fn write_plots(lorenz: &mut Lorenz, dir: &Path, method: Method, animate: bool) -> Result<Vec<String>> {
    let mut images = vec![
        format!("lorenz3D_{}.png", method),
        format!("lorenz2D_{}.png", method),
    ];
    render::plot_3d(lorenz, dir.join(&images[0]), &View3d::default())?;
    render::plot_2d(lorenz, dir.join(&images[1]))?;

    if animate {
        let gif = format!("lorenz_{}.gif", method);
        render::animate(lorenz, dir.join(&gif), &AnimationConfig::default())?;
        images.push(gif);
    }
    Ok(images)
}

fn print_row(case: &Case, method: Method, summary: &TrajectorySummary, probe: &TimingProbe) {
    let elapsed = probe.last().map(|t| t.elapsed).unwrap_or_default();
    let fin = match summary.final_state {
        Some([x, y, z]) => format!("({:.3}, {:.3}, {:.3})", x, y, z),
        None => "n/a".to_string(),
    };
    println!(
        "  {:>4}  {:>6}  {:>6.3}  {:>6.3}  {:>6.2}  {:>7.1}ms  {:>28}",
        case.id,
        method.name(),
        case.params.sigma,
        case.params.beta,
        case.params.rho,
        elapsed.as_secs_f64() * 1e3,
        fin
    );
    if summary.diverged() {
        println!(
            "        diverged: {} non-finite states from step {}",
            summary.non_finite,
            summary.first_non_finite_step.unwrap_or(0)
        );
    }
}
