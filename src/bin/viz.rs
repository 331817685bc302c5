use clap::Parser;
use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use lorenz_sim::cases::{presets, Case};
use lorenz_sim::integrator::Method;
use lorenz_sim::render::{Projection, View3d};
use lorenz_sim::types::State;

/// Interactive viewer for one preset case.
#[derive(Parser, Debug)]
#[command(name = "lorenz-viz")]
struct Args {
    /// Preset case id (1-5)
    #[arg(default_value_t = 3)]
    case: u32,
    /// Integration method
    #[arg(long, default_value = "rk4")]
    method: Method,
}

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let case = presets::by_id(args.case).unwrap_or_else(|| {
        log::warn!("No preset case {}, falling back to case 3", args.case);
        presets::all().swap_remove(2)
    });
    let mut lorenz = case.lorenz();
    let trajectory = lorenz.integrate(args.method).to_vec();

    let app = LorenzViz {
        case,
        method: args.method,
        cursor: trajectory.len().saturating_sub(1),
        trajectory,
        view: View3d::default(),
        playing: false,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Lorenz Attractor", options, Box::new(|_| Ok(Box::new(app))))
}

struct LorenzViz {
    case: Case,
    method: Method,
    trajectory: Vec<State>,
    /// Last trajectory index shown
    cursor: usize,
    view: View3d,
    playing: bool,
}

impl LorenzViz {
    fn shown(&self) -> &[State] {
        let end = (self.cursor + 1).min(self.trajectory.len());
        &self.trajectory[..end]
    }
}

fn finite_points(points: impl Iterator<Item = [f64; 2]>) -> PlotPoints<'static> {
    points.filter(|p| p[0].is_finite() && p[1].is_finite()).collect()
}

impl eframe::App for LorenzViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let last = self.trajectory.len().saturating_sub(1);
        if self.playing {
            self.cursor = (self.cursor + (last / 300).max(1)).min(last);
            if self.cursor == last {
                self.playing = false;
            }
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            let p = &self.case.params;
            ui.heading(format!("Case {} ({})", self.case.id, self.method));
            ui.label(format!(
                "sigma = {:.3}  |  beta = {:.3}  |  rho = {:.2}  |  dt = {}  |  steps = {}",
                p.sigma, p.beta, p.rho, self.case.config.dt, self.case.config.steps
            ));
            ui.horizontal(|ui| {
                if ui.button(if self.playing { "Pause" } else { "Play" }).clicked() {
                    if !self.playing && self.cursor == last {
                        self.cursor = 0;
                    }
                    self.playing = !self.playing;
                }
                ui.add(egui::Slider::new(&mut self.cursor, 0..=last).text("step"));
                ui.add(egui::Slider::new(&mut self.view.elevation_deg, -90.0..=90.0).text("elev"));
                ui.add(egui::Slider::new(&mut self.view.azimuth_deg, -180.0..=180.0).text("azim"));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;
            let shown = self.shown();

            let panel = |ui: &mut egui::Ui, proj: Projection| {
                ui.vertical(|ui| {
                    ui.label(format!("Projection {}", proj));
                    let [r, g, b] = proj.color();
                    let points = finite_points(shown.iter().map(|s| proj.apply(s)));
                    Plot::new(proj.name())
                        .width(half_w)
                        .height(half_h)
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new(proj.name(), points).color(egui::Color32::from_rgb(r, g, b)));
                        });
                });
            };

            ui.horizontal(|ui| {
                panel(ui, Projection::XY);
                panel(ui, Projection::XZ);
            });

            ui.horizontal(|ui| {
                panel(ui, Projection::YZ);

                // Rotated 3D view
                ui.vertical(|ui| {
                    ui.label("3D view");
                    let points = finite_points(self.view.project_all(shown).into_iter());
                    let head = shown.last().map(|s| self.view.apply(s));
                    Plot::new("view3d")
                        .width(half_w)
                        .height(half_h)
                        .data_aspect(1.0)
                        .show_axes(false)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Trajectory", points));
                            if let Some(h) = head.filter(|h| h[0].is_finite() && h[1].is_finite()) {
                                plot_ui.points(egui_plot::Points::new("Current", vec![h]).radius(4.0));
                            }
                        });
                });
            });
        });
    }
}
