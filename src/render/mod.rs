//! Raster rendering of trajectories: side-by-side 2D projections, an
//! orthographic 3D view coloured by time, and a GIF animation of the 3D view.
//!
//! The file-writing helpers take the integrator itself and solve it with the
//! default method when it has no history yet.

pub mod projection;
pub mod raster;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, ImageFormat, RgbImage};

use crate::dynamics::state::State;
use crate::sim::Lorenz;
use projection::Bounds;
use raster::Panel;

pub use projection::{Projection, View3d};

const PANEL_PX: u32 = 500;
const MARGIN_PX: u32 = 24;
const PADDING: f64 = 0.05;
/// NeuQuant sampling factor for GIF frames (1 = best, 30 = fastest).
const GIF_SPEED: i32 = 10;

/// Animation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    pub view: View3d,
    pub size: u32,
    /// Upper bound on frame count; long trajectories are sub-sampled.
    pub max_frames: usize,
    pub frame_delay_ms: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            view: View3d::default(),
            size: 400,
            max_frames: 200,
            frame_delay_ms: 30,
        }
    }
}

fn panel_at(left: u32, size: u32, points: &[[f64; 2]]) -> Option<Panel> {
    // Too small to hold a frame inside the margins.
    let inner = size.checked_sub(2 * MARGIN_PX).filter(|&px| px > 0)?;
    let bounds = Bounds::of(points)?.padded(PADDING);
    Some(Panel {
        left: left + MARGIN_PX,
        top: MARGIN_PX,
        width: inner,
        height: inner,
        bounds,
    })
}

// ---------------------------------------------------------------------------
// In-memory rendering
// ---------------------------------------------------------------------------

/// One square panel per projection, left to right.
pub fn render_2d(trajectory: &[State], projections: &[Projection]) -> RgbImage {
    let width = PANEL_PX * projections.len().max(1) as u32;
    let mut img = raster::blank(width, PANEL_PX);

    for (i, proj) in projections.iter().enumerate() {
        let points: Vec<[f64; 2]> = trajectory.iter().map(|s| proj.apply(s)).collect();
        let Some(panel) = panel_at(i as u32 * PANEL_PX, PANEL_PX, &points) else {
            continue;
        };
        panel.draw_frame(&mut img);
        let c = image::Rgb(proj.color());
        panel.draw_polyline(&mut img, &points, |_, _| c);
    }

    img
}

/// Orthographic 3D view, segments coloured from early (purple) to late (yellow).
pub fn render_3d(trajectory: &[State], view: &View3d, size: u32) -> RgbImage {
    let mut img = raster::blank(size, size);
    let points = view.project_all(trajectory);
    if let Some(panel) = panel_at(0, size, &points) {
        panel.draw_frame(&mut img);
        panel.draw_polyline(&mut img, &points, |i, n| raster::viridis(i as f64 / n.max(1) as f64));
    }
    img
}

/// Trajectory indices at which animation frames end. The last frame always
/// shows the full trajectory.
pub fn frame_ends(len: usize, max_frames: usize) -> Vec<usize> {
    if len == 0 || max_frames == 0 {
        return vec![];
    }
    let frames = len.min(max_frames);
    (1..=frames).map(|k| k * (len - 1) / frames).collect()
}

/// Frame k draws the trajectory up to `frame_ends[k]` on fixed axes.
pub fn render_frames(trajectory: &[State], cfg: &AnimationConfig) -> Vec<RgbImage> {
    let points = cfg.view.project_all(trajectory);
    let Some(panel) = panel_at(0, cfg.size, &points) else {
        return vec![];
    };

    let mut canvas = raster::blank(cfg.size, cfg.size);
    panel.draw_frame(&mut canvas);

    let n = points.len().saturating_sub(1).max(1);
    let mut drawn = 0;
    let mut frames = Vec::new();
    for end in frame_ends(points.len(), cfg.max_frames) {
        if end > drawn {
            let offset = drawn;
            panel.draw_polyline(&mut canvas, &points[drawn..=end], |i, _| {
                raster::viridis((offset + i) as f64 / n as f64)
            });
            drawn = end;
        }
        frames.push(canvas.clone());
    }
    frames
}

// ---------------------------------------------------------------------------
// File output
// ---------------------------------------------------------------------------

fn save_png(img: RgbImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write image {:?}", path))?;
    log::info!("Wrote {:?}", path);
    Ok(())
}

/// Three projections (xy, xz, yz) side by side, written as PNG.
pub fn plot_2d(lorenz: &mut Lorenz, path: impl AsRef<Path>) -> Result<()> {
    plot_2d_with(lorenz, path, &Projection::ALL)
}

pub fn plot_2d_with(lorenz: &mut Lorenz, path: impl AsRef<Path>, projections: &[Projection]) -> Result<()> {
    let img = render_2d(lorenz.ensure_solved(), projections);
    save_png(img, path.as_ref())
}

/// 3D view of the trajectory, written as PNG.
pub fn plot_3d(lorenz: &mut Lorenz, path: impl AsRef<Path>, view: &View3d) -> Result<()> {
    let img = render_3d(lorenz.ensure_solved(), view, PANEL_PX);
    save_png(img, path.as_ref())
}

/// Looping GIF of the trajectory being traced out.
pub fn animate(lorenz: &mut Lorenz, path: impl AsRef<Path>, cfg: &AnimationConfig) -> Result<()> {
    let path = path.as_ref();
    let frames = render_frames(lorenz.ensure_solved(), cfg);
    let delay = Delay::from_numer_denom_ms(cfg.frame_delay_ms, 1);

    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), GIF_SPEED);
    encoder.set_repeat(Repeat::Infinite)?;
    let count = frames.len();
    encoder
        .encode_frames(frames.into_iter().map(|f| {
            let rgba = DynamicImage::ImageRgb8(f).into_rgba8();
            Frame::from_parts(rgba, 0, 0, delay)
        }))
        .with_context(|| format!("Failed to encode animation {:?}", path))?;

    log::info!("Wrote {:?} ({} frames)", path, count);
    Ok(())
}
