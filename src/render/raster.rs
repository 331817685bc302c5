use image::{Rgb, RgbImage};

use super::projection::Bounds;

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const FRAME: Rgb<u8> = Rgb([90, 90, 90]);

// ---------------------------------------------------------------------------
// Colour ramp
// ---------------------------------------------------------------------------

const VIRIDIS: [[f64; 3]; 5] = [
    [68.0, 1.0, 84.0],
    [59.0, 82.0, 139.0],
    [33.0, 145.0, 140.0],
    [94.0, 201.0, 98.0],
    [253.0, 231.0, 37.0],
];

/// Viridis-like colour for `t` in [0, 1] (clamped).
pub fn viridis(t: f64) -> Rgb<u8> {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let pos = t * (VIRIDIS.len() - 1) as f64;
    let i = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    let f = pos - i as f64;
    let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
    Rgb([
        (a[0] + (b[0] - a[0]) * f).round() as u8,
        (a[1] + (b[1] - a[1]) * f).round() as u8,
        (a[2] + (b[2] - a[2]) * f).round() as u8,
    ])
}

// ---------------------------------------------------------------------------
// Panel: a rectangular plot area inside an image
// ---------------------------------------------------------------------------

/// Maps data coordinates into a pixel rectangle, y axis pointing up.
#[derive(Debug, Clone, Copy)]
pub struct Panel {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub bounds: Bounds,
}

impl Panel {
    /// Pixel position of a data point, None if it is not finite.
    pub fn to_pixel(&self, p: [f64; 2]) -> Option<(i64, i64)> {
        let [u, v] = self.bounds.normalize(p);
        if !(u.is_finite() && v.is_finite()) {
            return None;
        }
        let px = self.left as f64 + u * (self.width - 1) as f64;
        let py = self.top as f64 + (1.0 - v) * (self.height - 1) as f64;
        // Clamp far-off points so the i64 cast stays meaningful
        let lim = 1.0e6;
        Some((px.clamp(-lim, lim).round() as i64, py.clamp(-lim, lim).round() as i64))
    }

    /// Draw the rectangle outline of the panel.
    pub fn draw_frame(&self, img: &mut RgbImage) {
        let (l, t) = (self.left as i64, self.top as i64);
        let (r, b) = (l + self.width as i64 - 1, t + self.height as i64 - 1);
        draw_line(img, (l, t), (r, t), FRAME);
        draw_line(img, (r, t), (r, b), FRAME);
        draw_line(img, (r, b), (l, b), FRAME);
        draw_line(img, (l, b), (l, t), FRAME);
    }

    /// Connect consecutive points; segments touching a non-finite point are
    /// skipped. `color` gets the segment index and the segment count.
    pub fn draw_polyline<F>(&self, img: &mut RgbImage, points: &[[f64; 2]], color: F)
    where
        F: Fn(usize, usize) -> Rgb<u8>,
    {
        let n = points.len().saturating_sub(1);
        for (i, pair) in points.windows(2).enumerate() {
            if let (Some(a), Some(b)) = (self.to_pixel(pair[0]), self.to_pixel(pair[1])) {
                self.draw_clipped(img, a, b, color(i, n));
            }
        }
    }

    fn draw_clipped(&self, img: &mut RgbImage, a: (i64, i64), b: (i64, i64), c: Rgb<u8>) {
        let (l, t) = (self.left as i64, self.top as i64);
        let (r, bt) = (l + self.width as i64 - 1, t + self.height as i64 - 1);
        plot_line(a, b, |x, y| {
            if x >= l && x <= r && y >= t && y <= bt {
                put(img, x, y, c);
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

fn put(img: &mut RgbImage, x: i64, y: i64, c: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, c);
    }
}

/// Bresenham line from `a` to `b`, both ends included.
pub fn plot_line<F: FnMut(i64, i64)>(a: (i64, i64), b: (i64, i64), mut plot: F) {
    let (mut x, mut y) = a;
    let dx = (b.0 - a.0).abs();
    let dy = -(b.1 - a.1).abs();
    let sx = if a.0 < b.0 { 1 } else { -1 };
    let sy = if a.1 < b.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(x, y);
        if x == b.0 && y == b.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

pub fn draw_line(img: &mut RgbImage, a: (i64, i64), b: (i64, i64), c: Rgb<u8>) {
    plot_line(a, b, |x, y| put(img, x, y, c));
}

pub fn blank(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, BACKGROUND)
}
