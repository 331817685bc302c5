use std::fmt;
use std::str::FromStr;

use nalgebra::{Rotation3, Vector3};

use crate::dynamics::state::State;
use crate::error::LorenzError;

// ---------------------------------------------------------------------------
// Axis-aligned 2D projections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    XY,
    XZ,
    YZ,
}

impl Projection {
    pub const ALL: [Projection; 3] = [Projection::XY, Projection::XZ, Projection::YZ];

    pub fn name(&self) -> &'static str {
        match self {
            Projection::XY => "xy",
            Projection::XZ => "xz",
            Projection::YZ => "yz",
        }
    }

    /// Horizontal/vertical plot coordinates of a state.
    pub fn apply(&self, s: &State) -> [f64; 2] {
        match self {
            Projection::XY => [s.x, s.y],
            Projection::XZ => [s.x, s.z],
            Projection::YZ => [s.y, s.z],
        }
    }

    /// Line colour of this panel (RGB).
    pub fn color(&self) -> [u8; 3] {
        match self {
            Projection::XY => [31, 119, 180],
            Projection::XZ => [44, 160, 44],
            Projection::YZ => [214, 39, 40],
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Projection {
    type Err = LorenzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xy" => Ok(Projection::XY),
            "xz" => Ok(Projection::XZ),
            "yz" => Ok(Projection::YZ),
            other => Err(LorenzError::invalid("projection", other, "one of \"xy\", \"xz\", \"yz\"")),
        }
    }
}

// ---------------------------------------------------------------------------
// Orthographic 3D view
// ---------------------------------------------------------------------------

/// Camera angles in degrees: elevation above the x-y plane, azimuth about z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View3d {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}

impl Default for View3d {
    fn default() -> Self {
        Self {
            elevation_deg: 18.0,
            azimuth_deg: 30.0,
        }
    }
}

impl View3d {
    pub fn new(elevation_deg: f64, azimuth_deg: f64) -> Self {
        Self { elevation_deg, azimuth_deg }
    }

    /// World -> camera rotation. Camera x is screen-right, camera y is
    /// screen-up, camera z points at the viewer.
    pub fn rotation(&self) -> Rotation3<f64> {
        let azim = Rotation3::from_axis_angle(&Vector3::z_axis(), -self.azimuth_deg.to_radians());
        // Tip z toward screen-up, then tilt by elevation.
        let upright = Rotation3::from_axis_angle(&Vector3::x_axis(), -std::f64::consts::FRAC_PI_2);
        let elev = Rotation3::from_axis_angle(&Vector3::x_axis(), self.elevation_deg.to_radians());
        elev * upright * azim
    }

    /// Screen coordinates (right, up) of a state under orthographic projection.
    pub fn apply(&self, s: &State) -> [f64; 2] {
        let c = self.rotation() * s;
        [c.x, c.y]
    }

    /// Project a whole trajectory, building the rotation once.
    pub fn project_all(&self, trajectory: &[State]) -> Vec<[f64; 2]> {
        let r = self.rotation();
        trajectory
            .iter()
            .map(|s| {
                let c = r * s;
                [c.x, c.y]
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Data bounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Bounds {
    /// Bounding box of the finite points, None when there are none.
    pub fn of(points: &[[f64; 2]]) -> Option<Self> {
        points
            .iter()
            .filter(|p| p[0].is_finite() && p[1].is_finite())
            .fold(None, |acc: Option<Bounds>, p| {
                Some(match acc {
                    None => Bounds { min: *p, max: *p },
                    Some(b) => Bounds {
                        min: [b.min[0].min(p[0]), b.min[1].min(p[1])],
                        max: [b.max[0].max(p[0]), b.max[1].max(p[1])],
                    },
                })
            })
    }

    /// Grow each side by `frac` of its span; zero spans widen to +-1.
    pub fn padded(&self, frac: f64) -> Self {
        let mut out = *self;
        for a in 0..2 {
            let span = self.max[a] - self.min[a];
            let pad = if span > 0.0 { span * frac } else { 1.0 };
            out.min[a] -= pad;
            out.max[a] += pad;
        }
        out
    }

    /// Normalised position of `p` inside the box, (0,0) bottom-left.
    pub fn normalize(&self, p: [f64; 2]) -> [f64; 2] {
        [
            (p[0] - self.min[0]) / (self.max[0] - self.min[0]),
            (p[1] - self.min[1]) / (self.max[1] - self.min[1]),
        ]
    }
}
