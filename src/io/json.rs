use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::cases::Case;
use crate::dynamics::state::{self, LorenzParams, State};
use crate::sim::Method;

/// Min/max of one coordinate over the finite part of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |acc, v| match acc {
            None => Some(AxisRange { min: v, max: v }),
            Some(r) => Some(AxisRange { min: r.min.min(v), max: r.max.max(v) }),
        })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Summary statistics computed from a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectorySummary {
    pub steps: usize,
    pub dt: f64,
    pub duration: f64,
    pub final_state: Option<[f64; 3]>,
    pub x: Option<AxisRange>,
    pub y: Option<AxisRange>,
    pub z: Option<AxisRange>,
    pub non_finite: usize,
    pub first_non_finite_step: Option<usize>,
}

impl TrajectorySummary {
    /// Compute summary from trajectory data. Ranges only cover finite states.
    pub fn from_trajectory(trajectory: &[State], dt: f64) -> Self {
        let finite: Vec<&State> = trajectory.iter().filter(|s| state::is_finite(s)).collect();
        let steps = trajectory.len().saturating_sub(1);

        TrajectorySummary {
            steps,
            dt,
            duration: steps as f64 * dt,
            final_state: trajectory.last().map(|s| [s.x, s.y, s.z]),
            x: AxisRange::of(finite.iter().map(|s| s.x)),
            y: AxisRange::of(finite.iter().map(|s| s.y)),
            z: AxisRange::of(finite.iter().map(|s| s.z)),
            non_finite: trajectory.len() - finite.len(),
            first_non_finite_step: trajectory.iter().position(|s| !state::is_finite(s)),
        }
    }

    pub fn diverged(&self) -> bool {
        self.non_finite > 0
    }
}

#[derive(Serialize)]
struct CaseInfo<'a> {
    id: u32,
    method: &'a str,
    initial_conditions: [f64; 3],
    params: &'a LorenzParams,
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    case: CaseInfo<'a>,
    trajectory: &'a TrajectorySummary,
}

/// Write trajectory summary as JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    case: &Case,
    method: Method,
    summary: &TrajectorySummary,
) -> io::Result<()> {
    let doc = SummaryDocument {
        case: CaseInfo {
            id: case.id,
            method: method.name(),
            initial_conditions: [case.initial.x, case.initial.y, case.initial.z],
            params: &case.params,
        },
        trajectory: summary,
    };
    serde_json::to_writer_pretty(&mut *writer, &doc)?;
    writeln!(writer)
}

/// Write trajectory summary JSON to a file.
pub fn write_summary_file(
    path: impl AsRef<Path>,
    case: &Case,
    method: Method,
    summary: &TrajectorySummary,
) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_summary(&mut file, case, method, summary)?;
    file.flush()
}

/// Write one `[x, y, z]` row array per method, keyed `data_<method>`.
///
/// Non-finite coordinates serialise as `null`.
pub fn write_datasets<W: Write>(writer: &mut W, datasets: &[(Method, &[State])]) -> io::Result<()> {
    let doc: BTreeMap<String, Vec<[f64; 3]>> = datasets
        .iter()
        .map(|(method, traj)| {
            let rows = traj.iter().map(|s| [s.x, s.y, s.z]).collect();
            (format!("data_{}", method.name()), rows)
        })
        .collect();
    serde_json::to_writer(&mut *writer, &doc)?;
    writeln!(writer)
}

pub fn write_datasets_file(path: impl AsRef<Path>, datasets: &[(Method, &[State])]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_datasets(&mut file, datasets)?;
    file.flush()
}
