use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local};

use crate::cases::Case;
use crate::sim::Method;
use super::json::TrajectorySummary;

/// Image files produced for one method, relative to the case directory.
#[derive(Debug, Clone)]
pub struct MethodArtifacts {
    pub method: Method,
    pub summary: TrajectorySummary,
    pub images: Vec<String>,
}

/// Write the per-case Markdown README.
pub fn write_readme<W: Write>(
    writer: &mut W,
    case: &Case,
    run_at: DateTime<Local>,
    results: &[MethodArtifacts],
) -> io::Result<()> {
    writeln!(writer, "# Case {}", case.id)?;
    writeln!(writer, "Run on {}", run_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(writer)?;

    writeln!(writer, "## Parameters")?;
    writeln!(
        writer,
        "- Initial conditions: ({}, {}, {})",
        case.initial.x, case.initial.y, case.initial.z
    )?;
    writeln!(writer, "- Sigma: {}", case.params.sigma)?;
    writeln!(writer, "- Beta: {}", case.params.beta)?;
    writeln!(writer, "- Rho: {}", case.params.rho)?;
    writeln!(writer, "- dt: {}, steps: {}", case.config.dt, case.config.steps)?;

    for r in results {
        writeln!(writer)?;
        writeln!(writer, "## Results ({})", r.method)?;
        match r.summary.final_state {
            Some([x, y, z]) => writeln!(writer, "Final state: ({:.4}, {:.4}, {:.4})", x, y, z)?,
            None => writeln!(writer, "Final state: n/a")?,
        }
        if let Some(step) = r.summary.first_non_finite_step {
            writeln!(
                writer,
                "Diverged: {} non-finite states, first at step {}",
                r.summary.non_finite, step
            )?;
        }
        writeln!(writer)?;
        for image in &r.images {
            writeln!(writer, "![Lorenz {}]({})", r.method, image)?;
        }
    }

    Ok(())
}

pub fn write_readme_file(
    path: impl AsRef<Path>,
    case: &Case,
    run_at: DateTime<Local>,
    results: &[MethodArtifacts],
) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_readme(&mut file, case, run_at, results)?;
    file.flush()
}
