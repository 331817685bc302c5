use std::io::{self, Write};
use std::path::Path;

use crate::dynamics::state::State;

/// Write trajectory data to CSV format.
///
/// Columns: step, time, x, y, z. Time is `step * dt` from the run start.
/// Non-finite values are written as Rust formats them (`inf`, `NaN`).
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[State], dt: f64) -> io::Result<()> {
    writeln!(writer, "step,time,x,y,z")?;

    for (i, s) in trajectory.iter().enumerate() {
        writeln!(
            writer,
            "{},{:.6},{:.9},{:.9},{:.9}",
            i,
            i as f64 * dt,
            s.x, s.y, s.z,
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: impl AsRef<Path>, trajectory: &[State], dt: f64) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trajectory(&mut file, trajectory, dt)?;
    file.flush()
}
