//! Print a summary of a track file without opening a window.

use anyhow::{Context, Result};
use bankline_core::{track_file, Spline};
use std::io::Write;
use std::path::Path;

pub fn run(track: &Path) -> Result<()> {
    let spline = track_file::load(track)
        .with_context(|| format!("Failed to read track {}", track.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Track: {}", track.display())?;
    write_summary(&mut out, &spline)?;
    Ok(())
}

/// Point count, per-segment arc lengths and the loop length
fn write_summary<W: Write>(out: &mut W, spline: &Spline) -> std::io::Result<()> {
    writeln!(out, "Points: {}", spline.len())?;
    if spline.is_empty() {
        return Ok(());
    }

    writeln!(out, "Segments:")?;
    for (i, length) in spline.lengths().iter().enumerate() {
        writeln!(out, "  {:>4} -> {:<4} {:>10.3}", i, (i + 1) % spline.len(), length)?;
    }
    writeln!(out, "Total length: {:.3}", spline.total_length())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankline_core::Vec3;

    fn summary(spline: &Spline) -> String {
        let mut out = Vec::new();
        write_summary(&mut out, spline).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_track_reports_no_segments() {
        let text = summary(&Spline::new());
        assert_eq!(text, "Points: 0\n");
    }

    #[test]
    fn lists_every_segment_and_the_total() {
        let mut spline = Spline::new();
        spline.insert_point(Vec3::new(0.0, 0.0, 0.0));
        spline.insert_point(Vec3::new(10.0, 0.0, 0.0));
        spline.insert_point(Vec3::new(10.0, 0.0, 10.0));

        let text = summary(&spline);
        assert!(text.starts_with("Points: 3\n"));
        assert!(text.contains("     0 -> 1"));
        assert!(text.contains("     2 -> 0"));
        assert!(text.contains(&format!("Total length: {:.3}", spline.total_length())));
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("bankline_info_{}.track", uuid::Uuid::new_v4()));
        let err = run(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read track"));
    }
}
