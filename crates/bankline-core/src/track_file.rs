//! Binary track file.
//!
//! Three blocks in order: points, controls, normals. Each block is the
//! element count as a native-endian `u64` followed by that many packed
//! native-endian `f32` triples. There is no header or version field.

use crate::{BanklineError, Result, Spline};
use glam::Vec3;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

const VEC3_BYTES: usize = std::mem::size_of::<Vec3>();

/// Serialize a spline's stored sequences.
pub fn write_track<W: Write>(writer: &mut W, spline: &Spline) -> Result<()> {
    write_block(writer, spline.points())?;
    write_block(writer, spline.controls())?;
    write_block(writer, spline.normals())?;
    Ok(())
}

/// Deserialize a spline and rebuild its arc-length table.
pub fn read_track<R: Read>(reader: &mut R) -> Result<Spline> {
    let points = read_block(reader, "points")?;
    let controls = read_block(reader, "controls")?;
    let normals = read_block(reader, "normals")?;

    if controls.len() != points.len() || normals.len() != points.len() {
        return Err(BanklineError::CorruptTrack(format!(
            "block counts disagree: {} points, {} controls, {} normals",
            points.len(),
            controls.len(),
            normals.len()
        )));
    }

    Spline::from_parts(points, controls, normals)
}

/// Write a track file to disk.
pub fn save(path: &Path, spline: &Spline) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_track(&mut writer, spline)?;
    writer.flush()?;
    log::info!("Saved track {} ({} points)", path.display(), spline.len());
    Ok(())
}

/// Read a track file from disk.
pub fn load(path: &Path) -> Result<Spline> {
    let mut reader = BufReader::new(File::open(path)?);
    let spline = read_track(&mut reader)?;
    log::info!(
        "Loaded track {} ({} points, length {:.2})",
        path.display(),
        spline.len(),
        spline.total_length()
    );
    Ok(spline)
}

fn write_block<W: Write>(writer: &mut W, values: &[Vec3]) -> Result<()> {
    let count = values.len() as u64;
    writer.write_all(&count.to_ne_bytes())?;
    writer.write_all(bytemuck::cast_slice(values))?;
    Ok(())
}

fn read_block<R: Read>(reader: &mut R, name: &str) -> Result<Vec<Vec3>> {
    let mut count_bytes = [0u8; 8];
    reader.read_exact(&mut count_bytes).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            BanklineError::CorruptTrack(format!("missing {} count", name))
        } else {
            BanklineError::IoError(e)
        }
    })?;
    let count = u64::from_ne_bytes(count_bytes);

    let byte_len = count
        .checked_mul(VEC3_BYTES as u64)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            BanklineError::CorruptTrack(format!("{} count {} is too large", name, count))
        })?;

    let mut bytes = Vec::new();
    reader.by_ref().take(byte_len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != byte_len {
        return Err(BanklineError::CorruptTrack(format!(
            "{} block truncated: expected {} bytes, found {}",
            name,
            byte_len,
            bytes.len()
        )));
    }

    Ok(bytemuck::pod_collect_to_vec(&bytes))
}
