use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDateTime;
use log::warn;
use trackcore::dataset::WindowRecords;
use trackcore::track::{AngularSample, Position3, TrackPoint};

/// Timestamps are written as two whitespace-separated tokens: date, then
/// time with fractional seconds.
const WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const READ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), READ_FORMAT).ok()
}

/// Writes one `date time x y z` line per track point.
pub fn write_xyz(path: &Path, points: &[TrackPoint]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for point in points {
        writeln!(
            writer,
            "{} {} {} {}",
            point.timestamp.format(WRITE_FORMAT),
            point.position.x,
            point.position.y,
            point.position.z
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads track points back from a `date time x y z` file. Malformed lines
/// are skipped with a diagnostic carrying the offending content.
pub fn read_xyz(path: &Path) -> anyhow::Result<Vec<TrackPoint>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut points = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let parsed = if fields.len() >= 5 {
            parse_timestamp(fields[0], fields[1]).and_then(|timestamp| {
                let x = fields[2].parse().ok()?;
                let y = fields[3].parse().ok()?;
                let z = fields[4].parse().ok()?;
                Some(TrackPoint::new(timestamp, Position3::new(x, y, z)))
            })
        } else {
            None
        };
        match parsed {
            Some(point) => points.push(point),
            None => warn!("malformed track line skipped: {}", line),
        }
    }
    Ok(points)
}

/// Writes one `date time azimuth elevation` line per sample, angles with six
/// decimal digits. Azimuth is unwrapped, so its magnitude is unbounded.
pub fn write_angles(path: &Path, samples: &[AngularSample]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for sample in samples {
        writeln!(
            writer,
            "{} {:.6} {:.6}",
            sample.timestamp.format(WRITE_FORMAT),
            sample.azimuth_deg,
            sample.elevation_deg
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads angular samples back from a `date time azimuth elevation` file.
pub fn read_angles(path: &Path) -> anyhow::Result<Vec<AngularSample>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut samples = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let parsed = if fields.len() >= 4 {
            parse_timestamp(fields[0], fields[1]).and_then(|timestamp| {
                let azimuth = fields[2].parse().ok()?;
                let elevation = fields[3].parse().ok()?;
                Some(AngularSample::new(timestamp, azimuth, elevation))
            })
        } else {
            None
        };
        match parsed {
            Some(sample) => samples.push(sample),
            None => warn!("malformed angle line skipped: {}", line),
        }
    }
    Ok(samples)
}

/// Writes the window/label pair: input rows of 2A floats, output rows of
/// `azimuth elevation`, all with six decimal digits and no timestamps.
pub fn write_dataset(
    input_path: &Path,
    output_path: &Path,
    records: &WindowRecords,
) -> anyhow::Result<()> {
    write_matrix(input_path, &records.inputs)?;
    write_matrix(output_path, &records.outputs)?;
    Ok(())
}

fn write_matrix(path: &Path, matrix: &ndarray::Array2<f64>) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for row in matrix.rows() {
        let formatted: Vec<String> = row.iter().map(|value| format!("{:.6}", value)).collect();
        writeln!(writer, "{}", formatted.join(" "))?;
    }
    writer.flush()?;
    Ok(())
}

/// Ensures the derived-data directory exists.
pub fn prepare_data_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path).with_context(|| format!("creating data directory {}", path.display()))
}
