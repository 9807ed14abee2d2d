//! Ground-motion record file readers.
//!
//! Reads bedrock acceleration records from the two formats the engine
//! consumes:
//! - PEER NGA strong-motion files
//! - generic two-column time/acceleration text
//!
//! # File Formats
//!
//! ## PEER NGA Format
//!
//! ```text
//! PEER NGA STRONG MOTION DATABASE RECORD
//! Northridge-01, 1/17/1994, Station, 090
//! ACCELERATION TIME SERIES IN UNITS OF G
//! NPTS=  2000, DT=   .0100 SEC
//!   .3129080E-04  .2997970E-04  .2795720E-04  .2826270E-04  .3129080E-04
//!   ...
//! ```
//!
//! ## Two-Column Format
//!
//! ```text
//! # bedrock record, units m/s^2
//! 0.00 0.000
//! 0.01 0.012
//! 0.02 0.031
//! ```
//!
//! Comments start with `#`. A non-uniform time column is resampled onto a
//! uniform axis by linear interpolation, keeping the first and last sample
//! times.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::motion::{TimeHistory, TimeHistoryError};

/// Error type for ground-motion file operations.
#[derive(Debug, Error)]
pub enum MotionFileError {
    /// IO error reading file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error in file content
    #[error("Parse error: {0}")]
    Parse(String),

    /// PEER header line with NPTS/DT not found
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Parsed record violates a time-history invariant
    #[error("Invalid record: {0}")]
    Record(#[from] TimeHistoryError),
}

/// Read a PEER NGA strong-motion file.
///
/// The sample count and time step come from the `NPTS=..., DT=... SEC`
/// header line; every numeric token after that line is an acceleration
/// sample. The declared NPTS must match the number of samples found.
pub fn read_peer_record(path: &Path) -> Result<TimeHistory, MotionFileError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut dt: Option<f64> = None;
    let mut npts: Option<usize> = None;
    let mut acceleration: Vec<f64> = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if dt.is_none() {
            if let Some((n, step)) = parse_peer_header(line) {
                npts = Some(n);
                dt = Some(step);
            }
            continue;
        }

        for token in line.split([',', ' ', '\t']).filter(|t| !t.is_empty()) {
            let value: f64 = token.parse().map_err(|e| {
                MotionFileError::Parse(format!(
                    "Line {}: acceleration parse error: {}",
                    line_num + 1,
                    e
                ))
            })?;
            acceleration.push(value);
        }
    }

    let dt = dt.ok_or_else(|| {
        MotionFileError::InvalidFormat("No NPTS/DT header line found".to_string())
    })?;
    if let Some(n) = npts {
        if n != acceleration.len() {
            return Err(MotionFileError::InvalidFormat(format!(
                "Header declares {} points, file contains {}",
                n,
                acceleration.len()
            )));
        }
    }

    Ok(TimeHistory::from_acceleration(acceleration, dt)?)
}

/// Parse `NPTS=  2000, DT=   .0100 SEC` in any of its PEER spellings.
fn parse_peer_header(line: &str) -> Option<(usize, f64)> {
    let upper = line.to_uppercase();
    if !upper.contains("NPTS") || !upper.contains("DT") {
        return None;
    }
    let npts = field_after(&upper, "NPTS")?.parse::<usize>().ok()?;
    let dt = field_after(&upper, "DT")?.parse::<f64>().ok()?;
    Some((npts, dt))
}

/// Numeric token following `key=` (or `key` and whitespace) in `line`.
fn field_after(line: &str, key: &str) -> Option<String> {
    let start = line.find(key)? + key.len();
    let rest = line[start..].trim_start_matches([' ', '=', ':']);
    let token: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'E' | 'e'))
        .collect();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Read a two-column `time acceleration` text file.
///
/// Blank lines and `#` comments are skipped; columns may be separated by
/// whitespace or commas. [`TimeHistory::from_records`] resamples a
/// non-uniform time column onto a uniform axis by linear interpolation.
pub fn read_two_column_record(path: &Path) -> Result<TimeHistory, MotionFileError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut times: Vec<f64> = Vec::new();
    let mut values: Vec<f64> = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line
            .split([',', ' ', '\t'])
            .filter(|t| !t.is_empty())
            .collect();
        if parts.len() < 2 {
            return Err(MotionFileError::Parse(format!(
                "Line {}: expected two columns, got {}",
                line_num + 1,
                parts.len()
            )));
        }

        let time: f64 = parts[0].parse().map_err(|e| {
            MotionFileError::Parse(format!("Line {}: time parse error: {}", line_num + 1, e))
        })?;
        let value: f64 = parts[1].parse().map_err(|e| {
            MotionFileError::Parse(format!(
                "Line {}: acceleration parse error: {}",
                line_num + 1,
                e
            ))
        })?;
        times.push(time);
        values.push(value);
    }

    Ok(TimeHistory::from_records(times, values)?)
}
