//! Input table loading
//!
//! Reads the reference grid, the prognosis grid and the optional drilled-well
//! validation series from CSV. Columns are located by header name, so the
//! Spanish headers of the analyst spreadsheets (`Cima`, `TVDSS (m)`,
//! `TWT Pred (s)`, ...) and plain snake_case headers both work.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::types::{ActualPoint, PrognosisLayerRow, ReferenceLayerRow, SurfaceType};

/// Table loading errors
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Table has no header row")]
    Empty,

    #[error("Missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("Line {line}: expected at least {expected} fields, found {found}")]
    ShortRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}, column '{column}': '{value}' is not a number")]
    NonNumeric {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("Line {line}: unknown surface type '{value}'")]
    UnknownSurface { line: usize, value: String },
}

const SURFACE_ALIASES: &[&str] = &["surf", "superficie", "surface", "surface_type"];
const TOP_ALIASES: &[&str] = &["cima", "top", "top_name"];
const TVDSS_ALIASES: &[&str] = &["tvdss (m)", "tvdss", "tvdss_depth"];
const TWT_ALIASES: &[&str] = &["twt (s)", "twt", "two_way_time"];
const TWT_PRED_ALIASES: &[&str] = &[
    "twt pred (s)",
    "twt pred",
    "predicted_two_way_time",
    "twt (s)",
    "twt",
];
const VELOCITY_ALIASES: &[&str] = &["vavg (m/s)", "vavg", "avg_velocity"];

/// Split a CSV line respecting quoted fields (handles commas inside quotes).
pub fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    // Escaped quote ("")
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Header-resolved view over the data lines of a CSV document.
struct CsvTable {
    header: Vec<String>,
    /// (1-based line number, fields)
    rows: Vec<(usize, Vec<String>)>,
}

impl CsvTable {
    fn parse(contents: &str) -> Result<Self, TableError> {
        let mut lines = contents
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
            .filter(|(_, l)| !l.trim().is_empty());

        let (_, header_line) = lines.next().ok_or(TableError::Empty)?;
        let header = csv_split(header_line.trim_start_matches('\u{feff}'))
            .into_iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        let rows = lines.map(|(n, l)| (n, csv_split(l))).collect();

        Ok(Self { header, rows })
    }

    /// Index of the first header matching any alias, in alias order.
    fn column(&self, aliases: &[&str], column: &'static str) -> Result<usize, TableError> {
        aliases
            .iter()
            .find_map(|alias| self.header.iter().position(|h| h == alias))
            .ok_or(TableError::MissingColumn { column })
    }
}

fn field<'r>(fields: &'r [String], idx: usize, line: usize, width: usize) -> Result<&'r str, TableError> {
    fields
        .get(idx)
        .map(|s| s.trim())
        .ok_or(TableError::ShortRow {
            line,
            expected: width,
            found: fields.len(),
        })
}

fn number(fields: &[String], idx: usize, line: usize, width: usize, column: &'static str) -> Result<f64, TableError> {
    let raw = field(fields, idx, line, width)?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TableError::NonNumeric {
            line,
            column,
            value: raw.to_string(),
        }),
    }
}

fn surface(fields: &[String], idx: usize, line: usize, width: usize) -> Result<SurfaceType, TableError> {
    let raw = field(fields, idx, line, width)?;
    raw.parse().map_err(|_| TableError::UnknownSurface {
        line,
        value: raw.to_string(),
    })
}

/// Parse a reference grid: surface, top, TVDSS, TWT, average velocity.
pub fn parse_reference_csv(contents: &str) -> Result<Vec<ReferenceLayerRow>, TableError> {
    let table = CsvTable::parse(contents)?;
    let surf = table.column(SURFACE_ALIASES, "surface_type")?;
    let top = table.column(TOP_ALIASES, "top_name")?;
    let tvdss = table.column(TVDSS_ALIASES, "tvdss_depth")?;
    let twt = table.column(TWT_ALIASES, "two_way_time")?;
    let vavg = table.column(VELOCITY_ALIASES, "avg_velocity")?;
    let width = [surf, top, tvdss, twt, vavg].into_iter().max().unwrap_or(0) + 1;

    table
        .rows
        .iter()
        .map(|(line, f)| -> Result<ReferenceLayerRow, TableError> {
            Ok(ReferenceLayerRow {
                surface_type: surface(f, surf, *line, width)?,
                top_name: field(f, top, *line, width)?.to_string(),
                tvdss_depth: number(f, tvdss, *line, width, "tvdss_depth")?,
                two_way_time: number(f, twt, *line, width, "two_way_time")?,
                avg_velocity: number(f, vavg, *line, width, "avg_velocity")?,
            })
        })
        .collect()
}

/// Parse a prognosis grid: surface, top, predicted TWT, average velocity.
pub fn parse_prognosis_csv(contents: &str) -> Result<Vec<PrognosisLayerRow>, TableError> {
    let table = CsvTable::parse(contents)?;
    let surf = table.column(SURFACE_ALIASES, "surface_type")?;
    let top = table.column(TOP_ALIASES, "top_name")?;
    let twt = table.column(TWT_PRED_ALIASES, "predicted_two_way_time")?;
    let vavg = table.column(VELOCITY_ALIASES, "avg_velocity")?;
    let width = [surf, top, twt, vavg].into_iter().max().unwrap_or(0) + 1;

    table
        .rows
        .iter()
        .map(|(line, f)| -> Result<PrognosisLayerRow, TableError> {
            Ok(PrognosisLayerRow {
                surface_type: surface(f, surf, *line, width)?,
                top_name: field(f, top, *line, width)?.to_string(),
                predicted_two_way_time: number(f, twt, *line, width, "predicted_two_way_time")?,
                avg_velocity: number(f, vavg, *line, width, "avg_velocity")?,
            })
        })
        .collect()
}

/// Parse a drilled-well validation series: TWT and TVDSS pairs.
pub fn parse_actual_csv(contents: &str) -> Result<Vec<ActualPoint>, TableError> {
    let table = CsvTable::parse(contents)?;
    let twt = table.column(TWT_ALIASES, "two_way_time")?;
    let tvdss = table.column(TVDSS_ALIASES, "tvdss")?;
    let width = twt.max(tvdss) + 1;

    table
        .rows
        .iter()
        .map(|(line, f)| -> Result<ActualPoint, TableError> {
            Ok(ActualPoint {
                two_way_time: number(f, twt, *line, width, "two_way_time")?,
                tvdss: number(f, tvdss, *line, width, "tvdss")?,
            })
        })
        .collect()
}

fn read(path: &Path) -> Result<String, TableError> {
    std::fs::read_to_string(path).map_err(|e| TableError::Io(path.to_path_buf(), e))
}

pub fn read_reference_csv(path: &Path) -> Result<Vec<ReferenceLayerRow>, TableError> {
    let rows = parse_reference_csv(&read(path)?)?;
    info!(path = %path.display(), rows = rows.len(), "Loaded reference well table");
    Ok(rows)
}

pub fn read_prognosis_csv(path: &Path) -> Result<Vec<PrognosisLayerRow>, TableError> {
    let rows = parse_prognosis_csv(&read(path)?)?;
    info!(path = %path.display(), rows = rows.len(), "Loaded prognosis well table");
    Ok(rows)
}

pub fn read_actual_csv(path: &Path) -> Result<Vec<ActualPoint>, TableError> {
    let points = parse_actual_csv(&read(path)?)?;
    debug!(path = %path.display(), points = points.len(), "Loaded drilled-well series");
    Ok(points)
}
