//! Workbook export
//!
//! Writes both annotated tables of a run as a two-sheet workbook:
//! `<name>_Pronostico.csv`, `<name>_Referencia.csv`, and `<name>.json`
//! holding both sheets under the same names.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::types::{AnnotatedPrognosisRow, AnnotatedReferenceRow, DepthPrediction};

pub const PROGNOSIS_SHEET: &str = "Pronostico";
pub const REFERENCE_SHEET: &str = "Referencia";

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid export file name '{0}'")]
    InvalidFileName(String),

    #[error("Failed to write {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Paths written by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookPaths {
    pub prognosis_csv: PathBuf,
    pub reference_csv: PathBuf,
    pub json: PathBuf,
}

const PROGNOSIS_COLUMNS: &[&str] = &[
    "surface_type",
    "top_name",
    "predicted_two_way_time",
    "avg_velocity",
    "base_tvdss_seed",
    "delta_time",
    "base_thickness",
    "reference_error_used",
    "reference_match",
    "error_adjustment",
    "layer_propagated_sigma",
    "predicted_base_depth",
    "cumulative_sigma",
    "predicted_max_depth",
    "predicted_min_depth",
    "predicted_shallow_depth",
    "predicted_deep_depth",
    "lithology_color",
];

const REFERENCE_COLUMNS: &[&str] = &[
    "surface_type",
    "top_name",
    "tvdss_depth",
    "two_way_time",
    "avg_velocity",
    "true_thickness",
    "delta_time",
    "seismic_thickness",
    "relative_error_pct",
    "lithology_color",
];

/// Quote a CSV field when it holds a separator, quote or line break.
pub fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn prognosis_record(r: &AnnotatedPrognosisRow) -> Vec<String> {
    vec![
        r.surface_type.to_string(),
        csv_escape(&r.top_name),
        r.predicted_two_way_time.to_string(),
        r.avg_velocity.to_string(),
        r.base_tvdss_seed.to_string(),
        r.delta_time.to_string(),
        r.base_thickness.to_string(),
        r.reference_error_used.to_string(),
        csv_escape(r.reference_match.as_deref().unwrap_or("")),
        r.error_adjustment.to_string(),
        r.layer_propagated_sigma.to_string(),
        r.predicted_base_depth.to_string(),
        r.cumulative_sigma.to_string(),
        r.predicted_max_depth.to_string(),
        r.predicted_min_depth.to_string(),
        r.predicted_shallow_depth.to_string(),
        r.predicted_deep_depth.to_string(),
        r.lithology_color.hex(),
    ]
}

fn reference_record(r: &AnnotatedReferenceRow) -> Vec<String> {
    vec![
        r.surface_type.to_string(),
        csv_escape(&r.top_name),
        r.tvdss_depth.to_string(),
        r.two_way_time.to_string(),
        r.avg_velocity.to_string(),
        r.true_thickness.to_string(),
        r.delta_time.to_string(),
        r.seismic_thickness.to_string(),
        r.relative_error_pct.to_string(),
        r.lithology_color.hex(),
    ]
}

fn write_sheet(path: &Path, columns: &[&str], records: impl Iterator<Item = Vec<String>>) -> Result<(), ExportError> {
    let io_err = |e: std::io::Error| ExportError::Io(path.to_path_buf(), e);
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    writeln!(writer, "{}", columns.join(",")).map_err(io_err)?;
    for record in records {
        writeln!(writer, "{}", record.join(",")).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

/// Sibling path a sheet is written to before it is moved into place.
fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".partial");
    PathBuf::from(staged)
}

/// Write the workbook for a run into `dir`.
///
/// `file_name` is a bare stem; path separators and empty names are rejected.
/// All three files are staged first and only moved into place once every
/// write succeeded, so a failed export leaves no partial workbook.
pub fn export_workbook(dir: &Path, file_name: &str, prediction: &DepthPrediction) -> Result<WorkbookPaths, ExportError> {
    let stem = file_name.trim().trim_end_matches(".xlsx").trim_end_matches(".json");
    if stem.is_empty() || stem.contains(['/', '\\']) || stem == "." || stem == ".." {
        return Err(ExportError::InvalidFileName(file_name.to_string()));
    }

    std::fs::create_dir_all(dir).map_err(|e| ExportError::Io(dir.to_path_buf(), e))?;
    let paths = WorkbookPaths {
        prognosis_csv: dir.join(format!("{stem}_{PROGNOSIS_SHEET}.csv")),
        reference_csv: dir.join(format!("{stem}_{REFERENCE_SHEET}.csv")),
        json: dir.join(format!("{stem}.json")),
    };

    let staged = [
        (staging_path(&paths.prognosis_csv), &paths.prognosis_csv),
        (staging_path(&paths.reference_csv), &paths.reference_csv),
        (staging_path(&paths.json), &paths.json),
    ];

    let written = (|| -> Result<(), ExportError> {
        write_sheet(&staged[0].0, PROGNOSIS_COLUMNS, prediction.prognosis.iter().map(prognosis_record))?;
        write_sheet(&staged[1].0, REFERENCE_COLUMNS, prediction.reference.iter().map(reference_record))?;
        let json = serde_json::to_string_pretty(prediction)?;
        std::fs::write(&staged[2].0, json).map_err(|e| ExportError::Io(staged[2].0.clone(), e))
    })();
    if let Err(e) = written {
        for (tmp, _) in &staged {
            let _ = std::fs::remove_file(tmp);
        }
        warn!(dir = %dir.display(), stem, error = %e, "Workbook export failed, staged files removed");
        return Err(e);
    }

    for (tmp, target) in &staged {
        std::fs::rename(tmp, target).map_err(|e| ExportError::Io((*target).clone(), e))?;
    }

    info!(
        dir = %dir.display(),
        stem,
        prognosis_rows = prediction.prognosis.len(),
        reference_rows = prediction.reference.len(),
        "Workbook exported"
    );
    Ok(paths)
}
