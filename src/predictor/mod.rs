//! Depth Predictor
//!
//! Deterministic top depth forecast from a seismic time-depth relationship.
//! All math here is closed-form arithmetic over small tables.
//!
//! ## Stages
//! - `calibrate_reference()` - relative seismic thickness error per reference top
//! - `propagate_prognosis()` - predicted depths, shallow/deep envelope and
//!   one-sigma band for the prognosis well
//!
//! `predict()` validates the inputs and runs both stages in order.

pub mod calibration;
pub mod propagation;
pub mod scan;

pub use calibration::{calibrate_reference, normalize_top_name, ReferenceErrorLookup};
pub use propagation::{layer_sigma, propagate_prognosis};
pub use scan::{forward_deltas, shifted_scan};

use thiserror::Error;
use tracing::info;

use crate::types::{DepthPrediction, PrognosisLayerRow, ReferenceLayerRow, UncertaintyModel};

/// Which input table a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Reference,
    Prognosis,
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Table::Reference => write!(f, "reference"),
            Table::Prognosis => write!(f, "prognosis"),
        }
    }
}

/// Predictor errors
#[derive(Debug, Error, PartialEq)]
pub enum PredictError {
    #[error("The {0} table has no rows")]
    EmptyTable(Table),

    #[error("Non-numeric value in {table} table, row {row}, column '{column}': {value}")]
    NonNumeric {
        table: Table,
        row: usize,
        column: &'static str,
        value: f64,
    },

    #[error("Uncertainty '{name}' must be a finite non-negative number, got {value}")]
    InvalidUncertainty { name: &'static str, value: f64 },

    #[error("Base depth seed must be finite, got {0}")]
    InvalidSeed(f64),
}

/// Run the full forecast: reference calibration, then prognosis propagation.
///
/// Pure function of its inputs; the returned tables are fresh copies.
pub fn predict(
    reference: &[ReferenceLayerRow],
    prognosis: &[PrognosisLayerRow],
    uncertainty: &UncertaintyModel,
    base_depth_seed: f64,
) -> Result<DepthPrediction, PredictError> {
    validate_inputs(reference, prognosis, uncertainty, base_depth_seed)?;

    let calibrated = calibrate_reference(reference);
    let lookup = ReferenceErrorLookup::from_calibrated(&calibrated);
    let propagated = propagate_prognosis(prognosis, &lookup, uncertainty, base_depth_seed);

    let prediction = DepthPrediction {
        reference: calibrated,
        prognosis: propagated,
    };
    let unmatched = prediction.unmatched_tops().count();
    info!(
        reference_tops = prediction.reference.len(),
        prognosis_tops = prediction.prognosis.len(),
        unmatched,
        "Depth prediction complete"
    );
    Ok(prediction)
}

fn validate_inputs(
    reference: &[ReferenceLayerRow],
    prognosis: &[PrognosisLayerRow],
    uncertainty: &UncertaintyModel,
    base_depth_seed: f64,
) -> Result<(), PredictError> {
    if reference.is_empty() {
        return Err(PredictError::EmptyTable(Table::Reference));
    }
    if prognosis.is_empty() {
        return Err(PredictError::EmptyTable(Table::Prognosis));
    }

    for (name, value) in [
        ("delta_t", uncertainty.delta_t),
        ("delta_v", uncertainty.delta_v),
        ("delta_err", uncertainty.delta_err),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(PredictError::InvalidUncertainty { name, value });
        }
    }
    if !base_depth_seed.is_finite() {
        return Err(PredictError::InvalidSeed(base_depth_seed));
    }

    for (row, r) in reference.iter().enumerate() {
        check_finite(Table::Reference, row, "tvdss_depth", r.tvdss_depth)?;
        check_finite(Table::Reference, row, "two_way_time", r.two_way_time)?;
        check_finite(Table::Reference, row, "avg_velocity", r.avg_velocity)?;
    }
    for (row, r) in prognosis.iter().enumerate() {
        check_finite(Table::Prognosis, row, "predicted_two_way_time", r.predicted_two_way_time)?;
        check_finite(Table::Prognosis, row, "avg_velocity", r.avg_velocity)?;
    }
    Ok(())
}

fn check_finite(table: Table, row: usize, column: &'static str, value: f64) -> Result<(), PredictError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PredictError::NonNumeric {
            table,
            row,
            column,
            value,
        })
    }
}
