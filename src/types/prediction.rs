//! Annotated output tables produced by the depth predictor

use serde::{Deserialize, Serialize};

use super::SurfaceType;
use crate::lithology::Rgb;

/// One-sigma uncertainties applied to every prognosis layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyModel {
    /// Two-way time pick uncertainty (s)
    pub delta_t: f64,
    /// Average velocity uncertainty (m/s)
    pub delta_v: f64,
    /// Fixed residual depth term (m)
    pub delta_err: f64,
}

impl Default for UncertaintyModel {
    fn default() -> Self {
        Self {
            delta_t: 0.002,
            delta_v: 50.0,
            delta_err: 5.0,
        }
    }
}

/// Reference well row with its seismic calibration error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedReferenceRow {
    pub surface_type: SurfaceType,
    pub top_name: String,
    pub tvdss_depth: f64,
    pub two_way_time: f64,
    pub avg_velocity: f64,
    /// Depth difference to the top below (m); 0 on the last row
    pub true_thickness: f64,
    /// Two-way time difference to the top below (s); 0 on the last row
    pub delta_time: f64,
    /// One-way thickness implied by the seismic velocity (m)
    pub seismic_thickness: f64,
    /// Miscalibration of the seismic thickness against the true thickness (%)
    pub relative_error_pct: f64,
    pub lithology_color: Rgb,
}

/// Prognosis well row with predicted depths and the propagated band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedPrognosisRow {
    pub surface_type: SurfaceType,
    pub top_name: String,
    pub predicted_two_way_time: f64,
    pub avg_velocity: f64,
    pub base_tvdss_seed: f64,
    pub delta_time: f64,
    pub base_thickness: f64,
    /// Calibration error borrowed from the matching reference top (%)
    pub reference_error_used: f64,
    /// Name of the reference top the error was taken from, if any
    pub reference_match: Option<String>,
    pub error_adjustment: f64,
    pub layer_propagated_sigma: f64,
    pub predicted_base_depth: f64,
    pub cumulative_sigma: f64,
    pub predicted_max_depth: f64,
    pub predicted_min_depth: f64,
    pub predicted_shallow_depth: f64,
    pub predicted_deep_depth: f64,
    pub lithology_color: Rgb,
}

/// Result of one predictor run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthPrediction {
    #[serde(rename = "Referencia")]
    pub reference: Vec<AnnotatedReferenceRow>,
    #[serde(rename = "Pronostico")]
    pub prognosis: Vec<AnnotatedPrognosisRow>,
}

impl DepthPrediction {
    /// Prognosis tops whose names found no reference calibration.
    pub fn unmatched_tops(&self) -> impl Iterator<Item = &str> {
        self.prognosis
            .iter()
            .filter(|r| r.reference_match.is_none())
            .map(|r| r.top_name.as_str())
    }
}

/// Misfit between one observed point in the drilled well and the forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActualResidual {
    pub two_way_time: f64,
    pub actual_tvdss: f64,
    pub predicted_base_depth: f64,
    pub predicted_min_depth: f64,
    pub predicted_max_depth: f64,
    /// actual - predicted base (m); positive when the top came in deeper
    pub residual: f64,
    pub within_band: bool,
}
