//! Prognosis well propagation
//!
//! Converts picked two-way times into layer thicknesses, widens them by the
//! reference calibration error, and accumulates depths and one-sigma bands
//! from the anchor depth downwards.

use tracing::{debug, warn};

use super::calibration::ReferenceErrorLookup;
use super::scan::{forward_deltas, shifted_scan};
use crate::lithology::color_for;
use crate::types::{AnnotatedPrognosisRow, PrognosisLayerRow, UncertaintyModel};

/// Per-layer quantities, before accumulation.
#[derive(Debug, Clone)]
struct Layer {
    delta_time: f64,
    base_thickness: f64,
    reference_error_used: f64,
    reference_match: Option<String>,
    error_adjustment: f64,
    sigma: f64,
}

/// Root-sum-of-squares of the time, velocity and residual terms for one layer.
pub fn layer_sigma(delta_time: f64, avg_velocity: f64, uncertainty: &UncertaintyModel) -> f64 {
    let time_term = uncertainty.delta_t * avg_velocity / 2.0;
    let velocity_term = delta_time * uncertainty.delta_v / 2.0;
    (time_term.powi(2) + velocity_term.powi(2) + uncertainty.delta_err.powi(2)).sqrt()
}

/// Annotate the prognosis table with predicted depths and uncertainty bounds.
pub fn propagate_prognosis(
    rows: &[PrognosisLayerRow],
    lookup: &ReferenceErrorLookup,
    uncertainty: &UncertaintyModel,
    base_depth_seed: f64,
) -> Vec<AnnotatedPrognosisRow> {
    let times: Vec<f64> = rows.iter().map(|r| r.predicted_two_way_time).collect();
    let deltas = forward_deltas(&times);

    let layers: Vec<Layer> = rows
        .iter()
        .zip(deltas)
        .map(|(row, delta_time)| {
            let (reference_match, reference_error_used) = match lookup.lookup(&row.top_name) {
                Some((name, err)) => (Some(name.to_string()), err),
                None => {
                    warn!(
                        top = %row.top_name,
                        "No reference calibration for prognosis top, using zero error"
                    );
                    (None, 0.0)
                }
            };
            let base_thickness = if row.surface_type.is_concordant() {
                delta_time * row.avg_velocity / 2.0
            } else {
                0.0
            };
            Layer {
                delta_time,
                base_thickness,
                reference_error_used,
                reference_match,
                error_adjustment: (base_thickness * reference_error_used / 100.0).abs(),
                sigma: layer_sigma(delta_time, row.avg_velocity, uncertainty),
            }
        })
        .collect();

    let base = shifted_scan(&layers, base_depth_seed, |acc, l| acc + l.base_thickness);
    let variance = shifted_scan(&layers, 0.0, |acc, l| acc + l.sigma.powi(2));
    let shallow = shifted_scan(&layers, base_depth_seed, |acc, l| {
        acc + (l.base_thickness - l.error_adjustment)
    });
    let deep = shifted_scan(&layers, base_depth_seed, |acc, l| {
        acc + (l.base_thickness + l.error_adjustment)
    });

    rows.iter()
        .zip(layers)
        .enumerate()
        .map(|(i, (row, layer))| {
            let cumulative_sigma = variance[i].sqrt();
            debug!(
                top = %row.top_name,
                base = base[i],
                sigma = cumulative_sigma,
                "Propagated prognosis top"
            );
            AnnotatedPrognosisRow {
                surface_type: row.surface_type,
                top_name: row.top_name.clone(),
                predicted_two_way_time: row.predicted_two_way_time,
                avg_velocity: row.avg_velocity,
                base_tvdss_seed: base_depth_seed,
                delta_time: layer.delta_time,
                base_thickness: layer.base_thickness,
                reference_error_used: layer.reference_error_used,
                reference_match: layer.reference_match,
                error_adjustment: layer.error_adjustment,
                layer_propagated_sigma: layer.sigma,
                predicted_base_depth: base[i],
                cumulative_sigma,
                predicted_max_depth: base[i] + cumulative_sigma,
                predicted_min_depth: base[i] - cumulative_sigma,
                predicted_shallow_depth: shallow[i],
                predicted_deep_depth: deep[i],
                lithology_color: color_for(&row.top_name),
            }
        })
        .collect()
}
