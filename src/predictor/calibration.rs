//! Reference well calibration
//!
//! Compares the true thickness of each reference layer with the thickness the
//! seismic velocity implies, and keeps the relative miscalibration per top for
//! the prognosis stage.

use std::collections::HashMap;

use tracing::debug;

use super::scan::forward_deltas;
use crate::lithology::color_for;
use crate::types::{AnnotatedReferenceRow, ReferenceLayerRow};

/// Annotate the reference table with thickness and relative seismic error.
pub fn calibrate_reference(rows: &[ReferenceLayerRow]) -> Vec<AnnotatedReferenceRow> {
    let depths: Vec<f64> = rows.iter().map(|r| r.tvdss_depth).collect();
    let times: Vec<f64> = rows.iter().map(|r| r.two_way_time).collect();
    let true_thickness = forward_deltas(&depths);
    let delta_time = forward_deltas(&times);

    rows.iter()
        .zip(true_thickness)
        .zip(delta_time)
        .map(|((row, true_thickness), delta_time)| {
            let seismic_thickness = delta_time * row.avg_velocity / 2.0;
            let relative_error_pct = relative_error_pct(
                row.surface_type.is_concordant(),
                true_thickness,
                seismic_thickness,
            );
            debug!(
                top = %row.top_name,
                true_thickness,
                seismic_thickness,
                relative_error_pct,
                "Calibrated reference layer"
            );
            AnnotatedReferenceRow {
                surface_type: row.surface_type,
                top_name: row.top_name.clone(),
                tvdss_depth: row.tvdss_depth,
                two_way_time: row.two_way_time,
                avg_velocity: row.avg_velocity,
                true_thickness,
                delta_time,
                seismic_thickness,
                relative_error_pct,
                lithology_color: color_for(&row.top_name),
            }
        })
        .collect()
}

/// Zero unless the boundary is concordant and the layer has positive thickness.
fn relative_error_pct(concordant: bool, true_thickness: f64, seismic_thickness: f64) -> f64 {
    if concordant && true_thickness > 0.0 {
        (true_thickness - seismic_thickness) / true_thickness * 100.0
    } else {
        0.0
    }
}

/// Normalized form used to match top names between wells.
pub fn normalize_top_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Per-top relative error lookup built from the calibrated reference well.
#[derive(Debug, Clone, Default)]
pub struct ReferenceErrorLookup {
    /// (normalized name, display name, relative error %) in table order
    entries: Vec<(String, String, f64)>,
    /// normalized name -> index of the last entry with that name
    exact: HashMap<String, usize>,
}

impl ReferenceErrorLookup {
    pub fn from_calibrated(rows: &[AnnotatedReferenceRow]) -> Self {
        let mut lookup = Self::default();
        for row in rows {
            let key = normalize_top_name(&row.top_name);
            lookup.exact.insert(key.clone(), lookup.entries.len());
            lookup
                .entries
                .push((key, row.top_name.clone(), row.relative_error_pct));
        }
        lookup
    }

    /// Find the calibration error for a prognosis top.
    ///
    /// Exact normalized match first, then the latest reference name that
    /// contains, or is contained in, the query. Returns the matched reference
    /// name with its error.
    pub fn lookup(&self, top_name: &str) -> Option<(&str, f64)> {
        let query = normalize_top_name(top_name);
        if query.is_empty() {
            return None;
        }
        if let Some(&idx) = self.exact.get(&query) {
            let (_, name, err) = &self.entries[idx];
            return Some((name.as_str(), *err));
        }
        self.entries
            .iter()
            .rev()
            .find(|(key, _, _)| {
                !key.is_empty() && (query.contains(key.as_str()) || key.contains(query.as_str()))
            })
            .map(|(_, name, err)| (name.as_str(), *err))
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}
