//! Built-in defaults.
//!
//! The uncertainty coefficients, anchor depth and demo tables used when no
//! config file or CSV input supplies them. The tables are the Cretaceous tops
//! the analyst grids are pre-filled with.

use crate::types::{PrognosisLayerRow, ReferenceLayerRow, SurfaceType};

// ============================================================================
// Uncertainty
// ============================================================================

/// Two-way time pick uncertainty (s).
pub const DELTA_T_S: f64 = 0.002;

/// Average velocity uncertainty (m/s).
pub const DELTA_V_M_S: f64 = 50.0;

/// Fixed residual depth term (m).
pub const DELTA_ERR_M: f64 = 5.0;

/// TVDSS of the first prognosis top (m).
pub const BASE_TVDSS_M: f64 = 1927.0;

/// `delta_t_s` above this is suspicious (s).
pub const DELTA_T_SUSPICIOUS_S: f64 = 0.1;

/// `delta_v_m_s` above this is suspicious (m/s).
pub const DELTA_V_SUSPICIOUS_M_S: f64 = 1000.0;

// ============================================================================
// Export
// ============================================================================

pub const ANALYSIS_NAME: &str = "Pronostico";
pub const EXPORT_FILE_NAME: &str = "prediccion_cimas";
pub const EXPORT_DIRECTORY: &str = ".";

// ============================================================================
// Demo tables
// ============================================================================

pub fn reference_rows() -> Vec<ReferenceLayerRow> {
    [
        ("KS Mendez", 1848.0, 1.305, 4135.0),
        ("KS San Felipe", 2052.0, 1.404, 4260.0),
        ("Ks Agua Nueva", 2076.0, 1.416, 4525.0),
        ("KM Tamabra", 2116.0, 1.434, 5157.0),
    ]
    .into_iter()
    .map(|(name, tvdss, twt, v)| ReferenceLayerRow::new(SurfaceType::Concordant, name, tvdss, twt, v))
    .collect()
}

pub fn prognosis_rows() -> Vec<PrognosisLayerRow> {
    [
        ("KS Mendez", 1.274, 4362.0),
        ("KS San Felipe", 1.314, 4260.0),
        ("Ks Agua Nueva", 1.314, 4525.0),
        ("KM Tamabra", 1.314, 5157.0),
    ]
    .into_iter()
    .map(|(name, twt, v)| PrognosisLayerRow::new(SurfaceType::Concordant, name, twt, v))
    .collect()
}
