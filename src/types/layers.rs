//! Input rows for the reference and prognosis wells

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Conformity of a top's boundary with the seismic time-depth response
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
pub enum SurfaceType {
    #[default]
    #[serde(alias = "Concordante", alias = "concordant", alias = "concordante")]
    Concordant,
    #[serde(alias = "Discordante", alias = "discordant", alias = "discordante")]
    Discordant,
}

impl SurfaceType {
    /// Only concordant boundaries take part in thickness and error calibration.
    pub fn is_concordant(self) -> bool {
        self == Self::Concordant
    }
}

impl std::fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            SurfaceType::Concordant => "Concordant",
            SurfaceType::Discordant => "Discordant",
        })
    }
}

/// Error returned when a surface label is neither concordant nor discordant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSurfaceType(pub String);

impl std::fmt::Display for UnknownSurfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown surface type '{}'", self.0)
    }
}

impl std::error::Error for UnknownSurfaceType {}

impl FromStr for SurfaceType {
    type Err = UnknownSurfaceType;

    /// Accepts the English and Spanish grid labels and their initials.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concordant" | "concordante" | "c" => Ok(Self::Concordant),
            "discordant" | "discordante" | "d" => Ok(Self::Discordant),
            _ => Err(UnknownSurfaceType(s.trim().to_string())),
        }
    }
}

/// A calibrated top in the reference (offset) well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLayerRow {
    #[serde(default)]
    pub surface_type: SurfaceType,
    pub top_name: String,
    /// True vertical depth sub-sea (m)
    pub tvdss_depth: f64,
    /// Seismic two-way time (s)
    pub two_way_time: f64,
    /// Average velocity from datum down to this top (m/s)
    pub avg_velocity: f64,
}

impl ReferenceLayerRow {
    pub fn new(
        surface_type: SurfaceType,
        top_name: impl Into<String>,
        tvdss_depth: f64,
        two_way_time: f64,
        avg_velocity: f64,
    ) -> Self {
        Self {
            surface_type,
            top_name: top_name.into(),
            tvdss_depth,
            two_way_time,
            avg_velocity,
        }
    }
}

/// A top to be forecast in the prognosis well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrognosisLayerRow {
    #[serde(default)]
    pub surface_type: SurfaceType,
    pub top_name: String,
    /// Seismic two-way time picked at the prognosis location (s)
    pub predicted_two_way_time: f64,
    /// Average velocity from datum down to this top (m/s)
    pub avg_velocity: f64,
}

impl PrognosisLayerRow {
    pub fn new(
        surface_type: SurfaceType,
        top_name: impl Into<String>,
        predicted_two_way_time: f64,
        avg_velocity: f64,
    ) -> Self {
        Self {
            surface_type,
            top_name: top_name.into(),
            predicted_two_way_time,
            avg_velocity,
        }
    }
}

/// A (time, depth) pair observed in the drilled well, used to check the forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActualPoint {
    pub two_way_time: f64,
    pub tvdss: f64,
}
