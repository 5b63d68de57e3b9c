//! tops-forecast: Stratigraphic Top Depth Forecasting
//!
//! Forecasts TVDSS of stratigraphic tops in a prognosis well from a
//! calibrated reference well and a seismic time-depth relationship, with a
//! propagated one-sigma uncertainty band.
//!
//! ## Architecture
//!
//! - **Predictor**: reference calibration, then prognosis propagation
//! - **Config**: TOML analysis settings with typo detection
//! - **Tables / Export**: CSV input grids, two-sheet workbook output
//! - **Real Well**: residuals of a drilled well against the forecast
//! - **Lithology**: top name to display color

pub mod config;
pub mod export;
pub mod lithology;
pub mod predictor;
pub mod real_well;
pub mod tables;
pub mod types;

// Re-export configuration
pub use config::{AnalysisConfig, ConfigError};

// Re-export commonly used types
pub use types::{
    ActualPoint, ActualResidual, AnnotatedPrognosisRow, AnnotatedReferenceRow, DepthPrediction,
    PrognosisLayerRow, ReferenceLayerRow, SurfaceType, UncertaintyModel,
};

// Re-export the entry points
pub use export::{export_workbook, ExportError, WorkbookPaths};
pub use predictor::{predict, PredictError};
pub use real_well::compare_with_actual;
pub use tables::TableError;
