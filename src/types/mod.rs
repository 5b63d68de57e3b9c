//! Shared data structures for top depth forecasting
//!
//! - Input rows: `ReferenceLayerRow`, `PrognosisLayerRow`, `ActualPoint`
//! - Output rows: `AnnotatedReferenceRow`, `AnnotatedPrognosisRow`
//! - Run-level values: `UncertaintyModel`, `DepthPrediction`, `ActualResidual`

mod layers;
mod prediction;

pub use layers::*;
pub use prediction::*;
