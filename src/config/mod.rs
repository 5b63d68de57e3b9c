//! Analysis Configuration Module
//!
//! Provides the forecast configuration loaded from TOML files: uncertainty
//! coefficients, anchor depth, export settings and optional inline tables.
//!
//! ## Loading Order
//!
//! 1. `TOPS_CONFIG` environment variable (path to TOML file)
//! 2. `tops_config.toml` in the current working directory
//! 3. Built-in defaults (the demo grids and sidebar values)
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! config::init(AnalysisConfig::load()?);
//! let delta_err = config::get().uncertainty.delta_err_m;
//! ```

mod analysis_config;
pub mod defaults;
pub mod validation;

pub use analysis_config::*;

use std::sync::OnceLock;

/// Global analysis configuration, initialized once at startup.
static ANALYSIS_CONFIG: OnceLock<AnalysisConfig> = OnceLock::new();

/// Initialize the global analysis configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: AnalysisConfig) {
    if ANALYSIS_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global analysis configuration.
///
/// Panics if `init()` has not been called; that is a startup bug.
pub fn get() -> &'static AnalysisConfig {
    ANALYSIS_CONFIG
        .get()
        .expect("config::get() called before config::init()")
}
