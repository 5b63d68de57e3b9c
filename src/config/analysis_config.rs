//! Analysis Configuration - uncertainty coefficients, anchor depth and inputs
//!
//! Every value the analyst used to type into the sidebar is a field here.
//! Each struct implements `Default` with the values the analysis grids start
//! with, so running without a config file reproduces the demo forecast.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::types::{ActualPoint, PrognosisLayerRow, ReferenceLayerRow, UncertaintyModel};

/// Environment variable pointing at a config file.
pub const CONFIG_ENV_VAR: &str = "TOPS_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "tops_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one forecast.
///
/// Load with `AnalysisConfig::load()` which searches:
/// 1. `$TOPS_CONFIG` env var
/// 2. `./tops_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Run identification and anchor depth
    #[serde(default)]
    pub analysis: AnalysisInfo,

    /// One-sigma uncertainties
    #[serde(default)]
    pub uncertainty: UncertaintyConfig,

    /// Workbook export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Inline reference well rows (overrides the demo table)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference: Vec<ReferenceLayerRow>,

    /// Inline prognosis well rows (overrides the demo table)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prognosis: Vec<PrognosisLayerRow>,

    /// Drilled-well (time, depth) pairs to check the forecast against
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actual: Vec<ActualPoint>,
}

impl AnalysisConfig {
    /// Load configuration using the standard search order:
    /// 1. `$TOPS_CONFIG` environment variable
    /// 2. `./tops_config.toml` in the current working directory
    /// 3. Built-in defaults
    ///
    /// Defaults are used only when no file is found. A file that exists but
    /// fails to parse or validate is an error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_search(
            std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            Path::new(LOCAL_CONFIG_FILE),
        )
    }

    /// Search order behind `load()`, with the env value and local path supplied.
    pub(crate) fn load_from_search(env_path: Option<PathBuf>, local: &Path) -> Result<Self, ConfigError> {
        // 1. Env var; a path that does not exist is reported by the read
        if let Some(p) = env_path {
            let config = Self::load_from_file(&p)?;
            info!(path = %p.display(), analysis = %config.analysis.name, "Loaded config from TOPS_CONFIG");
            return Ok(config);
        }

        // 2. Local file
        if local.exists() {
            let config = Self::load_from_file(local)?;
            info!(path = %local.display(), analysis = %config.analysis.name, "Loaded local config");
            return Ok(config);
        }

        // 3. Defaults
        info!("No tops_config.toml found, using built-in defaults");
        Ok(Self::default())
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        // Unknown keys only warn
        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Analysis config saved");
        Ok(())
    }

    /// Validate values and inline rows.
    ///
    /// Rules:
    /// - Uncertainty coefficients must be finite and non-negative
    /// - The anchor depth must be finite
    /// - Inline rows need a top name and finite numbers
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (mut errors, warnings) = super::validation::validate_physical_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }

        for (i, r) in self.reference.iter().enumerate() {
            Self::check_row(
                "reference",
                i,
                &r.top_name,
                &[
                    ("tvdss_depth", r.tvdss_depth),
                    ("two_way_time", r.two_way_time),
                    ("avg_velocity", r.avg_velocity),
                ],
                &mut errors,
            );
        }
        for (i, r) in self.prognosis.iter().enumerate() {
            Self::check_row(
                "prognosis",
                i,
                &r.top_name,
                &[
                    ("predicted_two_way_time", r.predicted_two_way_time),
                    ("avg_velocity", r.avg_velocity),
                ],
                &mut errors,
            );
        }
        for (i, p) in self.actual.iter().enumerate() {
            if !p.two_way_time.is_finite() || !p.tvdss.is_finite() {
                errors.push(format!("actual[{i}]: values must be finite"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_row(table: &str, index: usize, name: &str, values: &[(&str, f64)], errors: &mut Vec<String>) {
        if name.trim().is_empty() {
            errors.push(format!("{table}[{index}].top_name must not be empty"));
        }
        for (field, value) in values {
            if !value.is_finite() {
                errors.push(format!("{table}[{index}].{field}: value must be finite (got {value})"));
            }
        }
    }

    /// Uncertainty coefficients as consumed by the predictor.
    pub fn uncertainty_model(&self) -> UncertaintyModel {
        UncertaintyModel {
            delta_t: self.uncertainty.delta_t_s,
            delta_v: self.uncertainty.delta_v_m_s,
            delta_err: self.uncertainty.delta_err_m,
        }
    }

    /// Inline reference rows, or the demo table when none are configured.
    pub fn reference_rows(&self) -> Vec<ReferenceLayerRow> {
        if self.reference.is_empty() {
            defaults::reference_rows()
        } else {
            self.reference.clone()
        }
    }

    /// Inline prognosis rows, or the demo table when none are configured.
    pub fn prognosis_rows(&self) -> Vec<PrognosisLayerRow> {
        if self.prognosis.is_empty() {
            defaults::prognosis_rows()
        } else {
            self.prognosis.clone()
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Analysis Info
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInfo {
    /// Display name of the forecast
    #[serde(default = "default_analysis_name")]
    pub name: String,

    /// TVDSS of the first prognosis top (m)
    #[serde(default = "default_base_tvdss")]
    pub base_tvdss_m: f64,
}

fn default_analysis_name() -> String {
    defaults::ANALYSIS_NAME.to_string()
}

fn default_base_tvdss() -> f64 {
    defaults::BASE_TVDSS_M
}

impl Default for AnalysisInfo {
    fn default() -> Self {
        Self {
            name: default_analysis_name(),
            base_tvdss_m: default_base_tvdss(),
        }
    }
}

// ============================================================================
// Uncertainty
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyConfig {
    /// Two-way time pick uncertainty (s)
    #[serde(default = "default_delta_t")]
    pub delta_t_s: f64,

    /// Average velocity uncertainty (m/s)
    #[serde(default = "default_delta_v")]
    pub delta_v_m_s: f64,

    /// Fixed residual depth term (m)
    #[serde(default = "default_delta_err")]
    pub delta_err_m: f64,
}

fn default_delta_t() -> f64 {
    defaults::DELTA_T_S
}

fn default_delta_v() -> f64 {
    defaults::DELTA_V_M_S
}

fn default_delta_err() -> f64 {
    defaults::DELTA_ERR_M
}

impl Default for UncertaintyConfig {
    fn default() -> Self {
        Self {
            delta_t_s: default_delta_t(),
            delta_v_m_s: default_delta_v(),
            delta_err_m: default_delta_err(),
        }
    }
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Workbook file stem
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Directory the workbook is written into
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

fn default_file_name() -> String {
    defaults::EXPORT_FILE_NAME.to_string()
}

fn default_directory() -> PathBuf {
    PathBuf::from(defaults::EXPORT_DIRECTORY)
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            directory: default_directory(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SurfaceType;

    #[test]
    fn test_defaults_validate() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AnalysisConfig = toml::from_str(
            r#"
[uncertainty]
delta_err_m = 8.0
"#,
        )
        .unwrap();
        assert_eq!(config.uncertainty.delta_err_m, 8.0);
        assert_eq!(config.uncertainty.delta_t_s, defaults::DELTA_T_S);
        assert_eq!(config.analysis.base_tvdss_m, defaults::BASE_TVDSS_M);
        assert_eq!(config.reference_rows().len(), 4);
    }

    #[test]
    fn test_inline_rows_override_demo_tables() {
        let config: AnalysisConfig = toml::from_str(
            r#"
[[reference]]
surface_type = "Discordante"
top_name = "KI Otates"
tvdss_depth = 2500.0
two_way_time = 1.6
avg_velocity = 5200.0

[[prognosis]]
top_name = "KI Otates"
predicted_two_way_time = 1.55
avg_velocity = 5100.0
"#,
        )
        .unwrap();
        let reference = config.reference_rows();
        assert_eq!(reference.len(), 1);
        assert_eq!(reference[0].surface_type, SurfaceType::Discordant);
        // surface_type defaults to concordant
        assert_eq!(config.prognosis_rows()[0].surface_type, SurfaceType::Concordant);
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = AnalysisConfig::default();
        config.uncertainty.delta_t_s = -0.001;
        config.uncertainty.delta_v_m_s = f64::NAN;
        config.prognosis.push(PrognosisLayerRow::new(SurfaceType::Concordant, " ", 1.0, f64::INFINITY));
        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("delta_t_s")));
                assert!(errors.iter().any(|e| e.contains("delta_v_m_s")));
                assert!(errors.iter().any(|e| e.contains("prognosis[0].top_name")));
                assert!(errors.iter().any(|e| e.contains("prognosis[0].avg_velocity")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_search_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig::load_from_search(None, &dir.path().join(LOCAL_CONFIG_FILE)).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_search_rejects_invalid_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(LOCAL_CONFIG_FILE);
        std::fs::write(&local, "[analysis]\nbase_tvdss_m = 2500.0\n\n[uncertainty]\ndelta_t_s = -0.002\n").unwrap();
        assert!(matches!(
            AnalysisConfig::load_from_search(None, &local),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_search_prefers_env_path_and_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(LOCAL_CONFIG_FILE);
        std::fs::write(&local, "[analysis]\nbase_tvdss_m = 1000.0\n").unwrap();
        let env = dir.path().join("pozo.toml");
        std::fs::write(&env, "[analysis]\nbase_tvdss_m = 2500.0\n").unwrap();

        let config = AnalysisConfig::load_from_search(Some(env), &local).unwrap();
        assert_eq!(config.analysis.base_tvdss_m, 2500.0);
        assert!(matches!(
            AnalysisConfig::load_from_search(Some(dir.path().join("missing.toml")), &local),
            Err(ConfigError::Io(..))
        ));
    }

    #[test]
    fn test_toml_roundtrip_preserves_values() {
        let mut config = AnalysisConfig::default();
        config.analysis.name = "Pozo-2".to_string();
        config.reference = defaults::reference_rows();
        let text = config.to_toml().unwrap();
        let back: AnalysisConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
