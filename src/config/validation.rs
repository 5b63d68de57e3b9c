//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::defaults;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for `AnalysisConfig`.
///
/// Keys of array-of-table rows are listed under the array name
/// (`reference.top_name`). Any new field must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [analysis]
        "analysis",
        "analysis.name",
        "analysis.base_tvdss_m",
        // [uncertainty]
        "uncertainty",
        "uncertainty.delta_t_s",
        "uncertainty.delta_v_m_s",
        "uncertainty.delta_err_m",
        // [export]
        "export",
        "export.file_name",
        "export.directory",
        // [[reference]]
        "reference",
        "reference.surface_type",
        "reference.top_name",
        "reference.tvdss_depth",
        "reference.two_way_time",
        "reference.avg_velocity",
        // [[prognosis]]
        "prognosis",
        "prognosis.surface_type",
        "prognosis.top_name",
        "prognosis.predicted_two_way_time",
        "prognosis.avg_velocity",
        // [[actual]]
        "actual",
        "actual.two_way_time",
        "actual.tvdss",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// A table `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`. Tables
/// inside arrays are walked under the array's own path, each distinct key
/// reported once.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            } else if let Some(items) = v.as_array() {
                for item in items.iter().filter(|i| i.is_table()) {
                    for key in walk_toml_keys(item, &path) {
                        if !keys.contains(&key) {
                            keys.push(key);
                        }
                    }
                }
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, d)| d <= 3)
        // ties resolve alphabetically
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys; it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        // parse errors are reported by serde later
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed `AnalysisConfig`.
///
/// Returns (errors, warnings): errors are impossible values that must stop
/// the run; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::AnalysisConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let u = &config.uncertainty;

    for (name, value) in [
        ("uncertainty.delta_t_s", u.delta_t_s),
        ("uncertainty.delta_v_m_s", u.delta_v_m_s),
        ("uncertainty.delta_err_m", u.delta_err_m),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!("{name} = {value} must be a finite non-negative number"));
        }
    }

    if !config.analysis.base_tvdss_m.is_finite() {
        errors.push(format!(
            "analysis.base_tvdss_m = {} must be finite",
            config.analysis.base_tvdss_m
        ));
    }

    if u.delta_t_s > defaults::DELTA_T_SUSPICIOUS_S {
        warnings.push(ValidationWarning {
            field: "uncertainty.delta_t_s".to_string(),
            message: format!(
                "delta_t_s = {:.3} s is larger than a typical pick uncertainty (<= {} s)",
                u.delta_t_s,
                defaults::DELTA_T_SUSPICIOUS_S
            ),
            suggestion: None,
        });
    }

    if u.delta_v_m_s > defaults::DELTA_V_SUSPICIOUS_M_S {
        warnings.push(ValidationWarning {
            field: "uncertainty.delta_v_m_s".to_string(),
            message: format!(
                "delta_v_m_s = {:.0} m/s is larger than a typical velocity uncertainty (<= {} m/s)",
                u.delta_v_m_s,
                defaults::DELTA_V_SUSPICIOUS_M_S
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
