use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GitpaceError;
use crate::types::FileCategory;

/// Top-level configuration loaded from `.gitpace.toml`.
///
/// Resolution order in the binary: `--config` flag > `./.gitpace.toml` >
/// defaults. Every field has a default, so an empty file is valid.
///
/// # Examples
///
/// ```
/// use gitpace_core::GitpaceConfig;
///
/// let config = GitpaceConfig::default();
/// assert_eq!(config.sessions.idle_gap_secs, 7200);
/// assert_eq!(config.estimation.overhead_multiplier, 1.8);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitpaceConfig {
    /// History mining settings.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Work-session segmentation settings.
    #[serde(default)]
    pub sessions: SessionConfig,
    /// Effort estimation heuristics.
    #[serde(default)]
    pub estimation: EstimationConfig,
}

impl GitpaceConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GitpaceError::FileNotFound`] if the file does not exist,
    /// [`GitpaceError::Io`] if it cannot be read, [`GitpaceError::Toml`] if the
    /// content is not valid TOML, or [`GitpaceError::Config`] if a value is
    /// out of range.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gitpace_core::GitpaceConfig;
    /// use std::path::Path;
    ///
    /// let config = GitpaceConfig::from_file(Path::new(".gitpace.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, GitpaceError> {
        if !path.exists() {
            return Err(GitpaceError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`GitpaceError::Toml`] if parsing fails, or
    /// [`GitpaceError::Config`] if validation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitpace_core::GitpaceConfig;
    ///
    /// let toml = r#"
    /// [estimation]
    /// overhead_multiplier = 2.0
    /// "#;
    /// let config = GitpaceConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.estimation.overhead_multiplier, 2.0);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, GitpaceError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the estimation formulas meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`GitpaceError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), GitpaceError> {
        if self.sessions.idle_gap_secs < 0 {
            return Err(GitpaceError::Config(
                "sessions.idle_gap_secs must not be negative".into(),
            ));
        }

        let est = &self.estimation;
        let rates = [
            ("estimation.scenarios.conservative", est.scenarios.conservative),
            ("estimation.scenarios.average", est.scenarios.average),
            ("estimation.scenarios.optimistic", est.scenarios.optimistic),
        ];
        for (name, rate) in rates {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(GitpaceError::Config(format!(
                    "{name} must be a positive number of lines per day (got {rate})"
                )));
            }
        }

        let non_negative = [
            ("estimation.overhead_multiplier", est.overhead_multiplier),
            ("estimation.min_actual_days", est.min_actual_days),
            ("estimation.file_hours.script", est.file_hours.script),
            (
                "estimation.file_hours.configuration",
                est.file_hours.configuration,
            ),
            ("estimation.file_hours.other", est.file_hours.other),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(GitpaceError::Config(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }

        if !est.hours_per_workday.is_finite() || est.hours_per_workday <= 0.0 {
            return Err(GitpaceError::Config(format!(
                "estimation.hours_per_workday must be positive (got {})",
                est.hours_per_workday
            )));
        }

        Ok(())
    }
}

/// History mining configuration.
///
/// # Examples
///
/// ```
/// use gitpace_core::HistoryConfig;
///
/// let config = HistoryConfig { workers: Some(4), exclude: vec![] };
/// assert_eq!(config.worker_count(), 4);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Upper bound on concurrent per-commit / per-file queries.
    /// `None` (or 0) uses the available parallelism.
    pub workers: Option<usize>,
    /// Glob patterns for tracked paths to leave out of the file inventory.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl HistoryConfig {
    /// Resolve the effective worker count (always at least 1).
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(n) if n > 0 => n,
            _ => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// Work-session segmentation configuration.
///
/// # Examples
///
/// ```
/// use gitpace_core::SessionConfig;
///
/// assert_eq!(SessionConfig::default().idle_gap_secs, 2 * 3600);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum gap between consecutive commits of one session (default: 7200).
    #[serde(default = "default_idle_gap_secs")]
    pub idle_gap_secs: i64,
}

fn default_idle_gap_secs() -> i64 {
    2 * 3600
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_gap_secs: default_idle_gap_secs(),
        }
    }
}

/// Productivity heuristics for the effort estimator.
///
/// # Examples
///
/// ```
/// use gitpace_core::EstimationConfig;
///
/// let config = EstimationConfig::default();
/// assert_eq!(config.scenarios.average, 125.0);
/// assert_eq!(config.min_actual_days, 0.5);
/// assert_eq!(config.hours_per_workday, 8.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationConfig {
    /// Lines-per-day rates for each scenario.
    #[serde(default)]
    pub scenarios: ScenarioRates,
    /// Factor for planning, testing, documentation and review (default: 1.8).
    #[serde(default = "default_overhead_multiplier")]
    pub overhead_multiplier: f64,
    /// Floor applied to the measured actual days (default: 0.5).
    #[serde(default = "default_min_actual_days")]
    pub min_actual_days: f64,
    /// Hours in one work-day (default: 8.0).
    #[serde(default = "default_hours_per_workday")]
    pub hours_per_workday: f64,
    /// Flat per-file hour costs.
    #[serde(default)]
    pub file_hours: FileHourModel,
}

fn default_overhead_multiplier() -> f64 {
    1.8
}

fn default_min_actual_days() -> f64 {
    0.5
}

fn default_hours_per_workday() -> f64 {
    8.0
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            scenarios: ScenarioRates::default(),
            overhead_multiplier: default_overhead_multiplier(),
            min_actual_days: default_min_actual_days(),
            hours_per_workday: default_hours_per_workday(),
            file_hours: FileHourModel::default(),
        }
    }
}

/// Lines-per-day rates. A lower rate means more estimated days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRates {
    #[serde(default = "default_conservative_rate")]
    pub conservative: f64,
    #[serde(default = "default_average_rate")]
    pub average: f64,
    #[serde(default = "default_optimistic_rate")]
    pub optimistic: f64,
}

fn default_conservative_rate() -> f64 {
    75.0
}

fn default_average_rate() -> f64 {
    125.0
}

fn default_optimistic_rate() -> f64 {
    175.0
}

impl Default for ScenarioRates {
    fn default() -> Self {
        Self {
            conservative: default_conservative_rate(),
            average: default_average_rate(),
            optimistic: default_optimistic_rate(),
        }
    }
}

/// Flat hour cost per file, by effort category.
///
/// # Examples
///
/// ```
/// use gitpace_core::{FileCategory, FileHourModel};
///
/// let model = FileHourModel::default();
/// assert_eq!(model.categorize("sh"), FileCategory::Script);
/// assert_eq!(model.categorize("YAML"), FileCategory::Configuration);
/// assert_eq!(model.categorize("rs"), FileCategory::Other);
/// assert_eq!(model.hours_for(FileCategory::Script), 4.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileHourModel {
    /// Hours per script file (default: 4.0).
    #[serde(default = "default_script_hours")]
    pub script: f64,
    /// Hours per configuration file (default: 1.0).
    #[serde(default = "default_configuration_hours")]
    pub configuration: f64,
    /// Hours per other file (default: 2.0).
    #[serde(default = "default_other_hours")]
    pub other: f64,
    /// Extensions (without the dot) counted as scripts.
    #[serde(default = "default_script_extensions")]
    pub script_extensions: Vec<String>,
    /// Extensions (without the dot) counted as configuration.
    #[serde(default = "default_configuration_extensions")]
    pub configuration_extensions: Vec<String>,
}

fn default_script_hours() -> f64 {
    4.0
}

fn default_configuration_hours() -> f64 {
    1.0
}

fn default_other_hours() -> f64 {
    2.0
}

fn default_script_extensions() -> Vec<String> {
    ["sh", "py", "js", "ts"].map(String::from).to_vec()
}

fn default_configuration_extensions() -> Vec<String> {
    ["json", "yml", "yaml", "md"].map(String::from).to_vec()
}

impl Default for FileHourModel {
    fn default() -> Self {
        Self {
            script: default_script_hours(),
            configuration: default_configuration_hours(),
            other: default_other_hours(),
            script_extensions: default_script_extensions(),
            configuration_extensions: default_configuration_extensions(),
        }
    }
}

impl FileHourModel {
    /// Classify an extension (without the dot, any case).
    pub fn categorize(&self, extension: &str) -> FileCategory {
        let ext = extension.trim_start_matches('.');
        if ext.is_empty() {
            return FileCategory::Other;
        }
        let matches = |list: &[String]| {
            list.iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
        };
        if matches(&self.script_extensions) {
            FileCategory::Script
        } else if matches(&self.configuration_extensions) {
            FileCategory::Configuration
        } else {
            FileCategory::Other
        }
    }

    /// Flat hour cost for one file of `category`.
    pub fn hours_for(&self, category: FileCategory) -> f64 {
        match category {
            FileCategory::Script => self.script,
            FileCategory::Configuration => self.configuration,
            FileCategory::Other => self.other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = GitpaceConfig::default();
        assert_eq!(config.sessions.idle_gap_secs, 7200);
        assert_eq!(config.estimation.scenarios.conservative, 75.0);
        assert_eq!(config.estimation.scenarios.average, 125.0);
        assert_eq!(config.estimation.scenarios.optimistic, 175.0);
        assert_eq!(config.estimation.overhead_multiplier, 1.8);
        assert_eq!(config.estimation.min_actual_days, 0.5);
        assert_eq!(config.estimation.file_hours.script, 4.0);
        assert_eq!(config.estimation.file_hours.configuration, 1.0);
        assert_eq!(config.estimation.file_hours.other, 2.0);
        assert!(config.history.workers.is_none());
        assert!(config.history.exclude.is_empty());
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = GitpaceConfig::from_toml("").unwrap();
        assert_eq!(config.sessions.idle_gap_secs, 7200);
        assert_eq!(config.estimation.scenarios.average, 125.0);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[history]
workers = 3
exclude = ["node_modules/**", "*.lock"]

[sessions]
idle_gap_secs = 1800

[estimation]
overhead_multiplier = 1.5
min_actual_days = 1.0

[estimation.scenarios]
average = 100.0

[estimation.file_hours]
script = 6.0
script_extensions = ["rs"]
"#;
        let config = GitpaceConfig::from_toml(toml).unwrap();
        assert_eq!(config.history.worker_count(), 3);
        assert_eq!(config.history.exclude, vec!["node_modules/**", "*.lock"]);
        assert_eq!(config.sessions.idle_gap_secs, 1800);
        assert_eq!(config.estimation.overhead_multiplier, 1.5);
        assert_eq!(config.estimation.min_actual_days, 1.0);
        assert_eq!(config.estimation.scenarios.average, 100.0);
        assert_eq!(config.estimation.scenarios.conservative, 75.0);
        assert_eq!(config.estimation.file_hours.script, 6.0);
        assert_eq!(
            config.estimation.file_hours.categorize("rs"),
            FileCategory::Script
        );
        assert_eq!(
            config.estimation.file_hours.categorize("py"),
            FileCategory::Other
        );
    }

    #[test]
    fn invalid_toml_returns_error() {
        assert!(GitpaceConfig::from_toml("{{invalid}}").is_err());
    }

    #[test]
    fn zero_rate_is_rejected() {
        let toml = r#"
[estimation.scenarios]
average = 0.0
"#;
        let err = GitpaceConfig::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("estimation.scenarios.average"));
    }

    #[test]
    fn negative_idle_gap_is_rejected() {
        let toml = r#"
[sessions]
idle_gap_secs = -5
"#;
        assert!(matches!(
            GitpaceConfig::from_toml(toml),
            Err(GitpaceError::Config(_))
        ));
    }

    #[test]
    fn zero_floor_is_allowed() {
        let toml = r#"
[estimation]
min_actual_days = 0.0
"#;
        let config = GitpaceConfig::from_toml(toml).unwrap();
        assert_eq!(config.estimation.min_actual_days, 0.0);
    }

    #[test]
    fn zero_workers_falls_back_to_parallelism() {
        let config = HistoryConfig {
            workers: Some(0),
            exclude: Vec::new(),
        };
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn categorize_ignores_leading_dot_and_case() {
        let model = FileHourModel::default();
        assert_eq!(model.categorize(".PY"), FileCategory::Script);
        assert_eq!(model.categorize(".json"), FileCategory::Configuration);
        assert_eq!(model.categorize(""), FileCategory::Other);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GitpaceConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, GitpaceError::FileNotFound(_)));
    }
}
