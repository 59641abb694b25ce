//! Configuration types for ht-triad

use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub relaxed: RelaxedConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Input data configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Directory tree of unpacked Betfair historical market files
    pub dir: PathBuf,
}

/// Exact triad search window configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    /// Window start, minutes after kick-off
    #[serde(default = "default_time_from")]
    pub time_from_min: i64,

    /// Window end, minutes after kick-off
    #[serde(default = "default_time_to")]
    pub time_to_min: i64,

    /// Maximum spread between the three samples of a valid triad
    #[serde(default = "default_tolerance_secs")]
    pub tolerance_secs: i64,
}

fn default_time_from() -> i64 {
    55
}
fn default_time_to() -> i64 {
    60
}
fn default_tolerance_secs() -> i64 {
    60
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            time_from_min: 55,
            time_to_min: 60,
            tolerance_secs: 60,
        }
    }
}

/// Relaxed fallback search configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RelaxedConfig {
    /// Enable the relaxed fallback when the exact window yields nothing
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_relaxed_time_from")]
    pub time_from_min: i64,

    #[serde(default = "default_time_to")]
    pub time_to_min: i64,

    #[serde(default = "default_relaxed_tolerance_secs")]
    pub tolerance_secs: i64,
}

fn default_true() -> bool {
    true
}
fn default_relaxed_time_from() -> i64 {
    54
}
fn default_relaxed_tolerance_secs() -> i64 {
    180
}

impl Default for RelaxedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            time_from_min: 54,
            time_to_min: 60,
            tolerance_secs: 180,
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Directory for result CSVs and diagnostic artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Write per-match JSON artifacts (windowed series, candidate triads)
    #[serde(default)]
    pub debug_artifacts: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            debug_artifacts: false,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Expose Prometheus counters on this port while a run is active
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Normalize inverted window bounds by swapping them
    pub fn normalize_windows(&mut self) {
        if self.window.time_from_min > self.window.time_to_min {
            tracing::warn!(
                time_from_min = self.window.time_from_min,
                time_to_min = self.window.time_to_min,
                "window start after end, swapping"
            );
            std::mem::swap(&mut self.window.time_from_min, &mut self.window.time_to_min);
        }
        if self.relaxed.time_from_min > self.relaxed.time_to_min {
            tracing::warn!(
                time_from_min = self.relaxed.time_from_min,
                time_to_min = self.relaxed.time_to_min,
                "relaxed window start after end, swapping"
            );
            std::mem::swap(
                &mut self.relaxed.time_from_min,
                &mut self.relaxed.time_to_min,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [input]
            dir = "football_data_output"

            [window]
            time_from_min = 55
            time_to_min = 60
            tolerance_secs = 60

            [relaxed]
            enabled = true
            time_from_min = 54
            time_to_min = 60
            tolerance_secs = 180

            [report]
            output_dir = "./out"
            debug_artifacts = true

            [telemetry]
            log_level = "debug"
            metrics_port = 9090
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.input.dir, PathBuf::from("football_data_output"));
        assert_eq!(config.window.time_from_min, 55);
        assert_eq!(config.relaxed.tolerance_secs, 180);
        assert!(config.report.debug_artifacts);
        assert_eq!(config.telemetry.metrics_port, Some(9090));
    }

    #[test]
    fn test_config_defaults() {
        let toml = r#"
            [input]
            dir = "data"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.window.time_from_min, 55);
        assert_eq!(config.window.time_to_min, 60);
        assert_eq!(config.window.tolerance_secs, 60);
        assert!(config.relaxed.enabled);
        assert_eq!(config.relaxed.time_from_min, 54);
        assert_eq!(config.relaxed.tolerance_secs, 180);
        assert_eq!(config.report.output_dir, PathBuf::from("."));
        assert!(!config.report.debug_artifacts);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.telemetry.metrics_port.is_none());
    }

    #[test]
    fn test_normalize_windows_swaps_inverted_bounds() {
        let toml = r#"
            [input]
            dir = "data"

            [window]
            time_from_min = 60
            time_to_min = 55
        "#;

        let mut config: Config = toml::from_str(toml).unwrap();
        config.normalize_windows();
        assert_eq!(config.window.time_from_min, 55);
        assert_eq!(config.window.time_to_min, 60);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }
}
