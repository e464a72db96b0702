use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::Thresholds;

/// Configuration file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
    #[serde(default = "default_write_report")]
    pub write_report: bool,
    /// Also write each sheet as CSV under `payroll_report_<id>/`
    #[serde(default)]
    pub csv_sheets: bool,
    #[serde(default = "default_format")]
    pub default_format: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
            write_report: default_write_report(),
            csv_sheets: false,
            default_format: default_format(),
        }
    }
}

fn default_report_dir() -> String {
    "~/.local/share/timesheet-audit/reports".to_string()
}

fn default_write_report() -> bool {
    true
}

fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_log_format(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub report_dir: Option<String>,
    pub no_report: bool,
    pub csv_sheets: bool,
    pub format: Option<String>,
}

/// File settings merged with command-line overrides
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub thresholds: Thresholds,
    pub report_dir: PathBuf,
    pub write_report: bool,
    pub csv_sheets: bool,
    pub format: String,
    pub logging: LoggingSettings,
}

impl EffectiveConfig {
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let global = match config_path {
            Some(path) => load_config_file(path)?,
            None => load_global_config()?,
        };
        Self::merge(global, overrides)
    }

    pub fn merge(global: GlobalConfig, overrides: &Overrides) -> Result<Self> {
        let report_dir = overrides
            .report_dir
            .as_deref()
            .unwrap_or(&global.report.report_dir);

        Ok(Self {
            thresholds: global.thresholds,
            report_dir: expand_path(report_dir)?,
            write_report: global.report.write_report && !overrides.no_report,
            csv_sheets: global.report.csv_sheets || overrides.csv_sheets,
            format: overrides
                .format
                .clone()
                .unwrap_or(global.report.default_format),
            logging: global.logging,
        })
    }
}

/// Get the global config directory path
pub fn global_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("timesheet-audit");
    Ok(config_dir)
}

/// Get the global config file path
pub fn global_config_path() -> Result<PathBuf> {
    Ok(global_config_dir()?.join("config.toml"))
}

/// Load ~/.config/timesheet-audit/config.toml, or defaults when it does not exist
pub fn load_global_config() -> Result<GlobalConfig> {
    let config_path = global_config_path()?;

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    load_config_file(&config_path)
}

/// Load an explicitly named config file; it must exist
pub fn load_config_file(config_path: &Path) -> Result<GlobalConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    let config: GlobalConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    Ok(config)
}

/// Initialize global config directory and create default config if not exists
pub fn init_global_config() -> Result<PathBuf> {
    let config_dir = global_config_dir()?;
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;

    let config_path = config_dir.join("config.toml");

    if !config_path.exists() {
        let default_config = GlobalConfig::default();
        let content = toml::to_string_pretty(&default_config)
            .context("Failed to serialize default config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
    }

    Ok(config_path)
}

/// Expand ~ and environment variables in path
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .with_context(|| format!("Failed to expand path: {}", path))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = GlobalConfig::default();
        assert_eq!(config.thresholds.max_daily_hours, 12.0);
        assert_eq!(config.thresholds.min_rest_hours, 10.0);
        assert_eq!(config.thresholds.max_weekly_hours, 60.0);
        assert_eq!(config.thresholds.max_days_per_week, 6);
        assert_eq!(config.report.default_format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: GlobalConfig = toml::from_str(
            r#"
            [thresholds]
            max_weekly_hours = 48.0

            [report]
            write_report = false
            "#,
        )
        .unwrap();
        assert_eq!(config.thresholds.max_weekly_hours, 48.0);
        assert_eq!(config.thresholds.max_daily_hours, 12.0);
        assert!(!config.report.write_report);
        assert!(!config.report.csv_sheets);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_overrides_win() {
        let overrides = Overrides {
            report_dir: Some("/tmp/reports".to_string()),
            no_report: true,
            csv_sheets: true,
            format: Some("md".to_string()),
        };
        let config = EffectiveConfig::merge(GlobalConfig::default(), &overrides).unwrap();
        assert_eq!(config.report_dir, PathBuf::from("/tmp/reports"));
        assert!(!config.write_report);
        assert!(config.csv_sheets);
        assert_eq!(config.format, "md");
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[thresholds]\nmax_days_per_week = 5\n").unwrap();
        let config = EffectiveConfig::load(Some(&path), &Overrides::default()).unwrap();
        assert_eq!(config.thresholds.max_days_per_week, 5);
        assert!(config.write_report);

        assert!(load_config_file(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_expand_path() {
        let expanded = expand_path("~/.config/test").unwrap();
        assert!(expanded.to_string_lossy().contains("/.config/test"));
        assert!(!expanded.to_string_lossy().starts_with("~"));
    }
}
