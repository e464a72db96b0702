use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::config::EffectiveConfig;
use crate::engine::{self, AnalysisParams};
use crate::loader;
use crate::models::{
    AnalysisResult, ExcessDaysEntry, ExcessHoursEntry, RestHoursEntry, Summary, WeeklyExcessEntry,
};
use crate::report;

/// What one analysis request hands back to the reviewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub request_id: String,
    pub summary: Summary,
    pub flagged_excess_hours: Vec<ExcessHoursEntry>,
    pub flagged_low_rest_hours: Vec<RestHoursEntry>,
    pub flagged_weekly_excess: Vec<WeeklyExcessEntry>,
    pub flagged_excess_days: Vec<ExcessDaysEntry>,
    /// Path of the report workbook
    pub report_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheets_path: Option<String>,
    pub warnings: Vec<String>,
}

impl AuditReport {
    /// Engine warnings come first, followed by any raised while producing the report
    pub fn new(
        request_id: String,
        result: AnalysisResult,
        report_path: Option<String>,
        sheets_path: Option<String>,
        extra_warnings: Vec<String>,
    ) -> Self {
        let mut warnings = result.warnings;
        warnings.extend(extra_warnings);

        Self {
            request_id,
            summary: result.summary,
            flagged_excess_hours: result.flagged_excess_hours,
            flagged_low_rest_hours: result.flagged_low_rest_hours,
            flagged_weekly_excess: result.flagged_weekly_excess,
            flagged_excess_days: result.flagged_excess_days,
            report_path,
            sheets_path,
            warnings,
        }
    }
}

pub fn new_request_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("req_{}", &hex[..12])
}

/// Load `input`, analyze it and write the report workbook.
///
/// Input and validation problems are errors; a failed report write only adds a warning.
pub fn run(input: &Path, params: &AnalysisParams, config: &EffectiveConfig) -> Result<AuditReport> {
    let request_id = new_request_id();
    let span = info_span!("analysis", request_id = %request_id);
    let _guard = span.enter();

    info!(file = %input.display(), "analyze request received");

    let table = loader::load_table(input)?;
    let result = match engine::analyze(table, params, &config.thresholds) {
        Ok(result) => result,
        Err(e) => {
            warn!(error = %e, "validation error");
            return Err(e.into());
        }
    };

    Ok(finish(request_id, result, config))
}

fn finish(request_id: String, result: AnalysisResult, config: &EffectiveConfig) -> AuditReport {
    let mut warnings = Vec::new();
    let mut report_path = None;
    let mut sheets_path = None;

    if config.write_report {
        match report::write_workbook(&result, &config.report_dir, &request_id) {
            Ok(path) => {
                info!(report = %path.display(), "report written");
                report_path = Some(path.display().to_string());
            }
            Err(e) => {
                warn!(error = %e, "report generation failed");
                warnings.push(format!("Report generation failed: {:#}", e));
            }
        }

        if config.csv_sheets {
            match report::write_bundle(&result, &config.report_dir, &request_id) {
                Ok(path) => {
                    info!(sheets = %path.display(), "csv sheets written");
                    sheets_path = Some(path.display().to_string());
                }
                Err(e) => {
                    warn!(error = %e, "csv sheet generation failed");
                    warnings.push(format!("CSV sheet generation failed: {:#}", e));
                }
            }
        }
    }

    AuditReport::new(request_id, result, report_path, sheets_path, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EffectiveConfig, GlobalConfig, Overrides};
    use crate::error::AnalysisError;
    use tempfile::tempdir;

    const PUNCHES: &str = "EECode,Firstname,Lastname,InPunchTime,OutPunchTime\n\
        E1,Ann,Lee,2025-01-01 12:00,2025-01-01 22:00\n\
        E1,Ann,Lee,2025-01-02 05:00,2025-01-02 18:30\n\
        E1,Ann,Lee,bad,2025-01-03 18:30\n";

    fn config_with_report_dir(dir: &Path) -> EffectiveConfig {
        let overrides = Overrides {
            report_dir: Some(dir.display().to_string()),
            ..Overrides::default()
        };
        EffectiveConfig::merge(GlobalConfig::default(), &overrides).unwrap()
    }

    #[test]
    fn test_request_id_shape() {
        let id = new_request_id();
        assert!(id.starts_with("req_"));
        assert_eq!(id.len(), 16);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_request_id());
    }

    #[test]
    fn test_run_writes_report() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("punches.csv");
        std::fs::write(&input, PUNCHES).unwrap();
        let config = config_with_report_dir(&dir.path().join("reports"));

        let report = run(&input, &AnalysisParams::default(), &config).unwrap();

        assert_eq!(report.flagged_low_rest_hours.len(), 1);
        assert_eq!(report.flagged_excess_hours.len(), 1);
        assert_eq!(report.summary.rows_received, 2);
        assert_eq!(report.summary.rows_ignored, 1);
        assert_eq!(report.warnings.len(), 1);
        let path = report.report_path.expect("report path");
        assert!(Path::new(&path).is_file());
        assert!(path.ends_with(&report::workbook_name(&report.request_id)));
        assert!(report.sheets_path.is_none());
    }

    #[test]
    fn test_run_writes_csv_sheets_when_asked() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("punches.csv");
        std::fs::write(&input, PUNCHES).unwrap();
        let mut config = config_with_report_dir(&dir.path().join("reports"));
        config.csv_sheets = true;

        let report = run(&input, &AnalysisParams::default(), &config).unwrap();

        assert!(report.report_path.is_some());
        let sheets = report.sheets_path.expect("sheets path");
        assert!(Path::new(&sheets).join("summary.csv").is_file());
        assert!(sheets.ends_with(&report::bundle_name(&report.request_id)));
    }

    #[test]
    fn test_report_failure_is_a_warning() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("punches.csv");
        std::fs::write(&input, PUNCHES).unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let config = config_with_report_dir(&blocker);

        let report = run(&input, &AnalysisParams::default(), &config).unwrap();

        assert!(report.report_path.is_none());
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[1].starts_with("Report generation failed:"));
        assert_eq!(report.flagged_low_rest_hours.len(), 1);
    }

    #[test]
    fn test_report_can_be_disabled() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("punches.csv");
        std::fs::write(&input, PUNCHES).unwrap();
        let mut config = config_with_report_dir(&dir.path().join("reports"));
        config.write_report = false;

        let report = run(&input, &AnalysisParams::default(), &config).unwrap();
        assert!(report.report_path.is_none());
        assert!(!dir.path().join("reports").exists());
    }

    #[test]
    fn test_validation_errors_surface() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("punches.csv");
        std::fs::write(&input, PUNCHES).unwrap();
        let config = config_with_report_dir(&dir.path().join("reports"));
        let params = AnalysisParams {
            start_date: Some("2025-02-01".to_string()),
            end_date: Some("2025-01-01".to_string()),
            exclude_holidays: vec![],
        };

        let err = run(&input, &params, &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::InvalidRange { .. })
        ));
    }
}
