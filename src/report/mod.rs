pub mod csv;
pub mod json;
pub mod markdown;
pub mod xlsx;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::models::AnalysisResult;

/// Directory name of the CSV sheets for one request
pub fn bundle_name(request_id: &str) -> String {
    format!("payroll_report_{}", request_id)
}

pub fn workbook_name(request_id: &str) -> String {
    format!("{}.xlsx", bundle_name(request_id))
}

/// Write `<report_dir>/payroll_report_<request_id>.xlsx`
pub fn write_workbook(result: &AnalysisResult, report_dir: &Path, request_id: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(report_dir)
        .with_context(|| format!("Failed to create report directory: {}", report_dir.display()))?;

    let path = report_dir.join(workbook_name(request_id));
    xlsx::write_workbook(result, &path)
        .with_context(|| format!("Failed to write workbook: {}", path.display()))?;
    Ok(path)
}

/// Write one CSV sheet per flagged list plus a summary sheet under
/// `<report_dir>/payroll_report_<request_id>/`
pub fn write_bundle(result: &AnalysisResult, report_dir: &Path, request_id: &str) -> Result<PathBuf> {
    let bundle_dir = report_dir.join(bundle_name(request_id));
    std::fs::create_dir_all(&bundle_dir)
        .with_context(|| format!("Failed to create report directory: {}", bundle_dir.display()))?;

    for (file_name, content) in csv::generate_sheets(result)? {
        let path = bundle_dir.join(file_name);
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write report sheet: {}", path.display()))?;
    }

    Ok(bundle_dir)
}
