use anyhow::Result;

use crate::audit::AuditReport;

/// Generate JSON report
pub fn generate(report: &AuditReport) -> Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}
