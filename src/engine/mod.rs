//! Punch aggregation and violation detection.
//!
//! raw rows -> column normalization -> punch parsing -> date filter -> daily totals ->
//! weekly totals -> rule evaluation. Everything here is pure computation over one
//! in-memory table; the caller owns file loading and report writing.

pub mod columns;
pub mod daily;
pub mod filter;
pub mod punch;
pub mod violations;
pub mod weekly;

use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::models::{AnalysisResult, FlagCounts, RawTable, Summary};

pub use filter::DateFilter;
pub use violations::Thresholds;

/// User-supplied filter values, still as entered
#[derive(Debug, Clone, Default)]
pub struct AnalysisParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub exclude_holidays: Vec<String>,
}

pub fn analyze(
    table: RawTable,
    params: &AnalysisParams,
    thresholds: &Thresholds,
) -> Result<AnalysisResult, AnalysisError> {
    let punches = columns::normalize(table)?;
    debug!(headers = ?punches.headers(), "normalized columns");
    let parsed = punch::parse_punches(&punches)?;
    info!(
        rows_received = parsed.rows_received,
        rows_ignored = parsed.rows_ignored,
        "parsed punch rows"
    );

    let filter = DateFilter::parse(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        &params.exclude_holidays,
    )?;
    let shifts = filter.apply(parsed.shifts)?;
    let rows_after_filter = shifts.len();
    info!(rows_after_filter, "applied date filter");

    let daily = daily::aggregate_daily(&shifts);
    let weekly = weekly::aggregate_weekly(&daily);
    debug!(days = daily.len(), weeks = weekly.len(), "aggregated shifts");

    let employees = daily
        .iter()
        .map(|d| d.employee_code.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let evaluator = violations::Evaluator::new(thresholds, &parsed.names);
    let flagged_excess_hours = evaluator.excess_daily_hours(&daily);
    let flagged_low_rest_hours = evaluator.low_rest_hours(&daily);
    let flagged_weekly_excess = evaluator.weekly_excess_hours(&weekly);
    let flagged_excess_days = evaluator.excess_working_days(&weekly);

    let flags = FlagCounts {
        excess_daily_hours: flagged_excess_hours.len(),
        low_rest_hours: flagged_low_rest_hours.len(),
        weekly_excess_hours: flagged_weekly_excess.len(),
        excess_working_days: flagged_excess_days.len(),
    };
    info!(
        employees,
        excess_daily_hours = flags.excess_daily_hours,
        low_rest_hours = flags.low_rest_hours,
        weekly_excess_hours = flags.weekly_excess_hours,
        excess_working_days = flags.excess_working_days,
        "evaluated rules"
    );

    Ok(AnalysisResult {
        flagged_excess_hours,
        flagged_low_rest_hours,
        flagged_weekly_excess,
        flagged_excess_days,
        summary: Summary {
            rows_received: parsed.rows_received,
            rows_ignored: parsed.rows_ignored,
            rows_after_filter,
            employees,
            flags,
        },
        warnings: parsed.warnings,
    })
}
