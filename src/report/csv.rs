use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::models::{AnalysisResult, Summary};

pub const EXCESS_HOURS_HEADERS: [&str; 5] =
    ["employee_code", "first_name", "last_name", "date", "hours_worked"];

pub const LOW_REST_HEADERS: [&str; 7] = [
    "employee_code",
    "first_name",
    "last_name",
    "date",
    "rest_hours",
    "previous_last_out",
    "current_first_in",
];

pub const WEEKLY_EXCESS_HEADERS: [&str; 6] = [
    "employee_code",
    "first_name",
    "last_name",
    "week_start",
    "week_end",
    "total_hours",
];

pub const EXCESS_DAYS_HEADERS: [&str; 6] = [
    "employee_code",
    "first_name",
    "last_name",
    "week_start",
    "week_end",
    "days_worked",
];

/// Write one flagged list as a CSV sheet. The header row is written even when empty.
pub fn write_sheet<W: Write, T: Serialize>(writer: W, headers: &[&str], rows: &[T]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(headers)?;
    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the summary counters as metric/value pairs
pub fn write_summary<W: Write>(writer: W, summary: &Summary) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["metric", "value"])?;
    for (metric, value) in summary.metrics() {
        wtr.write_record([metric.to_string(), value.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Every sheet of a result as (file name, CSV text)
pub fn generate_sheets(result: &AnalysisResult) -> Result<Vec<(&'static str, String)>> {
    let mut sheets = Vec::new();

    let mut buffer = Vec::new();
    write_sheet(&mut buffer, &EXCESS_HOURS_HEADERS, &result.flagged_excess_hours)?;
    sheets.push(("excess_daily_hours.csv", String::from_utf8(buffer)?));

    let mut buffer = Vec::new();
    write_sheet(&mut buffer, &LOW_REST_HEADERS, &result.flagged_low_rest_hours)?;
    sheets.push(("low_rest_hours.csv", String::from_utf8(buffer)?));

    let mut buffer = Vec::new();
    write_sheet(&mut buffer, &WEEKLY_EXCESS_HEADERS, &result.flagged_weekly_excess)?;
    sheets.push(("weekly_excess_hours.csv", String::from_utf8(buffer)?));

    let mut buffer = Vec::new();
    write_sheet(&mut buffer, &EXCESS_DAYS_HEADERS, &result.flagged_excess_days)?;
    sheets.push(("excess_working_days.csv", String::from_utf8(buffer)?));

    let mut buffer = Vec::new();
    write_summary(&mut buffer, &result.summary)?;
    sheets.push(("summary.csv", String::from_utf8(buffer)?));

    Ok(sheets)
}
