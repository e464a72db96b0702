use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use crate::engine::columns::PunchTable;
use crate::error::AnalysisError;
use crate::models::{EmployeeName, PunchRecord, ShiftRecord};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];

/// Parse a punch timestamp written in any of the usual export formats.
///
/// Offset-bearing values keep their wall-clock time; date-only values land on midnight.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| parse_date(value).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Hours between two punches. A negative span is read as crossing midnight once.
pub fn shift_hours(punch_in: NaiveDateTime, punch_out: NaiveDateTime) -> f64 {
    let mut span = punch_out - punch_in;
    if span < Duration::zero() {
        span = span + Duration::days(1);
    }
    (span.num_seconds() as f64 / 3600.0).max(0.0)
}

/// Why a row did not become a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkipReason {
    MissingEmployeeCode,
    InvalidTimestamp,
}

impl SkipReason {
    fn warning(&self, count: usize) -> String {
        match self {
            SkipReason::MissingEmployeeCode => {
                format!("{} row(s) had no employee code and were ignored.", count)
            }
            SkipReason::InvalidTimestamp => format!(
                "{} row(s) had invalid In/Out datetime values and were ignored.",
                count
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Parsed(ShiftRecord),
    Skipped(SkipReason),
}

pub fn parse_record(record: &PunchRecord) -> RowOutcome {
    if record.employee_code.is_empty() {
        return RowOutcome::Skipped(SkipReason::MissingEmployeeCode);
    }

    match (parse_datetime(&record.in_time), parse_datetime(&record.out_time)) {
        (Some(punch_in), Some(punch_out)) => RowOutcome::Parsed(ShiftRecord {
            employee_code: record.employee_code.clone(),
            punch_in,
            punch_out,
            hours: shift_hours(punch_in, punch_out),
        }),
        _ => RowOutcome::Skipped(SkipReason::InvalidTimestamp),
    }
}

/// Shifts parsed from a punch table, with row accounting
#[derive(Debug, Clone)]
pub struct ParsedPunches {
    pub shifts: Vec<ShiftRecord>,
    pub names: BTreeMap<String, EmployeeName>,
    /// Rows that produced a shift
    pub rows_received: usize,
    pub rows_ignored: usize,
    pub warnings: Vec<String>,
}

pub fn parse_punches(table: &PunchTable) -> Result<ParsedPunches, AnalysisError> {
    let mut shifts = Vec::new();
    let mut names: BTreeMap<String, EmployeeName> = BTreeMap::new();
    let mut skipped: BTreeMap<SkipReason, usize> = BTreeMap::new();
    let mut data_rows = 0;

    for record in table.records() {
        data_rows += 1;

        match parse_record(&record) {
            RowOutcome::Parsed(shift) => {
                let name = names.entry(shift.employee_code.clone()).or_default();
                if name.first_name.is_empty() {
                    name.first_name = record.first_name.clone();
                }
                if name.last_name.is_empty() {
                    name.last_name = record.last_name.clone();
                }
                shifts.push(shift);
            }
            RowOutcome::Skipped(reason) => *skipped.entry(reason).or_insert(0) += 1,
        }
    }

    if data_rows == 0 {
        return Err(AnalysisError::no_valid_data("the file contains no data rows"));
    }
    if shifts.is_empty() {
        return Err(AnalysisError::no_valid_data(
            "no valid rows found after parsing InPunchTime/OutPunchTime",
        ));
    }

    let rows_received = shifts.len();
    let rows_ignored = skipped.values().sum();
    let warnings = skipped
        .iter()
        .map(|(reason, count)| reason.warning(*count))
        .collect();

    Ok(ParsedPunches {
        shifts,
        names,
        rows_received,
        rows_ignored,
        warnings,
    })
}
