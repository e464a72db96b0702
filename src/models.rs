use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Tabular input as handed over by the loader: string cells under a header row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Cell text, or "" for cells past the end of a short row
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// One raw punch row after column normalization
#[derive(Debug, Clone, PartialEq)]
pub struct PunchRecord {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub in_time: String,
    pub out_time: String,
}

/// A validated punch with its computed duration
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftRecord {
    pub employee_code: String,
    pub punch_in: NaiveDateTime,
    pub punch_out: NaiveDateTime,
    pub hours: f64,
}

impl ShiftRecord {
    /// Shifts belong to the day they started on
    pub fn work_date(&self) -> NaiveDate {
        self.punch_in.date()
    }
}

/// Descriptive name for an employee code; never used for identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeName {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    pub employee_code: String,
    pub work_date: NaiveDate,
    pub hours: f64,
    pub first_in: NaiveDateTime,
    pub last_out: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyAggregate {
    pub employee_code: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub hours: f64,
    pub days_worked: usize,
}

/// Flagged entry: daily total above the daily limit.
///
/// `hours_worked` is rounded to 2 decimals after the comparison, so a total a few seconds over
/// the limit is reported as the limit itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcessHoursEntry {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub date: NaiveDate,
    pub hours_worked: f64,
}

/// Flagged entry: too little rest between two adjacent working days.
///
/// `rest_hours` is rounded after the comparison; rest a few seconds short of the minimum
/// reads as the minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestHoursEntry {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub date: NaiveDate,
    pub rest_hours: f64,
    pub previous_last_out: String,
    pub current_first_in: String,
}

/// Flagged entry: weekly total at or above the weekly limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyExcessEntry {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_hours: f64,
}

/// Flagged entry: more working days in one week than allowed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcessDaysEntry {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days_worked: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagCounts {
    pub excess_daily_hours: usize,
    pub low_rest_hours: usize,
    pub weekly_excess_hours: usize,
    pub excess_working_days: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub rows_received: usize,
    pub rows_ignored: usize,
    pub rows_after_filter: usize,
    pub employees: usize,
    pub flags: FlagCounts,
}

impl Summary {
    /// Counters in report order, as (metric, value)
    pub fn metrics(&self) -> [(&'static str, usize); 8] {
        [
            ("rows_received", self.rows_received),
            ("rows_ignored", self.rows_ignored),
            ("rows_after_filter", self.rows_after_filter),
            ("employees", self.employees),
            ("excess_daily_hours", self.flags.excess_daily_hours),
            ("low_rest_hours", self.flags.low_rest_hours),
            ("weekly_excess_hours", self.flags.weekly_excess_hours),
            ("excess_working_days", self.flags.excess_working_days),
        ]
    }
}

/// Outcome of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub flagged_excess_hours: Vec<ExcessHoursEntry>,
    pub flagged_low_rest_hours: Vec<RestHoursEntry>,
    pub flagged_weekly_excess: Vec<WeeklyExcessEntry>,
    pub flagged_excess_days: Vec<ExcessDaysEntry>,
    pub summary: Summary,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_past_end_of_short_row() {
        let table = RawTable::new(
            vec!["A".to_string(), "B".to_string()],
            vec![vec!["1".to_string()]],
        );
        assert_eq!(table.cell(0, 0), "1");
        assert_eq!(table.cell(0, 1), "");
        assert_eq!(table.cell(5, 0), "");
    }

    #[test]
    fn test_work_date_is_start_date() {
        let shift = ShiftRecord {
            employee_code: "E1".to_string(),
            punch_in: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(23, 0, 0)
                .unwrap(),
            punch_out: NaiveDate::from_ymd_opt(2025, 1, 2)
                .unwrap()
                .and_hms_opt(7, 0, 0)
                .unwrap(),
            hours: 8.0,
        };
        assert_eq!(shift.work_date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }
}
