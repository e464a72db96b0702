use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{
    DailyAggregate, EmployeeName, ExcessDaysEntry, ExcessHoursEntry, RestHoursEntry,
    WeeklyAggregate, WeeklyExcessEntry,
};

/// Rule limits. Daily and day-count limits are exclusive, the weekly limit is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_max_daily_hours")]
    pub max_daily_hours: f64,
    #[serde(default = "default_min_rest_hours")]
    pub min_rest_hours: f64,
    #[serde(default = "default_max_weekly_hours")]
    pub max_weekly_hours: f64,
    #[serde(default = "default_max_days_per_week")]
    pub max_days_per_week: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_daily_hours: default_max_daily_hours(),
            min_rest_hours: default_min_rest_hours(),
            max_weekly_hours: default_max_weekly_hours(),
            max_days_per_week: default_max_days_per_week(),
        }
    }
}

fn default_max_daily_hours() -> f64 {
    12.0
}

fn default_min_rest_hours() -> f64 {
    10.0
}

fn default_max_weekly_hours() -> f64 {
    60.0
}

fn default_max_days_per_week() -> usize {
    6
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn format_instant(instant: NaiveDateTime) -> String {
    instant.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Applies the four rules to aggregated hours, attaching display names by employee code
pub struct Evaluator<'a> {
    thresholds: &'a Thresholds,
    names: &'a BTreeMap<String, EmployeeName>,
}

impl<'a> Evaluator<'a> {
    pub fn new(thresholds: &'a Thresholds, names: &'a BTreeMap<String, EmployeeName>) -> Self {
        Self { thresholds, names }
    }

    fn name(&self, code: &str) -> (String, String) {
        self.names
            .get(code)
            .map(|n| (n.first_name.clone(), n.last_name.clone()))
            .unwrap_or_default()
    }

    pub fn excess_daily_hours(&self, daily: &[DailyAggregate]) -> Vec<ExcessHoursEntry> {
        let mut flagged: Vec<ExcessHoursEntry> = daily
            .iter()
            .filter(|d| d.hours > self.thresholds.max_daily_hours)
            .map(|d| {
                let (first_name, last_name) = self.name(&d.employee_code);
                ExcessHoursEntry {
                    employee_code: d.employee_code.clone(),
                    first_name,
                    last_name,
                    date: d.work_date,
                    hours_worked: round2(d.hours),
                }
            })
            .collect();

        flagged.sort_by(|a, b| (&a.employee_code, a.date).cmp(&(&b.employee_code, b.date)));
        flagged
    }

    /// Rest is measured between neighbours in each employee's first-in order. Days removed by
    /// the filter are not bridged, and negative rest (overlapping punches) is never flagged.
    pub fn low_rest_hours(&self, daily: &[DailyAggregate]) -> Vec<RestHoursEntry> {
        let mut by_employee: BTreeMap<&str, Vec<&DailyAggregate>> = BTreeMap::new();
        for day in daily {
            by_employee.entry(&day.employee_code).or_default().push(day);
        }

        let mut flagged = Vec::new();
        for (code, mut days) in by_employee {
            days.sort_by_key(|d| d.first_in);

            for pair in days.windows(2) {
                let (previous, current) = (pair[0], pair[1]);
                let rest = (current.first_in - previous.last_out).num_seconds() as f64 / 3600.0;

                if rest >= 0.0 && rest < self.thresholds.min_rest_hours {
                    let (first_name, last_name) = self.name(code);
                    flagged.push(RestHoursEntry {
                        employee_code: code.to_string(),
                        first_name,
                        last_name,
                        date: current.work_date,
                        rest_hours: round2(rest),
                        previous_last_out: format_instant(previous.last_out),
                        current_first_in: format_instant(current.first_in),
                    });
                }
            }
        }

        flagged.sort_by(|a, b| (&a.employee_code, a.date).cmp(&(&b.employee_code, b.date)));
        flagged
    }

    pub fn weekly_excess_hours(&self, weekly: &[WeeklyAggregate]) -> Vec<WeeklyExcessEntry> {
        let mut flagged: Vec<WeeklyExcessEntry> = weekly
            .iter()
            .filter(|w| w.hours >= self.thresholds.max_weekly_hours)
            .map(|w| {
                let (first_name, last_name) = self.name(&w.employee_code);
                WeeklyExcessEntry {
                    employee_code: w.employee_code.clone(),
                    first_name,
                    last_name,
                    week_start: w.week_start,
                    week_end: w.week_end,
                    total_hours: round2(w.hours),
                }
            })
            .collect();

        flagged.sort_by(|a, b| {
            (&a.employee_code, a.week_start).cmp(&(&b.employee_code, b.week_start))
        });
        flagged
    }

    pub fn excess_working_days(&self, weekly: &[WeeklyAggregate]) -> Vec<ExcessDaysEntry> {
        let mut flagged: Vec<ExcessDaysEntry> = weekly
            .iter()
            .filter(|w| w.days_worked > self.thresholds.max_days_per_week)
            .map(|w| {
                let (first_name, last_name) = self.name(&w.employee_code);
                ExcessDaysEntry {
                    employee_code: w.employee_code.clone(),
                    first_name,
                    last_name,
                    week_start: w.week_start,
                    week_end: w.week_end,
                    days_worked: w.days_worked,
                }
            })
            .collect();

        flagged.sort_by(|a, b| {
            (&a.employee_code, a.week_start).cmp(&(&b.employee_code, b.week_start))
        });
        flagged
    }
}
