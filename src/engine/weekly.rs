use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

use crate::models::{DailyAggregate, WeeklyAggregate};

/// Monday-to-Sunday bounds of the week containing `date`
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (start, start + Duration::days(6))
}

/// Group daily rows into calendar weeks per employee.
///
/// Weeks are calendar-absolute: a week straddling the filter window is kept whole, it
/// simply contains fewer daily rows.
pub fn aggregate_weekly(daily: &[DailyAggregate]) -> Vec<WeeklyAggregate> {
    let mut weeks: BTreeMap<(String, NaiveDate), WeeklyAggregate> = BTreeMap::new();

    for day in daily {
        let (week_start, week_end) = week_bounds(day.work_date);
        weeks
            .entry((day.employee_code.clone(), week_start))
            .and_modify(|week| {
                week.hours += day.hours;
                week.days_worked += 1;
            })
            .or_insert_with(|| WeeklyAggregate {
                employee_code: day.employee_code.clone(),
                week_start,
                week_end,
                hours: day.hours,
                days_worked: 1,
            });
    }

    weeks.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn day(code: &str, work_date: &str, hours: f64) -> DailyAggregate {
        let work_date = date(work_date);
        let first_in = work_date.and_hms_opt(6, 0, 0).unwrap();
        DailyAggregate {
            employee_code: code.to_string(),
            work_date,
            hours,
            first_in,
            last_out: first_in + Duration::minutes((hours * 60.0) as i64),
        }
    }

    #[test]
    fn test_week_bounds() {
        // 2025-01-06 is a Monday
        assert_eq!(week_bounds(date("2025-01-06")), (date("2025-01-06"), date("2025-01-12")));
        assert_eq!(week_bounds(date("2025-01-09")), (date("2025-01-06"), date("2025-01-12")));
        assert_eq!(week_bounds(date("2025-01-12")), (date("2025-01-06"), date("2025-01-12")));
        assert_eq!(week_bounds(date("2025-01-13")), (date("2025-01-13"), date("2025-01-19")));
    }

    #[test]
    fn test_week_across_year_end() {
        assert_eq!(week_bounds(date("2025-01-01")), (date("2024-12-30"), date("2025-01-05")));
    }

    #[test]
    fn test_five_long_days_in_one_week() {
        let daily: Vec<DailyAggregate> = ["2025-01-06", "2025-01-07", "2025-01-08", "2025-01-10", "2025-01-11"]
            .iter()
            .map(|d| day("E1", d, 13.0))
            .collect();
        let weekly = aggregate_weekly(&daily);
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].hours, 65.0);
        assert_eq!(weekly[0].days_worked, 5);
        assert_eq!(weekly[0].week_start, date("2025-01-06"));
        assert_eq!(weekly[0].week_end, date("2025-01-12"));
    }

    #[test]
    fn test_weeks_split_per_employee() {
        let weekly = aggregate_weekly(&[
            day("E1", "2025-01-12", 8.0),
            day("E1", "2025-01-13", 8.0),
            day("E2", "2025-01-12", 4.0),
        ]);
        let keys: Vec<(&str, NaiveDate, usize)> = weekly
            .iter()
            .map(|w| (w.employee_code.as_str(), w.week_start, w.days_worked))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("E1", date("2025-01-06"), 1),
                ("E1", date("2025-01-13"), 1),
                ("E2", date("2025-01-06"), 1),
            ]
        );
    }
}
