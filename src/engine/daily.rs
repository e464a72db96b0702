use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::{DailyAggregate, ShiftRecord};

/// Collapse shifts into one row per (employee, work date), ordered by that key
pub fn aggregate_daily(shifts: &[ShiftRecord]) -> Vec<DailyAggregate> {
    let mut days: BTreeMap<(String, NaiveDate), DailyAggregate> = BTreeMap::new();

    for shift in shifts {
        let key = (shift.employee_code.clone(), shift.work_date());
        days.entry(key)
            .and_modify(|day| {
                day.hours += shift.hours;
                day.first_in = day.first_in.min(shift.punch_in);
                day.last_out = day.last_out.max(shift.punch_out);
            })
            .or_insert_with(|| DailyAggregate {
                employee_code: shift.employee_code.clone(),
                work_date: shift.work_date(),
                hours: shift.hours,
                first_in: shift.punch_in,
                last_out: shift.punch_out,
            });
    }

    days.into_values().collect()
}
