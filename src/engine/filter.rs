use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::engine::punch::{parse_date, parse_datetime};
use crate::error::AnalysisError;
use crate::models::ShiftRecord;

/// Inclusive date window plus holiday exclusions, applied to work dates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub holidays: BTreeSet<NaiveDate>,
}

impl DateFilter {
    /// Build a filter from user-supplied strings. Blank values mean "no bound".
    pub fn parse(
        start_date: Option<&str>,
        end_date: Option<&str>,
        holidays: &[String],
    ) -> Result<Self, AnalysisError> {
        let start = parse_bound(start_date, "start_date")?;
        let end = parse_bound(end_date, "end_date")?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AnalysisError::InvalidRange {
                    start: s.to_string(),
                    end: e.to_string(),
                });
            }
        }

        let mut holiday_set = BTreeSet::new();
        for raw in holidays {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            holiday_set.insert(calendar_date(raw).ok_or_else(|| AnalysisError::InvalidDate {
                field: "holiday date".to_string(),
                value: raw.to_string(),
            })?);
        }

        Ok(Self {
            start,
            end,
            holidays: holiday_set,
        })
    }

    pub fn accepts(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s)
            && self.end.map_or(true, |e| date <= e)
            && !self.holidays.contains(&date)
    }

    /// Keep shifts whose work date passes the filter; an empty result is an error
    pub fn apply(&self, shifts: Vec<ShiftRecord>) -> Result<Vec<ShiftRecord>, AnalysisError> {
        let kept: Vec<ShiftRecord> = shifts
            .into_iter()
            .filter(|s| self.accepts(s.work_date()))
            .collect();

        if kept.is_empty() {
            return Err(AnalysisError::no_valid_data(
                "no rows remain after applying date range and holiday exclusions",
            ));
        }
        Ok(kept)
    }
}

fn calendar_date(value: &str) -> Option<NaiveDate> {
    parse_date(value).or_else(|| parse_datetime(value).map(|dt| dt.date()))
}

fn parse_bound(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, AnalysisError> {
    let value = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return Ok(None),
    };

    calendar_date(value)
        .map(Some)
        .ok_or_else(|| AnalysisError::InvalidDate {
            field: field.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn shift(code: &str, punch_in: &str) -> ShiftRecord {
        let punch_in = NaiveDateTime::parse_from_str(punch_in, "%Y-%m-%d %H:%M").unwrap();
        ShiftRecord {
            employee_code: code.to_string(),
            punch_in,
            punch_out: punch_in + chrono::Duration::hours(8),
            hours: 8.0,
        }
    }

    #[test]
    fn test_blank_bounds_are_open() {
        let filter = DateFilter::parse(Some(" "), None, &[]).unwrap();
        assert_eq!(filter, DateFilter::default());
        assert!(filter.accepts(date("1999-01-01")));
    }

    #[test]
    fn test_start_after_end_is_invalid_range() {
        let err = DateFilter::parse(Some("2025-02-01"), Some("2025-01-01"), &[]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InvalidRange {
                start: "2025-02-01".to_string(),
                end: "2025-01-01".to_string(),
            }
        );
    }

    #[test]
    fn test_unparseable_values_name_the_offender() {
        let err = DateFilter::parse(Some("yesterday"), None, &[]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InvalidDate {
                field: "start_date".to_string(),
                value: "yesterday".to_string(),
            }
        );

        let holidays = vec!["2025-12-25".to_string(), "Dec 26".to_string()];
        let err = DateFilter::parse(None, None, &holidays).unwrap_err();
        assert!(err.to_string().contains("'Dec 26'"));
    }

    #[test]
    fn test_bounds_are_inclusive_and_holidays_excluded() {
        let holidays = vec!["2025-01-03".to_string(), "".to_string()];
        let filter =
            DateFilter::parse(Some("2025-01-02"), Some("2025-01-04 00:00"), &holidays).unwrap();

        let kept = filter
            .apply(vec![
                shift("E1", "2025-01-01 08:00"),
                shift("E1", "2025-01-02 08:00"),
                shift("E1", "2025-01-03 08:00"),
                shift("E1", "2025-01-04 23:00"),
                shift("E1", "2025-01-05 08:00"),
            ])
            .unwrap();

        let dates: Vec<NaiveDate> = kept.iter().map(|s| s.work_date()).collect();
        assert_eq!(dates, vec![date("2025-01-02"), date("2025-01-04")]);
    }

    #[test]
    fn test_empty_after_filter() {
        let filter = DateFilter::parse(Some("2026-01-01"), None, &[]).unwrap();
        let err = filter.apply(vec![shift("E1", "2025-01-01 08:00")]).unwrap_err();
        assert!(matches!(err, AnalysisError::NoValidData { .. }));
    }
}
