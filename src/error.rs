use thiserror::Error;

/// Input problems a reviewer can fix by correcting the upload or the request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(
        "Missing required column(s): {}. Found headers: {}",
        .missing.join(", "),
        .found.join(", ")
    )]
    Schema {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Invalid {field}: '{value}'. Use YYYY-MM-DD, e.g. 2025-12-25")]
    InvalidDate { field: String, value: String },

    #[error("start_date ({start}) must be earlier than or equal to end_date ({end})")]
    InvalidRange { start: String, end: String },

    #[error("No valid data: {reason}")]
    NoValidData { reason: String },
}

impl AnalysisError {
    pub fn no_valid_data(reason: impl Into<String>) -> Self {
        AnalysisError::NoValidData {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_missing_and_found() {
        let err = AnalysisError::Schema {
            missing: vec!["EECode".to_string(), "OutPunchTime".to_string()],
            found: vec!["Name".to_string(), "In".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("EECode, OutPunchTime"));
        assert!(msg.contains("Found headers: Name, In"));
    }

    #[test]
    fn test_invalid_date_names_value() {
        let err = AnalysisError::InvalidDate {
            field: "holiday date".to_string(),
            value: "2025-13-40".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid holiday date: '2025-13-40'. Use YYYY-MM-DD, e.g. 2025-12-25"
        );
    }
}
