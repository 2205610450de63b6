use crate::FALLBACK_DATE_FORMAT;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateFormatError {
    #[error("date format is empty")]
    Empty,
    #[error("{0} is not valid date format.")]
    Invalid(String),
}

pub fn validate_date_format(pattern: &str) -> Result<(), DateFormatError> {
    if pattern.is_empty() {
        return Err(DateFormatError::Empty);
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(DateFormatError::Invalid(pattern.to_string()));
    }
    Ok(())
}

/// The pattern the run will actually use, plus the error that forced the
/// fallback when the configured one is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveDateFormat {
    pub pattern: String,
    pub rejected: Option<DateFormatError>,
}

impl EffectiveDateFormat {
    pub fn resolve(pattern: &str) -> Self {
        match validate_date_format(pattern) {
            Ok(()) => Self {
                pattern: pattern.to_string(),
                rejected: None,
            },
            Err(err) => Self {
                pattern: FALLBACK_DATE_FORMAT.to_string(),
                rejected: Some(err),
            },
        }
    }

    pub fn format(&self, timestamp: &DateTime<Local>) -> String {
        timestamp.format(&self.pattern).to_string()
    }
}
