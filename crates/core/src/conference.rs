//! Creation defaults and derived fields for conferences and sessions.

use chrono::{Datelike, NaiveDate};

use crate::error::CoreError;

pub const DEFAULT_CITY: &str = "Default City";
pub const DEFAULT_TOPICS: &[&str] = &["Default", "Topic"];
pub const DEFAULT_MAX_ATTENDEES: i32 = 0;

/// Require a non-blank `name`, returning it trimmed.
pub fn require_name(entity: &str, name: Option<&str>) -> Result<String, CoreError> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(CoreError::BadRequest(format!("{entity} 'name' field required"))),
    }
}

/// City, falling back to [`DEFAULT_CITY`] when absent or blank.
pub fn city_or_default(city: Option<String>) -> String {
    city.filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CITY.to_string())
}

/// Topics, falling back to [`DEFAULT_TOPICS`] when absent or empty.
pub fn topics_or_default(topics: Option<Vec<String>>) -> Vec<String> {
    match topics {
        Some(topics) if !topics.is_empty() => topics,
        _ => DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
    }
}

/// Month number (1-12) of the start date, or 0 when there is none.
pub fn month_of(start_date: Option<NaiveDate>) -> i32 {
    start_date.map_or(0, |d| d.month() as i32)
}

/// A new conference starts with every seat available.
pub fn initial_seats(max_attendees: i32) -> i32 {
    max_attendees.max(0)
}

pub fn validate_date_range(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            return Err(CoreError::BadRequest(
                "Conference 'endDate' must not precede 'startDate'".into(),
            ));
        }
    }
    Ok(())
}
