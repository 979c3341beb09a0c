//! Wire formats for calendar dates (`YYYY-MM-DD`) and times of day (`HH:MM`).
//!
//! Conference dates may arrive as full ISO-8601 timestamps; only the leading
//! date portion is significant.

use chrono::{NaiveDate, NaiveTime};

use crate::error::CoreError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse a `YYYY-MM-DD` date, ignoring anything after the tenth character.
pub fn parse_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let trimmed = raw.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, DATE_FORMAT)
        .map_err(|_| CoreError::BadRequest(format!("Invalid date '{raw}', expected YYYY-MM-DD")))
}

/// Parse an `HH:MM` time of day.
pub fn parse_time(raw: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
        .map_err(|_| CoreError::BadRequest(format!("Invalid time '{raw}', expected HH:MM")))
}

/// Parse an optional date field, treating blank strings as absent.
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some),
    }
}

/// Parse an optional time field, treating blank strings as absent.
pub fn parse_optional_time(raw: Option<&str>) -> Result<Option<NaiveTime>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_time(value).map(Some),
    }
}

/// Serde adapter rendering `Option<NaiveTime>` as `"HH:MM"`.
pub mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_str(&time.format(TIME_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(value) => NaiveTime::parse_from_str(&value, TIME_FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M:%S"))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
