//! Session entity model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use conference_core::conference::require_name;
use conference_core::datetime::{self, hhmm_option, parse_optional_date, parse_optional_time};
use conference_core::error::CoreError;
use conference_core::filter::FilterSpec;
use conference_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: DbId,
    pub conference_id: DbId,
    pub name: String,
    pub highlights: Option<String>,
    pub speaker: Option<String>,
    pub duration: Option<i32>,
    pub type_of_session: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(with = "hhmm_option")]
    pub start_time: Option<NaiveTime>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `createSession`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSession {
    #[serde(alias = "websafeConferenceKey")]
    pub conference_id: DbId,
    pub name: Option<String>,
    pub highlights: Option<String>,
    pub speaker: Option<String>,
    pub duration: Option<i32>,
    pub type_of_session: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
}

/// Validated session ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub conference_id: DbId,
    pub name: String,
    pub highlights: Option<String>,
    pub speaker: Option<String>,
    pub duration: Option<i32>,
    pub type_of_session: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
}

impl CreateSession {
    pub fn validate(self) -> Result<NewSession, CoreError> {
        let name = require_name("Session", self.name.as_deref())?;
        if matches!(self.duration, Some(d) if d < 0) {
            return Err(CoreError::BadRequest(
                "Session 'duration' must not be negative".into(),
            ));
        }

        Ok(NewSession {
            conference_id: self.conference_id,
            name,
            highlights: self.highlights,
            speaker: self.speaker.filter(|s| !s.trim().is_empty()),
            duration: self.duration,
            type_of_session: self.type_of_session,
            date: parse_optional_date(self.date.as_deref())?,
            start_time: parse_optional_time(self.start_time.as_deref())?,
        })
    }
}

/// Request body for `querySessionsKind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsByType {
    #[serde(alias = "websafeConferenceKey")]
    pub conference_id: DbId,
    pub type_of_session: String,
}

/// Request body for `querySessionsSpeaker`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionsBySpeaker {
    pub speaker: String,
}

/// Request body for `querySessionsDate`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionsByDate {
    pub date: String,
}

impl SessionsByDate {
    pub fn parse(&self) -> Result<NaiveDate, CoreError> {
        datetime::parse_date(&self.date)
    }
}

/// Request body for `querySessionsDuration`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionsByDuration {
    pub duration: i32,
}

/// Request body for `querySessionsTypeTime`: sessions not of this type that
/// start before this time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsByTypeTime {
    pub type_of_session: String,
    pub start_time: String,
}

impl SessionsByTypeTime {
    pub fn parse_start_time(&self) -> Result<NaiveTime, CoreError> {
        datetime::parse_time(&self.start_time)
    }
}

/// Request body for `querySessions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    /// Restrict to one conference when present.
    #[serde(default, alias = "websafeConferenceKey")]
    pub conference_id: Option<DbId>,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

/// Request body for the wishlist toggles.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    #[serde(alias = "websafeSessionKey")]
    pub session_id: DbId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn date_and_time_are_parsed() {
        let new = CreateSession {
            conference_id: 4,
            name: Some("Async deep dive".into()),
            date: Some("2026-06-01".into()),
            start_time: Some("09:30".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(new.date, NaiveDate::from_ymd_opt(2026, 6, 1));
        assert_eq!(new.start_time, NaiveTime::from_hms_opt(9, 30, 0));
    }

    #[test]
    fn bad_time_is_bad_request() {
        let result = CreateSession {
            conference_id: 4,
            name: Some("Late".into()),
            start_time: Some("25:99".into()),
            ..Default::default()
        }
        .validate();

        assert_matches!(result, Err(CoreError::BadRequest(_)));
    }

    #[test]
    fn websafe_key_alias_is_accepted() {
        let body: CreateSession =
            serde_json::from_str(r#"{"websafeConferenceKey": 9, "name": "Intro"}"#).unwrap();

        assert_eq!(body.conference_id, 9);
    }

    #[test]
    fn start_time_serializes_as_hours_and_minutes() {
        let session = Session {
            id: 1,
            conference_id: 2,
            name: "Intro".into(),
            highlights: None,
            speaker: Some("Ada".into()),
            duration: Some(30),
            type_of_session: Some("Talk".into()),
            date: NaiveDate::from_ymd_opt(2026, 6, 1),
            start_time: NaiveTime::from_hms_opt(14, 0, 0),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&session).unwrap();

        assert_eq!(json["startTime"], "14:00");
        assert_eq!(json["date"], "2026-06-01");
        assert_eq!(json["typeOfSession"], "Talk");
    }
}
