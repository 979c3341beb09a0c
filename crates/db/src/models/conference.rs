//! Conference entity model and DTOs.

use chrono::NaiveDate;
use conference_core::conference::{
    city_or_default, initial_seats, month_of, require_name, topics_or_default,
    validate_date_range, DEFAULT_MAX_ATTENDEES,
};
use conference_core::datetime::parse_optional_date;
use conference_core::error::CoreError;
use conference_core::filter::FilterSpec;
use conference_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `conferences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conference {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub organizer_user_id: String,
    pub topics: Vec<String>,
    pub city: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub month: i32,
    pub max_attendees: i32,
    pub seats_available: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A conference joined with its organizer's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceWithOrganizer {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub conference: Conference,
    pub organizer_display_name: String,
}

/// Request body for `createConference`, as sent by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConference {
    pub name: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub topics: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub max_attendees: Option<i32>,
}

/// Validated conference ready to insert, with defaults applied and derived
/// fields computed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConference {
    pub name: String,
    pub description: Option<String>,
    pub city: String,
    pub topics: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub month: i32,
    pub max_attendees: i32,
    pub seats_available: i32,
}

impl CreateConference {
    pub fn validate(self) -> Result<NewConference, CoreError> {
        let name = require_name("Conference", self.name.as_deref())?;
        let start_date = parse_optional_date(self.start_date.as_deref())?;
        let end_date = parse_optional_date(self.end_date.as_deref())?;
        validate_date_range(start_date, end_date)?;

        let max_attendees = self.max_attendees.unwrap_or(DEFAULT_MAX_ATTENDEES);
        if max_attendees < 0 {
            return Err(CoreError::BadRequest(
                "Conference 'maxAttendees' must not be negative".into(),
            ));
        }

        Ok(NewConference {
            name,
            description: self.description,
            city: city_or_default(self.city),
            topics: topics_or_default(self.topics),
            start_date,
            end_date,
            month: month_of(start_date),
            max_attendees,
            seats_available: initial_seats(max_attendees),
        })
    }
}

/// Request body for `queryConferences`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConferenceQuery {
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}
