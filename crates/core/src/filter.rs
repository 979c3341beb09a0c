//! Caller-supplied query filters and the plan builder that validates them.
//!
//! Callers send `(field, operator, value)` triples as loose strings. They are
//! parsed here into closed enumerations so the persistence layer only ever
//! sees fields and operators it knows how to translate. The backing store
//! allows a single inequality-filtered field per query, and that field must
//! lead the sort order; [`build_plan`] enforces both rules.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::datetime;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// Unknown field or operator token, or a value that cannot be coerced.
    #[error("Filter contains invalid field or operator: {0}")]
    InvalidFilter(String),

    /// A second inequality targets a different field than the first one.
    #[error("Inequality filter is allowed on only one field (got '{first}' and '{second}')")]
    MultipleInequalityFields {
        first: &'static str,
        second: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Comparison operators accepted in a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Ne,
}

impl Operator {
    /// Accepts both the wire name (`GTEQ`) and the symbol (`>=`).
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "EQ" | "=" => Some(Self::Eq),
            "GT" | ">" => Some(Self::Gt),
            "GTEQ" | ">=" => Some(Self::Gte),
            "LT" | "<" => Some(Self::Lt),
            "LTEQ" | "<=" => Some(Self::Lte),
            "NE" | "!=" => Some(Self::Ne),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Ne => "!=",
        }
    }

    /// Every operator except equality counts as an inequality.
    pub fn is_inequality(self) -> bool {
        self != Self::Eq
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// How a field's literal must be coerced before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    Date,
    Time,
}

/// A literal after coercion to the field's [`ValueKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl FilterValue {
    fn coerce(kind: ValueKind, raw: &serde_json::Value, field: &str) -> Result<Self, FilterError> {
        let invalid = |expected: &str| {
            FilterError::InvalidFilter(format!("value {raw} for '{field}' is not {expected}"))
        };

        match kind {
            ValueKind::Integer => match raw {
                serde_json::Value::Number(n) => n
                    .as_i64()
                    .or_else(|| whole_number(n.as_f64()?))
                    .map(Self::Integer),
                serde_json::Value::String(s) => s.trim().parse().ok().map(Self::Integer),
                _ => None,
            }
            .ok_or_else(|| invalid("an integer")),
            ValueKind::Text => match raw {
                serde_json::Value::String(s) => Ok(Self::Text(s.clone())),
                serde_json::Value::Number(n) => Ok(Self::Text(n.to_string())),
                _ => Err(invalid("a string")),
            },
            ValueKind::Date => raw
                .as_str()
                .and_then(|s| datetime::parse_date(s).ok())
                .map(Self::Date)
                .ok_or_else(|| invalid("a YYYY-MM-DD date")),
            ValueKind::Time => raw
                .as_str()
                .and_then(|s| datetime::parse_time(s).ok())
                .map(Self::Time)
                .ok_or_else(|| invalid("an HH:MM time")),
        }
    }
}

/// `6.0` counts as an integer; `6.5` does not.
fn whole_number(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// A filterable field of one entity type.
pub trait FilterField: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Parse a caller token (wire name such as `MAX_ATTENDEES`, or the
    /// logical name such as `maxAttendees`).
    fn parse(token: &str) -> Option<Self>;

    /// Logical (camelCase) field name.
    fn name(self) -> &'static str;

    fn kind(self) -> ValueKind;

    /// Whether the field holds a list; equality then means membership.
    fn is_list(self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConferenceField {
    City,
    Topic,
    Month,
    MaxAttendees,
}

impl FilterField for ConferenceField {
    fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "CITY" | "city" => Some(Self::City),
            "TOPIC" | "topics" => Some(Self::Topic),
            "MONTH" | "month" => Some(Self::Month),
            "MAX_ATTENDEES" | "maxAttendees" => Some(Self::MaxAttendees),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Topic => "topics",
            Self::Month => "month",
            Self::MaxAttendees => "maxAttendees",
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            Self::City | Self::Topic => ValueKind::Text,
            Self::Month | Self::MaxAttendees => ValueKind::Integer,
        }
    }

    fn is_list(self) -> bool {
        self == Self::Topic
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionField {
    Name,
    Speaker,
    Duration,
    TypeOfSession,
    Date,
    StartTime,
}

impl FilterField for SessionField {
    fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "NAME" | "name" => Some(Self::Name),
            "SPEAKER" | "speaker" => Some(Self::Speaker),
            "DURATION" | "duration" => Some(Self::Duration),
            "TYPE_OF_SESSION" | "typeOfSession" => Some(Self::TypeOfSession),
            "DATE" | "date" => Some(Self::Date),
            "START_TIME" | "startTime" => Some(Self::StartTime),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Speaker => "speaker",
            Self::Duration => "duration",
            Self::TypeOfSession => "typeOfSession",
            Self::Date => "date",
            Self::StartTime => "startTime",
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            Self::Name | Self::Speaker | Self::TypeOfSession => ValueKind::Text,
            Self::Duration => ValueKind::Integer,
            Self::Date => ValueKind::Date,
            Self::StartTime => ValueKind::Time,
        }
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// A filter triple exactly as the caller sent it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSpec {
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl FilterSpec {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// A validated, coerced filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter<F> {
    pub field: F,
    pub operator: Operator,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey<F> {
    Field(F),
    /// The entity's `name`, always the final tie-break.
    Name,
}

/// Output of [`build_plan`]: filters in input order plus the sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan<F> {
    pub filters: Vec<Filter<F>>,
    pub inequality_field: Option<F>,
    pub order: Vec<SortKey<F>>,
}

impl<F: FilterField> QueryPlan<F> {
    /// A plan with no filters, ordered by name.
    pub fn unfiltered() -> Self {
        Self {
            filters: Vec::new(),
            inequality_field: None,
            order: vec![SortKey::Name],
        }
    }
}

/// Validate and coerce `specs` into a [`QueryPlan`].
///
/// Fails on the first invalid token or value, or on a second inequality
/// field; nothing is partially applied.
pub fn build_plan<F: FilterField>(specs: &[FilterSpec]) -> Result<QueryPlan<F>, FilterError> {
    let mut filters = Vec::with_capacity(specs.len());
    let mut inequality_field: Option<F> = None;

    for spec in specs {
        let field = F::parse(&spec.field)
            .ok_or_else(|| FilterError::InvalidFilter(format!("unknown field '{}'", spec.field)))?;
        let operator = Operator::parse(&spec.operator).ok_or_else(|| {
            FilterError::InvalidFilter(format!("unknown operator '{}'", spec.operator))
        })?;

        if operator.is_inequality() {
            match inequality_field {
                Some(existing) if existing != field => {
                    return Err(FilterError::MultipleInequalityFields {
                        first: existing.name(),
                        second: field.name(),
                    });
                }
                _ => inequality_field = Some(field),
            }
        }

        let value = FilterValue::coerce(field.kind(), &spec.value, field.name())?;
        filters.push(Filter {
            field,
            operator,
            value,
        });
    }

    let order = match inequality_field {
        Some(field) => vec![SortKey::Field(field), SortKey::Name],
        None => vec![SortKey::Name],
    };

    Ok(QueryPlan {
        filters,
        inequality_field,
        order,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn spec(field: &str, operator: &str, value: serde_json::Value) -> FilterSpec {
        FilterSpec::new(field, operator, value)
    }

    #[test]
    fn equality_only_sorts_by_name() {
        let plan = build_plan::<ConferenceField>(&[
            spec("CITY", "EQ", json!("London")),
            spec("TOPIC", "EQ", json!("Medical Innovations")),
        ])
        .unwrap();

        assert_eq!(plan.inequality_field, None);
        assert_eq!(plan.order, vec![SortKey::Name]);
        assert_eq!(plan.filters.len(), 2);
    }

    #[test]
    fn inequality_field_leads_sort_order() {
        let plan = build_plan::<ConferenceField>(&[
            spec("CITY", "EQ", json!("London")),
            spec("MAX_ATTENDEES", "GT", json!("10")),
        ])
        .unwrap();

        assert_eq!(plan.inequality_field, Some(ConferenceField::MaxAttendees));
        assert_eq!(
            plan.order,
            vec![SortKey::Field(ConferenceField::MaxAttendees), SortKey::Name]
        );
    }

    #[test]
    fn range_on_a_single_field_is_allowed() {
        let plan = build_plan::<ConferenceField>(&[
            spec("MONTH", "GTEQ", json!(3)),
            spec("MONTH", "LT", json!(7)),
        ])
        .unwrap();

        assert_eq!(plan.inequality_field, Some(ConferenceField::Month));
    }

    #[test]
    fn two_inequality_fields_are_rejected_in_either_order() {
        let forward = build_plan::<ConferenceField>(&[
            spec("MONTH", "GT", json!(3)),
            spec("MAX_ATTENDEES", "LT", json!(100)),
        ]);
        let backward = build_plan::<ConferenceField>(&[
            spec("MAX_ATTENDEES", "LT", json!(100)),
            spec("MONTH", "GT", json!(3)),
        ]);

        assert_matches!(forward, Err(FilterError::MultipleInequalityFields { .. }));
        assert_matches!(backward, Err(FilterError::MultipleInequalityFields { .. }));
    }

    #[test]
    fn equality_between_inequalities_does_not_reset_tracking() {
        let result = build_plan::<ConferenceField>(&[
            spec("MONTH", "NE", json!(1)),
            spec("CITY", "EQ", json!("Paris")),
            spec("CITY", "NE", json!("Rome")),
        ]);

        assert_eq!(
            result.unwrap_err(),
            FilterError::MultipleInequalityFields {
                first: "month",
                second: "city",
            }
        );
    }

    #[test]
    fn unknown_field_rejects_whole_batch() {
        let result = build_plan::<ConferenceField>(&[
            spec("CITY", "EQ", json!("London")),
            spec("COUNTRY", "EQ", json!("UK")),
        ]);

        assert_matches!(result, Err(FilterError::InvalidFilter(_)));
    }

    #[test]
    fn unknown_operator_rejects_whole_batch() {
        let result = build_plan::<ConferenceField>(&[
            spec("CITY", "LIKE", json!("Lon%")),
            spec("MONTH", "EQ", json!(6)),
        ]);

        assert_matches!(result, Err(FilterError::InvalidFilter(_)));
    }

    #[test]
    fn session_field_is_not_a_conference_field() {
        let result = build_plan::<ConferenceField>(&[spec("SPEAKER", "EQ", json!("Ada"))]);

        assert_matches!(result, Err(FilterError::InvalidFilter(_)));
    }

    #[test]
    fn numeric_fields_are_coerced_to_integers() {
        let plan = build_plan::<ConferenceField>(&[spec("MONTH", "EQ", json!(" 6 "))]).unwrap();

        assert_eq!(plan.filters[0].value, FilterValue::Integer(6));
    }

    #[test]
    fn whole_float_literal_is_an_integer() {
        let plan = build_plan::<ConferenceField>(&[spec("MAX_ATTENDEES", "GT", json!(6.0))]).unwrap();
        assert_eq!(plan.filters[0].value, FilterValue::Integer(6));

        let result = build_plan::<ConferenceField>(&[spec("MAX_ATTENDEES", "GT", json!(6.5))]);
        assert_matches!(result, Err(FilterError::InvalidFilter(_)));
    }

    #[test]
    fn non_numeric_literal_for_numeric_field_is_invalid() {
        let result = build_plan::<SessionField>(&[spec("DURATION", "GT", json!("long"))]);

        assert_matches!(result, Err(FilterError::InvalidFilter(_)));
    }

    #[test]
    fn text_fields_keep_their_literal() {
        let plan = build_plan::<ConferenceField>(&[spec("CITY", "=", json!("Tokyo"))]).unwrap();

        assert_eq!(plan.filters[0].operator, Operator::Eq);
        assert_eq!(plan.filters[0].value, FilterValue::Text("Tokyo".to_string()));
    }

    #[test]
    fn symbols_and_names_are_equivalent_operators() {
        for (name, symbol) in [
            ("EQ", "="),
            ("GT", ">"),
            ("GTEQ", ">="),
            ("LT", "<"),
            ("LTEQ", "<="),
            ("NE", "!="),
        ] {
            assert_eq!(Operator::parse(name), Operator::parse(symbol));
            assert!(Operator::parse(name).is_some());
        }
    }

    #[test]
    fn session_date_and_time_are_parsed() {
        let plan = build_plan::<SessionField>(&[
            spec("DATE", "EQ", json!("2026-06-01")),
            spec("START_TIME", "LT", json!("19:00")),
        ])
        .unwrap();

        assert_eq!(
            plan.filters[0].value,
            FilterValue::Date(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap())
        );
        assert_eq!(
            plan.filters[1].value,
            FilterValue::Time(NaiveTime::from_hms_opt(19, 0, 0).unwrap())
        );
        assert_eq!(
            plan.order,
            vec![SortKey::Field(SessionField::StartTime), SortKey::Name]
        );
    }

    #[test]
    fn empty_batch_yields_unfiltered_plan() {
        let plan = build_plan::<SessionField>(&[]).unwrap();

        assert_eq!(plan, QueryPlan::unfiltered());
    }

    #[test]
    fn filter_error_becomes_bad_request() {
        let err: crate::error::CoreError = FilterError::InvalidFilter("x".into()).into();

        assert_matches!(err, crate::error::CoreError::BadRequest(_));
    }
}
