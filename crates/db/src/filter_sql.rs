//! Translation of a validated [`QueryPlan`] into a parameterised SQL
//! `WHERE` / `ORDER BY` fragment.
//!
//! Only column names from the closed field enums are ever interpolated;
//! every literal goes through a bind parameter.

use conference_core::filter::{
    ConferenceField, FilterField, FilterValue, Operator, QueryPlan, SessionField, SortKey,
};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

/// Maps a filter field to its column.
pub trait FilterColumn: FilterField {
    fn column(self) -> &'static str;
}

impl FilterColumn for ConferenceField {
    fn column(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Topic => "topics",
            Self::Month => "month",
            Self::MaxAttendees => "max_attendees",
        }
    }
}

impl FilterColumn for SessionField {
    fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Speaker => "speaker",
            Self::Duration => "duration",
            Self::TypeOfSession => "type_of_session",
            Self::Date => "date",
            Self::StartTime => "start_time",
        }
    }
}

/// SQL pieces produced from a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFilter {
    pub conditions: Vec<String>,
    pub order_by: String,
    /// Values for the placeholders in `conditions`, in placeholder order.
    pub binds: Vec<FilterValue>,
}

impl SqlFilter {
    /// `WHERE a AND b`, or an empty string when there are no conditions.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }
}

/// Translate `plan`, numbering placeholders from `first_bind_idx`.
///
/// List columns compare element-wise: `value <op'> ANY(column)` where `op'`
/// is the mirrored operator, so `topics = 'Rust'` matches any conference
/// whose topics contain `Rust`.
pub fn translate<F: FilterColumn>(plan: &QueryPlan<F>, first_bind_idx: u32) -> SqlFilter {
    let mut conditions = Vec::with_capacity(plan.filters.len());
    let mut binds = Vec::with_capacity(plan.filters.len());
    let mut bind_idx = first_bind_idx;

    for filter in &plan.filters {
        let column = filter.field.column();
        let condition = if filter.field.is_list() {
            format!("${bind_idx} {} ANY({column})", mirror(filter.operator))
        } else {
            format!("{column} {} ${bind_idx}", filter.operator.symbol())
        };
        conditions.push(condition);
        binds.push(filter.value.clone());
        bind_idx += 1;
    }

    let order_by = plan
        .order
        .iter()
        .map(|key| match key {
            SortKey::Field(field) => field.column(),
            SortKey::Name => "name",
        })
        .collect::<Vec<_>>()
        .join(", ");

    SqlFilter {
        conditions,
        order_by,
        binds,
    }
}

/// Operator with its operands swapped.
fn mirror(operator: Operator) -> &'static str {
    match operator {
        Operator::Eq => "=",
        Operator::Ne => "!=",
        Operator::Gt => "<",
        Operator::Gte => "<=",
        Operator::Lt => ">",
        Operator::Lte => ">=",
    }
}

/// Bind filter values onto a query in order.
pub fn bind_values<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    values: &[FilterValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        query = match value {
            FilterValue::Text(text) => query.bind(text.clone()),
            FilterValue::Integer(n) => query.bind(*n),
            FilterValue::Date(date) => query.bind(*date),
            FilterValue::Time(time) => query.bind(*time),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use conference_core::filter::{build_plan, FilterSpec};
    use serde_json::json;

    fn plan<F: FilterField>(specs: &[(&str, &str, serde_json::Value)]) -> QueryPlan<F> {
        let specs: Vec<FilterSpec> = specs
            .iter()
            .map(|(f, o, v)| FilterSpec::new(*f, *o, v.clone()))
            .collect();
        build_plan(&specs).unwrap()
    }

    #[test]
    fn unfiltered_plan_orders_by_name() {
        let sql = translate(&QueryPlan::<ConferenceField>::unfiltered(), 1);

        assert_eq!(sql.where_clause(), "");
        assert_eq!(sql.order_by, "name");
        assert!(sql.binds.is_empty());
    }

    #[test]
    fn scalar_filters_use_numbered_placeholders() {
        let p = plan::<ConferenceField>(&[
            ("CITY", "EQ", json!("London")),
            ("MAX_ATTENDEES", "GT", json!(10)),
        ]);

        let sql = translate(&p, 1);

        assert_eq!(sql.where_clause(), "WHERE city = $1 AND max_attendees > $2");
        assert_eq!(sql.order_by, "max_attendees, name");
        assert_eq!(
            sql.binds,
            vec![FilterValue::Text("London".into()), FilterValue::Integer(10)]
        );
    }

    #[test]
    fn topic_filter_matches_list_membership() {
        let p = plan::<ConferenceField>(&[("TOPIC", "EQ", json!("Rust"))]);

        let sql = translate(&p, 1);

        assert_eq!(sql.conditions, vec!["$1 = ANY(topics)".to_string()]);
    }

    #[test]
    fn list_inequality_mirrors_the_operator() {
        let p = plan::<ConferenceField>(&[("TOPIC", "GT", json!("M"))]);

        let sql = translate(&p, 1);

        assert_eq!(sql.conditions, vec!["$1 < ANY(topics)".to_string()]);
        assert_eq!(sql.order_by, "topics, name");
    }

    #[test]
    fn placeholders_start_after_fixed_binds() {
        let p = plan::<SessionField>(&[
            ("TYPE_OF_SESSION", "NE", json!("Workshop")),
            ("SPEAKER", "EQ", json!("Ada")),
        ]);

        let sql = translate(&p, 2);

        assert_eq!(
            sql.conditions,
            vec![
                "type_of_session != $2".to_string(),
                "speaker = $3".to_string()
            ]
        );
        assert_eq!(sql.order_by, "type_of_session, name");
    }
}
