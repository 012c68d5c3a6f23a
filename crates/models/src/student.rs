use chrono::{Duration, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set, Unchanged};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Upper bound shared by every text column of the table.
pub const MAX_TEXT_LEN: usize = 100;

// Dot-separated non-empty labels on both sides, at least two in the domain.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@.]+(\.[^\s@.]+)*@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern compiles")
});

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub enrollment_date: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Column changes for an update; `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Changes {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
}

pub fn validate_text(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} should not be empty")));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ModelError::Validation(format!(
            "{field} must be shorter than or equal to {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(field: &str, value: &str) -> Result<(), ModelError> {
    validate_text(field, value)?;
    if !EMAIL_RE.is_match(value) {
        return Err(ModelError::Validation(format!("{field} must be an email")));
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD`, an RFC 3339 date-time, or a local ISO 8601
/// date-time without offset. Only the calendar date is kept.
pub fn parse_enrollment_date(field: &str, value: &str) -> Result<NaiveDate, ModelError> {
    let value = value.trim();
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.date())
        .map_err(|_| ModelError::Validation(format!("{field} must be a valid ISO 8601 date string")))
}

/// Current time at the precision the store keeps (microseconds).
pub fn now_timestamp() -> DateTimeWithTimeZone {
    Utc::now().trunc_subsecs(6).into()
}

/// Timestamp for an update of a row last touched at `previous`.
/// Always strictly later than `previous`, even under clock skew.
pub fn next_updated_at(previous: DateTimeWithTimeZone) -> DateTimeWithTimeZone {
    let now = now_timestamp();
    if now > previous {
        now
    } else {
        previous.trunc_subsecs(6) + Duration::microseconds(1)
    }
}

pub async fn create(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
    email: &str,
    enrollment_date: NaiveDate,
) -> Result<Model, ModelError> {
    validate_text("firstName", first_name)?;
    validate_text("lastName", last_name)?;
    validate_email("email", email)?;
    let now = now_timestamp();
    let am = ActiveModel {
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        email: Set(email.to_string()),
        enrollment_date: Set(enrollment_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// All rows, newest first; `id` breaks ties in the same direction.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await?)
}

/// Write `changes` onto the row `id` and bump `updated_at` past `previous_updated_at`.
/// Only the provided columns appear in the UPDATE statement.
pub async fn apply_changes(
    db: &DatabaseConnection,
    id: i32,
    previous_updated_at: DateTimeWithTimeZone,
    changes: Changes,
) -> Result<Model, ModelError> {
    let mut am = ActiveModel {
        id: Unchanged(id),
        updated_at: Set(next_updated_at(previous_updated_at)),
        ..Default::default()
    };
    if let Some(v) = changes.first_name {
        validate_text("firstName", &v)?;
        am.first_name = Set(v);
    }
    if let Some(v) = changes.last_name {
        validate_text("lastName", &v)?;
        am.last_name = Set(v);
    }
    if let Some(v) = changes.email {
        validate_email("email", &v)?;
        am.email = Set(v);
    }
    if let Some(v) = changes.enrollment_date {
        am.enrollment_date = Set(v);
    }
    Ok(am.update(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_rules() {
        assert!(validate_text("firstName", "Ada").is_ok());
        assert!(validate_text("firstName", "   ").is_err());
        assert!(validate_text("firstName", &"x".repeat(MAX_TEXT_LEN)).is_ok());
        let err = validate_text("firstName", &"x".repeat(MAX_TEXT_LEN + 1)).unwrap_err();
        assert_eq!(err.into_message(), "firstName must be shorter than or equal to 100 characters");
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("email", "ada@example.com").is_ok());
        assert!(validate_email("email", "ada.lovelace+x@mail.example.org").is_ok());
        let bad = [
            "ada",
            "ada@",
            "@example.com",
            "ada@example",
            "ada @example.com",
            "ada@example.",
            "a@b..c",
            "a@.example.com",
            "a.@example.com",
            ".a@example.com",
            "a..b@example.com",
        ];
        for bad in bad {
            assert!(validate_email("email", bad).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn enrollment_date_formats() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(parse_enrollment_date("enrollmentDate", "2024-01-01").unwrap(), d);
        assert_eq!(parse_enrollment_date("enrollmentDate", "2024-01-01T09:30:00Z").unwrap(), d);
        assert_eq!(parse_enrollment_date("enrollmentDate", "2024-01-01T09:30:00").unwrap(), d);
        assert_eq!(parse_enrollment_date("enrollmentDate", "2024-01-01T23:59:59.250").unwrap(), d);
        assert!(parse_enrollment_date("enrollmentDate", "2024-02-30").is_err());
        assert!(parse_enrollment_date("enrollmentDate", "01/01/2024").is_err());
        assert!(parse_enrollment_date("enrollmentDate", "").is_err());
    }

    #[test]
    fn updated_at_always_moves_forward() {
        let future = now_timestamp() + Duration::hours(1);
        let next = next_updated_at(future);
        assert_eq!(next - future, Duration::microseconds(1));

        let past = now_timestamp() - Duration::hours(1);
        assert!(next_updated_at(past) > past);
    }

    #[test]
    fn timestamps_are_microsecond_precise() {
        let ts = now_timestamp();
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000, 0);
    }
}
