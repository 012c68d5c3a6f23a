use chrono::{DateTime, NaiveDate, Utc};
use models::student::{self as entity, parse_enrollment_date, validate_email, validate_text};
use serde::{Deserialize, Serialize};

use crate::errors::FieldError;

/// Stored student (business view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub enrollment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::Model> for Student {
    fn from(m: entity::Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            enrollment_date: m.enrollment_date,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

/// Create request as received. Fields are optional here so that a missing
/// field is reported as a field error instead of a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub enrollment_date: Option<String>,
}

/// Update request as received; absent and `null` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub enrollment_date: Option<String>,
}

/// Validated insert candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub enrollment_date: NaiveDate,
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
}

impl StudentPatch {
    /// Field names carried by the patch, for logging.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.first_name.is_some() { out.push("firstName"); }
        if self.last_name.is_some() { out.push("lastName"); }
        if self.email.is_some() { out.push("email"); }
        if self.enrollment_date.is_some() { out.push("enrollmentDate"); }
        out
    }
}

impl From<StudentPatch> for entity::Changes {
    fn from(p: StudentPatch) -> Self {
        Self {
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            enrollment_date: p.enrollment_date,
        }
    }
}

// Collects every failing field rather than stopping at the first.
#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn text(&mut self, field: &str, value: Option<String>, required: bool) -> Option<String> {
        self.check(field, value, required, |v| validate_text(field, &v).map(|_| v))
    }

    fn email(&mut self, field: &str, value: Option<String>, required: bool) -> Option<String> {
        self.check(field, value, required, |v| validate_email(field, &v).map(|_| v))
    }

    fn date(&mut self, field: &str, value: Option<String>, required: bool) -> Option<NaiveDate> {
        self.check(field, value, required, |v| parse_enrollment_date(field, &v))
    }

    fn check<T>(
        &mut self,
        field: &str,
        value: Option<String>,
        required: bool,
        rule: impl FnOnce(String) -> Result<T, models::errors::ModelError>,
    ) -> Option<T> {
        match value {
            None if required => {
                self.errors.push(FieldError::new(field, format!("{field} is required")));
                None
            }
            None => None,
            Some(v) => match rule(v) {
                Ok(t) => Some(t),
                Err(e) => {
                    self.errors.push(FieldError::new(field, e.into_message()));
                    None
                }
            },
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Vec<FieldError>> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        value().ok_or_else(Vec::new)
    }
}

impl CreateStudentInput {
    pub fn validate(self) -> Result<NewStudent, Vec<FieldError>> {
        let mut c = Checker::default();
        let first_name = c.text("firstName", self.first_name, true);
        let last_name = c.text("lastName", self.last_name, true);
        let email = c.email("email", self.email, true);
        let enrollment_date = c.date("enrollmentDate", self.enrollment_date, true);
        c.finish(|| {
            Some(NewStudent {
                first_name: first_name?,
                last_name: last_name?,
                email: email?,
                enrollment_date: enrollment_date?,
            })
        })
    }
}

impl UpdateStudentInput {
    pub fn validate(self) -> Result<StudentPatch, Vec<FieldError>> {
        let mut c = Checker::default();
        let first_name = c.text("firstName", self.first_name, false);
        let last_name = c.text("lastName", self.last_name, false);
        let email = c.email("email", self.email, false);
        let enrollment_date = c.date("enrollmentDate", self.enrollment_date, false);
        c.finish(|| Some(StudentPatch { first_name, last_name, email, enrollment_date }))
    }
}
