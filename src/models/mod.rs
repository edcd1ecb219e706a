pub mod class;
pub mod course;
pub mod enrollment;
pub mod lecturer;
pub mod schedule;
pub mod student;

pub use class::{Class, ClassDraft, ClassPreview};
pub use course::{Course, CourseDraft, CoursePreview};
pub use enrollment::{Enrollment, EnrollmentDraft};
pub use lecturer::{Lecturer, LecturerDraft, LecturerPreview};
pub use schedule::{Schedule, ScheduleDraft};
pub use student::{SEMESTER_OPTIONS, Student, StudentDraft, StudentPreview};

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Surrogate key assigned by the backend.
pub type RecordId = i64;

/// In-progress form state for an entity: the record minus id and timestamp.
pub trait Draft: Clone + Default + Serialize + Send + Sync + fmt::Debug {
    /// Form field names accepted by [`Draft::set`], in display order.
    const FIELDS: &'static [&'static str];

    fn validate(&self) -> Result<(), AppError>;

    fn set(&mut self, field: &str, value: &str) -> Result<(), AppError>;
}

/// A flat record living in one remote table.
pub trait Entity: Clone + DeserializeOwned + Send + Sync + fmt::Debug + 'static {
    type Draft: Draft;

    const TABLE: &'static str;
    /// Column list passed to the gateway; may use nested-select syntax.
    const SELECT: &'static str = "*";
    const NOUN: &'static str;
    const PLURAL: &'static str;
    const HEADERS: &'static [&'static str];
    const DUPLICATE_MESSAGE: &'static str = "This record already exists.";

    fn id(&self) -> RecordId;

    fn to_draft(&self) -> Self::Draft;

    fn cells(&self) -> Vec<String>;

    /// Whether inserting `draft` would duplicate this record.
    fn conflicts_with(&self, _draft: &Self::Draft) -> bool {
        false
    }
}

pub(crate) fn require(fields: &[&str]) -> Result<(), AppError> {
    if fields.iter().any(|value| value.trim().is_empty()) {
        return Err(AppError::validation("All fields are required!"));
    }
    Ok(())
}

pub(crate) fn parse_id(field: &str, value: &str) -> Result<RecordId, AppError> {
    value
        .trim()
        .parse::<RecordId>()
        .map_err(|_| AppError::validation(format!("{} must be a numeric id", field)))
}

pub(crate) fn unknown_field(field: &str) -> AppError {
    AppError::validation(format!("Unknown field: {}", field))
}

/// Reads a column the backend may store either as text or as an integer.
pub(crate) fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
