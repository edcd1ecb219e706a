use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, Entity, RecordId, parse_id, unknown_field};
use crate::error::AppError;

/// A student's registration for a course (`mahasiswa_module`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Enrollment {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "mahasiswa_id")]
    pub student_id: RecordId,
    #[serde(rename = "matakuliah_id")]
    pub course_id: RecordId,
    #[serde(rename = "Mahasiswa", default)]
    pub student: Option<EnrolledStudent>,
    #[serde(rename = "Mata_Kuliah", default)]
    pub course: Option<EnrolledCourse>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnrolledStudent {
    #[serde(rename = "nama_lengkap")]
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnrolledCourse {
    #[serde(rename = "nama_mk")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentDraft {
    #[serde(rename = "mahasiswa_id")]
    pub student_id: Option<RecordId>,
    #[serde(rename = "matakuliah_id")]
    pub course_id: Option<RecordId>,
}

impl Draft for EnrollmentDraft {
    const FIELDS: &'static [&'static str] = &["mahasiswa_id", "matakuliah_id"];

    fn validate(&self) -> Result<(), AppError> {
        if self.student_id.is_none() || self.course_id.is_none() {
            return Err(AppError::validation("Select a student and a schedule first!"));
        }
        Ok(())
    }

    fn set(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match field {
            "mahasiswa_id" => self.student_id = Some(parse_id(field, value)?),
            "matakuliah_id" => self.course_id = Some(parse_id(field, value)?),
            other => return Err(unknown_field(other)),
        }
        Ok(())
    }
}

impl Entity for Enrollment {
    type Draft = EnrollmentDraft;

    const TABLE: &'static str = "mahasiswa_module";
    const SELECT: &'static str =
        "id, created_at, mahasiswa_id, matakuliah_id, Mahasiswa(nama_lengkap), Mata_Kuliah(nama_mk)";
    const NOUN: &'static str = "Enrollment";
    const PLURAL: &'static str = "enrollments";
    const HEADERS: &'static [&'static str] = &["ID", "Student", "Course"];
    const DUPLICATE_MESSAGE: &'static str = "This student is already enrolled in that course.";

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> EnrollmentDraft {
        EnrollmentDraft {
            student_id: Some(self.student_id),
            course_id: Some(self.course_id),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.student.as_ref().map_or_else(|| "N/A".to_string(), |s| s.full_name.clone()),
            self.course.as_ref().map_or_else(|| "N/A".to_string(), |c| c.name.clone()),
        ]
    }

    // Keys, not display names: two students may share a name.
    fn conflicts_with(&self, draft: &EnrollmentDraft) -> bool {
        draft.student_id == Some(self.student_id) && draft.course_id == Some(self.course_id)
    }
}
