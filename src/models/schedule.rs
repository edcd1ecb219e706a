use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Class, Course, Draft, Entity, RecordId, parse_id, require, unknown_field};
use crate::error::AppError;

/// A course taught to a class in a given time slot (`module_class`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Schedule {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "kelas_id")]
    pub class_id: RecordId,
    #[serde(rename = "matakuliah_id")]
    pub course_id: RecordId,
    #[serde(rename = "jam")]
    pub slot: String,
    #[serde(rename = "Kelas", default)]
    pub class: Option<Class>,
    #[serde(rename = "Mata_Kuliah", default)]
    pub course: Option<Course>,
}

impl Schedule {
    /// Dropdown label, e.g. `Basis Data - SI-401 (credits: 3, slot: Mon 08:00)`.
    pub fn label(&self) -> String {
        let course = self.course.as_ref();
        format!(
            "{} - {} (credits: {}, slot: {})",
            course.map_or("N/A", |c| c.name.as_str()),
            self.class.as_ref().map_or("N/A", |c| c.name.as_str()),
            course.map_or_else(|| "-".to_string(), |c| c.credits.to_string()),
            self.slot,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    #[serde(rename = "kelas_id")]
    pub class_id: Option<RecordId>,
    #[serde(rename = "matakuliah_id")]
    pub course_id: Option<RecordId>,
    #[serde(rename = "jam")]
    pub slot: String,
}

impl Draft for ScheduleDraft {
    const FIELDS: &'static [&'static str] = &["kelas_id", "matakuliah_id", "jam"];

    fn validate(&self) -> Result<(), AppError> {
        if self.class_id.is_none() || self.course_id.is_none() {
            return Err(AppError::validation("Select a class and a course first!"));
        }
        require(&[&self.slot])
    }

    fn set(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match field {
            "kelas_id" => self.class_id = Some(parse_id(field, value)?),
            "matakuliah_id" => self.course_id = Some(parse_id(field, value)?),
            "jam" => self.slot = value.to_string(),
            other => return Err(unknown_field(other)),
        }
        Ok(())
    }
}

impl Entity for Schedule {
    type Draft = ScheduleDraft;

    const TABLE: &'static str = "module_class";
    const SELECT: &'static str = "id, created_at, kelas_id, matakuliah_id, jam, Kelas(*), Mata_Kuliah(*)";
    const NOUN: &'static str = "Schedule";
    const PLURAL: &'static str = "schedules";
    const HEADERS: &'static [&'static str] = &["ID", "Course", "Class", "Slot"];
    const DUPLICATE_MESSAGE: &'static str = "This course is already scheduled for that class.";

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> ScheduleDraft {
        ScheduleDraft {
            class_id: Some(self.class_id),
            course_id: Some(self.course_id),
            slot: self.slot.clone(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.course.as_ref().map_or_else(|| "N/A".to_string(), |c| c.name.clone()),
            self.class.as_ref().map_or_else(|| "N/A".to_string(), |c| c.name.clone()),
            self.slot.clone(),
        ]
    }

    fn conflicts_with(&self, draft: &ScheduleDraft) -> bool {
        draft.class_id == Some(self.class_id) && draft.course_id == Some(self.course_id)
    }
}
