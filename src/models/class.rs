use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, Entity, RecordId, require, text_or_number, unknown_field};
use crate::error::AppError;

/// A teaching group, e.g. `SI-401`. The semester is free text ("Ganjil").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "nama_kelas")]
    pub name: String,
    #[serde(rename = "tahun_ajaran")]
    pub academic_year: String,
    #[serde(deserialize_with = "text_or_number")]
    pub semester: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDraft {
    #[serde(rename = "nama_kelas")]
    pub name: String,
    #[serde(rename = "tahun_ajaran")]
    pub academic_year: String,
    pub semester: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassPreview {
    pub id: RecordId,
    #[serde(rename = "nama_kelas")]
    pub name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub semester: String,
}

impl ClassPreview {
    pub const COLUMNS: &'static str = "id, nama_kelas, semester";
}

impl Draft for ClassDraft {
    const FIELDS: &'static [&'static str] = &["nama_kelas", "tahun_ajaran", "semester"];

    fn validate(&self) -> Result<(), AppError> {
        require(&[&self.name, &self.academic_year, &self.semester])
    }

    fn set(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match field {
            "nama_kelas" => self.name = value.to_string(),
            "tahun_ajaran" => self.academic_year = value.to_string(),
            "semester" => self.semester = value.to_string(),
            other => return Err(unknown_field(other)),
        }
        Ok(())
    }
}

impl Entity for Class {
    type Draft = ClassDraft;

    const TABLE: &'static str = "Kelas";
    const NOUN: &'static str = "Class";
    const PLURAL: &'static str = "classes";
    const HEADERS: &'static [&'static str] = &["ID", "Class", "Academic year", "Semester"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> ClassDraft {
        ClassDraft {
            name: self.name.clone(),
            academic_year: self.academic_year.clone(),
            semester: self.semester.clone(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.academic_year.clone(),
            self.semester.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_semester_is_read_as_text() {
        let class: Class = serde_json::from_value(json!({
            "id": 4,
            "created_at": "2024-09-01T08:00:00Z",
            "nama_kelas": "TI-1A",
            "tahun_ajaran": "2024/2025",
            "semester": 1
        }))
        .expect("decode class");
        assert_eq!(class.semester, "1");
        assert_eq!(class.to_draft().semester, "1");

        let preview: ClassPreview =
            serde_json::from_value(json!({ "id": 4, "nama_kelas": "TI-1A", "semester": "Ganjil" }))
                .expect("decode preview");
        assert_eq!(preview.semester, "Ganjil");
    }
}
