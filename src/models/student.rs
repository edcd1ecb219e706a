use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, Entity, RecordId, require, unknown_field};
use crate::error::AppError;

pub const SEMESTER_OPTIONS: [&str; 8] = ["1", "2", "3", "4", "5", "6", "7", "8"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub nim: String,
    #[serde(rename = "nama_lengkap")]
    pub full_name: String,
    #[serde(rename = "jurusan")]
    pub major: String,
    pub semester: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub nim: String,
    #[serde(rename = "nama_lengkap")]
    pub full_name: String,
    #[serde(rename = "jurusan")]
    pub major: String,
    pub semester: String,
}

/// Dashboard preview row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StudentPreview {
    pub id: RecordId,
    #[serde(rename = "nama_lengkap")]
    pub full_name: String,
    #[serde(rename = "jurusan")]
    pub major: String,
}

impl StudentPreview {
    pub const COLUMNS: &'static str = "id, nama_lengkap, jurusan";
}

impl Draft for StudentDraft {
    const FIELDS: &'static [&'static str] = &["nim", "nama_lengkap", "jurusan", "semester"];

    fn validate(&self) -> Result<(), AppError> {
        require(&[&self.nim, &self.full_name, &self.major, &self.semester])?;
        if !SEMESTER_OPTIONS.contains(&self.semester.trim()) {
            return Err(AppError::validation("Semester must be between 1 and 8."));
        }
        Ok(())
    }

    fn set(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match field {
            "nim" => self.nim = value.to_string(),
            "nama_lengkap" => self.full_name = value.to_string(),
            "jurusan" => self.major = value.to_string(),
            "semester" => self.semester = value.to_string(),
            other => return Err(unknown_field(other)),
        }
        Ok(())
    }
}

impl Entity for Student {
    type Draft = StudentDraft;

    const TABLE: &'static str = "Mahasiswa";
    const NOUN: &'static str = "Student";
    const PLURAL: &'static str = "students";
    const HEADERS: &'static [&'static str] = &["ID", "NIM", "Full name", "Major", "Semester"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> StudentDraft {
        StudentDraft {
            nim: self.nim.clone(),
            full_name: self.full_name.clone(),
            major: self.major.clone(),
            semester: self.semester.clone(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.nim.clone(),
            self.full_name.clone(),
            self.major.clone(),
            self.semester.clone(),
        ]
    }
}
