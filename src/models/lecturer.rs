use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, Entity, RecordId, require, unknown_field};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecturer {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub nidn: String,
    #[serde(rename = "nama_lengkap")]
    pub full_name: String,
    #[serde(rename = "bidang_keahlian")]
    pub expertise: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LecturerDraft {
    pub nidn: String,
    #[serde(rename = "nama_lengkap")]
    pub full_name: String,
    #[serde(rename = "bidang_keahlian")]
    pub expertise: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LecturerPreview {
    pub id: RecordId,
    #[serde(rename = "nama_lengkap")]
    pub full_name: String,
    #[serde(rename = "bidang_keahlian")]
    pub expertise: String,
}

impl LecturerPreview {
    pub const COLUMNS: &'static str = "id, nama_lengkap, bidang_keahlian";
}

impl Draft for LecturerDraft {
    const FIELDS: &'static [&'static str] = &["nidn", "nama_lengkap", "bidang_keahlian"];

    fn validate(&self) -> Result<(), AppError> {
        require(&[&self.nidn, &self.full_name, &self.expertise])
    }

    fn set(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match field {
            "nidn" => self.nidn = value.to_string(),
            "nama_lengkap" => self.full_name = value.to_string(),
            "bidang_keahlian" => self.expertise = value.to_string(),
            other => return Err(unknown_field(other)),
        }
        Ok(())
    }
}

impl Entity for Lecturer {
    type Draft = LecturerDraft;

    const TABLE: &'static str = "Dosen";
    const NOUN: &'static str = "Lecturer";
    const PLURAL: &'static str = "lecturers";
    const HEADERS: &'static [&'static str] = &["ID", "NIDN", "Full name", "Expertise"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> LecturerDraft {
        LecturerDraft {
            nidn: self.nidn.clone(),
            full_name: self.full_name.clone(),
            expertise: self.expertise.clone(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.nidn.clone(),
            self.full_name.clone(),
            self.expertise.clone(),
        ]
    }
}
