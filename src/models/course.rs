use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, Entity, RecordId, require, unknown_field};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "kode_mk")]
    pub code: String,
    #[serde(rename = "nama_mk")]
    pub name: String,
    #[serde(rename = "sks")]
    pub credits: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseDraft {
    #[serde(rename = "kode_mk")]
    pub code: String,
    #[serde(rename = "nama_mk")]
    pub name: String,
    #[serde(rename = "sks")]
    pub credits: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoursePreview {
    pub id: RecordId,
    #[serde(rename = "nama_mk")]
    pub name: String,
    #[serde(rename = "sks")]
    pub credits: i32,
}

impl CoursePreview {
    pub const COLUMNS: &'static str = "id, nama_mk, sks";
}

impl Draft for CourseDraft {
    const FIELDS: &'static [&'static str] = &["kode_mk", "nama_mk", "sks"];

    fn validate(&self) -> Result<(), AppError> {
        require(&[&self.code, &self.name])?;
        if self.credits <= 0 {
            return Err(AppError::validation("All fields are required and credits must be greater than 0!"));
        }
        Ok(())
    }

    fn set(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match field {
            "kode_mk" => self.code = value.to_string(),
            "nama_mk" => self.name = value.to_string(),
            "sks" => {
                self.credits = value
                    .trim()
                    .parse()
                    .map_err(|_| AppError::validation("Credits must be a whole number"))?
            }
            other => return Err(unknown_field(other)),
        }
        Ok(())
    }
}

impl Entity for Course {
    type Draft = CourseDraft;

    const TABLE: &'static str = "Mata_Kuliah";
    const NOUN: &'static str = "Course";
    const PLURAL: &'static str = "courses";
    const HEADERS: &'static [&'static str] = &["ID", "Code", "Course", "Credits"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> CourseDraft {
        CourseDraft {
            code: self.code.clone(),
            name: self.name.clone(),
            credits: self.credits,
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.code.clone(),
            self.name.clone(),
            self.credits.to_string(),
        ]
    }
}
