use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::AppError;
use crate::gateway::{Gateway, Query};
use crate::models::{
    Class, ClassPreview, Course, CoursePreview, Entity, Lecturer, LecturerPreview, Student, StudentPreview,
};
use crate::services::notifier::Notifier;

pub const PREVIEW_LIMIT: usize = 5;
pub const LOAD_ERROR: &str = "Failed to load dashboard data.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub students: u64,
    pub lecturers: u64,
    pub classes: u64,
    pub courses: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Previews {
    pub students: Vec<StudentPreview>,
    pub lecturers: Vec<LecturerPreview>,
    pub classes: Vec<ClassPreview>,
    pub courses: Vec<CoursePreview>,
}

async fn preview<T: DeserializeOwned>(gateway: &dyn Gateway, table: &str, columns: &str) -> Result<Vec<T>, AppError> {
    let rows = gateway
        .select(table, &Query::columns(columns).limit(PREVIEW_LIMIT))
        .await?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(AppError::from))
        .collect()
}

/// Four counts and four previews, all requested at once. Any failure
/// fails the whole batch.
pub async fn fetch_overview(gateway: &dyn Gateway) -> Result<(Summary, Previews), AppError> {
    let (students, lecturers, classes, courses, student_rows, lecturer_rows, class_rows, course_rows) = tokio::join!(
        gateway.count(Student::TABLE),
        gateway.count(Lecturer::TABLE),
        gateway.count(Class::TABLE),
        gateway.count(Course::TABLE),
        preview::<StudentPreview>(gateway, Student::TABLE, StudentPreview::COLUMNS),
        preview::<LecturerPreview>(gateway, Lecturer::TABLE, LecturerPreview::COLUMNS),
        preview::<ClassPreview>(gateway, Class::TABLE, ClassPreview::COLUMNS),
        preview::<CoursePreview>(gateway, Course::TABLE, CoursePreview::COLUMNS),
    );

    let summary = Summary {
        students: students?,
        lecturers: lecturers?,
        classes: classes?,
        courses: courses?,
    };
    let previews = Previews {
        students: student_rows?,
        lecturers: lecturer_rows?,
        classes: class_rows?,
        courses: course_rows?,
    };
    Ok((summary, previews))
}

/// Read-only overview of the four main collections.
pub struct Dashboard {
    gateway: Arc<dyn Gateway>,
    notifier: Notifier,
    summary: Option<Summary>,
    previews: Option<Previews>,
    loading: bool,
}

impl Dashboard {
    pub fn new(gateway: Arc<dyn Gateway>, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            summary: None,
            previews: None,
            loading: false,
        }
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn previews(&self) -> Option<&Previews> {
        self.previews.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub async fn load(&mut self) -> bool {
        self.loading = true;
        let result = fetch_overview(self.gateway.as_ref()).await;
        self.loading = false;
        match result {
            Ok((summary, previews)) => {
                info!(?summary, "dashboard loaded");
                self.summary = Some(summary);
                self.previews = Some(previews);
                true
            }
            Err(err) => {
                warn!("dashboard load failed: {}", err);
                self.summary = None;
                self.previews = None;
                self.notifier.error(LOAD_ERROR);
                false
            }
        }
    }
}
