use std::sync::Arc;

use crate::error::AppError;
use crate::gateway::Gateway;
use crate::models::{Class, Course, Draft, RecordId, Schedule};
use crate::render::{render_list_page, render_table};
use crate::services::list_editor::{Confirm, ListEditor, Outcome, fetch_all};
use crate::services::notifier::Notifier;

/// Assigns courses to classes with a time slot.
pub struct SchedulePage {
    editor: ListEditor<Schedule>,
    classes: Vec<Class>,
    courses: Vec<Course>,
}

impl SchedulePage {
    pub fn new(gateway: Arc<dyn Gateway>, notifier: Notifier) -> Self {
        Self {
            editor: ListEditor::new(gateway, notifier),
            classes: Vec::new(),
            courses: Vec::new(),
        }
    }

    pub fn editor(&self) -> &ListEditor<Schedule> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ListEditor<Schedule> {
        &mut self.editor
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Loads the dropdown collections together with the schedule rows.
    pub async fn load(&mut self) -> bool {
        let ticket = self.editor.begin_load();
        let gateway = self.editor.gateway();
        let (classes, courses, rows) = tokio::join!(
            fetch_all::<Class>(gateway.as_ref()),
            fetch_all::<Course>(gateway.as_ref()),
            fetch_all::<Schedule>(gateway.as_ref()),
        );
        match (classes, courses) {
            (Ok(classes), Ok(courses)) => {
                let applied = self.editor.finish_load(ticket, rows);
                if applied {
                    self.classes = classes;
                    self.courses = courses;
                }
                applied
            }
            (Err(err), _) | (_, Err(err)) => self.editor.finish_load(ticket, Err(err)),
        }
    }

    pub fn set(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        self.editor.form_mut().set(field, value)
    }

    fn check_options(&self) -> Result<(), AppError> {
        let form = self.editor.form();
        if let Some(id) = form.class_id {
            if !self.classes.iter().any(|c| c.id == id) {
                return Err(AppError::validation("The selected class is not valid."));
            }
        }
        if let Some(id) = form.course_id {
            if !self.courses.iter().any(|c| c.id == id) {
                return Err(AppError::validation("The selected course is not valid."));
            }
        }
        Ok(())
    }

    pub async fn submit(&mut self) -> Outcome {
        if let Err(err) = self.check_options() {
            self.editor.notifier().error(err.to_string());
            return Outcome::Invalid;
        }
        self.editor.submit().await
    }

    pub async fn remove(&mut self, id: RecordId, confirm: &dyn Confirm) -> Outcome {
        self.editor.remove(id, confirm).await
    }

    pub fn render(&self) -> String {
        let classes: Vec<Vec<String>> = self
            .classes
            .iter()
            .map(|c| vec![c.id.to_string(), c.name.clone(), c.semester.clone()])
            .collect();
        let courses: Vec<Vec<String>> = self
            .courses
            .iter()
            .map(|c| vec![c.id.to_string(), c.name.clone(), c.credits.to_string()])
            .collect();
        [
            render_list_page(&self.editor),
            "\nClasses (kelas_id)".to_string(),
            render_table(&["ID", "Class", "Semester"], &classes),
            "\nCourses (matakuliah_id)".to_string(),
            render_table(&["ID", "Course", "Credits"], &courses),
        ]
        .join("\n")
    }
}
