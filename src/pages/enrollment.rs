use std::sync::Arc;

use crate::error::AppError;
use crate::gateway::Gateway;
use crate::models::{Enrollment, EnrollmentDraft, Entity, RecordId, Schedule, Student, parse_id};
use crate::render::{render_banner, render_table};
use crate::services::list_editor::{Confirm, ListEditor, Outcome, fetch_all};
use crate::services::notifier::Notifier;

pub const FIELDS: [&str; 2] = ["student", "schedule"];

/// Registers students for courses by picking a student and a scheduled
/// course offering.
pub struct EnrollmentPage {
    editor: ListEditor<Enrollment>,
    students: Vec<Student>,
    schedules: Vec<Schedule>,
    selected_student: Option<RecordId>,
    selected_schedule: Option<RecordId>,
}

impl EnrollmentPage {
    pub fn new(gateway: Arc<dyn Gateway>, notifier: Notifier) -> Self {
        Self {
            editor: ListEditor::new(gateway, notifier),
            students: Vec::new(),
            schedules: Vec::new(),
            selected_student: None,
            selected_schedule: None,
        }
    }

    pub fn editor(&self) -> &ListEditor<Enrollment> {
        &self.editor
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn selection(&self) -> (Option<RecordId>, Option<RecordId>) {
        (self.selected_student, self.selected_schedule)
    }

    pub async fn load(&mut self) -> bool {
        let ticket = self.editor.begin_load();
        let gateway = self.editor.gateway();
        let (students, schedules, rows) = tokio::join!(
            fetch_all::<Student>(gateway.as_ref()),
            fetch_all::<Schedule>(gateway.as_ref()),
            fetch_all::<Enrollment>(gateway.as_ref()),
        );
        match (students, schedules) {
            (Ok(students), Ok(schedules)) => {
                let applied = self.editor.finish_load(ticket, rows);
                if applied {
                    self.students = students;
                    self.schedules = schedules;
                }
                applied
            }
            (Err(err), _) | (_, Err(err)) => self.editor.finish_load(ticket, Err(err)),
        }
    }

    pub fn set(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match field {
            "student" => self.selected_student = Some(parse_id(field, value)?),
            "schedule" => self.selected_schedule = Some(parse_id(field, value)?),
            other => return Err(AppError::validation(format!("Unknown field: {}", other))),
        }
        Ok(())
    }

    pub fn select(&mut self, student: RecordId, schedule: RecordId) {
        self.selected_student = Some(student);
        self.selected_schedule = Some(schedule);
    }

    /// Resolves the selection into an enrollment draft.
    fn draft(&self) -> Result<EnrollmentDraft, AppError> {
        let (Some(student_id), Some(schedule_id)) = (self.selected_student, self.selected_schedule) else {
            return Err(AppError::validation("Select a student and a schedule first!"));
        };
        if !self.students.iter().any(|s| s.id == student_id) {
            return Err(AppError::validation("The selected student is not valid."));
        }
        let schedule = self
            .schedules
            .iter()
            .find(|s| s.id == schedule_id)
            .ok_or_else(|| AppError::validation("The selected schedule is not valid."))?;
        Ok(EnrollmentDraft {
            student_id: Some(student_id),
            course_id: Some(schedule.course_id),
        })
    }

    pub async fn submit(&mut self) -> Outcome {
        let draft = match self.draft() {
            Ok(draft) => draft,
            Err(err) => {
                self.editor.notifier().error(err.to_string());
                return Outcome::Invalid;
            }
        };
        self.editor.set_form(draft);
        let outcome = self.editor.submit().await;
        if outcome == Outcome::Done {
            self.selected_student = None;
            self.selected_schedule = None;
        }
        outcome
    }

    pub async fn remove(&mut self, id: RecordId, confirm: &dyn Confirm) -> Outcome {
        self.editor.remove(id, confirm).await
    }

    pub fn render(&self) -> String {
        let show = |id: Option<RecordId>| id.map_or_else(|| "-".to_string(), |id| id.to_string());
        let mut out = vec![
            "== Enroll Student in Course ==".to_string(),
            format!("  {:<16} {}", FIELDS[0], show(self.selected_student)),
            format!("  {:<16} {}", FIELDS[1], show(self.selected_schedule)),
        ];
        if let Some(banner) = render_banner(self.editor.notifier().current().as_ref()) {
            out.push(banner);
        }

        let students: Vec<Vec<String>> = self
            .students
            .iter()
            .map(|s| vec![s.id.to_string(), format!("{} - {} (Semester {})", s.full_name, s.nim, s.semester)])
            .collect();
        out.push("\nStudents".to_string());
        out.push(render_table(&["ID", "Student"], &students));

        let schedules: Vec<Vec<String>> = self
            .schedules
            .iter()
            .map(|s| vec![s.id.to_string(), s.label()])
            .collect();
        out.push("\nSchedules".to_string());
        out.push(render_table(&["ID", "Schedule"], &schedules));

        out.push("\nEnrolled students".to_string());
        if self.editor.is_loading() {
            out.push("Loading data...".to_string());
        } else if self.editor.items().is_empty() {
            out.push("No enrollments yet.".to_string());
        } else {
            let rows: Vec<Vec<String>> = self.editor.items().iter().map(|e| e.cells()).collect();
            out.push(render_table(&["ID", "Student", "Course"], &rows));
        }
        out.join("\n")
    }
}
