use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{Class, Course, Draft, Entity, Lecturer, RecordId, Student};
use crate::pages::{EnrollmentPage, LoginPage, RegisterPage, SchedulePage};
use crate::render::{render_dashboard, render_list_page};
use crate::routes::{Route, render_nav};
use crate::services::dashboard::Dashboard;
use crate::services::list_editor::{Confirm, ListEditor, Outcome};
use crate::services::notifier::Notifier;
use crate::state::AppState;

pub const HELP: &str = "\
commands:
  go <page>            open a page (/, /register, /dashboard, /home, /mahasiswa,
                       /dosen, /kelas, /matakuliah, /jadwal)
  set <field> <value>  fill a form field
  submit               save the form (insert, or update while editing)
  edit <id>            load a record into the form
  cancel               stop editing and clear the form
  delete <id>          delete a record (asks for confirmation)
  reload               fetch the page data again
  logout               end the session
  help                 show this text
  quit                 leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(Route),
    Set { field: String, value: String },
    Submit,
    Edit(RecordId),
    Cancel,
    Delete(RecordId),
    Reload,
    Logout,
    Help,
    Quit,
}

fn parse_record_id(raw: Option<&str>) -> Result<RecordId, AppError> {
    raw.and_then(|s| s.trim().parse::<RecordId>().ok())
        .ok_or_else(|| AppError::validation("Expected a numeric id"))
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, AppError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, Some(rest.trim())),
            None => (line, None),
        };
        let command = match word {
            "go" => Command::Go(rest.unwrap_or_default().parse()?),
            "set" => {
                let rest = rest.unwrap_or_default();
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(AppError::validation("Usage: set <field> <value>"));
                }
                Command::Set {
                    field: field.to_string(),
                    value: value.trim().to_string(),
                }
            }
            "submit" => Command::Submit,
            "edit" => Command::Edit(parse_record_id(rest)?),
            "cancel" => Command::Cancel,
            "delete" => Command::Delete(parse_record_id(rest)?),
            "reload" => Command::Reload,
            "logout" => Command::Logout,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(AppError::validation(format!("Unknown command: {}", other))),
        };
        Ok(command)
    }
}

/// The page currently mounted. Each one owns its own state.
pub enum Page {
    Login(LoginPage),
    Register(RegisterPage),
    Dashboard(Dashboard),
    Enrollment(EnrollmentPage),
    Students(ListEditor<Student>),
    Lecturers(ListEditor<Lecturer>),
    Classes(ListEditor<Class>),
    Courses(ListEditor<Course>),
    Schedules(SchedulePage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn set_field<E: Entity>(editor: &mut ListEditor<E>, field: &str, value: &str) -> Result<(), AppError> {
    editor.form_mut().set(field, value)
}

fn edit<E: Entity>(editor: &mut ListEditor<E>, id: RecordId) -> Result<(), AppError> {
    if editor.begin_edit_by_id(id) {
        Ok(())
    } else {
        Err(AppError::validation(format!("No {} with id {} on this page", E::NOUN.to_lowercase(), id)))
    }
}

/// Navigation shell: mounts one page at a time and routes commands to it.
pub struct Shell {
    state: AppState,
    notifier: Notifier,
    route: Route,
    page: Page,
    help_visible: bool,
}

impl Shell {
    pub fn new(state: AppState) -> Self {
        let notifier = Notifier::default();
        Self {
            page: Page::Login(LoginPage::new(notifier.clone())),
            state,
            notifier,
            route: Route::Login,
            help_visible: false,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Mounts `route` and runs its initial fetch. Data pages without a
    /// session fall back to the login screen.
    pub async fn navigate(&mut self, route: Route) {
        let route = if route.requires_session() && !self.state.session.is_signed_in() {
            self.notifier.error(AppError::NotAuthenticated.to_string());
            Route::Login
        } else {
            route
        };

        info!(route = %route, "mounting page");
        let gateway = self.state.gateway.clone();
        let notifier = self.notifier.clone();
        self.route = route;
        self.page = match route {
            Route::Login => Page::Login(LoginPage::new(notifier)),
            Route::Register => Page::Register(RegisterPage::new(notifier)),
            Route::Dashboard => Page::Dashboard(Dashboard::new(gateway, notifier)),
            Route::Enrollment => Page::Enrollment(EnrollmentPage::new(gateway, notifier)),
            Route::Students => Page::Students(ListEditor::new(gateway, notifier)),
            Route::Lecturers => Page::Lecturers(ListEditor::new(gateway, notifier)),
            Route::Classes => Page::Classes(ListEditor::new(gateway, notifier)),
            Route::Courses => Page::Courses(ListEditor::new(gateway, notifier)),
            Route::Schedules => Page::Schedules(SchedulePage::new(gateway, notifier)),
        };
        self.reload().await;
    }

    pub async fn reload(&mut self) {
        match &mut self.page {
            Page::Login(_) | Page::Register(_) => {}
            Page::Dashboard(page) => {
                page.load().await;
            }
            Page::Enrollment(page) => {
                page.load().await;
            }
            Page::Students(editor) => {
                editor.load().await;
            }
            Page::Lecturers(editor) => {
                editor.load().await;
            }
            Page::Classes(editor) => {
                editor.load().await;
            }
            Page::Courses(editor) => {
                editor.load().await;
            }
            Page::Schedules(page) => {
                page.load().await;
            }
        }
    }

    /// Clears the remote session, then the local one, then returns to login.
    pub async fn logout(&mut self) {
        if let Some(session) = self.state.session.current() {
            if let Err(err) = self.state.gateway.sign_out(&session).await {
                warn!("sign-out failed: {}", err);
            }
        }
        self.state.session.end();
        self.navigate(Route::Login).await;
    }

    async fn submit(&mut self) -> Option<Outcome> {
        match &mut self.page {
            Page::Login(page) => {
                let next = page.submit(&self.state).await;
                if let Some(route) = next {
                    self.navigate(route).await;
                }
                None
            }
            Page::Register(page) => {
                let next = page.submit(&self.state).await;
                if let Some(route) = next {
                    self.navigate(route).await;
                }
                None
            }
            Page::Dashboard(_) => None,
            Page::Enrollment(page) => Some(page.submit().await),
            Page::Students(editor) => Some(editor.submit().await),
            Page::Lecturers(editor) => Some(editor.submit().await),
            Page::Classes(editor) => Some(editor.submit().await),
            Page::Courses(editor) => Some(editor.submit().await),
            Page::Schedules(page) => Some(page.submit().await),
        }
    }

    fn set(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match &mut self.page {
            Page::Login(page) => page.set(field, value),
            Page::Register(page) => page.set(field, value),
            Page::Dashboard(_) => Err(AppError::validation("The dashboard has no form")),
            Page::Enrollment(page) => page.set(field, value),
            Page::Students(editor) => set_field(editor, field, value),
            Page::Lecturers(editor) => set_field(editor, field, value),
            Page::Classes(editor) => set_field(editor, field, value),
            Page::Courses(editor) => set_field(editor, field, value),
            Page::Schedules(page) => page.set(field, value),
        }
    }

    fn edit(&mut self, id: RecordId) -> Result<(), AppError> {
        match &mut self.page {
            Page::Students(editor) => edit(editor, id),
            Page::Lecturers(editor) => edit(editor, id),
            Page::Classes(editor) => edit(editor, id),
            Page::Courses(editor) => edit(editor, id),
            Page::Schedules(page) => edit(page.editor_mut(), id),
            _ => Err(AppError::validation("Nothing to edit on this page")),
        }
    }

    fn cancel(&mut self) {
        match &mut self.page {
            Page::Students(editor) => editor.cancel_edit(),
            Page::Lecturers(editor) => editor.cancel_edit(),
            Page::Classes(editor) => editor.cancel_edit(),
            Page::Courses(editor) => editor.cancel_edit(),
            Page::Schedules(page) => page.editor_mut().cancel_edit(),
            _ => {}
        }
    }

    async fn delete(&mut self, id: RecordId, confirm: &dyn Confirm) -> Result<Outcome, AppError> {
        let outcome = match &mut self.page {
            Page::Enrollment(page) => page.remove(id, confirm).await,
            Page::Students(editor) => editor.remove(id, confirm).await,
            Page::Lecturers(editor) => editor.remove(id, confirm).await,
            Page::Classes(editor) => editor.remove(id, confirm).await,
            Page::Courses(editor) => editor.remove(id, confirm).await,
            Page::Schedules(page) => page.remove(id, confirm).await,
            _ => return Err(AppError::validation("Nothing to delete on this page")),
        };
        Ok(outcome)
    }

    /// Runs one command line. Usage mistakes are reported on the banner.
    pub async fn execute(&mut self, line: &str, confirm: &dyn Confirm) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(err) => {
                self.notifier.error(err.to_string());
                return Flow::Continue;
            }
        };

        self.help_visible = command == Command::Help;
        let result = match command {
            Command::Go(route) => {
                self.navigate(route).await;
                Ok(())
            }
            Command::Set { field, value } => self.set(&field, &value),
            Command::Submit => {
                self.submit().await;
                Ok(())
            }
            Command::Edit(id) => self.edit(id),
            Command::Cancel => {
                self.cancel();
                Ok(())
            }
            Command::Delete(id) => self.delete(id, confirm).await.map(|_| ()),
            Command::Reload => {
                self.reload().await;
                Ok(())
            }
            Command::Logout => {
                self.logout().await;
                Ok(())
            }
            Command::Help => Ok(()),
            Command::Quit => return Flow::Quit,
        };

        if let Err(err) = result {
            self.notifier.error(err.to_string());
        }
        Flow::Continue
    }

    /// Whether the mounted page asked to jump back to its form.
    pub fn take_scroll_request(&mut self) -> bool {
        match &mut self.page {
            Page::Students(editor) => editor.take_scroll_request(),
            Page::Lecturers(editor) => editor.take_scroll_request(),
            Page::Classes(editor) => editor.take_scroll_request(),
            Page::Courses(editor) => editor.take_scroll_request(),
            Page::Schedules(page) => page.editor_mut().take_scroll_request(),
            _ => false,
        }
    }

    pub fn render(&self) -> String {
        let mut out = self.render_page();
        if self.help_visible {
            out.push_str("\n\n");
            out.push_str(HELP);
        }
        out
    }

    fn render_page(&self) -> String {
        let body = match &self.page {
            Page::Login(page) => return page.render(),
            Page::Register(page) => return page.render(),
            Page::Dashboard(page) => render_dashboard(page),
            Page::Enrollment(page) => page.render(),
            Page::Students(editor) => render_list_page(editor),
            Page::Lecturers(editor) => render_list_page(editor),
            Page::Classes(editor) => render_list_page(editor),
            Page::Courses(editor) => render_list_page(editor),
            Page::Schedules(page) => page.render(),
        };
        format!("{}\n\n{}", render_nav(self.route), body)
    }
}
