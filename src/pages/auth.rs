use crate::error::AppError;
use crate::render::render_banner;
use crate::routes::Route;
use crate::services::notifier::Notifier;
use crate::state::AppState;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default, Clone)]
struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    fn set(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match field {
            "email" => self.email = value.trim().to_string(),
            "password" => self.password = value.to_string(),
            other => return Err(AppError::validation(format!("Unknown field: {}", other))),
        }
        Ok(())
    }

    fn render(&self, title: &str) -> String {
        [
            format!("== {} ==", title),
            format!("  {:<16} {}", "email", self.email),
            format!("  {:<16} {}", "password", "*".repeat(self.password.chars().count())),
        ]
        .join("\n")
    }
}

/// Entry screen: e-mail/password sign-in.
pub struct LoginPage {
    credentials: Credentials,
    notifier: Notifier,
}

impl LoginPage {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            credentials: Credentials::default(),
            notifier,
        }
    }

    pub fn set(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        self.credentials.set(field, value)
    }

    /// Signs in and fills the session context. Returns where to go next.
    pub async fn submit(&mut self, state: &AppState) -> Option<Route> {
        let Credentials { email, password } = &self.credentials;
        if email.is_empty() || password.is_empty() {
            self.notifier.error("Email and password are required.");
            return None;
        }
        match state.gateway.sign_in(email, password).await {
            Ok(session) => {
                state.session.begin(session);
                self.credentials = Credentials::default();
                Some(Route::Dashboard)
            }
            Err(err) => {
                self.notifier.error(err.to_string());
                None
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = vec![self.credentials.render("Sign in")];
        if let Some(banner) = render_banner(self.notifier.current().as_ref()) {
            out.push(banner);
        }
        out.push("No account yet? `go /register`".to_string());
        out.join("\n")
    }
}

pub struct RegisterPage {
    credentials: Credentials,
    notifier: Notifier,
}

impl RegisterPage {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            credentials: Credentials::default(),
            notifier,
        }
    }

    pub fn set(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        self.credentials.set(field, value)
    }

    pub async fn submit(&mut self, state: &AppState) -> Option<Route> {
        let Credentials { email, password } = &self.credentials;
        if email.is_empty() {
            self.notifier.error("Email is required.");
            return None;
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            self.notifier
                .error(format!("Password must be at least {} characters.", MIN_PASSWORD_LEN));
            return None;
        }
        match state.gateway.sign_up(email, password).await {
            Ok(_) => {
                self.notifier.success("Registration succeeded! Redirecting to login...");
                self.credentials = Credentials::default();
                Some(Route::Login)
            }
            Err(err) => {
                self.notifier.error(err.to_string());
                None
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = vec![self.credentials.render("Create account")];
        if let Some(banner) = render_banner(self.notifier.current().as_ref()) {
            out.push(banner);
        }
        out.push("Already registered? `go /`".to_string());
        out.join("\n")
    }
}
