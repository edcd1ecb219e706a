use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Enrollment,
    Students,
    Lecturers,
    Classes,
    Courses,
    Schedules,
}

/// Links shown in the navigation bar, in order.
pub const NAV_LINKS: [Route; 7] = [
    Route::Dashboard,
    Route::Enrollment,
    Route::Students,
    Route::Lecturers,
    Route::Classes,
    Route::Courses,
    Route::Schedules,
];

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::Enrollment => "/home",
            Route::Students => "/mahasiswa",
            Route::Lecturers => "/dosen",
            Route::Classes => "/kelas",
            Route::Courses => "/matakuliah",
            Route::Schedules => "/jadwal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Dashboard => "Dashboard",
            Route::Enrollment => "Course Enrollment",
            Route::Students => "Students",
            Route::Lecturers => "Lecturers",
            Route::Classes => "Classes",
            Route::Courses => "Courses",
            Route::Schedules => "Scheduling",
        }
    }

    /// Everything except the auth screens needs a signed-in session.
    pub fn requires_session(self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = AppError;

    /// Accepts a path (`/kelas`) or a bare name (`kelas`, `login`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().trim_start_matches('/').to_lowercase();
        let route = match key.as_str() {
            "" | "login" => Route::Login,
            "register" => Route::Register,
            "dashboard" => Route::Dashboard,
            "home" | "enrollment" => Route::Enrollment,
            "mahasiswa" | "students" => Route::Students,
            "dosen" | "lecturers" => Route::Lecturers,
            "kelas" | "classes" => Route::Classes,
            "matakuliah" | "courses" => Route::Courses,
            "jadwal" | "schedules" => Route::Schedules,
            _ => return Err(AppError::validation(format!("Unknown page: {}", s.trim()))),
        };
        Ok(route)
    }
}

/// The link bar with the active route marked, e.g. `[Dashboard] | Students`.
pub fn render_nav(active: Route) -> String {
    let links = NAV_LINKS
        .iter()
        .map(|route| {
            if *route == active {
                format!("[{}]", route.label())
            } else {
                route.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ");
    format!("{}   (logout)", links)
}
