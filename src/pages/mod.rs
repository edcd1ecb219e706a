pub mod auth;
pub mod enrollment;
pub mod schedule;

pub use auth::{LoginPage, RegisterPage};
pub use enrollment::EnrollmentPage;
pub use schedule::SchedulePage;
