use std::sync::Arc;

use akademik::gateway::MemoryGateway;
use akademik::routes::Route;
use akademik::services::notifier::Severity;
use akademik::shell::{Flow, Shell};
use akademik::state::{AppState, SessionContext};
use serde_json::json;

fn accept(_: &str) -> bool {
    true
}

fn shell() -> (Shell, Arc<MemoryGateway>, SessionContext) {
    let gateway = Arc::new(MemoryGateway::academic());
    let session = SessionContext::default();
    let shell = Shell::new(AppState::new(gateway.clone(), session.clone()));
    (shell, gateway, session)
}

async fn run(shell: &mut Shell, lines: &[&str]) {
    for line in lines {
        assert_eq!(shell.execute(line, &accept).await, Flow::Continue, "{}", line);
    }
}

async fn sign_in(shell: &mut Shell) {
    run(
        shell,
        &[
            "go /register",
            "set email dewi@kampus.ac.id",
            "set password rahasia123",
            "submit",
            "set email dewi@kampus.ac.id",
            "set password rahasia123",
            "submit",
        ],
    )
    .await;
}

#[tokio::test]
async fn test_data_pages_require_a_session() {
    let (mut shell, gateway, _) = shell();
    run(&mut shell, &["go /mahasiswa"]).await;

    assert_eq!(shell.route(), Route::Login);
    assert_eq!(gateway.calls(), 0);
    let note = shell.notifier().current().expect("notification");
    assert_eq!(note.message, "Please sign in first.");
    assert_eq!(note.severity, Severity::Error);
}

#[tokio::test]
async fn test_register_redirects_to_login_then_dashboard() {
    let (mut shell, _, session) = shell();
    run(
        &mut shell,
        &["go /register", "set email dewi@kampus.ac.id", "set password rahasia123", "submit"],
    )
    .await;
    assert_eq!(shell.route(), Route::Login);
    assert_eq!(
        shell.notifier().current().map(|n| n.message),
        Some("Registration succeeded! Redirecting to login...".to_string())
    );
    assert!(!session.is_signed_in());

    run(&mut shell, &["set email dewi@kampus.ac.id", "set password rahasia123", "submit"]).await;
    assert_eq!(shell.route(), Route::Dashboard);
    assert!(session.is_signed_in());
    assert!(shell.render().contains("[Dashboard]"));
}

#[tokio::test]
async fn test_class_crud_through_commands() {
    let (mut shell, gateway, _) = shell();
    sign_in(&mut shell).await;

    run(
        &mut shell,
        &["go kelas", "set nama_kelas TI-2B", "set tahun_ajaran 2024/2025", "set semester Genap", "submit"],
    )
    .await;
    let rows = gateway.rows("Kelas");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["nama_kelas"], json!("TI-2B"));
    let id = rows[0]["id"].as_i64().expect("id");
    assert!(shell.render().contains("TI-2B"));

    run(&mut shell, &[format!("edit {}", id).as_str()]).await;
    assert!(shell.take_scroll_request());
    assert!(shell.render().contains(&format!("Edit Class #{}", id)));
    run(&mut shell, &["set nama_kelas TI-2C", "submit"]).await;
    assert_eq!(gateway.rows("Kelas")[0]["nama_kelas"], json!("TI-2C"));

    run(&mut shell, &[format!("delete {}", id).as_str()]).await;
    assert!(gateway.rows("Kelas").is_empty());
}

#[tokio::test]
async fn test_usage_errors_land_on_the_banner() {
    let (mut shell, _, _) = shell();
    sign_in(&mut shell).await;
    run(&mut shell, &["go /dosen", "edit 99"]).await;

    let note = shell.notifier().current().expect("notification");
    assert_eq!(note.severity, Severity::Error);
    assert_eq!(note.message, "No lecturer with id 99 on this page");

    run(&mut shell, &["teleport"]).await;
    assert_eq!(shell.notifier().current().map(|n| n.message), Some("Unknown command: teleport".to_string()));
}

#[tokio::test]
async fn test_logout_clears_session_and_returns_to_login() {
    let (mut shell, _, session) = shell();
    sign_in(&mut shell).await;
    assert!(session.is_signed_in());

    run(&mut shell, &["logout"]).await;
    assert_eq!(shell.route(), Route::Login);
    assert!(!session.is_signed_in());

    run(&mut shell, &["go /dashboard"]).await;
    assert_eq!(shell.route(), Route::Login);
    assert_eq!(shell.execute("quit", &accept).await, Flow::Quit);
}
