use std::sync::Arc;

use akademik::gateway::{MemoryGateway, Operation};
use akademik::models::{Student, StudentDraft};
use akademik::services::notifier::Severity;
use akademik::services::{ListEditor, Notifier, Outcome};
use pretty_assertions::assert_eq;
use serde_json::json;

fn draft(nim: &str, name: &str, major: &str, semester: &str) -> StudentDraft {
    StudentDraft {
        nim: nim.to_string(),
        full_name: name.to_string(),
        major: major.to_string(),
        semester: semester.to_string(),
    }
}

fn seed_student(gateway: &MemoryGateway, nim: &str, name: &str) -> i64 {
    gateway.seed(
        "Mahasiswa",
        json!({ "nim": nim, "nama_lengkap": name, "jurusan": "Informatika", "semester": "3" }),
    )
}

async fn loaded_editor(gateway: &Arc<MemoryGateway>) -> ListEditor<Student> {
    let mut editor = ListEditor::new(gateway.clone(), Notifier::default());
    assert!(editor.load().await);
    editor
}

#[tokio::test]
async fn test_insert_appears_on_next_load() {
    let gateway = Arc::new(MemoryGateway::academic());
    let mut editor = loaded_editor(&gateway).await;

    editor.set_form(draft("2301001", "Ani Lestari", "Informatika", "3"));
    assert_eq!(editor.submit().await, Outcome::Done);
    assert_eq!(editor.form(), &StudentDraft::default());
    assert_eq!(editor.editing_id(), None);

    let note = editor.notifier().current().expect("notification");
    assert_eq!(note.message, "Student added successfully!");
    assert_eq!(note.severity, Severity::Success);

    let fresh = loaded_editor(&gateway).await;
    assert!(fresh.items().iter().any(|s| s.nim == "2301001" && s.full_name == "Ani Lestari"));
}

#[tokio::test]
async fn test_newest_record_is_listed_first() {
    let gateway = Arc::new(MemoryGateway::academic());
    seed_student(&gateway, "1", "Pertama");
    seed_student(&gateway, "2", "Kedua");

    let editor = loaded_editor(&gateway).await;
    let names: Vec<&str> = editor.items().iter().map(|s| s.full_name.as_str()).collect();
    assert_eq!(names, vec!["Kedua", "Pertama"]);
}

#[tokio::test]
async fn test_edit_updates_only_the_target() {
    let gateway = Arc::new(MemoryGateway::academic());
    let target = seed_student(&gateway, "2301001", "Ani");
    let other = seed_student(&gateway, "2301002", "Budi");
    let mut editor = loaded_editor(&gateway).await;

    assert!(editor.begin_edit_by_id(target));
    editor.form_mut().full_name = "Ani Lestari".to_string();
    assert_eq!(editor.submit().await, Outcome::Done);
    assert_eq!(
        editor.notifier().current().map(|n| n.message),
        Some("Student updated successfully!".to_string())
    );

    let fresh = loaded_editor(&gateway).await;
    let find = |id: i64| fresh.items().iter().find(|s| s.id == id).cloned().expect("listed");
    assert_eq!(find(target).full_name, "Ani Lestari");
    assert_eq!(find(target).nim, "2301001");
    assert_eq!(find(other).full_name, "Budi");
    assert_eq!(fresh.items().len(), 2);
}

#[tokio::test]
async fn test_removed_record_never_comes_back() {
    let gateway = Arc::new(MemoryGateway::academic());
    let id = seed_student(&gateway, "2301001", "Ani");
    seed_student(&gateway, "2301002", "Budi");
    let mut editor = loaded_editor(&gateway).await;

    assert_eq!(editor.remove(id, &|_: &str| true).await, Outcome::Done);
    assert!(editor.items().iter().all(|s| s.id != id));
    assert_eq!(editor.notifier().current().map(|n| n.message), Some("Student deleted.".to_string()));

    assert!(editor.load().await);
    assert!(editor.items().iter().all(|s| s.id != id));
    assert_eq!(editor.items().len(), 1);
}

#[tokio::test]
async fn test_empty_field_is_rejected_without_a_request() {
    let gateway = Arc::new(MemoryGateway::academic());
    seed_student(&gateway, "2301001", "Ani");
    let mut editor = loaded_editor(&gateway).await;
    let calls = gateway.calls();

    editor.set_form(draft("2301009", "   ", "Informatika", "3"));
    assert_eq!(editor.submit().await, Outcome::Invalid);

    assert_eq!(gateway.calls(), calls);
    assert_eq!(gateway.rows("Mahasiswa").len(), 1);
    let note = editor.notifier().current().expect("notification");
    assert_eq!(note.message, "All fields are required!");
    assert_eq!(note.severity, Severity::Error);
}

#[tokio::test]
async fn test_semester_outside_options_is_rejected() {
    let gateway = Arc::new(MemoryGateway::academic());
    let mut editor = loaded_editor(&gateway).await;
    let calls = gateway.calls();

    editor.set_form(draft("2301009", "Citra", "Informatika", "9"));
    assert_eq!(editor.submit().await, Outcome::Invalid);
    assert_eq!(gateway.calls(), calls);
    assert!(gateway.rows("Mahasiswa").is_empty());
}

#[tokio::test]
async fn test_backend_error_is_shown_verbatim_and_form_kept() {
    let gateway = Arc::new(MemoryGateway::academic());
    seed_student(&gateway, "2301001", "Ani");
    let mut editor = loaded_editor(&gateway).await;
    let before = editor.items().to_vec();

    gateway.fail("Mahasiswa", Operation::Insert, "duplicate key");
    let form = draft("2301001", "Ani Kembar", "Informatika", "3");
    editor.set_form(form.clone());
    assert_eq!(editor.submit().await, Outcome::Failed);

    let note = editor.notifier().current().expect("notification");
    assert_eq!(note.message, "duplicate key");
    assert_eq!(note.severity, Severity::Error);
    assert_eq!(editor.items(), before.as_slice());
    assert_eq!(editor.form(), &form);
    assert_eq!(gateway.rows("Mahasiswa").len(), 1);
}

#[tokio::test]
async fn test_failed_update_keeps_edit_state() {
    let gateway = Arc::new(MemoryGateway::academic());
    let id = seed_student(&gateway, "2301001", "Ani");
    let mut editor = loaded_editor(&gateway).await;

    assert!(editor.begin_edit_by_id(id));
    editor.form_mut().major = "Sistem Informasi".to_string();
    gateway.fail("Mahasiswa", Operation::Update, "permission denied for table Mahasiswa");
    assert_eq!(editor.submit().await, Outcome::Failed);

    assert_eq!(editor.editing_id(), Some(id));
    assert_eq!(editor.form().major, "Sistem Informasi");
}

#[tokio::test]
async fn test_declined_delete_has_no_effect() {
    let gateway = Arc::new(MemoryGateway::academic());
    let id = seed_student(&gateway, "2301001", "Ani");
    let mut editor = loaded_editor(&gateway).await;
    let calls = gateway.calls();

    let asked = std::cell::Cell::new(None::<String>);
    let decline = |prompt: &str| {
        asked.set(Some(prompt.to_string()));
        false
    };
    assert_eq!(editor.remove(id, &decline).await, Outcome::Declined);

    assert_eq!(asked.take().as_deref(), Some("Are you sure you want to delete this student?"));
    assert_eq!(gateway.calls(), calls);
    assert_eq!(editor.items().len(), 1);
    assert_eq!(editor.notifier().current(), None);
}

#[tokio::test]
async fn test_failed_delete_keeps_items() {
    let gateway = Arc::new(MemoryGateway::academic());
    let id = seed_student(&gateway, "2301001", "Ani");
    let mut editor = loaded_editor(&gateway).await;
    let before = editor.items().to_vec();

    gateway.fail("Mahasiswa", Operation::Delete, "violates foreign key constraint");
    assert_eq!(editor.remove(id, &|_: &str| true).await, Outcome::Failed);

    let note = editor.notifier().current().expect("notification");
    assert_eq!(note.message, "violates foreign key constraint");
    assert_eq!(note.severity, Severity::Error);
    assert_eq!(editor.items(), before.as_slice());
    assert_eq!(gateway.rows("Mahasiswa").len(), 1);
}
