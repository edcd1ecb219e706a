use std::sync::Arc;

use akademik::gateway::{MemoryGateway, Operation};
use akademik::services::dashboard::{LOAD_ERROR, PREVIEW_LIMIT};
use akademik::services::notifier::Severity;
use akademik::services::{Dashboard, Notifier};
use pretty_assertions::assert_eq;
use serde_json::json;

fn seeded() -> Arc<MemoryGateway> {
    let gateway = Arc::new(MemoryGateway::academic());
    for n in 0..7 {
        gateway.seed(
            "Mahasiswa",
            json!({ "nim": format!("23010{}", n), "nama_lengkap": format!("Mahasiswa {}", n), "jurusan": "Informatika", "semester": "1" }),
        );
    }
    gateway.seed(
        "Dosen",
        json!({ "nidn": "0011", "nama_lengkap": "Dr. Sari", "bidang_keahlian": "Jaringan" }),
    );
    gateway.seed(
        "Kelas",
        json!({ "nama_kelas": "TI-1A", "tahun_ajaran": "2024/2025", "semester": "Ganjil" }),
    );
    gateway
}

#[tokio::test]
async fn test_dashboard_counts_and_caps_previews() {
    let gateway = seeded();
    let mut dashboard = Dashboard::new(gateway.clone(), Notifier::default());
    assert!(dashboard.load().await);

    let summary = dashboard.summary().expect("summary");
    assert_eq!((summary.students, summary.lecturers, summary.classes, summary.courses), (7, 1, 1, 0));
    let previews = dashboard.previews().expect("previews");
    assert_eq!(previews.students.len(), PREVIEW_LIMIT);
    assert!(previews.courses.is_empty());
    assert!(!dashboard.is_loading());
    assert_eq!(dashboard.notifier().current(), None);
}

#[tokio::test]
async fn test_one_failing_query_fails_the_whole_dashboard() {
    let gateway = seeded();
    gateway.fail("Dosen", Operation::Count, "connection reset");
    let mut dashboard = Dashboard::new(gateway.clone(), Notifier::default());

    assert!(!dashboard.load().await);
    assert_eq!(dashboard.summary(), None);
    assert_eq!(dashboard.previews(), None);
    assert!(!dashboard.is_loading());

    let note = dashboard.notifier().current().expect("notification");
    assert_eq!(note.message, LOAD_ERROR);
    assert_eq!(note.severity, Severity::Error);
}

#[tokio::test]
async fn test_numeric_class_semester_still_loads() {
    let gateway = seeded();
    gateway.seed(
        "Kelas",
        json!({ "nama_kelas": "TI-1B", "tahun_ajaran": "2024/2025", "semester": 1 }),
    );
    let mut dashboard = Dashboard::new(gateway.clone(), Notifier::default());

    assert!(dashboard.load().await);
    assert_eq!(dashboard.summary().map(|s| s.classes), Some(2));
    let previews = dashboard.previews().expect("previews");
    assert!(previews.classes.iter().any(|c| c.name == "TI-1B" && c.semester == "1"));
    assert_eq!(dashboard.notifier().current(), None);
}
