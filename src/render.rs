use crate::models::{Draft, Entity};
use crate::services::dashboard::Dashboard;
use crate::services::list_editor::{ListEditor, draft_field};
use crate::services::notifier::{Notification, Severity};

const MAX_CELL: usize = 32;

/// Banner line for the current notification, or nothing.
pub fn render_banner(notification: Option<&Notification>) -> Option<String> {
    notification.map(|n| match n.severity {
        Severity::Success => format!("[OK] {}", n.message),
        Severity::Error => format!("[ERROR] {}", n.message),
    })
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Aligned plain-text table.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
                .min(MAX_CELL)
        })
        .collect();

    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", truncate(cell, *width), width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header_line = line(headers.iter().map(|h| h.to_string()).collect());
    let divider = "-".repeat(header_line.chars().count());
    let mut out = vec![header_line, divider];
    out.extend(rows.iter().map(|row| {
        let cells = (0..headers.len())
            .map(|index| row.get(index).cloned().unwrap_or_else(|| "-".to_string()))
            .collect();
        line(cells)
    }));
    out.join("\n")
}

pub fn render_form<D: Draft>(title: &str, draft: &D) -> String {
    let mut out = vec![format!("== {} ==", title)];
    for field in D::FIELDS {
        out.push(format!("  {:<16} {}", field, draft_field(draft, field)));
    }
    out.join("\n")
}

/// Form header, banner, then the loading line or the item table.
pub fn render_list_page<E: Entity>(editor: &ListEditor<E>) -> String {
    let title = match editor.editing_id() {
        Some(id) => format!("Edit {} #{}", E::NOUN, id),
        None => format!("Add {}", E::NOUN),
    };
    let mut out = vec![render_form(&title, editor.form())];
    if let Some(banner) = render_banner(editor.notifier().current().as_ref()) {
        out.push(banner);
    }
    if editor.is_loading() {
        out.push("Loading data...".to_string());
    } else if editor.items().is_empty() {
        out.push(format!("No {} yet.", E::PLURAL));
    } else {
        let rows: Vec<Vec<String>> = editor.items().iter().map(E::cells).collect();
        out.push(render_table(E::HEADERS, &rows));
    }
    out.join("\n")
}

pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = vec!["== Dashboard ==".to_string()];
    if let Some(banner) = render_banner(dashboard.notifier().current().as_ref()) {
        out.push(banner);
    }
    let (Some(summary), Some(previews)) = (dashboard.summary(), dashboard.previews()) else {
        out.push("Loading dashboard data...".to_string());
        return out.join("\n");
    };

    out.push(format!(
        "Students: {}   Lecturers: {}   Classes: {}   Courses: {}",
        summary.students, summary.lecturers, summary.classes, summary.courses
    ));

    out.push("\nStudent preview".to_string());
    let rows: Vec<Vec<String>> = previews
        .students
        .iter()
        .map(|s| vec![s.full_name.clone(), s.major.clone()])
        .collect();
    out.push(render_table(&["Full name", "Major"], &rows));

    out.push("\nLecturer preview".to_string());
    let rows: Vec<Vec<String>> = previews
        .lecturers
        .iter()
        .map(|l| vec![l.full_name.clone(), l.expertise.clone()])
        .collect();
    out.push(render_table(&["Full name", "Expertise"], &rows));

    out.push("\nClass preview".to_string());
    let rows: Vec<Vec<String>> = previews
        .classes
        .iter()
        .map(|c| vec![c.name.clone(), c.semester.clone()])
        .collect();
    out.push(render_table(&["Class", "Semester"], &rows));

    out.push("\nCourse preview".to_string());
    let rows: Vec<Vec<String>> = previews
        .courses
        .iter()
        .map(|c| vec![c.name.clone(), c.credits.to_string()])
        .collect();
    out.push(render_table(&["Course", "Credits"], &rows));

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_banner_tags_severity() {
        let note = Notification {
            message: "duplicate key".to_string(),
            severity: Severity::Error,
        };
        assert_eq!(render_banner(Some(&note)).as_deref(), Some("[ERROR] duplicate key"));
        assert_eq!(render_banner(None), None);
    }

    #[test]
    fn test_table_aligns_columns() {
        let table = render_table(
            &["ID", "Name"],
            &[
                vec!["1".to_string(), "Ani".to_string()],
                vec!["12".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID  Name");
        assert_eq!(lines[1], "--------");
        assert_eq!(lines[2], "1   Ani");
        assert_eq!(lines[3], "12  -");
    }

    #[test]
    fn test_long_cells_are_truncated() {
        assert_eq!(truncate("abcdefgh", 6), "abc...");
        assert_eq!(truncate("abc", 6), "abc");
    }
}
