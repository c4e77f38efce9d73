//! Plain-text rendering of memories and tags.

use chrono::Local;

use crate::entry::Entry;

const PREVIEW_LEN: usize = 60;
const HEADERS: [&str; 5] = ["ID", "Date", "Uses", "Tags", "Content"];

pub fn entry_table(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "No memories found.".to_string();
    }

    let rows: Vec<[String; 5]> = entries
        .iter()
        .map(|e| {
            [
                e.id.to_string(),
                e.timestamp
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
                e.usage_count.to_string(),
                e.tags.join(", "),
                preview(e.preview()),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(&HEADERS.map(String::from), &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.iter().map(|row| format_row(row, &widths)));
    lines.join("\n")
}

pub fn tag_table(tags: &[(String, usize)]) -> String {
    if tags.is_empty() {
        return "No tags yet.".to_string();
    }
    let width = tags.iter().map(|(t, _)| t.chars().count()).max().unwrap_or(0);
    tags.iter()
        .map(|(tag, count)| format!("{:<width$}  {}", tag, count, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn entries_json(entries: &[Entry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}

/// Single-line preview, cut at `PREVIEW_LEN` characters.
pub fn preview(content: &str) -> String {
    let flat: String = content
        .chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= PREVIEW_LEN {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_LEN - 3).collect();
        format!("{}...", cut)
    }
}

fn format_row(cells: &[String; 5], widths: &[usize; 5]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}
