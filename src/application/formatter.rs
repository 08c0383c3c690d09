//! Output formatting for inbox listings and run summaries.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{ExportFormat, ExportSummary, InboxItem};

use super::filename::file_stem;

/// Formats a table of inbox items with the file each would be written to.
pub fn format_inbox_table(items: &[InboxItem], format: ExportFormat) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "ID", "Title", "File"]);

    for (i, item) in items.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            item.id.clone(),
            truncate(&item.title, 50),
            format!("{}.{}", file_stem(item), format),
        ]);
    }

    table.to_string()
}

/// Formats the outcome of an export run for display.
pub fn format_summary(summary: &ExportSummary) -> String {
    let failed = if summary.failed == 0 {
        summary.failed.to_string().green()
    } else {
        summary.failed.to_string().red()
    };

    let mut out = format!(
        "{}\n  Inbox items: {}\n  Exported: {}\n  Failed: {}\n  Deleted: {}",
        "📊 Export summary".bold(),
        summary.total.to_string().cyan(),
        summary.exported.to_string().green(),
        failed,
        summary.deleted.to_string().yellow()
    );

    if summary.listing_incomplete {
        out.push_str(&format!(
            "\n  {}",
            "Inbox listing stopped early; some items were not seen".yellow()
        ));
    }

    out
}

/// Truncates a string to max characters with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{cut}...")
    }
}
