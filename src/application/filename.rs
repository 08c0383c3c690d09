//! Turning article titles into file names.

use std::path::{Path, PathBuf};

use crate::domain::{ExportFormat, InboxItem};

/// Characters rejected by common filesystems.
const INVALID_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace every character that is illegal in a filename with `-`.
///
/// The replacement is one-for-one, so the character count never changes.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if INVALID_FILENAME_CHARS.contains(&c) { '-' } else { c })
        .collect()
}

/// Drop everything from the last `-` onward.
///
/// Cubox appends a suffix after the final hyphen of exported titles; this
/// strips it. Titles without a hyphen are returned unchanged.
#[must_use]
pub fn strip_title_suffix(title: &str) -> &str {
    title.rfind('-').map_or(title, |i| &title[..i])
}

/// File stem for an inbox item.
///
/// Falls back to the item id when the title reduces to nothing, which
/// happens for titles that start with their only hyphen.
#[must_use]
pub fn file_stem(item: &InboxItem) -> String {
    let sanitized = sanitize_filename(&item.title);
    let stem = strip_title_suffix(&sanitized);

    if stem.is_empty() {
        sanitize_filename(&item.id)
    } else {
        stem.to_string()
    }
}

/// Full output path: `<dir>/<stem>.<format>`.
#[must_use]
pub fn output_path(dir: &Path, item: &InboxItem, format: ExportFormat) -> PathBuf {
    dir.join(format!("{}.{}", file_stem(item), format.as_str()))
}
