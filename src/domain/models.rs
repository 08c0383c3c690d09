//! Domain models for the Cubox inbox export.

use serde::{Deserialize, Serialize};

use super::AppError;

/// Serialization requested from the Cubox export endpoint.
///
/// The lowercase name doubles as the request `type` value and the
/// extension of the written file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Markdown.
    #[default]
    Md,
    /// Plain text.
    Text,
    /// PDF document.
    Pdf,
    /// HTML page.
    Html,
}

impl ExportFormat {
    /// Wire name and file extension.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Md => "md",
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Html => "html",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Md),
            "text" | "txt" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            "html" => Ok(Self::Html),
            _ => Err(format!("Unknown format: {s}. Use: md, text, pdf, html")),
        }
    }
}

/// A saved article waiting in the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxItem {
    /// Cubox engine id (`userSearchEngineID`).
    pub id: String,
    /// Article title as reported by the service.
    pub title: String,
}

impl InboxItem {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Result of walking the inbox pages.
///
/// Pagination never fails as a whole: when a page cannot be fetched the
/// items gathered so far are kept and the cause is stored in `halted_by`.
#[derive(Debug, Default)]
pub struct InboxListing {
    /// Items in the order the service returned them.
    pub items: Vec<InboxItem>,
    /// Error that stopped pagination early, if any.
    pub halted_by: Option<AppError>,
}

impl InboxListing {
    /// Whether every page up to `pageCount` was read.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.halted_by.is_none()
    }
}

/// Aggregate outcome of a full export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Items found in the inbox.
    pub total: usize,
    /// Items written to disk.
    pub exported: usize,
    /// Items whose export request or write failed.
    pub failed: usize,
    /// Originals whose delete request got a response.
    pub deleted: usize,
    /// Whether pagination stopped before the last page.
    pub listing_incomplete: bool,
}

impl ExportSummary {
    /// True when nothing went wrong during the run.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0 && !self.listing_incomplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("md".parse::<ExportFormat>(), Ok(ExportFormat::Md));
        assert_eq!("Markdown".parse::<ExportFormat>(), Ok(ExportFormat::Md));
        assert_eq!("text".parse::<ExportFormat>(), Ok(ExportFormat::Text));
        assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!("html".parse::<ExportFormat>(), Ok(ExportFormat::Html));
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_serde_is_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: ExportFormat,
        }

        let parsed: Wrapper = toml::from_str("format = \"html\"").unwrap();
        assert_eq!(parsed.format, ExportFormat::Html);
        assert_eq!(ExportFormat::Text.to_string(), "text");
    }

    #[test]
    fn test_summary_is_clean() {
        let mut summary = ExportSummary {
            total: 2,
            exported: 2,
            ..Default::default()
        };
        assert!(summary.is_clean());

        summary.listing_incomplete = true;
        assert!(!summary.is_clean());
    }
}
