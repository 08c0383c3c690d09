//! Inbox export pipeline.
//!
//! Lists the inbox page by page, then exports each article in order,
//! writing it to the save directory and optionally deleting the original.
//! Per-item failures are logged and counted; they never stop the run.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::domain::{
    AppError, ExportConfig, ExportSummary, InboxItem, InboxListing, ItemError, Result,
};
use crate::infrastructure::CuboxClient;

use super::filename::output_path;
use super::progress::ProgressReporter;

/// `code` value the Cubox API uses for success.
const API_OK: i64 = 200;

/// A successfully written article.
#[derive(Debug)]
pub struct Exported {
    /// File the content was written to.
    pub path: PathBuf,
    /// Whether a delete request for the original got a response.
    pub deleted: bool,
}

/// Exports a Cubox inbox to local files.
pub struct Exporter {
    config: ExportConfig,
    client: CuboxClient,
}

impl Exporter {
    /// Create an exporter, making sure the save directory exists.
    ///
    /// # Errors
    /// Returns error if the save directory cannot be created or the HTTP
    /// client cannot be built from the configuration.
    pub fn new(config: ExportConfig) -> Result<Self> {
        fs::create_dir_all(&config.save_directory).map_err(|e| {
            AppError::io(
                format!(
                    "Failed to create save directory {}",
                    config.save_directory.display()
                ),
                e,
            )
        })?;

        let exporter = Self::connect(config)?;

        tracing::info!(
            save_directory = %exporter.config.save_directory.display(),
            format = %exporter.config.export_format,
            delete_original = exporter.config.delete_after_export,
            "Start export of Cubox inbox"
        );

        Ok(exporter)
    }

    /// Create an exporter without touching the filesystem.
    ///
    /// Enough for listing the inbox; `export_one` fails with a write error
    /// if the save directory does not exist.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built from the
    /// configuration.
    pub fn connect(config: ExportConfig) -> Result<Self> {
        let client = CuboxClient::new(&config)?;
        Ok(Self { config, client })
    }

    #[must_use]
    pub const fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Walk the inbox pages and collect every item.
    ///
    /// Stops after the page whose number reaches the reported `pageCount`.
    /// A non-200 `code`, a transport error or an unparsable page ends the
    /// walk early; the items collected so far are still returned.
    pub async fn fetch_inbox_list(&self) -> InboxListing {
        let mut listing = InboxListing::default();
        let mut page: u32 = 1;

        loop {
            let response = match self.client.inbox_page(page).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(page, error = %e, "Failed to fetch inbox page");
                    listing.halted_by = Some(e);
                    break;
                }
            };

            if response.code != API_OK {
                let message = response.message.unwrap_or_default();
                tracing::error!(page, code = response.code, %message, "Cubox rejected inbox request");
                listing.halted_by = Some(AppError::Api {
                    code: response.code,
                    message,
                });
                break;
            }

            let Some(page_count) = response.page_count else {
                tracing::error!(page, "Inbox page has no pageCount");
                listing.halted_by = Some(AppError::JsonParse {
                    message: format!("inbox page {page} is missing pageCount"),
                    source: None,
                });
                break;
            };

            listing.items.extend(
                response
                    .data
                    .unwrap_or_default()
                    .into_iter()
                    .map(|entry| InboxItem::new(entry.user_search_engine_id, entry.title)),
            );

            tracing::debug!(page, page_count, collected = listing.items.len(), "Fetched inbox page");

            page += 1;
            if page > page_count {
                break;
            }
        }

        if listing.items.is_empty() {
            tracing::info!("Cubox inbox is empty");
        }

        listing
    }

    /// Export one article and write it to `<save_directory>/<title>.<format>`.
    ///
    /// An existing file with the same name is overwritten. When deletion is
    /// enabled the original is removed only after the write succeeded.
    ///
    /// # Errors
    /// Returns `ItemError::Request` if the export call fails and
    /// `ItemError::Write` if the file cannot be written.
    pub async fn export_one(&self, item: &InboxItem) -> std::result::Result<Exported, ItemError> {
        let content = self
            .client
            .export(&item.id, self.config.export_format)
            .await
            .map_err(|source| ItemError::Request {
                id: item.id.clone(),
                source,
            })?;

        let path = output_path(&self.config.save_directory, item, self.config.export_format);
        fs::write(&path, &content).map_err(|source| ItemError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(
            title = %item.title,
            path = %path.display(),
            bytes = content.len(),
            "Exported article"
        );

        let deleted = self.config.delete_after_export && self.delete_one(&item.id).await;

        Ok(Exported { path, deleted })
    }

    /// Delete one article from the inbox.
    ///
    /// The response body is logged as-is and not inspected. Returns `false`
    /// only when no response was received.
    pub async fn delete_one(&self, id: &str) -> bool {
        match self.client.delete(id).await {
            Ok(body) => {
                tracing::info!(id, response = %body, "Delete response");
                true
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Delete request failed");
                false
            }
        }
    }

    /// Run the full pipeline with the progress bar on stdout.
    pub async fn run(&self) -> ExportSummary {
        self.run_with_progress(io::stdout()).await
    }

    /// Run the full pipeline, writing progress updates to `out`.
    pub async fn run_with_progress<W: Write>(&self, out: W) -> ExportSummary {
        let listing = self.fetch_inbox_list().await;

        let mut summary = ExportSummary {
            total: listing.items.len(),
            listing_incomplete: !listing.is_complete(),
            ..Default::default()
        };
        let mut progress = ProgressReporter::new(summary.total, out);

        for item in &listing.items {
            match self.export_one(item).await {
                Ok(exported) => {
                    summary.exported += 1;
                    if exported.deleted {
                        summary.deleted += 1;
                        tracing::debug!(path = %exported.path.display(), "Original removed after export");
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(title = %item.title, error = %e, "Error exporting article");
                }
            }

            if let Err(e) = progress.advance() {
                tracing::debug!(error = %e, "Failed to write progress");
            }
        }

        tracing::info!(
            total = summary.total,
            exported = summary.exported,
            failed = summary.failed,
            deleted = summary.deleted,
            "Export finished"
        );

        summary
    }
}
