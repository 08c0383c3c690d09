//! Application layer - use cases and orchestration.
//!
//! This layer contains the export pipeline and its pure helpers.

pub mod exporter;
pub mod filename;
pub mod formatter;
pub mod progress;

pub use exporter::Exporter;
pub use formatter::{format_inbox_table, format_summary};
