//! Domain layer - core types and errors.
//!
//! This layer contains pure domain models, configuration values and error
//! types without any IO.

pub mod config;
pub mod error;
pub mod models;

pub use config::{AppConfig, ExportConfig};
pub use error::{AppError, ItemError, Result};
pub use models::{ExportFormat, ExportSummary, InboxItem, InboxListing};
