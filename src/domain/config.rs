//! Configuration models.
//!
//! `AppConfig` mirrors the on-disk TOML file where every field is optional;
//! `ExportConfig` is the fully resolved, immutable value handed to the
//! exporter.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ExportFormat;

/// Default Cubox endpoint.
pub const DEFAULT_BASE_URL: &str = "https://cubox.pro";

/// Connection settings for the Cubox API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuboxSection {
    /// API token copied from the browser session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Base URL of the service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds. No timeout when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for CuboxSection {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Export destination and behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSection {
    /// Directory the exported files are written to.
    #[serde(default = "default_save_directory")]
    pub save_directory: PathBuf,

    /// Requested export format.
    #[serde(default)]
    pub format: ExportFormat,

    /// Delete each article from the inbox once it has been written.
    #[serde(default)]
    pub delete_after_export: bool,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            format: ExportFormat::default(),
            delete_after_export: false,
        }
    }
}

fn default_save_directory() -> PathBuf {
    PathBuf::from("./docs")
}

/// Log file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Directory holding the daily `<YYYY-MM-DD>.log` files.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

/// Complete configuration file contents.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Cubox connection configuration.
    #[serde(default)]
    pub cubox: CuboxSection,

    /// Export configuration.
    #[serde(default)]
    pub export: ExportSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Get the default configuration directory path.
    #[must_use]
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cubox-export")
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Copy of this configuration that is safe to print.
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        copy.cubox.token = copy.cubox.token.as_deref().map(mask_token);
        copy
    }
}

/// Resolved settings for one export run.
#[derive(Clone)]
pub struct ExportConfig {
    /// Token sent as `Authorization` and `Cookie: token=...`.
    pub api_token: String,
    /// Directory the exported files are written to.
    pub save_directory: PathBuf,
    /// Requested export format.
    pub export_format: ExportFormat,
    /// Delete each article after a successful export.
    pub delete_after_export: bool,
    /// Base URL of the Cubox service, without trailing slash.
    pub api_base_url: String,
    /// Optional per-request timeout.
    pub request_timeout: Option<Duration>,
}

impl ExportConfig {
    /// Create a configuration with default format, no deletion and the
    /// public Cubox endpoint.
    #[must_use]
    pub fn new(api_token: impl Into<String>, save_directory: impl Into<PathBuf>) -> Self {
        Self {
            api_token: api_token.into(),
            save_directory: save_directory.into(),
            export_format: ExportFormat::default(),
            delete_after_export: false,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }

    #[must_use]
    pub const fn with_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }

    #[must_use]
    pub const fn with_delete_after_export(mut self, delete: bool) -> Self {
        self.delete_after_export = delete;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

// Keeps the token out of logs.
impl std::fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportConfig")
            .field("api_token", &mask_token(&self.api_token))
            .field("save_directory", &self.save_directory)
            .field("export_format", &self.export_format)
            .field("delete_after_export", &self.delete_after_export)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Show only the first four characters of a secret.
fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    format!("{visible}****")
}
