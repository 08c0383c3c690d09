//! Configuration file management.
//!
//! Handles loading and creating the TOML configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# Cubox Export Configuration
# Auto-generated - edit as needed

[cubox]
# API token from your Cubox web session (or set CUBOX_TOKEN)
# token = ""

# Service endpoint
base_url = "https://cubox.pro"

# Per-request timeout in seconds (no timeout when unset)
# timeout_secs = 60

[export]
# Directory exported articles are written to
save_directory = "./docs"

# One of: md, text, pdf, html
format = "md"

# Delete each article from the inbox after it has been exported
delete_after_export = false

[logging]
# Directory for daily log files
log_dir = "logs"
"#;

/// Resolve the configuration file location.
#[must_use]
pub fn config_file_path(custom: Option<&Path>) -> PathBuf {
    custom.map_or_else(AppConfig::default_config_path, Path::to_path_buf)
}

/// Load configuration from file or fall back to defaults.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config(custom: Option<&Path>) -> Result<AppConfig> {
    let config_path = config_file_path(custom);

    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Create the default configuration file if it doesn't exist.
///
/// Returns `true` when a new file was written.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists(custom: Option<&Path>) -> Result<bool> {
    let config_path = config_file_path(custom);

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %config_path.display(), "Created default configuration");

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExportFormat;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.cubox.base_url, "https://cubox.pro");
        assert!(config.cubox.token.is_none());
        assert_eq!(config.export.format, ExportFormat::Md);
        assert!(!config.export.delete_after_export);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.export.save_directory, PathBuf::from("./docs"));
    }

    #[test]
    fn test_ensure_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(ensure_config_exists(Some(&path)).unwrap());
        assert!(!ensure_config_exists(Some(&path)).unwrap());

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.logging.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_invalid_format_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[export]\nformat = \"docx\"\n").unwrap();

        let err = load_config_from_file(&path).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
