//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool, and merges
//! them with the configuration file into an `ExportConfig`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::domain::{AppConfig, AppError, ExportConfig, ExportFormat, Result};

/// Cubox Export - Save the articles in your Cubox inbox as local files.
#[derive(Parser, Debug)]
#[command(name = "cubox-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors to the console.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to the configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every inbox article to the save directory.
    Export {
        #[command(flatten)]
        options: ExportArgs,
    },

    /// List inbox articles and the files they would be written to.
    List {
        #[command(flatten)]
        options: ExportArgs,

        /// Maximum number of articles to show (0 = all).
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Manage the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Write a default configuration file if none exists.
    Init,
    /// Print the configuration file contents (token masked).
    Show,
    /// Print the configuration file location.
    Path,
}

/// Options shared by commands that talk to Cubox.
///
/// Every option falls back to the configuration file when not given.
#[derive(Args, Debug, Default, Clone)]
pub struct ExportArgs {
    /// Cubox API token.
    #[arg(short, long, env = "CUBOX_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory to write exported articles to.
    #[arg(short, long, env = "CUBOX_SAVE_DIR")]
    pub dir: Option<PathBuf>,

    /// Export format: md, text, pdf or html.
    #[arg(short, long, env = "CUBOX_FORMAT")]
    pub format: Option<String>,

    /// Delete each article from the inbox after it was exported.
    #[arg(long)]
    pub delete: bool,

    /// Cubox base URL.
    #[arg(long, env = "CUBOX_BASE_URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ExportArgs {
    /// Merge command-line values over the file configuration.
    ///
    /// # Errors
    /// Returns a configuration error if no token is available or the
    /// format is unknown.
    pub fn resolve(&self, file: &AppConfig) -> Result<ExportConfig> {
        let token = self
            .token
            .clone()
            .or_else(|| file.cubox.token.clone())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::Config {
                message: "No API token. Pass --token, set CUBOX_TOKEN or add it to the config file"
                    .into(),
            })?;

        let format = match &self.format {
            Some(raw) => raw
                .parse::<ExportFormat>()
                .map_err(|message| AppError::Config { message })?,
            None => file.export.format,
        };

        let save_directory = self
            .dir
            .clone()
            .unwrap_or_else(|| file.export.save_directory.clone());

        let base_url = self
            .base_url
            .clone()
            .unwrap_or_else(|| file.cubox.base_url.clone());

        let timeout = self
            .timeout
            .or(file.cubox.timeout_secs)
            .map(Duration::from_secs);

        Ok(ExportConfig::new(token.trim(), save_directory)
            .with_format(format)
            .with_delete_after_export(self.delete || file.export.delete_after_export)
            .with_base_url(base_url)
            .with_timeout(timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::DEFAULT_BASE_URL;

    #[test]
    fn test_cli_parses_export() {
        let cli = Cli::try_parse_from([
            "cubox-export",
            "-v",
            "export",
            "--token",
            "abc",
            "--format",
            "html",
            "--delete",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        let Commands::Export { options } = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(options.token.as_deref(), Some("abc"));
        assert!(options.delete);
    }

    #[test]
    fn test_resolve_prefers_flags_over_file() {
        let mut file = AppConfig::default();
        file.cubox.token = Some("from-file".into());
        file.export.format = ExportFormat::Pdf;

        let args = ExportArgs {
            token: Some("from-flag".into()),
            format: Some("text".into()),
            dir: Some(PathBuf::from("out")),
            ..Default::default()
        };
        let config = args.resolve(&file).unwrap();

        assert_eq!(config.api_token, "from-flag");
        assert_eq!(config.export_format, ExportFormat::Text);
        assert_eq!(config.save_directory, PathBuf::from("out"));
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_resolve_falls_back_to_file() {
        let mut file = AppConfig::default();
        file.cubox.token = Some("from-file".into());
        file.cubox.timeout_secs = Some(30);
        file.export.delete_after_export = true;

        let config = ExportArgs::default().resolve(&file).unwrap();

        assert_eq!(config.api_token, "from-file");
        assert_eq!(config.export_format, ExportFormat::Md);
        assert!(config.delete_after_export);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_resolve_requires_token() {
        let err = ExportArgs::default()
            .resolve(&AppConfig::default())
            .unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));

        let blank = ExportArgs {
            token: Some("  ".into()),
            ..Default::default()
        };
        assert!(blank.resolve(&AppConfig::default()).is_err());
    }

    #[test]
    fn test_resolve_rejects_unknown_format() {
        let args = ExportArgs {
            token: Some("t".into()),
            format: Some("epub".into()),
            ..Default::default()
        };
        assert!(args.resolve(&AppConfig::default()).is_err());
    }
}
