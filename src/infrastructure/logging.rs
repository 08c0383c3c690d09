//! Tracing setup.
//!
//! Two layers share one registry: a console layer on stderr with source
//! context, and an append-only daily file layer restricted to INFO and above.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, NaiveDate};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::domain::{AppError, Result};

/// Path of the log file for a given day: `<dir>/<YYYY-MM-DD>.log`.
#[must_use]
pub fn daily_log_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.log", date.format("%Y-%m-%d")))
}

/// Open today's log file for appending, creating the directory if needed.
///
/// # Errors
/// Returns error if the directory or file cannot be created.
pub fn open_daily_log(dir: &Path) -> Result<(File, PathBuf)> {
    fs::create_dir_all(dir).map_err(|e| {
        AppError::io(format!("Failed to create log directory {}", dir.display()), e)
    })?;

    let path = daily_log_path(dir, Local::now().date_naive());
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| AppError::io(format!("Failed to open log file {}", path.display()), e))?;

    Ok((file, path))
}

/// Console filter directive for the given verbosity.
fn console_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "warn";
    }
    match verbosity {
        0 => "warn,cubox_export=debug",
        1 => "warn,cubox_export=trace",
        _ => "trace",
    }
}

/// Setup tracing with console and daily file output.
///
/// A log file that cannot be opened is reported as a warning and the run
/// continues with console output only.
pub fn setup_logging(verbosity: u8, quiet: bool, log_dir: &Path) {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_directive(verbosity, quiet)));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let (file_layer, file_error) = match open_daily_log(log_dir) {
        Ok((file, _)) => (
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::INFO),
            ),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!(error = %e, "File logging disabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_daily_log_path() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(
            daily_log_path(Path::new("logs"), date),
            PathBuf::from("logs/2024-06-03.log")
        );
    }

    #[test]
    fn test_open_daily_log_creates_dir_and_appends() {
        use std::io::Write;

        let dir = tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        let (mut file, path) = open_daily_log(&log_dir).unwrap();
        writeln!(file, "first").unwrap();
        drop(file);

        let (mut file, _) = open_daily_log(&log_dir).unwrap();
        writeln!(file, "second").unwrap();
        drop(file);

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_console_directive() {
        assert_eq!(console_directive(0, true), "warn");
        assert_eq!(console_directive(0, false), "warn,cubox_export=debug");
        assert_eq!(console_directive(5, false), "trace");
    }
}
