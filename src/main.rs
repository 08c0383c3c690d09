//! Cubox Export - Save the articles in a Cubox inbox as local files.
//!
//! Lists the inbox page by page, exports every article through the Cubox
//! export endpoint and writes it as `<title>.<format>`, optionally deleting
//! the original afterwards.
//!
//!   cubox-export export --token <TOKEN>          # Export inbox as Markdown to ./docs
//!   cubox-export export -f html -d out --delete  # HTML into ./out, then delete originals
//!   cubox-export list                            # Preview what would be exported
//!   cubox-export config init                     # Write a default config file

mod application;
mod cli;
mod domain;
mod infrastructure;

use clap::Parser;
use colored::Colorize;

use application::{format_inbox_table, format_summary, Exporter};
use cli::{Cli, Commands, ConfigAction, ExportArgs};
use domain::{AppConfig, AppError};
use infrastructure::{config_file_path, ensure_config_exists, load_config, setup_logging};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<()> {
    let file_config = load_config(cli.config.as_deref())?;

    setup_logging(cli.verbose, cli.quiet, &file_config.logging.log_dir);

    match cli.command {
        Commands::Export { options } => block_on(cmd_export(&options, &file_config))?,
        Commands::List { options, limit } => block_on(cmd_list(&options, &file_config, limit))?,
        Commands::Config { action } => cmd_config(action, cli.config.as_deref(), &file_config)?,
    }

    Ok(())
}

/// Drive a command future to completion on a single-threaded runtime.
fn block_on<T, F>(future: F) -> domain::Result<T>
where
    F: std::future::Future<Output = domain::Result<T>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::io("Failed to start async runtime", e))?;

    runtime.block_on(future)
}

/// Export the whole inbox.
async fn cmd_export(options: &ExportArgs, file_config: &AppConfig) -> domain::Result<()> {
    let config = options.resolve(file_config)?;
    let exporter = Exporter::new(config)?;

    let summary = exporter.run().await;

    println!();
    println!("{}", format_summary(&summary));

    if summary.is_clean() && summary.exported > 0 {
        println!(
            "\n{} Exported {} articles to {}/",
            "📁".bold(),
            summary.exported,
            exporter.config().save_directory.display()
        );
    }

    Ok(())
}

/// List inbox items without exporting them.
async fn cmd_list(options: &ExportArgs, file_config: &AppConfig, limit: usize) -> domain::Result<()> {
    let config = options.resolve(file_config)?;
    let format = config.export_format;
    let exporter = Exporter::connect(config)?;

    let listing = exporter.fetch_inbox_list().await;
    let total = listing.items.len();
    let shown = if limit > 0 { limit.min(total) } else { total };

    if total == 0 {
        println!("{}", "Inbox is empty.".dimmed());
    } else {
        println!("{}", format_inbox_table(&listing.items[..shown], format));
        println!();
        println!("Total: {} article(s)", total.to_string().cyan());
    }

    if let Some(e) = listing.halted_by {
        println!("{} Listing stopped early: {}", "⚠".yellow(), e);
    }

    Ok(())
}

/// Configuration file subcommands.
fn cmd_config(
    action: ConfigAction,
    custom_path: Option<&std::path::Path>,
    file_config: &AppConfig,
) -> domain::Result<()> {
    let path = config_file_path(custom_path);

    match action {
        ConfigAction::Init => {
            if ensure_config_exists(custom_path)? {
                println!("{} Created {}", "✓".green(), path.display());
            } else {
                println!("Config already exists at {}", path.display());
            }
        }
        ConfigAction::Show => {
            let content =
                toml::to_string_pretty(&file_config.masked()).map_err(|e| AppError::Config {
                    message: format!("Failed to serialize config: {e}"),
                })?;
            println!("# {}", path.display());
            println!("{content}");
        }
        ConfigAction::Path => println!("{}", path.display()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_on_returns_command_result() {
        assert_eq!(block_on(async { Ok(7) }).unwrap(), 7);

        let err = block_on(async {
            Err::<(), _>(AppError::Config {
                message: "no token".into(),
            })
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn test_list_does_not_create_save_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("never-created");

        let options = ExportArgs {
            token: Some("tok".into()),
            dir: Some(target.clone()),
            base_url: Some("http://127.0.0.1:9".into()),
            timeout: Some(1),
            ..Default::default()
        };

        block_on(cmd_list(&options, &AppConfig::default(), 0)).unwrap();
        assert!(!target.exists());
    }
}
