//! Infrastructure layer - external adapters (HTTP API, filesystem, logging).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod cubox_client;
pub mod logging;

pub use config::{config_file_path, ensure_config_exists, load_config};
pub use cubox_client::CuboxClient;
pub use logging::setup_logging;
