pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{storage::LocalStorage, toml_config::TomlConfig};
pub use core::{engine::DosageEngine, service::ReportService};
pub use utils::error::{DosageError, Result};
