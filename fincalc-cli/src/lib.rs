//! Support code for the `fincalc` command-line tool: configuration,
//! logging setup, income-tax bracket overrides and report rendering.

pub mod config;
pub mod loader;
pub mod logging;
pub mod output;

pub use config::{Config, ConfigError};
pub use loader::{BracketLoader, BracketLoaderError, BracketRecord};
pub use logging::init_logging;
pub use output::{HistoryText, OutputFormat, RatesView, ReportText, render};
