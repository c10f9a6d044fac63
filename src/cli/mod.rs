//! CLI layer - Command-line interface

pub mod commands;
pub mod logging;
pub mod output;

pub use commands::{Cli, Commands};
pub use logging::init_logging;
pub use output::{format_resolved_paths, format_settings};
