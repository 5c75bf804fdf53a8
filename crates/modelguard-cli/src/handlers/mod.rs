//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

pub mod check;
pub mod completions;
pub mod config;
pub mod types;

pub use check::handle_check;
pub use completions::handle_completions;
pub use config::handle_config;
pub use types::handle_types;
