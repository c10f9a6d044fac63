//! chain-journal - Date-keyed journal entries for a note vault
//!
//! Resolves folder and file paths for a date from user-configured patterns,
//! renders note templates with placeholder substitution, and materializes
//! entries (create-or-open) through a narrow storage interface.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::ChainError;
