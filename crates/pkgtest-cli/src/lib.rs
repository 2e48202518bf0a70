//! CLI crate for pkgtest.
//!
//! The parser/commands/handlers split keeps clap definitions separate from
//! the code that does the work; `main.rs` is the composition root where the
//! runtime adapter is wired in.

pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use commands::{CacheCommand, Commands};
pub use error::CliError;
pub use parser::Cli;
