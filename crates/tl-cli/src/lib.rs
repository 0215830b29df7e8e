//! Location-history journey CLI library.
//!
//! This crate provides the CLI interface for turning a Takeout export into a
//! list of business journeys.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
