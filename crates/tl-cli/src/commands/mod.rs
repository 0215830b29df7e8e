//! CLI subcommand implementations.

pub mod bins;
pub mod config;
