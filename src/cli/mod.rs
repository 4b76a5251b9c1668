//! Command-line interface
//!
//! Argument parsing and the runner that wires settings, providers, the
//! export engine, and the report writer together.

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
