//! portal-cli library
//!
//! This module exports the HTTP client and the argument parser for use in
//! tests and the `portalctl` binary.

pub mod cli;
pub(crate) mod client;
pub mod commands;

#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use client::{CliClientResult, Client, ClientError};
pub use commands::Commands;

/// Used when neither `--server` nor `PORTAL_URL` is given.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:9000";
