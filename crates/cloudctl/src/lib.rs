//! # cloudctl
//!
//! Command-line client for the cloud control-plane API.
//!
//! Provides commands for:
//! - Listing and describing clusters, projects, tenants and databases
//! - S3 credentials, volumes, audit traces and cluster usage
//! - A live terminal dashboard of cluster health
//!
//! # Architecture
//!
//! Commands call the API through [`cloud_api::ApiClient`] and print the
//! results through [`output::OutputFormat`]. The dashboard is provided by
//! `cloud-dashboard`.
//!
//! ```text
//! ┌───────────┐    JSON over HTTPS    ┌────────────────────┐
//! │  cloudctl │◄─────────────────────►│  control-plane API │
//! └───────────┘                       └────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod template;

pub use cli::{Cli, Commands, Format};
pub use config::{Config, Settings};
pub use error::CliError;
pub use output::{OutputFormat, TableRegistry, Tabular};
