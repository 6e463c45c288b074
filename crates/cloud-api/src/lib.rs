//! # cloud-api
//!
//! Wire models and an async HTTP client for the cloud control-plane API.
//!
//! ```text
//! ┌───────────┐     JSON over HTTPS     ┌────────────────────┐
//! │  cloudctl │◄───────────────────────►│  control-plane API │
//! └───────────┘                         └────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod models;

pub use client::{ApiClient, ApiClientBuilder};
pub use error::ApiError;
