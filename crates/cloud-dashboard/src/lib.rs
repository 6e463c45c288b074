//! # cloud-dashboard
//!
//! Read-only terminal dashboard for cluster health.
//!
//! Each refresh fetches a full snapshot of all clusters, reduces it to
//! counters and anomaly lists, and reconciles a version tree against the
//! previous one so that expanded nodes survive the refresh.
//!
//! ```text
//! fetch ──► aggregate ──► reconcile ──► draw
//!   ▲                                    │
//!   └──────── tick / resize ◄────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
pub mod app;
pub mod error;
pub mod events;
pub mod fetch;
pub mod runner;
pub mod scheduler;
pub mod theme;
pub mod tree;
pub mod ui;

pub use app::DashboardState;
pub use error::{DashboardError, FetchError};
pub use fetch::{Snapshot, SnapshotFilter, SnapshotSource};
pub use runner::{DashboardOptions, run};
pub use theme::{Theme, ThemeName};
