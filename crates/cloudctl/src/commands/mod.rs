//! CLI command implementations.
//!
//! Each submodule implements one resource command and the table rows of the
//! resources it prints:
//! - [`health`] and [`version`] - API meta information
//! - [`cluster`] - Kubernetes clusters
//! - [`project`] and [`tenant`] - Ownership
//! - [`postgres`], [`s3`] and [`volume`] - Storage and databases
//! - [`audit`] and [`billing`] - Audit traces and accounting
//! - [`dashboard`] - Live terminal dashboard

pub mod audit;
pub mod billing;
pub mod cluster;
pub mod dashboard;
pub mod health;
pub mod postgres;
pub mod project;
pub mod s3;
pub mod tenant;
pub mod version;
pub mod volume;

pub use audit::AuditCommand;
pub use billing::BillingCommand;
pub use cluster::ClusterCommand;
pub use dashboard::DashboardCommand;
pub use health::HealthCommand;
pub use postgres::PostgresCommand;
pub use project::ProjectCommand;
pub use s3::S3Command;
pub use tenant::TenantCommand;
pub use version::VersionCommand;
pub use volume::VolumeCommand;

use std::cmp::Ordering;

/// Compare optional strings with absent values first.
pub(crate) fn by_key(a: Option<&str>, b: Option<&str>) -> Ordering {
    a.unwrap_or_default().cmp(b.unwrap_or_default())
}
