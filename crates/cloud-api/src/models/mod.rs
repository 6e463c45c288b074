//! Wire models of the control-plane API.
//!
//! Every resource field is optional so that partial payloads from older or
//! newer API versions still decode.

pub mod accounting;
pub mod audit;
pub mod cluster;
pub mod database;
pub mod meta;
pub mod project;
pub mod s3;
pub mod volume;

pub use accounting::{ClusterUsage, ClusterUsageResponse, UsageRequest};
pub use audit::{AuditFilter, AuditTrace};
pub use cluster::{
    ClusterFilter, ClusterResponse, ClusterStatus, Condition, KubernetesSpec, LastError,
    LastOperation, Worker,
};
pub use database::{Postgres, PostgresFilter, PostgresSize, PostgresStatus};
pub use meta::{Health, Version};
pub use project::{Project, Tenant};
pub use s3::{S3Credentials, S3Key, S3ListRequest};
pub use volume::{Volume, VolumeFilter};
