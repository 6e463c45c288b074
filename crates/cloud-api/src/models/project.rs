//! Projects and tenants.

use serde::{Deserialize, Serialize};

/// A project groups clusters, databases and volumes of one tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Project {
    /// Project ID.
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Project name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning tenant.
    #[serde(rename = "TenantID", skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Maximum number of clusters, if limited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_quota: Option<u32>,
}

/// A tenant owns projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Tenant {
    /// Tenant ID.
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
