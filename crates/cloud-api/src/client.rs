//! HTTP client for the control-plane API.
//!
//! # Example
//!
//! ```rust,no_run
//! use cloud_api::ApiClient;
//! use cloud_api::models::ClusterFilter;
//!
//! # async fn example() -> Result<(), cloud_api::ApiError> {
//! let client = ApiClient::builder("https://api.example.com").token("secret").build()?;
//! let clusters = client.list_clusters(&ClusterFilter::default()).await?;
//! println!("clusters: {}", clusters.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::ApiError;
use crate::models::{
    AuditFilter, AuditTrace, ClusterFilter, ClusterResponse, ClusterUsageResponse, Health,
    Postgres, PostgresFilter, Project, S3Credentials, S3ListRequest, Tenant, UsageRequest,
    Version, Volume, VolumeFilter,
};

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiClientBuilder {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl ApiClientBuilder {
    /// Authenticate every request with this bearer token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Authenticate with the token if one is given.
    #[must_use]
    pub fn maybe_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or is not `http(s)`.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let mut base_url = Url::parse(&self.base_url).map_err(|e| ApiError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl {
                url: self.base_url,
                reason: "scheme must be http or https".into(),
            });
        }

        // Url::join replaces the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("cloudctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport {
                path: String::new(),
                source: e,
            })?;

        Ok(ApiClient {
            http,
            base_url,
            token: self.token,
        })
    }
}

/// Async client for the control-plane API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Start building a client for the API at `base_url`.
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Create an unauthenticated client with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::builder(base_url).build()
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })?;

        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        trace!(path, "sending request");
        let response = request.send().await.map_err(|e| ApiError::Transport {
            path: path.to_string(),
            source: e,
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| ApiError::Transport {
            path: path.to_string(),
            source: e,
        })?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
            debug!(path, status = status.as_u16(), %message, "request rejected");
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            source: e,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path)?;
        self.send(request, path).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(request, path).await
    }

    // ========================================================================
    // Meta
    // ========================================================================

    /// Fetch the API health.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn health(&self) -> Result<Health, ApiError> {
        self.get("/v1/health").await
    }

    /// Fetch the API version.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn version(&self) -> Result<Version, ApiError> {
        self.get("/v1/version").await
    }

    // ========================================================================
    // Clusters
    // ========================================================================

    /// Find clusters matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_clusters(
        &self,
        filter: &ClusterFilter,
    ) -> Result<Vec<ClusterResponse>, ApiError> {
        self.post("/v1/cluster/find", filter).await
    }

    /// Fetch one cluster.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the cluster does not exist.
    pub async fn get_cluster(&self, id: &str) -> Result<ClusterResponse, ApiError> {
        self.get(&format!("/v1/cluster/{id}")).await
    }

    // ========================================================================
    // Projects and tenants
    // ========================================================================

    /// List projects, optionally restricted to one tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_projects(&self, tenant: Option<&str>) -> Result<Vec<Project>, ApiError> {
        let path = "/v1/project";
        let mut request = self.request(Method::GET, path)?;
        if let Some(tenant) = tenant {
            request = request.query(&[("tenant", tenant)]);
        }
        self.send(request, path).await
    }

    /// Fetch one project.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the project does not exist.
    pub async fn get_project(&self, id: &str) -> Result<Project, ApiError> {
        self.get(&format!("/v1/project/{id}")).await
    }

    /// List tenants visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, ApiError> {
        self.get("/v1/tenant").await
    }

    // ========================================================================
    // Storage and databases
    // ========================================================================

    /// Find postgres databases matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_postgres(&self, filter: &PostgresFilter) -> Result<Vec<Postgres>, ApiError> {
        self.post("/v1/database/postgres/find", filter).await
    }

    /// Fetch one postgres database.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the database does not exist.
    pub async fn get_postgres(&self, id: &str) -> Result<Postgres, ApiError> {
        self.get(&format!("/v1/database/postgres/{id}")).await
    }

    /// List S3 users of a partition.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_s3(&self, partition: &str) -> Result<Vec<S3Credentials>, ApiError> {
        let body = S3ListRequest {
            partition: partition.to_string(),
        };
        self.post("/v1/s3/list", &body).await
    }

    /// Find volumes matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_volumes(&self, filter: &VolumeFilter) -> Result<Vec<Volume>, ApiError> {
        self.post("/v1/volume/find", filter).await
    }

    // ========================================================================
    // Audit and accounting
    // ========================================================================

    /// Find audit traces matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditTrace>, ApiError> {
        self.post("/v1/audit/find", filter).await
    }

    /// Fetch cluster usage for a time window.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn cluster_usage(
        &self,
        request: &UsageRequest,
    ) -> Result<ClusterUsageResponse, ApiError> {
        self.post("/v1/accounting/cluster-usage", request).await
    }
}

/// Extract `message` from a JSON error body, falling back to the raw text.
fn error_message(body: &[u8]) -> Option<String> {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return Some(message.to_string());
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use test_case::test_case;
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}")
    }

    fn test_router() -> Router {
        Router::new()
            .route(
                "/v1/health",
                get(|| async { Json(json!({"status": "healthy"})) }),
            )
            .route(
                "/v1/version",
                get(|| async { Json(json!({"version": "v1.2.3", "gitsha1": "abc"})) }),
            )
            .route(
                "/v1/cluster/find",
                post(|Json(filter): Json<Value>| async move {
                    let tenant = filter.get("Tenant").cloned().unwrap_or(Value::Null);
                    Json(json!([
                        {"ID": "c-1", "Name": "one", "Tenant": tenant},
                        {"ID": "c-2", "Name": "two", "Tenant": tenant}
                    ]))
                }),
            )
            .route(
                "/v1/cluster/{id}",
                get(|Path(id): Path<String>| async move {
                    if id == "missing" {
                        (StatusCode::NOT_FOUND, Json(json!({"message": "cluster not found"})))
                    } else {
                        (StatusCode::OK, Json(json!({"ID": id})))
                    }
                }),
            )
            .route(
                "/v1/project",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let tenant = q.get("tenant").cloned().unwrap_or_else(|| "any".into());
                    Json(json!([{"ID": "p-1", "TenantID": tenant}]))
                }),
            )
            .route(
                "/v1/tenant",
                get(|headers: HeaderMap| async move {
                    match headers.get("authorization").and_then(|h| h.to_str().ok()) {
                        Some("Bearer secret") => (StatusCode::OK, Json(json!([{"ID": "t-1"}]))),
                        _ => (StatusCode::UNAUTHORIZED, Json(json!({"message": "missing token"}))),
                    }
                }),
            )
            .route(
                "/v1/volume/find",
                post(|| async { (StatusCode::OK, "not json") }),
            )
            .route(
                "/v1/s3/list",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "backend down") }),
            )
    }

    #[test_case("https://api.example.com" ; "https")]
    #[test_case("http://localhost:8080" ; "http with port")]
    #[test_case("https://example.com/cloud" ; "with path")]
    fn accepts_http_urls(url: &str) {
        assert!(ApiClient::new(url).is_ok());
    }

    #[test_case("ftp://example.com" ; "wrong scheme")]
    #[test_case("not a url" ; "garbage")]
    #[test_case("" ; "empty")]
    fn rejects_invalid_urls(url: &str) {
        let err = ApiClient::new(url).expect_err("should reject");
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = ApiClient::new("https://example.com/cloud").expect("valid url");
        assert_eq!(client.base_url().as_str(), "https://example.com/cloud/");
    }

    #[test]
    fn debug_hides_token() {
        let client = ApiClient::builder("https://example.com")
            .token("super-secret")
            .build()
            .expect("valid url");
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("authenticated: true"));
    }

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(error_message(br#"{"message":"nope"}"#).as_deref(), Some("nope"));
        assert_eq!(error_message(b"plain text").as_deref(), Some("plain text"));
        assert_eq!(error_message(b"  "), None);
    }

    #[tokio::test]
    async fn fetches_health_and_version() {
        let client = ApiClient::new(serve(test_router()).await).expect("client");

        let health = client.health().await.expect("health");
        assert!(health.is_healthy());

        let version = client.version().await.expect("version");
        assert_eq!(version.version, "v1.2.3");
        assert_eq!(version.git_sha1, "abc");
    }

    #[tokio::test]
    async fn posts_cluster_filter() {
        let client = ApiClient::new(serve(test_router()).await).expect("client");
        let filter = ClusterFilter {
            tenant: Some("tenant-a".into()),
            ..ClusterFilter::default()
        };

        let clusters = client.list_clusters(&filter).await.expect("clusters");

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].tenant.as_deref(), Some("tenant-a"));
        assert_eq!(clusters[1].name.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn maps_not_found() {
        let client = ApiClient::new(serve(test_router()).await).expect("client");

        let err = client.get_cluster("missing").await.expect_err("should fail");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("cluster not found"));

        let cluster = client.get_cluster("c-9").await.expect("cluster");
        assert_eq!(cluster.id.as_deref(), Some("c-9"));
    }

    #[tokio::test]
    async fn sends_tenant_query() {
        let client = ApiClient::new(serve(test_router()).await).expect("client");

        let projects = client.list_projects(Some("tenant-b")).await.expect("projects");
        assert_eq!(projects[0].tenant_id.as_deref(), Some("tenant-b"));

        let projects = client.list_projects(None).await.expect("projects");
        assert_eq!(projects[0].tenant_id.as_deref(), Some("any"));
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let url = serve(test_router()).await;

        let anonymous = ApiClient::new(url.clone()).expect("client");
        let err = anonymous.list_tenants().await.expect_err("should be rejected");
        assert!(matches!(err, ApiError::Status { status: 401, .. }));

        let authenticated = ApiClient::builder(url).token("secret").build().expect("client");
        let tenants = authenticated.list_tenants().await.expect("tenants");
        assert_eq!(tenants[0].id.as_deref(), Some("t-1"));
    }

    #[tokio::test]
    async fn reports_decode_errors() {
        let client = ApiClient::new(serve(test_router()).await).expect("client");
        let err = client
            .list_volumes(&VolumeFilter::default())
            .await
            .expect_err("should fail to decode");
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn reports_plain_text_errors() {
        let client = ApiClient::new(serve(test_router()).await).expect("client");
        let err = client.list_s3("fra-1").await.expect_err("should fail");
        match err {
            ApiError::Status { status, message, .. } => {
                assert_eq!(status, 500);
                assert_eq!(message, "backend down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn reports_transport_errors() {
        let client = ApiClient::builder("http://127.0.0.1:1")
            .timeout(Duration::from_secs(2))
            .build()
            .expect("client");
        let err = client.health().await.expect_err("should fail");
        assert!(matches!(err, ApiError::Transport { .. }));
    }
}
