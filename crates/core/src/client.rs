//! Graph API client
//!
//! [`GraphClient`] owns the two injected collaborators (HTTP transport and
//! token provider) and knows how to address drive items under either a
//! personal drive or a named shared-site drive. The per-concern operations
//! (upload, sharing, chat members, item properties) live in their own modules
//! as `impl GraphClient` blocks.

use crate::error::{Error, Result};
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;

/// Stable API root
pub const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Preview API root, used for the more permissive link-creation surface
pub const DEFAULT_PREVIEW_BASE_URL: &str = "https://graph.microsoft.com/beta";

/// Audience the bearer token must be scoped to
pub const DEFAULT_TOKEN_AUDIENCE: &str = "https://graph.microsoft.com";

/// Produces bearer tokens for a given audience
///
/// Opaque collaborator: caching and refresh are its own business. The client
/// requests a token once per outgoing call.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self, audience: &str) -> Result<String>;
}

/// Which backing drive an upload addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadTarget {
    /// The caller's personal drive
    PersonalDrive,
    /// The default drive of a named shared site
    SiteDrive { site_id: String },
}

impl UploadTarget {
    /// Path segment addressing the target drive, relative to an API root
    pub(crate) fn drive_path(&self) -> String {
        match self {
            UploadTarget::PersonalDrive => "me/drive".to_string(),
            UploadTarget::SiteDrive { site_id } => format!("sites/{}/drive", site_id),
        }
    }
}

/// Client for the drive and chat APIs
pub struct GraphClient {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
    preview_base_url: String,
    audience: String,
}

impl GraphClient {
    /// Create a client against the default API roots
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            transport,
            tokens,
            base_url: DEFAULT_BASE_URL.to_string(),
            preview_base_url: DEFAULT_PREVIEW_BASE_URL.to_string(),
            audience: DEFAULT_TOKEN_AUDIENCE.to_string(),
        }
    }

    /// Create a client with endpoint roots and audience from configuration
    pub fn from_config(
        config: &crate::config::GraphConfig,
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            transport,
            tokens,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            preview_base_url: config.preview_base_url.trim_end_matches('/').to_string(),
            audience: config.token_audience.clone(),
        }
    }

    /// Get the stable API root
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the preview API root
    pub fn preview_base_url(&self) -> &str {
        &self.preview_base_url
    }

    // === URL construction ===

    /// Path-addressed item URL, e.g. `{root}/me/drive/root:/report.pdf:`
    pub(crate) fn item_path_url(&self, target: &UploadTarget, name: &str) -> String {
        format!("{}/{}/root:/{}:", self.base_url, target.drive_path(), name)
    }

    /// Id-addressed item URL under the stable root
    pub(crate) fn item_id_url(&self, target: &UploadTarget, item_id: &str) -> String {
        format!("{}/{}/items/{}", self.base_url, target.drive_path(), item_id)
    }

    /// Id-addressed item URL under the preview root
    pub(crate) fn item_id_preview_url(&self, target: &UploadTarget, item_id: &str) -> String {
        format!(
            "{}/{}/items/{}",
            self.preview_base_url,
            target.drive_path(),
            item_id
        )
    }

    // === Request plumbing ===

    /// Attach a freshly acquired bearer token and send
    pub(crate) async fn send_authorized(&self, request: HttpRequest) -> Result<HttpResponse> {
        let token = self.tokens.access_token(&self.audience).await?;
        let request = request.header("Authorization", format!("Bearer {}", token));
        self.transport.send(request).await
    }

    pub(crate) async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.send_authorized(HttpRequest::new(Method::GET, url)).await
    }

    pub(crate) async fn post_json(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<HttpResponse> {
        self.send_authorized(
            HttpRequest::new(Method::POST, url)
                .header("Content-Type", "application/json")
                .json(body),
        )
        .await
    }

    pub(crate) async fn put_bytes(
        &self,
        url: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<HttpResponse> {
        self.send_authorized(
            HttpRequest::new(Method::PUT, url)
                .header("Content-Type", content_type)
                .bytes(bytes),
        )
        .await
    }

    /// Turn a non-success response into the error it represents
    pub(crate) fn http_error(response: HttpResponse) -> Error {
        Error::Http {
            status: response.status,
            status_text: response.status_text,
            body: response.body,
        }
    }
}
