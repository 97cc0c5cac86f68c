//! Sharing links for stored drive items

use crate::chat::ChatMember;
use crate::client::{GraphClient, UploadTarget};
use crate::error::{Error, Result};
use serde::Deserialize;

/// Visibility of a sharing link, fixed at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope {
    /// Anyone in the organization
    Organization,
    /// Anyone holding the link
    Anonymous,
    /// Only the named recipients
    Users,
}

impl LinkScope {
    pub fn as_str(&self) -> &str {
        match self {
            LinkScope::Organization => "organization",
            LinkScope::Anonymous => "anonymous",
            LinkScope::Users => "users",
        }
    }
}

impl std::fmt::Display for LinkScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A view link to a stored item
#[derive(Debug, Clone)]
pub struct SharingLink {
    pub web_url: String,
    pub scope: LinkScope,
}

#[derive(Debug, Deserialize)]
struct CreateLinkBody {
    link: Option<LinkBody>,
}

#[derive(Debug, Deserialize)]
struct LinkBody {
    #[serde(rename = "webUrl")]
    web_url: Option<String>,
}

impl GraphClient {
    /// Create a view link for a stored item.
    ///
    /// Per-recipient links go through the preview API root, which accepts a
    /// recipient list; the other scopes use the stable root. A `Users` scope
    /// with no recipients is rejected before any request is made.
    pub async fn create_sharing_link(
        &self,
        target: &UploadTarget,
        item_id: &str,
        scope: LinkScope,
        recipients: &[ChatMember],
    ) -> Result<SharingLink> {
        if scope == LinkScope::Users && recipients.is_empty() {
            return Err(Error::InvalidInput(
                "per-recipient sharing requires at least one recipient".to_string(),
            ));
        }

        let item_url = match scope {
            LinkScope::Users => self.item_id_preview_url(target, item_id),
            _ => self.item_id_url(target, item_id),
        };
        let url = format!("{}/createLink", item_url);

        let mut body = serde_json::json!({
            "type": "view",
            "scope": scope.as_str(),
        });
        if scope == LinkScope::Users {
            let list: Vec<serde_json::Value> = recipients
                .iter()
                .map(|m| serde_json::json!({ "objectId": m.id.as_str() }))
                .collect();
            body["recipients"] = serde_json::Value::Array(list);
        }

        let response = self.post_json(&url, body).await?;
        if !response.is_success() {
            return Err(Self::http_error(response));
        }

        let parsed: CreateLinkBody = serde_json::from_str(&response.body)?;
        let web_url = parsed
            .link
            .and_then(|l| l.web_url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                Error::Validation("createLink response missing link.webUrl".to_string())
            })?;

        Ok(SharingLink { web_url, scope })
    }
}
