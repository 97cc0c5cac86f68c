//! Upload-and-share facade
//!
//! Composes strategy-selected upload and link creation into one operation,
//! in a personal-drive and a shared-site variant. The only swallowed failure
//! in the crate lives here: when per-recipient sharing is requested and the
//! member lookup fails or resolves nobody, the link downgrades to
//! organization scope without surfacing an error.

use crate::chat::ChatMember;
use crate::client::{GraphClient, UploadTarget};
use crate::error::{Error, Result};
use crate::sharing::LinkScope;
use tracing::{debug, info, warn};

/// A stored item together with its sharing link
#[derive(Debug, Clone)]
pub struct SharedUpload {
    pub id: String,
    /// Browsable URL of the stored item
    pub web_url: String,
    /// Shareable URL granting view access
    pub share_url: String,
    pub name: String,
}

/// Who a shared-site upload should be visible to
#[derive(Debug, Clone)]
pub enum ShareAudience {
    /// Organization-wide link
    Organization,
    /// Per-recipient link for the members of a conversation, downgrading to
    /// organization scope when nobody can be resolved
    ChatMembers { chat_id: String },
}

impl GraphClient {
    /// Upload to the personal drive and create a sharing link.
    ///
    /// `scope` may be organization-wide or anonymous; per-recipient links are
    /// only available on the shared-site variant.
    pub async fn publish_to_personal_drive(
        &self,
        name: &str,
        bytes: &[u8],
        content_type: Option<&str>,
        scope: LinkScope,
    ) -> Result<SharedUpload> {
        if scope == LinkScope::Users {
            return Err(Error::InvalidInput(
                "per-recipient sharing is only supported for site drives".to_string(),
            ));
        }

        let target = UploadTarget::PersonalDrive;
        let item = self.upload(&target, name, bytes, content_type).await?;
        let link = self
            .create_sharing_link(&target, &item.id, scope, &[])
            .await?;

        info!(name = %item.name, scope = %link.scope, "published to personal drive");

        Ok(SharedUpload {
            id: item.id,
            web_url: item.web_url,
            share_url: link.web_url,
            name: item.name,
        })
    }

    /// Upload to a shared-site drive and create a sharing link.
    ///
    /// For [`ShareAudience::ChatMembers`] the member lookup is attempted as
    /// an explicit decision step: at least one resolvable member yields a
    /// per-recipient link; a lookup failure or an empty conversation falls
    /// back to an organization link and the failure is not surfaced.
    pub async fn publish_to_site_drive(
        &self,
        site_id: &str,
        name: &str,
        bytes: &[u8],
        content_type: Option<&str>,
        audience: ShareAudience,
    ) -> Result<SharedUpload> {
        let target = UploadTarget::SiteDrive {
            site_id: site_id.to_string(),
        };
        let item = self.upload(&target, name, bytes, content_type).await?;

        let (scope, recipients): (LinkScope, Vec<ChatMember>) = match audience {
            ShareAudience::Organization => (LinkScope::Organization, Vec::new()),
            ShareAudience::ChatMembers { chat_id } => match self.chat_members(&chat_id).await {
                Ok(members) if !members.is_empty() => (LinkScope::Users, members),
                Ok(_) => {
                    debug!(
                        chat_id = %chat_id,
                        "conversation has no resolvable members, using organization link"
                    );
                    (LinkScope::Organization, Vec::new())
                }
                Err(err) => {
                    warn!(chat_id = %chat_id, error = %err, "member lookup failed, using organization link");
                    (LinkScope::Organization, Vec::new())
                }
            },
        };

        let link = self
            .create_sharing_link(&target, &item.id, scope, &recipients)
            .await?;

        info!(name = %item.name, scope = %link.scope, site_id, "published to site drive");

        Ok(SharedUpload {
            id: item.id,
            web_url: item.web_url,
            share_url: link.web_url,
            name: item.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::client_with;
    use crate::http::testing::{response, FakeTransport};
    use crate::http::RequestBody;
    use std::sync::Arc;

    fn item_json() -> &'static str {
        r#"{"id":"item1","webUrl":"https://drive.test/item1","name":"f.txt"}"#
    }

    fn link_json() -> &'static str {
        r#"{"link":{"webUrl":"https://share.test/abc"}}"#
    }

    fn members_json() -> &'static str {
        r#"{"value":[{"userId":"u1","displayName":"Ada"}]}"#
    }

    fn request_json(body: &RequestBody) -> serde_json::Value {
        match body {
            RequestBody::Json(v) => v.clone(),
            other => panic!("expected json body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_personal_publish() {
        let fake = Arc::new(FakeTransport::new(vec![
            response(200, item_json()),
            response(200, link_json()),
        ]));
        let client = client_with(fake.clone());

        let shared = client
            .publish_to_personal_drive("f.txt", b"hello", None, LinkScope::Organization)
            .await
            .unwrap();

        assert_eq!(shared.id, "item1");
        assert_eq!(shared.web_url, "https://drive.test/item1");
        assert_eq!(shared.share_url, "https://share.test/abc");
        assert_eq!(shared.name, "f.txt");

        // Small payload: one content PUT, one createLink POST
        let requests = fake.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].url.ends_with("/root:/f.txt:/content"));
        assert!(requests[1].url.ends_with("/items/item1/createLink"));
    }

    #[tokio::test]
    async fn test_personal_publish_rejects_per_recipient_scope() {
        let fake = Arc::new(FakeTransport::new(vec![]));
        let client = client_with(fake.clone());

        let err = client
            .publish_to_personal_drive("f.txt", b"hello", None, LinkScope::Users)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(fake.request_count(), 0);
    }

    #[tokio::test]
    async fn test_site_publish_with_resolvable_members() {
        let fake = Arc::new(FakeTransport::new(vec![
            response(200, item_json()),
            response(200, members_json()),
            response(200, link_json()),
        ]));
        let client = client_with(fake.clone());

        let shared = client
            .publish_to_site_drive(
                "site1",
                "f.txt",
                b"hello",
                None,
                ShareAudience::ChatMembers {
                    chat_id: "chat1".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(shared.share_url, "https://share.test/abc");

        let requests = fake.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests[1].url.ends_with("/chats/chat1/members"));
        // Per-recipient link goes through the preview root
        assert!(requests[2].url.starts_with("https://graph.microsoft.com/beta/"));
        let body = request_json(&requests[2].body);
        assert_eq!(body["scope"], "users");
        assert_eq!(body["recipients"][0]["objectId"], "u1");
    }

    #[tokio::test]
    async fn test_site_publish_falls_back_when_lookup_fails() {
        let fake = Arc::new(FakeTransport::new(vec![
            response(200, item_json()),
            response(403, "forbidden"),
            response(200, link_json()),
        ]));
        let client = client_with(fake.clone());

        let shared = client
            .publish_to_site_drive(
                "site1",
                "f.txt",
                b"hello",
                None,
                ShareAudience::ChatMembers {
                    chat_id: "chat1".to_string(),
                },
            )
            .await
            .unwrap();

        // The lookup failure is swallowed; the link downgrades to organization
        assert_eq!(shared.share_url, "https://share.test/abc");

        let requests = fake.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests[2].url.starts_with("https://graph.microsoft.com/v1.0/"));
        let body = request_json(&requests[2].body);
        assert_eq!(body["scope"], "organization");
        assert!(body.get("recipients").is_none());
    }

    #[tokio::test]
    async fn test_site_publish_falls_back_on_empty_conversation() {
        let fake = Arc::new(FakeTransport::new(vec![
            response(200, item_json()),
            response(200, r#"{"value":[]}"#),
            response(200, link_json()),
        ]));
        let client = client_with(fake.clone());

        client
            .publish_to_site_drive(
                "site1",
                "f.txt",
                b"hello",
                None,
                ShareAudience::ChatMembers {
                    chat_id: "chat1".to_string(),
                },
            )
            .await
            .unwrap();

        let requests = fake.requests.lock().unwrap();
        let body = request_json(&requests[2].body);
        assert_eq!(body["scope"], "organization");
    }

    #[tokio::test]
    async fn test_site_publish_organization_audience_skips_lookup() {
        let fake = Arc::new(FakeTransport::new(vec![
            response(200, item_json()),
            response(200, link_json()),
        ]));
        let client = client_with(fake.clone());

        client
            .publish_to_site_drive("site1", "f.txt", b"hello", None, ShareAudience::Organization)
            .await
            .unwrap();

        let requests = fake.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0]
            .url
            .starts_with("https://graph.microsoft.com/v1.0/sites/site1/drive/"));
    }

    #[tokio::test]
    async fn test_upload_failure_propagates_unmodified() {
        let fake = Arc::new(FakeTransport::new(vec![response(507, "quota")]));
        let client = client_with(fake.clone());

        let err = client
            .publish_to_personal_drive("f.txt", b"hello", None, LinkScope::Organization)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http { status: 507, .. }));
        assert_eq!(fake.request_count(), 1);
    }

    #[tokio::test]
    async fn test_link_failure_propagates() {
        let fake = Arc::new(FakeTransport::new(vec![
            response(200, item_json()),
            response(500, "boom"),
        ]));
        let client = client_with(fake);

        let err = client
            .publish_to_personal_drive("f.txt", b"hello", None, LinkScope::Anonymous)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http { status: 500, .. }));
    }
}
