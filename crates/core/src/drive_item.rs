//! Drive item property fetch
//!
//! Rendering metadata for an already-uploaded item, as required by card
//! rendering at the host layer. All three fields are mandatory; partial data
//! is a contract violation.

use crate::client::{GraphClient, UploadTarget};
use crate::error::{Error, Result};
use serde::Deserialize;

/// Rendering metadata of a stored item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveItemProperties {
    /// Opaque version marker, used as a stable attachment identifier
    pub etag: String,
    /// Direct file-system URL of the item
    pub web_dav_url: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ItemPropertiesBody {
    #[serde(rename = "eTag")]
    etag: Option<String>,
    #[serde(rename = "webDavUrl")]
    web_dav_url: Option<String>,
    name: Option<String>,
}

impl GraphClient {
    /// Fetch entity tag, direct-access URL and name for a stored item
    pub async fn item_properties(
        &self,
        target: &UploadTarget,
        item_id: &str,
    ) -> Result<DriveItemProperties> {
        let url = format!(
            "{}?$select=eTag,webDavUrl,name",
            self.item_id_url(target, item_id)
        );
        let response = self.get(&url).await?;

        if !response.is_success() {
            return Err(Self::http_error(response));
        }

        let body: ItemPropertiesBody = serde_json::from_str(&response.body)?;
        let etag = body
            .etag
            .ok_or_else(|| Error::Validation("item properties missing eTag".to_string()))?;
        let web_dav_url = body
            .web_dav_url
            .ok_or_else(|| Error::Validation("item properties missing webDavUrl".to_string()))?;
        let name = body
            .name
            .ok_or_else(|| Error::Validation("item properties missing name".to_string()))?;

        Ok(DriveItemProperties {
            etag,
            web_dav_url,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::client_with;
    use crate::http::testing::{response, FakeTransport};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fetches_all_three_fields() {
        let fake = Arc::new(FakeTransport::new(vec![response(
            200,
            r#"{"eTag":"\"v1\"","webDavUrl":"https://dav.test/f.pdf","name":"f.pdf"}"#,
        )]));
        let client = client_with(fake.clone());

        let properties = client
            .item_properties(
                &UploadTarget::SiteDrive {
                    site_id: "site1".to_string(),
                },
                "item1",
            )
            .await
            .unwrap();

        assert_eq!(
            properties,
            DriveItemProperties {
                etag: "\"v1\"".to_string(),
                web_dav_url: "https://dav.test/f.pdf".to_string(),
                name: "f.pdf".to_string(),
            }
        );

        let requests = fake.requests.lock().unwrap();
        assert_eq!(
            requests[0].url,
            "https://graph.microsoft.com/v1.0/sites/site1/drive/items/item1?$select=eTag,webDavUrl,name"
        );
    }

    #[tokio::test]
    async fn test_partial_data_is_validation_error() {
        let fake = Arc::new(FakeTransport::new(vec![response(
            200,
            r#"{"eTag":"\"v1\"","name":"f.pdf"}"#,
        )]));
        let client = client_with(fake);

        let err = client
            .item_properties(&UploadTarget::PersonalDrive, "item1")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
    }
}
