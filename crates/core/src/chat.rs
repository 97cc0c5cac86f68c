//! Chat member resolution
//!
//! Used to compute per-recipient sharing lists. Members are fetched fresh on
//! every call and never cached; entries without a resolvable directory object
//! id are dropped silently.

use crate::client::GraphClient;
use crate::error::Result;
use serde::Deserialize;

/// A directory identity participating in a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMember {
    /// Directory object id, usable as a sharing recipient key
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MemberListBody {
    #[serde(default)]
    value: Vec<MemberBody>,
}

#[derive(Debug, Deserialize)]
struct MemberBody {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

impl GraphClient {
    /// List the resolvable members of a conversation.
    ///
    /// An empty conversation yields `Ok(vec![])`. An HTTP failure (for
    /// example insufficient permission) propagates as an error; any fallback
    /// policy belongs to the caller.
    pub async fn chat_members(&self, chat_id: &str) -> Result<Vec<ChatMember>> {
        let url = format!("{}/chats/{}/members", self.base_url(), chat_id);
        let response = self.get(&url).await?;

        if !response.is_success() {
            return Err(Self::http_error(response));
        }

        let body: MemberListBody = serde_json::from_str(&response.body)?;
        let members = body
            .value
            .into_iter()
            .filter_map(|m| {
                m.user_id.map(|id| ChatMember {
                    id,
                    display_name: m.display_name,
                })
            })
            .collect();

        Ok(members)
    }
}
