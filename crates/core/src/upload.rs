//! Drive uploads: single-shot for small payloads, resumable byte-range
//! sessions for everything else.
//!
//! A resumable session is created, fed strictly sequential contiguous chunks,
//! and finalized by the server with a 200/201 carrying the stored item. The
//! session lives only for the duration of one call and is never persisted;
//! there is no retry, no backoff, and no resume across process restarts.

use crate::client::{GraphClient, UploadTarget};
use crate::error::{Error, Result};
use crate::http::HttpRequest;
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

/// Largest payload that goes through the single-shot path
pub const SIMPLE_UPLOAD_LIMIT: u64 = 4 * 1024 * 1024;

/// Chunk size for resumable sessions: 12 x 320 KiB. The server requires every
/// non-final chunk to be a multiple of 320 KiB.
pub const UPLOAD_CHUNK_SIZE: u64 = 12 * 320 * 1024;

/// Content type used when the caller does not provide one
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Check if a payload must take the resumable path
pub fn requires_resumable_upload(size: u64) -> bool {
    size > SIMPLE_UPLOAD_LIMIT
}

/// Identity of a stored item, produced exactly once per successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub id: String,
    pub web_url: String,
    pub name: String,
}

/// An open resumable session: the server-allocated endpoint plus the declared
/// payload size. Owned by one upload call, never shared or persisted.
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub upload_url: String,
    pub total: u64,
}

/// Byte offset into the payload; advances only on server-confirmed acceptance
#[derive(Debug, Clone, Copy)]
pub struct UploadProgress {
    offset: u64,
    total: u64,
}

impl UploadProgress {
    pub fn new(total: u64) -> Self {
        Self { offset: 0, total }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.offset >= self.total
    }

    /// End of the next chunk to submit
    pub fn next_chunk_end(&self) -> u64 {
        (self.offset + UPLOAD_CHUNK_SIZE).min(self.total)
    }

    /// Advance to `offset`; never moves backwards or past the total
    pub(crate) fn advance_to(&mut self, offset: u64) {
        debug_assert!(offset >= self.offset, "upload offset went backwards");
        self.offset = offset.min(self.total);
    }
}

/// Wire shape of a stored drive item
#[derive(Debug, Deserialize)]
struct DriveItemBody {
    id: Option<String>,
    #[serde(rename = "webUrl", alias = "url")]
    web_url: Option<String>,
    name: Option<String>,
}

/// Wire shape of a createUploadSession response
#[derive(Debug, Deserialize)]
struct UploadSessionBody {
    #[serde(rename = "uploadUrl")]
    upload_url: Option<String>,
}

/// Parse a success body into an [`UploadResult`]; every field is mandatory
fn parse_upload_result(body: &str) -> Result<UploadResult> {
    let item: DriveItemBody = serde_json::from_str(body)?;
    let id = item
        .id
        .ok_or_else(|| Error::Validation("upload response missing item id".to_string()))?;
    let web_url = item
        .web_url
        .ok_or_else(|| Error::Validation("upload response missing web URL".to_string()))?;
    let name = item
        .name
        .ok_or_else(|| Error::Validation("upload response missing item name".to_string()))?;
    Ok(UploadResult { id, web_url, name })
}

impl GraphClient {
    /// Upload a payload, picking the single-shot or resumable path by size
    pub async fn upload(
        &self,
        target: &UploadTarget,
        name: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<UploadResult> {
        if requires_resumable_upload(bytes.len() as u64) {
            self.upload_resumable(target, name, bytes).await
        } else {
            self.upload_simple(target, name, bytes, content_type).await
        }
    }

    /// One-shot upload for payloads at or below [`SIMPLE_UPLOAD_LIMIT`]
    pub async fn upload_simple(
        &self,
        target: &UploadTarget,
        name: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<UploadResult> {
        let url = format!("{}/content", self.item_path_url(target, name));
        let response = self
            .put_bytes(
                &url,
                bytes.to_vec(),
                content_type.unwrap_or(FALLBACK_CONTENT_TYPE),
            )
            .await?;

        if !response.is_success() {
            return Err(Self::http_error(response));
        }

        parse_upload_result(&response.body)
    }

    /// Ask the target drive for a resumable session endpoint
    pub async fn create_upload_session(
        &self,
        target: &UploadTarget,
        name: &str,
        total: u64,
    ) -> Result<UploadSession> {
        let url = format!("{}/createUploadSession", self.item_path_url(target, name));
        let response = self
            .post_json(&url, serde_json::json!({ "item": { "name": name } }))
            .await?;

        if !response.is_success() {
            return Err(Self::http_error(response));
        }

        let body: UploadSessionBody = serde_json::from_str(&response.body)?;
        let upload_url = body.upload_url.ok_or_else(|| {
            Error::Validation("createUploadSession response missing uploadUrl".to_string())
        })?;

        Ok(UploadSession { upload_url, total })
    }

    /// Resumable upload: session creation, then ordered contiguous chunks.
    ///
    /// Status handling per chunk: 200/201 means the server finalized the item
    /// and is authoritative even with bytes notionally remaining; 202 means
    /// the range was accepted and the next chunk may follow; anything else
    /// aborts the session at the current offset.
    pub async fn upload_resumable(
        &self,
        target: &UploadTarget,
        name: &str,
        bytes: &[u8],
    ) -> Result<UploadResult> {
        let total = bytes.len() as u64;
        let session = self.create_upload_session(target, name, total).await?;
        let mut progress = UploadProgress::new(total);

        while !progress.is_complete() {
            let start = progress.offset();
            let end = progress.next_chunk_end();
            let chunk = bytes[start as usize..end as usize].to_vec();

            debug!(start, end, total, "submitting chunk");

            let request = HttpRequest::new(Method::PUT, &session.upload_url)
                .header("Content-Length", chunk.len().to_string())
                .header(
                    "Content-Range",
                    format!("bytes {}-{}/{}", start, end - 1, total),
                )
                .bytes(chunk);
            let response = self.send_authorized(request).await?;

            match response.status {
                200 | 201 => return parse_upload_result(&response.body),
                202 => progress.advance_to(end),
                status => {
                    return Err(Error::Protocol {
                        offset: start,
                        status,
                        body: response.body,
                    })
                }
            }
        }

        // The server is expected to finalize on or before the last chunk
        Err(Error::SessionExhausted { total })
    }
}
