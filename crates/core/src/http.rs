//! HTTP transport boundary
//!
//! Every network call in this crate goes through the [`HttpTransport`] trait
//! so the protocol logic can be exercised against canned responses. The
//! production implementation is [`ReqwestTransport`].

use crate::error::Result;
use async_trait::async_trait;
use reqwest::Method;

/// Body of an outgoing request
#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Bytes(Vec<u8>),
}

/// An outgoing request, fully assembled by the caller
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn bytes(mut self, body: Vec<u8>) -> Self {
        self.body = RequestBody::Bytes(body);
        self
    }
}

/// A response as seen by the protocol layer
///
/// Non-success statuses are returned as responses, not errors: the resumable
/// upload loop needs to branch on 200/201 vs 202 vs everything else.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport abstraction over the HTTP client
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request and return the response, whatever its status.
    /// Errors are reserved for transport-level failures (connect, timeout).
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Production transport backed by reqwest
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.request(request.method, &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Bytes(bytes) => builder.body(bytes),
        };

        let response = builder.send().await?;
        let status = response.status();

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            // Best-effort: an unreadable body becomes empty text
            body: response.text().await.unwrap_or_default(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::new(Method::PUT, "https://example.test/upload")
            .header("Content-Type", "text/plain")
            .bytes(vec![1, 2, 3]);

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.url, "https://example.test/upload");
        assert_eq!(request.headers.len(), 1);
        assert!(matches!(request.body, RequestBody::Bytes(ref b) if b.len() == 3));
    }

    #[test]
    fn test_response_success_range() {
        let ok = HttpResponse {
            status: 202,
            status_text: "Accepted".to_string(),
            body: String::new(),
        };
        let err = HttpResponse {
            status: 404,
            status_text: "Not Found".to_string(),
            body: String::new(),
        };

        assert!(ok.is_success());
        assert!(!err.is_success());
    }

    #[test]
    fn test_fake_transport_order_and_recording() {
        let fake = testing::FakeTransport::new(vec![
            testing::response(202, ""),
            testing::response(201, "{}"),
        ]);

        let first = tokio_test::block_on(
            fake.send(HttpRequest::new(Method::PUT, "https://example.test/a")),
        )
        .unwrap();
        let second = tokio_test::block_on(
            fake.send(HttpRequest::new(Method::PUT, "https://example.test/b")),
        )
        .unwrap();

        assert_eq!(first.status, 202);
        assert_eq!(second.status, 201);
        assert_eq!(fake.request_count(), 2);
    }
}
