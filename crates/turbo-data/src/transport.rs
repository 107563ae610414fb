//! Transports that actually move requests over the wire.
//!
//! [`FetchClient`](crate::FetchClient) only builds requests; the transport
//! decides how they are delivered. Production code uses [`ReqwestTransport`],
//! tests use [`ScriptedTransport`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{FetchError, Method, Request, Response};

/// Sends a built request and returns the raw response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, FetchError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        (**self).send(request).await
    }
}

/// Transport backed by a shared `reqwest::Client`.
#[cfg(feature = "reqwest")]
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(feature = "reqwest")]
impl ReqwestTransport {
    /// Create a transport with a per-request timeout.
    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::RequestError(e.to_string()))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "reqwest")]
#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else if e.is_builder() {
                FetchError::InvalidUrl(e.to_string())
            } else {
                FetchError::RequestError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::RequestError(e.to_string()))?
            .to_vec();

        Ok(Response::new(status, headers, body))
    }
}

/// In-memory transport that replays queued responses and records requests.
///
/// Responses are handed out in FIFO order regardless of URL. When the queue
/// is empty every request fails with a `RequestError`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Result<Response, FetchError>>>>,
    sent: Arc<Mutex<Vec<Request>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `200` JSON reply.
    pub fn reply_json(&self, value: serde_json::Value) -> &Self {
        self.reply(Ok(Response::json_ok(&value)))
    }

    /// Queue an arbitrary reply.
    pub fn reply(&self, reply: Result<Response, FetchError>) -> &Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
        self
    }

    /// Queue a transport failure.
    pub fn fail(&self, message: &str) -> &Self {
        self.reply(Err(FetchError::RequestError(message.to_string())))
    }

    /// Requests sent so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        tracing::trace!(method = %request.method, url = %request.url, "scripted send");
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request);
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front())
            .unwrap_or_else(|| Err(FetchError::RequestError("no scripted reply".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let transport = ScriptedTransport::new();
        transport
            .reply_json(serde_json::json!({"n": 1}))
            .fail("connection reset");

        let first = transport
            .send(Request::new(Method::Get, "/a"))
            .await
            .unwrap();
        assert_eq!(first.json::<serde_json::Value>().unwrap()["n"], 1);

        let second = transport
            .send(Request::new(Method::Get, "/b"))
            .await;
        assert!(matches!(second, Err(FetchError::RequestError(_))));

        let paths: Vec<_> = transport
            .requests()
            .iter()
            .map(|r| r.path().to_string())
            .collect();
        assert_eq!(paths, vec!["/a", "/b"]);
    }

    #[tokio::test]
    async fn test_empty_script_fails() {
        let transport = ScriptedTransport::new();
        let result = transport
            .send(Request::new(Method::Get, "/api/cart"))
            .await;
        assert!(matches!(result, Err(FetchError::RequestError(_))));
    }
}
