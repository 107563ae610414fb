//! Async HTTP plumbing shared by the storefront crates.
//!
//! [`FetchClient`] resolves URLs against an optional origin; delivery is
//! left to an [`HttpTransport`]. The
//! storefront talks to same-origin JSON endpoints, so the client is
//! small: `GET` for reads, `POST` with a JSON body for writes.
//!
//! ```rust,ignore
//! use turbo_data::{FetchClient, ReqwestTransport};
//!
//! let api = FetchClient::new(ReqwestTransport::default())
//!     .with_base_url("https://shop.example");
//!
//! let cart: serde_json::Value = api.get("/api/cart").send().await?.json()?;
//! let cart: serde_json::Value = api
//!     .post("/api/cart/add")
//!     .json(&serde_json::json!({ "id": "sku-1", "qty": 1 }))?
//!     .send()
//!     .await?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;
mod transport;

use std::fmt;
use std::sync::Arc;

pub use error::FetchError;
pub use request::{Method, Request};
pub use response::Response;
pub use transport::{HttpTransport, ScriptedTransport};

#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;

/// Handle for issuing requests. Clones share one transport.
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn HttpTransport>,
    origin: Option<String>,
}

impl fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchClient")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl FetchClient {
    pub fn new(transport: impl HttpTransport + 'static) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    pub fn from_shared(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            origin: None,
        }
    }

    /// Origin prepended to relative paths. An empty string means same origin.
    pub fn with_base_url(mut self, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        self.origin = (!origin.is_empty()).then(|| origin.trim_end_matches('/').to_string());
        self
    }

    pub fn get(&self, url: impl Into<String>) -> PendingRequest {
        self.request(Method::Get, url)
    }

    pub fn post(&self, url: impl Into<String>) -> PendingRequest {
        self.request(Method::Post, url)
    }

    pub fn request(&self, method: Method, url: impl Into<String>) -> PendingRequest {
        PendingRequest {
            request: Request::new(method, self.resolve(url.into())),
            transport: Arc::clone(&self.transport),
        }
    }

    fn resolve(&self, url: String) -> String {
        let absolute = url.starts_with("http://") || url.starts_with("https://");
        match &self.origin {
            Some(origin) if !absolute => format!("{origin}{url}"),
            _ => url,
        }
    }
}

/// A request waiting to be sent through its client's transport.
#[must_use = "requests do nothing until `send` is awaited"]
pub struct PendingRequest {
    request: Request,
    transport: Arc<dyn HttpTransport>,
}

impl PendingRequest {
    fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request = self.request.with_header(name, value);
        self
    }

    pub fn accept(self, media_type: impl Into<String>) -> Self {
        self.header("Accept", media_type)
    }

    pub fn json<T: serde::Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, FetchError> {
        self.request = self.request.with_json(payload)?;
        Ok(self)
    }

    pub async fn send(self) -> Result<Response, FetchError> {
        let Self { request, transport } = self;
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        transport.send(request).await
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, HttpTransport, Method, Response};
}
