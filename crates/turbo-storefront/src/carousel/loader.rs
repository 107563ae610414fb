//! Image prefetching for carousel slides.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use turbo_data::FetchClient;

use crate::error::ImageError;

/// Fetches an image so the browser cache holds it before display.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<(), ImageError>;
}

#[async_trait]
impl<T: ImageLoader + ?Sized> ImageLoader for Arc<T> {
    async fn load(&self, url: &str) -> Result<(), ImageError> {
        (**self).load(url).await
    }
}

/// Loads images over HTTP; any non-2xx status counts as a failed load.
#[derive(Debug, Clone)]
pub struct HttpImageLoader {
    http: FetchClient,
}

impl HttpImageLoader {
    pub fn new(http: FetchClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &str) -> Result<(), ImageError> {
        let response = self.http.get(url).accept("image/*").send().await?;
        if !response.is_success() {
            return Err(ImageError::Status {
                status: response.status,
            });
        }
        tracing::trace!(url, bytes = response.body.len(), "image loaded");
        Ok(())
    }
}

/// Loader that fails for a fixed set of URLs and records every request.
#[derive(Debug, Clone, Default)]
pub struct RecordingImageLoader {
    broken: Arc<Mutex<Vec<String>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl RecordingImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loads of `url` fail with a 404.
    pub fn break_url(&self, url: impl Into<String>) -> &Self {
        if let Ok(mut broken) = self.broken.lock() {
            broken.push(url.into());
        }
        self
    }

    /// URLs requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ImageLoader for RecordingImageLoader {
    async fn load(&self, url: &str) -> Result<(), ImageError> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(url.to_string());
        }
        let broken = self
            .broken
            .lock()
            .map(|b| b.iter().any(|u| u == url))
            .unwrap_or(false);
        if broken {
            Err(ImageError::Status { status: 404 })
        } else {
            Ok(())
        }
    }
}
