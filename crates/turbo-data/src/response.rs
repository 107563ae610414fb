//! Responses as returned by a transport.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::FetchError;

/// Status, headers and the fully buffered body.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// `200` with `value` as a JSON body.
    pub fn json_ok(value: &serde_json::Value) -> Self {
        let headers = HashMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);
        Self::new(200, headers, value.to_string().into_bytes())
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// Decode the body. Cart endpoints answer JSON even on error statuses,
    /// so this does not look at the status code.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }
}
