//! Failures surfaced by [`FetchClient`](crate::FetchClient).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection refused, reset, DNS failure and the like.
    #[error("request could not be delivered: {0}")]
    RequestError(String),

    #[error("malformed URL: {0}")]
    InvalidUrl(String),

    /// The body was not what the caller asked to decode.
    #[error("unreadable response body: {0}")]
    ParseError(String),

    #[error("no response before the timeout")]
    Timeout,

    /// A request payload failed to serialize.
    #[error("could not encode request body: {0}")]
    JsonError(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}
