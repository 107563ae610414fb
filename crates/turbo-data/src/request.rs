//! Outbound requests.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::FetchError;

/// Verbs the storefront speaks. Cart reads are `GET`, cart mutations `POST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
        })
    }
}

/// A request handed to a transport. Built by chaining `with_*` calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Serialize `payload` as the body and mark it `application/json`.
    pub fn with_json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self, FetchError> {
        let bytes = serde_json::to_vec(payload)?;
        let mut request = self.with_header("Content-Type", "application/json");
        request.body = Some(bytes);
        Ok(request)
    }

    /// Decoded JSON body, if there is one and it parses.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        let bytes = self.body.as_deref()?;
        serde_json::from_slice(bytes).ok()
    }

    /// The URL path with scheme, authority and query removed.
    ///
    /// Relative URLs such as `/api/cart?x=1` yield `/api/cart`.
    pub fn path(&self) -> &str {
        let rest = match self.url.split_once("://") {
            Some((_, after_scheme)) => after_scheme
                .find('/')
                .map_or("/", |slash| &after_scheme[slash..]),
            None => self.url.as_str(),
        };
        rest.split(['?', '#']).next().unwrap_or(rest)
    }
}
