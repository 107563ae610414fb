//! Customer identity attached to every analytics event.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analytics::DataLayer;

/// Customer identity block (`custData`).
///
/// Kept as the raw JSON object so a block supplied by the page reaches the
/// data layer exactly as it was pushed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Map<String, Value>);

impl Identity {
    /// The guest identity used when the page supplied none.
    pub fn anonymous() -> Self {
        let mut fields = Map::new();
        fields.insert("custId".into(), Value::from(""));
        fields.insert("emailID_plain".into(), Value::from(""));
        fields.insert("loginMethod".into(), Value::from("guest"));
        fields.insert("loginStatus".into(), Value::from("anonymous"));
        fields.insert("mobileNo_plain".into(), Value::from(""));
        Self(fields)
    }

    /// Wrap a JSON value; only objects are identities.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn cust_id(&self) -> Option<&str> {
        self.text("custId")
    }

    pub fn email(&self) -> Option<&str> {
        self.text("emailID_plain").or_else(|| self.text("emailPlain"))
    }

    pub fn mobile(&self) -> Option<&str> {
        self.text("mobileNo_plain").or_else(|| self.text("mobilePlain"))
    }

    pub fn login_method(&self) -> Option<&str> {
        self.text("loginMethod")
    }

    pub fn login_status(&self) -> Option<&str> {
        self.text("loginStatus")
    }

    pub fn is_anonymous(&self) -> bool {
        self.login_status() == Some("anonymous")
    }

    /// The raw fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Resolves the session identity once, at construction.
///
/// The identity never changes for the lifetime of the page, so later pushes
/// to the data layer are not consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityProvider {
    identity: Identity,
}

impl IdentityProvider {
    /// Read `custData` from the data layer's first record, falling back to
    /// [`Identity::anonymous`].
    pub fn from_data_layer(layer: &dyn DataLayer) -> Self {
        let identity = layer
            .first()
            .and_then(|record| record.get("custData").cloned())
            .and_then(Identity::from_value)
            .unwrap_or_else(Identity::anonymous);

        tracing::debug!(
            anonymous = identity.is_anonymous(),
            "resolved customer identity"
        );
        Self { identity }
    }

    /// Always resolve to the given identity.
    pub fn fixed(identity: Identity) -> Self {
        Self { identity }
    }

    /// The session identity.
    pub fn resolve(&self) -> Identity {
        self.identity.clone()
    }
}
