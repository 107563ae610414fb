//! Analytics event envelope and its parts.

use serde::{Deserialize, Serialize, Serializer};
use turbo_commerce::{CartState, ProductId};

use crate::identity::Identity;

/// Event names emitted by storefront interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    ProductClick,
    CartAdd,
    CartRemove,
    CartOpen,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductClick => "productClick",
            Self::CartAdd => "scAdd",
            Self::CartRemove => "scRemove",
            Self::CartOpen => "scOpen",
        }
    }
}

impl From<EventName> for String {
    fn from(name: EventName) -> Self {
        name.as_str().to_string()
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully formed analytics event as appended to the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub event: String,
    pub event_info: EventInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Vec<ProductEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart: Option<CartState>,
    pub cust_data: Identity,
    /// ISO-8601 emission time.
    pub timestamp: String,
}

/// `eventInfo` block; `event_name` always mirrors the event's `event`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub event_name: String,
}

/// Page the event happened on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub language: String,
    pub page_name: String,
    /// Absent when the page carries no page-type marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_type: Option<String>,
    pub url: String,
}

/// A product as reported to analytics.
///
/// Text fields come straight from markup and are omitted when the attribute
/// is missing. Numbers that failed to parse are `None` and serialize as
/// `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(serialize_with = "js_number")]
    pub price: Option<f64>,
    #[serde(serialize_with = "js_number")]
    pub position: Option<f64>,
    pub quantity: u32,
}

/// Whole numbers go out as JSON integers (`3`, not `3.0`).
fn js_number<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    match *value {
        Some(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE => serializer.serialize_i64(n as i64),
        Some(n) => serializer.serialize_f64(n),
        None => serializer.serialize_none(),
    }
}

/// Caller-supplied event body; the emitter fills in the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub event: String,
    pub page: Option<PageContext>,
    pub product: Option<Vec<ProductEntry>>,
    pub cart: Option<CartState>,
    /// Overrides the session identity when set.
    pub cust_data: Option<Identity>,
}

impl EventDraft {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            page: None,
            product: None,
            cart: None,
            cust_data: None,
        }
    }

    pub fn page(mut self, page: PageContext) -> Self {
        self.page = Some(page);
        self
    }

    pub fn products(mut self, products: Vec<ProductEntry>) -> Self {
        self.product = Some(products);
        self
    }

    pub fn cart(mut self, cart: CartState) -> Self {
        self.cart = Some(cart);
        self
    }

    pub fn cust_data(mut self, identity: Identity) -> Self {
        self.cust_data = Some(identity);
        self
    }
}
