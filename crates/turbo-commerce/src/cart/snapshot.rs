//! Server cart snapshot as returned by the cart API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cart contents as last reported by the server.
///
/// The JSON object is held verbatim so it can be forwarded into analytics
/// payloads exactly as received. Line ids and quantities are only coerced
/// when read through [`CartLine`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CartState(Map<String, Value>);

impl CartState {
    /// `{"items": []}`
    pub fn empty() -> Self {
        Self::with_lines(std::iter::empty::<(&str, i64)>())
    }

    /// Build a snapshot from `(productId, qty)` pairs.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let items = lines
            .into_iter()
            .map(|(id, qty)| {
                let mut line = Map::new();
                line.insert("productId".into(), Value::String(id.into()));
                line.insert("qty".into(), Value::from(qty));
                Value::Object(line)
            })
            .collect();
        let mut fields = Map::new();
        fields.insert("items".into(), Value::Array(items));
        Self(fields)
    }

    /// Total item count (sum of quantities). Zero when `items` is absent,
    /// null or not a list. Saturates instead of overflowing.
    pub fn item_count(&self) -> i64 {
        self.lines()
            .fold(0i64, |total, line| total.saturating_add(line.qty()))
    }

    /// Object entries of `items`, in server order.
    pub fn lines(&self) -> impl Iterator<Item = CartLine<'_>> + '_ {
        self.0
            .get("items")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
            .map(CartLine)
    }

    /// First line whose `productId` renders as `product_id`.
    pub fn line(&self, product_id: &str) -> Option<CartLine<'_>> {
        self.lines()
            .find(|l| l.product_id().as_deref() == Some(product_id))
    }

    pub fn is_empty(&self) -> bool {
        self.lines().next().is_none()
    }

    /// Any top-level server field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Read-only view of one cart line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartLine<'a>(&'a Map<String, Value>);

impl<'a> CartLine<'a> {
    /// `productId` as text. Numeric ids are rendered in their JSON form.
    pub fn product_id(&self) -> Option<String> {
        match self.0.get("productId")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Quantity. Missing or non-numeric values count as zero; fractions
    /// are truncated.
    pub fn qty(&self) -> i64 {
        match self.0.get("qty") {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(truncate))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse::<f64>().map(truncate).unwrap_or(0),
            _ => 0,
        }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key)
    }
}

/// `as` saturates at the i64 bounds and maps NaN to zero.
fn truncate(f: f64) -> i64 {
    f.trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cart(value: Value) -> CartState {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let cart = cart(json!({
            "items": [
                {"productId": "A", "qty": 2},
                {"productId": "B", "qty": 3}
            ]
        }));
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.line("B").map(|l| l.qty()), Some(3));
        assert_eq!(CartState::with_lines([("A", 2), ("B", 3)]), cart);
    }

    #[test]
    fn test_missing_or_null_items_count_zero() {
        for value in [json!({}), json!({"items": null}), json!({"items": []}), json!({"items": "?"})] {
            let cart = cart(value);
            assert_eq!(cart.item_count(), 0);
            assert!(cart.is_empty());
        }
    }

    #[test]
    fn test_numeric_product_ids() {
        let cart = cart(json!({
            "items": [{"productId": 42, "qty": 2}, {"productId": 7, "qty": 3}]
        }));
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.line("42").and_then(|l| l.product_id()), Some("42".into()));
        assert_eq!(cart.line("7").map(|l| l.qty()), Some(3));
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let cart = cart(json!({
            "items": [
                {"productId": "A", "qty": 9_000_000_000_000_000_000i64},
                {"productId": "B", "qty": 9_000_000_000_000_000_000i64},
                {"productId": "C", "qty": 1e300}
            ]
        }));
        assert_eq!(cart.item_count(), i64::MAX);
    }

    #[test]
    fn test_payload_is_forwarded_unchanged() {
        let raw = json!({
            "items": [
                {"productId": "A", "qty": "2", "name": "Lamp", "price": 19.5},
                {"productId": "B"},
                {"productId": 9, "qty": 1.5},
                {"productId": "D", "qty": null}
            ],
            "currency": "EUR"
        });
        let cart = cart(raw.clone());

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.get("currency"), Some(&json!("EUR")));
        assert_eq!(serde_json::to_value(&cart).unwrap(), raw);
    }
}
