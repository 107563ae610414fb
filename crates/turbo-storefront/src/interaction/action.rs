//! Typed interaction requests parsed from markup.
//!
//! Markup hands us untyped strings. They are coerced here, once, following
//! the browser's `Number()` rules so analytics payloads keep their usual
//! shape: blank becomes `0`, anything unparsable becomes `None` (rendered as
//! `null`).

use std::collections::HashMap;

use turbo_commerce::ProductId;

use crate::analytics::ProductEntry;

/// `data-action` value for product tiles and buttons.
pub const VIEW_PRODUCT: &str = "view-product";
/// `data-action` value for cart line remove controls.
pub const REMOVE_ITEM: &str = "remove-item";
/// `data-role` value for links to the cart.
pub const CART_LINK: &str = "cart-link";

/// String attributes of an element or values of a form, keyed by name.
///
/// `data-` prefixes are stripped, so `data-product-id` and `product-id` name
/// the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    values: HashMap<String, String>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key).to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(normalize_key(key)).map(String::as_str)
    }

    fn owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    fn number(&self, key: &str) -> Option<f64> {
        coerce_number(self.get(key))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for (k, v) in iter {
            dataset.insert(k.as_ref(), v);
        }
        dataset
    }
}

fn normalize_key(key: &str) -> &str {
    key.strip_prefix("data-").unwrap_or(key)
}

/// Coerce an attribute to a number the way `Number()` does.
///
/// Missing or unparsable input is `None`; blank input is `0`.
pub fn coerce_number(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce a quantity field. Anything that is not a positive number becomes 1.
pub fn coerce_qty(raw: Option<&str>) -> u32 {
    match coerce_number(raw) {
        Some(n) if n >= 1.0 => n.trunc().min(u32::MAX as f64) as u32,
        _ => 1,
    }
}

/// Click on a product tile or "view product" button.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductClick {
    pub product: ProductEntry,
    /// Product page to navigate to.
    pub href: Option<String>,
}

impl ProductClick {
    pub fn from_dataset(data: &Dataset) -> Self {
        Self {
            product: ProductEntry {
                product_id: data.get("product-id").map(ProductId::from),
                product_name: data.owned("product-name"),
                product_category: data.owned("product-category"),
                brand: data.owned("brand"),
                price: data.number("price"),
                position: data.number("position"),
                quantity: 1,
            },
            href: data.owned("href"),
        }
    }
}

/// Submission of the add-to-cart form on a product page.
#[derive(Debug, Clone, PartialEq)]
pub struct AddToCart {
    /// `None` when the form has no `id` field; posted as `null`.
    pub product_id: Option<ProductId>,
    pub qty: u32,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub position: Option<f64>,
}

impl AddToCart {
    /// Parse from the form's field values (`id`, `qty`) and the form
    /// element's own data attributes.
    pub fn from_form(fields: &Dataset, data: &Dataset) -> Self {
        Self {
            product_id: fields.get("id").map(ProductId::from),
            qty: coerce_qty(fields.get("qty")),
            product_name: data.owned("product-name"),
            category: data.owned("category"),
            brand: data.owned("brand"),
            price: data.number("price"),
            position: data.number("position"),
        }
    }

    /// The product as reported in the `scAdd` event.
    pub fn product_entry(&self) -> ProductEntry {
        ProductEntry {
            product_id: self.product_id.clone().filter(|id| !id.is_empty()),
            product_name: self.product_name.clone(),
            product_category: self.category.clone(),
            brand: self.brand.clone(),
            price: self.price,
            position: self.position,
            quantity: self.qty,
        }
    }
}

/// Click on a cart line's remove control.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveFromCart {
    pub product_id: ProductId,
}

impl RemoveFromCart {
    pub fn from_dataset(data: &Dataset) -> Self {
        Self {
            product_id: ProductId::new(data.get("product-id").unwrap_or_default()),
        }
    }
}

/// Click on a link to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartOpen {
    pub href: Option<String>,
}

/// Every interaction the controller handles.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ProductClick(ProductClick),
    AddToCart(AddToCart),
    RemoveFromCart(RemoveFromCart),
    CartOpen(CartOpen),
}

impl Action {
    /// Classify a click by the clicked element's markers.
    ///
    /// `href` is the element's own `href` attribute, used by cart links.
    /// Returns `None` for elements the storefront does not handle; those keep
    /// their default browser behaviour.
    pub fn from_click(data: &Dataset, href: Option<&str>) -> Option<Self> {
        match data.get("action") {
            Some(VIEW_PRODUCT) => return Some(Self::ProductClick(ProductClick::from_dataset(data))),
            Some(REMOVE_ITEM) => {
                return Some(Self::RemoveFromCart(RemoveFromCart::from_dataset(data)))
            }
            _ => {}
        }
        if data.get("role") == Some(CART_LINK) {
            return Some(Self::CartOpen(CartOpen {
                href: href.map(str::to_string),
            }));
        }
        None
    }

    /// The add-to-cart form was submitted.
    pub fn add_to_cart(fields: &Dataset, data: &Dataset) -> Self {
        Self::AddToCart(AddToCart::from_form(fields, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_number_follows_number_rules() {
        assert_eq!(coerce_number(Some("19.99")), Some(19.99));
        assert_eq!(coerce_number(Some(" 3 ")), Some(3.0));
        assert_eq!(coerce_number(Some("")), Some(0.0));
        assert_eq!(coerce_number(Some("abc")), None);
        assert_eq!(coerce_number(Some("1e400")), None);
        assert_eq!(coerce_number(None), None);
    }

    #[test]
    fn test_coerce_qty_defaults_to_one() {
        assert_eq!(coerce_qty(None), 1);
        assert_eq!(coerce_qty(Some("")), 1);
        assert_eq!(coerce_qty(Some("zero")), 1);
        assert_eq!(coerce_qty(Some("0")), 1);
        assert_eq!(coerce_qty(Some("-2")), 1);
        assert_eq!(coerce_qty(Some("3")), 3);
        assert_eq!(coerce_qty(Some("2.7")), 2);
    }

    #[test]
    fn test_dataset_prefix_is_optional() {
        let data = Dataset::new().with("data-product-id", "A");
        assert_eq!(data.get("product-id"), Some("A"));
        assert_eq!(data.get("data-product-id"), Some("A"));
    }

    #[test]
    fn test_product_click_from_dataset() {
        let data: Dataset = [
            ("data-action", "view-product"),
            ("data-product-id", "SKU-1"),
            ("data-product-name", "Desk Lamp"),
            ("data-product-category", "Lighting"),
            ("data-brand", "Lumen"),
            ("data-price", "49.5"),
            ("data-position", "n/a"),
            ("data-href", "/pdp/SKU-1"),
        ]
        .into_iter()
        .collect();

        let Some(Action::ProductClick(click)) = Action::from_click(&data, None) else {
            panic!("expected product click");
        };
        assert_eq!(click.href.as_deref(), Some("/pdp/SKU-1"));
        assert_eq!(click.product.product_id, Some(ProductId::new("SKU-1")));
        assert_eq!(click.product.price, Some(49.5));
        assert_eq!(click.product.position, None);
        assert_eq!(click.product.quantity, 1);
    }

    #[test]
    fn test_add_to_cart_with_empty_qty() {
        let fields = Dataset::new().with("id", "X").with("qty", "");
        let data = Dataset::new()
            .with("data-product-name", "Mug")
            .with("data-category", "Kitchen")
            .with("data-price", "8");

        let add = AddToCart::from_form(&fields, &data);
        assert_eq!(add.qty, 1);

        let entry = add.product_entry();
        assert_eq!(entry.product_id, Some(ProductId::new("X")));
        assert_eq!(entry.product_category.as_deref(), Some("Kitchen"));
        assert_eq!(entry.price, Some(8.0));
        assert_eq!(entry.position, None);
        assert_eq!(entry.quantity, 1);
    }

    #[test]
    fn test_add_to_cart_without_id_field() {
        let add = AddToCart::from_form(&Dataset::new().with("qty", "2"), &Dataset::new());
        assert_eq!(add.product_id, None);
        assert_eq!(add.qty, 2);
        assert_eq!(add.product_entry().product_id, None);
    }

    #[test]
    fn test_click_classification() {
        let remove = Dataset::new()
            .with("data-action", "remove-item")
            .with("data-product-id", "A");
        assert_eq!(
            Action::from_click(&remove, None),
            Some(Action::RemoveFromCart(RemoveFromCart {
                product_id: ProductId::new("A")
            }))
        );

        let link = Dataset::new().with("data-role", "cart-link");
        assert_eq!(
            Action::from_click(&link, Some("/cart")),
            Some(Action::CartOpen(CartOpen {
                href: Some("/cart".into())
            }))
        );

        let plain = Dataset::new().with("data-role", "cart-count");
        assert_eq!(Action::from_click(&plain, Some("/x")), None);
    }
}
