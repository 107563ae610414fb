//! Cart API client.

use serde::Serialize;
use turbo_commerce::{CartState, ProductId};
use turbo_data::{FetchClient, Response};

use crate::config::ApiConfig;
use crate::error::CartError;

#[derive(Serialize)]
struct AddRequest<'a> {
    id: Option<&'a ProductId>,
    qty: u32,
}

#[derive(Serialize)]
struct RemoveRequest<'a> {
    id: &'a ProductId,
}

/// Reads and changes the server-side cart.
///
/// Each call is independent: concurrent calls are neither de-duplicated nor
/// ordered, and whichever response the caller applies last wins.
#[derive(Debug, Clone)]
pub struct CartClient {
    http: FetchClient,
    cart_path: String,
    add_path: String,
    remove_path: String,
}

impl CartClient {
    /// Create a client from the API section of the config.
    pub fn new(http: FetchClient, api: &ApiConfig) -> Self {
        let http = if api.base_url.is_empty() {
            http
        } else {
            http.with_base_url(api.base_url.clone())
        };
        Self {
            http,
            cart_path: api.cart_path.clone(),
            add_path: api.add_path.clone(),
            remove_path: api.remove_path.clone(),
        }
    }

    /// `GET` the current cart.
    pub async fn fetch_cart(&self) -> Result<CartState, CartError> {
        let response = self
            .http
            .get(self.cart_path.as_str())
            .accept("application/json")
            .send()
            .await?;
        parse_cart(&self.cart_path, response)
    }

    /// Add `qty` units of a product. Returns the server's resulting cart.
    ///
    /// A missing id is sent as `"id": null` and left for the server to reject.
    pub async fn add_item(
        &self,
        product_id: Option<&ProductId>,
        qty: u32,
    ) -> Result<CartState, CartError> {
        let body = AddRequest {
            id: product_id,
            qty: normalize_qty(qty),
        };
        let response = self
            .http
            .post(self.add_path.as_str())
            .accept("application/json")
            .json(&body)?
            .send()
            .await?;
        parse_cart(&self.add_path, response)
    }

    /// Remove a product line. Returns the server's resulting cart.
    pub async fn remove_item(&self, product_id: &ProductId) -> Result<CartState, CartError> {
        let response = self
            .http
            .post(self.remove_path.as_str())
            .accept("application/json")
            .json(&RemoveRequest { id: product_id })?
            .send()
            .await?;
        parse_cart(&self.remove_path, response)
    }

    /// Total item count of a cart snapshot.
    pub fn count(state: &CartState) -> i64 {
        state.item_count()
    }
}

/// Quantities below one are sent as one.
pub fn normalize_qty(qty: u32) -> u32 {
    qty.max(1)
}

fn parse_cart(path: &str, response: Response) -> Result<CartState, CartError> {
    if !response.is_success() {
        // The body is still taken as the cart; only transport or JSON failures are errors.
        tracing::warn!(path, status = response.status, "cart API returned non-success status");
    }
    let state: CartState = response.json()?;
    tracing::debug!(path, count = state.item_count(), "cart state received");
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use turbo_data::{FetchError, Method, ScriptedTransport};

    fn client(transport: &ScriptedTransport) -> CartClient {
        CartClient::new(FetchClient::new(transport.clone()), &ApiConfig::default())
    }

    #[tokio::test]
    async fn test_fetch_cart_counts_items() {
        let transport = ScriptedTransport::new();
        transport.reply_json(json!({
            "items": [{"productId": "A", "qty": 2}, {"productId": "B", "qty": 3}]
        }));

        let state = client(&transport).fetch_cart().await.unwrap();
        assert_eq!(CartClient::count(&state), 5);

        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].path(), "/api/cart");
    }

    #[tokio::test]
    async fn test_add_item_posts_id_and_qty() {
        let transport = ScriptedTransport::new();
        transport.reply_json(json!({"items": [{"productId": "X", "qty": 1}]}));

        let state = client(&transport)
            .add_item(Some(&ProductId::new("X")), 0)
            .await
            .unwrap();

        assert_eq!(state.item_count(), 1);
        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.path(), "/api/cart/add");
        assert_eq!(sent.json_body(), Some(json!({"id": "X", "qty": 1})));
    }

    #[tokio::test]
    async fn test_add_item_without_id_posts_null() {
        let transport = ScriptedTransport::new();
        transport.reply_json(json!({"items": []}));

        client(&transport).add_item(None, 3).await.unwrap();

        assert_eq!(
            transport.requests()[0].json_body(),
            Some(json!({"id": null, "qty": 3}))
        );
    }

    #[tokio::test]
    async fn test_numeric_product_ids_still_count() {
        let transport = ScriptedTransport::new();
        transport
            .reply_json(json!({"items": [{"productId": 42, "qty": 2}, {"productId": 7, "qty": 3}]}))
            .reply_json(json!({"items": [{"productId": 42, "qty": 2}]}));

        let api = client(&transport);
        assert_eq!(CartClient::count(&api.fetch_cart().await.unwrap()), 5);

        let after = api.remove_item(&ProductId::new("7")).await.unwrap();
        assert_eq!(after.item_count(), 2);
        assert_eq!(
            serde_json::to_value(&after).unwrap(),
            json!({"items": [{"productId": 42, "qty": 2}]})
        );
    }

    #[tokio::test]
    async fn test_remove_item_posts_id_only() {
        let transport = ScriptedTransport::new();
        transport.reply_json(json!({"items": []}));

        let state = client(&transport)
            .remove_item(&ProductId::new("A"))
            .await
            .unwrap();

        assert_eq!(state.item_count(), 0);
        let sent = &transport.requests()[0];
        assert_eq!(sent.path(), "/api/cart/remove");
        assert_eq!(sent.json_body(), Some(json!({"id": "A"})));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let transport = ScriptedTransport::new();
        transport.fail("connection refused");

        let err = client(&transport).fetch_cart().await.unwrap_err();
        assert!(matches!(err, CartError::Network(FetchError::RequestError(_))));
    }

    #[tokio::test]
    async fn test_non_json_body_is_network_error() {
        let transport = ScriptedTransport::new();
        transport.reply(Ok(Response::new(200, HashMap::new(), b"<html/>".to_vec())));

        let err = client(&transport).fetch_cart().await.unwrap_err();
        assert!(matches!(err, CartError::Network(FetchError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_error_status_with_json_body_is_still_a_cart() {
        let transport = ScriptedTransport::new();
        transport.reply(Ok(Response::new(
            500,
            HashMap::new(),
            br#"{"error":"boom"}"#.to_vec(),
        )));

        let state = client(&transport).fetch_cart().await.unwrap();
        assert_eq!(state.item_count(), 0);
        assert_eq!(state.get("error"), Some(&json!("boom")));
    }

    #[tokio::test]
    async fn test_base_url_from_config() {
        let transport = ScriptedTransport::new();
        transport.reply_json(json!({}));
        let api = ApiConfig {
            base_url: "https://shop.example".into(),
            ..ApiConfig::default()
        };

        CartClient::new(FetchClient::new(transport.clone()), &api)
            .fetch_cart()
            .await
            .unwrap();
        assert_eq!(transport.requests()[0].url, "https://shop.example/api/cart");
    }
}
