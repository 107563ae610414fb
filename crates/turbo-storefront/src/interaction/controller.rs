//! Binds user actions to their cart call, badge refresh and analytics event.

use std::sync::Arc;

use turbo_commerce::CartState;
use turbo_data::FetchClient;

use crate::analytics::{AnalyticsEmitter, DataLayer, EventDraft, EventName, PageContext};
use crate::cart::{CartBadge, CartClient};
use crate::clock::Clock;
use crate::config::{InteractionConfig, StorefrontConfig};
use crate::error::InteractionError;
use crate::interaction::action::{Action, AddToCart, CartOpen, ProductClick, RemoveFromCart};
use crate::interaction::page::PageHost;

/// Final page effect of a handled action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The page navigated away.
    Navigated(String),
    /// The page reloaded itself.
    Reloaded,
    /// The page stayed where it was.
    Stayed { notice_shown: bool },
}

/// Whether a search form submission may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDecision {
    Submit,
    Prevent,
}

/// Stateless handler for storefront interactions.
///
/// Each action runs its steps in a fixed order (cart call, badge, event, page
/// effect). The badge is only ever set from a server cart. Cart failures on
/// user actions propagate to the caller; no retry is attempted.
#[derive(Clone)]
pub struct InteractionController {
    cart: CartClient,
    badge: CartBadge,
    analytics: AnalyticsEmitter,
    page: Arc<dyn PageHost>,
    config: InteractionConfig,
}

impl InteractionController {
    pub fn new(
        cart: CartClient,
        analytics: AnalyticsEmitter,
        page: Arc<dyn PageHost>,
        config: InteractionConfig,
    ) -> Self {
        Self {
            cart,
            badge: CartBadge::absent(),
            analytics,
            page,
            config,
        }
    }

    /// Wire a controller from configuration and the page's collaborators.
    pub fn from_config(
        config: &StorefrontConfig,
        http: FetchClient,
        data_layer: Arc<dyn DataLayer>,
        clock: Arc<dyn Clock>,
        page: Arc<dyn PageHost>,
    ) -> Self {
        Self::new(
            CartClient::new(http, &config.api),
            AnalyticsEmitter::new(data_layer, clock),
            page,
            config.interaction.clone(),
        )
    }

    /// Attach the cart badge.
    pub fn with_badge(mut self, badge: CartBadge) -> Self {
        self.badge = badge;
        self
    }

    pub fn analytics(&self) -> &AnalyticsEmitter {
        &self.analytics
    }

    /// Initial badge refresh. Failures leave the badge unset.
    pub async fn init(&self) {
        match self.cart.fetch_cart().await {
            Ok(state) => self.refresh_badge(&state),
            Err(e) => tracing::debug!(error = %e, "initial cart refresh failed"),
        }
    }

    /// Dispatch an action.
    pub async fn handle(&self, action: Action) -> Result<Outcome, InteractionError> {
        match action {
            Action::ProductClick(click) => Ok(self.product_click(click).await),
            Action::AddToCart(add) => self.add_to_cart(add).await,
            Action::RemoveFromCart(remove) => self.remove_from_cart(remove).await,
            Action::CartOpen(open) => self.open_cart(open).await,
        }
    }

    /// Emit `productClick`, give the data layer a moment, then follow the link.
    pub async fn product_click(&self, click: ProductClick) -> Outcome {
        let page_type = self
            .page
            .page_type()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "plp".to_string());
        let page_name = if page_type == "home" {
            "Home"
        } else {
            "Product Listing"
        };

        self.analytics.emit(
            EventDraft::new(EventName::ProductClick)
                .page(self.page_context(page_name, Some(page_type)))
                .products(vec![click.product]),
        );

        tokio::time::sleep(self.config.product_click_delay()).await;
        self.follow(click.href)
    }

    /// Add to the server cart, refresh the badge, emit `scAdd`, show the notice.
    pub async fn add_to_cart(&self, add: AddToCart) -> Result<Outcome, InteractionError> {
        let state = self.cart.add_item(add.product_id.as_ref(), add.qty).await?;
        self.refresh_badge(&state);

        let page_name = format!("PDP - {}", add.product_name.as_deref().unwrap_or_default());
        self.analytics.emit(
            EventDraft::new(EventName::CartAdd)
                .page(self.page_context(&page_name, Some("pdp".to_string())))
                .products(vec![add.product_entry()])
                .cart(state),
        );

        let notice_shown = self.page.show_notice(&self.config.cart_notice);
        Ok(Outcome::Stayed { notice_shown })
    }

    /// Remove from the server cart, refresh the badge, emit `scRemove`, reload.
    pub async fn remove_from_cart(
        &self,
        remove: RemoveFromCart,
    ) -> Result<Outcome, InteractionError> {
        let state = self.cart.remove_item(&remove.product_id).await?;
        self.refresh_badge(&state);

        self.analytics.emit(
            EventDraft::new(EventName::CartRemove)
                .page(self.page_context("Cart", Some("cart".to_string())))
                .cart(state),
        );

        self.page.reload();
        Ok(Outcome::Reloaded)
    }

    /// Refresh the cart, emit `scOpen`, then follow the cart link.
    pub async fn open_cart(&self, open: CartOpen) -> Result<Outcome, InteractionError> {
        let state = self.cart.fetch_cart().await?;
        self.refresh_badge(&state);

        let title = self.page.title();
        self.analytics.emit(
            EventDraft::new(EventName::CartOpen)
                .page(self.page_context(&title, self.page.page_type()))
                .cart(state),
        );

        tokio::time::sleep(self.config.cart_open_delay()).await;
        Ok(self.follow(open.href))
    }

    /// A search submits only with a non-blank query.
    pub fn validate_search(query: Option<&str>) -> SearchDecision {
        match query {
            Some(q) if !q.trim().is_empty() => SearchDecision::Submit,
            _ => SearchDecision::Prevent,
        }
    }

    fn refresh_badge(&self, state: &CartState) {
        let count = CartClient::count(state);
        tracing::debug!(count, "cart badge updated");
        self.badge.update(count);
    }

    fn page_context(&self, page_name: &str, page_type: Option<String>) -> PageContext {
        PageContext {
            language: self.config.language.clone(),
            page_name: page_name.to_string(),
            page_type,
            url: self.page.url(),
        }
    }

    fn follow(&self, href: Option<String>) -> Outcome {
        match href.filter(|h| !h.is_empty()) {
            Some(href) => {
                self.page.navigate(&href);
                Outcome::Navigated(href)
            }
            None => {
                tracing::warn!("link has no target; staying on page");
                Outcome::Stayed {
                    notice_shown: false,
                }
            }
        }
    }
}

impl std::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("cart", &self.cart)
            .field("badge", &self.badge)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::InMemoryDataLayer;
    use crate::cart::BadgeView;
    use crate::clock::FixedClock;
    use crate::config::ApiConfig;
    use crate::error::CartError;
    use crate::interaction::action::Dataset;
    use crate::interaction::page::{HeadlessPage, PageEffect};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::sync::Mutex;
    use turbo_commerce::ProductId;
    use turbo_data::{FetchClient, ScriptedTransport};

    #[derive(Default)]
    struct TextCell(Mutex<Vec<String>>);

    impl TextCell {
        fn last(&self) -> Option<String> {
            self.0.lock().unwrap().last().cloned()
        }
    }

    impl BadgeView for TextCell {
        fn set_text(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    struct Harness {
        transport: ScriptedTransport,
        layer: InMemoryDataLayer,
        page: Arc<HeadlessPage>,
        badge: Arc<TextCell>,
        controller: InteractionController,
    }

    fn harness(page: HeadlessPage) -> Harness {
        let transport = ScriptedTransport::new();
        let layer = InMemoryDataLayer::new();
        let page = Arc::new(page);
        let badge = Arc::new(TextCell::default());

        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap());
        let analytics = AnalyticsEmitter::new(Arc::new(layer.clone()), Arc::new(clock));
        let cart = CartClient::new(FetchClient::new(transport.clone()), &ApiConfig::default());
        let controller =
            InteractionController::new(cart, analytics, page.clone(), InteractionConfig::default())
                .with_badge(CartBadge::new(badge.clone()));

        Harness {
            transport,
            layer,
            page,
            badge,
            controller,
        }
    }

    #[tokio::test]
    async fn test_init_sets_badge_from_cart() {
        let h = harness(HeadlessPage::new("https://shop.example/"));
        h.transport.reply_json(json!({
            "items": [{"productId": "A", "qty": 2}, {"productId": "B", "qty": 3}]
        }));

        h.controller.init().await;
        assert_eq!(h.badge.last().as_deref(), Some("5"));
        assert!(h.layer.is_empty());
    }

    #[tokio::test]
    async fn test_init_failure_leaves_badge_unset() {
        let h = harness(HeadlessPage::new("https://shop.example/"));
        h.transport.fail("offline");

        h.controller.init().await;
        assert_eq!(h.badge.last(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_product_click_on_home_page() {
        let h = harness(HeadlessPage::new("https://shop.example/").with_page_type("home"));
        let data = Dataset::new()
            .with("data-product-id", "SKU-1")
            .with("data-price", "12.5")
            .with("data-position", "")
            .with("data-href", "/pdp/SKU-1");

        let outcome = h
            .controller
            .product_click(ProductClick::from_dataset(&data))
            .await;

        assert_eq!(outcome, Outcome::Navigated("/pdp/SKU-1".into()));
        let record = &h.layer.snapshot()[0];
        assert_eq!(record["event"], "productClick");
        assert_eq!(record["page"]["pageName"], "Home");
        assert_eq!(record["page"]["pageType"], "home");
        assert_eq!(record["product"][0]["price"], json!(12.5));
        assert_eq!(record["product"][0]["position"], json!(0.0));
        assert_eq!(record["product"][0]["quantity"], 1);
        assert!(h.transport.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_product_click_waits_before_navigating() {
        let h = harness(HeadlessPage::new("https://shop.example/plp"));
        let data = Dataset::new().with("data-href", "/pdp/2");
        let controller = h.controller.clone();

        let task = tokio::spawn(async move {
            controller
                .product_click(ProductClick::from_dataset(&data))
                .await
        });

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert_eq!(h.layer.len(), 1);
        assert!(h.page.effects().is_empty());

        assert_eq!(task.await.unwrap(), Outcome::Navigated("/pdp/2".into()));
        assert_eq!(h.page.effects(), vec![PageEffect::Navigated("/pdp/2".into())]);
        assert_eq!(h.layer.snapshot()[0]["page"]["pageName"], "Product Listing");
        assert_eq!(h.layer.snapshot()[0]["page"]["pageType"], "plp");
    }

    #[tokio::test(start_paused = true)]
    async fn test_product_click_without_href_stays() {
        let h = harness(HeadlessPage::new("https://shop.example/plp"));
        let outcome = h
            .controller
            .product_click(ProductClick::from_dataset(&Dataset::new()))
            .await;

        assert_eq!(outcome, Outcome::Stayed { notice_shown: false });
        assert_eq!(h.layer.len(), 1);
        assert!(h.page.effects().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_cart_with_empty_qty() {
        let h = harness(HeadlessPage::new("https://shop.example/pdp/X"));
        h.transport
            .reply_json(json!({"items": [{"productId": "X", "qty": 1}]}));

        let fields = Dataset::new().with("id", "X").with("qty", "");
        let data = Dataset::new()
            .with("data-product-name", "Mug")
            .with("data-price", "8");
        let outcome = h
            .controller
            .handle(Action::add_to_cart(&fields, &data))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Stayed { notice_shown: true });
        assert_eq!(
            h.transport.requests()[0].json_body(),
            Some(json!({"id": "X", "qty": 1}))
        );
        assert_eq!(h.badge.last().as_deref(), Some("1"));

        let record = &h.layer.snapshot()[0];
        assert_eq!(record["event"], "scAdd");
        assert_eq!(record["eventInfo"]["eventName"], "scAdd");
        assert_eq!(record["page"]["pageName"], "PDP - Mug");
        assert_eq!(record["page"]["pageType"], "pdp");
        assert_eq!(record["product"][0]["quantity"], 1);
        assert_eq!(record["cart"]["items"][0]["productId"], "X");
        assert_eq!(
            h.page.effects(),
            vec![PageEffect::Notice(InteractionConfig::default().cart_notice)]
        );
    }

    #[tokio::test]
    async fn test_add_to_cart_without_notice_element() {
        let h = harness(HeadlessPage::new("https://shop.example/pdp/X").without_notice());
        h.transport.reply_json(json!({"items": []}));

        let add = AddToCart::from_form(&Dataset::new().with("id", "X"), &Dataset::new());
        let outcome = h.controller.add_to_cart(add).await.unwrap();
        assert_eq!(outcome, Outcome::Stayed { notice_shown: false });
        assert_eq!(h.badge.last().as_deref(), Some("0"));
    }

    #[tokio::test]
    async fn test_add_failure_propagates_without_event() {
        let h = harness(HeadlessPage::new("https://shop.example/pdp/X"));
        h.transport.fail("connection reset");

        let add = AddToCart::from_form(&Dataset::new().with("id", "X"), &Dataset::new());
        let err = h.controller.add_to_cart(add).await.unwrap_err();

        assert!(matches!(err, InteractionError::Cart(CartError::Network(_))));
        assert!(h.layer.is_empty());
        assert_eq!(h.badge.last(), None);
    }

    #[tokio::test]
    async fn test_remove_emits_without_product_then_reloads() {
        let h = harness(HeadlessPage::new("https://shop.example/cart").with_page_type("cart"));
        h.transport
            .reply_json(json!({"items": [{"productId": "B", "qty": 3}]}));

        let outcome = h
            .controller
            .remove_from_cart(RemoveFromCart {
                product_id: ProductId::new("A"),
            })
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Reloaded);
        assert_eq!(h.badge.last().as_deref(), Some("3"));
        let record = &h.layer.snapshot()[0];
        assert_eq!(record["event"], "scRemove");
        assert!(record.get("product").is_none());
        assert_eq!(record["page"]["pageName"], "Cart");
        assert_eq!(h.page.effects(), vec![PageEffect::Reloaded]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_cart_uses_title_and_page_type() {
        let h = harness(
            HeadlessPage::new("https://shop.example/pdp/7")
                .with_title("Desk Lamp | Shop")
                .with_page_type("pdp"),
        );
        h.transport
            .reply_json(json!({"items": [{"productId": "A", "qty": 4}]}));

        let outcome = h
            .controller
            .open_cart(CartOpen {
                href: Some("/cart".into()),
            })
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Navigated("/cart".into()));
        assert_eq!(h.badge.last().as_deref(), Some("4"));
        let record = &h.layer.snapshot()[0];
        assert_eq!(record["event"], "scOpen");
        assert_eq!(record["page"]["pageName"], "Desk Lamp | Shop");
        assert_eq!(record["page"]["pageType"], "pdp");
        assert_eq!(record["cart"]["items"][0]["qty"], 4);
    }

    #[tokio::test]
    async fn test_open_cart_failure_propagates() {
        let h = harness(HeadlessPage::new("https://shop.example/"));
        h.transport.fail("offline");

        let result = h
            .controller
            .open_cart(CartOpen {
                href: Some("/cart".into()),
            })
            .await;
        assert!(result.is_err());
        assert!(h.page.effects().is_empty());
    }

    #[test]
    fn test_validate_search() {
        assert_eq!(
            InteractionController::validate_search(Some("lamp")),
            SearchDecision::Submit
        );
        assert_eq!(
            InteractionController::validate_search(Some("   ")),
            SearchDecision::Prevent
        );
        assert_eq!(
            InteractionController::validate_search(None),
            SearchDecision::Prevent
        );
    }
}
