//! Client-side storefront pipeline for TurboCommerce.
//!
//! Keeps the on-screen cart count in step with the server cart and turns
//! shopper interactions into analytics events on a shared data layer:
//!
//! - **Identity**: the session's customer block, read once from the data layer
//! - **Analytics**: event envelope, emitter and [`DataLayer`](analytics::DataLayer) sink
//! - **Cart**: the cart API client and the badge that displays its count
//! - **Interaction**: product clicks, add/remove, cart open and search gating
//! - **Carousel**: hero slides with autoplay and lazy image loading
//!
//! The page itself (DOM, navigation, timers) sits behind traits so the same
//! logic runs in a browser host, a headless session, or a test.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use turbo_data::{FetchClient, ReqwestTransport};
//! use turbo_storefront::prelude::*;
//!
//! let config = StorefrontConfig::load("storefront.toml")?;
//! let http = FetchClient::new(ReqwestTransport::with_timeout(config.api.timeout())?);
//! let page = Arc::new(HeadlessPage::new("https://shop.example/").with_page_type("home"));
//!
//! let controller = InteractionController::from_config(
//!     &config,
//!     http,
//!     Arc::new(InMemoryDataLayer::new()),
//!     Arc::new(SystemClock),
//!     page,
//! );
//! controller.init().await;
//!
//! let click = Dataset::new()
//!     .with("data-action", "view-product")
//!     .with("data-product-id", "sku-1")
//!     .with("data-href", "/pdp/sku-1");
//! if let Some(action) = Action::from_click(&click, None) {
//!     controller.handle(action).await?;
//! }
//! ```

pub mod analytics;
pub mod carousel;
pub mod cart;
pub mod clock;
pub mod config;
pub mod error;
pub mod identity;
pub mod interaction;

pub use config::StorefrontConfig;
pub use error::{CartError, ConfigError, ImageError, InteractionError};
pub use identity::{Identity, IdentityProvider};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::analytics::{AnalyticsEmitter, DataLayer, EventDraft, InMemoryDataLayer};
    pub use crate::carousel::{CarouselController, CarouselInput, Slide, TokioAutoplayTimer};
    pub use crate::cart::{CartBadge, CartClient};
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::config::StorefrontConfig;
    pub use crate::error::{CartError, InteractionError};
    pub use crate::identity::{Identity, IdentityProvider};
    pub use crate::interaction::{
        Action, Dataset, HeadlessPage, InteractionController, Outcome, PageHost,
    };
}
