//! Storefront client configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Cart API endpoints.
    #[serde(default)]
    pub api: ApiConfig,

    /// Interaction timings and copy.
    #[serde(default)]
    pub interaction: InteractionConfig,

    /// Hero carousel behaviour.
    #[serde(default)]
    pub carousel: CarouselConfig,
}

impl StorefrontConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: display,
                source,
            })
        } else {
            Self::from_toml(&content).map_err(|source| ConfigError::Toml {
                path: display,
                source,
            })
        }
    }

    /// Parse from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Cart API location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL prepended to the paths below. Empty means same-origin relative paths.
    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_cart_path")]
    pub cart_path: String,

    #[serde(default = "default_add_path")]
    pub add_path: String,

    #[serde(default = "default_remove_path")]
    pub remove_path: String,

    /// Per-request timeout for the HTTP transport.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_cart_path() -> String {
    "/api/cart".to_string()
}

fn default_add_path() -> String {
    "/api/cart/add".to_string()
}

fn default_remove_path() -> String {
    "/api/cart/remove".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            cart_path: default_cart_path(),
            add_path: default_add_path(),
            remove_path: default_remove_path(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Interaction timings and copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Page language reported in analytics page context.
    #[serde(default = "default_language")]
    pub language: String,

    /// Delay between emitting `productClick` and navigating, so the data layer can drain.
    #[serde(default = "default_product_click_delay_ms")]
    pub product_click_delay_ms: u64,

    /// Delay between emitting `scOpen` and navigating to the cart.
    #[serde(default = "default_cart_open_delay_ms")]
    pub cart_open_delay_ms: u64,

    /// Text shown in the add-to-cart confirmation notice.
    #[serde(default = "default_cart_notice")]
    pub cart_notice: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_product_click_delay_ms() -> u64 {
    120
}

fn default_cart_open_delay_ms() -> u64 {
    50
}

fn default_cart_notice() -> String {
    "Added to cart. Proceed to cart or keep shopping.".to_string()
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            product_click_delay_ms: default_product_click_delay_ms(),
            cart_open_delay_ms: default_cart_open_delay_ms(),
            cart_notice: default_cart_notice(),
        }
    }
}

impl InteractionConfig {
    pub fn product_click_delay(&self) -> Duration {
        Duration::from_millis(self.product_click_delay_ms)
    }

    pub fn cart_open_delay(&self) -> Duration {
        Duration::from_millis(self.cart_open_delay_ms)
    }
}

/// Hero carousel behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Autoplay period.
    #[serde(default = "default_autoplay_interval_ms")]
    pub autoplay_interval_ms: u64,

    /// Margin around the viewport within which a slide counts as visible.
    #[serde(default = "default_lazy_root_margin_px")]
    pub lazy_root_margin_px: u32,
}

fn default_autoplay_interval_ms() -> u64 {
    5000
}

fn default_lazy_root_margin_px() -> u32 {
    50
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay_interval_ms: default_autoplay_interval_ms(),
            lazy_root_margin_px: default_lazy_root_margin_px(),
        }
    }
}

impl CarouselConfig {
    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }

    pub fn root_margin(&self) -> f64 {
        f64::from(self.lazy_root_margin_px)
    }
}
