//! The hosting page, as seen by interaction handlers.

use std::sync::Mutex;

/// Page-level context and side effects.
pub trait PageHost: Send + Sync {
    /// Current location.
    fn url(&self) -> String;

    /// Document title.
    fn title(&self) -> String;

    /// The body's page-type marker (`home`, `plp`, `pdp`, `cart`, ...).
    fn page_type(&self) -> Option<String>;

    /// Leave the page for `href`.
    fn navigate(&self, href: &str);

    /// Reload the current page.
    fn reload(&self);

    /// Show the cart confirmation notice. Returns `false` when the page has
    /// no notice element.
    fn show_notice(&self, message: &str) -> bool;
}

/// A page effect recorded by [`HeadlessPage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEffect {
    Navigated(String),
    Reloaded,
    Notice(String),
}

/// A page with no DOM behind it that records every side effect.
///
/// Used for simulated sessions and in tests.
#[derive(Debug)]
pub struct HeadlessPage {
    url: String,
    title: String,
    page_type: Option<String>,
    has_notice: bool,
    effects: Mutex<Vec<PageEffect>>,
}

impl HeadlessPage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            page_type: None,
            has_notice: true,
            effects: Mutex::new(Vec::new()),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_page_type(mut self, page_type: impl Into<String>) -> Self {
        self.page_type = Some(page_type.into());
        self
    }

    /// Drop the notice element from the page.
    pub fn without_notice(mut self) -> Self {
        self.has_notice = false;
        self
    }

    /// Effects so far, in order.
    pub fn effects(&self) -> Vec<PageEffect> {
        self.effects.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn record(&self, effect: PageEffect) {
        if let Ok(mut effects) = self.effects.lock() {
            effects.push(effect);
        }
    }
}

impl PageHost for HeadlessPage {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn page_type(&self) -> Option<String> {
        self.page_type.clone()
    }

    fn navigate(&self, href: &str) {
        self.record(PageEffect::Navigated(href.to_string()));
    }

    fn reload(&self) {
        self.record(PageEffect::Reloaded);
    }

    fn show_notice(&self, message: &str) -> bool {
        if !self.has_notice {
            return false;
        }
        self.record(PageEffect::Notice(message.to_string()));
        true
    }
}
