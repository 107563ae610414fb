//! On-screen cart item counter.

use std::sync::Arc;

/// The element that displays the cart count.
pub trait BadgeView: Send + Sync {
    fn set_text(&self, text: &str);
}

/// Owns the cart badge. Updated only with counts derived from server carts.
///
/// The badge is optional decoration; without an element every update is a no-op.
#[derive(Clone, Default)]
pub struct CartBadge {
    element: Option<Arc<dyn BadgeView>>,
}

impl CartBadge {
    pub fn new(element: Arc<dyn BadgeView>) -> Self {
        Self {
            element: Some(element),
        }
    }

    /// A page without a badge element.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        self.element.is_some()
    }

    pub fn update(&self, count: i64) {
        if let Some(element) = &self.element {
            element.set_text(&count.to_string());
        }
    }
}

impl std::fmt::Debug for CartBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartBadge")
            .field("present", &self.is_present())
            .finish()
    }
}
