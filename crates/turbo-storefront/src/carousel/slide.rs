//! Slide descriptions and viewport geometry.

/// One carousel slide's images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    background: Option<String>,
    fallback: Option<String>,
}

impl Slide {
    pub fn new(background: Option<String>, fallback: Option<String>) -> Self {
        Self {
            background: background.filter(|u| !u.is_empty()),
            fallback: fallback.filter(|u| !u.is_empty()),
        }
    }

    /// Build from the slide's inline `background-image` value and its
    /// `data-fallback` attribute.
    pub fn from_style(background_image: Option<&str>, fallback: Option<&str>) -> Self {
        Self::new(
            background_image.and_then(css_url).map(str::to_string),
            fallback.map(str::to_string),
        )
    }

    /// Primary image URL.
    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Substitute URL used when the primary image fails.
    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }
}

/// Extract the URL from a CSS `url(...)` value, with or without quotes.
///
/// ```
/// use turbo_storefront::carousel::css_url;
///
/// assert_eq!(css_url("url('/img/hero.jpg')"), Some("/img/hero.jpg"));
/// assert_eq!(css_url("none"), None);
/// ```
pub fn css_url(value: &str) -> Option<&str> {
    let start = value.find("url(")? + "url(".len();
    let rest = &value[start..];
    let end = rest.rfind(')')?;
    let url = rest[..end]
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim();
    (!url.is_empty()).then_some(url)
}

/// Axis-aligned box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// Whether this box touches `viewport` grown by `margin` on every side.
    pub fn intersects(&self, viewport: &Rect, margin: f64) -> bool {
        self.left < viewport.right + margin
            && self.right > viewport.left - margin
            && self.top < viewport.bottom + margin
            && self.bottom > viewport.top - margin
    }
}
