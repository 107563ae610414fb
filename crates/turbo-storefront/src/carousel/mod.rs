//! Hero carousel: autoplay, dot navigation, and lazy image loading.
//!
//! The [`CarouselController`] is a plain state object. Hosts feed it
//! [`CarouselInput`]s, either by calling its methods directly or by sending
//! them down a channel drained by [`CarouselController::run`]. A
//! [`TokioAutoplayTimer`] writes its ticks into that same channel.
//!
//! ```rust,ignore
//! let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
//! let timer = TokioAutoplayTimer::new(config.carousel.autoplay_interval(), tx.clone());
//! let mut carousel = CarouselController::new(slides, view, timer, loader)
//!     .expect("at least one slide")
//!     .with_root_margin(config.carousel.root_margin());
//! carousel.init().await;
//! carousel.viewport_changed(viewport, &slide_boxes).await;
//! tokio::spawn(carousel.run(rx));
//! tx.send(CarouselInput::DotClicked(2))?;
//! ```

mod controller;
mod loader;
mod slide;
mod timer;

pub use controller::{CarouselController, CarouselInput, CarouselState, SlideView};
pub use loader::{HttpImageLoader, ImageLoader, RecordingImageLoader};
pub use slide::{css_url, Rect, Slide};
pub use timer::{AutoplayTimer, ManualTimer, TokioAutoplayTimer};
