//! Hero carousel state machine.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::carousel::{AutoplayTimer, ImageLoader, Rect, Slide};

/// Renders slides.
pub trait SlideView: Send + Sync {
    /// Mark slide `index` (and its dot) active, every other one inactive.
    fn show(&self, index: usize);

    /// Replace a slide's background image.
    fn set_background(&self, index: usize, url: &str);
}

impl<T: SlideView + ?Sized> SlideView for Arc<T> {
    fn show(&self, index: usize) {
        (**self).show(index)
    }

    fn set_background(&self, index: usize, url: &str) {
        (**self).set_background(index, url)
    }
}

/// Autoplay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselState {
    Playing,
    Paused,
}

/// Inputs consumed by [`CarouselController::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselInput {
    /// The autoplay timer fired. Carries the timer run's generation.
    Tick(u64),
    PointerEnter,
    PointerLeave,
    DotClicked(usize),
    /// A slide came within the lazy-load margin of the viewport.
    SlideVisible(usize),
    Shutdown,
}

/// Slides, autoplay and lazy image loading for one carousel.
///
/// `current_index` is always within `0..len`; the constructor rejects an
/// empty slide list. The loaded set only grows.
pub struct CarouselController<V, T, L> {
    slides: Vec<Slide>,
    view: V,
    timer: T,
    loader: L,
    state: CarouselState,
    current: usize,
    requested: BTreeSet<usize>,
    loaded: BTreeSet<usize>,
    observed: BTreeSet<usize>,
    root_margin: f64,
}

/// Default lazy-load margin around the viewport, in CSS pixels.
const DEFAULT_ROOT_MARGIN: f64 = 50.0;

impl<V: SlideView, T: AutoplayTimer, L: ImageLoader> CarouselController<V, T, L> {
    /// Returns `None` when there are no slides.
    pub fn new(slides: Vec<Slide>, view: V, timer: T, loader: L) -> Option<Self> {
        if slides.is_empty() {
            return None;
        }
        Some(Self {
            slides,
            view,
            timer,
            loader,
            state: CarouselState::Paused,
            current: 0,
            requested: BTreeSet::new(),
            loaded: BTreeSet::new(),
            observed: BTreeSet::new(),
            root_margin: DEFAULT_ROOT_MARGIN,
        })
    }

    /// Distance outside the viewport at which slides start loading.
    pub fn with_root_margin(mut self, px: f64) -> Self {
        self.root_margin = px.max(0.0);
        self
    }

    /// Load the first slide, start observing the rest, and start autoplay.
    pub async fn init(&mut self) {
        self.load_slide(0).await;
        self.observed = (1..self.slides.len()).collect();
        self.timer.start();
        self.state = CarouselState::Playing;
        tracing::debug!(slides = self.slides.len(), "carousel started");
    }

    /// Process inputs until `Shutdown` or until every sender is gone.
    ///
    /// Call [`init`](Self::init) first. Returns the controller with autoplay
    /// stopped.
    pub async fn run(mut self, mut inputs: UnboundedReceiver<CarouselInput>) -> Self {
        while let Some(input) = inputs.recv().await {
            match input {
                CarouselInput::Tick(generation) => self.tick(generation),
                CarouselInput::PointerEnter => self.pointer_enter(),
                CarouselInput::PointerLeave => self.pointer_leave(),
                CarouselInput::DotClicked(index) => self.dot_clicked(index),
                CarouselInput::SlideVisible(index) => self.slide_visible(index).await,
                CarouselInput::Shutdown => break,
            }
        }
        self.timer.stop();
        self
    }

    /// Pause autoplay while the pointer is over the carousel.
    pub fn pointer_enter(&mut self) {
        if self.state == CarouselState::Playing {
            self.timer.stop();
            self.state = CarouselState::Paused;
        }
    }

    /// Resume autoplay when the pointer leaves.
    pub fn pointer_leave(&mut self) {
        if self.state == CarouselState::Paused {
            self.timer.start();
            self.state = CarouselState::Playing;
        }
    }

    /// Jump to slide `index` and restart the autoplay period. Out-of-range
    /// dots are ignored.
    pub fn dot_clicked(&mut self, index: usize) {
        if index >= self.slides.len() {
            tracing::debug!(index, "ignoring click on unknown dot");
            return;
        }
        self.timer.stop();
        self.show(index);
        self.timer.start();
        self.state = CarouselState::Playing;
    }

    /// Handle a timer tick; ticks from a stopped or replaced run are dropped.
    pub fn tick(&mut self, generation: u64) {
        if !self.timer.accepts(generation) {
            tracing::trace!(generation, "stale autoplay tick");
            return;
        }
        self.advance();
    }

    /// Move to the next slide, wrapping around.
    pub fn advance(&mut self) {
        let next = (self.current + 1) % self.slides.len();
        self.show(next);
    }

    /// First intersection of an observed slide triggers its load; later ones
    /// are ignored.
    pub async fn slide_visible(&mut self, index: usize) {
        if self.observed.remove(&index) {
            self.load_slide(index).await;
        }
    }

    /// Check every still-observed slide against `viewport` and load the ones
    /// that came within the root margin. `bounds[i]` is slide `i`'s box;
    /// slides without a box are skipped.
    pub async fn viewport_changed(&mut self, viewport: Rect, bounds: &[Rect]) {
        let entering: Vec<usize> = self
            .observed
            .iter()
            .copied()
            .filter(|&i| {
                bounds
                    .get(i)
                    .is_some_and(|b| b.intersects(&viewport, self.root_margin))
            })
            .collect();
        for index in entering {
            self.slide_visible(index).await;
        }
    }

    /// Prefetch a slide's background, swapping in the fallback if it fails.
    ///
    /// A slide is attempted once, so at most two requests are made for it.
    pub async fn load_slide(&mut self, index: usize) {
        let Some(slide) = self.slides.get(index) else {
            return;
        };
        if !self.requested.insert(index) {
            return;
        }
        let Some(primary) = slide.background() else {
            return;
        };

        match self.loader.load(primary).await {
            Ok(()) => {
                self.loaded.insert(index);
            }
            Err(e) => {
                let Some(fallback) = slide.fallback() else {
                    tracing::warn!(index, url = primary, error = %e, "slide image failed");
                    return;
                };
                tracing::debug!(index, url = primary, error = %e, "using fallback slide image");
                self.view.set_background(index, fallback);
                match self.loader.load(fallback).await {
                    Ok(()) => {
                        self.loaded.insert(index);
                    }
                    Err(e) => {
                        tracing::warn!(index, url = fallback, error = %e, "fallback image failed");
                    }
                }
            }
        }
    }

    pub fn state(&self) -> CarouselState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false; a carousel has at least one slide.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.loaded.contains(&index)
    }

    /// Slides whose image loaded, ascending.
    pub fn loaded(&self) -> Vec<usize> {
        self.loaded.iter().copied().collect()
    }

    /// Slides still waiting for their first intersection.
    pub fn observed(&self) -> Vec<usize> {
        self.observed.iter().copied().collect()
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    fn show(&mut self, index: usize) {
        self.current = index;
        self.view.show(index);
    }
}

impl<V, T, L> std::fmt::Debug for CarouselController<V, T, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselController")
            .field("slides", &self.slides.len())
            .field("state", &self.state)
            .field("current", &self.current)
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}
