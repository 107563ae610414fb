//! Analytics event pipeline.
//!
//! Every interaction ends in an [`EventDraft`] handed to the
//! [`AnalyticsEmitter`], which stamps identity and time and appends the
//! result to the [`DataLayer`].

mod data_layer;
mod emitter;
mod event;

pub use data_layer::{DataLayer, InMemoryDataLayer};
pub use emitter::AnalyticsEmitter;
pub use event::{AnalyticsEvent, EventDraft, EventInfo, EventName, PageContext, ProductEntry};
