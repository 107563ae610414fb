//! Builds analytics envelopes and appends them to the data layer.

use std::sync::Arc;

use crate::analytics::{AnalyticsEvent, DataLayer, EventDraft, EventInfo};
use crate::clock::Clock;
use crate::identity::IdentityProvider;

/// Turns drafts into [`AnalyticsEvent`]s and pushes them to the data layer.
///
/// Emission never fails from the caller's point of view: the downstream
/// consumer is not ours, so a record that cannot be serialized is logged and
/// dropped.
#[derive(Clone)]
pub struct AnalyticsEmitter {
    sink: Arc<dyn DataLayer>,
    identity: IdentityProvider,
    clock: Arc<dyn Clock>,
}

impl AnalyticsEmitter {
    /// Create an emitter; the session identity is read from `sink` right away.
    pub fn new(sink: Arc<dyn DataLayer>, clock: Arc<dyn Clock>) -> Self {
        let identity = IdentityProvider::from_data_layer(sink.as_ref());
        Self {
            sink,
            identity,
            clock,
        }
    }

    /// Replace the identity provider.
    pub fn with_identity(mut self, identity: IdentityProvider) -> Self {
        self.identity = identity;
        self
    }

    pub fn identity(&self) -> &IdentityProvider {
        &self.identity
    }

    /// Complete a draft without emitting it.
    pub fn build(&self, draft: EventDraft) -> AnalyticsEvent {
        let EventDraft {
            event,
            page,
            product,
            cart,
            cust_data,
        } = draft;

        AnalyticsEvent {
            event_info: EventInfo {
                event_name: event.clone(),
            },
            event,
            page,
            product,
            cart,
            cust_data: cust_data.unwrap_or_else(|| self.identity.resolve()),
            timestamp: self.clock.iso_timestamp(),
        }
    }

    /// Complete a draft and append it to the data layer.
    pub fn emit(&self, draft: EventDraft) {
        let event = self.build(draft);
        match serde_json::to_value(&event) {
            Ok(record) => {
                tracing::info!(event = %event.event, "analytics event emitted");
                self.sink.push(record);
            }
            Err(e) => {
                tracing::warn!(event = %event.event, error = %e, "dropping analytics event");
            }
        }
    }
}

impl std::fmt::Debug for AnalyticsEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsEmitter")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{InMemoryDataLayer, PageContext};
    use crate::clock::FixedClock;
    use crate::identity::Identity;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use turbo_commerce::CartState;

    fn emitter(layer: &InMemoryDataLayer) -> AnalyticsEmitter {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap());
        AnalyticsEmitter::new(Arc::new(layer.clone()), Arc::new(clock))
    }

    #[test]
    fn test_event_name_mirrored_into_event_info() {
        let layer = InMemoryDataLayer::new();
        let event = emitter(&layer).build(EventDraft::new("anythingGoes"));
        assert_eq!(event.event, "anythingGoes");
        assert_eq!(event.event_info.event_name, event.event);
    }

    #[test]
    fn test_emit_appends_full_envelope() {
        let layer = InMemoryDataLayer::new();
        let cart = CartState::with_lines([("A", 2)]);

        emitter(&layer).emit(
            EventDraft::new("scRemove")
                .page(PageContext {
                    language: "en".into(),
                    page_name: "Cart".into(),
                    page_type: Some("cart".into()),
                    url: "https://shop.example/cart".into(),
                })
                .cart(cart),
        );

        let records = layer.snapshot();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            json!({
                "event": "scRemove",
                "eventInfo": {"eventName": "scRemove"},
                "page": {
                    "language": "en",
                    "pageName": "Cart",
                    "pageType": "cart",
                    "url": "https://shop.example/cart"
                },
                "cart": {"items": [{"productId": "A", "qty": 2}]},
                "custData": {
                    "custId": "",
                    "emailID_plain": "",
                    "loginMethod": "guest",
                    "loginStatus": "anonymous",
                    "mobileNo_plain": ""
                },
                "timestamp": "2025-03-04T05:06:07.000Z"
            })
        );
    }

    #[test]
    fn test_explicit_cust_data_wins() {
        let layer = InMemoryDataLayer::with_initial(json!({"custData": {"custId": "C-1"}}));
        let emitter = emitter(&layer);
        let override_identity = Identity::from_value(json!({"custId": "C-9"})).unwrap();

        let session = emitter.build(EventDraft::new("scOpen"));
        let overridden = emitter.build(EventDraft::new("scOpen").cust_data(override_identity));

        assert_eq!(session.cust_data.cust_id(), Some("C-1"));
        assert_eq!(overridden.cust_data.cust_id(), Some("C-9"));
    }

    #[test]
    fn test_events_are_appended_after_initial_record() {
        let layer = InMemoryDataLayer::with_initial(json!({"custData": {"custId": "C-1"}}));
        let emitter = emitter(&layer);
        emitter.emit(EventDraft::new("a"));
        emitter.emit(EventDraft::new("b"));

        let records = layer.snapshot();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], json!({"custData": {"custId": "C-1"}}));
        assert_eq!(records[2]["event"], "b");
        assert_eq!(records[2]["custData"]["custId"], "C-1");
    }
}
