//! The shared analytics queue ("data layer").

use std::sync::{Arc, Mutex};

use serde_json::Value;

/// Append-only record queue drained by an external tracking agent.
///
/// Records are plain JSON so that whatever the page pushed before the client
/// started (typically a `custData` block) sits in the same queue as the
/// events emitted here.
pub trait DataLayer: Send + Sync {
    /// The first record ever pushed, if any.
    fn first(&self) -> Option<Value>;

    /// Append a record. Records are never mutated or removed afterwards.
    fn push(&self, record: Value);
}

impl<T: DataLayer + ?Sized> DataLayer for Arc<T> {
    fn first(&self) -> Option<Value> {
        (**self).first()
    }

    fn push(&self, record: Value) {
        (**self).push(record)
    }
}

/// In-process data layer. Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataLayer {
    records: Arc<Mutex<Vec<Value>>>,
}

impl InMemoryDataLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A data layer whose first record was pushed by the page before startup.
    pub fn with_initial(record: Value) -> Self {
        let layer = Self::new();
        layer.push(record);
        layer
    }

    /// Copy of every record, in push order.
    pub fn snapshot(&self) -> Vec<Value> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Records whose `event` field equals `name`.
    pub fn events_named(&self, name: &str) -> Vec<Value> {
        self.snapshot()
            .into_iter()
            .filter(|r| r.get("event").and_then(Value::as_str) == Some(name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DataLayer for InMemoryDataLayer {
    fn first(&self) -> Option<Value> {
        self.records.lock().ok().and_then(|r| r.first().cloned())
    }

    fn push(&self, record: Value) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}
