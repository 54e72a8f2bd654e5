//! ---
//! opm_section: "01-core-functionality"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Per-tick callback registry."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use parking_lot::Mutex;

use crate::snapshot::DashboardSnapshot;

/// Callback invoked once per committed tick with the new snapshot.
pub type TickCallback = Box<dyn FnMut(&DashboardSnapshot) + Send>;

/// Handle identifying one registered tick callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Id-keyed registry of tick callbacks.
///
/// Notification runs the callbacks inline under the registry lock, so once
/// `unsubscribe` returns the removed callback can never run again. That is
/// the contract the dashboard teardown relies on.
#[derive(Default)]
pub struct SubscriberRegistry {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    subscribers: Vec<(u64, TickCallback)>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: TickCallback) -> SubscriptionId {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, callback));
        SubscriptionId(id)
    }

    /// Remove a callback. Returns false when the id was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(key, _)| *key != id.0);
        inner.subscribers.len() != before
    }

    pub fn notify(&self, snapshot: &DashboardSnapshot) {
        let mut inner = self.inner.lock();
        for (_, callback) in inner.subscribers.iter_mut() {
            callback(snapshot);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("subscribers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use opm_telemetry::{seed_alerts, CurrentReadings, FieldTable};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn snapshot() -> DashboardSnapshot {
        DashboardSnapshot {
            tick: 1,
            committed_at: Local::now(),
            readings: CurrentReadings::baseline(&FieldTable::default()),
            history: Vec::new(),
            alerts: seed_alerts(),
        }
    }

    #[test]
    fn notify_reaches_every_subscriber() {
        let registry = SubscriberRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let calls = calls.clone();
            registry.subscribe(Box::new(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            }));
        }
        registry.notify(&snapshot());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn unsubscribed_callback_never_fires_again() {
        let registry = SubscriberRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let id = registry.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        registry.notify(&snapshot());
        assert!(registry.unsubscribe(id));
        for _ in 0..5 {
            registry.notify(&snapshot());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let registry = SubscriberRegistry::new();
        let id = registry.subscribe(Box::new(|_| {}));
        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        assert!(registry.is_empty());
    }
}
