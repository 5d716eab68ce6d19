use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::SubscriptionId;

/// Payload-free change listener.
pub type ChangeCallback = Box<dyn Fn() + Send + Sync>;

/// Fan-out of "something in the table changed" to every live subscription.
///
/// Notifications carry no row data; listeners re-fetch.
#[derive(Clone, Default)]
pub struct ChangeHub {
    inner: Arc<Mutex<HubInner>>,
}

#[derive(Default)]
struct HubInner {
    next_id: SubscriptionId,
    listeners: BTreeMap<SubscriptionId, Arc<dyn Fn() + Send + Sync>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, on_change: ChangeCallback) -> SubscriptionId {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.next_id += 1;
        let id = inner.next_id;
        inner.listeners.insert(id, Arc::from(on_change));
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.listeners.remove(&id).is_some()
    }

    /// Invokes every listener and returns how many were called.
    pub fn notify(&self) -> usize {
        // Listeners run outside the lock so they may subscribe or unsubscribe.
        let listeners: Vec<_> = {
            let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.listeners.values().cloned().collect()
        };
        for listener in &listeners {
            listener();
        }
        listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.listeners.len()
    }
}
