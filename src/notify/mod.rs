// src/notify/mod.rs

//! Named-event fan-out, keyed by `(subject, event kind)`.
//!
//! This is one of two views onto the same transition stream, the other
//! being the per-object [`crate::delegate`] callbacks. Delegate calls fire
//! first, then the matching notification is posted.

pub mod events;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::trace;

pub use events::{EventKind, Notification, Subject};

type Callback = Arc<dyn Fn(&Notification) + Send + Sync>;

#[derive(Default)]
struct Registry {
    subscribers: HashMap<(Subject, EventKind), Vec<(u64, Callback)>>,
}

/// Synchronous, in-process event bus.
///
/// Delivery happens on whatever thread drove the originating state
/// transition (a worker-pool thread, or whichever thread called
/// `finish`/`fail`/`cancel`/...).
#[derive(Clone, Default)]
pub struct NotificationCenter(Arc<Mutex<Registry>>);

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one `(subject, kind)` pair. The callback is removed when
    /// the returned [`Subscription`] is dropped.
    pub fn subscribe(
        &self,
        subject: Subject,
        kind: EventKind,
        callback: impl Fn(&Notification) + Send + Sync + 'static,
    ) -> Subscription {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);

        let mut registry = self.0.lock().unwrap();
        registry
            .subscribers
            .entry((subject, kind))
            .or_default()
            .push((id, Arc::new(callback)));

        Subscription {
            center: self.clone(),
            key: (subject, kind),
            id,
        }
    }

    pub fn post(&self, notification: Notification) {
        let callbacks: Vec<Callback> = {
            let registry = self.0.lock().unwrap();
            match registry
                .subscribers
                .get(&(notification.subject, notification.kind))
            {
                Some(subs) => subs.iter().map(|(_, cb)| cb.clone()).collect(),
                None => return,
            }
        };

        trace!(?notification.subject, ?notification.kind, "posting notification");
        for callback in callbacks {
            callback(&notification);
        }
    }

    fn unsubscribe(&self, key: (Subject, EventKind), id: u64) {
        let mut registry = self.0.lock().unwrap();
        if let Some(subs) = registry.subscribers.get_mut(&key) {
            subs.retain(|(sub_id, _)| *sub_id != id);
        }
    }
}

/// RAII handle returned by [`NotificationCenter::subscribe`]. Dropping it
/// unsubscribes the callback.
pub struct Subscription {
    center: NotificationCenter,
    key: (Subject, EventKind),
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.center.unsubscribe(self.key, self.id);
    }
}
