use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::sync::{Arc, Mutex, RwLock, Weak};
use std::time::Duration;

use crate::log;

/// A shared value whose changes are fanned out to subscribers.
///
/// Notification never blocks the writer: each subscriber has room for one
/// pending value, and a subscriber that has not drained the previous one is
/// skipped.
pub struct Observable<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    value: RwLock<T>,
    subscribers: Mutex<Vec<Subscriber<T>>>,
    next_id: AtomicU64,
}

struct Subscriber<T> {
    id: u64,
    tx: SyncSender<T>,
}

/// Receiving side of a subscription. Unsubscribes itself when dropped.
pub struct Subscription<T> {
    id: u64,
    rx: Receiver<T>,
    shared: Weak<Shared<T>>,
}

impl<T: Clone> Observable<T> {
    /// Creates an observable holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: RwLock::new(initial),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.shared.value.read().unwrap().clone()
    }

    /// Replaces the value and notifies all subscribers.
    pub fn set(&self, value: T) {
        {
            let mut guard = self.shared.value.write().unwrap();
            *guard = value.clone();
        }
        self.notify(value);
    }

    /// Registers a new subscriber.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = sync_channel(1);
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        self.shared
            .subscribers
            .lock()
            .unwrap()
            .push(Subscriber { id, tx });
        Subscription {
            id,
            rx,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.lock().unwrap().len()
    }

    fn notify(&self, value: T) {
        let subscribers = self.shared.subscribers.lock().unwrap();
        for subscriber in subscribers.iter() {
            if subscriber.tx.try_send(value.clone()).is_err() {
                log::trace!(
                    "observable: subscriber {} has an undrained value, skipping",
                    subscriber.id
                );
            }
        }
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Subscription<T> {
    /// Blocks until a value is published. Returns None once the observable
    /// has been dropped.
    pub fn recv(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// Like [`recv`](Subscription::recv) with an upper bound on the wait.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Returns a pending value without blocking, if there is one.
    pub fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            let mut subscribers = shared.subscribers.lock().unwrap();
            if let Some(pos) = subscribers.iter().position(|s| s.id == self.id) {
                subscribers.swap_remove(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn get_returns_current_value() {
        let obs = Observable::new(10);
        assert_eq!(obs.get(), 10);
        obs.set(42);
        assert_eq!(obs.get(), 42);
    }

    #[test]
    fn subscriber_receives_updates() {
        let obs = Observable::new(String::new());
        let sub = obs.subscribe();

        obs.set("hello".to_string());
        assert_eq!(sub.recv_timeout(Duration::from_secs(1)).as_deref(), Some("hello"));
    }

    #[test]
    fn slow_subscriber_is_skipped_not_blocked() {
        let obs = Observable::new(0);
        let sub = obs.subscribe();

        // The buffer holds one value; the second publish is dropped for this
        // subscriber instead of blocking the writer.
        obs.set(1);
        obs.set(2);
        assert_eq!(sub.try_recv(), Some(1));
        assert_eq!(sub.try_recv(), None);

        obs.set(3);
        assert_eq!(sub.try_recv(), Some(3));
    }

    #[test]
    fn drop_unsubscribes() {
        let obs = Observable::new(0);
        let sub = obs.subscribe();
        let sub2 = obs.subscribe();
        assert_eq!(obs.subscriber_count(), 2);

        drop(sub);
        assert_eq!(obs.subscriber_count(), 1);
        drop(sub2);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn recv_ends_when_observable_is_dropped() {
        let obs = Observable::new(0);
        let sub = obs.subscribe();

        let handle = thread::spawn(move || sub.recv());
        thread::sleep(Duration::from_millis(50));
        drop(obs);

        assert_eq!(handle.join().unwrap(), None);
    }

    #[test]
    fn updates_cross_threads() {
        let obs = Observable::new(0u32);
        let sub = obs.subscribe();

        let writer = {
            let obs = obs.clone();
            thread::spawn(move || {
                obs.set(7);
            })
        };

        assert_eq!(sub.recv_timeout(Duration::from_secs(1)), Some(7));
        writer.join().unwrap();
    }
}
