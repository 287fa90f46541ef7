//! In-process reactive snapshot store
//!
//! A `Store<T>` holds the latest full snapshot of a collection plus an
//! ordered list of observers. Publishing replaces the snapshot and
//! notifies every observer synchronously, in subscription order; a new
//! observer receives the current snapshot inline while subscribing.
//! Each repository owns its own instance; there is no global registry.

use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;
type ObserverList<T> = Arc<Mutex<Vec<(u64, Observer<T>)>>>;

/// Push-based cache of a collection snapshot
pub struct Store<T> {
    snapshot: RwLock<T>,
    observers: ObserverList<T>,
    next_id: AtomicU64,
}

impl<T: Clone> Store<T> {
    /// Create a store holding an initial snapshot
    pub fn new(initial: T) -> Self {
        Self {
            snapshot: RwLock::new(initial),
            observers: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Latest snapshot, without subscribing
    pub fn current(&self) -> T {
        self.snapshot.read().clone()
    }

    /// Register an observer
    ///
    /// The current snapshot is delivered inline before this returns, then
    /// every later snapshot in publish order. Dropping the returned
    /// [`Subscription`] unregisters the observer.
    pub fn subscribe<F>(&self, observer: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let observer: Observer<T> = Arc::new(observer);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers.lock().push((id, observer.clone()));

        // Replay the latest snapshot to the new observer. The snapshot is
        // cloned out first so the observer runs without any lock held.
        let snapshot = self.current();
        observer(&snapshot);

        Subscription {
            id,
            observers: self.observers.clone(),
        }
    }

    /// Replace the snapshot and notify all observers in subscription order
    pub fn publish(&self, snapshot: T) {
        *self.snapshot.write() = snapshot.clone();

        // Observers run outside the locks so they may re-enter `current`
        // or `subscribe` on this store.
        let observers: Vec<Observer<T>> =
            self.observers.lock().iter().map(|(_, o)| o.clone()).collect();
        for observer in observers {
            observer(&snapshot);
        }
    }
}

impl<T> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("observers", &self.observers.lock().len())
            .finish_non_exhaustive()
    }
}

/// Handle to a registered observer; dropping it unsubscribes
#[must_use = "dropping a Subscription immediately unsubscribes the observer"]
pub struct Subscription<T> {
    id: u64,
    observers: ObserverList<T>,
}

impl<T> Subscription<T> {
    /// Unregister the observer now
    pub fn cancel(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.observers.lock().retain(|(id, _)| *id != self.id);
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_replays_current_snapshot() {
        let store = Store::new(vec![1, 2]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let _sub = store.subscribe(move |snapshot: &Vec<i32>| sink.lock().push(snapshot.clone()));
        assert_eq!(*seen.lock(), vec![vec![1, 2]]);
    }

    #[test]
    fn test_publish_notifies_in_order() {
        let store = Store::new(Vec::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = store.subscribe(move |snapshot: &Vec<i32>| sink.lock().push(snapshot.clone()));

        store.publish(vec![1]);
        store.publish(vec![1, 2]);

        assert_eq!(*seen.lock(), vec![vec![], vec![1], vec![1, 2]]);
        assert_eq!(store.current(), vec![1, 2]);
    }

    #[test]
    fn test_observers_notified_in_subscription_order() {
        let store = Store::new(0i32);
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = order.clone();
        let _a = store.subscribe(move |_: &i32| first.lock().push("a"));
        let second = order.clone();
        let _b = store.subscribe(move |_: &i32| second.lock().push("b"));

        order.lock().clear();
        store.publish(1);
        assert_eq!(*order.lock(), vec!["a", "b"]);
    }

    #[test]
    fn test_dropped_subscription_stops_delivery() {
        let store = Store::new(Vec::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let sub = store.subscribe(move |snapshot: &Vec<i32>| sink.lock().push(snapshot.clone()));
        store.publish(vec![1]);
        drop(sub);
        store.publish(vec![2]);

        assert_eq!(*seen.lock(), vec![vec![], vec![1]]);
    }

    #[test]
    fn test_observer_may_read_store_reentrantly() {
        let store = Arc::new(Store::new(0i32));
        let inner = store.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let _sub = store.subscribe(move |value: &i32| {
            // `current` from inside a notification must not deadlock
            sink.lock().push((*value, inner.current()));
        });

        store.publish(7);
        assert_eq!(*seen.lock(), vec![(0, 0), (7, 7)]);
    }
}
