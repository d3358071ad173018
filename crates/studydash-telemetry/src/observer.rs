// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Ordered, panic-isolated observer lists.

use crate::sync::lock;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Handle returned on subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }
}

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A thread-safe list of callbacks invoked in registration order.
///
/// A callback that panics is logged and skipped; the remaining callbacks and
/// the caller are unaffected.
pub struct ObserverList<T> {
    observers: Mutex<Vec<(SubscriptionId, Callback<T>)>>,
}

impl<T> ObserverList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Appends a callback.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        lock(&self.observers).push((id, Arc::new(callback)));
        id
    }

    /// Removes a callback. Returns `false` if it was not registered here.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = lock(&self.observers);
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        lock(&self.observers).len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invokes every callback with `value`, in registration order.
    ///
    /// Returns the number of callbacks that panicked. The lock is released
    /// before any callback runs, so callbacks may subscribe or unsubscribe.
    pub fn notify(&self, value: &T) -> usize {
        let snapshot: Vec<Callback<T>> = lock(&self.observers)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        let mut failures = 0;
        for callback in snapshot {
            if catch_unwind(AssertUnwindSafe(|| callback(value))).is_err() {
                failures += 1;
                log::warn!("Observer callback panicked; continuing with the remaining observers.");
            }
        }
        failures
    }
}

impl<T> Default for ObserverList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ObserverList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_in_registration_order() {
        let list = ObserverList::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let seen = Arc::clone(&seen);
            list.subscribe(move |v| seen.lock().unwrap().push(format!("{tag}{v}")));
        }

        assert_eq!(list.notify(&1), 0);
        assert_eq!(*seen.lock().unwrap(), vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn test_panicking_observer_is_isolated() {
        let list = ObserverList::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        list.subscribe(move |v| first.lock().unwrap().push(*v));
        list.subscribe(|_| panic!("observer failure"));
        let last = Arc::clone(&seen);
        list.subscribe(move |v| last.lock().unwrap().push(*v * 10));

        assert_eq!(list.notify(&2), 1);
        assert_eq!(*seen.lock().unwrap(), vec![2, 20]);
    }

    #[test]
    fn test_unsubscribe() {
        let list = ObserverList::<u32>::new();
        let id = list.subscribe(|_| {});
        list.subscribe(|_| {});
        assert_eq!(list.len(), 2);
        assert!(list.unsubscribe(id));
        assert!(!list.unsubscribe(id));
        assert_eq!(list.len(), 1);
    }
}
