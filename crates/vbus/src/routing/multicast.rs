// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Multicast subscription fanout registry.
//!
//! Maps multicast ids to the set of receiver ids subscribed to them. The
//! router consults this directory when delivering publications.

use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Thread-safe set-valued map: multicast id -> receiver ids.
///
/// The lock is reentrant because publication delivery may re-enter the
/// directory through listener callbacks that register or unregister
/// receivers while a dispatch on the same thread is still in progress.
/// Every operation scopes its interior borrow to itself, so re-entrant
/// calls always observe a consistent map.
pub struct MulticastReceiverDirectory {
    receivers: ReentrantMutex<RefCell<HashMap<String, HashSet<String>>>>,
}

impl MulticastReceiverDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            receivers: ReentrantMutex::new(RefCell::new(HashMap::new())),
        }
    }

    /// Subscribe `receiver_id` to `multicast_id`. Idempotent.
    pub fn register(&self, multicast_id: &str, receiver_id: &str) {
        log::debug!(
            "[multicast] register receiver {} for multicast {}",
            receiver_id,
            multicast_id
        );
        let guard = self.receivers.lock();
        guard
            .borrow_mut()
            .entry(multicast_id.to_string())
            .or_default()
            .insert(receiver_id.to_string());
    }

    /// Unsubscribe `receiver_id` from `multicast_id`.
    ///
    /// Returns whether a subscription was actually removed. Emptied
    /// multicast ids are dropped from the map.
    pub fn unregister(&self, multicast_id: &str, receiver_id: &str) -> bool {
        log::debug!(
            "[multicast] unregister receiver {} from multicast {}",
            receiver_id,
            multicast_id
        );
        let guard = self.receivers.lock();
        let mut map = guard.borrow_mut();
        let Some(receivers) = map.get_mut(multicast_id) else {
            return false;
        };
        let removed = receivers.remove(receiver_id);
        if receivers.is_empty() {
            map.remove(multicast_id);
        }
        removed
    }

    /// Snapshot of the receivers currently subscribed to `multicast_id`.
    ///
    /// Returns the empty set when the id is unknown. The snapshot is a copy;
    /// later mutations do not affect it.
    #[must_use]
    pub fn get_receivers(&self, multicast_id: &str) -> HashSet<String> {
        let guard = self.receivers.lock();
        let map = guard.borrow();
        map.get(multicast_id).cloned().unwrap_or_default()
    }

    /// Snapshot of every multicast id with at least one receiver.
    ///
    /// Used by a shutting-down router to unsubscribe all registrations.
    #[must_use]
    pub fn multicast_ids(&self) -> Vec<String> {
        let guard = self.receivers.lock();
        let map = guard.borrow();
        map.keys().cloned().collect()
    }

    /// Whether any receiver is subscribed to `multicast_id`.
    #[must_use]
    pub fn contains(&self, multicast_id: &str) -> bool {
        let guard = self.receivers.lock();
        let map = guard.borrow();
        map.contains_key(multicast_id)
    }

    /// Whether `receiver_id` is subscribed to `multicast_id`.
    #[must_use]
    pub fn contains_receiver(&self, multicast_id: &str, receiver_id: &str) -> bool {
        let guard = self.receivers.lock();
        let map = guard.borrow();
        map.get(multicast_id)
            .is_some_and(|receivers| receivers.contains(receiver_id))
    }
}

impl Default for MulticastReceiverDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_register_and_get_receivers() {
        let directory = MulticastReceiverDirectory::new();
        directory.register("m1", "r1");
        directory.register("m1", "r2");

        let receivers = directory.get_receivers("m1");
        assert_eq!(receivers.len(), 2);
        assert!(receivers.contains("r1"));
        assert!(receivers.contains("r2"));
    }

    #[test]
    fn test_register_is_idempotent() {
        let directory = MulticastReceiverDirectory::new();
        directory.register("m1", "r1");
        directory.register("m1", "r1");
        assert_eq!(directory.get_receivers("m1").len(), 1);

        // Set semantics: one unregister removes the membership regardless of
        // how many times it was registered.
        assert!(directory.unregister("m1", "r1"));
        assert!(!directory.get_receivers("m1").contains("r1"));
    }

    #[test]
    fn test_unregister_reports_change() {
        let directory = MulticastReceiverDirectory::new();
        directory.register("m1", "r1");

        assert!(directory.unregister("m1", "r1"));
        assert!(!directory.unregister("m1", "r1"));
        assert!(!directory.unregister("unknown", "r1"));
    }

    #[test]
    fn test_emptied_multicast_id_is_dropped() {
        let directory = MulticastReceiverDirectory::new();
        directory.register("m1", "r1");
        assert!(directory.contains("m1"));

        directory.unregister("m1", "r1");
        assert!(!directory.contains("m1"));
        assert!(directory.multicast_ids().is_empty());
    }

    #[test]
    fn test_contains_receiver() {
        let directory = MulticastReceiverDirectory::new();
        directory.register("m1", "r1");

        assert!(directory.contains_receiver("m1", "r1"));
        assert!(!directory.contains_receiver("m1", "r2"));
        assert!(!directory.contains_receiver("m2", "r1"));
    }

    #[test]
    fn test_unknown_multicast_returns_empty_set() {
        let directory = MulticastReceiverDirectory::new();
        assert!(directory.get_receivers("unknown").is_empty());
    }

    #[test]
    fn test_snapshot_is_independent_of_later_mutations() {
        let directory = MulticastReceiverDirectory::new();
        directory.register("m1", "r1");

        let snapshot = directory.get_receivers("m1");
        directory.unregister("m1", "r1");
        assert!(snapshot.contains("r1"));
    }

    #[test]
    fn test_membership_follows_register_unregister_balance() {
        // getReceivers(m) equals the set of receivers whose registrations
        // outnumber their unregistrations, under set semantics.
        let directory = MulticastReceiverDirectory::new();
        directory.register("m1", "r1");
        directory.register("m1", "r1");
        directory.register("m1", "r2");
        directory.unregister("m1", "r1");

        let receivers = directory.get_receivers("m1");
        assert!(!receivers.contains("r1"));
        assert!(receivers.contains("r2"));
    }

    #[test]
    fn test_concurrent_register_unregister() {
        let directory = Arc::new(MulticastReceiverDirectory::new());
        let mut handles = Vec::new();

        for worker in 0..8 {
            let directory = Arc::clone(&directory);
            handles.push(thread::spawn(move || {
                let receiver = format!("r{}", worker);
                for _ in 0..100 {
                    directory.register("m1", &receiver);
                    assert!(directory.contains_receiver("m1", &receiver));
                    directory.unregister("m1", &receiver);
                }
            }));
        }
        for handle in handles {
            handle.join().expect("worker panicked");
        }

        assert!(directory.get_receivers("m1").is_empty());
    }
}
