//! Insertion Order Module
//!
//! Tracks the order in which keys were inserted so the cache can evict the
//! oldest entry in constant amortized time.

use std::collections::VecDeque;

// == Insertion Order ==
/// Queue of `(key, generation)` records in insertion order.
///
/// - Front = oldest insertion
/// - Back = newest insertion
///
/// Overwrites and removals are not searched for in the queue. Instead the
/// store bumps the entry's generation, and the record left behind becomes
/// stale. Stale records are skipped when popping and dropped on `compact`.
#[derive(Debug)]
pub struct InsertionOrder<K> {
    /// Records by insertion time
    queue: VecDeque<(K, u64)>,
}

impl<K> Default for InsertionOrder<K> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<K> InsertionOrder<K> {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Records a key as the newest insertion.
    pub fn push(&mut self, key: K, generation: u64) {
        self.queue.push_back((key, generation));
    }

    // == Pop Oldest ==
    /// Removes and returns the oldest record, stale or not.
    pub fn pop_oldest(&mut self) -> Option<(K, u64)> {
        self.queue.pop_front()
    }

    // == Compact ==
    /// Drops every record for which `is_live` returns false.
    pub fn compact<F>(&mut self, mut is_live: F)
    where
        F: FnMut(&K, u64) -> bool,
    {
        self.queue.retain(|(key, generation)| is_live(key, *generation));
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    // == Length ==
    /// Returns the number of records, including stale ones.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_new() {
        let order: InsertionOrder<&str> = InsertionOrder::new();
        assert!(order.is_empty());
        assert_eq!(order.len(), 0);
    }

    #[test]
    fn test_pop_oldest_follows_insertion_order() {
        let mut order = InsertionOrder::new();

        order.push("a", 0);
        order.push("b", 1);
        order.push("c", 2);

        assert_eq!(order.pop_oldest(), Some(("a", 0)));
        assert_eq!(order.pop_oldest(), Some(("b", 1)));
        assert_eq!(order.pop_oldest(), Some(("c", 2)));
        assert_eq!(order.pop_oldest(), None);
    }

    #[test]
    fn test_reinsert_leaves_stale_record() {
        let mut order = InsertionOrder::new();

        order.push("a", 0);
        order.push("b", 1);
        order.push("a", 2);

        // The first "a" record is still queued; the store decides it is stale.
        assert_eq!(order.len(), 3);
        assert_eq!(order.pop_oldest(), Some(("a", 0)));
    }

    #[test]
    fn test_compact_drops_stale_records() {
        let mut order = InsertionOrder::new();

        order.push("a", 0);
        order.push("b", 1);
        order.push("a", 2);

        order.compact(|key, generation| !(*key == "a" && generation == 0));

        assert_eq!(order.len(), 2);
        assert_eq!(order.pop_oldest(), Some(("b", 1)));
        assert_eq!(order.pop_oldest(), Some(("a", 2)));
    }

    #[test]
    fn test_clear() {
        let mut order = InsertionOrder::new();
        order.push("a", 0);
        order.clear();
        assert!(order.is_empty());
    }
}
