//! LRU List Module
//!
//! Recency-ordered map backed by a node arena and a key index.

use std::collections::HashMap;

// == Node ==
#[derive(Debug)]
struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU List ==
/// Doubly-linked list of entries with O(1) lookup, promotion and eviction.
///
/// - Head = least recently used
/// - Tail = most recently used
///
/// Links are arena indices; vacated slots are recycled through a free list.
#[derive(Debug)]
pub struct LruList<V> {
    nodes: Vec<Option<Node<V>>>,
    free: Vec<usize>,
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<V> Default for LruList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LruList<V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            index: HashMap::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    // == Push Back ==
    /// Inserts `value` at the most-recently-used end.
    ///
    /// An existing entry for `key` is replaced and moved to the tail; its old
    /// value is returned.
    pub fn push_back(&mut self, key: String, value: V) -> Option<V> {
        if let Some(&idx) = self.index.get(&key) {
            let old = std::mem::replace(&mut self.node_mut(idx).value, value);
            self.move_to_back(idx);
            return Some(old);
        }

        let node = Node {
            key: key.clone(),
            value,
            prev: self.tail,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };

        match self.tail {
            Some(old_tail) => self.node_mut(old_tail).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.index.insert(key, idx);
        None
    }

    // == Peek ==
    /// Returns the value for `key` without changing its position.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&idx| &self.node(idx).value)
    }

    // == Touch ==
    /// Marks `key` as most recently used. Returns false if it is not present.
    pub fn touch(&mut self, key: &str) -> bool {
        match self.index.get(key) {
            Some(&idx) => {
                self.move_to_back(idx);
                true
            }
            None => false,
        }
    }

    // == Remove ==
    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.index.remove(key)?;
        Some(self.unlink_and_free(idx).1)
    }

    // == Pop Front ==
    /// Removes and returns the least recently used entry.
    pub fn pop_front(&mut self) -> Option<(String, V)> {
        let idx = self.head?;
        let (key, value) = self.unlink_and_free(idx);
        self.index.remove(&key);
        Some((key, value))
    }

    // == Peek Front ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub fn peek_front(&self) -> Option<&str> {
        self.head.map(|idx| self.node(idx).key.as_str())
    }

    // == Length ==
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Keys ==
    /// Keys from least to most recently used.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.node(idx);
            keys.push(node.key.as_str());
            cursor = node.next;
        }
        keys
    }

    // == Internals ==
    fn node(&self, idx: usize) -> &Node<V> {
        self.nodes[idx]
            .as_ref()
            .expect("lru index points at a vacant slot")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<V> {
        self.nodes[idx]
            .as_mut()
            .expect("lru index points at a vacant slot")
    }

    /// Detaches `idx` from its neighbours, leaving its own links stale.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };
        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    fn move_to_back(&mut self, idx: usize) {
        if self.tail == Some(idx) {
            return;
        }
        self.unlink(idx);

        let old_tail = self.tail;
        {
            let node = self.node_mut(idx);
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(t) => self.node_mut(t).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    fn unlink_and_free(&mut self, idx: usize) -> (String, V) {
        self.unlink(idx);
        let node = self.nodes[idx]
            .take()
            .expect("lru index points at a vacant slot");
        self.free.push(idx);
        (node.key, node.value)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(keys: &[&str]) -> LruList<usize> {
        let mut lru = LruList::new();
        for (i, key) in keys.iter().enumerate() {
            lru.push_back(key.to_string(), i);
        }
        lru
    }

    #[test]
    fn test_lru_new() {
        let lru: LruList<u8> = LruList::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.peek_front(), None);
    }

    #[test]
    fn test_lru_push_back_orders_oldest_first() {
        let lru = list_of(&["key1", "key2", "key3"]);

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_front(), Some("key1"));
        assert_eq!(lru.keys(), vec!["key1", "key2", "key3"]);
    }

    #[test]
    fn test_lru_push_back_existing_key_replaces_and_promotes() {
        let mut lru = list_of(&["a", "b", "c"]);

        let old = lru.push_back("a".to_string(), 42);

        assert_eq!(old, Some(0));
        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek("a"), Some(&42));
        assert_eq!(lru.keys(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_lru_touch_moves_to_back() {
        let mut lru = list_of(&["a", "b", "c"]);

        assert!(lru.touch("a"));
        assert_eq!(lru.peek_front(), Some("b"));

        assert_eq!(lru.pop_front(), Some(("b".to_string(), 1)));
        assert_eq!(lru.pop_front(), Some(("c".to_string(), 2)));
        assert_eq!(lru.pop_front(), Some(("a".to_string(), 0)));
        assert_eq!(lru.pop_front(), None);
    }

    #[test]
    fn test_lru_touch_tail_and_missing() {
        let mut lru = list_of(&["a", "b"]);

        assert!(lru.touch("b"));
        assert_eq!(lru.keys(), vec!["a", "b"]);
        assert!(!lru.touch("nonexistent"));
    }

    #[test]
    fn test_lru_order_after_multiple_touches() {
        let mut lru = list_of(&["a", "b", "c"]);

        lru.touch("a");
        lru.touch("c");
        lru.touch("b");

        assert_eq!(lru.keys(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_lru_remove_head_middle_tail() {
        let mut lru = list_of(&["a", "b", "c", "d"]);

        assert_eq!(lru.remove("b"), Some(1));
        assert_eq!(lru.keys(), vec!["a", "c", "d"]);

        assert_eq!(lru.remove("a"), Some(0));
        assert_eq!(lru.peek_front(), Some("c"));

        assert_eq!(lru.remove("d"), Some(3));
        assert_eq!(lru.keys(), vec!["c"]);

        assert_eq!(lru.remove("nonexistent"), None);
        assert!(!lru.contains("a"));
        assert!(lru.contains("c"));
    }

    #[test]
    fn test_lru_remove_last_entry_empties_list() {
        let mut lru = list_of(&["only"]);
        assert_eq!(lru.remove("only"), Some(0));
        assert!(lru.is_empty());
        assert_eq!(lru.peek_front(), None);
        assert!(lru.keys().is_empty());

        lru.push_back("again".to_string(), 7);
        assert_eq!(lru.keys(), vec!["again"]);
    }

    #[test]
    fn test_lru_reuses_freed_slots() {
        let mut lru = list_of(&["a", "b", "c"]);
        lru.pop_front();
        lru.remove("c");
        lru.push_back("d".to_string(), 3);
        lru.push_back("e".to_string(), 4);

        assert_eq!(lru.nodes.len(), 3);
        assert_eq!(lru.keys(), vec!["b", "d", "e"]);
    }
}
