//! Recency List Module
//!
//! Tracks access order for LRU eviction with O(1) touch, remove and pop.

use std::collections::HashMap;

// == Node ==
/// A slot in the arena. Vacant slots keep an empty key and sit on the free list.
#[derive(Debug, Default)]
struct Node {
    key: String,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Doubly-linked list of keys stored in an index-addressed arena.
///
/// - Head = most recently used
/// - Tail = least recently used
///
/// Links are slot indices rather than pointers, and `index` maps each key to
/// its slot so a key can be relocated without scanning.
#[derive(Debug, Default)]
pub struct RecencyList {
    slots: Vec<Node>,
    free: Vec<usize>,
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl RecencyList {
    // == Constructor ==
    /// Creates a new empty recency list.
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            ..Self::default()
        }
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        if let Some(&slot) = self.index.get(key) {
            if self.head != Some(slot) {
                self.unlink(slot);
                self.push_front(slot);
            }
            return;
        }

        let slot = self.allocate(key.to_string());
        self.index.insert(key.to_string(), slot);
        self.push_front(slot);
    }

    // == Remove ==
    /// Removes a key. Returns false if the key was not tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.index.remove(key) {
            Some(slot) => {
                self.unlink(slot);
                self.release(slot);
                true
            }
            None => false,
        }
    }

    // == Pop Least Recent ==
    /// Removes and returns the least recently used key.
    pub fn pop_lru(&mut self) -> Option<String> {
        let slot = self.tail?;
        self.unlink(slot);
        let key = self.release(slot);
        self.index.remove(&key);
        Some(key)
    }

    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub fn peek_lru(&self) -> Option<&str> {
        self.tail.map(|slot| self.slots[slot].key.as_str())
    }

    /// Returns the most recently used key.
    #[cfg(test)]
    pub fn peek_mru(&self) -> Option<&str> {
        self.head.map(|slot| self.slots[slot].key.as_str())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Iterates keys from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Link Integrity ==
    /// Walks the list and checks that links, index and length agree.
    pub fn check_links(&self) -> Result<(), String> {
        let mut visited = 0usize;
        let mut prev: Option<usize> = None;
        let mut cursor = self.head;

        while let Some(slot) = cursor {
            let node = &self.slots[slot];
            if node.prev != prev {
                return Err(format!("slot {slot} has a broken back-link"));
            }
            if self.index.get(&node.key) != Some(&slot) {
                return Err(format!("key '{}' is linked but not indexed", node.key));
            }
            visited += 1;
            if visited > self.index.len() {
                return Err("recency list contains a cycle".to_string());
            }
            prev = Some(slot);
            cursor = node.next;
        }

        if prev != self.tail {
            return Err("tail does not match the last linked slot".to_string());
        }
        if visited != self.index.len() {
            return Err(format!(
                "{visited} linked keys but {} indexed keys",
                self.index.len()
            ));
        }
        Ok(())
    }

    // == Arena Helpers ==
    fn allocate(&mut self, key: String) -> usize {
        let node = Node {
            key,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = node;
                slot
            }
            None => {
                self.slots.push(node);
                self.slots.len() - 1
            }
        }
    }

    /// Returns the slot to the free list and hands back its key.
    fn release(&mut self, slot: usize) -> String {
        self.free.push(slot);
        std::mem::take(&mut self.slots[slot].key)
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = &mut self.slots[slot];
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
    }

    fn push_front(&mut self, slot: usize) {
        let old_head = self.head;
        {
            let node = &mut self.slots[slot];
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => self.slots[h].prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }
}

// == Iterator ==
/// Iterator over keys, most recently used first.
pub struct Iter<'a> {
    list: &'a RecencyList,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = &self.list.slots[slot];
        self.cursor = node.next;
        Some(node.key.as_str())
    }
}
