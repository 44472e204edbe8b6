//! LRU List Module
//!
//! Arena-backed doubly-linked list tracking promotion order for eviction.

use crate::cache::CacheEntry;

// == Slot Id ==
/// Stable handle to an entry's node in the list arena.
///
/// Valid until the entry is removed; the slot may then be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

#[derive(Debug)]
struct Node {
    entry: CacheEntry,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

// == LRU List ==
/// Tracks promotion order for LRU eviction.
///
/// Nodes live in a slot vector and link to each other by index:
/// - Head = hot end (most recently promoted)
/// - Tail = cold end (next eviction candidate)
///
/// Push, move-to-front and removal are all O(1).
#[derive(Debug, Default)]
pub struct LruList {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl LruList {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    // == Push Front ==
    /// Stores `entry` at the hot end and returns its handle.
    pub fn push_front(&mut self, entry: CacheEntry) -> SlotId {
        let node = Node {
            entry,
            prev: None,
            next: None,
        };
        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                SlotId(index)
            }
            None => {
                self.slots.push(Some(node));
                SlotId(self.slots.len() - 1)
            }
        };
        self.link_front(id);
        self.len += 1;
        id
    }

    // == Move To Front ==
    /// Moves an existing node to the hot end. Unknown handles are ignored.
    pub fn move_to_front(&mut self, id: SlotId) {
        if self.head == Some(id) || self.node(id).is_none() {
            return;
        }
        self.unlink(id);
        self.link_front(id);
    }

    // == Remove ==
    /// Detaches a node and returns its entry.
    pub fn remove(&mut self, id: SlotId) -> Option<CacheEntry> {
        self.node(id)?;
        self.unlink(id);
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(node.entry)
    }

    // == Pop Back ==
    /// Removes and returns the coldest entry.
    pub fn pop_back(&mut self) -> Option<CacheEntry> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Peek Back ==
    /// Returns the coldest entry without removing it.
    #[cfg(test)]
    pub(crate) fn back(&self) -> Option<&CacheEntry> {
        self.tail.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: SlotId) -> Option<&CacheEntry> {
        self.node(id).map(|node| &node.entry)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut CacheEntry> {
        self.node_mut(id).map(|node| &mut node.entry)
    }

    // == Length ==
    /// Returns the number of linked nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iterate ==
    /// Walks the list from the hot end to the cold end.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn node(&self, id: SlotId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: SlotId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    fn unlink(&mut self, id: SlotId) {
        let Some((prev, next)) = self.node(id).map(|node| (node.prev, node.next)) else {
            return;
        };

        match prev.and_then(|p| self.node_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.node_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = None;
        }
    }

    fn link_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|h| self.node_mut(h)) {
            Some(head_node) => head_node.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }
}

// == Iterator ==
/// Hot-to-cold iterator over list entries.
pub struct Iter<'a> {
    list: &'a LruList,
    cursor: Option<SlotId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (SlotId, &'a CacheEntry);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.list.node(id)?;
        self.cursor = node.next;
        Some((id, &node.entry))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::Instant;

    fn entry(key: &str) -> CacheEntry {
        CacheEntry::new(
            key.to_string(),
            format!("value_{}", key),
            Instant::now(),
            Duration::from_secs(60),
        )
    }

    fn keys(list: &LruList) -> Vec<String> {
        list.iter().map(|(_, e)| e.key.clone()).collect()
    }

    #[test]
    fn test_list_new() {
        let list = LruList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.back().is_none());
    }

    #[test]
    fn test_push_front_order() {
        let mut list = LruList::new();

        list.push_front(entry("key1"));
        list.push_front(entry("key2"));
        list.push_front(entry("key3"));

        assert_eq!(list.len(), 3);
        assert_eq!(keys(&list), vec!["key3", "key2", "key1"]);
        // key1 is coldest (added first)
        assert_eq!(list.back().unwrap().key, "key1");
    }

    #[test]
    fn test_move_to_front() {
        let mut list = LruList::new();

        let a = list.push_front(entry("a"));
        list.push_front(entry("b"));
        list.push_front(entry("c"));

        list.move_to_front(a);

        assert_eq!(keys(&list), vec!["a", "c", "b"]);
        assert_eq!(list.back().unwrap().key, "b");
    }

    #[test]
    fn test_move_middle_and_head() {
        let mut list = LruList::new();

        list.push_front(entry("a"));
        let b = list.push_front(entry("b"));
        let c = list.push_front(entry("c"));

        list.move_to_front(b);
        assert_eq!(keys(&list), vec!["b", "c", "a"]);

        // Already at the head: no change
        list.move_to_front(b);
        assert_eq!(keys(&list), vec!["b", "c", "a"]);

        list.move_to_front(c);
        assert_eq!(keys(&list), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_pop_back_order() {
        let mut list = LruList::new();

        list.push_front(entry("a"));
        list.push_front(entry("b"));
        list.push_front(entry("c"));

        assert_eq!(list.pop_back().unwrap().key, "a");
        assert_eq!(list.pop_back().unwrap().key, "b");
        assert_eq!(list.pop_back().unwrap().key, "c");
        assert!(list.pop_back().is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_middle() {
        let mut list = LruList::new();

        list.push_front(entry("a"));
        let b = list.push_front(entry("b"));
        list.push_front(entry("c"));

        let removed = list.remove(b).unwrap();
        assert_eq!(removed.key, "b");
        assert_eq!(list.len(), 2);
        assert_eq!(keys(&list), vec!["c", "a"]);

        // Removing twice is a no-op
        assert!(list.remove(b).is_none());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_only_node_resets_ends() {
        let mut list = LruList::new();
        let a = list.push_front(entry("a"));

        list.remove(a);

        assert!(list.is_empty());
        assert!(list.back().is_none());
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn test_slots_are_reused() {
        let mut list = LruList::with_capacity(2);

        let a = list.push_front(entry("a"));
        list.push_front(entry("b"));
        list.remove(a);
        let c = list.push_front(entry("c"));

        assert_eq!(a, c, "freed slot should be reused");
        assert_eq!(list.get(c).unwrap().key, "c");
        assert_eq!(keys(&list), vec!["c", "b"]);
    }

    #[test]
    fn test_get_mut_updates_entry() {
        let mut list = LruList::new();
        let a = list.push_front(entry("a"));

        list.get_mut(a).unwrap().value = "changed".to_string();

        assert_eq!(list.get(a).unwrap().value, "changed");
    }
}
