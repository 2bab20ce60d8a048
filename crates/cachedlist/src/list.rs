//! CachedList: doubly-linked list with cache-assisted positional access
//!
//! Head/tail operations are O(1) splices. Anything addressed by index first
//! picks the closest known anchor (head, tail, or a position cache slot) and
//! walks from there.

use std::fmt;
use std::mem;

use tracing::trace;

use crate::arena::NodeArena;
use crate::cache::{Mutation, PositionCache};
use crate::error::{Error, Result};
use crate::position::PositionRef;
use crate::stats::{Anchor, LookupStats};

/// Doubly-linked list with a self-tuning position cache
pub struct CachedList<T> {
    pub(crate) arena: NodeArena<T>,
    pub(crate) head: Option<usize>,
    pub(crate) tail: Option<usize>,
    pub(crate) len: usize,
    pub(crate) cache: PositionCache,
    stats: LookupStats,
}

impl<T> CachedList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            head: None,
            tail: None,
            len: 0,
            cache: PositionCache::new(),
            stats: LookupStats::new(),
        }
    }

    // ------------------------------------------------------------------
    // Adding items
    // ------------------------------------------------------------------

    /// Add an item at the head
    pub fn add_head(&mut self, item: T) {
        let idx = self.arena.alloc(item);
        self.link_front(idx);
        self.repair_cache(Mutation::Inserted(0));
    }

    /// Add an item at the tail
    pub fn add_tail(&mut self, item: T) {
        let at = self.len;
        self.push_back_raw(item);
        self.repair_cache(Mutation::Inserted(at));
    }

    /// Insert an item before the one currently at `index`.
    ///
    /// `index == len()` appends at the tail.
    ///
    /// # Errors
    /// * `IndexOutOfRange` if `index > len()`
    pub fn insert(&mut self, item: T, index: usize) -> Result<()> {
        if index > self.len {
            return Err(self.out_of_range(index));
        }
        if index == 0 {
            self.add_head(item);
            return Ok(());
        }
        if index == self.len {
            self.add_tail(item);
            return Ok(());
        }

        let successor = self.node_at(index).ok_or(self.out_of_range(index))?;
        let prev = self.arena[successor].prev;
        let idx = self.arena.alloc(item);
        {
            let node = &mut self.arena[idx];
            node.prev = prev;
            node.next = Some(successor);
        }
        if let Some(prev) = prev {
            self.arena[prev].next = Some(idx);
        }
        self.arena[successor].prev = Some(idx);
        self.len += 1;

        self.repair_cache(Mutation::Inserted(index));
        let handle = self.arena.handle(idx);
        self.cache.warm(handle, index);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Removing items
    // ------------------------------------------------------------------

    /// Remove and return the head item, `None` if the list is empty
    pub fn pop_head(&mut self) -> Option<T> {
        let idx = self.head?;
        self.unlink(idx);
        self.repair_cache(Mutation::Removed(0));
        self.arena.free(idx)
    }

    /// Remove and return the tail item, `None` if the list is empty
    pub fn pop_tail(&mut self) -> Option<T> {
        let idx = self.tail?;
        self.unlink(idx);
        let at = self.len;
        self.repair_cache(Mutation::Removed(at));
        self.arena.free(idx)
    }

    /// Remove and return the item at `index`.
    ///
    /// `remove(0)` behaves like [`pop_head`](Self::pop_head) and yields
    /// `Ok(None)` on an empty list.
    ///
    /// # Errors
    /// * `IndexOutOfRange` if `index > 0` and `index >= len()`
    pub fn remove(&mut self, index: usize) -> Result<Option<T>> {
        if index > 0 && index >= self.len {
            return Err(self.out_of_range(index));
        }
        if index == 0 {
            return Ok(self.pop_head());
        }
        if index == self.len - 1 {
            return Ok(self.pop_tail());
        }

        let idx = self.node_at(index).ok_or(self.out_of_range(index))?;
        self.unlink(idx);
        self.repair_cache(Mutation::Removed(index));
        Ok(self.arena.free(idx))
    }

    /// Drop every item
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
        self.rebuild_cache();
    }

    // ------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------

    /// Number of items
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the list holds no items
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Item at `index`
    ///
    /// # Errors
    /// * `IndexOutOfRange` if `index >= len()`
    pub fn get_item(&self, index: usize) -> Result<&T> {
        let idx = self.node_at(index).ok_or(self.out_of_range(index))?;
        Ok(&self.arena[idx].item)
    }

    /// Mutable item at `index`
    ///
    /// # Errors
    /// * `IndexOutOfRange` if `index >= len()`
    pub fn get_item_mut(&mut self, index: usize) -> Result<&mut T> {
        let idx = self.node_at(index).ok_or(self.out_of_range(index))?;
        Ok(&mut self.arena[idx].item)
    }

    /// Index of the first item equal to `item`.
    ///
    /// Searches from `start` toward the tail, or toward the head when
    /// `backwards` is set. With no `start` the search begins at the head
    /// (forwards) or the tail (backwards). The search does not wrap.
    ///
    /// # Errors
    /// * `IndexOutOfRange` if the start index is not a valid position
    /// * `NotFound` if no item matches
    pub fn find_item(&self, item: &T, start: Option<usize>, backwards: bool) -> Result<usize>
    where
        T: PartialEq,
    {
        let start = match start {
            Some(start) => start,
            None if backwards => self.len.saturating_sub(1),
            None => 0,
        };
        let first = self.node_at(start).ok_or(self.out_of_range(start))?;

        let mut index = start;
        let mut node = Some(first);
        while let Some(idx) = node {
            let current = &self.arena[idx];
            if current.item == *item {
                return Ok(index);
            }
            if backwards {
                node = current.prev;
                index = index.wrapping_sub(1);
            } else {
                node = current.next;
                index += 1;
            }
        }
        Err(Error::NotFound)
    }

    /// Snapshot of every item, head to tail
    pub fn get_items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Cursor at `index`
    ///
    /// # Errors
    /// * `IndexOutOfRange` if `index >= len()`
    pub fn position(&self, index: usize) -> Result<PositionRef> {
        let idx = self.node_at(index).ok_or(self.out_of_range(index))?;
        Ok(PositionRef::new(self.arena.handle(idx), index))
    }

    /// Item a cursor points at, `None` if empty or its node was removed
    pub fn item_at(&self, pos: &PositionRef) -> Option<&T> {
        let idx = self.arena.resolve(pos.handle()?)?;
        Some(&self.arena[idx].item)
    }

    /// Move a cursor one step toward the tail. It is cleared past the end
    /// or if its node was removed.
    pub fn advance(&self, pos: &mut PositionRef) {
        let next = pos
            .handle()
            .and_then(|handle| self.arena.resolve(handle))
            .and_then(|idx| self.arena[idx].next);

        match (next, pos.index()) {
            (Some(next), Some(index)) => pos.set(self.arena.handle(next), index + 1),
            _ => pos.clear(),
        }
    }

    /// The position cache, for inspection
    pub fn cache(&self) -> &PositionCache {
        &self.cache
    }

    /// Lookup statistics
    pub fn stats(&self) -> &LookupStats {
        &self.stats
    }

    /// Render cache slots as `(index, item)` pairs, `(-, --)` for empty ones
    pub fn describe_cache(&self) -> String
    where
        T: fmt::Debug,
    {
        let parts: Vec<String> = self
            .cache
            .slots()
            .iter()
            .map(|slot| match (slot.index(), self.item_at(slot)) {
                (Some(index), Some(item)) => format!("({}, {:?})", index, item),
                (Some(index), None) => format!("({}, --)", index),
                _ => "(-, --)".to_string(),
            })
            .collect();
        parts.join(", ")
    }

    // ------------------------------------------------------------------
    // Whole-list operations
    // ------------------------------------------------------------------

    /// Reverse the list in place
    pub fn reverse_list(&mut self) {
        let mut node = self.head;
        while let Some(idx) = node {
            let current = &mut self.arena[idx];
            mem::swap(&mut current.prev, &mut current.next);
            // old `next` now lives in `prev`
            node = current.prev;
        }
        mem::swap(&mut self.head, &mut self.tail);
        self.rebuild_cache();
    }

    /// Sort items in ascending order, or descending when `reverse` is set.
    /// Equal items keep their relative order.
    pub fn sort(&mut self, reverse: bool)
    where
        T: PartialOrd,
    {
        self.sort_with(reverse, |a, b| a < b);
    }

    /// Sort by the value `key` extracts from each item
    pub fn sort_by_key<K, F>(&mut self, reverse: bool, mut key: F)
    where
        K: PartialOrd,
        F: FnMut(&T) -> K,
    {
        self.sort_with(reverse, |a, b| key(a) < key(b));
    }

    fn sort_with<F>(&mut self, reverse: bool, mut less: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let (Some(head), Some(tail)) = (self.head, self.tail) else {
            return;
        };
        if self.len <= 1 {
            return;
        }

        // Does `a` belong before `b`? Ties keep `a` first.
        let mut belongs_first = |a: &T, b: &T| {
            if reverse {
                !less(a, b)
            } else {
                !less(b, a)
            }
        };

        let Some(new_head) = self.merge_sort(head, tail, 0, self.len - 1, &mut belongs_first)
        else {
            return;
        };
        self.arena[new_head].prev = None;

        let mut last = new_head;
        while let Some(next) = self.arena[last].next {
            last = next;
        }
        self.head = Some(new_head);
        self.tail = Some(last);
        self.rebuild_cache();
    }

    /// Sort the run `start..=end` occupying indices `lo..=hi`. Returns the
    /// new first node; the run's last node ends with `next == None`.
    fn merge_sort<F>(
        &mut self,
        start: usize,
        end: usize,
        lo: usize,
        hi: usize,
        belongs_first: &mut F,
    ) -> Option<usize>
    where
        F: FnMut(&T, &T) -> bool,
    {
        if lo >= hi {
            self.arena[start].next = None;
            return Some(start);
        }
        if hi - lo == 1 {
            if belongs_first(&self.arena[start].item, &self.arena[end].item) {
                self.arena[end].next = None;
                return Some(start);
            }
            self.arena[end].prev = None;
            self.arena[end].next = Some(start);
            self.arena[start].prev = Some(end);
            self.arena[start].next = None;
            return Some(end);
        }

        let mid = lo + (hi - lo) / 2;
        let mut median = start;
        for _ in lo..mid {
            median = self.arena[median].next?;
        }
        let right_start = self.arena[median].next?;

        let left = self.merge_sort(start, median, lo, mid, belongs_first)?;
        let right = self.merge_sort(right_start, end, mid + 1, hi, belongs_first)?;
        Some(self.merge(left, right, belongs_first))
    }

    /// Merge two sorted, `None`-terminated runs
    fn merge<F>(&mut self, left: usize, right: usize, belongs_first: &mut F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        let mut a = Some(left);
        let mut b = Some(right);
        let mut head = None;
        let mut tail: Option<usize> = None;

        while let (Some(x), Some(y)) = (a, b) {
            let choice = if belongs_first(&self.arena[x].item, &self.arena[y].item) {
                a = self.arena[x].next;
                x
            } else {
                b = self.arena[y].next;
                y
            };

            self.arena[choice].prev = tail;
            match tail {
                Some(t) => self.arena[t].next = Some(choice),
                None => head = Some(choice),
            }
            tail = Some(choice);
        }

        if let (Some(t), Some(rest)) = (tail, a.or(b)) {
            self.arena[t].next = Some(rest);
            self.arena[rest].prev = Some(t);
        }
        head.unwrap_or(left)
    }

    /// Move every item of `other` onto the tail of this list, leaving
    /// `other` empty
    pub fn join(&mut self, other: &mut CachedList<T>) {
        if self.is_empty() {
            mem::swap(&mut self.arena, &mut other.arena);
            mem::swap(&mut self.head, &mut other.head);
            mem::swap(&mut self.tail, &mut other.tail);
            mem::swap(&mut self.len, &mut other.len);
        } else {
            while let Some(item) = other.pop_front_raw() {
                self.push_back_raw(item);
            }
        }
        other.clear();
        self.rebuild_cache();
    }

    /// Split off the items from `index` onward into a new list.
    ///
    /// The returned list starts with an empty cache. `index == len()`
    /// returns an empty list and leaves this one untouched.
    ///
    /// # Errors
    /// * `IndexOutOfRange` if `index > len()`
    pub fn split(&mut self, index: usize) -> Result<CachedList<T>> {
        if index > self.len {
            return Err(self.out_of_range(index));
        }
        let mut suffix = CachedList::new();
        if index == self.len {
            return Ok(suffix);
        }

        let split_node = self.node_at(index).ok_or(self.out_of_range(index))?;
        let new_tail = self.arena[split_node].prev;
        match new_tail {
            Some(t) => self.arena[t].next = None,
            None => self.head = None,
        }

        let mut node = Some(split_node);
        while let Some(idx) = node {
            node = self.arena[idx].next;
            if let Some(item) = self.arena.free(idx) {
                suffix.push_back_raw(item);
            }
        }

        self.tail = new_tail;
        self.len = index;
        self.rebuild_cache();
        Ok(suffix)
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    fn out_of_range(&self, index: usize) -> Error {
        Error::IndexOutOfRange {
            index,
            len: self.len,
        }
    }

    /// Slot of the node at `target`, walking from the nearest anchor
    pub(crate) fn node_at(&self, target: usize) -> Option<usize> {
        if target >= self.len {
            return None;
        }

        // (distance, index, node, anchor); earlier candidates win ties
        let mut best = (target, 0, self.head?, Anchor::Head);
        let last = self.len - 1;
        let tail_distance = last - target;
        if tail_distance < best.0 {
            best = (tail_distance, last, self.tail?, Anchor::Tail);
        }
        for (handle, index) in self.cache.valid() {
            let distance = index.abs_diff(target);
            if distance < best.0 {
                if let Some(node) = self.arena.resolve(handle) {
                    best = (distance, index, node, Anchor::Cache);
                }
            }
        }

        let (distance, from, mut node, anchor) = best;
        trace!(target, from, ?anchor, "positional lookup");
        if from <= target {
            for _ in 0..distance {
                node = self.arena[node].next?;
            }
        } else {
            for _ in 0..distance {
                node = self.arena[node].prev?;
            }
        }
        self.stats.record_lookup(anchor, distance);
        Some(node)
    }

    fn repair_cache(&mut self, mutation: Mutation) {
        if self.cache.needs_rebuild(self.len) {
            self.rebuild_cache();
        } else {
            self.cache.adjust(mutation);
            self.stats.record_repair();
        }
    }

    fn rebuild_cache(&mut self) {
        self.cache.rebuild(&self.arena, self.head, self.len);
        self.stats.record_rebuild();
    }

    fn link_front(&mut self, idx: usize) {
        {
            let node = &mut self.arena[idx];
            node.prev = None;
            node.next = self.head;
        }
        match self.head {
            Some(head) => self.arena[head].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
    }

    fn link_back(&mut self, idx: usize) {
        {
            let node = &mut self.arena[idx];
            node.prev = self.tail;
            node.next = None;
        }
        match self.tail {
            Some(tail) => self.arena[tail].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = &self.arena[idx];
            (node.prev, node.next)
        };

        match prev {
            Some(prev_idx) => self.arena[prev_idx].next = next,
            None => self.head = next,
        }
        match next {
            Some(next_idx) => self.arena[next_idx].prev = prev,
            None => self.tail = prev,
        }
        self.len -= 1;
    }

    /// Append without touching the cache
    pub(crate) fn push_back_raw(&mut self, item: T) {
        let idx = self.arena.alloc(item);
        self.link_back(idx);
    }

    /// Pop the head without touching the cache
    pub(crate) fn pop_front_raw(&mut self) -> Option<T> {
        let idx = self.head?;
        self.unlink(idx);
        self.arena.free(idx)
    }

    /// Pop the tail without touching the cache
    pub(crate) fn pop_back_raw(&mut self) -> Option<T> {
        let idx = self.tail?;
        self.unlink(idx);
        self.arena.free(idx)
    }
}

impl<T> Default for CachedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for CachedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = CachedList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for CachedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back_raw(item);
        }
        self.rebuild_cache();
    }
}

impl<T: Clone> Clone for CachedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for CachedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for CachedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for CachedList<T> {}

impl<T: PartialEq> PartialEq<[T]> for CachedList<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.len == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for CachedList<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == other[..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit() -> CachedList<&'static str> {
        [
            "apple",
            "orange",
            "pear",
            "banana",
            "grape",
            "lemon",
            "lime",
            "grapefruit",
        ]
        .into_iter()
        .collect()
    }

    fn assert_valid<T>(list: &CachedList<T>) {
        if let Err(violation) = list.validate() {
            panic!("invalid list: {}", violation);
        }
    }

    #[test]
    fn test_callsign_pops() {
        let mut list: CachedList<_> = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"]
            .into_iter()
            .collect();

        list.reverse_list();
        list.reverse_list();
        assert_eq!(list.pop_head(), Some("alpha"));
        assert_eq!(list.pop_tail(), Some("foxtrot"));
        assert_eq!(list, vec!["bravo", "charlie", "delta", "echo"]);
        assert_valid(&list);

        list.add_head("A");
        list.add_tail("F");
        assert_eq!(list, vec!["A", "bravo", "charlie", "delta", "echo", "F"]);
        assert_valid(&list);
    }

    #[test]
    fn test_add_head_pop_to_empty() {
        let mut list = CachedList::new();
        list.add_head("two");
        list.add_head("one");
        assert_eq!(list.get_items(), vec!["one", "two"]);

        list.pop_head();
        list.pop_head();
        assert!(list.is_empty());
        assert_eq!(list.pop_head(), None);
        assert_eq!(list.pop_tail(), None);
        assert_valid(&list);

        list.add_head("zzz");
        assert_eq!(list.get_items(), vec!["zzz"]);
        assert_valid(&list);
    }

    #[test]
    fn test_fruit_insert_and_bad_index() {
        let mut list = fruit();
        assert_eq!(list.get_item(2), Ok(&"pear"));
        assert_eq!(list.get_item(5), Ok(&"lemon"));
        assert_eq!(list.get_item(3), Ok(&"banana"));

        list.insert("coconut", 3).unwrap();
        list.insert("tomato", 0).unwrap();
        assert_valid(&list);
        assert_eq!(
            list,
            vec![
                "tomato",
                "apple",
                "orange",
                "pear",
                "coconut",
                "banana",
                "grape",
                "lemon",
                "lime",
                "grapefruit"
            ]
        );

        for bad in [17, 10, 500] {
            assert_eq!(
                list.get_item(bad),
                Err(Error::IndexOutOfRange { index: bad, len: 10 })
            );
        }
        assert!(list.insert("kiwi", 11).is_err());
    }

    #[test]
    fn test_find_items() {
        let mut list = fruit();
        list.insert("coconut", 3).unwrap();
        list.insert("tomato", 0).unwrap();

        assert_eq!(list.find_item(&"coconut", Some(0), false), Ok(4));
        assert_eq!(list.find_item(&"apple", Some(4), true), Ok(1));
        assert_eq!(list.find_item(&"lime", Some(3), false), Ok(8));
        assert_eq!(list.find_item(&"pear", None, true), Ok(3));

        assert_eq!(list.find_item(&"apple", Some(4), false), Err(Error::NotFound));
        assert_eq!(list.find_item(&"sandwich", None, false), Err(Error::NotFound));
        assert_eq!(list.find_item(&"kiwi", None, true), Err(Error::NotFound));
        assert_eq!(list.find_item(&"lemon", Some(4), true), Err(Error::NotFound));
        assert_eq!(
            list.find_item(&"banana", Some(77), false),
            Err(Error::IndexOutOfRange { index: 77, len: 10 })
        );
    }

    #[test]
    fn test_find_on_empty_list() {
        let list: CachedList<i32> = CachedList::new();
        assert!(matches!(
            list.find_item(&1, None, false),
            Err(Error::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            list.find_item(&1, None, true),
            Err(Error::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_remove() {
        let mut list: CachedList<i32> = (0..20).collect();

        assert_eq!(list.remove(0), Ok(Some(0)));
        assert_eq!(list.remove(18), Ok(Some(19)));
        assert_eq!(list.remove(7), Ok(Some(8)));
        assert_eq!(list.remove(18), Err(Error::IndexOutOfRange { index: 18, len: 17 }));
        assert_eq!(list.len(), 17);
        assert_eq!(list.get_item(7), Ok(&9));
        assert_valid(&list);

        let mut empty: CachedList<i32> = CachedList::new();
        assert_eq!(empty.remove(0), Ok(None));
        assert!(empty.remove(1).is_err());
    }

    #[test]
    fn test_join_animals() {
        let mut first: CachedList<_> = ["elephant", "giraffe", "hippo"].into_iter().collect();
        let mut second: CachedList<_> = ["gazelle", "rhinoceros"].into_iter().collect();

        first.join(&mut second);
        assert_eq!(first, vec!["elephant", "giraffe", "hippo", "gazelle", "rhinoceros"]);
        assert!(second.is_empty());
        assert_valid(&first);
        assert_valid(&second);

        // Joining onto an empty list takes everything over
        second.join(&mut first);
        assert_eq!(second, vec!["elephant", "giraffe", "hippo", "gazelle", "rhinoceros"]);
        assert!(first.is_empty());
        assert_valid(&first);
        assert_valid(&second);
    }

    #[test]
    fn test_split() {
        let mut list: CachedList<_> = ["elephant", "giraffe", "hippo", "gazelle", "rhinoceros"]
            .into_iter()
            .collect();

        let mut suffix = list.split(2).unwrap();
        assert_eq!(list, vec!["elephant", "giraffe"]);
        assert_eq!(suffix, vec!["hippo", "gazelle", "rhinoceros"]);
        assert_eq!(suffix.cache().valid_count(), 0);
        assert_valid(&list);
        assert_valid(&suffix);

        let mut tail_end = list.split(2).unwrap();
        assert!(tail_end.is_empty());
        tail_end.add_tail("bat");
        list.join(&mut tail_end);
        assert_eq!(list, vec!["elephant", "giraffe", "bat"]);

        suffix.join(&mut ["meerkat"].into_iter().collect());
        assert_eq!(suffix, vec!["hippo", "gazelle", "rhinoceros", "meerkat"]);

        let mut combined = list.clone();
        combined.join(&mut suffix);
        assert_eq!(
            combined,
            vec!["elephant", "giraffe", "bat", "hippo", "gazelle", "rhinoceros", "meerkat"]
        );
        assert_valid(&combined);

        assert!(combined.split(8).is_err());
        let everything = combined.split(0).unwrap();
        assert!(combined.is_empty());
        assert_eq!(everything.len(), 7);
        assert_valid(&combined);
        assert_valid(&everything);
    }

    #[test]
    fn test_sort_letters() {
        let letters = ['h', 'b', 'j', 'e', 'a', 'c', 'f', 'd', 'g', 'i'];
        let mut list: CachedList<char> = letters.into_iter().collect();

        list.sort(false);
        assert_eq!(list.get_items(), "abcdefghij".chars().collect::<Vec<_>>());
        assert_valid(&list);

        list.sort(true);
        assert_eq!(list.get_items(), "jihgfedcba".chars().collect::<Vec<_>>());
        assert_valid(&list);
    }

    #[test]
    fn test_sort_by_key_keeps_ties_in_order() {
        let pairs = [(3, 'a'), (1, 'b'), (3, 'c'), (2, 'd'), (1, 'e'), (2, 'f')];
        let mut list: CachedList<(i32, char)> = pairs.into_iter().collect();

        list.sort_by_key(false, |pair| pair.0);
        let ascending = vec![(1, 'b'), (1, 'e'), (2, 'd'), (2, 'f'), (3, 'a'), (3, 'c')];
        assert_eq!(list, ascending);

        // Sorting again is a no-op
        list.sort_by_key(false, |pair| pair.0);
        assert_eq!(list, ascending);

        list.sort_by_key(true, |pair| pair.0);
        assert_eq!(
            list,
            vec![(3, 'a'), (3, 'c'), (2, 'd'), (2, 'f'), (1, 'b'), (1, 'e')]
        );
        assert_valid(&list);
    }

    #[test]
    fn test_sort_small_lists() {
        let mut empty: CachedList<i32> = CachedList::new();
        empty.sort(false);
        assert!(empty.is_empty());

        let mut one: CachedList<i32> = [5].into_iter().collect();
        one.sort(true);
        assert_eq!(one, vec![5]);

        let mut two: CachedList<i32> = [5, 1].into_iter().collect();
        two.sort(false);
        assert_eq!(two, vec![1, 5]);
        assert_valid(&two);
    }

    #[test]
    fn test_insert_warms_cache() {
        let mut list: CachedList<i32> = (0..200).collect();
        list.insert(-1, 101).unwrap();
        assert_valid(&list);

        let warmed = list
            .cache()
            .slots()
            .iter()
            .any(|slot| slot.index() == Some(101) && list.item_at(slot) == Some(&-1));
        assert!(warmed);
    }

    #[test]
    fn test_lookup_uses_cache() {
        let list: CachedList<i32> = (0..1000).collect();
        list.stats().reset();

        // 1000 / 50 gives slots every 20 items
        assert_eq!(list.get_item(503), Ok(&503));
        assert_eq!(list.stats().cache_anchored(), 1);
        assert_eq!(list.stats().steps(), 3);

        assert_eq!(list.get_item(2), Ok(&2));
        assert_eq!(list.get_item(998), Ok(&998));
        assert_eq!(list.stats().lookups(), 3);
    }

    #[test]
    fn test_tie_prefers_head_then_tail() {
        let mut list: CachedList<i32> = (0..5).collect();
        // Strip the cache so only head and tail compete
        list.cache = PositionCache::new();
        list.stats().reset();

        assert_eq!(list.get_item(2), Ok(&2));
        assert_eq!(list.stats().head_anchored(), 1);
        assert_eq!(list.get_item(3), Ok(&3));
        assert_eq!(list.stats().tail_anchored(), 1);
    }

    #[test]
    fn test_clear() {
        let mut list: CachedList<i32> = (0..50).collect();
        let cursor = list.position(10).unwrap();
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.cache().valid_count(), 0);
        assert_eq!(list.cache().capacity(), 10);
        assert_eq!(list.item_at(&cursor), None);
        assert_valid(&list);

        list.add_tail(1);
        assert_eq!(list, vec![1]);
    }

    #[test]
    fn test_clone_gets_fresh_cache() {
        let mut list: CachedList<i32> = (0..30).collect();
        for _ in 0..5 {
            list.remove(3).unwrap();
        }
        let copy = list.clone();

        assert_eq!(copy, list);
        assert_eq!(copy.cache().length_at_last_rebuild(), 25);
        assert_valid(&copy);
    }

    #[test]
    fn test_cursor_goes_stale_after_remove() {
        let mut list: CachedList<i32> = (0..10).collect();
        let mut cursor = list.position(4).unwrap();
        assert_eq!(list.item_at(&cursor), Some(&4));

        list.advance(&mut cursor);
        assert_eq!(cursor.index(), Some(5));
        assert_eq!(list.item_at(&cursor), Some(&5));

        list.remove(5).unwrap();
        assert_eq!(list.item_at(&cursor), None);
        list.advance(&mut cursor);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_get_item_mut() {
        let mut list: CachedList<i32> = (0..10).collect();
        *list.get_item_mut(6).unwrap() *= 10;
        assert_eq!(list.get_item(6), Ok(&60));
        assert!(list.get_item_mut(10).is_err());
    }

    #[test]
    fn test_describe_cache() {
        let list: CachedList<&str> = ["a", "b"].into_iter().collect();
        let described = list.describe_cache();
        assert!(described.starts_with("(0, \"a\"), (1, \"b\"), (-, --)"));
    }

    #[test]
    fn test_debug_format() {
        let list: CachedList<i32> = (1..4).collect();
        assert_eq!(format!("{:?}", list), "[1, 2, 3]");
    }
}
