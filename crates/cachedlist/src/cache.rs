//! Position cache: sampled (node, index) hints for positional lookup
//!
//! The cache holds up to `capacity` [`PositionRef`]s spread at an even stride
//! over the list. Single insertions and removals shift slot indices in place;
//! once the list has drifted too far from the length it was sampled at, or too
//! many slots have been dropped, the list asks for a full resample instead.

use tracing::debug;

use crate::arena::{NodeArena, NodeHandle};
use crate::position::PositionRef;

/// Capacity for lists up to `SMALL_LIST_LEN` items
const SMALL_CAPACITY: usize = 10;
const SMALL_LIST_LEN: usize = 10;

/// Capacity for lists up to `MEDIUM_LIST_LEN` items
const MEDIUM_CAPACITY: usize = 50;
const MEDIUM_LIST_LEN: usize = 1000;

/// Capacity for anything longer
const LARGE_CAPACITY: usize = 100;

/// Drift ratios, in hundredths
const GROWTH_PERCENT: usize = 66;
const SHRINK_PERCENT: usize = 133;
const MIN_VALID_PERCENT: usize = 66;

/// Slot count used when sampling a list of `len` items
pub fn capacity_for(len: usize) -> usize {
    if len <= SMALL_LIST_LEN {
        SMALL_CAPACITY
    } else if len <= MEDIUM_LIST_LEN {
        MEDIUM_CAPACITY
    } else {
        LARGE_CAPACITY
    }
}

/// Single-element change the cache has to absorb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mutation {
    /// A node now sits at this index; everything from here on moved right
    Inserted(usize),
    /// The node at this index is gone; everything after it moved left
    Removed(usize),
}

/// Bounded set of position hints
#[derive(Debug, Clone)]
pub struct PositionCache {
    slots: Vec<PositionRef>,
    valid_count: usize,
    length_at_last_rebuild: usize,
}

impl PositionCache {
    /// Empty cache shaped for an empty list
    pub(crate) fn new() -> Self {
        Self {
            slots: vec![PositionRef::EMPTY; capacity_for(0)],
            valid_count: 0,
            length_at_last_rebuild: 0,
        }
    }

    /// Resample the list starting at `head`
    pub(crate) fn rebuild<T>(&mut self, arena: &NodeArena<T>, head: Option<usize>, len: usize) {
        let capacity = capacity_for(len);
        let stride = (len / capacity).max(1);

        self.slots.clear();
        self.slots.resize(capacity, PositionRef::EMPTY);

        let mut filled = 0;
        let mut index = 0;
        let mut node = head;
        while let Some(idx) = node {
            if filled == capacity {
                break;
            }
            self.slots[filled].set(arena.handle(idx), index);
            filled += 1;

            node = (0..stride).try_fold(idx, |at, _| arena[at].next);
            index += stride;
        }

        self.valid_count = filled;
        self.length_at_last_rebuild = len;
        debug!(len, capacity, stride, filled, "rebuilt position cache");
    }

    /// Whether the list has drifted far enough that repair is not worth it
    pub(crate) fn needs_rebuild(&self, len: usize) -> bool {
        // Grown or shrunk significantly since the last sample?
        if self.length_at_last_rebuild < len * GROWTH_PERCENT / 100 {
            return true;
        }
        if self.length_at_last_rebuild > len * SHRINK_PERCENT / 100 {
            return true;
        }

        // Too many slots invalidated?
        self.valid_count < self.capacity() * MIN_VALID_PERCENT / 100
    }

    /// Shift slot indices to account for one insertion or removal
    pub(crate) fn adjust(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Inserted(at) => {
                for slot in &mut self.slots {
                    if slot.index().is_some_and(|index| index >= at) {
                        slot.increment();
                    }
                }
            }
            Mutation::Removed(at) => {
                for slot in &mut self.slots {
                    match slot.index() {
                        Some(index) if index == at => {
                            slot.clear();
                            self.valid_count -= 1;
                        }
                        Some(index) if index > at => slot.decrement(),
                        _ => {}
                    }
                }
            }
        }
    }

    /// Record a freshly inserted node directly.
    ///
    /// Fills the first empty slot if there is one, otherwise replaces the
    /// slot whose index is nearest to `index`.
    pub(crate) fn warm(&mut self, handle: NodeHandle, index: usize) {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.is_empty()) {
            slot.set(handle, index);
            self.valid_count += 1;
            return;
        }

        let nearest = self
            .slots
            .iter_mut()
            .filter_map(|slot| slot.index().map(|at| (at.abs_diff(index), slot)))
            .min_by_key(|(distance, _)| *distance);
        if let Some((_, slot)) = nearest {
            slot.set(handle, index);
        }
    }

    /// All slots, empty ones included, in slot order
    pub fn slots(&self) -> &[PositionRef] {
        &self.slots
    }

    /// Valid slots as (handle, index) pairs, in slot order
    pub(crate) fn valid(&self) -> impl Iterator<Item = (NodeHandle, usize)> + '_ {
        self.slots
            .iter()
            .filter_map(|slot| slot.handle().zip(slot.index()))
    }

    /// Number of slots currently holding a reference
    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    /// Number of slots, fixed between rebuilds
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// List length at the last resample
    pub fn length_at_last_rebuild(&self) -> usize {
        self.length_at_last_rebuild
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Link `count` nodes holding 0..count and return the head slot
    fn chain(arena: &mut NodeArena<usize>, count: usize) -> Option<usize> {
        let mut head = None;
        let mut prev: Option<usize> = None;
        for item in 0..count {
            let idx = arena.alloc(item);
            arena[idx].prev = prev;
            match prev {
                Some(p) => arena[p].next = Some(idx),
                None => head = Some(idx),
            }
            prev = Some(idx);
        }
        head
    }

    fn indices(cache: &PositionCache) -> Vec<Option<usize>> {
        cache.slots().iter().map(|slot| slot.index()).collect()
    }

    #[test]
    fn test_capacity_tiers() {
        assert_eq!(capacity_for(0), 10);
        assert_eq!(capacity_for(10), 10);
        assert_eq!(capacity_for(11), 50);
        assert_eq!(capacity_for(1000), 50);
        assert_eq!(capacity_for(1001), 100);
    }

    #[test]
    fn test_rebuild_short_list() {
        let mut arena = NodeArena::new();
        let head = chain(&mut arena, 4);
        let mut cache = PositionCache::new();
        cache.rebuild(&arena, head, 4);

        assert_eq!(cache.capacity(), 10);
        assert_eq!(cache.valid_count(), 4);
        assert_eq!(cache.length_at_last_rebuild(), 4);
        assert_eq!(&indices(&cache)[..5], &[Some(0), Some(1), Some(2), Some(3), None]);
    }

    #[test]
    fn test_rebuild_stride() {
        let mut arena = NodeArena::new();
        let head = chain(&mut arena, 120);
        let mut cache = PositionCache::new();
        cache.rebuild(&arena, head, 120);

        // 120 / 50 = stride 2, capacity 50 fills 0, 2, .., 98
        assert_eq!(cache.capacity(), 50);
        assert_eq!(cache.valid_count(), 50);
        for (n, (handle, index)) in cache.valid().enumerate() {
            assert_eq!(index, n * 2);
            let slot = arena.resolve(handle).unwrap();
            assert_eq!(arena[slot].item, index);
        }
    }

    #[test]
    fn test_adjust_insert_and_remove() {
        let mut arena = NodeArena::new();
        let head = chain(&mut arena, 8);
        let mut cache = PositionCache::new();
        cache.rebuild(&arena, head, 8);

        cache.adjust(Mutation::Inserted(3));
        assert_eq!(
            &indices(&cache)[..8],
            &[Some(0), Some(1), Some(2), Some(4), Some(5), Some(6), Some(7), Some(8)]
        );

        cache.adjust(Mutation::Removed(4));
        assert_eq!(cache.valid_count(), 7);
        assert_eq!(
            &indices(&cache)[..8],
            &[Some(0), Some(1), Some(2), None, Some(4), Some(5), Some(6), Some(7)]
        );
    }

    #[test]
    fn test_needs_rebuild_thresholds() {
        let mut arena = NodeArena::new();
        let head = chain(&mut arena, 100);
        let mut cache = PositionCache::new();
        cache.rebuild(&arena, head, 100);

        assert!(!cache.needs_rebuild(100));
        assert!(!cache.needs_rebuild(150));
        // floor(152 * 0.66) = 100, floor(153 * 0.66) = 100, floor(154 * 0.66) = 101
        assert!(cache.needs_rebuild(154));
        // floor(75 * 1.33) = 99
        assert!(cache.needs_rebuild(75));
        assert!(!cache.needs_rebuild(76));
    }

    #[test]
    fn test_needs_rebuild_after_invalidation() {
        let mut arena = NodeArena::new();
        let head = chain(&mut arena, 10);
        let mut cache = PositionCache::new();
        cache.rebuild(&arena, head, 10);

        // floor(10 * 0.66) = 6 valid slots required
        for _ in 0..4 {
            cache.adjust(Mutation::Removed(0));
        }
        assert_eq!(cache.valid_count(), 6);
        assert!(!cache.needs_rebuild(9));
        cache.adjust(Mutation::Removed(0));
        assert!(cache.needs_rebuild(9));
    }

    #[test]
    fn test_warm_fills_empty_slot_first() {
        let mut arena = NodeArena::new();
        let head = chain(&mut arena, 3);
        let mut cache = PositionCache::new();
        cache.rebuild(&arena, head, 3);

        let extra = arena.alloc(99);
        cache.warm(arena.handle(extra), 7);
        assert_eq!(cache.valid_count(), 4);
        assert_eq!(cache.slots()[3].index(), Some(7));
    }

    #[test]
    fn test_warm_replaces_nearest_when_full() {
        let mut arena = NodeArena::new();
        let head = chain(&mut arena, 10);
        let mut cache = PositionCache::new();
        cache.rebuild(&arena, head, 10);

        let extra = arena.alloc(99);
        let handle = arena.handle(extra);
        cache.warm(handle, 4);
        assert_eq!(cache.valid_count(), 10);
        assert_eq!(cache.slots()[4].handle(), Some(handle));
    }
}
