//! Slot storage for list nodes
//!
//! Nodes are addressed by slot number, so `prev`/`next` are plain integers and
//! no node owns another. Released slots go on a free list and are reused;
//! every release bumps the slot's generation so old [`NodeHandle`]s stop
//! resolving.

use std::ops::{Index, IndexMut};

/// Node in the doubly-linked chain
pub(crate) struct Node<T> {
    pub(crate) item: T,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// Generation-checked reference to a node slot.
///
/// A handle only resolves while the node it was taken from is alive; once the
/// node is removed the handle is dead for good, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    slot: usize,
    generation: u32,
}

/// Growable table of node slots
pub(crate) struct NodeArena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<usize>,
    live: usize,
}

impl<T> NodeArena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Store an unlinked node and return its slot
    pub(crate) fn alloc(&mut self, item: T) -> usize {
        let node = Node {
            item,
            prev: None,
            next: None,
        };
        self.live += 1;

        if let Some(idx) = self.free_list.pop() {
            self.slots[idx].node = Some(node);
            idx
        } else {
            let idx = self.slots.len();
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            idx
        }
    }

    /// Release a slot, returning its item. Links are not touched.
    pub(crate) fn free(&mut self, idx: usize) -> Option<T> {
        let slot = self.slots.get_mut(idx)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(idx);
        self.live -= 1;
        Some(node.item)
    }

    /// Drop every node. Outstanding handles are invalidated.
    pub(crate) fn clear(&mut self) {
        self.free_list.clear();
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(idx);
        }
        self.live = 0;
    }

    pub(crate) fn handle(&self, idx: usize) -> NodeHandle {
        NodeHandle {
            slot: idx,
            generation: self.slots[idx].generation,
        }
    }

    /// Slot for `handle` if its node is still alive
    pub(crate) fn resolve(&self, handle: NodeHandle) -> Option<usize> {
        let slot = self.slots.get(handle.slot)?;
        if slot.generation == handle.generation && slot.node.is_some() {
            Some(handle.slot)
        } else {
            None
        }
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&Node<T>> {
        self.slots.get(idx).and_then(|slot| slot.node.as_ref())
    }

    /// Number of live nodes
    pub(crate) fn live(&self) -> usize {
        self.live
    }
}

impl<T> Index<usize> for NodeArena<T> {
    type Output = Node<T>;

    fn index(&self, idx: usize) -> &Node<T> {
        match self.slots[idx].node.as_ref() {
            Some(node) => node,
            None => panic!("vacant node slot {}", idx),
        }
    }
}

impl<T> IndexMut<usize> for NodeArena<T> {
    fn index_mut(&mut self, idx: usize) -> &mut Node<T> {
        match self.slots[idx].node.as_mut() {
            Some(node) => node,
            None => panic!("vacant node slot {}", idx),
        }
    }
}
