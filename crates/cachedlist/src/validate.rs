//! Structural self-check
//!
//! Walks the chain in both directions and replays every cache slot from the
//! head. Meant for tests and the checker binary; normal operations never call
//! it.

use std::fmt;

use crate::list::CachedList;

/// First inconsistency found by [`CachedList::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Head present without tail
    OnlyHeadDefined,
    /// Tail present without head
    OnlyTailDefined,
    /// Walking `next` from the head did not count `len` nodes
    BadLengthForward {
        /// Nodes reached
        counted: usize,
        /// Recorded length
        len: usize,
    },
    /// Walking `prev` from the tail did not count `len` nodes
    BadLengthBackward {
        /// Nodes reached
        counted: usize,
        /// Recorded length
        len: usize,
    },
    /// A node's successor does not point back at it
    BrokenBackLink {
        /// Position of the node whose successor is wrong
        index: usize,
    },
    /// Head has a predecessor or tail has a successor
    DanglingEnd,
    /// Arena holds a different number of nodes than the list
    LeakedNodes {
        /// Nodes alive in the arena
        live: usize,
        /// Recorded length
        len: usize,
    },
    /// Cached valid count does not match the slots
    ValidCountMismatch {
        /// Slots actually holding a node
        counted: usize,
        /// The cache's own count
        recorded: usize,
    },
    /// Slot index past the end of the list
    CacheIndexOutOfRange {
        /// Slot number
        slot: usize,
        /// Recorded index
        index: usize,
        /// List length
        len: usize,
    },
    /// Slot's node is not at its recorded index
    CacheMismatch {
        /// Slot number
        slot: usize,
        /// Recorded index
        index: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::OnlyHeadDefined => write!(f, "only head defined"),
            Violation::OnlyTailDefined => write!(f, "only tail defined"),
            Violation::BadLengthForward { counted, len } => {
                write!(f, "bad length, forward: counted {} of {}", counted, len)
            }
            Violation::BadLengthBackward { counted, len } => {
                write!(f, "bad length, backward: counted {} of {}", counted, len)
            }
            Violation::BrokenBackLink { index } => {
                write!(f, "node after index {} does not link back", index)
            }
            Violation::DanglingEnd => write!(f, "head or tail links past the end"),
            Violation::LeakedNodes { live, len } => {
                write!(f, "{} live nodes for length {}", live, len)
            }
            Violation::ValidCountMismatch { counted, recorded } => write!(
                f,
                "cache valid count {} but {} slots hold nodes",
                recorded, counted
            ),
            Violation::CacheIndexOutOfRange { slot, index, len } => write!(
                f,
                "cache slot {} index {} out of range (len {})",
                slot, index, len
            ),
            Violation::CacheMismatch { slot, index } => write!(
                f,
                "cached node doesn't match index (slot {}, index {})",
                slot, index
            ),
        }
    }
}

impl std::error::Error for Violation {}

impl<T> CachedList<T> {
    /// Check every structural and cache invariant
    pub fn validate(&self) -> Result<(), Violation> {
        match (self.head, self.tail) {
            (Some(_), None) => return Err(Violation::OnlyHeadDefined),
            (None, Some(_)) => return Err(Violation::OnlyTailDefined),
            _ => {}
        }

        // Bounded walks so a cycle shows up as a length error
        let mut counted = 0;
        let mut node = self.head;
        while let Some(idx) = node {
            if counted > self.len {
                break;
            }
            let current = self.arena.get(idx);
            node = current.and_then(|n| n.next);
            if let Some(next) = node {
                if self.arena.get(next).and_then(|n| n.prev) != Some(idx) {
                    return Err(Violation::BrokenBackLink { index: counted });
                }
            }
            counted += 1;
        }
        if counted != self.len {
            return Err(Violation::BadLengthForward {
                counted,
                len: self.len,
            });
        }

        let mut counted = 0;
        let mut node = self.tail;
        while let Some(idx) = node {
            if counted > self.len {
                break;
            }
            node = self.arena.get(idx).and_then(|n| n.prev);
            counted += 1;
        }
        if counted != self.len {
            return Err(Violation::BadLengthBackward {
                counted,
                len: self.len,
            });
        }

        let head_prev = self.head.and_then(|h| self.arena.get(h)).and_then(|n| n.prev);
        let tail_next = self.tail.and_then(|t| self.arena.get(t)).and_then(|n| n.next);
        if head_prev.is_some() || tail_next.is_some() {
            return Err(Violation::DanglingEnd);
        }

        if self.arena.live() != self.len {
            return Err(Violation::LeakedNodes {
                live: self.arena.live(),
                len: self.len,
            });
        }

        self.validate_cache()
    }

    fn validate_cache(&self) -> Result<(), Violation> {
        let counted = self.cache.slots().iter().filter(|s| s.is_valid()).count();
        if counted != self.cache.valid_count() {
            return Err(Violation::ValidCountMismatch {
                counted,
                recorded: self.cache.valid_count(),
            });
        }

        for (slot, pos) in self.cache.slots().iter().enumerate() {
            let (Some(handle), Some(index)) = (pos.handle(), pos.index()) else {
                continue;
            };
            if index >= self.len {
                return Err(Violation::CacheIndexOutOfRange {
                    slot,
                    index,
                    len: self.len,
                });
            }

            let mut node = self.head;
            for _ in 0..index {
                node = node.and_then(|idx| self.arena.get(idx)).and_then(|n| n.next);
            }
            if node.is_none() || node != self.arena.resolve(handle) {
                return Err(Violation::CacheMismatch { slot, index });
            }
        }
        Ok(())
    }
}
