//! Node/index pairing used for cache slots and cursors

use crate::arena::NodeHandle;

/// A node handle together with the index it is believed to sit at.
///
/// Either both parts are present or neither is. Cache slots and external
/// cursors are both `PositionRef`s; the list keeps its own slots in step
/// with mutations, a cursor held by a caller is not updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionRef {
    target: Option<(NodeHandle, usize)>,
}

impl PositionRef {
    /// A reference to nothing
    pub const EMPTY: PositionRef = PositionRef { target: None };

    pub(crate) fn new(handle: NodeHandle, index: usize) -> Self {
        Self {
            target: Some((handle, index)),
        }
    }

    pub(crate) fn set(&mut self, handle: NodeHandle, index: usize) {
        self.target = Some((handle, index));
    }

    /// Drop the reference
    pub fn clear(&mut self) {
        self.target = None;
    }

    /// `true` if this refers to a node
    pub fn is_valid(&self) -> bool {
        self.target.is_some()
    }

    /// `true` if this refers to nothing
    pub fn is_empty(&self) -> bool {
        self.target.is_none()
    }

    /// Believed index, `None` when empty
    pub fn index(&self) -> Option<usize> {
        self.target.map(|(_, index)| index)
    }

    /// Node handle, `None` when empty
    pub fn handle(&self) -> Option<NodeHandle> {
        self.target.map(|(handle, _)| handle)
    }

    /// Shift the recorded index one place right. No-op when empty.
    pub fn increment(&mut self) {
        if let Some((_, index)) = &mut self.target {
            *index += 1;
        }
    }

    /// Shift the recorded index one place left. No-op when empty or at 0.
    pub fn decrement(&mut self) {
        if let Some((_, index)) = &mut self.target {
            *index = index.saturating_sub(1);
        }
    }
}
