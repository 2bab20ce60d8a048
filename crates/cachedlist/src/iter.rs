//! Iterators over CachedList

use std::iter::FusedIterator;

use crate::list::CachedList;
use crate::position::PositionRef;

/// Borrowing iterator, head to tail, driven by a [`PositionRef`] cursor
pub struct Iter<'a, T> {
    list: &'a CachedList<T>,
    cursor: PositionRef,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.list.item_at(&self.cursor)?;
        self.list.advance(&mut self.cursor);
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Owning iterator
pub struct IntoIter<T> {
    list: CachedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front_raw()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back_raw()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> CachedList<T> {
    /// Iterate items from head to tail
    pub fn iter(&self) -> Iter<'_, T> {
        let cursor = match self.head {
            Some(head) => PositionRef::new(self.arena.handle(head), 0),
            None => PositionRef::EMPTY,
        };
        Iter {
            list: self,
            cursor,
            remaining: self.len,
        }
    }
}

impl<'a, T> IntoIterator for &'a CachedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for CachedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}
