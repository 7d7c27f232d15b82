//! Per-lane handles.
//!
//! A handle pins a lane index that has already been checked against the store, and forwards every
//! call to the store with that index. Handles borrow the store, so they can not outlive it.

use crate::error::Result;
use crate::iter::LaneIter;
use crate::layout::LaneDesc;
use crate::store::MultiStack;

/// Mutable handle to a single lane of a [`MultiStack`].
#[derive(Debug)]
pub struct LaneView<'a, T> {
    stack: &'a mut MultiStack<T>,
    lane: usize,
}

impl<'a, T> LaneView<'a, T> {
    pub(crate) fn new(stack: &'a mut MultiStack<T>, lane: usize) -> Self {
        debug_assert!(lane < stack.num_lanes());
        Self { stack, lane }
    }

    fn desc(&self) -> &LaneDesc {
        // Repacking never changes the number of lanes, the index stays valid.
        &self.stack.lanes[self.lane]
    }

    pub fn index(&self) -> usize {
        self.lane
    }

    pub fn push(&mut self, value: T) -> Result<()> {
        self.stack.push(self.lane, value)
    }

    pub fn pop(&mut self) -> Result<T> {
        self.stack.pop(self.lane)
    }

    pub fn peek(&self) -> Result<&T> {
        self.stack.peek(self.lane)
    }

    pub fn peek_mut(&mut self) -> Result<&mut T> {
        self.stack.peek_mut(self.lane)
    }

    pub fn len(&self) -> usize {
        self.desc().len()
    }

    pub fn capacity(&self) -> usize {
        self.desc().capacity
    }

    pub fn is_empty(&self) -> bool {
        self.desc().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.desc().is_full()
    }

    pub fn iter(&self) -> LaneIter<T> {
        LaneIter::new(&self.stack.slots[self.desc().live()])
    }

    /// Downgrade into a shared handle.
    pub fn into_ref(self) -> LaneRef<'a, T> {
        LaneRef::new(self.stack, self.lane)
    }
}

/// Shared handle to a single lane of a [`MultiStack`].
#[derive(Debug)]
pub struct LaneRef<'a, T> {
    stack: &'a MultiStack<T>,
    lane: usize,
}

impl<'a, T> Clone for LaneRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for LaneRef<'a, T> {}

impl<'a, T> LaneRef<'a, T> {
    pub(crate) fn new(stack: &'a MultiStack<T>, lane: usize) -> Self {
        debug_assert!(lane < stack.num_lanes());
        Self { stack, lane }
    }

    fn desc(&self) -> &'a LaneDesc {
        &self.stack.lanes[self.lane]
    }

    pub fn index(&self) -> usize {
        self.lane
    }

    pub fn peek(&self) -> Result<&'a T> {
        self.stack.peek(self.lane)
    }

    pub fn len(&self) -> usize {
        self.desc().len()
    }

    pub fn capacity(&self) -> usize {
        self.desc().capacity
    }

    pub fn is_empty(&self) -> bool {
        self.desc().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.desc().is_full()
    }

    pub fn iter(&self) -> LaneIter<'a, T> {
        LaneIter::new(&self.stack.slots[self.desc().live()])
    }
}

impl<'a, T> IntoIterator for LaneRef<'a, T> {
    type Item = &'a T;
    type IntoIter = LaneIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
