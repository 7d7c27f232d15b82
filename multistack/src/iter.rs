use crate::store::MultiStack;
use core::iter::FusedIterator;

/// Iterator over all elements of a [`MultiStack`].
///
/// Walks lanes in index order, and each lane from bottom to top. Empty lanes are skipped.
#[derive(Debug)]
pub struct Iter<'a, T> {
    stack: &'a MultiStack<T>,
    lane: usize,
    index: usize,
    remaining: usize,
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack,
            lane: self.lane,
            index: self.index,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(stack: &'a MultiStack<T>) -> Self {
        Self {
            stack,
            lane: 0,
            index: 0,
            remaining: stack.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let stack = self.stack;

        // Finished once the cursor reaches (num_lanes, 0).
        while let Some(desc) = stack.lanes.get(self.lane) {
            if self.index < desc.len() {
                let slot = &stack.slots[desc.start + self.index];
                self.index += 1;
                self.remaining -= 1;
                return slot.as_ref();
            }

            self.lane += 1;
            self.index = 0;
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

/// Mutable iterator over all elements of a [`MultiStack`], in the same order as [`Iter`].
#[derive(Debug)]
pub struct IterMut<'a, T> {
    // Unoccupied slots are always `None`, so buffer order is lane order.
    slots: core::slice::IterMut<'a, Option<T>>,
    remaining: usize,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(stack: &'a mut MultiStack<T>) -> Self {
        let remaining = stack.len();
        Self {
            slots: stack.slots.iter_mut(),
            remaining,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        let elem = self.slots.find_map(Option::as_mut)?;
        self.remaining -= 1;
        Some(elem)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}
impl<'a, T> FusedIterator for IterMut<'a, T> {}

/// Iterator over the elements of a single lane, bottom to top.
///
/// Reversing it yields the elements in the order they would be popped.
#[derive(Debug)]
pub struct LaneIter<'a, T> {
    slots: core::slice::Iter<'a, Option<T>>,
}

impl<'a, T> Clone for LaneIter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<'a, T> LaneIter<'a, T> {
    pub(crate) fn new(live: &'a [Option<T>]) -> Self {
        Self { slots: live.iter() }
    }
}

impl<'a, T> Iterator for LaneIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(Option::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.slots.len(), Some(self.slots.len()))
    }
}

impl<'a, T> DoubleEndedIterator for LaneIter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.slots.rfind(|slot| slot.is_some())?.as_ref()
    }
}

impl<'a, T> ExactSizeIterator for LaneIter<'a, T> {}
impl<'a, T> FusedIterator for LaneIter<'a, T> {}
