use crate::error::Result;
use crate::iter::{Iter, IterMut, LaneIter};
use crate::lane::{LaneRef, LaneView};
use crate::layout::{self, LaneDesc};
use crate::mserr;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use log::*;

/// Fixed number of stacks sharing one fixed size buffer.
///
/// The buffer is split into contiguous lanes, one per stack. Lanes start out with equal capacity.
/// Pushing onto a full lane repacks the store: every lane is shrunk to what it holds, and the
/// freed slots are handed out again, so that a push only fails once the whole buffer is in use.
///
/// Slots that are not occupied by an element hold no value. Popped elements are moved out of the
/// store.
#[derive(Clone, Debug)]
pub struct MultiStack<T> {
    pub(crate) slots: Box<[Option<T>]>,
    pub(crate) lanes: Vec<LaneDesc>,
}

/// Zero-value store, with no lanes and no buffer.
///
/// It is only useful as a target for assignment, every per-lane operation fails with
/// `InvalidLaneIndex`.
impl<T> Default for MultiStack<T> {
    fn default() -> Self {
        Self {
            slots: Box::default(),
            lanes: Vec::new(),
        }
    }
}

impl<T> MultiStack<T> {
    /// Create a store of `total_capacity` slots split into `num_lanes` lanes.
    ///
    /// Lane `i` receives `total_capacity / num_lanes` slots, plus one extra slot if `i` is below
    /// `total_capacity % num_lanes`.
    pub fn new(total_capacity: usize, num_lanes: usize) -> Result<Self> {
        if total_capacity == 0 || num_lanes == 0 {
            return Err(mserr!(InvalidArgument));
        }

        Ok(Self {
            slots: (0..total_capacity).map(|_| None).collect(),
            lanes: layout::partition(total_capacity, num_lanes),
        })
    }

    /// Move the contents out, leaving a zero-value store behind.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    pub fn total_capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn num_lanes(&self) -> usize {
        self.lanes.len()
    }

    /// Number of elements across all lanes.
    pub fn len(&self) -> usize {
        self.lanes.iter().map(LaneDesc::len).sum()
    }

    /// Whether all lanes are empty.
    pub fn is_empty(&self) -> bool {
        self.lanes.iter().all(LaneDesc::is_empty)
    }

    /// Whether every slot of the buffer is occupied.
    pub fn is_exhausted(&self) -> bool {
        self.len() == self.total_capacity()
    }

    pub(crate) fn desc(&self, lane: usize) -> Result<&LaneDesc> {
        self.lanes.get(lane).ok_or(mserr!(InvalidLaneIndex, lane))
    }

    /// Number of elements in the lane.
    pub fn size(&self, lane: usize) -> Result<usize> {
        self.desc(lane).map(LaneDesc::len)
    }

    /// Number of slots currently reserved for the lane.
    pub fn lane_capacity(&self, lane: usize) -> Result<usize> {
        self.desc(lane).map(|d| d.capacity)
    }

    pub fn is_lane_empty(&self, lane: usize) -> Result<bool> {
        self.desc(lane).map(LaneDesc::is_empty)
    }

    pub fn is_lane_full(&self, lane: usize) -> Result<bool> {
        self.desc(lane).map(LaneDesc::is_full)
    }

    /// Push `value` on top of the lane.
    ///
    /// A full lane triggers a repack. If the whole store is already occupied, the call fails with
    /// `StoreExhausted`, `value` is dropped and the store is left untouched.
    pub fn push(&mut self, lane: usize, value: T) -> Result<()> {
        if self.desc(lane)?.is_full() {
            if self.is_exhausted() {
                debug!("Lane {lane} full, no free slots in the store");
                return Err(mserr!(StoreExhausted, lane));
            }
            self.repack_favoring(Some(lane))?;
        }

        let desc = &mut self.lanes[lane];

        if desc.is_full() {
            return Err(mserr!(CapacityInvariantViolated, lane));
        }

        self.slots[desc.end] = Some(value);
        desc.end += 1;

        Ok(())
    }

    /// Remove the topmost element of the lane.
    pub fn pop(&mut self, lane: usize) -> Result<T> {
        let top = self.desc(lane)?.top().ok_or(mserr!(EmptyStack, lane))?;

        let value = self.slots[top]
            .take()
            .ok_or(mserr!(CapacityInvariantViolated, lane))?;

        self.lanes[lane].end = top;

        Ok(value)
    }

    /// Topmost element of the lane.
    pub fn peek(&self, lane: usize) -> Result<&T> {
        let top = self.desc(lane)?.top().ok_or(mserr!(EmptyStack, lane))?;

        self.slots[top]
            .as_ref()
            .ok_or(mserr!(CapacityInvariantViolated, lane))
    }

    pub fn peek_mut(&mut self, lane: usize) -> Result<&mut T> {
        let top = self.desc(lane)?.top().ok_or(mserr!(EmptyStack, lane))?;

        self.slots[top]
            .as_mut()
            .ok_or(mserr!(CapacityInvariantViolated, lane))
    }

    /// Compact all lanes and redistribute free capacity.
    ///
    /// Each lane is shrunk to its size plus one spare slot, and the slots left over are split
    /// evenly, with the first lanes receiving the remainder. Elements keep their lane and their
    /// order within the lane.
    ///
    /// When fewer slots are free than there are lanes, each free slot is given to a single lane,
    /// in lane order.
    pub fn repack(&mut self) -> Result<()> {
        self.repack_favoring(None)
    }

    fn repack_favoring(&mut self, favored: Option<usize>) -> Result<()> {
        let plan = layout::plan_repack(&self.lanes, self.total_capacity(), favored)?;

        trace!(
            "Repack {:?} -> {:?}",
            self.lanes.iter().map(|d| d.capacity).collect::<Vec<_>>(),
            plan.iter().map(|d| d.capacity).collect::<Vec<_>>()
        );

        let mut held = Vec::with_capacity(self.len());

        for desc in &self.lanes {
            held.extend(self.slots[desc.live()].iter_mut().filter_map(Option::take));
        }

        debug_assert_eq!(held.len(), self.len());

        let mut held = held.into_iter();

        for desc in &plan {
            for slot in &mut self.slots[desc.live()] {
                *slot = held.next();
            }
        }

        self.lanes = plan;

        Ok(())
    }

    /// Mutable handle to a single lane.
    pub fn lane_mut(&mut self, lane: usize) -> Result<LaneView<T>> {
        self.desc(lane)?;
        Ok(LaneView::new(self, lane))
    }

    /// Shared handle to a single lane.
    pub fn lane(&self, lane: usize) -> Result<LaneRef<T>> {
        self.desc(lane)?;
        Ok(LaneRef::new(self, lane))
    }

    /// Handles to all lanes, in index order.
    pub fn lanes(&self) -> impl Iterator<Item = LaneRef<T>> + '_ {
        (0..self.num_lanes()).map(move |lane| LaneRef::new(self, lane))
    }

    /// Elements of a single lane, bottom to top.
    pub fn lane_iter(&self, lane: usize) -> Result<LaneIter<T>> {
        let desc = self.desc(lane)?;
        Ok(LaneIter::new(&self.slots[desc.live()]))
    }

    /// All elements, lane by lane, each lane bottom to top.
    pub fn iter(&self) -> Iter<T> {
        Iter::new(self)
    }

    pub fn iter_mut(&mut self) -> IterMut<T> {
        IterMut::new(self)
    }
}

impl<T: PartialEq> PartialEq for MultiStack<T> {
    /// Stores are equal when they have the same shape and every lane holds the same elements.
    /// Lane capacities are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.num_lanes() == other.num_lanes()
            && self.total_capacity() == other.total_capacity()
            && self
                .lanes()
                .zip(other.lanes())
                .all(|(a, b)| a.iter().eq(b.iter()))
    }
}

impl<T: Eq> Eq for MultiStack<T> {}

impl<T: fmt::Display> fmt::Display for MultiStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "MultiStack with {} lanes (total capacity: {}):",
            self.num_lanes(),
            self.total_capacity()
        )?;

        for lane in self.lanes() {
            write!(
                f,
                "Lane {} (size: {}/capacity: {}):",
                lane.index(),
                lane.len(),
                lane.capacity()
            )?;

            if lane.is_empty() {
                write!(f, " empty")?;
            } else {
                for elem in lane.iter() {
                    write!(f, " {elem}")?;
                }
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

impl<'a, T> IntoIterator for &'a MultiStack<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut MultiStack<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
