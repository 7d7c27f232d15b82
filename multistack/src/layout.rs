//! Lane descriptor table and capacity planning.
//!
//! The store never moves elements while it decides where lanes should go. Every new layout is
//! computed here as a fresh descriptor table, and only committed after it is known to be valid.

use crate::error::Result;
use crate::mserr;
use alloc::vec::Vec;
use core::ops::Range;

/// Bookkeeping of a single lane.
///
/// A lane owns slots `start..start + capacity` of the shared buffer. Of those, `start..end` are
/// occupied, bottom element first.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub(crate) struct LaneDesc {
    pub start: usize,
    pub capacity: usize,
    // One past the topmost element, equal to `start` when empty.
    pub end: usize,
}

impl LaneDesc {
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub const fn is_full(&self) -> bool {
        self.end == self.limit()
    }

    /// One past the last slot reserved for the lane.
    pub const fn limit(&self) -> usize {
        self.start + self.capacity
    }

    /// Buffer index of the topmost element.
    pub const fn top(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }

    pub const fn live(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `amount` evenly across all lanes, first lanes receive the remainder.
fn spread(capacities: &mut [usize], amount: usize) {
    let lanes = capacities.len();

    if lanes == 0 {
        return;
    }

    let per_lane = amount / lanes;
    let remainder = amount % lanes;

    for (i, cap) in capacities.iter_mut().enumerate() {
        *cap += per_lane + usize::from(i < remainder);
    }
}

/// Lay lanes out back to back, starting at buffer index 0.
fn assemble(capacities: &[usize], sizes: impl Iterator<Item = usize>) -> Vec<LaneDesc> {
    let mut start = 0;

    capacities
        .iter()
        .zip(sizes)
        .map(|(&capacity, size)| {
            debug_assert!(size <= capacity);
            let desc = LaneDesc {
                start,
                capacity,
                end: start + size,
            };
            start += capacity;
            desc
        })
        .collect()
}

/// Initial layout of `num_lanes` empty lanes over `total` slots.
pub(crate) fn partition(total: usize, num_lanes: usize) -> Vec<LaneDesc> {
    let mut capacities = alloc::vec![0; num_lanes];
    spread(&mut capacities, total);
    assemble(&capacities, core::iter::repeat(0))
}

/// Compute the layout a repack would produce.
///
/// Every lane shrinks to its live size plus one free slot, and what remains of `total` is spread
/// evenly across all lanes, remainder-first. If there are fewer free slots than lanes, each free
/// slot goes to a single lane instead: `favored` first, then the rest in index order.
pub(crate) fn plan_repack(
    lanes: &[LaneDesc],
    total: usize,
    favored: Option<usize>,
) -> Result<Vec<LaneDesc>> {
    let live = lanes.iter().map(LaneDesc::len).sum::<usize>();

    if live > total {
        return Err(mserr!(CapacityInvariantViolated));
    }

    let spare = total - live;
    let mut capacities = lanes.iter().map(LaneDesc::len).collect::<Vec<_>>();

    if spare >= lanes.len() {
        capacities.iter_mut().for_each(|cap| *cap += 1);
        spread(&mut capacities, spare - lanes.len());
    } else {
        let order = favored
            .into_iter()
            .chain((0..lanes.len()).filter(|&i| Some(i) != favored));

        for i in order.take(spare) {
            capacities[i] += 1;
        }
    }

    debug_assert_eq!(capacities.iter().sum::<usize>(), total);

    Ok(assemble(&capacities, lanes.iter().map(LaneDesc::len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn capacities(lanes: &[LaneDesc]) -> Vec<usize> {
        lanes.iter().map(|d| d.capacity).collect()
    }

    fn with_sizes(total: usize, sizes: &[usize]) -> Vec<LaneDesc> {
        let mut lanes = partition(total, sizes.len());
        for (desc, &size) in lanes.iter_mut().zip(sizes) {
            assert!(size <= desc.capacity);
            desc.end = desc.start + size;
        }
        lanes
    }

    fn assert_contiguous(lanes: &[LaneDesc], total: usize) {
        let mut start = 0;
        for desc in lanes {
            assert_eq!(desc.start, start);
            assert!(desc.end >= desc.start && desc.end <= desc.limit());
            start = desc.limit();
        }
        assert_eq!(start, total);
    }

    #[test]
    fn even_partition() {
        assert_eq!(capacities(&partition(15, 3)), [5, 5, 5]);
        assert_eq!(capacities(&partition(10, 3)), [4, 3, 3]);
        assert_eq!(capacities(&partition(11, 4)), [3, 3, 3, 2]);
        assert_eq!(capacities(&partition(2, 3)), [1, 1, 0]);
    }

    #[test]
    fn partition_covers_buffer() {
        for total in 1..40 {
            for lanes in 1..12 {
                let layout = partition(total, lanes);
                assert_eq!(layout.len(), lanes);
                assert_contiguous(&layout, total);

                let min = layout.iter().map(|d| d.capacity).min().unwrap();
                let max = layout.iter().map(|d| d.capacity).max().unwrap();
                assert!(max - min <= 1);
                assert!(layout.iter().all(LaneDesc::is_empty));
            }
        }
    }

    #[test]
    fn empty_lane_has_no_top() {
        let desc = LaneDesc {
            start: 4,
            capacity: 3,
            end: 4,
        };
        assert_eq!(desc.top(), None);
        assert_eq!(desc.len(), 0);

        let desc = LaneDesc { end: 7, ..desc };
        assert_eq!(desc.top(), Some(6));
        assert!(desc.is_full());
    }

    #[test]
    fn repack_single_full_lane() {
        let lanes = with_sizes(15, &[5, 0, 0]);
        let plan = plan_repack(&lanes, 15, None).unwrap();

        // 6 + 1 + 1 = 8, leftover 7 spread as 3, 2, 2
        assert_eq!(capacities(&plan), [9, 3, 3]);
        assert_eq!(plan.iter().map(LaneDesc::len).collect::<Vec<_>>(), [5, 0, 0]);
        assert_contiguous(&plan, 15);
    }

    #[test]
    fn repack_uneven() {
        let lanes = with_sizes(10, &[4, 0, 0]);
        let plan = plan_repack(&lanes, 10, None).unwrap();
        assert_eq!(capacities(&plan), [6, 2, 2]);

        let lanes = with_sizes(20, &[3, 1, 4, 2]);
        let plan = plan_repack(&lanes, 20, None).unwrap();
        // 4 2 5 3 = 14, leftover 6 -> +1 each, then first two +1
        assert_eq!(capacities(&plan), [6, 4, 6, 4]);
        assert_contiguous(&plan, 20);
    }

    #[test]
    fn repack_ignores_favor_with_enough_room() {
        let lanes = with_sizes(15, &[5, 0, 0]);
        assert_eq!(
            plan_repack(&lanes, 15, Some(2)).unwrap(),
            plan_repack(&lanes, 15, None).unwrap()
        );
    }

    #[test]
    fn repack_scarce_room() {
        // 1 free slot, 3 lanes.
        let lanes = with_sizes(9, &[3, 3, 2]);

        let plan = plan_repack(&lanes, 9, None).unwrap();
        assert_eq!(capacities(&plan), [4, 3, 2]);

        let plan = plan_repack(&lanes, 9, Some(1)).unwrap();
        assert_eq!(capacities(&plan), [3, 4, 2]);
        assert!(!plan[1].is_full());
        assert_contiguous(&plan, 9);
    }

    #[test]
    fn repack_no_room() {
        let lanes = with_sizes(10, &[5, 5]);
        let plan = plan_repack(&lanes, 10, Some(0)).unwrap();
        assert_eq!(plan, lanes);
        assert!(plan.iter().all(LaneDesc::is_full));
    }

    #[test]
    fn repack_detects_overcommit() {
        let lanes = [
            LaneDesc {
                start: 0,
                capacity: 4,
                end: 4,
            },
            LaneDesc {
                start: 4,
                capacity: 4,
                end: 8,
            },
        ];

        let err = plan_repack(&lanes, 6, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CapacityInvariantViolated);
    }

    #[test]
    fn repack_without_lanes() {
        assert!(plan_repack(&[], 0, None).unwrap().is_empty());
    }
}
