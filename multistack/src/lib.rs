//! # multistack
//!
//! ## Many stacks, one buffer
//!
//! [`MultiStack`] keeps a fixed number of stacks ("lanes") inside a single buffer allocated up
//! front. Each lane owns a contiguous range of the buffer, which makes pushes and pops O(1) without
//! any per-stack allocation. The buffer never grows. When a lane runs out of room while others
//! still have free slots, the store repacks itself: all lanes are compacted, and the free slots are
//! redistributed across them. Only when every slot is in use does a push fail.
//!
//! Elements keep their lane and their order inside the lane across repacks. Two stores compare
//! equal when they hold the same elements in the same lanes, regardless of how capacity happens to
//! be split between lanes at the moment.
//!
//! ```rust
//! use multistack::{ErrorKind, MultiStack};
//!
//! # fn main() -> multistack::Result<()> {
//! let mut stack = MultiStack::new(6, 3)?;
//!
//! stack.push(0, 1)?;
//! stack.push(0, 2)?;
//!
//! // Lane 0 is full, but the other lanes are not. This push repacks.
//! stack.push(0, 3)?;
//! assert_eq!(stack.size(0)?, 3);
//!
//! let mut lane = stack.lane_mut(2)?;
//! lane.push(4)?;
//! assert_eq!(lane.peek()?, &4);
//!
//! assert_eq!(stack.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
//!
//! assert_eq!(stack.pop(1).unwrap_err().kind, ErrorKind::EmptyStack);
//! # Ok(())
//! # }
//! ```
//!
//! ## Threading
//!
//! `MultiStack` is a plain single threaded data structure. Repacking rewrites every lane boundary,
//! so shared use across threads has to lock the whole store.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;
pub mod iter;
pub mod lane;
mod layout;
mod store;

pub use error::{Error, ErrorKind, Result};
pub use iter::{Iter, IterMut, LaneIter};
pub use lane::{LaneRef, LaneView};
pub use store::MultiStack;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use rand::prelude::*;

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Push(usize, u32),
        Pop(usize),
        Peek(usize),
        Repack,
    }

    fn random_op(rng: &mut impl Rng, lanes: usize) -> Op {
        // Lane indices run one past the end to hit the range checks.
        let lane = rng.gen_range(0..=lanes);
        match rng.gen_range(0..10) {
            0..=4 => Op::Push(lane, rng.gen()),
            5..=7 => Op::Pop(lane),
            8 => Op::Peek(lane),
            _ => Op::Repack,
        }
    }

    fn check(stack: &MultiStack<u32>, model: &[Vec<u32>], total: usize) {
        assert_eq!(stack.num_lanes(), model.len());
        assert_eq!(stack.len(), model.iter().map(Vec::len).sum::<usize>());

        let mut capacity = 0;

        for (i, lane) in model.iter().enumerate() {
            assert_eq!(stack.size(i).unwrap(), lane.len());
            assert!(stack.lane_capacity(i).unwrap() >= lane.len());
            assert!(stack.lane_iter(i).unwrap().eq(lane.iter()));
            capacity += stack.lane_capacity(i).unwrap();
        }

        assert_eq!(capacity, total);
        assert!(stack.iter().eq(model.iter().flatten()));
    }

    fn run_model(seed: u64, total: usize, lanes: usize, steps: usize) {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut rng = StdRng::seed_from_u64(seed);
        let mut stack = MultiStack::new(total, lanes).unwrap();
        let mut model = alloc::vec![Vec::new(); lanes];

        for _ in 0..steps {
            let op = random_op(&mut rng, lanes);
            let live = model.iter().map(Vec::len).sum::<usize>();

            match op {
                Op::Push(lane, v) => {
                    let res = stack.push(lane, v);
                    if lane >= lanes {
                        assert_eq!(res.unwrap_err().kind, ErrorKind::InvalidLaneIndex);
                    } else if live == total {
                        assert_eq!(res.unwrap_err().kind, ErrorKind::StoreExhausted);
                    } else {
                        res.unwrap();
                        model[lane].push(v);
                    }
                }
                Op::Pop(lane) => {
                    let res = stack.pop(lane);
                    match model.get_mut(lane) {
                        None => assert_eq!(res.unwrap_err().kind, ErrorKind::InvalidLaneIndex),
                        Some(l) => match l.pop() {
                            Some(v) => assert_eq!(res.unwrap(), v),
                            None => assert_eq!(res.unwrap_err().kind, ErrorKind::EmptyStack),
                        },
                    }
                }
                Op::Peek(lane) => {
                    let res = stack.peek(lane).copied();
                    match model.get(lane) {
                        None => assert_eq!(res.unwrap_err().kind, ErrorKind::InvalidLaneIndex),
                        Some(l) => match l.last() {
                            Some(&v) => assert_eq!(res.unwrap(), v),
                            None => assert_eq!(res.unwrap_err().kind, ErrorKind::EmptyStack),
                        },
                    }
                }
                Op::Repack => stack.repack().unwrap(),
            }

            check(&stack, &model, total);
        }
    }

    #[test]
    fn matches_model() {
        for seed in 0..16 {
            run_model(seed, 32, 4, 500);
        }
    }

    #[test]
    fn matches_model_tight() {
        for seed in 0..16 {
            run_model(seed, 7, 5, 300);
            run_model(seed, 3, 6, 200);
        }
    }

    #[test]
    fn clone_then_diverge() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut a = MultiStack::new(40, 5).unwrap();

        for _ in 0..30 {
            let lane = rng.gen_range(0..5);
            a.push(lane, rng.gen::<u32>()).unwrap();
        }

        let mut b = a.clone();
        assert_eq!(a, b);

        b.repack().unwrap();
        assert_eq!(a, b);

        let top = b.pop(0).ok();
        if let Some(v) = top {
            assert_ne!(a, b);
            b.push(0, v).unwrap();
        }
        assert_eq!(a, b);
    }
}
