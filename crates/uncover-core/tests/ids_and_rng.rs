use proptest::prelude::*;
use rand::RngCore;
use uncover_core::{ElementId, IdAllocator, RngHandle};

#[test]
fn allocator_hands_out_increasing_ids() {
    let mut ids = IdAllocator::new();
    let a = ids.fresh();
    let b = ids.fresh();
    assert_eq!(a, ElementId::from_raw(0));
    assert_eq!(b, ElementId::from_raw(1));
    assert_eq!(ids.fresh(), ElementId::from_raw(2));
}

#[test]
fn cloned_allocators_continue_independently() {
    let mut original = IdAllocator::new();
    original.fresh();
    let mut copy = original.clone();
    assert_eq!(original.fresh(), ElementId::from_raw(1));
    assert_eq!(copy.fresh(), ElementId::from_raw(1));
}

#[test]
fn rng_emits_reproducible_sequence() {
    let mut rng_a = RngHandle::from_seed(1234);
    let mut rng_b = RngHandle::from_seed(1234);
    let seq_a: Vec<u64> = (0..100).map(|_| rng_a.next_u64()).collect();
    let seq_b: Vec<u64> = (0..100).map(|_| rng_b.next_u64()).collect();
    assert_eq!(seq_a, seq_b);
}

#[test]
fn substreams_differ_from_parent() {
    let parent = RngHandle::from_seed(7);
    let mut child_a = parent.substream(1);
    let mut child_b = parent.substream(2);
    assert_ne!(child_a.next_u64(), child_b.next_u64());
    assert_eq!(parent.substream(1).seed(), child_a.seed());
}

proptest! {
    #[test]
    fn index_stays_in_bounds(seed in any::<u64>(), bound in 1usize..50) {
        let mut rng = RngHandle::from_seed(seed);
        for _ in 0..20 {
            prop_assert!(rng.index(bound) < bound);
        }
    }
}
