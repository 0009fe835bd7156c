use proptest::prelude::*;
use rheap::{AllocError, Chunk, Heap, HeapConfig, HeapPtr, RegistryKind, coalesced};

const CAPACITY: usize = 512;

#[derive(Debug, Clone)]
enum Op {
  Allocate(usize),
  Release(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
  prop_oneof![
    (0usize..=96).prop_map(Op::Allocate),
    any::<usize>().prop_map(Op::Release),
  ]
}

fn heap() -> Heap {
  Heap::new(HeapConfig::new().with_heap_capacity(CAPACITY)).unwrap()
}

fn replay_step(
  heap: &mut Heap,
  mut live: Vec<HeapPtr>,
  op: &Op,
) -> Vec<HeapPtr> {
  match *op {
    Op::Allocate(size) => {
      if let Ok(ptr) = heap.allocate(size) {
        live.push(ptr);
      }
    }
    Op::Release(pick) if !live.is_empty() => {
      let ptr = live.swap_remove(pick % live.len());
      heap.release(ptr);
    }
    Op::Release(_) => {}
  }
  live
}

/// Replays `ops`, releasing a live pointer picked by index for each `Release`.
fn replay(
  heap: &mut Heap,
  ops: &[Op],
) -> Vec<HeapPtr> {
  ops.iter().fold(Vec::new(), |live, op| replay_step(heap, live, op))
}

fn free_chunks(heap: &Heap) -> Vec<Chunk> {
  heap.registry(RegistryKind::Free).as_slice().to_vec()
}

proptest! {
  #[test]
  fn prop_registries_partition_the_heap(ops in prop::collection::vec(op_strategy(), 0..200)) {
    let mut heap = heap();
    let mut live = Vec::new();

    for op in &ops {
      live = replay_step(&mut heap, live, op);

      let stats = heap.stats();
      prop_assert_eq!(stats.allocated_bytes + stats.free_bytes, CAPACITY);
      prop_assert!(heap.check_invariants().is_ok());
    }
  }

  #[test]
  fn prop_coalescing_is_idempotent(ops in prop::collection::vec(op_strategy(), 0..200)) {
    let mut heap = heap();
    replay(&mut heap, &ops);

    heap.coalesce();
    let once = free_chunks(&heap);
    heap.coalesce();

    prop_assert_eq!(&once, &free_chunks(&heap));
    prop_assert!(once.windows(2).all(|pair| pair[0].end() < pair[1].start));
  }

  #[test]
  fn prop_release_undoes_allocate(
    ops in prop::collection::vec(op_strategy(), 0..100),
    size in 1usize..=CAPACITY,
  ) {
    let mut heap = heap();
    replay(&mut heap, &ops);
    heap.coalesce();
    let before = free_chunks(&heap);

    if let Ok(ptr) = heap.allocate(size) {
      heap.release(ptr);
      heap.coalesce();
    }

    prop_assert_eq!(before, free_chunks(&heap));
  }

  #[test]
  fn prop_zero_size_changes_nothing(ops in prop::collection::vec(op_strategy(), 0..100)) {
    let mut heap = heap();
    replay(&mut heap, &ops);
    let allocated = heap.registry(RegistryKind::Allocated).clone();
    let free = heap.registry(RegistryKind::Free).clone();

    prop_assert_eq!(heap.allocate(0), Err(AllocError::ZeroSize));
    prop_assert_eq!(heap.registry(RegistryKind::Allocated), &allocated);
    prop_assert_eq!(heap.registry(RegistryKind::Free), &free);
  }

  #[test]
  fn prop_oversized_request_fails_cleanly(
    ops in prop::collection::vec(op_strategy(), 0..100),
    extra in 1usize..64,
  ) {
    let mut heap = heap();
    replay(&mut heap, &ops);
    let allocated = heap.registry(RegistryKind::Allocated).clone();
    let free = coalesced(heap.registry(RegistryKind::Free)).unwrap();
    let requested = free.largest() + extra;

    prop_assert_eq!(
      heap.allocate(requested),
      Err(AllocError::OutOfMemory { requested, largest_free: free.largest() })
    );
    prop_assert_eq!(heap.registry(RegistryKind::Allocated), &allocated);
    prop_assert_eq!(heap.registry(RegistryKind::Free), &free);
  }
}
