use std::ptr;

use proptest::prelude::*;

use tagalloc::{ARENA_SIZE, Allocator, HEADER_SIZE, Heap, OVERHEAD, align8};

fn block_size(requested: usize) -> usize {
  align8!(requested + OVERHEAD)
}

/// The reuse scenario: allocate 100/200/300 bytes, free the middle one,
/// and watch first-fit hand its region back out — then make sure the
/// later frees do not coalesce across the reused region.
#[test]
fn scenario_middle_block_reuse_without_false_coalescing() {
  let mut heap = Heap::new();

  let a = heap.allocate(100).unwrap().as_ptr();
  let b = heap.allocate(200).unwrap().as_ptr();
  let c = heap.allocate(300).unwrap().as_ptr();
  assert_eq!(1, heap.stats().arenas);

  unsafe {
    // Distinct, non-overlapping ranges.
    ptr::write_bytes(a, 0xA1, 100);
    ptr::write_bytes(b, 0xB2, 200);
    ptr::write_bytes(c, 0xC3, 300);
    assert_eq!(0xA1, a.add(99).read());
    assert_eq!(0xC3, c.read());

    heap.release(b);
  }

  // 150 bytes fits B's freed region; first-fit must take it instead of
  // carving the arena's trailing remainder or growing the heap.
  let d = heap.allocate(150).unwrap().as_ptr();
  assert_eq!(b, d);
  assert_eq!(1, heap.stats().arenas);

  unsafe {
    ptr::write_bytes(d, 0xD4, 150);
    assert_eq!(0xA1, a.read(), "neighbor overwritten by reuse");
    assert_eq!(0xC3, c.add(299).read(), "neighbor overwritten by reuse");

    heap.release(a);
    heap.release(c);
  }

  // A and C are separated by the reused region, so they must remain
  // distinct free entries: A exactly as it was, C merged only with the
  // arena's trailing remainder to its right.
  let free = heap.free_blocks();
  assert_eq!(2, free.len());
  assert_eq!(a as usize - HEADER_SIZE, free[0].0);
  assert_eq!(block_size(100), free[0].1);
  assert_eq!(c as usize - HEADER_SIZE, free[1].0);

  let arena_block = ARENA_SIZE + OVERHEAD;
  assert_eq!(arena_block - block_size(100) - block_size(200), free[1].1);

  unsafe {
    assert_eq!(0xD4, d.add(149).read(), "reused block damaged by frees");
  }
}

/// The growth scenario: 1 MiB requests exhaust the first arena and force
/// a second one, and the accounting reflects exactly two acquisitions.
#[test]
fn scenario_second_arena_is_acquired_and_tracked() {
  let allocator = Allocator::new();
  let one_mib = 1024 * 1024;

  let mut payloads = Vec::new();
  while allocator.stats().arenas < 2 {
    payloads.push(allocator.allocate(one_mib).unwrap().as_ptr());
    assert!(payloads.len() < 16, "second arena never materialized");
  }

  let stats = allocator.stats();
  assert_eq!(2, stats.arenas);
  assert_eq!(2 * (ARENA_SIZE + 2 * OVERHEAD), stats.heap_bytes);

  // The second arena's block serves writes like any other.
  let last = *payloads.last().unwrap();
  unsafe {
    ptr::write_bytes(last, 0x99, one_mib);
    assert_eq!(0x99, last.add(one_mib - 1).read());

    for payload in payloads {
      allocator.release(payload);
    }
  }
}

/// Freeing two adjacent blocks — in either order — must yield a block
/// that serves their combined size without growing the heap.
#[test]
fn scenario_coalesced_neighbors_serve_their_combined_size() {
  for reverse in [false, true] {
    let allocator = Allocator::new();

    let a = allocator.allocate(500).unwrap().as_ptr();
    let b = allocator.allocate(700).unwrap().as_ptr();
    let _guard = allocator.allocate(64).unwrap();

    unsafe {
      if reverse {
        allocator.release(b);
        allocator.release(a);
      } else {
        allocator.release(a);
        allocator.release(b);
      }
    }

    let combined = block_size(500) + block_size(700);
    let merged = allocator.allocate(combined - OVERHEAD).unwrap().as_ptr();
    assert_eq!(a, merged, "combined request did not reuse the merged block");
    assert_eq!(1, allocator.stats().arenas, "coalescing failed and the heap grew");
  }
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(32))]

  /// Round-trip law: every allocation is at least as big as requested,
  /// holds its pattern across unrelated allocator traffic, and never
  /// overlaps another live allocation.
  #[test]
  fn round_trip_survives_unrelated_traffic(sizes in prop::collection::vec(1usize..4096, 1..12)) {
    let mut heap = Heap::new();
    let mut live: Vec<(*mut u8, usize, u8)> = Vec::new();

    for (i, &size) in sizes.iter().enumerate() {
      let payload = heap.allocate(size).unwrap().as_ptr();
      let pattern = (i as u8).wrapping_mul(31).wrapping_add(7);

      unsafe {
        ptr::write_bytes(payload, pattern, size);
        prop_assert!(heap.object_size(payload) >= size + OVERHEAD);
      }
      live.push((payload, size, pattern));
    }

    // Free every other allocation, then add more traffic on top.
    let mut kept = Vec::new();
    for (i, entry) in live.into_iter().enumerate() {
      if i % 2 == 0 {
        unsafe { heap.release(entry.0) };
      } else {
        kept.push(entry);
      }
    }
    let extra = heap.allocate(64).unwrap().as_ptr();
    unsafe { ptr::write_bytes(extra, 0xEE, 64) };

    // Survivors keep their patterns and stay disjoint.
    for &(payload, size, pattern) in &kept {
      unsafe {
        for offset in [0, size / 2, size - 1] {
          prop_assert_eq!(pattern, payload.add(offset).read());
        }
      }
    }

    let mut ranges: Vec<(usize, usize)> = kept.iter().map(|&(p, s, _)| (p as usize, s)).collect();
    ranges.push((extra as usize, 64));
    ranges.sort_unstable();
    for pair in ranges.windows(2) {
      prop_assert!(pair[0].0 + pair[0].1 <= pair[1].0, "live payloads overlap");
    }
  }
}
