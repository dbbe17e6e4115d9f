use std::ptr;
use std::ptr::NonNull;

use crate::block::{BlockState, Header};

/// Circular doubly linked list of every free block in the heap,
/// anchored by a sentinel node.
///
/// The sentinel is not a real block: it owns no memory, is never
/// coalesced and is never returned to a caller. Anchoring the ring on
/// it means insertion and removal never special-case an empty list or
/// the ends.
///
/// The list is the sole owner of the `next`/`prev` fields in free block
/// headers. Blocks leave the list with those fields nulled, and no list
/// operation ever reads them on an allocated block.
pub struct FreeList {
  sentinel: NonNull<Header>,
}

impl FreeList {
  pub fn new() -> Self {
    let sentinel = Box::into_raw(Box::new(Header {
      size: 0,
      state: BlockState::Sentinel,
      next: ptr::null_mut(),
      prev: ptr::null_mut(),
    }));

    unsafe {
      (*sentinel).next = sentinel;
      (*sentinel).prev = sentinel;

      FreeList {
        sentinel: NonNull::new_unchecked(sentinel),
      }
    }
  }

  fn sentinel_ptr(&self) -> *mut Header {
    self.sentinel.as_ptr()
  }

  /// Returns the first free block that can hold `rounded_size` bytes,
  /// scanning from the head. O(n) in the number of free blocks.
  pub unsafe fn first_fit(
    &self,
    rounded_size: usize,
  ) -> Option<NonNull<Header>> {
    unsafe {
      let sentinel = self.sentinel_ptr();
      let mut cursor = (*sentinel).next;

      while (*cursor).state != BlockState::Sentinel {
        if (*cursor).size >= rounded_size {
          return Some(NonNull::new_unchecked(cursor));
        }
        cursor = (*cursor).next;
      }

      None
    }
  }

  /// Splices `block` in, keeping the list sorted by block address.
  ///
  /// Walks to the first node with a higher address and inserts before
  /// it. When the list is empty or every node sits below `block`, the
  /// walk stops back at the sentinel and the block lands at the tail,
  /// which is the correct sorted position in both cases.
  pub unsafe fn insert(
    &mut self,
    block: *mut Header,
  ) {
    unsafe {
      let sentinel = self.sentinel_ptr();
      let mut cursor = (*sentinel).next;

      while cursor != sentinel && cursor < block {
        cursor = (*cursor).next;
      }

      let prev = (*cursor).prev;
      (*block).prev = prev;
      (*block).next = cursor;
      (*prev).next = block;
      (*cursor).prev = block;
    }
  }

  /// Unlinks `block` in O(1) and clears its linkage fields; they carry
  /// no meaning outside the list.
  pub unsafe fn remove(
    &mut self,
    block: *mut Header,
  ) {
    unsafe {
      (*(*block).prev).next = (*block).next;
      (*(*block).next).prev = (*block).prev;
      (*block).next = ptr::null_mut();
      (*block).prev = ptr::null_mut();
    }
  }

  /// `new` takes over `old`'s exact list position in O(1).
  ///
  /// Splitting and right-neighbor coalescing produce a block that
  /// stands in for an existing node; reusing the slot avoids re-walking
  /// for the address-ordered spot.
  pub unsafe fn replace(
    &mut self,
    old: *mut Header,
    new: *mut Header,
  ) {
    unsafe {
      (*new).next = (*old).next;
      (*new).prev = (*old).prev;
      (*(*new).prev).next = new;
      (*(*new).next).prev = new;
      (*old).next = ptr::null_mut();
      (*old).prev = ptr::null_mut();
    }
  }

  /// `(address, size)` of every free block, in list order.
  pub unsafe fn snapshot(&self) -> Vec<(usize, usize)> {
    unsafe {
      let sentinel = self.sentinel_ptr();
      let mut entries = Vec::new();
      let mut cursor = (*sentinel).next;

      while cursor != sentinel {
        entries.push((cursor as usize, (*cursor).size));
        cursor = (*cursor).next;
      }

      entries
    }
  }
}

impl Drop for FreeList {
  fn drop(&mut self) {
    unsafe {
      drop(Box::from_raw(self.sentinel.as_ptr()));
    }
  }
}
