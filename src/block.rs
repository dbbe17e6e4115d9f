use std::mem;
use std::ptr;

/// Allocation state stored in both boundary tags of a block.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
  Free = 0,
  Allocated = 1,
  Sentinel = 2,
}

/// Block header. Sits at the start of every block; `next`/`prev` are
/// owned by the free list and only carry meaning while the block is
/// `Free`. Allocated blocks keep them null and nothing reads them.
#[repr(C)]
pub struct Header {
  pub size: usize,
  pub state: BlockState,
  pub next: *mut Header,
  pub prev: *mut Header,
}

/// Block footer, mirroring the header at the end of the block so the
/// right-hand neighbor can inspect this block backwards in O(1).
///
/// Invariant: `header.size == footer.size` and
/// `header.state == footer.state` for every whole block, at all times.
#[repr(C)]
pub struct Footer {
  pub size: usize,
  pub state: BlockState,
}

pub const HEADER_SIZE: usize = mem::size_of::<Header>();
pub const FOOTER_SIZE: usize = mem::size_of::<Footer>();

/// Fixed per-block overhead: one header plus one footer.
pub const OVERHEAD: usize = HEADER_SIZE + FOOTER_SIZE;

/// Smallest payload worth splitting off as a standalone free block.
pub const MIN_PAYLOAD: usize = 8;

/// Size tag carried by fenceposts. Out of range for any real block, so
/// a fencepost can never be mistaken for a coalescable neighbor.
pub const FENCEPOST_SIZE: usize = usize::MAX;

/// All pointer arithmetic over block memory lives in these functions;
/// the rest of the crate manipulates blocks only through them.
impl Header {
  /// Recovers the block header from the payload pointer handed to a
  /// caller.
  pub unsafe fn from_payload(payload: *mut u8) -> *mut Header {
    unsafe { payload.sub(HEADER_SIZE) as *mut Header }
  }

  /// Payload pointer for the block: `header + HEADER_SIZE`.
  pub unsafe fn payload(block: *mut Header) -> *mut u8 {
    unsafe { (block as *mut u8).add(HEADER_SIZE) }
  }

  /// Payload capacity of the block: stored size minus both tags.
  pub unsafe fn payload_size(block: *mut Header) -> usize {
    unsafe { (*block).size - OVERHEAD }
  }

  /// Footer of this block: `header + size - FOOTER_SIZE`.
  pub unsafe fn footer(block: *mut Header) -> *mut Footer {
    unsafe { (block as *mut u8).add((*block).size - FOOTER_SIZE) as *mut Footer }
  }

  /// Footer of the physically preceding block, which ends where this
  /// block begins. At the low edge of an arena this is the footer
  /// fencepost, which always reads `Allocated`.
  pub unsafe fn left_footer(block: *mut Header) -> *mut Footer {
    unsafe { (block as *mut u8).sub(FOOTER_SIZE) as *mut Footer }
  }

  /// Header of the physically following block. At the high edge of an
  /// arena this is the header fencepost, which always reads
  /// `Allocated`.
  pub unsafe fn right_header(block: *mut Header) -> *mut Header {
    unsafe { (block as *mut u8).add((*block).size) as *mut Header }
  }

  /// Header of the block that `footer` closes. Must not be called on a
  /// fencepost footer; its size tag does not describe a real block.
  pub unsafe fn from_footer(footer: *mut Footer) -> *mut Header {
    unsafe {
      debug_assert_ne!((*footer).size, FENCEPOST_SIZE);
      (footer as *mut u8).add(FOOTER_SIZE).sub((*footer).size) as *mut Header
    }
  }

  /// Writes a fresh header/footer pair describing a block of `size`
  /// bytes starting at `at`. Linkage fields start out null.
  pub unsafe fn write(
    at: *mut u8,
    size: usize,
    state: BlockState,
  ) -> *mut Header {
    unsafe {
      let block = at as *mut Header;
      (*block).size = size;
      (*block).state = state;
      (*block).next = ptr::null_mut();
      (*block).prev = ptr::null_mut();

      let footer = Self::footer(block);
      (*footer).size = size;
      (*footer).state = state;

      block
    }
  }

  /// Switches the block's state, keeping both tags in sync. Neighbor
  /// inspection trusts footers, so the footer must never go stale.
  pub unsafe fn set_state(
    block: *mut Header,
    state: BlockState,
  ) {
    unsafe {
      (*block).state = state;
      (*Self::footer(block)).state = state;
    }
  }

  /// Grows the stored size by `extra` and rewrites the tags at the new
  /// end of the block. Used when a block absorbs its right-hand
  /// neighbor; the absorbed tags in the interior are never read again.
  pub unsafe fn grow(
    block: *mut Header,
    extra: usize,
  ) {
    unsafe {
      (*block).size += extra;

      let footer = Self::footer(block);
      (*footer).size = (*block).size;
      (*footer).state = (*block).state;
    }
  }

  /// Hardened-build corruption check: both tags of a whole block must
  /// agree.
  pub unsafe fn check_tags(block: *mut Header) {
    unsafe {
      let footer = Self::footer(block);
      debug_assert_eq!(
        (*block).size,
        (*footer).size,
        "boundary tag size mismatch at {block:?}",
      );
      debug_assert_eq!(
        (*block).state,
        (*footer).state,
        "boundary tag state mismatch at {block:?}",
      );
    }
  }
}
