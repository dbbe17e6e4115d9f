use std::ptr;
use std::ptr::NonNull;

use crate::block::{BlockState, FENCEPOST_SIZE, FOOTER_SIZE, Footer, HEADER_SIZE, Header};
use crate::error::AllocError;

/// Usable payload bytes carved out of every arena.
pub const ARENA_SIZE: usize = 2 * 1024 * 1024;

/// Size of the single free block an arena starts out with.
pub const ARENA_BLOCK_SIZE: usize = ARENA_SIZE + HEADER_SIZE + FOOTER_SIZE;

/// Bytes requested from the OS per arena: the interior block plus the
/// two fenceposts bounding it.
pub const ARENA_REQUEST: usize = ARENA_SIZE + 2 * HEADER_SIZE + 2 * FOOTER_SIZE;

/// The OS memory primitive: request `len` contiguous bytes or fail.
///
/// An implementation must hand back a region of at least `len` bytes,
/// aligned to 8 or better, that the heap owns exclusively from then on.
/// Regions are never returned; the heap only grows.
pub trait MemorySource {
  unsafe fn acquire(
    &mut self,
    len: usize,
  ) -> Result<NonNull<u8>, AllocError>;
}

/// Acquires arenas from the operating system with anonymous private
/// `mmap`.
#[derive(Debug, Default)]
pub struct SystemSource;

impl MemorySource for SystemSource {
  unsafe fn acquire(
    &mut self,
    len: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    unsafe {
      let region = libc::mmap(
        ptr::null_mut(),
        len,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
        -1,
        0,
      );

      if region == libc::MAP_FAILED {
        return Err(AllocError::OutOfMemory { requested: len });
      }

      Ok(NonNull::new_unchecked(region as *mut u8))
    }
  }
}

/// Bounds a fresh arena with fenceposts and carves the interior into a
/// single free block, returned for the caller to link into the free
/// list.
///
/// Layout, low address to high:
///
/// ```text
/// | footer fencepost | header . payload . footer | header fencepost |
/// ```
///
/// Both fenceposts read `Allocated` and carry the out-of-range size
/// tag, so neighbor inspection at the arena edges stops at them and
/// never dereferences outside the region. Fenceposts are never split,
/// freed or coalesced.
pub unsafe fn carve(region: NonNull<u8>) -> NonNull<Header> {
  unsafe {
    let base = region.as_ptr();

    let low_fence = base as *mut Footer;
    (*low_fence).size = FENCEPOST_SIZE;
    (*low_fence).state = BlockState::Allocated;

    let high_fence = base.add(ARENA_REQUEST - HEADER_SIZE) as *mut Header;
    (*high_fence).size = FENCEPOST_SIZE;
    (*high_fence).state = BlockState::Allocated;
    (*high_fence).next = ptr::null_mut();
    (*high_fence).prev = ptr::null_mut();

    let interior = Header::write(base.add(FOOTER_SIZE), ARENA_BLOCK_SIZE, BlockState::Free);

    NonNull::new_unchecked(interior)
  }
}
