use std::ptr::NonNull;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::debug;

use crate::arena::SystemSource;
use crate::error::AllocError;
use crate::heap::Heap;
use crate::stats::{self, HeapStats};

/// The public allocator: the allocation engine behind one mutex.
///
/// Every entry point acquires the lock before touching any heap state
/// and holds the guard for the whole operation — lazy initialization,
/// heap growth and error paths included. The guard releases the lock on
/// every exit, so no path can return while holding it or release it
/// twice.
///
/// Throughput under contention is bounded by this single critical
/// section; there are no per-arena or per-block locks to contend on.
pub struct Allocator {
  heap: Mutex<Heap<SystemSource>>,
}

impl Allocator {
  /// Builds an idle allocator. The first arena is acquired lazily by
  /// the first allocation.
  pub fn new() -> Self {
    Allocator {
      heap: Mutex::new(Heap::new()),
    }
  }

  /// Allocates `size` usable bytes. See [`Heap::allocate`].
  pub fn allocate(
    &self,
    size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    let mut heap = self.heap.lock();
    heap.stats_mut().allocate_calls += 1;
    heap.allocate(size)
  }

  /// Returns a block to the heap. Null is a no-op.
  ///
  /// # Safety
  ///
  /// `payload` must be null or a pointer obtained from this allocator
  /// and not yet released.
  pub unsafe fn release(
    &self,
    payload: *mut u8,
  ) {
    let mut heap = self.heap.lock();
    heap.stats_mut().release_calls += 1;
    unsafe { heap.release(payload) }
  }

  /// Moves an allocation to a new size. See [`Heap::reallocate`].
  ///
  /// # Safety
  ///
  /// `payload` must be null or a live pointer from this allocator.
  pub unsafe fn reallocate(
    &self,
    payload: *mut u8,
    new_size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    let mut heap = self.heap.lock();
    heap.stats_mut().reallocate_calls += 1;
    unsafe { heap.reallocate(payload, new_size) }
  }

  /// Allocates zero-filled room for `count` elements of `element_size`
  /// bytes. See [`Heap::zero_allocate`].
  pub fn zero_allocate(
    &self,
    count: usize,
    element_size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    let mut heap = self.heap.lock();
    heap.stats_mut().zero_allocate_calls += 1;
    heap.zero_allocate(count, element_size)
  }

  /// The stored size tag of an allocation, overhead included.
  ///
  /// # Safety
  ///
  /// `payload` must be a live pointer from this allocator.
  pub unsafe fn object_size(
    &self,
    payload: *mut u8,
  ) -> usize {
    let heap = self.heap.lock();
    unsafe { heap.object_size(payload) }
  }

  /// Snapshot of the heap statistics.
  pub fn stats(&self) -> HeapStats {
    self.heap.lock().stats()
  }

  /// The statistics formatted as the end-of-process report.
  pub fn report(&self) -> String {
    self.heap.lock().stats().to_string()
  }

  /// Diagnostic free-list dump. See [`Heap::free_list_report`].
  pub fn free_list_report(&self) -> String {
    self.heap.lock().free_list_report()
  }
}

impl Default for Allocator {
  fn default() -> Self {
    Self::new()
  }
}

/// Process-wide allocator backing the free functions below.
///
/// Construct-once: the instance lives for the rest of the process and
/// its arenas are reclaimed by the OS at exit. First use registers the
/// exit report.
static GLOBAL: Lazy<Allocator> = Lazy::new(|| {
  unsafe {
    libc::atexit(report_at_exit);
  }
  debug!("process-wide allocator initialized");
  Allocator::new()
});

extern "C" fn report_at_exit() {
  debug!("process exiting, reporting heap statistics");
  if stats::verbose_enabled() {
    eprintln!("{}", GLOBAL.report());
  }
}

/// The process-wide allocator instance.
pub fn instance() -> &'static Allocator {
  &GLOBAL
}

/// Allocates from the process-wide allocator.
pub fn allocate(size: usize) -> Result<NonNull<u8>, AllocError> {
  GLOBAL.allocate(size)
}

/// Releases to the process-wide allocator.
///
/// # Safety
///
/// See [`Allocator::release`].
pub unsafe fn release(payload: *mut u8) {
  unsafe { GLOBAL.release(payload) }
}

/// Reallocates on the process-wide allocator.
///
/// # Safety
///
/// See [`Allocator::reallocate`].
pub unsafe fn reallocate(
  payload: *mut u8,
  new_size: usize,
) -> Result<NonNull<u8>, AllocError> {
  unsafe { GLOBAL.reallocate(payload, new_size) }
}

/// Zero-allocates from the process-wide allocator.
pub fn zero_allocate(
  count: usize,
  element_size: usize,
) -> Result<NonNull<u8>, AllocError> {
  GLOBAL.zero_allocate(count, element_size)
}

/// Stored size of an allocation from the process-wide allocator.
///
/// # Safety
///
/// See [`Allocator::object_size`].
pub unsafe fn object_size(payload: *mut u8) -> usize {
  unsafe { GLOBAL.object_size(payload) }
}
