use thiserror::Error;

/// Failures surfaced by the allocation entry points.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
  /// The operating system could not supply the requested memory.
  #[error("out of memory: the OS could not supply {requested} bytes")]
  OutOfMemory { requested: usize },

  /// The element count and size of a zeroed allocation overflow `usize`.
  #[error("invalid argument: {count} elements of {element_size} bytes overflows")]
  InvalidArgument { count: usize, element_size: usize },
}
