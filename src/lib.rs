//! # tagalloc - A Boundary-Tagged Free-List Allocator
//!
//! This crate provides a general-purpose **dynamic memory allocator**: a
//! drop-in replacement for the classic allocation entry points (allocate,
//! release, reallocate, zero-allocate) that manages its own heap out of
//! arenas acquired from the operating system.
//!
//! ## Overview
//!
//! Every block carries a *boundary tag* pair — a header at its start and a
//! mirroring footer at its end — so both physical neighbors of any block can
//! be inspected in constant time:
//!
//! ```text
//!   One block:
//!
//!   ┌────────────────────┬──────────────────────────────┬──────────────┐
//!   │       Header       │           Payload            │    Footer    │
//!   │ ┌────────────────┐ │                              │ ┌──────────┐ │
//!   │ │ size           │ │  ┌────────────────────────┐  │ │ size     │ │
//!   │ │ state          │ │  │    caller's bytes,     │  │ │ state    │ │
//!   │ │ next ┐ free-   │ │  │    8-byte aligned      │  │ └──────────┘ │
//!   │ │ prev ┘ list    │ │  └────────────────────────┘  │              │
//!   │ └────────────────┘ │                              │              │
//!   └────────────────────┴──────────────────────────────┴──────────────┘
//!                        ▲
//!                        └── Pointer returned to the caller
//! ```
//!
//! Free blocks are indexed by one circular doubly linked **free list**
//! anchored on a sentinel node. Allocation is **first-fit**: the scan takes
//! the first block large enough, splitting off the remainder as a new free
//! block when it can stand alone. Release coalesces the block with any free
//! physical neighbor, so fragmentation heals as fast as it appears.
//!
//! ## Arenas
//!
//! Memory is acquired from the OS in fixed 2 MiB arenas, each bounded by a
//! pair of *fenceposts* — permanently allocated pseudo-blocks that stop
//! neighbor inspection at the arena edge:
//!
//! ```text
//!   One arena (2 MiB usable):
//!
//!   ┌──────────┬─────────────────────────────────────────┬──────────┐
//!   │  footer  │ header ·········· payload ······ footer │  header  │
//!   │ fencepost│           one free block                 │ fencepost│
//!   └──────────┴─────────────────────────────────────────┴──────────┘
//!    low edge                                              high edge
//! ```
//!
//! Arenas are never returned to the OS; the heap only grows. Blocks in
//! different arenas are never treated as physically adjacent.
//!
//! ## Crate Structure
//!
//! ```text
//!   tagalloc
//!   ├── align      - 8-byte rounding macro (align8!)
//!   ├── block      - boundary-tag layout and pointer arithmetic
//!   ├── arena      - OS memory primitive and arena carving
//!   ├── free_list  - sentinel-anchored circular free list
//!   ├── heap       - allocation engine (search, split, coalesce)
//!   ├── stats      - counters and the end-of-process report
//!   ├── error      - failure taxonomy
//!   └── api        - locked entry points and the process-wide instance
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use tagalloc::{allocate, release};
//!
//! let payload = allocate(64).expect("out of memory").as_ptr();
//!
//! unsafe {
//!     payload.write(42);
//!     assert_eq!(42, payload.read());
//!     release(payload);
//! }
//! ```
//!
//! Instance use (own heap, own lock) goes through [`Allocator`], or
//! [`Heap`] directly when no locking is wanted.
//!
//! ## Features
//!
//! - **First-fit with splitting**: large free blocks serve small requests
//!   without waste
//! - **Immediate coalescing**: adjacent free blocks merge on release, in
//!   both directions
//! - **Thread-safe entry points**: one mutex serializes all heap mutation
//! - **Failure taxonomy**: OS exhaustion and size overflow surface as
//!   [`AllocError`], never as a dangling pointer
//! - **Exit report**: heap size and call counters printed at process exit,
//!   disabled with `TAGALLOC_VERBOSE=NO`
//!
//! ## Limitations
//!
//! - **8-byte alignment only**: requests for stricter alignment are not
//!   supported (and so no `GlobalAlloc` impl is provided)
//! - **Single free list**: no segregated size classes; search is O(n) in
//!   the number of free blocks
//! - **One lock**: throughput under contention is bounded by a single
//!   critical section
//! - **The heap only grows**: arenas are never unmapped, and no request
//!   larger than one arena's interior (2 MiB) can be served
//! - **Unix-only**: arenas come from `mmap` via `libc`
//!
//! ## Safety
//!
//! All raw-pointer arithmetic is centralized in the `block` module; the
//! other modules manipulate blocks only through it. `allocate` and
//! `zero_allocate` are safe; `release`, `reallocate` and `object_size` are
//! `unsafe` because they trust the caller's pointer. Passing a pointer this
//! allocator did not hand out, or releasing one twice, is undefined
//! behavior — the heap does not validate pointers.

pub mod align;
mod api;
mod arena;
mod block;
mod error;
mod free_list;
mod heap;
mod stats;

pub use api::{Allocator, allocate, instance, object_size, reallocate, release, zero_allocate};
pub use arena::{ARENA_SIZE, MemorySource, SystemSource};
pub use block::{FOOTER_SIZE, HEADER_SIZE, OVERHEAD};
pub use error::AllocError;
pub use heap::Heap;
pub use stats::{HeapStats, VERBOSE_ENV};
