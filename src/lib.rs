//! # rheap - A First-Fit Chunk Allocator
//!
//! This crate provides a **first-fit allocator** over a single fixed-size,
//! zero-initialized byte buffer. It never asks the operating system or the
//! global allocator for the memory it hands out: every allocation is a
//! range of offsets inside that one buffer.
//!
//! ## Overview
//!
//! The heap is tracked by two sorted chunk registries whose chunks, taken
//! together, always cover every byte of the buffer exactly once:
//!
//! ```text
//!   Heap Buffer (capacity bytes):
//!
//!   ┌──────┬────────┬──────┬──────┬───────────┬────────────────────────┐
//!   │  A   │   F    │  F   │  A   │     A     │           F            │
//!   └──────┴────────┴──────┴──────┴───────────┴────────────────────────┘
//!   0                                                          capacity
//!
//!   allocated: [(start, size), ...]   sorted by start
//!   free:      [(start, size), ...]   sorted by start
//!
//!   sum(allocated.size) + sum(free.size) == capacity
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rheap
//!   ├── chunk     - Chunk (start, size) value type
//!   ├── registry  - ChunkRegistry, bounded and sorted by start
//!   ├── coalesce  - merge of adjacent chunks
//!   ├── heap      - Heap allocator and HeapPtr
//!   ├── dump      - read-only registry listings
//!   ├── stats     - HeapStats usage snapshot
//!   ├── config    - HeapConfig sizing
//!   └── error     - error types
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rheap::{Heap, RegistryKind};
//!
//! let mut heap = Heap::default();
//!
//! let ptr = heap.allocate(16).expect("heap has room");
//! heap.bytes_mut(ptr).unwrap().fill(0x2A);
//! assert_eq!(heap.bytes(ptr).unwrap()[0], 0x2A);
//!
//! heap.release(ptr);
//! print!("{}", heap.dump(RegistryKind::Free));
//! ```
//!
//! ## How It Works
//!
//! Allocation merges adjacent free chunks, picks the first one that is
//! large enough, and splits it:
//!
//! ```text
//!   allocate(3) with free = [(0, 10)]:
//!
//!   before  ┌──────────────────────────────┐
//!           │            F (0,10)          │
//!           └──────────────────────────────┘
//!   after   ┌─────────┬────────────────────┐
//!           │ A (0,3) │      F (3,7)       │
//!           └─────────┴────────────────────┘
//!             ▲
//!             └── HeapPtr(0) returned to the caller
//! ```
//!
//! Release moves the chunk back to the free registry unchanged. Neighbouring
//! free chunks stay separate until the next allocation merges them:
//!
//! ```text
//!   release(1), release(3):   free = [(1,2), (3,3)]
//!   allocate(5):              free -> [(1,5)] -> first fit at 1
//! ```
//!
//! ## Errors
//!
//! - A request that cannot be served is a normal outcome:
//!   [`AllocError::ZeroSize`] or [`AllocError::OutOfMemory`].
//! - Releasing a pointer that is not allocated, or overflowing a registry,
//!   breaks the heap's contract and panics. [`Heap::try_release`] reports
//!   the release case as a [`HeapError`] instead.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: every mutation takes `&mut Heap`
//! - **Fixed size**: the buffer never grows
//! - **Byte granularity**: no alignment beyond one byte
//! - **Bounded bookkeeping**: each registry holds at most
//!   [`HeapConfig::chunk_capacity`] chunks

mod chunk;
mod coalesce;
mod config;
mod dump;
mod error;
mod heap;
mod registry;
mod stats;

pub use chunk::Chunk;
pub use coalesce::{coalesced, merge};
pub use config::{DEFAULT_CHUNK_CAPACITY, DEFAULT_HEAP_CAPACITY, HeapConfig};
pub use dump::{Dump, DumpIter};
pub use error::{AllocError, ConfigError, HeapError, RegistryError};
pub use heap::{Heap, HeapPtr};
pub use registry::{ChunkRegistry, RegistryKind};
pub use stats::HeapStats;
