//! Error types for the heap and its registries.
//!
//! Two classes exist. [`AllocError`] is the recoverable outcome of an
//! allocation request that cannot be served. Everything else describes a
//! broken caller contract: [`Heap`](crate::Heap) treats those as fatal.

use thiserror::Error;

use crate::heap::HeapPtr;
use crate::registry::RegistryKind;

/// Failures of the bounded chunk registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
  #[error("chunk registry is full (capacity {capacity})")]
  Full { capacity: usize },

  #[error("chunk index {index} out of bounds (len {len})")]
  IndexOutOfBounds { index: usize, len: usize },

  #[error("a chunk starting at {start:#06x} is already registered")]
  DuplicateStart { start: usize },

  #[error("refusing to register an empty chunk at {start:#06x}")]
  EmptyChunk { start: usize },

  #[error("chunk at {start:#06x} of {size} bytes overlaps the chunk at {existing:#06x}")]
  Overlap {
    start: usize,
    size: usize,
    existing: usize,
  },

  #[error("chunk at {start:#06x} of {size} bytes runs past the end of the address space")]
  Overflow { start: usize, size: usize },
}

/// Contract violations detected by the heap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
  #[error("{kind} registry: {source}")]
  Registry {
    kind: RegistryKind,
    #[source]
    source: RegistryError,
  },

  #[error("pointer {0} was never allocated or has already been released")]
  UnknownPointer(HeapPtr),

  #[error("heap invariant violated: {0}")]
  Invariant(String),
}

/// Why an allocation request returned no pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
  #[error("zero-size allocation requested")]
  ZeroSize,

  #[error("out of memory: requested {requested} bytes, largest free run is {largest_free} bytes")]
  OutOfMemory { requested: usize, largest_free: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("heap capacity must be greater than zero")]
  ZeroHeapCapacity,

  #[error("chunk registry capacity must be greater than zero")]
  ZeroChunkCapacity,
}
