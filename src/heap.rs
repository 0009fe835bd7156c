use std::{fmt, mem};

use tracing::{debug, error, trace, warn};

use crate::{
  chunk::Chunk,
  coalesce,
  config::HeapConfig,
  dump::Dump,
  error::{AllocError, ConfigError, HeapError, RegistryError},
  registry::{ChunkRegistry, RegistryKind},
  stats::HeapStats,
};

/// Offset of an allocation inside the heap buffer.
///
/// Only [`Heap::allocate`] hands these out. "No allocation" is spelled
/// `None` wherever an `Option<HeapPtr>` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeapPtr(usize);

impl HeapPtr {
  pub fn offset(self) -> usize {
    self.0
  }
}

impl fmt::Display for HeapPtr {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "{:#06x}", self.0)
  }
}

#[cold]
#[track_caller]
fn fatal(error: HeapError) -> ! {
  error!(%error, "heap contract violated");
  panic!("{error}");
}

fn registry_error(kind: RegistryKind) -> impl FnOnce(RegistryError) -> HeapError {
  move |source| HeapError::Registry { kind, source }
}

/// A first-fit allocator over a fixed, zero-initialized byte buffer.
///
/// The buffer is partitioned at all times into the chunks of two
/// registries: `allocated` and `free`. Releasing only moves a chunk back to
/// `free`; adjacent free chunks are merged lazily at the start of the next
/// [`allocate`](Heap::allocate).
pub struct Heap {
  config: HeapConfig,
  memory: Box<[u8]>,
  allocated: ChunkRegistry,
  free: ChunkRegistry,
  scratch: ChunkRegistry,
}

impl Heap {
  pub fn new(config: HeapConfig) -> Result<Self, ConfigError> {
    config.validate()?;
    Ok(Self::with_valid_config(config))
  }

  fn with_valid_config(config: HeapConfig) -> Self {
    debug!(
      heap_capacity = config.heap_capacity,
      chunk_capacity = config.chunk_capacity,
      "heap initialized"
    );

    Self {
      config,
      memory: vec![0; config.heap_capacity].into_boxed_slice(),
      allocated: ChunkRegistry::with_capacity(config.chunk_capacity),
      free: ChunkRegistry::seeded(config.chunk_capacity, Chunk::new(0, config.heap_capacity)),
      scratch: ChunkRegistry::with_capacity(config.chunk_capacity),
    }
  }

  pub fn config(&self) -> &HeapConfig {
    &self.config
  }

  /// Size of the backing buffer in bytes.
  pub fn capacity(&self) -> usize {
    self.memory.len()
  }

  pub fn registry(
    &self,
    kind: RegistryKind,
  ) -> &ChunkRegistry {
    match kind {
      RegistryKind::Allocated => &self.allocated,
      RegistryKind::Free => &self.free,
    }
  }

  /// Merges adjacent free chunks in place.
  ///
  /// [`allocate`](Heap::allocate) already does this before every search;
  /// calling it directly is only useful to observe the merged layout.
  pub fn coalesce(&mut self) {
    let before = self.free.len();

    if let Err(source) = coalesce::merge(&mut self.scratch, &self.free) {
      fatal(registry_error(RegistryKind::Free)(source));
    }
    mem::swap(&mut self.free, &mut self.scratch);

    trace!(before, after = self.free.len(), "coalesced free chunks");
  }

  /// Reserves `size` bytes and returns their offset.
  ///
  /// The first free chunk large enough wins. Whatever it has beyond `size`
  /// goes back to the free registry as a new chunk.
  ///
  /// # Panics
  ///
  /// When the allocated registry is already at capacity.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<HeapPtr, AllocError> {
    if size == 0 {
      debug!("zero-size allocation ignored");
      return Err(AllocError::ZeroSize);
    }

    self.coalesce();

    let Some(index) = self.free.iter().position(|chunk| chunk.size >= size) else {
      let largest_free = self.free.largest();
      warn!(requested = size, largest_free, "no free chunk fits");
      return Err(AllocError::OutOfMemory {
        requested: size,
        largest_free,
      });
    };

    if self.allocated.is_full() {
      fatal(registry_error(RegistryKind::Allocated)(RegistryError::Full {
        capacity: self.allocated.capacity(),
      }));
    }

    let chunk = self
      .free
      .remove(index)
      .unwrap_or_else(|source| fatal(registry_error(RegistryKind::Free)(source)));

    self
      .allocated
      .insert(chunk.start, size)
      .unwrap_or_else(|source| fatal(registry_error(RegistryKind::Allocated)(source)));

    let tail_size = chunk.size - size;
    if tail_size > 0 {
      self
        .free
        .insert(chunk.start + size, tail_size)
        .unwrap_or_else(|source| fatal(registry_error(RegistryKind::Free)(source)));
    }

    let ptr = HeapPtr(chunk.start);
    debug!(%ptr, size, tail_size, "allocated");
    Ok(ptr)
  }

  /// Returns the chunk behind `ptr` to the free registry.
  ///
  /// `None` is accepted and ignored, so results of failed allocations can
  /// be passed straight back.
  ///
  /// # Panics
  ///
  /// When `ptr` is not currently allocated (double release or a pointer
  /// this heap never returned), or the free registry is at capacity. Use
  /// [`try_release`](Heap::try_release) to get these as errors instead.
  #[track_caller]
  pub fn release(
    &mut self,
    ptr: impl Into<Option<HeapPtr>>,
  ) {
    if let Err(error) = self.try_release(ptr) {
      fatal(error);
    }
  }

  /// Checked form of [`release`](Heap::release). Leaves the heap untouched
  /// on error.
  pub fn try_release(
    &mut self,
    ptr: impl Into<Option<HeapPtr>>,
  ) -> Result<(), HeapError> {
    let Some(ptr) = ptr.into() else {
      return Ok(());
    };

    let index = self
      .allocated
      .find(ptr.0)
      .ok_or(HeapError::UnknownPointer(ptr))?;
    let chunk = *self
      .allocated
      .get(index)
      .ok_or(HeapError::UnknownPointer(ptr))?;

    self
      .free
      .insert(chunk.start, chunk.size)
      .map_err(registry_error(RegistryKind::Free))?;
    self
      .allocated
      .remove(index)
      .map_err(registry_error(RegistryKind::Allocated))?;

    debug!(%ptr, size = chunk.size, "released");
    Ok(())
  }

  fn allocated_chunk(
    &self,
    ptr: HeapPtr,
  ) -> Option<Chunk> {
    self
      .allocated
      .find(ptr.0)
      .and_then(|index| self.allocated.get(index))
      .copied()
  }

  /// The bytes of a live allocation.
  pub fn bytes(
    &self,
    ptr: HeapPtr,
  ) -> Option<&[u8]> {
    let chunk = self.allocated_chunk(ptr)?;
    Some(&self.memory[chunk.start..chunk.end()])
  }

  pub fn bytes_mut(
    &mut self,
    ptr: HeapPtr,
  ) -> Option<&mut [u8]> {
    let chunk = self.allocated_chunk(ptr)?;
    Some(&mut self.memory[chunk.start..chunk.end()])
  }

  pub fn dump(
    &self,
    kind: RegistryKind,
  ) -> Dump<'_> {
    Dump::new(kind, self.registry(kind).as_slice())
  }

  pub fn stats(&self) -> HeapStats {
    HeapStats {
      capacity: self.capacity(),
      allocated_bytes: self.allocated.total_size(),
      free_bytes: self.free.total_size(),
      allocated_chunks: self.allocated.len(),
      free_chunks: self.free.len(),
      largest_free: self.free.largest(),
    }
  }

  /// Verifies that both registries are sorted and that together they tile
  /// the buffer exactly, with no gap and no overlap.
  pub fn check_invariants(&self) -> Result<(), HeapError> {
    for kind in [RegistryKind::Allocated, RegistryKind::Free] {
      let chunks = self.registry(kind).as_slice();
      if let Some(pair) = chunks.windows(2).find(|pair| pair[0].start >= pair[1].start) {
        return Err(HeapError::Invariant(format!(
          "{kind} registry out of order at {:#06x}",
          pair[1].start
        )));
      }
    }

    let mut chunks: Vec<Chunk> = self.allocated.iter().chain(self.free.iter()).copied().collect();
    chunks.sort_unstable();

    let mut cursor = 0;
    for chunk in chunks {
      if chunk.size == 0 {
        return Err(HeapError::Invariant(format!(
          "empty chunk at {:#06x}",
          chunk.start
        )));
      }
      if chunk.start != cursor {
        return Err(HeapError::Invariant(format!(
          "expected a chunk at {cursor:#06x}, found one at {:#06x}",
          chunk.start
        )));
      }
      cursor = chunk.end();
    }

    if cursor != self.capacity() {
      return Err(HeapError::Invariant(format!(
        "chunks cover {cursor} of {} bytes",
        self.capacity()
      )));
    }

    Ok(())
  }
}

impl Default for Heap {
  fn default() -> Self {
    Self::with_valid_config(HeapConfig::default())
  }
}

impl fmt::Debug for Heap {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("Heap")
      .field("capacity", &self.capacity())
      .field("allocated", &self.allocated.as_slice())
      .field("free", &self.free.as_slice())
      .finish()
  }
}
