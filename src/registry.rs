//! Bounded, start-ordered chunk sequences.
//!
//! A [`ChunkRegistry`] keeps its chunks sorted ascending by `start` and
//! never holds more than `capacity` of them. Insertion appends and then
//! walks the new chunk left into place, so every operation is a linear
//! scan over at most `capacity` entries.

use std::{fmt, slice};

use crate::{chunk::Chunk, error::RegistryError};

/// Selects one of the two registries a [`Heap`](crate::Heap) maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKind {
  Allocated,
  Free,
}

impl fmt::Display for RegistryKind {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    match self {
      RegistryKind::Allocated => f.write_str("allocated"),
      RegistryKind::Free => f.write_str("free"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRegistry {
  chunks: Vec<Chunk>,
  capacity: usize,
}

impl ChunkRegistry {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      chunks: Vec::with_capacity(capacity),
      capacity,
    }
  }

  /// A registry holding exactly `chunk`. `capacity` must be non-zero.
  pub(crate) fn seeded(
    capacity: usize,
    chunk: Chunk,
  ) -> Self {
    let mut chunks = Vec::with_capacity(capacity);
    chunks.push(chunk);
    Self { chunks, capacity }
  }

  /// Builds a registry from raw chunks without any checks, to corrupt
  /// heaps on purpose in tests.
  #[cfg(test)]
  pub(crate) fn from_raw(
    capacity: usize,
    chunks: Vec<Chunk>,
  ) -> Self {
    Self { chunks, capacity }
  }

  /// Returns the index of the chunk starting at `start`.
  pub fn find(
    &self,
    start: usize,
  ) -> Option<usize> {
    self.chunks.iter().position(|chunk| chunk.start == start)
  }

  /// Registers a new chunk, keeping the sequence sorted by start.
  ///
  /// Fails without touching the registry when it is full, when `size` is
  /// zero, when the range runs past `usize::MAX`, or when it shares a start
  /// or any byte with a chunk already present.
  pub fn insert(
    &mut self,
    start: usize,
    size: usize,
  ) -> Result<(), RegistryError> {
    if self.chunks.len() >= self.capacity {
      return Err(RegistryError::Full {
        capacity: self.capacity,
      });
    }

    if size == 0 {
      return Err(RegistryError::EmptyChunk { start });
    }

    if start.checked_add(size).is_none() {
      return Err(RegistryError::Overflow { start, size });
    }

    // Walk from the back to find the slot; the duplicate check rides along.
    let mut index = self.chunks.len();
    while index > 0 && self.chunks[index - 1].start >= start {
      if self.chunks[index - 1].start == start {
        return Err(RegistryError::DuplicateStart { start });
      }
      index -= 1;
    }

    let chunk = Chunk::new(start, size);
    let prev = index.checked_sub(1).and_then(|prev| self.chunks.get(prev));
    let next = self.chunks.get(index);
    if let Some(neighbour) = prev.into_iter().chain(next).find(|other| other.overlaps(&chunk)) {
      return Err(RegistryError::Overlap {
        start,
        size,
        existing: neighbour.start,
      });
    }

    self.chunks.insert(index, chunk);
    Ok(())
  }

  /// Removes and returns the chunk at `index`, shifting the rest left.
  pub fn remove(
    &mut self,
    index: usize,
  ) -> Result<Chunk, RegistryError> {
    if index >= self.chunks.len() {
      return Err(RegistryError::IndexOutOfBounds {
        index,
        len: self.chunks.len(),
      });
    }

    Ok(self.chunks.remove(index))
  }

  pub fn clear(&mut self) {
    self.chunks.clear();
  }

  pub fn get(
    &self,
    index: usize,
  ) -> Option<&Chunk> {
    self.chunks.get(index)
  }

  /// Mutable access to the last chunk, used by the coalescer to extend it.
  pub(crate) fn last_mut(&mut self) -> Option<&mut Chunk> {
    self.chunks.last_mut()
  }

  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }

  pub fn is_full(&self) -> bool {
    self.chunks.len() >= self.capacity
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn iter(&self) -> slice::Iter<'_, Chunk> {
    self.chunks.iter()
  }

  pub fn as_slice(&self) -> &[Chunk] {
    &self.chunks
  }

  /// Sum of the sizes of every registered chunk.
  pub fn total_size(&self) -> usize {
    self.chunks.iter().map(|chunk| chunk.size).sum()
  }

  /// Size of the biggest chunk, or 0 for an empty registry.
  pub fn largest(&self) -> usize {
    self.chunks.iter().map(|chunk| chunk.size).max().unwrap_or(0)
  }
}

impl<'a> IntoIterator for &'a ChunkRegistry {
  type Item = &'a Chunk;
  type IntoIter = slice::Iter<'a, Chunk>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn starts(registry: &ChunkRegistry) -> Vec<usize> {
    registry.iter().map(|chunk| chunk.start).collect()
  }

  #[test]
  fn test_insert_keeps_order() {
    let mut registry = ChunkRegistry::with_capacity(8);

    for start in [40, 10, 30, 0, 20] {
      registry.insert(start, 5).unwrap();
    }

    assert_eq!(starts(&registry), vec![0, 10, 20, 30, 40]);
    assert_eq!(registry.total_size(), 25);
  }

  #[test]
  fn test_insert_beyond_capacity() {
    let mut registry = ChunkRegistry::with_capacity(2);
    registry.insert(0, 1).unwrap();
    registry.insert(1, 1).unwrap();

    assert!(registry.is_full());
    assert_eq!(
      registry.insert(2, 1),
      Err(RegistryError::Full { capacity: 2 })
    );
    assert_eq!(registry.len(), 2);
  }

  #[test]
  fn test_insert_rejects_duplicates_and_empty_chunks() {
    let mut registry = ChunkRegistry::with_capacity(4);
    registry.insert(8, 4).unwrap();
    registry.insert(16, 4).unwrap();

    assert_eq!(
      registry.insert(8, 2),
      Err(RegistryError::DuplicateStart { start: 8 })
    );
    assert_eq!(
      registry.insert(4, 0),
      Err(RegistryError::EmptyChunk { start: 4 })
    );
    assert_eq!(starts(&registry), vec![8, 16]);
  }

  #[test]
  fn test_insert_rejects_overlap() {
    let mut registry = ChunkRegistry::with_capacity(4);
    registry.insert(0, 10).unwrap();
    registry.insert(20, 10).unwrap();

    assert_eq!(
      registry.insert(5, 10),
      Err(RegistryError::Overlap { start: 5, size: 10, existing: 0 })
    );
    assert_eq!(
      registry.insert(15, 6),
      Err(RegistryError::Overlap { start: 15, size: 6, existing: 20 })
    );

    registry.insert(10, 10).unwrap();
    assert_eq!(starts(&registry), vec![0, 10, 20]);
  }

  #[test]
  fn test_insert_rejects_overflowing_range() {
    let mut registry = ChunkRegistry::with_capacity(4);

    assert_eq!(
      registry.insert(usize::MAX - 1, 5),
      Err(RegistryError::Overflow { start: usize::MAX - 1, size: 5 })
    );
    registry.insert(usize::MAX - 1, 1).unwrap();
    assert_eq!(
      registry.insert(usize::MAX, 1),
      Err(RegistryError::Overflow { start: usize::MAX, size: 1 })
    );
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn test_find() {
    let mut registry = ChunkRegistry::with_capacity(4);
    registry.insert(12, 3).unwrap();
    registry.insert(3, 9).unwrap();

    assert_eq!(registry.find(3), Some(0));
    assert_eq!(registry.find(12), Some(1));
    assert_eq!(registry.find(4), None);
  }

  #[test]
  fn test_remove_shifts_left() {
    let mut registry = ChunkRegistry::with_capacity(4);
    for start in [0, 10, 20] {
      registry.insert(start, 10).unwrap();
    }

    assert_eq!(registry.remove(1), Ok(Chunk::new(10, 10)));
    assert_eq!(starts(&registry), vec![0, 20]);
    assert_eq!(
      registry.remove(2),
      Err(RegistryError::IndexOutOfBounds { index: 2, len: 2 })
    );
  }

  #[test]
  fn test_largest() {
    let mut registry = ChunkRegistry::with_capacity(4);
    assert_eq!(registry.largest(), 0);

    registry.insert(0, 3).unwrap();
    registry.insert(10, 7).unwrap();
    registry.insert(30, 5).unwrap();

    assert_eq!(registry.largest(), 7);
  }
}
