/// A contiguous byte range inside the heap buffer.
///
/// Chunks are plain values: two chunks with the same `start` and `size`
/// are the same chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Chunk {
  pub start: usize,
  pub size: usize,
}

impl Chunk {
  pub fn new(
    start: usize,
    size: usize,
  ) -> Self {
    Self { start, size }
  }

  /// One past the last byte covered by this chunk.
  pub fn end(&self) -> usize {
    self.start + self.size
  }

  /// `true` when `next` begins exactly where `self` ends.
  pub fn is_adjacent_to(
    &self,
    next: &Chunk,
  ) -> bool {
    self.end() == next.start
  }

  pub fn overlaps(
    &self,
    other: &Chunk,
  ) -> bool {
    self.start < other.end() && other.start < self.end()
  }
}

impl From<Chunk> for (usize, usize) {
  fn from(chunk: Chunk) -> Self {
    (chunk.start, chunk.size)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_adjacency() {
    let a = Chunk::new(0, 4);
    let b = Chunk::new(4, 2);
    let c = Chunk::new(7, 1);

    assert_eq!(a.end(), 4);
    assert!(a.is_adjacent_to(&b));
    assert!(!b.is_adjacent_to(&a));
    assert!(!b.is_adjacent_to(&c));
  }

  #[test]
  fn test_overlaps() {
    let a = Chunk::new(0, 4);

    assert!(a.overlaps(&Chunk::new(3, 10)));
    assert!(a.overlaps(&Chunk::new(0, 1)));
    assert!(!a.overlaps(&Chunk::new(4, 1)));
    assert!(!Chunk::new(5, 5).overlaps(&a));
  }
}
