//! Point-in-time usage figures for a [`Heap`](crate::Heap).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapStats {
  pub capacity: usize,
  pub allocated_bytes: usize,
  pub free_bytes: usize,
  pub allocated_chunks: usize,
  pub free_chunks: usize,
  /// Largest single free chunk as currently registered. Chunks released
  /// since the last allocation are not merged yet, so this can understate
  /// what the next `allocate` will find.
  pub largest_free: usize,
}

impl HeapStats {
  /// Share of free bytes that sit outside the largest free chunk, in `[0, 1]`.
  pub fn fragmentation(&self) -> f64 {
    if self.free_bytes == 0 {
      return 0.0;
    }
    1.0 - self.largest_free as f64 / self.free_bytes as f64
  }
}

impl fmt::Display for HeapStats {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(
      f,
      "{}/{} bytes allocated in {} chunks, {} bytes free in {} chunks (largest {})",
      self.allocated_bytes,
      self.capacity,
      self.allocated_chunks,
      self.free_bytes,
      self.free_chunks,
      self.largest_free,
    )
  }
}
