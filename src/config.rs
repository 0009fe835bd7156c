//! Sizing of a [`Heap`](crate::Heap).

use crate::error::ConfigError;

/// Default size of the backing buffer, in bytes.
pub const DEFAULT_HEAP_CAPACITY: usize = 64_000;

/// Default number of chunks each registry can hold.
pub const DEFAULT_CHUNK_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeapConfig {
  /// Size of the backing buffer in bytes.
  pub heap_capacity: usize,
  /// Maximum number of chunks in the allocated and in the free registry.
  pub chunk_capacity: usize,
}

impl HeapConfig {
  pub fn new() -> Self {
    Self {
      heap_capacity: DEFAULT_HEAP_CAPACITY,
      chunk_capacity: DEFAULT_CHUNK_CAPACITY,
    }
  }

  pub fn with_heap_capacity(
    mut self,
    heap_capacity: usize,
  ) -> Self {
    self.heap_capacity = heap_capacity;
    self
  }

  pub fn with_chunk_capacity(
    mut self,
    chunk_capacity: usize,
  ) -> Self {
    self.chunk_capacity = chunk_capacity;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.heap_capacity == 0 {
      return Err(ConfigError::ZeroHeapCapacity);
    }
    if self.chunk_capacity == 0 {
      return Err(ConfigError::ZeroChunkCapacity);
    }
    Ok(())
  }
}

impl Default for HeapConfig {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = HeapConfig::default();

    assert_eq!(config.heap_capacity, 64_000);
    assert_eq!(config.chunk_capacity, 1024);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_validate() {
    assert_eq!(
      HeapConfig::new().with_heap_capacity(0).validate(),
      Err(ConfigError::ZeroHeapCapacity)
    );
    assert_eq!(
      HeapConfig::new().with_chunk_capacity(0).validate(),
      Err(ConfigError::ZeroChunkCapacity)
    );
  }
}
