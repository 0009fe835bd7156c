//! Merging of adjacent chunks.
//!
//! ```text
//!   src:  [0,4) [4,6) [6,9)     [12,14) [14,20)
//!          └──────┬──────┘       └─────┬─────┘
//!   dst:       [0,9)                [12,20)
//! ```
//!
//! The sweep only ever looks at the last chunk written to `dst`, so it
//! relies on `src` being sorted by start, which every [`ChunkRegistry`]
//! guarantees.

use crate::{error::RegistryError, registry::ChunkRegistry};

/// Rebuilds `dst` from `src`, fusing chunks that touch end to start.
///
/// Any previous content of `dst` is discarded. The result has no two
/// adjacent chunks, and merging it again yields the same sequence.
pub fn merge(
  dst: &mut ChunkRegistry,
  src: &ChunkRegistry,
) -> Result<(), RegistryError> {
  dst.clear();

  for chunk in src {
    match dst.last_mut() {
      Some(top) if top.is_adjacent_to(chunk) => top.size += chunk.size,
      _ => dst.insert(chunk.start, chunk.size)?,
    }
  }

  Ok(())
}

/// Returns a coalesced copy of `src` with the same capacity.
pub fn coalesced(src: &ChunkRegistry) -> Result<ChunkRegistry, RegistryError> {
  let mut dst = ChunkRegistry::with_capacity(src.capacity());
  merge(&mut dst, src)?;
  Ok(dst)
}
