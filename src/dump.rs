//! Read-only views of a registry for display and logging.

use std::{fmt, iter, slice};

use crate::{chunk::Chunk, registry::RegistryKind};

/// A snapshot-free view over one registry of a [`Heap`](crate::Heap).
///
/// `Dump` is `Copy`: every call to [`Dump::iter`] (or every `for` loop over
/// the value) starts again from the lowest start offset.
#[derive(Debug, Clone, Copy)]
pub struct Dump<'a> {
  kind: RegistryKind,
  chunks: &'a [Chunk],
}

pub type DumpIter<'a> = iter::Map<slice::Iter<'a, Chunk>, fn(&Chunk) -> (usize, usize)>;

impl<'a> Dump<'a> {
  pub(crate) fn new(
    kind: RegistryKind,
    chunks: &'a [Chunk],
  ) -> Self {
    Self { kind, chunks }
  }

  pub fn kind(&self) -> RegistryKind {
    self.kind
  }

  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }

  /// Yields `(start, size)` pairs in ascending start order.
  pub fn iter(&self) -> DumpIter<'a> {
    self.chunks.iter().map(pair as fn(&Chunk) -> (usize, usize))
  }
}

fn pair(chunk: &Chunk) -> (usize, usize) {
  (*chunk).into()
}

impl<'a> IntoIterator for Dump<'a> {
  type Item = (usize, usize);
  type IntoIter = DumpIter<'a>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl fmt::Display for Dump<'_> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    writeln!(f, "chunks ({}):", self.len())?;
    for (start, size) in self.iter() {
      writeln!(f, "\tstart: {start:#06x}, size: {size}")?;
    }
    Ok(())
  }
}
