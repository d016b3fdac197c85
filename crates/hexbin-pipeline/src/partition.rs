//! Fixed-size, index-based chunking.

use hexbin_common::{HexbinError, HexbinResult};

/// A contiguous slice of the hexagon sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<T> {
    index: usize,
    items: Vec<T>,
}

impl<T> Chunk<T> {
    /// Position of this chunk in the partition.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Split `items` into chunks of `chunk_size`; the last may be shorter.
///
/// Concatenating the chunks in order reproduces `items` exactly.
pub fn partition<T: Clone>(items: &[T], chunk_size: usize) -> HexbinResult<Vec<Chunk<T>>> {
    if chunk_size == 0 {
        return Err(HexbinError::invalid_config("chunk_size must be > 0"));
    }

    Ok(items
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, slice)| Chunk {
            index,
            items: slice.to_vec(),
        })
        .collect())
}
