//! Allocation handles.
//!
//! An [`Allocation`] records where a region lives inside the arena's backing
//! buffer. It is a plain `Copy` value: resolving it back to bytes goes through
//! [`Arena::bytes`](crate::Arena::bytes) or
//! [`Arena::bytes_mut`](crate::Arena::bytes_mut), so no borrow of the arena is
//! held between calls.

use std::fmt;
use std::ops::Range;

/// Location of a region carved out of an arena.
///
/// Only the arena creates handles. Each handle remembers the start address
/// of the buffer it was carved from, so an arena rejects handles it did not
/// issue. A handle stays resolvable after a reset or rewind (it still names
/// in-bounds bytes), but its contents then belong to whatever was allocated
/// over it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Allocation {
    /// Address of the first byte of the issuing arena's buffer.
    pub(crate) base: usize,
    /// Byte offset from the start of the backing buffer.
    pub(crate) offset: usize,
    /// Length of the region in bytes.
    pub(crate) len: usize,
}

impl Allocation {
    pub(crate) fn new(base: usize, offset: usize, len: usize) -> Self {
        Self { base, offset, len }
    }

    /// Byte offset of the region from the start of the backing buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the region in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is a zero-length region.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte of the region.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// The region as a byte range into the backing buffer.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Whether the two regions share at least one byte.
    pub fn overlaps(&self, other: &Allocation) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.base == other.base
            && self.offset < other.end()
            && other.offset < self.end()
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Allocation(off={}, len={})", self.offset, self.len)
    }
}
