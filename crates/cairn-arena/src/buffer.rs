//! Fixed-size, cache-line-aligned backing storage.
//!
//! The arena aligns every allocation against the absolute address of its
//! buffer, so any `&mut [u8]` works as backing storage. [`AlignedBuf`] is for
//! callers who also want offsets to be predictable: with a 64-byte aligned
//! start, an allocation aligned to 64 or less lands at an offset that is a
//! multiple of its alignment.

use std::ops::{Deref, DerefMut};

/// A zero-initialised `[u8; N]` whose first byte is aligned to
/// [`AlignedBuf::ALIGN`].
#[derive(Clone)]
#[repr(C, align(64))]
pub struct AlignedBuf<const N: usize>([u8; N]);

impl<const N: usize> AlignedBuf<N> {
    /// Alignment of the first byte.
    pub const ALIGN: usize = 64;

    /// Create a zeroed buffer.
    pub const fn new() -> Self {
        Self([0; N])
    }

    /// Length in bytes.
    pub const fn len(&self) -> usize {
        N
    }

    /// Whether the buffer has zero length.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Borrow the buffer as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Borrow the buffer as a mutable byte slice, e.g. to hand it to
    /// [`Arena::new`](crate::Arena::new).
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl<const N: usize> Default for AlignedBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Deref for AlignedBuf<N> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> DerefMut for AlignedBuf<N> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::is_aligned;

    #[test]
    fn first_byte_is_aligned() {
        let buf = AlignedBuf::<128>::new();
        assert!(is_aligned(
            buf.as_slice().as_ptr().addr(),
            AlignedBuf::<128>::ALIGN
        ));
    }

    #[test]
    fn boxed_buffer_is_aligned() {
        let buf = Box::new(AlignedBuf::<256>::new());
        assert!(is_aligned(buf.as_ptr().addr(), 64));
        assert_eq!(buf.len(), 256);
    }

    #[test]
    fn mutable_slice_backs_an_arena() {
        let mut buf = AlignedBuf::<64>::new();
        let mut arena = crate::Arena::new(buf.as_mut_slice());
        let a = arena.allocate(4, 64).unwrap();
        assert_eq!(a.offset(), 0);
        arena.bytes_mut(a).fill(7);
        assert_eq!(&buf.as_slice()[..4], &[7; 4]);
    }

    #[test]
    fn starts_zeroed() {
        let buf = AlignedBuf::<32>::default();
        assert!(buf.iter().all(|&b| b == 0));
        assert!(!buf.is_empty());
    }
}
