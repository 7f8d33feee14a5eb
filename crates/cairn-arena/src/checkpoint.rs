//! Save points for rolling back arena allocations.
//!
//! A [`Mark`] is a plain copy of the arena's two offsets. [`Checkpoint`]
//! pairs a mark with an exclusive borrow of the arena: everything allocated
//! through the checkpoint is discarded when [`Checkpoint::end`] is called.
//!
//! Checkpoints nest like a stack. Because each one borrows the arena (or the
//! enclosing checkpoint) mutably, an outer checkpoint cannot be ended while
//! an inner one is still open.
//!
//! ```
//! use cairn_arena::{AlignedBuf, Arena, Checkpoint};
//!
//! let mut buf = AlignedBuf::<64>::new();
//! let mut arena = Arena::new(&mut buf);
//! arena.allocate(20, 1).unwrap();
//!
//! let mut outer = Checkpoint::begin(&mut arena);
//! outer.allocate(8, 1).unwrap();
//! {
//!     let mut inner = outer.checkpoint();
//!     inner.allocate(16, 1).unwrap();
//!     inner.end();
//! }
//! assert_eq!(outer.current_offset(), 28);
//! outer.end();
//!
//! assert_eq!(arena.current_offset(), 20);
//! ```

use std::ops::{Deref, DerefMut};

use crate::arena::Arena;

/// Snapshot of an arena's `last_offset` and `current_offset`.
///
/// Taken with [`Arena::mark`] and restored with [`Arena::rewind`]. A mark
/// records which buffer it was taken on and is only accepted by that arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mark {
    pub(crate) base: usize,
    pub(crate) last_offset: usize,
    pub(crate) current_offset: usize,
}

impl Mark {
    pub(crate) fn new(base: usize, last_offset: usize, current_offset: usize) -> Self {
        Self {
            base,
            last_offset,
            current_offset,
        }
    }

    /// Offset of the most recent allocation when the mark was taken.
    pub fn last_offset(&self) -> usize {
        self.last_offset
    }

    /// Cursor position when the mark was taken.
    pub fn current_offset(&self) -> usize {
        self.current_offset
    }
}

/// Scoped save point on an [`Arena`].
///
/// Created by [`Checkpoint::begin`] (or [`Arena::checkpoint`]). It derefs to
/// the arena, so allocations are made through it directly. Closing it:
///
/// - [`end`](Self::end) restores the arena to its state at `begin`.
/// - [`keep`](Self::keep) leaves every allocation in place.
///
/// Dropping a checkpoint without either keeps the allocations, like
/// [`keep`](Self::keep), and in debug builds prints a diagnostic.
#[must_use = "a checkpoint only rolls back when `end` is called"]
pub struct Checkpoint<'a, 'buf> {
    arena: &'a mut Arena<'buf>,
    mark: Mark,
    #[cfg(debug_assertions)]
    closed: bool,
}

impl<'a, 'buf> Checkpoint<'a, 'buf> {
    /// Capture `arena`'s offsets. Performs no allocation.
    pub fn begin(arena: &'a mut Arena<'buf>) -> Self {
        let mark = arena.mark();
        Self {
            arena,
            mark,
            #[cfg(debug_assertions)]
            closed: false,
        }
    }

    /// The offsets captured at `begin`.
    pub fn saved(&self) -> Mark {
        self.mark
    }

    /// Bytes allocated through this checkpoint so far, padding included.
    pub fn bytes_since_begin(&self) -> usize {
        self.arena
            .current_offset()
            .saturating_sub(self.mark.current_offset)
    }

    /// Restore the arena to its state at `begin`.
    ///
    /// Every allocation made since then is discarded; its bytes are not
    /// zeroed until they are allocated again.
    pub fn end(mut self) {
        self.arena.rewind(self.mark);
        self.close();
    }

    /// Close the checkpoint without rolling back.
    pub fn keep(mut self) {
        self.close();
    }

    fn close(&mut self) {
        #[cfg(debug_assertions)]
        {
            self.closed = true;
        }
    }
}

impl<'buf> Deref for Checkpoint<'_, 'buf> {
    type Target = Arena<'buf>;

    fn deref(&self) -> &Arena<'buf> {
        self.arena
    }
}

impl<'buf> DerefMut for Checkpoint<'_, 'buf> {
    fn deref_mut(&mut self) -> &mut Arena<'buf> {
        self.arena
    }
}

#[cfg(debug_assertions)]
impl Drop for Checkpoint<'_, '_> {
    fn drop(&mut self) {
        if self.closed || std::thread::panicking() {
            return;
        }
        eprintln!(
            "cairn: checkpoint dropped without end() or keep(); {} bytes allocated since offset {} stay in use",
            self.bytes_since_begin(),
            self.mark.current_offset,
        );
    }
}

/// Restores a mark on drop. Backs [`Arena::scoped`].
pub(crate) struct Rewind<'a, 'buf> {
    arena: &'a mut Arena<'buf>,
    mark: Mark,
}

impl<'a, 'buf> Rewind<'a, 'buf> {
    pub(crate) fn new(arena: &'a mut Arena<'buf>) -> Self {
        let mark = arena.mark();
        Self { arena, mark }
    }
}

impl<'buf> Deref for Rewind<'_, 'buf> {
    type Target = Arena<'buf>;

    fn deref(&self) -> &Arena<'buf> {
        self.arena
    }
}

impl<'buf> DerefMut for Rewind<'_, 'buf> {
    fn deref_mut(&mut self) -> &mut Arena<'buf> {
        self.arena
    }
}

impl Drop for Rewind<'_, '_> {
    fn drop(&mut self) {
        self.arena.rewind(self.mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::AlignedBuf;

    #[test]
    fn begin_captures_offsets() {
        let mut buf = AlignedBuf::<64>::new();
        let mut arena = Arena::new(&mut buf);
        arena.allocate(4, 1).unwrap();
        arena.allocate(6, 1).unwrap();
        let cp = Checkpoint::begin(&mut arena);
        assert_eq!(cp.saved().last_offset(), 4);
        assert_eq!(cp.saved().current_offset(), 10);
        assert_eq!(cp.saved(), cp.mark());
        assert_eq!(cp.bytes_since_begin(), 0);
        cp.keep();
    }

    #[test]
    fn end_restores_both_offsets() {
        let mut buf = AlignedBuf::<64>::new();
        let mut arena = Arena::new(&mut buf);
        arena.allocate(4, 1).unwrap();
        arena.allocate(6, 1).unwrap();

        let mut cp = arena.checkpoint();
        for _ in 0..5 {
            cp.allocate(3, 4).unwrap();
        }
        assert!(cp.bytes_since_begin() > 0);
        cp.end();

        assert_eq!(arena.last_offset(), 4);
        assert_eq!(arena.current_offset(), 10);
    }

    #[test]
    fn keep_preserves_allocations() {
        let mut buf = AlignedBuf::<64>::new();
        let mut arena = Arena::new(&mut buf);
        let mut cp = arena.checkpoint();
        cp.allocate(12, 1).unwrap();
        cp.keep();
        assert_eq!(arena.current_offset(), 12);
    }

    #[test]
    fn dropped_checkpoint_keeps_allocations() {
        let mut buf = AlignedBuf::<64>::new();
        let mut arena = Arena::new(&mut buf);
        {
            let mut cp = arena.checkpoint();
            cp.allocate(12, 1).unwrap();
        }
        assert_eq!(arena.current_offset(), 12);
    }

    #[test]
    fn memory_is_rezeroed_after_end() {
        let mut buf = AlignedBuf::<64>::new();
        let mut arena = Arena::new(&mut buf);
        let mut cp = arena.checkpoint();
        let a = cp.allocate(8, 1).unwrap();
        cp.bytes_mut(a).fill(0x5A);
        cp.end();

        let b = arena.allocate(8, 1).unwrap();
        assert_eq!(b.offset(), a.offset());
        assert!(arena.bytes(b).iter().all(|&v| v == 0));
    }

    #[test]
    fn nested_checkpoints_unwind_in_order() {
        let mut buf = AlignedBuf::<128>::new();
        let mut arena = Arena::new(&mut buf);
        arena.allocate(8, 1).unwrap();

        let mut outer = arena.checkpoint();
        outer.allocate(8, 1).unwrap();
        let mut inner = Checkpoint::begin(&mut outer);
        inner.allocate(32, 1).unwrap();
        assert_eq!(inner.saved().current_offset(), 16);
        inner.end();
        assert_eq!(outer.current_offset(), 16);
        assert_eq!(outer.last_offset(), 8);
        outer.end();

        assert_eq!(arena.current_offset(), 8);
        assert_eq!(arena.last_offset(), 0);
    }

    #[test]
    fn in_place_resize_inside_checkpoint_is_rolled_back() {
        let mut buf = AlignedBuf::<64>::new();
        let mut arena = Arena::new(&mut buf);
        let a = arena.allocate(8, 1).unwrap();

        let mut cp = arena.checkpoint();
        let grown = cp.resize(Some(a), 40, 1).unwrap();
        assert_eq!(grown.offset(), 0);
        cp.end();

        assert_eq!(arena.current_offset(), 8);
        assert_eq!(arena.last_offset(), 0);
    }

    #[test]
    fn mark_accessors() {
        let mark = Mark::new(0, 3, 9);
        assert_eq!(mark.last_offset(), 3);
        assert_eq!(mark.current_offset(), 9);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn end_restores_exactly(
                before in proptest::collection::vec(0usize..32, 0..8),
                during in proptest::collection::vec((0usize..32, 0u32..5), 0..16),
            ) {
                let mut buf = AlignedBuf::<512>::new();
                let mut arena = Arena::new(&mut buf);
                for &size in &before {
                    let _ = arena.allocate(size, 4);
                }
                let expected = arena.mark();

                let mut cp = arena.checkpoint();
                for &(size, shift) in &during {
                    let _ = cp.allocate(size, 1 << shift);
                }
                cp.end();

                prop_assert_eq!(arena.mark(), expected);
            }
        }
    }
}
