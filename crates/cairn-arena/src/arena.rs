//! The bump arena over a caller-supplied buffer.
//!
//! [`Arena`] carves regions out of a borrowed `&mut [u8]` by advancing a
//! single cursor. Besides the cursor (`current_offset`) it remembers where
//! the most recent allocation starts (`last_offset`), which is what lets
//! [`Arena::resize`] grow or shrink that allocation without moving it.
//!
//! ```text
//! buffer: [ live allocations ....... | free ..................... ]
//!         0            last_offset   current_offset               capacity
//! ```
//!
//! Memory is reclaimed only in bulk: [`Arena::reset_all`] drops everything,
//! [`Arena::rewind`] and [`Checkpoint`] drop everything allocated after a
//! [`Mark`]. [`Arena::free`] is a no-op.

use std::alloc::Layout;
use std::fmt;

use crate::align::{align_forward, assert_power_of_two, is_aligned};
use crate::checkpoint::{Checkpoint, Mark, Rewind};
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::Allocation;

/// Bump allocator over a fixed-size, caller-owned byte buffer.
///
/// The arena borrows the buffer exclusively for `'buf` and never frees or
/// grows it. Every successful allocation is zero-filled before it is handed
/// out.
///
/// Invariant: `last_offset <= current_offset <= capacity`.
pub struct Arena<'buf> {
    /// Backing storage. Owned by the caller.
    buf: &'buf mut [u8],
    /// Start of the most recent allocation.
    last_offset: usize,
    /// Bump pointer: first free byte.
    current_offset: usize,
    /// Largest `current_offset` ever reached.
    high_water: usize,
    config: ArenaConfig,
}

impl<'buf> Arena<'buf> {
    /// Bind an arena to `buf` with the default [`ArenaConfig`].
    ///
    /// Both offsets start at zero. The buffer contents are left as they are;
    /// allocations zero their own regions.
    pub fn new(buf: &'buf mut [u8]) -> Self {
        Self {
            buf,
            last_offset: 0,
            current_offset: 0,
            high_water: 0,
            config: ArenaConfig::default(),
        }
    }

    /// Bind an arena to `buf` with a custom configuration.
    ///
    /// Returns `Err(ArenaError::InvalidConfig)` if `config` fails validation.
    pub fn with_config(buf: &'buf mut [u8], config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let mut arena = Self::new(buf);
        arena.config = config;
        Ok(arena)
    }

    /// Allocate `size` zeroed bytes whose address is a multiple of `align`.
    ///
    /// `size` may be zero; the result is then an empty region at the aligned
    /// cursor. On failure the arena is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `align` is not a power of two.
    #[track_caller]
    pub fn allocate(&mut self, size: usize, align: usize) -> Result<Allocation, ArenaError> {
        assert_power_of_two(align);
        let offset = self
            .aligned_cursor(align)
            .ok_or_else(|| self.out_of_memory(size, self.current_offset))?;
        let end = offset
            .checked_add(size)
            .filter(|&end| end <= self.capacity())
            .ok_or_else(|| self.out_of_memory(size, offset))?;

        debug_assert!(is_aligned(self.base() + offset, align));
        self.buf[offset..end].fill(0);
        self.last_offset = offset;
        self.current_offset = end;
        self.high_water = self.high_water.max(end);
        Ok(Allocation::new(self.base(), offset, size))
    }

    /// [`allocate`](Self::allocate) with the configured default alignment.
    pub fn allocate_default(&mut self, size: usize) -> Result<Allocation, ArenaError> {
        self.allocate(size, self.config.default_align)
    }

    /// Allocate a region matching `layout`'s size and alignment.
    pub fn alloc_layout(&mut self, layout: Layout) -> Result<Allocation, ArenaError> {
        self.allocate(layout.size(), layout.align())
    }

    /// Allocate and immediately borrow the zeroed bytes.
    ///
    /// Handy when the region is filled once and never resized; use
    /// [`allocate`](Self::allocate) to keep a handle instead.
    ///
    /// # Panics
    ///
    /// Panics if `align` is not a power of two.
    #[track_caller]
    pub fn alloc_bytes(&mut self, size: usize, align: usize) -> Result<&mut [u8], ArenaError> {
        let allocation = self.allocate(size, align)?;
        Ok(&mut self.buf[allocation.range()])
    }

    /// Resize a region, in place when it is the most recent allocation.
    ///
    /// - `old` is `None` or empty: behaves as `allocate(new_size, align)`.
    /// - `old` starts at the last allocation's offset: the cursor is moved to
    ///   `old.offset() + new_size`. Bytes `[0, old.len())` are untouched and a
    ///   grown tail is zeroed. The returned handle has the same offset.
    /// - otherwise: a fresh region is allocated and `min(old.len(), new_size)`
    ///   bytes are moved into it. The old bytes stay behind as dead space.
    ///
    /// On failure the arena is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `align` is not a power of two, or if `old` was not issued by
    /// this arena.
    #[track_caller]
    pub fn resize(
        &mut self,
        old: Option<Allocation>,
        new_size: usize,
        align: usize,
    ) -> Result<Allocation, ArenaError> {
        assert_power_of_two(align);
        let old = match old {
            Some(old) if !old.is_empty() => old,
            _ => return self.allocate(new_size, align),
        };
        self.assert_owned(old);

        if old.offset() == self.last_offset {
            let end = self
                .last_offset
                .checked_add(new_size)
                .filter(|&end| end <= self.capacity())
                .ok_or_else(|| self.out_of_memory(new_size, self.last_offset))?;
            if new_size > old.len() {
                self.buf[old.end()..end].fill(0);
            }
            self.current_offset = end;
            self.high_water = self.high_water.max(end);
            return Ok(Allocation::new(self.base(), old.offset(), new_size));
        }

        let fresh = self.allocate(new_size, align)?;
        let keep = old.len().min(new_size);
        // Source and destination cannot overlap in bump order, but copy_within
        // is a memmove either way.
        self.buf
            .copy_within(old.offset()..old.offset() + keep, fresh.offset());
        Ok(fresh)
    }

    /// [`resize`](Self::resize) with the configured default alignment.
    #[track_caller]
    pub fn resize_default(
        &mut self,
        old: Option<Allocation>,
        new_size: usize,
    ) -> Result<Allocation, ArenaError> {
        self.resize(old, new_size, self.config.default_align)
    }

    /// Release a single allocation. This does nothing.
    ///
    /// A bump arena has no per-object bookkeeping. Space comes back only
    /// through [`reset_all`](Self::reset_all), [`rewind`](Self::rewind) or a
    /// [`Checkpoint`].
    pub fn free(&mut self, _allocation: Allocation) {}

    /// Discard every allocation.
    ///
    /// The buffer is not zeroed here; the next allocations zero their own
    /// regions. Every previously returned handle is invalidated.
    pub fn reset_all(&mut self) {
        self.last_offset = 0;
        self.current_offset = 0;
    }

    /// Snapshot both offsets.
    pub fn mark(&self) -> Mark {
        Mark::new(self.base(), self.last_offset, self.current_offset)
    }

    /// Restore both offsets from a [`Mark`], discarding everything allocated
    /// after it was taken.
    ///
    /// # Panics
    ///
    /// Panics if the mark was taken on another arena, or its offsets are out
    /// of order or exceed the capacity.
    #[track_caller]
    pub fn rewind(&mut self, mark: Mark) {
        assert!(
            mark.base == self.base(),
            "mark {mark:?} does not belong to this arena",
        );
        assert!(
            mark.last_offset <= mark.current_offset && mark.current_offset <= self.capacity(),
            "mark {mark:?} does not belong to an arena of capacity {}",
            self.capacity(),
        );
        self.last_offset = mark.last_offset;
        self.current_offset = mark.current_offset;
    }

    /// Open a [`Checkpoint`] on this arena.
    pub fn checkpoint(&mut self) -> Checkpoint<'_, 'buf> {
        Checkpoint::begin(self)
    }

    /// Run `f` against this arena and roll back everything it allocated.
    ///
    /// The rollback happens on every exit path out of `f`, including a
    /// panic unwinding through it.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Arena<'buf>) -> R) -> R {
        let mut guard = Rewind::new(self);
        f(&mut *guard)
    }

    /// Borrow the bytes of a region.
    ///
    /// # Panics
    ///
    /// Panics if `allocation` was not issued by this arena.
    #[track_caller]
    pub fn bytes(&self, allocation: Allocation) -> &[u8] {
        self.assert_owned(allocation);
        &self.buf[allocation.range()]
    }

    /// Mutably borrow the bytes of a region.
    ///
    /// # Panics
    ///
    /// Panics if `allocation` was not issued by this arena.
    #[track_caller]
    pub fn bytes_mut(&mut self, allocation: Allocation) -> &mut [u8] {
        self.assert_owned(allocation);
        &mut self.buf[allocation.range()]
    }

    /// Total size of the backing buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes in use, including alignment padding and dead space.
    pub fn used(&self) -> usize {
        self.current_offset
    }

    /// Bytes left after the cursor, before any alignment padding.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.current_offset
    }

    /// Offset of the most recent allocation.
    pub fn last_offset(&self) -> usize {
        self.last_offset
    }

    /// Offset of the first free byte.
    pub fn current_offset(&self) -> usize {
        self.current_offset
    }

    /// Largest `current_offset` reached since the arena was created.
    ///
    /// Resets and rewinds do not lower it.
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// The cursor rounded up so the absolute address is `align`-aligned,
    /// expressed as an offset into the buffer.
    fn aligned_cursor(&self, align: usize) -> Option<usize> {
        let base = self.base();
        let aligned = align_forward(base + self.current_offset, align)?;
        Some(aligned - base)
    }

    /// Address of the first byte of the backing buffer. Stamped into every
    /// handle and mark so foreign ones are rejected.
    fn base(&self) -> usize {
        self.buf.as_ptr().addr()
    }

    #[track_caller]
    fn assert_owned(&self, allocation: Allocation) {
        assert!(
            allocation.base == self.base(),
            "{allocation} was not issued by this arena",
        );
        assert!(
            allocation.end() <= self.capacity(),
            "{allocation} is out of bounds of this arena's buffer (capacity {})",
            self.capacity(),
        );
    }

    fn out_of_memory(&self, requested: usize, offset: usize) -> ArenaError {
        ArenaError::OutOfMemory {
            requested,
            offset,
            capacity: self.capacity(),
        }
    }
}

impl fmt::Debug for Arena<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity())
            .field("last_offset", &self.last_offset)
            .field("current_offset", &self.current_offset)
            .field("high_water", &self.high_water)
            .field("config", &self.config)
            .finish()
    }
}
