//! Fixed-buffer bump allocation with checkpoints.
//!
//! An [`Arena`] borrows a caller-supplied byte buffer and hands out
//! zero-initialised, aligned regions by advancing a cursor. There is no
//! per-object free: memory comes back in bulk, either all at once with
//! [`Arena::reset_all`] or back to a save point with a [`Checkpoint`].
//!
//! # Architecture
//!
//! ```text
//! Arena<'buf>
//! ├── &'buf mut [u8]        (caller-owned, fixed size)
//! ├── last_offset           (start of the most recent allocation)
//! ├── current_offset        (bump pointer)
//! └── ArenaConfig           (default alignment)
//!
//! Allocation                (Copy handle: offset + len)
//! Mark                      (Copy snapshot of both offsets)
//! Checkpoint<'a, 'buf>      (&mut Arena + Mark, derefs to Arena)
//! ```
//!
//! # Error model
//!
//! - Running out of space is a normal condition: operations return
//!   `Err(ArenaError::OutOfMemory)` and leave the arena untouched.
//! - Misuse panics: a non-power-of-two alignment, or an [`Allocation`] or
//!   [`Mark`] that lies outside this arena's buffer.
//!
//! # Example
//!
//! ```
//! use cairn_arena::{AlignedBuf, Arena};
//!
//! let mut buf = AlignedBuf::<64>::new();
//! let mut arena = Arena::new(&mut buf);
//!
//! let a = arena.allocate_default(10).unwrap();
//! arena.bytes_mut(a)[0] = 1;
//!
//! // `a` is the most recent allocation, so it grows in place.
//! let a = arena.resize_default(Some(a), 20).unwrap();
//! assert_eq!(a.offset(), 0);
//! assert_eq!(arena.bytes(a)[0], 1);
//!
//! // 50 more bytes at the next 16-byte boundary do not fit.
//! assert!(arena.allocate_default(50).is_err());
//! assert_eq!(arena.current_offset(), 20);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod align;
pub mod arena;
pub mod buffer;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod handle;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use buffer::AlignedBuf;
pub use checkpoint::{Checkpoint, Mark};
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use handle::Allocation;
