//! Arena-specific error types.
//!
//! Only recoverable conditions live here. Caller bugs (bad alignment, a
//! handle that does not belong to the arena) panic instead.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The request does not fit in the remaining space of the backing buffer.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
        /// Offset the allocation would have started at.
        offset: usize,
        /// Total capacity of the backing buffer in bytes.
        capacity: usize,
    },
    /// An [`ArenaConfig`](crate::ArenaConfig) value failed validation.
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                requested,
                offset,
                capacity,
            } => {
                write!(
                    f,
                    "arena out of memory: requested {requested} bytes at offset {offset}, capacity {capacity} bytes"
                )
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid arena config: {reason}")
            }
        }
    }
}

impl Error for ArenaError {}
