//! Arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for an [`Arena`](crate::Arena).
///
/// Validated at construction by [`Arena::with_config`](crate::Arena::with_config);
/// immutable for the lifetime of the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Alignment used by [`Arena::allocate_default`](crate::Arena::allocate_default)
    /// and [`Arena::resize_default`](crate::Arena::resize_default).
    ///
    /// Default: two pointer widths (16 bytes on 64-bit targets).
    /// Must be a power of two.
    pub default_align: usize,
}

impl ArenaConfig {
    /// Default alignment: two pointer widths.
    pub const DEFAULT_ALIGN: usize = 2 * std::mem::size_of::<usize>();

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            default_align: Self::DEFAULT_ALIGN,
        }
    }

    /// Replace the default alignment.
    pub fn with_default_align(mut self, align: usize) -> Self {
        self.default_align = align;
        self
    }

    /// Check every field against its documented constraints.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if !self.default_align.is_power_of_two() {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "default_align must be a power of two (got {})",
                    self.default_align
                ),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}
