//! Power-of-two alignment arithmetic.
//!
//! Every alignment the arena accepts must be a non-zero power of two, which
//! lets the forward-alignment step use a mask instead of a division.

/// Round `addr` up to the next multiple of `align`.
///
/// Returns `None` if the rounded value does not fit in `usize`.
///
/// # Panics
///
/// Panics if `align` is not a power of two.
#[inline]
#[track_caller]
pub fn align_forward(addr: usize, align: usize) -> Option<usize> {
    assert_power_of_two(align);
    // Same as `addr % align` since `align` is a power of two.
    let modulo = addr & (align - 1);
    if modulo == 0 {
        Some(addr)
    } else {
        addr.checked_add(align - modulo)
    }
}

/// Whether `addr` is a multiple of `align`.
///
/// # Panics
///
/// Panics if `align` is not a power of two.
#[inline]
#[track_caller]
pub fn is_aligned(addr: usize, align: usize) -> bool {
    assert_power_of_two(align);
    addr & (align - 1) == 0
}

#[inline]
#[track_caller]
pub(crate) fn assert_power_of_two(align: usize) {
    assert!(
        align.is_power_of_two(),
        "alignment must be a power of two (got {align})"
    );
}
