//! Benchmark workloads for the Cairn arena.
//!
//! Provides deterministic, seeded allocation traces for benchmarks and
//! examples:
//!
//! - [`mixed_requests`]: random sizes and power-of-two alignments
//! - [`growth_trace`]: monotonically growing sizes, as a push-style buffer sees
//! - [`replay`]: run a trace against an arena until it fills, resetting on
//!   exhaustion

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cairn_arena::Arena;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Capacity used by the standard benchmark arena: 1 MiB.
pub const BENCH_CAPACITY: usize = 1 << 20;

/// Largest size produced by [`mixed_requests`].
pub const MAX_REQUEST_SIZE: usize = 256;

/// Largest alignment produced by [`mixed_requests`].
pub const MAX_REQUEST_ALIGN: usize = 64;

/// One allocation in a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocRequest {
    /// Bytes requested.
    pub size: usize,
    /// Power-of-two alignment.
    pub align: usize,
}

/// Generate `count` requests with sizes in `1..=MAX_REQUEST_SIZE` and
/// alignments in `1..=MAX_REQUEST_ALIGN`.
pub fn mixed_requests(count: usize, seed: u64) -> Vec<AllocRequest> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let align_shifts = MAX_REQUEST_ALIGN.trailing_zeros() as u64 + 1;
    (0..count)
        .map(|_| AllocRequest {
            size: (rng.next_u64() % MAX_REQUEST_SIZE as u64) as usize + 1,
            align: 1 << (rng.next_u64() % align_shifts),
        })
        .collect()
}

/// Generate `steps` sizes that grow by a random 1..=`max_step` bytes each.
pub fn growth_trace(steps: usize, max_step: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut size = 0usize;
    (0..steps)
        .map(|_| {
            size += (rng.next_u64() % max_step.max(1) as u64) as usize + 1;
            size
        })
        .collect()
}

/// Allocate every request in order, resetting the arena whenever it runs
/// out of space. Returns the number of resets.
///
/// The arena must hold at least one request of [`MAX_REQUEST_SIZE`] bytes
/// plus alignment padding. Debug builds panic if a request does not fit an
/// empty arena.
pub fn replay(arena: &mut Arena<'_>, requests: &[AllocRequest]) -> usize {
    let mut resets = 0;
    for req in requests {
        if arena.allocate(req.size, req.align).is_err() {
            arena.reset_all();
            resets += 1;
            let retried = arena.allocate(req.size, req.align);
            debug_assert!(
                retried.is_ok(),
                "request of {} bytes (align {}) does not fit an empty arena of capacity {}",
                req.size,
                req.align,
                arena.capacity(),
            );
        }
    }
    resets
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_arena::AlignedBuf;

    #[test]
    fn mixed_requests_are_deterministic() {
        assert_eq!(mixed_requests(64, 7), mixed_requests(64, 7));
        assert_ne!(mixed_requests(64, 7), mixed_requests(64, 8));
    }

    #[test]
    fn mixed_requests_stay_in_range() {
        for req in mixed_requests(1000, 42) {
            assert!((1..=MAX_REQUEST_SIZE).contains(&req.size));
            assert!(req.align.is_power_of_two());
            assert!(req.align <= MAX_REQUEST_ALIGN);
        }
    }

    #[test]
    fn growth_trace_is_strictly_increasing() {
        let trace = growth_trace(100, 16, 3);
        assert_eq!(trace.len(), 100);
        assert!(trace.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn replay_resets_small_arena() {
        let mut buf = AlignedBuf::<1024>::new();
        let mut arena = Arena::new(&mut buf);
        let resets = replay(&mut arena, &mixed_requests(200, 1));
        assert!(resets > 0);
        assert!(arena.used() <= arena.capacity());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not fit an empty arena")]
    fn replay_rejects_arena_smaller_than_one_request() {
        let mut buf = AlignedBuf::<16>::new();
        let mut arena = Arena::new(&mut buf);
        let requests = [AllocRequest {
            size: 32,
            align: 1,
        }];
        replay(&mut arena, &requests);
    }

    #[test]
    fn replay_fits_in_bench_capacity() {
        let mut storage = vec![0u8; BENCH_CAPACITY];
        let mut arena = Arena::new(&mut storage);
        assert_eq!(replay(&mut arena, &mixed_requests(1000, 1)), 0);
    }
}
