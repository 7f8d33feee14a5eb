//! Per-frame scratch arena example.
//!
//! Demonstrates: bind arena to a stack buffer → grow a message buffer in
//! place → do temporary work inside a checkpoint → reset at frame end.

use cairn_arena::{AlignedBuf, Allocation, Arena, ArenaError, Checkpoint};

/// Append `text` to the message held in `msg`, growing it in place when it
/// is still the most recent allocation.
fn append(
    arena: &mut Arena<'_>,
    msg: Option<Allocation>,
    text: &str,
) -> Result<Allocation, ArenaError> {
    let old_len = msg.map_or(0, |m| m.len());
    let grown = arena.resize(msg, old_len + text.len(), 1)?;
    arena.bytes_mut(grown)[old_len..].copy_from_slice(text.as_bytes());
    Ok(grown)
}

fn main() -> Result<(), ArenaError> {
    println!("=== Cairn Scratch Frames Example ===\n");

    let mut buf = AlignedBuf::<4096>::new();
    let mut arena = Arena::new(buf.as_mut_slice());

    for frame in 0..3 {
        let number = frame.to_string();
        let mut msg = append(&mut arena, None, "frame ")?;
        for word in ["number ", number.as_str()] {
            msg = append(&mut arena, Some(msg), word)?;
        }

        // Temporary squares table, thrown away before the frame ends.
        let total = {
            let mut cp = Checkpoint::begin(&mut arena);
            let table = cp.allocate(256 * 4, 4)?;
            for (i, chunk) in cp.bytes_mut(table).chunks_exact_mut(4).enumerate() {
                chunk.copy_from_slice(&((i * i) as u32).to_le_bytes());
            }
            let sum: u64 = cp
                .bytes(table)
                .chunks_exact(4)
                .map(|c| u64::from(u32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                .sum();
            cp.end();
            sum
        };

        println!(
            "{:<16} used={:>4} high_water={:>4} squares_sum={}",
            String::from_utf8_lossy(arena.bytes(msg)),
            arena.used(),
            arena.high_water(),
            total,
        );
        arena.reset_all();
    }

    println!("\n=== Done ===");
    Ok(())
}
