//! Per-range XOR masking.
//!
//! Masks break up long runs of identical bits in the physically scanned
//! region. Each mask is a pure function of the bit offset *relative to
//! the masked range*, so applying a mask is insensitive to where the
//! range sits inside a larger buffer. Applying the same mask twice is
//! the identity transform, which is what lets decode undo encode's
//! masking from nothing but the mask ids stored in the header.

use crate::bit_buffer::BitBuffer;

/// Number of defined mask patterns.
pub const NUM_MASKS: usize = 4;
/// Width of a mask id in the header.
pub const MASK_ID_BITS: usize = 2;

/// Whether mask `id` flips the bit at relative offset `offset`.
fn mask_bit(id: u8, offset: usize) -> bool {
    match id {
        0 => offset % 2 == 0,
        1 => offset % 3 == 0,
        2 => (offset / 4) % 2 == 0,
        3 => (offset % 2 == 0) != (offset % 3 == 0),
        _ => unreachable!("mask id out of range"),
    }
}

/// XOR mask `id` over the bits in `[start, end)`, in place. Self-inverse.
pub fn apply_mask(buf: &mut BitBuffer, start: usize, end: usize, id: u8) {
    assert!((id as usize) < NUM_MASKS, "mask id out of range");
    for pos in start..end {
        if mask_bit(id, pos - start) {
            buf.flip(pos);
        }
    }
}

/// Penalty score for a masked range: long identical runs and a strong
/// ones/zeroes imbalance both make a scan harder to threshold.
fn penalty(buf: &BitBuffer, start: usize, end: usize) -> usize {
    let mut longest_run = 0usize;
    let mut run = 0usize;
    let mut ones = 0usize;
    let mut last = None;
    for pos in start..end {
        let bit = buf.get(pos);
        if bit {
            ones += 1;
        }
        if Some(bit) == last {
            run += 1;
        } else {
            run = 1;
            last = Some(bit);
        }
        longest_run = longest_run.max(run);
    }
    let len = end - start;
    let zeros = len - ones;
    longest_run * 4 + ones.abs_diff(zeros)
}

/// Pick the mask id with the lowest penalty for `[start, end)`.
///
/// Scores each candidate on a scratch copy; the buffer itself is left
/// untouched. Ties resolve to the lower id.
pub fn find_best_mask(buf: &BitBuffer, start: usize, end: usize) -> u8 {
    let mut best_id = 0u8;
    let mut best_score = usize::MAX;
    for id in 0..NUM_MASKS as u8 {
        let mut scratch = buf.copy_range(start, end);
        let len = scratch.len();
        apply_mask(&mut scratch, 0, len, id);
        let score = penalty(&scratch, 0, len);
        if score < best_score {
            best_score = score;
            best_id = id;
        }
    }
    best_id
}
