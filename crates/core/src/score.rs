//! Score layout and the fix-up mask table.
//!
//! A finalized score is a 64-bit key whose numeric order equals poker hand
//! order. It reuses the 4x16 row geometry of `Hand::values`:
//!
//! - row 0 (bits 0..16): kicker rank bits,
//! - row 1 (bits 16..32): pair rank bits, plus the double-pair bit at 31,
//! - row 2 (bits 32..48): set rank bit, plus straight/flush/full-house bits
//!   at 45/46/47,
//! - row 3 (bits 48..64): quad rank bit, plus the straight-flush bit at 63.
//!
//! The dedicated bits sit above every natural rank bit of their row, which
//! is what makes straight-flush > quads > full house > flush > straight fall
//! out of plain integer comparison.
//!
//! Most of the work of turning an accumulated `values` word into a score is
//! mechanical: keep some bits, drop the bits that must not also count as
//! kickers, demote or drop surplus pairs. [`mask_for`] packs all of that
//! into one table lookup keyed by the two highest set bits of `values`
//! (the second one taken outside the top bit's rank column, so that a rank's
//! own lower multiplicity bits never shadow the next rank down). Each entry
//! also carries the number of row-0 kickers to keep, stored in row 0's three
//! unused high bits.

use std::sync::LazyLock;

pub const ROW0: u64 = 0xFFFF;
pub const ROW1: u64 = 0xFFFF << 16;
pub const ROW2: u64 = 0xFFFF << 32;
pub const ROW3: u64 = 0xFFFF << 48;

/// The 13 natural rank bits of row 0.
pub const RANK_BITS: u64 = 0x1FFF;

pub const STRAIGHT_BIT: u64 = 1 << 45;
pub const FLUSH_BIT: u64 = 1 << 46;
pub const FULL_HOUSE_BIT: u64 = 1 << 47;
pub const STRAIGHT_FLUSH_BIT: u64 = 1 << 63;
pub const DOUBLE_PAIR_BIT: u64 = 1 << 31;

/// Kicker-count field inside a mask entry (row 0, bits 13..16).
const PICK_SHIFT: u32 = 13;
const PICK_MASK: u64 = 0x7 << PICK_SHIFT;

const INVALID_RANK: u64 = 13;

static SCORE_MASK: LazyLock<[u64; 4096]> = LazyLock::new(build);

/// Look up the fix-up mask for an accumulated `values` word.
///
/// `values` must hold at least one set bit (one card added).
#[inline]
#[must_use]
pub fn mask_for(values: u64) -> u64 {
    debug_assert!(values != 0);
    let c1 = 63 - u64::from(values.leading_zeros());
    let rest = values & !column(c1);
    let c2 = if rest == 0 {
        0
    } else {
        63 - u64::from(rest.leading_zeros())
    };
    SCORE_MASK[((c1 << 6) | c2) as usize]
}

/// Number of row-0 kickers a mask entry asks for.
#[inline]
#[must_use]
pub fn kicker_count(mask: u64) -> u32 {
    #[allow(clippy::cast_possible_truncation)]
    let n = ((mask & PICK_MASK) >> PICK_SHIFT) as u32;
    n
}

/// All four multiplicity bits of the rank owning bit position `b`.
#[inline]
const fn column(b: u64) -> u64 {
    0x0001_0001_0001_0001 << (b & 15)
}

/// The same rank's bits in every row below `b`.
const fn below(b: u64) -> u64 {
    (b >> 16) | (b >> 32) | (b >> 48)
}

/// Bits of `b`'s own row strictly below `b`.
fn up_to(b: u64) -> u64 {
    for row in [ROW3, ROW2, ROW1, ROW0] {
        if b & row != 0 {
            return (b - 1) & row;
        }
    }
    0
}

const fn to_pick(n: u64) -> u64 {
    n << PICK_SHIFT
}

/// Build the 4096-entry table. Index is `(c1 << 6) | c2` where `c1 > c2`
/// are bit positions inside `values`; positions whose rank nibble is 13 or
/// above never occur and stay zero.
fn build() -> [u64; 4096] {
    // Cleared from every entry up front, then selectively re-added: the two
    // flag bits the table itself may grant, and the kicker-count field.
    let fixed = FULL_HOUSE_BIT | DOUBLE_PAIR_BIT | to_pick(7);

    let mut table = [0u64; 4096];

    for c1 in 0..64u64 {
        if c1 & 0xF >= INVALID_RANK {
            continue;
        }
        for c2 in 0..c1 {
            if c2 & 0xF >= INVALID_RANK {
                continue;
            }
            let idx = ((c1 << 6) | c2) as usize;
            let h = 1u64 << c1;
            let l = 1u64 << c2;

            table[idx] = if h & ROW0 != 0 {
                // High card (also flushes and straights, whose values have
                // been rewritten into row 0 before the lookup).
                !fixed | to_pick(5)
            } else if h & ROW1 != 0 && l & ROW0 != 0 {
                // One pair: its rank must not double as a kicker.
                !(fixed | below(h)) | to_pick(3)
            } else if h & ROW1 != 0 && l & ROW1 != 0 {
                // Two pair; a third pair loses its row-1 bit and competes
                // for the single kicker slot with its row-0 bit.
                !(fixed | below(h) | below(l) | up_to(l)) | DOUBLE_PAIR_BIT | to_pick(1)
            } else if h & ROW2 != 0 && l & ROW0 != 0 {
                // Trips with no second pair.
                !(fixed | below(h)) | to_pick(2)
            } else if h & ROW2 != 0 && l & ROW1 != 0 {
                // Full house; any pair below the scoring one is dropped,
                // and no kickers survive.
                (!(fixed | below(h) | below(l) | up_to(l)) | FULL_HOUSE_BIT) & !ROW0
            } else if h & ROW2 != 0 && l & ROW2 != 0 {
                // Two sets: full house, the lower set demoted to a pair.
                let mut m = !(fixed | below(h) | below(l) | up_to(h));
                m |= (l >> 16) | FULL_HOUSE_BIT;
                m & !ROW0
            } else if h & ROW3 != 0 {
                // Quads: everything else collapses to one kicker.
                !(fixed | below(h) | up_to(h) | ROW2 | ROW1) | to_pick(1)
            } else {
                unreachable!("bit pair ({c1}, {c2}) has no hand class");
            };
        }
    }

    table
}
