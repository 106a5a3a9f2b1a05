//! Hand accumulation and 7-card evaluation.
//!
//! A [`Hand`] is four 64-bit words of working state. Cards accumulate into
//! two 4x16 grids: `values` counts rank multiplicity (row `m` bit `r` set
//! iff rank `r` appears more than `m` times, columns filled bottom-up) and
//! `colors` records exact (rank, suit) membership for flush detection.
//! [`Hand::evaluate`] folds the grids into a single totally-ordered 64-bit
//! score; see [`crate::score`] for the layout.
//!
//! The whole evaluator is branch-light bit arithmetic: one flush scan, one
//! shift-fold straight test, one mask-table lookup and a kicker trim. No
//! loops over cards, no heap.

use std::fmt;

use crate::card::{Card, Card64};
use crate::score;

/// Combination flags summarizing what [`Hand::evaluate`] detected. Purely
/// informational; the score alone decides comparisons.
pub mod flag {
    pub const PAIR: u8 = 1;
    pub const DOUBLE_PAIR: u8 = 1 << 1;
    pub const SET: u8 = 1 << 2;
    pub const STRAIGHT: u8 = 1 << 3;
    pub const FLUSH: u8 = 1 << 4;
    pub const FULL_HOUSE: u8 = 1 << 5;
    pub const QUADS: u8 = 1 << 6;
    pub const STRAIGHT_FLUSH: u8 = 1 << 7;
}

/// Evaluator working state for one player's cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hand {
    /// 4x16 rank multiplicity grid.
    pub values: u64,
    /// 4x16 suit membership grid, row = suit.
    pub colors: u64,
    /// Final comparison key; zero until [`Hand::evaluate`] runs.
    pub score: u64,
    /// Detected combinations, zero until [`Hand::evaluate`] runs.
    pub flags: u8,
}

impl Hand {
    /// Add a card, refusing sentinels and cards already present in this
    /// hand or in `dealt`. Returns whether the card went in.
    #[inline]
    pub fn add(&mut self, card: Card, dealt: Card64) -> bool {
        if !card.is_valid() {
            return false;
        }
        let bit = card.bit();
        if (self.colors | dealt) & bit != 0 {
            return false;
        }
        self.colors |= bit;

        // Promote the rank bit into the lowest free multiplicity row.
        let mut n = 1u64 << card.rank();
        while self.values & n != 0 {
            n <<= 16;
        }
        self.values |= n;
        true
    }

    /// Fold another hand (typically the shared board) into this one.
    #[inline]
    pub fn merge(&mut self, other: &Hand) {
        if self.values & other.values == 0 {
            // No rank in common: multiplicity rows cannot collide.
            self.values |= other.values;
            self.colors |= other.colors;
            return;
        }
        // Shared ranks need their multiplicity re-promoted one by one.
        let mut cards = other.colors;
        while cards != 0 {
            #[allow(clippy::cast_possible_truncation)]
            let id = cards.trailing_zeros() as u8;
            cards &= cards - 1;
            let added = self.add(Card::from_id(id), 0);
            debug_assert!(added, "merged hands share a physical card");
        }
    }

    /// Cards held so far.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.colors.count_ones()
    }

    /// If any suit holds five or more cards, rewrite `values` to that
    /// suit's rank row. Pair/set/quad detection then sees singletons only,
    /// and straight detection restricted to the suit row finds straight
    /// flushes for free.
    #[inline]
    fn is_flush(&mut self) -> bool {
        let mut row = self.colors;
        for _ in 0..4 {
            if (row & score::ROW0).count_ones() >= 5 {
                self.values = row & score::ROW0;
                return true;
            }
            row >>= 16;
        }
        false
    }

    /// Detect a straight on row 0 and rewrite `values` to its high-card
    /// representative bit.
    #[inline]
    fn is_straight(&mut self) -> bool {
        let v = self.values & score::ROW0;
        // Duplicate the ace below the deuce so the wheel folds like any
        // other run, then AND-fold four times; a surviving bit marks five
        // in a row.
        let mut v = (v << 1) | (v >> 12);
        v &= v >> 1;
        v &= v >> 1;
        v &= v >> 1;
        v &= v >> 1;
        if v == 0 {
            return false;
        }
        self.values = v << 3;
        true
    }

    /// Finalize the hand into its 64-bit score and return it.
    ///
    /// Call with at least two cards accumulated (a showdown merges seven).
    /// `values` is consumed by the flush/straight rewrites; `score` and
    /// `flags` are left populated.
    #[inline]
    pub fn evaluate(&mut self) -> u64 {
        let mut flags = 0u8;
        let mut sc = 0u64;

        if self.is_flush() {
            flags |= flag::FLUSH;
            sc |= score::FLUSH_BIT;
        }
        if self.is_straight() {
            flags |= flag::STRAIGHT;
            sc |= score::STRAIGHT_BIT;
        }
        if flags == (flag::FLUSH | flag::STRAIGHT) {
            flags |= flag::STRAIGHT_FLUSH;
            sc |= score::STRAIGHT_FLUSH_BIT;
        }

        let mask = score::mask_for(self.values);
        sc |= self.values & mask;
        sc |= mask & (score::FULL_HOUSE_BIT | score::DOUBLE_PAIR_BIT);

        // Keep only the requested number of kickers, lowest bits first out.
        let keep = score::kicker_count(mask);
        let mut kickers = sc & score::RANK_BITS;
        let mut n = kickers.count_ones();
        while n > keep {
            kickers &= kickers - 1;
            n -= 1;
        }
        sc = (sc & !score::RANK_BITS) | kickers;

        if sc & (score::RANK_BITS << 48) != 0 {
            flags |= flag::QUADS;
        }
        if sc & (score::RANK_BITS << 32) != 0 {
            flags |= flag::SET;
        }
        if sc & (score::RANK_BITS << 16) != 0 {
            flags |= flag::PAIR;
        }
        if sc & score::DOUBLE_PAIR_BIT != 0 {
            flags |= flag::DOUBLE_PAIR;
        }
        if sc & score::FULL_HOUSE_BIT != 0 {
            flags |= flag::FULL_HOUSE;
        }

        self.score = sc;
        self.flags = flags;
        sc
    }

    /// Render a 4x16 word as the rank/suit grid; handy when a test fails.
    #[must_use]
    pub fn grid(bits: u64) -> String {
        let mut out = String::from("    | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9 | T | J | Q | K | A |\n");
        for row in (0..4).rev() {
            out.push_str("   ");
            out.push(['d', 'h', 'c', 's'][row]);
            for rank in 0..13 {
                if bits & (1u64 << (16 * row + rank)) != 0 {
                    out.push_str("| X ");
                } else {
                    out.push_str("|   ");
                }
            }
            out.push_str("|\n");
        }
        out
    }
}

impl fmt::Display for Hand {
    /// Cards in id order, e.g. `2d Ad Th`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cards = self.colors;
        let mut first = true;
        while cards != 0 {
            #[allow(clippy::cast_possible_truncation)]
            let id = cards.trailing_zeros() as u8;
            cards &= cards - 1;
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", Card::from_id(id))?;
            first = false;
        }
        Ok(())
    }
}
