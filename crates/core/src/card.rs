//! Card encoding and token parsing.
//!
//! A card is a 6-bit id `ssvvvv`: rank nibble 0..=12 (deuce..ace) and suit
//! 0..=3 (`d h c s`). The id doubles as the card's bit position in every
//! 64-bit mask used by the engine, because bit `16 * suit + rank` equals
//! `(suit << 4) | rank`. Ids whose rank nibble is 13 or above do not encode
//! a card; the evaluator rejects them so that drawing can sample the full
//! 64-id space and retry.

use std::fmt;

use crate::error::SpotError;

/// One bit per card id; used as an "already dealt" mask.
pub type Card64 = u64;

const RANK_CHARS: &[u8; 13] = b"23456789TJQKA";
const SUIT_CHARS: &[u8; 4] = b"dhcs";

/// Number of real cards in the deck space.
pub const DECK_SIZE: u32 = 52;

/// A packed 6-bit card id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    /// First rank nibble that does not encode a card.
    pub const INVALID_RANK: u8 = 13;

    /// Build a card from rank (0 = deuce .. 12 = ace) and suit (0..=3).
    #[must_use]
    pub const fn new(rank: u8, suit: u8) -> Card {
        Card((suit << 4) | rank)
    }

    /// Reinterpret a 6-bit id as a card. The id may be a sentinel; callers
    /// that sample the full id space rely on [`Hand::add`](crate::Hand::add)
    /// rejecting it.
    #[must_use]
    pub const fn from_id(id: u8) -> Card {
        Card(id & 0x3F)
    }

    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.0 & 0xF
    }

    #[inline]
    #[must_use]
    pub const fn suit(self) -> u8 {
        self.0 >> 4
    }

    /// This card's bit in `values`-row-0 / `colors` / `Card64` coordinates.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u64 {
        1u64 << self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.rank() < Card::INVALID_RANK
    }

    /// Parse a two-character token. `--` is the unknown-card placeholder and
    /// parses to `None`; anything else must be a rank char followed by a
    /// suit char.
    ///
    /// # Errors
    ///
    /// Returns [`SpotError::MalformedToken`] for any other input.
    pub fn parse(token: &str) -> Result<Option<Card>, SpotError> {
        if token == "--" {
            return Ok(None);
        }
        let bytes = token.as_bytes();
        if bytes.len() != 2 {
            return Err(SpotError::MalformedToken(token.to_string()));
        }
        let rank = RANK_CHARS.iter().position(|&c| c == bytes[0]);
        let suit = SUIT_CHARS.iter().position(|&c| c == bytes[1]);
        match (rank, suit) {
            #[allow(clippy::cast_possible_truncation)]
            (Some(r), Some(s)) => Ok(Some(Card::new(r as u8, s as u8))),
            _ => Err(SpotError::MalformedToken(token.to_string())),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(
                f,
                "{}{}",
                RANK_CHARS[self.rank() as usize] as char,
                SUIT_CHARS[self.suit() as usize] as char
            )
        } else {
            write!(f, "--")
        }
    }
}

/// All 52 real cards in id order.
pub fn deck() -> impl Iterator<Item = Card> {
    (0u8..64).map(Card::from_id).filter(|c| c.is_valid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_layout_matches_bit_position() {
        for card in deck() {
            assert_eq!(
                card.bit(),
                1u64 << (16 * u32::from(card.suit()) + u32::from(card.rank()))
            );
        }
    }

    #[test]
    fn deck_has_52_unique_bits() {
        let mut seen = 0u64;
        for card in deck() {
            assert_eq!(seen & card.bit(), 0, "duplicate bit for {card}");
            seen |= card.bit();
        }
        assert_eq!(seen.count_ones(), DECK_SIZE);
    }

    #[test]
    fn parse_round_trips_every_card() {
        for card in deck() {
            let token = card.to_string();
            assert_eq!(Card::parse(&token).unwrap(), Some(card));
        }
    }

    #[test]
    fn parse_unknown_placeholder() {
        assert_eq!(Card::parse("--").unwrap(), None);
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        for token in ["", "A", "Ahh", "1h", "Ax", "ah", "h2"] {
            assert!(
                matches!(Card::parse(token), Err(SpotError::MalformedToken(_))),
                "token {token:?} should be rejected"
            );
        }
    }

    #[test]
    fn sentinel_ids_are_invalid() {
        for suit in 0..4u8 {
            for rank in 13..16u8 {
                assert!(!Card::from_id((suit << 4) | rank).is_valid());
            }
        }
    }
}
