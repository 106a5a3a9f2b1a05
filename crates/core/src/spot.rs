//! Spot parsing, validation and per-game simulation.
//!
//! A spot string describes a partially known showdown:
//!
//! ```text
//! NP [hole1] [hole2] ... [holeN] [- b1 b2 b3 b4 b5]
//! ```
//!
//! `NP` seats N players (2..=9). Each hole token carries one or two cards
//! (`AhAd`, `Ah`) or `--`; omitted trailing players are fully unknown. A `-`
//! separator introduces 0, 3, 4 or 5 board positions, and any card anywhere
//! may be `--`. Every unknown position is drawn uniformly from the remaining
//! deck on every simulated game.
//!
//! All validation happens at parse time; a constructed [`Spot`] cannot fail
//! while simulating.

use std::fmt;
use std::str::FromStr;

use arrayvec::ArrayVec;

use crate::card::{Card, Card64, DECK_SIZE};
use crate::error::SpotError;
use crate::hand::Hand;
use crate::rng::SplitMix64;
use crate::simulate::{Tally, TIE_UNIT};

pub const MAX_PLAYERS: usize = 9;
pub const MIN_PLAYERS: usize = 2;
pub const HOLE_CARDS: usize = 2;
pub const BOARD_CARDS: usize = 5;

/// Most draws a single game can need: nine unknown players plus the board.
const MAX_MISSING: usize = MAX_PLAYERS * HOLE_CARDS + BOARD_CARDS;

/// Where one drawn card goes. The plan is fixed at construction: board
/// positions first, then hole positions in seat order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FillSlot {
    Board,
    Hole(u8),
}

/// A parsed, validated showdown scenario. Read-only after construction;
/// every worker replays it against its own RNG and scratch hands.
#[derive(Debug, Clone)]
pub struct Spot {
    num_players: usize,
    given_holes: [Hand; MAX_PLAYERS],
    given_common: Hand,
    all_mask: Card64,
    fill_plan: ArrayVec<FillSlot, MAX_MISSING>,
}

impl Spot {
    #[inline]
    #[must_use]
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// Cards drawn per simulated game.
    #[inline]
    #[must_use]
    pub fn missing(&self) -> usize {
        self.fill_plan.len()
    }

    /// Mask of every pre-assigned card.
    #[inline]
    #[must_use]
    pub fn all_mask(&self) -> Card64 {
        self.all_mask
    }

    /// Play one game: complete the board and every hole from the remaining
    /// deck, score all seats, and credit the winner (or split the tie) into
    /// `tallies`.
    ///
    /// All scratch state lives on the stack; `tallies` must hold at least
    /// [`Spot::num_players`] entries.
    #[inline]
    pub fn play_one(&self, rng: &mut SplitMix64, tallies: &mut [Tally]) {
        let mut dealt = self.all_mask;
        let mut board = self.given_common;
        let mut hands = self.given_holes;

        for slot in &self.fill_plan {
            let hand = match slot {
                FillSlot::Board => &mut board,
                FillSlot::Hole(p) => &mut hands[usize::from(*p)],
            };
            // Rejection draw over the 64-id space: `add` refuses sentinel
            // ranks and already-dealt cards, so a success is exactly a
            // uniform pick from the remaining deck.
            loop {
                #[allow(clippy::cast_possible_truncation)]
                let card = Card::from_id((rng.next_u64() & 63) as u8);
                if hand.add(card, dealt) {
                    dealt |= card.bit();
                    break;
                }
            }
        }

        let mut scores = [0u64; MAX_PLAYERS];
        let mut best = 0u64;
        let mut winner = 0usize;
        let mut winners = 0usize;
        for (p, hand) in hands[..self.num_players].iter_mut().enumerate() {
            hand.merge(&board);
            let sc = hand.evaluate();
            scores[p] = sc;
            if sc > best {
                best = sc;
                winner = p;
                winners = 1;
            } else if sc == best {
                winners += 1;
            }
        }

        if winners == 1 {
            tallies[winner].wins += 1;
        } else {
            let share = TIE_UNIT / winners as u64;
            for (p, tally) in tallies[..self.num_players].iter_mut().enumerate() {
                if scores[p] == best {
                    tally.tie_units += share;
                }
            }
        }
    }
}

impl FromStr for Spot {
    type Err = SpotError;

    fn from_str(s: &str) -> Result<Spot, SpotError> {
        let mut tokens = s.split_whitespace();

        let num_players = parse_seat_count(tokens.next().unwrap_or(""))?;

        let mut given_holes = [Hand::default(); MAX_PLAYERS];
        let mut given_common = Hand::default();
        let mut all_mask: Card64 = 0;
        let mut holes_given = [0usize; MAX_PLAYERS];
        let mut board_positions = 0usize;
        let mut board_given = 0usize;
        let mut seat = 0usize;
        let mut on_board = false;

        for token in tokens {
            if token == "-" && !on_board {
                on_board = true;
                continue;
            }
            if on_board {
                board_positions += 1;
                if board_positions > BOARD_CARDS {
                    return Err(SpotError::BadBoardSize(board_positions));
                }
                if let Some(card) = Card::parse(token)? {
                    place(&mut given_common, card, &mut all_mask)?;
                    board_given += 1;
                }
            } else {
                if seat >= num_players {
                    return Err(SpotError::BadPlayerCount(seat + 1));
                }
                if !token.is_ascii() || (token.len() != 2 && token.len() != 4) {
                    return Err(SpotError::MalformedToken(token.to_string()));
                }
                for unit in [token.get(0..2), token.get(2..4)].into_iter().flatten() {
                    if let Some(card) = Card::parse(unit)? {
                        place(&mut given_holes[seat], card, &mut all_mask)?;
                        holes_given[seat] += 1;
                    }
                }
                seat += 1;
            }
        }

        if on_board && !matches!(board_positions, 0 | 3 | 4 | 5) {
            return Err(SpotError::BadBoardSize(board_positions));
        }

        let mut fill_plan = ArrayVec::new();
        for _ in board_given..BOARD_CARDS {
            fill_plan.push(FillSlot::Board);
        }
        for (p, &given) in holes_given[..num_players].iter().enumerate() {
            for _ in given..HOLE_CARDS {
                #[allow(clippy::cast_possible_truncation)]
                fill_plan.push(FillSlot::Hole(p as u8));
            }
        }

        if fill_plan.len() > (DECK_SIZE - all_mask.count_ones()) as usize {
            return Err(SpotError::Overflow);
        }

        Ok(Spot {
            num_players,
            given_holes,
            given_common,
            all_mask,
            fill_plan,
        })
    }
}

impl fmt::Display for Spot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}P", self.num_players)?;
        for hole in &self.given_holes[..self.num_players] {
            if hole.count() == 0 {
                write!(f, " --")?;
            } else {
                write!(f, " {}", hole.to_string().replace(' ', ""))?;
            }
        }
        if self.given_common.count() > 0 {
            write!(f, " - {}", self.given_common)?;
        }
        Ok(())
    }
}

fn parse_seat_count(token: &str) -> Result<usize, SpotError> {
    let bytes = token.as_bytes();
    if bytes.len() == 2 && bytes[1] == b'P' && bytes[0].is_ascii_digit() {
        let n = usize::from(bytes[0] - b'0');
        if (MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
            return Ok(n);
        }
        return Err(SpotError::BadPlayerCount(n));
    }
    Err(SpotError::BadPlayerCount(0))
}

fn place(hand: &mut Hand, card: Card, all_mask: &mut Card64) -> Result<(), SpotError> {
    if !hand.add(card, *all_mask) {
        return Err(SpotError::DuplicateCard(card.to_string()));
    }
    *all_mask |= card.bit();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_spot_parses() {
        let spot: Spot = "4P AcTc TdTh - 5h 6h 9c".parse().unwrap();
        assert_eq!(spot.num_players(), 4);
        // Two unknown players (4 cards) plus turn and river.
        assert_eq!(spot.missing(), 6);
        assert_eq!(spot.all_mask().count_ones(), 7);
    }

    #[test]
    fn trailing_players_default_to_unknown() {
        let spot: Spot = "9P".parse().unwrap();
        assert_eq!(spot.num_players(), 9);
        assert_eq!(spot.missing(), 9 * HOLE_CARDS + BOARD_CARDS);
    }

    #[test]
    fn single_hole_card_counts() {
        let spot: Spot = "2P 3d".parse().unwrap();
        assert_eq!(spot.missing(), 3 + 5);
    }

    #[test]
    fn unknown_placeholders_are_accepted_anywhere() {
        let spot: Spot = "3P -- Ah-- - -- 6h 9c".parse().unwrap();
        // Player 1: 2 draws, player 2: 1 draw, player 3: 2 draws,
        // board: one placeholder plus turn and river.
        assert_eq!(spot.missing(), 2 + 1 + 2 + 3);
        assert_eq!(spot.all_mask().count_ones(), 3);
    }

    #[test]
    fn duplicate_cards_are_rejected() {
        for s in ["2P AhAh", "3P Ah Ah", "2P Kd - Kd 2c 3c"] {
            assert!(
                matches!(s.parse::<Spot>(), Err(SpotError::DuplicateCard(_))),
                "{s} should be a duplicate"
            );
        }
    }

    #[test]
    fn bad_player_counts_are_rejected() {
        for s in ["1P", "0P", "P", "10P", ""] {
            assert!(matches!(s.parse::<Spot>(), Err(SpotError::BadPlayerCount(_))));
        }
        assert!(matches!(
            "2P Ah Kd 2c".parse::<Spot>(),
            Err(SpotError::BadPlayerCount(_))
        ));
    }

    #[test]
    fn bad_board_sizes_are_rejected() {
        for s in ["2P - Ac", "2P - Ac Ad", "2P - Ac Ad 2c 3c 4c 5c"] {
            assert!(
                matches!(s.parse::<Spot>(), Err(SpotError::BadBoardSize(_))),
                "{s} should have a bad board"
            );
        }
        assert!("2P -".parse::<Spot>().is_ok());
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        for s in ["2P Axh", "2P 1h", "2P Ah - Xy 2c 3c"] {
            assert!(matches!(s.parse::<Spot>(), Err(SpotError::MalformedToken(_))));
        }
    }

    #[test]
    fn display_round_trips_through_the_parser() {
        let spot: Spot = "4P AhAd AcTh 7c6s 2h3h - 2c 3c 4c".parse().unwrap();
        let echoed: Spot = spot.to_string().parse().unwrap();
        assert_eq!(echoed.all_mask(), spot.all_mask());
        assert_eq!(echoed.missing(), spot.missing());
    }

    #[test]
    fn play_one_awards_exactly_one_pot() {
        let spot: Spot = "4P AcTc TdTh - 5h 6h 9c".parse().unwrap();
        let mut rng = SplitMix64::new(3);
        let mut tallies = [Tally::default(); MAX_PLAYERS];
        for _ in 0..500 {
            spot.play_one(&mut rng, &mut tallies);
        }
        let units: u64 = tallies.iter().map(|t| t.wins * TIE_UNIT + t.tie_units).sum();
        assert_eq!(units, 500 * TIE_UNIT);
    }

    #[test]
    fn guaranteed_tie_splits_every_pot() {
        // Both players play the board's seven-high straight.
        let spot: Spot = "2P 2c2d 2h2s - 3c 4c 5d 6d 7h".parse().unwrap();
        let mut rng = SplitMix64::new(1);
        let mut tallies = [Tally::default(); MAX_PLAYERS];
        for _ in 0..100 {
            spot.play_one(&mut rng, &mut tallies);
        }
        for tally in &tallies[..2] {
            assert_eq!(tally.wins, 0);
            assert_eq!(tally.tie_units, 100 * TIE_UNIT / 2);
        }
    }
}
