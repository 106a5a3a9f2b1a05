#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! Monte Carlo equity engine for Texas Hold'em.
//!
//! Parses a partially specified showdown (a [`Spot`]), completes the
//! unknown cards uniformly from the remaining deck game after game, scores
//! every seat with a constant-time bit evaluator, and reports per-player
//! win and tie tallies.
//!
//! # Modules
//!
//! - `card` - 6-bit card ids and token parsing
//! - `hand` - accumulation grids and 7-card evaluation
//! - `score` - score layout and the fix-up mask table
//! - `spot` - spot grammar, validation and per-game simulation
//! - `simulate` - worker fan-out and tally reduction
//! - `rng` - deterministic uniform u64 source
//! - `error` - spot parse/validate errors
//!
//! ```
//! use equity_core::{simulate, Spot};
//!
//! let spot: Spot = "2P AcKd 7h7s".parse().unwrap();
//! let report = simulate(&spot, 100_000, 4);
//! for (seat, tally) in report.tallies.iter().enumerate() {
//!     println!("P{}: {:.1}%", seat + 1, 100.0 * tally.equity(report.games));
//! }
//! ```

pub mod card;
pub mod error;
pub mod hand;
pub mod rng;
pub mod score;
pub mod simulate;
pub mod spot;

pub use card::{Card, Card64};
pub use error::SpotError;
pub use hand::Hand;
pub use rng::SplitMix64;
pub use simulate::{simulate, SimReport, Tally, TIE_UNIT};
pub use spot::Spot;
