//! Parallel simulation driver.
//!
//! Splits a game budget across workers, gives each worker its own
//! deterministic RNG stream and local tallies, and merges the per-worker
//! tallies after the fan-out completes. Results are bit-identical for a
//! fixed (spot, games, threads) triple: seeding depends on the worker
//! index, never on thread identity or the clock.

use rayon::prelude::*;

use crate::rng::SplitMix64;
use crate::spot::{Spot, MAX_PLAYERS};

/// Tie quantum: lcm(1..=9), so a pot split among any table size divides
/// without remainder.
pub const TIE_UNIT: u64 = 2520;

/// Per-player outcome counters. A sole winner earns one `wins`; a k-way
/// tie earns each tier `TIE_UNIT / k` tie units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: u64,
    pub tie_units: u64,
}

impl Tally {
    /// Equity share over `games`: whole pots plus tie fractions.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn equity(&self, games: u64) -> f64 {
        (self.wins * TIE_UNIT + self.tie_units) as f64 / (TIE_UNIT * games) as f64
    }

    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self, games: u64) -> f64 {
        self.wins as f64 / games as f64
    }

    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tie_rate(&self, games: u64) -> f64 {
        self.tie_units as f64 / (TIE_UNIT * games) as f64
    }
}

/// Outcome of a [`simulate`] run.
#[derive(Debug, Clone)]
pub struct SimReport {
    /// One tally per seated player.
    pub tallies: Vec<Tally>,
    /// Games actually played: the per-worker budget times the worker count,
    /// which can differ from the request when it does not divide evenly.
    pub games: u64,
}

/// Run `games` simulations of `spot` across `threads` workers and merge the
/// per-player tallies.
#[must_use]
pub fn simulate(spot: &Spot, games: u64, threads: usize) -> SimReport {
    let threads = threads.max(1);
    let per_worker = if games < threads as u64 {
        1
    } else {
        games / threads as u64
    };

    let locals: Vec<[Tally; MAX_PLAYERS]> = (0..threads)
        .into_par_iter()
        .map(|worker| {
            let mut rng = SplitMix64::new(worker as u64);
            let mut tallies = [Tally::default(); MAX_PLAYERS];
            for _ in 0..per_worker {
                spot.play_one(&mut rng, &mut tallies);
            }
            tallies
        })
        .collect();

    let mut tallies = vec![Tally::default(); spot.num_players()];
    for local in locals {
        for (total, part) in tallies.iter_mut().zip(local) {
            total.wins += part.wins;
            total.tie_units += part.tie_units;
        }
    }

    SimReport {
        tallies,
        games: per_worker * threads as u64,
    }
}
