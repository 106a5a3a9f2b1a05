//! End-to-end equity checks against known matchup numbers.
//!
//! Reference equities come from exhaustive calculators; Monte Carlo with a
//! couple hundred thousand games lands well within ±1.5 points of them, so
//! the tolerances below are loose against noise but tight enough to catch
//! any scoring or dealing defect.

use equity_core::{simulate, Spot, TIE_UNIT};

const GAMES: u64 = 200_000;
const THREADS: usize = 4;
const TOLERANCE: f64 = 0.015;

fn equities(spot: &str) -> Vec<f64> {
    let spot: Spot = spot.parse().unwrap();
    let report = simulate(&spot, GAMES, THREADS);
    report
        .tallies
        .iter()
        .map(|t| t.equity(report.games))
        .collect()
}

fn assert_close(spot: &str, expected: &[f64]) {
    let actual = equities(spot);
    assert_eq!(actual.len(), expected.len());
    for (seat, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() < TOLERANCE,
            "{spot}: P{} equity {:.4} far from {:.4}",
            seat + 1,
            a,
            e
        );
    }
}

#[test]
fn ace_king_versus_sevens_is_a_coin_flip_with_edge() {
    assert_close("2P AcKd 7h7s", &[0.446, 0.554]);
}

#[test]
fn lone_trey_against_a_random_hand() {
    assert_close("2P 3d", &[0.425, 0.575]);
}

#[test]
fn kings_on_a_locked_board_dominate_random_holes() {
    assert_close("3P KhKs - 8c 4d 7c Ts Qs", &[0.704, 0.148, 0.148]);
}

#[test]
fn partial_holes_on_a_wet_flop() {
    assert_close("3P Ac Td 7h - 5h 6h 9c", &[0.313, 0.216, 0.471]);
}

#[test]
fn pots_are_conserved_across_the_bench_list() {
    let spots = [
        "2P 3d",
        "6P Ac Ad KsKd 3c - 2c 2h 7c 7h 8c",
        "8P - Ac Ah 3d 7h 8c",
        "9P",
        "4P AhAd AcTh 7c6s 2h3h",
    ];
    for s in spots {
        let spot: Spot = s.parse().unwrap();
        let report = simulate(&spot, 10_000, 3);
        let units: u64 = report
            .tallies
            .iter()
            .map(|t| t.wins * TIE_UNIT + t.tie_units)
            .sum();
        assert_eq!(units, report.games * TIE_UNIT, "pot leak in {s}");
    }
}

#[test]
fn fixed_seeds_reproduce_bit_identical_tallies() {
    let spot: Spot = "7P Ad Kc QhJh 3s4s - 2c 2h 7c 5h 8c".parse().unwrap();
    let a = simulate(&spot, 60_000, 5);
    let b = simulate(&spot, 60_000, 5);
    assert_eq!(a.tallies, b.tallies);
}
