//! Command line front end for the equity engine.
//!
//! `equity go "<SPOT>"` runs one spot; `equity bench` runs the built-in
//! spot list and reports throughput plus a result signature; with no
//! subcommand an interactive loop reads `go`, `bench` and `quit` lines
//! from stdin.

mod config;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use equity_core::{simulate, SimReport, Spot, TIE_UNIT};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;

/// Spots exercised by `bench`, covering every seat count, board size and a
/// deliberately tie-heavy runout.
const BENCH_SPOTS: [&str; 10] = [
    "2P 3d",
    "3P KhKs - Ac Ad 7c Ts Qs",
    "4P AcTc TdTh - 5h 6h 9c",
    "5P 2c3d KsTc AhTd - 4d 5d 9c 9d",
    "6P Ac Ad KsKd 3c - 2c 2h 7c 7h 8c",
    "7P Ad Kc QhJh 3s4s - 2c 2h 7c 5h 8c",
    "8P - Ac Ah 3d 7h 8c",
    "9P",
    "4P AhAd AcTh 7c6s 2h3h - 2c 3c 4c",
    "4P AhAd AcTh 7c6s 2h3h",
];

/// Pinned bench signature. A full run at the stock game count with the
/// stock worker seeds reproduces it bit for bit; any change to scoring,
/// dealing or the RNG stream shows up here first.
const GOOD_SIG: u64 = 11_714_201_772_365_687_243;

#[derive(Parser)]
#[command(name = "equity")]
#[command(about = "Monte Carlo equity calculator for Texas Hold'em")]
struct Cli {
    /// Optional YAML file with run defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate per-player equity for a single spot
    Go {
        /// Spot string, e.g. "4P AcTc TdTh - 5h 6h 9c"
        spot: String,
        /// Number of games to simulate
        #[arg(short, long)]
        games: Option<u64>,
        /// Worker threads (default: all cores)
        #[arg(short, long)]
        threads: Option<usize>,
    },
    /// Run the built-in spot list and report throughput and a signature
    Bench {
        /// Worker threads (default: all cores)
        #[arg(short, long)]
        threads: Option<usize>,
        /// Games per spot
        #[arg(short, long)]
        games: Option<u64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => match Config::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Some(Command::Go {
            spot,
            games,
            threads,
        }) => cmd_go(
            &spot,
            games.unwrap_or(config.games),
            threads.unwrap_or_else(|| config.threads_or_auto()),
        ),
        Some(Command::Bench { threads, games }) => {
            cmd_bench(
                threads.unwrap_or_else(|| config.threads_or_auto()),
                games.unwrap_or(config.bench_games),
            );
            ExitCode::SUCCESS
        }
        None => interactive(&config),
    }
}

fn cmd_go(spot: &str, games: u64, threads: usize) -> ExitCode {
    let spot: Spot = match spot.parse() {
        Ok(spot) => spot,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let report = simulate(&spot, games, threads);
    let elapsed = start.elapsed();

    println!("Position: {spot}");
    print_results(&report);
    println!(
        "\n{} games in {} ms ({} threads)",
        report.games,
        elapsed.as_millis(),
        threads
    );
    ExitCode::SUCCESS
}

fn cmd_bench(threads: usize, games: u64) {
    let pb = ProgressBar::new(BENCH_SPOTS.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} spots")
            .expect("valid template")
            .progress_chars("=>-"),
    );

    let mut sig = Signature::new();
    let mut cards = 0u64;
    let mut spots_played = 0u64;
    let start = Instant::now();

    for (n, s) in BENCH_SPOTS.iter().enumerate() {
        let spot: Spot = s.parse().expect("built-in spot parses");
        let report = simulate(&spot, games, threads);

        pb.suspend(|| {
            println!("\nPosition {}: {s}", n + 1);
            print_results(&report);
        });

        for tally in &report.tallies {
            sig.push(tally.wins + tally.tie_units);
        }
        cards += report.games * (spot.num_players() as u64 * 2 + 5);
        spots_played += report.games;
        pb.inc(1);
    }

    pb.finish_and_clear();
    let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX).max(1);

    println!("\n===========================");
    println!("Total time  (ms): {elapsed_ms}");
    println!("Spots played (M): {}", spots_played / 1_000_000);
    println!("Cards/second    : {}", 1000 * cards / elapsed_ms);
    println!("Spots/second    : {}", 1000 * spots_played / elapsed_ms);
    let value = sig.value();
    if value == GOOD_SIG {
        println!("Signature       : {value} (ok)");
    } else {
        println!("Signature       : {value} (expected {GOOD_SIG})");
    }
}

/// Read `go`/`bench`/`quit` commands from stdin until EOF or `quit`.
fn interactive(config: &Config) -> ExitCode {
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return ExitCode::SUCCESS,
            Ok(_) => {}
        }

        let mut words: Vec<&str> = line.split_whitespace().collect();
        match words.first().copied() {
            None => {}
            Some("quit") => return ExitCode::SUCCESS,
            Some("go") => {
                // Up to two trailing integers are [games] [threads]; card
                // tokens never parse as integers, so popping is unambiguous.
                let mut trailing = Vec::new();
                while words.len() > 2 && trailing.len() < 2 {
                    match words.last().and_then(|w| w.parse::<u64>().ok()) {
                        Some(n) => {
                            trailing.push(n);
                            words.pop();
                        }
                        None => break,
                    }
                }
                let (games, threads) = match trailing.as_slice() {
                    [threads, games] => (*games, usize::try_from(*threads).unwrap_or(1)),
                    [games] => (*games, config.threads_or_auto()),
                    _ => (config.games, config.threads_or_auto()),
                };
                let _ = cmd_go(&words[1..].join(" "), games, threads);
            }
            Some("bench") => {
                let threads = words
                    .get(1)
                    .and_then(|w| w.parse().ok())
                    .unwrap_or_else(|| config.threads_or_auto());
                cmd_bench(threads, config.bench_games);
            }
            Some(other) => eprintln!("unknown command `{other}` (go, bench, quit)"),
        }
    }
}

fn print_results(report: &SimReport) {
    println!("\n     Equity    Win     Tie   Pots won  Pots tied");
    for (seat, tally) in report.tallies.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let pots_tied = tally.tie_units as f64 / TIE_UNIT as f64;
        println!(
            "P{}: {:>6.2}% {:>6.2}% {:>6.2}% {:>9} {:>10.1}",
            seat + 1,
            100.0 * tally.equity(report.games),
            100.0 * tally.win_rate(report.games),
            100.0 * tally.tie_rate(report.games),
            tally.wins,
            pots_tied,
        );
    }
}

/// 64-bit mix hash over per-player outcomes, one update per (spot, player)
/// in bench order.
struct Signature {
    mix: u64,
}

impl Signature {
    const MULP: u64 = 2_654_435_789;

    fn new() -> Signature {
        Signature { mix: 104_395_301 }
    }

    fn push(&mut self, v: u64) {
        self.mix = self
            .mix
            .wrapping_add(v.wrapping_mul(Self::MULP) ^ (self.mix >> 23));
    }

    fn value(&self) -> u64 {
        self.mix ^ (self.mix << 37)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_order_sensitive() {
        let mut a = Signature::new();
        a.push(1);
        a.push(2);
        let mut b = Signature::new();
        b.push(2);
        b.push(1);
        assert_ne!(a.value(), b.value());
    }

    #[test]
    fn signature_is_stable() {
        let mut sig = Signature::new();
        for v in [3_141u64, 59_265, 358_979, 323_846] {
            sig.push(v);
        }
        let first = sig.value();
        let mut again = Signature::new();
        for v in [3_141u64, 59_265, 358_979, 323_846] {
            again.push(v);
        }
        assert_eq!(first, again.value());
    }

    #[test]
    fn bench_spots_all_parse() {
        for s in BENCH_SPOTS {
            assert!(s.parse::<Spot>().is_ok(), "bench spot {s} must parse");
        }
    }
}
