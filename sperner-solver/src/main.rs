//! Sperner Bounds Tool
//!
//! Prints the exact polychrome range and win threshold for each level,
//! cross-checks the dynamic program against brute-force enumeration on
//! small levels, and samples random legal colorings.

mod sample;
mod table;

use std::time::Instant;

use anyhow::{ensure, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::table::LevelRow;

#[derive(Parser, Debug)]
#[command(name = "bounds", about = "Polychrome bounds per triangulation level")]
struct Args {
    /// Smallest level in the table
    #[arg(long, default_value_t = 1)]
    min_level: u32,

    /// Largest level in the table
    #[arg(long, default_value_t = 8)]
    max_level: u32,

    /// Verify against exhaustive enumeration up to this level
    #[arg(long, default_value_t = 4)]
    verify_up_to: u32,

    /// Random colorings drawn per level (0 to skip)
    #[arg(long, default_value_t = 1000)]
    samples: usize,

    /// Seed for the random colorings
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    ensure!(args.min_level >= 1, "levels start at 1");
    ensure!(
        args.min_level <= args.max_level,
        "--min-level {} is above --max-level {}",
        args.min_level,
        args.max_level
    );

    println!("Sperner Polychrome Bounds");
    println!("=========================");
    println!();

    let start = Instant::now();
    let mut rows = Vec::new();
    table::print_header();
    for level in args.min_level..=args.max_level {
        let row = LevelRow::compute(level)?;
        table::print_row(&row);
        rows.push(row);
    }

    let verify_to = args.verify_up_to.min(args.max_level);
    if verify_to >= args.min_level {
        println!();
        println!("Exhaustive check, levels {}..={}", args.min_level, verify_to);
        for level in args.min_level..=verify_to {
            let bounds = table::verify(level)?;
            println!("  level {}: ok ({}..={})", level, bounds.min, bounds.max);
        }
    }

    if args.samples > 0 {
        println!();
        println!("Random legal colorings ({} per level)", args.samples);
        for row in &rows {
            let sample = sample::run(
                row.level,
                args.samples,
                args.seed.wrapping_add(u64::from(row.level)),
                row.bounds,
            )?;
            println!(
                "  level {}: mean {:.2}, above threshold {:.1}%",
                row.level,
                sample.mean(),
                100.0 * sample.above(row.threshold)
            );
        }
    }

    info!(elapsed = ?start.elapsed(), "done");
    Ok(())
}
