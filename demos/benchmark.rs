//! Inserts every line read from stdin into a fixed-size table and reports timings
//! and probe-distance statistics.
//!
//! Usage: `cat words.txt | cargo run --release --example benchmark -- --capacity 1000000`

use std::hash::{BuildHasher, Hasher};
use std::io::{self, BufRead};
use std::time::Instant;

use clap::{Parser, ValueEnum};
use hdrhistogram::Histogram;
use rhmap::hash::Djb2;
use rhmap::RawTable;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of buckets in the table
    #[arg(short, long, default_value_t = 1_000_000)]
    capacity: usize,

    /// Hash function used to fingerprint lines
    #[arg(long, value_enum, default_value_t = HashFn::Djb2)]
    hash: HashFn,
}

#[derive(Clone, Copy, ValueEnum)]
enum HashFn {
    /// Bernstein's djb2
    Djb2,
    /// `k = k * k + byte`, seeded with 52711
    Square,
    /// The standard library's SipHash, randomly keyed
    Std,
}

impl HashFn {
    fn hash(self, state: &std::collections::hash_map::RandomState, line: &str) -> u64 {
        match self {
            HashFn::Djb2 => Djb2::hash_bytes(line.as_bytes()),
            HashFn::Square => line
                .bytes()
                .fold(52711u64, |k, b| k.wrapping_mul(k).wrapping_add(b as u64)),
            HashFn::Std => {
                let mut hasher = state.build_hasher();
                hasher.write(line.as_bytes());
                hasher.finish()
            }
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let state = std::collections::hash_map::RandomState::new();

    let mut table = RawTable::<u64, String>::with_capacity(cli.capacity);

    let mut hash_time = Histogram::<u64>::new(3).unwrap();
    let mut insert_time = Histogram::<u64>::new(3).unwrap();
    let mut search_time = Histogram::<u64>::new(3).unwrap();

    let mut entries = 0usize;
    let mut duplicates = 0usize;
    let mut collisions = 0usize;

    for line in io::stdin().lock().lines() {
        let line = line?;

        let now = Instant::now();
        let hash = cli.hash.hash(&state, &line);
        hash_time.saturating_record(now.elapsed().as_nanos() as u64);

        match table.search(hash) {
            Some(existing) if *existing == line => {
                duplicates += 1;
                continue;
            }
            Some(existing) => {
                println!("Collision: \"{line}\" and \"{existing}\"");
                collisions += 1;
                table.remove(hash);
            }
            None => {}
        }

        let now = Instant::now();
        let inserted = table.insert(hash, line);
        insert_time.saturating_record(now.elapsed().as_nanos() as u64);

        if inserted.is_err() {
            println!("Hash table full");
            break;
        }

        let now = Instant::now();
        let found = table.search(hash).is_some();
        search_time.saturating_record(now.elapsed().as_nanos() as u64);
        assert!(found);

        entries += 1;
    }

    let (mean, std_dev) = distance_stats(&table);

    println!("Map size: {}", table.capacity());
    println!("Number of entries: {entries}");
    println!("Number of duplicate lines: {duplicates}");
    println!("Number of hash collisions: {collisions}");
    println!();
    report("hash", &hash_time);
    report("insertion", &insert_time);
    report("search", &search_time);
    println!();
    println!("Load factor: {:.3}", table.load_factor());
    println!("Max distance: {}", table.max_distance());
    println!("Average distance: {mean:.3}");
    println!("Standard deviation of distance: {std_dev:.3}");

    Ok(())
}

// Returns the mean and standard deviation of the probe distances.
fn distance_stats(table: &RawTable<u64, String>) -> (f64, f64) {
    let distances: Vec<f64> = table
        .buckets()
        .iter()
        .filter_map(|bucket| bucket.distance())
        .map(|d| d as f64)
        .collect();

    if distances.is_empty() {
        return (0.0, 0.0);
    }

    let n = distances.len() as f64;
    let mean = distances.iter().sum::<f64>() / n;
    let variance = distances.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / n;

    (mean, variance.sqrt())
}

fn report(name: &str, histogram: &Histogram<u64>) {
    println!(
        "Average {name} time: {:.0}ns (p50 {}ns, p99 {}ns)",
        histogram.mean(),
        histogram.value_at_quantile(0.5),
        histogram.value_at_quantile(0.99)
    );
}
