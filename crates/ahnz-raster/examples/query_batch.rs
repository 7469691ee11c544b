//! Example: sample elevations for a few points from the AHN ImageServer.
//!
//! Usage: cargo run --example query_batch -- <x> <y> [dataset]

use ahnz_raster::{elevations_for, DatasetCatalog, ImageServerFetcher, Point};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <x> <y> [dataset]", args[0]);
        eprintln!("Example: {} 131178.7 476558.84 AHN4_DTM_50cm", args[0]);
        std::process::exit(1);
    }

    let x: f64 = args[1].parse().expect("Invalid x coordinate");
    let y: f64 = args[2].parse().expect("Invalid y coordinate");
    let dataset = args.get(3).map(|s| s.as_str()).unwrap_or("AHN4_DTM_50cm");

    let catalog = DatasetCatalog::builtin();
    let fetcher = ImageServerFetcher::new().expect("Failed to build HTTP client");

    let points = vec![Point::new(x, y)];
    match elevations_for(&fetcher, &catalog, dataset, &points) {
        Ok(z) => match z[0] {
            Some(z) => println!("Elevation at ({}, {}): {} m", x, y, z),
            None => println!("({}, {}) is outside the fetched coverage", x, y),
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
