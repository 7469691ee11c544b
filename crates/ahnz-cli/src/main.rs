//! `ahnz`: extract Z values for XY coordinates in a CSV file.
//!
//! Reads an `ID,X,Y` CSV, fetches one elevation grid covering the batch from
//! the AHN ImageServer, samples every point, and writes an `ID,X,Y,Z` CSV.
//! Points outside the fetched coverage get `Z = NaN`.

mod csv_io;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ahnz_raster::{
    sample_batch, DatasetCatalog, ImageServerFetcher, RetryPolicy, TileBuilder,
    DEFAULT_OVERSAMPLING, DEFAULT_PADDING,
};

#[derive(Parser, Debug)]
#[command(
    name = "ahnz",
    about = "Extract Z values for XY coordinates in a CSV file"
)]
struct Args {
    /// AHN dataset to sample
    #[arg(short, long, default_value = "AHN4_DTM_50cm")]
    dataset: String,

    /// Path to the input CSV file (header with X and Y columns)
    #[arg(short, long)]
    input_file: PathBuf,

    /// Path for the output CSV file
    #[arg(short, long, default_value = "out/xyz.csv")]
    output_file: PathBuf,

    /// Dataset catalog YAML overriding the built-in AHN table
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Oversampling factor for the grid request
    #[arg(long, default_value_t = DEFAULT_OVERSAMPLING)]
    oversampling: f64,

    /// Bounding-box padding in meters per side
    #[arg(long, default_value_t = DEFAULT_PADDING)]
    padding: f64,

    /// Grid fetch attempts before giving up
    #[arg(long, default_value_t = 1)]
    attempts: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => DatasetCatalog::from_yaml_file(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        None => DatasetCatalog::builtin(),
    };
    let dataset = catalog.get(&args.dataset)?;

    let table = csv_io::read_xy_table(&args.input_file)?;
    info!(
        points = table.points.len(),
        dataset = %args.dataset,
        "read input batch"
    );

    let fetcher = ImageServerFetcher::new()?;
    let tile = TileBuilder::new(&fetcher, dataset)
        .with_oversampling(args.oversampling)
        .with_padding(args.padding)
        .with_retry(RetryPolicy {
            max_attempts: args.attempts.max(1),
            ..Default::default()
        })
        .build(&table.points)?;

    let z = sample_batch(&tile, &table.points);
    let missing = z.iter().filter(|z| z.is_none()).count();

    csv_io::write_xyz_table(&args.output_file, &table, &z)?;
    info!(
        output = %args.output_file.display(),
        sampled = z.len() - missing,
        missing,
        "wrote XYZ table"
    );

    Ok(())
}
