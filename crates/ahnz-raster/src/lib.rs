//! # ahnz-raster
//!
//! Batch elevation (Z) sampling for planar XY points against remotely
//! rendered elevation rasters (the Dutch AHN ImageServer datasets).
//!
//! ## Overview
//!
//! For each batch of query points the pipeline performs one remote fetch:
//!
//! 1. [`TileBuilder`] derives the minimal bounding box over the batch, pads
//!    it, and requests an oversampled elevation grid from a [`GridFetcher`]
//!    (the blocking [`ImageServerFetcher`] in production, anything else in
//!    tests).
//! 2. The returned [`Grid`] is framed as an immutable [`Tile`] whose
//!    resolution and extents are derived from the grid's actual shape, since
//!    the service may return different pixel dimensions than requested.
//! 3. [`sample_batch`] maps every point through [`Tile::sample`], producing
//!    one value (or `None` for points outside coverage) per input point, in
//!    input order, rounded to 4 decimal places.
//!
//! Query points and the fetched grid must share one linear, non-rotated
//! planar coordinate system (RD New for the AHN datasets); no reprojection
//! is performed.
//!
//! ## Example
//!
//! ```no_run
//! use ahnz_raster::{elevations_for, DatasetCatalog, ImageServerFetcher, Point};
//!
//! let catalog = DatasetCatalog::builtin();
//! let fetcher = ImageServerFetcher::new()?;
//!
//! let points = vec![
//!     Point::new(131178.7, 476558.84),
//!     Point::new(131179.02, 476558.98),
//! ];
//! let z = elevations_for(&fetcher, &catalog, "AHN4_DTM_50cm", &points)?;
//! for (p, z) in points.iter().zip(&z) {
//!     match z {
//!         Some(z) => println!("({}, {}) -> {} m", p.x, p.y, z),
//!         None => println!("({}, {}) -> outside coverage", p.x, p.y),
//!     }
//! }
//! # Ok::<(), ahnz_raster::RasterError>(())
//! ```

mod batch;
mod builder;
mod dataset;
mod error;
mod fetch;
mod grid;
mod tile;

pub use batch::{elevations_for, par_sample_batch, sample_batch};
pub use builder::{RetryPolicy, TileBuilder, DEFAULT_OVERSAMPLING, DEFAULT_PADDING};
pub use dataset::{Dataset, DatasetCatalog};
pub use error::RasterError;
pub use fetch::{ExportImageParams, GridFetcher, GridRequest, ImageServerFetcher};
pub use grid::Grid;
pub use tile::{BoundingBox, CellResolution, Point, Tile};

/// Result type for raster sampling operations.
pub type Result<T> = std::result::Result<T, RasterError>;
