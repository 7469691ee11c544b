//! Tile construction: bounding box derivation, grid fetch, geometry framing.

use std::time::Duration;

use tracing::{debug, warn};

use crate::fetch::{GridFetcher, GridRequest};
use crate::tile::{BoundingBox, CellResolution, Point, Tile};
use crate::{Dataset, RasterError, Result};

/// Default oversampling factor: pixels requested per world unit of extent.
///
/// Oversampling relative to the true resolution reduces aliasing from the
/// service's own resampling.
pub const DEFAULT_OVERSAMPLING: f64 = 2.0;

/// Default bounding-box padding in world units per side.
///
/// Guards against query points landing exactly on the grid edge after
/// floor/ceil rounding of the box corners.
pub const DEFAULT_PADDING: f64 = 1.0;

/// Two derived per-axis resolutions within this tolerance collapse to a
/// single uniform scalar.
const RESOLUTION_EPSILON: f64 = 1e-9;

/// Bounded retry policy for the grid fetch.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts (1 = no retry).
    pub max_attempts: u32,
    /// Base delay between attempts; grows linearly with the attempt number.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    /// A single attempt: a fetch failure is immediately fatal for the batch.
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Builds one [`Tile`] per batch of query points.
///
/// Derives the minimal bounding box over the batch, pads it, requests an
/// oversampled grid from the fetcher, and frames the returned grid with a
/// resolution derived from its actual shape.
#[derive(Debug)]
pub struct TileBuilder<'a, F: GridFetcher> {
    fetcher: &'a F,
    dataset: &'a Dataset,
    oversampling: f64,
    padding: f64,
    retry: RetryPolicy,
}

impl<'a, F: GridFetcher> TileBuilder<'a, F> {
    /// Create a builder with default oversampling, padding, and retry policy.
    pub fn new(fetcher: &'a F, dataset: &'a Dataset) -> Self {
        Self {
            fetcher,
            dataset,
            oversampling: DEFAULT_OVERSAMPLING,
            padding: DEFAULT_PADDING,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the oversampling factor.
    pub fn with_oversampling(mut self, oversampling: f64) -> Self {
        self.oversampling = oversampling;
        self
    }

    /// Set the bounding-box padding per side, in world units.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the fetch retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build a tile covering all query points.
    ///
    /// Performs exactly one successful grid fetch. A fetch failure (after the
    /// retry budget) aborts the whole batch; no partial tile is produced.
    pub fn build(&self, points: &[Point]) -> Result<Tile> {
        let bbox = self.bounding_box(points)?;

        let width_px = Self::pixel_extent(bbox.width(), self.oversampling);
        let height_px = Self::pixel_extent(bbox.height(), self.oversampling);

        let request = GridRequest {
            bbox,
            width_px,
            height_px,
            dataset_path: self.dataset.service_path.clone(),
        };

        let grid = self.fetch_with_retry(&request)?;

        // The service may honor neither the requested shape nor the aspect
        // ratio; the true resolution comes from what it actually returned.
        let x_res = bbox.width() / grid.cols() as f64;
        let y_res = bbox.height() / grid.rows() as f64;
        let resolution = if (x_res - y_res).abs() < RESOLUTION_EPSILON {
            CellResolution::Uniform(x_res)
        } else {
            debug!(x_res, y_res, "per-axis resolutions diverge");
            CellResolution::PerAxis { x: x_res, y: y_res }
        };
        if x_res > self.dataset.native_resolution {
            debug!(
                x_res,
                native = self.dataset.native_resolution,
                "derived resolution is coarser than the dataset's native cell size"
            );
        }

        Ok(Tile::new(grid, bbox, resolution))
    }

    /// Tightest whole-unit box over the points, expanded by the padding.
    fn bounding_box(&self, points: &[Point]) -> Result<BoundingBox> {
        let first = points.first().ok_or(RasterError::EmptyBatch)?;

        let mut x_min = first.x;
        let mut x_max = first.x;
        let mut y_min = first.y;
        let mut y_max = first.y;
        for p in &points[1..] {
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }

        Ok(BoundingBox {
            x_min: x_min.floor() - self.padding,
            y_min: y_min.floor() - self.padding,
            x_max: x_max.ceil() + self.padding,
            y_max: y_max.ceil() + self.padding,
        })
    }

    /// Requested pixel count for a world extent, at least one pixel.
    fn pixel_extent(world: f64, oversampling: f64) -> u32 {
        ((world * oversampling).ceil() as u32).max(1)
    }

    /// Run the fetch under the retry policy.
    ///
    /// A single-shot policy propagates the underlying error unchanged; with
    /// retries configured, exhaustion maps to [`RasterError::FetchFailed`]
    /// carrying the attempt count.
    fn fetch_with_retry(&self, request: &GridRequest) -> Result<crate::Grid> {
        let attempts = self.retry.max_attempts.max(1);
        let mut last_err = None;

        for attempt in 1..=attempts {
            match self.fetcher.fetch(request) {
                Ok(grid) => return Ok(grid),
                Err(err) => {
                    if attempt < attempts {
                        warn!(attempt, %err, "grid fetch failed, retrying");
                        std::thread::sleep(self.retry.backoff * attempt);
                    }
                    last_err = Some(err);
                }
            }
        }

        let err = last_err.expect("at least one attempt was made");
        if attempts == 1 {
            Err(err)
        } else {
            Err(RasterError::FetchFailed {
                attempts,
                reason: err.to_string(),
            })
        }
    }
}
