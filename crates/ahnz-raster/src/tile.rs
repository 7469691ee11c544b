//! Single elevation tile: one fetched grid plus its geometric framing.

use tracing::warn;

use crate::Grid;

/// Rounding scale for reported elevations: 4 decimal places, matching the
/// native numeric resolution of the AHN datasets.
const Z_ROUND_SCALE: f64 = 10_000.0;

/// A 2-D query point in the planar coordinate system of the dataset
/// (for AHN: RD New / EPSG:28992 meters). No unit conversion is performed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Easting.
    pub x: f64,
    /// Northing.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box, `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// West edge.
    pub x_min: f64,
    /// South edge.
    pub y_min: f64,
    /// East edge.
    pub x_max: f64,
    /// North edge.
    pub y_max: f64,
}

impl BoundingBox {
    /// Width in world units.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height in world units.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Check if a coordinate is within the box (inclusive on all edges).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

/// World units per grid cell.
///
/// The export service may render the x and y axes at slightly different
/// densities when the returned pixel shape differs from the request. The
/// builder keeps both axes when they diverge instead of silently collapsing
/// them to one scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellResolution {
    /// Same resolution on both axes.
    Uniform(f64),
    /// Distinct per-axis resolutions.
    PerAxis {
        /// World units per column.
        x: f64,
        /// World units per row.
        y: f64,
    },
}

impl CellResolution {
    /// Resolution along the x axis (world units per column).
    pub fn x(&self) -> f64 {
        match *self {
            CellResolution::Uniform(r) => r,
            CellResolution::PerAxis { x, .. } => x,
        }
    }

    /// Resolution along the y axis (world units per row).
    pub fn y(&self) -> f64 {
        match *self {
            CellResolution::Uniform(r) => r,
            CellResolution::PerAxis { y, .. } => y,
        }
    }
}

/// An immutable elevation tile.
///
/// Owns one fetched [`Grid`] anchored at the northwest corner of the box it
/// was fetched for. The east and south extents are recomputed from the
/// grid's actual shape and the derived resolution, because the service may
/// return different pixel dimensions than requested.
#[derive(Debug)]
pub struct Tile {
    grid: Grid,
    /// West edge of the fetched box.
    x_min: f64,
    /// North edge of the fetched box.
    y_max: f64,
    resolution: CellResolution,
}

impl Tile {
    /// Wrap a grid with its geometric framing.
    ///
    /// `x_min`/`y_max` locate the northwest corner of `bbox`; the opposite
    /// corner is derived from the grid shape, not taken from the request.
    pub fn new(grid: Grid, bbox: BoundingBox, resolution: CellResolution) -> Self {
        Self {
            grid,
            x_min: bbox.x_min,
            y_max: bbox.y_max,
            resolution,
        }
    }

    /// Covered extent, with the east/south edges derived from the grid shape.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox {
            x_min: self.x_min,
            y_min: self.y_max - self.grid.rows() as f64 * self.resolution.y(),
            x_max: self.x_min + self.grid.cols() as f64 * self.resolution.x(),
            y_max: self.y_max,
        }
    }

    /// Cell resolution of the grid.
    pub fn resolution(&self) -> CellResolution {
        self.resolution
    }

    /// Grid dimensions as (rows, cols).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.grid.rows(), self.grid.cols())
    }

    /// Sample the elevation at a point.
    ///
    /// Returns `None` for points outside the covered extent (a per-point
    /// diagnostic is logged; this never aborts a batch). The upper edges are
    /// inclusive: a point exactly at `x_max` or `y_min` lands on the last
    /// column/row. Values are rounded to 4 decimal places.
    pub fn sample(&self, x: f64, y: f64) -> Option<f64> {
        let b = self.bounds();

        if x < b.x_min || x > b.x_max {
            warn!(
                x,
                y,
                x_min = b.x_min,
                x_max = b.x_max,
                "point outside tile: x not within covered extent"
            );
            return None;
        }
        if y < b.y_min || y > b.y_max {
            warn!(
                x,
                y,
                y_min = b.y_min,
                y_max = b.y_max,
                "point outside tile: y not within covered extent"
            );
            return None;
        }

        // Row 0 is the north edge, so the y axis inverts.
        let col = ((x - b.x_min) / self.resolution.x()).floor();
        let row = ((b.y_max - y) / self.resolution.y()).floor();

        let (col, row) = match (
            Self::checked_index(col, self.grid.cols()),
            Self::checked_index(row, self.grid.rows()),
        ) {
            (Some(col), Some(row)) => (col, row),
            _ => {
                // Floating-point edge rounding can push an in-bounds point past
                // the last cell; treat it as missing rather than faulting.
                warn!(x, y, col, row, "point maps outside grid indices");
                return None;
            }
        };

        Some((self.grid.get(row, col) * Z_ROUND_SCALE).round() / Z_ROUND_SCALE)
    }

    /// Validate a floored index against an axis length.
    ///
    /// An index landing exactly on the length comes from the inclusive upper
    /// boundary and clamps to the last cell; anything else out of range is
    /// rejected.
    fn checked_index(value: f64, len: u32) -> Option<u32> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let idx = value as u64;
        if idx < len as u64 {
            Some(idx as u32)
        } else if idx == len as u64 {
            Some(len - 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_tile() -> Tile {
        // 4x4 grid over a 2m x 2m box at 0.5 m/cell, value = row*10 + col.
        let data: Vec<f64> = (0..4)
            .flat_map(|row| (0..4).map(move |col| (row * 10 + col) as f64))
            .collect();
        let grid = Grid::new(4, 4, data).unwrap();
        let bbox = BoundingBox {
            x_min: 100.0,
            y_min: 200.0,
            x_max: 102.0,
            y_max: 202.0,
        };
        Tile::new(grid, bbox, CellResolution::Uniform(0.5))
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = BoundingBox {
            x_min: 100.0,
            y_min: 200.0,
            x_max: 102.0,
            y_max: 202.0,
        };

        assert!(bounds.contains(101.0, 201.0));
        assert!(bounds.contains(100.0, 200.0)); // corner
        assert!(bounds.contains(102.0, 202.0)); // corner
        assert!(!bounds.contains(99.9, 201.0));
        assert!(!bounds.contains(102.1, 201.0));
        assert!(!bounds.contains(101.0, 199.9));
        assert!(!bounds.contains(101.0, 202.1));
    }

    #[test]
    fn test_sample_interior_point() {
        let tile = test_tile();
        // (100.7, 201.8): col = floor(0.7/0.5) = 1, row = floor(0.2/0.5) = 0.
        assert_relative_eq!(tile.sample(100.7, 201.8).unwrap(), 1.0);
        // (101.3, 200.4): col = floor(1.3/0.5) = 2, row = floor(1.6/0.5) = 3.
        assert_relative_eq!(tile.sample(101.3, 200.4).unwrap(), 32.0);
    }

    #[test]
    fn test_sample_y_axis_inversion() {
        let tile = test_tile();
        // Just under the north edge maps to row 0, just over the south edge to
        // the last row.
        assert_relative_eq!(tile.sample(100.1, 201.9).unwrap(), 0.0);
        assert_relative_eq!(tile.sample(100.1, 200.1).unwrap(), 30.0);
    }

    #[test]
    fn test_sample_out_of_bounds_is_missing() {
        let tile = test_tile();
        assert!(tile.sample(99.0, 201.0).is_none());
        assert!(tile.sample(103.0, 201.0).is_none());
        assert!(tile.sample(101.0, 199.0).is_none());
        assert!(tile.sample(101.0, 203.0).is_none());
    }

    #[test]
    fn test_sample_upper_boundary_inclusive() {
        let tile = test_tile();
        // Exactly (x_max, y_min) must hit the last column/row, not miss.
        assert_relative_eq!(tile.sample(102.0, 200.0).unwrap(), 33.0);
        // The other corners too.
        assert_relative_eq!(tile.sample(100.0, 202.0).unwrap(), 0.0);
        assert_relative_eq!(tile.sample(102.0, 202.0).unwrap(), 3.0);
        assert_relative_eq!(tile.sample(100.0, 200.0).unwrap(), 30.0);
    }

    #[test]
    fn test_sample_last_column_midpoint() {
        let tile = test_tile();
        // Midpoint of the last column resolves to col 3, never col 4.
        let x = 102.0 - 0.25;
        assert_relative_eq!(tile.sample(x, 201.9).unwrap(), 3.0);
    }

    #[test]
    fn test_sample_idempotent() {
        let tile = test_tile();
        let first = tile.sample(100.7, 201.8);
        let second = tile.sample(100.7, 201.8);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sample_rounds_to_four_decimals() {
        let grid = Grid::new(1, 1, vec![1.23456789]).unwrap();
        let bbox = BoundingBox {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 1.0,
            y_max: 1.0,
        };
        let tile = Tile::new(grid, bbox, CellResolution::Uniform(1.0));
        assert_relative_eq!(tile.sample(0.5, 0.5).unwrap(), 1.2346);
    }

    #[test]
    fn test_bounds_derived_from_grid_shape() {
        // Service returned 5 columns where 4 were requested: the east edge
        // follows the grid, not the request.
        let grid = Grid::new(4, 5, vec![0.0; 20]).unwrap();
        let bbox = BoundingBox {
            x_min: 100.0,
            y_min: 200.0,
            x_max: 102.0,
            y_max: 202.0,
        };
        let tile = Tile::new(grid, bbox, CellResolution::PerAxis { x: 0.4, y: 0.5 });
        let b = tile.bounds();
        assert_relative_eq!(b.x_max, 102.0);
        assert_relative_eq!(b.y_min, 200.0);

        let tile = Tile::new(
            Grid::new(4, 5, vec![0.0; 20]).unwrap(),
            bbox,
            CellResolution::Uniform(0.5),
        );
        assert_relative_eq!(tile.bounds().x_max, 102.5);
    }

    #[test]
    fn test_per_axis_resolution_indexing() {
        // Non-square box: 4 cols over 2m (0.5 m/col), 2 rows over 2m (1 m/row).
        let data: Vec<f64> = (0..2)
            .flat_map(|row| (0..4).map(move |col| (row * 10 + col) as f64))
            .collect();
        let grid = Grid::new(2, 4, data).unwrap();
        let bbox = BoundingBox {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 2.0,
            y_max: 2.0,
        };
        let tile = Tile::new(grid, bbox, CellResolution::PerAxis { x: 0.5, y: 1.0 });
        // (1.6, 0.5): col = floor(1.6/0.5) = 3, row = floor(1.5/1.0) = 1.
        assert_relative_eq!(tile.sample(1.6, 0.5).unwrap(), 13.0);
    }
}
