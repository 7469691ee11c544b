//! Batch sampling: one output value per input point, in input order.

use rayon::prelude::*;

use crate::fetch::GridFetcher;
use crate::tile::{Point, Tile};
use crate::{DatasetCatalog, Result, TileBuilder};

/// Sample a tile at every point, preserving order and cardinality.
///
/// Out-of-coverage points yield `None`; an empty batch yields an empty
/// output, not an error.
pub fn sample_batch(tile: &Tile, points: &[Point]) -> Vec<Option<f64>> {
    points.iter().map(|p| tile.sample(p.x, p.y)).collect()
}

/// Parallel variant of [`sample_batch`].
///
/// The tile is immutable, so points partition freely across threads; the
/// output order still matches the input order. Per-point diagnostics may
/// interleave but each names its own point.
pub fn par_sample_batch(tile: &Tile, points: &[Point]) -> Vec<Option<f64>> {
    points.par_iter().map(|p| tile.sample(p.x, p.y)).collect()
}

/// One-call batch surface: resolve the dataset, build a tile over the batch,
/// sample every point.
///
/// This performs exactly one grid fetch. Fatal errors (empty batch, unknown
/// dataset, fetch failure) surface before any output is produced; per-point
/// misses are reflected in the output itself.
pub fn elevations_for<F: GridFetcher>(
    fetcher: &F,
    catalog: &DatasetCatalog,
    dataset_name: &str,
    points: &[Point],
) -> Result<Vec<Option<f64>>> {
    let dataset = catalog.get(dataset_name)?;
    let tile = TileBuilder::new(fetcher, dataset).build(points)?;
    Ok(sample_batch(&tile, points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{BoundingBox, CellResolution};
    use crate::Grid;

    fn test_tile() -> Tile {
        let data: Vec<f64> = (0..16).map(|i| i as f64).collect();
        let grid = Grid::new(4, 4, data).unwrap();
        let bbox = BoundingBox {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 4.0,
            y_max: 4.0,
        };
        Tile::new(grid, bbox, CellResolution::Uniform(1.0))
    }

    #[test]
    fn test_batch_preserves_order_and_cardinality() {
        let tile = test_tile();
        let points = [
            Point::new(0.5, 3.5), // row 0, col 0 -> 0
            Point::new(3.5, 3.5), // row 0, col 3 -> 3
            Point::new(0.5, 0.5), // row 3, col 0 -> 12
            Point::new(3.5, 0.5), // row 3, col 3 -> 15
        ];

        let z = sample_batch(&tile, &points);
        assert_eq!(z.len(), points.len());
        assert_eq!(z, vec![Some(0.0), Some(3.0), Some(12.0), Some(15.0)]);
    }

    #[test]
    fn test_empty_batch_yields_empty_output() {
        let tile = test_tile();
        assert!(sample_batch(&tile, &[]).is_empty());
        assert!(par_sample_batch(&tile, &[]).is_empty());
    }

    #[test]
    fn test_missing_points_do_not_disturb_neighbors() {
        let tile = test_tile();
        let points = [
            Point::new(0.5, 3.5),
            Point::new(-100.0, 3.5), // far west of coverage
            Point::new(3.5, 0.5),
        ];

        let z = sample_batch(&tile, &points);
        assert_eq!(z, vec![Some(0.0), None, Some(15.0)]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let tile = test_tile();
        let points: Vec<Point> = (0..100)
            .map(|i| Point::new((i % 7) as f64 * 0.6, (i % 5) as f64 * 0.9))
            .collect();

        assert_eq!(sample_batch(&tile, &points), par_sample_batch(&tile, &points));
    }
}
