//! CSV reading/writing for XY(Z) point tables.
//!
//! Input files carry a header naming at least `X` and `Y` columns (typically
//! `ID,X,Y`). Output appends a `Z` column to the input rows unchanged;
//! missing elevations are written as `NaN`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use ahnz_raster::Point;

/// An input table: the raw header and rows, plus the parsed query points.
#[derive(Debug)]
pub struct XyTable {
    /// Header line as read from the file.
    pub header: String,
    /// Data lines as read from the file, one per point.
    pub rows: Vec<String>,
    /// Parsed (x, y) per row, same order as `rows`.
    pub points: Vec<Point>,
}

/// Read an XY table from a CSV file.
pub fn read_xy_table<P: AsRef<Path>>(path: P) -> Result<XyTable> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;

    let mut lines = text.lines();
    let header = match lines.next() {
        Some(line) if !line.trim().is_empty() => line.to_string(),
        _ => bail!("{}: missing header line", path.display()),
    };

    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let x_col = columns
        .iter()
        .position(|c| *c == "X")
        .with_context(|| format!("{}: header has no X column", path.display()))?;
    let y_col = columns
        .iter()
        .position(|c| *c == "Y")
        .with_context(|| format!("{}: header has no Y column", path.display()))?;

    let mut rows = Vec::new();
    let mut points = Vec::new();
    for (lineno, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != columns.len() {
            bail!(
                "{}:{}: expected {} fields, found {}",
                path.display(),
                lineno + 2,
                columns.len(),
                fields.len()
            );
        }
        let x: f64 = fields[x_col]
            .parse()
            .with_context(|| format!("{}:{}: invalid X value", path.display(), lineno + 2))?;
        let y: f64 = fields[y_col]
            .parse()
            .with_context(|| format!("{}:{}: invalid Y value", path.display(), lineno + 2))?;
        rows.push(line.to_string());
        points.push(Point::new(x, y));
    }

    Ok(XyTable {
        header,
        rows,
        points,
    })
}

/// Write the table with a `Z` column appended.
///
/// `z` must have one entry per row; `None` is rendered as `NaN`.
pub fn write_xyz_table<P: AsRef<Path>>(path: P, table: &XyTable, z: &[Option<f64>]) -> Result<()> {
    let path = path.as_ref();
    assert_eq!(table.rows.len(), z.len(), "one Z value per input row");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory {}", parent.display()))?;
        }
    }

    let mut out = String::with_capacity(table.rows.len() * 32);
    out.push_str(&table.header);
    out.push_str(",Z\n");
    for (row, z) in table.rows.iter().zip(z) {
        out.push_str(row);
        match z {
            Some(z) => out.push_str(&format!(",{}", z)),
            None => out.push_str(",NaN"),
        }
        out.push('\n');
    }

    fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ahnz_csv_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_read_xy_table() {
        let path = temp_path("read.csv");
        fs::write(
            &path,
            "ID,X,Y\n0,131178.7,476558.84\n1,131178.47,476558.79\n",
        )
        .unwrap();

        let table = read_xy_table(&path).unwrap();
        assert_eq!(table.header, "ID,X,Y");
        assert_eq!(table.points.len(), 2);
        assert_eq!(table.points[0], Point::new(131178.7, 476558.84));
        assert_eq!(table.rows[1], "1,131178.47,476558.79");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_read_rejects_missing_columns() {
        let path = temp_path("nocols.csv");
        fs::write(&path, "ID,LON,LAT\n0,1.0,2.0\n").unwrap();
        assert!(read_xy_table(&path).is_err());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_read_rejects_bad_value() {
        let path = temp_path("badval.csv");
        fs::write(&path, "ID,X,Y\n0,abc,2.0\n").unwrap();
        assert!(read_xy_table(&path).is_err());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_write_appends_z_column() {
        let path = temp_path("write.csv");
        let table = XyTable {
            header: "ID,X,Y".to_string(),
            rows: vec!["0,1.0,2.0".to_string(), "1,3.0,4.0".to_string()],
            points: vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
        };

        write_xyz_table(&path, &table, &[Some(-0.0228), None]).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "ID,X,Y,Z\n0,1.0,2.0,-0.0228\n1,3.0,4.0,NaN\n");

        fs::remove_file(&path).ok();
    }
}
