//! Rectangular elevation grid returned by the image service.

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};

use crate::{RasterError, Result};

/// A rectangular grid of elevation samples.
///
/// Samples are stored in row-major order. Row 0 is the northern edge (rows
/// run north to south), column 0 is the western edge (columns run west to
/// east). This matches the image convention of the export service and is
/// never reordered.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Elevation samples, row-major, `rows * cols` values.
    data: Vec<f64>,
    /// Number of rows (image height in pixels).
    rows: u32,
    /// Number of columns (image width in pixels).
    cols: u32,
}

impl Grid {
    /// Create a grid from row-major samples.
    ///
    /// Fails if either dimension is zero or the sample count does not match
    /// the declared shape.
    pub fn new(rows: u32, cols: u32, data: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(RasterError::InvalidGrid(format!(
                "degenerate shape {}x{}",
                rows, cols
            )));
        }
        let expected = rows as usize * cols as usize;
        if data.len() != expected {
            return Err(RasterError::InvalidGrid(format!(
                "expected {} samples for {}x{}, got {}",
                expected,
                rows,
                cols,
                data.len()
            )));
        }
        Ok(Self { data, rows, cols })
    }

    /// Decode a grid from the bytes of a single-band TIFF image.
    pub fn from_tiff_bytes(bytes: &[u8]) -> Result<Self> {
        let mut decoder = Decoder::new(Cursor::new(bytes))?;
        let (width, height) = decoder.dimensions()?;
        let data = Self::decode_samples(&mut decoder)?;
        Self::new(height, width, data)
    }

    /// Decode the sample payload, widening every supported pixel type to f64.
    fn decode_samples<R: std::io::Read + std::io::Seek>(
        decoder: &mut Decoder<R>,
    ) -> Result<Vec<f64>> {
        let result = decoder.read_image()?;

        match result {
            DecodingResult::F64(data) => Ok(data),
            DecodingResult::F32(data) => Ok(data.into_iter().map(|v| v as f64).collect()),
            DecodingResult::I16(data) => Ok(data.into_iter().map(|v| v as f64).collect()),
            DecodingResult::I32(data) => Ok(data.into_iter().map(|v| v as f64).collect()),
            DecodingResult::U16(data) => Ok(data.into_iter().map(|v| v as f64).collect()),
            DecodingResult::U32(data) => Ok(data.into_iter().map(|v| v as f64).collect()),
            DecodingResult::U8(data) => Ok(data.into_iter().map(|v| v as f64).collect()),
            DecodingResult::I8(data) => Ok(data.into_iter().map(|v| v as f64).collect()),
            DecodingResult::U64(data) => Ok(data.into_iter().map(|v| v as f64).collect()),
            DecodingResult::I64(data) => Ok(data.into_iter().map(|v| v as f64).collect()),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Sample at (row, col). Callers are expected to pass validated indices.
    pub fn get(&self, row: u32, col: u32) -> f64 {
        self.data[row as usize * self.cols as usize + col as usize]
    }
}
