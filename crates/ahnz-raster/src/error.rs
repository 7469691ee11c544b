//! Error types for the raster sampling crate.

use thiserror::Error;

/// Errors that can occur while building or sampling elevation tiles.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The batch of query points was empty; nothing to fetch.
    #[error("batch contains no query points")]
    EmptyBatch,

    /// Dataset name not present in the catalog.
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    /// HTTP transport error while requesting a grid.
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The image service answered with a non-success status.
    #[error("grid export rejected: HTTP {status} for {url}")]
    ServiceStatus {
        /// HTTP status code returned by the service.
        status: u16,
        /// Request URL that was rejected.
        url: String,
    },

    /// TIFF decoding error on the returned grid payload.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// The returned grid payload is inconsistent (shape/sample count mismatch).
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Grid fetch failed after exhausting the retry budget.
    #[error("grid fetch failed after {attempts} attempt(s): {reason}")]
    FetchFailed {
        /// Number of attempts performed.
        attempts: u32,
        /// Last failure observed.
        reason: String,
    },

    /// I/O error reading a catalog file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset catalog file could not be parsed.
    #[error("catalog parse error: {0}")]
    CatalogParse(#[from] serde_yaml::Error),
}
