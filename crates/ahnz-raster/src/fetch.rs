//! Grid retrieval from an ArcGIS ImageServer `exportImage` endpoint.
//!
//! The service renders an elevation raster for a requested bounding box and
//! pixel size and returns it as a TIFF image. It is treated as an opaque
//! grid source: the returned pixel dimensions may differ from the request,
//! and the returned samples may include the service's own interpolation.

use std::time::Duration;

use tracing::debug;

use crate::{BoundingBox, Grid, RasterError, Result};

/// Base URL of the AHN elevation ImageServer.
const AHN_BASE_URL: &str = "https://ahn.arcgisonline.nl/arcgis/rest/services/Hoogtebestand/";

/// HTTP timeout for export requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// One grid request: bounding box, pixel shape, dataset.
#[derive(Debug, Clone)]
pub struct GridRequest {
    /// World-coordinate box to render.
    pub bbox: BoundingBox,
    /// Requested image width in pixels.
    pub width_px: u32,
    /// Requested image height in pixels.
    pub height_px: u32,
    /// Service path of the dataset to render.
    pub dataset_path: String,
}

/// Source of elevation grids.
///
/// Implementations perform exactly one retrieval per call; retry policy
/// belongs to the caller.
pub trait GridFetcher {
    /// Fetch a grid covering the requested box.
    fn fetch(&self, request: &GridRequest) -> Result<Grid>;
}

/// Fixed query parameters of an `exportImage` request.
///
/// Defaults request an uncompressed single-band TIFF with 64-bit float
/// pixels and the service's bilinear resampling.
#[derive(Debug, Clone)]
pub struct ExportImageParams {
    /// Output spatial reference (empty: same as the service).
    pub image_sr: String,
    /// Time instant/extent (empty: current).
    pub time: String,
    /// Output image format.
    pub format: String,
    /// Output pixel type.
    pub pixel_type: String,
    /// No-data value override (empty: service default).
    pub no_data: String,
    /// How no-data values are matched.
    pub no_data_interpretation: String,
    /// Resampling rule applied by the service.
    pub interpolation: String,
    /// Compression method (empty: none).
    pub compression: String,
    /// Compression quality.
    pub compression_quality: String,
    /// Band selection (empty: all).
    pub band_ids: String,
    /// Mosaic rule (empty: service default).
    pub mosaic_rule: String,
    /// Rendering rule (empty: raw values).
    pub rendering_rule: String,
    /// Response kind: `image` returns the raw bytes.
    pub f: String,
}

impl Default for ExportImageParams {
    fn default() -> Self {
        Self {
            image_sr: String::new(),
            time: String::new(),
            format: "tiff".to_string(),
            pixel_type: "F64".to_string(),
            no_data: String::new(),
            no_data_interpretation: "esriNoDataMatchAny".to_string(),
            interpolation: "+RSP_BilinearInterpolation".to_string(),
            compression: String::new(),
            compression_quality: String::new(),
            band_ids: String::new(),
            mosaic_rule: String::new(),
            rendering_rule: String::new(),
            f: "image".to_string(),
        }
    }
}

impl ExportImageParams {
    /// Render the fixed parameters as a query-string tail.
    fn query_tail(&self) -> String {
        format!(
            "&imageSR={}&time={}&format={}&pixelType={}&noData={}\
             &noDataInterpretation={}&interpolation={}&compression={}\
             &compressionQuality={}&bandIds={}&mosaicRule={}&renderingRule={}&f={}",
            self.image_sr,
            self.time,
            self.format,
            self.pixel_type,
            self.no_data,
            self.no_data_interpretation,
            self.interpolation,
            self.compression,
            self.compression_quality,
            self.band_ids,
            self.mosaic_rule,
            self.rendering_rule,
            self.f
        )
    }
}

/// Blocking `exportImage` client.
pub struct ImageServerFetcher {
    base_url: String,
    params: ExportImageParams,
    client: reqwest::blocking::Client,
}

impl std::fmt::Debug for ImageServerFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageServerFetcher")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ImageServerFetcher {
    /// Create a fetcher against the AHN ImageServer.
    pub fn new() -> Result<Self> {
        Self::with_base_url(AHN_BASE_URL)
    }

    /// Create a fetcher against a custom ImageServer base URL.
    ///
    /// The base URL is the service root up to (and including) the segment
    /// the dataset path is appended to.
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            params: ExportImageParams::default(),
            client,
        })
    }

    /// Override the fixed export parameters.
    pub fn with_params(mut self, params: ExportImageParams) -> Self {
        self.params = params;
        self
    }

    /// Build the full `exportImage` URL for a request.
    fn export_url(&self, request: &GridRequest) -> String {
        let b = &request.bbox;
        format!(
            "{}{}/ImageServer/exportImage?bbox={},{},{},{}&bboxSR=&size={},{}{}",
            self.base_url,
            request.dataset_path,
            b.x_min,
            b.y_min,
            b.x_max,
            b.y_max,
            request.width_px,
            request.height_px,
            self.params.query_tail()
        )
    }
}

impl GridFetcher for ImageServerFetcher {
    fn fetch(&self, request: &GridRequest) -> Result<Grid> {
        let url = self.export_url(request);
        debug!(
            dataset = %request.dataset_path,
            width_px = request.width_px,
            height_px = request.height_px,
            "exporting grid"
        );

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(RasterError::ServiceStatus {
                status: response.status().as_u16(),
                url,
            });
        }

        let bytes = response.bytes()?;
        Grid::from_tiff_bytes(&bytes)
    }
}
