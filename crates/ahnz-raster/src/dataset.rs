//! Dataset catalog: named elevation datasets and their service parameters.
//!
//! The catalog is plain injected configuration. It is resolved once at
//! startup and passed explicitly to the components that need it; there is no
//! ambient global table.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::{RasterError, Result};

/// One elevation dataset published by the image service.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    /// Service path segment identifying the dataset on the ImageServer.
    pub service_path: String,
    /// Native cell size of the dataset in world units (meters for AHN).
    ///
    /// Informational: the true resolution of a fetched tile is always derived
    /// from the returned grid, but a derived resolution much coarser than
    /// this indicates the request was clipped by the service.
    pub native_resolution: f64,
}

/// Mapping from dataset name to service parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetCatalog {
    datasets: HashMap<String, Dataset>,
}

impl DatasetCatalog {
    /// The built-in AHN dataset table.
    ///
    /// Covers the AHN3/AHN4 surface (DSM) and terrain (DTM) rasters at their
    /// published 0.5 m and 5 m cell sizes. The service path equals the
    /// dataset name on the AHN ImageServer.
    pub fn builtin() -> Self {
        let names: [(&str, f64); 7] = [
            ("AHN3_5m", 5.0),
            ("AHN3_i", 0.5),
            ("AHN3_r", 0.5),
            ("AHN4_DSM_50cm", 0.5),
            ("AHN4_DSM_5m", 5.0),
            ("AHN4_DTM_50cm", 0.5),
            ("AHN4_DTM_5m", 5.0),
        ];

        let datasets = names
            .into_iter()
            .map(|(name, native_resolution)| {
                (
                    name.to_string(),
                    Dataset {
                        service_path: name.to_string(),
                        native_resolution,
                    },
                )
            })
            .collect();

        Self { datasets }
    }

    /// Load a catalog from a YAML file.
    ///
    /// Expected shape:
    /// ```yaml
    /// datasets:
    ///   AHN4_DTM_50cm:
    ///     service_path: AHN4_DTM_50cm
    ///     native_resolution: 0.5
    /// ```
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Look up a dataset by name.
    pub fn get(&self, name: &str) -> Result<&Dataset> {
        self.datasets
            .get(name)
            .ok_or_else(|| RasterError::UnknownDataset(name.to_string()))
    }

    /// Names of all known datasets, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.datasets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
