use std::path::{Path, PathBuf};

use crate::track::detection::Detection;
use crate::track::errors::TrackerError;

/// Object detection capability: turns frame pixels into candidate
/// detections. Implementations wrap a concrete model; the engine only
/// ever consumes the resulting `Detection` values.
pub trait ObjectDetector {
    /// Opaque pixel container the detector reads.
    type Image;

    fn detect(&mut self, image: &Self::Image) -> Vec<Detection>;
}

/// Configuration for cascade-style detectors.
///
/// Construction validates the backing model file up front instead of
/// failing at first use.
///
/// Basic usage:
///
/// ```
/// use retrack_rs::track::DetectorConfig;
/// assert!(DetectorConfig::new("/no/such/model.xml").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// How much the image is shrunk at each detection scale.
    pub scale_factor: f64,
    /// Minimum neighboring hits for a candidate to survive.
    pub min_neighbors: u32,
    /// Smallest object size considered, in pixels.
    pub min_size: (u32, u32),
    /// Trained model the detector loads.
    pub model_path: PathBuf,
}

impl DetectorConfig {
    pub fn new(model_path: impl AsRef<Path>) -> Result<Self, TrackerError> {
        let model_path = model_path.as_ref();
        if !model_path.is_file() {
            return Err(TrackerError::MissingModelFile(model_path.to_path_buf()));
        }
        Ok(DetectorConfig {
            scale_factor: 1.5,
            min_neighbors: 8,
            min_size: (16, 16),
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_min_neighbors(mut self, min_neighbors: u32) -> Self {
        self.min_neighbors = min_neighbors;
        self
    }

    pub fn with_min_size(mut self, min_size: (u32, u32)) -> Self {
        self.min_size = min_size;
        self
    }
}
