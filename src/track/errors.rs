use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at construction time or by engine internals.
///
/// A visual tracker losing its target is not an error: it is absorbed
/// into the tracked object's state and observed there.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Bounding box construction with negative dimensions.
    #[error("bounding box dimensions must be non-negative, got width {width} and height {height}")]
    InvalidBoxSize { width: f64, height: f64 },
    /// Detector configuration pointing at a model file that does not exist.
    #[error("no detector model file at {0}")]
    MissingModelFile(PathBuf),
    /// The spatial index produced a slot with no object behind it. The
    /// index and the object list are only ever mutated together, so this
    /// indicates a bug in the engine itself.
    #[error("spatial index returned slot {0} with no tracked object behind it")]
    StaleIndexSlot(usize),
}
