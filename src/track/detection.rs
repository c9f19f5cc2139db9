use uuid::Uuid;

use crate::track::bbox::BoundingBox;

/// Single-frame observation produced by an object detector.
///
/// Consumed once by the association engine and never retained across
/// frames; persistent identity lives in `TrackedObject` instead.
///
/// Basic usage:
///
/// ```
/// use retrack_rs::track::{BoundingBox, Detection};
/// let bbox = BoundingBox::new(10.0, 10.0, 32.0, 32.0).unwrap();
/// let detection = Detection::new("face", 0.99, bbox);
/// assert_eq!(detection.label, "face");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub label: String,
    pub score: f32,
    pub bounding_box: BoundingBox,
    pub id: Uuid,
}

impl Detection {
    pub fn new(label: &str, score: f32, bounding_box: BoundingBox) -> Self {
        Detection {
            label: label.to_string(),
            score,
            bounding_box,
            id: Uuid::new_v4(),
        }
    }

    /// Replace the generated id, for detectors that carry their own.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}
