use uuid::Uuid;

use crate::track::bbox::BoundingBox;
use crate::track::detection::Detection;
use crate::track::tracked_object::TrackState;

/// Published per-tick view of one live tracked object.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSnapshot {
    pub id: Uuid,
    pub state: TrackState,
    pub bounding_box: BoundingBox,
}

/// Single frame of video moving through a pipeline step.
///
/// Carries the pixel data, the detections found at this tick and the
/// tracked objects visible after the engine ran. Every frame owns its
/// containers; nothing is shared between frames.
#[derive(Debug, Clone)]
pub struct VideoFrame<I> {
    pub pixels: I,
    pub detections: Vec<Detection>,
    pub tracked_objects: Vec<TrackSnapshot>,
}

impl<I> VideoFrame<I> {
    pub fn new(pixels: I) -> Self {
        VideoFrame {
            pixels,
            detections: Vec::new(),
            tracked_objects: Vec::new(),
        }
    }

    pub fn with_detections(pixels: I, detections: Vec<Detection>) -> Self {
        VideoFrame {
            pixels,
            detections,
            tracked_objects: Vec::new(),
        }
    }
}
