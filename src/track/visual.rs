use std::marker::PhantomData;

use crate::track::bbox::BoundingBox;

/// Per-object visual tracking capability.
///
/// An implementation follows one image region from frame to frame given
/// pixel data. Each tracked object owns one instance, injected at
/// construction, so lifecycle logic never touches a concrete vision
/// backend.
pub trait VisualTracker {
    /// Opaque pixel container the tracker reads.
    type Image;

    /// Binds the tracker to the image region described by `bbox`.
    fn initialize(&mut self, image: &Self::Image, bbox: &BoundingBox);

    /// Advances the tracker one frame. Returns `(true, updated_box)` when
    /// the target was found and `(false, last_box)` when it was not.
    fn update(&mut self, image: &Self::Image) -> (bool, BoundingBox);
}

/// Supplies the engine with one fresh visual tracker per registered
/// object.
pub trait TrackerBackend {
    type Image;
    type Tracker: VisualTracker<Image = Self::Image>;

    fn create_tracker(&self) -> Self::Tracker;
}

/// Visual tracker that re-reports whatever box it was last initialized
/// with and never loses it.
///
/// Useful for detector-only deployments where identity continuity comes
/// entirely from detection association, and as a stand-in in tests.
pub struct StaticTracker<I> {
    bbox: Option<BoundingBox>,
    _image: PhantomData<I>,
}

impl<I> Default for StaticTracker<I> {
    fn default() -> Self {
        StaticTracker {
            bbox: None,
            _image: PhantomData,
        }
    }
}

impl<I> VisualTracker for StaticTracker<I> {
    type Image = I;

    fn initialize(&mut self, _image: &I, bbox: &BoundingBox) {
        self.bbox = Some(*bbox);
    }

    fn update(&mut self, _image: &I) -> (bool, BoundingBox) {
        match self.bbox {
            Some(bbox) => (true, bbox),
            None => (false, BoundingBox::default()),
        }
    }
}

/// Backend handing out `StaticTracker` instances.
pub struct StaticTrackerBackend<I> {
    _image: PhantomData<I>,
}

impl<I> StaticTrackerBackend<I> {
    pub fn new() -> Self {
        StaticTrackerBackend {
            _image: PhantomData,
        }
    }
}

impl<I> Default for StaticTrackerBackend<I> {
    fn default() -> Self {
        StaticTrackerBackend::new()
    }
}

impl<I> TrackerBackend for StaticTrackerBackend<I> {
    type Image = I;
    type Tracker = StaticTracker<I>;

    fn create_tracker(&self) -> StaticTracker<I> {
        StaticTracker::default()
    }
}
