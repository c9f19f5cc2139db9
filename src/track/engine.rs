use log::debug;
use uuid::Uuid;

use crate::track::bbox::BoundingBox;
use crate::track::detection::Detection;
use crate::track::errors::TrackerError;
use crate::track::frame::{TrackSnapshot, VideoFrame};
use crate::track::spatial::SpatialIndex;
use crate::track::tracked_object::{TrackState, TrackedObject};
use crate::track::visual::TrackerBackend;

/// Association engine settings.
///
/// An explicit value passed at construction; nothing is read from the
/// process environment.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Minimum IoU between a detection and a known location for a match.
    pub iou_threshold: f64,
    /// Grace period in seconds before a missing object is given up on.
    pub recovery_threshold: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            iou_threshold: 0.33,
            recovery_threshold: 3.0,
        }
    }
}

/// Multi-object tracker that assigns persistent identities to incoming
/// detections.
///
/// Each frame: detections are matched greedily against known objects by
/// highest IoU through the spatial index, missing objects are recovered
/// at matching detections, unmatched detections become new objects, and
/// every live object's visual tracker advances one step. Objects the
/// tracker keeps losing decay to `Missing` and finally `Lost`; evicting
/// `Lost` objects is a separate, caller-scheduled operation.
///
/// Basic usage:
///
/// ```
/// use retrack_rs::track::{MultiObjectTracker, StaticTrackerBackend, TrackerConfig};
/// let backend = StaticTrackerBackend::<()>::new();
/// let mut tracker = MultiObjectTracker::new(backend, TrackerConfig::default());
/// let registered = tracker.ingest(&[], &()).unwrap();
/// assert!(registered.is_empty());
/// ```
pub struct MultiObjectTracker<B: TrackerBackend> {
    backend: B,
    config: TrackerConfig,
    tracked_objects: Vec<TrackedObject<B::Tracker>>,
    index: SpatialIndex,
}

impl<B: TrackerBackend> MultiObjectTracker<B> {
    pub fn new(backend: B, config: TrackerConfig) -> Self {
        MultiObjectTracker {
            backend,
            config,
            tracked_objects: Vec::new(),
            index: SpatialIndex::new(),
        }
    }

    /// Live objects in registration order. Eviction shifts later objects
    /// down; the order is otherwise stable.
    pub fn objects(&self) -> &[TrackedObject<B::Tracker>] {
        &self.tracked_objects
    }

    pub fn len(&self) -> usize {
        self.tracked_objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked_objects.is_empty()
    }

    /// Returns the live object whose last known location best matches
    /// `bbox`, if any overlaps above the IoU threshold.
    pub fn find(&self, bbox: &BoundingBox) -> Option<&TrackedObject<B::Tracker>> {
        self.match_slot(bbox).map(|slot| &self.tracked_objects[slot])
    }

    // Highest-IoU candidate strictly above the threshold; ties keep the
    // earlier query hit, so the result is deterministic for fixed input.
    fn match_slot(&self, bbox: &BoundingBox) -> Option<usize> {
        let mut best_slot = None;
        let mut best_iou = self.config.iou_threshold;
        for slot in self.index.query(bbox) {
            let candidate = match self.tracked_objects.get(slot) {
                Some(object) => object,
                None => continue,
            };
            let overlap = candidate.last_known_location().iou(bbox);
            if overlap > best_iou {
                best_iou = overlap;
                best_slot = Some(slot);
            }
        }
        best_slot
    }

    /// Ingests one frame's detections.
    ///
    /// A detection matching an object in `Tracking` is absorbed: the
    /// object's own visual tracker stays authoritative. A detection
    /// matching a `Missing` object recovers it in place. Anything else
    /// (no match, or a match whose recovery is refused because the object
    /// is `Lost`) registers a brand-new object. Returns the ids of the
    /// objects registered by this call.
    pub fn ingest(
        &mut self,
        detections: &[Detection],
        image: &B::Image,
    ) -> Result<Vec<Uuid>, TrackerError> {
        let mut registered = Vec::new();
        for detection in detections {
            let bbox = detection.bounding_box;
            let slot = match self.match_slot(&bbox) {
                None => {
                    // Nothing known overlaps enough: a new identity.
                    registered.push(self.register(bbox, image));
                    continue;
                }
                Some(slot) => slot,
            };
            let object = self
                .tracked_objects
                .get_mut(slot)
                .ok_or(TrackerError::StaleIndexSlot(slot))?;
            if object.state() == TrackState::Tracking {
                continue;
            }
            if !object.attempt_recovery(bbox, image) {
                // Recovery refused, so the object is Lost. Lost identities
                // are never revived; the detection becomes a new object.
                registered.push(self.register(bbox, image));
            }
        }
        Ok(registered)
    }

    fn register(&mut self, bbox: BoundingBox, image: &B::Image) -> Uuid {
        let tracker = self.backend.create_tracker();
        let object = TrackedObject::new(bbox, self.config.recovery_threshold, tracker, image);
        let id = object.id();
        debug!(target: "tracking", "registered object {} at {}", id, bbox);
        // Appended entries keep slot == position, so the index stays in
        // step without a rebuild and the rest of this ingest pass can
        // already match against the new object.
        self.index
            .insert(self.tracked_objects.len(), object.last_known_location());
        self.tracked_objects.push(object);
        id
    }

    /// Advances every live object's visual tracker one frame, letting
    /// objects the tracker lost decay through their state machine, then
    /// rebuilds the spatial index from the updated locations.
    pub fn update(&mut self, image: &B::Image) {
        for object in self.tracked_objects.iter_mut() {
            object.update(image);
        }
        self.rebuild_index();
    }

    /// Drops every object in the `Lost` state and rebuilds the index.
    ///
    /// Never invoked automatically: long-running callers must schedule
    /// this themselves or the live collection grows without bound.
    pub fn remove_lost_objects(&mut self) {
        let before = self.tracked_objects.len();
        self.tracked_objects
            .retain(|object| object.state() != TrackState::Lost);
        let dropped = before - self.tracked_objects.len();
        if dropped > 0 {
            debug!(
                target: "tracking",
                "evicted {} lost object(s), {} remain", dropped, self.tracked_objects.len()
            );
        }
        self.rebuild_index();
    }

    /// Removes the given objects by id and rebuilds the index.
    pub fn remove(&mut self, ids: &[Uuid]) {
        self.tracked_objects
            .retain(|object| !ids.contains(&object.id()));
        self.rebuild_index();
    }

    /// Runs one full frame cycle as a pipeline step: ingest the frame's
    /// detections, advance every tracker, and publish a snapshot of the
    /// live objects on the outgoing frame.
    pub fn process_frame(
        &mut self,
        frame: VideoFrame<B::Image>,
    ) -> Result<VideoFrame<B::Image>, TrackerError> {
        self.ingest(&frame.detections, &frame.pixels)?;
        self.update(&frame.pixels);
        let tracked_objects = self
            .tracked_objects
            .iter()
            .map(|object| TrackSnapshot {
                id: object.id(),
                state: object.state(),
                bounding_box: object.last_known_location(),
            })
            .collect();
        Ok(VideoFrame {
            pixels: frame.pixels,
            detections: frame.detections,
            tracked_objects,
        })
    }

    fn rebuild_index(&mut self) {
        self.index
            .rebuild(self.tracked_objects.iter().map(|object| object.last_known_location()));
    }
}

use std::fmt;
impl<B: TrackerBackend> fmt::Display for MultiObjectTracker<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "IoU threshold: {}\n\tRecovery threshold: {}s\n\tLive objects: {}",
            self.config.iou_threshold,
            self.config.recovery_threshold,
            self.tracked_objects.len()
        )
    }
}
