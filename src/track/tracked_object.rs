use std::fmt;

use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use crate::track::bbox::BoundingBox;
use crate::track::visual::VisualTracker;

/// Lifecycle states of a tracked object.
///
/// `Tracking`: the object is confidently located by its visual tracker.
/// `Missing`: the object may be occluded or gone from the video; still
/// recoverable through detection association.
/// `Lost`: the object has been unseen longer than its recovery threshold.
/// This is an end state; no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackState {
    Tracking,
    Missing,
    Lost,
}

impl fmt::Display for TrackState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TrackState::Tracking => "TRACKING",
            TrackState::Missing => "MISSING",
            TrackState::Lost => "LOST",
        };
        write!(f, "{}", name)
    }
}

/// Persistent identity maintained across frames.
///
/// Owns its visual tracker and the timestamps the wall-clock lifecycle
/// decisions run on. First known location is fixed at creation; last
/// known location moves with every confirmed sighting.
///
/// Basic usage:
///
/// ```
/// use retrack_rs::track::{BoundingBox, StaticTracker, TrackState, TrackedObject};
/// let bbox = BoundingBox::new(10.0, 10.0, 32.0, 32.0).unwrap();
/// let object = TrackedObject::new(bbox, 3.0, StaticTracker::default(), &());
/// assert_eq!(object.state(), TrackState::Tracking);
/// assert_eq!(object.total_distance_traveled(), 0.0);
/// ```
pub struct TrackedObject<T: VisualTracker> {
    id: Uuid,
    state: TrackState,
    first_known_location: BoundingBox,
    first_seen_at: DateTime<Utc>,
    last_known_location: BoundingBox,
    last_seen_at: DateTime<Utc>,
    recovery_threshold: f64,
    tracker: T,
}

impl<T: VisualTracker> TrackedObject<T> {
    /// Registers a new identity at `bbox` and binds `tracker` to that
    /// image region. `recovery_threshold` is the grace period in seconds
    /// before a missing object is given up on.
    pub fn new(bbox: BoundingBox, recovery_threshold: f64, mut tracker: T, image: &T::Image) -> Self {
        tracker.initialize(image, &bbox);
        let now = Utc::now();
        TrackedObject {
            id: Uuid::new_v4(),
            state: TrackState::Tracking,
            first_known_location: bbox,
            first_seen_at: now,
            last_known_location: bbox,
            last_seen_at: now,
            recovery_threshold,
            tracker,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn state(&self) -> TrackState {
        self.state
    }
    pub fn first_known_location(&self) -> BoundingBox {
        self.first_known_location
    }
    pub fn first_seen_at(&self) -> DateTime<Utc> {
        self.first_seen_at
    }
    pub fn last_known_location(&self) -> BoundingBox {
        self.last_known_location
    }
    pub fn last_seen_at(&self) -> DateTime<Utc> {
        self.last_seen_at
    }
    pub fn recovery_threshold(&self) -> f64 {
        self.recovery_threshold
    }

    /// Confirms the object at `bbox` now and returns it to `Tracking`.
    pub fn record_location(&mut self, bbox: BoundingBox) {
        self.last_known_location = bbox;
        self.last_seen_at = Utc::now();
        self.state = TrackState::Tracking;
    }

    /// Reports that the object could not be located this frame.
    ///
    /// No-op once `Lost`. Otherwise the decision is purely time-based,
    /// independent of the current state: unseen for longer than the
    /// recovery threshold means `Lost`, else `Missing`. A long gap
    /// between frame deliveries can therefore take an object straight
    /// from `Tracking` to `Lost`.
    pub fn report_missing(&mut self) {
        if self.state == TrackState::Lost {
            // Lost is an end state not meant for recovery.
            return;
        }
        if self.seconds_since_last_seen() > self.recovery_threshold {
            debug!(
                target: "tracking",
                "object {} unseen beyond {:.2}s, giving up", self.id, self.recovery_threshold
            );
            self.state = TrackState::Lost;
            return;
        }
        self.state = TrackState::Missing;
    }

    /// Detector-assisted recovery: re-seeds the object at `bbox` and
    /// re-initializes its visual tracker there.
    ///
    /// Refused once `Lost`: a lost identity is never revived; a fresh
    /// detection creates a new one instead. Returns whether the object
    /// was recovered.
    pub fn attempt_recovery(&mut self, bbox: BoundingBox, image: &T::Image) -> bool {
        if self.state == TrackState::Lost {
            return false;
        }
        self.record_location(bbox);
        self.tracker.initialize(image, &bbox);
        true
    }

    /// Advances the visual tracker one frame. On success the reported box
    /// becomes the last known location; on failure the object is reported
    /// missing and the previous last known location is returned.
    pub fn update(&mut self, image: &T::Image) -> (bool, BoundingBox) {
        let (ok, updated) = self.tracker.update(image);
        if !ok {
            self.report_missing();
            return (false, self.last_known_location);
        }
        self.record_location(updated);
        (true, self.last_known_location)
    }

    /// Seconds since the object was first registered.
    pub fn age_seconds(&self) -> f64 {
        seconds_since(self.first_seen_at)
    }

    /// Seconds since the last confirmed location.
    pub fn seconds_since_last_seen(&self) -> f64 {
        seconds_since(self.last_seen_at)
    }

    /// Distance between the centers of the first and last known
    /// locations.
    pub fn total_distance_traveled(&self) -> f64 {
        self.first_known_location
            .distance_to(&self.last_known_location)
    }
}

fn seconds_since(moment: DateTime<Utc>) -> f64 {
    let elapsed = Utc::now() - moment;
    match elapsed.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => elapsed.num_milliseconds() as f64 / 1_000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::thread::sleep;
    use std::time::Duration;

    struct ScriptedTracker {
        outcomes: VecDeque<bool>,
        bbox: BoundingBox,
        initializations: Rc<Cell<usize>>,
    }

    impl ScriptedTracker {
        fn new(outcomes: &[bool]) -> Self {
            ScriptedTracker {
                outcomes: outcomes.iter().copied().collect(),
                bbox: BoundingBox::default(),
                initializations: Rc::new(Cell::new(0)),
            }
        }

        fn init_counter(&self) -> Rc<Cell<usize>> {
            Rc::clone(&self.initializations)
        }
    }

    impl VisualTracker for ScriptedTracker {
        type Image = ();

        fn initialize(&mut self, _image: &(), bbox: &BoundingBox) {
            self.initializations.set(self.initializations.get() + 1);
            self.bbox = *bbox;
        }

        fn update(&mut self, _image: &()) -> (bool, BoundingBox) {
            let ok = self.outcomes.pop_front().unwrap_or(true);
            (ok, self.bbox)
        }
    }

    fn bbox(x: f64, y: f64, width: f64, height: f64) -> BoundingBox {
        BoundingBox::new(x, y, width, height).unwrap()
    }

    #[test]
    fn test_new_object_starts_tracking() {
        let b = bbox(10.0, 10.0, 20.0, 20.0);
        let object = TrackedObject::new(b, 3.0, ScriptedTracker::new(&[]), &());
        assert_eq!(object.state(), TrackState::Tracking);
        assert_eq!(object.first_known_location(), b);
        assert_eq!(object.last_known_location(), b);
        assert_eq!(object.total_distance_traveled(), 0.0);
        assert!(object.age_seconds() >= 0.0);
    }

    #[test]
    fn test_missing_within_grace_period() {
        let mut object =
            TrackedObject::new(bbox(0.0, 0.0, 10.0, 10.0), 100.0, ScriptedTracker::new(&[]), &());
        object.report_missing();
        assert_eq!(object.state(), TrackState::Missing);
        object.report_missing();
        assert_eq!(object.state(), TrackState::Missing);
    }

    #[test]
    fn test_lost_after_grace_period_expires() {
        let mut object =
            TrackedObject::new(bbox(0.0, 0.0, 10.0, 10.0), 0.001, ScriptedTracker::new(&[]), &());
        sleep(Duration::from_millis(5));
        // Straight from Tracking to Lost: the decision only looks at time.
        object.report_missing();
        assert_eq!(object.state(), TrackState::Lost);
        object.report_missing();
        assert_eq!(object.state(), TrackState::Lost);
    }

    #[test]
    fn test_recovery_refused_once_lost() {
        let first = bbox(0.0, 0.0, 10.0, 10.0);
        let mut object = TrackedObject::new(first, 0.001, ScriptedTracker::new(&[]), &());
        sleep(Duration::from_millis(5));
        object.report_missing();
        assert_eq!(object.state(), TrackState::Lost);

        let recovered = object.attempt_recovery(bbox(1.0, 1.0, 10.0, 10.0), &());
        assert!(!recovered);
        assert_eq!(object.state(), TrackState::Lost);
        assert_eq!(object.last_known_location(), first);
    }

    #[test]
    fn test_recovery_reseeds_missing_object() {
        let tracker = ScriptedTracker::new(&[]);
        let initializations = tracker.init_counter();
        let mut object = TrackedObject::new(bbox(0.0, 0.0, 10.0, 10.0), 100.0, tracker, &());
        object.report_missing();

        let reacquired = bbox(4.0, 2.0, 10.0, 10.0);
        assert!(object.attempt_recovery(reacquired, &()));
        assert_eq!(object.state(), TrackState::Tracking);
        assert_eq!(object.last_known_location(), reacquired);
        // Once at creation, once at recovery.
        assert_eq!(initializations.get(), 2);
    }

    #[test]
    fn test_update_success_moves_location() {
        let start = bbox(0.0, 0.0, 10.0, 10.0);
        let mut object = TrackedObject::new(start, 100.0, ScriptedTracker::new(&[true]), &());
        let (ok, reported) = object.update(&());
        assert!(ok);
        assert_eq!(reported, start);
        assert_eq!(object.state(), TrackState::Tracking);
    }

    #[test]
    fn test_update_failure_keeps_last_location() {
        let start = bbox(0.0, 0.0, 10.0, 10.0);
        let mut object = TrackedObject::new(start, 100.0, ScriptedTracker::new(&[false]), &());
        let (ok, reported) = object.update(&());
        assert!(!ok);
        assert_eq!(reported, start);
        assert_eq!(object.state(), TrackState::Missing);
    }

    #[test]
    fn test_total_distance_traveled() {
        let mut object =
            TrackedObject::new(bbox(0.0, 0.0, 10.0, 10.0), 100.0, ScriptedTracker::new(&[]), &());
        object.record_location(bbox(30.0, 40.0, 10.0, 10.0));
        assert!((object.total_distance_traveled() - 50.0).abs() < 1e-9);
    }
}
