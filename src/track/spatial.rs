use rstar::{RTree, RTreeObject, AABB};

use crate::track::bbox::BoundingBox;

// NOTE: The key of an entry is the object's slot (its position in the
// engine's collection), not its identity. Removing an object shifts the
// slots after it, so any membership or order change invalidates the
// whole index and requires a rebuild.
#[derive(Debug, Clone)]
struct SlotEnvelope {
    slot: usize,
    envelope: AABB<[i32; 2]>,
}

impl RTreeObject for SlotEnvelope {
    type Envelope = AABB<[i32; 2]>;

    fn envelope(&self) -> AABB<[i32; 2]> {
        self.envelope
    }
}

fn envelope_of(bbox: &BoundingBox) -> AABB<[i32; 2]> {
    AABB::from_corners([bbox.x1(), bbox.y1()], [bbox.x2(), bbox.y2()])
}

/// Rectangle-overlap index over the live objects' last known locations.
///
/// A coarse prefilter: `query` returns every slot whose stored envelope
/// intersects the query box's envelope, without ranking by IoU. Rebuilt
/// wholesale whenever locations or membership change; `insert` exists
/// only so newly registered objects become visible to the rest of the
/// same ingest pass.
///
/// Basic usage:
///
/// ```
/// use retrack_rs::track::{BoundingBox, SpatialIndex};
/// let mut index = SpatialIndex::new();
/// let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
/// index.rebuild([bbox]);
/// assert_eq!(index.query(&bbox), vec![0]);
/// ```
pub struct SpatialIndex {
    tree: RTree<SlotEnvelope>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        SpatialIndex { tree: RTree::new() }
    }

    /// Discards the index and reconstructs it in one pass from the given
    /// locations, keyed by their position in the iteration. An empty
    /// input yields an empty, queryable index.
    pub fn rebuild<L>(&mut self, locations: L)
    where
        L: IntoIterator<Item = BoundingBox>,
    {
        let entries: Vec<SlotEnvelope> = locations
            .into_iter()
            .enumerate()
            .map(|(slot, bbox)| SlotEnvelope {
                slot,
                envelope: envelope_of(&bbox),
            })
            .collect();
        self.tree = RTree::bulk_load(entries);
    }

    /// Adds one entry without touching the rest. Only valid for slots at
    /// the end of the backing collection (append-only growth).
    pub fn insert(&mut self, slot: usize, bbox: BoundingBox) {
        self.tree.insert(SlotEnvelope {
            slot,
            envelope: envelope_of(&bbox),
        });
    }

    /// Slots whose stored envelope intersects `bbox`'s envelope, in no
    /// particular order.
    pub fn query(&self, bbox: &BoundingBox) -> Vec<usize> {
        self.tree
            .locate_in_envelope_intersecting(&envelope_of(bbox))
            .map(|entry| entry.slot)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        SpatialIndex::new()
    }
}
