//! Persistent object identities across video frames.
//!
//! Detections come in once per frame; the association engine matches them
//! to already-known objects through a spatial index, recovers objects the
//! visual tracker misplaced, and ages unmatched ones through a wall-clock
//! lifecycle (tracking, missing, lost).

pub mod track;
pub mod utils;
