//! Export contents of `track` folder
mod bbox;
mod detection;
mod detector;
mod engine;
mod errors;
mod frame;
mod spatial;
mod tracked_object;
mod visual;

pub use self::{
    bbox::*,
    detection::*,
    detector::*,
    engine::*,
    errors::*,
    frame::*,
    spatial::*,
    tracked_object::*,
    visual::*,
};
