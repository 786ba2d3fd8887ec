//! Events published by the layout engine

mod coordinate_events;

pub use coordinate_events::CoordinateEvent;
