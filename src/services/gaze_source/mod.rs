//! GazeSource service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for producing a
//! stream of gaze samples and pushing the projected 2D position into the
//! CursorBroadcaster. It MUST NOT know anything about targets, bounds or
//! dwell timing; those decisions belong to DwellDetector.

mod replay;
mod simulated;
mod r#trait;

pub use self::r#trait::{create_gaze_source, GazeSourceTrait};
