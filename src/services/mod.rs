pub mod cursor_broadcaster;
pub mod dispatcher;
pub mod dwell_detector;
pub mod gaze_source;
pub mod request_board;
pub mod request_profiles;

pub use cursor_broadcaster::{CursorBroadcaster, SubscriptionId};
pub use dispatcher::create_dispatcher;
pub use dwell_detector::{DwellConfig, DwellDetector};
pub use gaze_source::create_gaze_source;
pub use request_board::RequestBoard;
