use crate::config::Config;
use crate::error::Result;
use crate::services::CursorBroadcaster;
use std::sync::Arc;

/// Trait for gaze sources that can run in different modes
#[async_trait::async_trait]
pub trait GazeSourceTrait {
    /// Run the gaze source
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate gaze source.
///
/// The sensor itself is a platform black box; this crate only sees its
/// sample stream. `dry_run` forces the simulated source; otherwise the
/// configured mode decides. A replay source whose sample file is missing
/// reports `SourceUnavailable` instead of pretending hardware exists.
pub fn create_gaze_source(
    config: Arc<Config>,
    broadcaster: Arc<CursorBroadcaster>,
    dry_run: bool,
) -> Result<Box<dyn GazeSourceTrait + Send>> {
    if dry_run {
        return Ok(Box::new(super::simulated::SimulatedGazeSource::new(
            config,
            broadcaster,
        )));
    }

    match config.gaze.source_mode.as_str() {
        "simulated" => Ok(Box::new(super::simulated::SimulatedGazeSource::new(
            config,
            broadcaster,
        ))),
        "replay" => Ok(Box::new(super::replay::ReplayGazeSource::new(
            config,
            broadcaster,
        )?)),
        mode => Err(crate::vistra_error!(
            internal,
            "Неизвестный режим источника взгляда: {}",
            mode
        )),
    }
}
