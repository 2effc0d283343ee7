use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::GazeSample;
use crate::services::CursorBroadcaster;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::info;

use super::r#trait::GazeSourceTrait;

/// SimulatedGazeSource: синтетический источник для dry-run и стендов
/// без датчика. Медленно водит взгляд по лемнискате в диапазоне [-1; 1],
/// так что курсор по очереди проходит через цели панели.
pub struct SimulatedGazeSource {
    config: Arc<Config>,
    broadcaster: Arc<CursorBroadcaster>,
}

impl SimulatedGazeSource {
    pub fn new(config: Arc<Config>, broadcaster: Arc<CursorBroadcaster>) -> Self {
        info!("Инициализация SimulatedGazeSource");
        Self {
            config,
            broadcaster,
        }
    }

    async fn run_impl(self) -> Result<()> {
        info!(
            "Эмуляция взгляда запущена, интервал {}мс",
            self.config.gaze.sample_interval_ms
        );

        let mapping = self.config.gaze.mapping;
        let mut ticker = interval(Duration::from_millis(self.config.gaze.sample_interval_ms));
        let mut tick: u64 = 0;

        loop {
            ticker.tick().await;

            // Один оборот примерно за 20 секунд при интервале 33мс
            let t = tick as f32 * 0.01;
            let sample = GazeSample::new(t.sin(), (2.0 * t).sin() * 0.5, -1.0);

            let pos = mapping.project(sample);
            self.broadcaster.update(pos.x, pos.y);

            tick += 1;
            if tick % 300 == 0 {
                debug_if_enabled!("Эмуляция: кадр {}, курсор {}", tick, pos);
            }
        }
    }
}

#[async_trait::async_trait]
impl GazeSourceTrait for SimulatedGazeSource {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
