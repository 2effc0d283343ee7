use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::GazeSample;
use crate::services::CursorBroadcaster;
use crate::vistra_error;
use std::path::Path;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::info;

use super::r#trait::GazeSourceTrait;

/// ReplayGazeSource: воспроизведение записанных кадров взгляда из файла.
///
/// Формат файла: по кадру на строку, "x y z" (float), пустые строки и
/// строки с '#' пропускаются. Поток зацикливается: панель должна жить
/// дольше любой записи.
pub struct ReplayGazeSource {
    config: Arc<Config>,
    broadcaster: Arc<CursorBroadcaster>,
    samples: Vec<GazeSample>,
}

impl ReplayGazeSource {
    pub fn new(config: Arc<Config>, broadcaster: Arc<CursorBroadcaster>) -> Result<Self> {
        info!("Инициализация ReplayGazeSource");

        let path = Path::new(&config.gaze.sample_path);
        if !path.exists() {
            return Err(vistra_error!(
                source_unavailable,
                "Файл кадров {:?} не найден; укажите gaze.sample_path или запустите с --dry-run",
                path
            ));
        }

        let contents = std::fs::read_to_string(path)?;
        let samples = parse_samples(&contents)?;

        if samples.is_empty() {
            return Err(vistra_error!(
                source_unavailable,
                "Файл кадров {:?} не содержит ни одного кадра",
                path
            ));
        }

        info!(
            "Загружено {} кадров взгляда из {:?}",
            samples.len(),
            path
        );

        Ok(Self {
            config,
            broadcaster,
            samples,
        })
    }

    async fn run_impl(self) -> Result<()> {
        info!(
            "ReplayGazeSource запущен: {} кадров, интервал {}мс",
            self.samples.len(),
            self.config.gaze.sample_interval_ms
        );

        let mapping = self.config.gaze.mapping;
        let mut ticker = interval(Duration::from_millis(self.config.gaze.sample_interval_ms));
        let mut index = 0usize;

        loop {
            ticker.tick().await;

            let sample = self.samples[index];
            let pos = mapping.project(sample);
            self.broadcaster.update(pos.x, pos.y);

            index += 1;
            if index == self.samples.len() {
                index = 0;
                debug_if_enabled!("Запись кадров закончилась, начинаем сначала");
            }
        }
    }
}

#[async_trait::async_trait]
impl GazeSourceTrait for ReplayGazeSource {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}

/// Разбор содержимого файла кадров
fn parse_samples(contents: &str) -> Result<Vec<GazeSample>> {
    let mut samples = Vec::new();

    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let sample = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(x), Some(y), Some(z), None) => {
                let parse = |v: &str| -> Result<f32> {
                    v.parse::<f32>().map_err(|e| {
                        vistra_error!(
                            internal,
                            "Строка {}: неверное число \"{}\": {}",
                            line_no + 1,
                            v,
                            e
                        )
                    })
                };
                GazeSample::new(parse(x)?, parse(y)?, parse(z)?)
            }
            _ => {
                return Err(vistra_error!(
                    internal,
                    "Строка {}: ожидается \"x y z\", получено \"{}\"",
                    line_no + 1,
                    line
                ))
            }
        };

        samples.push(sample);
    }

    Ok(samples)
}
