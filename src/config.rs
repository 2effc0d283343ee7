use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::events::{GazeMapping, RequestKind, TargetBounds};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub gaze: GazeConfig,
    pub screen: ScreenConfig,
    pub board: BoardConfig,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GazeConfig {
    /// Режим источника: "replay" (воспроизведение записанных кадров) или "simulated"
    pub source_mode: String,
    /// Путь к файлу с кадрами для режима replay (строки "x y z")
    pub sample_path: String,
    /// Интервал выдачи кадров, мс
    pub sample_interval_ms: u64,
    /// Проекция 3D-направления взгляда в экранные координаты
    #[serde(default)]
    pub mapping: GazeMapping,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ScreenConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardConfig {
    /// Число колонок сетки запросов
    pub columns: u32,
    /// Отступ вокруг ячеек сетки, логические пиксели
    pub margin: f64,
    /// Порог dwell по умолчанию для всех целей, мс
    pub dwell_duration_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetConfig {
    pub label: String,
    pub kind: RequestKind,
    /// Индивидуальный порог dwell; без него берётся board.dwell_duration_ms
    #[serde(default)]
    pub dwell_duration_ms: Option<u64>,
    /// Явный прямоугольник для целей вне сетки (например, боковая кнопка вызова)
    #[serde(default)]
    pub bounds: Option<TargetBounds>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                filter: "vistra_rust=info".to_string(),
            },
            gaze: GazeConfig {
                source_mode: "replay".to_string(),
                sample_path: "gaze-samples.log".to_string(),
                sample_interval_ms: 33,
                mapping: GazeMapping::default(),
            },
            screen: ScreenConfig {
                width: 1280.0,
                height: 800.0,
            },
            board: BoardConfig {
                columns: 3,
                margin: 30.0,
                dwell_duration_ms: 4000,
            },
            targets: Self::default_targets(),
        }
    }
}

impl Config {
    /// Набор целей оригинальной панели: сетка запросов, запись сообщения
    /// и боковая кнопка экстренного вызова с явной геометрией.
    fn default_targets() -> Vec<TargetConfig> {
        let grid = [
            ("Ice", RequestKind::Ice),
            ("Food", RequestKind::Food),
            ("Water", RequestKind::Water),
            ("Medication", RequestKind::Medication),
            ("Bathroom", RequestKind::Bathroom),
            ("Lights", RequestKind::Lights),
            ("Message", RequestKind::Message),
        ];

        let mut targets: Vec<TargetConfig> = grid
            .iter()
            .map(|(label, kind)| TargetConfig {
                label: label.to_string(),
                kind: *kind,
                dwell_duration_ms: None,
                bounds: None,
            })
            .collect();

        targets.push(TargetConfig {
            label: "Call".to_string(),
            kind: RequestKind::EmergencyCall,
            dwell_duration_ms: None,
            bounds: Some(TargetBounds::new(0.0, 0.0, 120.0, 800.0)),
        });

        targets
    }

    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("VISTRA_"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация источника взгляда
        match self.gaze.source_mode.as_str() {
            "replay" | "simulated" => {}
            _ => anyhow::bail!("Неверный режим источника взгляда: {}", self.gaze.source_mode),
        }

        if self.gaze.sample_interval_ms == 0 {
            anyhow::bail!("sample_interval_ms должно быть больше 0");
        }

        // Валидация экрана и сетки
        if self.screen.width <= 0.0 || self.screen.height <= 0.0 {
            anyhow::bail!(
                "Размеры экрана должны быть положительными: {}x{}",
                self.screen.width,
                self.screen.height
            );
        }

        if self.board.columns == 0 {
            anyhow::bail!("board.columns должно быть больше 0");
        }

        if self.board.margin < 0.0 {
            anyhow::bail!("board.margin не может быть отрицательным");
        }

        if self.board.dwell_duration_ms == 0 {
            anyhow::bail!("dwell_duration_ms должно быть больше 0");
        }

        // Валидация целей
        for (i, target) in self.targets.iter().enumerate() {
            if target.label.is_empty() {
                anyhow::bail!("Пустая метка цели #{}", i + 1);
            }

            if let Some(dwell) = target.dwell_duration_ms {
                if dwell == 0 {
                    anyhow::bail!(
                        "dwell_duration_ms цели \"{}\" должно быть больше 0",
                        target.label
                    );
                }
            }
        }

        Ok(())
    }

    /// Эффективный порог dwell для цели: индивидуальный или общий
    pub fn dwell_duration_for(&self, target: &TargetConfig) -> u64 {
        target
            .dwell_duration_ms
            .unwrap_or(self.board.dwell_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_targets_cover_request_grid() {
        let config = Config::default();

        let kinds: Vec<RequestKind> = config.targets.iter().map(|t| t.kind).collect();
        assert!(kinds.contains(&RequestKind::Ice));
        assert!(kinds.contains(&RequestKind::EmergencyCall));

        // Кнопка вызова расположена вне сетки
        let call = config
            .targets
            .iter()
            .find(|t| t.kind == RequestKind::EmergencyCall)
            .unwrap();
        assert!(call.bounds.is_some());
    }

    #[test]
    fn test_dwell_duration_override() {
        let mut config = Config::default();
        config.board.dwell_duration_ms = 4000;
        config.targets[0].dwell_duration_ms = Some(2500);

        assert_eq!(config.dwell_duration_for(&config.targets[0]), 2500);
        assert_eq!(config.dwell_duration_for(&config.targets[1]), 4000);
    }

    #[test]
    fn test_validation_rejects_zero_dwell() {
        let mut config = Config::default();
        config.board.dwell_duration_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.targets[0].dwell_duration_ms = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_source_mode() {
        let mut config = Config::default();
        config.gaze.source_mode = "arkit".to_string();
        assert!(config.validate().is_err());
    }
}
