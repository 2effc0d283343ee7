use serde::{Deserialize, Serialize};
use std::fmt;

/// Позиция курсора на экране (логические пиксели, начало координат — левый верхний угол)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

impl CursorPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for CursorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Сырой кадр датчика взгляда: усреднённый 3D-вектор направления обоих глаз
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl GazeSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for GazeSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}, {:.3}]", self.x, self.y, self.z)
    }
}

/// Проекция 3D-направления взгляда в экранные координаты.
///
/// Параметры масштаба и смещения — конфигурация, а не часть контракта
/// state machine. Значения по умолчанию соответствуют отображению
/// `(v + 1) * 200`, откалиброванному под фронтальную камеру планшета.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GazeMapping {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for GazeMapping {
    fn default() -> Self {
        Self {
            scale_x: 200.0,
            scale_y: 200.0,
            offset_x: 200.0,
            offset_y: 200.0,
        }
    }
}

impl GazeMapping {
    /// Спроецировать кадр датчика в экранную позицию курсора.
    /// Ось z не участвует: глубина взгляда для плоского экрана не нужна.
    pub fn project(&self, sample: GazeSample) -> CursorPosition {
        CursorPosition {
            x: sample.x as f64 * self.scale_x + self.offset_x,
            y: sample.y as f64 * self.scale_y + self.offset_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping_matches_calibration() {
        let mapping = GazeMapping::default();

        // Центр взгляда (0, 0, -1) попадает в точку (200, 200)
        let center = mapping.project(GazeSample::new(0.0, 0.0, -1.0));
        assert_eq!(center, CursorPosition::new(200.0, 200.0));

        // Крайние значения [-1; 1] растягиваются в [0; 400]
        let corner = mapping.project(GazeSample::new(1.0, -1.0, -1.0));
        assert_eq!(corner, CursorPosition::new(400.0, 0.0));
    }

    #[test]
    fn test_custom_mapping_ignores_depth() {
        let mapping = GazeMapping {
            scale_x: 100.0,
            scale_y: 50.0,
            offset_x: 10.0,
            offset_y: 20.0,
        };

        let near = mapping.project(GazeSample::new(0.5, 0.5, -0.1));
        let far = mapping.project(GazeSample::new(0.5, 0.5, -10.0));
        assert_eq!(near, far);
        assert_eq!(near, CursorPosition::new(60.0, 45.0));
    }
}
