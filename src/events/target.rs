use serde::{Deserialize, Serialize};
use std::fmt;

use super::cursor::CursorPosition;

/// Идентификатор цели на экране
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u32);

impl TargetId {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TARGET_{}", self.0)
    }
}

/// Прямоугольник цели в экранных координатах (той же системе, что и курсор).
///
/// Обновляется хостом при каждом изменении раскладки: стабильность
/// геометрии между перерисовками не гарантируется.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TargetBounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Проверка попадания точки в прямоугольник. Границы включительные:
    /// курсор ровно на ребре считается внутри. Вырожденный прямоугольник
    /// (нулевая или отрицательная сторона) не содержит ни одной точки.
    pub fn contains(&self, pos: CursorPosition) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 {
            return false;
        }
        pos.x >= self.x
            && pos.x <= self.x + self.width
            && pos.y >= self.y
            && pos.y <= self.y + self.height
    }
}

impl fmt::Display for TargetBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}+{:.0}+{:.0}",
            self.width, self.height, self.x, self.y
        )
    }
}

/// Вид запроса пациента, привязанный к цели
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    Ice,
    Food,
    Water,
    Medication,
    Bathroom,
    Lights,
    /// Переключатель записи голосового сообщения
    Message,
    EmergencyCall,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ice => "ice",
            Self::Food => "food",
            Self::Water => "water",
            Self::Medication => "medication",
            Self::Bathroom => "bathroom",
            Self::Lights => "lights",
            Self::Message => "message",
            Self::EmergencyCall => "emergency-call",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ice" => Some(Self::Ice),
            "food" => Some(Self::Food),
            "water" => Some(Self::Water),
            "medication" => Some(Self::Medication),
            "bathroom" => Some(Self::Bathroom),
            "lights" => Some(Self::Lights),
            "message" => Some(Self::Message),
            "emergency-call" => Some(Self::EmergencyCall),
            _ => None,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_inclusive_corners() {
        let bounds = TargetBounds::new(10.0, 20.0, 100.0, 50.0);

        // Все четыре угла включительно
        assert!(bounds.contains(CursorPosition::new(10.0, 20.0)));
        assert!(bounds.contains(CursorPosition::new(110.0, 20.0)));
        assert!(bounds.contains(CursorPosition::new(10.0, 70.0)));
        assert!(bounds.contains(CursorPosition::new(110.0, 70.0)));

        assert!(bounds.contains(CursorPosition::new(60.0, 45.0)));
    }

    #[test]
    fn test_contains_outside() {
        let bounds = TargetBounds::new(0.0, 0.0, 100.0, 100.0);

        assert!(!bounds.contains(CursorPosition::new(-0.001, 50.0)));
        assert!(!bounds.contains(CursorPosition::new(100.001, 50.0)));
        assert!(!bounds.contains(CursorPosition::new(50.0, -0.001)));
        assert!(!bounds.contains(CursorPosition::new(50.0, 100.001)));
    }

    #[test]
    fn test_degenerate_bounds_never_contain() {
        let zero_width = TargetBounds::new(10.0, 10.0, 0.0, 50.0);
        let negative_height = TargetBounds::new(10.0, 10.0, 50.0, -5.0);

        // Даже точка на самой линии не считается внутри
        assert!(!zero_width.contains(CursorPosition::new(10.0, 30.0)));
        assert!(!negative_height.contains(CursorPosition::new(20.0, 10.0)));
    }

    #[test]
    fn test_request_kind_roundtrip() {
        let kinds = [
            RequestKind::Ice,
            RequestKind::Food,
            RequestKind::Water,
            RequestKind::Medication,
            RequestKind::Bathroom,
            RequestKind::Lights,
            RequestKind::Message,
            RequestKind::EmergencyCall,
        ];

        for kind in kinds {
            assert_eq!(RequestKind::from_str(kind.as_str()), Some(kind));
        }

        assert_eq!(RequestKind::from_str("coffee"), None);
    }
}
