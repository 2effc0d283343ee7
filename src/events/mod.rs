pub mod cursor;
pub mod target;

pub use cursor::{CursorPosition, GazeMapping, GazeSample};
pub use target::{RequestKind, TargetBounds, TargetId};

/// Событие активации цели: ровно одно на завершённый непрерывный dwell
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationEvent {
    pub target: TargetId,
    pub label: String,
    pub kind: RequestKind,
    /// Порог dwell, который был выдержан, в миллисекундах
    pub dwell_ms: u64,
    pub timestamp: std::time::Instant,
}

impl ActivationEvent {
    pub fn new(target: TargetId, label: String, kind: RequestKind, dwell_ms: u64) -> Self {
        Self {
            target,
            label,
            kind,
            dwell_ms,
            timestamp: std::time::Instant::now(),
        }
    }
}

impl std::fmt::Display for ActivationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} \"{}\" ({}, {}ms)",
            self.target, self.label, self.kind, self.dwell_ms
        )
    }
}
