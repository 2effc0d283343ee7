use thiserror::Error;

#[derive(Error, Debug)]
pub enum VistraError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка D-Bus: {0}")]
    DBus(#[from] zbus::Error),

    #[error("Источник взгляда недоступен: {0}")]
    SourceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, VistraError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! vistra_error {
    (source_unavailable, $($arg:tt)*) => {
        $crate::error::VistraError::SourceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::VistraError::Internal(format!($($arg)*))
    };
}
