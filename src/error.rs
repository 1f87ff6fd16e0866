use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeystrokeError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Источник захвата не найден: {0}")]
    SourceNotFound(String),

    #[error("Источник '{name}' имеет неподдерживаемый тип: {kind}")]
    UnsupportedSource { name: String, kind: String },

    #[error("Некорректное описание источника: {0}")]
    InvalidSource(String),

    #[error("Активное окно недоступно: {0}")]
    WindowUnavailable(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl KeystrokeError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(KeystrokeError::DeviceNotFound(msg.into()))
    }

    /// Ошибки разрешения источника/окна не фатальны: захват просто запрещается
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            KeystrokeError::SourceNotFound(_)
                | KeystrokeError::UnsupportedSource { .. }
                | KeystrokeError::InvalidSource(_)
                | KeystrokeError::WindowUnavailable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, KeystrokeError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! ksh_error {
    (device_not_found, $($arg:tt)*) => {
        $crate::error::KeystrokeError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::KeystrokeError::Permission(format!($($arg)*))
    };
    (source_not_found, $($arg:tt)*) => {
        $crate::error::KeystrokeError::SourceNotFound(format!($($arg)*))
    };
    (invalid_source, $($arg:tt)*) => {
        $crate::error::KeystrokeError::InvalidSource(format!($($arg)*))
    };
    (window_unavailable, $($arg:tt)*) => {
        $crate::error::KeystrokeError::WindowUnavailable(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::KeystrokeError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::KeystrokeError::Internal(format!($($arg)*))
    };
}
