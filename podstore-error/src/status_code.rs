use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "serde_repr")]
use serde_repr::{Deserialize_repr, Serialize_repr};
#[cfg(feature = "strum")]
use strum_macros::{AsRefStr, EnumIter};

/// Коды результата операций движка.
///
/// Числовые значения стабильны: они совпадают с кодами, которые видит слой
/// привязок к другим языкам, поэтому менять их нельзя.
///
/// # Реализация:
/// - `num_enum::TryFromPrimitive` даёт нативную реализацию `TryFrom<u32>`.
/// - опционально: `strum` для `AsRefStr`/`EnumIter` (feature = "strum").
/// - опционально: `serde_repr` для сериализации в виде числового значения
///   (feature = "serde_repr").
#[cfg_attr(feature = "strum", derive(AsRefStr, EnumIter))]
#[cfg_attr(feature = "serde_repr", derive(Serialize_repr, Deserialize_repr))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u32)]
pub enum StatusCode {
    /// Операция выполнена успешно.
    Success = 0,
    /// Чтение из элемента, которому ещё не присвоено значение.
    UnassignedBlock = 1,
    /// Запрошенный тип не совпадает с сохранённым.
    TypeMismatch = 2,
    /// Запрошено больше значений, чем хранится.
    OutOfRange = 3,
    /// Файл повреждён (структура или контрольная сумма).
    FileCorrupt = 4,
    /// Не удалось открыть, прочитать или записать файл.
    FileNotFound = 5,
    /// Некорректный аргумент.
    ArgumentError = 6,
    /// Ошибка кодека сжатия при записи.
    CompressionError = 7,
    /// Недействительный (устаревший) дескриптор элемента.
    NullReference = 8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Пытается получить вариант `StatusCode` из `u32`.
    ///
    /// Использует `TryFrom<u32>` из `num_enum`; возвращает `None`, если
    /// значение не соответствует ни одному варианту.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// Вернёт `true`, если переданный `code` означает успешный результат.
    pub fn is_success(code: u32) -> bool {
        Self::Success as u32 == code
    }

    /// Ожидаемый, не фатальный исход: ключ есть, но значения ещё нет.
    ///
    /// Вызывающий код отличает его от настоящих ошибок декодирования.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::UnassignedBlock)
    }

    /// Требуется ли логировать как критическую ошибку.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::FileCorrupt | Self::CompressionError)
    }

    /// Рекомендуемый уровень логирования для данного кода.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::UnassignedBlock => LogLevel::Debug,
            Self::TypeMismatch | Self::OutOfRange | Self::ArgumentError | Self::NullReference => {
                LogLevel::Info
            }
            Self::FileNotFound => LogLevel::Warn,
            Self::FileCorrupt | Self::CompressionError => LogLevel::Error,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        // Если включён feature "strum", используем human-readable имя (AsRefStr).
        // Иначе - Debug-имя.
        #[cfg(feature = "strum")]
        {
            write!(f, "{} ({})", self.as_ref(), self.code())
        }
        #[cfg(not(feature = "strum"))]
        {
            write!(f, "{:?} ({})", self, self.code())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
