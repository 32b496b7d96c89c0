use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// Основная ошибка движка с контекстом для диагностики.
///
/// Каждый вариант сводится к одному [`StatusCode`]; подробности (смещение в
/// файле, ключ, ожидаемое и полученное значения) нужны только для логов.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodError {
    /// У элемента нет значения (count == 0) или ключа нет в контейнере
    UnassignedBlock { key: Option<String> },

    /// Запрошенный тип не совпадает с сохранённым
    TypeMismatch {
        stored: u32,
        requested: u32,
        key: Option<String>,
    },

    /// Запрошено больше значений, чем есть (или больше, чем допускает тип)
    OutOfRange {
        requested: u64,
        available: u64,
        key: Option<String>,
    },

    /// Дескриптор указывает на удалённый элемент
    NullReference { what: String },

    /// Некорректный аргумент вызова
    InvalidArgument { what: String, reason: String },

    /// Превышен лимит размера при записи
    SizeLimit {
        what: String,
        size: u64,
        limit: u64,
        key: Option<String>,
    },

    /// Ошибка файловой системы
    FileAccess {
        operation: FileOp,
        path: Option<String>,
        reason: String,
    },

    /// Неверный magic в заголовке
    InvalidMagic { expected: [u8; 4], got: [u8; 4] },

    /// Неподдерживаемая версия формата
    UnsupportedVersion { found: u8, supported: Vec<u8> },

    /// Вид контрольной суммы в файле отличается от запрошенного
    ChecksumKindMismatch { requested: String, recorded: String },

    /// Контрольная сумма не совпадает
    ChecksumMismatch { computed: u32, recorded: u32 },

    /// Неизвестный тег типа
    InvalidTag {
        tag: u32,
        offset: Option<u64>,
        key: Option<String>,
    },

    /// Повреждённые данные
    CorruptedData {
        reason: String,
        offset: Option<u64>,
        key: Option<String>,
        expected: Option<String>,
        got: Option<String>,
    },

    /// Неожиданный конец данных
    UnexpectedEof {
        context: String,
        offset: Option<u64>,
        key: Option<String>,
        expected_bytes: Option<u64>,
        got_bytes: Option<u64>,
    },

    /// Файл короче заголовка
    FileTooSmall { size: u64, minimum: u64 },

    /// Ошибка сжатия/распаковки
    CompressionError {
        operation: CompressionOp,
        reason: String,
    },
}

/// Тип операции сжатия для контекста ошибки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionOp {
    Compress,
    Decompress,
}

/// Файловая операция, на которой произошёл сбой.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    Open,
    Read,
    Write,
    Sync,
    Persist,
    Stream,
}

impl PodError {
    /// Конструктор для повреждённых данных без дополнительного контекста.
    pub fn corrupted(reason: impl Into<String>) -> Self {
        Self::CorruptedData {
            reason: reason.into(),
            offset: None,
            key: None,
            expected: None,
            got: None,
        }
    }

    /// Конструктор для некорректного аргумента.
    pub fn invalid_argument(
        what: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Оборачивает ошибку ввода-вывода с указанием операции и пути.
    pub fn file(
        operation: FileOp,
        path: impl Into<String>,
        err: &std::io::Error,
    ) -> Self {
        Self::FileAccess {
            operation,
            path: Some(path.into()),
            reason: err.to_string(),
        }
    }

    /// Добавляет контекст offset к ошибке.
    pub fn with_offset(
        mut self,
        offset: u64,
    ) -> Self {
        match &mut self {
            Self::InvalidTag { offset: o, .. }
            | Self::CorruptedData { offset: o, .. }
            | Self::UnexpectedEof { offset: o, .. } => {
                *o = Some(offset);
            }
            _ => {}
        }
        self
    }

    /// Добавляет контекст ключа к ошибке.
    pub fn with_key(
        mut self,
        key: impl Into<String>,
    ) -> Self {
        let k = Some(key.into());
        match &mut self {
            Self::UnassignedBlock { key: k2 }
            | Self::TypeMismatch { key: k2, .. }
            | Self::OutOfRange { key: k2, .. }
            | Self::SizeLimit { key: k2, .. }
            | Self::InvalidTag { key: k2, .. }
            | Self::CorruptedData { key: k2, .. }
            | Self::UnexpectedEof { key: k2, .. } => {
                *k2 = k;
            }
            _ => {}
        }
        self
    }

    /// Возвращает recovery hint для пользователя.
    pub fn recovery_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnassignedBlock { .. } => Some("Assign a value with set_values before reading"),
            Self::ChecksumKindMismatch { .. } | Self::ChecksumMismatch { .. } => {
                Some("Load with the same checksum kind and seed that were used to save")
            }
            Self::UnsupportedVersion { .. } => Some("Upgrade podstore to read this file"),
            Self::UnexpectedEof { .. } | Self::FileTooSmall { .. } => {
                Some("File may be truncated. Check file integrity")
            }
            Self::CorruptedData { .. } | Self::InvalidTag { .. } | Self::InvalidMagic { .. } => {
                Some("Try using a backup copy of the file")
            }
            Self::NullReference { .. } => Some("Look the item up again by key"),
            _ => None,
        }
    }
}

impl std::fmt::Display for PodError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::UnassignedBlock { key } => {
                write!(f, "Item has no assigned value")?;
                write_context(f, None, key.as_deref())
            }
            Self::TypeMismatch {
                stored,
                requested,
                key,
            } => {
                write!(
                    f,
                    "Type mismatch: stored 0x{stored:08X}, requested 0x{requested:08X}"
                )?;
                write_context(f, None, key.as_deref())
            }
            Self::OutOfRange {
                requested,
                available,
                key,
            } => {
                write!(
                    f,
                    "Requested {requested} values, only {available} available"
                )?;
                write_context(f, None, key.as_deref())
            }
            Self::NullReference { what } => write!(f, "Stale or invalid handle: {what}"),
            Self::InvalidArgument { what, reason } => {
                write!(f, "Invalid argument {what}: {reason}")
            }
            Self::SizeLimit {
                what,
                size,
                limit,
                key,
            } => {
                write!(f, "{what} size {size} exceeds limit {limit}")?;
                write_context(f, None, key.as_deref())
            }
            Self::FileAccess {
                operation,
                path,
                reason,
            } => {
                write!(f, "{operation} failed: {reason}")?;
                if let Some(p) = path {
                    write!(f, " (path: {p})")?;
                }
                Ok(())
            }
            Self::InvalidMagic { expected, got } => {
                write!(
                    f,
                    "Invalid magic number: expected {expected:?}, got {got:?}",
                )
            }
            Self::UnsupportedVersion { found, supported } => {
                write!(f, "Unsupported version {found} (supported: {supported:?})")
            }
            Self::ChecksumKindMismatch {
                requested,
                recorded,
            } => {
                write!(
                    f,
                    "Checksum kind mismatch: requested {requested}, file records {recorded}"
                )
            }
            Self::ChecksumMismatch { computed, recorded } => {
                write!(
                    f,
                    "Checksum mismatch: computed 0x{computed:08X}, recorded 0x{recorded:08X}",
                )
            }
            Self::InvalidTag { tag, offset, key } => {
                write!(f, "Invalid type tag 0x{tag:08X}")?;
                write_context(f, *offset, key.as_deref())
            }
            Self::CorruptedData {
                reason,
                offset,
                key,
                expected,
                got,
            } => {
                write!(f, "Corrupted data: {reason}")?;
                if let Some(exp) = expected {
                    write!(f, " (expected: {exp}")?;
                    if let Some(g) = got {
                        write!(f, ", got: {g}")?;
                    }
                    write!(f, ")")?;
                }
                write_context(f, *offset, key.as_deref())
            }
            Self::UnexpectedEof {
                context,
                offset,
                key,
                expected_bytes,
                got_bytes,
            } => {
                write!(f, "Unexpected EOF: {context}")?;
                if let (Some(exp), Some(got)) = (expected_bytes, got_bytes) {
                    write!(f, " (expected {exp} bytes, got {got})")?;
                }
                write_context(f, *offset, key.as_deref())
            }
            Self::FileTooSmall { size, minimum } => {
                write!(f, "File too small: {size} bytes (minimum: {minimum} bytes)")
            }
            Self::CompressionError { operation, reason } => {
                write!(f, "{operation} error: {reason}")
            }
        }
    }
}

/// Вспомогательная функция для форматирования контекста (offset, key).
fn write_context(
    f: &mut std::fmt::Formatter<'_>,
    offset: Option<u64>,
    key: Option<&str>,
) -> std::fmt::Result {
    let mut parts = Vec::new();
    if let Some(o) = offset {
        parts.push(format!("offset: 0x{o:X}"));
    }
    if let Some(k) = key {
        parts.push(format!("key: {k}"));
    }
    if !parts.is_empty() {
        write!(f, " [{}]", parts.join(", "))?;
    }
    Ok(())
}

impl std::error::Error for PodError {}

impl ErrorExt for PodError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnassignedBlock { .. } => StatusCode::UnassignedBlock,
            Self::TypeMismatch { .. } => StatusCode::TypeMismatch,
            Self::OutOfRange { .. } => StatusCode::OutOfRange,
            Self::NullReference { .. } => StatusCode::NullReference,
            Self::InvalidArgument { .. } | Self::SizeLimit { .. } => StatusCode::ArgumentError,
            Self::FileAccess { .. } => StatusCode::FileNotFound,
            Self::InvalidMagic { .. }
            | Self::UnsupportedVersion { .. }
            | Self::ChecksumKindMismatch { .. }
            | Self::ChecksumMismatch { .. }
            | Self::InvalidTag { .. }
            | Self::CorruptedData { .. }
            | Self::UnexpectedEof { .. }
            | Self::FileTooSmall { .. } => StatusCode::FileCorrupt,
            // Сбой распаковки означает повреждённый поток, а не сбой кодека.
            Self::CompressionError {
                operation: CompressionOp::Decompress,
                ..
            } => StatusCode::FileCorrupt,
            Self::CompressionError {
                operation: CompressionOp::Compress,
                ..
            } => StatusCode::CompressionError,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::UnassignedBlock { .. } => "Item has no value".to_string(),
            Self::TypeMismatch { .. } => "Stored type differs from requested type".to_string(),
            Self::OutOfRange { .. } => "Requested more values than stored".to_string(),
            Self::NullReference { .. } => "Item handle is no longer valid".to_string(),
            Self::InvalidArgument { what, .. } => format!("Invalid argument: {what}"),
            Self::SizeLimit { what, .. } => format!("{what} exceeds size limit"),
            Self::FileAccess { .. } => "Unable to access file".to_string(),
            Self::InvalidMagic { .. } => "Not a podstore file".to_string(),
            Self::UnsupportedVersion { .. } => "Unsupported file version".to_string(),
            Self::ChecksumKindMismatch { .. } | Self::ChecksumMismatch { .. } => {
                "File checksum mismatch".to_string()
            }
            Self::CompressionError {
                operation: CompressionOp::Compress,
                ..
            } => "Compression failed".to_string(),
            _ => "File is corrupt".to_string(),
        }
    }

    fn log_message(&self) -> String {
        let mut msg = format!("{self:?}");
        if let Some(hint) = self.recovery_hint() {
            msg.push_str(&format!(" | Hint: {hint}"));
        }
        msg
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", self.type_name()),
            ("status_code", self.status_code().to_string()),
        ];

        match self {
            Self::InvalidTag { tag, .. } => {
                tags.push(("invalid_tag", format!("0x{tag:08X}")));
            }
            Self::CompressionError { operation, .. } => {
                tags.push(("compression_op", format!("{operation:?}")));
            }
            Self::FileAccess { operation, .. } => {
                tags.push(("file_op", format!("{operation:?}")));
            }
            _ => {}
        }

        tags
    }
}

// Конверсия в std::io::Error для кода, который работает через io::Result
impl From<PodError> for std::io::Error {
    fn from(e: PodError) -> Self {
        let kind = match &e {
            PodError::UnexpectedEof { .. } => std::io::ErrorKind::UnexpectedEof,
            PodError::FileAccess { .. } => std::io::ErrorKind::Other,
            PodError::InvalidArgument { .. } | PodError::SizeLimit { .. } => {
                std::io::ErrorKind::InvalidInput
            }
            _ if e.status_code() == StatusCode::FileCorrupt => std::io::ErrorKind::InvalidData,
            _ => std::io::ErrorKind::Other,
        };

        std::io::Error::new(kind, e.to_string())
    }
}

impl From<std::io::Error> for PodError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => PodError::UnexpectedEof {
                context: e.to_string(),
                offset: None,
                key: None,
                expected_bytes: None,
                got_bytes: None,
            },
            std::io::ErrorKind::InvalidData => PodError::corrupted(e.to_string()),
            _ => PodError::FileAccess {
                operation: FileOp::Stream,
                path: None,
                reason: e.to_string(),
            },
        }
    }
}

impl std::fmt::Display for CompressionOp {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Compress => write!(f, "Compression"),
            Self::Decompress => write!(f, "Decompression"),
        }
    }
}

impl std::fmt::Display for FileOp {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let name = match self {
            Self::Open => "Open",
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Sync => "Sync",
            Self::Persist => "Persist",
            Self::Stream => "Stream I/O",
        };
        f.write_str(name)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    /// Тест проверяет отображение вариантов на коды статуса.
    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (
                PodError::UnassignedBlock { key: None },
                StatusCode::UnassignedBlock,
            ),
            (
                PodError::TypeMismatch {
                    stored: 4,
                    requested: 2,
                    key: None,
                },
                StatusCode::TypeMismatch,
            ),
            (
                PodError::ChecksumMismatch {
                    computed: 1,
                    recorded: 2,
                },
                StatusCode::FileCorrupt,
            ),
            (
                PodError::invalid_argument("key", "contains NUL"),
                StatusCode::ArgumentError,
            ),
            (
                PodError::NullReference {
                    what: "item".to_string(),
                },
                StatusCode::NullReference,
            ),
            (
                PodError::CompressionError {
                    operation: CompressionOp::Compress,
                    reason: "x".to_string(),
                },
                StatusCode::CompressionError,
            ),
            (
                PodError::CompressionError {
                    operation: CompressionOp::Decompress,
                    reason: "x".to_string(),
                },
                StatusCode::FileCorrupt,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(err.status_code(), code, "err={err:?}");
        }
    }

    /// Тест проверяет, что контекст offset/key попадает в сообщение.
    #[test]
    fn test_context_in_display() {
        let err = PodError::InvalidTag {
            tag: 0xDEAD,
            offset: None,
            key: None,
        }
        .with_offset(0x24)
        .with_key("speed");
        let s = err.to_string();
        assert!(s.contains("0x0000DEAD"), "got: {s}");
        assert!(s.contains("offset: 0x24"), "got: {s}");
        assert!(s.contains("key: speed"), "got: {s}");
    }

    /// Тест проверяет маппинг std::io::ErrorKind -> PodError.
    #[test]
    fn test_io_error_conversion() {
        let eof: PodError = io::Error::new(io::ErrorKind::UnexpectedEof, "eof").into();
        assert_eq!(eof.status_code(), StatusCode::FileCorrupt);

        let missing: PodError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert_eq!(missing.status_code(), StatusCode::FileNotFound);

        let back: io::Error = PodError::corrupted("bad").into();
        assert_eq!(back.kind(), io::ErrorKind::InvalidData);
    }

    /// Тест проверяет, что log_message содержит подсказку.
    #[test]
    fn test_log_message_has_hint() {
        let err = PodError::ChecksumMismatch {
            computed: 0,
            recorded: 1,
        };
        assert!(err.log_message().contains("Hint:"));
        assert_eq!(err.client_message(), "File checksum mismatch");
    }
}
