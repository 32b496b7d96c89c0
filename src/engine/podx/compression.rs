//! Модуль для сжатия и распаковки полезной нагрузки файла с помощью zlib.
//!
//! Уровень 0 означает хранение без сжатия; уровни 1–9 передаются в zlib
//! как есть.

use std::{fmt, io::Write};

use flate2::{write::ZlibDecoder, write::ZlibEncoder, Compression};
use podstore_error::{CompressionOp, PodError, PodResult};

/// Уровень сжатия zlib в диапазоне 0–9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// Без сжатия.
    pub const NONE: CompressionLevel = CompressionLevel(0);
    /// Уровень по умолчанию, баланс скорости и размера.
    pub const DEFAULT: CompressionLevel = CompressionLevel(6);
    /// Максимальное сжатие.
    pub const BEST: CompressionLevel = CompressionLevel(9);

    /// Проверяет уровень: значения больше 9 дают `ArgumentError`.
    pub fn new(level: u8) -> PodResult<Self> {
        if level > Self::BEST.0 {
            return Err(PodError::invalid_argument(
                "compression",
                format!("level {level} is outside 0..=9"),
            ));
        }
        Ok(Self(level))
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn is_compressed(self) -> bool {
        self.0 > 0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for CompressionLevel {
    type Error = PodError;

    fn try_from(level: u8) -> PodResult<Self> {
        Self::new(level)
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Сжимает блок на заданном уровне. Для уровня 0 возвращает копию данных.
pub fn compress_block(
    data: &[u8],
    level: CompressionLevel,
) -> PodResult<Vec<u8>> {
    if !level.is_compressed() {
        return Ok(data.to_vec());
    }
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2 + 64),
        Compression::new(u32::from(level.get())),
    );
    encoder.write_all(data).map_err(compress_err)?;
    encoder.finish().map_err(compress_err)
}

/// Верхняя граница предварительного резерва памяти при распаковке.
const MAX_PREALLOC: usize = 1 << 20;

/// Распаковывает zlib-поток, размер результата должен быть ровно
/// `expected_len` байт.
///
/// Запись в декодер ограничена `expected_len`, поэтому повреждённый поток с
/// завышенной длиной не раздувает память сверх заявленного размера.
pub fn decompress_block(
    data: &[u8],
    expected_len: usize,
) -> PodResult<Vec<u8>> {
    let sink = LimitedSink {
        buf: Vec::with_capacity(expected_len.min(MAX_PREALLOC)),
        limit: expected_len,
    };
    let mut decoder = ZlibDecoder::new(sink);
    decoder.write_all(data).map_err(decompress_err)?;
    let out = decoder.finish().map_err(decompress_err)?.buf;
    if out.len() != expected_len {
        return Err(PodError::CompressionError {
            operation: CompressionOp::Decompress,
            reason: format!(
                "decompressed {} bytes, header declares {expected_len}",
                out.len()
            ),
        });
    }
    Ok(out)
}

/// Приёмник, который отказывается принимать больше `limit` байт.
struct LimitedSink {
    buf: Vec<u8>,
    limit: usize,
}

impl Write for LimitedSink {
    fn write(
        &mut self,
        data: &[u8],
    ) -> std::io::Result<usize> {
        if self.buf.len() + data.len() > self.limit {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("decompressed data exceeds declared length {}", self.limit),
            ));
        }
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn compress_err(e: std::io::Error) -> PodError {
    PodError::CompressionError {
        operation: CompressionOp::Compress,
        reason: e.to_string(),
    }
}

fn decompress_err(e: std::io::Error) -> PodError {
    PodError::CompressionError {
        operation: CompressionOp::Decompress,
        reason: e.to_string(),
    }
}
