use crate::engine::podx::{ChecksumKind, CompressionLevel, Endianness};

/// Параметры сохранения.
///
/// По умолчанию: сжатие 6, без контрольной суммы, seed 0, порядок байт
/// хоста.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveOptions {
    pub compression: CompressionLevel,
    pub checksum: ChecksumKind,
    pub checksum_seed: u32,
    pub endianness: Endianness,
}

impl SaveOptions {
    pub fn with_compression(
        mut self,
        level: CompressionLevel,
    ) -> Self {
        self.compression = level;
        self
    }

    pub fn with_checksum(
        mut self,
        kind: ChecksumKind,
        seed: u32,
    ) -> Self {
        self.checksum = kind;
        self.checksum_seed = seed;
        self
    }

    pub fn with_endianness(
        mut self,
        endianness: Endianness,
    ) -> Self {
        self.endianness = endianness;
        self
    }
}

/// Параметры загрузки: вид суммы и seed должны совпадать с теми, что
/// использовались при сохранении.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    pub checksum: ChecksumKind,
    pub checksum_seed: u32,
}

impl LoadOptions {
    pub fn new(
        checksum: ChecksumKind,
        checksum_seed: u32,
    ) -> Self {
        Self {
            checksum,
            checksum_seed,
        }
    }
}

impl From<&SaveOptions> for LoadOptions {
    fn from(opts: &SaveOptions) -> Self {
        Self {
            checksum: opts.checksum,
            checksum_seed: opts.checksum_seed,
        }
    }
}
