//! Контрольные суммы файла: Adler-32 и CRC-32 с начальным значением.
//!
//! Начальное значение (seed) передаётся как «предыдущая» сумма, так же как в
//! zlib: `adler32(seed, ..)` и `crc32(seed, ..)`. Поэтому файл, сохранённый с
//! одним seed, не проходит проверку с другим.

use std::{fmt, str::FromStr};

use adler2::Adler32;
use crc32fast::Hasher as Crc32Hasher;
use podstore_error::PodError;

use super::tags::{CHECKSUM_ADLER32, CHECKSUM_CRC32, CHECKSUM_NONE};

/// Вид контрольной суммы, записанный в заголовке файла.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChecksumKind {
    #[default]
    None,
    Adler32,
    Crc32,
}

impl ChecksumKind {
    pub const ALL: [ChecksumKind; 3] = [
        ChecksumKind::None,
        ChecksumKind::Adler32,
        ChecksumKind::Crc32,
    ];

    /// Тег для заголовка файла.
    pub const fn tag(self) -> [u8; 4] {
        match self {
            ChecksumKind::None => CHECKSUM_NONE,
            ChecksumKind::Adler32 => CHECKSUM_ADLER32,
            ChecksumKind::Crc32 => CHECKSUM_CRC32,
        }
    }

    pub fn from_tag(tag: [u8; 4]) -> Option<Self> {
        match tag {
            CHECKSUM_NONE => Some(ChecksumKind::None),
            CHECKSUM_ADLER32 => Some(ChecksumKind::Adler32),
            CHECKSUM_CRC32 => Some(ChecksumKind::Crc32),
            _ => None,
        }
    }

    /// Размер завершающего поля с суммой: 4 байта или 0.
    pub const fn trailer_len(self) -> usize {
        match self {
            ChecksumKind::None => 0,
            _ => 4,
        }
    }
}

impl fmt::Display for ChecksumKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            ChecksumKind::None => "none",
            ChecksumKind::Adler32 => "adler32",
            ChecksumKind::Crc32 => "crc32",
        };
        f.write_str(name)
    }
}

impl FromStr for ChecksumKind {
    type Err = PodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(ChecksumKind::None),
            "adler32" | "adler-32" => Ok(ChecksumKind::Adler32),
            "crc32" | "crc-32" => Ok(ChecksumKind::Crc32),
            other => Err(PodError::invalid_argument(
                "checksum",
                format!("unknown kind '{other}' (expected none, adler32 or crc32)"),
            )),
        }
    }
}

/// Накопитель контрольной суммы для потоковой обработки заголовка и данных.
pub enum Checksum {
    None,
    Adler32(Adler32),
    Crc32(Crc32Hasher),
}

impl Checksum {
    pub fn new(
        kind: ChecksumKind,
        seed: u32,
    ) -> Self {
        match kind {
            ChecksumKind::None => Checksum::None,
            ChecksumKind::Adler32 => Checksum::Adler32(Adler32::from_checksum(seed)),
            ChecksumKind::Crc32 => Checksum::Crc32(Crc32Hasher::new_with_initial(seed)),
        }
    }

    pub fn update(
        &mut self,
        data: &[u8],
    ) {
        match self {
            Checksum::None => {}
            Checksum::Adler32(a) => a.write_slice(data),
            Checksum::Crc32(c) => c.update(data),
        }
    }

    /// Итоговая сумма; `None`, если сумма не вычисляется.
    pub fn finalize(self) -> Option<u32> {
        match self {
            Checksum::None => None,
            Checksum::Adler32(a) => Some(a.checksum()),
            Checksum::Crc32(c) => Some(c.finalize()),
        }
    }
}

/// Вычисляет сумму по последовательности фрагментов.
pub fn compute(
    kind: ChecksumKind,
    seed: u32,
    parts: &[&[u8]],
) -> Option<u32> {
    let mut sum = Checksum::new(kind, seed);
    for part in parts {
        sum.update(part);
    }
    sum.finalize()
}
