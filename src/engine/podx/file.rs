//! Заголовок файла и его разбор.
//!
//! Раскладка (36 байт):
//!
//! | Смещение | Размер | Поле                                   |
//! |----------|--------|----------------------------------------|
//! | 0        | 4      | magic `PODX`                           |
//! | 4        | 4      | порядок байт `LITE` / `BIGE`           |
//! | 8        | 4      | вид суммы `NONE` / `AD32` / `CR32`     |
//! | 12       | 1      | версия формата                         |
//! | 13       | 1      | уровень сжатия 0–9                     |
//! | 14       | 2      | зарезервировано, нули                  |
//! | 16       | 4      | число элементов                        |
//! | 20       | 8      | длина несжатой нагрузки                |
//! | 28       | 8      | длина нагрузки в файле                 |
//!
//! Числовые поля записаны в порядке байт самого файла.

use std::{fmt, str::FromStr};

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use podstore_error::{PodError, PodResult};

use super::{
    checksum::ChecksumKind,
    compression::CompressionLevel,
    tags::{tag_display, ENDIAN_BIG, ENDIAN_LITTLE, MAGIC},
};

/// Размер заголовка в байтах.
pub const HEADER_LEN: usize = 36;

/// Поддерживаемые версии формата.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    V1 = 1,
}

impl TryFrom<u8> for FormatVersion {
    type Error = PodError;

    fn try_from(value: u8) -> PodResult<Self> {
        match value {
            1 => Ok(FormatVersion::V1),
            other => Err(PodError::UnsupportedVersion {
                found: other,
                supported: vec![FormatVersion::V1 as u8],
            }),
        }
    }
}

/// Порядок байт для записи файла.
///
/// `Native` разрешается в порядок хоста в момент сохранения; в заголовок
/// всегда попадает конкретный порядок.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    Little,
    Big,
    #[default]
    Native,
}

impl Endianness {
    /// Конкретный порядок байт (`Little` или `Big`).
    pub const fn resolved(self) -> Endianness {
        match self {
            Endianness::Native => {
                if cfg!(target_endian = "big") {
                    Endianness::Big
                } else {
                    Endianness::Little
                }
            }
            other => other,
        }
    }

    /// Тег заголовка для разрешённого порядка.
    pub const fn tag(self) -> [u8; 4] {
        match self.resolved() {
            Endianness::Big => ENDIAN_BIG,
            _ => ENDIAN_LITTLE,
        }
    }

    pub fn from_tag(tag: [u8; 4]) -> Option<Self> {
        match tag {
            ENDIAN_LITTLE => Some(Endianness::Little),
            ENDIAN_BIG => Some(Endianness::Big),
            _ => None,
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Endianness::Little => "little",
            Endianness::Big => "big",
            Endianness::Native => "native",
        };
        f.write_str(name)
    }
}

impl FromStr for Endianness {
    type Err = PodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(Endianness::Little),
            "big" | "be" => Ok(Endianness::Big),
            "native" => Ok(Endianness::Native),
            other => Err(PodError::invalid_argument(
                "endianness",
                format!("unknown byte order '{other}' (expected little, big or native)"),
            )),
        }
    }
}

/// Разобранный заголовок файла.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Всегда `Little` или `Big`.
    pub endianness: Endianness,
    pub checksum: ChecksumKind,
    pub version: FormatVersion,
    pub compression: CompressionLevel,
    pub item_count: u32,
    /// Длина нагрузки до сжатия.
    pub raw_len: u64,
    /// Длина нагрузки в файле (после сжатия).
    pub payload_len: u64,
}

impl FileHeader {
    /// Полная длина файла, описанного этим заголовком.
    pub fn total_len(&self) -> u64 {
        (HEADER_LEN as u64)
            .saturating_add(self.payload_len)
            .saturating_add(self.checksum.trailer_len() as u64)
    }

    /// Сериализует заголовок.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(&MAGIC);
        buf[4..8].copy_from_slice(&self.endianness.tag());
        buf[8..12].copy_from_slice(&self.checksum.tag());
        buf[12] = self.version as u8;
        buf[13] = self.compression.get();
        match self.endianness.resolved() {
            Endianness::Big => self.write_counts::<BigEndian>(&mut buf),
            _ => self.write_counts::<LittleEndian>(&mut buf),
        }
        buf
    }

    /// Разбирает и проверяет заголовок в начале `bytes`.
    ///
    /// Любое отклонение (magic, теги, версия, уровень, резерв) даёт ошибку со
    /// статусом `FileCorrupt`.
    pub fn parse(bytes: &[u8]) -> PodResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(PodError::FileTooSmall {
                size: bytes.len() as u64,
                minimum: HEADER_LEN as u64,
            });
        }

        let magic = take4(bytes, 0);
        if magic != MAGIC {
            return Err(PodError::InvalidMagic {
                expected: MAGIC,
                got: magic,
            });
        }

        let endian_tag = take4(bytes, 4);
        let endianness = Endianness::from_tag(endian_tag).ok_or_else(|| PodError::CorruptedData {
            reason: "unknown byte order tag".to_string(),
            offset: Some(4),
            key: None,
            expected: Some("LITE or BIGE".to_string()),
            got: Some(tag_display(&endian_tag)),
        })?;

        let checksum_tag = take4(bytes, 8);
        let checksum =
            ChecksumKind::from_tag(checksum_tag).ok_or_else(|| PodError::CorruptedData {
                reason: "unknown checksum tag".to_string(),
                offset: Some(8),
                key: None,
                expected: Some("NONE, AD32 or CR32".to_string()),
                got: Some(tag_display(&checksum_tag)),
            })?;

        let version = FormatVersion::try_from(bytes[12])?;
        let compression = CompressionLevel::new(bytes[13]).map_err(|_| {
            PodError::corrupted(format!("compression level {} is outside 0..=9", bytes[13]))
                .with_offset(13)
        })?;

        if bytes[14] != 0 || bytes[15] != 0 {
            return Err(PodError::corrupted("reserved header bytes are not zero").with_offset(14));
        }

        let (item_count, raw_len, payload_len) = match endianness {
            Endianness::Big => read_counts::<BigEndian>(bytes),
            _ => read_counts::<LittleEndian>(bytes),
        };

        Ok(Self {
            endianness,
            checksum,
            version,
            compression,
            item_count,
            raw_len,
            payload_len,
        })
    }

    fn write_counts<B: ByteOrder>(
        &self,
        buf: &mut [u8; HEADER_LEN],
    ) {
        B::write_u32(&mut buf[16..20], self.item_count);
        B::write_u64(&mut buf[20..28], self.raw_len);
        B::write_u64(&mut buf[28..36], self.payload_len);
    }
}

fn read_counts<B: ByteOrder>(bytes: &[u8]) -> (u32, u64, u64) {
    (
        B::read_u32(&bytes[16..20]),
        B::read_u64(&bytes[20..28]),
        B::read_u64(&bytes[28..36]),
    )
}

fn take4(
    bytes: &[u8],
    at: usize,
) -> [u8; 4] {
    let mut tag = [0u8; 4];
    tag.copy_from_slice(&bytes[at..at + 4]);
    tag
}
