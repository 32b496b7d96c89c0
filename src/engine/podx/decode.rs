use std::{borrow::Cow, io::Read};

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use podstore_error::{PodError, PodResult};
use tracing::debug;

use super::{
    checksum::{self, ChecksumKind},
    compression::decompress_block,
    encode::push_elements,
    file::{Endianness, FileHeader, HEADER_LEN},
};
use crate::{
    config::LoadOptions,
    database::{item::validate_text, Container, Item, TypeTag},
};

/// Декодирует файл целиком и строит новый контейнер.
///
/// Проверки идут в порядке: заголовок, вид суммы, точная длина, значение
/// суммы, распаковка, элементы. Контейнер возвращается только если все
/// проверки прошли.
pub fn decode_container(
    bytes: &[u8],
    opts: &LoadOptions,
) -> PodResult<Container> {
    let result = decode_inner(bytes, opts);
    if let Err(e) = &result {
        debug!(error = %e, len = bytes.len(), "Rejected container data");
    }
    result
}

/// Читает поток до конца и декодирует его.
pub fn read_container<R: Read>(
    r: &mut R,
    opts: &LoadOptions,
) -> PodResult<Container> {
    let mut bytes = Vec::new();
    r.read_to_end(&mut bytes)?;
    decode_container(&bytes, opts)
}

fn decode_inner(
    bytes: &[u8],
    opts: &LoadOptions,
) -> PodResult<Container> {
    let header = FileHeader::parse(bytes)?;

    if header.checksum != opts.checksum {
        return Err(PodError::ChecksumKindMismatch {
            requested: opts.checksum.to_string(),
            recorded: header.checksum.to_string(),
        });
    }

    let total = header.total_len();
    if bytes.len() as u64 != total {
        return Err(PodError::CorruptedData {
            reason: "file length does not match header".to_string(),
            offset: None,
            key: None,
            expected: Some(format!("{total} bytes")),
            got: Some(format!("{} bytes", bytes.len())),
        });
    }

    // Длина уже совпала с заголовком, поэтому payload_len помещается в usize.
    let payload_end = HEADER_LEN + header.payload_len as usize;
    let stored = &bytes[HEADER_LEN..payload_end];

    if header.checksum != ChecksumKind::None {
        let trailer = &bytes[payload_end..];
        let recorded = match header.endianness {
            Endianness::Big => BigEndian::read_u32(trailer),
            _ => LittleEndian::read_u32(trailer),
        };
        let computed = checksum::compute(
            header.checksum,
            opts.checksum_seed,
            &[&bytes[..HEADER_LEN], stored],
        )
        .unwrap_or_default();
        if computed != recorded {
            return Err(PodError::ChecksumMismatch { computed, recorded });
        }
    }

    let raw_len = usize::try_from(header.raw_len)
        .map_err(|_| PodError::corrupted("raw payload length exceeds address space"))?;
    let payload: Cow<'_, [u8]> = if header.compression.is_compressed() {
        Cow::Owned(decompress_block(stored, raw_len)?)
    } else {
        if header.raw_len != header.payload_len {
            return Err(PodError::CorruptedData {
                reason: "uncompressed payload length mismatch".to_string(),
                offset: Some(28),
                key: None,
                expected: Some(header.raw_len.to_string()),
                got: Some(header.payload_len.to_string()),
            });
        }
        Cow::Borrowed(stored)
    };

    let container = match header.endianness {
        Endianness::Big => decode_items::<BigEndian>(&payload, header.item_count)?,
        _ => decode_items::<LittleEndian>(&payload, header.item_count)?,
    };

    debug!(
        items = header.item_count,
        raw_len = header.raw_len,
        stored_len = header.payload_len,
        endianness = %header.endianness,
        checksum = %header.checksum,
        level = %header.compression,
        "Decoded container"
    );
    Ok(container)
}

/// Курсор по распакованной нагрузке. Смещения в ошибках отсчитываются от
/// начала нагрузки.
struct PayloadReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(
        &mut self,
        len: u64,
        context: &str,
    ) -> PodResult<&'a [u8]> {
        let available = self.remaining() as u64;
        if len > available {
            return Err(PodError::UnexpectedEof {
                context: context.to_string(),
                offset: Some(self.pos as u64),
                key: None,
                expected_bytes: Some(len),
                got_bytes: Some(available),
            });
        }
        let start = self.pos;
        self.pos += len as usize;
        Ok(&self.buf[start..self.pos])
    }

    fn read_u32<B: ByteOrder>(
        &mut self,
        context: &str,
    ) -> PodResult<u32> {
        self.take(4, context).map(B::read_u32)
    }
}

fn decode_items<B: ByteOrder>(
    payload: &[u8],
    item_count: u32,
) -> PodResult<Container> {
    let mut reader = PayloadReader::new(payload);
    let mut container = Container::new();

    for _ in 0..item_count {
        let key_len = reader.read_u32::<B>("key length")?;
        let key_offset = reader.pos as u64;
        let key = reader.take(u64::from(key_len), "key bytes")?;
        let key_name = String::from_utf8_lossy(key).into_owned();

        if key.contains(&0) {
            return Err(PodError::CorruptedData {
                reason: "key contains NUL byte".to_string(),
                offset: Some(key_offset),
                key: None,
                expected: None,
                got: Some(key.escape_ascii().to_string()),
            });
        }
        if container.contains_key(key) {
            return Err(PodError::corrupted("duplicate key")
                .with_offset(key_offset)
                .with_key(key_name));
        }

        let tag_offset = reader.pos as u64;
        let raw_tag = reader.read_u32::<B>("type tag").map_err(|e| e.with_key(&key_name))?;
        let tag = TypeTag::from_raw(raw_tag).ok_or_else(|| PodError::InvalidTag {
            tag: raw_tag,
            offset: Some(tag_offset),
            key: Some(key_name.clone()),
        })?;

        let count = reader.read_u32::<B>("value count").map_err(|e| e.with_key(&key_name))?;
        let byte_len = u64::from(count) * tag.element_width() as u64;
        let values_offset = reader.pos as u64;
        let values = reader.take(byte_len, "values").map_err(|e| e.with_key(&key_name))?;

        let item = if count == 0 {
            Item::unassigned(key.into())
        } else {
            let mut data = Vec::with_capacity(values.len());
            push_elements::<B>(&mut data, values, tag.element_width());
            validate_text(tag, &data).map_err(|reason| {
                PodError::corrupted(reason)
                    .with_offset(values_offset)
                    .with_key(&key_name)
            })?;
            Item::from_parts(key.into(), tag, count as usize, data)
        };
        container.push_back(item);
    }

    if reader.remaining() != 0 {
        return Err(PodError::CorruptedData {
            reason: "trailing bytes after last item".to_string(),
            offset: Some(reader.pos as u64),
            key: None,
            expected: Some(format!("{item_count} items")),
            got: Some(format!("{} extra bytes", reader.remaining())),
        });
    }
    Ok(container)
}
