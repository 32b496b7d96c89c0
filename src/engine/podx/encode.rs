use std::io::Write;

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use podstore_error::{FileOp, PodError, PodResult};
use tracing::debug;

use super::{
    checksum,
    compression::compress_block,
    file::{Endianness, FileHeader, FormatVersion},
};
use crate::{config::SaveOptions, database::Container};

/// Кодирует контейнер в байты файла: заголовок, нагрузка (сжатая, если
/// уровень больше 0) и, при выбранной сумме, завершающее поле с ней.
pub fn encode_container(
    container: &Container,
    opts: &SaveOptions,
) -> PodResult<Vec<u8>> {
    let endianness = opts.endianness.resolved();
    let item_count = u32::try_from(container.len()).map_err(|_| PodError::SizeLimit {
        what: "item count".to_string(),
        size: container.len() as u64,
        limit: u64::from(u32::MAX),
        key: None,
    })?;

    let payload = match endianness {
        Endianness::Big => encode_items::<BigEndian>(container)?,
        _ => encode_items::<LittleEndian>(container)?,
    };
    let stored = compress_block(&payload, opts.compression)?;

    let header = FileHeader {
        endianness,
        checksum: opts.checksum,
        version: FormatVersion::V1,
        compression: opts.compression,
        item_count,
        raw_len: payload.len() as u64,
        payload_len: stored.len() as u64,
    };
    let header_bytes = header.to_bytes();

    let mut out = Vec::with_capacity(header.total_len() as usize);
    out.extend_from_slice(&header_bytes);
    out.extend_from_slice(&stored);
    if let Some(sum) = checksum::compute(opts.checksum, opts.checksum_seed, &[&header_bytes, &stored]) {
        match endianness {
            Endianness::Big => out.write_u32::<BigEndian>(sum)?,
            _ => out.write_u32::<LittleEndian>(sum)?,
        }
    }

    debug!(
        items = item_count,
        raw_len = payload.len(),
        stored_len = stored.len(),
        endianness = %endianness,
        checksum = %opts.checksum,
        level = %opts.compression,
        "Encoded container"
    );
    Ok(out)
}

/// Кодирует контейнер и пишет результат в произвольный поток.
pub fn write_container<W: Write>(
    w: &mut W,
    container: &Container,
    opts: &SaveOptions,
) -> PodResult<()> {
    let bytes = encode_container(container, opts)?;
    w.write_all(&bytes).map_err(|e| PodError::FileAccess {
        operation: FileOp::Write,
        path: None,
        reason: e.to_string(),
    })
}

/// Записывает элементы в порядке обхода: `key_len u32, key, type u32,
/// count u32, значения`, все числа в порядке `B`.
fn encode_items<B: ByteOrder>(container: &Container) -> PodResult<Vec<u8>> {
    let capacity: usize = container
        .iter()
        .map(|item| 12 + item.key().len() + item.byte_len())
        .sum();
    let mut out = Vec::with_capacity(capacity);

    for item in container {
        let (tag, count, data) = item.raw_parts();
        let key = item.key();
        out.write_u32::<B>(key.len() as u32)?;
        out.extend_from_slice(key);
        out.write_u32::<B>(tag.raw())?;
        out.write_u32::<B>(count as u32)?;
        push_elements::<B>(&mut out, data, tag.element_width());
    }
    Ok(out)
}

/// Переводит элементы из порядка хоста в порядок `B`.
pub(super) fn push_elements<B: ByteOrder>(
    out: &mut Vec<u8>,
    data: &[u8],
    width: usize,
) {
    if width == 1 || !needs_swap::<B>() {
        out.extend_from_slice(data);
        return;
    }
    for chunk in data.chunks_exact(width) {
        out.extend(chunk.iter().rev());
    }
}

/// `true`, если порядок `B` отличается от порядка хоста.
pub(super) fn needs_swap<B: ByteOrder>() -> bool {
    let mut probe = [0u8; 2];
    B::write_u16(&mut probe, 1);
    probe != 1u16.to_ne_bytes()
}
