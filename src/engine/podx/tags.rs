//! Четырёхбайтовые ASCII-теги заголовка файла.
//!
//! Теги записываются как есть, без учёта порядка байт, поэтому по ним можно
//! распознать файл до того, как известен его порядок байт.

/// «Магическое» начало файла.
pub const MAGIC: [u8; 4] = *b"PODX";

/// Порядок байт little-endian.
pub const ENDIAN_LITTLE: [u8; 4] = *b"LITE";
/// Порядок байт big-endian.
pub const ENDIAN_BIG: [u8; 4] = *b"BIGE";

/// Контрольная сумма отсутствует.
pub const CHECKSUM_NONE: [u8; 4] = *b"NONE";
/// Adler-32.
pub const CHECKSUM_ADLER32: [u8; 4] = *b"AD32";
/// CRC-32 (IEEE).
pub const CHECKSUM_CRC32: [u8; 4] = *b"CR32";

/// Печатное представление тега для сообщений об ошибках.
pub fn tag_display(tag: &[u8; 4]) -> String {
    tag.iter()
        .map(|&b| {
            if b.is_ascii_graphic() {
                (b as char).to_string()
            } else {
                format!("\\x{b:02X}")
            }
        })
        .collect()
}
