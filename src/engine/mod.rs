//! Движок хранения: формат PODX и работа с файлами.
//!
//! - `podx`: кодирование и декодирование контейнера в байты.
//! - `persistent`: атомарная запись в файл, загрузка и чтение заголовка.

pub mod persistent;
pub mod podx;

pub use persistent::*;
pub use podx::{
    decode_container, encode_container, read_container, write_container, ChecksumKind,
    CompressionLevel, Endianness, FileHeader,
};
