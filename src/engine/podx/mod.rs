//! Сериализация контейнера в бинарный формат PODX и обратно.
//!
//! ## Формат
//!
//! Файл состоит из заголовка фиксированной длины ([`file::HEADER_LEN`]),
//! нагрузки (записи элементов, возможно сжатые zlib) и, если выбран вид
//! контрольной суммы, четырёхбайтового поля с суммой в конце. Сумма
//! считается по заголовку и нагрузке в том виде, в каком они лежат в файле.
//!
//! ```no_run
//! use podstore::{
//!     config::{LoadOptions, SaveOptions},
//!     engine::podx::{decode_container, encode_container},
//!     Container,
//! };
//!
//! let mut c = Container::new();
//! c.set_values("count", &[1u32, 2, 3])?;
//! let bytes = encode_container(&c, &SaveOptions::default())?;
//! let back = decode_container(&bytes, &LoadOptions::default())?;
//! assert_eq!(back, c);
//! # Ok::<(), podstore::PodError>(())
//! ```
//!
//! ## Модули
//!
//! - [`encode`] - запись контейнера в байты
//! - [`decode`] - проверка и разбор байтов в контейнер
//! - [`checksum`] - Adler-32 и CRC-32 с начальным значением
//! - [`compression`] - сжатие и распаковка zlib
//! - [`file`] - заголовок, версия и порядок байт
//! - [`tags`] - четырёхбайтовые теги заголовка

pub mod checksum;
pub mod compression;
pub mod decode;
pub mod encode;
pub mod file;
pub mod tags;

pub use checksum::ChecksumKind;
pub use compression::CompressionLevel;
pub use decode::{decode_container, read_container};
pub use encode::{encode_container, write_container};
pub use file::{Endianness, FileHeader, FormatVersion, HEADER_LEN};
