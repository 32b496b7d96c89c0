/// Application-facing options: save/load parameters and layered settings.
pub mod config;
/// In-memory data model: type tags, items, the keyed container.
pub mod database;
/// Serialization engine: the PODX codec and atomic file persistence.
pub mod engine;
/// Structured logging setup on top of `tracing`.
pub mod logging;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Save/load options and settings loaded from file or environment.
pub use config::{LoadOptions, SaveOptions, Settings, SettingsError};
/// Container, items, handles and element type tags.
pub use database::{Container, Item, ItemHandle, PodElement, TypeClass, TypeTag};
/// File-level and in-memory entry points of the engine.
pub use engine::{
    decode_container, encode_container, load_file, read_container, read_file_header, save_file,
    write_container, ChecksumKind, CompressionLevel, Endianness, FileHeader,
};
/// Logging initialisation.
pub use logging::{init_logging, LoggingConfig};
/// Error types and status codes.
pub use podstore_error::{ErrorExt, PodError, PodResult, StatusCode};
