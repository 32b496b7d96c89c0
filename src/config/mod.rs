//! Параметры сохранения и загрузки, а также настройки из файла и окружения.

pub mod options;
pub mod settings;

pub use options::{LoadOptions, SaveOptions};
pub use settings::{Settings, SettingsError};
