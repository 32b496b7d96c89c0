use std::path::Path;

use config::{Config, Environment, File};
use podstore_error::PodError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{LoadOptions, SaveOptions};
use crate::{
    engine::podx::{ChecksumKind, CompressionLevel, Endianness},
    logging::LoggingConfig,
};

/// Ошибки загрузки и проверки настроек.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Source(#[from] config::ConfigError),
    #[error("Invalid setting: {0}")]
    Invalid(#[from] PodError),
    #[error("Invalid logging setting: {0}")]
    Logging(String),
}

/// Настройки из файла и переменных окружения `PODSTORE_*`.
///
/// Значения хранятся в текстовом виде и превращаются в проверенные
/// [`SaveOptions`] и [`LoadOptions`] через [`Settings::save_options`] и
/// [`Settings::load_options`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub compression: u8,
    pub checksum: String,
    pub checksum_seed: u32,
    pub endianness: String,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compression: CompressionLevel::DEFAULT.get(),
            checksum: ChecksumKind::None.to_string(),
            checksum_seed: 0,
            endianness: Endianness::Native.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Загружает настройки из значений по умолчанию и окружения.
    pub fn load() -> Result<Self, SettingsError> {
        Self::build(None)
    }

    /// Загружает настройки из файла (TOML, YAML, JSON по расширению);
    /// переменные окружения имеют приоритет над файлом.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::build(Some(path.as_ref()))
    }

    fn build(path: Option<&Path>) -> Result<Self, SettingsError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            // Добавляем значения по умолчанию
            .set_default("compression", i64::from(defaults.compression))?
            .set_default("checksum", defaults.checksum)?
            .set_default("checksum_seed", i64::from(defaults.checksum_seed))?
            .set_default("endianness", defaults.endianness)?
            .set_default("log_level", defaults.log_level)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        // Добавляем переменные окружения с префиксом PODSTORE_
        let cfg = builder
            .add_source(Environment::with_prefix("PODSTORE").try_parsing(true))
            .build()?;

        // Десериализуем конфигурацию в нашу структуру
        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Проверяет все поля без построения опций.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.save_options()?;
        self.logging_config()?;
        Ok(())
    }

    pub fn save_options(&self) -> Result<SaveOptions, SettingsError> {
        Ok(SaveOptions {
            compression: CompressionLevel::new(self.compression)?,
            checksum: self.checksum.parse()?,
            checksum_seed: self.checksum_seed,
            endianness: self.endianness.parse()?,
        })
    }

    pub fn load_options(&self) -> Result<LoadOptions, SettingsError> {
        Ok(LoadOptions {
            checksum: self.checksum.parse()?,
            checksum_seed: self.checksum_seed,
        })
    }

    /// Конфигурация логирования с уровнем из `log_level`; остальные поля
    /// берутся по умолчанию.
    pub fn logging_config(&self) -> Result<LoggingConfig, SettingsError> {
        let config = LoggingConfig {
            level: self.log_level.to_ascii_lowercase(),
            ..LoggingConfig::default()
        };
        config.validate().map_err(SettingsError::Logging)?;
        Ok(config)
    }
}
