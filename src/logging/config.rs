use std::{fmt, str::FromStr};

/// Формат вывода событий.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// Конфигурация подписчика `tracing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Уровень для событий крейта: trace, debug, info, warn, error.
    pub level: String,
    pub format: LogFormat,
    /// Цветной вывод (только для текстовых форматов).
    pub ansi: bool,
    /// Печатать target события.
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            ansi: true,
            with_target: false,
        }
    }
}

/// Допустимые уровни логирования.
const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl LoggingConfig {
    /// Применяет `PODSTORE_LOG_FORMAT` поверх значений конфигурации.
    ///
    /// Фильтр событий из `PODSTORE_LOG` читается отдельно при построении
    /// `EnvFilter`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(format) = std::env::var("PODSTORE_LOG_FORMAT") {
            if let Ok(parsed) = format.parse() {
                self.format = parsed;
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let level = self.level.to_ascii_lowercase();
        if !LEVELS.contains(&level.as_str()) {
            return Err(format!(
                "invalid log level '{}' (expected one of {})",
                self.level,
                LEVELS.join(", ")
            ));
        }
        Ok(())
    }

    /// Директива фильтра для событий крейта, например `podstore=debug`.
    pub fn build_filter_directive(&self) -> String {
        format!("podstore={}", self.level.to_ascii_lowercase())
    }
}
