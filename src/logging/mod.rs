pub mod config;
mod filters;

pub use config::{LogFormat, LoggingConfig};
pub use filters::LOG_ENV;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Инициализация логирования с конфигурацией.
///
/// Устанавливает глобальный подписчик с `EnvFilter` и слоем `fmt`.
/// Возвращает `Ok(false)`, если глобальный подписчик уже установлен
/// (повторный вызов ничего не меняет).
pub fn init_logging(
    mut config: LoggingConfig,
) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
    config.apply_env_overrides();
    config.validate()?;

    let env_filter = filters::build_filter_from_config(&config);

    let fmt_layer = match config.format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(config.ansi)
            .with_target(config.with_target)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_ansi(config.ansi)
            .with_target(config.with_target)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(false)
            .with_target(config.with_target)
            .boxed(),
    };

    if tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .try_init()
        .is_err()
    {
        return Ok(false);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        format = %config.format,
        "Logging system initialized"
    );
    Ok(true)
}
