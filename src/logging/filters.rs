use tracing_subscriber::EnvFilter;

use crate::logging::config::LoggingConfig;

/// Переменная окружения с директивой фильтра, приоритетнее конфигурации.
pub const LOG_ENV: &str = "PODSTORE_LOG";

pub fn build_filter_from_config(config: &LoggingConfig) -> EnvFilter {
    // Если PODSTORE_LOG задана и корректна, используем её.
    if let Ok(env_filter) = EnvFilter::try_from_env(LOG_ENV) {
        return env_filter;
    }

    let directive = config.build_filter_directive();
    match EnvFilter::try_new(&directive) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Invalid log filter directive '{directive}': {e}; falling back to 'info'");
            EnvFilter::new("info")
        }
    }
}
