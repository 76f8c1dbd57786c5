//! Structured logging for meadow via the `tracing` ecosystem.
//!
//! Console output carries uptime timestamps and module paths. A JSON file
//! layer can be enabled from the config for post-run analysis. `RUST_LOG`
//! always wins over the configured level.

use std::path::Path;

use meadow_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config set a level.
pub const DEFAULT_FILTER: &str = "info";

/// File name of the JSON log inside the log directory.
pub const LOG_FILE_NAME: &str = "meadow.log";

/// Filter directive for `config`, falling back to [`DEFAULT_FILTER`].
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.clone()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Install the global tracing subscriber.
///
/// The JSON file layer is added when the config asks for it and `log_dir`
/// can be created. Calling this more than once keeps the first subscriber.
pub fn init_logging(log_dir: Option<&Path>, config: Option<&Config>) {
    let filter_str = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let json_requested = config.is_some_and(|c| c.debug.json_log);
    if json_requested
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        let _ = subscriber.with(file_layer).try_init();
        return;
    }

    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_without_config() {
        assert_eq!(filter_directive(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_config_level_used() {
        let mut config = Config::default();
        config.debug.log_level = "meadow_orbit=trace,warn".to_string();
        assert_eq!(filter_directive(Some(&config)), "meadow_orbit=trace,warn");
    }

    #[test]
    fn test_blank_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_directive(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_filter_strings_parse() {
        for filter in ["info", "debug,meadow_sky=trace", "warn,meadow_orbit=debug"] {
            assert!(EnvFilter::try_new(filter).is_ok(), "failed to parse {filter}");
        }
    }

    #[test]
    fn test_json_log_file_created() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let mut config = Config::default();
        config.debug.json_log = true;

        init_logging(Some(&log_dir), Some(&config));
        assert!(log_dir.join(LOG_FILE_NAME).exists());
        // A second call must not panic.
        init_logging(None, None);
    }
}
