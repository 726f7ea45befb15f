use leadflow_core::config::{AppConfig, LoadOptions, LogFormat, LoggingConfig};
use tracing::Level;

/// Installs the global subscriber. Logs go to stderr so stdout stays a
/// clean JSON channel for command output. A second call is a no-op.
pub fn init(config: &LoggingConfig) {
    let log_level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Logging settings for a command. Falls back to defaults when the
/// configuration does not load; the command itself reports that failure.
pub fn config_for(options: LoadOptions) -> LoggingConfig {
    AppConfig::load(options)
        .map(|config| config.logging)
        .unwrap_or_else(|_| AppConfig::default().logging)
}
