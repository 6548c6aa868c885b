use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use spdlog::sink::{RotatingFileSink, RotationPolicy, StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger};

use crate::config::{Config, LogLevel};

const MAX_LOG_FILES: usize = 30;

impl LogLevel {
    pub fn as_level(self) -> Level {
        match self {
            LogLevel::Critical => Level::Critical,
            LogLevel::Error => Level::Error,
            LogLevel::Warn => Level::Warn,
            LogLevel::Info => Level::Info,
            LogLevel::Debug => Level::Debug,
            LogLevel::Trace => Level::Trace,
        }
    }
}

/// `<user cache dir>/schemark/schemark.log`, used when the config names no location.
pub fn default_log_location() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("schemark").join("schemark.log"))
}

fn console_sink(std_stream: StdStream, level_filter: LevelFilter) -> spdlog::Result<Arc<StdStreamSink>> {
    Ok(Arc::new(StdStreamSink::builder()
        .std_stream(std_stream)
        .level_filter(level_filter)
        .build()?))
}

fn daily_file_sink(location: PathBuf) -> spdlog::Result<Arc<RotatingFileSink>> {
    Ok(Arc::new(RotatingFileSink::builder()
        .base_path(location)
        .rotation_policy(RotationPolicy::Daily { hour: 0, minute: 0 })
        .max_files(MAX_LOG_FILES)
        .rotate_on_open(false)
        .build()?))
}

/// Installs the default logger described by the `[log]` section: a daily file
/// (configured or default location) and, optionally, stdout below warn and
/// stderr from warn up. Without that section the spdlog defaults stay in place.
pub fn configure_logger(config: &Config) -> spdlog::Result<()> {
    let Some(ref log) = config.log else {
        return Ok(());
    };

    let mut builder = Logger::builder();
    if let Some(location) = log.location.clone().or_else(default_log_location) {
        builder.sink(daily_file_sink(location)?);
    }
    if log.log_to_console {
        builder.sink(console_sink(StdStream::Stdout, LevelFilter::MoreVerbose(Level::Warn))?);
        builder.sink(console_sink(StdStream::Stderr, LevelFilter::MoreSevereEqual(Level::Warn))?);
    }

    let logger = Arc::new(builder.build()?);
    logger.set_flush_level_filter(LevelFilter::MoreSevereEqual(Level::Info));
    logger.set_flush_period(Some(Duration::from_secs(2)));
    logger.set_level_filter(LevelFilter::MoreSevereEqual(log.level.as_level()));

    spdlog::set_default_logger(logger);

    Ok(())
}
