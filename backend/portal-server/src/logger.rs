use crate::error::{Result as ServerErrorResult, ServerError};

use std::fmt::Display;
use std::path::PathBuf;
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::{LevelFilter, info};

/// Crates whose per-connection chatter is capped at warn.
const QUIET_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest"];

/// Initialize the global logger.
///
/// * `log_file` - None logs to stdout, Some appends to that file
/// * `colored` - Colored levels on stdout; ignored for file output
pub fn initialize(
    log_level: portal_config::LogLevel,
    log_file: Option<PathBuf>,
    colored: bool,
) -> ServerErrorResult<()> {
    let level_filter = *log_level;

    let output = match log_file {
        Some(ref path) => {
            let file = fern::log_file(path).map_err(|e| ServerError::Logger {
                message: format!("Failed to open log file {}: {}", path.display(), e),
            })?;
            formatted(|level| level.to_string()).chain(file)
        }
        None if colored => {
            let colors = ColoredLevelConfig::new()
                .trace(Color::Magenta)
                .debug(Color::Blue)
                .info(Color::Green)
                .warn(Color::Yellow)
                .error(Color::Red);
            formatted(move |level| colors.color(level)).chain(std::io::stdout())
        }
        // systemd, docker logs
        None => formatted(|level| level.to_string()).chain(std::io::stdout()),
    };

    QUIET_TARGETS
        .iter()
        .fold(Dispatch::new().level(level_filter), |dispatch, target| {
            dispatch.level_for(*target, LevelFilter::Warn)
        })
        .chain(output)
        .apply()
        .map_err(|e| ServerError::Logger {
            message: format!("Failed to initialize logger: {e}"),
        })?;

    match log_file {
        Some(path) => info!(
            "Logger initialized: level={}, file={}",
            level_filter,
            path.display()
        ),
        None => info!("Logger initialized: level={}, stdout", level_filter),
    }

    Ok(())
}

/// `[rfc3339 - LEVEL - target] message`
fn formatted<L, F>(level: F) -> Dispatch
where
    L: Display,
    F: Fn(log::Level) -> L + Send + Sync + 'static,
{
    Dispatch::new().format(move |out, message, record| {
        out.finish(format_args!(
            "[{} - {} - {}] {}",
            humantime::format_rfc3339(SystemTime::now()),
            level(record.level()),
            record.target(),
            message
        ))
    })
}
