//! Logger initialization.
//!
//! Log lines come in two shapes: a colored console line led by a level
//! marker, or one JSON object per line with `ts`, `level`, `target` and `msg`.

use std::io::Write;

use colored::*;
use log::{Level, LevelFilter};
use serde_json::json;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Renders one record as a JSON log line (without the trailing newline).
fn json_line(ts_millis: i64, level: Level, target: &str, message: &str) -> String {
    json!({
        "ts": ts_millis,
        "level": level.as_str(),
        "target": target,
        "msg": message,
    })
    .to_string()
}

fn level_marker(level: Level) -> &'static str {
    match level {
        Level::Error => "❌",
        Level::Warn => "⚠️",
        Level::Info => "✔️",
        Level::Debug => "🔍",
        Level::Trace => "🔬",
    }
}

fn colored_level(level: Level) -> ColoredString {
    let text = level.as_str();
    match level {
        Level::Error => text.red(),
        Level::Warn => text.yellow(),
        Level::Info => text.green(),
        Level::Debug => text.blue(),
        Level::Trace => text.purple(),
    }
}

/// Initializes the global logger.
///
/// `RUST_LOG` is read first; `level` then applies to everything and to this
/// crate's targets, while `rustls` stays capped at Info.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=cellular_check=debug cellular_check check https://example.com/check
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder
        .filter_level(level)
        .filter_module("rustls", LevelFilter::Info)
        .filter_module("cellular_check", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(
                        chrono::Utc::now().timestamp_millis(),
                        record.level(),
                        record.target(),
                        &record.args().to_string(),
                    )
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    level_marker(record.level()),
                    record.target().cyan(),
                    colored_level(record.level()),
                    record.args()
                )
            });
        }
    }

    builder.try_init()?;
    Ok(())
}
