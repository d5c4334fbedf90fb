//! Console Logger
//!
//! A `log` backend for the browser. Each record becomes one timestamped
//! line on the console method matching its level; native builds (tests,
//! tools) write the same line to stderr.

use std::fmt;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

pub const TIME_FORMAT: &str = "%H:%M:%S%.3f";

struct ConsoleLogger {
    app_name: &'static str,
    level: LevelFilter,
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = chrono::Local::now().format(TIME_FORMAT).to_string();
        let line = format_line(&timestamp, self.app_name, record.level(), record.target(), record.args());
        emit(record.level(), &line);
    }

    fn flush(&self) {}
}

/// `[12:00:00.000] INFO  App fridge_core::sync: message`
pub fn format_line(
    timestamp: &str,
    app_name: &str,
    level: Level,
    target: &str,
    message: &fmt::Arguments,
) -> String {
    format!("[{}] {:<5} {} {}: {}", timestamp, level, app_name, target, message)
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// Install the logger as the global `log` backend.
///
/// Fails if another logger is already installed.
pub fn init_logger(app_name: &'static str, level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(ConsoleLogger { app_name, level }))?;
    log::set_max_level(level);
    log::info!("[LOGGER] {} logging at {}", app_name, level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        let line = format_line("09:15:02.125", "Buzdolabı", Level::Warn, "fridge_core::sync", &format_args!("x={}", 3));
        assert_eq!(line, "[09:15:02.125] WARN  Buzdolabı fridge_core::sync: x=3");
    }

    #[test]
    fn test_level_filter() {
        let logger = ConsoleLogger { app_name: "t", level: LevelFilter::Info };
        let debug = Metadata::builder().level(Level::Debug).target("t").build();
        let error = Metadata::builder().level(Level::Error).target("t").build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&error));
    }

    #[test]
    fn test_second_init_fails() {
        let first = init_logger("a", LevelFilter::Debug);
        let second = init_logger("b", LevelFilter::Debug);
        assert!(first.is_ok());
        assert!(second.is_err());
    }
}
