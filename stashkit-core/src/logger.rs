//! Forwards `log` records to a host-provided logger.
//!
//! Every failure the router swallows is reported through `log::warn!`; a
//! host that registers a [`Logger`] with [`set_logger`] sees them in its own
//! logging pipeline.

use std::sync::{Arc, OnceLock};

/// Receives log messages emitted by stashkit.
///
/// Implement this in the host application and register it once with
/// [`set_logger`] to route storage diagnostics (failed writes, locked vault
/// reads, swallowed encode errors) into the app's own logging.
///
/// ```rust
/// use stashkit_core::logger::{LogLevel, Logger};
///
/// struct PrintLogger;
///
/// impl Logger for PrintLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         println!("[{level:?}] {message}");
///     }
/// }
/// ```
///
/// ## Swift
///
/// ```swift
/// final class StashkitLoggerBridge: Stashkit.Logger {
///     func log(level: Stashkit.LogLevel, message: String) {
///         os_log("%{public}@", message)
///     }
/// }
///
/// Stashkit.setLogger(logger: StashkitLoggerBridge())
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Logs `message` at `level`.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Very detailed tracing, e.g. every routed write.
    Trace,
    /// Debugging information.
    Debug,
    /// Informational messages.
    Info,
    /// A storage operation failed and was swallowed.
    Warn,
    /// Errors.
    Error,
}

/// Bridges the `log` facade to the registered [`Logger`].
struct ForeignLogger;

impl log::Log for ForeignLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let is_record_from_stashkit = record
            .module_path()
            .is_some_and(|module_path| module_path.starts_with("stashkit"));

        let is_debug_or_trace_level =
            record.level() == log::Level::Debug || record.level() == log::Level::Trace;

        // Debug/trace chatter from dependencies is dropped.
        if is_debug_or_trace_level && !is_record_from_stashkit {
            return;
        }

        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(log_level(record.level()), format!("{}", record.args()));
        } else {
            eprintln!("Logger not set: {}", record.args());
        }
    }

    fn flush(&self) {}
}

const fn log_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Registers the host logger. Only the first call takes effect.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        println!("Logger already set");
        return;
    }

    if let Err(e) = init_logger() {
        eprintln!("Failed to set logger: {e}");
    }
}

fn init_logger() -> Result<(), log::SetLoggerError> {
    static LOGGER: ForeignLogger = ForeignLogger;
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
