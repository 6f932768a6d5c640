// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::message::{LogMessage, FATAL_MARKER};
use crate::event::Event;
use crate::module::{Module, ModuleError};
use std::any::Any;
use std::cell::Cell;
use std::sync::OnceLock;

static LOG_EVENT: OnceLock<Event<LogMessage>> = OnceLock::new();
static LOGGER: OnceLock<EngineLogger> = OnceLock::new();

thread_local! {
    static IN_DISPATCH: Cell<bool> = const { Cell::new(false) };
}

/// The process-wide event on which every accepted log record is republished.
pub fn log_event() -> &'static Event<LogMessage> {
    LOG_EVENT.get_or_init(Event::new)
}

/// Emits an error record flagged as fatal.
pub fn log_fatal(category: &str, message: impl std::fmt::Display) {
    log::error!(target: category, "{FATAL_MARKER}{message}");
}

/// A `log::Log` implementation combining `env_logger` console output with
/// the in-process [`log_event`].
pub struct EngineLogger {
    console: env_logger::Logger,
    event: Event<LogMessage>,
}

impl EngineLogger {
    /// Builds the logger. `RUST_LOG` wins over `default_filter` when set.
    pub fn new(default_filter: &str) -> Self {
        let console = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(default_filter),
        )
        .format_timestamp_millis()
        .build();
        Self {
            console,
            event: log_event().clone(),
        }
    }

    /// The most verbose level that passes the filter.
    pub fn filter(&self) -> log::LevelFilter {
        self.console.filter()
    }
}

impl log::Log for EngineLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.console.enabled(metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.console.matches(record) {
            return;
        }
        self.console.log(record);

        // Handlers that log would recurse into us; their lines go to the console only.
        IN_DISPATCH.with(|in_dispatch| {
            if in_dispatch.replace(true) {
                return;
            }
            self.event.invoke(&LogMessage::from_record(record));
            in_dispatch.set(false);
        });
    }

    fn flush(&self) {
        self.console.flush();
    }
}

/// Installs the [`EngineLogger`] as the global logger.
///
/// Returns `false` if a logger was already installed, in which case the
/// existing one stays active.
pub fn init_logger(default_filter: &str) -> bool {
    let logger = LOGGER.get_or_init(|| EngineLogger::new(default_filter));
    match log::set_logger(logger) {
        Ok(()) => {
            log::set_max_level(logger.filter());
            true
        }
        Err(_) => false,
    }
}

/// The logger module. Installs the engine logger on startup.
#[derive(Debug, Clone)]
pub struct Logger {
    default_filter: String,
}

impl Logger {
    /// Creates the module with a fallback filter such as `"info"`.
    pub fn new(default_filter: impl Into<String>) -> Self {
        Self {
            default_filter: default_filter.into(),
        }
    }
}

impl Module for Logger {
    fn name(&self) -> &'static str {
        "logger"
    }

    fn startup(&mut self) -> Result<(), ModuleError> {
        if init_logger(&self.default_filter) {
            log::info!("Engine logger installed (filter '{}').", self.default_filter);
        } else {
            log::debug!("A global logger is already installed; keeping it.");
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), ModuleError> {
        log::logger().flush();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogVerbosity;
    use std::sync::{Arc, Mutex};

    #[test]
    fn installed_logger_republishes_records() {
        let _ = init_logger("trace");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _guard = log_event().subscribe_scoped(move |msg: &LogMessage| {
            if msg.category == "logger_test" {
                sink.lock().unwrap().push(msg.clone());
            }
        });

        log::warn!(target: "logger_test", "disk almost full");
        log_fatal("logger_test", "out of memory");

        let seen = seen.lock().unwrap();
        // Another test may have installed a different logger first.
        if log::max_level() >= log::LevelFilter::Warn && !seen.is_empty() {
            assert_eq!(seen[0].verbosity, LogVerbosity::Warning);
            assert_eq!(seen[0].text, "disk almost full");
            assert_eq!(seen[1].verbosity, LogVerbosity::Fatal);
        }
    }

    #[test]
    fn logger_module_startup_is_idempotent() {
        let mut first = Logger::new("info");
        let mut second = Logger::new("debug");
        assert!(first.startup().is_ok());
        assert!(second.startup().is_ok());
        assert!(second.shutdown().is_ok());
    }
}
