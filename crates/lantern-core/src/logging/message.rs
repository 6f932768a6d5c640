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

use std::fmt;

/// Prefix marking an error record as fatal.
pub(crate) const FATAL_MARKER: &str = "FATAL: ";

/// Severity of a log line, as shown in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogVerbosity {
    /// Trace-level chatter.
    Verbose,
    /// Developer diagnostics.
    Debug,
    /// Normal operation.
    Info,
    /// Something unexpected that the engine recovered from.
    Warning,
    /// An operation failed.
    Error,
    /// The engine cannot continue.
    Fatal,
}

impl LogVerbosity {
    /// Every verbosity, from least to most severe.
    pub const ALL: [LogVerbosity; 6] = [
        LogVerbosity::Verbose,
        LogVerbosity::Debug,
        LogVerbosity::Info,
        LogVerbosity::Warning,
        LogVerbosity::Error,
        LogVerbosity::Fatal,
    ];

    /// The display label, e.g. `"Warning"`.
    pub fn label(self) -> &'static str {
        match self {
            LogVerbosity::Verbose => "Verbose",
            LogVerbosity::Debug => "Debug",
            LogVerbosity::Info => "Info",
            LogVerbosity::Warning => "Warning",
            LogVerbosity::Error => "Error",
            LogVerbosity::Fatal => "Fatal",
        }
    }

    /// The `log` level used to emit a line of this verbosity.
    pub fn to_level(self) -> log::Level {
        match self {
            LogVerbosity::Verbose => log::Level::Trace,
            LogVerbosity::Debug => log::Level::Debug,
            LogVerbosity::Info => log::Level::Info,
            LogVerbosity::Warning => log::Level::Warn,
            LogVerbosity::Error | LogVerbosity::Fatal => log::Level::Error,
        }
    }
}

impl From<log::Level> for LogVerbosity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => LogVerbosity::Verbose,
            log::Level::Debug => LogVerbosity::Debug,
            log::Level::Info => LogVerbosity::Info,
            log::Level::Warn => LogVerbosity::Warning,
            log::Level::Error => LogVerbosity::Error,
        }
    }
}

impl fmt::Display for LogVerbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One log line as delivered to subscribers of the log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    /// Severity.
    pub verbosity: LogVerbosity,
    /// The record target, usually the emitting module path.
    pub category: String,
    /// The formatted message body.
    pub text: String,
}

impl LogMessage {
    /// Builds a message, e.g. for tests or synthetic lines.
    pub fn new(
        verbosity: LogVerbosity,
        category: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            verbosity,
            category: category.into(),
            text: text.into(),
        }
    }

    /// Converts a `log` record, recognising the fatal marker.
    pub fn from_record(record: &log::Record<'_>) -> Self {
        let body = record.args().to_string();
        if record.level() == log::Level::Error {
            if let Some(rest) = body.strip_prefix(FATAL_MARKER) {
                return Self::new(LogVerbosity::Fatal, record.target(), rest);
            }
        }
        Self::new(record.level().into(), record.target(), body)
    }
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.verbosity, self.text)
    }
}
