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

//! Engine logging built on the `log` facade.
//!
//! [`EngineLogger`] forwards every record to an `env_logger` console logger
//! and republishes it as a [`LogMessage`] on [`log_event`], which is how the
//! editor output log receives lines.

mod logger;
mod message;

pub use logger::{init_logger, log_event, log_fatal, EngineLogger, Logger};
pub use message::{LogMessage, LogVerbosity};
