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

//! # Lantern Core
//!
//! Foundational crate containing the module contracts, event primitives,
//! logging, configuration and backend-agnostic renderer traits that every
//! other Lantern crate builds on.

#![warn(missing_docs)]

pub mod asset;
pub mod audio;
pub mod config;
pub mod deletion;
pub mod event;
pub mod logging;
pub mod math;
pub mod module;
pub mod platform;
pub mod renderer;
pub mod time;

pub use asset::AssetId;
pub use config::{EngineConfig, ModuleConfigRegistry};
pub use deletion::{DeletionQueue, FrameDeletionQueues};
pub use event::{Event, EventBus, Subscription, SubscriptionId};
pub use module::{Module, ModuleError, ModuleRegistry, OtherModules};
