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

//! # Lantern SDK
//!
//! The engine loop and its hosts. [`Engine`] owns the module registry and
//! drives an [`EngineContext`]; [`run_game`] wraps it in a winit window for
//! standalone games, while tools embed an `Engine` in their own host.

mod context;
mod engine;
mod game;
mod render;
mod runner;

pub use context::EngineContext;
pub use engine::{Engine, DEFAULT_RESOURCE_ROOT};
pub use game::{Application, GameContext};
pub use render::RenderModule;
pub use runner::run_game;

/// Re-exports commonly needed by applications.
pub mod prelude {
    pub use crate::{run_game, Application, Engine, EngineContext, GameContext, RenderModule};
    pub use lantern_core::asset::{BUILTIN_CUBE, BUILTIN_PLANE};
    pub use lantern_core::math::{Mat4, Quat, Vec3};
    pub use lantern_core::{AssetId, EngineConfig, Module, ModuleError, ModuleRegistry};
    pub use lantern_data::ecs::{CameraComponent, MeshComponent, Name, Transform, Velocity};
    pub use lantern_data::{EcsModule, EntityWorld, NodeId, NodeKind, Scene};
    pub use lantern_io::ResourceModule;
}
