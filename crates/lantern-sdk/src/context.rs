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

use lantern_core::{ModuleError, ModuleRegistry};
use lantern_data::Scene;

/// The part of an application the [`Engine`](crate::Engine) drives.
///
/// The engine registers its core modules between [`EngineContext::init_minor`]
/// and [`EngineContext::init_major`]. A context that registers one of the core
/// module types in `init_minor` replaces the engine's default instance.
pub trait EngineContext: 'static {
    /// Registers modules needed before the core modules.
    fn init_minor(&mut self, _modules: &mut ModuleRegistry) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Registers modules that depend on the core modules.
    fn init_major(&mut self, _modules: &mut ModuleRegistry) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Per-frame update, after the ECS and before rendering.
    fn tick(&mut self, dt: f32, modules: &mut ModuleRegistry);

    /// A scene graph to render next to the active ECS world.
    fn scene(&self) -> Option<&Scene> {
        None
    }

    /// Called before the modules are shut down.
    fn shutdown(&mut self, _modules: &mut ModuleRegistry) {}

    /// Returns `true` once the context wants the host to exit.
    fn exit_requested(&self) -> bool {
        false
    }
}
