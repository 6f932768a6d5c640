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

//! The engine: module registration order, the frame loop and shutdown.

use crate::context::EngineContext;
use crate::render::RenderModule;
use lantern_core::config::ModuleConfigRegistry;
use lantern_core::logging::{init_logger, Logger};
use lantern_core::module::priority;
use lantern_core::platform::InputModule;
use lantern_core::renderer::{RenderTarget, Renderer};
use lantern_core::time::TimeModule;
use lantern_core::{EngineConfig, Module, ModuleError, ModuleRegistry};
use lantern_data::EcsModule;
use lantern_infra::AudioModule;
use lantern_io::ResourceModule;

/// Default resource root when no context provides one.
pub const DEFAULT_RESOURCE_ROOT: &str = "resources";

/// Drives an [`EngineContext`] and the core modules.
pub struct Engine<C: EngineContext> {
    config: EngineConfig,
    context: C,
    modules: ModuleRegistry,
    running: bool,
}

impl<C: EngineContext> Engine<C> {
    pub fn new(config: EngineConfig, context: C) -> Self {
        Self {
            config,
            context,
            modules: ModuleRegistry::new(),
            running: false,
        }
    }

    /// Registers and starts every module, rendering through `renderer`.
    ///
    /// Order: logger and context minor modules, then audio, input, resource,
    /// render, ECS and time, then context major modules. Core modules the
    /// context already registered are kept.
    pub fn startup(&mut self, renderer: Box<dyn Renderer>) -> Result<(), ModuleError> {
        if self.running {
            return Ok(());
        }
        init_logger(&self.config.log_filter);
        log::info!("Starting Lantern engine");
        let module_configs = self.config.module_configs();

        register_default(
            &mut self.modules,
            Logger::new(self.config.log_filter.clone()),
            priority::LOGGER,
        )?;
        self.context.init_minor(&mut self.modules)?;

        register_default(
            &mut self.modules,
            configured(AudioModule::new(), &module_configs),
            priority::AUDIO,
        )?;
        register_default(&mut self.modules, InputModule::new(), priority::INPUT)?;
        register_default(
            &mut self.modules,
            ResourceModule::new(DEFAULT_RESOURCE_ROOT),
            priority::RESOURCE,
        )?;
        register_default(
            &mut self.modules,
            configured(RenderModule::new(renderer), &module_configs),
            priority::RENDER,
        )?;
        register_default(&mut self.modules, EcsModule::new(), priority::ECS)?;
        register_default(&mut self.modules, TimeModule::new(), priority::TIME)?;

        self.context.init_major(&mut self.modules)?;

        self.modules.startup_all()?;
        self.running = true;
        log::info!("Modules started: {:?}", self.modules.startup_order());
        Ok(())
    }

    /// Initializes the renderer for `target`.
    pub fn attach(&mut self, target: RenderTarget<'_>) -> Result<(), ModuleError> {
        self.modules.require_mut::<RenderModule>()?.attach(target)
    }

    /// Runs one frame.
    pub fn tick(&mut self, dt: f32) -> Result<(), ModuleError> {
        if !self.running {
            return Err(ModuleError::failed("engine", "tick before startup"));
        }

        if let Some(time) = self.modules.get_mut::<TimeModule>() {
            time.tick(dt);
        }
        if let Some(ecs) = self.modules.get_mut::<EcsModule>() {
            ecs.ecs_tick(dt);
        }
        self.context.tick(dt, &mut self.modules);

        if let Some((render, others)) = self.modules.split_mut::<RenderModule>() {
            if render.is_attached() {
                let world = others
                    .get::<EcsModule>()
                    .and_then(EcsModule::current_world);
                let resources = others.get::<ResourceModule>();
                render.extract_frame(world, self.context.scene(), resources);
                match render.render() {
                    Ok(stats) => log::trace!(
                        "Frame {} rendered: {} draws, {} skipped",
                        stats.frame_index,
                        stats.draw_calls,
                        stats.skipped_draws
                    ),
                    Err(e) => log::error!("Rendering error: {e}"),
                }
            }
        }

        if let Some(input) = self.modules.get_mut::<InputModule>() {
            input.end_frame();
        }
        Ok(())
    }

    /// Stops the context and every module. Calling it again does nothing.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        log::info!("Shutting down Lantern engine");
        if let Some(render) = self.modules.get_mut::<RenderModule>() {
            render.wait_idle();
        }
        self.context.shutdown(&mut self.modules);
        if let Err(e) = self.modules.shutdown_all() {
            log::error!("Module shutdown failed: {e}");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns `true` when the context asked to exit.
    pub fn exit_requested(&self) -> bool {
        self.context.exit_requested()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.modules
    }

    /// Borrows the context and the modules at the same time.
    pub fn parts_mut(&mut self) -> (&mut C, &mut ModuleRegistry) {
        (&mut self.context, &mut self.modules)
    }
}

impl<C: EngineContext> Drop for Engine<C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn register_default<M: Module>(
    modules: &mut ModuleRegistry,
    module: M,
    priority: i32,
) -> Result<(), ModuleError> {
    if modules.contains::<M>() {
        log::debug!("Keeping context-provided module '{}'", module.name());
        return Ok(());
    }
    modules.register(module, priority)
}

fn configured<M: lantern_core::config::ConfigurableModule>(
    mut module: M,
    configs: &ModuleConfigRegistry,
) -> M {
    configs.apply_config(&mut module);
    module
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_core::asset::BUILTIN_CUBE;
    use lantern_core::platform::InputEvent;
    use lantern_core::AssetId;
    use lantern_data::ecs::{MeshComponent, Velocity};
    use lantern_infra::HeadlessRenderer;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Probe {
        journal: Arc<Mutex<Vec<String>>>,
        exit: bool,
    }

    impl EngineContext for Probe {
        fn init_minor(&mut self, modules: &mut ModuleRegistry) -> Result<(), ModuleError> {
            self.journal
                .lock()
                .unwrap()
                .push(format!("minor {}", modules.len()));
            Ok(())
        }

        fn init_major(&mut self, modules: &mut ModuleRegistry) -> Result<(), ModuleError> {
            self.journal
                .lock()
                .unwrap()
                .push(format!("major {}", modules.len()));
            Ok(())
        }

        fn tick(&mut self, _dt: f32, modules: &mut ModuleRegistry) {
            let simulating = modules.get::<EcsModule>().is_some_and(EcsModule::is_simulating);
            self.journal
                .lock()
                .unwrap()
                .push(format!("tick simulating={simulating}"));
        }

        fn shutdown(&mut self, _modules: &mut ModuleRegistry) {
            self.journal.lock().unwrap().push("shutdown".into());
        }

        fn exit_requested(&self) -> bool {
            self.exit
        }
    }

    fn quiet_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.audio.enabled = false;
        config
    }

    fn started(probe: Probe) -> Engine<Probe> {
        let mut engine = Engine::new(quiet_config(), probe);
        engine.startup(Box::new(HeadlessRenderer::new())).unwrap();
        engine
            .attach(RenderTarget::Headless {
                width: 640,
                height: 360,
            })
            .unwrap();
        engine
    }

    #[test]
    fn context_hooks_surround_core_registration() {
        let probe = Probe::default();
        let journal = probe.journal.clone();
        let engine = started(probe);

        assert_eq!(
            engine.modules().startup_order(),
            vec!["logger", "audio", "input", "resource", "render", "ecs", "time"]
        );
        assert_eq!(*journal.lock().unwrap(), vec!["minor 1", "major 7"]);
    }

    #[test]
    fn tick_simulates_and_renders_the_active_world() {
        let mut engine = started(Probe::default());
        {
            let ecs = engine.modules_mut().get_mut::<EcsModule>().unwrap();
            let world = ecs.open_basic_world().unwrap();
            let mover = world.spawn_named("mover");
            world
                .insert(mover, MeshComponent { mesh: AssetId::from_path(BUILTIN_CUBE) })
                .unwrap();
            world
                .insert(
                    mover,
                    Velocity {
                        linear: lantern_core::math::Vec3::X,
                        ..Default::default()
                    },
                )
                .unwrap();
            ecs.simulate(true).unwrap();
        }

        engine.tick(0.5).unwrap();

        let ecs = engine.modules().get::<EcsModule>().unwrap();
        let world = ecs.current_world().unwrap();
        let mover = world.find_by_name("mover").unwrap();
        assert_eq!(world.position_of(mover).unwrap().x, 0.5);

        let stats = engine.modules().get::<RenderModule>().unwrap().last_stats().unwrap();
        assert_eq!(stats.draw_calls, 2);
        assert_eq!(stats.skipped_draws, 0);
    }

    #[test]
    fn input_state_is_reset_after_each_frame() {
        let mut engine = started(Probe::default());
        engine
            .modules_mut()
            .get_mut::<InputModule>()
            .unwrap()
            .push_event(InputEvent::MouseWheelScrolled { delta_x: 0.0, delta_y: 1.0 });
        engine.tick(0.016).unwrap();
        let input = engine.modules().get::<InputModule>().unwrap();
        assert_eq!(input.state().wheel(), (0.0, 0.0));
    }

    #[test]
    fn shutdown_runs_once_and_stops_modules() {
        let probe = Probe {
            exit: true,
            ..Probe::default()
        };
        let journal = probe.journal.clone();
        let mut engine = started(probe);
        assert!(engine.exit_requested());

        engine.shutdown();
        engine.shutdown();
        assert!(!engine.is_running());
        assert!(!engine.modules().is_started::<RenderModule>());
        assert_eq!(
            journal.lock().unwrap().iter().filter(|l| *l == "shutdown").count(),
            1
        );
        assert!(engine.tick(0.016).is_err());
    }
}
