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

use crate::context::EngineContext;
use lantern_core::config::WindowConfig;
use lantern_core::module::priority;
use lantern_core::{ModuleError, ModuleRegistry};
use lantern_data::{EcsModule, Scene};
use lantern_infra::WindowModule;

/// Game logic run by [`run_game`](crate::run_game).
pub trait Application: 'static {
    /// Called once after the core modules are registered, before they start.
    fn setup(&mut self, scene: &mut Scene, modules: &mut ModuleRegistry) -> anyhow::Result<()>;

    /// Called every frame.
    fn update(&mut self, dt: f32, scene: &mut Scene, modules: &mut ModuleRegistry);

    /// Returns `true` to close the game.
    fn exit_requested(&self) -> bool {
        false
    }
}

/// The [`EngineContext`] of a standalone game: owns the window module, the
/// application and its scene.
pub struct GameContext<A: Application> {
    app: A,
    scene: Scene,
    window: WindowConfig,
}

impl<A: Application> GameContext<A> {
    pub fn new(app: A, window: WindowConfig) -> Self {
        Self {
            scene: Scene::new(window.title.clone()),
            app,
            window,
        }
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}

impl<A: Application> EngineContext for GameContext<A> {
    fn init_minor(&mut self, modules: &mut ModuleRegistry) -> Result<(), ModuleError> {
        modules.register(WindowModule::new(self.window.clone()), priority::WINDOW)
    }

    fn init_major(&mut self, modules: &mut ModuleRegistry) -> Result<(), ModuleError> {
        self.app.setup(&mut self.scene, modules)?;
        // Games run their world from the first frame.
        if let Some(ecs) = modules.get_mut::<EcsModule>() {
            if ecs.current_world().is_some() {
                ecs.simulate(true)
                    .map_err(|e| ModuleError::failed("ecs", e))?;
            }
        }
        Ok(())
    }

    fn tick(&mut self, dt: f32, modules: &mut ModuleRegistry) {
        self.app.update(dt, &mut self.scene, modules);
    }

    fn scene(&self) -> Option<&Scene> {
        Some(&self.scene)
    }

    fn exit_requested(&self) -> bool {
        self.app.exit_requested()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Engine, RenderModule};
    use lantern_core::asset::BUILTIN_CUBE;
    use lantern_core::math::Vec3;
    use lantern_core::renderer::RenderTarget;
    use lantern_core::{AssetId, EngineConfig};
    use lantern_data::ecs::Velocity;
    use lantern_data::NodeKind;
    use lantern_infra::HeadlessRenderer;

    #[derive(Default)]
    struct Spinner {
        frames: u32,
    }

    impl Application for Spinner {
        fn setup(&mut self, scene: &mut Scene, modules: &mut ModuleRegistry) -> anyhow::Result<()> {
            let tree = scene.tree_mut();
            let camera = tree.spawn("camera", NodeKind::camera3d(Vec3::new(0.0, 0.0, 4.0)));
            tree.spawn("cube", NodeKind::mesh_instance(AssetId::from_path(BUILTIN_CUBE)));
            scene.set_active_camera(camera)?;

            let ecs = modules.require_mut::<EcsModule>()?;
            let world = ecs.create_world("game")?;
            let mover = world.spawn_named("mover");
            world.insert(
                mover,
                Velocity {
                    linear: Vec3::Y,
                    ..Default::default()
                },
            )?;
            Ok(())
        }

        fn update(&mut self, _dt: f32, _scene: &mut Scene, _modules: &mut ModuleRegistry) {
            self.frames += 1;
        }

        fn exit_requested(&self) -> bool {
            self.frames >= 2
        }
    }

    #[test]
    fn game_context_drives_the_application() {
        let mut config = EngineConfig::default();
        config.audio.enabled = false;
        let context = GameContext::new(Spinner::default(), config.window.clone());
        let mut engine = Engine::new(config, context);
        engine.startup(Box::new(HeadlessRenderer::new())).unwrap();
        engine
            .attach(RenderTarget::Headless { width: 64, height: 64 })
            .unwrap();
        assert!(engine.modules().contains::<WindowModule>());

        engine.tick(1.0).unwrap();
        assert!(!engine.exit_requested());
        engine.tick(1.0).unwrap();
        assert!(engine.exit_requested());

        let ecs = engine.modules().get::<EcsModule>().unwrap();
        assert!(ecs.is_simulating());
        let world = ecs.current_world().unwrap();
        let mover = world.find_by_name("mover").unwrap();
        assert_eq!(world.position_of(mover), Some(Vec3::new(0.0, 2.0, 0.0)));

        let render = engine.modules().get::<RenderModule>().unwrap();
        assert_eq!(render.frame().camera_position, Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(render.last_stats().unwrap().draw_calls, 1);
    }
}
