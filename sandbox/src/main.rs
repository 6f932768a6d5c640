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

//! A spinning cube in the scene graph and a drifting ECS entity.
//! Space plays a tone, Escape quits.

use lantern_core::config::WindowConfig;
use lantern_core::platform::InputModule;
use lantern_infra::AudioModule;
use lantern_sdk::prelude::*;

const SPIN_DEGREES_PER_SECOND: f32 = 45.0;

#[derive(Default)]
struct Sandbox {
    spinner: Option<NodeId>,
    space_was_down: bool,
    quit: bool,
}

impl Application for Sandbox {
    fn setup(&mut self, scene: &mut Scene, modules: &mut ModuleRegistry) -> anyhow::Result<()> {
        let tree = scene.tree_mut();
        let root = tree.spawn("Root", NodeKind::node3d());
        let camera =
            tree.spawn_child(root, "Camera", NodeKind::camera3d(Vec3::new(0.0, 2.0, 6.0)))?;
        if let Some(spatial) = tree.get_mut(camera).and_then(|n| n.kind.spatial_mut()) {
            spatial.rotation.x = -15.0;
        }
        let spinner = tree.spawn_child(
            root,
            "Spinner",
            NodeKind::mesh_instance(AssetId::from_path(BUILTIN_CUBE)),
        )?;
        let floor = tree.spawn_child(
            root,
            "Floor",
            NodeKind::mesh_instance(AssetId::from_path(BUILTIN_PLANE)),
        )?;
        if let Some(spatial) = tree.get_mut(floor).and_then(|n| n.kind.spatial_mut()) {
            spatial.position.y = -1.0;
            spatial.scale = Vec3::splat(10.0);
        }
        scene.set_active_camera(camera)?;
        self.spinner = Some(spinner);

        let world = modules.require_mut::<EcsModule>()?.create_world("sandbox")?;
        let drifter = world.spawn_named("Drifter");
        world.insert(
            drifter,
            MeshComponent {
                mesh: AssetId::from_path(BUILTIN_CUBE),
            },
        )?;
        world.insert(
            drifter,
            Velocity {
                linear: Vec3::new(0.25, 0.0, 0.0),
                angular: Vec3::new(0.0, 90.0, 0.0),
            },
        )?;
        if let Some(mut transform) = world.get_mut::<Transform>(drifter) {
            transform.position = Vec3::new(-3.0, 0.0, -1.0);
            transform.scale = Vec3::splat(0.5);
        }
        log::info!("Sandbox ready: press Space for a tone, Escape to quit");
        Ok(())
    }

    fn update(&mut self, dt: f32, scene: &mut Scene, modules: &mut ModuleRegistry) {
        if let Some(id) = self.spinner {
            if let Some(spatial) = scene.tree_mut().get_mut(id).and_then(|n| n.kind.spatial_mut()) {
                spatial.rotation.y = (spatial.rotation.y + SPIN_DEGREES_PER_SECOND * dt) % 360.0;
            }
        }

        let Some(input) = modules.get::<InputModule>() else {
            return;
        };
        let space_down = input.state().is_key_down("Space");
        self.quit |= input.state().is_key_down("Escape");
        if space_down && !self.space_was_down {
            if let Some(audio) = modules.get::<AudioModule>() {
                audio.play_sound_async();
            }
        }
        self.space_was_down = space_down;
    }

    fn exit_requested(&self) -> bool {
        self.quit
    }
}

fn main() -> anyhow::Result<()> {
    let config = EngineConfig {
        window: WindowConfig {
            title: String::from("Lantern Sandbox"),
            ..WindowConfig::default()
        },
        ..EngineConfig::default()
    };
    run_game(Sandbox::default(), config)
}
