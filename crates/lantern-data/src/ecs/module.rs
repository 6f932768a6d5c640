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

use super::components::{CameraComponent, MeshComponent, Transform};
use super::manager::WorldManager;
use super::world::EntityWorld;
use super::WorldError;
use glam::Vec3;
use lantern_core::asset::BUILTIN_CUBE;
use lantern_core::{AssetId, Module, ModuleError};
use std::any::Any;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of saved worlds.
pub const WORLD_EXTENSION: &str = "lworld";

const DEFAULT_WORLD: &str = "default";

/// Owns the loaded worlds and drives simulation.
#[derive(Debug, Default)]
pub struct EcsModule {
    worlds: WorldManager,
    snapshot: Option<serde_json::Value>,
    current_path: Option<PathBuf>,
}

impl EcsModule {
    /// Creates a module with no worlds.
    pub fn new() -> Self {
        Self::default()
    }

    /// The loaded worlds.
    pub fn worlds(&self) -> &WorldManager {
        &self.worlds
    }

    /// The loaded worlds, mutably.
    pub fn worlds_mut(&mut self) -> &mut WorldManager {
        &mut self.worlds
    }

    /// Creates an empty world and makes it active.
    pub fn create_world(&mut self, name: &str) -> Result<&mut EntityWorld, WorldError> {
        self.worlds.create(name)?;
        self.worlds.set_active(name)?;
        self.current_path = None;
        self.worlds.active_mut().ok_or(WorldError::NoActiveWorld)
    }

    /// Replaces the `default` world with a camera and a cube, and activates it.
    pub fn open_basic_world(&mut self) -> Result<&mut EntityWorld, WorldError> {
        self.simulate(false)?;
        if self.worlds.contains(DEFAULT_WORLD) {
            self.worlds.destroy(DEFAULT_WORLD)?;
        }
        let world = self.create_world(DEFAULT_WORLD)?;

        let camera = world.spawn_named("Camera");
        world.insert(camera, Transform::from_position(Vec3::new(0.0, 1.0, 5.0)))?;
        world.insert(camera, CameraComponent::default())?;

        let cube = world.spawn_named("Cube");
        world.insert(
            cube,
            MeshComponent {
                mesh: AssetId::from_path(BUILTIN_CUBE),
            },
        )?;

        log::info!("Opened basic world '{DEFAULT_WORLD}'");
        Ok(world)
    }

    /// Unloads a world, stopping the simulation first if it is the active one.
    pub fn close_world(&mut self, name: &str) -> Result<(), WorldError> {
        if self.worlds.active_name() == Some(name) {
            self.simulate(false)?;
            self.current_path = None;
        }
        self.worlds.destroy(name)?;
        Ok(())
    }

    /// The active world.
    pub fn current_world(&self) -> Option<&EntityWorld> {
        self.worlds.active()
    }

    /// The active world, mutably.
    pub fn current_world_mut(&mut self) -> Option<&mut EntityWorld> {
        self.worlds.active_mut()
    }

    /// File the active world was last loaded from or saved to.
    pub fn current_world_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// Advances the active world, but only while simulating.
    pub fn ecs_tick(&mut self, dt: f32) {
        if self.is_simulating() {
            self.worlds.tick_active(dt);
        }
    }

    /// Returns `true` between `simulate(true)` and `simulate(false)`.
    pub fn is_simulating(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Starts or stops simulation of the active world.
    ///
    /// Starting snapshots the world; stopping restores that snapshot, so edits
    /// made by the simulation are discarded. Asking for the current state does
    /// nothing.
    pub fn simulate(&mut self, enabled: bool) -> Result<(), WorldError> {
        match (enabled, self.snapshot.take()) {
            (true, Some(snapshot)) => {
                self.snapshot = Some(snapshot);
            }
            (true, None) => {
                let world = self.worlds.active().ok_or(WorldError::NoActiveWorld)?;
                self.snapshot = Some(world.to_json()?);
                log::info!("Simulation started on '{}'", world.name());
            }
            (false, Some(snapshot)) => {
                let world = EntityWorld::from_json(&snapshot)?;
                let name = world.name().to_owned();
                self.worlds.insert(world);
                self.worlds.set_active(&name)?;
                log::info!("Simulation stopped, '{name}' restored");
            }
            (false, None) => {}
        }
        Ok(())
    }

    /// Writes the active world to `path` as JSON.
    ///
    /// While simulating, the state from before the simulation started is saved.
    pub fn save_world(&mut self, path: &Path) -> Result<(), WorldError> {
        let json = match &self.snapshot {
            Some(snapshot) => snapshot.clone(),
            None => self
                .worlds
                .active()
                .ok_or(WorldError::NoActiveWorld)?
                .to_json()?,
        };
        let text = serde_json::to_string_pretty(&json)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| WorldError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, text).map_err(|source| WorldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.current_path = Some(path.to_path_buf());
        log::info!("World saved to {}", path.display());
        Ok(())
    }

    /// Reads a world file and makes it the active world. Returns its name.
    ///
    /// A running simulation is stopped first. A loaded world with the same
    /// name is replaced.
    pub fn load_world(&mut self, path: &Path) -> Result<String, WorldError> {
        self.simulate(false)?;
        let text = fs::read_to_string(path).map_err(|source| WorldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        let world = EntityWorld::from_json(&value)?;
        let name = world.name().to_owned();
        if self.worlds.insert(world).is_some() {
            log::debug!("Replaced loaded world '{name}'");
        }
        self.worlds.set_active(&name)?;
        self.current_path = Some(path.to_path_buf());
        log::info!("World '{name}' loaded from {}", path.display());
        Ok(name)
    }
}

impl Module for EcsModule {
    fn name(&self) -> &'static str {
        "ecs"
    }

    fn shutdown(&mut self) -> Result<(), ModuleError> {
        self.simulate(false)
            .map_err(|e| ModuleError::failed("ecs", e))?;
        self.worlds.clear();
        self.current_path = None;
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
    use crate::ecs::Velocity;

    #[test]
    fn basic_world_has_camera_and_cube() {
        let mut ecs = EcsModule::new();
        ecs.open_basic_world().unwrap();
        let world = ecs.current_world().unwrap();
        assert_eq!(world.name(), "default");
        assert_eq!(world.len(), 2);
        let (_, transform, _) = world.active_camera().unwrap();
        assert_eq!(transform.position, Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(world.mesh_draws()[0].0, AssetId::from_path(BUILTIN_CUBE));
    }

    #[test]
    fn ticks_only_while_simulating() {
        let mut ecs = EcsModule::new();
        ecs.create_world("w").unwrap();
        let e = ecs.current_world_mut().unwrap().spawn((
            Transform::default(),
            Velocity {
                linear: Vec3::X,
                angular: Vec3::ZERO,
            },
        ));

        ecs.ecs_tick(1.0);
        assert_eq!(ecs.current_world().unwrap().position_of(e), Some(Vec3::ZERO));

        ecs.simulate(true).unwrap();
        ecs.ecs_tick(1.0);
        assert_eq!(ecs.current_world().unwrap().position_of(e), Some(Vec3::X));
    }

    #[test]
    fn stopping_restores_the_snapshot() {
        let mut ecs = EcsModule::new();
        ecs.create_world("w").unwrap();
        let guid = {
            let world = ecs.current_world_mut().unwrap();
            let e = world.spawn((
                Transform::default(),
                Velocity {
                    linear: Vec3::Y,
                    angular: Vec3::ZERO,
                },
            ));
            world.guid_of(e).unwrap()
        };

        ecs.simulate(true).unwrap();
        ecs.simulate(true).unwrap();
        ecs.ecs_tick(2.0);
        ecs.current_world_mut().unwrap().spawn_named("temporary");
        ecs.simulate(false).unwrap();
        ecs.simulate(false).unwrap();

        let world = ecs.current_world().unwrap();
        assert!(!ecs.is_simulating());
        assert_eq!(world.len(), 1);
        let e = world.find_by_guid(guid).unwrap();
        assert_eq!(world.position_of(e), Some(Vec3::ZERO));
    }

    #[test]
    fn simulate_needs_an_active_world() {
        let mut ecs = EcsModule::new();
        assert!(matches!(ecs.simulate(true), Err(WorldError::NoActiveWorld)));
    }

    #[test]
    fn save_and_load_round_trip_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Worlds").join("level.lworld");

        let mut ecs = EcsModule::new();
        ecs.open_basic_world().unwrap();
        ecs.save_world(&path).unwrap();
        assert_eq!(ecs.current_world_path(), Some(path.as_path()));

        let mut other = EcsModule::new();
        let name = other.load_world(&path).unwrap();
        assert_eq!(name, "default");
        assert_eq!(other.current_world().unwrap().len(), 2);
    }

    #[test]
    fn saving_during_simulation_writes_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.lworld");

        let mut ecs = EcsModule::new();
        ecs.open_basic_world().unwrap();
        ecs.simulate(true).unwrap();
        ecs.current_world_mut().unwrap().spawn_named("runtime only");
        ecs.save_world(&path).unwrap();

        let mut other = EcsModule::new();
        other.load_world(&path).unwrap();
        assert_eq!(other.current_world().unwrap().len(), 2);
    }

    #[test]
    fn loading_a_missing_file_fails() {
        let mut ecs = EcsModule::new();
        let err = ecs.load_world(Path::new("does/not/exist.lworld")).unwrap_err();
        assert!(matches!(err, WorldError::Io { .. }));
    }

    #[test]
    fn shutdown_clears_worlds() {
        let mut ecs = EcsModule::new();
        ecs.open_basic_world().unwrap();
        ecs.simulate(true).unwrap();
        ecs.shutdown().unwrap();
        assert!(!ecs.is_simulating());
        assert!(ecs.current_world().is_none());
    }
}
