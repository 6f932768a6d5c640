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

use super::world::EntityWorld;
use super::WorldError;
use std::collections::HashMap;

/// Loaded worlds by name, with at most one active.
#[derive(Debug, Default)]
pub struct WorldManager {
    worlds: HashMap<String, EntityWorld>,
    active: Option<String>,
}

impl WorldManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty world. Names must be unique.
    pub fn create(&mut self, name: &str) -> Result<&mut EntityWorld, WorldError> {
        if self.worlds.contains_key(name) {
            return Err(WorldError::AlreadyExists(name.to_owned()));
        }
        Ok(self
            .worlds
            .entry(name.to_owned())
            .or_insert_with(|| EntityWorld::new(name)))
    }

    /// Adds a world under its own name, replacing any world with that name.
    pub fn insert(&mut self, world: EntityWorld) -> Option<EntityWorld> {
        self.worlds.insert(world.name().to_owned(), world)
    }

    /// Unloads a world. Clears the active world if it was this one.
    pub fn destroy(&mut self, name: &str) -> Result<EntityWorld, WorldError> {
        let world = self
            .worlds
            .remove(name)
            .ok_or_else(|| WorldError::NotFound(name.to_owned()))?;
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        Ok(world)
    }

    /// A loaded world.
    pub fn get(&self, name: &str) -> Option<&EntityWorld> {
        self.worlds.get(name)
    }

    /// A loaded world, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut EntityWorld> {
        self.worlds.get_mut(name)
    }

    /// Returns `true` if a world with this name is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.worlds.contains_key(name)
    }

    /// The active world.
    pub fn active(&self) -> Option<&EntityWorld> {
        self.worlds.get(self.active.as_deref()?)
    }

    /// The active world, mutably.
    pub fn active_mut(&mut self) -> Option<&mut EntityWorld> {
        let name = self.active.as_deref()?;
        self.worlds.get_mut(name)
    }

    /// Name of the active world.
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Makes a loaded world the active one.
    pub fn set_active(&mut self, name: &str) -> Result<(), WorldError> {
        if !self.worlds.contains_key(name) {
            return Err(WorldError::NotFound(name.to_owned()));
        }
        self.active = Some(name.to_owned());
        Ok(())
    }

    /// Ticks the active world, if any.
    pub fn tick_active(&mut self, dt: f32) {
        if let Some(world) = self.active_mut() {
            world.tick(dt);
        }
    }

    /// Unloads every world.
    pub fn clear(&mut self) {
        self.worlds.clear();
        self.active = None;
    }

    /// Names of the loaded worlds, sorted.
    pub fn loaded_worlds(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.worlds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_are_rejected() {
        let mut manager = WorldManager::new();
        manager.create("level").unwrap();
        assert!(matches!(
            manager.create("level"),
            Err(WorldError::AlreadyExists(name)) if name == "level"
        ));
    }

    #[test]
    fn set_active_requires_a_loaded_world() {
        let mut manager = WorldManager::new();
        assert!(matches!(
            manager.set_active("missing"),
            Err(WorldError::NotFound(_))
        ));
        manager.create("a").unwrap();
        manager.set_active("a").unwrap();
        assert_eq!(manager.active_name(), Some("a"));
        assert_eq!(manager.active().map(|w| w.name()), Some("a"));
    }

    #[test]
    fn destroying_the_active_world_clears_it() {
        let mut manager = WorldManager::new();
        manager.create("a").unwrap();
        manager.set_active("a").unwrap();
        manager.destroy("a").unwrap();
        assert!(manager.active().is_none());
        assert!(manager.destroy("a").is_err());
    }

    #[test]
    fn loaded_worlds_are_sorted() {
        let mut manager = WorldManager::new();
        for name in ["zeta", "alpha", "mid"] {
            manager.create(name).unwrap();
        }
        assert_eq!(manager.loaded_worlds(), vec!["alpha", "mid", "zeta"]);
        manager.clear();
        assert!(manager.loaded_worlds().is_empty());
    }

    #[test]
    fn only_the_active_world_ticks() {
        use crate::ecs::{Transform, Velocity};
        use glam::Vec3;

        let mut manager = WorldManager::new();
        let moving = Velocity {
            linear: Vec3::X,
            angular: Vec3::ZERO,
        };
        let a = manager.create("a").unwrap().spawn((Transform::default(), moving));
        let b = manager.create("b").unwrap().spawn((Transform::default(), moving));
        manager.set_active("a").unwrap();
        manager.tick_active(1.0);

        assert_eq!(manager.get("a").unwrap().position_of(a), Some(Vec3::X));
        assert_eq!(manager.get("b").unwrap().position_of(b), Some(Vec3::ZERO));
    }
}
