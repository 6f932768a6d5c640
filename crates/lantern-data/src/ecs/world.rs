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

use super::components::{CameraComponent, EntityGuid, MeshComponent, Name, Transform, Velocity};
use super::definition::{ComponentDefinition, EntityDefinition, WorldDefinition};
use super::WorldError;
use glam::{Mat4, Vec3};
use hecs::{Component, DynamicBundle, Entity, EntityBuilder};
use lantern_core::AssetId;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// A named set of entities and their components.
pub struct EntityWorld {
    name: String,
    world: hecs::World,
}

impl fmt::Debug for EntityWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityWorld")
            .field("name", &self.name)
            .field("entities", &self.len())
            .finish()
    }
}

impl EntityWorld {
    /// Creates an empty world.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            world: hecs::World::new(),
        }
    }

    /// The world's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the world.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Spawns an entity with a [`Name`], a fresh [`EntityGuid`] and a default [`Transform`].
    pub fn spawn_named(&mut self, name: impl Into<String>) -> Entity {
        self.world
            .spawn((Name::new(name), EntityGuid::new(), Transform::default()))
    }

    /// Spawns an entity from a component bundle, adding a guid if it has none.
    pub fn spawn(&mut self, components: impl DynamicBundle) -> Entity {
        let entity = self.world.spawn(components);
        if self.world.get::<&EntityGuid>(entity).is_err() {
            // The entity was just spawned, so this cannot fail.
            let _ = self.world.insert_one(entity, EntityGuid::new());
        }
        entity
    }

    /// Removes an entity and all of its components.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), WorldError> {
        self.world
            .despawn(entity)
            .map_err(|_| WorldError::NoSuchEntity)
    }

    /// Returns `true` if the entity is alive.
    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    /// Returns `true` if the world has no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live entities in creation order.
    pub fn entities(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self.world.iter().map(|e| e.entity()).collect();
        entities.sort_by_key(|e| e.to_bits());
        entities
    }

    /// Shared access to one component.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<hecs::Ref<'_, T>> {
        self.world.get::<&T>(entity).ok()
    }

    /// Exclusive access to one component.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<hecs::RefMut<'_, T>> {
        self.world.get::<&mut T>(entity).ok()
    }

    /// Returns `true` if the entity has a `T`.
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.world.get::<&T>(entity).is_ok()
    }

    /// Adds or replaces a component.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), WorldError> {
        self.world
            .insert_one(entity, component)
            .map_err(|_| WorldError::NoSuchEntity)
    }

    /// Removes a component and returns it.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.world.remove_one::<T>(entity).ok()
    }

    /// The entity's display name.
    pub fn name_of(&self, entity: Entity) -> Option<String> {
        self.get::<Name>(entity).map(|n| n.0.clone())
    }

    /// The entity's stable guid.
    pub fn guid_of(&self, entity: Entity) -> Option<Uuid> {
        self.get::<EntityGuid>(entity).map(|g| g.0)
    }

    /// Looks up an entity by guid.
    pub fn find_by_guid(&self, guid: Uuid) -> Option<Entity> {
        self.world
            .iter()
            .find(|e| e.get::<&EntityGuid>().is_some_and(|g| g.0 == guid))
            .map(|e| e.entity())
    }

    /// Looks up the first entity with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.entities()
            .into_iter()
            .find(|&e| self.get::<Name>(e).is_some_and(|n| n.0 == name))
    }

    /// Integrates [`Velocity`] into [`Transform`].
    pub fn tick(&mut self, dt: f32) {
        for entity in self.entities() {
            if let Ok((transform, velocity)) = self
                .world
                .query_one_mut::<(&mut Transform, &Velocity)>(entity)
            {
                transform.position += velocity.linear * dt;
                transform.rotation += velocity.angular * dt;
            }
        }
    }

    /// The first active camera with its transform.
    pub fn active_camera(&self) -> Option<(Entity, Transform, CameraComponent)> {
        self.entities().into_iter().find_map(|entity| {
            let camera = *self.get::<CameraComponent>(entity)?;
            if !camera.active {
                return None;
            }
            let transform = self.get::<Transform>(entity).map(|t| *t).unwrap_or_default();
            Some((entity, transform, camera))
        })
    }

    /// Every entity with a mesh, with its model matrix.
    pub fn mesh_draws(&self) -> Vec<(AssetId, Mat4)> {
        self.entities()
            .into_iter()
            .filter_map(|entity| {
                let mesh = self.get::<MeshComponent>(entity)?.mesh;
                let model = self
                    .get::<Transform>(entity)
                    .map(|t| t.matrix())
                    .unwrap_or(Mat4::IDENTITY);
                Some((mesh, model))
            })
            .collect()
    }

    /// World position of an entity, if it has a transform.
    pub fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.get::<Transform>(entity).map(|t| t.position)
    }

    /// Captures the world as plain data.
    pub fn to_definition(&self) -> WorldDefinition {
        let entities = self
            .entities()
            .into_iter()
            .map(|entity| {
                let mut components = Vec::new();
                if let Some(name) = self.get::<Name>(entity) {
                    components.push(ComponentDefinition::from(&*name));
                }
                if let Some(transform) = self.get::<Transform>(entity) {
                    components.push(ComponentDefinition::from(&*transform));
                }
                if let Some(mesh) = self.get::<MeshComponent>(entity) {
                    components.push(ComponentDefinition::from(&*mesh));
                }
                if let Some(camera) = self.get::<CameraComponent>(entity) {
                    components.push(ComponentDefinition::from(&*camera));
                }
                if let Some(velocity) = self.get::<Velocity>(entity) {
                    components.push(ComponentDefinition::from(&*velocity));
                }
                EntityDefinition {
                    guid: self.guid_of(entity).unwrap_or_else(Uuid::new_v4),
                    components,
                }
            })
            .collect();
        WorldDefinition {
            name: self.name.clone(),
            entities,
        }
    }

    /// Builds a world from plain data. Guids must be unique.
    pub fn from_definition(definition: &WorldDefinition) -> Result<Self, WorldError> {
        let mut world = Self::new(definition.name.clone());
        let mut seen = HashSet::new();
        for entity in &definition.entities {
            if !seen.insert(entity.guid) {
                return Err(WorldError::DuplicateGuid(entity.guid));
            }
            let mut builder = EntityBuilder::new();
            builder.add(EntityGuid(entity.guid));
            for component in &entity.components {
                component.add_to(&mut builder);
            }
            world.world.spawn(builder.build());
        }
        Ok(world)
    }

    /// `{"name", "entities": [...]}` snapshot of the world.
    pub fn to_json(&self) -> Result<serde_json::Value, WorldError> {
        Ok(serde_json::to_value(self.to_definition())?)
    }

    /// Rebuilds a world from [`EntityWorld::to_json`] output.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, WorldError> {
        let definition = WorldDefinition::deserialize(value)?;
        Self::from_definition(&definition)
    }

    /// Despawns every entity.
    pub fn clear(&mut self) {
        self.world.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_world() -> (EntityWorld, Entity, Entity) {
        let mut world = EntityWorld::new("sample");
        let camera = world.spawn_named("Camera");
        world.insert(camera, CameraComponent::default()).unwrap();
        world
            .insert(camera, Transform::from_position(Vec3::new(0.0, 1.0, 5.0)))
            .unwrap();
        let cube = world.spawn_named("Cube");
        world
            .insert(cube, MeshComponent { mesh: AssetId::from_path("builtin://cube") })
            .unwrap();
        world
            .insert(
                cube,
                Velocity {
                    linear: Vec3::new(1.0, 0.0, 0.0),
                    angular: Vec3::new(0.0, 90.0, 0.0),
                },
            )
            .unwrap();
        (world, camera, cube)
    }

    #[test]
    fn spawn_named_has_identity_components() {
        let mut world = EntityWorld::new("w");
        let e = world.spawn_named("Player");
        assert_eq!(world.name_of(e).as_deref(), Some("Player"));
        assert!(world.guid_of(e).is_some());
        assert_eq!(*world.get::<Transform>(e).unwrap(), Transform::default());
        assert_eq!(world.find_by_name("Player"), Some(e));
    }

    #[test]
    fn spawned_bundles_get_a_guid() {
        let mut world = EntityWorld::new("w");
        let e = world.spawn((Transform::default(),));
        assert!(world.has::<EntityGuid>(e));

        let guid = EntityGuid::new();
        let f = world.spawn((guid,));
        assert_eq!(world.guid_of(f), Some(guid.0));
        assert_eq!(world.find_by_guid(guid.0), Some(f));
    }

    #[test]
    fn despawn_removes_entity() {
        let (mut world, camera, _) = sample_world();
        world.despawn(camera).unwrap();
        assert!(!world.contains(camera));
        assert!(matches!(world.despawn(camera), Err(WorldError::NoSuchEntity)));
        assert!(world.active_camera().is_none());
    }

    #[test]
    fn tick_integrates_velocity() {
        let (mut world, _, cube) = sample_world();
        world.tick(0.5);
        let t = *world.get::<Transform>(cube).unwrap();
        assert_eq!(t.position, Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(t.rotation, Vec3::new(0.0, 45.0, 0.0));
    }

    #[test]
    fn inactive_cameras_are_skipped() {
        let (mut world, camera, _) = sample_world();
        assert_eq!(world.active_camera().map(|c| c.0), Some(camera));
        world.get_mut::<CameraComponent>(camera).unwrap().active = false;
        assert!(world.active_camera().is_none());
    }

    #[test]
    fn components_can_be_removed() {
        let (mut world, _, cube) = sample_world();
        assert_eq!(world.mesh_draws().len(), 1);
        assert!(world.remove::<MeshComponent>(cube).is_some());
        assert!(world.mesh_draws().is_empty());
        assert!(world.remove::<MeshComponent>(cube).is_none());
    }

    #[test]
    fn json_snapshot_keeps_guids_and_components() {
        let (world, camera, cube) = sample_world();
        let json = world.to_json().unwrap();
        assert_eq!(json["name"], "sample");
        assert_eq!(json["entities"].as_array().unwrap().len(), 2);

        let restored = EntityWorld::from_json(&json).unwrap();
        assert_eq!(restored.len(), 2);
        let cube_guid = world.guid_of(cube).unwrap();
        let restored_cube = restored.find_by_guid(cube_guid).unwrap();
        assert_eq!(
            *restored.get::<Velocity>(restored_cube).unwrap(),
            *world.get::<Velocity>(cube).unwrap()
        );
        let camera_guid = world.guid_of(camera).unwrap();
        let restored_camera = restored.find_by_guid(camera_guid).unwrap();
        assert_eq!(restored.name_of(restored_camera).as_deref(), Some("Camera"));
        assert_eq!(
            restored.position_of(restored_camera),
            Some(Vec3::new(0.0, 1.0, 5.0))
        );
    }

    #[test]
    fn duplicate_guids_are_rejected() {
        let guid = Uuid::new_v4();
        let definition = WorldDefinition {
            name: "dup".into(),
            entities: vec![
                EntityDefinition { guid, components: vec![] },
                EntityDefinition { guid, components: vec![] },
            ],
        };
        assert!(matches!(
            EntityWorld::from_definition(&definition),
            Err(WorldError::DuplicateGuid(g)) if g == guid
        ));
    }

    #[test]
    fn clear_empties_the_world() {
        let (mut world, _, _) = sample_world();
        world.clear();
        assert!(world.is_empty());
    }
}
