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

//! Serializable form of an [`EntityWorld`](super::EntityWorld).

use super::components::{CameraComponent, MeshComponent, Name, Transform, Velocity};
use glam::Vec3;
use lantern_core::AssetId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The root container of a saved world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldDefinition {
    /// World name.
    pub name: String,
    /// Every entity, in a stable order.
    pub entities: Vec<EntityDefinition>,
}

/// One saved entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// The entity's stable guid.
    pub guid: Uuid,
    /// The components attached to the entity.
    pub components: Vec<ComponentDefinition>,
}

/// A serializable, type-erased component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentDefinition {
    /// [`Name`].
    Name(String),
    /// [`Transform`].
    Transform {
        /// Position.
        position: [f32; 3],
        /// Euler rotation in degrees.
        rotation: [f32; 3],
        /// Scale.
        scale: [f32; 3],
    },
    /// [`MeshComponent`].
    Mesh(AssetId),
    /// [`CameraComponent`].
    Camera {
        /// Vertical field of view in degrees.
        fov: f32,
        /// Near clip distance.
        near: f32,
        /// Far clip distance.
        far: f32,
        /// Whether the camera is active.
        active: bool,
    },
    /// [`Velocity`].
    Velocity {
        /// Units per second.
        linear: [f32; 3],
        /// Degrees per second.
        angular: [f32; 3],
    },
}

impl From<&Name> for ComponentDefinition {
    fn from(name: &Name) -> Self {
        ComponentDefinition::Name(name.0.clone())
    }
}

impl From<&Transform> for ComponentDefinition {
    fn from(t: &Transform) -> Self {
        ComponentDefinition::Transform {
            position: t.position.to_array(),
            rotation: t.rotation.to_array(),
            scale: t.scale.to_array(),
        }
    }
}

impl From<&MeshComponent> for ComponentDefinition {
    fn from(m: &MeshComponent) -> Self {
        ComponentDefinition::Mesh(m.mesh)
    }
}

impl From<&CameraComponent> for ComponentDefinition {
    fn from(c: &CameraComponent) -> Self {
        ComponentDefinition::Camera {
            fov: c.fov,
            near: c.near,
            far: c.far,
            active: c.active,
        }
    }
}

impl From<&Velocity> for ComponentDefinition {
    fn from(v: &Velocity) -> Self {
        ComponentDefinition::Velocity {
            linear: v.linear.to_array(),
            angular: v.angular.to_array(),
        }
    }
}

impl ComponentDefinition {
    /// Adds the runtime component this definition describes to `builder`.
    pub(crate) fn add_to(&self, builder: &mut hecs::EntityBuilder) {
        match self {
            ComponentDefinition::Name(name) => {
                builder.add(Name(name.clone()));
            }
            ComponentDefinition::Transform {
                position,
                rotation,
                scale,
            } => {
                builder.add(Transform {
                    position: Vec3::from(*position),
                    rotation: Vec3::from(*rotation),
                    scale: Vec3::from(*scale),
                });
            }
            ComponentDefinition::Mesh(mesh) => {
                builder.add(MeshComponent { mesh: *mesh });
            }
            ComponentDefinition::Camera {
                fov,
                near,
                far,
                active,
            } => {
                builder.add(CameraComponent {
                    fov: *fov,
                    near: *near,
                    far: *far,
                    active: *active,
                });
            }
            ComponentDefinition::Velocity { linear, angular } => {
                builder.add(Velocity {
                    linear: Vec3::from(*linear),
                    angular: Vec3::from(*angular),
                });
            }
        }
    }
}
