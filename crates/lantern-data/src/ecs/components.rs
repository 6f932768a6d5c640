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

use glam::{EulerRot, Mat4, Quat, Vec3};
use lantern_core::math::{compose_trs, perspective};
use lantern_core::AssetId;
use uuid::Uuid;

/// Display name of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Name(pub String);

impl Name {
    /// Creates a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Identity of an entity that survives save and load.
///
/// Runtime `hecs::Entity` handles are reassigned on every load; this is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityGuid(pub Uuid);

impl EntityGuid {
    /// A fresh random guid.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityGuid {
    fn default() -> Self {
        Self::new()
    }
}

/// Position, Euler rotation in degrees and scale of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World position.
    pub position: Vec3,
    /// Euler rotation in degrees.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform {
    /// An identity transform moved to `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// `T * Rz * Ry * Rx * S`.
    pub fn matrix(&self) -> Mat4 {
        compose_trs(self.position, self.rotation, self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// Draws a mesh asset at the entity's transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshComponent {
    /// The mesh to draw.
    pub mesh: AssetId,
}

/// A perspective camera attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraComponent {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Whether this camera renders the world.
    pub active: bool,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            fov: 60.0,
            near: 0.1,
            far: 1000.0,
            active: true,
        }
    }
}

impl CameraComponent {
    /// View matrix looking down the transform's local -Z.
    pub fn view_matrix(&self, transform: &Transform) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            transform.rotation.y.to_radians(),
            transform.rotation.x.to_radians(),
            transform.rotation.z.to_radians(),
        );
        let forward = rotation * Vec3::NEG_Z;
        let up = rotation * Vec3::Y;
        Mat4::look_at_rh(transform.position, transform.position + forward, up)
    }

    /// Projection for the given viewport aspect ratio.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        perspective(self.fov, aspect, self.near, self.far)
    }
}

/// Linear velocity in units per second and angular velocity in degrees per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    /// Units per second.
    pub linear: Vec3,
    /// Degrees per second around each axis.
    pub angular: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn camera_at_origin_sees_points_in_front() {
        let camera = CameraComponent::default();
        let view = camera.view_matrix(&Transform::from_position(Vec3::new(0.0, 0.0, 3.0)));
        let p = view.transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), 1e-5));
    }

    #[test]
    fn guids_are_unique() {
        assert_ne!(EntityGuid::new(), EntityGuid::new());
    }
}
