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

use super::tree::NodeId;
use glam::{EulerRot, Mat4, Quat, Vec3};
use lantern_core::math::{compose_trs, perspective};
use lantern_core::AssetId;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_UNIQUE_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_unique_id() -> u64 {
    NEXT_UNIQUE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Makes sure ids handed out later never collide with a restored one.
pub(crate) fn reserve_unique_id(restored: u64) {
    NEXT_UNIQUE_ID.fetch_max(restored.saturating_add(1), Ordering::Relaxed);
}

/// Local placement of a 3D node. Rotation is Euler angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spatial {
    /// Translation relative to the parent.
    pub position: Vec3,
    /// Euler rotation in degrees (x, y, z).
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Spatial {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Spatial {
    /// Placement at `position` with no rotation and unit scale.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// `T * Rz * Ry * Rx * S`.
    pub fn local_transform(&self) -> Mat4 {
        compose_trs(self.position, self.rotation, self.scale)
    }
}

/// Perspective camera parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(60.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl Camera {
    /// Creates a camera and builds its projection.
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            projection: perspective(fov, aspect, near, far),
        }
    }

    /// Replaces every parameter and rebuilds the projection.
    pub fn set_perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) {
        *self = Self::new(fov, aspect, near, far);
    }

    /// Updates only the aspect ratio.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.set_perspective(self.fov, aspect, self.near, self.far);
    }

    /// Vertical field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Near clip distance.
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Far clip distance.
    pub fn far(&self) -> f32 {
        self.far
    }

    /// The cached projection matrix.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Builds a view matrix from a world position and Euler rotation in degrees.
    ///
    /// Yaw is the y angle, pitch the x angle and roll the z angle. The camera
    /// looks down its local -Z with +Y up.
    pub fn view_matrix(position: Vec3, rotation_degrees: Vec3) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            rotation_degrees.y.to_radians(),
            rotation_degrees.x.to_radians(),
            rotation_degrees.z.to_radians(),
        );
        let forward = rotation * Vec3::NEG_Z;
        let up = rotation * Vec3::Y;
        Mat4::look_at_rh(position, position + forward, up)
    }
}

/// What a node is, and the data that comes with it.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A plain grouping node without a transform.
    Node,
    /// A node with a 3D transform.
    Node3D(Spatial),
    /// A 3D node that can view the scene.
    Camera3D {
        /// Placement.
        spatial: Spatial,
        /// Projection parameters.
        camera: Camera,
    },
    /// A 3D node that draws a mesh.
    MeshInstance {
        /// Placement.
        spatial: Spatial,
        /// Mesh asset to draw, if any.
        mesh: Option<AssetId>,
    },
}

impl NodeKind {
    /// A `Node3D` at the origin.
    pub fn node3d() -> Self {
        NodeKind::Node3D(Spatial::default())
    }

    /// A `Camera3D` at `position` with default projection.
    pub fn camera3d(position: Vec3) -> Self {
        NodeKind::Camera3D {
            spatial: Spatial::at(position),
            camera: Camera::default(),
        }
    }

    /// A `MeshInstance` drawing `mesh` at the origin.
    pub fn mesh_instance(mesh: AssetId) -> Self {
        NodeKind::MeshInstance {
            spatial: Spatial::default(),
            mesh: Some(mesh),
        }
    }

    /// The transform of spatial kinds.
    pub fn spatial(&self) -> Option<&Spatial> {
        match self {
            NodeKind::Node => None,
            NodeKind::Node3D(spatial)
            | NodeKind::Camera3D { spatial, .. }
            | NodeKind::MeshInstance { spatial, .. } => Some(spatial),
        }
    }

    /// Mutable transform of spatial kinds.
    pub fn spatial_mut(&mut self) -> Option<&mut Spatial> {
        match self {
            NodeKind::Node => None,
            NodeKind::Node3D(spatial)
            | NodeKind::Camera3D { spatial, .. }
            | NodeKind::MeshInstance { spatial, .. } => Some(spatial),
        }
    }

    /// Camera parameters of a `Camera3D`.
    pub fn camera(&self) -> Option<&Camera> {
        match self {
            NodeKind::Camera3D { camera, .. } => Some(camera),
            _ => None,
        }
    }

    /// Mutable camera parameters of a `Camera3D`.
    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        match self {
            NodeKind::Camera3D { camera, .. } => Some(camera),
            _ => None,
        }
    }

    /// Short type label used in tools and serialized data.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Node => "Node",
            NodeKind::Node3D(_) => "Node3D",
            NodeKind::Camera3D { .. } => "Camera3D",
            NodeKind::MeshInstance { .. } => "MeshInstance",
        }
    }
}

/// A node stored in a [`SceneTree`](super::SceneTree).
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) unique_id: u64,
    /// Display name.
    pub name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Kind-specific data.
    pub kind: NodeKind,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            unique_id: next_unique_id(),
            name: name.into(),
            parent: None,
            children: Vec::new(),
            kind,
        }
    }

    /// Process-unique id, preserved through serialization.
    pub fn unique_id(&self) -> u64 {
        self.unique_id
    }

    /// The parent node, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
