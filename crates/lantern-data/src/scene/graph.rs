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

use super::tree::{NodeId, SceneTree};
use super::{NodeKind, SceneError};
use glam::{Mat4, Vec3};
use lantern_core::AssetId;

/// A named [`SceneTree`] with an optional active camera.
#[derive(Debug, Default)]
pub struct Scene {
    name: String,
    tree: SceneTree,
    active_camera: Option<NodeId>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tree: SceneTree::new(),
            active_camera: None,
        }
    }

    /// The scene's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node storage.
    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Mutable node storage.
    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    /// Makes `id` the camera the scene is viewed through.
    pub fn set_active_camera(&mut self, id: NodeId) -> Result<(), SceneError> {
        let node = self.tree.get(id).ok_or(SceneError::StaleNode(id))?;
        if node.kind.camera().is_none() {
            return Err(SceneError::NotACamera(id));
        }
        self.active_camera = Some(id);
        Ok(())
    }

    /// The active camera, if it is still alive.
    pub fn active_camera(&self) -> Option<NodeId> {
        self.active_camera.filter(|&id| self.tree.contains(id))
    }

    /// View, projection and world position of the active camera.
    pub fn camera_matrices(&self) -> Option<(Mat4, Mat4, Vec3)> {
        let id = self.active_camera()?;
        let camera = self.tree.get(id)?.kind.camera()?;
        Some((
            self.tree.camera_view(id)?,
            camera.projection(),
            self.tree.global_position(id)?,
        ))
    }

    /// Every mesh instance that has a mesh, with its global transform.
    pub fn collect_draws(&self) -> Vec<(AssetId, Mat4)> {
        self.tree
            .iter()
            .filter_map(|(id, node)| match node.kind {
                NodeKind::MeshInstance {
                    mesh: Some(mesh), ..
                } => Some((mesh, self.tree.global_transform(id)?)),
                _ => None,
            })
            .collect()
    }
}
