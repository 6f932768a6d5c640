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

//! JSON form of node subtrees.

use super::node::{reserve_unique_id, Camera, Node, NodeKind, Spatial};
use super::tree::{NodeId, SceneTree};
use super::SceneError;
use glam::Vec3;
use lantern_core::AssetId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SpatialRecord {
    position: [f32; 3],
    rotation: [f32; 3],
    scale: [f32; 3],
}

impl From<&Spatial> for SpatialRecord {
    fn from(s: &Spatial) -> Self {
        Self {
            position: s.position.to_array(),
            rotation: s.rotation.to_array(),
            scale: s.scale.to_array(),
        }
    }
}

impl From<SpatialRecord> for Spatial {
    fn from(r: SpatialRecord) -> Self {
        Self {
            position: Vec3::from(r.position),
            rotation: Vec3::from(r.rotation),
            scale: Vec3::from(r.scale),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum KindRecord {
    Node,
    Node3D(SpatialRecord),
    Camera3D {
        spatial: SpatialRecord,
        fov: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    MeshInstance {
        spatial: SpatialRecord,
        mesh: Option<AssetId>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NodeRecord {
    #[serde(rename = "uniqueID")]
    unique_id: u64,
    name: String,
    kind: KindRecord,
    #[serde(default)]
    children: Vec<NodeRecord>,
}

impl KindRecord {
    fn capture(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Node => KindRecord::Node,
            NodeKind::Node3D(spatial) => KindRecord::Node3D(spatial.into()),
            NodeKind::Camera3D { spatial, camera } => KindRecord::Camera3D {
                spatial: spatial.into(),
                fov: camera.fov(),
                aspect: camera.aspect(),
                near: camera.near(),
                far: camera.far(),
            },
            NodeKind::MeshInstance { spatial, mesh } => KindRecord::MeshInstance {
                spatial: spatial.into(),
                mesh: *mesh,
            },
        }
    }

    fn restore(self) -> NodeKind {
        match self {
            KindRecord::Node => NodeKind::Node,
            KindRecord::Node3D(spatial) => NodeKind::Node3D(spatial.into()),
            KindRecord::Camera3D {
                spatial,
                fov,
                aspect,
                near,
                far,
            } => NodeKind::Camera3D {
                spatial: spatial.into(),
                camera: Camera::new(fov, aspect, near, far),
            },
            KindRecord::MeshInstance { spatial, mesh } => NodeKind::MeshInstance {
                spatial: spatial.into(),
                mesh,
            },
        }
    }
}

impl SceneTree {
    pub(crate) fn capture(&self, id: NodeId) -> Result<NodeRecord, SceneError> {
        let node = self.get(id).ok_or(SceneError::StaleNode(id))?;
        let children = node
            .children()
            .iter()
            .map(|&child| self.capture(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NodeRecord {
            unique_id: node.unique_id(),
            name: node.name.clone(),
            kind: KindRecord::capture(&node.kind),
            children,
        })
    }

    pub(crate) fn restore(
        &mut self,
        record: NodeRecord,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        reserve_unique_id(record.unique_id);
        let mut node = Node::new(record.name, record.kind.restore());
        node.unique_id = record.unique_id;
        let id = self.insert(node);
        self.push_root(id);
        if let Some(parent) = parent {
            self.add_child(parent, id)?;
        }
        for child in record.children {
            self.restore(child, Some(id))?;
        }
        Ok(id)
    }

    /// Serializes the subtree rooted at `id` as
    /// `{"uniqueID", "name", "kind", "children": [...]}`.
    pub fn to_json(&self, id: NodeId) -> Result<serde_json::Value, SceneError> {
        serde_json::to_value(self.capture(id)?)
            .map_err(|e| SceneError::Serialization(e.to_string()))
    }

    /// Rebuilds a serialized subtree, optionally under `parent`.
    ///
    /// Restored nodes keep their `uniqueID`, and later ids are allocated above it.
    pub fn from_json(
        &mut self,
        value: &serde_json::Value,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        let record = NodeRecord::deserialize(value)
            .map_err(|e| SceneError::Serialization(e.to_string()))?;
        self.restore(record, parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape_has_unique_id_and_children() {
        let mut tree = SceneTree::new();
        let root = tree.spawn("root", NodeKind::Node);
        tree.spawn_child(root, "cam", NodeKind::camera3d(Vec3::new(0.0, 1.0, 2.0)))
            .unwrap();

        let json = tree.to_json(root).unwrap();
        assert_eq!(json["uniqueID"], tree.get(root).unwrap().unique_id());
        assert_eq!(json["name"], "root");
        assert_eq!(json["kind"], "Node");
        assert_eq!(json["children"].as_array().unwrap().len(), 1);
        assert_eq!(json["children"][0]["kind"]["Camera3D"]["fov"], 60.0);
    }

    #[test]
    fn restoring_keeps_ids_structure_and_data() {
        let mut source = SceneTree::new();
        let root = source.spawn("root", NodeKind::node3d());
        let mesh = AssetId::from_path("Meshes/crate.obj");
        let child = source
            .spawn_child(root, "crate", NodeKind::mesh_instance(mesh))
            .unwrap();
        source
            .get_mut(child)
            .unwrap()
            .kind
            .spatial_mut()
            .unwrap()
            .position = Vec3::new(1.0, 2.0, 3.0);
        let json = source.to_json(root).unwrap();

        let mut target = SceneTree::new();
        let restored = target.from_json(&json, None).unwrap();
        let restored_child = target.children(restored)[0];
        let node = target.get(restored_child).unwrap();

        assert_eq!(node.unique_id(), source.get(child).unwrap().unique_id());
        assert_eq!(node.name, "crate");
        assert_eq!(node.kind, source.get(child).unwrap().kind);
        assert_eq!(target.roots(), &[restored]);

        let restored_uid = node.unique_id();
        let fresh = target.spawn("fresh", NodeKind::Node);
        assert!(target.get(fresh).unwrap().unique_id() > restored_uid);
    }

    #[test]
    fn malformed_json_is_reported() {
        let mut tree = SceneTree::new();
        let err = tree
            .from_json(&serde_json::json!({ "name": "x" }), None)
            .unwrap_err();
        assert!(matches!(err, SceneError::Serialization(_)));
        assert!(tree.is_empty());
    }
}
