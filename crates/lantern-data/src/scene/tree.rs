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

use super::node::{Camera, Node, NodeKind};
use super::SceneError;
use glam::{Mat4, Vec3};

/// A generational handle to a node in a [`SceneTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena storage for a node hierarchy.
#[derive(Debug, Clone, Default)]
pub struct SceneTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
    len: usize,
}

impl SceneTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a detached root node.
    pub fn spawn(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let id = self.insert(Node::new(name, kind));
        self.roots.push(id);
        id
    }

    /// Inserts a node directly under `parent`.
    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> Result<NodeId, SceneError> {
        self.check(parent)?;
        let id = self.insert(Node::new(name, kind));
        self.roots.push(id);
        self.add_child(parent, id)?;
        Ok(id)
    }

    pub(crate) fn insert(&mut self, node: Node) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    pub(crate) fn push_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    fn check(&self, id: NodeId) -> Result<(), SceneError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(SceneError::StaleNode(id))
        }
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the node behind `id`.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    /// Returns the node behind `id`, mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nodes without a parent, in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// The parent of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// The children of `id`, or an empty slice for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children()).unwrap_or(&[])
    }

    /// Iterates over every live node.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node.as_ref().map(|node| {
                (
                    NodeId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    node,
                )
            })
        })
    }

    /// Finds a node by its process-unique id.
    pub fn find_by_unique_id(&self, unique_id: u64) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.unique_id == unique_id)
            .map(|(id, _)| id)
    }

    /// Finds the first node with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Attaches `child` under `parent`, detaching it from any previous parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child {
            return Err(SceneError::SelfParent(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }
        self.detach(child);
        self.roots.retain(|&root| root != child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Detaches `child` from `parent`; the child becomes a root.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.check(parent)?;
        self.check(child)?;
        if self.parent(child) != Some(parent) {
            return Err(SceneError::NotAChild { parent, child });
        }
        self.detach(child);
        self.roots.push(child);
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
    }

    /// Removes `id` and its whole subtree. Returns the number of removed nodes.
    pub fn destroy(&mut self, id: NodeId) -> Result<usize, SceneError> {
        self.check(id)?;
        self.detach(id);
        self.roots.retain(|&root| root != id);

        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                removed += 1;
            }
        }
        self.len -= removed;
        Ok(removed)
    }

    /// The node's local transform, identity for non-spatial nodes.
    pub fn local_transform(&self, id: NodeId) -> Option<Mat4> {
        let node = self.get(id)?;
        Some(
            node.kind
                .spatial()
                .map(|s| s.local_transform())
                .unwrap_or(Mat4::IDENTITY),
        )
    }

    /// Yields the spatial ancestors of `id`, nearest first, stopping at the
    /// first non-spatial parent.
    fn spatial_ancestors(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        let mut current = self.parent(id);
        std::iter::from_fn(move || {
            let node = self.get(current?)?;
            node.kind.spatial()?;
            current = node.parent;
            Some(node)
        })
    }

    /// Parent global transform times local transform.
    pub fn global_transform(&self, id: NodeId) -> Option<Mat4> {
        let mut transform = self.local_transform(id)?;
        if self.get(id)?.kind.spatial().is_none() {
            return Some(transform);
        }
        for ancestor in self.spatial_ancestors(id) {
            if let Some(spatial) = ancestor.kind.spatial() {
                transform = spatial.local_transform() * transform;
            }
        }
        Some(transform)
    }

    /// World-space position (translation column of the global transform).
    pub fn global_position(&self, id: NodeId) -> Option<Vec3> {
        self.global_transform(id).map(|m| m.w_axis.truncate())
    }

    /// Sum of the node's rotation and its spatial ancestors' rotations, in degrees.
    pub fn global_rotation(&self, id: NodeId) -> Option<Vec3> {
        let own = self.get(id)?.kind.spatial()?.rotation;
        Some(
            self.spatial_ancestors(id)
                .filter_map(|node| node.kind.spatial())
                .fold(own, |acc, s| acc + s.rotation),
        )
    }

    /// Component-wise product of the node's scale and its spatial ancestors' scales.
    pub fn global_scale(&self, id: NodeId) -> Option<Vec3> {
        let own = self.get(id)?.kind.spatial()?.scale;
        Some(
            self.spatial_ancestors(id)
                .filter_map(|node| node.kind.spatial())
                .fold(own, |acc, s| acc * s.scale),
        )
    }

    /// View matrix of a `Camera3D` from its global position and rotation.
    pub fn camera_view(&self, id: NodeId) -> Option<Mat4> {
        self.get(id)?.kind.camera()?;
        Some(Camera::view_matrix(
            self.global_position(id)?,
            self.global_rotation(id)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Spatial;

    /// A small fixture: root Node3D with a child and a grandchild.
    fn testable_chain() -> (SceneTree, NodeId, NodeId, NodeId) {
        let mut tree = SceneTree::new();
        let root = tree.spawn("root", NodeKind::node3d());
        let child = tree.spawn_child(root, "child", NodeKind::node3d()).unwrap();
        let leaf = tree.spawn_child(child, "leaf", NodeKind::node3d()).unwrap();
        (tree, root, child, leaf)
    }

    fn set_spatial(tree: &mut SceneTree, id: NodeId, spatial: Spatial) {
        *tree.get_mut(id).unwrap().kind.spatial_mut().unwrap() = spatial;
    }

    #[test]
    fn add_child_sets_parent_and_children() {
        let (tree, root, child, leaf) = testable_chain();
        assert_eq!(tree.parent(child), Some(root));
        assert_eq!(tree.children(root), &[child]);
        assert_eq!(tree.children(child), &[leaf]);
        assert_eq!(tree.roots(), &[root]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn remove_child_clears_parent() {
        let (mut tree, root, child, _) = testable_chain();
        tree.remove_child(root, child).unwrap();
        assert_eq!(tree.parent(child), None);
        assert!(tree.children(root).is_empty());
        assert!(tree.roots().contains(&child));

        assert_eq!(
            tree.remove_child(root, child),
            Err(SceneError::NotAChild { parent: root, child })
        );
    }

    #[test]
    fn reparenting_moves_the_child() {
        let (mut tree, root, child, leaf) = testable_chain();
        tree.add_child(root, leaf).unwrap();
        assert_eq!(tree.parent(leaf), Some(root));
        assert!(tree.children(child).is_empty());
        assert_eq!(tree.children(root), &[child, leaf]);
    }

    #[test]
    fn cycles_and_self_parenting_are_rejected() {
        let (mut tree, root, _, leaf) = testable_chain();
        assert_eq!(tree.add_child(root, root), Err(SceneError::SelfParent(root)));
        assert_eq!(
            tree.add_child(leaf, root),
            Err(SceneError::Cycle { parent: leaf, child: root })
        );
    }

    #[test]
    fn destroy_removes_subtree_and_invalidates_ids() {
        let (mut tree, root, child, leaf) = testable_chain();
        assert_eq!(tree.destroy(child).unwrap(), 2);
        assert!(!tree.contains(child));
        assert!(!tree.contains(leaf));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.len(), 1);

        let reused = tree.spawn("new", NodeKind::Node);
        assert!(tree.get(reused).is_some());
        assert!(tree.get(child).is_none() && tree.get(leaf).is_none());
        assert_eq!(tree.destroy(child), Err(SceneError::StaleNode(child)));
    }

    #[test]
    fn global_transform_composes_parents() {
        let (mut tree, root, child, leaf) = testable_chain();
        set_spatial(&mut tree, root, Spatial::at(Vec3::new(10.0, 0.0, 0.0)));
        set_spatial(
            &mut tree,
            child,
            Spatial {
                position: Vec3::new(0.0, 1.0, 0.0),
                rotation: Vec3::new(0.0, 0.0, 90.0),
                scale: Vec3::splat(2.0),
            },
        );
        set_spatial(&mut tree, leaf, Spatial::at(Vec3::new(1.0, 0.0, 0.0)));

        // leaf local +X becomes +Y after the child's 90 degree roll, times scale 2.
        let position = tree.global_position(leaf).unwrap();
        assert!(position.abs_diff_eq(Vec3::new(10.0, 3.0, 0.0), 1e-5));
        assert_eq!(tree.global_rotation(leaf), Some(Vec3::new(0.0, 0.0, 90.0)));
        assert_eq!(tree.global_scale(leaf), Some(Vec3::splat(2.0)));
    }

    #[test]
    fn non_spatial_parent_stops_propagation() {
        let mut tree = SceneTree::new();
        let top = tree.spawn("top", NodeKind::Node3D(Spatial::at(Vec3::splat(100.0))));
        let group = tree.spawn_child(top, "group", NodeKind::Node).unwrap();
        let item = tree
            .spawn_child(group, "item", NodeKind::Node3D(Spatial::at(Vec3::X)))
            .unwrap();

        assert_eq!(tree.global_position(item), Some(Vec3::X));
        assert_eq!(tree.local_transform(group), Some(Mat4::IDENTITY));
        assert_eq!(tree.global_rotation(group), None);
    }

    #[test]
    fn camera_view_uses_global_placement() {
        let mut tree = SceneTree::new();
        let rig = tree.spawn("rig", NodeKind::Node3D(Spatial::at(Vec3::new(0.0, 0.0, 5.0))));
        let cam = tree.spawn_child(rig, "cam", NodeKind::camera3d(Vec3::ZERO)).unwrap();
        let view = tree.camera_view(cam).unwrap();
        assert!(view
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
        assert!(tree.camera_view(rig).is_none());
    }

    #[test]
    fn lookup_by_unique_id_and_name() {
        let (tree, _, child, _) = testable_chain();
        let uid = tree.get(child).unwrap().unique_id();
        assert_eq!(tree.find_by_unique_id(uid), Some(child));
        assert_eq!(tree.find_by_name("child"), Some(child));
        assert_eq!(tree.find_by_name("nobody"), None);
    }
}
