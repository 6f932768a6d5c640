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

//! A transform hierarchy of typed nodes.
//!
//! Nodes live in a generational arena ([`SceneTree`]). A [`NodeId`] stays
//! valid until its node is destroyed; a stale id is rejected rather than
//! aliasing whatever reuses the slot. Node behaviour is selected by the
//! [`NodeKind`] tag instead of a type hierarchy.

mod graph;
mod node;
mod serialize;
mod tree;

pub use graph::Scene;
pub use node::{Camera, Node, NodeKind, Spatial};
pub use tree::{NodeId, SceneTree};

/// Errors raised by scene tree operations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SceneError {
    /// The id does not refer to a live node.
    #[error("node {0:?} does not exist")]
    StaleNode(NodeId),
    /// A node cannot be its own parent.
    #[error("node {0:?} cannot be parented to itself")]
    SelfParent(NodeId),
    /// The requested parenting would create a cycle.
    #[error("parenting {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// The requested parent.
        parent: NodeId,
        /// The requested child.
        child: NodeId,
    },
    /// The node is not a child of the given parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The supposed parent.
        parent: NodeId,
        /// The supposed child.
        child: NodeId,
    },
    /// The node exists but is not a camera.
    #[error("node {0:?} is not a Camera3D")]
    NotACamera(NodeId),
    /// The serialized form could not be read.
    #[error("invalid scene data: {0}")]
    Serialization(String),
}
