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

//! Stable asset identifiers.

use crate::renderer::MeshId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Resource path of the built-in unit cube mesh.
pub const BUILTIN_CUBE: &str = "builtin://cube";
/// Resource path of the built-in ground plane mesh.
pub const BUILTIN_PLANE: &str = "builtin://plane";

/// A globally unique, persistent identifier for a logical asset.
///
/// Assets loaded from disk get a name-based (version 5) id derived from their
/// normalized resource path, so the same file always maps to the same id
/// across runs. Built-in assets use a `builtin://` path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(Uuid);

impl AssetId {
    /// Creates a new, random (version 4) id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives the id of a resource path. Backslashes and a leading `./`
    /// are normalized away so equivalent spellings agree.
    pub fn from_path(path: &str) -> Self {
        let normalized = path.replace('\\', "/");
        let normalized = normalized.trim_start_matches("./");
        Self(Uuid::new_v5(&Uuid::NAMESPACE_URL, normalized.as_bytes()))
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// The renderer-side id for a mesh asset.
    pub fn to_mesh_id(&self) -> MeshId {
        MeshId::from_uuid(&self.0)
    }
}

impl Default for AssetId {
    /// Creates a new, random (version 4) id.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
