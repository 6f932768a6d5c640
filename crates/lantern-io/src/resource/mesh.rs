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

//! OBJ mesh resources.

use super::ResourceError;
use lantern_core::renderer::{MeshData, MeshVertex};
use lantern_core::AssetId;
use std::path::{Path, PathBuf};

/// A mesh loaded from disk or registered as a built-in.
#[derive(Debug, Clone)]
pub struct RMesh {
    /// Asset id derived from [`RMesh::path`].
    pub id: AssetId,
    /// Resource path relative to the resources root, or a `builtin://` name.
    pub path: String,
    /// CPU-side geometry.
    pub data: MeshData,
}

/// Parses Wavefront OBJ files into [`MeshData`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjLoader;

impl ObjLoader {
    /// Loads every model of the file into one triangulated mesh.
    ///
    /// Missing normals and texture coordinates are filled with zeros.
    pub fn load(&self, path: &Path) -> Result<MeshData, ResourceError> {
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|source| ResourceError::Obj {
            path: path.to_path_buf(),
            source,
        })?;

        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for model in &models {
            let mesh = &model.mesh;
            let base = vertices.len() as u32;
            let count = mesh.positions.len() / 3;
            for i in 0..count {
                let normal = if mesh.normals.len() >= (i + 1) * 3 {
                    [
                        mesh.normals[i * 3],
                        mesh.normals[i * 3 + 1],
                        mesh.normals[i * 3 + 2],
                    ]
                } else {
                    [0.0; 3]
                };
                let uv = if mesh.texcoords.len() >= (i + 1) * 2 {
                    [mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1]]
                } else {
                    [0.0; 2]
                };
                vertices.push(MeshVertex {
                    position: [
                        mesh.positions[i * 3],
                        mesh.positions[i * 3 + 1],
                        mesh.positions[i * 3 + 2],
                    ],
                    normal,
                    uv,
                });
            }
            indices.extend(mesh.indices.iter().map(|&i| base + i));
        }

        let data = MeshData::new(vertices, indices);
        if data.vertices.is_empty() {
            return Err(invalid(path, "no geometry"));
        }
        data.validate().map_err(|e| invalid(path, e))?;
        log::debug!(
            "Loaded OBJ {} ({} models, {} triangles)",
            path.display(),
            models.len(),
            data.triangle_count()
        );
        Ok(data)
    }
}

fn invalid(path: &Path, reason: impl ToString) -> ResourceError {
    ResourceError::Invalid {
        path: PathBuf::from(path),
        reason: reason.to_string(),
    }
}
