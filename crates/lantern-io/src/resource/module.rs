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

use super::cache::ResourceCache;
use super::mesh::{ObjLoader, RMesh};
use super::shader::{RShader, ShaderLoader};
use super::ResourceError;
use lantern_core::asset::{BUILTIN_CUBE, BUILTIN_PLANE};
use lantern_core::renderer::MeshData;
use lantern_core::{AssetId, Module, ModuleError};
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loads and caches meshes and shaders below a resources root.
#[derive(Debug, Default)]
pub struct ResourceModule {
    root: PathBuf,
    meshes: ResourceCache<RMesh>,
    shaders: ResourceCache<RShader>,
}

impl ResourceModule {
    /// Creates a module reading from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// The resources root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Points the module at another root. Cached disk resources are dropped;
    /// built-ins stay.
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
        let builtins: Vec<Arc<RMesh>> = [BUILTIN_CUBE, BUILTIN_PLANE]
            .iter()
            .filter_map(|path| self.meshes.get(&AssetId::from_path(path)))
            .collect();
        self.meshes.clear();
        self.shaders.clear();
        for mesh in builtins {
            self.meshes.insert(mesh.id, (*mesh).clone());
        }
    }

    /// Loads (or returns the cached) mesh at a path relative to the root.
    pub fn load_mesh(&mut self, relative: &str) -> Result<Arc<RMesh>, ResourceError> {
        let id = AssetId::from_path(relative);
        if let Some(mesh) = self.meshes.get(&id) {
            return Ok(mesh);
        }
        let data = ObjLoader.load(&self.root.join(relative))?;
        log::info!("Loaded mesh '{relative}'");
        Ok(self.meshes.insert(
            id,
            RMesh {
                id,
                path: relative.to_owned(),
                data,
            },
        ))
    }

    /// Loads (or returns the cached) shader at a path relative to the root.
    pub fn load_shader(&mut self, relative: &str) -> Result<Arc<RShader>, ResourceError> {
        let id = AssetId::from_path(relative);
        if let Some(shader) = self.shaders.get(&id) {
            return Ok(shader);
        }
        let (stage, source) = ShaderLoader.load(&self.root.join(relative))?;
        log::info!("Loaded {stage:?} shader '{relative}'");
        Ok(self.shaders.insert(
            id,
            RShader {
                id,
                path: relative.to_owned(),
                stage,
                source,
            },
        ))
    }

    /// Registers in-memory geometry under `name` and returns its id.
    pub fn register_mesh(&mut self, name: &str, data: MeshData) -> AssetId {
        let id = AssetId::from_path(name);
        self.meshes.insert(
            id,
            RMesh {
                id,
                path: name.to_owned(),
                data,
            },
        );
        id
    }

    /// A cached mesh.
    pub fn mesh(&self, id: &AssetId) -> Option<Arc<RMesh>> {
        self.meshes.get(id)
    }

    /// A cached shader.
    pub fn shader(&self, id: &AssetId) -> Option<Arc<RShader>> {
        self.shaders.get(id)
    }

    /// The mesh cache.
    pub fn meshes(&self) -> &ResourceCache<RMesh> {
        &self.meshes
    }

    /// Drops resources nobody else holds. Returns how many were dropped.
    pub fn evict_unused(&mut self) -> usize {
        self.meshes.evict_unused() + self.shaders.evict_unused()
    }
}

impl Module for ResourceModule {
    fn name(&self) -> &'static str {
        "resource"
    }

    fn startup(&mut self) -> Result<(), ModuleError> {
        self.register_mesh(BUILTIN_CUBE, MeshData::cube());
        self.register_mesh(BUILTIN_PLANE, MeshData::plane(10.0));
        log::debug!("Resource root: {}", self.root.display());
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), ModuleError> {
        self.meshes.clear();
        self.shaders.clear();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
