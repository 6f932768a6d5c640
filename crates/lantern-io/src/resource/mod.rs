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

//! Disk resources and their caches.

mod cache;
mod mesh;
mod module;
mod shader;

pub use cache::ResourceCache;
pub use mesh::{ObjLoader, RMesh};
pub use module::ResourceModule;
pub use shader::{RShader, ShaderLoader, ShaderSource, ShaderStage, SPIRV_MAGIC};

use std::path::PathBuf;

/// Errors raised while loading resources.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        /// The resource file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The OBJ parser rejected the file.
    #[error("cannot parse mesh '{path}': {source}")]
    Obj {
        /// The mesh file.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: tobj::LoadError,
    },
    /// The file parsed but holds nothing usable.
    #[error("'{path}' is not a valid resource: {reason}")]
    Invalid {
        /// The resource file.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },
    /// The extension is not handled by any loader.
    #[error("unsupported resource type '{0}'")]
    Unsupported(PathBuf),
}
