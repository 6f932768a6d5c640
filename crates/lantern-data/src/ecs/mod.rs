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

//! Entity-component worlds backed by `hecs`.
//!
//! An [`EntityWorld`] owns one `hecs::World`; the [`WorldManager`] keeps the
//! loaded worlds by name and tracks which one is active. The [`EcsModule`]
//! adds simulation (snapshot on start, restore on stop) and `.lworld` files.

mod components;
mod definition;
mod manager;
mod module;
mod world;

pub use components::{CameraComponent, EntityGuid, MeshComponent, Name, Transform, Velocity};
pub use definition::{ComponentDefinition, EntityDefinition, WorldDefinition};
pub use hecs::{Component, Entity};
pub use manager::WorldManager;
pub use module::{EcsModule, WORLD_EXTENSION};
pub use world::EntityWorld;

use std::path::PathBuf;

/// Errors raised by world storage and world files.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A world with this name is already loaded.
    #[error("world '{0}' already exists")]
    AlreadyExists(String),
    /// No world with this name is loaded.
    #[error("world '{0}' is not loaded")]
    NotFound(String),
    /// The operation needs an active world.
    #[error("there is no active world")]
    NoActiveWorld,
    /// The entity handle is dead.
    #[error("entity does not exist")]
    NoSuchEntity,
    /// Two saved entities share a guid.
    #[error("duplicate entity guid {0}")]
    DuplicateGuid(uuid::Uuid),
    /// Reading or writing a world file failed.
    #[error("world file '{path}': {source}")]
    Io {
        /// The world file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The world file is not valid JSON for a world.
    #[error("invalid world data: {0}")]
    Json(#[from] serde_json::Error),
}
