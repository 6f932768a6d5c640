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

//! Provides the public, backend-agnostic rendering contracts.
//!
//! This module defines the "common language" of rendering: the [`Renderer`]
//! trait, the per-frame [`RenderFrame`] description and the CPU-side mesh
//! format. Concrete backends live in `lantern-infra`.

pub mod error;
pub mod frame;
pub mod mesh;
pub mod traits;

pub use self::error::RenderError;
pub use self::frame::{DrawItem, RenderConfig, RenderFrame, RenderStats, RenderTarget};
pub use self::mesh::{MeshData, MeshId, MeshVertex};
pub use self::traits::Renderer;
