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

use super::error::RenderError;
use super::frame::{RenderFrame, RenderStats, RenderTarget};
use super::mesh::{MeshData, MeshId};

/// Trait representing a rendering backend.
pub trait Renderer: Send {
    /// Initialize the backend for the given target.
    fn init(&mut self, target: RenderTarget<'_>) -> Result<(), RenderError>;

    /// Returns `true` once [`Renderer::init`] has succeeded.
    fn is_initialized(&self) -> bool;

    /// Resize the presentation surface. Zero sizes are ignored.
    fn resize(&mut self, width: u32, height: u32);

    /// Upload (or replace) the GPU copy of a mesh.
    fn upload_mesh(&mut self, id: MeshId, mesh: &MeshData) -> Result<(), RenderError>;

    /// Returns `true` if the mesh has been uploaded.
    fn has_mesh(&self, id: MeshId) -> bool;

    /// Record, submit and present one frame.
    fn render(&mut self, frame: &RenderFrame) -> Result<RenderStats, RenderError>;

    /// Block until the GPU has finished every submitted frame.
    fn wait_idle(&mut self);

    /// Release every backend resource. The renderer may be re-initialized afterwards.
    fn shutdown(&mut self);

    /// Human readable backend description, e.g. the adapter name.
    fn backend_name(&self) -> String;
}
