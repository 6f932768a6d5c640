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

//! Defines the error type for the rendering subsystem.

use super::mesh::MeshId;
use std::fmt;

/// An error raised by a [`Renderer`](super::Renderer) implementation.
#[derive(Debug)]
pub enum RenderError {
    /// A frame was requested before [`init`](super::Renderer::init) succeeded.
    NotInitialized,
    /// The backend cannot render to the requested target.
    UnsupportedTarget(String),
    /// The presentation surface could not be created.
    SurfaceCreation(String),
    /// No adapter matched the surface and backend requirements.
    AdapterNotFound(String),
    /// The logical device could not be created.
    DeviceRequest(String),
    /// The next swapchain image could not be acquired.
    SurfaceAcquire(String),
    /// A draw referenced a mesh that was never uploaded.
    UnknownMesh(MeshId),
    /// Mesh data failed validation.
    InvalidMesh(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotInitialized => write!(f, "Renderer is not initialized"),
            RenderError::UnsupportedTarget(msg) => write!(f, "Unsupported render target: {msg}"),
            RenderError::SurfaceCreation(msg) => write!(f, "Failed to create surface: {msg}"),
            RenderError::AdapterNotFound(msg) => write!(f, "No suitable adapter found: {msg}"),
            RenderError::DeviceRequest(msg) => write!(f, "Failed to request device: {msg}"),
            RenderError::SurfaceAcquire(msg) => {
                write!(f, "Failed to acquire next surface texture: {msg}")
            }
            RenderError::UnknownMesh(id) => write!(f, "Mesh {id:?} was never uploaded"),
            RenderError::InvalidMesh(msg) => write!(f, "Invalid mesh data: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}
