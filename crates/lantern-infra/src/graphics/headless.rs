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

//! A renderer that records statistics without touching a GPU.

use lantern_core::renderer::{
    MeshData, MeshId, RenderError, RenderFrame, RenderStats, RenderTarget, Renderer,
};
use std::collections::HashMap;
use std::time::Instant;

/// Renderer used by tools and tests: meshes are validated and kept on the CPU,
/// frames are only counted.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    size: Option<(u32, u32)>,
    meshes: HashMap<MeshId, MeshData>,
    frame_index: u64,
    last_frame: Option<RenderFrame>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the virtual framebuffer once initialized.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// The most recently rendered frame.
    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

impl Renderer for HeadlessRenderer {
    fn init(&mut self, target: RenderTarget<'_>) -> Result<(), RenderError> {
        let (width, height) = target.size();
        log::info!("Headless renderer initialized ({width}x{height})");
        self.size = Some((width.max(1), height.max(1)));
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.size.is_some()
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(size) = &mut self.size {
            *size = (width, height);
        }
    }

    fn upload_mesh(&mut self, id: MeshId, mesh: &MeshData) -> Result<(), RenderError> {
        if self.size.is_none() {
            return Err(RenderError::NotInitialized);
        }
        mesh.validate()?;
        self.meshes.insert(id, mesh.clone());
        Ok(())
    }

    fn has_mesh(&self, id: MeshId) -> bool {
        self.meshes.contains_key(&id)
    }

    fn render(&mut self, frame: &RenderFrame) -> Result<RenderStats, RenderError> {
        if self.size.is_none() {
            return Err(RenderError::NotInitialized);
        }
        let started = Instant::now();
        let mut stats = RenderStats {
            frame_index: self.frame_index,
            ..Default::default()
        };
        for draw in &frame.draws {
            match self.meshes.get(&draw.mesh) {
                Some(mesh) => {
                    stats.draw_calls += 1;
                    stats.triangles += mesh.triangle_count() as u64;
                }
                None => {
                    log::warn!("{}", RenderError::UnknownMesh(draw.mesh));
                    stats.skipped_draws += 1;
                }
            }
        }
        self.frame_index += 1;
        self.last_frame = Some(frame.clone());
        stats.cpu_time_ms = started.elapsed().as_secs_f32() * 1000.0;
        Ok(stats)
    }

    fn wait_idle(&mut self) {}

    fn shutdown(&mut self) {
        self.size = None;
        self.meshes.clear();
        self.last_frame = None;
    }

    fn backend_name(&self) -> String {
        "Headless".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_core::math::Mat4;
    use lantern_core::renderer::DrawItem;

    fn initialized() -> HeadlessRenderer {
        let mut renderer = HeadlessRenderer::new();
        renderer
            .init(RenderTarget::Headless {
                width: 320,
                height: 240,
            })
            .unwrap();
        renderer
    }

    #[test]
    fn counts_draws_and_triangles() {
        let mut renderer = initialized();
        renderer.upload_mesh(MeshId(7), &MeshData::cube()).unwrap();

        let mut frame = RenderFrame::default();
        frame.draws.push(DrawItem {
            mesh: MeshId(7),
            model: Mat4::IDENTITY,
        });
        frame.draws.push(DrawItem {
            mesh: MeshId(8),
            model: Mat4::IDENTITY,
        });

        let first = renderer.render(&frame).unwrap();
        assert_eq!(first.draw_calls, 1);
        assert_eq!(first.triangles, 12);
        assert_eq!(first.skipped_draws, 1);
        assert_eq!(first.frame_index, 0);
        assert_eq!(renderer.render(&frame).unwrap().frame_index, 1);
        assert_eq!(renderer.last_frame(), Some(&frame));
    }

    #[test]
    fn rejects_work_before_init_and_invalid_meshes() {
        let mut renderer = HeadlessRenderer::new();
        assert!(matches!(
            renderer.render(&RenderFrame::default()),
            Err(RenderError::NotInitialized)
        ));

        let mut renderer = initialized();
        let broken = MeshData::new(Vec::new(), vec![0, 1, 2]);
        assert!(renderer.upload_mesh(MeshId(1), &broken).is_err());
        assert!(!renderer.has_mesh(MeshId(1)));
    }

    #[test]
    fn resize_ignores_zero_and_shutdown_resets() {
        let mut renderer = initialized();
        renderer.resize(0, 100);
        assert_eq!(renderer.size(), Some((320, 240)));
        renderer.resize(800, 600);
        assert_eq!(renderer.size(), Some((800, 600)));

        renderer.shutdown();
        assert!(!renderer.is_initialized());
        assert_eq!(renderer.mesh_count(), 0);
    }
}
