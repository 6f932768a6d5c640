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

//! The render module: turns worlds and scenes into frames.

use lantern_core::config::ConfigurableModule;
use lantern_core::math::{perspective, Mat4, Vec3};
use lantern_core::renderer::{
    DrawItem, MeshId, RenderConfig, RenderError, RenderFrame, RenderStats, RenderTarget,
    Renderer,
};
use lantern_core::{AssetId, Module, ModuleError};
use lantern_data::{EntityWorld, Scene};
use lantern_io::ResourceModule;
use std::any::Any;
use std::collections::HashSet;

const FALLBACK_EYE: Vec3 = Vec3::new(0.0, 2.0, 6.0);

/// Owns the active [`Renderer`] and feeds it one frame per tick.
pub struct RenderModule {
    renderer: Box<dyn Renderer>,
    config: RenderConfig,
    uploaded: HashSet<MeshId>,
    missing: HashSet<AssetId>,
    frame: RenderFrame,
    aspect: f32,
    last_stats: Option<RenderStats>,
}

impl RenderModule {
    pub fn new(renderer: Box<dyn Renderer>) -> Self {
        let config = RenderConfig::default();
        Self {
            renderer,
            frame: RenderFrame::empty(config.clear_color),
            config,
            uploaded: HashSet::new(),
            missing: HashSet::new(),
            aspect: 16.0 / 9.0,
            last_stats: None,
        }
    }

    /// Initializes the renderer for `target`.
    pub fn attach(&mut self, target: RenderTarget<'_>) -> Result<(), ModuleError> {
        self.renderer
            .init(target)
            .map_err(|e| ModuleError::failed("render", e))?;
        let (width, height) = target.size();
        self.set_aspect(width, height);
        self.uploaded.clear();
        self.missing.clear();
        log::info!("Render target attached: {}", self.renderer.backend_name());
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.renderer.is_initialized()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
        self.set_aspect(width, height);
    }

    fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Builds the next frame from the active world and scene.
    ///
    /// The scene camera wins over an ECS camera. Meshes not uploaded yet are
    /// fetched from `resources` and uploaded once.
    pub fn extract_frame(
        &mut self,
        world: Option<&EntityWorld>,
        scene: Option<&Scene>,
        resources: Option<&ResourceModule>,
    ) -> &RenderFrame {
        let mut frame = RenderFrame::empty(self.config.clear_color);

        if let Some((view, projection, position)) = scene.and_then(Scene::camera_matrices) {
            frame.view = view;
            frame.projection = projection;
            frame.camera_position = position;
        } else if let Some((_, transform, camera)) = world.and_then(EntityWorld::active_camera) {
            frame.view = camera.view_matrix(&transform);
            frame.projection = camera.projection(self.aspect);
            frame.camera_position = transform.position;
        } else {
            frame.view = Mat4::look_at_rh(FALLBACK_EYE, Vec3::ZERO, Vec3::Y);
            frame.projection = perspective(60.0, self.aspect, 0.1, 1000.0);
            frame.camera_position = FALLBACK_EYE;
        }

        let draws = scene
            .map(Scene::collect_draws)
            .unwrap_or_default()
            .into_iter()
            .chain(world.map(EntityWorld::mesh_draws).unwrap_or_default());
        for (asset, model) in draws {
            let mesh = asset.to_mesh_id();
            self.ensure_uploaded(asset, mesh, resources);
            frame.draws.push(DrawItem { mesh, model });
        }

        self.frame = frame;
        &self.frame
    }

    fn ensure_uploaded(
        &mut self,
        asset: AssetId,
        mesh: MeshId,
        resources: Option<&ResourceModule>,
    ) {
        if self.uploaded.contains(&mesh) || !self.renderer.is_initialized() {
            return;
        }
        let Some(resource) = resources.and_then(|r| r.mesh(&asset)) else {
            if self.missing.insert(asset) {
                log::warn!("Mesh {asset} is not loaded; its draws are skipped");
            }
            return;
        };
        match self.renderer.upload_mesh(mesh, &resource.data) {
            Ok(()) => {
                self.uploaded.insert(mesh);
                self.missing.remove(&asset);
                log::debug!("Uploaded mesh '{}'", resource.path);
            }
            Err(e) => {
                if self.missing.insert(asset) {
                    log::error!("Failed to upload mesh '{}': {e}", resource.path);
                }
            }
        }
    }

    /// Renders the last extracted frame.
    pub fn render(&mut self) -> Result<RenderStats, RenderError> {
        let stats = self.renderer.render(&self.frame)?;
        self.last_stats = Some(stats);
        Ok(stats)
    }

    pub fn last_stats(&self) -> Option<RenderStats> {
        self.last_stats
    }

    /// The last extracted frame.
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> &mut dyn Renderer {
        self.renderer.as_mut()
    }

    pub fn wait_idle(&mut self) {
        if self.renderer.is_initialized() {
            self.renderer.wait_idle();
        }
    }
}

impl std::fmt::Debug for RenderModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderModule")
            .field("backend", &self.renderer.backend_name())
            .field("uploaded", &self.uploaded.len())
            .field("last_stats", &self.last_stats)
            .finish_non_exhaustive()
    }
}

impl ConfigurableModule for RenderModule {
    type Config = RenderConfig;

    fn apply_config(&mut self, config: &RenderConfig) {
        self.config = config.clone();
    }
}

impl Module for RenderModule {
    fn name(&self) -> &'static str {
        "render"
    }

    fn shutdown(&mut self) -> Result<(), ModuleError> {
        self.wait_idle();
        self.renderer.shutdown();
        self.uploaded.clear();
        self.missing.clear();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_core::asset::BUILTIN_CUBE;
    use lantern_data::ecs::{CameraComponent, MeshComponent, Transform};
    use lantern_data::NodeKind;
    use lantern_infra::HeadlessRenderer;

    fn attached() -> RenderModule {
        let mut render = RenderModule::new(Box::new(HeadlessRenderer::new()));
        render
            .attach(RenderTarget::Headless {
                width: 800,
                height: 400,
            })
            .unwrap();
        render
    }

    fn resources() -> ResourceModule {
        let mut resources = ResourceModule::new(".");
        resources.startup().unwrap();
        resources
    }

    #[test]
    fn ecs_meshes_are_uploaded_once_and_drawn() {
        let mut render = attached();
        let resources = resources();
        let mut world = EntityWorld::new("test");
        let cube = world.spawn_named("cube");
        world
            .insert(cube, MeshComponent { mesh: AssetId::from_path(BUILTIN_CUBE) })
            .unwrap();

        let frame = render.extract_frame(Some(&world), None, Some(&resources));
        assert_eq!(frame.draws.len(), 1);
        let stats = render.render().unwrap();
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.triangles, 12);

        render.extract_frame(Some(&world), None, Some(&resources));
        assert_eq!(render.uploaded.len(), 1);
        assert_eq!(render.last_stats().map(|s| s.frame_index), Some(0));
    }

    #[test]
    fn scene_camera_wins_over_ecs_camera() {
        let mut render = attached();
        let mut world = EntityWorld::new("test");
        let camera = world.spawn_named("camera");
        world.insert(camera, CameraComponent::default()).unwrap();
        world
            .insert(camera, Transform::from_position(Vec3::new(0.0, 0.0, 10.0)))
            .unwrap();

        let mut scene = Scene::new("scene");
        let node = scene
            .tree_mut()
            .spawn("cam", NodeKind::camera3d(Vec3::new(3.0, 0.0, 0.0)));
        scene.set_active_camera(node).unwrap();

        let frame = render.extract_frame(Some(&world), Some(&scene), None);
        assert_eq!(frame.camera_position, Vec3::new(3.0, 0.0, 0.0));

        let frame = render.extract_frame(Some(&world), None, None);
        assert_eq!(frame.camera_position, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(frame.projection, CameraComponent::default().projection(2.0));
    }

    #[test]
    fn unknown_meshes_are_skipped_by_the_renderer() {
        let mut render = attached();
        let mut world = EntityWorld::new("test");
        let e = world.spawn_named("ghost");
        world
            .insert(e, MeshComponent { mesh: AssetId::from_path("Meshes/missing.obj") })
            .unwrap();

        render.extract_frame(Some(&world), None, Some(&resources()));
        let stats = render.render().unwrap();
        assert_eq!(stats.draw_calls, 0);
        assert_eq!(stats.skipped_draws, 1);
    }

    #[test]
    fn shutdown_releases_the_renderer() {
        let mut render = attached();
        assert!(render.is_attached());
        render.shutdown().unwrap();
        assert!(!render.is_attached());
        assert!(matches!(render.render(), Err(RenderError::NotInitialized)));
    }
}
