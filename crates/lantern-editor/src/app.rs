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

//! The eframe application hosting the editor engine.

use crate::editor::Editor;
use crate::events::EditorEvent;
use crate::gui::{publish, EditorGuiModule};
use crate::inspector;
use lantern_core::renderer::RenderTarget;
use lantern_core::EngineConfig;
use lantern_data::ecs::WORLD_EXTENSION;
use lantern_infra::HeadlessRenderer;
use lantern_sdk::{Engine, RenderModule};

/// Size of the off-screen frame the editor renders each tick.
const VIEWPORT_SIZE: (u32, u32) = (1280, 720);

pub struct EditorApp {
    engine: Engine<Editor>,
}

impl EditorApp {
    /// Starts the engine for `editor` on a headless renderer.
    pub fn new(config: EngineConfig, editor: Editor) -> anyhow::Result<Self> {
        let mut engine = Engine::new(config, editor);
        engine.startup(Box::new(HeadlessRenderer::new()))?;
        engine.attach(RenderTarget::Headless {
            width: VIEWPORT_SIZE.0,
            height: VIEWPORT_SIZE.1,
        })?;
        Ok(Self { engine })
    }

    fn about_window(ctx: &egui::Context, editor: &mut Editor) {
        let mut open = editor.show_about();
        egui::Window::new("About Lantern")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Lantern Engine");
                ui.label(format!("Editor {}", env!("CARGO_PKG_VERSION")));
            });
        editor.set_show_about(open);
    }

    fn open_world_dialog(editor: &Editor, resources: &std::path::Path) {
        let picked = rfd::FileDialog::new()
            .set_title("Open world")
            .set_directory(resources)
            .add_filter("Lantern world", &[WORLD_EXTENSION])
            .pick_file();
        if let Some(path) = picked {
            publish(&editor.sender(), EditorEvent::WorldLoadRequest { path });
        }
    }

    fn viewport(ctx: &egui::Context, render: Option<&RenderModule>, world: Option<&str>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(world.unwrap_or("No world"));
            let Some(render) = render else {
                return;
            };
            ui.label(format!("Backend: {}", render.renderer().backend_name()));
            if let Some(stats) = render.last_stats() {
                ui.label(format!(
                    "Frame {}: {} draws, {} triangles, {} skipped",
                    stats.frame_index, stats.draw_calls, stats.triangles, stats.skipped_draws
                ));
            }
            let position = render.frame().camera_position;
            ui.label(format!(
                "Camera at ({:.2}, {:.2}, {:.2})",
                position.x, position.y, position.z
            ));
        });
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt);
        if let Err(e) = self.engine.tick(dt) {
            log::error!("Engine tick failed: {e}");
        }

        let (editor, modules) = self.engine.parts_mut();
        let state = editor.gui_state(modules);
        if editor.take_open_dialog_request() {
            Self::open_world_dialog(editor, &state.resources_path);
        }
        if let Some(gui) = modules.get_mut::<EditorGuiModule>() {
            gui.render(ctx, &state);
        }
        inspector::side_panel(ctx, &state, modules, &editor.sender());
        Self::viewport(ctx, modules.get::<RenderModule>(), state.current_world.as_deref());
        Self::about_window(ctx, editor);

        if self.engine.exit_requested() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        ctx.request_repaint();
    }
}
