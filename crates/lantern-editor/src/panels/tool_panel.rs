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

use crate::events::EditorEvent;
use crate::gui::{publish, EditorState, EventSender, GuiObject, GuiObjectId};
use lantern_data::ecs::WORLD_EXTENSION;
use lantern_io::fs::{list_directory, relative_to, DirEntryInfo};
use lantern_io::project::DEFAULT_START_WORLD;
use std::any::Any;
use std::path::{Path, PathBuf};

/// Folder picker and name field used by "Save world as".
#[derive(Debug, Clone)]
pub struct SaveWorldPopup {
    root: PathBuf,
    current: PathBuf,
    name: String,
    error: Option<String>,
}

impl SaveWorldPopup {
    /// A popup browsing `root`, starting at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            current: root.clone(),
            root,
            name: String::new(),
            error: None,
        }
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    /// The selected folder relative to the root, `/` for the root itself.
    pub fn relative_path(&self) -> String {
        match relative_to(&self.current, &self.root) {
            Some(relative) if !relative.is_empty() => relative,
            _ => String::from("/"),
        }
    }

    /// Sub-folders of the selected folder.
    pub fn folders(&self) -> Vec<DirEntryInfo> {
        match list_directory(&self.current) {
            Ok(entries) => entries.into_iter().filter(|e| e.is_dir).collect(),
            Err(e) => {
                log::warn!("Cannot list {}: {e}", self.current.display());
                Vec::new()
            }
        }
    }

    /// Selects `folder` if it is a directory under the root.
    pub fn enter(&mut self, folder: &Path) -> bool {
        if !folder.starts_with(&self.root) || !folder.is_dir() {
            return false;
        }
        self.current = folder.to_path_buf();
        true
    }

    /// Selects the parent folder, stopping at the root.
    pub fn up(&mut self) -> bool {
        if self.current == self.root {
            return false;
        }
        match self.current.parent() {
            Some(parent) if parent.starts_with(&self.root) => {
                self.current = parent.to_path_buf();
                true
            }
            _ => false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.error = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The file the world would be saved to. `.lworld` is appended to names
    /// without an extension.
    pub fn target(&self) -> Result<PathBuf, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(String::from("world name is empty"));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(format!("'{name}' is not a valid file name"));
        }
        let path = self.current.join(name);
        Ok(if path.extension().is_none() {
            path.with_extension(WORLD_EXTENSION)
        } else {
            path
        })
    }
}

enum PopupAction {
    Enter(PathBuf),
    Up,
    Confirm,
    Cancel,
}

/// Simulation and world-saving buttons.
pub struct EditorToolPanel {
    id: GuiObjectId,
    visible: bool,
    events: EventSender,
    popup: Option<SaveWorldPopup>,
}

impl EditorToolPanel {
    pub fn new(events: EventSender) -> Self {
        Self {
            id: GuiObjectId::next(),
            visible: true,
            events,
            popup: None,
        }
    }

    pub fn start_simulation(&self, state: &EditorState) {
        if !state.simulating {
            publish(&self.events, EditorEvent::SimulationStart);
        }
    }

    pub fn stop_simulation(&self, state: &EditorState) {
        if state.simulating {
            publish(&self.events, EditorEvent::SimulationStop);
        }
    }

    /// Saves over the editor start world, or asks for a location when the
    /// project still uses the default world.
    pub fn save_world(&mut self, state: &EditorState) {
        if state.editor_start_world == DEFAULT_START_WORLD {
            self.open_save_as(state);
        } else {
            let path = state.resources_path.join(&state.editor_start_world);
            publish(&self.events, EditorEvent::WorldSaveRequest { path });
        }
    }

    pub fn open_save_as(&mut self, state: &EditorState) {
        self.popup = Some(SaveWorldPopup::new(state.resources_path.clone()));
    }

    pub fn popup(&self) -> Option<&SaveWorldPopup> {
        self.popup.as_ref()
    }

    pub fn popup_mut(&mut self) -> Option<&mut SaveWorldPopup> {
        self.popup.as_mut()
    }

    /// Publishes the save-as request and closes the popup. An invalid name
    /// keeps the popup open with an error.
    pub fn confirm_save_as(&mut self) -> bool {
        let Some(popup) = self.popup.as_mut() else {
            return false;
        };
        match popup.target() {
            Ok(path) => {
                publish(&self.events, EditorEvent::WorldSaveAsRequest { path });
                self.popup = None;
                true
            }
            Err(e) => {
                popup.error = Some(e);
                false
            }
        }
    }

    pub fn cancel_save_as(&mut self) {
        self.popup = None;
    }

    fn popup_ui(ctx: &egui::Context, popup: &mut SaveWorldPopup) -> Option<PopupAction> {
        let mut action = None;
        egui::Window::new("Save world as")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                    if popup.current != popup.root && ui.selectable_label(false, "..").clicked() {
                        action = Some(PopupAction::Up);
                    }
                    for folder in popup.folders() {
                        if ui.selectable_label(false, format!("[{}]", folder.name)).clicked() {
                            action = Some(PopupAction::Enter(folder.path));
                        }
                    }
                });
                ui.separator();
                ui.label(format!("Selected path: {}", popup.relative_path()));
                ui.horizontal(|ui| {
                    ui.label("Name");
                    if ui.text_edit_singleline(&mut popup.name).changed() {
                        popup.error = None;
                    }
                });
                if let Some(error) = &popup.error {
                    ui.colored_label(egui::Color32::LIGHT_RED, error);
                }
                ui.horizontal(|ui| {
                    let has_name = !popup.name.trim().is_empty();
                    if ui.add_enabled(has_name, egui::Button::new("Save")).clicked() {
                        action = Some(PopupAction::Confirm);
                    }
                    if ui.button("Cancel").clicked() {
                        action = Some(PopupAction::Cancel);
                    }
                });
            });
        action
    }
}

impl GuiObject for EditorToolPanel {
    fn id(&self) -> GuiObjectId {
        self.id
    }

    fn title(&self) -> &str {
        "Tools"
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn ui(&mut self, ctx: &egui::Context, state: &EditorState) {
        egui::Window::new(self.title())
            .default_pos([320.0, 40.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!state.simulating, egui::Button::new("Start"))
                        .clicked()
                    {
                        self.start_simulation(state);
                    }
                    if ui
                        .add_enabled(state.simulating, egui::Button::new("Stop"))
                        .clicked()
                    {
                        self.stop_simulation(state);
                    }
                    ui.separator();
                    if ui.button("Save world").clicked() {
                        self.save_world(state);
                    }
                    if ui.button("Save world as").clicked() {
                        self.open_save_as(state);
                    }
                });
            });

        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        match Self::popup_ui(ctx, popup) {
            Some(PopupAction::Enter(folder)) => {
                popup.enter(&folder);
            }
            Some(PopupAction::Up) => {
                popup.up();
            }
            Some(PopupAction::Confirm) => {
                self.confirm_save_as();
            }
            Some(PopupAction::Cancel) => self.cancel_save_as(),
            None => {}
        }
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
    use std::fs;

    fn state(resources: &Path, start_world: &str, simulating: bool) -> EditorState {
        EditorState {
            resources_path: resources.to_path_buf(),
            editor_start_world: start_world.to_owned(),
            simulating,
            ..EditorState::default()
        }
    }

    #[test]
    fn start_and_stop_follow_the_simulation_state() {
        let (sender, receiver) = flume::unbounded();
        let panel = EditorToolPanel::new(sender);
        let idle = state(Path::new("res"), DEFAULT_START_WORLD, false);
        let running = state(Path::new("res"), DEFAULT_START_WORLD, true);

        panel.stop_simulation(&idle);
        panel.start_simulation(&idle);
        panel.start_simulation(&running);
        panel.stop_simulation(&running);

        let events: Vec<_> = receiver.try_iter().collect();
        assert_eq!(events, [EditorEvent::SimulationStart, EditorEvent::SimulationStop]);
    }

    #[test]
    fn save_world_with_default_start_world_opens_the_popup() {
        let (sender, receiver) = flume::unbounded();
        let mut panel = EditorToolPanel::new(sender);
        panel.save_world(&state(Path::new("res"), DEFAULT_START_WORLD, false));
        assert!(panel.popup().is_some());
        assert!(receiver.is_empty());
    }

    #[test]
    fn save_world_publishes_the_start_world_path() {
        let (sender, receiver) = flume::unbounded();
        let mut panel = EditorToolPanel::new(sender);
        panel.save_world(&state(Path::new("res"), "Worlds/main.lworld", false));
        assert!(panel.popup().is_none());
        assert_eq!(
            receiver.try_recv().unwrap(),
            EditorEvent::WorldSaveRequest {
                path: Path::new("res").join("Worlds/main.lworld")
            }
        );
    }

    #[test]
    fn save_as_appends_the_world_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Worlds")).unwrap();
        let (sender, receiver) = flume::unbounded();
        let mut panel = EditorToolPanel::new(sender);
        panel.open_save_as(&state(dir.path(), DEFAULT_START_WORLD, false));

        let popup = panel.popup_mut().unwrap();
        assert!(popup.enter(&dir.path().join("Worlds")));
        assert_eq!(popup.relative_path(), "Worlds");
        popup.set_name("level1");
        assert!(panel.confirm_save_as());
        assert!(panel.popup().is_none());
        assert_eq!(
            receiver.try_recv().unwrap(),
            EditorEvent::WorldSaveAsRequest {
                path: dir.path().join("Worlds").join("level1.lworld")
            }
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        let (sender, receiver) = flume::unbounded();
        let mut panel = EditorToolPanel::new(sender);
        panel.open_save_as(&state(Path::new("res"), DEFAULT_START_WORLD, false));
        panel.popup_mut().unwrap().set_name("   ");

        assert!(!panel.confirm_save_as());
        assert!(panel.popup().unwrap().error().is_some());
        assert!(receiver.is_empty());
    }

    #[test]
    fn popup_navigation_stays_under_the_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        let mut popup = SaveWorldPopup::new(dir.path());

        assert_eq!(popup.relative_path(), "/");
        assert!(!popup.up());
        assert!(!popup.enter(Path::new("/")));
        assert!(popup.enter(&dir.path().join("a/b")));
        assert_eq!(popup.relative_path(), "a/b");
        assert!(popup.up());
        assert!(popup.up());
        assert!(!popup.up());
        assert_eq!(popup.current(), dir.path());

        let names: Vec<_> = popup.folders().into_iter().map(|f| f.name).collect();
        assert_eq!(names, ["a"]);
    }

    #[test]
    fn names_with_an_extension_are_kept() {
        let mut popup = SaveWorldPopup::new("res");
        popup.set_name("arena.json");
        assert_eq!(popup.target().unwrap(), Path::new("res").join("arena.json"));
    }
}
