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

//! Browsing and file management under the project resources folder.

use crate::events::EditorEvent;
use crate::gui::{publish, EditorState, EventSender, GuiObject, GuiObjectId};
use lantern_data::ecs::WORLD_EXTENSION;
use lantern_io::fs::{is_plain_name, list_directory, relative_to};
use lantern_io::DirEntryInfo;
use std::any::Any;
use std::path::{Component, Path, PathBuf};

/// A context-menu action on a browser entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    OpenWorld,
    SetAsEditorStartWorld,
    CopyPath,
    CopyAbsolutePath,
    Duplicate,
    Rename,
    Delete,
    NewFolder,
}

impl FileAction {
    pub fn label(self) -> &'static str {
        match self {
            FileAction::OpenWorld => "Open world",
            FileAction::SetAsEditorStartWorld => "Set as editor start world",
            FileAction::CopyPath => "Copy path",
            FileAction::CopyAbsolutePath => "Copy absolute path",
            FileAction::Duplicate => "Duplicate",
            FileAction::Rename => "Rename",
            FileAction::Delete => "Delete",
            FileAction::NewFolder => "New folder",
        }
    }
}

/// What [`ContentBrowser::execute`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A request went out on the editor bus.
    Published,
    /// Text the host should put on the clipboard.
    Clipboard(String),
    /// A name prompt was opened; finish with [`ContentBrowser::submit_name`].
    NeedsName,
    /// The action does not apply.
    Rejected(String),
}

#[derive(Debug, Clone)]
struct NamePrompt {
    action: FileAction,
    target: PathBuf,
    name: String,
}

enum BrowserAction {
    Navigate(PathBuf),
    Up,
    Refresh,
    Select(DirEntryInfo),
    Open(DirEntryInfo),
    Run(FileAction, DirEntryInfo),
    NewFolderHere,
    SubmitName,
    CancelName,
}

fn is_world(entry: &DirEntryInfo) -> bool {
    !entry.is_dir && entry.extension == WORLD_EXTENSION
}

/// Lists the resources folder and publishes file requests.
pub struct ContentBrowser {
    id: GuiObjectId,
    visible: bool,
    events: EventSender,
    root: PathBuf,
    current: PathBuf,
    entries: Vec<DirEntryInfo>,
    selected: Option<PathBuf>,
    prompt: Option<NamePrompt>,
}

impl ContentBrowser {
    /// A browser rooted at `root`, showing the root.
    pub fn new(events: EventSender, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut browser = Self {
            id: GuiObjectId::next(),
            visible: true,
            events,
            current: root.clone(),
            root,
            entries: Vec::new(),
            selected: None,
            prompt: None,
        };
        browser.refresh();
        browser
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    pub fn entries(&self) -> &[DirEntryInfo] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    /// Moves the browser to a new root, e.g. after another project was opened.
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
        self.current = self.root.clone();
        self.selected = None;
        self.prompt = None;
        self.refresh();
    }

    /// Re-reads the current folder. Falls back to the root if it disappeared.
    pub fn refresh(&mut self) {
        if !self.current.is_dir() {
            self.current = self.root.clone();
        }
        self.entries = match list_directory(&self.current) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Content browser cannot list {}: {e}", self.current.display());
                Vec::new()
            }
        };
        if let Some(selected) = &self.selected {
            if !selected.exists() {
                self.selected = None;
            }
        }
    }

    fn relative(&self, path: &Path) -> String {
        relative_to(path, &self.root).unwrap_or_default()
    }

    fn go_to(&mut self, folder: PathBuf) {
        self.current = folder;
        self.selected = None;
        self.refresh();
        let relative = self.relative(&self.current);
        publish(
            &self.events,
            EditorEvent::DirectoryNavigated {
                path: self.current.clone(),
                relative,
            },
        );
    }

    fn is_under_root(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
            && !path.components().any(|c| matches!(c, Component::ParentDir))
    }

    /// Opens `folder` if it is a directory under the root.
    pub fn navigate_into(&mut self, folder: &Path) -> bool {
        if !self.is_under_root(folder) || !folder.is_dir() {
            return false;
        }
        self.go_to(folder.to_path_buf());
        true
    }

    /// Opens the parent folder. Does nothing at the root.
    pub fn navigate_up(&mut self) -> bool {
        if self.current == self.root {
            return false;
        }
        match self.current.parent() {
            Some(parent) if self.is_under_root(parent) => {
                self.go_to(parent.to_path_buf());
                true
            }
            _ => false,
        }
    }

    /// `(label, folder)` pairs from the root down to the current folder.
    pub fn breadcrumbs(&self) -> Vec<(String, PathBuf)> {
        let root_label = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("Resources"));
        let mut crumbs = vec![(root_label, self.root.clone())];
        if let Ok(relative) = self.current.strip_prefix(&self.root) {
            let mut path = self.root.clone();
            for component in relative.components() {
                path.push(component);
                let label = component.as_os_str().to_string_lossy().into_owned();
                crumbs.push((label, path.clone()));
            }
        }
        crumbs
    }

    /// Marks an entry as selected and announces it.
    pub fn select(&mut self, entry: &DirEntryInfo) {
        self.selected = Some(entry.path.clone());
        let path = entry.path.clone();
        let event = if entry.is_dir {
            EditorEvent::FolderSelected { path }
        } else {
            EditorEvent::FileSelected { path }
        };
        publish(&self.events, event);
    }

    /// Double-click behaviour: folders open, worlds load, other files are
    /// handed to the editor.
    pub fn open(&mut self, entry: &DirEntryInfo) {
        if entry.is_dir {
            self.navigate_into(&entry.path);
        } else if is_world(entry) {
            publish(&self.events, EditorEvent::WorldLoadRequest { path: entry.path.clone() });
        } else {
            publish(&self.events, EditorEvent::FileOpenRequest { path: entry.path.clone() });
        }
    }

    /// The actions that apply to `entry`, in menu order.
    pub fn actions_for(&self, entry: &DirEntryInfo) -> Vec<FileAction> {
        let mut actions = Vec::new();
        if is_world(entry) {
            actions.extend([FileAction::OpenWorld, FileAction::SetAsEditorStartWorld]);
        }
        actions.extend([
            FileAction::CopyPath,
            FileAction::CopyAbsolutePath,
            FileAction::Duplicate,
            FileAction::Rename,
            FileAction::Delete,
        ]);
        if entry.is_dir {
            actions.push(FileAction::NewFolder);
        }
        actions
    }

    /// Runs `action` on `entry`.
    pub fn execute(&mut self, action: FileAction, entry: &DirEntryInfo) -> ActionOutcome {
        if !self.actions_for(entry).contains(&action) {
            return ActionOutcome::Rejected(format!(
                "'{}' does not apply to {}",
                action.label(),
                entry.name
            ));
        }
        let path = entry.path.clone();
        let event = match action {
            FileAction::CopyPath => return ActionOutcome::Clipboard(self.relative(&path)),
            FileAction::CopyAbsolutePath => {
                return ActionOutcome::Clipboard(path.display().to_string())
            }
            FileAction::Rename => {
                self.prompt_name(FileAction::Rename, path, entry.name.clone());
                return ActionOutcome::NeedsName;
            }
            FileAction::NewFolder => {
                self.prompt_name(FileAction::NewFolder, path, String::new());
                return ActionOutcome::NeedsName;
            }
            FileAction::OpenWorld => EditorEvent::WorldLoadRequest { path },
            FileAction::SetAsEditorStartWorld => EditorEvent::ProjectStartWorldSet {
                world: self.relative(&path),
            },
            FileAction::Duplicate => EditorEvent::FileDuplicateRequest { path },
            FileAction::Delete => EditorEvent::FileDeleteRequest { path },
        };
        publish(&self.events, event);
        ActionOutcome::Published
    }

    /// Asks for a folder name to create inside the current folder.
    pub fn new_folder_here(&mut self) {
        self.prompt_name(FileAction::NewFolder, self.current.clone(), String::new());
    }

    fn prompt_name(&mut self, action: FileAction, target: PathBuf, name: String) {
        self.prompt = Some(NamePrompt {
            action,
            target,
            name,
        });
    }

    /// The name being typed into an open prompt.
    pub fn prompt_text(&self) -> Option<&str> {
        self.prompt.as_ref().map(|p| p.name.as_str())
    }

    /// Finishes a rename or new-folder prompt with `name`.
    pub fn submit_name(&mut self, name: &str) -> ActionOutcome {
        let name = name.trim();
        let Some(prompt) = self.prompt.take() else {
            return ActionOutcome::Rejected(String::from("no name was requested"));
        };
        if name.is_empty() {
            self.prompt = Some(prompt);
            return ActionOutcome::Rejected(String::from("name is empty"));
        }
        if prompt.action == FileAction::Rename && !is_plain_name(name) {
            self.prompt = Some(prompt);
            return ActionOutcome::Rejected(format!("'{name}' is not a valid file name"));
        }
        let event = match prompt.action {
            FileAction::Rename => {
                let parent = prompt.target.parent().unwrap_or(&self.root);
                EditorEvent::FileMoveRequest {
                    destination: parent.join(name),
                    source: prompt.target,
                }
            }
            _ => EditorEvent::FolderCreateRequest {
                parent: prompt.target,
                name: name.to_owned(),
            },
        };
        publish(&self.events, event);
        ActionOutcome::Published
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    fn toolbar(&self, ui: &mut egui::Ui, actions: &mut Vec<BrowserAction>) {
        ui.horizontal(|ui| {
            if ui.add_enabled(self.current != self.root, egui::Button::new("Up")).clicked() {
                actions.push(BrowserAction::Up);
            }
            if ui.button("Refresh").clicked() {
                actions.push(BrowserAction::Refresh);
            }
            if ui.button("New folder").clicked() {
                actions.push(BrowserAction::NewFolderHere);
            }
            ui.separator();
            for (i, (label, path)) in self.breadcrumbs().into_iter().enumerate() {
                if i > 0 {
                    ui.label("/");
                }
                if ui.link(label).clicked() {
                    actions.push(BrowserAction::Navigate(path));
                }
            }
        });
    }

    fn entry_list(&self, ui: &mut egui::Ui, actions: &mut Vec<BrowserAction>) {
        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            if self.entries.is_empty() {
                ui.weak("Empty folder");
            }
            for entry in &self.entries {
                let selected = self.selected.as_deref() == Some(entry.path.as_path());
                let label = if entry.is_dir {
                    format!("[{}]", entry.name)
                } else {
                    entry.name.clone()
                };
                let response = ui.selectable_label(selected, label);
                if response.double_clicked() {
                    actions.push(BrowserAction::Open(entry.clone()));
                } else if response.clicked() {
                    actions.push(BrowserAction::Select(entry.clone()));
                }
                response.context_menu(|ui| {
                    for action in self.actions_for(entry) {
                        if ui.button(action.label()).clicked() {
                            actions.push(BrowserAction::Run(action, entry.clone()));
                            ui.close();
                        }
                    }
                });
            }
        });
    }

    fn prompt_ui(ctx: &egui::Context, prompt: &mut NamePrompt, actions: &mut Vec<BrowserAction>) {
        let title = match prompt.action {
            FileAction::Rename => "Rename",
            _ => "New folder",
        };
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let response = ui.text_edit_singleline(&mut prompt.name);
                let entered =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() || entered {
                        actions.push(BrowserAction::SubmitName);
                    }
                    if ui.button("Cancel").clicked() {
                        actions.push(BrowserAction::CancelName);
                    }
                });
            });
    }

    fn apply(&mut self, ctx: &egui::Context, action: BrowserAction) {
        match action {
            BrowserAction::Navigate(path) => {
                self.navigate_into(&path);
            }
            BrowserAction::Up => {
                self.navigate_up();
            }
            BrowserAction::Refresh => self.refresh(),
            BrowserAction::Select(entry) => self.select(&entry),
            BrowserAction::Open(entry) => self.open(&entry),
            BrowserAction::Run(action, entry) => match self.execute(action, &entry) {
                ActionOutcome::Clipboard(text) => ctx.copy_text(text),
                ActionOutcome::Rejected(reason) => log::warn!("{reason}"),
                ActionOutcome::Published | ActionOutcome::NeedsName => {}
            },
            BrowserAction::NewFolderHere => self.new_folder_here(),
            BrowserAction::SubmitName => {
                let name = self.prompt_text().unwrap_or_default().to_owned();
                if let ActionOutcome::Rejected(reason) = self.submit_name(&name) {
                    log::warn!("{reason}");
                }
            }
            BrowserAction::CancelName => self.cancel_prompt(),
        }
    }
}

impl GuiObject for ContentBrowser {
    fn id(&self) -> GuiObjectId {
        self.id
    }

    fn title(&self) -> &str {
        "Content Browser"
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn ui(&mut self, ctx: &egui::Context, state: &EditorState) {
        if !state.resources_path.as_os_str().is_empty() && state.resources_path != self.root {
            self.set_root(state.resources_path.clone());
        }

        let mut actions = Vec::new();
        egui::Window::new("Content Browser")
            .default_size([520.0, 260.0])
            .show(ctx, |ui| {
                self.toolbar(ui, &mut actions);
                ui.separator();
                self.entry_list(ui, &mut actions);
            });
        if let Some(prompt) = self.prompt.as_mut() {
            Self::prompt_ui(ctx, prompt, &mut actions);
        }
        for action in actions {
            self.apply(ctx, action);
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

    fn setup() -> (tempfile::TempDir, ContentBrowser, flume::Receiver<EditorEvent>) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Worlds/Arena")).unwrap();
        fs::create_dir(dir.path().join("Meshes")).unwrap();
        fs::write(dir.path().join("Worlds/main.lworld"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let (sender, receiver) = flume::unbounded();
        let browser = ContentBrowser::new(sender, dir.path());
        (dir, browser, receiver)
    }

    fn entry(browser: &ContentBrowser, name: &str) -> DirEntryInfo {
        browser
            .entries()
            .iter()
            .find(|e| e.name == name)
            .cloned()
            .unwrap()
    }

    #[test]
    fn lists_folders_first() {
        let (_dir, browser, _rx) = setup();
        let names: Vec<_> = browser.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Meshes", "Worlds", "notes.txt"]);
    }

    #[test]
    fn navigation_stays_under_the_root() {
        let (dir, mut browser, rx) = setup();
        assert!(!browser.navigate_up());
        assert!(!browser.navigate_into(dir.path().parent().unwrap()));
        assert!(!browser.navigate_into(&dir.path().join("..")));
        assert!(!browser.navigate_into(&dir.path().join("Worlds/../..")));
        assert!(rx.try_recv().is_err());

        assert!(browser.navigate_into(&dir.path().join("Worlds/Arena")));
        assert_eq!(
            rx.try_recv().unwrap(),
            EditorEvent::DirectoryNavigated {
                path: dir.path().join("Worlds/Arena"),
                relative: String::from("Worlds/Arena"),
            }
        );
        let crumbs: Vec<_> = browser.breadcrumbs().into_iter().map(|(l, _)| l).collect();
        assert_eq!(crumbs[1..], ["Worlds", "Arena"]);

        assert!(browser.navigate_up());
        assert!(browser.navigate_up());
        assert!(!browser.navigate_up());
        assert_eq!(browser.current(), dir.path());
    }

    #[test]
    fn world_files_get_world_actions() {
        let (dir, mut browser, _rx) = setup();
        browser.navigate_into(&dir.path().join("Worlds"));
        let world = entry(&browser, "main.lworld");
        let folder = entry(&browser, "Arena");

        let actions = browser.actions_for(&world);
        assert_eq!(actions[..2], [FileAction::OpenWorld, FileAction::SetAsEditorStartWorld]);
        assert!(!actions.contains(&FileAction::NewFolder));
        let actions = browser.actions_for(&folder);
        assert!(!actions.contains(&FileAction::OpenWorld));
        assert!(actions.contains(&FileAction::NewFolder));
    }

    #[test]
    fn execute_publishes_requests() {
        let (dir, mut browser, rx) = setup();
        browser.navigate_into(&dir.path().join("Worlds"));
        let _ = rx.try_recv();
        let world = entry(&browser, "main.lworld");

        assert_eq!(
            browser.execute(FileAction::SetAsEditorStartWorld, &world),
            ActionOutcome::Published
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            EditorEvent::ProjectStartWorldSet {
                world: String::from("Worlds/main.lworld")
            }
        );

        assert_eq!(browser.execute(FileAction::Delete, &world), ActionOutcome::Published);
        assert_eq!(
            rx.try_recv().unwrap(),
            EditorEvent::FileDeleteRequest { path: world.path.clone() }
        );
    }

    #[test]
    fn copy_path_is_relative_to_the_root() {
        let (dir, mut browser, _rx) = setup();
        browser.navigate_into(&dir.path().join("Worlds"));
        let world = entry(&browser, "main.lworld");
        assert_eq!(
            browser.execute(FileAction::CopyPath, &world),
            ActionOutcome::Clipboard(String::from("Worlds/main.lworld"))
        );
        assert_eq!(
            browser.execute(FileAction::CopyAbsolutePath, &world),
            ActionOutcome::Clipboard(world.path.display().to_string())
        );
    }

    #[test]
    fn actions_that_do_not_apply_are_rejected() {
        let (_dir, mut browser, rx) = setup();
        let notes = entry(&browser, "notes.txt");
        assert!(matches!(
            browser.execute(FileAction::OpenWorld, &notes),
            ActionOutcome::Rejected(_)
        ));
        assert!(rx.is_empty());
    }

    #[test]
    fn rename_goes_through_a_name_prompt() {
        let (dir, mut browser, rx) = setup();
        let notes = entry(&browser, "notes.txt");
        assert_eq!(browser.execute(FileAction::Rename, &notes), ActionOutcome::NeedsName);
        assert_eq!(browser.prompt_text(), Some("notes.txt"));

        assert!(matches!(browser.submit_name(" "), ActionOutcome::Rejected(_)));
        assert_eq!(browser.submit_name("todo.txt"), ActionOutcome::Published);
        assert_eq!(
            rx.try_recv().unwrap(),
            EditorEvent::FileMoveRequest {
                source: dir.path().join("notes.txt"),
                destination: dir.path().join("todo.txt"),
            }
        );
        assert!(browser.prompt_text().is_none());
    }

    #[test]
    fn rename_rejects_names_leaving_the_folder() {
        let (_dir, mut browser, rx) = setup();
        let notes = entry(&browser, "notes.txt");
        browser.execute(FileAction::Rename, &notes);

        for bad in ["../x", "../../escaped.txt", "sub/x", "..", "."] {
            assert!(
                matches!(browser.submit_name(bad), ActionOutcome::Rejected(_)),
                "{bad} accepted"
            );
        }
        assert!(rx.try_recv().is_err());
        assert_eq!(browser.prompt_text(), Some("notes.txt"));
    }

    #[test]
    fn new_folder_here_requests_a_folder_in_the_current_folder() {
        let (dir, mut browser, rx) = setup();
        browser.new_folder_here();
        browser.submit_name("Textures");
        assert_eq!(
            rx.try_recv().unwrap(),
            EditorEvent::FolderCreateRequest {
                parent: dir.path().to_path_buf(),
                name: String::from("Textures"),
            }
        );
    }

    #[test]
    fn refresh_falls_back_to_the_root_when_the_folder_is_gone() {
        let (dir, mut browser, _rx) = setup();
        browser.navigate_into(&dir.path().join("Meshes"));
        fs::remove_dir(dir.path().join("Meshes")).unwrap();
        browser.refresh();
        assert_eq!(browser.current(), dir.path());
    }
}
