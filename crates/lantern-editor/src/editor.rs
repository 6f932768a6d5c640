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

//! The editor context: panels, the editor event bus and how events change
//! the engine.

use crate::events::{EditorEvent, FileOperation};
use crate::gui::{EditorGuiModule, EditorState, EventSender};
use crate::panels::{ContentBrowser, EditorToolPanel, MainMenuBar, OutputLog};
use lantern_core::asset::BUILTIN_CUBE;
use lantern_core::module::priority;
use lantern_core::{AssetId, EventBus, ModuleError, ModuleRegistry};
use lantern_data::ecs::{CameraComponent, Component, Entity, MeshComponent, Transform, Velocity};
use lantern_data::{EcsModule, EntityWorld, WorldError};
use lantern_io::fs::{self, FsError};
use lantern_io::{ProjectConfig, ProjectModule, ResourceModule};
use lantern_sdk::EngineContext;
use std::path::{Path, PathBuf};

/// Components the inspector can add, remove and reset, by name.
pub const EDITABLE_COMPONENTS: [&str; 4] = ["Transform", "Mesh", "Camera", "Velocity"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComponentEdit {
    Add,
    Remove,
    Reset,
}

fn default_mesh() -> MeshComponent {
    MeshComponent {
        mesh: AssetId::from_path(BUILTIN_CUBE),
    }
}

fn edit_typed<T: Component>(
    world: &mut EntityWorld,
    entity: Entity,
    edit: ComponentEdit,
    default: T,
) -> Result<bool, WorldError> {
    let present = world.has::<T>(entity);
    match edit {
        ComponentEdit::Add if !present => world.insert(entity, default).map(|()| true),
        ComponentEdit::Reset if present => world.insert(entity, default).map(|()| true),
        ComponentEdit::Remove => Ok(world.remove::<T>(entity).is_some()),
        _ => Ok(false),
    }
}

fn edit_component(
    world: &mut EntityWorld,
    entity: Entity,
    component: &str,
    edit: ComponentEdit,
) -> Result<bool, WorldError> {
    if !world.contains(entity) {
        return Err(WorldError::NoSuchEntity);
    }
    match component {
        "Transform" => edit_typed(world, entity, edit, Transform::default()),
        "Mesh" => edit_typed(world, entity, edit, default_mesh()),
        "Camera" => edit_typed(world, entity, edit, CameraComponent::default()),
        "Velocity" => edit_typed(world, entity, edit, Velocity::default()),
        other => {
            log::warn!("Unknown component '{other}'");
            Ok(false)
        }
    }
}

/// The [`EngineContext`] of the level editor.
pub struct Editor {
    project: ProjectConfig,
    bus: EventBus<EditorEvent>,
    selected: Option<Entity>,
    show_about: bool,
    open_dialog_requested: bool,
    exit_requested: bool,
}

impl Editor {
    /// An editor for an opened project.
    pub fn new(project: ProjectConfig) -> Self {
        Self {
            project,
            bus: EventBus::new(),
            selected: None,
            show_about: false,
            open_dialog_requested: false,
            exit_requested: false,
        }
    }

    /// A sender onto the editor event bus.
    pub fn sender(&self) -> EventSender {
        self.bus.sender()
    }

    pub fn selected_entity(&self) -> Option<Entity> {
        self.selected
    }

    pub fn show_about(&self) -> bool {
        self.show_about
    }

    pub fn set_show_about(&mut self, show: bool) {
        self.show_about = show;
    }

    /// Returns `true` once after File > Open was chosen.
    pub fn take_open_dialog_request(&mut self) -> bool {
        std::mem::take(&mut self.open_dialog_requested)
    }

    /// What the panels need to draw this frame.
    pub fn gui_state(&self, modules: &ModuleRegistry) -> EditorState {
        let project = modules
            .get::<ProjectModule>()
            .and_then(|p| p.config().ok())
            .unwrap_or(&self.project);
        let ecs = modules.get::<EcsModule>();
        EditorState {
            project_name: project.project_name.clone(),
            resources_path: project.resources_path.clone(),
            editor_start_world: project.editor_start_world.clone(),
            simulating: ecs.is_some_and(EcsModule::is_simulating),
            current_world: ecs
                .and_then(EcsModule::current_world)
                .map(|w| w.name().to_owned()),
            current_world_path: ecs
                .and_then(EcsModule::current_world_path)
                .map(Path::to_path_buf),
            selected_entity: self.selected,
            windows: modules
                .get::<EditorGuiModule>()
                .map(EditorGuiModule::windows)
                .unwrap_or_default(),
        }
    }

    fn open_start_world(&self, ecs: &mut EcsModule) -> Result<(), WorldError> {
        if let Some(path) = self.project.editor_start_world_path() {
            if path.is_file() {
                match ecs.load_world(&path) {
                    Ok(_) => return Ok(()),
                    Err(e) => log::error!("Cannot open start world {}: {e}", path.display()),
                }
            } else {
                log::warn!("Start world {} does not exist", path.display());
            }
        }
        ecs.open_basic_world().map(|_| ())
    }

    fn apply(&mut self, event: EditorEvent, modules: &mut ModuleRegistry) {
        match event {
            EditorEvent::SimulationStart => self.with_ecs(modules, |ecs| ecs.simulate(true)),
            EditorEvent::SimulationStop => self.with_ecs(modules, |ecs| ecs.simulate(false)),

            EditorEvent::WorldSaveRequest { path } | EditorEvent::WorldSaveAsRequest { path } => {
                self.save_world(path, modules);
            }
            EditorEvent::WorldLoadRequest { path } => {
                let loaded = modules
                    .get_mut::<EcsModule>()
                    .map(|ecs| ecs.load_world(&path));
                match loaded {
                    Some(Ok(_)) => {
                        self.selected = None;
                        self.bus.publish(EditorEvent::WorldLoaded { path });
                    }
                    Some(Err(e)) => log::error!("Cannot load world {}: {e}", path.display()),
                    None => log::error!("No ECS module to load {} into", path.display()),
                }
            }
            EditorEvent::WorldSaved { path } => log::info!("Saved {}", path.display()),
            EditorEvent::WorldLoaded { path } => log::info!("Opened {}", path.display()),

            EditorEvent::FolderCreateRequest { parent, name } => self.file_operation(
                modules,
                FileOperation::CreateFolder,
                parent.join(&name),
                fs::create_folder(&parent, &name).map(|_| ()),
            ),
            EditorEvent::FileCreateRequest { parent, name } => self.file_operation(
                modules,
                FileOperation::CreateFile,
                parent.join(&name),
                fs::create_file(&parent, &name).map(|_| ()),
            ),
            EditorEvent::FileDeleteRequest { path } => {
                let result = fs::delete_path(&path);
                self.file_operation(modules, FileOperation::Delete, path, result);
            }
            EditorEvent::FileCopyRequest {
                source,
                destination,
            } => {
                let result = fs::copy_path(&source, &destination);
                self.file_operation(modules, FileOperation::Copy, destination, result);
            }
            EditorEvent::FileMoveRequest {
                source,
                destination,
            } => {
                let result = fs::move_path(&source, &destination);
                self.file_operation(modules, FileOperation::Move, destination, result);
            }
            EditorEvent::FileDuplicateRequest { path } => match fs::duplicate_path(&path) {
                Ok(copy) => self.file_operation(modules, FileOperation::Duplicate, copy, Ok(())),
                Err(e) => self.file_operation(modules, FileOperation::Duplicate, path, Err(e)),
            },
            EditorEvent::FileOperationCompleted {
                operation,
                path,
                success,
            } => {
                if success {
                    log::info!("{} {}: done", operation.label(), path.display());
                } else {
                    log::warn!("{} {}: failed", operation.label(), path.display());
                }
            }
            EditorEvent::FileOpenRequest { path } => {
                log::info!("No editor is registered for {}", path.display());
            }
            EditorEvent::FileSelected { path } | EditorEvent::FolderSelected { path } => {
                log::debug!("Selected {}", path.display());
            }
            EditorEvent::DirectoryNavigated { relative, .. } => {
                log::debug!("Browsing /{relative}");
            }

            EditorEvent::EntityCreateRequest {
                name,
                with_default_components,
            } => self.create_entity(modules, name, with_default_components),
            EditorEvent::EntityDeleteRequest { entity } => {
                self.with_world(modules, |world| world.despawn(entity));
                if self.selected == Some(entity) {
                    self.selected = None;
                }
            }
            EditorEvent::EntitySelected { entity } => self.selected = Some(entity),
            EditorEvent::EntityDeselected => self.selected = None,
            EditorEvent::ComponentAddRequest { entity, component } => {
                self.with_world(modules, |world| {
                    edit_component(world, entity, &component, ComponentEdit::Add).map(|_| ())
                });
            }
            EditorEvent::ComponentRemoveRequest { entity, component } => {
                self.with_world(modules, |world| {
                    edit_component(world, entity, &component, ComponentEdit::Remove).map(|_| ())
                });
            }
            EditorEvent::ComponentResetRequest { entity, component } => {
                self.with_world(modules, |world| {
                    edit_component(world, entity, &component, ComponentEdit::Reset).map(|_| ())
                });
            }

            EditorEvent::ProjectStartWorldSet { world } => self.set_start_world(modules, world),

            EditorEvent::WindowVisibilityRequest { window, visible } => {
                let found = modules
                    .get_mut::<EditorGuiModule>()
                    .is_some_and(|gui| gui.set_visible(window, visible));
                if !found {
                    log::warn!("Unknown editor window {window:?}");
                }
            }

            EditorEvent::MenuFileOpen => self.open_dialog_requested = true,
            EditorEvent::MenuFileSave => {
                let path = modules
                    .get::<EcsModule>()
                    .and_then(EcsModule::current_world_path)
                    .map(Path::to_path_buf)
                    .or_else(|| self.project.editor_start_world_path());
                match path {
                    Some(path) => self.save_world(path, modules),
                    None => log::warn!("The world has no file yet; use 'Save world as'"),
                }
            }
            EditorEvent::MenuFileExit => {
                log::info!("Exit requested");
                self.exit_requested = true;
            }
            EditorEvent::MenuEditUndo => log::info!("Nothing to undo"),
            EditorEvent::MenuEditRedo => log::info!("Nothing to redo"),
            EditorEvent::MenuHelpAbout => self.show_about = !self.show_about,
        }
    }

    fn with_ecs(
        &self,
        modules: &mut ModuleRegistry,
        f: impl FnOnce(&mut EcsModule) -> Result<(), WorldError>,
    ) {
        match modules.get_mut::<EcsModule>() {
            Some(ecs) => {
                if let Err(e) = f(ecs) {
                    log::error!("World operation failed: {e}");
                }
            }
            None => log::error!("No ECS module is registered"),
        }
    }

    fn with_world(
        &self,
        modules: &mut ModuleRegistry,
        f: impl FnOnce(&mut EntityWorld) -> Result<(), WorldError>,
    ) {
        self.with_ecs(modules, |ecs| {
            let world = ecs.current_world_mut().ok_or(WorldError::NoActiveWorld)?;
            f(world)
        });
    }

    fn save_world(&mut self, path: PathBuf, modules: &mut ModuleRegistry) {
        let saved = match modules.get_mut::<EcsModule>() {
            Some(ecs) => ecs.save_world(&path),
            None => Err(WorldError::NoActiveWorld),
        };
        match saved {
            Ok(()) => {
                self.refresh_browser(modules);
                self.bus.publish(EditorEvent::WorldSaved { path });
            }
            Err(e) => log::error!("Cannot save world to {}: {e}", path.display()),
        }
    }

    fn file_operation(
        &mut self,
        modules: &mut ModuleRegistry,
        operation: FileOperation,
        path: PathBuf,
        result: Result<(), FsError>,
    ) {
        if let Err(e) = &result {
            log::error!("Cannot {}: {e}", operation.label());
        }
        self.refresh_browser(modules);
        self.bus.publish(EditorEvent::FileOperationCompleted {
            operation,
            path,
            success: result.is_ok(),
        });
    }

    fn refresh_browser(&self, modules: &mut ModuleRegistry) {
        if let Some(browser) = modules
            .get_mut::<EditorGuiModule>()
            .and_then(EditorGuiModule::object_mut::<ContentBrowser>)
        {
            browser.refresh();
        }
    }

    fn create_entity(&mut self, modules: &mut ModuleRegistry, name: String, with_defaults: bool) {
        let Some(world) = modules
            .get_mut::<EcsModule>()
            .and_then(EcsModule::current_world_mut)
        else {
            log::error!("Cannot create '{name}': there is no active world");
            return;
        };
        let entity = world.spawn_named(name);
        if with_defaults {
            if let Err(e) = world.insert(entity, default_mesh()) {
                log::error!("Cannot add the default mesh: {e}");
            }
        }
        self.selected = Some(entity);
    }

    fn set_start_world(&mut self, modules: &mut ModuleRegistry, world: String) {
        let Some(project) = modules.get_mut::<ProjectModule>() else {
            log::error!("No project is open");
            return;
        };
        let saved = project
            .set_editor_start_world(world.clone())
            .and_then(|()| project.save());
        match saved {
            Ok(()) => {
                log::info!("Editor start world set to '{world}'");
                self.project.editor_start_world = world;
            }
            Err(e) => log::error!("Cannot set the start world: {e}"),
        }
    }
}

impl EngineContext for Editor {
    fn init_minor(&mut self, modules: &mut ModuleRegistry) -> Result<(), ModuleError> {
        modules.register(ProjectModule::with_config(self.project.clone()), priority::PROJECT)?;
        modules.register(
            ResourceModule::new(self.project.resources_path.clone()),
            priority::RESOURCE,
        )?;
        Ok(())
    }

    fn init_major(&mut self, modules: &mut ModuleRegistry) -> Result<(), ModuleError> {
        let events = self.sender();
        let mut gui = EditorGuiModule::new(events.clone());
        gui.add_object(MainMenuBar::new(events.clone()));
        gui.add_object(EditorToolPanel::new(events.clone()));
        gui.add_object(ContentBrowser::new(events, self.project.resources_path.clone()));
        gui.add_object(OutputLog::new());
        modules.register(gui, priority::GUI)?;

        let ecs = modules.require_mut::<EcsModule>()?;
        self.open_start_world(ecs)
            .map_err(|e| ModuleError::failed("editor", e))
    }

    fn tick(&mut self, _dt: f32, modules: &mut ModuleRegistry) {
        for event in self.bus.drain() {
            self.apply(event, modules);
        }
    }

    fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}
