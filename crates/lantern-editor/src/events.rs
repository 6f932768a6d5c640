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

//! Requests and notifications exchanged between the editor panels and the
//! [`Editor`](crate::editor::Editor) context.

use crate::gui::GuiObjectId;
use lantern_data::ecs::Entity;
use std::path::PathBuf;

/// Which file operation a [`EditorEvent::FileOperationCompleted`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    CreateFolder,
    CreateFile,
    Delete,
    Copy,
    Move,
    Duplicate,
}

impl FileOperation {
    pub fn label(self) -> &'static str {
        match self {
            FileOperation::CreateFolder => "create folder",
            FileOperation::CreateFile => "create file",
            FileOperation::Delete => "delete",
            FileOperation::Copy => "copy",
            FileOperation::Move => "move",
            FileOperation::Duplicate => "duplicate",
        }
    }
}

/// Everything the editor reacts to. Panels publish these on the editor bus and
/// the editor applies them at the start of the next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    SimulationStart,
    SimulationStop,

    /// Save the active world over an existing file.
    WorldSaveRequest { path: PathBuf },
    /// Save the active world to a new file.
    WorldSaveAsRequest { path: PathBuf },
    WorldLoadRequest { path: PathBuf },
    WorldSaved { path: PathBuf },
    WorldLoaded { path: PathBuf },

    FolderCreateRequest { parent: PathBuf, name: String },
    FileCreateRequest { parent: PathBuf, name: String },
    FileDeleteRequest { path: PathBuf },
    FileCopyRequest { source: PathBuf, destination: PathBuf },
    FileMoveRequest { source: PathBuf, destination: PathBuf },
    FileDuplicateRequest { path: PathBuf },
    FileOperationCompleted {
        operation: FileOperation,
        path: PathBuf,
        success: bool,
    },
    FileOpenRequest { path: PathBuf },
    FileSelected { path: PathBuf },
    FolderSelected { path: PathBuf },
    /// The content browser moved to another folder.
    DirectoryNavigated { path: PathBuf, relative: String },

    EntityCreateRequest {
        name: String,
        with_default_components: bool,
    },
    EntityDeleteRequest { entity: Entity },
    EntitySelected { entity: Entity },
    EntityDeselected,
    ComponentAddRequest { entity: Entity, component: String },
    ComponentRemoveRequest { entity: Entity, component: String },
    ComponentResetRequest { entity: Entity, component: String },

    /// Store a world, relative to the resources root, as the editor start world.
    ProjectStartWorldSet { world: String },

    /// Show or hide an editor window.
    WindowVisibilityRequest { window: GuiObjectId, visible: bool },

    MenuFileOpen,
    MenuFileSave,
    MenuFileExit,
    MenuEditUndo,
    MenuEditRedo,
    MenuHelpAbout,
}
