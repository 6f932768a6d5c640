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

//! # Lantern Editor
//!
//! The level editor: an [`Editor`] context running inside an
//! [`Engine`](lantern_sdk::Engine), egui windows that talk to it through
//! [`EditorEvent`]s, and the eframe host in [`EditorApp`].

pub mod app;
pub mod editor;
pub mod events;
pub mod gui;
pub mod inspector;
pub mod panels;

pub use app::EditorApp;
pub use editor::{Editor, EDITABLE_COMPONENTS};
pub use events::{EditorEvent, FileOperation};
pub use gui::{EditorGuiModule, EditorState, EventSender, GuiObject, GuiObjectId};
