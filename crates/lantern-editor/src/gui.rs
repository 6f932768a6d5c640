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

//! Editor windows and the module that owns them.

use crate::events::EditorEvent;
use lantern_core::{Module, ModuleError};
use lantern_data::ecs::Entity;
use std::any::Any;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique id of a [`GuiObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GuiObjectId(u64);

impl GuiObjectId {
    /// Hands out the next id.
    pub fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Sending half of the editor event bus.
pub type EventSender = flume::Sender<EditorEvent>;

pub(crate) fn publish(sender: &EventSender, event: EditorEvent) {
    if let Err(e) = sender.send(event) {
        log::error!("Editor event dropped: {e}");
    }
}

/// Read-only view of the editor handed to every window each frame.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub project_name: String,
    pub resources_path: PathBuf,
    /// Editor start world relative to the resources path, or `"default"`.
    pub editor_start_world: String,
    pub simulating: bool,
    pub current_world: Option<String>,
    pub current_world_path: Option<PathBuf>,
    pub selected_entity: Option<Entity>,
    /// Every editor window as `(id, title, visible)`.
    pub windows: Vec<(GuiObjectId, String, bool)>,
}

/// A window or bar drawn by the [`EditorGuiModule`].
pub trait GuiObject: Any {
    fn id(&self) -> GuiObjectId;

    fn title(&self) -> &str;

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    fn hide(&mut self) {
        self.set_visible(false);
    }

    /// Draws the object. Only called while it is visible.
    fn ui(&mut self, ctx: &egui::Context, state: &EditorState);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Owns the editor windows and the sender they publish on.
pub struct EditorGuiModule {
    objects: Vec<Box<dyn GuiObject>>,
    events: EventSender,
}

impl EditorGuiModule {
    pub fn new(events: EventSender) -> Self {
        Self {
            objects: Vec::new(),
            events,
        }
    }

    /// A clone of the sender windows publish on.
    pub fn sender(&self) -> EventSender {
        self.events.clone()
    }

    /// Adds a window; objects draw in insertion order.
    pub fn add_object<T: GuiObject>(&mut self, object: T) -> GuiObjectId {
        let id = object.id();
        log::debug!("Editor window '{}' added", object.title());
        self.objects.push(Box::new(object));
        id
    }

    /// Removes a window. Returns `false` for unknown ids.
    pub fn remove_object(&mut self, id: GuiObjectId) -> bool {
        let before = self.objects.len();
        self.objects.retain(|o| o.id() != id);
        self.objects.len() != before
    }

    /// The first window of type `T`.
    pub fn object<T: GuiObject>(&self) -> Option<&T> {
        self.objects
            .iter()
            .find_map(|o| o.as_any().downcast_ref::<T>())
    }

    pub fn object_mut<T: GuiObject>(&mut self) -> Option<&mut T> {
        self.objects
            .iter_mut()
            .find_map(|o| o.as_any_mut().downcast_mut::<T>())
    }

    /// Titles and visibility of every window, in draw order.
    pub fn windows(&self) -> Vec<(GuiObjectId, String, bool)> {
        self.objects
            .iter()
            .map(|o| (o.id(), o.title().to_owned(), o.is_visible()))
            .collect()
    }

    pub fn set_visible(&mut self, id: GuiObjectId, visible: bool) -> bool {
        match self.objects.iter_mut().find(|o| o.id() == id) {
            Some(object) => {
                object.set_visible(visible);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Draws every visible window.
    pub fn render(&mut self, ctx: &egui::Context, state: &EditorState) {
        for object in self.objects.iter_mut().filter(|o| o.is_visible()) {
            object.ui(ctx, state);
        }
    }
}

impl Module for EditorGuiModule {
    fn name(&self) -> &'static str {
        "editor_gui"
    }

    fn startup(&mut self) -> Result<(), ModuleError> {
        log::info!("Editor GUI ready with {} windows", self.objects.len());
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), ModuleError> {
        self.objects.clear();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
