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
use std::any::Any;

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Open,
    Save,
    Exit,
    Undo,
    Redo,
    About,
}

impl MenuCommand {
    /// Menus in display order with their entries.
    pub const MENUS: [(&'static str, &'static [MenuCommand]); 3] = [
        ("File", &[MenuCommand::Open, MenuCommand::Save, MenuCommand::Exit]),
        ("Edit", &[MenuCommand::Undo, MenuCommand::Redo]),
        ("Help", &[MenuCommand::About]),
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuCommand::Open => "Open",
            MenuCommand::Save => "Save",
            MenuCommand::Exit => "Exit",
            MenuCommand::Undo => "Undo",
            MenuCommand::Redo => "Redo",
            MenuCommand::About => "About",
        }
    }

    /// The event published when the entry is clicked.
    pub fn event(self) -> EditorEvent {
        match self {
            MenuCommand::Open => EditorEvent::MenuFileOpen,
            MenuCommand::Save => EditorEvent::MenuFileSave,
            MenuCommand::Exit => EditorEvent::MenuFileExit,
            MenuCommand::Undo => EditorEvent::MenuEditUndo,
            MenuCommand::Redo => EditorEvent::MenuEditRedo,
            MenuCommand::About => EditorEvent::MenuHelpAbout,
        }
    }
}

/// The File / Edit / Help bar along the top of the editor.
pub struct MainMenuBar {
    id: GuiObjectId,
    visible: bool,
    events: EventSender,
}

impl MainMenuBar {
    pub fn new(events: EventSender) -> Self {
        Self {
            id: GuiObjectId::next(),
            visible: true,
            events,
        }
    }

    fn view_menu(&self, ui: &mut egui::Ui, state: &EditorState) {
        ui.menu_button("View", |ui| {
            for (window, title, visible) in &state.windows {
                if *window == self.id {
                    continue;
                }
                let mut shown = *visible;
                if ui.checkbox(&mut shown, title).changed() {
                    publish(
                        &self.events,
                        EditorEvent::WindowVisibilityRequest {
                            window: *window,
                            visible: shown,
                        },
                    );
                }
            }
        });
    }

    /// Publishes the event of `command`.
    pub fn trigger(&self, command: MenuCommand) {
        log::debug!("Menu '{}' selected", command.label());
        publish(&self.events, command.event());
    }
}

impl GuiObject for MainMenuBar {
    fn id(&self) -> GuiObjectId {
        self.id
    }

    fn title(&self) -> &str {
        "Main Menu"
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn ui(&mut self, ctx: &egui::Context, state: &EditorState) {
        egui::TopBottomPanel::top("main_menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                for (menu, commands) in MenuCommand::MENUS {
                    ui.menu_button(menu, |ui| {
                        for &command in commands {
                            if ui.button(command.label()).clicked() {
                                self.trigger(command);
                                ui.close();
                            }
                        }
                    });
                    if menu == "Edit" {
                        self.view_menu(ui, state);
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(&state.project_name);
                });
            });
        });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
