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

//! The hierarchy and inspector side panel.

use crate::editor::EDITABLE_COMPONENTS;
use crate::events::EditorEvent;
use crate::gui::{publish, EditorState, EventSender};
use lantern_core::math::Vec3;
use lantern_core::ModuleRegistry;
use lantern_data::ecs::{CameraComponent, Entity, MeshComponent, Transform, Velocity};
use lantern_data::{EcsModule, EntityWorld};

fn vec3_row(ui: &mut egui::Ui, label: &str, value: &mut Vec3, speed: f64) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(&mut value.x).speed(speed).prefix("x "));
        ui.add(egui::DragValue::new(&mut value.y).speed(speed).prefix("y "));
        ui.add(egui::DragValue::new(&mut value.z).speed(speed).prefix("z "));
    });
}

fn has_component(world: &EntityWorld, entity: Entity, name: &str) -> bool {
    match name {
        "Transform" => world.has::<Transform>(entity),
        "Mesh" => world.has::<MeshComponent>(entity),
        "Camera" => world.has::<CameraComponent>(entity),
        "Velocity" => world.has::<Velocity>(entity),
        _ => false,
    }
}

/// Component title with Reset and Remove buttons.
fn component_header(ui: &mut egui::Ui, name: &str, entity: Entity, events: &EventSender) {
    ui.separator();
    ui.horizontal(|ui| {
        ui.strong(name);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("Remove").clicked() {
                publish(
                    events,
                    EditorEvent::ComponentRemoveRequest {
                        entity,
                        component: name.to_owned(),
                    },
                );
            }
            if ui.small_button("Reset").clicked() {
                publish(
                    events,
                    EditorEvent::ComponentResetRequest {
                        entity,
                        component: name.to_owned(),
                    },
                );
            }
        });
    });
}

fn hierarchy(ui: &mut egui::Ui, world: &EntityWorld, state: &EditorState, events: &EventSender) {
    ui.horizontal(|ui| {
        ui.heading("Hierarchy");
        if ui.button("+").on_hover_text("Add entity").clicked() {
            publish(
                events,
                EditorEvent::EntityCreateRequest {
                    name: String::from("Entity"),
                    with_default_components: true,
                },
            );
        }
    });
    ui.weak(world.name());
    egui::ScrollArea::vertical()
        .id_salt("hierarchy_entities")
        .max_height(ui.available_height() * 0.4)
        .show(ui, |ui| {
            for entity in world.entities() {
                let name = world
                    .name_of(entity)
                    .unwrap_or_else(|| format!("Entity {}", entity.id()));
                let selected = state.selected_entity == Some(entity);
                let response = ui.selectable_label(selected, name);
                if response.clicked() {
                    let event = if selected {
                        EditorEvent::EntityDeselected
                    } else {
                        EditorEvent::EntitySelected { entity }
                    };
                    publish(events, event);
                }
                response.context_menu(|ui| {
                    if ui.button("Delete").clicked() {
                        publish(events, EditorEvent::EntityDeleteRequest { entity });
                        ui.close();
                    }
                });
            }
        });
}

fn inspector(ui: &mut egui::Ui, world: &mut EntityWorld, entity: Entity, events: &EventSender) {
    ui.heading("Inspector");
    if let Some(name) = world.name_of(entity) {
        ui.label(name);
    }
    if let Some(guid) = world.guid_of(entity) {
        ui.weak(guid.to_string());
    }

    if world.has::<Transform>(entity) {
        component_header(ui, "Transform", entity, events);
        if let Some(mut transform) = world.get_mut::<Transform>(entity) {
            vec3_row(ui, "Position", &mut transform.position, 0.05);
            vec3_row(ui, "Rotation", &mut transform.rotation, 0.5);
            vec3_row(ui, "Scale", &mut transform.scale, 0.01);
        }
    }
    if world.has::<MeshComponent>(entity) {
        component_header(ui, "Mesh", entity, events);
        if let Some(mesh) = world.get::<MeshComponent>(entity) {
            ui.monospace(mesh.mesh.to_string());
        }
    }
    if world.has::<CameraComponent>(entity) {
        component_header(ui, "Camera", entity, events);
        if let Some(mut camera) = world.get_mut::<CameraComponent>(entity) {
            ui.add(egui::Slider::new(&mut camera.fov, 10.0..=150.0).text("FOV"));
            ui.add(egui::DragValue::new(&mut camera.near).speed(0.01).prefix("near "));
            ui.add(egui::DragValue::new(&mut camera.far).speed(1.0).prefix("far "));
            ui.checkbox(&mut camera.active, "Active");
        }
    }
    if world.has::<Velocity>(entity) {
        component_header(ui, "Velocity", entity, events);
        if let Some(mut velocity) = world.get_mut::<Velocity>(entity) {
            vec3_row(ui, "Linear", &mut velocity.linear, 0.05);
            vec3_row(ui, "Angular", &mut velocity.angular, 0.5);
        }
    }

    ui.separator();
    ui.menu_button("Add component", |ui| {
        for name in EDITABLE_COMPONENTS {
            let missing = !has_component(world, entity, name);
            if ui.add_enabled(missing, egui::Button::new(name)).clicked() {
                publish(
                    events,
                    EditorEvent::ComponentAddRequest {
                        entity,
                        component: name.to_owned(),
                    },
                );
                ui.close();
            }
        }
    });
}

/// Draws the left side panel for the active world.
pub fn side_panel(
    ctx: &egui::Context,
    state: &EditorState,
    modules: &mut ModuleRegistry,
    events: &EventSender,
) {
    egui::SidePanel::left("hierarchy_inspector")
        .resizable(true)
        .default_width(260.0)
        .show(ctx, |ui| {
            let Some(world) = modules
                .get_mut::<EcsModule>()
                .and_then(EcsModule::current_world_mut)
            else {
                ui.weak("No world is open");
                return;
            };
            hierarchy(ui, world, state, events);
            ui.separator();
            match state.selected_entity.filter(|&e| world.contains(e)) {
                Some(entity) => inspector(ui, world, entity, events),
                None => {
                    ui.weak("Select an entity to inspect it");
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_names_match_the_world() {
        let mut world = EntityWorld::new("test");
        let entity = world.spawn_named("e");
        assert!(has_component(&world, entity, "Transform"));
        assert!(!has_component(&world, entity, "Velocity"));
        world.insert(entity, Velocity::default()).unwrap();
        assert!(has_component(&world, entity, "Velocity"));
        assert!(!has_component(&world, entity, "Rigidbody"));
    }
}
