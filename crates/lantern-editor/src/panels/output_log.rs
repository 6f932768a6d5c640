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

use crate::gui::{EditorState, GuiObject, GuiObjectId};
use lantern_core::logging::{log_event, LogMessage, LogVerbosity};
use lantern_core::Subscription;
use std::any::Any;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// Lines kept before the oldest are dropped.
pub const MAX_LOG_LINES: usize = 1000;

type SharedLines = Arc<Mutex<VecDeque<LogMessage>>>;

fn push_capped(lines: &SharedLines, message: LogMessage) {
    let mut lines = lines.lock().unwrap_or_else(PoisonError::into_inner);
    if lines.len() == MAX_LOG_LINES {
        lines.pop_front();
    }
    lines.push_back(message);
}

fn color_of(verbosity: LogVerbosity) -> egui::Color32 {
    match verbosity {
        LogVerbosity::Verbose => egui::Color32::GRAY,
        LogVerbosity::Debug => egui::Color32::LIGHT_BLUE,
        LogVerbosity::Info => egui::Color32::LIGHT_GRAY,
        LogVerbosity::Warning => egui::Color32::YELLOW,
        LogVerbosity::Error => egui::Color32::LIGHT_RED,
        LogVerbosity::Fatal => egui::Color32::RED,
    }
}

/// Scrolling view of the engine log.
pub struct OutputLog {
    id: GuiObjectId,
    visible: bool,
    lines: SharedLines,
    shown: [bool; LogVerbosity::ALL.len()],
    category_filter: String,
    auto_scroll: bool,
    _subscription: Option<Subscription>,
}

impl OutputLog {
    /// A log window fed by every engine log line.
    pub fn new() -> Self {
        let mut log = Self::detached();
        let lines = Arc::clone(&log.lines);
        log._subscription = Some(log_event().subscribe_scoped(move |message: &LogMessage| {
            push_capped(&lines, message.clone());
        }));
        log
    }

    /// A log window that only shows what is passed to [`OutputLog::receive`].
    pub fn detached() -> Self {
        Self {
            id: GuiObjectId::next(),
            visible: true,
            lines: Arc::default(),
            shown: [true; LogVerbosity::ALL.len()],
            category_filter: String::new(),
            auto_scroll: true,
            _subscription: None,
        }
    }

    /// Appends a line, dropping the oldest past [`MAX_LOG_LINES`].
    pub fn receive(&self, message: LogMessage) {
        push_capped(&self.lines, message);
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Every stored line, oldest first.
    pub fn messages(&self) -> Vec<LogMessage> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// The stored lines that pass the verbosity and category filters.
    pub fn filtered_messages(&self) -> Vec<LogMessage> {
        let category = self.category_filter.trim().to_lowercase();
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|m| self.is_shown(m.verbosity))
            .filter(|m| category.is_empty() || m.category.to_lowercase().contains(&category))
            .cloned()
            .collect()
    }

    pub fn is_shown(&self, verbosity: LogVerbosity) -> bool {
        self.shown[verbosity as usize]
    }

    pub fn set_shown(&mut self, verbosity: LogVerbosity, shown: bool) {
        self.shown[verbosity as usize] = shown;
    }

    pub fn set_category_filter(&mut self, filter: impl Into<String>) {
        self.category_filter = filter.into();
    }

    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    pub fn set_auto_scroll(&mut self, auto_scroll: bool) {
        self.auto_scroll = auto_scroll;
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for verbosity in LogVerbosity::ALL {
                let mut shown = self.is_shown(verbosity);
                if ui.checkbox(&mut shown, verbosity.label()).changed() {
                    self.set_shown(verbosity, shown);
                }
            }
        });
        ui.horizontal(|ui| {
            ui.label("Category");
            ui.text_edit_singleline(&mut self.category_filter);
            ui.checkbox(&mut self.auto_scroll, "Auto-scroll");
            if ui.button("Clear").clicked() {
                self.clear();
            }
        });
    }
}

impl Default for OutputLog {
    fn default() -> Self {
        Self::new()
    }
}

impl GuiObject for OutputLog {
    fn id(&self) -> GuiObjectId {
        self.id
    }

    fn title(&self) -> &str {
        "Output Log"
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn ui(&mut self, ctx: &egui::Context, _state: &EditorState) {
        let mut open = self.visible;
        egui::Window::new(self.title())
            .open(&mut open)
            .default_size([640.0, 220.0])
            .show(ctx, |ui| {
                self.toolbar(ui);
                ui.separator();
                let lines = self.filtered_messages();
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(self.auto_scroll)
                    .show(ui, |ui| {
                        for line in &lines {
                            ui.colored_label(
                                color_of(line.verbosity),
                                format!("[{}] {}: {}", line.verbosity, line.category, line.text),
                            );
                        }
                    });
            });
        self.visible = open;
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

    fn line(verbosity: LogVerbosity, text: &str) -> LogMessage {
        LogMessage::new(verbosity, "lantern_editor", text)
    }

    #[test]
    fn oldest_lines_are_dropped_at_the_cap() {
        let log = OutputLog::detached();
        for i in 0..MAX_LOG_LINES + 5 {
            log.receive(line(LogVerbosity::Info, &i.to_string()));
        }
        let messages = log.messages();
        assert_eq!(messages.len(), MAX_LOG_LINES);
        assert_eq!(messages[0].text, "5");
        assert_eq!(messages[MAX_LOG_LINES - 1].text, (MAX_LOG_LINES + 4).to_string());
    }

    #[test]
    fn verbosity_and_category_filters() {
        let mut log = OutputLog::detached();
        log.receive(line(LogVerbosity::Info, "info"));
        log.receive(line(LogVerbosity::Warning, "warning"));
        log.receive(LogMessage::new(LogVerbosity::Error, "wgpu_core", "gpu"));

        log.set_shown(LogVerbosity::Info, false);
        let texts: Vec<_> = log.filtered_messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, ["warning", "gpu"]);

        log.set_category_filter("WGPU");
        let texts: Vec<_> = log.filtered_messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, ["gpu"]);
        assert_eq!(log.messages().len(), 3);
    }

    #[test]
    fn clear_empties_the_log() {
        let log = OutputLog::detached();
        log.receive(line(LogVerbosity::Debug, "x"));
        log.clear();
        assert!(log.messages().is_empty());
    }

    #[test]
    fn subscribed_log_receives_events_until_dropped() {
        let log = OutputLog::new();
        let marker = "output log subscription marker";
        log_event().invoke(&line(LogVerbosity::Info, marker));
        assert!(log.messages().iter().any(|m| m.text == marker));

        let lines = Arc::clone(&log.lines);
        drop(log);
        let after = "sent after the window closed";
        log_event().invoke(&line(LogVerbosity::Info, after));
        let lines = lines.lock().unwrap();
        assert!(!lines.iter().any(|m| m.text == after));
    }
}
