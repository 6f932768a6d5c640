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

//! The editor windows.

mod content_browser;
mod menu_bar;
mod output_log;
mod tool_panel;

pub use content_browser::{ActionOutcome, ContentBrowser, FileAction};
pub use menu_bar::{MainMenuBar, MenuCommand};
pub use output_log::{OutputLog, MAX_LOG_LINES};
pub use tool_panel::{EditorToolPanel, SaveWorldPopup};
