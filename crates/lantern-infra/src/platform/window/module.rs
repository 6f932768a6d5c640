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

use super::winit::{WinitWindow, WinitWindowBuilder};
use lantern_core::config::{ConfigurableModule, WindowConfig};
use lantern_core::{Module, ModuleError};
use std::any::Any;
use winit::event_loop::ActiveEventLoop;

/// Owns the main window once the event loop has created it.
#[derive(Debug, Default)]
pub struct WindowModule {
    config: WindowConfig,
    window: Option<WinitWindow>,
    close_requested: bool,
}

impl WindowModule {
    /// A module that will create a window following `config`.
    pub fn new(config: WindowConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Creates the window if it does not exist yet and returns it.
    pub fn create_window(
        &mut self,
        event_loop: &ActiveEventLoop,
    ) -> Result<&WinitWindow, ModuleError> {
        if self.window.is_none() {
            let window = WinitWindowBuilder::from_config(&self.config)
                .build(event_loop)
                .map_err(|e| ModuleError::failed("window", e))?;
            self.window = Some(window);
        }
        self.window
            .as_ref()
            .ok_or(ModuleError::Missing("window"))
    }

    /// The window, once created.
    pub fn window(&self) -> Option<&WinitWindow> {
        self.window.as_ref()
    }

    /// The settings the window is created with.
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Asks the host loop to exit.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Returns `true` once a close was requested.
    pub fn should_close(&self) -> bool {
        self.close_requested
    }
}

impl ConfigurableModule for WindowModule {
    type Config = WindowConfig;

    fn apply_config(&mut self, config: &WindowConfig) {
        self.config = config.clone();
    }
}

impl Module for WindowModule {
    fn name(&self) -> &'static str {
        "window"
    }

    fn shutdown(&mut self) -> Result<(), ModuleError> {
        self.window = None;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
