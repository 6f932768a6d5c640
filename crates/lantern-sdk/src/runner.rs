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

//! The winit host that runs a game.

use crate::engine::Engine;
use crate::game::{Application, GameContext};
use crate::render::RenderModule;
use anyhow::Result;
use lantern_core::logging::init_logger;
use lantern_core::platform::{EngineWindow, InputModule};
use lantern_core::renderer::RenderTarget;
use lantern_core::time::FrameClock;
use lantern_core::{EngineConfig, ModuleError};
use lantern_infra::{translate_winit_input, WgpuRenderer, WindowModule};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

struct GameHost<A: Application> {
    pending: Option<(A, EngineConfig)>,
    engine: Option<Engine<GameContext<A>>>,
    clock: FrameClock,
}

impl<A: Application> GameHost<A> {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ModuleError> {
        let Some((app, config)) = self.pending.take() else {
            return Ok(());
        };
        let renderer = Box::new(WgpuRenderer::new(config.render.clone()));
        let context = GameContext::new(app, config.window.clone());
        let mut engine = Engine::new(config, context);
        engine.startup(renderer)?;

        let modules = engine.modules_mut();
        modules.require_mut::<WindowModule>()?.create_window(event_loop)?;
        let (render, others) = modules
            .split_mut::<RenderModule>()
            .ok_or(ModuleError::Missing("render"))?;
        let window = others
            .get::<WindowModule>()
            .and_then(WindowModule::window)
            .ok_or(ModuleError::Missing("window"))?;
        render.attach(RenderTarget::Window(window))?;

        self.engine = Some(engine);
        self.clock = FrameClock::new();
        Ok(())
    }

    fn stop(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut engine) = self.engine.take() {
            engine.shutdown();
        }
        event_loop.exit();
    }

    fn window_matches(engine: &Engine<GameContext<A>>, id: WindowId) -> bool {
        engine
            .modules()
            .get::<WindowModule>()
            .and_then(WindowModule::window)
            .is_some_and(|window| window.winit_id() == id)
    }
}

impl<A: Application> ApplicationHandler for GameHost<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            return;
        }
        log::info!("Application resumed. Initializing window and engine systems...");
        if let Err(e) = self.start(event_loop) {
            log::error!("Engine startup failed: {e}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if !Self::window_matches(engine, id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Shutdown requested, exiting event loop...");
                self.stop(event_loop);
            }
            WindowEvent::Resized(size) => {
                if let Some(render) = engine.modules_mut().get_mut::<RenderModule>() {
                    log::debug!("Window resized to: {}x{}", size.width, size.height);
                    render.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                let dt = self.clock.tick();
                if let Err(e) = engine.tick(dt) {
                    log::error!("Frame failed: {e}");
                }
                let close = engine.exit_requested()
                    || engine
                        .modules()
                        .get::<WindowModule>()
                        .is_some_and(WindowModule::should_close);
                if close {
                    self.stop(event_loop);
                }
            }
            other => {
                if let Some(input_event) = translate_winit_input(&other) {
                    if let Some(input) = engine.modules_mut().get_mut::<InputModule>() {
                        input.push_event(input_event);
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self
            .engine
            .as_ref()
            .and_then(|engine| engine.modules().get::<WindowModule>())
            .and_then(WindowModule::window)
        {
            window.request_redraw();
        }
    }
}

/// Creates a window, starts the engine with the wgpu renderer and runs `app`
/// until the window closes.
pub fn run_game<A: Application>(app: A, config: EngineConfig) -> Result<()> {
    init_logger(&config.log_filter);
    log::info!("Lantern: starting '{}'", config.window.title);
    let event_loop = EventLoop::new()?;
    let mut host = GameHost {
        pending: Some((app, config)),
        engine: None,
        clock: FrameClock::new(),
    };
    event_loop.run_app(&mut host)?;
    Ok(())
}
