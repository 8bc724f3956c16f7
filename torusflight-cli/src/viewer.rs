use std::sync::Arc;

use anyhow::Context;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use torusflight_shared::frame;
use torusflight_shared::{FlightState, KeyAction, KeyEvent, SceneConfig, SceneDescription};
use torusflight_wgpu::Renderer;

use crate::keys::dom_key;

/// Native host for the flight loop. Owns the window, renderer and state;
/// each `RedrawRequested` runs one frame and requests the next.
pub struct Viewer {
    initial_size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    state: FlightState,
    scene: SceneDescription,
    error: Option<anyhow::Error>,
}

impl Viewer {
    pub fn new(config: &SceneConfig, initial_size: PhysicalSize<u32>) -> Self {
        Self {
            initial_size,
            window: None,
            renderer: None,
            state: FlightState::new(config),
            scene: SceneDescription::build(config),
            error: None,
        }
    }

    /// The error that ended the event loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("torusflight")
            .with_inner_size(self.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );

        let size = window.inner_size();
        let mut renderer = pollster::block_on(Renderer::new(
            Arc::clone(&window),
            size.width,
            size.height,
        ))
        .context("Failed to initialize renderer")?;
        renderer.upload_scene(&self.scene);

        log::info!(
            "Scene ready: {} stars, {}x{}",
            self.scene.stars.len(),
            size.width,
            size.height
        );

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size.width, new_size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let Some(key) = dom_key(&event.logical_key) else {
                    return;
                };
                let action = match event.state {
                    ElementState::Pressed => KeyAction::Down,
                    ElementState::Released => KeyAction::Up,
                };
                let response = self.state.handle_key_event(&KeyEvent { key, action });
                if response.view_toggled {
                    log::info!("View: {}", self.state.view_mode.label());
                }
            }

            WindowEvent::RedrawRequested => {
                let Some(renderer) = &mut self.renderer else {
                    return;
                };
                if let Err(e) = frame::run_frame(&mut self.state, &self.scene, renderer) {
                    self.fail(event_loop, e.into());
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}
