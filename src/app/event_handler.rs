//! Event handler module.
//!
//! Contains the [`App`] struct and its [`ApplicationHandler`] implementation.

use crate::app::app_state::{AppState, StartupError};
use crate::config::AppSettings;
use crate::game::keys::winit_key_to_game_key;
use crate::renderer::wgpu_lib::RendererError;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

/// Main application struct that manages the lifecycle and event handling.
///
/// This struct implements the [`ApplicationHandler`] trait to handle all window and device events.
/// It manages the WGPU instance, application state, and window lifecycle.
///
/// # Lifecycle
/// 1. Created with [`App::new`], which initializes the WGPU instance
/// 2. On `resumed` the window is created and [`App::set_window`] builds the [`AppState`]
/// 3. Events are handled via the [`ApplicationHandler`] trait methods
/// 4. The application runs until the window is closed or Escape is pressed
pub struct App {
    /// The WGPU instance for graphics operations.
    pub instance: wgpu::Instance,
    /// The current application state, None until initialized.
    pub state: Option<AppState>,
    /// The application window, None until set.
    pub window: Option<Arc<Window>>,
    /// Settings used to create the window and state.
    pub settings: AppSettings,
    startup_error: Option<StartupError>,
}

impl App {
    /// Creates a new [`App`] with default WGPU configuration.
    ///
    /// The application state and window stay `None` until the event loop resumes.
    pub fn new(settings: AppSettings) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        Self {
            instance,
            state: None,
            window: None,
            settings,
            startup_error: None,
        }
    }

    /// The error that aborted startup, if any. Taken once.
    pub fn take_startup_error(&mut self) -> Option<StartupError> {
        self.startup_error.take()
    }

    /// Creates the WGPU surface for `window` and initializes all application state.
    ///
    /// # Errors
    /// [`StartupError`] if the surface, renderer or required assets cannot be created.
    pub async fn set_window(&mut self, window: Window) -> Result<(), StartupError> {
        let window = Arc::new(window);

        let surface = self
            .instance
            .create_surface(window.clone())
            .map_err(RendererError::from)?;

        let state = AppState::new(&self.instance, surface, &window, self.settings.clone()).await?;

        self.window.get_or_insert(window);
        self.state.get_or_insert(state);
        Ok(())
    }

    /// Handles window resize events. Zero-sized windows are ignored.
    pub fn handle_resized(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            match &mut self.state {
                Some(state) => state.resize_surface(width, height),
                None => log::warn!("Cannot resize surface without state initialized"),
            }
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let Some(game_key) = winit_key_to_game_key(&event.logical_key) else {
            return;
        };
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event.state {
            ElementState::Pressed => {
                if state.key_state.press_action(game_key) {
                    self.handle_action(event_loop, game_key);
                }
            }
            ElementState::Released => state.key_state.release_key(game_key),
        }
    }
}

impl ApplicationHandler for App {
    /// Creates the window on first resume and builds the application state.
    ///
    /// A startup failure is logged, stored for [`App::take_startup_error`], and stops the
    /// event loop.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let resolution = self.settings.default_resolution;
        let attributes = Window::default_attributes()
            .with_title(self.settings.appname.clone())
            .with_inner_size(PhysicalSize::new(resolution.x, resolution.y));

        let result = match event_loop.create_window(attributes) {
            Ok(window) => pollster::block_on(self.set_window(window)),
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            log::error!("Startup failed: {e}");
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    /// Handles raw mouse motion for camera look.
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some(state) = self.state.as_mut() {
                state.game.player.mouse_movement(delta.0, delta.1);
            }
        }
    }

    /// Handles window events including input, resize, and close requests.
    ///
    /// # Event Types Handled
    /// - **CloseRequested**: Stops the event loop
    /// - **Resized**: Calls [`App::handle_resized`]
    /// - **KeyboardInput**: Updates held keys and fires one-shot actions
    /// - **Focused**: Releases every key when focus is lost
    /// - **RedrawRequested**: Steps the simulation and renders a frame
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.handle_resized(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::Focused(false) => {
                if let Some(state) = self.state.as_mut() {
                    state.key_state.clear();
                }
            }
            WindowEvent::Focused(true) => {
                if let (Some(state), Some(window)) = (self.state.as_ref(), self.window.as_ref()) {
                    state.capture_mouse(window);
                }
            }
            WindowEvent::RedrawRequested => self.handle_redraw(event_loop),
            _ => {}
        }
    }

    /// Frees GPU assets before the window and device are dropped.
    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_mut() {
            state.renderer.release_assets();
        }
    }

    /// Requests the next frame; the loop runs with [`winit::event_loop::ControlFlow::Poll`].
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
