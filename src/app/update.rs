//! Per-frame update and one-shot key actions for [`App`].

use crate::game::keys::GameKey;
use std::time::Instant;
use winit::event_loop::ActiveEventLoop;
use winit::window::Fullscreen;

use super::event_handler::App;

/// Window title showing the frame rate.
pub fn fps_title(appname: &str, fps: u32) -> String {
    format!("{appname} | FPS: {fps}")
}

impl App {
    /// Steps the simulation and renders one frame.
    ///
    /// # Frame Steps
    /// 1. **Timing**: frame delta, and the FPS title once per second
    /// 2. **Simulation**: sun, particles, movement with collision, animated models
    /// 3. **Rendering**: draw order, uniforms, then the scene pass
    ///
    /// # Error Handling
    /// - Lost or outdated surfaces are reconfigured and the frame is skipped
    /// - Running out of GPU memory stops the event loop
    /// - Other surface errors are logged and the frame is skipped
    pub fn handle_redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(state)) = (self.window.as_ref(), self.state.as_mut()) else {
            return;
        };
        if window.is_minimized().unwrap_or(false) {
            return;
        }

        let now = Instant::now();
        let (delta_time, fps) = state.game.timer.tick(now);
        if let Some(fps) = fps {
            window.set_title(&fps_title(&state.settings.appname, fps));
        }
        let time = state.game.timer.elapsed(now);

        let input = state.key_state.movement_input();
        state.game.step(&input, delta_time, time);

        let order = state.game.draw_order();
        let frame = state.game.frame_uniforms(state.renderer.aspect_ratio());
        let particles = state.game.particles.instances();

        match state
            .renderer
            .render_frame(&state.game.scene, &order, &frame, &particles)
        {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = window.inner_size();
                state.resize_surface(size.width, size.height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Skipping frame: {e}"),
        }
    }

    /// Runs the action bound to a freshly pressed key.
    pub fn handle_action(&mut self, event_loop: &ActiveEventLoop, key: GameKey) {
        let (Some(window), Some(state)) = (self.window.as_ref(), self.state.as_mut()) else {
            return;
        };

        match key {
            GameKey::Quit => {
                log::info!("Escape pressed, exiting");
                event_loop.exit();
            }
            GameKey::ToggleVsync => {
                let enabled = !state.renderer.vsync();
                state.renderer.set_vsync(enabled);
            }
            GameKey::ToggleNoclip => {
                state.game.toggle_noclip();
            }
            GameKey::SpawnParticles => {
                state.game.spawn_particles(&mut rand::thread_rng());
            }
            GameKey::ToggleFullscreen => {
                let fullscreen = match window.fullscreen() {
                    Some(_) => None,
                    None => Some(Fullscreen::Borderless(None)),
                };
                log::info!("Fullscreen {}", if fullscreen.is_some() { "on" } else { "off" });
                window.set_fullscreen(fullscreen);
            }
            GameKey::SaveMaze => {
                if let Err(e) = state.game.save_maze(&state.settings.maze_save_dir()) {
                    log::error!("Failed to save maze: {e}");
                }
            }
            GameKey::MoveForward
            | GameKey::MoveBackward
            | GameKey::MoveLeft
            | GameKey::MoveRight
            | GameKey::MoveUp
            | GameKey::MoveDown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_title() {
        assert_eq!(fps_title("Terramaze", 144), "Terramaze | FPS: 144");
        assert_eq!(fps_title("default", 0), "default | FPS: 0");
    }
}
