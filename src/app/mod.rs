//! Application module.
//!
//! This module contains the windowed application: its state, event handling, and the
//! per-frame update loop that drives the simulation and the renderer.
//!
//! # Module Structure
//!
//! - [`app_state`]: Contains the [`AppState`] struct which holds all session state
//! - [`event_handler`]: Contains the [`App`] struct and event handling logic
//! - [`update`]: Contains the per-frame update and key actions
//!
//! # Event Flow
//!
//! 1. **Input Events**: Window and device events are captured by the event handler
//! 2. **State Updates**: Held keys and mouse motion feed the simulation step
//! 3. **Rendering**: The current state is rendered to the screen
//!
//! # Threading Model
//!
//! Everything runs on the event loop thread. All state is owned by [`AppState`] and
//! mutated only from event callbacks, so no locking is needed.

pub mod app_state;
pub mod event_handler;
pub mod update;

pub use app_state::{AppState, StartupError};
pub use event_handler::App;
