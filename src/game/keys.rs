//! Keyboard input handling.
//!
//! This module defines the [`GameKey`] enum for abstracting actions from physical keys,
//! and provides [`KeyState`] for tracking held keys. Movement keys are polled every frame
//! through [`KeyState::movement_input`]; the remaining keys are one-shot actions handled
//! on the press event.

use crate::game::player::MovementInput;
use std::collections::HashSet;
use winit::keyboard;

/// Every action that can be bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Move forward (W or Up Arrow).
    MoveForward,
    /// Move backward (S or Down Arrow).
    MoveBackward,
    /// Strafe left (A or Left Arrow).
    MoveLeft,
    /// Strafe right (D or Right Arrow).
    MoveRight,
    /// Move along the camera's up vector (E).
    MoveUp,
    /// Move against the camera's up vector (Q).
    MoveDown,
    /// Close the window (Escape).
    Quit,
    /// Toggle vertical sync (V).
    ToggleVsync,
    /// Toggle noclip (F3).
    ToggleNoclip,
    /// Spawn a particle burst at the camera (Space).
    SpawnParticles,
    /// Toggle borderless fullscreen (F11).
    ToggleFullscreen,
    /// Write the maze to a snapshot file (F5).
    SaveMaze,
}

impl GameKey {
    /// Whether the key is held for continuous movement rather than fired once.
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            GameKey::MoveForward
                | GameKey::MoveBackward
                | GameKey::MoveLeft
                | GameKey::MoveRight
                | GameKey::MoveUp
                | GameKey::MoveDown
        )
    }

    /// Whether holding the key keeps firing its action on keyboard auto-repeat.
    ///
    /// Toggles and the maze snapshot fire once per physical press.
    pub fn fires_on_repeat(self) -> bool {
        matches!(self, GameKey::SpawnParticles | GameKey::Quit)
    }
}

/// Tracks the set of currently pressed game keys.
///
/// Use [`KeyState::press_key`] and [`KeyState::release_key`] to update the state, and
/// [`KeyState::is_pressed`] to query.
#[derive(Debug, Default)]
pub struct KeyState {
    /// Set of currently pressed keys.
    pub pressed_keys: HashSet<GameKey>,
}

impl KeyState {
    /// Creates a new, empty [`KeyState`]
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
        }
    }

    /// Marks a key as pressed.
    ///
    /// Returns `true` if the key was not already held, which is how one-shot actions
    /// ignore keyboard auto-repeat.
    pub fn press_key(&mut self, key: GameKey) -> bool {
        self.pressed_keys.insert(key)
    }

    /// Records a press event and reports whether its one-shot action should run.
    ///
    /// # Returns
    /// * `true` for a fresh press of an action key, or a repeat of a key that
    ///   [`GameKey::fires_on_repeat`].
    /// * `false` for movement keys and for repeats of toggles.
    pub fn press_action(&mut self, key: GameKey) -> bool {
        let fresh = self.press_key(key);
        !key.is_movement() && (fresh || key.fires_on_repeat())
    }

    /// Marks a key as released.
    pub fn release_key(&mut self, key: GameKey) {
        self.pressed_keys.remove(&key);
    }

    /// Checks if a key is currently pressed.
    pub fn is_pressed(&self, key: GameKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Forgets every held key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.pressed_keys.clear();
    }

    /// Snapshot of the held movement keys.
    pub fn movement_input(&self) -> MovementInput {
        MovementInput {
            forward: self.is_pressed(GameKey::MoveForward),
            backward: self.is_pressed(GameKey::MoveBackward),
            left: self.is_pressed(GameKey::MoveLeft),
            right: self.is_pressed(GameKey::MoveRight),
            up: self.is_pressed(GameKey::MoveUp),
            down: self.is_pressed(GameKey::MoveDown),
        }
    }
}

macro_rules! match_char_key {
    ($c:expr, {
        $($key:literal => $variant:expr),* $(,)?
    }) => {{
        match $c.to_ascii_lowercase().as_str() {
            $($key => Some($variant),)*
            _ => None,
        }
    }};
}

macro_rules! match_named_key {
    ($k:expr, {
        $($key:ident => $variant:expr),* $(,)?
    }) => {{
        match $k {
            $(winit::keyboard::NamedKey::$key => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a winit [`keyboard::Key`] to a [`GameKey`] if it matches a mapped action.
///
/// # Arguments
/// * `key` - The logical key from a winit keyboard event.
///
/// # Returns
/// * `Some(GameKey)` if the key maps to an action.
/// * `None` otherwise.
pub fn winit_key_to_game_key(key: &keyboard::Key) -> Option<GameKey> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            ArrowUp => GameKey::MoveForward,
            ArrowDown => GameKey::MoveBackward,
            ArrowLeft => GameKey::MoveLeft,
            ArrowRight => GameKey::MoveRight,
            Escape => GameKey::Quit,
            Space => GameKey::SpawnParticles,
            F3 => GameKey::ToggleNoclip,
            F5 => GameKey::SaveMaze,
            F11 => GameKey::ToggleFullscreen,
        }),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "w" => GameKey::MoveForward,
            "s" => GameKey::MoveBackward,
            "a" => GameKey::MoveLeft,
            "d" => GameKey::MoveRight,
            "e" => GameKey::MoveUp,
            "q" => GameKey::MoveDown,
            "v" => GameKey::ToggleVsync,
        }),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{Key, NamedKey};

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            winit_key_to_game_key(&Key::Character("W".into())),
            Some(GameKey::MoveForward)
        );
        assert_eq!(
            winit_key_to_game_key(&Key::Character("q".into())),
            Some(GameKey::MoveDown)
        );
        assert_eq!(
            winit_key_to_game_key(&Key::Named(NamedKey::F3)),
            Some(GameKey::ToggleNoclip)
        );
        assert_eq!(
            winit_key_to_game_key(&Key::Named(NamedKey::Escape)),
            Some(GameKey::Quit)
        );
        assert_eq!(winit_key_to_game_key(&Key::Character("z".into())), None);
    }

    /// A second press without a release reports a repeat.
    #[test]
    fn test_press_reports_repeats() {
        let mut keys = KeyState::new();
        assert!(keys.press_key(GameKey::ToggleVsync));
        assert!(!keys.press_key(GameKey::ToggleVsync));
        keys.release_key(GameKey::ToggleVsync);
        assert!(keys.press_key(GameKey::ToggleVsync));
    }

    /// Holding Space keeps spawning; holding a toggle flips it once.
    #[test]
    fn test_press_action_repeat_rules() {
        let mut keys = KeyState::new();
        assert!(keys.press_action(GameKey::SpawnParticles));
        assert!(keys.press_action(GameKey::SpawnParticles));
        assert!(keys.press_action(GameKey::SpawnParticles));

        for toggle in [
            GameKey::ToggleNoclip,
            GameKey::ToggleVsync,
            GameKey::ToggleFullscreen,
            GameKey::SaveMaze,
        ] {
            assert!(keys.press_action(toggle), "{toggle:?} first press");
            assert!(!keys.press_action(toggle), "{toggle:?} repeat");
            keys.release_key(toggle);
            assert!(keys.press_action(toggle), "{toggle:?} after release");
        }

        assert!(!keys.press_action(GameKey::MoveForward));
        assert!(keys.is_pressed(GameKey::MoveForward));
    }

    #[test]
    fn test_movement_input_snapshot() {
        let mut keys = KeyState::new();
        keys.press_key(GameKey::MoveForward);
        keys.press_key(GameKey::MoveUp);
        keys.press_key(GameKey::SaveMaze);
        let input = keys.movement_input();
        assert!(input.forward && input.up);
        assert!(!input.backward && !input.left && !input.right && !input.down);
        assert!(GameKey::MoveUp.is_movement());
        assert!(!GameKey::SaveMaze.is_movement());

        keys.clear();
        assert!(!keys.movement_input().any());
    }
}
