//! First-person fly camera.
//!
//! This module defines the [`Player`] struct, which tracks the camera position and
//! orientation and turns held movement keys into a per-frame displacement.
//!
//! # Overview
//!
//! The player system handles:
//! - **Orientation**: yaw/pitch in degrees, turned into cached `front`, `right` and `up`
//!   basis vectors whenever they change
//! - **Movement**: W/S along the horizontal projection of `front`, A/D along `right`,
//!   E/Q along the camera's `up`; the summed direction is normalised so diagonals are not
//!   faster
//! - **View matrix**: a right-handed look-at from the position along `front`
//!
//! Collision is not handled here; see [`crate::game::collision`].
//!
//! # Coordinate System
//!
//! Right-handed, Y up. Yaw 0° looks along +X and yaw -90° (the default) along -Z.
//! Pitch is clamped to ±89° so the look-at never degenerates.
//!
//! # Usage Example
//!
//! ```ignore
//! let mut player = Player::new(Vec3::new(1.5, -59.0, 1.5));
//! player.mouse_movement(10.0, 5.0);
//! let step = player.movement_delta(&MovementInput { forward: true, ..Default::default() }, 0.016);
//! let view = player.view_matrix();
//! ```

use crate::math::deg_to_rad;
use crate::math::mat::Mat4;
use crate::math::vec::Vec3;

/// Movement keys held during a frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementInput {
    /// W
    pub forward: bool,
    /// S
    pub backward: bool,
    /// A
    pub left: bool,
    /// D
    pub right: bool,
    /// E
    pub up: bool,
    /// Q
    pub down: bool,
}

impl MovementInput {
    /// Whether any movement key is held.
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }
}

/// Camera position, orientation and movement parameters.
#[derive(Debug, Clone)]
pub struct Player {
    /// World-space eye position.
    pub position: Vec3,
    /// Horizontal look angle in degrees.
    pub yaw: f32,
    /// Vertical look angle in degrees, within ±89°.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Degrees of rotation per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Player {
    /// Creates a camera at `position` facing -Z.
    ///
    /// # Returns
    ///
    /// A new `Player` with:
    /// - Yaw: `-90°`
    /// - Pitch: `0°`
    /// - FOV: `60°`
    /// - Speed: `5.0` units/second
    /// - Mouse Sensitivity: `0.25`
    pub fn new(position: Vec3) -> Self {
        let mut player = Self {
            position,
            yaw: -90.0,
            pitch: 0.0,
            fov: 60.0,
            speed: 5.0,
            mouse_sensitivity: 0.25,
            front: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::UP,
        };
        player.update_vectors();
        player
    }

    /// Unit look direction.
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Unit vector to the camera's right, always horizontal.
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Camera-local up vector.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Computes the view matrix for the current position and orientation.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection for the given aspect ratio.
    ///
    /// # Arguments
    ///
    /// * `aspect_ratio` - Width divided by height of the viewport
    /// * `near` - Distance to the near clipping plane
    /// * `far` - Distance to the far clipping plane
    pub fn projection_matrix(&self, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective(deg_to_rad(self.fov), aspect_ratio, near, far)
    }

    /// Updates the orientation from raw mouse motion.
    ///
    /// # Arguments
    ///
    /// * `delta_x` - Mouse movement in X (positive = right)
    /// * `delta_y` - Mouse movement in Y (positive = down)
    ///
    /// # Behavior
    ///
    /// - **Yaw**: increases with `delta_x` (mouse right = look right)
    /// - **Pitch**: decreases with `delta_y` (mouse down = look down)
    /// - **Pitch Clamping**: clamped to [-89°, +89°]
    pub fn mouse_movement(&mut self, delta_x: f64, delta_y: f64) {
        self.yaw += delta_x as f32 * self.mouse_sensitivity;
        self.pitch -= delta_y as f32 * self.mouse_sensitivity;

        // Clamp pitch to prevent flipping
        self.pitch = self.pitch.clamp(-89.0, 89.0);
        self.update_vectors();
    }

    /// Displacement for one frame of held movement keys.
    ///
    /// Returns zero when nothing is held or opposing keys cancel out.
    pub fn movement_delta(&self, input: &MovementInput, delta_time: f32) -> Vec3 {
        let flat_front = Vec3::new(self.front.x(), 0.0, self.front.z()).normalize();
        let mut direction = Vec3::ZERO;

        if input.forward {
            direction += flat_front;
        }
        if input.backward {
            direction -= flat_front;
        }
        if input.left {
            direction -= self.right;
        }
        if input.right {
            direction += self.right;
        }
        if input.up {
            direction += self.up;
        }
        if input.down {
            direction -= self.up;
        }

        if direction.length() > 0.0 {
            direction.normalize() * self.speed * delta_time
        } else {
            Vec3::ZERO
        }
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (deg_to_rad(self.yaw), deg_to_rad(self.pitch));
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(&Vec3::UP).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }
}
