//! Scene lights: a rotating sun, three fixed point lights and a flashlight.
//!
//! The sun sweeps around the sky over time and its intensity follows its elevation, so
//! the terrain darkens as it sets. The spot light is re-attached to the camera each frame.

use crate::math::vec::Vec3;
use crate::math::{deg_to_rad, mix};
use std::f32::consts::TAU;

/// Radians per second the sun advances.
pub const SUN_ANGULAR_SPEED: f32 = 0.1;

/// Specular exponent used for every surface.
pub const SHININESS: f32 = 32.0;

/// Light with a direction but no position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Unit direction from the surface towards the light.
    pub direction: Vec3,
    /// Ambient colour.
    pub ambient: Vec3,
    /// Diffuse colour.
    pub diffuse: Vec3,
    /// Specular colour.
    pub specular: Vec3,
}

/// Omnidirectional light with distance attenuation `1 / (c + l*d + q*d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World position.
    pub position: Vec3,
    /// Ambient colour.
    pub ambient: Vec3,
    /// Diffuse colour.
    pub diffuse: Vec3,
    /// Specular colour.
    pub specular: Vec3,
    /// Constant attenuation term.
    pub constant: f32,
    /// Linear attenuation term.
    pub linear: f32,
    /// Quadratic attenuation term.
    pub quadratic: f32,
}

/// Cone light with a soft edge between `cutoff` and `outer_cutoff` (both cosines).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    /// World position.
    pub position: Vec3,
    /// Unit direction of the cone axis.
    pub direction: Vec3,
    /// Ambient colour.
    pub ambient: Vec3,
    /// Diffuse colour.
    pub diffuse: Vec3,
    /// Specular colour.
    pub specular: Vec3,
    /// Constant attenuation term.
    pub constant: f32,
    /// Linear attenuation term.
    pub linear: f32,
    /// Quadratic attenuation term.
    pub quadratic: f32,
    /// Cosine of the inner cone angle.
    pub cutoff: f32,
    /// Cosine of the outer cone angle.
    pub outer_cutoff: f32,
}

/// Every light in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    /// The sun.
    pub sun: DirectionalLight,
    /// Current sun angle in radians, kept in `[0, 2π]`.
    pub sun_angle: f32,
    /// Red, green and blue lamps near the maze.
    pub point_lights: [PointLight; 3],
    /// Camera flashlight.
    pub spot: SpotLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self::new()
    }
}

impl Lighting {
    /// Initial light setup. The sun is not positioned until the first
    /// [`Lighting::update_sun`].
    pub fn new() -> Self {
        let lamp = |position: Vec3, diffuse: Vec3| PointLight {
            position,
            ambient: Vec3::splat(0.05),
            diffuse,
            specular: Vec3::ZERO,
            constant: 1.0,
            linear: 0.045,
            quadratic: 0.0075,
        };

        Self {
            sun: DirectionalLight {
                direction: Vec3::new(0.0, 1.0, 0.0),
                ambient: Vec3::splat(0.2),
                diffuse: Vec3::splat(0.7),
                specular: Vec3::splat(1.0),
            },
            sun_angle: 0.0,
            point_lights: [
                lamp(Vec3::new(4.0, -60.0, 2.0), Vec3::new(1.0, 0.1, 0.1)),
                lamp(Vec3::new(-4.0, -60.0, 5.0), Vec3::new(0.1, 1.0, 0.1)),
                lamp(Vec3::new(0.0, -60.0, -5.0), Vec3::new(0.1, 0.1, 1.0)),
            ],
            spot: SpotLight {
                position: Vec3::ZERO,
                direction: Vec3::new(0.0, 0.0, -1.0),
                ambient: Vec3::splat(0.2),
                diffuse: Vec3::splat(1.5),
                specular: Vec3::splat(0.5),
                constant: 1.0,
                linear: 0.09,
                quadratic: 0.032,
                cutoff: deg_to_rad(15.0).cos(),
                outer_cutoff: deg_to_rad(25.0).cos(),
            },
        }
    }

    /// Advances the sun by `dt` seconds.
    ///
    /// The direction is `normalize(cos a, 0.7 sin a + 0.7, sin(a / 2))`. With
    /// `h = clamp(dir.y, 0, 1)` the ambient term is `mix(0.05, 0.2, h) * 2` and the
    /// diffuse term `0.8 * h * 4`.
    pub fn update_sun(&mut self, dt: f32) {
        self.sun_angle += dt * SUN_ANGULAR_SPEED;
        if self.sun_angle > TAU {
            self.sun_angle -= TAU;
        }

        let a = self.sun_angle;
        self.sun.direction = Vec3::new(a.cos(), a.sin() * 0.7 + 0.7, (a * 0.5).sin()).normalize();

        let h = self.sun.direction.y().clamp(0.0, 1.0);
        self.sun.ambient = Vec3::splat(mix(0.05, 0.2, h) * 2.0);
        self.sun.diffuse = Vec3::splat(0.8 * mix(0.0, 1.0, h) * 4.0);
    }

    /// Attaches the flashlight to the camera.
    pub fn follow_camera(&mut self, position: Vec3, front: Vec3) {
        self.spot.position = position;
        self.spot.direction = front.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// At angle 0 the direction is (1, 0.7, 0) normalised.
    #[test]
    fn test_sun_at_start() {
        let mut lights = Lighting::new();
        lights.update_sun(0.0);
        let len = (1.0f32 + 0.49).sqrt();
        assert_relative_eq!(lights.sun.direction.x(), 1.0 / len, epsilon = 1e-6);
        assert_relative_eq!(lights.sun.direction.y(), 0.7 / len, epsilon = 1e-6);

        let h = 0.7 / len;
        assert_relative_eq!(lights.sun.ambient.x(), (0.05 + 0.15 * h) * 2.0, epsilon = 1e-6);
        assert_relative_eq!(lights.sun.diffuse.x(), 3.2 * h, epsilon = 1e-5);
    }

    #[test]
    fn test_sun_angle_wraps() {
        let mut lights = Lighting::new();
        lights.sun_angle = TAU - 0.01;
        lights.update_sun(1.0);
        assert_relative_eq!(lights.sun_angle, 0.09, epsilon = 1e-5);
    }

    /// At its lowest point the sun sits on the horizon and contributes almost nothing.
    #[test]
    fn test_sun_on_horizon_is_dark() {
        let mut lights = Lighting::new();
        lights.sun_angle = 1.5 * std::f32::consts::PI;
        lights.update_sun(0.0);
        assert_relative_eq!(lights.sun.diffuse.x(), 0.0, epsilon = 1e-5);
        assert_relative_eq!(lights.sun.ambient.x(), 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_spot_follows_camera() {
        let mut lights = Lighting::new();
        lights.follow_camera(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(lights.spot.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(lights.spot.direction, Vec3::new(0.0, 0.0, -1.0));
        assert!(lights.spot.cutoff > lights.spot.outer_cutoff);
    }
}
