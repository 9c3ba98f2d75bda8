//! Math utilities and types for 3D graphics and game logic.
//!
//! This module provides matrix and vector types and operations, as well as
//! helper functions for angle conversions and interpolation. All types are designed
//! to be compatible with GPU memory layouts (e.g., for use with WGPU/WGSL).
//!
//! # Module Organization
//!
//! - [`vec`] module contains all vector operations
//! - [`mat`] module contains all matrix operations (column-major storage)
//! - [`coordinates`] maps between maze grid cells and world space
//! - Utility functions like angle conversions are provided at root level

pub mod coordinates;
pub mod mat;
pub mod vec;

/// Converts degrees to radians.
///
/// This handles angle wrapping by first normalizing the input to the range (-360, 360).
///
/// # Example
/// ```ignore
/// assert_eq!(deg_to_rad(180.0), std::f32::consts::PI);
/// assert_eq!(deg_to_rad(540.0), std::f32::consts::PI);
/// ```
pub fn deg_to_rad(degrees: f32) -> f32 {
    (degrees % 360.0) * (std::f32::consts::PI / 180.0)
}

/// Linear interpolation between two scalars, `a + (b - a) * t`.
///
/// Used for the exponential camera easing: calling it once per frame with a fixed
/// `t` moves the value a constant fraction of the remaining distance.
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Tests degree conversion including wrap-around.
    #[test]
    fn test_deg_to_rad() {
        assert_relative_eq!(deg_to_rad(180.0), std::f32::consts::PI);
        assert_relative_eq!(deg_to_rad(540.0), std::f32::consts::PI);
        assert_relative_eq!(deg_to_rad(0.0), 0.0);
    }

    /// Tests that mix hits both endpoints and the midpoint.
    #[test]
    fn test_mix() {
        assert_relative_eq!(mix(2.0, 4.0, 0.0), 2.0);
        assert_relative_eq!(mix(2.0, 4.0, 1.0), 4.0);
        assert_relative_eq!(mix(2.0, 4.0, 0.5), 3.0);
        assert_relative_eq!(mix(-59.0, -67.0, 0.1), -59.8, epsilon = 1e-5);
    }
}
