use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/*
Requirements for Memory Compatibility with WGPU:
   1. Standard layout (like C structs).
   2. Alignment that matches WGSL expectations.
   3. Sized correctly for GPU buffers.
   4. Can be safely cast to [f32; N] or bytes.
*/

/// A 3-component `f32` vector, laid out as `[x, y, z]`.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec3(pub [f32; 3]);

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Vec3 = Vec3([0.0, 0.0, 0.0]);
    /// World up, `+Y`.
    pub const UP: Vec3 = Vec3([0.0, 1.0, 0.0]);

    /// Creates a vector from its components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3([x, y, z])
    }

    /// Vector with all three components set to `v`.
    pub const fn splat(v: f32) -> Self {
        Vec3([v, v, v])
    }

    /// Dot product.
    pub fn dot(&self, other: &Self) -> f32 {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z()
    }

    /// Right-handed cross product `self × other`.
    pub fn cross(&self, other: &Self) -> Self {
        Vec3([
            self.y() * other.z() - self.z() * other.y(),
            self.z() * other.x() - self.x() * other.z(),
            self.x() * other.y() - self.y() * other.x(),
        ])
    }

    /// Euclidean length.
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Returns the unit vector in the same direction, or zero for a zero-length input.
    pub fn normalize(&self) -> Self {
        let length = self.length();
        if length == 0.0 {
            return Self::ZERO;
        }

        Self([self.x() / length, self.y() / length, self.z() / length])
    }

    /// Euclidean distance between two points.
    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    /// Same vector with the Y component replaced.
    pub fn with_y(&self, y: f32) -> Self {
        Vec3([self.x(), y, self.z()])
    }

    /// Extends to a homogeneous `[x, y, z, w]` array for uniform uploads.
    pub fn extend(&self, w: f32) -> [f32; 4] {
        [self.x(), self.y(), self.z(), w]
    }

    /// X component.
    pub fn x(&self) -> f32 {
        self.0[0]
    }

    /// Y component.
    pub fn y(&self) -> f32 {
        self.0[1]
    }

    /// Z component.
    pub fn z(&self) -> f32 {
        self.0[2]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(values: [f32; 3]) -> Self {
        Vec3(values)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(vec: Vec3) -> Self {
        vec.0
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self([
            self.x() + other.x(),
            self.y() + other.y(),
            self.z() + other.z(),
        ])
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self([
            self.x() - other.x(),
            self.y() - other.y(),
            self.z() - other.z(),
        ])
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self([self.x() * scalar, self.y() * scalar, self.z() * scalar])
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self([-self.x(), -self.y(), -self.z()])
    }
}
