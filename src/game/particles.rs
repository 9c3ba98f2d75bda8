//! Short-lived particle bursts.
//!
//! Particles are simulated on the CPU with explicit Euler steps and uploaded as
//! instance data every frame. There is no pooling: dead particles are removed from the
//! vector at the end of each update.

use crate::math::vec::Vec3;
use crate::renderer::vertex::ParticleInstance;
use rand::Rng;
use std::f32::consts::TAU;

/// Initial speed of every particle.
pub const SPAWN_SPEED: f32 = 3.0;

/// Seconds a particle lives.
pub const LIFETIME: f32 = 2.0;

/// Downward acceleration in units per second squared.
pub const GRAVITY: f32 = -9.8;

/// Particles spawned per burst.
pub const BURST_SIZE: usize = 50;

/// Upper bound on live particles; matches the instance buffer capacity.
pub const MAX_PARTICLES: usize = 1000;

/// A single particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// World position.
    pub position: Vec3,
    /// Velocity in units per second.
    pub velocity: Vec3,
    /// Seconds of life remaining.
    pub life: f32,
    /// Cleared once `life` reaches zero.
    pub alive: bool,
}

/// All live particles.
#[derive(Debug, Default, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    /// Creates an empty system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns up to `count` particles at `origin` with velocities uniformly distributed
    /// on a sphere of radius [`SPAWN_SPEED`].
    ///
    /// Spawning stops once [`MAX_PARTICLES`] are alive.
    ///
    /// # Returns
    /// The number actually spawned.
    pub fn spawn<R: Rng + ?Sized>(&mut self, origin: Vec3, count: usize, rng: &mut R) -> usize {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        let count = count.min(room);

        self.particles.extend((0..count).map(|_| Particle {
            position: origin,
            velocity: random_on_sphere(rng) * SPAWN_SPEED,
            life: LIFETIME,
            alive: true,
        }));

        log::debug!("Spawned {count} particles, {} alive", self.particles.len());
        count
    }

    /// Advances every particle by `dt` seconds and drops the expired ones.
    ///
    /// Velocity is updated before position, so a particle falls on its first step.
    pub fn update(&mut self, dt: f32) {
        let gravity = Vec3::new(0.0, GRAVITY, 0.0);
        for p in self.particles.iter_mut().filter(|p| p.alive) {
            p.velocity += gravity * dt;
            p.position += p.velocity * dt;
            p.life -= dt;
            if p.life <= 0.0 {
                p.alive = false;
            }
        }
        self.particles.retain(|p| p.alive);
    }

    /// Live particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no particles are alive.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Instance data for the renderer, with life normalised to `[0, 1]`.
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.particles
            .iter()
            .map(|p| ParticleInstance {
                position: p.position.0,
                life: (p.life / LIFETIME).clamp(0.0, 1.0),
            })
            .collect()
    }
}

/// Uniformly distributed unit vector.
fn random_on_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let theta: f32 = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_spawn_speed_is_constant() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut system = ParticleSystem::new();
        assert_eq!(system.spawn(Vec3::ZERO, BURST_SIZE, &mut rng), BURST_SIZE);
        for p in system.particles() {
            assert_relative_eq!(p.velocity.length(), SPAWN_SPEED, epsilon = 1e-4);
            assert_eq!(p.position, Vec3::ZERO);
            assert_eq!(p.life, LIFETIME);
        }
    }

    /// Particles disappear once their lifetime runs out.
    #[test]
    fn test_expired_particles_are_removed() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut system = ParticleSystem::new();
        system.spawn(Vec3::ZERO, 10, &mut rng);

        system.update(1.5);
        assert_eq!(system.len(), 10);
        system.update(0.5);
        assert!(system.is_empty());
    }

    /// Gravity acts on velocity before position.
    #[test]
    fn test_gravity_integration() {
        let mut system = ParticleSystem::new();
        system.particles.push(Particle {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            life: LIFETIME,
            alive: true,
        });
        system.update(0.1);
        let p = system.particles()[0];
        assert_relative_eq!(p.velocity.y(), -0.98, epsilon = 1e-6);
        assert_relative_eq!(p.position.y(), -0.098, epsilon = 1e-6);
        assert_relative_eq!(p.life, 1.9, epsilon = 1e-6);
    }

    #[test]
    fn test_spawn_respects_capacity() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut system = ParticleSystem::new();
        for _ in 0..(MAX_PARTICLES / BURST_SIZE) {
            system.spawn(Vec3::ZERO, BURST_SIZE, &mut rng);
        }
        assert_eq!(system.spawn(Vec3::ZERO, BURST_SIZE, &mut rng), 0);
        assert_eq!(system.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_instances_fade_with_life() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut system = ParticleSystem::new();
        system.spawn(Vec3::new(1.0, 2.0, 3.0), 1, &mut rng);
        assert_eq!(system.instances()[0].life, 1.0);
        system.update(1.0);
        assert_relative_eq!(system.instances()[0].life, 0.5, epsilon = 1e-6);
    }
}
