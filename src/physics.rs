//! Boundary with the rigid-body mode.
//!
//! When the viewer switches to physics, the simulation hands every creature's
//! position and (scaled) velocity to a [`PhysicsBackend`]. While physics runs,
//! the backend's positions are written back into the agents each step; the
//! flocking state (velocity, frame, history) is left untouched so flocking can
//! resume where it stopped.

use bevy::math::Vec3;

use crate::boundary::BoxExtent;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub velocity: Vec3,
}

pub trait PhysicsBackend {
    /// Replaces every body. Order matches [`crate::Simulation::export_bodies`].
    fn load(&mut self, bodies: &[BodyState]);

    /// Advances by `dt` seconds.
    fn step(&mut self, dt: f32);

    fn positions(&self) -> Vec<Vec3>;
}

pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Point masses under gravity that bounce off the inside of the box.
///
/// Stands in for a full rigid-body engine: no body-body contacts, no spin.
#[derive(Clone, Debug)]
pub struct BallisticWorld {
    extent: BoxExtent,
    gravity: Vec3,
    restitution: f32,
    bodies: Vec<BodyState>,
}

impl BallisticWorld {
    pub fn new(extent: BoxExtent) -> Self {
        Self {
            extent,
            gravity: GRAVITY,
            restitution: 0.5,
            bodies: Vec::new(),
        }
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn bodies(&self) -> &[BodyState] {
        &self.bodies
    }
}

impl PhysicsBackend for BallisticWorld {
    fn load(&mut self, bodies: &[BodyState]) {
        self.bodies = bodies.to_vec();
    }

    fn step(&mut self, dt: f32) {
        let size = self.extent.size();
        for body in &mut self.bodies {
            body.velocity += self.gravity * dt;
            body.position += body.velocity * dt;

            for axis in 0..3 {
                if body.position[axis] < 0.0 {
                    body.position[axis] = 0.0;
                    body.velocity[axis] = -body.velocity[axis] * self.restitution;
                } else if body.position[axis] > size[axis] {
                    body.position[axis] = size[axis];
                    body.velocity[axis] = -body.velocity[axis] * self.restitution;
                }
            }
        }
    }

    fn positions(&self) -> Vec<Vec3> {
        self.bodies.iter().map(|b| b.position).collect()
    }
}
