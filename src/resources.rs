use bevy::prelude::*;
use creature_box::{BallisticWorld, Simulation};

// ==================== Viewer Constants ====================
pub const FIXED_STEP_HZ: f64 = 60.0;

pub const DEFAULT_ORBIT_RADIUS: f32 = 22.5;
pub const DEFAULT_ORBIT_LATITUDE_DEGS: f32 = 0.0;
pub const DEFAULT_ORBIT_LONGITUDE_DEGS: f32 = 90.0;
pub const MIN_ORBIT_RADIUS: f32 = 7.0;
pub const MAX_ORBIT_RADIUS: f32 = 25.0;
pub const MAX_LATITUDE_DEGS: f32 = 89.0;
pub const MIN_LATITUDE_DEGS: f32 = -89.0;
pub const ORBIT_DELTA_RADIUS: f32 = 0.1;
pub const ORBIT_DELTA_DEGS: f32 = 1.0;

pub const AXIS_LENGTH: f32 = 0.15;

// ==================== Resources ====================
#[derive(Resource, Deref, DerefMut)]
pub struct Flock(pub Simulation);

#[derive(Resource, Default)]
pub struct RunState {
    pub paused: bool,
    /// `Some` while creatures are handed over to the rigid-body world.
    pub physics: Option<BallisticWorld>,
}

impl RunState {
    pub fn physics_active(&self) -> bool {
        self.physics.is_some()
    }
}

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawMode {
    #[default]
    Poly,
    Axes,
    History,
}

/// Spherical camera pose around the box center, in the viewer's key-driven
/// orbit style.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub radius: f32,
    pub latitude_degs: f32,
    pub longitude_degs: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: DEFAULT_ORBIT_RADIUS,
            latitude_degs: DEFAULT_ORBIT_LATITUDE_DEGS,
            longitude_degs: DEFAULT_ORBIT_LONGITUDE_DEGS,
        }
    }
}

impl OrbitCamera {
    pub fn rotate(&mut self, longitude_delta: f32, latitude_delta: f32) {
        self.longitude_degs += longitude_delta;
        let latitude = self.latitude_degs + latitude_delta;
        if (MIN_LATITUDE_DEGS..=MAX_LATITUDE_DEGS).contains(&latitude) {
            self.latitude_degs = latitude;
        }
    }

    pub fn zoom(&mut self, delta: f32) {
        let radius = self.radius + delta;
        if (MIN_ORBIT_RADIUS..=MAX_ORBIT_RADIUS).contains(&radius) {
            self.radius = radius;
        }
    }

    pub fn transform(&self, target: Vec3) -> Transform {
        let azimuth = self.longitude_degs.to_radians();
        let inclination = (90.0 - self.latitude_degs).to_radians();
        let offset = Vec3::new(
            self.radius * inclination.sin() * azimuth.cos(),
            self.radius * inclination.cos(),
            self.radius * inclination.sin() * azimuth.sin(),
        );
        Transform::from_translation(target + offset).looking_at(target, Vec3::Y)
    }
}

// ==================== Components ====================
/// Links a rendered entity to its agent slot.
#[derive(Component, Clone, Copy, Debug)]
pub enum Creature {
    Flocker(usize),
    Predator(usize),
}

#[derive(Component)]
pub struct HudText;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_limits_hold() {
        let mut camera = OrbitCamera::default();
        camera.zoom(10.0);
        assert_eq!(camera.radius, DEFAULT_ORBIT_RADIUS);
        camera.zoom(-0.5);
        assert!((camera.radius - 22.0).abs() < 1e-5);

        camera.latitude_degs = MAX_LATITUDE_DEGS;
        camera.rotate(0.0, ORBIT_DELTA_DEGS);
        assert_eq!(camera.latitude_degs, MAX_LATITUDE_DEGS);
    }

    #[test]
    fn default_pose_looks_at_target() {
        let target = Vec3::new(4.5, 2.5, 3.5);
        let transform = OrbitCamera::default().transform(target);
        let to_target = (target - transform.translation).normalize();
        assert!(transform.forward().dot(to_target) > 0.999);
        assert!((transform.translation.distance(target) - DEFAULT_ORBIT_RADIUS).abs() < 1e-3);
    }
}
