use bevy::math::Vec3;

pub const MAX_FLOCKER_SPEED: f32 = 0.04;
pub const MAX_PREDATOR_SPEED: f32 = 0.04;
pub const HISTORY_LENGTH: usize = 30;

pub const FLOCKER_COUNT: usize = 50; // 400 is about the comfortable max for O(n^2)
pub const PREDATOR_COUNT: usize = 1;

pub const BOX_WIDTH: f32 = 9.0;
pub const BOX_HEIGHT: f32 = 5.0;
pub const BOX_DEPTH: f32 = 7.0;

pub const FLOCKER_RANDOMNESS: f32 = 0.002;
pub const INITIAL_SPEED_RANGE: f32 = 0.01;

// Handed to the rigid-body collaborator, which integrates in seconds
pub const PHYSICS_VELOCITY_SCALE: f32 = 35.0;

pub const DEFAULT_SEED: u64 = 42;

/// Reference "up" used to build each agent's local frame.
pub const UP: Vec3 = Vec3::Y;

pub const BASE_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const FEAR_COLOR: [f32; 3] = [1.0, 0.063, 0.941];
pub const HUNTING_COLOR: [f32; 3] = [1.0, 0.0, 0.0];
pub const PROWLING_COLOR: [f32; 3] = [1.0, 0.941, 0.122];
