use bevy::math::Vec3;
use rand::Rng;

use crate::boundary::BoxExtent;
use crate::config::Locomotion;
use crate::constants::*;
use crate::distance::DistanceCache;
use crate::error::ConfigError;
use crate::frame::Frame;
use crate::history::PositionHistory;
use crate::kernel::{self, KernelOutput, KernelParams};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Flocker,
    Predator,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlockerBehavior {
    pub separation: KernelParams,
    pub alignment: KernelParams,
    pub cohesion: KernelParams,
    pub fear: KernelParams,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredatorBehavior {
    pub hunger: KernelParams,
}

/// Which kernels an agent runs, and with what parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Behavior {
    Flocker(FlockerBehavior),
    Predator(PredatorBehavior),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlockerForces {
    pub separation: KernelOutput,
    pub alignment: KernelOutput,
    pub cohesion: KernelOutput,
    pub fear: KernelOutput,
}

impl FlockerForces {
    pub fn total(&self) -> Vec3 {
        self.separation.force + self.alignment.force + self.cohesion.force + self.fear.force
    }

    /// Separation, alignment and cohesion magnitudes as RGB, or the alert
    /// color while a predator is in range.
    pub fn color(&self, base: [f32; 3]) -> [f32; 3] {
        if self.fear.active {
            return FEAR_COLOR;
        }
        let mix = Vec3::new(
            self.separation.force.length(),
            self.alignment.force.length(),
            self.cohesion.force.length(),
        );
        match mix.try_normalize() {
            Some(rgb) => rgb.to_array(),
            None => base,
        }
    }
}

/// The named force vectors from the last update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Forces {
    Flocker(FlockerForces),
    Predator { hunger: KernelOutput },
}

/// Read-only result of evaluating an agent's kernels against the step's
/// snapshot. Applied later by [`Agent::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Steering {
    pub forces: Forces,
    pub acceleration: Vec3,
    pub color: [f32; 3],
}

#[derive(Clone, Debug)]
pub struct Agent {
    /// Slot in the owning collection; also the distance cache index.
    pub index: usize,
    pub behavior: Behavior,
    pub forces: Forces,

    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,

    pub next_position: Vec3,
    pub next_velocity: Vec3,

    pub frame: Frame,
    pub history: PositionHistory,

    pub base_color: [f32; 3],
    pub draw_color: [f32; 3],

    pub noise: f32,
    pub max_speed: f32,
}

impl Agent {
    pub fn new(
        index: usize,
        behavior: Behavior,
        position: Vec3,
        velocity: Vec3,
        locomotion: Locomotion,
        base_color: [f32; 3],
    ) -> Result<Self, ConfigError> {
        locomotion.validate()?;
        let mut history = PositionHistory::new(locomotion.history)?;
        history.push(position);

        let forces = match behavior {
            Behavior::Flocker(_) => Forces::Flocker(FlockerForces::default()),
            Behavior::Predator(_) => Forces::Predator {
                hunger: KernelOutput::INACTIVE,
            },
        };

        Ok(Self {
            index,
            behavior,
            forces,
            position,
            velocity,
            acceleration: Vec3::ZERO,
            next_position: position,
            next_velocity: velocity,
            frame: Frame::from_velocity(velocity, UP).unwrap_or_default(),
            history,
            base_color,
            draw_color: base_color,
            noise: locomotion.noise,
            max_speed: locomotion.max_speed,
        })
    }

    pub fn flocker(
        index: usize,
        position: Vec3,
        velocity: Vec3,
        behavior: FlockerBehavior,
        locomotion: Locomotion,
    ) -> Result<Self, ConfigError> {
        Self::new(
            index,
            Behavior::Flocker(behavior),
            position,
            velocity,
            locomotion,
            BASE_COLOR,
        )
    }

    pub fn predator(
        index: usize,
        position: Vec3,
        velocity: Vec3,
        behavior: PredatorBehavior,
        locomotion: Locomotion,
    ) -> Result<Self, ConfigError> {
        Self::new(
            index,
            Behavior::Predator(behavior),
            position,
            velocity,
            locomotion,
            BASE_COLOR,
        )
    }

    pub fn kind(&self) -> AgentKind {
        match self.behavior {
            Behavior::Flocker(_) => AgentKind::Flocker,
            Behavior::Predator(_) => AgentKind::Predator,
        }
    }

    /// Runs this agent's kernels. `self` must be `flockers[self.index]` or
    /// `predators[self.index]` according to its kind.
    pub fn steer(&self, flockers: &[Agent], predators: &[Agent], cache: &DistanceCache) -> Steering {
        let i = self.index;
        match &self.behavior {
            Behavior::Flocker(b) => {
                let forces = FlockerForces {
                    separation: kernel::separation(i, flockers, cache, &b.separation),
                    alignment: kernel::alignment(i, flockers, cache, &b.alignment),
                    cohesion: kernel::cohesion(i, flockers, cache, &b.cohesion),
                    fear: kernel::fear(i, flockers, predators, cache, &b.fear),
                };
                Steering {
                    acceleration: forces.total(),
                    color: forces.color(self.base_color),
                    forces: Forces::Flocker(forces),
                }
            }
            Behavior::Predator(b) => {
                let hunger = kernel::hunger(i, predators, flockers, cache, &b.hunger);
                Steering {
                    acceleration: hunger.force,
                    color: if hunger.active { HUNTING_COLOR } else { PROWLING_COLOR },
                    forces: Forces::Predator { hunger },
                }
            }
        }
    }

    /// Integrates one step into the tentative state. Current position and
    /// velocity are left alone until [`Agent::finalize`].
    pub fn update<R: Rng + ?Sized>(&mut self, steering: Steering, rng: &mut R) {
        self.forces = steering.forces;
        self.draw_color = steering.color;
        self.acceleration = steering.acceleration;

        if self.noise > 0.0 {
            let limit = self.noise;
            self.acceleration += Vec3::new(
                rng.gen_range(-limit..=limit),
                rng.gen_range(-limit..=limit),
                rng.gen_range(-limit..=limit),
            );
        }

        self.next_velocity = clamp_speed(self.velocity + self.acceleration, self.max_speed);
        self.next_position = self.position + self.next_velocity;
    }

    /// Wraps and commits the tentative state. Call only once every agent has
    /// been updated for the step.
    pub fn finalize(&mut self, extent: &BoxExtent) {
        self.velocity = self.next_velocity;
        self.position = extent.wrap(self.next_position);

        // A zero or vertical heading has no right axis; keep the last frame.
        if let Some(frame) = Frame::from_velocity(self.velocity, UP) {
            self.frame = frame;
        }

        self.history.push(self.position);
    }
}

/// Rescales `velocity` down to `max_speed` if it is faster, keeping direction.
pub fn clamp_speed(velocity: Vec3, max_speed: f32) -> Vec3 {
    let speed = velocity.length();
    if speed > max_speed {
        velocity * (max_speed / speed)
    } else {
        velocity
    }
}
