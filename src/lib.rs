//! Creature Box: flockers and predators steering around a toroidal box.
//!
//! One call to [`Simulation::step`] refreshes the [`DistanceCache`], evaluates
//! every agent's force kernels against that snapshot, integrates tentative
//! state, and then commits it with wrapping. Rendering and the rigid-body mode
//! live outside this crate's core and talk to it through [`Simulation`]'s
//! accessors and the [`physics`] handoff.

pub mod agent;
pub mod boundary;
pub mod config;
pub mod constants;
pub mod distance;
pub mod error;
pub mod frame;
pub mod history;
pub mod kernel;
pub mod physics;
pub mod simulation;
pub mod snapshot;

pub use agent::{Agent, AgentKind, Behavior, FlockerBehavior, PredatorBehavior};
pub use boundary::BoxExtent;
pub use config::{FlockerConfig, KernelConfig, Locomotion, PredatorConfig, SimulationConfig};
pub use distance::DistanceCache;
pub use error::{ConfigError, HandoffError};
pub use frame::Frame;
pub use history::PositionHistory;
pub use kernel::{KernelOutput, KernelParams};
pub use physics::{BallisticWorld, BodyState, PhysicsBackend};
pub use simulation::Simulation;
pub use snapshot::{AgentRecord, Snapshot};

#[cfg(test)]
pub(crate) mod testing {
    use bevy::math::Vec3;

    use crate::agent::{Agent, FlockerBehavior, PredatorBehavior};
    use crate::config::Locomotion;
    use crate::constants::MAX_FLOCKER_SPEED;
    use crate::kernel::KernelParams;

    pub fn locomotion() -> Locomotion {
        Locomotion {
            noise: 0.0,
            max_speed: MAX_FLOCKER_SPEED,
            history: 4,
        }
    }

    /// Default bands with every weight at zero.
    pub fn idle_flocker() -> FlockerBehavior {
        FlockerBehavior {
            separation: KernelParams::new("separation", 0.05, 0.5, 0.0).unwrap(),
            alignment: KernelParams::new("alignment", 0.5, 1.0, 0.0).unwrap(),
            cohesion: KernelParams::new("cohesion", 1.0, 1.5, 0.0).unwrap(),
            fear: KernelParams::new("fear", 0.0, 1.0, 0.0).unwrap(),
        }
    }

    pub fn idle_predator() -> PredatorBehavior {
        PredatorBehavior {
            hunger: KernelParams::new("hunger", 0.1, 1.5, 0.0).unwrap(),
        }
    }

    pub fn flocker(index: usize, position: Vec3, velocity: Vec3) -> Agent {
        Agent::flocker(index, position, velocity, idle_flocker(), locomotion()).unwrap()
    }

    pub fn predator(index: usize, position: Vec3, velocity: Vec3) -> Agent {
        Agent::predator(index, position, velocity, idle_predator(), locomotion()).unwrap()
    }
}
