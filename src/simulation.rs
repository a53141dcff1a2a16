use bevy::math::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, trace};

use crate::agent::{Agent, AgentKind, Behavior, FlockerBehavior, PredatorBehavior, Steering};
use crate::boundary::BoxExtent;
use crate::config::SimulationConfig;
use crate::distance::DistanceCache;
use crate::error::{ConfigError, HandoffError};
use crate::physics::BodyState;
use crate::snapshot::{AgentRecord, Snapshot};

/// Owns both populations, the per-step distance cache and the noise RNG.
///
/// Agent slots never move during a run: an agent's `index` is its position in
/// `flockers` or `predators` and addresses the cache. Reordering a collection
/// invalidates every cached distance until the next full refresh.
pub struct Simulation {
    flockers: Vec<Agent>,
    predators: Vec<Agent>,
    cache: DistanceCache,
    extent: BoxExtent,
    rng: ChaCha8Rng,
    steps: u64,
    steering: Vec<Steering>,
}

impl Simulation {
    /// Spawns every creature at a random pose with its own sampled weights.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let extent = config.extent;
        let speed = config.initial_speed;

        let fc = &config.flockers;
        let mut flockers = Vec::with_capacity(fc.count);
        for i in 0..fc.count {
            let behavior = FlockerBehavior {
                separation: fc.separation.sample("separation", &mut rng)?,
                alignment: fc.alignment.sample("alignment", &mut rng)?,
                cohesion: fc.cohesion.sample("cohesion", &mut rng)?,
                fear: fc.fear.sample("fear", &mut rng)?,
            };
            let (position, velocity) = random_pose(&mut rng, &extent, speed);
            flockers.push(Agent::new(
                i,
                Behavior::Flocker(behavior),
                position,
                velocity,
                fc.locomotion,
                fc.color,
            )?);
        }

        let pc = &config.predators;
        let mut predators = Vec::with_capacity(pc.count);
        for i in 0..pc.count {
            let behavior = PredatorBehavior {
                hunger: pc.hunger.sample("hunger", &mut rng)?,
            };
            let (position, velocity) = random_pose(&mut rng, &extent, speed);
            predators.push(Agent::new(
                i,
                Behavior::Predator(behavior),
                position,
                velocity,
                pc.locomotion,
                pc.color,
            )?);
        }

        info!(
            flockers = flockers.len(),
            predators = predators.len(),
            seed = config.seed,
            "spawned creatures"
        );

        Ok(Self::assemble(flockers, predators, extent, rng))
    }

    /// Wraps hand-built populations. Each agent's `index` is reset to its slot.
    pub fn from_agents(
        flockers: Vec<Agent>,
        predators: Vec<Agent>,
        extent: BoxExtent,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        extent.validate()?;
        check_kinds(&flockers, AgentKind::Flocker)?;
        check_kinds(&predators, AgentKind::Predator)?;
        Ok(Self::assemble(flockers, predators, extent, ChaCha8Rng::seed_from_u64(seed)))
    }

    fn assemble(mut flockers: Vec<Agent>, mut predators: Vec<Agent>, extent: BoxExtent, rng: ChaCha8Rng) -> Self {
        for (slot, agent) in flockers.iter_mut().enumerate() {
            agent.index = slot;
        }
        for (slot, agent) in predators.iter_mut().enumerate() {
            agent.index = slot;
        }
        let cache = DistanceCache::new(flockers.len(), predators.len());
        let steering = Vec::with_capacity(flockers.len() + predators.len());
        Self {
            flockers,
            predators,
            cache,
            extent,
            rng,
            steps: 0,
            steering,
        }
    }

    /// Advances every creature by one step.
    pub fn step(&mut self) {
        self.cache.refresh(&self.flockers, &self.predators);

        // Every agent steers from the same pre-step snapshot.
        self.steering.clear();
        self.steering.extend(
            self.flockers
                .iter()
                .chain(&self.predators)
                .map(|agent| agent.steer(&self.flockers, &self.predators, &self.cache)),
        );

        for (agent, steering) in self
            .flockers
            .iter_mut()
            .chain(self.predators.iter_mut())
            .zip(self.steering.drain(..))
        {
            agent.update(steering, &mut self.rng);
        }

        for agent in self.flockers.iter_mut().chain(self.predators.iter_mut()) {
            agent.finalize(&self.extent);
        }

        self.steps += 1;
        trace!(step = self.steps, "step complete");
    }

    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    pub fn flockers(&self) -> &[Agent] {
        &self.flockers
    }

    pub fn predators(&self) -> &[Agent] {
        &self.predators
    }

    /// Flockers first, then predators; the same order the physics handoff uses.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.flockers.iter().chain(&self.predators)
    }

    pub fn agent_count(&self) -> usize {
        self.flockers.len() + self.predators.len()
    }

    pub fn extent(&self) -> &BoxExtent {
        &self.extent
    }

    pub fn cache(&self) -> &DistanceCache {
        &self.cache
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Positions and velocities for the rigid-body collaborator. Velocities are
    /// scaled from per-step units into whatever the backend integrates in.
    pub fn export_bodies(&self, velocity_scale: f32) -> Vec<BodyState> {
        self.agents()
            .map(|agent| BodyState {
                position: agent.position,
                velocity: agent.velocity * velocity_scale,
            })
            .collect()
    }

    /// Writes positions computed by the rigid-body collaborator back into the
    /// agents. Velocity, frame and history are left as they were.
    pub fn import_positions(&mut self, positions: &[Vec3]) -> Result<(), HandoffError> {
        let expected = self.agent_count();
        if positions.len() != expected {
            return Err(HandoffError::BodyCountMismatch {
                expected,
                actual: positions.len(),
            });
        }
        for (agent, position) in self
            .flockers
            .iter_mut()
            .chain(self.predators.iter_mut())
            .zip(positions)
        {
            agent.position = *position;
        }
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            step: self.steps,
            extent: self.extent,
            flockers: self.flockers.iter().map(AgentRecord::from).collect(),
            predators: self.predators.iter().map(AgentRecord::from).collect(),
        }
    }
}

fn check_kinds(agents: &[Agent], expected: AgentKind) -> Result<(), ConfigError> {
    match agents.iter().position(|agent| agent.kind() != expected) {
        Some(slot) => Err(ConfigError::WrongAgentKind { slot, expected }),
        None => Ok(()),
    }
}

fn random_pose<R: Rng + ?Sized>(rng: &mut R, extent: &BoxExtent, speed: f32) -> (Vec3, Vec3) {
    let position = Vec3::new(
        rng.gen_range(0.0..=extent.width),
        rng.gen_range(0.0..=extent.height),
        rng.gen_range(0.0..=extent.depth),
    );
    let velocity = if speed > 0.0 {
        Vec3::new(
            rng.gen_range(-speed..=speed),
            rng.gen_range(-speed..=speed),
            rng.gen_range(-speed..=speed),
        )
    } else {
        Vec3::ZERO
    };
    (position, velocity)
}
