use bevy::math::Vec3;

use creature_box::constants::{HUNTING_COLOR, PHYSICS_VELOCITY_SCALE};
use creature_box::{
    Agent, BallisticWorld, BoxExtent, FlockerBehavior, KernelParams, Locomotion, PhysicsBackend,
    PredatorBehavior, Simulation, SimulationConfig,
};

fn extent() -> BoxExtent {
    BoxExtent::new(9.0, 5.0, 7.0).unwrap()
}

fn quiet(history: usize) -> Locomotion {
    Locomotion {
        noise: 0.0,
        max_speed: 0.04,
        history,
    }
}

fn flocker_behavior(separation_weight: f32) -> FlockerBehavior {
    FlockerBehavior {
        separation: KernelParams::new("separation", 0.05, 0.5, separation_weight).unwrap(),
        alignment: KernelParams::new("alignment", 0.5, 1.0, 0.0).unwrap(),
        cohesion: KernelParams::new("cohesion", 1.0, 1.5, 0.0).unwrap(),
        fear: KernelParams::new("fear", 0.0, 1.0, 0.0).unwrap(),
    }
}

fn assert_pair_separates(gap: f32) {
    let weight = 0.004;
    let a = Vec3::new(1.0, 1.0, 1.0);
    let b = Vec3::new(1.0 + gap, 1.0, 1.0);
    let flockers = vec![
        Agent::flocker(0, a, Vec3::ZERO, flocker_behavior(weight), quiet(8)).unwrap(),
        Agent::flocker(1, b, Vec3::ZERO, flocker_behavior(weight), quiet(8)).unwrap(),
    ];
    let mut sim = Simulation::from_agents(flockers, Vec::new(), extent(), 0).unwrap();
    sim.step();

    let magnitude = (0.5 * 0.5 / a.distance_squared(b) - 1.0) * weight;
    assert!(magnitude > 0.0 && magnitude < 0.04, "pair must sit inside the band and under the speed clamp");

    let left = &sim.flockers()[0];
    let right = &sim.flockers()[1];
    assert!((left.velocity.x + magnitude).abs() < 1e-6);
    assert!((right.velocity.x - magnitude).abs() < 1e-6);
    assert_eq!(left.velocity.y, 0.0);
    assert_eq!(left.velocity.z, 0.0);
    assert!((left.position.x - (a.x - magnitude)).abs() < 1e-6);
    assert!((right.position.x - (b.x + magnitude)).abs() < 1e-6);
}

#[test]
fn two_flockers_at_band_midpoint_push_apart_by_the_separation_formula() {
    // Midpoint of the [0.05, 0.5] separation band.
    assert_pair_separates(0.5 * (0.05 + 0.5));
}

#[test]
fn two_close_flockers_push_apart_by_the_separation_formula() {
    assert_pair_separates(0.2);
}

#[test]
fn lone_flocker_coasts_in_a_straight_line() {
    let velocity = Vec3::new(0.03, 0.01, -0.02);
    let lone = Agent::flocker(0, Vec3::new(1.0, 1.0, 1.0), velocity, flocker_behavior(0.0), quiet(30)).unwrap();
    let mut sim = Simulation::from_agents(vec![lone], Vec::new(), extent(), 0).unwrap();

    for _ in 0..500 {
        let before = sim.flockers()[0].position;
        sim.step();
        let agent = &sim.flockers()[0];
        assert_eq!(agent.velocity, velocity);
        assert_eq!(agent.position, extent().wrap(before + velocity));
    }
}

#[test]
fn hungry_predator_closes_on_a_flocker() {
    let hunger = KernelParams::new("hunger", 0.1, 1.5, 0.01).unwrap();
    let prey = Agent::flocker(0, Vec3::new(5.0, 2.0, 2.0), Vec3::ZERO, flocker_behavior(0.0), quiet(8)).unwrap();
    let hunter = Agent::predator(0, Vec3::new(4.0, 2.0, 2.0), Vec3::ZERO, PredatorBehavior { hunger }, quiet(8)).unwrap();
    let mut sim = Simulation::from_agents(vec![prey], vec![hunter], extent(), 0).unwrap();

    sim.step();

    let predator = &sim.predators()[0];
    let expected = hunger.cosine_falloff(1.0) * hunger.weight;
    assert!(expected > 0.0);
    assert!((predator.velocity.x - expected).abs() < 1e-6);
    assert_eq!(predator.velocity.y, 0.0);
    assert_eq!(predator.velocity.z, 0.0);
    assert_eq!(predator.draw_color, HUNTING_COLOR);

    let gap_before = 1.0;
    let gap_after = sim.predators()[0].position.distance(sim.flockers()[0].position);
    assert!(gap_after < gap_before);
}

#[test]
fn physics_handoff_round_trip_keeps_flocking_state() {
    let mut config = SimulationConfig::default();
    config.flockers.count = 10;
    let mut sim = Simulation::new(&config).unwrap();
    sim.run(5);

    let velocities: Vec<Vec3> = sim.agents().map(|a| a.velocity).collect();
    let mut world = BallisticWorld::new(*sim.extent());
    world.load(&sim.export_bodies(PHYSICS_VELOCITY_SCALE));
    for _ in 0..30 {
        world.step(1.0 / 60.0);
        sim.import_positions(&world.positions()).unwrap();
    }

    for (agent, body) in sim.agents().zip(world.positions()) {
        assert_eq!(agent.position, body);
    }
    for (agent, velocity) in sim.agents().zip(&velocities) {
        assert_eq!(agent.velocity, *velocity);
    }

    // Flocking picks up again from where physics left the bodies.
    sim.step();
    let size = sim.extent().size();
    for agent in sim.agents() {
        assert!(agent.position.cmpge(Vec3::ZERO).all() && agent.position.cmple(size).all());
    }
}

#[test]
fn history_stays_bounded_over_a_long_run() {
    let mut config = SimulationConfig::default();
    config.flockers.count = 15;
    let mut sim = Simulation::new(&config).unwrap();
    sim.run(120);

    for agent in sim.agents() {
        assert_eq!(agent.history.len(), 30);
        assert_eq!(agent.history.latest(), Some(agent.position));
    }
}

#[test]
fn different_seeds_give_different_flocks() {
    let mut config = SimulationConfig::default();
    config.flockers.count = 5;
    let a = Simulation::new(&config).unwrap();
    config.seed += 1;
    let b = Simulation::new(&config).unwrap();
    assert_ne!(a.flockers()[0].position, b.flockers()[0].position);
}
