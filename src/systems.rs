use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use tracing::{info, warn};

use creature_box::constants::PHYSICS_VELOCITY_SCALE;
use creature_box::{Agent, BallisticWorld, PhysicsBackend};

use crate::resources::*;

fn agent_color(rgb: [f32; 3]) -> Color {
    Color::srgb(rgb[0], rgb[1], rgb[2])
}

fn creature<'a>(flock: &'a Flock, tag: Creature) -> Option<&'a Agent> {
    match tag {
        Creature::Flocker(i) => flock.flockers().get(i),
        Creature::Predator(i) => flock.predators().get(i),
    }
}

// ==================== Setup Systems ====================
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    flock: Res<Flock>,
    orbit: Res<OrbitCamera>,
) {
    let center = flock.extent().center();

    commands.spawn(Camera3dBundle {
        transform: orbit.transform(center),
        ..default()
    });
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 6000.0,
            ..default()
        },
        transform: Transform::from_xyz(center.x, center.y + 10.0, center.z + 4.0).looking_at(center, Vec3::Y),
        ..default()
    });

    spawn_creatures(&mut commands, &mut meshes, &mut materials, &flock);

    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: 18.0,
                color: Color::WHITE,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        }),
        HudText,
    ));
}

fn spawn_creatures(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    flock: &Flock,
) {
    // Long axis on Z; the frame rotation turns -Z into the heading.
    let flocker_mesh = meshes.add(Cuboid::new(0.05, 0.03, 0.16));
    let predator_mesh = meshes.add(Cuboid::new(0.1, 0.06, 0.3));

    let tagged = flock
        .flockers()
        .iter()
        .map(|a| (Creature::Flocker(a.index), a, flocker_mesh.clone()))
        .chain(
            flock
                .predators()
                .iter()
                .map(|a| (Creature::Predator(a.index), a, predator_mesh.clone())),
        );

    for (tag, agent, mesh) in tagged {
        // One material per creature so colors can change independently.
        let material = materials.add(StandardMaterial {
            base_color: agent_color(agent.draw_color),
            ..default()
        });
        commands.spawn((
            PbrBundle {
                mesh,
                material,
                transform: Transform::from_translation(agent.position).with_rotation(agent.frame.rotation()),
                ..default()
            },
            tag,
        ));
    }
}

// ==================== Simulation Systems ====================
pub fn step_simulation(mut flock: ResMut<Flock>, mut run: ResMut<RunState>, time: Res<Time>) {
    if run.paused {
        return;
    }

    match run.physics.as_mut() {
        Some(world) => {
            world.step(time.delta_seconds());
            if let Err(err) = flock.import_positions(&world.positions()) {
                warn!(%err, "dropping physics world");
                run.physics = None;
            }
        }
        None => flock.step(),
    }
}

// ==================== Input Handling Systems ====================
pub fn handle_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    flock: Res<Flock>,
    mut run: ResMut<RunState>,
    mut draw_mode: ResMut<DrawMode>,
    mut orbit: ResMut<OrbitCamera>,
    mut exit: EventWriter<AppExit>,
) {
    if keyboard.just_pressed(KeyCode::KeyQ) {
        exit.send(AppExit::Success);
        return;
    }

    if keyboard.just_pressed(KeyCode::Space) {
        run.paused = !run.paused;
        info!(paused = run.paused, "toggled pause");
    }

    if keyboard.just_pressed(KeyCode::KeyP) {
        if run.physics_active() {
            run.physics = None;
            info!("physics off, flocking resumes");
        } else {
            let mut world = BallisticWorld::new(*flock.extent());
            world.load(&flock.export_bodies(PHYSICS_VELOCITY_SCALE));
            run.physics = Some(world);
            info!(bodies = flock.agent_count(), "physics on");
        }
    }

    if keyboard.just_pressed(KeyCode::Digit8) {
        *draw_mode = DrawMode::Poly;
    } else if keyboard.just_pressed(KeyCode::Digit9) {
        *draw_mode = DrawMode::Axes;
    } else if keyboard.just_pressed(KeyCode::Digit0) {
        *draw_mode = DrawMode::History;
    }

    // Held keys keep orbiting, like key repeat.
    if keyboard.pressed(KeyCode::KeyA) {
        orbit.rotate(-ORBIT_DELTA_DEGS, 0.0);
    }
    if keyboard.pressed(KeyCode::KeyD) {
        orbit.rotate(ORBIT_DELTA_DEGS, 0.0);
    }
    if keyboard.pressed(KeyCode::KeyW) {
        orbit.rotate(0.0, ORBIT_DELTA_DEGS);
    }
    if keyboard.pressed(KeyCode::KeyS) {
        orbit.rotate(0.0, -ORBIT_DELTA_DEGS);
    }
    if keyboard.pressed(KeyCode::KeyZ) {
        orbit.zoom(ORBIT_DELTA_RADIUS);
    }
    if keyboard.pressed(KeyCode::KeyC) {
        orbit.zoom(-ORBIT_DELTA_RADIUS);
    }
    if keyboard.just_pressed(KeyCode::KeyX) {
        *orbit = OrbitCamera::default();
    }
}

// ==================== Rendering Systems ====================
pub fn update_camera(
    orbit: Res<OrbitCamera>,
    flock: Res<Flock>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
) {
    if !orbit.is_changed() {
        return;
    }
    let pose = orbit.transform(flock.extent().center());
    for mut transform in cameras.iter_mut() {
        *transform = pose;
    }
}

pub fn sync_creatures(
    flock: Res<Flock>,
    draw_mode: Res<DrawMode>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(&Creature, &mut Transform, &mut Visibility, &Handle<StandardMaterial>)>,
) {
    let visibility = match *draw_mode {
        DrawMode::Poly => Visibility::Visible,
        DrawMode::Axes | DrawMode::History => Visibility::Hidden,
    };

    for (tag, mut transform, mut visible, handle) in query.iter_mut() {
        *visible = visibility;
        let Some(agent) = creature(&flock, *tag) else {
            continue;
        };
        transform.translation = agent.position;
        transform.rotation = agent.frame.rotation();
        if let Some(material) = materials.get_mut(handle) {
            material.base_color = agent_color(agent.draw_color);
        }
    }
}

pub fn draw_box(mut gizmos: Gizmos, flock: Res<Flock>) {
    let extent = flock.extent();
    gizmos.cuboid(
        Transform::from_translation(extent.center()).with_scale(extent.size()),
        Color::srgb(0.6, 0.6, 0.6),
    );
}

pub fn draw_creature_gizmos(mut gizmos: Gizmos, flock: Res<Flock>, draw_mode: Res<DrawMode>) {
    match *draw_mode {
        DrawMode::Poly => {}
        DrawMode::Axes => {
            for agent in flock.agents() {
                let p = agent.position;
                gizmos.line(p, p + agent.frame.x * AXIS_LENGTH, Color::srgb(1.0, 0.2, 0.2));
                gizmos.line(p, p + agent.frame.y * AXIS_LENGTH, Color::srgb(0.2, 1.0, 0.2));
                gizmos.line(p, p - agent.frame.z * AXIS_LENGTH * 2.0, agent_color(agent.draw_color));
            }
        }
        DrawMode::History => {
            // A jump longer than half the box is a wrap, not a real segment.
            let limit = flock.extent().size() * 0.5;
            for agent in flock.agents() {
                let [r, g, b] = agent.draw_color;
                let color = Color::srgba(r, g, b, 0.6);
                let points: Vec<Vec3> = agent.history.iter().copied().collect();
                for pair in points.windows(2) {
                    let step = (pair[1] - pair[0]).abs();
                    if step.cmplt(limit).all() {
                        gizmos.line(pair[0], pair[1], color);
                    }
                }
            }
        }
    }
}

pub fn update_hud(
    diagnostics: Res<DiagnosticsStore>,
    flock: Res<Flock>,
    run: Res<RunState>,
    draw_mode: Res<DrawMode>,
    mut query: Query<&mut Text, With<HudText>>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);
    let mode = if run.physics_active() { "physics" } else { "flocking" };
    let status = if run.paused { " (paused)" } else { "" };

    for mut text in query.iter_mut() {
        text.sections[0].value = format!(
            "FPS: {:.1}\nstep {}  {} flockers  {} predators\n{}{}  draw: {:?}",
            fps,
            flock.steps(),
            flock.flockers().len(),
            flock.predators().len(),
            mode,
            status,
            *draw_mode,
        );
    }
}
