use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use creature_box::{Simulation, SimulationConfig};

mod resources;
mod systems;

use resources::*;
use systems::*;

/// Flockers and predators in a wrap-around box.
#[derive(Parser, Debug)]
#[command(name = "creature-box", version, about)]
struct Cli {
    /// JSON file with simulation parameters; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Number of flockers.
    #[arg(long)]
    flockers: Option<usize>,

    /// Number of predators.
    #[arg(long)]
    predators: Option<usize>,

    /// Run without a window and print the final snapshot as JSON.
    #[arg(long)]
    headless: bool,

    /// Steps to run in headless mode.
    #[arg(long, default_value_t = 600, requires = "headless")]
    steps: u64,

    /// Write the headless snapshot here instead of stdout.
    #[arg(long, requires = "headless")]
    output: Option<PathBuf>,
}

impl Cli {
    fn simulation_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_path(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => SimulationConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(count) = self.flockers {
            config.flockers.count = count;
        }
        if let Some(count) = self.predators {
            config.predators.count = count;
        }
        config.validate()?;
        Ok(config)
    }
}

// ==================== Main App Setup ====================
fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.simulation_config()?;

    if cli.headless {
        run_headless(&cli, &config)
    } else {
        run_viewer(&config)
    }
}

fn run_headless(cli: &Cli, config: &SimulationConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if cli.steps == 0 {
        bail!("--steps must be at least 1");
    }

    let mut simulation = Simulation::new(config)?;
    simulation.run(cli.steps);
    info!(steps = simulation.steps(), "headless run finished");

    let json = simulation.snapshot().to_json()?;
    match &cli.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing snapshot to {}", path.display()))?;
            info!(path = %path.display(), "snapshot written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_viewer(config: &SimulationConfig) -> Result<()> {
    let simulation = Simulation::new(config)?;

    // DefaultPlugins brings bevy's tracing-based LogPlugin.
    let exit = App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Creature Box".into(),
                resolution: (960.0, 540.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .insert_resource(Time::<Fixed>::from_hz(FIXED_STEP_HZ))
        .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.08)))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 400.0,
        })
        .insert_resource(Flock(simulation))
        .insert_resource(RunState::default())
        .insert_resource(DrawMode::default())
        .insert_resource(OrbitCamera::default())
        .add_systems(Startup, setup)
        .add_systems(FixedUpdate, step_simulation)
        .add_systems(
            Update,
            (
                handle_keyboard,
                update_camera.after(handle_keyboard),
                sync_creatures,
                draw_box,
                draw_creature_gizmos,
                update_hud,
            ),
        )
        .run();

    if let AppExit::Error(code) = exit {
        bail!("viewer exited with code {code}");
    }
    Ok(())
}
