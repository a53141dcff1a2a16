use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::boundary::BoxExtent;
use crate::constants::*;
use crate::error::ConfigError;
use crate::kernel::KernelParams;

/// One behavior's distance band. The weight is drawn per agent from
/// `[weight_min, weight_max]` so every creature gets its own personality.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    pub min: f32,
    pub max: f32,
    pub weight_min: f32,
    pub weight_max: f32,
}

impl KernelConfig {
    pub const fn new(min: f32, max: f32, weight_min: f32, weight_max: f32) -> Self {
        Self {
            min,
            max,
            weight_min,
            weight_max,
        }
    }

    /// Band with the same weight for every agent.
    pub const fn fixed(min: f32, max: f32, weight: f32) -> Self {
        Self::new(min, max, weight, weight)
    }

    pub fn validate(&self, kernel: &'static str) -> Result<(), ConfigError> {
        KernelParams::new(kernel, self.min, self.max, self.weight_min)?;
        KernelParams::new(kernel, self.min, self.max, self.weight_max)?;
        if self.weight_min > self.weight_max {
            return Err(ConfigError::InvalidBounds {
                name: kernel,
                low: self.weight_min,
                high: self.weight_max,
            });
        }
        Ok(())
    }

    pub fn sample<R: Rng + ?Sized>(&self, kernel: &'static str, rng: &mut R) -> Result<KernelParams, ConfigError> {
        self.validate(kernel)?;
        let weight = if self.weight_max > self.weight_min {
            rng.gen_range(self.weight_min..=self.weight_max)
        } else {
            self.weight_min
        };
        KernelParams::new(kernel, self.min, self.max, weight)
    }
}

/// Per-agent motion limits shared by both kinds of creature.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Locomotion {
    /// Per-axis bound on the uniform random acceleration; 0 disables it.
    pub noise: f32,
    pub max_speed: f32,
    /// Number of past positions kept for trails.
    pub history: usize,
}

impl Locomotion {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(ConfigError::InvalidNoise(self.noise));
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err(ConfigError::InvalidMaxSpeed(self.max_speed));
        }
        if self.history == 0 {
            return Err(ConfigError::ZeroHistory);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockerConfig {
    pub count: usize,
    pub separation: KernelConfig,
    pub alignment: KernelConfig,
    pub cohesion: KernelConfig,
    pub fear: KernelConfig,
    pub locomotion: Locomotion,
    pub color: [f32; 3],
}

impl Default for FlockerConfig {
    fn default() -> Self {
        Self {
            count: FLOCKER_COUNT,
            separation: KernelConfig::new(0.05, 0.5, 0.01, 0.03),
            alignment: KernelConfig::new(0.5, 1.0, 0.0005, 0.002),
            cohesion: KernelConfig::new(1.0, 1.5, 0.0005, 0.002),
            fear: KernelConfig::new(0.0, 1.0, 0.0005, 0.4),
            locomotion: Locomotion {
                noise: FLOCKER_RANDOMNESS,
                max_speed: MAX_FLOCKER_SPEED,
                history: HISTORY_LENGTH,
            },
            color: BASE_COLOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorConfig {
    pub count: usize,
    pub hunger: KernelConfig,
    pub locomotion: Locomotion,
    pub color: [f32; 3],
}

impl Default for PredatorConfig {
    fn default() -> Self {
        Self {
            count: PREDATOR_COUNT,
            hunger: KernelConfig::new(0.1, 1.5, 0.005, 0.02),
            locomotion: Locomotion {
                noise: 0.0,
                max_speed: MAX_PREDATOR_SPEED,
                history: HISTORY_LENGTH,
            },
            color: BASE_COLOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for spawning and per-step noise.
    pub seed: u64,
    pub extent: BoxExtent,
    /// Initial velocity components are drawn from `[-initial_speed, initial_speed]`.
    pub initial_speed: f32,
    pub flockers: FlockerConfig,
    pub predators: PredatorConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            extent: BoxExtent {
                width: BOX_WIDTH,
                height: BOX_HEIGHT,
                depth: BOX_DEPTH,
            },
            initial_speed: INITIAL_SPEED_RANGE,
            flockers: FlockerConfig::default(),
            predators: PredatorConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.extent.validate()?;
        if !self.initial_speed.is_finite() || self.initial_speed < 0.0 {
            return Err(ConfigError::InvalidBounds {
                name: "initial_speed",
                low: -self.initial_speed,
                high: self.initial_speed,
            });
        }

        let flockers = &self.flockers;
        flockers.separation.validate("separation")?;
        flockers.alignment.validate("alignment")?;
        flockers.cohesion.validate("cohesion")?;
        flockers.fear.validate("fear")?;
        flockers.locomotion.validate()?;

        self.predators.hunger.validate("hunger")?;
        self.predators.locomotion.validate()?;
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }
}
