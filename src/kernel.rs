//! Steering force kernels.
//!
//! Every kernel walks the neighbors that fall inside its `[min, max]` band
//! (compared on squared distance), scales a direction by a falloff value and
//! sums the result. The weight is applied once at the end, and only when at
//! least one neighbor qualified.

use std::f32::consts::TAU;

use bevy::math::Vec3;

use crate::agent::Agent;
use crate::distance::DistanceCache;
use crate::error::ConfigError;

/// Distance band and weight for one behavior, with the squared terms
/// precomputed for the inner loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelParams {
    pub min: f32,
    pub max: f32,
    pub weight: f32,
    min_sq: f32,
    max_sq: f32,
    inv_range_sq: f32,
}

impl KernelParams {
    pub fn new(kernel: &'static str, min: f32, max: f32, weight: f32) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < 0.0 {
            return Err(ConfigError::InvalidKernelDistance { kernel, min, max });
        }
        if max <= min {
            return Err(ConfigError::EmptyKernelRange { kernel, min, max });
        }
        if !weight.is_finite() {
            return Err(ConfigError::InvalidKernelWeight { kernel, weight });
        }

        let min_sq = min * min;
        let max_sq = max * max;
        Ok(Self {
            min,
            max,
            weight,
            min_sq,
            max_sq,
            inv_range_sq: 1.0 / (max_sq - min_sq),
        })
    }

    pub fn min_sq(&self) -> f32 {
        self.min_sq
    }

    pub fn max_sq(&self) -> f32 {
        self.max_sq
    }

    #[inline]
    pub fn contains(&self, dist_sq: f32) -> bool {
        dist_sq >= self.min_sq && dist_sq <= self.max_sq
    }

    /// `max²/d² − 1`: infinite at contact, zero at the outer edge.
    #[inline]
    pub fn separation_falloff(&self, dist_sq: f32) -> f32 {
        self.max_sq / dist_sq - 1.0
    }

    /// Raised cosine over the band: 0 at both ends, 1 at the middle.
    #[inline]
    pub fn cosine_falloff(&self, dist_sq: f32) -> f32 {
        let percent = (dist_sq - self.max_sq) * self.inv_range_sq;
        0.5 - 0.5 * (percent * TAU).cos()
    }
}

/// What a kernel produced this step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KernelOutput {
    pub force: Vec3,
    pub active: bool,
}

impl KernelOutput {
    pub const INACTIVE: Self = Self {
        force: Vec3::ZERO,
        active: false,
    };

    fn finish(sum: Vec3, count: usize, weight: f32) -> Self {
        if count > 0 {
            Self {
                force: sum * weight,
                active: true,
            }
        } else {
            Self::INACTIVE
        }
    }
}

/// Sums `falloff(d²) * direction(other)` over every other flocker in band.
fn accumulate_flockers(
    index: usize,
    flockers: &[Agent],
    cache: &DistanceCache,
    params: &KernelParams,
    falloff: impl Fn(f32) -> f32,
    direction: impl Fn(&Agent) -> Vec3,
) -> KernelOutput {
    let mut sum = Vec3::ZERO;
    let mut count = 0;

    for (j, other) in flockers.iter().enumerate() {
        if j == index {
            continue;
        }
        let dist_sq = cache.flocker(index, j);
        if params.contains(dist_sq) {
            // A coincident neighbor still counts, but separation's falloff is
            // infinite at d² = 0 and inf * 0 would poison the sum with NaN.
            let dir = direction(other);
            if dir != Vec3::ZERO {
                sum += falloff(dist_sq) * dir;
            }
            count += 1;
        }
    }

    KernelOutput::finish(sum, count, params.weight)
}

pub fn separation(index: usize, flockers: &[Agent], cache: &DistanceCache, params: &KernelParams) -> KernelOutput {
    let position = flockers[index].position;
    accumulate_flockers(
        index,
        flockers,
        cache,
        params,
        |d| params.separation_falloff(d),
        |other| (position - other.position).normalize_or_zero(),
    )
}

pub fn alignment(index: usize, flockers: &[Agent], cache: &DistanceCache, params: &KernelParams) -> KernelOutput {
    accumulate_flockers(
        index,
        flockers,
        cache,
        params,
        |d| params.cosine_falloff(d),
        |other| other.velocity.normalize_or_zero(),
    )
}

pub fn cohesion(index: usize, flockers: &[Agent], cache: &DistanceCache, params: &KernelParams) -> KernelOutput {
    let position = flockers[index].position;
    accumulate_flockers(
        index,
        flockers,
        cache,
        params,
        |d| params.cosine_falloff(d),
        |other| (other.position - position).normalize_or_zero(),
    )
}

/// Flocker `index` flees every predator in band.
pub fn fear(
    index: usize,
    flockers: &[Agent],
    predators: &[Agent],
    cache: &DistanceCache,
    params: &KernelParams,
) -> KernelOutput {
    let position = flockers[index].position;
    let mut sum = Vec3::ZERO;
    let mut count = 0;

    for (p, predator) in predators.iter().enumerate() {
        let dist_sq = cache.predator_flocker(p, index);
        if params.contains(dist_sq) {
            sum += params.cosine_falloff(dist_sq) * (position - predator.position).normalize_or_zero();
            count += 1;
        }
    }

    KernelOutput::finish(sum, count, params.weight)
}

/// Predator `index` chases every flocker in band.
pub fn hunger(
    index: usize,
    predators: &[Agent],
    flockers: &[Agent],
    cache: &DistanceCache,
    params: &KernelParams,
) -> KernelOutput {
    let position = predators[index].position;
    let mut sum = Vec3::ZERO;
    let mut count = 0;

    for (f, flocker) in flockers.iter().enumerate() {
        let dist_sq = cache.predator_flocker(index, f);
        if params.contains(dist_sq) {
            sum += params.cosine_falloff(dist_sq) * (flocker.position - position).normalize_or_zero();
            count += 1;
        }
    }

    KernelOutput::finish(sum, count, params.weight)
}
