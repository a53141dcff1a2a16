use tracing::debug;

use crate::agent::Agent;

/// Squared distances for one step.
///
/// Flocker pairs are kept as a packed upper triangle (one entry per unordered
/// pair, read symmetrically). Predator to flocker distances are a dense
/// `predators x flockers` table. Every entry is recomputed by [`refresh`];
/// nothing is computed lazily, so readers must only run between a refresh and
/// the next commit of positions.
///
/// [`refresh`]: DistanceCache::refresh
#[derive(Clone, Debug, Default)]
pub struct DistanceCache {
    flockers: usize,
    predators: usize,
    flocker_pairs: Vec<f32>,
    predator_flocker: Vec<f32>,
}

impl DistanceCache {
    pub fn new(flockers: usize, predators: usize) -> Self {
        let mut cache = Self::default();
        cache.resize(flockers, predators);
        cache
    }

    pub fn flocker_count(&self) -> usize {
        self.flockers
    }

    pub fn predator_count(&self) -> usize {
        self.predators
    }

    fn resize(&mut self, flockers: usize, predators: usize) {
        self.flockers = flockers;
        self.predators = predators;
        self.flocker_pairs.clear();
        self.flocker_pairs.resize(flockers * flockers.saturating_sub(1) / 2, 0.0);
        self.predator_flocker.clear();
        self.predator_flocker.resize(predators * flockers, 0.0);
    }

    pub fn refresh(&mut self, flockers: &[Agent], predators: &[Agent]) {
        if flockers.len() != self.flockers || predators.len() != self.predators {
            debug!(
                flockers = flockers.len(),
                predators = predators.len(),
                "resizing distance cache"
            );
            self.resize(flockers.len(), predators.len());
        }

        let mut k = 0;
        for (i, a) in flockers.iter().enumerate() {
            for b in &flockers[i + 1..] {
                self.flocker_pairs[k] = a.position.distance_squared(b.position);
                k += 1;
            }
        }

        for (p, predator) in predators.iter().enumerate() {
            let row = &mut self.predator_flocker[p * self.flockers..(p + 1) * self.flockers];
            for (slot, flocker) in row.iter_mut().zip(flockers) {
                *slot = predator.position.distance_squared(flocker.position);
            }
        }
    }

    #[inline]
    fn pair_slot(&self, i: usize, j: usize) -> usize {
        assert!(i != j, "no self distance for flocker {i}");
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        assert!(
            hi < self.flockers,
            "flocker index {hi} out of range for cache of {}",
            self.flockers
        );
        lo * self.flockers - lo * (lo + 1) / 2 + (hi - lo - 1)
    }

    /// Squared distance between flockers `i` and `j` (order does not matter).
    #[inline]
    pub fn flocker(&self, i: usize, j: usize) -> f32 {
        self.flocker_pairs[self.pair_slot(i, j)]
    }

    #[inline]
    pub fn predator_flocker(&self, predator: usize, flocker: usize) -> f32 {
        assert!(
            predator < self.predators && flocker < self.flockers,
            "({predator}, {flocker}) out of range for {}x{} predator cache",
            self.predators,
            self.flockers
        );
        self.predator_flocker[predator * self.flockers + flocker]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{flocker, predator};
    use bevy::math::Vec3;

    fn squared_distance(a: Vec3, b: Vec3) -> f32 {
        (a - b).length_squared()
    }

    fn scattered_flockers(n: usize) -> Vec<Agent> {
        (0..n)
            .map(|i| {
                let t = i as f32;
                flocker(i, Vec3::new(0.3 * t, (t * 1.7) % 5.0, (t * 2.3) % 7.0), Vec3::ZERO)
            })
            .collect()
    }

    #[test]
    fn matches_direct_computation_both_ways() {
        let flockers = scattered_flockers(7);
        let mut cache = DistanceCache::default();
        cache.refresh(&flockers, &[]);

        for i in 0..flockers.len() {
            for j in 0..flockers.len() {
                if i == j {
                    continue;
                }
                let expected = squared_distance(flockers[i].position, flockers[j].position);
                assert_eq!(cache.flocker(i, j), expected);
                assert_eq!(cache.flocker(j, i), cache.flocker(i, j));
            }
        }
    }

    #[test]
    fn predator_table_is_dense() {
        let flockers = scattered_flockers(4);
        let predators = vec![
            predator(0, Vec3::new(1.0, 1.0, 1.0), Vec3::ZERO),
            predator(1, Vec3::new(8.0, 4.0, 6.0), Vec3::ZERO),
        ];
        let mut cache = DistanceCache::default();
        cache.refresh(&flockers, &predators);

        for (p, pred) in predators.iter().enumerate() {
            for (f, flock) in flockers.iter().enumerate() {
                assert_eq!(
                    cache.predator_flocker(p, f),
                    squared_distance(pred.position, flock.position)
                );
            }
        }
    }

    #[test]
    fn resizes_when_populations_change() {
        let mut cache = DistanceCache::new(2, 0);
        let flockers = scattered_flockers(5);
        cache.refresh(&flockers, &[]);
        assert_eq!(cache.flocker_count(), 5);
        assert_eq!(cache.predator_count(), 0);
        assert_eq!(cache.flocker(0, 4), squared_distance(flockers[0].position, flockers[4].position));
    }

    #[test]
    fn single_flocker_has_no_pairs() {
        let flockers = scattered_flockers(1);
        let mut cache = DistanceCache::default();
        cache.refresh(&flockers, &[]);
        assert_eq!(cache.flocker_count(), 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_flocker_is_fatal() {
        let flockers = scattered_flockers(3);
        let mut cache = DistanceCache::default();
        cache.refresh(&flockers, &[]);
        cache.flocker(0, 3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_predator_is_fatal() {
        let flockers = scattered_flockers(3);
        let mut cache = DistanceCache::default();
        cache.refresh(&flockers, &[]);
        cache.predator_flocker(0, 0);
    }

    #[test]
    #[should_panic(expected = "no self distance")]
    fn self_distance_is_fatal() {
        let flockers = scattered_flockers(3);
        let mut cache = DistanceCache::default();
        cache.refresh(&flockers, &[]);
        cache.flocker(1, 1);
    }
}
