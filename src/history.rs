use std::collections::VecDeque;

use bevy::math::Vec3;

use crate::error::ConfigError;

/// Most recent positions, newest first. Pushing past capacity drops the
/// oldest entry from the back.
#[derive(Clone, Debug)]
pub struct PositionHistory {
    capacity: usize,
    positions: VecDeque<Vec3>,
}

impl PositionHistory {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroHistory);
        }
        Ok(Self {
            capacity,
            positions: VecDeque::with_capacity(capacity + 1),
        })
    }

    pub fn push(&mut self, position: Vec3) {
        self.positions.push_front(position);
        if self.positions.len() > self.capacity {
            self.positions.pop_back();
        }
    }

    pub fn latest(&self) -> Option<Vec3> {
        self.positions.front().copied()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Newest to oldest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Vec3> + '_ {
        self.positions.iter()
    }
}
