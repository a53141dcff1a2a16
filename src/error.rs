use thiserror::Error;

use crate::agent::AgentKind;

/// Rejected simulation parameters, reported at construction time.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{kernel} distances must be finite and non-negative (min {min}, max {max})")]
    InvalidKernelDistance {
        kernel: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{kernel} max distance {max} must exceed min distance {min}")]
    EmptyKernelRange {
        kernel: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{kernel} weight {weight} must be finite")]
    InvalidKernelWeight { kernel: &'static str, weight: f32 },
    #[error("{name} bounds are inverted or non-finite ({low}..{high})")]
    InvalidBounds {
        name: &'static str,
        low: f32,
        high: f32,
    },
    #[error("box extent must be positive on every axis, got {0:?}")]
    InvalidExtent([f32; 3]),
    #[error("history capacity must be at least one position")]
    ZeroHistory,
    #[error("max speed must be positive and finite, got {0}")]
    InvalidMaxSpeed(f32),
    #[error("noise amplitude must be finite and non-negative, got {0}")]
    InvalidNoise(f32),
    #[error("could not read config: {0}")]
    Parse(String),
    #[error("slot {slot} holds the wrong kind of agent, expected {expected:?}")]
    WrongAgentKind { slot: usize, expected: AgentKind },
}

/// Failure at the boundary with the rigid-body collaborator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandoffError {
    #[error("physics returned {actual} bodies, simulation has {expected} agents")]
    BodyCountMismatch { expected: usize, actual: usize },
}
