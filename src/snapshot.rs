use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::boundary::BoxExtent;

/// Everything a renderer reads from one agent, in plain arrays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub index: usize,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub frame: [[f32; 3]; 3],
    pub color: [f32; 3],
    /// Newest first.
    pub history: Vec<[f32; 3]>,
}

impl From<&Agent> for AgentRecord {
    fn from(agent: &Agent) -> Self {
        Self {
            index: agent.index,
            position: agent.position.to_array(),
            velocity: agent.velocity.to_array(),
            frame: [
                agent.frame.x.to_array(),
                agent.frame.y.to_array(),
                agent.frame.z.to_array(),
            ],
            color: agent.draw_color,
            history: agent.history.iter().map(|p| p.to_array()).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub step: u64,
    pub extent: BoxExtent,
    pub flockers: Vec<AgentRecord>,
    pub predators: Vec<AgentRecord>,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
