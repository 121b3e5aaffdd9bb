use serde::{Deserialize, Serialize};

/// Tunables for a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Skill points granted when a session starts or resets.
    pub starting_points: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { starting_points: 2 }
    }
}
