//! Configuration types for block proposal.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProposerConfig {
    /// Upper bound on deploys pulled into one block.
    pub max_deploys_per_block: usize,
    /// Pending propose requests before callers wait.
    pub queue_depth: usize,
}

impl Default for ProposerConfig {
    fn default() -> Self {
        Self {
            max_deploys_per_block: 100,
            queue_depth: 64,
        }
    }
}
