use serde::{Deserialize, Serialize};

use crate::weights::{self, WeightSchedule, WeightVector};

/// Tunable constants and weight tables shared by both roles.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflexConfig {
    /// A food cell is unsafe when a threatening ghost is closer to it than
    /// the agent's distance plus this margin.
    pub safety_margin: u32,
    /// Ghosts whose scare timer exceeds this are treated as harmless.
    pub scared_threshold: u32,
    /// Stand-in distance when nothing of a kind is visible.
    pub sentinel_distance: u32,
    /// Occurrences within the history window that count as looping.
    pub loop_repeat_threshold: usize,
    /// At or below this much target food the agent heads straight home.
    pub endgame_food: usize,
    pub offensive_weights: WeightSchedule,
    pub defensive_weights: WeightVector,
}

impl Default for ReflexConfig {
    fn default() -> Self {
        Self {
            safety_margin: 2,
            scared_threshold: 5,
            sentinel_distance: 999,
            loop_repeat_threshold: 3,
            endgame_food: 2,
            offensive_weights: WeightSchedule::offensive(),
            defensive_weights: weights::defensive_weights(),
        }
    }
}
