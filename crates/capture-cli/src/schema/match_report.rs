use capture_reflex::{AgentRole, team::MatchOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of one `play-match` run with everything needed to replay it.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    /// Timestamp when the match finished (ISO 8601 format)
    pub played_at: DateTime<Utc>,
    /// Seed of the layout generator; agent tie-break seeds derive from it
    pub seed: u64,
    pub layout: LayoutInfo,
    pub time_limit: u32,
    /// Roles of agents 0 and 2
    pub red_roles: [AgentRole; 2],
    /// Roles of agents 1 and 3
    pub blue_roles: [AgentRole; 2],
    pub outcome: MatchOutcome,
}

/// Generator parameters of the played layout.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutInfo {
    pub width: usize,
    pub height: usize,
    pub food_per_side: usize,
    pub capsules_per_side: usize,
}
