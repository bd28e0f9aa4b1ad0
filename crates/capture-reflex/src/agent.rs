//! Action selection: the per-turn decision of one agent.
//!
//! Each turn [`ReflexAgent::choose_action`] projects every legal action to a
//! grid-aligned successor and then picks one of two ways:
//!
//! 1. **End-game** - when at most [`ReflexConfig::endgame_food`] target
//!    pellets remain, scores are ignored and the first action whose successor
//!    is closest to the start cell wins
//! 2. **Normal** - every action is scored by the role's
//!    [`RoleBehavior`], and one of the best-scoring actions is drawn uniformly
//!    at random
//!
//! The agent's only memory across turns is its start cell and, for the
//! offensive role, the recent-position history.

use std::sync::Arc;

use capture_engine::{Direction, Position, Team};
use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;
use tracing::{debug, info};

use crate::{
    config::ReflexConfig,
    evaluator::{AgentContext, AgentRole, RoleBehavior},
    oracle::CaptureView,
    projection::{Candidate, project},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DecisionError {
    #[display("agent {agent} has no legal actions")]
    NoLegalActions { agent: usize },
    #[display("agent {agent} was asked to act before being initialized")]
    NotInitialized { agent: usize },
    #[display("agent {agent} cannot see itself")]
    NotVisible { agent: usize },
    #[display("host rejected action {action} for agent {agent}")]
    IllegalSuccessor { agent: usize, action: Direction },
}

#[derive(Debug, Clone)]
pub struct ReflexAgent {
    index: usize,
    team: Team,
    start: Option<Position>,
    behavior: RoleBehavior,
    config: Arc<ReflexConfig>,
    rng: Pcg32,
}

impl ReflexAgent {
    /// Creates an agent with a random tie-break seed.
    #[must_use]
    pub fn new(index: usize, role: AgentRole, config: Arc<ReflexConfig>) -> Self {
        Self::with_seed(index, role, config, rand::rng().random())
    }

    /// Like [`Self::new`], but with reproducible tie-breaking.
    #[must_use]
    pub fn with_seed(index: usize, role: AgentRole, config: Arc<ReflexConfig>, seed: u64) -> Self {
        Self {
            index,
            team: Team::of_agent(index),
            start: None,
            behavior: RoleBehavior::new(role),
            config,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn team(&self) -> Team {
        self.team
    }

    #[must_use]
    pub fn role(&self) -> AgentRole {
        self.behavior.role()
    }

    #[must_use]
    pub fn start(&self) -> Option<Position> {
        self.start
    }

    #[must_use]
    pub fn behavior(&self) -> &RoleBehavior {
        &self.behavior
    }

    #[must_use]
    pub fn config(&self) -> &ReflexConfig {
        &self.config
    }

    pub fn initialize(&mut self, start: Position) {
        debug!(agent = self.index, role = %self.role(), %start, "agent initialized");
        self.start = Some(start);
        self.behavior.reset();
    }

    /// Takes the start cell from the agent's position in the initial state.
    pub fn register_initial_state<S>(&mut self, state: &S) -> Result<(), DecisionError>
    where
        S: CaptureView,
    {
        let start = state
            .agent_position(self.index)
            .ok_or(DecisionError::NotVisible { agent: self.index })?;
        self.initialize(start);
        Ok(())
    }

    pub fn choose_action<S>(&mut self, state: &S) -> Result<Direction, DecisionError>
    where
        S: CaptureView,
    {
        let agent = self.index;
        let start = self.start.ok_or(DecisionError::NotInitialized { agent })?;
        let candidates = state
            .legal_actions(agent)
            .into_iter()
            .map(|action| project(state, agent, action))
            .collect::<Result<Vec<_>, _>>()?;
        if candidates.is_empty() {
            return Err(DecisionError::NoLegalActions { agent });
        }

        let food_left = state.target_food(self.team).len();
        let chosen = if food_left <= self.config.endgame_food {
            let chosen = nearest_to(state, &candidates, start)
                .ok_or(DecisionError::NoLegalActions { agent })?;
            info!(agent, food_left, action = %chosen.action, "end-game: heading home");
            chosen
        } else {
            let me = AgentContext {
                agent,
                team: self.team,
                start,
                config: &self.config,
            };
            let scores: Vec<f32> = candidates
                .iter()
                .map(|candidate| self.behavior.evaluate(&me, candidate).score)
                .collect();
            for (candidate, score) in candidates.iter().zip(&scores) {
                debug!(agent, action = %candidate.action, score, "action score");
            }
            let best = scores
                .iter()
                .copied()
                .max_by(f32::total_cmp)
                .ok_or(DecisionError::NoLegalActions { agent })?;
            let ties: Vec<&Candidate<'_, S>> = candidates
                .iter()
                .zip(&scores)
                .filter(|(_, score)| score.total_cmp(&best).is_eq())
                .map(|(candidate, _)| candidate)
                .collect();
            *ties
                .choose(&mut self.rng)
                .ok_or(DecisionError::NoLegalActions { agent })?
        };

        let (action, position) = (chosen.action, chosen.position);
        self.behavior.commit(position);
        Ok(action)
    }
}

/// First candidate whose successor is closest to `start`.
fn nearest_to<'c, 's, S>(
    state: &S,
    candidates: &'c [Candidate<'s, S>],
    start: Position,
) -> Option<&'c Candidate<'s, S>>
where
    S: CaptureView,
{
    candidates
        .iter()
        .min_by_key(|candidate| state.maze_distance(candidate.position, start))
}
