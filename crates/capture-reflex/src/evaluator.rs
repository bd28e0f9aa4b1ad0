//! Scoring one candidate move.
//!
//! A move's score is the dot product of the role's feature vector and the
//! role's weight vector for that move:
//!
//! ```text
//! score = Σ features[key] * weights[key]   (over keys present in features)
//! ```
//!
//! There is no normalization. The weight magnitudes alone decide how
//! features trade off, which is why `stop` and `looping` carry weights large
//! enough to veto a move on their own.

use capture_engine::{Direction, Position, Team};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    config::ReflexConfig,
    defense::DefensiveReflex,
    feature::{Feature, FeatureVector},
    offense::OffensiveReflex,
    oracle::CaptureView,
    projection::Candidate,
    weights::WeightVector,
};

#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum AgentRole {
    #[default]
    Offensive,
    Defensive,
}

/// Who is deciding: the fixed facts a feature extractor needs about its agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentContext<'c> {
    pub agent: usize,
    pub team: Team,
    pub start: Position,
    pub config: &'c ReflexConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub action: Direction,
    pub features: FeatureVector,
    pub weights: WeightVector,
    pub score: f32,
}

/// Role-specific extractor and weight selector pair.
#[derive(Debug, Clone)]
pub enum RoleBehavior {
    Offensive(OffensiveReflex),
    Defensive(DefensiveReflex),
}

impl RoleBehavior {
    #[must_use]
    pub fn new(role: AgentRole) -> Self {
        match role {
            AgentRole::Offensive => Self::Offensive(OffensiveReflex::new()),
            AgentRole::Defensive => Self::Defensive(DefensiveReflex),
        }
    }

    #[must_use]
    pub fn role(&self) -> AgentRole {
        match self {
            Self::Offensive(_) => AgentRole::Offensive,
            Self::Defensive(_) => AgentRole::Defensive,
        }
    }

    pub fn extract_features<S>(
        &self,
        me: &AgentContext<'_>,
        candidate: &Candidate<'_, S>,
    ) -> FeatureVector
    where
        S: CaptureView,
    {
        match self {
            Self::Offensive(reflex) => reflex.extract_features(me, candidate),
            Self::Defensive(reflex) => reflex.extract_features(me, candidate),
        }
    }

    pub fn select_weights<S>(
        &self,
        me: &AgentContext<'_>,
        candidate: &Candidate<'_, S>,
    ) -> WeightVector
    where
        S: CaptureView,
    {
        match self {
            Self::Offensive(reflex) => reflex.select_weights(me, candidate),
            Self::Defensive(reflex) => reflex.select_weights(me, candidate),
        }
    }

    pub fn evaluate<S>(&self, me: &AgentContext<'_>, candidate: &Candidate<'_, S>) -> Evaluation
    where
        S: CaptureView,
    {
        let features = self.extract_features(me, candidate);
        let weights = self.select_weights(me, candidate);
        let score = features.dot(&weights);
        trace!(
            agent = me.agent,
            action = %candidate.action,
            %features,
            %weights,
            score,
            "evaluated candidate"
        );
        Evaluation {
            action: candidate.action,
            features,
            weights,
            score,
        }
    }

    /// Records the cell the agent moves to this turn.
    pub fn commit(&mut self, position: Position) {
        match self {
            Self::Offensive(reflex) => reflex.commit(position),
            Self::Defensive(_) => {}
        }
    }

    /// Drops per-game memory before a new game.
    pub fn reset(&mut self) {
        match self {
            Self::Offensive(reflex) => reflex.reset(),
            Self::Defensive(_) => {}
        }
    }
}

/// Sets the `stop` and `reverse` flags shared by both roles.
pub fn movement_flags<S>(features: &mut FeatureVector, candidate: &Candidate<'_, S>)
where
    S: CaptureView,
{
    let facing = candidate.state.agent_status(candidate.agent).direction;
    features.flag(Feature::Stop, candidate.action == Direction::Stop);
    features.flag(Feature::Reverse, candidate.action == facing.reverse());
}

#[cfg(test)]
mod tests {
    use capture_engine::test_util::state_from_rows;

    use super::*;
    use crate::projection::project;

    #[test]
    fn test_role_parses_from_name() {
        assert_eq!("Offensive".parse::<AgentRole>().unwrap(), AgentRole::Offensive);
        assert_eq!("Defensive".parse::<AgentRole>().unwrap(), AgentRole::Defensive);
        assert!("Goalie".parse::<AgentRole>().is_err());
        assert_eq!(AgentRole::Defensive.to_string(), "Defensive");
    }

    #[test]
    fn test_behavior_keeps_role() {
        for role in [AgentRole::Offensive, AgentRole::Defensive] {
            assert_eq!(RoleBehavior::new(role).role(), role);
        }
    }

    #[test]
    fn test_score_is_dot_product() {
        let mut state = state_from_rows(&[
            "%%%%%%%%%%", //
            "%0      1%", //
            "%2      3%", //
            "%%%%%%%%%%",
        ]);
        state.place_agent(2, Position::new(3, 1), Direction::East);
        let config = ReflexConfig::default();
        let me = AgentContext {
            agent: 2,
            team: Team::Red,
            start: Position::new(1, 1),
            config: &config,
        };
        let behavior = RoleBehavior::new(AgentRole::Defensive);
        let candidate = project(&state, 2, Direction::West).unwrap();
        let evaluation = behavior.evaluate(&me, &candidate);
        assert_eq!(evaluation.action, Direction::West);
        assert!((evaluation.features.get(Feature::Reverse) - 1.0).abs() < f32::EPSILON);
        let expected = evaluation.features.dot(&evaluation.weights);
        assert!((evaluation.score - expected).abs() < f32::EPSILON);
        // on_defense 100, reverse -2, patrol (4, 1) is 2 away from (2, 1)
        assert!((evaluation.score - (100.0 - 2.0 - 3.0)).abs() < 1e-4);
    }
}
