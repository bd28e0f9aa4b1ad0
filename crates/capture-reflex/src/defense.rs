//! Defensive role: chase invaders, otherwise hold the border.

use capture_engine::{Position, Team};

use crate::{
    evaluator::{AgentContext, movement_flags},
    feature::{Feature, FeatureVector},
    oracle::{CaptureView, nearest_distance, visible_invaders},
    projection::Candidate,
    weights::WeightVector,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct DefensiveReflex;

impl DefensiveReflex {
    #[expect(clippy::cast_precision_loss)]
    pub fn extract_features<S>(
        &self,
        me: &AgentContext<'_>,
        candidate: &Candidate<'_, S>,
    ) -> FeatureVector
    where
        S: CaptureView,
    {
        let successor = &candidate.successor;
        let position = candidate.position;
        let mut features = FeatureVector::new();

        let crossed = successor.agent_status(me.agent).is_pacman;
        features.set(Feature::OnDefense, if crossed { 0.0 } else { 1.0 });

        let invaders = visible_invaders(successor, me.team);
        features.set(Feature::NumInvaders, invaders.len() as f32);
        if let Some(distance) = nearest_distance(successor, position, invaders) {
            features.set(Feature::InvaderDistance, distance as f32);
        } else {
            let patrol = patrol_point(candidate.state, me.team, me.start);
            features.set(
                Feature::DistanceToPatrol,
                successor.maze_distance(position, patrol) as f32,
            );
        }

        movement_flags(&mut features, candidate);
        features
    }

    pub fn select_weights<S>(
        &self,
        me: &AgentContext<'_>,
        _candidate: &Candidate<'_, S>,
    ) -> WeightVector
    where
        S: CaptureView,
    {
        me.config.defensive_weights.clone()
    }
}

/// Guard cell on `team`'s border column: the open cell on the median open
/// row (the lower one when their count is even), or `start` when the column
/// is fully walled.
pub fn patrol_point<S>(state: &S, team: Team, start: Position) -> Position
where
    S: CaptureView,
{
    let border = team.border_column(state.width());
    let open_rows: Vec<usize> = (0..state.height())
        .filter(|y| !state.has_wall(Position::new(border, *y)))
        .collect();
    let Some(last) = open_rows.len().checked_sub(1) else {
        return start;
    };
    Position::new(border, open_rows[last / 2])
}
