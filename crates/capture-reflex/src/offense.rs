//! Offensive role: a cautious forager.
//!
//! The offensive agent raids the opponent's half for food. Its features
//! describe the projected successor:
//!
//! | feature | value |
//! |---------|-------|
//! | `successor_score` | minus the food left to eat |
//! | `distance_to_food` | nearest safe food, else nearest food; absent once all is eaten |
//! | `ghost_dist` | distance to the nearest dangerous ghost, or the sentinel |
//! | `distance_to_capsule` | distance to the nearest capsule, or the sentinel |
//! | `carrying` | pellets carried before the move |
//! | `home_dist` | distance to the own border column |
//! | `stop`, `reverse` | movement flags |
//! | `on_offense` | progress toward the midline |
//! | `looping` | the move revisits a recent cell too often |
//!
//! Weights come from the [`WeightSchedule`](crate::weights::WeightSchedule)
//! in the agent's configuration.

use capture_engine::{Position, Team};
use tracing::debug;

use crate::{
    evaluator::{AgentContext, movement_flags},
    feature::{Feature, FeatureVector},
    history::PositionHistory,
    oracle::{CaptureView, GhostSighting, nearest_distance},
    projection::Candidate,
    weights::{WeightContext, WeightVector},
};

#[derive(Debug, Clone, Default)]
pub struct OffensiveReflex {
    history: PositionHistory,
}

impl OffensiveReflex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    /// Records the cell the agent is about to occupy.
    pub fn commit(&mut self, position: Position) {
        self.history.push(position);
        debug!(history = ?self.history.iter().collect::<Vec<_>>(), "position history");
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    #[expect(clippy::cast_precision_loss)]
    pub fn extract_features<S>(
        &self,
        me: &AgentContext<'_>,
        candidate: &Candidate<'_, S>,
    ) -> FeatureVector
    where
        S: CaptureView,
    {
        let config = me.config;
        let successor = &candidate.successor;
        let position = candidate.position;
        let mut features = FeatureVector::new();

        features.flag(
            Feature::Looping,
            self.history
                .would_repeat(position, config.loop_repeat_threshold),
        );

        let food = successor.target_food(me.team);
        features.set(Feature::SuccessorScore, -(food.len() as f32));
        if let Some(distance) = food_distance(successor, me, position, &food) {
            features.set(Feature::DistanceToFood, distance as f32);
        }

        let sighting = GhostSighting::observe(successor, me.team, config.scared_threshold);
        let ghost_dist = nearest_distance(successor, position, sighting.dangerous)
            .unwrap_or(config.sentinel_distance);
        features.set(Feature::GhostDist, ghost_dist as f32);

        let capsule_dist = nearest_distance(successor, position, successor.target_capsules(me.team))
            .unwrap_or(config.sentinel_distance);
        features.set(Feature::DistanceToCapsule, capsule_dist as f32);

        let carrying = candidate.state.agent_status(me.agent).carrying;
        features.set(Feature::Carrying, carrying as f32);
        features.set(
            Feature::HomeDist,
            home_distance(successor, me.team, me.start, position) as f32,
        );

        movement_flags(&mut features, candidate);
        features.set(
            Feature::OnOffense,
            midline_progress(me.team, position.x, successor.width()),
        );
        features
    }

    pub fn select_weights<S>(
        &self,
        me: &AgentContext<'_>,
        candidate: &Candidate<'_, S>,
    ) -> WeightVector
    where
        S: CaptureView,
    {
        let config = me.config;
        let sighting =
            GhostSighting::observe(&candidate.successor, me.team, config.scared_threshold);
        let nearest_danger =
            nearest_distance(&candidate.successor, candidate.position, sighting.dangerous)
                .unwrap_or(config.sentinel_distance);
        let context = WeightContext {
            carrying: candidate.state.agent_status(me.agent).carrying,
            nearest_danger,
            scared_ghost_visible: !sighting.scared.is_empty(),
        };
        config.offensive_weights.resolve(&context)
    }
}

/// Distance to the nearest safe food cell, or to the nearest food at all when
/// every cell is unsafe. Cells closer than one step never count as safe.
fn food_distance<S>(
    state: &S,
    me: &AgentContext<'_>,
    position: Position,
    food: &[Position],
) -> Option<u32>
where
    S: CaptureView,
{
    let threats = threatening_ghosts(state, me.team);
    let safe = food
        .iter()
        .filter_map(|cell| {
            let distance = state.maze_distance(position, *cell);
            (distance >= 1 && is_safe(state, &threats, distance, *cell, me.config.safety_margin))
                .then_some(distance)
        })
        .min();
    safe.or_else(|| nearest_distance(state, position, food.iter().copied()))
}

/// Visible ghosts that are not scared at all.
fn threatening_ghosts<S>(state: &S, team: Team) -> Vec<Position>
where
    S: CaptureView,
{
    state
        .opponents(team)
        .into_iter()
        .filter(|opponent| {
            let status = state.agent_status(*opponent);
            !status.is_pacman && status.scared_timer == 0
        })
        .filter_map(|opponent| state.agent_position(opponent))
        .collect()
}

/// A cell is unsafe when some ghost reaches it in fewer than
/// `my_distance + margin` steps.
fn is_safe<S>(state: &S, ghosts: &[Position], my_distance: u32, cell: Position, margin: u32) -> bool
where
    S: CaptureView,
{
    let limit = my_distance.saturating_add(margin);
    ghosts
        .iter()
        .all(|ghost| state.maze_distance(*ghost, cell) >= limit)
}

/// Distance to the nearest open cell of the own border column, falling back
/// to the start cell when that column is fully walled.
pub fn home_distance<S>(state: &S, team: Team, start: Position, position: Position) -> u32
where
    S: CaptureView,
{
    let border = team.border_column(state.width());
    let entries = (0..state.height())
        .map(|y| Position::new(border, y))
        .filter(|cell| !state.has_wall(*cell));
    nearest_distance(state, position, entries)
        .unwrap_or_else(|| state.maze_distance(position, start))
}

/// Midline shaping term, capped at the midline column.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn midline_progress(team: Team, x: usize, width: usize) -> f32 {
    let mid = width / 2;
    match team {
        Team::Red if x < mid => x as f32,
        Team::Blue if x > mid => mid as f32 - x as f32,
        Team::Red | Team::Blue => mid as f32,
    }
}
