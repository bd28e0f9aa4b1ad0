//! Team creation and a full match between two reflex teams.

use std::sync::Arc;

use capture_engine::{GameState, IllegalActionError, Team};
use serde::Serialize;
use tracing::{debug, info};

use crate::{DecisionError, ReflexAgent, ReflexConfig, evaluator::AgentRole};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum MatchError {
    #[display("agent {agent} failed to decide")]
    Decision {
        agent: usize,
        source: DecisionError,
    },
    #[display("host rejected a chosen action")]
    #[from]
    Illegal(IllegalActionError),
    #[display("agent {agent} is seated in the wrong team or slot")]
    Seating { agent: usize },
    #[display("the layout has {actual} agent starts, expected {expected}")]
    AgentCount { expected: usize, actual: usize },
}

/// Builds the two agents of one team; `first` and `second` must be agent
/// indices of the same colour.
pub fn create_team(
    first: usize,
    second: usize,
    roles: [AgentRole; 2],
    config: &Arc<ReflexConfig>,
    seed: u64,
) -> Result<[ReflexAgent; 2], MatchError> {
    if Team::of_agent(first) != Team::of_agent(second) || first == second {
        return Err(MatchError::Seating { agent: second });
    }
    let [first_role, second_role] = roles;
    Ok([
        ReflexAgent::with_seed(first, first_role, Arc::clone(config), seed),
        ReflexAgent::with_seed(second, second_role, Arc::clone(config), seed.wrapping_add(1)),
    ])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    /// Final score from Red's point of view.
    pub score: i32,
    /// `None` on a draw.
    pub winner: Option<Team>,
    pub moves: u32,
    pub red_returned: u32,
    pub blue_returned: u32,
    pub red_food_left: usize,
    pub blue_food_left: usize,
}

impl MatchOutcome {
    fn from_state(state: &GameState, moves: u32) -> Self {
        let score = state.score();
        let winner = match score {
            s if s > 0 => Some(Team::Red),
            s if s < 0 => Some(Team::Blue),
            _ => None,
        };
        Self {
            score,
            winner,
            moves,
            red_returned: state.total_returned(Team::Red),
            blue_returned: state.total_returned(Team::Blue),
            red_food_left: state.food_attacked_by(Team::Red).count(),
            blue_food_left: state.food_attacked_by(Team::Blue).count(),
        }
    }
}

/// Plays until the game is over or `max_moves` single-agent moves were made.
///
/// Agents act in index order. Each one decides on its own
/// [`GameState::observation`], so hidden opponents stay hidden.
pub fn play_match(
    state: &mut GameState,
    red: &mut [ReflexAgent; 2],
    blue: &mut [ReflexAgent; 2],
    max_moves: u32,
) -> Result<MatchOutcome, MatchError> {
    let seated = red
        .iter()
        .map(|agent| (Team::Red, agent))
        .chain(blue.iter().map(|agent| (Team::Blue, agent)));
    for (team, agent) in seated {
        if agent.team() != team {
            return Err(MatchError::Seating {
                agent: agent.index(),
            });
        }
    }

    let mut seats: Vec<&mut ReflexAgent> = red.iter_mut().chain(blue.iter_mut()).collect();
    seats.sort_by_key(|agent| agent.index());
    if seats.len() != state.num_agents() {
        return Err(MatchError::AgentCount {
            expected: seats.len(),
            actual: state.num_agents(),
        });
    }
    if let Some((_, agent)) = seats
        .iter()
        .enumerate()
        .find(|(slot, agent)| agent.index() != *slot)
    {
        return Err(MatchError::Seating {
            agent: agent.index(),
        });
    }

    for agent in &mut seats {
        let index = agent.index();
        agent
            .register_initial_state(&state.observation(index))
            .map_err(|source| MatchError::Decision { agent: index, source })?;
    }

    let mut moves = 0;
    'game: while !state.is_over() && moves < max_moves {
        for agent in &mut seats {
            if state.is_over() || moves >= max_moves {
                break 'game;
            }
            let index = agent.index();
            let action = agent
                .choose_action(&state.observation(index))
                .map_err(|source| MatchError::Decision { agent: index, source })?;
            state.apply_action(index, action)?;
            moves += 1;
        }
        debug!(moves, score = state.score(), time_left = state.time_left(), "round played");
    }

    let outcome = MatchOutcome::from_state(state, moves);
    info!(
        score = outcome.score,
        winner = ?outcome.winner,
        moves,
        "match finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use capture_engine::LayoutGenerator;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn generated(seed: u64) -> GameState {
        let layout = LayoutGenerator::default()
            .generate(&mut Pcg32::seed_from_u64(seed))
            .unwrap();
        GameState::new(layout, 300).unwrap()
    }

    fn teams(config: &Arc<ReflexConfig>, seed: u64) -> ([ReflexAgent; 2], [ReflexAgent; 2]) {
        let roles = [AgentRole::Offensive, AgentRole::Defensive];
        (
            create_team(0, 2, roles, config, seed).unwrap(),
            create_team(1, 3, roles, config, seed ^ 0xff).unwrap(),
        )
    }

    #[test]
    fn test_create_team_assigns_roles() {
        let config = Arc::new(ReflexConfig::default());
        let [first, second] =
            create_team(1, 3, [AgentRole::Defensive, AgentRole::Offensive], &config, 0).unwrap();
        assert_eq!(first.index(), 1);
        assert_eq!(first.role(), AgentRole::Defensive);
        assert_eq!(second.role(), AgentRole::Offensive);
        assert_eq!(second.team(), Team::Blue);
    }

    #[test]
    fn test_create_team_rejects_mixed_colours() {
        let config = Arc::new(ReflexConfig::default());
        let roles = [AgentRole::Offensive, AgentRole::Defensive];
        assert!(matches!(
            create_team(0, 1, roles, &config, 0),
            Err(MatchError::Seating { agent: 1 })
        ));
    }

    #[test]
    fn test_match_runs_to_time_limit() {
        let config = Arc::new(ReflexConfig::default());
        let mut state = generated(3);
        let (mut red, mut blue) = teams(&config, 3);
        let outcome = play_match(&mut state, &mut red, &mut blue, u32::MAX).unwrap();
        assert!(state.is_over());
        assert!(outcome.moves <= 300);
        assert_eq!(outcome.score, state.score());
        assert_eq!(
            outcome.score,
            i32::try_from(outcome.red_returned).unwrap()
                - i32::try_from(outcome.blue_returned).unwrap()
        );
    }

    #[test]
    fn test_match_is_reproducible() {
        let config = Arc::new(ReflexConfig::default());
        let run = || {
            let mut state = generated(5);
            let (mut red, mut blue) = teams(&config, 5);
            play_match(&mut state, &mut red, &mut blue, 200).unwrap()
        };
        let first = run();
        assert_eq!(first, run());
        assert!(first.moves <= 200);
    }

    #[test]
    fn test_swapped_teams_are_rejected() {
        let config = Arc::new(ReflexConfig::default());
        let mut state = generated(1);
        let (mut red, mut blue) = teams(&config, 1);
        assert!(matches!(
            play_match(&mut state, &mut blue, &mut red, 10),
            Err(MatchError::Seating { .. })
        ));
    }
}
