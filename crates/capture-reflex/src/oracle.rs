//! The seam between decision logic and the host game.
//!
//! [`CaptureView`] lists everything the reflex agents ask of a game state.
//! The host owns the rules; the agents only read positions, distances and
//! food, and request successors for candidate moves.

use arrayvec::ArrayVec;
use capture_engine::{Direction, GameState, Position, Team};

/// Snapshot of one agent as the host reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentStatus {
    /// On the opponent's half, acting as a Pacman.
    pub is_pacman: bool,
    pub carrying: u32,
    pub scared_timer: u32,
    pub direction: Direction,
    /// Exactly on a grid cell rather than between two.
    pub is_aligned: bool,
}

pub trait CaptureView: Sized {
    fn legal_actions(&self, agent: usize) -> ArrayVec<Direction, 5>;

    /// State after `agent` takes `action`, or `None` if the host rejects it.
    fn successor(&self, agent: usize, action: Direction) -> Option<Self>;

    /// Cell of `agent`, `None` when it is not visible.
    fn agent_position(&self, agent: usize) -> Option<Position>;

    fn agent_status(&self, agent: usize) -> AgentStatus;

    fn maze_distance(&self, from: Position, to: Position) -> u32;

    /// Food `team` is trying to eat.
    fn target_food(&self, team: Team) -> Vec<Position>;

    /// Capsules `team` can eat.
    fn target_capsules(&self, team: Team) -> Vec<Position>;

    fn has_wall(&self, position: Position) -> bool;

    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn opponents(&self, team: Team) -> Vec<usize>;
}

impl CaptureView for GameState {
    fn legal_actions(&self, agent: usize) -> ArrayVec<Direction, 5> {
        GameState::legal_actions(self, agent)
    }

    fn successor(&self, agent: usize, action: Direction) -> Option<Self> {
        self.generate_successor(agent, action).ok()
    }

    fn agent_position(&self, agent: usize) -> Option<Position> {
        GameState::agent_position(self, agent)
    }

    fn agent_status(&self, agent: usize) -> AgentStatus {
        let state = self.agent_state(agent);
        AgentStatus {
            is_pacman: state.is_pacman(),
            carrying: state.num_carrying(),
            scared_timer: state.scared_timer(),
            direction: state.direction(),
            is_aligned: state.is_aligned(),
        }
    }

    fn maze_distance(&self, from: Position, to: Position) -> u32 {
        GameState::maze_distance(self, from, to)
    }

    fn target_food(&self, team: Team) -> Vec<Position> {
        self.food_attacked_by(team).collect()
    }

    fn target_capsules(&self, team: Team) -> Vec<Position> {
        self.capsules_attacked_by(team).collect()
    }

    fn has_wall(&self, position: Position) -> bool {
        GameState::has_wall(self, position)
    }

    fn width(&self) -> usize {
        GameState::width(self)
    }

    fn height(&self) -> usize {
        GameState::height(self)
    }

    fn opponents(&self, team: Team) -> Vec<usize> {
        team.opponent().agents(self.num_agents()).collect()
    }
}

/// Visible opponents standing on their own half, split by threat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GhostSighting {
    pub dangerous: Vec<Position>,
    pub scared: Vec<Position>,
}

impl GhostSighting {
    /// Ghosts whose scare timer exceeds `scared_threshold` go to `scared`.
    pub fn observe<S>(state: &S, team: Team, scared_threshold: u32) -> Self
    where
        S: CaptureView,
    {
        let mut sighting = Self::default();
        for opponent in state.opponents(team) {
            let Some(position) = state.agent_position(opponent) else {
                continue;
            };
            let status = state.agent_status(opponent);
            if status.is_pacman {
                continue;
            }
            if status.scared_timer > scared_threshold {
                sighting.scared.push(position);
            } else {
                sighting.dangerous.push(position);
            }
        }
        sighting
    }
}

/// Visible opponents currently raiding `team`'s half.
pub fn visible_invaders<S>(state: &S, team: Team) -> Vec<Position>
where
    S: CaptureView,
{
    state
        .opponents(team)
        .into_iter()
        .filter(|opponent| state.agent_status(*opponent).is_pacman)
        .filter_map(|opponent| state.agent_position(opponent))
        .collect()
}

/// Smallest maze distance from `from` to any of `targets`.
pub fn nearest_distance<S, I>(state: &S, from: Position, targets: I) -> Option<u32>
where
    S: CaptureView,
    I: IntoIterator<Item = Position>,
{
    targets
        .into_iter()
        .map(|target| state.maze_distance(from, target))
        .min()
}
