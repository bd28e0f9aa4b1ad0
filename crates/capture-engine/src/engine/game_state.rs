use std::{
    collections::{BTreeSet, VecDeque},
    sync::Arc,
};

use arrayvec::ArrayVec;

use crate::{
    IllegalActionError, LayoutError,
    core::{Direction, Distancer, Layout, Location, Position, Team},
};

use super::agent_state::AgentState;

/// Moves a capsule keeps the opposing team scared.
pub const SCARED_TIME: u32 = 40;
/// Manhattan radius within which teammates reveal an opponent.
pub const SIGHT_RANGE: usize = 5;
/// The game ends once a team has returned all but this many pellets.
pub const MIN_FOOD: usize = 2;
/// Half-cell distance at or below which a Pacman and a ghost collide.
const COLLISION_HALF_DISTANCE: usize = 1;

/// Full state of a capture game between two teams.
///
/// Layout and distance table are shared between successors; everything else
/// is cloned on each [`GameState::generate_successor`].
#[derive(Debug, Clone)]
pub struct GameState {
    layout: Arc<Layout>,
    distancer: Arc<Distancer>,
    food: BTreeSet<Position>,
    capsules: BTreeSet<Position>,
    agents: Vec<AgentState>,
    initial_target_food: [usize; 2],
    score: i32,
    time_left: u32,
}

impl GameState {
    pub fn new(layout: Layout, time_limit: u32) -> Result<Self, LayoutError> {
        let agents = layout
            .agent_starts()?
            .into_iter()
            .map(AgentState::new)
            .collect();
        let distancer = Distancer::new(&layout);
        let food = layout.food().clone();
        let capsules = layout.capsules().clone();
        let mut state = Self {
            layout: Arc::new(layout),
            distancer: Arc::new(distancer),
            food,
            capsules,
            agents,
            initial_target_food: [0; 2],
            score: 0,
            time_left: time_limit,
        };
        for team in [Team::Red, Team::Blue] {
            state.initial_target_food[team.slot()] = state.food_attacked_by(team).count();
        }
        Ok(state)
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.layout.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.layout.height()
    }

    #[must_use]
    pub fn has_wall(&self, position: Position) -> bool {
        self.layout.has_wall(position)
    }

    #[must_use]
    pub fn maze_distance(&self, from: Position, to: Position) -> u32 {
        self.distancer.maze_distance(from, to)
    }

    #[must_use]
    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn agent_state(&self, agent: usize) -> &AgentState {
        &self.agents[agent]
    }

    #[cfg(any(test, feature = "test-util"))]
    pub(crate) fn agent_mut(&mut self, agent: usize) -> &mut AgentState {
        &mut self.agents[agent]
    }

    #[must_use]
    pub fn agent_position(&self, agent: usize) -> Option<Position> {
        self.agents[agent].position()
    }

    /// Score from Red's point of view.
    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }

    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Food on the opponent's half, which `team` is trying to eat.
    pub fn food_attacked_by(&self, team: Team) -> impl Iterator<Item = Position> + '_ {
        let width = self.width();
        self.food
            .iter()
            .copied()
            .filter(move |p| !team.is_home_column(p.x, width))
    }

    /// Capsules on the opponent's half.
    pub fn capsules_attacked_by(&self, team: Team) -> impl Iterator<Item = Position> + '_ {
        let width = self.width();
        self.capsules
            .iter()
            .copied()
            .filter(move |p| !team.is_home_column(p.x, width))
    }

    #[must_use]
    pub fn total_returned(&self, team: Team) -> u32 {
        team.agents(self.num_agents())
            .map(|agent| self.agents[agent].num_returned)
            .sum()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        if self.time_left == 0 {
            return true;
        }
        [Team::Red, Team::Blue].into_iter().any(|team| {
            let needed = self.initial_target_food[team.slot()].saturating_sub(MIN_FOOD);
            needed > 0 && self.total_returned(team) as usize >= needed
        })
    }

    /// Actions available to `agent`, in [`Direction::ALL`] order.
    ///
    /// An agent between two cells can only keep going; a hidden agent has no
    /// actions.
    #[must_use]
    pub fn legal_actions(&self, agent: usize) -> ArrayVec<Direction, 5> {
        let state = &self.agents[agent];
        let mut actions = ArrayVec::new();
        let Some(location) = state.location else {
            return actions;
        };
        let Some(cell) = location.cell() else {
            actions.push(state.direction);
            return actions;
        };
        for direction in Direction::ALL {
            let open = match direction {
                Direction::Stop => true,
                _ => cell
                    .neighbor(direction)
                    .is_some_and(|next| !self.has_wall(next)),
            };
            if open {
                actions.push(direction);
            }
        }
        actions
    }

    pub fn generate_successor(
        &self,
        agent: usize,
        action: Direction,
    ) -> Result<Self, IllegalActionError> {
        let mut next = self.clone();
        next.apply_action(agent, action)?;
        Ok(next)
    }

    pub fn apply_action(&mut self, agent: usize, action: Direction) -> Result<(), IllegalActionError> {
        if !self.legal_actions(agent).contains(&action) {
            return Err(IllegalActionError { agent, action });
        }
        let state = &mut self.agents[agent];
        let location = state
            .location
            .ok_or(IllegalActionError { agent, action })?;
        let half_steps = if !state.is_pacman && state.scared_timer > 0 {
            1
        } else {
            Location::HALF_STEPS_PER_CELL
        };
        let next = location
            .step(action, half_steps)
            .ok_or(IllegalActionError { agent, action })?;
        state.location = Some(next);
        state.direction = action;

        if let Some(cell) = next.cell() {
            self.enter_cell(agent, cell);
        }
        self.resolve_collisions(agent);

        let state = &mut self.agents[agent];
        if state.scared_timer > 0 {
            state.scared_timer -= 1;
            if state.scared_timer == 0 {
                state.location = state.location.map(|l| Location::from_cell(l.nearest_cell()));
            }
        }
        self.time_left = self.time_left.saturating_sub(1);
        Ok(())
    }

    fn enter_cell(&mut self, agent: usize, cell: Position) {
        let team = Team::of_agent(agent);
        let width = self.width();
        let num_agents = self.num_agents();
        let state = &mut self.agents[agent];
        state.is_pacman = !team.is_home_column(cell.x, width);

        if state.is_pacman {
            if self.food.remove(&cell) {
                state.num_carrying += 1;
            }
            if self.capsules.remove(&cell) {
                for opponent in team.opponent().agents(num_agents) {
                    self.agents[opponent].scared_timer = SCARED_TIME;
                }
            }
        } else if state.num_carrying > 0 {
            let carried = state.num_carrying;
            state.num_returned += carried;
            state.num_carrying = 0;
            self.score += team.score_sign() * i32::try_from(carried).unwrap_or(i32::MAX);
        }
    }

    fn resolve_collisions(&mut self, agent: usize) {
        let team = Team::of_agent(agent);
        let Some(location) = self.agents[agent].location else {
            return;
        };
        for opponent in team.opponent().agents(self.num_agents()) {
            let other = &self.agents[opponent];
            let Some(other_location) = other.location else {
                continue;
            };
            if location.half_distance(other_location) > COLLISION_HALF_DISTANCE {
                continue;
            }
            let me = &self.agents[agent];
            let (pacman, ghost) = match (me.is_pacman, other.is_pacman) {
                (true, false) => (agent, opponent),
                (false, true) => (opponent, agent),
                _ => continue,
            };
            if self.agents[ghost].scared_timer > 0 {
                self.agents[ghost].respawn();
            } else {
                self.drop_food(pacman);
                self.agents[pacman].respawn();
            }
            if self.agents[agent].location != Some(location) {
                // the mover itself was sent home
                break;
            }
        }
    }

    /// Scatters the carried food of `agent` onto the nearest free cells of
    /// the half it was raiding.
    fn drop_food(&mut self, agent: usize) {
        let mut remaining = self.agents[agent].num_carrying;
        let Some(origin) = self.agents[agent].position() else {
            return;
        };
        let team = Team::of_agent(agent);
        let width = self.width();
        let mut visited = BTreeSet::from([origin]);
        let mut queue = VecDeque::from([origin]);
        while remaining > 0 {
            let Some(cell) = queue.pop_front() else {
                break;
            };
            if !team.is_home_column(cell.x, width)
                && !self.food.contains(&cell)
                && !self.capsules.contains(&cell)
            {
                self.food.insert(cell);
                remaining -= 1;
            }
            for next in self.layout.open_neighbors(cell) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        self.agents[agent].num_carrying = 0;
    }

    /// What `agent` is allowed to see: opponents farther than
    /// [`SIGHT_RANGE`] from every teammate lose their location.
    #[must_use]
    pub fn observation(&self, agent: usize) -> Self {
        let team = Team::of_agent(agent);
        let mut observed = self.clone();
        let watchers: Vec<Position> = team
            .agents(self.num_agents())
            .filter_map(|mate| self.agent_position(mate))
            .collect();
        for opponent in team.opponent().agents(self.num_agents()) {
            let Some(position) = self.agent_position(opponent) else {
                continue;
            };
            let seen = watchers
                .iter()
                .any(|w| w.manhattan_distance(position) <= SIGHT_RANGE);
            if !seen {
                observed.agents[opponent].location = None;
            }
        }
        observed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::layout_from_rows;

    fn corridor() -> GameState {
        // Red (0, 2) on the west half, Blue (1, 3) on the east half.
        let layout = layout_from_rows(&[
            "%%%%%%%%%%", //
            "%0  . . 1%", //
            "%2 o   .3%", //
            "%%%%%%%%%%",
        ]);
        GameState::new(layout, 100).unwrap()
    }

    #[test]
    fn test_initial_food_split() {
        let state = corridor();
        assert_eq!(state.food_attacked_by(Team::Red).count(), 2);
        assert_eq!(state.food_attacked_by(Team::Blue).count(), 1);
        assert_eq!(state.capsules_attacked_by(Team::Blue).count(), 1);
        assert_eq!(state.capsules_attacked_by(Team::Red).count(), 0);
    }

    #[test]
    fn test_legal_actions_follow_walls() {
        let state = corridor();
        let actions = state.legal_actions(0);
        assert_eq!(actions.as_slice(), &[Direction::South, Direction::East, Direction::Stop]);
    }

    #[test]
    fn test_eat_and_return_food() {
        let mut state = corridor();
        for _ in 0..4 {
            state.apply_action(0, Direction::East).unwrap();
        }
        // x = 5 is the first enemy column; food sits at (4, 2) on the red half,
        // so nothing has been eaten yet.
        assert!(state.agent_state(0).is_pacman());
        assert_eq!(state.agent_state(0).num_carrying(), 0);
        state.apply_action(0, Direction::East).unwrap();
        state.apply_action(0, Direction::East).unwrap();
        assert_eq!(state.agent_position(0), Some(Position::new(7, 2)));
        assert_eq!(state.agent_state(0).num_carrying(), 1);

        for _ in 0..3 {
            state.apply_action(0, Direction::West).unwrap();
        }
        assert!(!state.agent_state(0).is_pacman());
        assert_eq!(state.agent_state(0).num_carrying(), 0);
        assert_eq!(state.score(), 1);
        assert_eq!(state.total_returned(Team::Red), 1);
    }

    #[test]
    fn test_capsule_scares_and_halves_speed() {
        let mut state = corridor();
        // Blue agent 3 walks west onto the capsule at (3, 1).
        for _ in 0..5 {
            state.apply_action(3, Direction::West).unwrap();
        }
        assert_eq!(state.agent_position(3), Some(Position::new(3, 1)));
        assert_eq!(state.agent_state(0).scared_timer(), SCARED_TIME);
        assert_eq!(state.agent_state(2).scared_timer(), SCARED_TIME);

        let before = state.agent_state(0).location().unwrap();
        state.apply_action(0, Direction::East).unwrap();
        let after = state.agent_state(0).location().unwrap();
        assert!(!after.is_aligned());
        assert_eq!(before.half_distance(after), 1);
        assert_eq!(state.legal_actions(0).as_slice(), &[Direction::East]);
    }

    #[test]
    fn test_ghost_eats_pacman() {
        let mut state = corridor();
        // Red agent 2 raids east; blue agent 3 waits at (8, 1).
        for _ in 0..5 {
            state.apply_action(2, Direction::East).unwrap();
        }
        assert_eq!(state.agent_position(2), Some(Position::new(6, 1)));
        assert!(state.agent_state(2).is_pacman());
        state.apply_action(2, Direction::East).unwrap();
        assert_eq!(state.agent_state(2).num_carrying(), 1);
        state.apply_action(2, Direction::East).unwrap();
        // collided with the ghost at (8, 1): back to start, food dropped
        assert_eq!(state.agent_position(2), Some(Position::new(1, 1)));
        assert_eq!(state.agent_state(2).num_carrying(), 0);
        assert_eq!(state.food_attacked_by(Team::Red).count(), 2);
    }

    #[test]
    fn test_illegal_action_rejected() {
        let state = corridor();
        assert_eq!(
            state.generate_successor(0, Direction::North).unwrap_err(),
            IllegalActionError {
                agent: 0,
                action: Direction::North
            }
        );
    }

    #[test]
    fn test_observation_hides_distant_opponents() {
        let state = corridor();
        let observed = state.observation(0);
        assert_eq!(observed.agent_position(1), None);
        assert_eq!(observed.agent_position(0), Some(Position::new(1, 2)));
        assert!(observed.legal_actions(1).is_empty());
    }

    #[test]
    fn test_game_over_when_time_runs_out() {
        let mut state = corridor();
        state.time_left = 1;
        assert!(!state.is_over());
        state.apply_action(0, Direction::Stop).unwrap();
        assert!(state.is_over());
    }
}
