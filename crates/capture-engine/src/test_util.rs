//! Fixture helpers for tests.
//!
//! Rows are given north-first: the first string is the top row (`y = height - 1`).
//!
//! | char | meaning |
//! |------|---------|
//! | `%`  | wall |
//! | `.`  | food |
//! | `o`  | capsule |
//! | `0`-`9` | start of the agent with that index |
//! | other | open floor |

use crate::{Direction, GameState, Layout, Location, Position, Team};

/// Builds a layout from ASCII rows.
///
/// # Panics
///
/// Panics on rows of different length or any layout error.
#[must_use]
pub fn layout_from_rows(rows: &[&str]) -> Layout {
    let height = rows.len();
    let width = rows.first().map_or(0, |row| row.len());
    let mut layout = Layout::new(width, height).unwrap();
    for (row_index, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), width, "ragged fixture row {row_index}");
        let y = height - 1 - row_index;
        for (x, ch) in row.chars().enumerate() {
            let position = Position::new(x, y);
            match ch {
                '%' => layout.set_wall(position, true).unwrap(),
                '.' => layout.add_food(position).unwrap(),
                'o' => layout.add_capsule(position).unwrap(),
                '0'..='9' => {
                    let agent = ch as usize - '0' as usize;
                    layout.set_agent_start(agent, position).unwrap();
                }
                _ => {}
            }
        }
    }
    layout
}

/// Builds a running game from ASCII rows with a generous time limit.
#[must_use]
pub fn state_from_rows(rows: &[&str]) -> GameState {
    GameState::new(layout_from_rows(rows), 1200).unwrap()
}

impl GameState {
    /// Teleports `agent` onto `position` facing `direction`, updating its
    /// Pacman flag for the side it lands on.
    pub fn place_agent(&mut self, agent: usize, position: Position, direction: Direction) {
        let width = self.width();
        let state = self.agent_mut(agent);
        state.location = Some(Location::from_cell(position));
        state.direction = direction;
        state.is_pacman = !Team::of_agent(agent).is_home_column(position.x, width);
    }

    pub fn set_carrying(&mut self, agent: usize, carrying: u32) {
        self.agent_mut(agent).num_carrying = carrying;
    }

    pub fn set_scared_timer(&mut self, agent: usize, timer: u32) {
        self.agent_mut(agent).scared_timer = timer;
    }

    pub fn hide_agent(&mut self, agent: usize) {
        self.agent_mut(agent).location = None;
    }
}
