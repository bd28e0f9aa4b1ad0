use crate::core::{Direction, Location, Position};

/// Per-agent dynamic state.
///
/// An agent is a *Pacman* while it stands on the opponent's half and a *ghost*
/// while at home. `location` is `None` in observations where the agent is out
/// of sight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentState {
    pub(crate) start: Position,
    pub(crate) location: Option<Location>,
    pub(crate) direction: Direction,
    pub(crate) is_pacman: bool,
    pub(crate) num_carrying: u32,
    pub(crate) num_returned: u32,
    pub(crate) scared_timer: u32,
}

impl AgentState {
    pub(crate) fn new(start: Position) -> Self {
        Self {
            start,
            location: Some(Location::from_cell(start)),
            direction: Direction::Stop,
            is_pacman: false,
            num_carrying: 0,
            num_returned: 0,
            scared_timer: 0,
        }
    }

    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Cell the agent occupies, rounding mid-step locations.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.location.map(Location::nearest_cell)
    }

    /// Whether the agent is exactly on a grid cell. Hidden agents are not.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.location.is_some_and(Location::is_aligned)
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn is_pacman(&self) -> bool {
        self.is_pacman
    }

    #[must_use]
    pub fn num_carrying(&self) -> u32 {
        self.num_carrying
    }

    #[must_use]
    pub fn num_returned(&self) -> u32 {
        self.num_returned
    }

    #[must_use]
    pub fn scared_timer(&self) -> u32 {
        self.scared_timer
    }

    pub(crate) fn respawn(&mut self) {
        self.location = Some(Location::from_cell(self.start));
        self.direction = Direction::Stop;
        self.is_pacman = false;
        self.num_carrying = 0;
        self.scared_timer = 0;
    }
}
