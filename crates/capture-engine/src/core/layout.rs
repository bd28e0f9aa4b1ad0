use std::collections::{BTreeMap, BTreeSet};

use crate::LayoutError;

use super::geometry::{Direction, Position};

/// Single row of wall occupancy.
///
/// Bit N is set when the cell at `x = N` is a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallRow {
    bits: u64,
}

impl WallRow {
    pub const MAX_WIDTH: usize = u64::BITS as usize;

    #[inline]
    #[must_use]
    pub fn is_wall(self, x: usize) -> bool {
        x < Self::MAX_WIDTH && (self.bits & (1 << x)) != 0
    }

    #[inline]
    fn set_wall(&mut self, x: usize, wall: bool) {
        if wall {
            self.bits |= 1 << x;
        } else {
            self.bits &= !(1 << x);
        }
    }

    #[inline]
    #[must_use]
    pub fn count_walls(self) -> u32 {
        self.bits.count_ones()
    }
}

/// Static description of a capture board.
///
/// Holds walls, the initial food and capsules, and the starting cell of every
/// agent. Layouts are assembled cell by cell; use
/// [`LayoutGenerator`](crate::LayoutGenerator) for ready-made boards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    width: usize,
    height: usize,
    walls: Vec<WallRow>,
    food: BTreeSet<Position>,
    capsules: BTreeSet<Position>,
    agent_starts: BTreeMap<usize, Position>,
}

impl Layout {
    pub fn new(width: usize, height: usize) -> Result<Self, LayoutError> {
        if width > WallRow::MAX_WIDTH {
            return Err(LayoutError::TooWide {
                width,
                max: WallRow::MAX_WIDTH,
            });
        }
        if width < 2 || height == 0 {
            return Err(LayoutError::TooSmall { width, height });
        }
        Ok(Self {
            width,
            height,
            walls: vec![WallRow::default(); height],
            food: BTreeSet::new(),
            capsules: BTreeSet::new(),
            agent_starts: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    fn check_bounds(&self, position: Position) -> Result<(), LayoutError> {
        if self.contains(position) {
            Ok(())
        } else {
            Err(LayoutError::OutOfBounds {
                position,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Cells outside the board count as walls.
    #[must_use]
    pub fn has_wall(&self, position: Position) -> bool {
        self.walls
            .get(position.y)
            .is_none_or(|row| position.x >= self.width || row.is_wall(position.x))
    }

    pub fn set_wall(&mut self, position: Position, wall: bool) -> Result<(), LayoutError> {
        self.check_bounds(position)?;
        self.walls[position.y].set_wall(position.x, wall);
        Ok(())
    }

    /// Surrounds the board with a one-cell wall.
    pub fn enclose(&mut self) {
        let (width, height) = (self.width, self.height);
        for (y, row) in self.walls.iter_mut().enumerate() {
            if y == 0 || y + 1 == height {
                for x in 0..width {
                    row.set_wall(x, true);
                }
            } else {
                row.set_wall(0, true);
                row.set_wall(width - 1, true);
            }
        }
    }

    #[must_use]
    pub fn num_walls(&self) -> u32 {
        self.walls.iter().map(|row| row.count_walls()).sum()
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.width)
            .flat_map(move |x| (0..self.height).map(move |y| Position::new(x, y)))
            .filter(|p| !self.has_wall(*p))
    }

    /// Open cells reachable in one step, in [`Direction::ALL`] order.
    pub fn open_neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::ALL
            .into_iter()
            .filter(|d| *d != Direction::Stop)
            .filter_map(move |d| position.neighbor(d))
            .filter(|p| !self.has_wall(*p))
    }

    pub fn add_food(&mut self, position: Position) -> Result<(), LayoutError> {
        self.check_bounds(position)?;
        self.food.insert(position);
        Ok(())
    }

    pub fn add_capsule(&mut self, position: Position) -> Result<(), LayoutError> {
        self.check_bounds(position)?;
        self.capsules.insert(position);
        Ok(())
    }

    pub fn set_agent_start(&mut self, agent: usize, position: Position) -> Result<(), LayoutError> {
        self.check_bounds(position)?;
        if self.has_wall(position) {
            return Err(LayoutError::StartOnWall { agent, position });
        }
        self.agent_starts.insert(agent, position);
        Ok(())
    }

    #[must_use]
    pub fn food(&self) -> &BTreeSet<Position> {
        &self.food
    }

    #[must_use]
    pub fn capsules(&self) -> &BTreeSet<Position> {
        &self.capsules
    }

    /// Start cells for agents `0..n`, failing on the first gap or walled start.
    pub fn agent_starts(&self) -> Result<Vec<Position>, LayoutError> {
        (0..self.agent_starts.len())
            .map(|agent| {
                let position = *self
                    .agent_starts
                    .get(&agent)
                    .ok_or(LayoutError::MissingAgentStart { agent })?;
                if self.has_wall(position) {
                    return Err(LayoutError::StartOnWall { agent, position });
                }
                Ok(position)
            })
            .collect()
    }
}
