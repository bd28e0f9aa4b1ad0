use serde::{Deserialize, Serialize};

/// A grid cell. `y` grows northward, `x` grows eastward.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn manhattan_distance(self, other: Self) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns the adjacent cell in `direction`, or `None` when it would leave
    /// the non-negative quadrant.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.offset();
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

/// Sub-cell location measured in half cells.
///
/// Agents normally move a whole cell per action, but scared ghosts move at half
/// speed and spend every other turn between two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    hx: usize,
    hy: usize,
}

impl Location {
    pub const HALF_STEPS_PER_CELL: usize = 2;

    #[must_use]
    pub const fn from_cell(position: Position) -> Self {
        Self {
            hx: position.x * Self::HALF_STEPS_PER_CELL,
            hy: position.y * Self::HALF_STEPS_PER_CELL,
        }
    }

    #[must_use]
    pub fn is_aligned(self) -> bool {
        self.hx % Self::HALF_STEPS_PER_CELL == 0 && self.hy % Self::HALF_STEPS_PER_CELL == 0
    }

    /// Returns the cell this location sits on, if it is aligned to one.
    #[must_use]
    pub fn cell(self) -> Option<Position> {
        self.is_aligned().then(|| {
            Position::new(
                self.hx / Self::HALF_STEPS_PER_CELL,
                self.hy / Self::HALF_STEPS_PER_CELL,
            )
        })
    }

    /// Rounds half-way locations up, toward the larger coordinate.
    #[must_use]
    pub fn nearest_cell(self) -> Position {
        Position::new(
            self.hx.div_ceil(Self::HALF_STEPS_PER_CELL),
            self.hy.div_ceil(Self::HALF_STEPS_PER_CELL),
        )
    }

    #[must_use]
    pub fn step(self, direction: Direction, half_steps: usize) -> Option<Self> {
        let (dx, dy) = direction.offset();
        let scale = isize::try_from(half_steps).ok()?;
        Some(Self {
            hx: self.hx.checked_add_signed(dx * scale)?,
            hy: self.hy.checked_add_signed(dy * scale)?,
        })
    }

    /// Manhattan distance in half cells.
    #[must_use]
    pub fn half_distance(self, other: Self) -> usize {
        self.hx.abs_diff(other.hx) + self.hy.abs_diff(other.hy)
    }
}

impl From<Position> for Location {
    fn from(position: Position) -> Self {
        Self::from_cell(position)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Stop,
}

impl Direction {
    /// Enumeration order used for legal action lists.
    pub const ALL: [Self; 5] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::Stop,
    ];

    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::Stop => Self::Stop,
        }
    }

    #[must_use]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::Stop => (0, 0),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    /// Even agent indices play for Red, odd ones for Blue.
    #[must_use]
    pub const fn of_agent(agent: usize) -> Self {
        if agent % 2 == 0 { Self::Red } else { Self::Blue }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Red defends the west half, Blue the east half.
    #[must_use]
    pub const fn is_home_column(self, x: usize, width: usize) -> bool {
        let mid = width / 2;
        match self {
            Self::Red => x < mid,
            Self::Blue => x >= mid,
        }
    }

    /// The home column adjacent to the midline.
    #[must_use]
    pub const fn border_column(self, width: usize) -> usize {
        let mid = width / 2;
        match self {
            Self::Red => mid - 1,
            Self::Blue => mid,
        }
    }

    /// Sign applied to points this team scores; the shared score favors Red.
    #[must_use]
    pub const fn score_sign(self) -> i32 {
        match self {
            Self::Red => 1,
            Self::Blue => -1,
        }
    }

    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Blue => 1,
        }
    }

    pub fn agents(self, num_agents: usize) -> impl Iterator<Item = usize> {
        (0..num_agents).filter(move |agent| Self::of_agent(*agent) == self)
    }
}
