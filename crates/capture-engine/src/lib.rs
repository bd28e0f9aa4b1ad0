//! Grid vocabulary and a reference host simulator for capture-the-flag Pacman.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - Static data: grid cells, sub-cell locations, directions, teams,
//!   the wall/food/capsule [`Layout`] and the all-pairs [`Distancer`].
//! - [`engine`] - Dynamic game state: agent bookkeeping, successor generation,
//!   partial observation and a seeded [`LayoutGenerator`].
//!
//! Decision logic lives elsewhere; this crate only answers questions about the
//! maze and applies moves.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

/// Errors raised while building or generating a layout.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LayoutError {
    #[display("position {position} is outside the {width}x{height} board")]
    OutOfBounds {
        position: Position,
        width: usize,
        height: usize,
    },
    #[display("board width {width} exceeds the maximum of {max}")]
    TooWide { width: usize, max: usize },
    #[display("board of {width}x{height} is too small")]
    TooSmall { width: usize, height: usize },
    #[display("start of agent {agent} at {position} is a wall")]
    StartOnWall { agent: usize, position: Position },
    #[display("agent {agent} has no start position")]
    MissingAgentStart { agent: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("agent {agent} cannot take action {action} here")]
pub struct IllegalActionError {
    pub agent: usize,
    pub action: Direction,
}
