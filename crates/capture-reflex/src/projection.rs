//! Successor projection onto the grid.
//!
//! Some agents cover only half a cell per action. Features assume the mover
//! sits on a cell, so a half-step successor gets the same action applied once
//! more before anything is measured.

use capture_engine::{Direction, Position};

use crate::{agent::DecisionError, oracle::CaptureView};

/// One legal action of the current state together with its grid-aligned
/// successor.
#[derive(Debug, Clone)]
pub struct Candidate<'a, S> {
    pub state: &'a S,
    pub agent: usize,
    pub action: Direction,
    pub successor: S,
    /// Cell of the moving agent in `successor`.
    pub position: Position,
}

pub fn project<S>(
    state: &S,
    agent: usize,
    action: Direction,
) -> Result<Candidate<'_, S>, DecisionError>
where
    S: CaptureView,
{
    let illegal = DecisionError::IllegalSuccessor { agent, action };
    let mut successor = state.successor(agent, action).ok_or(illegal)?;
    if !successor.agent_status(agent).is_aligned {
        successor = successor.successor(agent, action).ok_or(illegal)?;
    }
    let position = successor
        .agent_position(agent)
        .ok_or(DecisionError::NotVisible { agent })?;
    Ok(Candidate {
        state,
        agent,
        action,
        successor,
        position,
    })
}
