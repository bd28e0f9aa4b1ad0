//! Dynamic game state and board generation.
//!
//! - [`GameState`] - Agents, food, capsules, score and the move rules
//! - [`AgentState`] - Per-agent position, role on the board and carried food
//! - [`LayoutGenerator`] - Seeded, mirrored maze boards
//!
//! # Move rules
//!
//! 1. An agent on a cell may step into any open neighbor or stop
//! 2. Scared ghosts move half a cell per action and must finish the step
//! 3. Entering the opponent's half turns the agent into a Pacman that eats food
//!    and capsules; returning home banks the carried food
//! 4. A Pacman touching an unscared ghost is sent home and drops its food

pub use self::{agent_state::*, game_state::*, layout_generator::*};

mod agent_state;
mod game_state;
mod layout_generator;
