//! Reflex decision logic for capture-the-flag Pacman agents.
//!
//! Every turn an agent scores each legal move with a weighted linear
//! combination of hand-designed features and takes the best one. Nothing is
//! searched or learned: decisions are single-step and greedy.
//!
//! # Architecture
//!
//! ```text
//! Action Selection (ReflexAgent::choose_action)
//!     ↓ for each legal action
//! Projection (successor snapped to a grid cell)
//!     ↓
//! Evaluation (features · weights)
//!     ↓ uses
//! Feature Extraction + Weight Selection (per role)
//!     ↓ queries
//! CaptureView (maze distances, food, agents)
//! ```
//!
//! # Roles
//!
//! - [`offense`] - Forages enemy food, avoids ghosts, reaches for capsules when
//!   cornered and heads home once it carries enough
//! - [`defense`] - Chases visible invaders, otherwise guards a patrol cell on
//!   the border column
//!
//! Both roles share the same capability pair (extract features, select
//! weights) and are dispatched through [`evaluator::RoleBehavior`].
//!
//! # Weight Cascade
//!
//! Offensive weights are a base vector overwritten by an ordered list of
//! conditional stages (see [`weights::WeightSchedule`]). Later stages win on
//! overlapping keys, so a stage can zero out an earlier incentive entirely.
//!
//! # Supporting Modules
//!
//! - [`oracle`] - The [`CaptureView`](oracle::CaptureView) seam to the host game
//! - [`projection`] - Successor normalization for half-step movement
//! - [`history`] - Fixed-capacity ring buffer for loop detection
//! - [`config`] - Tunable constants and weight tables
//! - [`team`] - Team creation and a full match runner

pub mod agent;
pub mod config;
pub mod defense;
pub mod evaluator;
pub mod feature;
pub mod history;
pub mod offense;
pub mod oracle;
pub mod projection;
pub mod team;
pub mod weights;

pub use self::{
    agent::{DecisionError, ReflexAgent},
    config::ReflexConfig,
    evaluator::AgentRole,
};
