use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use capture_engine::{GameState, LayoutGenerator};
use capture_reflex::{
    AgentRole, ReflexConfig,
    team::{create_team, play_match},
};
use chrono::Utc;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use tracing::info;

use crate::{
    schema::match_report::{LayoutInfo, MatchReport},
    util::{Output, read_config_file},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayMatchArg {
    /// Seed for the layout and the agents' tie-breaks [default: random]
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 32)]
    width: usize,
    #[arg(long, default_value_t = 16)]
    height: usize,
    /// Food pellets on each half
    #[arg(long, default_value_t = 20)]
    food: usize,
    /// Power capsules on each half
    #[arg(long, default_value_t = 1)]
    capsules: usize,
    /// Moves before the game ends, counted over all agents
    #[arg(long, default_value_t = 1200)]
    time_limit: u32,
    /// Partial agent config in JSON; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Roles of Red agents 0 and 2
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [AgentRole::Offensive, AgentRole::Defensive]
    )]
    red_roles: Vec<AgentRole>,
    /// Roles of Blue agents 1 and 3
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [AgentRole::Offensive, AgentRole::Defensive]
    )]
    blue_roles: Vec<AgentRole>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayMatchArg) -> anyhow::Result<()> {
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let config = match &arg.config {
        Some(path) => read_config_file(path)?,
        None => ReflexConfig::default(),
    };
    let config = Arc::new(config);
    let red_roles = role_pair("red", &arg.red_roles)?;
    let blue_roles = role_pair("blue", &arg.blue_roles)?;

    let generator = LayoutGenerator {
        width: arg.width,
        height: arg.height,
        food_per_side: arg.food,
        capsules_per_side: arg.capsules,
        ..LayoutGenerator::default()
    };
    let layout = generator
        .generate(&mut Pcg32::seed_from_u64(seed))
        .with_context(|| format!("Failed to generate a {}x{} layout", arg.width, arg.height))?;
    let mut state = GameState::new(layout, arg.time_limit).context("Failed to set up the game")?;
    info!(seed, width = arg.width, height = arg.height, "layout generated");

    let mut red = create_team(0, 2, red_roles, &config, seed)?;
    let mut blue = create_team(1, 3, blue_roles, &config, seed.wrapping_add(2))?;
    let outcome = play_match(&mut state, &mut red, &mut blue, arg.time_limit)
        .context("Match aborted")?;

    let report = MatchReport {
        played_at: Utc::now(),
        seed,
        layout: LayoutInfo {
            width: arg.width,
            height: arg.height,
            food_per_side: arg.food,
            capsules_per_side: arg.capsules,
        },
        time_limit: arg.time_limit,
        red_roles,
        blue_roles,
        outcome,
    };
    Output::save_json(&report, arg.output.clone())
}

fn role_pair(team: &str, roles: &[AgentRole]) -> anyhow::Result<[AgentRole; 2]> {
    <[AgentRole; 2]>::try_from(roles)
        .map_err(|_| anyhow::anyhow!("Expected exactly two {team} roles, got {}", roles.len()))
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;
    use crate::command::{CommandArgs, Mode};

    fn parse(args: &[&str]) -> anyhow::Result<PlayMatchArg> {
        let argv = ["capture", "play-match"].into_iter().chain(args.iter().copied());
        let args = CommandArgs::try_parse_from(argv)?;
        match args.mode {
            Mode::PlayMatch(arg) => Ok(arg),
            Mode::DumpConfig(_) => anyhow::bail!("parsed the wrong mode"),
        }
    }

    #[test]
    fn test_parse_roles() {
        let arg = parse(&["--seed", "4", "--red-roles", "Defensive,Defensive"]).unwrap();
        assert_eq!(arg.seed, Some(4));
        assert_eq!(arg.red_roles, vec![AgentRole::Defensive, AgentRole::Defensive]);
        assert_eq!(arg.blue_roles, vec![AgentRole::Offensive, AgentRole::Defensive]);
        assert_eq!(arg.time_limit, 1200);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(parse(&["--blue-roles", "Goalie,Offensive"]).is_err());
    }

    #[test]
    fn test_role_pair_needs_two() {
        assert!(role_pair("red", &[AgentRole::Offensive]).is_err());
        assert_eq!(
            role_pair("red", &[AgentRole::Defensive, AgentRole::Offensive]).unwrap(),
            [AgentRole::Defensive, AgentRole::Offensive]
        );
    }
}
