use std::path::PathBuf;

use capture_reflex::ReflexConfig;

use crate::util::{Output, read_config_file};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DumpConfigArg {
    /// Merge this partial config over the defaults before writing
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DumpConfigArg) -> anyhow::Result<()> {
    let DumpConfigArg { config, output } = arg;
    let config = match config {
        Some(path) => read_config_file(path)?,
        None => ReflexConfig::default(),
    };
    Output::save_json(&config, output.clone())
}
