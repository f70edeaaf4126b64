mod evaluate;
mod replay;
mod state;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use power_insight::{PowerInsight, Setup, prelude::*};

use crate::{
    cli::{evaluate::EvaluateArgs, replay::ReplayArgs},
    tables::build_entities_table,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub setup: SetupArgs,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn run(self) -> Result {
        let insight = self.setup.build()?;
        match self.command {
            Command::Evaluate(args) => args.run(insight),
            Command::Replay(args) => args.run(insight),
            Command::Entities => {
                println!("{}", build_entities_table(&insight));
                Ok(())
            }
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply a snapshot of readings and print the sensor values.
    Evaluate(EvaluateArgs),

    /// Apply a stream of state change events and print the final sensor values.
    Replay(ReplayArgs),

    /// List the source entities the installation listens to.
    Entities,
}

#[must_use]
#[derive(Parser)]
pub struct SetupArgs {
    /// TOML file describing the grid connection, PV systems, and batteries.
    #[clap(long = "setup", env = "POWER_INSIGHT_SETUP")]
    pub path: PathBuf,
}

impl SetupArgs {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn build(&self) -> Result<PowerInsight> {
        let insight = Setup::read(&self.path)?.build().context("invalid setup")?;
        info!(n_producers = insight.producers().len(), "loaded the setup");
        Ok(insight)
    }
}
