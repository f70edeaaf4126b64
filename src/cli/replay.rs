use std::{
    fs::File,
    io::{BufRead, BufReader, stdin},
    path::PathBuf,
};

use clap::Parser;
use enumset::EnumSet;
use power_insight::{PowerInsight, prelude::*};

use crate::{
    cli::state::StateEvent,
    tables::{build_producers_table, build_sensors_table},
};

#[derive(Parser)]
pub struct ReplayArgs {
    /// Newline-delimited JSON state events, standard input if omitted.
    #[clap(long)]
    events: Option<PathBuf>,
}

impl ReplayArgs {
    pub fn run(self, mut insight: PowerInsight) -> Result {
        let reader: Box<dyn BufRead> = match &self.events {
            Some(path) => Box::new(BufReader::new(
                File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?,
            )),
            None => Box::new(stdin().lock()),
        };
        let (n_routed, n_unrouted) = replay(&mut insight, reader)?;
        info!(n_routed, n_unrouted, "replayed the events");

        println!("{}", build_sensors_table(&insight, EnumSet::all()));
        if !insight.producers().is_empty() {
            println!("{}", build_producers_table(&insight));
        }
        Ok(())
    }
}

/// Apply the events in order, returning the numbers of routed and unrouted events.
fn replay(insight: &mut PowerInsight, reader: impl BufRead) -> Result<(usize, usize)> {
    let mut n_routed = 0;
    let mut n_unrouted = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read an event")?;
        if line.trim().is_empty() {
            continue;
        }
        let event: StateEvent = serde_json::from_str(&line)
            .with_context(|| format!("invalid event on line {}", index + 1))?;
        let value = event.state.filter(|value| value.is_finite());
        if insight.set_value(&event.entity_id, value) {
            n_routed += 1;
        } else {
            n_unrouted += 1;
        }
    }
    Ok((n_routed, n_unrouted))
}
