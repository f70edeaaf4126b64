use std::{fs, path::PathBuf};

use clap::Parser;
use enumset::EnumSet;
use power_insight::{PowerInsight, Sensor, prelude::*};

use crate::{
    cli::state::Snapshot,
    tables::{build_producers_table, build_sensors_table},
};

#[derive(Parser)]
pub struct EvaluateArgs {
    /// JSON object mapping entity IDs to their states.
    #[clap(long)]
    readings: PathBuf,

    /// Sensors to show, all by default.
    #[clap(long = "sensor", value_enum)]
    sensors: Vec<Sensor>,
}

impl EvaluateArgs {
    #[instrument(skip_all, fields(readings = %self.readings.display()))]
    pub fn run(self, mut insight: PowerInsight) -> Result {
        let contents = fs::read_to_string(&self.readings)
            .with_context(|| format!("failed to read `{}`", self.readings.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse `{}`", self.readings.display()))?;

        let mut n_unrouted = 0_usize;
        for (entity_id, value) in snapshot.0 {
            if !insight.set_value(&entity_id, value.filter(|value| value.is_finite())) {
                warn!(entity_id, "no adapter listens to the entity");
                n_unrouted += 1;
            }
        }
        info!(n_unrouted, "applied the readings");

        let sensors = if self.sensors.is_empty() {
            EnumSet::all()
        } else {
            self.sensors.into_iter().collect()
        };
        println!("{}", build_sensors_table(&insight, sensors));
        if !insight.producers().is_empty() {
            println!("{}", build_producers_table(&insight));
        }
        Ok(())
    }
}
