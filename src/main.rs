#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod tables;

use clap::{Parser, crate_version};
use power_insight::prelude::*;

use crate::cli::Args;

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    Args::parse().run()?;

    info!("done!");
    Ok(())
}
