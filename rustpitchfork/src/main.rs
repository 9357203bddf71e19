#![deny(clippy::pedantic)]

#[macro_use]
extern crate log;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

mod args;
mod cli;
mod minimal_logger;

use crate::{args::RustpitchforkArgs, minimal_logger::MinimalLogger};

static MIN_LOGGER: MinimalLogger = MinimalLogger;

fn main() -> Result<()> {
    // Set up the minimal logger to stdout/stderr
    log::set_logger(&MIN_LOGGER)?;
    log::set_max_level(LevelFilter::Info);

    // Parse and validate all command line arguments
    match RustpitchforkArgs::parse() {
        RustpitchforkArgs::Simulate(simulate_args) => {
            cli::simulate::simulate_with_logger(simulate_args)?;
        },
        RustpitchforkArgs::Check(check_args) => cli::check::check_with_logger(check_args)?,
    }

    Ok(())
}
