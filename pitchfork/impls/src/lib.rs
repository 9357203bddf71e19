#![deny(clippy::pedantic)]

#[macro_use]
extern crate contracts;

#[macro_use]
extern crate log;

pub mod cogs;
pub mod distribution;
pub mod intervals;
pub mod model;
pub mod simulation;
pub mod stats;
