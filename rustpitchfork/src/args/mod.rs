use std::num::NonZeroUsize;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use serde::Deserialize;

use pitchfork_core_bond::PositiveF64;
use pitchfork_impls::cogs::{
    operator::{
        ExpandCollapse, SkylineDelta, SubtreePruneRegraft, SubtreeSlide, TreeScale, UniformHeight,
    },
    population::{ConstantPopulation, ExponentialGrowth},
};

mod parse;

use parse::RonArgs;

#[derive(Debug, Parser)]
#[allow(clippy::module_name_repetitions)]
#[clap(about = "Simulates and checks multifurcating Beta-coalescent trees.")]
pub enum RustpitchforkArgs {
    /// Simulates a single tree and summarises it.
    Simulate(CommandArgs),
    /// Runs every tree operator on a simulated tree and checks that each
    /// proposal is valid and can be rolled back.
    Check(CommandArgs),
}

#[derive(Debug, Parser)]
#[allow(clippy::module_name_repetitions)]
pub struct CommandArgs {
    #[clap(allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
pub enum RngKind {
    #[default]
    WyHash,
    Std,
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Model {
    pub alpha: f64,
    /// Defaults to the number of samples.
    #[serde(default)]
    pub max_lineages: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub enum Samples {
    Contemporaneous(usize),
    Dated(Vec<(String, f64)>),
}

impl Samples {
    #[must_use]
    pub fn into_labelled(self) -> Vec<(String, f64)> {
        match self {
            Self::Contemporaneous(count) => {
                (0..count).map(|i| (format!("t{}", i + 1), 0.0_f64)).collect()
            },
            Self::Dated(samples) => samples,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Skyline {
    pub initial_size: PositiveF64,
    pub events_per_epoch: NonZeroUsize,
}

#[derive(Debug, Deserialize)]
pub enum Population {
    Constant(ConstantPopulation),
    Exponential(ExponentialGrowth),
    Skyline(Skyline),
}

impl Default for Population {
    fn default() -> Self {
        Self::Constant(ConstantPopulation::new(PositiveF64::one()))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub enum Operator {
    Exchange,
    SubtreePruneRegraft(SubtreePruneRegraft),
    SubtreeSlide(SubtreeSlide),
    ExpandCollapse(ExpandCollapse),
    Scale(TreeScale),
    Uniform(UniformHeight),
    SkylineDelta(SkylineDelta),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulateArgs {
    pub seed: u64,
    #[serde(default)]
    pub rng: RngKind,
    pub model: Model,
    pub samples: Samples,
    #[serde(default)]
    pub population: Population,
    #[serde(default)]
    pub max_order: Option<usize>,
    #[serde(default)]
    pub log_level: LogLevel,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckArgs {
    pub seed: u64,
    #[serde(default)]
    pub rng: RngKind,
    pub model: Model,
    pub samples: Samples,
    #[serde(default)]
    pub population: Population,
    #[serde(default = "default_proposals")]
    pub proposals: NonZeroUsize,
    #[serde(default = "default_operators")]
    pub operators: Vec<Operator>,
    #[serde(default)]
    pub log_level: LogLevel,
}

impl SimulateArgs {
    pub fn try_parse(command_args: CommandArgs) -> Result<Self> {
        RonArgs::from(command_args).parse("simulate")
    }
}

impl CheckArgs {
    pub fn try_parse(command_args: CommandArgs) -> Result<Self> {
        RonArgs::from(command_args).parse("check")
    }
}

fn default_proposals() -> NonZeroUsize {
    NonZeroUsize::MIN.saturating_add(999)
}

fn default_operators() -> Vec<Operator> {
    vec![
        Operator::Exchange,
        Operator::SubtreePruneRegraft(SubtreePruneRegraft::default()),
        Operator::SubtreeSlide(SubtreeSlide::default()),
        Operator::ExpandCollapse(ExpandCollapse::default()),
        Operator::Scale(TreeScale::default()),
        Operator::Uniform(UniformHeight::default()),
        Operator::SkylineDelta(SkylineDelta::default()),
    ]
}

#[cfg(test)]
mod tests;
