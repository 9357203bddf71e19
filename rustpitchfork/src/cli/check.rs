use std::num::NonZeroUsize;

use anyhow::{Context, Result};

use pitchfork_core::{
    cogs::{Backup, PopulationFunction, Rng, RngCore, TreeOperator},
    tree::Tree,
};
use pitchfork_impls::{
    cogs::{
        operator::{EpochAdjusted, NarrowExchange},
        population::{ConstantPopulation, ExponentialGrowth, SkylinePopulationFunction},
        rng::{std::StdRng, wyhash::WyHash},
    },
    distribution::BetaCoalescentDistribution,
    model::BetaCoalescentModel,
    simulation::BetaCoalescentSimulator,
};

use crate::args::{CheckArgs, CommandArgs, Operator, Population, RngKind, Skyline};

use super::Maths;

/// Population functions that may carry skyline epochs which tree moves have
/// to keep consistent.
trait Epochs: PopulationFunction + Backup {
    fn epochs(&mut self) -> Option<&mut SkylinePopulationFunction>;
}

impl Epochs for ConstantPopulation {
    fn epochs(&mut self) -> Option<&mut SkylinePopulationFunction> {
        None
    }
}

impl Epochs for ExponentialGrowth {
    fn epochs(&mut self) -> Option<&mut SkylinePopulationFunction> {
        None
    }
}

impl Epochs for SkylinePopulationFunction {
    fn epochs(&mut self) -> Option<&mut SkylinePopulationFunction> {
        Some(self)
    }
}

#[allow(clippy::module_name_repetitions)]
pub fn check_with_logger(check_args: CommandArgs) -> Result<()> {
    let check_args = CheckArgs::try_parse(check_args)?;

    log::set_max_level(check_args.log_level.into());

    info!("Parsed check arguments:\n{:#?}", check_args);

    match check_args.rng {
        RngKind::WyHash => {
            let rng = WyHash::from_seed(check_args.seed);
            check(check_args, rng)
        },
        RngKind::Std => {
            let rng = StdRng::from_seed(check_args.seed);
            check(check_args, rng)
        },
    }
}

fn check<G: Rng>(check_args: CheckArgs, mut rng: G) -> Result<()> {
    let CheckArgs {
        model,
        samples,
        population,
        proposals,
        operators,
        ..
    } = check_args;

    let samples = samples.into_labelled();

    let model = super::build_model(&model, samples.len())?;
    let simulator = BetaCoalescentSimulator::new(&model);

    match population {
        Population::Constant(population) => {
            let tree = simulator
                .simulate(&samples, &population, &mut rng)
                .context("Failed to simulate a tree under a constant population.")?;

            run_checks(tree, &model, population, proposals, &operators, &mut rng)
        },
        Population::Exponential(population) => {
            let tree = simulator
                .simulate(&samples, &population, &mut rng)
                .context("Failed to simulate a tree under exponential growth.")?;

            run_checks(tree, &model, population, proposals, &operators, &mut rng)
        },
        Population::Skyline(skyline) => {
            let tree = simulator
                .simulate_skyline(
                    &samples,
                    skyline.initial_size,
                    skyline.events_per_epoch,
                    &mut rng,
                )
                .context("Failed to simulate a tree under a random skyline.")?
                .tree;

            let population = skyline_population(&skyline, &tree)?;

            run_checks(tree, &model, population, proposals, &operators, &mut rng)
        },
    }
}

fn skyline_population(skyline: &Skyline, tree: &Tree) -> Result<SkylinePopulationFunction> {
    let events = tree.internal_node_count();

    let max_epochs = NonZeroUsize::new(events.div_ceil(skyline.events_per_epoch.get()))
        .context("The simulated tree has no coalescent events.")?;

    SkylinePopulationFunction::new(
        skyline.initial_size,
        vec![0.0_f64; events.saturating_sub(1)],
        max_epochs,
        tree,
    )
    .context("Failed to set up the skyline population function.")
}

fn run_checks<P: Epochs, G: Rng>(
    mut tree: Tree,
    model: &BetaCoalescentModel<Maths>,
    population: P,
    proposals: NonZeroUsize,
    operators: &[Operator],
    rng: &mut G,
) -> Result<()> {
    let mut distribution = BetaCoalescentDistribution::new(model.clone(), population, &tree)
        .context("Failed to set up the Beta-coalescent tree distribution.")?;

    super::report_tree(&tree, None);

    let log_likelihood = distribution.log_likelihood(&tree);

    info!("The log-likelihood of the simulated tree is {}.", log_likelihood);

    for operator in operators {
        let mut finite_proposals = 0_usize;

        for _ in 0..proposals.get() {
            let original = tree.clone();
            let population = distribution.population().backup();

            tree.checkpoint();

            let log_hastings_ratio = propose(
                operator,
                &mut tree,
                distribution.population_mut().epochs(),
                rng,
            );

            anyhow::ensure!(
                !log_hastings_ratio.is_nan(),
                "{:?} returned a NaN Hastings ratio.",
                operator
            );

            if log_hastings_ratio > f64::NEG_INFINITY {
                finite_proposals += 1;

                anyhow::ensure!(tree.is_valid(), "{:?} proposed an invalid tree.", operator);
                anyhow::ensure!(
                    !distribution.log_likelihood(&tree).is_nan(),
                    "{:?} proposed a tree with a NaN log-likelihood.",
                    operator
                );
            }

            tree.rollback();
            distribution.population_mut().restore(population);

            anyhow::ensure!(tree == original, "{:?} could not be rolled back.", operator);
            anyhow::ensure!(
                distribution.log_likelihood(&tree).to_bits() == log_likelihood.to_bits(),
                "The log-likelihood changed after rolling back {:?}.",
                operator
            );
        }

        #[allow(clippy::cast_precision_loss)]
        let finite_fraction = (finite_proposals as f64) / (proposals.get() as f64);

        info!(
            "{:?}: {:.1}% of {} proposals were admissible.",
            operator,
            finite_fraction * 100.0_f64,
            proposals
        );
    }

    info!("All proposal checks have passed.");

    Ok(())
}

fn propose<G: Rng>(
    operator: &Operator,
    tree: &mut Tree,
    epochs: Option<&mut SkylinePopulationFunction>,
    rng: &mut G,
) -> f64 {
    match operator {
        Operator::Exchange => EpochAdjusted::new(NarrowExchange::new(), epochs).propose(tree, rng),
        Operator::SubtreePruneRegraft(spr) => {
            EpochAdjusted::new(spr.clone(), epochs).propose(tree, rng)
        },
        Operator::SubtreeSlide(slide) => EpochAdjusted::new(slide.clone(), epochs).propose(tree, rng),
        Operator::ExpandCollapse(expand_collapse) => {
            EpochAdjusted::new(expand_collapse.clone(), epochs).propose(tree, rng)
        },
        Operator::Scale(scale) => EpochAdjusted::new(scale.clone(), epochs).propose(tree, rng),
        Operator::Uniform(uniform) => EpochAdjusted::new(uniform.clone(), epochs).propose(tree, rng),
        Operator::SkylineDelta(delta) => {
            epochs.map_or(f64::NEG_INFINITY, |epochs| delta.propose(tree, epochs, rng))
        },
    }
}
