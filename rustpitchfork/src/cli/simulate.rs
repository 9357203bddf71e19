use anyhow::{Context, Result};

use pitchfork_core::{
    cogs::{PopulationFunction, Rng, RngCore},
    tree::Tree,
};
use pitchfork_impls::{
    cogs::rng::{std::StdRng, wyhash::WyHash},
    distribution::BetaCoalescentDistribution,
    model::BetaCoalescentModel,
    simulation::BetaCoalescentSimulator,
};

use crate::args::{CommandArgs, Population, RngKind, SimulateArgs};

use super::Maths;

#[allow(clippy::module_name_repetitions)]
pub fn simulate_with_logger(simulate_args: CommandArgs) -> Result<()> {
    let simulate_args = SimulateArgs::try_parse(simulate_args)?;

    log::set_max_level(simulate_args.log_level.into());

    info!("Parsed simulate arguments:\n{:#?}", simulate_args);

    match simulate_args.rng {
        RngKind::WyHash => {
            let rng = WyHash::from_seed(simulate_args.seed);
            simulate(simulate_args, rng)
        },
        RngKind::Std => {
            let rng = StdRng::from_seed(simulate_args.seed);
            simulate(simulate_args, rng)
        },
    }
}

fn simulate<G: Rng>(simulate_args: SimulateArgs, mut rng: G) -> Result<()> {
    let samples = simulate_args.samples.into_labelled();

    let model = super::build_model(&simulate_args.model, samples.len())?;
    let simulator = BetaCoalescentSimulator::new(&model);

    info!("Starting the Beta-coalescent simulation ...");

    match simulate_args.population {
        Population::Constant(population) => {
            let tree = simulator
                .simulate(&samples, &population, &mut rng)
                .context("Failed to simulate a tree under a constant population.")?;

            super::report_tree(&tree, simulate_args.max_order);
            report_log_likelihood(&model, population, &tree)?;
        },
        Population::Exponential(population) => {
            let tree = simulator
                .simulate(&samples, &population, &mut rng)
                .context("Failed to simulate a tree under exponential growth.")?;

            super::report_tree(&tree, simulate_args.max_order);
            report_log_likelihood(&model, population, &tree)?;
        },
        Population::Skyline(skyline) => {
            let simulation = simulator
                .simulate_skyline(
                    &samples,
                    skyline.initial_size,
                    skyline.events_per_epoch,
                    &mut rng,
                )
                .context("Failed to simulate a tree under a random skyline.")?;

            super::report_tree(&simulation.tree, simulate_args.max_order);

            for (time, size) in simulation.change_times.iter().zip(&simulation.pop_sizes) {
                info!("Population size {} from time {}.", size, time);
            }
        },
    }

    info!("The simulation has completed.");

    Ok(())
}

fn report_log_likelihood<P: PopulationFunction>(
    model: &BetaCoalescentModel<Maths>,
    population: P,
    tree: &Tree,
) -> Result<()> {
    let mut distribution = BetaCoalescentDistribution::new(model.clone(), population, tree)
        .context("Failed to set up the Beta-coalescent tree distribution.")?;

    info!(
        "The log-likelihood of the simulated tree is {}.",
        distribution.log_likelihood(tree)
    );

    Ok(())
}
