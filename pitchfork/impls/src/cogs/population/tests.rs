use core::num::NonZeroUsize;

use pitchfork_core::{
    cogs::{Backup, EpochModel, PopulationFunction},
    tree::{NodeIndex, Tree, TreeBuilder},
};
use pitchfork_core_bond::PositiveF64;

use super::{
    ChangeTimes, ConstantPopulation, ExponentialGrowth, PiecewiseConstantPopulation,
    PopulationError, SkylinePopulationFunction,
};

fn size(value: f64) -> PositiveF64 {
    PositiveF64::new(value).unwrap()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
}

// (((A:1,B:1):1,C:2):1,D:3)
fn caterpillar() -> (Tree, NodeIndex) {
    let mut builder = TreeBuilder::new();

    let a = builder.leaf("A", 0.0).unwrap();
    let b = builder.leaf("B", 0.0).unwrap();
    let c = builder.leaf("C", 0.0).unwrap();
    let d = builder.leaf("D", 0.0).unwrap();

    let ab = builder.internal(1.0, a, b).unwrap();
    let abc = builder.internal(2.0, ab, c).unwrap();
    let root = builder.internal(3.0, abc, d).unwrap();

    (builder.build(root).unwrap(), ab)
}

#[test]
fn constant_population() {
    let population = ConstantPopulation::new(size(2.0));

    assert_close(population.pop_size(10.0), 2.0);
    assert_close(population.intensity(3.0), 1.5);
    assert_close(population.inverse_intensity(1.5), 3.0);
    assert_close(population.integral(1.0, 3.0), 1.0);
}

#[test]
fn exponential_growth() {
    let population = ExponentialGrowth::new(size(4.0), 0.5);

    assert_close(population.pop_size(2.0), 4.0 * (-1.0_f64).exp());
    assert_close(population.intensity(2.0), (1.0_f64.exp() - 1.0) / 2.0);
    assert_close(population.inverse_intensity(population.intensity(1.3)), 1.3);

    let flat = ExponentialGrowth::new(size(4.0), 0.0);

    assert_close(flat.intensity(2.0), 0.5);
    assert_close(flat.inverse_intensity(0.5), 2.0);
}

#[test]
fn shrinking_population_runs_out_of_intensity() {
    // the total intensity is -1 / (N0 r) = 0.5
    let population = ExponentialGrowth::new(size(4.0), -0.5);

    assert_close(population.inverse_intensity(population.intensity(1.0)), 1.0);
    assert!(population.intensity(100.0) < 0.5);
    assert_eq!(population.inverse_intensity(0.5), f64::INFINITY);
    assert_eq!(population.inverse_intensity(0.75), f64::INFINITY);
}

#[test]
fn piecewise_with_explicit_change_times() {
    let (tree, _) = caterpillar();

    let population = PiecewiseConstantPopulation::new(
        &[size(1.0), size(2.0)],
        ChangeTimes::Explicit(vec![1.0]),
        &tree,
    )
    .unwrap();

    assert_close(population.pop_size(0.5), 1.0);
    assert_close(population.pop_size(1.0), 2.0);
    assert_close(population.pop_size(7.0), 2.0);
    assert_close(population.intensity(2.0), 1.5);
    assert_close(population.inverse_intensity(1.5), 2.0);
    assert_close(population.inverse_intensity(0.5), 0.5);
    assert_close(population.integral(0.5, 2.0), 1.0);
}

#[test]
fn piecewise_rejects_inconsistent_epochs() {
    let (tree, _) = caterpillar();

    assert_eq!(
        PiecewiseConstantPopulation::new(&[], ChangeTimes::EvenlySpaced, &tree).unwrap_err(),
        PopulationError::NoSizes
    );
    assert_eq!(
        PiecewiseConstantPopulation::new(&[size(1.0)], ChangeTimes::Explicit(vec![1.0]), &tree)
            .unwrap_err(),
        PopulationError::ChangeTimeCountMismatch {
            expected: 0,
            actual: 1
        }
    );
    assert_eq!(
        PiecewiseConstantPopulation::new(
            &[size(1.0), size(1.0), size(1.0)],
            ChangeTimes::Explicit(vec![2.0, 1.0]),
            &tree
        )
        .unwrap_err(),
        PopulationError::UnsortedChangeTimes
    );
}

#[test]
fn evenly_spaced_epochs_follow_the_tree() {
    let (mut tree, _) = caterpillar();

    let mut population = PiecewiseConstantPopulation::new(
        &[size(1.0), size(2.0), size(4.0)],
        ChangeTimes::EvenlySpaced,
        &tree,
    )
    .unwrap();

    assert_eq!(population.epoch_start_times(), &[0.0, 1.0, 2.0]);

    let root = tree.root();
    tree.set_height(root, 6.0);
    population.refresh(&tree);

    assert_eq!(population.epoch_start_times(), &[0.0, 2.0, 4.0]);
    assert_close(population.pop_size(3.0), 2.0);
}

#[test]
fn skyline_epochs_follow_coalescent_events() {
    let (mut tree, ab) = caterpillar();

    let mut skyline = SkylinePopulationFunction::new(
        size(1.0),
        vec![2.0_f64.ln(), 2.0_f64.ln()],
        NonZeroUsize::new(3).unwrap(),
        &tree,
    )
    .unwrap();

    assert_eq!(skyline.epoch_count(&tree), 3);
    assert_eq!(skyline.epoch_start_times(), &[0.0, 1.0, 2.0]);
    assert_close(skyline.pop_size(0.5), 1.0);
    assert_close(skyline.pop_size(1.5), 2.0);
    assert_close(skyline.pop_size(2.5), 4.0);
    assert_close(skyline.intensity(2.5), 1.0 + 0.5 + 0.125);
    assert_close(skyline.inverse_intensity(1.625), 2.5);

    // merging the two youngest events into a multifurcation drops an epoch
    tree.set_height(ab, 2.0);

    assert_eq!(skyline.epoch_count(&tree), 2);
    assert_eq!(skyline.epoch_start_times(), &[0.0, 2.0]);
    assert_close(skyline.pop_size(2.5), 2.0);
}

#[test]
fn skyline_epochs_are_capped() {
    let (tree, _) = caterpillar();

    let mut skyline = SkylinePopulationFunction::new(
        size(1.0),
        vec![0.0, 0.0],
        NonZeroUsize::new(2).unwrap(),
        &tree,
    )
    .unwrap();

    // three events in at most two epochs, two events per epoch
    assert_eq!(skyline.epoch_count(&tree), 2);
    assert_eq!(skyline.epoch_start_times(), &[0.0, 2.0]);
}

#[test]
fn skyline_deltas_update_sizes() {
    let (tree, _) = caterpillar();

    let mut skyline = SkylinePopulationFunction::new(
        size(2.0),
        vec![0.0, 0.0],
        NonZeroUsize::new(3).unwrap(),
        &tree,
    )
    .unwrap();

    let backup = skyline.backup();

    skyline.set_log_pop_size_delta(1, 1.0);

    assert_close(skyline.log_pop_size_delta(1), 1.0);
    assert_close(skyline.epoch_pop_size(1), 2.0);
    assert_close(skyline.epoch_pop_size(2), 2.0 * 1.0_f64.exp());

    skyline.restore(backup);
    assert_close(skyline.log_pop_size_delta(1), 0.0);
    assert_close(skyline.epoch_pop_size(2), 2.0);
}

#[test]
fn skyline_requires_one_delta_per_event() {
    let (tree, _) = caterpillar();

    assert_eq!(
        SkylinePopulationFunction::new(size(1.0), vec![0.0], NonZeroUsize::new(3).unwrap(), &tree)
            .unwrap_err(),
        PopulationError::DeltaCountMismatch {
            expected: 2,
            actual: 1
        }
    );
}
