use super::{
    default_operators, default_proposals, CheckArgs, CommandArgs, LogLevel, Operator, Population,
    RngKind, Samples, SimulateArgs,
};

fn command_args(args: &[&str]) -> CommandArgs {
    CommandArgs {
        args: args.iter().map(|arg| (*arg).to_owned()).collect(),
    }
}

#[test]
fn minimal_simulate_arguments() {
    let args = SimulateArgs::try_parse(command_args(&[
        "seed:",
        "1,",
        "model:",
        "(alpha: 1.0),",
        "samples: Contemporaneous(4)",
    ]))
    .unwrap();

    assert_eq!(args.seed, 1);
    assert!(matches!(args.rng, RngKind::WyHash));
    assert!((args.model.alpha - 1.0).abs() < f64::EPSILON);
    assert_eq!(args.model.max_lineages, None);
    assert!(matches!(args.samples, Samples::Contemporaneous(4)));
    assert!(matches!(args.population, Population::Constant(_)));
    assert_eq!(args.max_order, None);
    assert!(matches!(args.log_level, LogLevel::Info));
}

#[test]
fn parenthesised_arguments_are_kept() {
    let args = SimulateArgs::try_parse(command_args(&[
        "(seed: 7, model: (alpha: 1.5, max_lineages: 12), samples: Contemporaneous(3), \
         max_order: 5)",
    ]))
    .unwrap();

    assert_eq!(args.seed, 7);
    assert_eq!(args.model.max_lineages, Some(12));
    assert_eq!(args.max_order, Some(5));
}

#[test]
fn full_check_arguments() {
    let args = CheckArgs::try_parse(command_args(&[
        "seed: 3,",
        "rng: Std,",
        "model: (alpha: 1.2, max_lineages: 20),",
        "samples: Dated([(\"a\", 0.0), (\"b\", 0.5), (\"c\", 1.5)]),",
        "population: Skyline(initial_size: 2.0, events_per_epoch: 2),",
        "proposals: 50,",
        "operators: [Exchange, Scale(scale_factor: 0.5, root_only: true), \
         SubtreeSlide(relative_window: 0.2)],",
        "log_level: Debug,",
    ]))
    .unwrap();

    assert_eq!(args.seed, 3);
    assert!(matches!(args.rng, RngKind::Std));
    assert_eq!(args.model.max_lineages, Some(20));
    assert_eq!(args.proposals.get(), 50);
    assert!(matches!(args.log_level, LogLevel::Debug));

    match args.population {
        Population::Skyline(skyline) => {
            assert!((skyline.initial_size.get() - 2.0).abs() < f64::EPSILON);
            assert_eq!(skyline.events_per_epoch.get(), 2);
        },
        other => panic!("expected a skyline population, got {:?}", other),
    }

    assert_eq!(
        args.samples.into_labelled(),
        vec![
            (String::from("a"), 0.0),
            (String::from("b"), 0.5),
            (String::from("c"), 1.5)
        ]
    );

    assert_eq!(args.operators.len(), 3);
    assert!(matches!(args.operators[0], Operator::Exchange));
    assert!(matches!(&args.operators[1], Operator::Scale(scale) if scale.root_only()));
    assert!(matches!(args.operators[2], Operator::SubtreeSlide(_)));
}

#[test]
fn exponential_population_argument() {
    let args = SimulateArgs::try_parse(command_args(&[
        "seed: 1, model: (alpha: 1.0), samples: Contemporaneous(5),",
        "population: Exponential(present_size: 2.0, growth_rate: 0.5)",
    ]))
    .unwrap();

    assert!(matches!(args.population, Population::Exponential(_)));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = SimulateArgs::try_parse(command_args(&[
        "seed: 1, model: (alpha: 1.0), samples: Contemporaneous(4), speed: 2",
    ]))
    .unwrap_err();

    assert!(format!("{:?}", err).contains("speed"));

    assert!(SimulateArgs::try_parse(command_args(&[
        "seed: 1, model: (alpha: 1.0, beta: 2.0), samples: Contemporaneous(4)",
    ]))
    .is_err());

    assert!(CheckArgs::try_parse(command_args(&[
        "seed: 1, model: (alpha: 1.0), samples: Contemporaneous(4),",
        "operators: [Scale(scale_factor: 0.5, window: 1.0)]",
    ]))
    .is_err());
}

#[test]
fn invalid_values_are_rejected() {
    assert!(SimulateArgs::try_parse(command_args(&[
        "model: (alpha: 1.0), samples: Contemporaneous(4)",
    ]))
    .is_err());

    assert!(CheckArgs::try_parse(command_args(&[
        "seed: 1, model: (alpha: 1.0), samples: Contemporaneous(4), proposals: 0",
    ]))
    .is_err());

    assert!(CheckArgs::try_parse(command_args(&[
        "seed: 1, model: (alpha: 1.0), samples: Contemporaneous(4),",
        "population: Skyline(initial_size: -1.0, events_per_epoch: 1)",
    ]))
    .is_err());
}

#[test]
fn contemporaneous_samples_are_labelled_from_one() {
    assert_eq!(
        Samples::Contemporaneous(3).into_labelled(),
        vec![
            (String::from("t1"), 0.0),
            (String::from("t2"), 0.0),
            (String::from("t3"), 0.0)
        ]
    );

    assert!(Samples::Contemporaneous(0).into_labelled().is_empty());
}

#[test]
fn check_defaults() {
    assert_eq!(default_proposals().get(), 1000);

    let operators = default_operators();

    assert_eq!(operators.len(), 7);
    assert!(matches!(operators[0], Operator::Exchange));
    assert!(matches!(operators[6], Operator::SkylineDelta(_)));

    let args = CheckArgs::try_parse(command_args(&[
        "seed: 1, model: (alpha: 1.0), samples: Contemporaneous(4)",
    ]))
    .unwrap();

    assert_eq!(args.proposals, default_proposals());
    assert_eq!(args.operators.len(), operators.len());
}
