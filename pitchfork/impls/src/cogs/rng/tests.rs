use pitchfork_core::cogs::{Backup, Rng, RngCore};

use super::{std::StdRng, wyhash::WyHash};

fn check_moments<G: Rng>(rng: &mut G) {
    let samples = 20_000;

    let mut uniform_sum = 0.0_f64;
    let mut exponential_sum = 0.0_f64;
    let mut normal_sum = 0.0_f64;
    let mut normal_square_sum = 0.0_f64;

    for _ in 0..samples {
        let u = rng.sample_uniform();
        assert!((0.0..1.0).contains(&u));

        uniform_sum += u;
        exponential_sum += rng.sample_exponential(2.0);

        let z = rng.sample_standard_normal();
        normal_sum += z;
        normal_square_sum += z * z;
    }

    let n = f64::from(samples);

    assert!((uniform_sum / n - 0.5).abs() < 0.02);
    assert!((exponential_sum / n - 0.5).abs() < 0.03);
    assert!((normal_sum / n).abs() < 0.05);
    assert!((normal_square_sum / n - 1.0).abs() < 0.05);
}

#[test]
fn std_rng_moments() {
    check_moments(&mut StdRng::from_seed(42));
}

#[test]
fn wyhash_moments() {
    check_moments(&mut WyHash::from_seed(42));
}

#[test]
fn seeding_is_reproducible() {
    let mut a = WyHash::from_seed(7);
    let mut b = WyHash::from_seed(7);

    for _ in 0..100 {
        assert_eq!(a.sample_uniform().to_bits(), b.sample_uniform().to_bits());
    }

    let mut c = StdRng::from_seed(7);
    let backup = c.backup();

    let first = c.sample_uniform();
    let mut c = backup.resume();

    assert_eq!(first.to_bits(), c.sample_uniform().to_bits());
}

#[test]
fn index_and_choice_stay_in_bounds() {
    let mut rng = WyHash::from_seed(3);
    let items = ['a', 'b', 'c'];

    let mut seen = [false; 3];

    for _ in 0..1000 {
        let index = rng.sample_index(3);
        seen[index] = true;

        assert!(items.contains(rng.sample_choice(&items).unwrap()));
    }

    assert!(seen.iter().all(|seen| *seen));
    assert!(rng.sample_choice::<char>(&[]).is_none());
}

#[test]
fn uniform_range() {
    let mut rng = StdRng::from_seed(11);

    for _ in 0..1000 {
        let x = rng.sample_uniform_range(2.0, 3.5);
        assert!((2.0..3.5).contains(&x));
    }
}
