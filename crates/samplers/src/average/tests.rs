use approx::assert_relative_eq;

use tessel_core::{Restore, Sampler};

use super::{AverageSampler, Config, Error};

fn sampler(atol: Option<f64>, rtol: Option<f64>) -> AverageSampler {
    AverageSampler::new(Config::new(atol, rtol).expect("valid tolerances"))
}

fn observe(sampler: &mut AverageSampler, values: &[f64]) {
    let start = sampler.data().len() as u64;
    sampler
        .add_data(start.., values.iter().copied().map(Some))
        .expect("finite values");
}

#[test]
fn mean_and_std_match_textbook_formulas() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    let mut sampler = sampler(Some(0.1), None);
    observe(&mut sampler, &values);

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

    assert_eq!(sampler.n(), values.len());
    assert_relative_eq!(sampler.mean(), 5.0);
    assert_relative_eq!(sampler.std(), var.sqrt(), epsilon = 1e-12);
}

#[test]
fn loss_is_infinite_below_two_observations() {
    let mut sampler = sampler(Some(0.1), Some(0.1));
    assert!(sampler.loss(true).is_infinite());

    observe(&mut sampler, &[3.0]);
    assert!(sampler.loss(true).is_infinite());
    assert!(sampler.std().is_infinite());

    observe(&mut sampler, &[4.0]);
    assert!(sampler.loss(true).is_finite());
}

#[test]
fn constant_values_give_zero_loss() {
    let mut sampler = sampler(Some(0.1), None);
    observe(&mut sampler, &[1.0, 1.0, 1.0, 1.0]);

    assert_relative_eq!(sampler.loss(true), 0.0);
}

#[test]
fn loss_takes_the_stricter_tolerance() {
    let values = [1.0, 3.0];
    let mut absolute = sampler(Some(0.5), None);
    let mut relative = sampler(None, Some(0.1));
    let mut both = sampler(Some(0.5), Some(0.1));
    for s in [&mut absolute, &mut relative, &mut both] {
        observe(s, &values);
    }

    // std = √2, se = 1, mean = 2.
    assert_relative_eq!(absolute.loss(true), 2.0, epsilon = 1e-12);
    assert_relative_eq!(relative.loss(true), 5.0, epsilon = 1e-12);
    assert_relative_eq!(both.loss(true), 5.0, epsilon = 1e-12);
}

#[test]
fn pending_points_lower_the_expected_loss() {
    let mut sampler = sampler(Some(0.1), None);
    observe(&mut sampler, &[1.0, 2.0, 3.0, 4.0]);
    let real = sampler.loss(true);

    sampler.choose_points(12, true).expect("infallible");

    assert_relative_eq!(sampler.loss(true), real);
    assert_relative_eq!(sampler.loss(false), real / 2.0, epsilon = 1e-12);
}

#[test]
fn chooses_sequential_unused_indices() {
    let mut sampler = sampler(Some(0.1), None);
    sampler.add_point(1, Some(0.5)).unwrap();

    let first = sampler.choose_points(3, true).unwrap();
    assert_eq!(first.points, vec![0, 2, 3]);
    assert_eq!(first.loss_improvements.len(), 3);

    let second = sampler.choose_points(2, true).unwrap();
    assert_eq!(second.points, vec![4, 5]);
    assert_eq!(sampler.n_requested(), 6);
}

#[test]
fn dry_run_leaves_state_untouched() {
    let mut sampler = sampler(Some(0.1), None);
    observe(&mut sampler, &[1.0, 2.0]);
    let before = sampler.capture();

    let proposal = sampler.choose_points(4, false).unwrap();

    assert_eq!(proposal.points, vec![2, 3, 4, 5]);
    assert_eq!(sampler.capture(), before);
    assert_eq!(sampler.choose_points(1, true).unwrap().points, vec![2]);
}

#[test]
fn pending_values_only_count_as_requests() {
    let mut sampler = sampler(Some(0.1), None);
    sampler.add_point(0, None).unwrap();
    sampler.add_point(0, None).unwrap();

    assert_eq!(sampler.n(), 0);
    assert_eq!(sampler.n_requested(), 1);

    sampler.add_point(0, Some(2.0)).unwrap();
    assert_eq!(sampler.n(), 1);
    assert_eq!(sampler.n_requested(), 1);
    assert_relative_eq!(sampler.mean(), 2.0);
}

#[test]
fn reobserving_an_index_replaces_its_value() {
    let mut sampler = sampler(Some(0.1), None);
    observe(&mut sampler, &[1.0, 2.0]);
    sampler.add_point(1, Some(5.0)).unwrap();

    assert_eq!(sampler.n(), 2);
    assert_relative_eq!(sampler.mean(), 3.0);
}

#[test]
fn spread_survives_a_large_offset() {
    for offset in [1e8, 1e9] {
        let mut sampler = sampler(Some(0.1), None);
        observe(&mut sampler, &[offset + 1.0, offset + 2.0, offset + 3.0]);

        assert_relative_eq!(sampler.mean(), offset + 2.0);
        assert_relative_eq!(sampler.std(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn replacing_a_value_at_a_large_offset_keeps_the_spread() {
    let offset = 1e8;
    let mut sampler = sampler(Some(0.1), None);
    observe(&mut sampler, &[offset + 1.0, offset + 5.0, offset + 3.0]);
    sampler.add_point(1, Some(offset + 2.0)).unwrap();

    assert_eq!(sampler.n(), 3);
    assert_relative_eq!(sampler.mean(), offset + 2.0);
    assert_relative_eq!(sampler.std(), 1.0, epsilon = 1e-9);
}

#[test]
fn replacing_the_only_value_starts_over() {
    let mut sampler = sampler(Some(0.1), None);
    observe(&mut sampler, &[4.0]);
    sampler.add_point(0, Some(7.0)).unwrap();
    observe(&mut sampler, &[9.0]);

    assert_relative_eq!(sampler.mean(), 8.0);
    assert_relative_eq!(sampler.std(), 2.0_f64.sqrt(), epsilon = 1e-12);
}

#[test]
fn rejects_non_finite_values() {
    let mut sampler = sampler(Some(0.1), None);
    let err = sampler.add_point(3, Some(f64::NAN)).unwrap_err();

    assert!(matches!(err, Error::NonFiniteValue { index: 3, .. }));
    assert!(sampler.data().is_empty());
}

#[test]
fn remove_unfinished_drops_pending_indices() {
    let mut sampler = sampler(Some(0.1), None);
    observe(&mut sampler, &[1.0, 2.0]);
    sampler.choose_points(3, true).unwrap();
    assert_eq!(sampler.n_requested(), 5);

    sampler.remove_unfinished();

    assert_eq!(sampler.data().len(), 2);
    assert_eq!(sampler.n_requested(), 2);
    assert!(sampler.data().values().all(Option::is_some));
}

#[test]
fn restore_rewinds_observations() {
    let mut sampler = sampler(Some(0.1), None);
    observe(&mut sampler, &[1.0, 2.0, 3.0]);
    let snapshot = sampler.capture();
    let loss = sampler.loss(true);

    observe(&mut sampler, &[10.0, -4.0]);
    sampler.choose_points(2, true).unwrap();
    sampler.restore(snapshot);

    assert_eq!(sampler.data().len(), 3);
    assert_relative_eq!(sampler.loss(true), loss);
    assert_relative_eq!(sampler.mean(), 2.0);
}
