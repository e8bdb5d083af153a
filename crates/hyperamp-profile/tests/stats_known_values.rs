use hyperamp_core::HyperampError;
use hyperamp_profile::{median_central_stats, weighted_mean_stats, Histogram};

fn histogram(pairs: &[(u64, u64)]) -> Histogram {
    pairs.iter().copied().collect()
}

#[test]
fn weighted_mean_matches_hand_computation() {
    let profile = weighted_mean_stats(&histogram(&[(1, 2), (2, 3), (5, 1)])).unwrap();
    let mean = 13.0 / 6.0;
    assert!((profile.mean - mean).abs() < 1e-12);

    let squares = 2.0 * (1.0 - mean) * (1.0 - mean)
        + 3.0 * (2.0 - mean) * (2.0 - mean)
        + (5.0 - mean) * (5.0 - mean);
    let expected = (squares / 5.0_f64).sqrt();
    assert!((profile.std_dev - expected).abs() < 1e-12);
}

#[test]
fn median_estimator_uses_counts_not_keys() {
    // hypertype ids 10, 11, 12 with edge counts 1, 5, 3
    let profile = median_central_stats(&histogram(&[(10, 1), (11, 5), (12, 3)])).unwrap();
    assert_eq!(profile.mean, 3.0);
    assert!((profile.std_dev - 2.0).abs() < 1e-12);
}

#[test]
fn median_of_even_entry_count_averages_middle_pair() {
    let profile = median_central_stats(&histogram(&[(1, 2), (2, 8), (3, 4), (4, 6)])).unwrap();
    assert_eq!(profile.mean, 5.0);
    // deviations: -3, -1, 1, 3 => 20 / 3
    assert!((profile.std_dev - (20.0_f64 / 3.0).sqrt()).abs() < 1e-12);
}

#[test]
fn single_entry_has_zero_dispersion() {
    let median = median_central_stats(&histogram(&[(7, 42)])).unwrap();
    assert_eq!(median.mean, 42.0);
    assert_eq!(median.std_dev, 0.0);

    let weighted = weighted_mean_stats(&histogram(&[(3, 1)])).unwrap();
    assert_eq!(weighted.mean, 3.0);
    assert_eq!(weighted.std_dev, 0.0);
}

#[test]
fn empty_histograms_are_rejected() {
    for result in [
        median_central_stats(&Histogram::new()),
        weighted_mean_stats(&Histogram::new()),
    ] {
        match result {
            Err(HyperampError::Input(info)) => assert_eq!(info.code, "empty-histogram"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

#[test]
fn inversion_counts_vertices_per_occurrence() {
    let mut per_vertex = Histogram::new();
    for vid in [100, 100, 100, 101, 102, 102, 103] {
        per_vertex.record(vid);
    }
    let inverted = per_vertex.invert();
    assert_eq!(inverted.iter().collect::<Vec<_>>(), vec![(1, 2), (2, 1), (3, 1)]);
    assert_eq!(inverted.total(), 4);
}
