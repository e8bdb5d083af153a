use hyperamp_core::{DistributionProfile, RngHandle};
use hyperamp_gen::distribution::{EDGE_SIZE_FLOOR, HYPERTYPE_FLOOR, OCCURRENCE_FLOOR};
use hyperamp_gen::{reflect, DistributionSpec, Floor, ReflectedNormal};
use proptest::prelude::*;

#[test]
fn samples_above_floor_pass_through() {
    assert_eq!(reflect(12.5, 8.6, OCCURRENCE_FLOOR), 12.5);
    assert_eq!(reflect(1.0, 8.6, OCCURRENCE_FLOOR), 1.0);
    assert_eq!(reflect(0.95, 1.5, EDGE_SIZE_FLOOR), 0.95);
}

#[test]
fn samples_below_floor_are_mirrored_around_mean() {
    assert_eq!(reflect(0.5, 8.6, OCCURRENCE_FLOOR), 2.0 * 8.6 - 0.5);
    assert_eq!(reflect(-3.0, 1.5, EDGE_SIZE_FLOOR), 6.0);
    assert_eq!(reflect(-100.0, 4093.0, HYPERTYPE_FLOOR), 8286.0);
}

#[test]
fn hypertype_floor_is_inclusive() {
    assert_eq!(reflect(0.0, 10.0, HYPERTYPE_FLOOR), 20.0);
    assert_eq!(reflect(0.0, 10.0, Floor::Below(0.0)), 0.0);
}

#[test]
fn uncalibrated_specs_use_mean_as_sigma() {
    let spec = DistributionSpec::uncalibrated(4093.0, 3793.3);
    assert_eq!(spec.sigma(), 4093.0);

    let calibrated = DistributionSpec::calibrated(DistributionProfile::new(12.0, 3.5));
    assert!(calibrated.calibrated);
    assert_eq!(calibrated.sigma(), 3.5);
}

#[test]
fn negative_sigma_is_a_config_error() {
    let spec = DistributionSpec::calibrated(DistributionProfile::new(2.0, -1.0));
    let err = ReflectedNormal::new("edge_size", &spec, EDGE_SIZE_FLOOR).unwrap_err();
    assert_eq!(err.info().code, "bad-distribution");
    assert_eq!(
        err.info().context.get("distribution"),
        Some(&"edge_size".to_string())
    );
}

proptest! {
    #[test]
    fn occurrence_draws_stay_at_or_above_one(seed in any::<u64>(), mean in 1.0f64..50.0) {
        let spec = DistributionSpec::uncalibrated(mean, 0.0);
        let sampler = ReflectedNormal::new("occurrence", &spec, OCCURRENCE_FLOOR).unwrap();
        let mut rng = RngHandle::from_seed(seed);
        for _ in 0..64 {
            prop_assert!(sampler.sample(&mut rng) >= 1.0);
        }
    }

    #[test]
    fn reflection_never_lands_below_floor_when_mean_clears_it(
        sample in -1.0e6f64..1.0e6,
        mean in 1.0f64..1.0e4,
    ) {
        prop_assert!(reflect(sample, mean, OCCURRENCE_FLOOR) >= 1.0);
    }
}
