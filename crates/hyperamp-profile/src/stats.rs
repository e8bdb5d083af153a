//! Central-tendency and dispersion estimators over frequency histograms.

use hyperamp_core::errors::{ErrorInfo, HyperampError};
use hyperamp_core::DistributionProfile;

use crate::histogram::Histogram;

/// Median-anchored estimator used for the hypertype edge-count histogram.
///
/// The counts are sorted ascending and the middle one (mean of the two middle
/// ones for an even number of entries) becomes the central value. Dispersion is
/// `sqrt(sum((count - central)^2) / (n - 1))`, i.e. a sample variance taken
/// around the median instead of the mean. Keys are ignored; only the counts
/// matter. A single entry has zero dispersion.
pub fn median_central_stats(histogram: &Histogram) -> Result<DistributionProfile, HyperampError> {
    ensure_non_empty(histogram, "median")?;
    let mut counts: Vec<f64> = histogram.iter().map(|(_, count)| count as f64).collect();
    counts.sort_by(f64::total_cmp);

    let n = counts.len();
    let central = if n % 2 == 0 {
        (counts[n / 2 - 1] + counts[n / 2]) / 2.0
    } else {
        counts[n / 2]
    };
    let dispersion = if n > 1 {
        let squares: f64 = counts.iter().map(|count| (count - central).powi(2)).sum();
        (squares / (n - 1) as f64).sqrt()
    } else {
        0.0
    };
    Ok(DistributionProfile::new(central, dispersion))
}

/// Frequency-weighted mean and sample standard deviation over a
/// value -> count histogram.
pub fn weighted_mean_stats(histogram: &Histogram) -> Result<DistributionProfile, HyperampError> {
    ensure_non_empty(histogram, "weighted-mean")?;
    let total = histogram.total() as f64;
    let weighted_sum: f64 = histogram
        .iter()
        .map(|(value, count)| value as f64 * count as f64)
        .sum();
    let mean = weighted_sum / total;
    let std_dev = if total > 1.0 {
        let squares: f64 = histogram
            .iter()
            .map(|(value, count)| (value as f64 - mean).powi(2) * count as f64)
            .sum();
        (squares / (total - 1.0)).sqrt()
    } else {
        0.0
    };
    Ok(DistributionProfile::new(mean, std_dev))
}

fn ensure_non_empty(histogram: &Histogram, estimator: &str) -> Result<(), HyperampError> {
    if histogram.is_empty() || histogram.total() == 0 {
        return Err(HyperampError::Input(
            ErrorInfo::new("empty-histogram", "cannot estimate a distribution without samples")
                .with_context("estimator", estimator),
        ));
    }
    Ok(())
}
