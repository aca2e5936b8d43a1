//! Descriptive statistics over `f64` samples.

/// Quantile `q` (in `[0, 1]`) of an ascending-sorted slice, interpolating
/// linearly between the two closest ranks. `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Copy and sort a sample in ascending order.
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Count, mean, sample standard deviation, extremes and quartiles of a sample.
/// Every statistic other than `count` is `None` when it is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl DescriptiveStats {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let sorted = sorted_copy(values);
        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        // n - 1 denominator; one observation has no spread estimate.
        let std = (n > 1).then(|| {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });

        DescriptiveStats {
            count: n,
            mean: Some(mean),
            std,
            min: sorted.first().copied(),
            p25: quantile_sorted(&sorted, 0.25),
            p50: quantile_sorted(&sorted, 0.50),
            p75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }

    /// Values in table column order: mean, std, min, 25%, 50%, 75%, max.
    pub fn values(&self) -> [Option<f64>; 7] {
        [
            self.mean, self.std, self.min, self.p25, self.p50, self.p75, self.max,
        ]
    }
}
