//! Summary statistics and histogram binning over shots-to-win samples.

use serde::{Deserialize, Serialize};

/// Descriptive statistics of one algorithm's batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation (divides by n).
    pub std_dev: f64,
    pub min: usize,
    pub max: usize,
    pub total_simulations: usize,
}

impl SummaryStats {
    /// `None` for an empty sample set.
    pub fn from_samples(samples: &[usize]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let n = sorted.len() as f64;
        let mean = sorted.iter().map(|&s| s as f64).sum::<f64>() / n;
        let variance = sorted
            .iter()
            .map(|&s| (s as f64 - mean).powi(2))
            .sum::<f64>()
            / n;

        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
        } else {
            sorted[mid] as f64
        };

        Some(Self {
            mean,
            median,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            total_simulations: sorted.len(),
        })
    }
}

/// Equal-width histogram over `[min, max]`. `bins` holds bin centres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<f64>,
    pub frequencies: Vec<usize>,
}

impl Histogram {
    /// Bin `samples` into `num_bins` equal-width bins, the last one closed
    /// on the right. When every sample is equal there is a single bin.
    pub fn from_samples(samples: &[usize], num_bins: usize) -> Self {
        let (Some(&min), Some(&max)) = (samples.iter().min(), samples.iter().max()) else {
            return Self {
                bins: Vec::new(),
                frequencies: Vec::new(),
            };
        };
        if min == max {
            return Self {
                bins: vec![min as f64],
                frequencies: vec![samples.len()],
            };
        }

        let num_bins = num_bins.max(1);
        let lo = min as f64;
        let width = (max - min) as f64 / num_bins as f64;
        let mut frequencies = vec![0usize; num_bins];
        for &s in samples {
            let idx = ((s as f64 - lo) / width).floor() as usize;
            frequencies[idx.min(num_bins - 1)] += 1;
        }
        let bins = (0..num_bins)
            .map(|i| lo + (i as f64 + 0.5) * width)
            .collect();
        Self { bins, frequencies }
    }
}
