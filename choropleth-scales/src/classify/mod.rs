use crate::error::ChoroplethScaleError;
use serde::{Deserialize, Serialize};

/// A closed value interval assigned a single class.
///
/// Bins produced by [`classify`] are contiguous in value order: the first
/// bin's min is the global minimum, the last bin's max is the global maximum,
/// and boundaries are monotonically non-decreasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub min: f32,
    pub max: f32,
}

impl Bin {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Whether the value falls inside the closed interval.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Partition `values` into at most `k` contiguous classes minimizing the
/// within-class sum of squared deviations (optimal univariate k-means).
///
/// Non-finite entries are filtered out before clustering. The effective class
/// count is clamped to the number of distinct finite values, so no bin is
/// ever empty. An empty input yields an empty bin sequence; callers must
/// treat that as "no data" and skip scale construction.
///
/// Uses the dynamic program over prefix sums with the divide-and-conquer
/// matrix fill, so the result is the globally optimal contiguous partition
/// rather than a local heuristic.
pub fn classify(values: &[f32], k: usize) -> Result<Vec<Bin>, ChoroplethScaleError> {
    if k == 0 {
        return Err(ChoroplethScaleError::InvalidBinCount);
    }

    let mut sorted: Vec<f64> = values
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| *v as f64)
        .collect();
    if sorted.is_empty() {
        return Ok(vec![]);
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let distinct = 1 + sorted.windows(2).filter(|w| w[0] != w[1]).count();
    let k = k.min(distinct);

    let n = sorted.len();
    if k == 1 {
        return Ok(vec![Bin::new(sorted[0] as f32, sorted[n - 1] as f32)]);
    }

    // Shift by the median so the prefix sums stay small.
    let shift = sorted[n / 2];
    let mut sums = Vec::with_capacity(n);
    let mut sums_sq = Vec::with_capacity(n);
    let mut acc = 0.0;
    let mut acc_sq = 0.0;
    for v in &sorted {
        let shifted = v - shift;
        acc += shifted;
        acc_sq += shifted * shifted;
        sums.push(acc);
        sums_sq.push(acc_sq);
    }

    let mut matrix = vec![vec![0.0f64; n]; k];
    let mut backtrack = vec![vec![0usize; n]; k];

    for i in 0..n {
        matrix[0][i] = ssq(0, i, &sums, &sums_sq);
        backtrack[0][i] = 0;
    }
    for cluster in 1..k {
        let i_min = if cluster < k - 1 { cluster } else { n - 1 };
        fill_matrix_column(
            i_min,
            n - 1,
            cluster,
            &mut matrix,
            &mut backtrack,
            &sums,
            &sums_sq,
        );
    }

    // Walk the backtrack matrix from the last cluster to recover boundaries.
    let mut bins = vec![Bin::new(0.0, 0.0); k];
    let mut right = n - 1;
    for cluster in (0..k).rev() {
        let left = backtrack[cluster][right];
        bins[cluster] = Bin::new(sorted[left] as f32, sorted[right] as f32);
        if cluster > 0 {
            right = left - 1;
        }
    }

    Ok(bins)
}

/// Boundary values in the shape `[first min, max of each bin...]`, handy for
/// legend labels and diagnostics.
pub fn break_points(bins: &[Bin]) -> Vec<f32> {
    let mut breaks = Vec::with_capacity(bins.len() + 1);
    if let Some(first) = bins.first() {
        breaks.push(first.min);
    }
    breaks.extend(bins.iter().map(|b| b.max));
    breaks
}

/// Within-cluster sum of squared deviations for the index range `j..=i`.
fn ssq(j: usize, i: usize, sums: &[f64], sums_sq: &[f64]) -> f64 {
    let (sum, sum_sq) = if j > 0 {
        (sums[i] - sums[j - 1], sums_sq[i] - sums_sq[j - 1])
    } else {
        (sums[i], sums_sq[i])
    };
    let count = (i - j + 1) as f64;
    (sum_sq - sum * sum / count).max(0.0)
}

#[allow(clippy::too_many_arguments)]
fn fill_matrix_column(
    i_min: usize,
    i_max: usize,
    cluster: usize,
    matrix: &mut [Vec<f64>],
    backtrack: &mut [Vec<usize>],
    sums: &[f64],
    sums_sq: &[f64],
) {
    if i_min > i_max {
        return;
    }
    let n = sums.len();
    let i = (i_min + i_max) / 2;

    matrix[cluster][i] = matrix[cluster - 1][i - 1];
    backtrack[cluster][i] = i;

    let mut j_low = cluster;
    if i_min > cluster {
        j_low = j_low.max(backtrack[cluster][i_min - 1]);
    }
    j_low = j_low.max(backtrack[cluster - 1][i]);

    let mut j_high = i - 1;
    if i_max < n - 1 {
        j_high = j_high.min(backtrack[cluster][i_max + 1]);
    }

    let mut j = j_high;
    while j >= j_low {
        let sji = ssq(j, i, sums, sums_sq);
        if sji + matrix[cluster - 1][j_low - 1] >= matrix[cluster][i] {
            break;
        }

        let ssq_j_low = ssq(j_low, i, sums, sums_sq) + matrix[cluster - 1][j_low - 1];
        if ssq_j_low < matrix[cluster][i] {
            matrix[cluster][i] = ssq_j_low;
            backtrack[cluster][i] = j_low;
        }
        j_low += 1;

        let ssq_j = sji + matrix[cluster - 1][j - 1];
        if ssq_j < matrix[cluster][i] {
            matrix[cluster][i] = ssq_j;
            backtrack[cluster][i] = j;
        }

        j -= 1;
    }

    // i >= i_min >= cluster >= 1, so i - 1 cannot underflow.
    fill_matrix_column(i_min, i - 1, cluster, matrix, backtrack, sums, sums_sq);
    fill_matrix_column(i + 1, i_max, cluster, matrix, backtrack, sums, sums_sq);
}
