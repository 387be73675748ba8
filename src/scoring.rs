/*
 * File: ./src/scoring.rs
 * Created Date: Monday, May 26th 2025
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Cosine silhouette for attempt selection
**/
use std::collections::BTreeSet;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::types::NbvdError;
use crate::util::cosine_distances;

/// Quality of one co-clustering: silhouette of the rows (on Z) and of the
/// columns (on Z^T). Compared by the unweighted mean of the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SilhouettePair {
    pub rows: f64,
    pub cols: f64,
}

impl SilhouettePair {
    pub fn new(rows: f64, cols: f64) -> Self {
        Self { rows, cols }
    }

    pub fn mean(&self) -> f64 {
        (self.rows + self.cols) / 2.0
    }

    /// Row silhouette on `z`, column silhouette on `z^T`
    pub fn compute(z: &Array2<f64>, row_labels: &[usize], col_labels: &[usize]) -> Result<Self, NbvdError> {
        let rows = silhouette_score(z.view(), row_labels)?;
        let cols = silhouette_score(z.t(), col_labels)?;
        Ok(Self { rows, cols })
    }
}

/// Mean silhouette coefficient of `labels` over the rows of `samples`,
/// using cosine distance.
///
/// s(i) = (b(i) - a(i)) / max(a(i), b(i)), where a(i) is the mean distance to
/// the rest of i's cluster and b(i) the smallest mean distance to another
/// cluster. Samples alone in their cluster score 0.
///
/// Undefined unless 2 <= distinct labels <= n_samples - 1.
pub fn silhouette_score(samples: ArrayView2<f64>, labels: &[usize]) -> Result<f64, NbvdError> {
    let n = samples.nrows();
    if labels.len() != n {
        return Err(NbvdError::ShapeMismatch {
            expected: n,
            found: labels.len(),
        });
    }

    let distinct: BTreeSet<usize> = labels.iter().copied().collect();
    if distinct.len() < 2 || distinct.len() >= n {
        return Err(NbvdError::DegenerateLabels {
            distinct: distinct.len(),
            samples: n,
        });
    }

    let n_clusters = distinct.iter().max().map_or(0, |&c| c + 1);
    let mut sizes = vec![0usize; n_clusters];
    for &label in labels {
        sizes[label] += 1;
    }

    let distances = cosine_distances(samples, samples);
    let coefficients: Vec<f64> = (0..n)
        .map(|i| sample_coefficient(&distances, labels, &sizes, i))
        .collect();

    Ok(coefficients.iter().mean())
}

fn sample_coefficient(distances: &Array2<f64>, labels: &[usize], sizes: &[usize], i: usize) -> f64 {
    let own = labels[i];
    if sizes[own] <= 1 {
        return 0.0;
    }

    let mut sums = vec![0.0; sizes.len()];
    for (j, &label) in labels.iter().enumerate() {
        if j != i {
            sums[label] += distances[[i, j]];
        }
    }

    let a = sums[own] / (sizes[own] - 1) as f64;
    let b = sums
        .iter()
        .zip(sizes)
        .enumerate()
        .filter(|&(c, (_, &size))| c != own && size > 0)
        .map(|(_, (&sum, &size))| sum / size as f64)
        .fold(f64::INFINITY, f64::min);

    let denom = a.max(b);
    if denom > 0.0 {
        (b - a) / denom
    } else {
        0.0
    }
}
