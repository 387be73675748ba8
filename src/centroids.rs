//! Centroids, basis vectors and nearest-centroid classification

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::types::{BasisVectors, Centroids, Factors, Labels, NbvdError};
use crate::util::{argmax_rows, cosine_distances};

/// Mean of the samples (rows of `samples`) in each cluster, one centroid per
/// column of the result (dim × n_clusters). Empty clusters get a zero centroid.
pub fn centroids_by_cluster(samples: ArrayView2<f64>, labels: &[usize], n_clusters: usize) -> Array2<f64> {
    let dim = samples.ncols();
    let mut sums = Array2::<f64>::zeros((dim, n_clusters));
    let mut counts = vec![0usize; n_clusters];

    for (sample, &label) in samples.axis_iter(Axis(0)).zip(labels) {
        if label >= n_clusters {
            continue;
        }
        let mut column = sums.column_mut(label);
        column += &sample;
        counts[label] += 1;
    }

    for (c, &count) in counts.iter().enumerate() {
        if count > 0 {
            sums.column_mut(c).mapv_inplace(|v| v / count as f64);
        }
    }
    sums
}

/// Row centroids (m×k) from Z and column centroids (n×l) from Z^T
pub fn compute_centroids(
    z: &Array2<f64>,
    labels: &Labels,
    n_row_clusters: usize,
    n_col_clusters: usize,
) -> Centroids {
    Centroids {
        rows: centroids_by_cluster(z.view(), &labels.rows, n_row_clusters),
        cols: centroids_by_cluster(z.t(), &labels.cols, n_col_clusters),
    }
}

/// R*B (n×l) and (B*C)^T (m×k)
pub fn basis_vectors(factors: &Factors) -> BasisVectors {
    BasisVectors {
        rows: factors.r.dot(&factors.b),
        cols: factors.b.dot(&factors.c).reversed_axes(),
    }
}

/// Index of the closest centroid (columns of `centroids`) for every row of
/// `samples`, by cosine distance. First centroid wins ties.
pub fn nearest_centroid(samples: ArrayView2<f64>, centroids: ArrayView2<f64>) -> Result<Vec<usize>, NbvdError> {
    if samples.ncols() != centroids.nrows() {
        return Err(NbvdError::ShapeMismatch {
            expected: centroids.nrows(),
            found: samples.ncols(),
        });
    }
    let distances = cosine_distances(samples, centroids.t());
    let similarity = distances.mapv(|d| -d);
    Ok(argmax_rows(similarity.view()))
}

/// Cosine distance of every sample to its own cluster centroid
pub fn distances_to_centroid(
    samples: ArrayView2<f64>,
    labels: &[usize],
    centroids: ArrayView2<f64>,
) -> Result<Array1<f64>, NbvdError> {
    if samples.ncols() != centroids.nrows() {
        return Err(NbvdError::ShapeMismatch {
            expected: centroids.nrows(),
            found: samples.ncols(),
        });
    }
    let distances = cosine_distances(samples, centroids.t());
    Ok(Array1::from_iter(
        labels
            .iter()
            .enumerate()
            .map(|(i, &label)| distances.get((i, label)).copied().unwrap_or(f64::NAN)),
    ))
}
