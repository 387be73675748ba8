//! Row-cluster ↔ column-cluster association from the block value matrix

use ndarray::{Array2, Axis};
use statrs::statistics::Statistics;

/// `assoc[[i, j]]` iff B[i, j] is at least the average of row i of B,
/// so every row cluster is associated with at least one column cluster.
pub fn cluster_association(b: &Array2<f64>) -> Array2<bool> {
    let row_avg: Vec<f64> = b.axis_iter(Axis(0)).map(|row| row.iter().mean()).collect();
    Array2::from_shape_fn(b.dim(), |(i, j)| b[[i, j]] >= row_avg[i])
}

/// Associated (row cluster, column cluster) pairs in row-major order
pub fn associated_pairs(assoc: &Array2<bool>) -> Vec<(usize, usize)> {
    assoc
        .indexed_iter()
        .filter(|(_, &linked)| linked)
        .map(|(idx, _)| idx)
        .collect()
}
