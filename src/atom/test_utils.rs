/// Shared test utilities for the NBVD optimizer and labeling
use ndarray::Array2;

/// Create a synthetic block-diagonal matrix with clear 2x2 co-cluster structure.
/// Blocks (0,0) and (1,1) hold `high`, off-diagonal blocks hold `low`.
/// Returns a (2*block)x(2*block) matrix: rows/cols 0..block → cluster 0,
/// block..2*block → cluster 1.
pub fn make_block_diagonal(block: usize, high: f64, low: f64) -> Array2<f64> {
    let n = 2 * block;
    Array2::from_shape_fn((n, n), |(i, j)| if (i < block) == (j < block) { high } else { low })
}

/// Check that labels correctly separate the two blocks.
/// Entries 0..block_size should share one label, the rest a different one.
pub fn check_block_labels(labels: &[usize], block_size: usize) -> bool {
    if labels.len() != block_size * 2 {
        return false;
    }
    let label_a = labels[0];
    let label_b = labels[block_size];

    let block0_consistent = labels[..block_size].iter().all(|&l| l == label_a);
    let block1_consistent = labels[block_size..].iter().all(|&l| l == label_b);
    let different = label_a != label_b;

    block0_consistent && block1_consistent && different
}
