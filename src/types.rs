//! # NBVD Data Structures
//!
//! Factor triples, attempt results, label sets and the error taxonomy shared
//! by the optimizer, the label extractor and the model.

/*
 * File: /src/types.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Data model and errors for NBVD co-clustering
 */

use ndarray::{Array2, ArrayView2};
use std::error::Error;
use std::fmt;

use crate::scoring::SilhouettePair;

/// Tri-factorization Z ≈ R * B * C
///
/// - `r`: n×k row-membership coefficients
/// - `b`: k×l block values
/// - `c`: l×m column-membership coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct Factors {
    pub r: Array2<f64>,
    pub b: Array2<f64>,
    pub c: Array2<f64>,
}

impl Factors {
    pub fn new(r: Array2<f64>, b: Array2<f64>, c: Array2<f64>) -> Self {
        Self { r, b, c }
    }

    /// Reconstruction R * B * C (n×m)
    pub fn reconstruct(&self) -> Array2<f64> {
        self.r.dot(&self.b).dot(&self.c)
    }

    /// (k, l)
    pub fn n_clusters(&self) -> (usize, usize) {
        self.b.dim()
    }

    pub fn is_non_negative(&self) -> bool {
        [&self.r, &self.b, &self.c]
            .iter()
            .all(|m| m.iter().all(|&v| v >= 0.0))
    }
}

/// Outcome of one random-restart attempt
#[derive(Debug, Clone)]
pub struct AttemptResult {
    /// Index of the attempt (0-based)
    pub attempt: usize,
    pub factors: Factors,
    /// ‖Z - R*B*C‖_F at stop
    pub norm: f64,
    /// Number of updates applied
    pub iterations: usize,
    /// None when the adherence labels did not cover at least two clusters
    pub quality: Option<SilhouettePair>,
    pub norm_history: Option<Vec<f64>>,
    /// Snapshots taken before the first update and after each update
    pub history: Option<Vec<Factors>>,
}

impl AttemptResult {
    /// Strict improvement over `other`: a scored attempt beats an unscored one,
    /// scored attempts compare by mean silhouette. Ties keep `other`.
    pub fn is_better_than(&self, other: &AttemptResult) -> bool {
        match (&self.quality, &other.quality) {
            (Some(mine), Some(theirs)) => mine.mean() > theirs.mean(),
            (Some(_), None) => true,
            _ => false,
        }
    }
}

/// Discrete row and column assignments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    /// n entries in [0, k)
    pub rows: Vec<usize>,
    /// m entries in [0, l)
    pub cols: Vec<usize>,
}

/// Boolean membership masks derived from labels.
///
/// `rows` is k×n (`rows[[c, i]]` iff row i has label c),
/// `cols` is l×m (`cols[[c, j]]` iff column j has label c).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiclusterMask {
    pub rows: Array2<bool>,
    pub cols: Array2<bool>,
}

impl BiclusterMask {
    pub fn from_labels(labels: &Labels, n_row_clusters: usize, n_col_clusters: usize) -> Self {
        Self {
            rows: membership_mask(&labels.rows, n_row_clusters),
            cols: membership_mask(&labels.cols, n_col_clusters),
        }
    }

    /// Indices of the rows assigned to `cluster`
    pub fn row_members(&self, cluster: usize) -> Vec<usize> {
        members(self.rows.view(), cluster)
    }

    /// Indices of the columns assigned to `cluster`
    pub fn col_members(&self, cluster: usize) -> Vec<usize> {
        members(self.cols.view(), cluster)
    }
}

fn membership_mask(labels: &[usize], n_clusters: usize) -> Array2<bool> {
    Array2::from_shape_fn((n_clusters, labels.len()), |(c, i)| labels[i] == c)
}

fn members(mask: ArrayView2<bool>, cluster: usize) -> Vec<usize> {
    if cluster >= mask.nrows() {
        return Vec::new();
    }
    mask.row(cluster)
        .iter()
        .enumerate()
        .filter(|(_, &hit)| hit)
        .map(|(idx, _)| idx)
        .collect()
}

/// Per-cluster means of the input.
///
/// `rows` is m×k: column c is the mean of Z's rows labelled c.
/// `cols` is n×l: column c is the mean of Z's columns labelled c.
#[derive(Debug, Clone, PartialEq)]
pub struct Centroids {
    pub rows: Array2<f64>,
    pub cols: Array2<f64>,
}

/// Projections cached for downstream visualization.
///
/// `rows` = R*B (n×l), `cols` = (B*C)^T (m×k).
#[derive(Debug, Clone, PartialEq)]
pub struct BasisVectors {
    pub rows: Array2<f64>,
    pub cols: Array2<f64>,
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised by NBVD co-clustering
#[derive(Debug, Clone, PartialEq)]
pub enum NbvdError {
    InvalidClusterCount { rows: usize, cols: usize },
    NoAttempts,
    EmptyMatrix,
    NegativeInput,
    NonFiniteInput,
    NonSquareSymmetric { rows: usize, cols: usize },
    SymmetricClusterMismatch { rows: usize, cols: usize },
    AdherenceRequiresSquare { rows: usize, cols: usize },
    MissingBlockValues,
    MissingCentroids,
    ShapeMismatch { expected: usize, found: usize },
    MatrixShapeMismatch { expected: (usize, usize), found: (usize, usize) },
    DegenerateLabels { distinct: usize, samples: usize },
    NumericalDegeneracy { attempt: usize, iteration: usize },
    NoValidAttempt,
}

impl NbvdError {
    /// Configuration errors abort construction before any computation
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            NbvdError::InvalidClusterCount { .. }
                | NbvdError::NoAttempts
                | NbvdError::EmptyMatrix
                | NbvdError::NegativeInput
                | NbvdError::NonFiniteInput
                | NbvdError::NonSquareSymmetric { .. }
                | NbvdError::SymmetricClusterMismatch { .. }
                | NbvdError::AdherenceRequiresSquare { .. }
                | NbvdError::MissingBlockValues
                | NbvdError::MissingCentroids
        )
    }
}

impl fmt::Display for NbvdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NbvdError::InvalidClusterCount { rows, cols } => write!(
                f,
                "Cluster counts must be positive (rows: {}, cols: {})",
                rows, cols
            ),
            NbvdError::NoAttempts => write!(f, "At least one attempt is required"),
            NbvdError::EmptyMatrix => write!(f, "Input matrix has no rows or no columns"),
            NbvdError::NegativeInput => write!(f, "Input matrix has negative entries"),
            NbvdError::NonFiniteInput => write!(f, "Input matrix has NaN or infinite entries"),
            NbvdError::NonSquareSymmetric { rows, cols } => write!(
                f,
                "Symmetric mode requires a square matrix, got {}x{}",
                rows, cols
            ),
            NbvdError::SymmetricClusterMismatch { rows, cols } => write!(
                f,
                "Symmetric mode requires equal cluster counts, got {} row and {} column clusters",
                rows, cols
            ),
            NbvdError::AdherenceRequiresSquare { rows, cols } => write!(
                f,
                "Adherence labeling requires a square block value matrix, got {}x{}",
                rows, cols
            ),
            NbvdError::MissingBlockValues => {
                write!(f, "Factor-based labeling needs the converged factors")
            }
            NbvdError::MissingCentroids => write!(f, "Centroid labeling needs precomputed centroids"),
            NbvdError::ShapeMismatch { expected, found } => write!(
                f,
                "Dimension mismatch: expected {}, found {}",
                expected, found
            ),
            NbvdError::MatrixShapeMismatch { expected, found } => write!(
                f,
                "Matrix shape mismatch: model was fitted on {}x{}, got {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            NbvdError::DegenerateLabels { distinct, samples } => write!(
                f,
                "Silhouette undefined for {} distinct labels over {} samples",
                distinct, samples
            ),
            NbvdError::NumericalDegeneracy { attempt, iteration } => write!(
                f,
                "Attempt #{} produced non-finite values at iteration {}",
                attempt + 1,
                iteration
            ),
            NbvdError::NoValidAttempt => write!(f, "Every attempt degenerated numerically"),
        }
    }
}

impl Error for NbvdError {}
