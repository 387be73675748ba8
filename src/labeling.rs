//! Label extraction: turns converged factors (or centroids) into discrete
//! row/column assignments.

use ndarray::{Array2, Axis};

use crate::centroids::nearest_centroid;
use crate::config::LabelingMethod;
use crate::types::{BiclusterMask, Centroids, Factors, Labels, NbvdError};
use crate::util::argmax_rows;

/// Row adherence (n×k) and column adherence (m×l) scores.
///
/// B is divided by the total mass of R*B*C so it behaves like a joint
/// distribution. With du = column sums of R and dv = column sums of C^T:
///   row_adh = R * diag(B * dv)
///   col_adh = C^T * diag(du^T * B)
pub fn adherence(factors: &Factors) -> Result<(Array2<f64>, Array2<f64>), NbvdError> {
    let (k, l) = factors.n_clusters();
    if k != l {
        return Err(NbvdError::AdherenceRequiresSquare { rows: k, cols: l });
    }

    let mass = factors.reconstruct().sum();
    let s = &factors.b / mass;
    let du = factors.r.sum_axis(Axis(0)); // k
    let dv = factors.c.sum_axis(Axis(1)); // l

    let row_scale = s.dot(&dv); // k
    let col_scale = du.dot(&s); // l

    let row_adh = &factors.r * &row_scale.insert_axis(Axis(0));
    let col_adh = &factors.c.t() * &col_scale.insert_axis(Axis(0));
    Ok((row_adh, col_adh))
}

pub fn adherence_labels(factors: &Factors) -> Result<Labels, NbvdError> {
    let (row_adh, col_adh) = adherence(factors)?;
    Ok(Labels {
        rows: argmax_rows(row_adh.view()),
        cols: argmax_rows(col_adh.view()),
    })
}

/// argmax over the raw memberships: R for rows, C^T for columns
pub fn factor_labels(factors: &Factors) -> Labels {
    Labels {
        rows: argmax_rows(factors.r.view()),
        cols: argmax_rows(factors.c.t()),
    }
}

/// Assign every row of Z to its nearest row centroid and every column of Z
/// to its nearest column centroid (cosine distance).
pub fn centroid_labels(z: &Array2<f64>, centroids: &Centroids) -> Result<Labels, NbvdError> {
    Ok(Labels {
        rows: nearest_centroid(z.view(), centroids.rows.view())?,
        cols: nearest_centroid(z.t(), centroids.cols.view())?,
    })
}

/// Labels and membership masks under `method`.
///
/// Factor-based methods need `factors`, the centroid method needs `centroids`.
pub fn extract_labels(
    method: LabelingMethod,
    z: &Array2<f64>,
    factors: Option<&Factors>,
    centroids: Option<&Centroids>,
) -> Result<(BiclusterMask, Labels), NbvdError> {
    let (labels, (k, l)) = match method {
        LabelingMethod::Adherence => {
            let factors = factors.ok_or(NbvdError::MissingBlockValues)?;
            (adherence_labels(factors)?, factors.n_clusters())
        }
        LabelingMethod::Factors => {
            let factors = factors.ok_or(NbvdError::MissingBlockValues)?;
            (factor_labels(factors), factors.n_clusters())
        }
        LabelingMethod::Centroids => {
            let centroids = centroids.ok_or(NbvdError::MissingCentroids)?;
            (
                centroid_labels(z, centroids)?,
                (centroids.rows.ncols(), centroids.cols.ncols()),
            )
        }
    };
    Ok((BiclusterMask::from_labels(&labels, k, l), labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centroids::compute_centroids;
    use ndarray::array;

    fn block_factors() -> Factors {
        // rows 0,1 → cluster 0; rows 2,3 → cluster 1; columns alike
        Factors::new(
            array![[0.9, 0.1], [0.8, 0.0], [0.1, 0.7], [0.0, 0.9]],
            array![[5.0, 0.5], [0.5, 4.0]],
            array![[1.0, 0.7, 0.1, 0.0], [0.0, 0.2, 0.9, 1.0]],
        )
    }

    #[test]
    fn test_adherence_matches_manual_formula() {
        let f = block_factors();
        let (row_adh, col_adh) = adherence(&f).unwrap();
        assert_eq!(row_adh.dim(), (4, 2));
        assert_eq!(col_adh.dim(), (4, 2));

        let mass = f.reconstruct().sum();
        let du = [1.8, 1.7];
        let dv = [1.8, 2.1];
        let s = &f.b / mass;
        let row_scale0 = s[[0, 0]] * dv[0] + s[[0, 1]] * dv[1];
        let col_scale1 = du[0] * s[[0, 1]] + du[1] * s[[1, 1]];
        assert!((row_adh[[1, 0]] - 0.8 * row_scale0).abs() < 1e-12);
        assert!((col_adh[[2, 1]] - 0.9 * col_scale1).abs() < 1e-12);
    }

    #[test]
    fn test_adherence_and_factor_labels() {
        let f = block_factors();
        let labels = adherence_labels(&f).unwrap();
        assert_eq!(labels.rows, vec![0, 0, 1, 1]);
        assert_eq!(labels.cols, vec![0, 0, 1, 1]);
        assert_eq!(factor_labels(&f), labels);
    }

    #[test]
    fn test_adherence_requires_square_block_values() {
        let f = Factors::new(
            Array2::ones((3, 2)),
            Array2::ones((2, 3)),
            Array2::ones((3, 4)),
        );
        assert_eq!(
            adherence_labels(&f),
            Err(NbvdError::AdherenceRequiresSquare { rows: 2, cols: 3 })
        );
        // raw memberships have no such restriction
        let labels = factor_labels(&f);
        assert_eq!(labels.rows.len(), 3);
        assert_eq!(labels.cols.len(), 4);
    }

    #[test]
    fn test_extract_labels_requires_inputs() {
        let z = Array2::ones((4, 4));
        assert_eq!(
            extract_labels(LabelingMethod::Adherence, &z, None, None).unwrap_err(),
            NbvdError::MissingBlockValues
        );
        assert_eq!(
            extract_labels(LabelingMethod::Factors, &z, None, None).unwrap_err(),
            NbvdError::MissingBlockValues
        );
        assert_eq!(
            extract_labels(LabelingMethod::Centroids, &z, Some(&block_factors()), None)
                .unwrap_err(),
            NbvdError::MissingCentroids
        );
    }

    #[test]
    fn test_centroid_labels_recover_blocks() {
        let z = array![
            [9.0, 8.0, 0.1, 0.2],
            [8.0, 9.0, 0.2, 0.1],
            [0.1, 0.3, 9.0, 8.0],
            [0.2, 0.1, 8.0, 9.0]
        ];
        let seed_labels = Labels {
            rows: vec![0, 0, 1, 1],
            cols: vec![0, 0, 1, 1],
        };
        let centroids = compute_centroids(&z, &seed_labels, 2, 2);
        let (mask, labels) =
            extract_labels(LabelingMethod::Centroids, &z, None, Some(&centroids)).unwrap();
        assert_eq!(labels, seed_labels);
        assert_eq!(mask.rows.dim(), (2, 4));
        assert!(mask.rows[[1, 3]] && !mask.rows[[0, 3]]);
    }
}
