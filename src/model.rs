//! # NBVD Co-clusterer
//!
//! Entry point of the crate: validates the configuration, runs the restart
//! attempts and derives labels, association, centroids and basis vectors
//! from the winning factors.

/*
 * File: /src/model.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	NBVD model with labels, centroids and co-cluster blocks
 */

use std::time::Instant;

use log::info;
use ndarray::Array2;
use ndarray_rand::rand;

use crate::association::{associated_pairs, cluster_association};
use crate::atom::run_attempts;
use crate::centroids::{basis_vectors, compute_centroids, distances_to_centroid, nearest_centroid};
use crate::config::{LabelingMethod, NbvdBuilder, NbvdConfig};
use crate::labeling::{adherence_labels, extract_labels};
use crate::scoring::SilhouettePair;
use crate::submatrix::Submatrix;
use crate::types::{AttemptResult, BasisVectors, BiclusterMask, Centroids, Factors, Labels, NbvdError};

/// NBVD co-clusterer
pub struct NbvdCoclusterer {
    config: NbvdConfig,
}

impl NbvdCoclusterer {
    pub fn new(n_row_clusters: usize, n_col_clusters: usize) -> Self {
        Self {
            config: NbvdConfig {
                n_row_clusters,
                n_col_clusters,
                ..Default::default()
            },
        }
    }

    pub fn with_config(config: NbvdConfig) -> Self {
        Self { config }
    }

    pub fn builder() -> NbvdBuilder {
        NbvdBuilder::new()
    }

    pub fn config(&self) -> &NbvdConfig {
        &self.config
    }

    /// Co-cluster `z`. Configuration errors are reported before any
    /// computation and never yield a partial model.
    pub fn fit(&self, z: &Array2<f64>) -> Result<NbvdModel, NbvdError> {
        self.config.validate(z)?;

        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        let (n, m) = z.dim();
        info!(
            "NBVD on {}x{} matrix: {} row / {} col clusters, {} attempts, symmetric: {}",
            n, m, self.config.n_row_clusters, self.config.n_col_clusters, self.config.n_attempts, self.config.symmetric
        );

        let start = Instant::now();
        let best = run_attempts(z, &self.config, base_seed)?;
        let model = NbvdModel::from_attempt(z, best, &self.config)?;
        info!(
            "NBVD done in {:?}: norm {:.6} after {} iterations",
            start.elapsed(),
            model.best_norm,
            model.best_iter
        );
        Ok(model)
    }
}

/// Winning factorization and everything derived from it
#[derive(Debug, Clone)]
pub struct NbvdModel {
    config: NbvdConfig,
    factors: Factors,
    best_norm: f64,
    best_iter: usize,
    best_attempt: usize,
    silhouette: Option<SilhouettePair>,
    labels: Labels,
    biclusters: BiclusterMask,
    cluster_assoc: Array2<bool>,
    centroids: Centroids,
    basis_vectors: BasisVectors,
    norm_history: Option<Vec<f64>>,
    history: Option<Vec<Factors>>,
}

impl NbvdModel {
    fn from_attempt(z: &Array2<f64>, best: AttemptResult, config: &NbvdConfig) -> Result<Self, NbvdError> {
        let (k, l) = best.factors.n_clusters();
        let factors = best.factors;

        // the centroid strategy classifies against centroids of the adherence labels
        let (biclusters, labels) = match config.labeling {
            LabelingMethod::Centroids => {
                let seed_labels = adherence_labels(&factors)?;
                let seed_centroids = compute_centroids(z, &seed_labels, k, l);
                extract_labels(config.labeling, z, Some(&factors), Some(&seed_centroids))?
            }
            method => extract_labels(method, z, Some(&factors), None)?,
        };
        let centroids = compute_centroids(z, &labels, k, l);

        Ok(Self {
            config: config.clone(),
            cluster_assoc: cluster_association(&factors.b),
            basis_vectors: basis_vectors(&factors),
            factors,
            best_norm: best.norm,
            best_iter: best.iterations,
            best_attempt: best.attempt,
            silhouette: best.quality,
            labels,
            biclusters,
            centroids,
            norm_history: best.norm_history,
            history: best.history,
        })
    }

    pub fn config(&self) -> &NbvdConfig {
        &self.config
    }

    pub fn factors(&self) -> &Factors {
        &self.factors
    }

    pub fn r(&self) -> &Array2<f64> {
        &self.factors.r
    }

    pub fn b(&self) -> &Array2<f64> {
        &self.factors.b
    }

    pub fn c(&self) -> &Array2<f64> {
        &self.factors.c
    }

    /// Shared factor S (= R = C^T) in symmetric mode
    pub fn s(&self) -> Option<&Array2<f64>> {
        self.config.symmetric.then(|| &self.factors.r)
    }

    /// R * B * C
    pub fn reconstruction(&self) -> Array2<f64> {
        self.factors.reconstruct()
    }

    pub fn row_labels(&self) -> &[usize] {
        &self.labels.rows
    }

    pub fn column_labels(&self) -> &[usize] {
        &self.labels.cols
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn biclusters(&self) -> &BiclusterMask {
        &self.biclusters
    }

    pub fn cluster_association(&self) -> &Array2<bool> {
        &self.cluster_assoc
    }

    pub fn centroids(&self) -> &Centroids {
        &self.centroids
    }

    pub fn basis_vectors(&self) -> &BasisVectors {
        &self.basis_vectors
    }

    pub fn best_norm(&self) -> f64 {
        self.best_norm
    }

    pub fn best_iter(&self) -> usize {
        self.best_iter
    }

    /// 0-based index of the winning attempt
    pub fn best_attempt(&self) -> usize {
        self.best_attempt
    }

    /// None when no attempt produced a scorable labeling
    pub fn silhouette(&self) -> Option<SilhouettePair> {
        self.silhouette
    }

    pub fn norm_history(&self) -> Option<&[f64]> {
        self.norm_history.as_deref()
    }

    pub fn history(&self) -> Option<&[Factors]> {
        self.history.as_deref()
    }

    fn check_training_shape(&self, z: &Array2<f64>) -> Result<(), NbvdError> {
        let expected = (self.factors.r.nrows(), self.factors.c.ncols());
        if z.dim() != expected {
            return Err(NbvdError::MatrixShapeMismatch {
                expected,
                found: z.dim(),
            });
        }
        Ok(())
    }

    /// Labels of the training data under another strategy
    pub fn labels_with(&self, method: LabelingMethod, z: &Array2<f64>) -> Result<(BiclusterMask, Labels), NbvdError> {
        self.check_training_shape(z)?;
        extract_labels(method, z, Some(&self.factors), Some(&self.centroids))
    }

    /// Row cluster of each row of `x` (x has the training column count)
    pub fn classify_rows(&self, x: &Array2<f64>) -> Result<Vec<usize>, NbvdError> {
        nearest_centroid(x.view(), self.centroids.rows.view())
    }

    /// Column cluster of each column of `x` (x has the training row count)
    pub fn classify_columns(&self, x: &Array2<f64>) -> Result<Vec<usize>, NbvdError> {
        nearest_centroid(x.t(), self.centroids.cols.view())
    }

    /// One block per associated (row cluster, column cluster) pair whose
    /// rows and columns are both non-empty
    pub fn coclusters<'a>(&self, z: &'a Array2<f64>) -> Result<Vec<Submatrix<'a, f64>>, NbvdError> {
        self.check_training_shape(z)?;
        Ok(associated_pairs(&self.cluster_assoc)
            .into_iter()
            .filter_map(|(rc, cc)| {
                let rows = self.biclusters.row_members(rc);
                let cols = self.biclusters.col_members(cc);
                Submatrix::from_indices(z, &rows, &cols)
            })
            .collect())
    }

    /// Up to `n` members of every row cluster, closest to its centroid first
    pub fn row_representatives(&self, z: &Array2<f64>, n: usize) -> Result<Vec<Vec<usize>>, NbvdError> {
        self.check_training_shape(z)?;
        let distances = distances_to_centroid(z.view(), &self.labels.rows, self.centroids.rows.view())?;
        let k = self.factors.b.nrows();

        Ok((0..k)
            .map(|cluster| {
                let mut members: Vec<usize> = self.biclusters.row_members(cluster);
                members.sort_by(|&a, &b| distances[a].total_cmp(&distances[b]));
                members.truncate(n);
                members
            })
            .collect())
    }
}
