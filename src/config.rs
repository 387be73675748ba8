/*
 * File: /src/config.rs
 * Created Date: Friday, January 26th 2024
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	NBVD configuration and builder
 */
use std::time::Duration;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::model::NbvdCoclusterer;
use crate::types::NbvdError;

/// How converged factors are turned into discrete labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelingMethod {
    /// Rescaled memberships R and C^T weighted by the block values.
    /// Only valid when k == l.
    Adherence,
    /// argmax over the raw memberships R and C^T
    Factors,
    /// Nearest centroid under cosine distance
    Centroids,
}

impl Default for LabelingMethod {
    fn default() -> Self {
        LabelingMethod::Adherence
    }
}

/// NBVD配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NbvdConfig {
    /// k
    pub n_row_clusters: usize,
    /// l
    pub n_col_clusters: usize,
    /// Z ≈ S*B*S^T for square Z
    pub symmetric: bool,
    /// Maximum updates per attempt
    pub iter_max: usize,
    /// Random restarts
    pub n_attempts: usize,
    /// None draws a seed from entropy
    pub seed: Option<u64>,
    /// Log per-attempt progress at info level
    pub verbose: bool,
    /// Keep (R, B, C) of every iteration of the best attempt
    pub save_history: bool,
    /// Keep the norm of every iteration of the best attempt
    pub save_norm_history: bool,
    /// Strategy for the final labels
    pub labeling: LabelingMethod,
    /// Added to every update denominator. 0.0 leaves divisions unguarded.
    pub epsilon: f64,
    /// Run attempts on the rayon pool
    pub parallel: bool,
    /// Per-attempt deadline, checked after every update
    pub timeout: Option<Duration>,
}

impl Default for NbvdConfig {
    fn default() -> Self {
        Self {
            n_row_clusters: 2,
            n_col_clusters: 2,
            symmetric: false,
            iter_max: 2000,
            n_attempts: 5,
            seed: None,
            verbose: false,
            save_history: false,
            save_norm_history: false,
            labeling: LabelingMethod::Adherence,
            epsilon: 0.0,
            parallel: true,
            timeout: None,
        }
    }
}

impl NbvdConfig {
    /// Check the configuration against the input before any computation
    pub fn validate(&self, z: &Array2<f64>) -> Result<(), NbvdError> {
        let (k, l) = (self.n_row_clusters, self.n_col_clusters);
        let (n, m) = z.dim();

        if k == 0 || l == 0 {
            return Err(NbvdError::InvalidClusterCount { rows: k, cols: l });
        }
        if self.n_attempts == 0 {
            return Err(NbvdError::NoAttempts);
        }
        if n == 0 || m == 0 {
            return Err(NbvdError::EmptyMatrix);
        }
        if z.iter().any(|v| !v.is_finite()) {
            return Err(NbvdError::NonFiniteInput);
        }
        if z.iter().any(|&v| v < 0.0) {
            return Err(NbvdError::NegativeInput);
        }
        if self.symmetric {
            if n != m {
                return Err(NbvdError::NonSquareSymmetric { rows: n, cols: m });
            }
            if k != l {
                return Err(NbvdError::SymmetricClusterMismatch { rows: k, cols: l });
            }
        }
        // attempts are always scored with adherence labels
        if k != l {
            return Err(NbvdError::AdherenceRequiresSquare { rows: k, cols: l });
        }
        Ok(())
    }
}

// ============ Builder模式 ============

pub struct NbvdBuilder {
    config: NbvdConfig,
}

impl NbvdBuilder {
    pub fn new() -> Self {
        Self {
            config: NbvdConfig::default(),
        }
    }

    pub fn clusters(mut self, n_row_clusters: usize, n_col_clusters: usize) -> Self {
        self.config.n_row_clusters = n_row_clusters;
        self.config.n_col_clusters = n_col_clusters;
        self
    }

    pub fn symmetric(mut self, symmetric: bool) -> Self {
        self.config.symmetric = symmetric;
        self
    }

    pub fn iter_max(mut self, iter_max: usize) -> Self {
        self.config.iter_max = iter_max;
        self
    }

    pub fn n_attempts(mut self, n_attempts: usize) -> Self {
        self.config.n_attempts = n_attempts;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn save_history(mut self, save: bool) -> Self {
        self.config.save_history = save;
        self
    }

    pub fn save_norm_history(mut self, save: bool) -> Self {
        self.config.save_norm_history = save;
        self
    }

    pub fn labeling(mut self, method: LabelingMethod) -> Self {
        self.config.labeling = method;
        self
    }

    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<NbvdCoclusterer, NbvdError> {
        let (k, l) = (self.config.n_row_clusters, self.config.n_col_clusters);
        if k == 0 || l == 0 {
            return Err(NbvdError::InvalidClusterCount { rows: k, cols: l });
        }
        Ok(NbvdCoclusterer::with_config(self.config))
    }
}

impl Default for NbvdBuilder {
    fn default() -> Self {
        Self::new()
    }
}
