//! Co-clustering of non-negative matrices with the NBVD tri-factorization
//! Z ≈ R * B * C, random restarts selected by cosine silhouette.
//!
//! ```no_run
//! use nbvd_cocluster::NbvdCoclusterer;
//! use ndarray::Array2;
//!
//! let z = Array2::<f64>::ones((6, 6));
//! let model = NbvdCoclusterer::builder()
//!     .clusters(2, 2)
//!     .seed(42)
//!     .build()?
//!     .fit(&z)?;
//! println!("{:?}", model.row_labels());
//! # Ok::<(), nbvd_cocluster::NbvdError>(())
//! ```

/*
 * File: /src/lib.rs
 * Created Date: Monday, January 22nd 2024
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	NBVD co-clustering crate layout
 */

pub mod association;
pub mod atom;
pub mod centroids;
pub mod config;
pub mod labeling;
pub mod model;
pub mod scoring;
pub mod submatrix;
pub mod types;
pub mod util;

pub use config::{LabelingMethod, NbvdBuilder, NbvdConfig};
pub use model::{NbvdCoclusterer, NbvdModel};
pub use scoring::SilhouettePair;
pub use types::{AttemptResult, BasisVectors, BiclusterMask, Centroids, Factors, Labels, NbvdError};
