//! Integration tests for NBVD co-clustering
//!
//! Exercises the public API end to end:
//! 1. Restart attempts and model selection
//! 2. Label extraction, association and centroids
//! 3. Configuration errors and reproducibility

use nbvd_cocluster::util::are_equivalent_classifications;
use nbvd_cocluster::{LabelingMethod, NbvdCoclusterer, NbvdConfig, NbvdError, NbvdModel};
use ndarray::Array2;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two 3x3 diagonal blocks of `amplitude` over off-block noise `noise`
fn two_block_matrix(amplitude: f64, noise: f64) -> Array2<f64> {
    Array2::from_shape_fn((6, 6), |(i, j)| if (i < 3) == (j < 3) { amplitude } else { noise })
}

/// Create a synthetic matrix with planted co-cluster structure
fn create_test_matrix(n_rows: usize, n_cols: usize, n_clusters: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut matrix = Array2::random_using((n_rows, n_cols), Uniform::new(0.0, 0.5), &mut rng);

    let rows_per_cluster = n_rows / n_clusters;
    let cols_per_cluster = n_cols / n_clusters;

    for k in 0..n_clusters {
        for i in k * rows_per_cluster..((k + 1) * rows_per_cluster).min(n_rows) {
            for j in k * cols_per_cluster..((k + 1) * cols_per_cluster).min(n_cols) {
                matrix[[i, j]] += 5.0;
            }
        }
    }

    matrix
}

fn fit(z: &Array2<f64>, config: NbvdConfig) -> NbvdModel {
    NbvdCoclusterer::with_config(config).fit(z).unwrap()
}

fn scenario_config() -> NbvdConfig {
    NbvdConfig {
        n_row_clusters: 2,
        n_col_clusters: 2,
        n_attempts: 3,
        iter_max: 200,
        seed: Some(42),
        ..Default::default()
    }
}

#[test]
fn test_two_block_reconstruction_and_labels() {
    init_logger();
    let z = two_block_matrix(10.0, 0.1);
    let model = fit(&z, scenario_config());

    assert!(are_equivalent_classifications(model.row_labels(), &[0, 0, 0, 1, 1, 1]));
    assert!(are_equivalent_classifications(model.column_labels(), &[0, 0, 0, 1, 1, 1]));
    assert_ne!(model.row_labels()[0], model.row_labels()[3]);
    assert!(model.best_norm() < 1.0, "norm = {}", model.best_norm());
    assert!(model.best_iter() >= 1 && model.best_iter() <= 200);
    assert!(model.best_attempt() < 3);
}

#[test]
fn test_two_block_association_pattern() {
    let z = two_block_matrix(10.0, 0.1);
    let model = fit(&z, scenario_config());
    let assoc = model.cluster_association();

    for i in 0..6 {
        for j in 0..6 {
            let same_block = (i < 3) == (j < 3);
            let linked = assoc[[model.row_labels()[i], model.column_labels()[j]]];
            assert_eq!(linked, same_block, "row {} col {}", i, j);
        }
    }
}

#[test]
fn test_label_domain_and_bicluster_consistency() {
    let z = create_test_matrix(30, 24, 3, 1);
    let config = NbvdConfig {
        n_row_clusters: 3,
        n_col_clusters: 3,
        n_attempts: 2,
        iter_max: 300,
        seed: Some(5),
        ..Default::default()
    };
    let model = fit(&z, config);

    assert_eq!(model.row_labels().len(), 30);
    assert_eq!(model.column_labels().len(), 24);
    assert!(model.row_labels().iter().all(|&l| l < 3));
    assert!(model.column_labels().iter().all(|&l| l < 3));

    let mask = model.biclusters();
    assert_eq!(mask.rows.dim(), (3, 30));
    assert_eq!(mask.cols.dim(), (3, 24));
    for (i, &label) in model.row_labels().iter().enumerate() {
        for c in 0..3 {
            assert_eq!(mask.rows[[c, i]], label == c);
        }
    }
    for (j, &label) in model.column_labels().iter().enumerate() {
        for c in 0..3 {
            assert_eq!(mask.cols[[c, j]], label == c);
        }
    }
}

#[test]
fn test_centroids_are_label_means() {
    let z = create_test_matrix(20, 16, 2, 3);
    let model = fit(
        &z,
        NbvdConfig {
            seed: Some(11),
            iter_max: 300,
            ..scenario_config()
        },
    );
    let centroids = model.centroids();
    assert_eq!(centroids.rows.dim(), (16, 2));
    assert_eq!(centroids.cols.dim(), (20, 2));

    for c in 0..2 {
        let members: Vec<usize> = (0..20).filter(|&i| model.row_labels()[i] == c).collect();
        if members.is_empty() {
            continue;
        }
        for j in 0..16 {
            let mean = members.iter().map(|&i| z[[i, j]]).sum::<f64>() / members.len() as f64;
            assert!((centroids.rows[[j, c]] - mean).abs() < 1e-9);
        }
    }

    let basis = model.basis_vectors();
    assert_eq!(basis.rows.dim(), (20, 2));
    assert_eq!(basis.cols.dim(), (16, 2));
}

/// Column j of `centroids` equals the mean of the rows of `samples` labelled j
fn assert_label_means(samples: &Array2<f64>, labels: &[usize], centroids: &Array2<f64>) {
    for c in 0..centroids.ncols() {
        let members: Vec<usize> = (0..labels.len()).filter(|&i| labels[i] == c).collect();
        for j in 0..samples.ncols() {
            let expected = if members.is_empty() {
                0.0
            } else {
                members.iter().map(|&i| samples[[i, j]]).sum::<f64>() / members.len() as f64
            };
            assert!(
                (centroids[[j, c]] - expected).abs() < 1e-9,
                "cluster {} feature {}: {} vs {}",
                c,
                j,
                centroids[[j, c]],
                expected
            );
        }
    }
}

#[test]
fn test_centroid_labeling_publishes_means_of_final_labels() {
    for seed in 0..12 {
        let mut rng = StdRng::seed_from_u64(seed);
        let z = Array2::random_using((15, 12), Uniform::new(0.0, 1.0), &mut rng);
        let model = fit(
            &z,
            NbvdConfig {
                n_row_clusters: 3,
                n_col_clusters: 3,
                n_attempts: 2,
                iter_max: 100,
                seed: Some(seed),
                labeling: LabelingMethod::Centroids,
                ..Default::default()
            },
        );

        let centroids = model.centroids();
        assert_label_means(&z, model.row_labels(), &centroids.rows);
        assert_label_means(&z.t().to_owned(), model.column_labels(), &centroids.cols);
    }
}

#[test]
fn test_history_is_monotone_and_non_negative() {
    let z = create_test_matrix(12, 10, 2, 9);
    let model = fit(
        &z,
        NbvdConfig {
            save_history: true,
            save_norm_history: true,
            iter_max: 100,
            ..scenario_config()
        },
    );

    let norms = model.norm_history().unwrap();
    let history = model.history().unwrap();
    assert_eq!(norms.len(), model.best_iter());
    assert_eq!(history.len(), model.best_iter() + 1);
    assert_eq!(*norms.last().unwrap(), model.best_norm());

    for w in norms[..norms.len() - 1].windows(2) {
        assert!(w[1] <= w[0]);
    }
    assert!(history.iter().all(|f| f.is_non_negative()));
    assert_eq!(history.last().unwrap(), model.factors());
}

#[test]
fn test_symmetric_mode_keeps_c_transposed() {
    let z = two_block_matrix(10.0, 0.1);
    let model = fit(
        &z,
        NbvdConfig {
            symmetric: true,
            save_history: true,
            ..scenario_config()
        },
    );
    for snapshot in model.history().unwrap() {
        assert_eq!(snapshot.c, snapshot.r.t().to_owned());
    }
    assert_eq!(model.s(), Some(model.r()));
}

#[test]
fn test_same_seed_is_reproducible() {
    let z = create_test_matrix(18, 15, 3, 21);
    let config = NbvdConfig {
        n_row_clusters: 3,
        n_col_clusters: 3,
        n_attempts: 4,
        iter_max: 150,
        seed: Some(1234),
        ..Default::default()
    };
    let a = fit(&z, config.clone());
    let b = fit(&z, NbvdConfig { parallel: false, ..config });

    assert_eq!(a.factors(), b.factors());
    assert_eq!(a.labels(), b.labels());
    assert_eq!(a.centroids(), b.centroids());
    assert_eq!(a.best_norm(), b.best_norm());
    assert_eq!(a.best_attempt(), b.best_attempt());
}

#[test]
fn test_labeling_methods_on_planted_blocks() {
    let z = two_block_matrix(10.0, 0.1);
    for method in [LabelingMethod::Adherence, LabelingMethod::Factors, LabelingMethod::Centroids] {
        let model = fit(
            &z,
            NbvdConfig {
                labeling: method,
                ..scenario_config()
            },
        );
        assert!(
            are_equivalent_classifications(model.row_labels(), &[0, 0, 0, 1, 1, 1]),
            "{:?}: {:?}",
            method,
            model.row_labels()
        );
    }
}

#[test]
fn test_configuration_errors_abort_before_running() {
    let rect = Array2::from_elem((5, 4), 1.0);
    let err = NbvdCoclusterer::with_config(NbvdConfig {
        symmetric: true,
        ..scenario_config()
    })
    .fit(&rect)
    .unwrap_err();
    assert_eq!(err, NbvdError::NonSquareSymmetric { rows: 5, cols: 4 });
    assert!(err.is_configuration());

    let err = NbvdCoclusterer::new(2, 3).fit(&rect).unwrap_err();
    assert_eq!(err, NbvdError::AdherenceRequiresSquare { rows: 2, cols: 3 });

    let err = NbvdCoclusterer::new(0, 0).fit(&rect).unwrap_err();
    assert!(matches!(err, NbvdError::InvalidClusterCount { .. }));
}

#[test]
fn test_all_zero_input_degenerates() {
    init_logger();
    let z = Array2::zeros((4, 4));
    let err = NbvdCoclusterer::with_config(scenario_config()).fit(&z).unwrap_err();
    assert_eq!(err, NbvdError::NoValidAttempt);
}
