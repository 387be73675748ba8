use std::time::{Duration, Instant};

use log::{debug, log, warn, Level};
use ndarray::Array2;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;
use rayon::prelude::*;

use crate::config::NbvdConfig;
use crate::labeling::adherence_labels;
use crate::scoring::SilhouettePair;
use crate::types::{AttemptResult, Factors, NbvdError};

use super::nbvd::{init_factors, updater};
use super::update_rules::{all_finite, reconstruction_norm};

/// Trait for the update rules of one tri-factorization iteration.
///
/// `step` applies R, then B (with the new R), then C (with the new R and B).
pub trait TriFactorUpdater: Send + Sync {
    fn update_r(&self, z: &Array2<f64>, r: &mut Array2<f64>, b: &Array2<f64>, c: &Array2<f64>);
    fn update_b(&self, z: &Array2<f64>, r: &Array2<f64>, b: &mut Array2<f64>, c: &Array2<f64>);
    fn update_c(&self, z: &Array2<f64>, r: &Array2<f64>, b: &Array2<f64>, c: &mut Array2<f64>);

    fn step(&self, z: &Array2<f64>, factors: &mut Factors) {
        self.update_r(z, &mut factors.r, &factors.b, &factors.c);
        self.update_b(z, &factors.r, &mut factors.b, &factors.c);
        self.update_c(z, &factors.r, &factors.b, &mut factors.c);
    }
}

/// Stopping rule and bookkeeping of a single attempt
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    pub iter_max: usize,
    pub save_history: bool,
    pub save_norm_history: bool,
    pub timeout: Option<Duration>,
}

impl From<&NbvdConfig> for MonitorOptions {
    fn from(config: &NbvdConfig) -> Self {
        Self {
            iter_max: config.iter_max,
            save_history: config.save_history,
            save_norm_history: config.save_norm_history,
            timeout: config.timeout,
        }
    }
}

/// Converged state of one attempt, before scoring
#[derive(Debug, Clone)]
pub struct Convergence {
    pub factors: Factors,
    pub norm: f64,
    pub iterations: usize,
    pub norm_history: Option<Vec<f64>>,
    pub history: Option<Vec<Factors>>,
}

/// Run updates until the reconstruction error increases or `iter_max` is hit.
///
/// The first update always runs. Afterwards the loop continues while
/// `iterations < iter_max` and `current_norm <= previous_norm`, so the update
/// that raised the error is the last one applied.
pub fn run_attempt(
    z: &Array2<f64>,
    mut factors: Factors,
    updater: &dyn TriFactorUpdater,
    options: &MonitorOptions,
    attempt: usize,
) -> Result<Convergence, NbvdError> {
    let deadline = options.timeout.map(|t| Instant::now() + t);
    let mut iterations = 0;
    let mut previous_norm = f64::INFINITY;
    let mut current_norm = f64::INFINITY;

    let mut norm_history = options.save_norm_history.then(Vec::new);
    let mut history = options.save_history.then(|| vec![factors.clone()]);

    while iterations == 0 || (iterations < options.iter_max && current_norm <= previous_norm) {
        updater.step(z, &mut factors);

        previous_norm = current_norm;
        current_norm = reconstruction_norm(z, &factors);
        if !current_norm.is_finite() || !all_finite(&factors) {
            return Err(NbvdError::NumericalDegeneracy {
                attempt,
                iteration: iterations,
            });
        }

        if let Some(norms) = norm_history.as_mut() {
            norms.push(current_norm);
        }
        if let Some(snapshots) = history.as_mut() {
            snapshots.push(factors.clone());
        }
        iterations += 1;

        if deadline.map_or(false, |d| Instant::now() >= d) {
            debug!("Attempt #{} hit its deadline after {} iterations", attempt + 1, iterations);
            break;
        }
    }

    Ok(Convergence {
        factors,
        norm: current_norm,
        iterations,
        norm_history,
        history,
    })
}

/// One full attempt: initialize, converge, label with adherence, score.
///
/// Undefined silhouettes leave `quality` empty instead of failing the attempt.
pub fn attempt_cocluster(
    z: &Array2<f64>,
    config: &NbvdConfig,
    attempt: usize,
    seed: u64,
) -> Result<AttemptResult, NbvdError> {
    let level = if config.verbose { Level::Info } else { Level::Debug };
    let mut rng = StdRng::seed_from_u64(seed);
    let init = init_factors(
        z,
        config.n_row_clusters,
        config.n_col_clusters,
        config.symmetric,
        &mut rng,
    )?;
    log!(level, "Attempt #{}: starting (seed {})", attempt + 1, seed);

    let rule = updater(config.symmetric, config.epsilon);
    let converged = run_attempt(z, init, rule.as_ref(), &MonitorOptions::from(config), attempt)?;

    if converged.iterations < config.iter_max {
        log!(level, "  early stop after {} iterations", converged.iterations);
    }
    log!(level, "  Attempt #{} norm: {}", attempt + 1, converged.norm);

    let labels = adherence_labels(&converged.factors)?;
    let quality = match SilhouettePair::compute(z, &labels.rows, &labels.cols) {
        Ok(pair) => {
            log!(
                level,
                "  Attempt #{} silhouette:\n\trows: {:.3}\n\tcols: {:.3}",
                attempt + 1,
                pair.rows,
                pair.cols
            );
            Some(pair)
        }
        Err(e @ NbvdError::DegenerateLabels { .. }) => {
            warn!("Attempt #{} cannot be scored: {}", attempt + 1, e);
            None
        }
        Err(e) => return Err(e),
    };

    Ok(AttemptResult {
        attempt,
        factors: converged.factors,
        norm: converged.norm,
        iterations: converged.iterations,
        quality,
        norm_history: converged.norm_history,
        history: converged.history,
    })
}

/// The better of two candidates. Equal quality goes to the lower attempt
/// index, so the winner does not depend on the order attempts are combined in.
fn keep_better(current: Option<AttemptResult>, candidate: Option<AttemptResult>) -> Option<AttemptResult> {
    match (current, candidate) {
        (Some(a), Some(b)) => {
            let (first, second) = if a.attempt <= b.attempt { (a, b) } else { (b, a) };
            Some(if second.is_better_than(&first) { second } else { first })
        }
        (a, b) => a.or(b),
    }
}

/// Keep the best attempt. Earlier attempts win ties.
pub fn select_best<I>(attempts: I) -> Option<AttemptResult>
where
    I: IntoIterator<Item = AttemptResult>,
{
    attempts.into_iter().map(Some).fold(None, keep_better)
}

/// Numerically degenerate attempts drop out, anything else aborts the run
fn admit(outcome: Result<AttemptResult, NbvdError>) -> Result<Option<AttemptResult>, NbvdError> {
    match outcome {
        Ok(result) => Ok(Some(result)),
        Err(e @ NbvdError::NumericalDegeneracy { .. }) => {
            warn!("{}, skipping", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Run `n_attempts` random restarts and return the best one.
///
/// Attempt i is seeded with `base_seed + i`, so the outcome does not depend
/// on whether attempts run in parallel. Attempts are reduced as they finish,
/// so only the current best keeps its history. Numerically degenerate
/// attempts are skipped; configuration errors abort the run.
pub fn run_attempts(z: &Array2<f64>, config: &NbvdConfig, base_seed: u64) -> Result<AttemptResult, NbvdError> {
    let run = |attempt: usize| admit(attempt_cocluster(z, config, attempt, base_seed.wrapping_add(attempt as u64)));

    let best = if config.parallel {
        (0..config.n_attempts)
            .into_par_iter()
            .map(run)
            .try_reduce(|| None, |a, b| Ok(keep_better(a, b)))?
    } else {
        (0..config.n_attempts)
            .map(run)
            .try_fold(None, |best, candidate| candidate.map(|c| keep_better(best, c)))?
    };

    let best = best.ok_or(NbvdError::NoValidAttempt)?;
    let level = if config.verbose { Level::Info } else { Level::Debug };
    log!(
        level,
        "Attempt #{} is best (norm {:.6}, {} iterations)",
        best.attempt + 1,
        best.norm,
        best.iterations
    );
    Ok(best)
}
