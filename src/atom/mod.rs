pub mod nbvd;
pub mod tri_factor_base;
pub mod update_rules;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-exports for convenience
pub use nbvd::{init_factors, updater, NbvdUpdater, SymmetricNbvdUpdater};
pub use tri_factor_base::{
    attempt_cocluster, run_attempt, run_attempts, select_best, Convergence, MonitorOptions,
    TriFactorUpdater,
};
pub use update_rules::{multiplicative_update, reconstruction_norm};
