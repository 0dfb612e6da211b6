//! Rayon batch resolution of independent matchups.
//!
//! Every battle resolution is pure and side-effect free, so a batch of
//! matchups can fan out across cores without coordination; the factorial
//! cache is the only shared state and it only grows.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::combat::{resolve_battle, BattleError, BattleOutcome, Unit};

/// One attacker/defender pairing in a batch request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matchup {
    pub attacker: Unit,
    pub defender: Unit,
}

/// Resolve every matchup in parallel. Result order matches input order;
/// a failed matchup carries its own error without aborting the rest.
pub fn resolve_batch(matchups: &[Matchup]) -> Vec<Result<BattleOutcome, BattleError>> {
    matchups
        .par_iter()
        .map(|matchup| resolve_battle(&matchup.attacker, &matchup.defender))
        .collect()
}

/// Like [resolve_batch] but constrained to `pool`'s worker count.
pub fn resolve_batch_with_pool(
    matchups: &[Matchup],
    pool: &WorkerPool,
) -> Vec<Result<BattleOutcome, BattleError>> {
    pool.install(|| resolve_batch(matchups))
}

/// Configures how many worker threads a batch resolution uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use Rayon's default (all cores).
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run a closure on a pool with this worker count. With 0 workers the
    /// global Rayon pool is used; otherwise a temporary pool is built.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            f()
        } else {
            match ThreadPoolBuilder::new().num_threads(self.workers).build() {
                Ok(pool) => pool.install(f),
                Err(_) => f(),
            }
        }
    }
}
