//! Exact-count combinatorics used as weights in the outcome formulas.
//!
//! Factorials are memoized in a process-lifetime cache shared by all
//! callers. The cache grows append-only under a mutex, so concurrent
//! battle resolutions can share it safely. Values are `f64`: large counts
//! are floating approximations of exact integers, and the probability
//! formulas downstream tolerate that.

use std::fmt;
use std::sync::{Mutex, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombinatoricsError {
    /// `factorial` or `binomial` received a negative argument.
    NegativeArgument { name: &'static str, value: i64 },
    /// `binomial(n, k)` with `k > n`.
    KOutOfRange { n: i64, k: i64 },
}

impl fmt::Display for CombinatoricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeArgument { name, value } => {
                write!(f, "combinatorics argument '{name}' must be non-negative, got {value}")
            }
            Self::KOutOfRange { n, k } => {
                write!(f, "binomial k={k} out of range for n={n}")
            }
        }
    }
}

impl std::error::Error for CombinatoricsError {}

fn factorial_cache() -> &'static Mutex<Vec<f64>> {
    static CACHE: OnceLock<Mutex<Vec<f64>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(vec![1.0, 1.0]))
}

/// Factorial of `n` as `f64`, memoized for the lifetime of the process.
pub fn factorial(n: i64) -> Result<f64, CombinatoricsError> {
    if n < 0 {
        return Err(CombinatoricsError::NegativeArgument { name: "n", value: n });
    }
    let n = n as usize;
    let mut cache = factorial_cache()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    while cache.len() <= n {
        let next = cache[cache.len() - 1] * cache.len() as f64;
        cache.push(next);
    }
    Ok(cache[n])
}

/// Binomial coefficient `n over k`, computed from the factorial cache.
/// The result may carry floating error for large arguments.
pub fn binomial(n: i64, k: i64) -> Result<f64, CombinatoricsError> {
    if n < 0 {
        return Err(CombinatoricsError::NegativeArgument { name: "n", value: n });
    }
    if k < 0 {
        return Err(CombinatoricsError::NegativeArgument { name: "k", value: k });
    }
    if k > n {
        return Err(CombinatoricsError::KOutOfRange { n, k });
    }
    Ok(factorial(n)? / (factorial(k)? * factorial(n - k)?))
}
