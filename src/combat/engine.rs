//! Recursive outcome-distribution engine.
//!
//! Resolves one side's view of a battle analytically: the probability that
//! this side survives, split by exact remaining health. Elimination mass is
//! tracked in its own channel so it can never collide with a legitimate
//! health key (the survived map's keys are always positive).
//!
//! Health and hit counts are signed internally: the first-hits pre-phase
//! subtracts from them and the degenerate checks below rely on seeing the
//! non-positive values.

use crate::combat::combinatorics::{binomial, CombinatoricsError};
use crate::combat::states::StateMap;

/// One side's battle outcome: the win-branch health distribution plus the
/// complementary elimination mass. The two channels always sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Joint distribution "this side wins AND ends at this health".
    pub survived: StateMap,
    /// Probability this side is eliminated.
    pub eliminated: f64,
}

impl Outcome {
    fn certain_loss() -> Self {
        Self {
            survived: StateMap::new(),
            eliminated: 1.0,
        }
    }

    fn unscathed(hp: i64) -> Self {
        Self {
            survived: StateMap::singleton(hp as u32, 1.0),
            eliminated: 0.0,
        }
    }

    /// Probability this side wins: total mass of the survived channel.
    pub fn win_probability(&self) -> f64 {
        self.survived.win_probability()
    }
}

/// Resolve the exchange from one side's perspective.
///
/// `hits_self` is the number of hits that eliminate this side, `hits_opp`
/// the number this side must land to win; `dmg_opp` is the damage each
/// opposing hit inflicts. Positive `first_hits` means this side strikes
/// `first_hits` times before the simultaneous phase; negative means the
/// opponent does.
///
/// `hits_self` must be consistent with the health: `hp_self` has to exceed
/// `dmg_opp * (hits_self - 1)`, i.e. `hits_self = ceil(hp_self / dmg_opp)`
/// as produced by the round derivation. Otherwise a surviving branch would
/// be assigned a non-positive health key.
pub fn resolve_exchange(
    hits_self: i64,
    odds_self: f64,
    hp_self: i64,
    hits_opp: i64,
    odds_opp: f64,
    dmg_opp: i64,
    first_hits: i64,
) -> Result<Outcome, CombinatoricsError> {
    if first_hits > 0 {
        // Pre-phase strikes by this side: each lands with the normal round
        // odds. Branch on how many land, reducing the opponent's quota.
        let mut survived = StateMap::new();
        let mut eliminated = 0.0;
        for landed in 0..=first_hits {
            let weight = binomial(first_hits, landed)?
                * odds_self.powi(landed as i32)
                * odds_opp.powi((first_hits - landed) as i32);
            let branch = resolve_exchange(
                hits_self,
                odds_self,
                hp_self,
                hits_opp - landed,
                odds_opp,
                dmg_opp,
                0,
            )?;
            survived = StateMap::merge(1.0, &survived, weight, &branch.survived);
            eliminated += weight * branch.eliminated;
        }
        return Ok(Outcome { survived, eliminated });
    }

    if first_hits < 0 {
        // Pre-phase strikes by the opponent: branch on hits taken, which
        // cost this side both health and part of its survival quota.
        let volley = -first_hits;
        let mut survived = StateMap::new();
        let mut eliminated = 0.0;
        for taken in 0..=volley {
            let weight = binomial(volley, taken)?
                * odds_self.powi((volley - taken) as i32)
                * odds_opp.powi(taken as i32);
            let branch = resolve_exchange(
                hits_self - taken,
                odds_self,
                hp_self - taken * dmg_opp,
                hits_opp,
                odds_opp,
                dmg_opp,
                0,
            )?;
            survived = StateMap::merge(1.0, &survived, weight, &branch.survived);
            eliminated += weight * branch.eliminated;
        }
        return Ok(Outcome { survived, eliminated });
    }

    if hits_self <= 0 {
        return Ok(Outcome::certain_loss());
    }
    if hits_opp <= 0 {
        return Ok(Outcome::unscathed(hp_self));
    }

    debug_assert!(
        hp_self > dmg_opp * (hits_self - 1),
        "{hp_self} hp cannot absorb {hits_self} hits of {dmg_opp}"
    );

    // Simultaneous exchange. Branch on the number of hits absorbed before
    // this side lands its decisive final hit; the negative-binomial count
    // fixes the decisive hit last so no ordering is counted twice.
    let mut survived = StateMap::new();
    let mut total = 0.0;
    for absorbed in 0..hits_self {
        let probability = odds_self.powi(hits_opp as i32) * odds_opp.powi(absorbed as i32);
        let orderings = binomial(absorbed + hits_opp - 1, absorbed)?;
        let mass = orderings * probability;
        survived.add_mass((hp_self - dmg_opp * absorbed) as u32, mass);
        total += mass;
    }
    Ok(Outcome {
        survived,
        eliminated: (1.0 - total).max(0.0),
    })
}
