//! One-on-one battle resolution and gauntlet (sequential-battle)
//! orchestration.

use std::fmt;

use crate::combat::combinatorics::CombinatoricsError;
use crate::combat::engine::{resolve_exchange, Outcome};
use crate::combat::round::{RoundError, RoundParams};
use crate::combat::states::StateMap;
use crate::combat::unit::Unit;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BattleError {
    Round(RoundError),
    Combinatorics(CombinatoricsError),
}

impl fmt::Display for BattleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Round(err) => write!(f, "round derivation failed: {err}"),
            Self::Combinatorics(err) => write!(f, "combinatorics failed: {err}"),
        }
    }
}

impl std::error::Error for BattleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Round(err) => Some(err),
            Self::Combinatorics(err) => Some(err),
        }
    }
}

impl From<RoundError> for BattleError {
    fn from(err: RoundError) -> Self {
        Self::Round(err)
    }
}

impl From<CombinatoricsError> for BattleError {
    fn from(err: CombinatoricsError) -> Self {
        Self::Combinatorics(err)
    }
}

/// Both sides' win-branch outcomes for a single battle.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleOutcome {
    pub attacker: Outcome,
    pub defender: Outcome,
}

/// Resolve one attacker against one defender. Pure: identical inputs give
/// identical outputs, and neither unit is modified.
pub fn resolve_battle(attacker: &Unit, defender: &Unit) -> Result<BattleOutcome, BattleError> {
    let params = RoundParams::derive(attacker, defender)?;

    let attacker_outcome = resolve_exchange(
        params.hits_to_kill_attacker,
        params.attacker_odds,
        i64::from(attacker.hp),
        params.hits_to_kill_defender,
        params.defender_odds,
        i64::from(params.damage_to_attacker),
        -params.first_hits_balance,
    )?;
    let defender_outcome = resolve_exchange(
        params.hits_to_kill_defender,
        params.defender_odds,
        i64::from(defender.hp),
        params.hits_to_kill_attacker,
        params.attacker_odds,
        i64::from(params.damage_to_defender),
        params.first_hits_balance,
    )?;

    Ok(BattleOutcome {
        attacker: attacker_outcome,
        defender: defender_outcome,
    })
}

/// Result of a chain of battles against one defender.
#[derive(Debug, Clone, PartialEq)]
pub struct GauntletOutcome {
    /// One state map per attacker: that attacker's survival distribution,
    /// jointly conditioned on the defender still standing when it fought.
    pub attacker_states: Vec<StateMap>,
    /// Defender health distribution after the whole chain.
    pub defender_states: StateMap,
}

impl GauntletOutcome {
    /// Probability the defender outlives every attacker.
    pub fn defender_survival_probability(&self) -> f64 {
        self.defender_states.win_probability()
    }
}

/// Resolve a list of attackers in order against one defender whose health
/// distribution carries over between engagements.
///
/// Each attacker fights every surviving defender-health branch separately;
/// its outcome map accumulates those branches weighted by branch
/// probability, and the defender's surviving branches form the
/// distribution the next attacker sees. Branches where the defender has
/// already fallen simply carry no mass forward.
pub fn resolve_gauntlet(
    attackers: &[Unit],
    defender: &Unit,
) -> Result<GauntletOutcome, BattleError> {
    let mut defender_states = StateMap::singleton(defender.hp, 1.0);
    let mut attacker_states = Vec::with_capacity(attackers.len());

    for attacker in attackers {
        let mut own_states = StateMap::new();
        let mut next_defender_states = StateMap::new();
        for (&branch_hp, &branch_mass) in defender_states.iter() {
            let outcome = resolve_battle(attacker, &defender.at_hp(branch_hp))?;
            own_states =
                StateMap::merge(1.0, &own_states, branch_mass, &outcome.attacker.survived);
            next_defender_states = StateMap::merge(
                1.0,
                &next_defender_states,
                branch_mass,
                &outcome.defender.survived,
            );
        }
        attacker_states.push(own_states);
        defender_states = next_defender_states;
    }

    Ok(GauntletOutcome {
        attacker_states,
        defender_states,
    })
}
