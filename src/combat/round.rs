//! Per-round parameter derivation for a single matchup.
//!
//! Odds follow effective (health-scaled) strength; damage follows the mean
//! of nominal and effective strength, so a wounded unit keeps part of its
//! output. Per-hit damage is fixed for the whole battle, which is what
//! makes the closed-form outcome distribution possible.

use std::fmt;

use crate::combat::unit::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Attacker,
    Defender,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attacker => write!(f, "attacker"),
            Self::Defender => write!(f, "defender"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundError {
    /// Floored per-hit damage came out zero; hits-to-kill would be
    /// unbounded. Only reachable through pathological strength ratios.
    ZeroDamage { side: Side, dmg_ratio: f64 },
}

impl fmt::Display for RoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDamage { side, dmg_ratio } => write!(
                f,
                "per-hit damage to {side} is zero (damage ratio {dmg_ratio}); hits-to-kill is unbounded"
            ),
        }
    }
}

impl std::error::Error for RoundError {}

/// Everything the outcome engine needs about one attacker/defender pairing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundParams {
    /// Probability a given round's hit goes to the attacker.
    pub attacker_odds: f64,
    /// Complement of `attacker_odds`.
    pub defender_odds: f64,
    /// Damage one attacker hit inflicts on the defender.
    pub damage_to_defender: u32,
    /// Damage one defender hit inflicts on the attacker.
    pub damage_to_attacker: u32,
    /// Hits the defender must land to eliminate the attacker.
    pub hits_to_kill_attacker: i64,
    /// Hits the attacker must land to eliminate the defender.
    pub hits_to_kill_defender: i64,
    /// Net first-hits advantage, `defender.first_hits - attacker.first_hits`.
    pub first_hits_balance: i64,
}

impl RoundParams {
    pub fn derive(attacker: &Unit, defender: &Unit) -> Result<Self, RoundError> {
        let a_eff = attacker.effective_strength();
        let d_eff = defender.effective_strength();
        let attacker_odds = a_eff / (a_eff + d_eff);

        let dmg_ratio = attacker.damage_strength() / defender.damage_strength();
        let damage_to_defender = floor_damage(20.0 * (3.0 * dmg_ratio + 1.0) / (3.0 + dmg_ratio))
            .ok_or(RoundError::ZeroDamage {
                side: Side::Defender,
                dmg_ratio,
            })?;
        let damage_to_attacker = floor_damage(20.0 * (3.0 + dmg_ratio) / (3.0 * dmg_ratio + 1.0))
            .ok_or(RoundError::ZeroDamage {
                side: Side::Attacker,
                dmg_ratio,
            })?;

        Ok(Self {
            attacker_odds,
            defender_odds: 1.0 - attacker_odds,
            damage_to_defender,
            damage_to_attacker,
            hits_to_kill_attacker: hits_to_kill(attacker.hp, damage_to_attacker),
            hits_to_kill_defender: hits_to_kill(defender.hp, damage_to_defender),
            first_hits_balance: i64::from(defender.first_hits) - i64::from(attacker.first_hits),
        })
    }
}

fn floor_damage(raw: f64) -> Option<u32> {
    if !raw.is_finite() || raw < 1.0 {
        return None;
    }
    Some(raw.floor() as u32)
}

fn hits_to_kill(hp: u32, per_hit: u32) -> i64 {
    i64::from(hp.div_ceil(per_hit))
}
