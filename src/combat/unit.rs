//! Combat unit record with fail-fast stat validation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A combat participant. Immutable: the engine reads fields and returns
/// derived distributions; callers that reuse a unit across battles must not
/// expect its `hp` to change in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Nominal attack strength, before the wounded-output reduction.
    pub strength: f64,
    /// Current health.
    pub hp: u32,
    /// Reserved multiplier, carried through unused.
    pub probability: f64,
    /// Hits landed before the simultaneous-exchange phase (e.g. a ranged
    /// unit's opening volley).
    pub first_hits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitError {
    NonPositiveHp { hp: u32 },
    InvalidStrength { strength: f64 },
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveHp { hp } => {
                write!(f, "unit hp must be positive, got {hp}")
            }
            Self::InvalidStrength { strength } => {
                write!(f, "unit strength must be positive and finite, got {strength}")
            }
        }
    }
}

impl std::error::Error for UnitError {}

impl Unit {
    pub fn new(strength: f64, hp: u32, first_hits: u32) -> Result<Self, UnitError> {
        if !(strength > 0.0) || !strength.is_finite() {
            return Err(UnitError::InvalidStrength { strength });
        }
        if hp == 0 {
            return Err(UnitError::NonPositiveHp { hp });
        }
        Ok(Self {
            strength,
            hp,
            probability: 1.0,
            first_hits,
        })
    }

    /// Copy of this unit with its health rebound to `hp`. The gauntlet uses
    /// this to bind a defender-health branch without mutating the input.
    pub fn at_hp(&self, hp: u32) -> Self {
        Self { hp, ..*self }
    }

    /// Strength scaled by remaining health (`strength * hp / 100`).
    pub fn effective_strength(&self) -> f64 {
        self.strength * f64::from(self.hp) / 100.0
    }

    /// Mean of nominal and effective strength: a wounded unit hits softer,
    /// but not in full proportion to its wounds.
    pub fn damage_strength(&self) -> f64 {
        (self.strength + self.effective_strength()) / 2.0
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s {}hp {}fh", self.strength, self.hp, self.first_hits)
    }
}
