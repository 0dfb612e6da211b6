//! JSON payload construction for the API routes.
//!
//! Each `*_payload` function takes a raw request body and returns the
//! serialized response, with parse and validation failures split so the
//! router can map them to status codes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::{resolve_battle, resolve_gauntlet, Outcome, StateMap, Unit};
use crate::parallel::{resolve_batch_with_pool, Matchup, WorkerPool};

const ENGINE_NAME: &str = "civodds-analytic";

#[derive(Debug)]
pub enum PayloadError {
    Parse(serde_json::Error),
    Validation(String),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Validation(msg) => write!(f, "{msg}"),
        }
    }
}

/// Wire form of a unit. Converted through the validating constructor so
/// malformed stats are rejected before they reach the engine.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UnitSpec {
    pub strength: f64,
    pub hp: u32,
    #[serde(default = "default_probability")]
    pub probability: f64,
    #[serde(default)]
    pub first_hits: u32,
}

fn default_probability() -> f64 {
    1.0
}

impl UnitSpec {
    fn to_unit(self, role: &str) -> Result<Unit, PayloadError> {
        let unit = Unit::new(self.strength, self.hp, self.first_hits)
            .map_err(|err| PayloadError::Validation(format!("{role}: {err}")))?;
        Ok(Unit {
            probability: self.probability,
            ..unit
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct BattleRequest {
    attacker: UnitSpec,
    defender: UnitSpec,
}

#[derive(Debug, Clone, Deserialize)]
struct GauntletRequest {
    attackers: Vec<UnitSpec>,
    defender: UnitSpec,
}

#[derive(Debug, Clone, Deserialize)]
struct BatchRequest {
    matchups: Vec<BattleRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateEntry {
    pub hp: u32,
    pub probability: f64,
}

fn state_entries(states: &StateMap) -> Vec<StateEntry> {
    states
        .iter()
        .map(|(&hp, &probability)| StateEntry { hp, probability })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct SideReport {
    pub win_probability: f64,
    pub eliminated: f64,
    pub states: Vec<StateEntry>,
}

impl SideReport {
    fn from_outcome(outcome: &Outcome) -> Self {
        Self {
            win_probability: outcome.win_probability(),
            eliminated: outcome.eliminated,
            states: state_entries(&outcome.survived),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct BattleResponse {
    status: &'static str,
    engine: &'static str,
    attacker: SideReport,
    defender: SideReport,
}

#[derive(Debug, Clone, Serialize)]
struct GauntletAttackerReport {
    win_probability: f64,
    states: Vec<StateEntry>,
}

#[derive(Debug, Clone, Serialize)]
struct GauntletDefenderReport {
    survival_probability: f64,
    states: Vec<StateEntry>,
}

#[derive(Debug, Clone, Serialize)]
struct GauntletResponse {
    status: &'static str,
    engine: &'static str,
    attackers: Vec<GauntletAttackerReport>,
    defender: GauntletDefenderReport,
}

#[derive(Debug, Clone, Serialize)]
struct BatchEntry {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attacker: Option<SideReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    defender: Option<SideReport>,
}

#[derive(Debug, Clone, Serialize)]
struct BatchResponse {
    status: &'static str,
    engine: &'static str,
    results: Vec<BatchEntry>,
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: &'static str,
    engine: &'static str,
    version: &'static str,
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&HealthResponse {
        status: "ok",
        engine: ENGINE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn battle_payload(body: &str) -> Result<String, PayloadError> {
    let request: BattleRequest = serde_json::from_str(body).map_err(PayloadError::Parse)?;
    let attacker = request.attacker.to_unit("attacker")?;
    let defender = request.defender.to_unit("defender")?;

    let outcome = resolve_battle(&attacker, &defender)
        .map_err(|err| PayloadError::Validation(err.to_string()))?;

    let response = BattleResponse {
        status: "ok",
        engine: ENGINE_NAME,
        attacker: SideReport::from_outcome(&outcome.attacker),
        defender: SideReport::from_outcome(&outcome.defender),
    };
    serde_json::to_string_pretty(&response).map_err(PayloadError::Parse)
}

pub fn gauntlet_payload(body: &str) -> Result<String, PayloadError> {
    let request: GauntletRequest = serde_json::from_str(body).map_err(PayloadError::Parse)?;
    if request.attackers.is_empty() {
        return Err(PayloadError::Validation(
            "gauntlet requires at least one attacker".to_string(),
        ));
    }
    let attackers = request
        .attackers
        .iter()
        .enumerate()
        .map(|(index, spec)| spec.to_unit(&format!("attacker[{index}]")))
        .collect::<Result<Vec<_>, _>>()?;
    let defender = request.defender.to_unit("defender")?;

    let result = resolve_gauntlet(&attackers, &defender)
        .map_err(|err| PayloadError::Validation(err.to_string()))?;

    let response = GauntletResponse {
        status: "ok",
        engine: ENGINE_NAME,
        attackers: result
            .attacker_states
            .iter()
            .map(|states| GauntletAttackerReport {
                win_probability: states.win_probability(),
                states: state_entries(states),
            })
            .collect(),
        defender: GauntletDefenderReport {
            survival_probability: result.defender_survival_probability(),
            states: state_entries(&result.defender_states),
        },
    };
    serde_json::to_string_pretty(&response).map_err(PayloadError::Parse)
}

pub fn batch_payload(body: &str) -> Result<String, PayloadError> {
    let request: BatchRequest = serde_json::from_str(body).map_err(PayloadError::Parse)?;
    let mut matchups = Vec::with_capacity(request.matchups.len());
    for (index, pair) in request.matchups.iter().enumerate() {
        matchups.push(Matchup {
            attacker: pair.attacker.to_unit(&format!("matchup[{index}].attacker"))?,
            defender: pair.defender.to_unit(&format!("matchup[{index}].defender"))?,
        });
    }

    // CIVODDS_WORKERS caps batch parallelism; unset means all cores.
    let workers = std::env::var("CIVODDS_WORKERS")
        .ok()
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(0);
    let results = resolve_batch_with_pool(&matchups, &WorkerPool::with_workers(workers))
        .into_iter()
        .map(|result| match result {
            Ok(outcome) => BatchEntry {
                status: "ok",
                message: None,
                attacker: Some(SideReport::from_outcome(&outcome.attacker)),
                defender: Some(SideReport::from_outcome(&outcome.defender)),
            },
            Err(err) => BatchEntry {
                status: "error",
                message: Some(err.to_string()),
                attacker: None,
                defender: None,
            },
        })
        .collect();

    let response = BatchResponse {
        status: "ok",
        engine: ENGINE_NAME,
        results,
    };
    serde_json::to_string_pretty(&response).map_err(PayloadError::Parse)
}
