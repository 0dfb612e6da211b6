pub mod battle;
pub mod combinatorics;
pub mod engine;
pub mod round;
pub mod states;
pub mod unit;

pub use battle::{resolve_battle, resolve_gauntlet, BattleError, BattleOutcome, GauntletOutcome};
pub use combinatorics::{binomial, factorial, CombinatoricsError};
pub use engine::{resolve_exchange, Outcome};
pub use round::{RoundError, RoundParams, Side};
pub use states::StateMap;
pub use unit::{Unit, UnitError};
