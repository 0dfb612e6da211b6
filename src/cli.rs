//! Command parsing and console output for the `civodds` binary.
//!
//! Pretty-printing lives here, not in the engine: the combat modules only
//! return distributions.

use std::env;

use crate::combat::{
    resolve_battle, resolve_gauntlet, GauntletOutcome, Outcome, StateMap, Unit, UnitError,
};
use crate::server;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Battle,
    Gauntlet,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("battle") => Some(Command::Battle),
        Some("gauntlet") => Some(Command::Gauntlet),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Battle) => handle_battle(args),
        Some(Command::Gauntlet) => handle_gauntlet(args),
        None => {
            eprintln!("usage: civodds <serve|battle|gauntlet>");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var("CIVODDS_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_battle(args: &[String]) -> i32 {
    let units = match parse_units(&args[2..]) {
        Ok(units) => units,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: civodds battle <aStr> <aHp> <aFh> <dStr> <dHp> <dFh>");
            return 2;
        }
    };
    if units.len() != 2 {
        eprintln!("usage: civodds battle <aStr> <aHp> <aFh> <dStr> <dHp> <dFh>");
        return 2;
    }
    let (attacker, defender) = (units[0], units[1]);

    match resolve_battle(&attacker, &defender) {
        Ok(outcome) => {
            print_outcome(&format!("attacker {attacker}"), &outcome.attacker);
            print_outcome(&format!("defender {defender}"), &outcome.defender);
            0
        }
        Err(err) => {
            eprintln!("battle failed: {err}");
            1
        }
    }
}

fn handle_gauntlet(args: &[String]) -> i32 {
    let units = match parse_units(&args[2..]) {
        Ok(units) => units,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: civodds gauntlet <dStr> <dHp> <dFh> <aStr> <aHp> <aFh> [...]");
            return 2;
        }
    };
    if units.len() < 2 {
        eprintln!("usage: civodds gauntlet <dStr> <dHp> <dFh> <aStr> <aHp> <aFh> [...]");
        return 2;
    }
    let defender = units[0];
    let attackers = &units[1..];

    match resolve_gauntlet(attackers, &defender) {
        Ok(result) => {
            print_gauntlet(attackers, &defender, &result);
            0
        }
        Err(err) => {
            eprintln!("gauntlet failed: {err}");
            1
        }
    }
}

/// Parse flat `<strength> <hp> <first_hits>` triples into validated units.
fn parse_units(args: &[String]) -> Result<Vec<Unit>, String> {
    if args.is_empty() || args.len() % 3 != 0 {
        return Err(format!(
            "expected strength/hp/first-hits triples, got {} argument(s)",
            args.len()
        ));
    }
    args.chunks(3)
        .map(|chunk| {
            let strength = parse_number::<f64>(&chunk[0], "strength")?;
            let hp = parse_number::<u32>(&chunk[1], "hp")?;
            let first_hits = parse_number::<u32>(&chunk[2], "first_hits")?;
            Unit::new(strength, hp, first_hits).map_err(|err: UnitError| err.to_string())
        })
        .collect()
}

fn parse_number<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, String> {
    raw.parse::<T>()
        .map_err(|_| format!("invalid {name} '{raw}'"))
}

fn print_outcome(header: &str, outcome: &Outcome) {
    println!("{header}");
    print_states(&outcome.survived);
}

fn print_states(states: &StateMap) {
    for (&hp, &probability) in states.iter() {
        println!("hp: {hp} {probability}");
    }
    println!("win {}", states.win_probability());
}

fn print_gauntlet(attackers: &[Unit], defender: &Unit, result: &GauntletOutcome) {
    for (index, states) in result.attacker_states.iter().enumerate() {
        println!("attacker {index} {}", attackers[index]);
        print_states(states);
    }
    println!("defender {defender}");
    for (&hp, &probability) in result.defender_states.iter() {
        println!("hp: {hp} {probability}");
    }
    println!("survives {}", result.defender_survival_probability());
}
