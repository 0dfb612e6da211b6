//! Sparse probability mass functions over remaining health.

use std::collections::btree_map::Iter;
use std::collections::BTreeMap;

/// Map from remaining health to probability mass. Keys are unique; a key's
/// value is the total probability of ending at exactly that health. Engine
/// outputs are restricted to the branch where the owning side survives, so
/// the masses generally sum to less than one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateMap {
    masses: BTreeMap<u32, f64>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Singleton distribution: all mass at one health value.
    pub fn singleton(hp: u32, mass: f64) -> Self {
        let mut masses = BTreeMap::new();
        masses.insert(hp, mass);
        Self { masses }
    }

    pub fn set(&mut self, hp: u32, mass: f64) {
        self.masses.insert(hp, mass);
    }

    /// Add `mass` to the entry at `hp`, creating it if absent.
    pub fn add_mass(&mut self, hp: u32, mass: f64) {
        *self.masses.entry(hp).or_insert(0.0) += mass;
    }

    pub fn mass_at(&self, hp: u32) -> f64 {
        self.masses.get(&hp).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> Iter<'_, u32, f64> {
        self.masses.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Total mass. For an engine output this is the probability that the
    /// owning side wins the battle.
    pub fn win_probability(&self) -> f64 {
        self.masses.values().sum()
    }

    /// Weighted sum of two distributions: every mass in `a` scaled by
    /// `weight_a`, every mass in `b` by `weight_b`, masses on a shared key
    /// added together. A zero-weight side contributes no keys, so
    /// `merge(1, a, 0, b)` is exactly `a`.
    pub fn merge(weight_a: f64, a: &StateMap, weight_b: f64, b: &StateMap) -> StateMap {
        let mut merged = StateMap::new();
        if weight_a != 0.0 {
            for (&hp, &mass) in a.iter() {
                merged.add_mass(hp, mass * weight_a);
            }
        }
        if weight_b != 0.0 {
            for (&hp, &mass) in b.iter() {
                merged.add_mass(hp, mass * weight_b);
            }
        }
        merged
    }
}

impl<'a> IntoIterator for &'a StateMap {
    type Item = (&'a u32, &'a f64);
    type IntoIter = Iter<'a, u32, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) {
        assert!((a - b).abs() <= 1e-12, "expected {b}, got {a}");
    }

    #[test]
    fn add_mass_accumulates_on_shared_key() {
        let mut states = StateMap::new();
        states.add_mass(10, 0.25);
        states.add_mass(10, 0.5);
        approx_eq(states.mass_at(10), 0.75);
        assert_eq!(states.len(), 1);
    }

    #[test]
    fn merge_zero_weight_is_identity() {
        let a = StateMap::singleton(12, 0.4);
        let mut b = StateMap::new();
        b.set(3, 0.1);
        b.set(9, 0.2);

        assert_eq!(StateMap::merge(1.0, &a, 0.0, &b), a);
        assert_eq!(StateMap::merge(0.0, &a, 1.0, &b), b);
    }

    #[test]
    fn merge_is_commutative_in_weighted_pairs() {
        let mut a = StateMap::new();
        a.set(5, 0.3);
        a.set(7, 0.1);
        let mut b = StateMap::new();
        b.set(5, 0.2);
        b.set(11, 0.4);

        let left = StateMap::merge(0.6, &a, 0.4, &b);
        let right = StateMap::merge(0.4, &b, 0.6, &a);
        for (&hp, &mass) in left.iter() {
            approx_eq(right.mass_at(hp), mass);
        }
        assert_eq!(left.len(), right.len());
    }

    #[test]
    fn merge_sums_masses_on_shared_keys() {
        let a = StateMap::singleton(8, 0.5);
        let b = StateMap::singleton(8, 0.25);
        let merged = StateMap::merge(1.0, &a, 2.0, &b);
        approx_eq(merged.mass_at(8), 1.0);
    }

    #[test]
    fn win_probability_sums_all_masses() {
        let mut states = StateMap::new();
        states.set(1, 0.25);
        states.set(20, 0.25);
        states.set(40, 0.1);
        approx_eq(states.win_probability(), 0.6);
        approx_eq(StateMap::new().win_probability(), 0.0);
    }
}
