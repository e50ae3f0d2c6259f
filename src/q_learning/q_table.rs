//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use crate::types::CanonicalState;

/// Q-table mapping canonical states to per-action values
///
/// Rows hold one value per board cell and are created all-zero the first
/// time a state is touched. The table only grows.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<CanonicalState, Vec<f64>>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    fn row_mut(&mut self, state: &CanonicalState) -> &mut Vec<f64> {
        let actions = state.len();
        self.values
            .entry(state.clone())
            .or_insert_with(|| vec![0.0; actions])
    }

    /// Action values for a state, creating the row if needed
    pub fn values(&mut self, state: &CanonicalState) -> &[f64] {
        self.row_mut(state)
    }

    /// Q-value for a state-action pair without creating a row
    pub fn get(&self, state: &CanonicalState, action: usize) -> f64 {
        self.values
            .get(state)
            .and_then(|row| row.get(action).copied())
            .unwrap_or(0.0)
    }

    /// Overwrite a single Q-value
    pub fn set(&mut self, state: &CanonicalState, action: usize, value: f64) {
        if let Some(slot) = self.row_mut(state).get_mut(action) {
            *slot = value;
        }
    }

    /// Maximum value over `actions` in `state`; 0.0 when `actions` is empty
    pub fn max_over(&mut self, state: &CanonicalState, actions: &[usize]) -> f64 {
        if actions.is_empty() {
            return 0.0;
        }
        let row = self.row_mut(state);
        actions
            .iter()
            .filter_map(|&a| row.get(a).copied())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Actions in `actions` sharing the maximum value
    pub fn best_actions(&mut self, state: &CanonicalState, actions: &[usize]) -> Vec<usize> {
        let best = self.max_over(state, actions);
        let row = self.row_mut(state);
        actions
            .iter()
            .copied()
            .filter(|&a| row.get(a).copied() == Some(best))
            .collect()
    }

    /// Move Q(s, a) toward `target` by step size `alpha`
    ///
    /// Q(s,a) ← Q(s,a) + α[target − Q(s,a)]
    pub fn update_toward(
        &mut self,
        state: &CanonicalState,
        action: usize,
        target: f64,
        alpha: f64,
    ) -> f64 {
        let row = self.row_mut(state);
        match row.get_mut(action) {
            Some(slot) => {
                *slot += alpha * (target - *slot);
                *slot
            }
            None => 0.0,
        }
    }

    /// Number of states with a row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, state: &CanonicalState) -> bool {
        self.values.contains_key(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::{Board, Player, canonicalize};

    fn state(text: &str) -> CanonicalState {
        canonicalize(&Board::parse(3, text).unwrap(), Player::X)
    }

    #[test]
    fn test_rows_are_created_lazily_with_zeros() {
        let mut qtable = QTable::new();
        let s = state(".........");
        assert_eq!(qtable.get(&s, 0), 0.0);
        assert!(qtable.is_empty());
        assert_eq!(qtable.values(&s), &[0.0; 9]);
        assert_eq!(qtable.len(), 1);
    }

    #[test]
    fn test_max_over_restricts_to_given_actions() {
        let mut qtable = QTable::new();
        let s = state(".........");
        qtable.set(&s, 0, 0.5);
        qtable.set(&s, 1, 1.5);
        qtable.set(&s, 2, 0.8);
        assert_eq!(qtable.max_over(&s, &[0, 2]), 0.8);
        assert_eq!(qtable.max_over(&s, &[0, 1, 2]), 1.5);
        assert_eq!(qtable.max_over(&s, &[]), 0.0);
    }

    #[test]
    fn test_best_actions_keeps_ties() {
        let mut qtable = QTable::new();
        let s = state(".........");
        qtable.set(&s, 3, 1.0);
        qtable.set(&s, 5, 1.0);
        assert_eq!(qtable.best_actions(&s, &[0, 3, 5, 7]), vec![3, 5]);
    }

    #[test]
    fn test_update_toward_target() {
        let mut qtable = QTable::new();
        let s = state("X........");
        let new_q = qtable.update_toward(&s, 4, 1.0, 0.5);
        assert!((new_q - 0.5).abs() < 1e-12);
        let new_q = qtable.update_toward(&s, 4, 1.0, 0.5);
        assert!((new_q - 0.75).abs() < 1e-12);
    }
}
