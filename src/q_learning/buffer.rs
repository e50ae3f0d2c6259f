//! Pending transitions awaiting their TD target

use std::collections::VecDeque;

use crate::{tictactoe::Player, types::CanonicalState};

/// Reward written onto the opponent move that allowed a win
pub const LOSE_PENALTY: f64 = -1.0;

/// One recorded move and its shaped reward
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub mover: Player,
    pub state: CanonicalState,
    pub action: usize,
    pub reward: f64,
    pub next_state: Option<CanonicalState>,
    pub next_actions: Vec<usize>,
    pub terminal: bool,
}

/// FIFO of unresolved transitions for the current episode
///
/// Entries leave strictly from the front. The lose-penalty rewrite is the
/// one mutation allowed behind the front, so this is a deque rather than a
/// plain queue.
#[derive(Debug, Clone, Default)]
pub struct PendingBuffer {
    entries: VecDeque<Transition>,
}

impl PendingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, transition: Transition) {
        self.entries.push_back(transition);
    }

    pub fn pop_front(&mut self) -> Option<Transition> {
        self.entries.pop_front()
    }

    pub fn front(&self) -> Option<&Transition> {
        self.entries.front()
    }

    pub fn get(&self, index: usize) -> Option<&Transition> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.entries.iter()
    }

    /// Blame the latest unresolved move of `winner`'s opponent
    ///
    /// Scans newest to oldest for a non-terminal entry by another player,
    /// sets its reward to [`LOSE_PENALTY`] and marks it terminal. Returns
    /// whether an entry was rewritten.
    pub fn apply_lose_penalty(&mut self, winner: Player) -> bool {
        match self
            .entries
            .iter_mut()
            .rev()
            .find(|t| t.mover != winner && !t.terminal)
        {
            Some(entry) => {
                entry.reward = LOSE_PENALTY;
                entry.terminal = true;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
