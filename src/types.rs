//! Newtype wrappers for improved type safety and domain modeling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A board seen from the mover's side: own marks `+1`, opponent `-1`.
///
/// Immutable once built, so it can key the Q-table directly. Construct it
/// with [`crate::tictactoe::canonicalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalState(Box<[i8]>);

impl CanonicalState {
    pub(crate) fn from_cells(cells: Box<[i8]>) -> Self {
        CanonicalState(cells)
    }

    /// Cell values in row-major order
    pub fn cells(&self) -> &[i8] {
        &self.0
    }

    /// Number of cells (and therefore actions)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &cell in self.0.iter() {
            let c = match cell {
                1 => 'M',
                -1 => 'T',
                _ => '.',
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_marks_mover_and_opponent() {
        let state = CanonicalState::from_cells(vec![1, 0, -1].into_boxed_slice());
        assert_eq!(state.to_string(), "M.T");
        assert_eq!(state.len(), 3);
    }
}
