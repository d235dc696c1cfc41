//! Groups of mutually distinct cells: houses (rows, columns, boxes, extra
//! regions) and constraint-backed pseudo-groups such as cages.
//!
//! Both kinds answer the same question for the chain engine: "which cells
//! must contain digit v?" A full-size house always knows the answer; a partial
//! group only knows it when its constraint does.

use std::fmt;
use std::sync::Arc;

use crate::{BitSet, Board};

/// A rule attached to a group that can pin digits into its cells.
pub trait Constraint: fmt::Debug + Send + Sync {
    /// Short label used in step descriptions.
    fn name(&self) -> &str;

    /// The cells of `cells` that can still hold `digit`, when the constraint
    /// requires `digit` to appear somewhere in `cells`. `None` when the
    /// constraint says nothing about `digit`.
    fn must_contain(&self, board: &Board, cells: &[usize], digit: u8) -> Option<Vec<usize>>;
}

/// A cage whose cells must collectively contain a fixed digit set, e.g. a
/// killer cage with a single possible combination.
#[derive(Debug, Clone)]
pub struct RequiredDigits {
    name: String,
    digits: BitSet,
}

impl RequiredDigits {
    pub fn new(name: impl Into<String>, digits: BitSet) -> Self {
        Self {
            name: name.into(),
            digits,
        }
    }
}

impl Constraint for RequiredDigits {
    fn name(&self) -> &str {
        &self.name
    }

    fn must_contain(&self, board: &Board, cells: &[usize], digit: u8) -> Option<Vec<usize>> {
        if !self.digits.contains(digit) {
            return None;
        }
        Some(
            cells
                .iter()
                .copied()
                .filter(|&cell| board.candidates(cell).contains(digit))
                .collect(),
        )
    }
}

/// An ordered set of cells that may not repeat a digit.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    cells: Vec<usize>,
    constraint: Option<Arc<dyn Constraint>>,
}

impl Group {
    /// A plain house.
    pub fn new(name: impl Into<String>, cells: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            cells,
            constraint: None,
        }
    }

    /// A group backed by a constraint; the group takes the constraint's name.
    pub fn with_constraint(constraint: Arc<dyn Constraint>, cells: Vec<usize>) -> Self {
        Self {
            name: constraint.name().to_owned(),
            cells,
            constraint: Some(constraint),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    pub fn constraint(&self) -> Option<&dyn Constraint> {
        self.constraint.as_deref()
    }

    /// Whether the group spans one cell per digit.
    pub fn is_full_size(&self, board: &Board) -> bool {
        self.cells.len() == board.size()
    }

    /// Cells that must contain `digit`, or `None` when this group does not
    /// force the digit at all.
    pub fn must_contain(&self, board: &Board, digit: u8) -> Option<Vec<usize>> {
        match &self.constraint {
            Some(constraint) => constraint.must_contain(board, &self.cells, digit),
            None if self.is_full_size(board) => Some(
                self.cells
                    .iter()
                    .copied()
                    .filter(|&cell| board.candidates(cell).contains(digit))
                    .collect(),
            ),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_house_must_contain() {
        let board = Board::sudoku(4).unwrap();
        let row = &board.groups()[0];
        assert!(row.is_full_size(&board));
        assert_eq!(row.must_contain(&board, 3), Some(vec![0, 1, 2, 3]));
    }

    #[test]
    fn test_partial_group_is_silent_without_constraint() {
        let mut board = Board::sudoku(4).unwrap();
        board.add_group(Group::new("Pair", vec![0, 5])).unwrap();
        let pair = board.groups().last().unwrap();
        assert_eq!(pair.must_contain(&board, 1), None);
    }

    #[test]
    fn test_required_digits_cage() {
        let mut board = Board::sudoku(4).unwrap();
        let cage = Arc::new(RequiredDigits::new("Cage 1+2", [1u8, 2].into_iter().collect()));
        board
            .add_group(Group::with_constraint(cage, vec![0, 5]))
            .unwrap();
        board.restrict(5, [2u8, 3].into_iter().collect());

        let group = board.groups().last().unwrap();
        assert_eq!(group.name(), "Cage 1+2");
        assert_eq!(group.must_contain(&board, 1), Some(vec![0]));
        assert_eq!(group.must_contain(&board, 2), Some(vec![0, 5]));
        assert_eq!(group.must_contain(&board, 3), None);
    }
}
