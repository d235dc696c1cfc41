//! Fixtures and a brute-force solver for checking engine soundness.

use std::sync::Arc;

use super::basic::apply_singles;
use super::chain::{Chain, Discovery, LinkType};
use crate::{BitSet, Board, Group, RequiredDigits};

fn digits(ds: &[u8]) -> BitSet {
    ds.iter().copied().collect()
}

/// Up to `limit` solutions, by depth-first search with singles propagation.
pub fn solutions(board: &Board, limit: usize) -> Vec<Board> {
    let mut found = Vec::new();
    search(board, limit, &mut found);
    found
}

fn search(board: &Board, limit: usize, found: &mut Vec<Board>) {
    let mut board = board.clone();
    if apply_singles(&mut board).is_err() {
        return;
    }
    if board.is_solved() {
        found.push(board);
        return;
    }
    let Some(cell) = board
        .unset_cells()
        .min_by_key(|&c| board.candidates(c).count())
    else {
        return;
    };
    for digit in board.candidates(cell).iter() {
        let mut next = board.clone();
        if next.set_value(cell, digit) {
            search(&next, limit, found);
        }
        if found.len() >= limit {
            return;
        }
    }
}

/// Panics if any discovery removes a digit some solution needs.
pub fn assert_sound(board: &Board, found: &[Discovery]) {
    let solved = solutions(board, 64);
    assert!(!solved.is_empty(), "fixture has no solution");
    for discovery in found {
        for &cand in &discovery.eliminations {
            let (cell, digit) = (board.cell_of(cand), board.digit_of(cand));
            for solution in &solved {
                assert_ne!(
                    solution.value(cell),
                    Some(digit),
                    "{} eliminated {} which a solution uses",
                    discovery.kind,
                    board.candidate_name(cand)
                );
            }
        }
    }
}

/// A 4x4 sudoku where digit 1 in r1c1 is forced: the other places for 1 in
/// row 1 and column 1 share a box.
pub fn dnl_board() -> Board {
    let masks: [&[u8]; 16] = [
        &[1, 2, 3],
        &[1, 2],
        &[3, 4],
        &[3, 4],
        &[1, 3],
        &[3, 4],
        &[1, 2],
        &[1, 2],
        &[2, 4],
        &[1, 3],
        &[3, 4],
        &[3, 4],
        &[2, 4],
        &[1, 3],
        &[1, 2],
        &[1, 2],
    ];
    let mut board = Board::sudoku(4).unwrap();
    for (cell, ds) in masks.iter().enumerate() {
        board.restrict(cell, digits(ds));
    }
    board
}

/// Two cells with no groups. A holds {1,3}, B holds {2,4}, and both digits
/// of A exclude 2 in B.
pub fn cell_forcing_board() -> Board {
    let mut board = Board::new(4, 2, 1, vec![]).unwrap();
    board.restrict(0, digits(&[1, 3]));
    board.restrict(1, digits(&[2, 4]));
    board
        .add_weak_link(board.candidate(0, 1), board.candidate(1, 2))
        .unwrap();
    board
        .add_weak_link(board.candidate(0, 3), board.candidate(1, 2))
        .unwrap();
    board
}

/// Three cells X, Y, Z over digits 1..=3. A cage needs 1 in X or Y, and Z
/// shares a group with each of them.
pub fn region_forcing_board() -> Board {
    let cage = Arc::new(RequiredDigits::new("Cage 1", BitSet::single(1)));
    let groups = vec![
        Group::with_constraint(cage, vec![0, 1]),
        Group::new("XZ", vec![0, 2]),
        Group::new("YZ", vec![1, 2]),
    ];
    let mut board = Board::new(3, 3, 1, groups).unwrap();
    board.restrict(0, digits(&[1, 2]));
    board.restrict(1, digits(&[1, 3]));
    board
}

/// Four cells S, A, B, T over digits 1..=4, grouped in pairs S-A, S-B, A-T
/// and B-T. S = {1,2}, A = {1,3}, B = {2,3} and T holds `target`. Either
/// digit of S reaches 3 in T only through A or B:
/// `1S - 1A = 3A - 3T` and `2S - 2B = 3B - 3T`.
pub fn branches_board(target: &[u8]) -> Board {
    let groups = vec![
        Group::new("SA", vec![0, 1]),
        Group::new("SB", vec![0, 2]),
        Group::new("AT", vec![1, 3]),
        Group::new("BT", vec![2, 3]),
    ];
    let mut board = Board::new(4, 4, 1, groups).unwrap();
    board.restrict(0, digits(&[1, 2]));
    board.restrict(1, digits(&[1, 3]));
    board.restrict(2, digits(&[2, 3]));
    board.restrict(3, digits(target));
    board
}

/// Two bivalue cells A and C on digits 1..=2 where every digit of A excludes
/// every digit of C. No solution.
pub fn contradiction_board() -> Board {
    let mut board = Board::new(2, 2, 1, vec![]).unwrap();
    for a in [board.candidate(0, 1), board.candidate(0, 2)] {
        for c in [board.candidate(1, 1), board.candidate(1, 2)] {
            board.add_weak_link(a, c).unwrap();
        }
    }
    board
}

/// A 9x9 that basic techniques cannot finish: AI Escargot with extra givens
/// from its solution.
pub const STUCK: &str =
    "162857493534129608009600500005300900010080002600004000300000010040000007007000300";

/// Five cells P, Q, R, Y, Z in three 3-cell groups G = {P,Q,Y},
/// H = {Q,R,Z}, I = {P,R,Z}, with the continuous loop
/// `1P =[ALS P,Q]= 2Q - 2R = 1R - 1P`.
pub fn als_loop_board() -> (Board, Chain) {
    let groups = vec![
        Group::new("G", vec![0, 1, 3]),
        Group::new("H", vec![1, 2, 4]),
        Group::new("I", vec![0, 2, 4]),
    ];
    let mut board = Board::new(4, 5, 1, groups).unwrap();
    board.restrict(0, digits(&[1, 3]));
    board.restrict(1, digits(&[2, 3]));
    board.restrict(2, digits(&[1, 2]));
    board.restrict(3, digits(&[3, 4]));
    board.restrict(4, digits(&[1, 2, 4]));
    let chain = Chain::from_parts(
        vec![
            board.candidate(0, 1),
            board.candidate(1, 2),
            board.candidate(2, 2),
            board.candidate(2, 1),
        ],
        LinkType::Strong,
    );
    (board, chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::basic::apply_basics;

    #[test]
    fn test_fixtures_are_solvable() {
        let dnl = solutions(&dnl_board(), 64);
        assert_eq!(dnl.len(), 4);
        assert!(dnl.iter().all(|s| s.value(0) == Some(1)));
        assert_eq!(solutions(&cell_forcing_board(), 64).len(), 2);
        assert_eq!(solutions(&region_forcing_board(), 64).len(), 2);
        assert_eq!(solutions(&als_loop_board().0, 64).len(), 2);
        assert_eq!(solutions(&branches_board(&[1, 3, 4]), 64).len(), 7);
        assert_eq!(solutions(&branches_board(&[3, 4]), 64).len(), 4);
        assert!(solutions(&contradiction_board(), 64).is_empty());

        let mut stuck = Board::from_string(STUCK).unwrap();
        apply_basics(&mut stuck).unwrap();
        assert!(!stuck.is_solved());
        assert_eq!(solutions(&stuck, 2).len(), 1);
    }
}
