//! Basic propagation: naked and hidden singles, naked tuples and pointing.
//!
//! These never search. The chain engine runs them on scratch clones to
//! measure how much a candidate deduction unlocks, and the outer solve loop
//! runs them between chain steps.

use super::types::Contradiction;
use crate::bitset::combinations;
use crate::{BitSet, Board, LogicResult};

/// Largest naked tuple looked for by [`apply_basics`].
const MAX_TUPLE: usize = 4;

/// Place naked and hidden singles until none remain. Returns the number of
/// cells placed.
pub fn apply_singles(board: &mut Board) -> Result<usize, Contradiction> {
    let mut placed = 0;
    loop {
        if board.has_empty_cell() {
            return Err(Contradiction);
        }
        let mut progress = false;

        // Naked singles
        for cell in 0..board.cell_count() {
            if board.is_set(cell) {
                continue;
            }
            let cands = board.candidates(cell);
            if cands.count() != 1 {
                continue;
            }
            let Some(digit) = cands.min() else {
                return Err(Contradiction);
            };
            if !board.set_value(cell, digit) {
                return Err(Contradiction);
            }
            placed += 1;
            progress = true;
        }
        if progress {
            continue;
        }

        // Hidden singles
        for gi in 0..board.groups().len() {
            for digit in 1..=board.size() as u8 {
                let Some(cells) = board.groups()[gi].must_contain(board, digit) else {
                    continue;
                };
                match cells.as_slice() {
                    [] => return Err(Contradiction),
                    [cell] if !board.is_set(*cell) => {
                        if !board.set_value(*cell, digit) {
                            return Err(Contradiction);
                        }
                        placed += 1;
                        progress = true;
                    }
                    _ => {}
                }
            }
        }
        if !progress {
            return Ok(placed);
        }
    }
}

/// Singles, naked tuples and pointing to a fixed point. Returns the number of
/// cells placed.
pub fn apply_basics(board: &mut Board) -> Result<usize, Contradiction> {
    let mut placed = 0;
    loop {
        placed += apply_singles(board)?;
        if board.is_solved() {
            return Ok(placed);
        }
        if eliminate_naked_tuples(board)? || eliminate_pointing(board)? {
            continue;
        }
        return Ok(placed);
    }
}

/// `k` cells of a group whose candidates span only `k` digits lock those
/// digits out of the group's other cells.
fn eliminate_naked_tuples(board: &mut Board) -> Result<bool, Contradiction> {
    let mut changed = false;
    for gi in 0..board.groups().len() {
        let unset: Vec<usize> = board.groups()[gi]
            .cells()
            .iter()
            .copied()
            .filter(|&c| !board.is_set(c))
            .collect();

        for k in 2..=MAX_TUPLE.min(unset.len().saturating_sub(1)) {
            for subset in combinations(unset.len(), k) {
                let mut union = BitSet::empty();
                for (bit, &cell) in unset.iter().enumerate() {
                    if subset & (1 << bit) != 0 {
                        union = union.union(&board.candidates(cell));
                    }
                }
                let count = union.count() as usize;
                if count < k {
                    return Err(Contradiction);
                }
                if count > k {
                    continue;
                }
                for (bit, &cell) in unset.iter().enumerate() {
                    if subset & (1 << bit) != 0 {
                        continue;
                    }
                    let keep = board.candidates(cell).difference(&union);
                    match board.restrict(cell, keep) {
                        LogicResult::Invalid => return Err(Contradiction),
                        LogicResult::Changed => changed = true,
                        LogicResult::None => {}
                    }
                }
            }
        }
    }
    Ok(changed)
}

/// When a group's copies of a digit are confined to a few candidates, any
/// candidate weak-linked to all of them is false. Covers pointing pairs,
/// box/line reduction and their variant-constraint counterparts.
fn eliminate_pointing(board: &mut Board) -> Result<bool, Contradiction> {
    let mut changed = false;
    for gi in 0..board.groups().len() {
        for digit in 1..=board.size() as u8 {
            let Some(cells) = board.groups()[gi].must_contain(board, digit) else {
                continue;
            };
            if cells.len() < 2 || cells.iter().any(|&c| board.is_set(c)) {
                continue;
            }
            let holders: Vec<_> = cells.iter().map(|&c| board.candidate(c, digit)).collect();
            let targets: Vec<_> = board
                .weak_links(holders[0])
                .iter()
                .copied()
                .filter(|&x| {
                    board.has_candidate(x)
                        && !holders.contains(&x)
                        && holders[1..].iter().all(|&h| board.is_weak_link(x, h))
                })
                .collect();
            for x in targets {
                match board.clear_candidate(x) {
                    LogicResult::Invalid => return Err(Contradiction),
                    LogicResult::Changed => changed = true,
                    LogicResult::None => {}
                }
            }
        }
    }
    Ok(changed)
}
