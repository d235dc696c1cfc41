//! Strong-link discovery.
//!
//! Three sources, scanned once per engine run in a fixed order so the first
//! descriptor recorded for a pair is always the same:
//!
//! 1. bivalue cells,
//! 2. digits confined to two cells of a group (bilocal, or named after the
//!    group's constraint),
//! 3. almost locked sets: `k` unset cells of a group holding `k + 1` digits,
//!    where two digits that each appear in only one of the cells link strongly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::aic_engine::AicConfig;
use crate::bitset::combinations;
use crate::{BitSet, Board, Cancellation, Cancelled, Candidate};

/// Why two candidates are strongly linked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrongLinkKind {
    /// The only two digits left in one cell.
    Bivalue,
    /// The only two places for a digit in a house.
    Bilocal,
    /// The only two places a named constraint allows for a digit.
    Constraint(String),
    /// Restricted digits of the almost locked set on these cells.
    Als(Vec<usize>),
}

/// Strong-link adjacency for every candidate on one board snapshot.
#[derive(Debug, Clone, Default)]
pub struct StrongLinks {
    partners: Vec<Vec<Candidate>>,
    kinds: BTreeMap<(Candidate, Candidate), StrongLinkKind>,
}

impl StrongLinks {
    pub fn discover(
        board: &Board,
        config: &AicConfig,
        cancel: &dyn Cancellation,
    ) -> Result<Self, Cancelled> {
        let mut links = StrongLinks {
            partners: vec![Vec::new(); board.candidate_count()],
            kinds: BTreeMap::new(),
        };

        for cell in board.unset_cells() {
            let cands = board.candidates(cell);
            if cands.count() != 2 {
                continue;
            }
            let mut digits = cands.iter();
            if let (Some(d1), Some(d2)) = (digits.next(), digits.next()) {
                links.insert(
                    board.candidate(cell, d1),
                    board.candidate(cell, d2),
                    StrongLinkKind::Bivalue,
                );
            }
        }

        for group in board.groups() {
            for digit in 1..=board.size() as u8 {
                let Some(cells) = group.must_contain(board, digit) else {
                    continue;
                };
                let &[c1, c2] = cells.as_slice() else {
                    continue;
                };
                if board.is_set(c1) || board.is_set(c2) {
                    continue;
                }
                let kind = match group.constraint() {
                    Some(constraint) => StrongLinkKind::Constraint(constraint.name().to_owned()),
                    None => StrongLinkKind::Bilocal,
                };
                links.insert(board.candidate(c1, digit), board.candidate(c2, digit), kind);
            }
        }

        for group in board.groups() {
            links.discover_als(board, group.cells(), config, cancel)?;
        }

        for list in links.partners.iter_mut() {
            list.sort_unstable();
        }
        Ok(links)
    }

    fn discover_als(
        &mut self,
        board: &Board,
        group_cells: &[usize],
        config: &AicConfig,
        cancel: &dyn Cancellation,
    ) -> Result<(), Cancelled> {
        let unset: Vec<usize> = group_cells
            .iter()
            .copied()
            .filter(|&c| !board.is_set(c))
            .collect();
        let max_k = match config.max_als_cells {
            Some(cap) => cap.min(unset.len().saturating_sub(1)),
            None => unset.len().saturating_sub(1),
        };

        for k in 2..=max_k {
            for subset in combinations(unset.len(), k) {
                cancel.check()?;

                let cells: Vec<usize> = unset
                    .iter()
                    .enumerate()
                    .filter(|&(bit, _)| subset & (1 << bit) != 0)
                    .map(|(_, &cell)| cell)
                    .collect();
                let pool = cells
                    .iter()
                    .fold(BitSet::empty(), |acc, &c| acc.union(&board.candidates(c)));
                if pool.count() as usize != k + 1 {
                    continue;
                }

                // Digits held by exactly one cell, with that cell.
                let restricted: Vec<(u8, usize)> = pool
                    .iter()
                    .filter_map(|digit| {
                        let mut holders = cells
                            .iter()
                            .copied()
                            .filter(|&c| board.candidates(c).contains(digit));
                        match (holders.next(), holders.next()) {
                            (Some(cell), None) => Some((digit, cell)),
                            _ => None,
                        }
                    })
                    .collect();

                for (i, &(d1, c1)) in restricted.iter().enumerate() {
                    for &(d2, c2) in &restricted[i + 1..] {
                        self.insert(
                            board.candidate(c1, d1),
                            board.candidate(c2, d2),
                            StrongLinkKind::Als(cells.clone()),
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Record a link unless the pair already has one.
    fn insert(&mut self, a: Candidate, b: Candidate, kind: StrongLinkKind) {
        if a == b {
            return;
        }
        let key = (a.min(b), a.max(b));
        if self.kinds.contains_key(&key) {
            return;
        }
        self.kinds.insert(key, kind);
        self.partners[a].push(b);
        self.partners[b].push(a);
    }

    /// Strong partners of `cand`, ascending.
    pub fn partners(&self, cand: Candidate) -> &[Candidate] {
        self.partners.get(cand).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_links(&self, cand: Candidate) -> bool {
        !self.partners(cand).is_empty()
    }

    pub fn kind(&self, a: Candidate, b: Candidate) -> Option<&StrongLinkKind> {
        self.kinds.get(&(a.min(b), a.max(b)))
    }

    /// Every link as `(low, high, kind)`, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (Candidate, Candidate, &StrongLinkKind)> {
        self.kinds.iter().map(|(&(a, b), kind)| (a, b, kind))
    }

    /// Number of unordered links.
    pub(crate) fn len(&self) -> usize {
        self.kinds.len()
    }
}
