//! Forcing chains over a frozen link cache.
//!
//! A source set is exhaustive and mutually exclusive: the digits left in one
//! cell, or the cells left for one digit in a group. Whatever every source
//! proves false is false; whatever every source proves true is true.

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use super::chain::{Chain, Discovery, Proof};
use super::link_cache::FrozenLinks;
use super::types::StepKind;
use super::DiscoverySink;
use crate::{Board, Cancellation, Cancelled, Candidate};

/// Conclusions shared by every branch of a source set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonConsequences {
    /// Candidates every source proves false.
    pub excluded: Vec<Candidate>,
    /// Candidates every source proves true.
    pub forced: Vec<Candidate>,
}

/// Intersect the consequences of each source. `None` once nothing can
/// survive.
///
/// Both intersections are carried until both are empty: sources that stop
/// agreeing on exclusions can still agree on a forced candidate.
pub fn find_common(links: &FrozenLinks, sources: &[Candidate]) -> Option<CommonConsequences> {
    let (&head, tail) = sources.split_first()?;
    let mut excluded: Vec<Candidate> = links.weak_from(head).keys().copied().collect();
    let mut forced: Vec<Candidate> = links.weak_to_strong_from(head).keys().copied().collect();

    for &source in tail {
        if excluded.is_empty() && forced.is_empty() {
            return None;
        }
        let weak = links.weak_from(source);
        excluded.retain(|x| weak.contains_key(x));
        let w2s = links.weak_to_strong_from(source);
        forced.retain(|x| w2s.contains_key(x));
    }
    if excluded.is_empty() && forced.is_empty() {
        return None;
    }
    Some(CommonConsequences { excluded, forced })
}

/// Turn shared consequences into a discovery, with one witness chain per
/// (conclusion, source) pair.
fn forcing_discovery(
    board: &Board,
    links: &FrozenLinks,
    kind: StepKind,
    sources: &[Candidate],
    common: &CommonConsequences,
) -> Option<Discovery> {
    let mut elims = BTreeSet::new();
    elims.extend(common.excluded.iter().copied().filter(|&x| board.has_candidate(x)));
    for &t in &common.forced {
        let cell = board.cell_of(t);
        for digit in board.candidates(cell).iter() {
            let other = board.candidate(cell, digit);
            if other != t {
                elims.insert(other);
            }
        }
    }
    if elims.is_empty() {
        return None;
    }

    let mut chains: Vec<Chain> = Vec::new();
    for &x in &common.excluded {
        chains.extend(sources.iter().filter_map(|&s| links.weak_from(s).get(&x).cloned()));
    }
    for &t in &common.forced {
        chains.extend(
            sources
                .iter()
                .filter_map(|&s| links.weak_to_strong_from(s).get(&t).cloned()),
        );
    }

    Some(Discovery {
        kind,
        proof: Proof::Forcing {
            sources: sources.to_vec(),
            chains,
        },
        eliminations: elims.into_iter().collect(),
    })
}

/// Every unset cell with two or more digits, each digit a branch.
pub fn cell_forcing(
    board: &Board,
    links: &FrozenLinks,
    cancel: &dyn Cancellation,
    sink: DiscoverySink<'_>,
) -> Result<ControlFlow<()>, Cancelled> {
    for cell in board.unset_cells() {
        cancel.check()?;
        let cands = board.candidates(cell);
        if cands.count() < 2 {
            continue;
        }
        let sources: Vec<Candidate> = cands.iter().map(|d| board.candidate(cell, d)).collect();
        let Some(common) = find_common(links, &sources) else {
            continue;
        };
        if let Some(found) =
            forcing_discovery(board, links, StepKind::CellForcingChain, &sources, &common)
        {
            if sink(found)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
    }
    Ok(ControlFlow::Continue(()))
}

/// Every group and digit the group must contain, each remaining cell a
/// branch.
pub fn region_forcing(
    board: &Board,
    links: &FrozenLinks,
    cancel: &dyn Cancellation,
    sink: DiscoverySink<'_>,
) -> Result<ControlFlow<()>, Cancelled> {
    for group in board.groups() {
        for digit in 1..=board.size() as u8 {
            cancel.check()?;
            let Some(cells) = group.must_contain(board, digit) else {
                continue;
            };
            if cells.len() < 2 || cells.iter().any(|&c| board.is_set(c)) {
                continue;
            }
            let sources: Vec<Candidate> = cells.iter().map(|&c| board.candidate(c, digit)).collect();
            let Some(common) = find_common(links, &sources) else {
                continue;
            };
            if let Some(found) =
                forcing_discovery(board, links, StepKind::RegionForcingChain, &sources, &common)
            {
                if sink(found)?.is_break() {
                    return Ok(ControlFlow::Break(()));
                }
            }
        }
    }
    Ok(ControlFlow::Continue(()))
}
