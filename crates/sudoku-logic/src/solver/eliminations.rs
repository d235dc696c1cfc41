//! Eliminations implied by a finished chain or loop.
//!
//! In a chain `c0 = c1 - c2 = c3 ...` an even node being false forces every
//! later odd node true, so a candidate seeing both is false. When the chain
//! closes into a continuous loop the same holds from odd nodes to later even
//! nodes, and every strong edge backed by an almost locked set turns that set
//! into a locked set.

use std::collections::{BTreeSet, HashMap};

use super::chain::Chain;
use super::strong_links::{StrongLinkKind, StrongLinks};
use crate::{BitSet, Board, Candidate};

/// First and last chain positions of each parity that an outside candidate
/// sees.
#[derive(Debug, Clone, Copy, Default)]
struct Reach {
    min_even: Option<usize>,
    max_even: Option<usize>,
    min_odd: Option<usize>,
    max_odd: Option<usize>,
}

fn reach(board: &Board, chain: &Chain) -> HashMap<Candidate, Reach> {
    let mut reach: HashMap<Candidate, Reach> = HashMap::new();
    for (i, &node) in chain.candidates().iter().enumerate() {
        for &x in board.weak_links(node) {
            if !board.has_candidate(x) || chain.contains(x) {
                continue;
            }
            let r = reach.entry(x).or_default();
            let (min, max) = if i % 2 == 0 {
                (&mut r.min_even, &mut r.max_even)
            } else {
                (&mut r.min_odd, &mut r.max_odd)
            };
            if min.is_none() {
                *min = Some(i);
            }
            *max = Some(i);
        }
    }
    reach
}

fn matching(reach: HashMap<Candidate, Reach>, keep: impl Fn(&Reach) -> bool) -> Vec<Candidate> {
    let mut elims: Vec<Candidate> = reach
        .into_iter()
        .filter(|(_, r)| keep(r))
        .map(|(x, _)| x)
        .collect();
    elims.sort_unstable();
    elims
}

fn before(a: Option<usize>, b: Option<usize>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

/// Candidates seeing an even node and a later odd node.
pub fn strong_eliminations(board: &Board, chain: &Chain) -> Vec<Candidate> {
    matching(reach(board, chain), |r| before(r.min_even, r.max_odd))
}

/// Candidates seeing an odd node and a later even node. Only sound once the
/// chain is known to close into a continuous loop.
pub fn weak_to_strong_eliminations(board: &Board, chain: &Chain) -> Vec<Candidate> {
    matching(reach(board, chain), |r| before(r.min_odd, r.max_even))
}

/// Eliminations from ALS-backed strong edges of a continuous loop. Exactly one
/// end of each such edge is true, so the set's other digits are all locked in.
pub fn als_eliminations(board: &Board, chain: &Chain, links: &StrongLinks) -> Vec<Candidate> {
    let cands = chain.candidates();
    let mut elims = BTreeSet::new();
    for i in chain.strong_edges() {
        let (a, b) = (cands[i], cands[i + 1]);
        let Some(StrongLinkKind::Als(cells)) = links.kind(a, b) else {
            continue;
        };
        let pool = cells
            .iter()
            .fold(BitSet::empty(), |acc, &c| acc.union(&board.candidates(c)));
        let mut locked = pool;
        locked.remove(board.digit_of(a));
        locked.remove(board.digit_of(b));

        for digit in locked.iter() {
            let holders: Vec<Candidate> = cells
                .iter()
                .filter(|&&c| board.candidates(c).contains(digit))
                .map(|&c| board.candidate(c, digit))
                .collect();
            let Some((&first, rest)) = holders.split_first() else {
                continue;
            };
            for &x in board.weak_links(first) {
                if board.has_candidate(x)
                    && !holders.contains(&x)
                    && !chain.contains(x)
                    && rest.iter().all(|&h| board.is_weak_link(x, h))
                {
                    elims.insert(x);
                }
            }
        }
    }
    elims.into_iter().collect()
}

/// Everything a continuous loop eliminates.
pub fn loop_eliminations(board: &Board, chain: &Chain, links: &StrongLinks) -> Vec<Candidate> {
    let reach = reach(board, chain);
    let mut elims: BTreeSet<Candidate> = reach
        .iter()
        .filter(|(_, r)| before(r.min_even, r.max_odd) || before(r.min_odd, r.max_even))
        .map(|(&x, _)| x)
        .collect();
    elims.extend(als_eliminations(board, chain, links));
    elims.into_iter().collect()
}
