//! Relations proven between candidate pairs during one engine run.
//!
//! Every entry keeps the first chain that proved it. Entries are never
//! removed: they follow from link topology alone, so they stay valid for the
//! whole run. Once chain search is exhausted the cache is frozen into
//! per-source lookups for the forcing-chain passes.

use std::collections::{BTreeMap, HashMap};

use super::chain::{Chain, LinkType};
use super::strong_links::StrongLinks;
use crate::{Board, Candidate};

/// Kind of relation recorded for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `a` true implies `b` false. Symmetric.
    Weak,
    /// `a` false implies `b` true. Symmetric.
    Strong,
    /// `a` true implies `b` true. Directed.
    WeakToStrong,
}

#[derive(Debug, Default)]
pub struct LinkCache {
    weak: HashMap<(Candidate, Candidate), Chain>,
    strong: HashMap<(Candidate, Candidate), Chain>,
    weak_to_strong: HashMap<(Candidate, Candidate), Chain>,
}

impl LinkCache {
    /// A cache holding every direct weak and strong link between candidates
    /// still on the board.
    pub fn seeded(board: &Board, strong: &StrongLinks) -> Self {
        let mut cache = LinkCache::default();
        for a in 0..board.candidate_count() {
            if !board.has_candidate(a) {
                continue;
            }
            for &b in board.weak_links(a) {
                if b > a && board.has_candidate(b) {
                    cache.record(Relation::Weak, a, b, || {
                        Chain::from_parts(vec![a, b], LinkType::Weak)
                    });
                }
            }
        }
        for (a, b, _) in strong.iter() {
            cache.record(Relation::Strong, a, b, || {
                Chain::from_parts(vec![a, b], LinkType::Strong)
            });
        }
        cache
    }

    fn key(relation: Relation, a: Candidate, b: Candidate) -> (Candidate, Candidate) {
        match relation {
            Relation::Weak | Relation::Strong => (a.min(b), a.max(b)),
            Relation::WeakToStrong => (a, b),
        }
    }

    fn map(&self, relation: Relation) -> &HashMap<(Candidate, Candidate), Chain> {
        match relation {
            Relation::Weak => &self.weak,
            Relation::Strong => &self.strong,
            Relation::WeakToStrong => &self.weak_to_strong,
        }
    }

    pub fn contains(&self, relation: Relation, a: Candidate, b: Candidate) -> bool {
        self.map(relation).contains_key(&Self::key(relation, a, b))
    }

    /// Store a relation unless one is already known. `witness` is only
    /// called for new entries. Returns whether the entry is new.
    pub fn record(
        &mut self,
        relation: Relation,
        a: Candidate,
        b: Candidate,
        witness: impl FnOnce() -> Chain,
    ) -> bool {
        let key = Self::key(relation, a, b);
        let map = match relation {
            Relation::Weak => &mut self.weak,
            Relation::Strong => &mut self.strong,
            Relation::WeakToStrong => &mut self.weak_to_strong,
        };
        if map.contains_key(&key) {
            return false;
        }
        map.insert(key, witness());
        true
    }

    pub fn len(&self, relation: Relation) -> usize {
        self.map(relation).len()
    }

    /// Index the weak and weak-to-strong relations by source candidate.
    pub fn freeze(self, candidate_count: usize) -> FrozenLinks {
        let mut weak = vec![BTreeMap::new(); candidate_count];
        for chain in self.weak.into_values() {
            let (a, b) = (chain.first(), chain.last());
            weak[b].insert(a, chain.reversed());
            weak[a].insert(b, chain);
        }
        let mut weak_to_strong = vec![BTreeMap::new(); candidate_count];
        for ((a, b), chain) in self.weak_to_strong {
            weak_to_strong[a].insert(b, chain);
        }
        FrozenLinks {
            weak,
            weak_to_strong,
        }
    }
}

/// Read-only view of a finished [`LinkCache`].
#[derive(Debug, Clone)]
pub struct FrozenLinks {
    weak: Vec<BTreeMap<Candidate, Chain>>,
    weak_to_strong: Vec<BTreeMap<Candidate, Chain>>,
}

impl FrozenLinks {
    /// Candidates proven false when `source` is true, with a chain starting
    /// at `source` for each.
    pub fn weak_from(&self, source: Candidate) -> &BTreeMap<Candidate, Chain> {
        &self.weak[source]
    }

    /// Candidates proven true when `source` is true.
    pub fn weak_to_strong_from(&self, source: Candidate) -> &BTreeMap<Candidate, Chain> {
        &self.weak_to_strong[source]
    }
}
