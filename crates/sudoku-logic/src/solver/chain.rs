//! Alternating chains and the proofs built from them.

use serde::{Deserialize, Serialize};

use super::types::StepKind;
use crate::Candidate;

/// The inference carried by a link between two consecutive chain nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    /// At least one endpoint is true: `a` false implies `b` true.
    Strong,
    /// At most one endpoint is true: `a` true implies `b` false.
    Weak,
}

impl LinkType {
    pub fn flipped(self) -> LinkType {
        match self {
            LinkType::Strong => LinkType::Weak,
            LinkType::Weak => LinkType::Strong,
        }
    }
}

/// An ordered candidate sequence whose links alternate between strong and
/// weak. Search chains always open with a strong link; witness chains stored
/// in the link cache may open with either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chain {
    cands: Vec<Candidate>,
    first_link: LinkType,
}

impl Chain {
    /// A one-node chain whose first link will be strong.
    pub fn new(start: Candidate) -> Self {
        Self {
            cands: vec![start],
            first_link: LinkType::Strong,
        }
    }

    pub fn from_parts(cands: Vec<Candidate>, first_link: LinkType) -> Self {
        Self { cands, first_link }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.cands
    }

    pub fn len(&self) -> usize {
        self.cands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cands.is_empty()
    }

    pub fn first(&self) -> Candidate {
        self.cands[0]
    }

    pub fn last(&self) -> Candidate {
        self.cands[self.cands.len() - 1]
    }

    pub fn first_link(&self) -> LinkType {
        self.first_link
    }

    pub fn contains(&self, cand: Candidate) -> bool {
        self.cands.contains(&cand)
    }

    /// A copy with `cand` appended.
    pub fn extended(&self, cand: Candidate) -> Chain {
        let mut cands = Vec::with_capacity(self.cands.len() + 1);
        cands.extend_from_slice(&self.cands);
        cands.push(cand);
        Chain {
            cands,
            first_link: self.first_link,
        }
    }

    /// Type of the link between node `i` and node `i + 1`.
    pub fn link_after(&self, i: usize) -> LinkType {
        if i % 2 == 0 {
            self.first_link
        } else {
            self.first_link.flipped()
        }
    }

    /// Type of the link that would join a new node onto the end.
    pub fn next_link(&self) -> LinkType {
        self.link_after(self.cands.len() - 1)
    }

    /// Indexes `i` where the link `i -> i + 1` is strong.
    pub fn strong_edges(&self) -> impl Iterator<Item = usize> + '_ {
        let start = match self.first_link {
            LinkType::Strong => 0,
            LinkType::Weak => 1,
        };
        (start..self.cands.len().saturating_sub(1)).step_by(2)
    }

    /// The same chain walked from the other end.
    pub fn reversed(&self) -> Chain {
        let mut cands = self.cands.clone();
        cands.reverse();
        let first_link = if self.cands.len() < 2 {
            self.first_link
        } else {
            self.link_after(self.cands.len() - 2)
        };
        Chain { cands, first_link }
    }
}

/// Evidence for a set of eliminations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proof {
    Chain(Chain),
    /// One witness chain per (source, conclusion) pair.
    Forcing {
        sources: Vec<Candidate>,
        chains: Vec<Chain>,
    },
}

impl Proof {
    /// Total number of chain nodes in the proof.
    pub fn difficulty(&self) -> usize {
        match self {
            Proof::Chain(chain) => chain.len(),
            Proof::Forcing { chains, .. } => chains.iter().map(Chain::len).sum(),
        }
    }
}

/// A deduction found by the chain engine, not yet applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    pub kind: StepKind,
    pub proof: Proof,
    /// Sorted, distinct, and present on the board when found.
    pub eliminations: Vec<Candidate>,
}

impl Discovery {
    pub fn difficulty(&self) -> usize {
        self.proof.difficulty()
    }
}
