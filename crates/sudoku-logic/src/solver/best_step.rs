//! Picks the most useful discovery of an engine run.
//!
//! Each discovery is applied to scratch boards and scored by how much basic
//! propagation it unlocks. A discovery that breaks a scratch board wins
//! outright: it proves the current position is already inconsistent.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::ops::ControlFlow;

use super::basic::{apply_basics, apply_singles};
use super::chain::Discovery;
use crate::{Board, Cancellation, Cancelled, Candidate, LogicResult};

/// Score of a discovery, compared lexicographically. Shorter proofs rank
/// higher, all else equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StepScore {
    pub singles_after_basics: usize,
    pub direct_singles: usize,
    pub difficulty: Reverse<usize>,
    pub eliminations: usize,
}

/// Outcome of applying one elimination set to scratch boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Simulation {
    Contradiction,
    Singles { direct: usize, after_basics: usize },
}

fn simulate(board: &Board, eliminations: &[Candidate]) -> Simulation {
    let mut eliminated = board.clone();
    for &cand in eliminations {
        if eliminated.clear_candidate(cand) == LogicResult::Invalid {
            return Simulation::Contradiction;
        }
    }

    let mut singles = eliminated.clone();
    let Ok(direct) = apply_singles(&mut singles) else {
        return Simulation::Contradiction;
    };
    let Ok(after_basics) = apply_basics(&mut eliminated) else {
        return Simulation::Contradiction;
    };
    Simulation::Singles {
        direct,
        after_basics,
    }
}

/// The retained winner.
#[derive(Debug, Clone)]
pub struct BestStep {
    pub discovery: Discovery,
    /// `None` when the eliminations lead straight to a contradiction.
    pub score: Option<StepScore>,
}

impl BestStep {
    pub fn proves_contradiction(&self) -> bool {
        self.score.is_none()
    }
}

#[derive(Debug, Default)]
pub struct BestStepSelector {
    best: Option<BestStep>,
    memo: HashMap<Vec<Candidate>, Simulation>,
    considered: usize,
}

impl BestStepSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score `discovery` and keep it if it beats the current best. Breaks
    /// once a contradiction is proven, since nothing can beat it.
    pub fn consider(
        &mut self,
        board: &Board,
        discovery: Discovery,
        cancel: &dyn Cancellation,
    ) -> Result<ControlFlow<()>, Cancelled> {
        cancel.check()?;
        if discovery.eliminations.is_empty() {
            return Ok(ControlFlow::Continue(()));
        }
        self.considered += 1;

        let simulation = match self.memo.get(&discovery.eliminations) {
            Some(&sim) => sim,
            None => {
                let sim = simulate(board, &discovery.eliminations);
                self.memo.insert(discovery.eliminations.clone(), sim);
                sim
            }
        };

        let (direct, after_basics) = match simulation {
            Simulation::Contradiction => {
                log::trace!("{} leads to a contradiction", discovery.kind);
                self.best = Some(BestStep {
                    discovery,
                    score: None,
                });
                return Ok(ControlFlow::Break(()));
            }
            Simulation::Singles {
                direct,
                after_basics,
            } => (direct, after_basics),
        };

        let score = StepScore {
            singles_after_basics: after_basics,
            direct_singles: direct,
            difficulty: Reverse(discovery.difficulty()),
            eliminations: discovery.eliminations.len(),
        };
        let better = match &self.best {
            None => true,
            Some(best) => best.score.is_some_and(|s| score > s),
        };
        if better {
            self.best = Some(BestStep {
                discovery,
                score: Some(score),
            });
        }
        Ok(ControlFlow::Continue(()))
    }

    pub fn best(&self) -> Option<&BestStep> {
        self.best.as_ref()
    }

    /// Number of non-empty discoveries scored so far.
    pub fn considered(&self) -> usize {
        self.considered
    }

    pub fn into_best(self) -> Option<BestStep> {
        self.best
    }
}
