//! Solver orchestrator.
//!
//! The outer logical-solve loop alternates basic propagation with single
//! invocations of the chain engine, one deduction at a time.

mod types;
mod basic;
mod chain;
mod strong_links;
mod link_cache;
mod eliminations;
mod forcing;
mod best_step;
mod explain;
mod aic_engine;
#[cfg(test)]
pub(crate) mod test_support;

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::{Board, Cancellation, Cancelled, Candidate};

pub use aic_engine::{AicConfig, AicEngine, SearchStats};
pub use basic::{apply_basics, apply_singles};
pub use best_step::{BestStep, StepScore};
pub use chain::{Chain, Discovery, LinkType, Proof};
pub use eliminations::{
    als_eliminations, loop_eliminations, strong_eliminations, weak_to_strong_eliminations,
};
pub use explain::{describe, render_chain, StepDescription};
pub use forcing::{find_common, CommonConsequences};
pub use link_cache::{FrozenLinks, LinkCache, Relation};
pub use strong_links::{StrongLinkKind, StrongLinks};
pub use types::{Contradiction, LogicResult, StepKind};

/// Receives every discovery of an engine run. Returning `Break` stops the
/// run early.
pub type DiscoverySink<'a> = &'a mut dyn FnMut(Discovery) -> Result<ControlFlow<()>, Cancelled>;

/// Settings for [`Solver`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub aic: AicConfig,
    /// Stop after this many chain-engine steps. Unlimited by default.
    pub max_steps: Option<usize>,
}

/// Stateless apart from its configuration; all search state is per call.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// One chain-engine invocation.
    pub fn step(
        &self,
        board: &mut Board,
        steps: Option<&mut Vec<StepDescription>>,
        cancel: &dyn Cancellation,
    ) -> Result<LogicResult, Cancelled> {
        AicEngine::new(self.config.aic.clone()).run(board, steps, cancel)
    }

    /// Alternate basic propagation and chain steps until the board is solved,
    /// stalls, or proves unsolvable. Returns `Changed` if anything was
    /// removed.
    pub fn solve_logically(
        &self,
        board: &mut Board,
        mut steps: Option<&mut Vec<StepDescription>>,
        cancel: &dyn Cancellation,
    ) -> Result<LogicResult, Cancelled> {
        let engine = AicEngine::new(self.config.aic.clone());
        let mut changed = false;
        let mut chain_steps = 0;

        loop {
            cancel.check()?;
            let before = board.clone();
            let placed = match apply_basics(board) {
                Ok(placed) => placed,
                Err(Contradiction) => {
                    log::debug!("basic propagation hit a contradiction");
                    return Ok(LogicResult::Invalid);
                }
            };
            let removed = removed_candidates(&before, board);
            if !removed.is_empty() {
                changed = true;
                if let Some(steps) = steps.as_deref_mut() {
                    let mut step = StepDescription::new(format!(
                        "Basic techniques: placed {} cells, removed {} candidates",
                        placed,
                        removed.len()
                    ));
                    step.eliminations = removed;
                    steps.push(step);
                }
            }
            if board.is_solved() {
                break;
            }

            if self.config.max_steps.is_some_and(|max| chain_steps >= max) {
                log::debug!("stopping after {} chain steps", chain_steps);
                break;
            }
            chain_steps += 1;
            match engine.run(board, steps.as_deref_mut(), cancel)? {
                LogicResult::None => break,
                LogicResult::Invalid => return Ok(LogicResult::Invalid),
                LogicResult::Changed => changed = true,
            }
        }

        Ok(if changed {
            LogicResult::Changed
        } else {
            LogicResult::None
        })
    }
}

/// Candidates present in `before` but not in `after`, ascending.
fn removed_candidates(before: &Board, after: &Board) -> Vec<Candidate> {
    let mut removed = Vec::new();
    for cell in 0..before.cell_count() {
        let gone = before.candidates(cell).difference(&after.candidates(cell));
        removed.extend(gone.iter().map(|digit| before.candidate(cell, digit)));
    }
    removed
}
