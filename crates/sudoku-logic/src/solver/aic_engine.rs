//! AIC Engine: alternating inference chains, nice loops and forcing chains.
//!
//! One run:
//! 1. discover strong links on the current board,
//! 2. breadth-first chain search from every candidate with a strong link,
//!    reporting AIC, DNL and CNL eliminations and recording every relation
//!    the chains prove,
//! 3. cell and region forcing chains over the recorded relations,
//! 4. score every discovery and apply the best one.
//!
//! Nothing touches the live board before step 4.

use std::collections::VecDeque;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use super::best_step::{BestStep, BestStepSelector};
use super::chain::{Chain, Discovery, LinkType, Proof};
use super::eliminations::{loop_eliminations, strong_eliminations};
use super::explain::{describe, StepDescription};
use super::forcing::{cell_forcing, region_forcing};
use super::link_cache::{LinkCache, Relation};
use super::strong_links::StrongLinks;
use super::types::StepKind;
use super::DiscoverySink;
use crate::{Board, Cancellation, Cancelled, Candidate, LogicResult};

/// Limits and passes for one engine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AicConfig {
    /// Largest almost locked set considered, in cells. Uncapped by default.
    pub max_als_cells: Option<usize>,
    /// Longest chain explored, in candidates. Uncapped by default.
    pub max_chain_len: Option<usize>,
    pub cell_forcing: bool,
    pub region_forcing: bool,
}

impl Default for AicConfig {
    fn default() -> Self {
        Self {
            max_als_cells: None,
            max_chain_len: None,
            cell_forcing: true,
            region_forcing: true,
        }
    }
}

/// Counters reported at debug level after each search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub strong_links: usize,
    pub edges: usize,
    pub chains_kept: usize,
    /// Extensions dropped because they proved nothing new.
    pub pruned: usize,
    pub discoveries: usize,
}

/// Breadth-first chain search state.
struct ChainSearch<'a> {
    board: &'a Board,
    links: &'a StrongLinks,
    config: &'a AicConfig,
    cache: LinkCache,
    stats: SearchStats,
}

impl<'a> ChainSearch<'a> {
    fn new(board: &'a Board, links: &'a StrongLinks, config: &'a AicConfig) -> Self {
        Self {
            board,
            links,
            config,
            cache: LinkCache::seeded(board, links),
            stats: SearchStats {
                strong_links: links.len(),
                ..SearchStats::default()
            },
        }
    }

    fn run(
        &mut self,
        cancel: &dyn Cancellation,
        sink: DiscoverySink<'_>,
    ) -> Result<ControlFlow<()>, Cancelled> {
        let board = self.board;
        let mut queue: VecDeque<Chain> = (0..board.candidate_count())
            .filter(|&c| board.has_candidate(c) && self.links.has_links(c))
            .map(Chain::new)
            .collect();

        while let Some(chain) = queue.pop_front() {
            let links = self.links;
            for &next in links.partners(chain.last()) {
                cancel.check()?;
                self.stats.edges += 1;
                if self.extend(&chain, next, &mut queue, sink)?.is_break() {
                    return Ok(ControlFlow::Break(()));
                }
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn emit(
        &mut self,
        sink: DiscoverySink<'_>,
        kind: StepKind,
        chain: Chain,
        eliminations: Vec<Candidate>,
    ) -> Result<ControlFlow<()>, Cancelled> {
        self.stats.discoveries += 1;
        log::trace!(
            "{} over {} candidates eliminates {}",
            kind,
            chain.len(),
            eliminations.len()
        );
        sink(Discovery {
            kind,
            proof: Proof::Chain(chain),
            eliminations,
        })
    }

    /// Follow the strong link `chain.last() = next`.
    fn extend(
        &mut self,
        chain: &Chain,
        next: Candidate,
        queue: &mut VecDeque<Chain>,
        sink: DiscoverySink<'_>,
    ) -> Result<ControlFlow<()>, Cancelled> {
        let board = self.board;
        let first = chain.first();

        if next == first {
            // Discontinuous loop: the start cannot be false.
            if chain.len() < 3 {
                return Ok(ControlFlow::Continue(()));
            }
            let cell = board.cell_of(first);
            let elims: Vec<Candidate> = board
                .candidates(cell)
                .iter()
                .map(|d| board.candidate(cell, d))
                .filter(|&c| c != first)
                .collect();
            if elims.is_empty() {
                return Ok(ControlFlow::Continue(()));
            }
            return self.emit(sink, StepKind::Dnl, chain.extended(next), elims);
        }
        if chain.contains(next) {
            return Ok(ControlFlow::Continue(()));
        }
        let extended = chain.extended(next);
        if self.config.max_chain_len.is_some_and(|max| extended.len() > max) {
            return Ok(ControlFlow::Continue(()));
        }
        if !self.record_strong_relations(&extended) && chain.len() >= 3 {
            self.stats.pruned += 1;
            return Ok(ControlFlow::Continue(()));
        }
        self.stats.chains_kept += 1;

        let elims = strong_eliminations(board, &extended);
        if !elims.is_empty()
            && self
                .emit(sink, StepKind::Aic, extended.clone(), elims)?
                .is_break()
        {
            return Ok(ControlFlow::Break(()));
        }

        if extended.len() >= 4 && board.is_weak_link(next, first) {
            let elims = loop_eliminations(board, &extended, self.links);
            if !elims.is_empty()
                && self
                    .emit(sink, StepKind::Cnl, extended.clone(), elims)?
                    .is_break()
            {
                return Ok(ControlFlow::Break(()));
            }
        }

        let can_grow = self
            .config
            .max_chain_len
            .map_or(true, |max| extended.len() + 2 <= max);
        for &weak in board.weak_links(next) {
            if !board.has_candidate(weak)
                || board.is_set(board.cell_of(weak))
                || extended.contains(weak)
            {
                continue;
            }
            self.record_weak_relations(&extended, weak);
            if can_grow && self.links.has_links(weak) {
                queue.push_back(extended.extended(weak));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Record what a chain ending on a strong link proves about its new end:
    /// every even node false makes it true, and so does every outside
    /// candidate that excludes an even node. Returns whether anything was new.
    fn record_strong_relations(&mut self, chain: &Chain) -> bool {
        let board = self.board;
        let cands = chain.candidates();
        let end = chain.last();
        let mut novel = false;

        for i in (0..cands.len() - 1).step_by(2) {
            let node = cands[i];
            novel |= self.cache.record(Relation::Strong, node, end, || {
                Chain::from_parts(cands[i..].to_vec(), LinkType::Strong)
            });
            for &pred in board.weak_links(node) {
                if pred == end || !board.has_candidate(pred) || chain.contains(pred) {
                    continue;
                }
                novel |= self.cache.record(Relation::WeakToStrong, pred, end, || {
                    prefixed(pred, &cands[i..], None)
                });
            }
        }
        novel
    }

    /// Record that `weak` is false whenever an odd node, or a candidate
    /// excluding an even node, is true.
    fn record_weak_relations(&mut self, chain: &Chain, weak: Candidate) {
        let board = self.board;
        let cands = chain.candidates();

        for k in (1..cands.len()).step_by(2) {
            self.cache.record(Relation::Weak, cands[k], weak, || {
                let mut nodes = cands[k..].to_vec();
                nodes.push(weak);
                Chain::from_parts(nodes, LinkType::Weak)
            });
        }
        for i in (0..cands.len() - 1).step_by(2) {
            for &pred in board.weak_links(cands[i]) {
                if pred == weak || !board.has_candidate(pred) || chain.contains(pred) {
                    continue;
                }
                self.cache.record(Relation::Weak, pred, weak, || {
                    prefixed(pred, &cands[i..], Some(weak))
                });
            }
        }
    }
}

/// `pred - nodes... [- tail]`
fn prefixed(pred: Candidate, nodes: &[Candidate], tail: Option<Candidate>) -> Chain {
    let mut all = Vec::with_capacity(nodes.len() + 2);
    all.push(pred);
    all.extend_from_slice(nodes);
    all.extend(tail);
    Chain::from_parts(all, LinkType::Weak)
}

/// Runs the chain engine on a board.
#[derive(Debug, Clone, Default)]
pub struct AicEngine {
    config: AicConfig,
}

impl AicEngine {
    pub fn new(config: AicConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AicConfig {
        &self.config
    }

    /// Find the best deduction and apply it. Returns `Changed` when candidates
    /// were removed, `Invalid` when the board turned out to be unsolvable and
    /// `None` when nothing was found. Only a `Changed` step is appended to
    /// `steps`.
    pub fn run(
        &self,
        board: &mut Board,
        steps: Option<&mut Vec<StepDescription>>,
        cancel: &dyn Cancellation,
    ) -> Result<LogicResult, Cancelled> {
        let (best, links) = self.select(board, cancel)?;
        let Some(best) = best else {
            return Ok(LogicResult::None);
        };
        log::debug!(
            "applying {} with {} eliminations (score {:?})",
            best.discovery.kind,
            best.discovery.eliminations.len(),
            best.score
        );
        let description = steps
            .is_some()
            .then(|| describe(board, &links, &best.discovery));

        let mut result = LogicResult::None;
        for &cand in &best.discovery.eliminations {
            match board.clear_candidate(cand) {
                LogicResult::Invalid => result = LogicResult::Invalid,
                LogicResult::Changed if result == LogicResult::None => {
                    result = LogicResult::Changed
                }
                _ => {}
            }
        }
        if let (LogicResult::Changed, Some(steps), Some(description)) =
            (result, steps, description)
        {
            steps.push(description);
        }
        Ok(result)
    }

    /// The deduction `run` would apply, without applying it.
    pub fn best_step(
        &self,
        board: &Board,
        cancel: &dyn Cancellation,
    ) -> Result<Option<BestStep>, Cancelled> {
        Ok(self.select(board, cancel)?.0)
    }

    /// Every discovery of one run, in the order they were found.
    pub fn discover_all(
        &self,
        board: &Board,
        cancel: &dyn Cancellation,
    ) -> Result<Vec<Discovery>, Cancelled> {
        let links = StrongLinks::discover(board, &self.config, cancel)?;
        let mut found = Vec::new();
        self.search(board, &links, cancel, &mut |discovery| {
            found.push(discovery);
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(found)
    }

    fn select(
        &self,
        board: &Board,
        cancel: &dyn Cancellation,
    ) -> Result<(Option<BestStep>, StrongLinks), Cancelled> {
        let links = StrongLinks::discover(board, &self.config, cancel)?;
        let mut selector = BestStepSelector::new();
        self.search(board, &links, cancel, &mut |discovery| {
            selector.consider(board, discovery, cancel)
        })?;
        log::debug!("scored {} discoveries", selector.considered());
        Ok((selector.into_best(), links))
    }

    /// Chain search, then the forcing passes, feeding `sink` until it breaks.
    pub fn search(
        &self,
        board: &Board,
        links: &StrongLinks,
        cancel: &dyn Cancellation,
        sink: DiscoverySink<'_>,
    ) -> Result<SearchStats, Cancelled> {
        let mut chains = ChainSearch::new(board, links, &self.config);
        let flow = chains.run(cancel, sink)?;
        let stats = chains.stats;
        log::debug!(
            "chain search: {} strong links, {} edges, {} chains kept, {} pruned, \
             {} discoveries, {} weak / {} weak-to-strong relations",
            stats.strong_links,
            stats.edges,
            stats.chains_kept,
            stats.pruned,
            stats.discoveries,
            chains.cache.len(Relation::Weak),
            chains.cache.len(Relation::WeakToStrong)
        );
        if flow.is_break() {
            return Ok(stats);
        }

        let frozen = chains.cache.freeze(board.candidate_count());
        if self.config.cell_forcing && cell_forcing(board, &frozen, cancel, sink)?.is_break() {
            return Ok(stats);
        }
        if self.config.region_forcing && region_forcing(board, &frozen, cancel, sink)?.is_break() {
            log::debug!("region forcing stopped early");
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::basic::apply_basics;
    use crate::solver::forcing::{find_common, CommonConsequences};
    use crate::solver::test_support::{
        als_loop_board, assert_sound, branches_board, cell_forcing_board, contradiction_board,
        dnl_board, region_forcing_board, solutions, STUCK,
    };
    use crate::{CancelFlag, NeverCancel};

    fn all(board: &Board) -> Vec<Discovery> {
        AicEngine::default().discover_all(board, &NeverCancel).unwrap()
    }

    #[test]
    fn test_dnl_eliminates_rest_of_start_cell() {
        let board = dnl_board();
        let found = all(&board);
        let start = board.candidate(0, 1);
        let dnl = found
            .iter()
            .find(|d| {
                d.kind == StepKind::Dnl
                    && matches!(&d.proof, Proof::Chain(c) if c.first() == start)
            })
            .expect("DNL through 1r1c1");
        assert_eq!(
            dnl.eliminations,
            vec![board.candidate(0, 2), board.candidate(0, 3)]
        );
        let Proof::Chain(chain) = &dnl.proof else {
            unreachable!()
        };
        assert_eq!(chain.last(), start);
        assert_sound(&board, &found);
    }

    #[test]
    fn test_cell_forcing_found_by_engine() {
        let board = cell_forcing_board();
        let found = all(&board);
        let target = board.candidate(1, 2);
        assert!(found
            .iter()
            .any(|d| d.kind == StepKind::CellForcingChain && d.eliminations.contains(&target)));
        assert_sound(&board, &found);
    }

    #[test]
    fn test_region_forcing_found_by_engine() {
        let board = region_forcing_board();
        let found = all(&board);
        assert!(found.iter().any(|d| d.kind == StepKind::RegionForcingChain
            && d.eliminations.contains(&board.candidate(2, 1))));
        assert_sound(&board, &found);
    }

    #[test]
    fn test_cnl_includes_als_elimination() {
        let (board, _) = als_loop_board();
        let found = all(&board);
        let expected = [board.candidate(3, 3), board.candidate(4, 1), board.candidate(4, 2)];
        assert!(found.iter().any(|d| d.kind == StepKind::Cnl
            && expected.iter().all(|c| d.eliminations.contains(c))));
        assert_sound(&board, &found);
    }

    #[test]
    fn test_run_applies_best_step() {
        let mut board = dnl_board();
        let before = board.clone();
        let mut steps = Vec::new();
        let result = AicEngine::default()
            .run(&mut board, Some(&mut steps), &NeverCancel)
            .unwrap();
        assert_eq!(result, LogicResult::Changed);
        assert_eq!(steps.len(), 1);

        // Only clears bits, and at least one.
        let mut removed = 0;
        for cell in 0..board.cell_count() {
            let (old, new) = (before.candidates(cell), board.candidates(cell));
            assert!(new.is_subset(&old));
            removed += old.count() - new.count();
        }
        assert_eq!(removed as usize, steps[0].eliminations.len());
        assert!(removed > 0);

        let solved = solutions(&before, 16);
        for solution in &solved {
            for cell in 0..board.cell_count() {
                let digit = solution.value(cell).unwrap();
                assert!(board.candidates(cell).contains(digit));
            }
        }
    }

    #[test]
    fn test_nothing_to_find_is_idempotent() {
        let engine = AicEngine::default();
        for mut board in [
            Board::sudoku(4).unwrap(),
            Board::from_string("1234341221434321").unwrap(),
        ] {
            let before = board.clone();
            for _ in 0..2 {
                let result = engine.run(&mut board, None, &NeverCancel).unwrap();
                assert_eq!(result, LogicResult::None);
                assert_eq!(board.candidate_masks(), before.candidate_masks());
            }
        }
    }

    #[test]
    fn test_runs_are_deterministic() {
        let (board, _) = als_loop_board();
        assert_eq!(all(&board), all(&board));

        let engine = AicEngine::default();
        let a = engine.best_step(&board, &NeverCancel).unwrap().unwrap();
        let b = engine.best_step(&board, &NeverCancel).unwrap().unwrap();
        assert_eq!(a.discovery, b.discovery);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn test_cancel_leaves_board_untouched() {
        let mut board = dnl_board();
        let before = board.clone();
        let flag = CancelFlag::new();
        flag.cancel();
        let mut steps = Vec::new();
        assert_eq!(
            AicEngine::default().run(&mut board, Some(&mut steps), &flag),
            Err(Cancelled)
        );
        assert!(steps.is_empty());
        assert_eq!(board.candidate_masks(), before.candidate_masks());
    }

    #[test]
    fn test_forcing_passes_can_be_disabled() {
        let board = cell_forcing_board();
        let engine = AicEngine::new(AicConfig {
            cell_forcing: false,
            region_forcing: false,
            ..AicConfig::default()
        });
        let found = engine.discover_all(&board, &NeverCancel).unwrap();
        assert!(found
            .iter()
            .all(|d| !matches!(d.kind, StepKind::CellForcingChain | StepKind::RegionForcingChain)));
    }

    fn collect_search(engine: &AicEngine, board: &Board) -> (SearchStats, Vec<Discovery>) {
        let links = StrongLinks::discover(board, engine.config(), &NeverCancel).unwrap();
        let mut found = Vec::new();
        let stats = engine
            .search(board, &links, &NeverCancel, &mut |discovery| {
                found.push(discovery);
                Ok(ControlFlow::Continue(()))
            })
            .unwrap();
        (stats, found)
    }

    fn stuck_board() -> (Board, Board) {
        let mut board = Board::from_string(STUCK).unwrap();
        apply_basics(&mut board).unwrap();
        let solution = solutions(&board, 1).remove(0);
        (board, solution)
    }

    fn assert_keeps_solution(board: &Board, solution: &Board, found: &[Discovery]) {
        for discovery in found {
            for &cand in &discovery.eliminations {
                assert!(board.has_candidate(cand));
                let cell = board.cell_of(cand);
                assert_ne!(
                    solution.value(cell),
                    Some(board.digit_of(cand)),
                    "{} removed a solution candidate",
                    discovery.kind
                );
            }
            assert!(discovery.eliminations.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_capped_search_on_stuck_puzzle_is_sound() {
        let (board, solution) = stuck_board();
        let engine = AicEngine::new(AicConfig {
            max_chain_len: Some(4),
            max_als_cells: Some(3),
            ..AicConfig::default()
        });
        let found = engine.discover_all(&board, &NeverCancel).unwrap();
        assert_keeps_solution(&board, &solution, &found);
    }

    #[test]
    fn test_uncapped_search_on_stuck_puzzle_terminates() {
        let (board, solution) = stuck_board();
        let engine = AicEngine::default();
        assert_eq!(engine.config().max_chain_len, None);

        let (stats, found) = collect_search(&engine, &board);
        assert!(stats.pruned > 0);
        assert!(!found.is_empty());
        assert_keeps_solution(&board, &solution, &found);
    }

    #[test]
    fn test_redundant_extension_is_pruned() {
        let (board, _) = als_loop_board();
        let (stats, found) = collect_search(&AicEngine::default(), &board);
        assert!(stats.pruned > 0);
        assert!(stats.chains_kept + stats.pruned <= stats.edges);

        // 2Q =[ALS P,Q]= 1P - 1R = 2R is a valid chain, but every relation it
        // proves is already known by the time it is reached.
        let redundant = Chain::from_parts(
            vec![
                board.candidate(1, 2),
                board.candidate(0, 1),
                board.candidate(2, 1),
                board.candidate(2, 2),
            ],
            LinkType::Strong,
        );
        assert_eq!(
            strong_eliminations(&board, &redundant),
            vec![board.candidate(4, 2)]
        );
        let proof = Proof::Chain(redundant);
        assert!(found.iter().all(|d| d.proof != proof));
    }

    fn cell_forcing_from(found: &[Discovery], sources: &[Candidate]) -> Option<Discovery> {
        found
            .iter()
            .find(|d| {
                d.kind == StepKind::CellForcingChain
                    && matches!(&d.proof, Proof::Forcing { sources: s, .. } if s == sources)
            })
            .cloned()
    }

    #[test]
    fn test_cell_forcing_through_derived_chains() {
        let board = branches_board(&[1, 3, 4]);
        let found = all(&board);
        let (s1, s2) = (board.candidate(0, 1), board.candidate(0, 2));
        let t3 = board.candidate(3, 3);

        let step = cell_forcing_from(&found, &[s1, s2]).expect("forcing on S");
        assert_eq!(step.eliminations, vec![t3]);
        let Proof::Forcing { chains, .. } = &step.proof else {
            unreachable!()
        };
        assert_eq!(
            chains,
            &vec![
                Chain::from_parts(
                    vec![s1, board.candidate(1, 1), board.candidate(1, 3), t3],
                    LinkType::Weak
                ),
                Chain::from_parts(
                    vec![s2, board.candidate(2, 2), board.candidate(2, 3), t3],
                    LinkType::Weak
                ),
            ]
        );
        assert_sound(&board, &found);
    }

    #[test]
    fn test_chain_search_proves_forced_candidate() {
        let board = branches_board(&[3, 4]);
        let (s1, s2) = (board.candidate(0, 1), board.candidate(0, 2));
        let (t3, t4) = (board.candidate(3, 3), board.candidate(3, 4));

        let config = AicConfig::default();
        let links = StrongLinks::discover(&board, &config, &NeverCancel).unwrap();
        let mut search = ChainSearch::new(&board, &links, &config);
        let flow = search
            .run(&NeverCancel, &mut |_| Ok(ControlFlow::Continue(())))
            .unwrap();
        assert_eq!(flow, ControlFlow::Continue(()));
        let frozen = search.cache.freeze(board.candidate_count());
        assert_eq!(
            find_common(&frozen, &[s1, s2]),
            Some(CommonConsequences {
                excluded: vec![t3],
                forced: vec![t4],
            })
        );
        assert_eq!(
            frozen.weak_to_strong_from(s1)[&t4].candidates(),
            &[s1, board.candidate(1, 1), board.candidate(1, 3), t3, t4]
        );

        let found = all(&board);
        let step = cell_forcing_from(&found, &[s1, s2]).expect("forcing on S");
        assert_eq!(step.eliminations, vec![t3]);
        let Proof::Forcing { chains, .. } = &step.proof else {
            unreachable!()
        };
        let forced_witnesses: Vec<&Chain> = chains.iter().filter(|c| c.last() == t4).collect();
        assert_eq!(forced_witnesses.len(), 2);
        assert!(forced_witnesses
            .iter()
            .all(|c| c.len() == 5 && c.first_link() == LinkType::Weak));
        assert_sound(&board, &found);
    }

    #[test]
    fn test_invalid_step_is_applied_but_not_logged() {
        let mut board = contradiction_board();
        let engine = AicEngine::default();
        assert!(engine
            .best_step(&board, &NeverCancel)
            .unwrap()
            .unwrap()
            .proves_contradiction());

        let mut steps = Vec::new();
        let result = engine.run(&mut board, Some(&mut steps), &NeverCancel).unwrap();
        assert_eq!(result, LogicResult::Invalid);
        assert!(steps.is_empty());
        assert!(board.has_empty_cell());
    }
}
