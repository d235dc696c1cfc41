//! Discovery -> StepDescription conversion.
//!
//! Discoveries carry only candidates and links. Text is produced here, and
//! only when the caller asked for a step log.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::chain::{Chain, Discovery, LinkType, Proof};
use super::strong_links::{StrongLinkKind, StrongLinks};
use super::types::StepKind;
use crate::{Board, Candidate};

/// A logged solving step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescription {
    pub headline: String,
    /// Candidates the step reasons from.
    pub sources: Vec<Candidate>,
    /// Candidates the step removed.
    pub eliminations: Vec<Candidate>,
    /// One entry per witnessing chain of a forcing step.
    pub sub_steps: Vec<StepDescription>,
}

impl StepDescription {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            sources: Vec::new(),
            eliminations: Vec::new(),
            sub_steps: Vec::new(),
        }
    }
}

impl fmt::Display for StepDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.headline)?;
        for sub in &self.sub_steps {
            write!(f, "\n    {}", sub)?;
        }
        Ok(())
    }
}

fn link_symbol(board: &Board, links: &StrongLinks, a: Candidate, b: Candidate) -> String {
    match links.kind(a, b) {
        Some(StrongLinkKind::Constraint(name)) => format!("=[{}]=", name),
        Some(StrongLinkKind::Als(cells)) => {
            let names: Vec<String> = cells.iter().map(|&c| board.cell_name(c)).collect();
            format!("=[ALS {}]=", names.join(","))
        }
        _ => "=".to_owned(),
    }
}

/// `1r1c2=1r1c5-2r1c5=...` notation, with the backing set named on
/// constraint and ALS links.
pub fn render_chain(board: &Board, links: &StrongLinks, chain: &Chain) -> String {
    let cands = chain.candidates();
    let mut out = String::new();
    for (i, &cand) in cands.iter().enumerate() {
        if i > 0 {
            match chain.link_after(i - 1) {
                LinkType::Strong => out.push_str(&link_symbol(board, links, cands[i - 1], cand)),
                LinkType::Weak => out.push('-'),
            }
        }
        out.push_str(&board.candidate_name(cand));
    }
    out
}

fn render_eliminations(board: &Board, elims: &[Candidate]) -> String {
    elims
        .iter()
        .map(|&c| format!("-{}", board.candidate_name(c)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Describe a discovery in terms of the board it was found on.
pub fn describe(board: &Board, links: &StrongLinks, discovery: &Discovery) -> StepDescription {
    let elims = render_eliminations(board, &discovery.eliminations);
    match &discovery.proof {
        Proof::Chain(chain) => {
            let mut text = render_chain(board, links, chain);
            if discovery.kind == StepKind::Cnl {
                text.push('-');
                text.push_str(&board.candidate_name(chain.first()));
            }
            let mut sources = chain.candidates().to_vec();
            if discovery.kind == StepKind::Dnl {
                sources.pop();
            }
            StepDescription {
                headline: format!("{}: {} => {}", discovery.kind, text, elims),
                sources,
                eliminations: discovery.eliminations.clone(),
                sub_steps: Vec::new(),
            }
        }
        Proof::Forcing { sources, chains } => {
            let names: Vec<String> = sources.iter().map(|&c| board.candidate_name(c)).collect();
            let sub_steps = chains
                .iter()
                .map(|chain| StepDescription {
                    headline: render_chain(board, links, chain),
                    sources: vec![chain.first()],
                    eliminations: Vec::new(),
                    sub_steps: Vec::new(),
                })
                .collect();
            StepDescription {
                headline: format!("{} ({}) => {}", discovery.kind, names.join(","), elims),
                sources: sources.clone(),
                eliminations: discovery.eliminations.clone(),
                sub_steps,
            }
        }
    }
}
