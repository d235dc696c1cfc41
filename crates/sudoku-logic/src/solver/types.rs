use serde::{Deserialize, Serialize};

/// Outcome of one logical step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicResult {
    /// Nothing could be deduced.
    None,
    /// At least one candidate was removed.
    Changed,
    /// The board has no solution.
    Invalid,
}

/// Propagation hit a cell with no candidates or a group that cannot hold a
/// digit it must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contradiction;

/// The proof shape behind a chain-engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StepKind {
    /// Alternating inference chain.
    Aic,
    /// Discontinuous nice loop: the chain returns to its start over a strong link.
    Dnl,
    /// Continuous nice loop: the chain returns to its start over a weak link.
    Cnl,
    CellForcingChain,
    RegionForcingChain,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Aic => write!(f, "AIC"),
            StepKind::Dnl => write!(f, "DNL"),
            StepKind::Cnl => write!(f, "CNL"),
            StepKind::CellForcingChain => write!(f, "Cell Forcing Chain"),
            StepKind::RegionForcingChain => write!(f, "Region Forcing Chain"),
        }
    }
}
