//! Logical deduction engine for sudoku and variant grids.
//!
//! A [`Board`] holds per-cell candidate masks, the groups of mutually distinct
//! cells and the weak-link graph derived from them. The [`Solver`] alternates
//! basic propagation with the chain engine ([`AicEngine`]), which searches
//! alternating inference chains, nice loops and forcing chains and applies the
//! single most useful deduction it finds per call.
//!
//! ```
//! use sudoku_logic::{Board, LogicResult, NeverCancel, Solver};
//!
//! let mut board = Board::from_string(
//!     "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
//! )
//! .unwrap();
//! let result = Solver::new()
//!     .solve_logically(&mut board, None, &NeverCancel)
//!     .unwrap();
//! assert_eq!(result, LogicResult::Changed);
//! assert!(board.is_solved());
//! ```

mod bitset;
mod board;
mod cancel;
mod group;
pub mod solver;

pub use bitset::BitSet;
pub use board::{Board, BoardError, Candidate, MAX_SIZE};
pub use cancel::{CancelFlag, Cancellation, Cancelled, NeverCancel};
pub use group::{Constraint, Group, RequiredDigits};
pub use solver::{
    AicConfig, AicEngine, Discovery, LogicResult, Proof, Solver, SolverConfig, StepDescription,
    StepKind,
};
