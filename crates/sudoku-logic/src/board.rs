//! Candidate board: per-cell digit domains, groups and the weak-link graph.
//!
//! A candidate is a (cell, digit) possibility packed into one integer,
//! `cell * size + (digit - 1)`. Weak links ("these two candidates cannot both
//! be true") are derived once from cells and groups, plus any extra exclusions
//! added by the caller, and shared read-only between clones.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::{BitSet, Group, LogicResult};

/// Index of a (cell, digit) possibility.
pub type Candidate = usize;

/// Largest supported digit count.
pub const MAX_SIZE: usize = 16;

/// Errors raised while building a board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board size {0} is not supported (expected 1..=16 digits)")]
    UnsupportedSize(usize),
    #[error("a {width}x{height} grid needs a square digit count, got {size}")]
    NotSquare {
        size: usize,
        width: usize,
        height: usize,
    },
    #[error("puzzle string has {0} cells, expected 16 or 81")]
    InvalidLength(usize),
    #[error("invalid character {0:?} in puzzle string")]
    InvalidCharacter(char),
    #[error("group {name} references cell {cell} outside the board")]
    CellOutOfRange { name: String, cell: usize },
    #[error("group {name} has {len} cells but the board only has {size} digits")]
    GroupTooLarge {
        name: String,
        len: usize,
        size: usize,
    },
    #[error("candidate {0} is outside the board")]
    CandidateOutOfRange(Candidate),
    #[error("given {digit} at {cell} contradicts the other givens")]
    ContradictoryGiven { cell: String, digit: u8 },
}

#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    width: usize,
    height: usize,
    cands: Vec<BitSet>,
    values: Vec<Option<u8>>,
    groups: Arc<Vec<Group>>,
    extra_weak: Arc<Vec<(Candidate, Candidate)>>,
    weak_links: Arc<Vec<Vec<Candidate>>>,
}

impl Board {
    /// An empty board with custom groups. Every cell starts with all digits.
    pub fn new(
        size: usize,
        width: usize,
        height: usize,
        groups: Vec<Group>,
    ) -> Result<Self, BoardError> {
        if size == 0 || size > MAX_SIZE {
            return Err(BoardError::UnsupportedSize(size));
        }
        let cell_count = width * height;
        for group in &groups {
            validate_group(group, size, cell_count)?;
        }
        let mut board = Board {
            size,
            width,
            height,
            cands: vec![BitSet::full(size); cell_count],
            values: vec![None; cell_count],
            groups: Arc::new(groups),
            extra_weak: Arc::new(Vec::new()),
            weak_links: Arc::new(Vec::new()),
        };
        board.rebuild_weak_links();
        Ok(board)
    }

    /// An empty `size`x`size` sudoku with rows, columns and square boxes.
    pub fn sudoku(size: usize) -> Result<Self, BoardError> {
        let box_size = (1..=size).find(|b| b * b >= size).unwrap_or(1);
        if box_size * box_size != size {
            return Err(BoardError::NotSquare {
                size,
                width: size,
                height: size,
            });
        }

        let mut groups = Vec::with_capacity(size * 3);
        for row in 0..size {
            groups.push(Group::new(
                format!("Row {}", row + 1),
                (0..size).map(|col| row * size + col).collect(),
            ));
        }
        for col in 0..size {
            groups.push(Group::new(
                format!("Column {}", col + 1),
                (0..size).map(|row| row * size + col).collect(),
            ));
        }
        for b in 0..size {
            let top = (b / box_size) * box_size;
            let left = (b % box_size) * box_size;
            groups.push(Group::new(
                format!("Box {}", b + 1),
                (0..size)
                    .map(|i| (top + i / box_size) * size + left + i % box_size)
                    .collect(),
            ));
        }
        Board::new(size, size, size, groups)
    }

    /// Parse a 4x4 or 9x9 puzzle string. `0` or `.` marks an empty cell and
    /// whitespace is ignored.
    pub fn from_string(s: &str) -> Result<Self, BoardError> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        let size = match chars.len() {
            16 => 4,
            81 => 9,
            n => return Err(BoardError::InvalidLength(n)),
        };
        let mut board = Board::sudoku(size)?;
        for (cell, &ch) in chars.iter().enumerate() {
            let digit = match ch {
                '0' | '.' => continue,
                c => c
                    .to_digit(10)
                    .filter(|&d| d >= 1 && d as usize <= size)
                    .ok_or(BoardError::InvalidCharacter(c))? as u8,
            };
            if !board.set_value(cell, digit) {
                return Err(BoardError::ContradictoryGiven {
                    cell: board.cell_name(cell),
                    digit,
                });
            }
        }
        Ok(board)
    }

    /// Add a group and rebuild the weak-link graph.
    pub fn add_group(&mut self, group: Group) -> Result<(), BoardError> {
        validate_group(&group, self.size, self.cell_count())?;
        Arc::make_mut(&mut self.groups).push(group);
        self.rebuild_weak_links();
        Ok(())
    }

    /// Declare two candidates mutually exclusive beyond what the groups imply.
    pub fn add_weak_link(&mut self, a: Candidate, b: Candidate) -> Result<(), BoardError> {
        if let Some(&bad) = [a, b].iter().find(|&&c| c >= self.candidate_count()) {
            return Err(BoardError::CandidateOutOfRange(bad));
        }
        if a != b {
            Arc::make_mut(&mut self.extra_weak).push((a, b));
            self.rebuild_weak_links();
        }
        Ok(())
    }

    fn rebuild_weak_links(&mut self) {
        let size = self.size;
        let mut links: Vec<Vec<Candidate>> = vec![Vec::new(); self.cell_count() * size];
        let mut link = |a: Candidate, b: Candidate| {
            links[a].push(b);
            links[b].push(a);
        };

        for cell in 0..self.cell_count() {
            for d1 in 1..=size as u8 {
                for d2 in (d1 + 1)..=size as u8 {
                    link(candidate_index(size, cell, d1), candidate_index(size, cell, d2));
                }
            }
        }
        for group in self.groups.iter() {
            let cells = group.cells();
            for i in 0..cells.len() {
                for j in (i + 1)..cells.len() {
                    if cells[i] == cells[j] {
                        continue;
                    }
                    for digit in 1..=size as u8 {
                        link(
                            candidate_index(size, cells[i], digit),
                            candidate_index(size, cells[j], digit),
                        );
                    }
                }
            }
        }
        for &(a, b) in self.extra_weak.iter() {
            link(a, b);
        }

        for list in links.iter_mut() {
            list.sort_unstable();
            list.dedup();
        }
        self.weak_links = Arc::new(links);
    }

    // ==================== Topology ====================

    /// Number of digits.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn candidate_count(&self) -> usize {
        self.cell_count() * self.size
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[inline]
    pub fn candidate(&self, cell: usize, digit: u8) -> Candidate {
        candidate_index(self.size, cell, digit)
    }

    #[inline]
    pub fn cell_of(&self, cand: Candidate) -> usize {
        cand / self.size
    }

    #[inline]
    pub fn digit_of(&self, cand: Candidate) -> u8 {
        (cand % self.size) as u8 + 1
    }

    /// Every candidate that cannot be true alongside `cand`, sorted. Includes
    /// candidates already eliminated from the board.
    pub fn weak_links(&self, cand: Candidate) -> &[Candidate] {
        &self.weak_links[cand]
    }

    pub fn is_weak_link(&self, a: Candidate, b: Candidate) -> bool {
        self.weak_links[a].binary_search(&b).is_ok()
    }

    // ==================== State ====================

    #[inline]
    pub fn candidates(&self, cell: usize) -> BitSet {
        self.cands[cell]
    }

    pub fn candidate_masks(&self) -> &[BitSet] {
        &self.cands
    }

    #[inline]
    pub fn value(&self, cell: usize) -> Option<u8> {
        self.values[cell]
    }

    #[inline]
    pub fn is_set(&self, cell: usize) -> bool {
        self.values[cell].is_some()
    }

    #[inline]
    pub fn has_candidate(&self, cand: Candidate) -> bool {
        self.cands[self.cell_of(cand)].contains(self.digit_of(cand))
    }

    pub fn unset_cells(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.cell_count()).filter(|&cell| !self.is_set(cell))
    }

    pub fn is_solved(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// Whether any cell has run out of candidates.
    pub fn has_empty_cell(&self) -> bool {
        self.cands.iter().any(BitSet::is_empty)
    }

    // ==================== Mutation ====================

    /// Remove one candidate from its cell.
    pub fn clear_candidate(&mut self, cand: Candidate) -> LogicResult {
        let cell = self.cell_of(cand);
        let digit = self.digit_of(cand);
        if !self.cands[cell].remove(digit) {
            return LogicResult::None;
        }
        if self.cands[cell].is_empty() {
            LogicResult::Invalid
        } else {
            LogicResult::Changed
        }
    }

    /// Intersect a cell's candidates with `mask`.
    pub fn restrict(&mut self, cell: usize, mask: BitSet) -> LogicResult {
        let before = self.cands[cell];
        let after = before.intersection(&mask);
        self.cands[cell] = after;
        if after.is_empty() {
            LogicResult::Invalid
        } else if after != before {
            LogicResult::Changed
        } else {
            LogicResult::None
        }
    }

    /// Place `digit` in `cell` and clear every weak-linked candidate. Returns
    /// false when the placement is impossible or empties another cell.
    pub fn set_value(&mut self, cell: usize, digit: u8) -> bool {
        if !self.cands[cell].contains(digit) {
            return false;
        }
        self.cands[cell] = BitSet::single(digit);
        self.values[cell] = Some(digit);

        let weak_links = Arc::clone(&self.weak_links);
        let mut ok = true;
        for &other in &weak_links[self.candidate(cell, digit)] {
            if self.clear_candidate(other) == LogicResult::Invalid {
                ok = false;
            }
        }
        ok
    }

    // ==================== Naming ====================

    pub fn cell_name(&self, cell: usize) -> String {
        format!("r{}c{}", cell / self.width + 1, cell % self.width + 1)
    }

    pub fn candidate_name(&self, cand: Candidate) -> String {
        format!("{}{}", self.digit_of(cand), self.cell_name(self.cell_of(cand)))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                match self.values[row * self.width + col] {
                    Some(v) => write!(f, "{:>3}", v)?,
                    None => write!(f, "{:>3}", '.')?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[inline]
fn candidate_index(size: usize, cell: usize, digit: u8) -> Candidate {
    cell * size + (digit as usize - 1)
}

fn validate_group(group: &Group, size: usize, cell_count: usize) -> Result<(), BoardError> {
    if let Some(&cell) = group.cells().iter().find(|&&c| c >= cell_count) {
        return Err(BoardError::CellOutOfRange {
            name: group.name().to_owned(),
            cell,
        });
    }
    if group.cells().len() > size {
        return Err(BoardError::GroupTooLarge {
            name: group.name().to_owned(),
            len: group.cells().len(),
            size,
        });
    }
    Ok(())
}
