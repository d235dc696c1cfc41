//! Digit masks for cell domains.

use serde::{Deserialize, Serialize};

/// A set of digits stored as a bitmask. Bit `d` represents digit `d`, so the
/// usable range is `1..=16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BitSet(u32);

impl BitSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// All digits `1..=size`.
    pub const fn full(size: usize) -> Self {
        Self(((1u32 << (size + 1)) - 1) & !1)
    }

    pub const fn single(digit: u8) -> Self {
        Self(1 << digit)
    }

    #[inline]
    pub fn contains(&self, digit: u8) -> bool {
        self.0 & (1 << digit) != 0
    }

    #[inline]
    pub fn insert(&mut self, digit: u8) {
        self.0 |= 1 << digit;
    }

    /// Remove a digit, returning whether it was present.
    #[inline]
    pub fn remove(&mut self, digit: u8) -> bool {
        let present = self.contains(digit);
        self.0 &= !(1 << digit);
        present
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Smallest digit in the set.
    pub fn min(&self) -> Option<u8> {
        if self.is_empty() {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }

    /// Largest digit in the set.
    pub fn max(&self) -> Option<u8> {
        if self.is_empty() {
            None
        } else {
            Some((31 - self.0.leading_zeros()) as u8)
        }
    }

    pub fn union(&self, other: &BitSet) -> BitSet {
        BitSet(self.0 | other.0)
    }

    pub fn intersection(&self, other: &BitSet) -> BitSet {
        BitSet(self.0 & other.0)
    }

    pub fn difference(&self, other: &BitSet) -> BitSet {
        BitSet(self.0 & !other.0)
    }

    pub fn is_subset(&self, other: &BitSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterate the digits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let digit = bits.trailing_zeros() as u8;
            bits &= bits - 1;
            Some(digit)
        })
    }
}

impl FromIterator<u8> for BitSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = BitSet::empty();
        for digit in iter {
            set.insert(digit);
        }
        set
    }
}

impl std::fmt::Display for BitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for digit in self.iter() {
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}

/// Every `k`-element subset of `0..n` as a bitmask, in increasing numeric
/// order (Gosper's hack).
pub(crate) fn combinations(n: usize, k: usize) -> impl Iterator<Item = u32> {
    let limit: u64 = 1 << n;
    let mut set: u64 = if k == 0 || k > n { limit } else { (1 << k) - 1 };
    std::iter::from_fn(move || {
        if set >= limit {
            return None;
        }
        let current = set;
        let c = set & set.wrapping_neg(); // lowest set bit
        let r = set + c;
        set = (((r ^ set) >> 2) / c) | r;
        Some(current as u32)
    })
}
