#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use bevy_math::IVec2;

/// An integer (row, column) index identifying one cell in a [`GridMap`](crate::GridMap).
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub(crate) r: i32,
    pub(crate) c: i32,
}

impl CellIndex {
    #[inline]
    #[must_use]
    pub fn new(r: i32, c: i32) -> Self {
        Self { r, c }
    }

    #[inline]
    #[must_use]
    pub fn r(&self) -> i32 {
        self.r
    }

    #[inline]
    #[must_use]
    pub fn c(&self) -> i32 {
        self.c
    }

    #[inline]
    #[must_use]
    pub fn north(&self) -> Self {
        Self::new(self.r + 1, self.c)
    }

    #[inline]
    #[must_use]
    pub fn south(&self) -> Self {
        Self::new(self.r - 1, self.c)
    }

    #[inline]
    #[must_use]
    pub fn east(&self) -> Self {
        Self::new(self.r, self.c + 1)
    }

    #[inline]
    #[must_use]
    pub fn west(&self) -> Self {
        Self::new(self.r, self.c - 1)
    }

    /// Returns true if `r` and `c` are both non-negative and less than `rows`/`cols`
    /// respectively.
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, rows: i32, cols: i32) -> bool {
        self.r >= 0 && self.r < rows && self.c >= 0 && self.c < cols
    }
}

impl From<(i32, i32)> for CellIndex {
    #[inline]
    fn from((r, c): (i32, i32)) -> Self {
        Self::new(r, c)
    }
}

impl From<(usize, usize)> for CellIndex {
    #[inline]
    fn from((r, c): (usize, usize)) -> Self {
        Self::new(r as i32, c as i32)
    }
}

impl From<CellIndex> for (i32, i32) {
    #[inline]
    fn from(idx: CellIndex) -> Self {
        (idx.r, idx.c)
    }
}

impl From<CellIndex> for IVec2 {
    #[inline]
    fn from(idx: CellIndex) -> Self {
        IVec2::new(idx.c, idx.r)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_in_bounds() {
        let idx = CellIndex::new(0, 0);
        assert!(idx.in_bounds(10, 20));
        assert!(!CellIndex::new(-1, 0).in_bounds(10, 20));
        assert!(!CellIndex::new(10, 0).in_bounds(10, 20));
        assert!(!CellIndex::new(0, 20).in_bounds(10, 20));
    }

    #[test]
    fn test_neighbors() {
        let idx = CellIndex::new(4, 10);
        assert_eq!(idx.north(), CellIndex::new(5, 10));
        assert_eq!(idx.south(), CellIndex::new(3, 10));
        assert_eq!(idx.east(), CellIndex::new(4, 11));
        assert_eq!(idx.west(), CellIndex::new(4, 9));
    }
}
