//! Index space - cell indices, boxes and face orientations.

use std::fmt;
use std::ops::{BitAnd, Index, IndexMut};
use std::str::FromStr;

use super::error::MeshError;

/// Number of spatial dimensions
pub const SPACEDIM: usize = 3;

/// A cell index in index space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntVect(pub [i32; SPACEDIM]);

impl IntVect {
    pub const ZERO: Self = Self([0; SPACEDIM]);

    pub fn new(i: i32, j: i32, k: i32) -> Self {
        Self([i, j, k])
    }

    /// Componentwise `self <= other`
    pub fn all_le(&self, other: &IntVect) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }

    pub fn min(&self, other: &IntVect) -> IntVect {
        let mut out = *self;
        for d in 0..SPACEDIM {
            out.0[d] = out.0[d].min(other.0[d]);
        }
        out
    }

    pub fn max(&self, other: &IntVect) -> IntVect {
        let mut out = *self;
        for d in 0..SPACEDIM {
            out.0[d] = out.0[d].max(other.0[d]);
        }
        out
    }
}

impl Index<usize> for IntVect {
    type Output = i32;

    fn index(&self, dir: usize) -> &i32 {
        &self.0[dir]
    }
}

impl IndexMut<usize> for IntVect {
    fn index_mut(&mut self, dir: usize) -> &mut i32 {
        &mut self.0[dir]
    }
}

impl fmt::Display for IntVect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (d, v) in self.0.iter().enumerate() {
            if d > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}

impl FromStr for IntVect {
    type Err = MeshError;

    /// Parse `(i,j,k)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || MeshError::BadIndex(s.to_string());
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|t| t.strip_suffix(')'))
            .ok_or_else(bad)?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != SPACEDIM {
            return Err(bad());
        }

        let mut iv = IntVect::ZERO;
        for (d, p) in parts.iter().enumerate() {
            iv.0[d] = p.parse().map_err(|_| bad())?;
        }
        Ok(iv)
    }
}

/// Which side of a box a face lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Low,
    High,
}

/// A box face: a direction plus a side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation {
    pub dir: usize,
    pub side: Side,
}

impl Orientation {
    pub const COUNT: usize = 2 * SPACEDIM;

    pub fn new(dir: usize, side: Side) -> Self {
        Self { dir, side }
    }

    /// Low faces occupy `0..SPACEDIM`, high faces `SPACEDIM..2*SPACEDIM`
    pub fn index(&self) -> usize {
        match self.side {
            Side::Low => self.dir,
            Side::High => self.dir + SPACEDIM,
        }
    }

    pub fn from_index(idx: usize) -> Self {
        if idx < SPACEDIM {
            Self::new(idx, Side::Low)
        } else {
            Self::new(idx - SPACEDIM, Side::High)
        }
    }

    /// All faces, low faces first
    pub fn all() -> impl Iterator<Item = Orientation> {
        (0..Self::COUNT).map(Self::from_index)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            Side::Low => "low",
            Side::High => "high",
        };
        write!(f, "({},{})", self.dir, side)
    }
}

/// An inclusive, cell-centred, axis-aligned region of index space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexBox {
    lo: IntVect,
    hi: IntVect,
}

impl IndexBox {
    pub fn new(lo: IntVect, hi: IntVect) -> Self {
        Self { lo, hi }
    }

    pub fn small_end(&self) -> IntVect {
        self.lo
    }

    pub fn big_end(&self) -> IntVect {
        self.hi
    }

    /// Non-empty in every direction
    pub fn ok(&self) -> bool {
        self.lo.all_le(&self.hi)
    }

    /// Number of cells in direction `dir` (0 for an empty box)
    pub fn length(&self, dir: usize) -> usize {
        (i64::from(self.hi[dir]) - i64::from(self.lo[dir]) + 1).max(0) as usize
    }

    /// Cell count, or `None` if it does not fit a `usize`
    pub fn checked_num_pts(&self) -> Option<usize> {
        if !self.ok() {
            return Some(0);
        }
        (0..SPACEDIM).try_fold(1usize, |n, d| n.checked_mul(self.length(d)))
    }

    pub fn num_pts(&self) -> usize {
        self.checked_num_pts().unwrap_or(usize::MAX)
    }

    pub fn contains(&self, iv: &IntVect) -> bool {
        self.lo.all_le(iv) && iv.all_le(&self.hi)
    }

    /// Overlap of two boxes; `ok()` is false when they are disjoint
    pub fn intersect(&self, other: &IndexBox) -> IndexBox {
        IndexBox::new(self.lo.max(&other.lo), self.hi.min(&other.hi))
    }

    pub fn intersects(&self, other: &IndexBox) -> bool {
        self.intersect(other).ok()
    }

    /// Grow by `n` cells on every side
    pub fn grow(&self, n: i32) -> IndexBox {
        let mut out = *self;
        for d in 0..SPACEDIM {
            out.lo[d] = out.lo[d].saturating_sub(n);
            out.hi[d] = out.hi[d].saturating_add(n);
        }
        out
    }

    /// The `len`-cell-thick layer just outside the given face
    pub fn adj_cell(&self, face: Orientation, len: i32) -> IndexBox {
        let mut out = *self;
        let d = face.dir;
        match face.side {
            Side::Low => {
                out.hi[d] = self.lo[d].saturating_sub(1);
                out.lo[d] = self.lo[d].saturating_sub(len);
            }
            Side::High => {
                out.lo[d] = self.hi[d].saturating_add(1);
                out.hi[d] = self.hi[d].saturating_add(len);
            }
        }
        out
    }

    /// Linear offset of `iv`, first direction fastest
    pub fn offset(&self, iv: &IntVect) -> usize {
        let mut off = 0usize;
        let mut stride = 1usize;
        for d in 0..SPACEDIM {
            off += (i64::from(iv[d]) - i64::from(self.lo[d])) as usize * stride;
            stride *= self.length(d);
        }
        off
    }

    /// Iterate every cell, first direction fastest
    pub fn cells(&self) -> BoxIter {
        BoxIter {
            domain: *self,
            next: if self.ok() { Some(self.lo) } else { None },
        }
    }
}

impl BitAnd for IndexBox {
    type Output = IndexBox;

    fn bitand(self, rhs: IndexBox) -> IndexBox {
        self.intersect(&rhs)
    }
}

impl BitAnd for &IndexBox {
    type Output = IndexBox;

    fn bitand(self, rhs: Self) -> IndexBox {
        self.intersect(rhs)
    }
}

impl fmt::Display for IndexBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Trailing index type: all zeros for cell-centred boxes
        write!(f, "({} {} {})", self.lo, self.hi, IntVect::ZERO)
    }
}

impl FromStr for IndexBox {
    type Err = MeshError;

    /// Parse `((lo) (hi) (type))`; the type part may be omitted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || MeshError::BadIndex(s.to_string());
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|t| t.strip_suffix(')'))
            .ok_or_else(bad)?;

        let mut tuples = Vec::new();
        let mut start = None;
        for (i, c) in inner.char_indices() {
            match c {
                '(' if start.is_none() => start = Some(i),
                ')' => {
                    let st = start.take().ok_or_else(bad)?;
                    tuples.push(&inner[st..=i]);
                }
                _ => {}
            }
        }

        match tuples.as_slice() {
            [lo, hi] => Ok(IndexBox::new(lo.parse()?, hi.parse()?)),
            [lo, hi, ty] => {
                if ty.parse::<IntVect>()? != IntVect::ZERO {
                    return Err(MeshError::BadIndex(format!(
                        "{} (only cell-centred boxes are supported)",
                        s.trim()
                    )));
                }
                Ok(IndexBox::new(lo.parse()?, hi.parse()?))
            }
            _ => Err(bad()),
        }
    }
}

/// Cell iterator over an `IndexBox`
pub struct BoxIter {
    domain: IndexBox,
    next: Option<IntVect>,
}

impl Iterator for BoxIter {
    type Item = IntVect;

    fn next(&mut self) -> Option<IntVect> {
        let current = self.next?;

        let mut cursor = current;
        let mut d = 0;
        self.next = loop {
            if cursor[d] < self.domain.hi[d] {
                cursor[d] += 1;
                break Some(cursor);
            }
            cursor[d] = self.domain.lo[d];
            d += 1;
            if d == SPACEDIM {
                break None;
            }
        };

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx(lo: (i32, i32, i32), hi: (i32, i32, i32)) -> IndexBox {
        IndexBox::new(IntVect::new(lo.0, lo.1, lo.2), IntVect::new(hi.0, hi.1, hi.2))
    }

    #[test]
    fn test_cells_first_direction_fastest() {
        let b = bx((0, 0, 0), (1, 1, 0));
        let cells: Vec<IntVect> = b.cells().collect();
        assert_eq!(
            cells,
            vec![
                IntVect::new(0, 0, 0),
                IntVect::new(1, 0, 0),
                IntVect::new(0, 1, 0),
                IntVect::new(1, 1, 0),
            ]
        );
        for (i, c) in cells.iter().enumerate() {
            assert_eq!(b.offset(c), i);
        }
    }

    #[test]
    fn test_empty_box_has_no_cells() {
        let b = bx((2, 0, 0), (1, 3, 3));
        assert!(!b.ok());
        assert_eq!(b.num_pts(), 0);
        assert_eq!(b.cells().count(), 0);
    }

    #[test]
    fn test_intersect() {
        let a = bx((0, 0, 0), (7, 7, 7));
        let b = bx((4, -2, 3), (10, 2, 3));
        assert_eq!(a & b, bx((4, 0, 3), (7, 2, 3)));
        assert!(!(a & bx((8, 0, 0), (9, 9, 9))).ok());
    }

    #[test]
    fn test_adj_cell() {
        let b = bx((0, 0, 0), (3, 3, 3));
        let lo = b.adj_cell(Orientation::new(1, Side::Low), 1);
        assert_eq!(lo, bx((0, -1, 0), (3, -1, 3)));
        let hi = b.adj_cell(Orientation::new(2, Side::High), 2);
        assert_eq!(hi, bx((0, 0, 4), (3, 3, 5)));
    }

    #[test]
    fn test_orientation_order() {
        let faces: Vec<usize> = Orientation::all().map(|o| o.index()).collect();
        assert_eq!(faces, (0..2 * SPACEDIM).collect::<Vec<_>>());
        assert_eq!(Orientation::from_index(0).side, Side::Low);
        assert_eq!(Orientation::from_index(SPACEDIM).side, Side::High);
    }

    #[test]
    fn test_extreme_corners_do_not_overflow() {
        let wide = bx((i32::MIN, 0, 0), (i32::MAX, 0, 0));
        assert_eq!(wide.length(0), 1usize << 32);
        assert_eq!(wide.checked_num_pts(), Some(1usize << 32));

        let huge = bx((0, 0, 0), (2_000_000_000, 2_000_000_000, 2_000_000_000));
        assert_eq!(huge.checked_num_pts(), None);

        let edge = bx((i32::MAX - 1, 0, 0), (i32::MAX, 0, 0));
        let cells: Vec<IntVect> = edge.cells().collect();
        assert_eq!(cells, vec![IntVect::new(i32::MAX - 1, 0, 0), IntVect::new(i32::MAX, 0, 0)]);
        assert_eq!(edge.offset(&IntVect::new(i32::MAX, 0, 0)), 1);
        assert_eq!(edge.grow(1).big_end()[0], i32::MAX);
    }

    #[test]
    fn test_display_and_parse() {
        let b = bx((-1, 0, 2), (4, 5, 6));
        let text = b.to_string();
        assert_eq!(text, "((-1,0,2) (4,5,6) (0,0,0))");
        assert_eq!(text.parse::<IndexBox>().unwrap(), b);
        assert_eq!("((0,0,0) (1,1,1))".parse::<IndexBox>().unwrap(), bx((0, 0, 0), (1, 1, 1)));
        assert!("((0,0,0) (1,1,1) (1,0,0))".parse::<IndexBox>().is_err());
        assert!("(1,2)".parse::<IntVect>().is_err());
    }
}
