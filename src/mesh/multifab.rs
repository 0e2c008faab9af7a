//! Box collections and the MultiFab container.

use std::fmt;
use std::io::{BufRead, Write};

use super::error::MeshError;
use super::fab::{FArrayBox, Real};
use super::index::IndexBox;

/// Ordered list of grid boxes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxArray {
    boxes: Vec<IndexBox>,
}

impl BoxArray {
    pub fn new(boxes: Vec<IndexBox>) -> Self {
        Self { boxes }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&IndexBox> {
        self.boxes.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexBox> {
        self.boxes.iter()
    }

    pub fn num_pts(&self) -> usize {
        self.boxes.iter().map(IndexBox::num_pts).sum()
    }
}

impl std::ops::Index<usize> for BoxArray {
    type Output = IndexBox;

    fn index(&self, i: usize) -> &IndexBox {
        &self.boxes[i]
    }
}

impl fmt::Display for BoxArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "(BoxArray maxbox({})", self.boxes.len())?;
        writeln!(f, "       m->{}", self.boxes.len())?;
        for b in &self.boxes {
            write!(f, "{} ", b)?;
        }
        write!(f, "\n)")
    }
}

/// Set of pairwise disjoint boxes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxDomain {
    boxes: Vec<IndexBox>,
}

impl BoxDomain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a box; fails if it overlaps a box already in the domain
    pub fn add(&mut self, b: IndexBox) -> Result<(), MeshError> {
        if self.boxes.iter().any(|existing| existing.intersects(&b)) {
            return Err(MeshError::Overlap(b));
        }
        self.boxes.push(b);
        Ok(())
    }

    pub fn from_box_array(ba: &BoxArray) -> Result<Self, MeshError> {
        let mut domain = Self::new();
        for b in ba.iter() {
            domain.add(*b)?;
        }
        Ok(domain)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn num_pts(&self) -> usize {
        self.boxes.iter().map(IndexBox::num_pts).sum()
    }
}

impl fmt::Display for BoxDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(BoxDomain ")?;
        for b in &self.boxes {
            write!(f, "{} ", b)?;
        }
        write!(f, ")")
    }
}

/// One `FArrayBox` per grid box, each grown by `ngrow` ghost cells
#[derive(Debug, Clone, PartialEq)]
pub struct MultiFab {
    grids: BoxArray,
    ncomp: usize,
    ngrow: i32,
    fabs: Vec<FArrayBox>,
}

impl MultiFab {
    pub fn new(grids: BoxArray, ncomp: usize, ngrow: i32) -> Self {
        let fabs = grids
            .iter()
            .map(|b| FArrayBox::new(b.grow(ngrow), ncomp))
            .collect();
        Self {
            grids,
            ncomp,
            ngrow,
            fabs,
        }
    }

    pub fn box_array(&self) -> &BoxArray {
        &self.grids
    }

    pub fn n_comp(&self) -> usize {
        self.ncomp
    }

    pub fn n_grow(&self) -> i32 {
        self.ngrow
    }

    /// Number of grids
    pub fn len(&self) -> usize {
        self.fabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fabs.is_empty()
    }

    /// The grid box without ghost cells
    pub fn valid_box(&self, i: usize) -> &IndexBox {
        &self.grids[i]
    }

    pub fn fab(&self, i: usize) -> &FArrayBox {
        &self.fabs[i]
    }

    pub fn fab_mut(&mut self, i: usize) -> &mut FArrayBox {
        &mut self.fabs[i]
    }

    pub fn fabs(&self) -> impl Iterator<Item = &FArrayBox> {
        self.fabs.iter()
    }

    pub fn set_val(&mut self, val: Real) {
        self.fabs.iter_mut().for_each(|fab| fab.set_val(val));
    }

    /// Header line, one box per line, then one FAB record per grid
    pub fn write_on<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "MULTIFAB {} {} {}",
            self.grids.len(),
            self.ncomp,
            self.ngrow
        )?;
        for b in self.grids.iter() {
            writeln!(out, "{}", b)?;
        }
        for fab in &self.fabs {
            fab.write_on(out)?;
        }
        Ok(())
    }

    pub fn read_from<R: BufRead>(input: &mut R) -> Result<Self, MeshError> {
        let mut line = String::new();
        input.read_line(&mut line)?;
        let header = line.trim_end().to_string();
        let bad = || MeshError::BadHeader(header.clone());

        let fields: Vec<&str> = header
            .strip_prefix("MULTIFAB ")
            .ok_or_else(bad)?
            .split_whitespace()
            .collect();
        let [nboxes, ncomp, ngrow] = fields.as_slice() else {
            return Err(bad());
        };
        let nboxes: usize = nboxes.parse().map_err(|_| bad())?;
        let ncomp: usize = ncomp.parse().map_err(|_| bad())?;
        let ngrow: i32 = ngrow.parse().map_err(|_| bad())?;

        // nboxes comes from the file; no preallocation
        let mut boxes = Vec::new();
        for i in 0..nboxes {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Err(MeshError::BadHeader(format!(
                    "input ends after {} of {} boxes",
                    i, nboxes
                )));
            }
            boxes.push(line.trim().parse()?);
        }
        let grids = BoxArray::new(boxes);

        let mut fabs = Vec::with_capacity(grids.len());
        for b in grids.iter() {
            let fab = FArrayBox::read_from(input)?;
            if fab.domain() != &b.grow(ngrow) || fab.n_comp() != ncomp {
                return Err(MeshError::BadHeader(format!(
                    "fab {} x {} does not match grid {} grown by {}",
                    fab.domain(),
                    fab.n_comp(),
                    b,
                    ngrow
                )));
            }
            fabs.push(fab);
        }

        log::debug!("Read MultiFab with {} grids, {} components", nboxes, ncomp);
        Ok(Self {
            grids,
            ncomp,
            ngrow,
            fabs,
        })
    }
}

impl fmt::Display for MultiFab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "MultiFab: ncomp = {}, ngrow = {}, grids = {}",
            self.ncomp,
            self.ngrow,
            self.fabs.len()
        )?;
        for (i, fab) in self.fabs.iter().enumerate() {
            writeln!(f, "grid {}: valid = {}", i, self.grids[i])?;
            write!(f, "{}", fab)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::index::IntVect;
    use std::io::Cursor;

    fn two_grids() -> BoxArray {
        BoxArray::new(vec![
            IndexBox::new(IntVect::new(0, 0, 0), IntVect::new(1, 1, 0)),
            IndexBox::new(IntVect::new(2, 0, 0), IntVect::new(3, 1, 0)),
        ])
    }

    #[test]
    fn test_fabs_cover_grown_boxes() {
        let mf = MultiFab::new(two_grids(), 2, 1);
        assert_eq!(mf.len(), 2);
        assert_eq!(mf.fab(0).domain(), &mf.valid_box(0).grow(1));
        assert_eq!(mf.fab(1).n_comp(), 2);
    }

    #[test]
    fn test_box_domain_rejects_overlap() {
        let mut bd = BoxDomain::from_box_array(&two_grids()).unwrap();
        assert_eq!(bd.num_pts(), 8);
        let clash = IndexBox::new(IntVect::new(1, 1, 0), IntVect::new(2, 2, 0));
        assert!(matches!(bd.add(clash), Err(MeshError::Overlap(_))));
        assert_eq!(bd.len(), 2);
    }

    #[test]
    fn test_box_array_display() {
        let text = two_grids().to_string();
        assert!(text.starts_with("(BoxArray maxbox(2)\n"));
        assert!(text.contains("((2,0,0) (3,1,0) (0,0,0))"));
        assert!(text.ends_with(")"));
    }

    #[test]
    fn test_dump_reads_back() {
        let mut mf = MultiFab::new(two_grids(), 1, 1);
        mf.set_val(1.5);
        mf.fab_mut(1)[(IntVect::new(3, 1, 0), 0)] = -2.0;

        let mut buf = Vec::new();
        mf.write_on(&mut buf).unwrap();
        let back = MultiFab::read_from(&mut Cursor::new(buf)).unwrap();
        assert_eq!(back, mf);
    }

    #[test]
    fn test_read_rejects_bad_header() {
        let err = MultiFab::read_from(&mut Cursor::new(b"MULTIFAB 1 x 0\n".to_vec())).unwrap_err();
        assert!(matches!(err, MeshError::BadHeader(_)));
    }

    #[test]
    fn test_read_huge_box_count_fails_cleanly() {
        let text = b"MULTIFAB 18446744073709551615 1 0\n".to_vec();
        let err = MultiFab::read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(err, MeshError::BadHeader(_)));

        let text = b"MULTIFAB 3 1 0\n((0,0,0) (1,1,0) (0,0,0))\n".to_vec();
        let err = MultiFab::read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(err, MeshError::BadHeader(_)));
    }
}
