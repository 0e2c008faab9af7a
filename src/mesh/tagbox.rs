//! Refinement tags.

use std::ops::Index;

use super::error::MeshError;
use super::fab::Real;
use super::index::{IndexBox, IntVect};
use super::multifab::{BoxArray, MultiFab};

/// Per-cell refinement marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Tag {
    /// Not tagged
    #[default]
    Clear = 0,
    /// Tagged as a buffer cell around a tagged region
    Buf = 1,
    /// Tagged for refinement
    Set = 2,
}

/// One tag per cell of a box
#[derive(Debug, Clone, PartialEq)]
pub struct TagBox {
    domain: IndexBox,
    tags: Vec<Tag>,
}

impl TagBox {
    /// All cells clear
    pub fn new(domain: IndexBox) -> Self {
        Self {
            domain,
            tags: vec![Tag::Clear; domain.num_pts()],
        }
    }

    pub fn domain(&self) -> &IndexBox {
        &self.domain
    }

    pub fn get(&self, iv: &IntVect) -> Option<Tag> {
        self.domain
            .contains(iv)
            .then(|| self.tags[self.domain.offset(iv)])
    }

    pub fn set(&mut self, iv: &IntVect, tag: Tag) -> Result<(), MeshError> {
        if !self.domain.contains(iv) {
            return Err(MeshError::CellOutOfBox {
                cell: *iv,
                domain: self.domain,
            });
        }
        let off = self.domain.offset(iv);
        self.tags[off] = tag;
        Ok(())
    }

    /// Cells whose tag is not `Tag::Clear`, in box iteration order
    pub fn tagged_cells(&self) -> impl Iterator<Item = IntVect> + '_ {
        self.domain
            .cells()
            .filter(move |iv| self.tags[self.domain.offset(iv)] != Tag::Clear)
    }
}

/// One `TagBox` per grid
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagBoxArray {
    boxes: Vec<TagBox>,
}

impl TagBoxArray {
    pub fn new(grids: &BoxArray) -> Self {
        Self {
            boxes: grids.iter().map(|b| TagBox::new(*b)).collect(),
        }
    }

    /// Tag valid cells where component `comp` exceeds `threshold`
    pub fn from_threshold(mf: &MultiFab, comp: usize, threshold: Real) -> Result<Self, MeshError> {
        if comp >= mf.n_comp() {
            return Err(MeshError::ComponentOutOfRange {
                comp,
                ncomp: mf.n_comp(),
            });
        }

        let mut tba = Self::new(mf.box_array());
        for (i, tb) in tba.boxes.iter_mut().enumerate() {
            let fab = mf.fab(i);
            for iv in mf.valid_box(i).cells() {
                if fab[(iv, comp)] > threshold {
                    tb.set(&iv, Tag::Set)?;
                }
            }
        }
        Ok(tba)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TagBox> {
        self.boxes.iter()
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut TagBox> {
        self.boxes.get_mut(i)
    }
}

impl Index<usize> for TagBoxArray {
    type Output = TagBox;

    fn index(&self, i: usize) -> &TagBox {
        &self.boxes[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx() -> IndexBox {
        IndexBox::new(IntVect::new(0, 0, 0), IntVect::new(2, 2, 0))
    }

    #[test]
    fn test_new_tagbox_is_clear() {
        let tb = TagBox::new(bx());
        assert_eq!(tb.tagged_cells().count(), 0);
        assert_eq!(tb.get(&IntVect::new(1, 1, 0)), Some(Tag::Clear));
        assert_eq!(tb.get(&IntVect::new(3, 1, 0)), None);
    }

    #[test]
    fn test_buf_and_set_both_count() {
        let mut tb = TagBox::new(bx());
        tb.set(&IntVect::new(2, 0, 0), Tag::Set).unwrap();
        tb.set(&IntVect::new(0, 1, 0), Tag::Buf).unwrap();
        let tagged: Vec<IntVect> = tb.tagged_cells().collect();
        assert_eq!(tagged, vec![IntVect::new(2, 0, 0), IntVect::new(0, 1, 0)]);
        assert!(tb.set(&IntVect::new(0, 0, 1), Tag::Set).is_err());
    }

    #[test]
    fn test_from_threshold() {
        let mut mf = MultiFab::new(BoxArray::new(vec![bx()]), 2, 1);
        mf.fab_mut(0)[(IntVect::new(1, 1, 0), 1)] = 5.0;
        // Ghost cells are never tagged
        mf.fab_mut(0)[(IntVect::new(-1, 0, 0), 1)] = 9.0;

        let tba = TagBoxArray::from_threshold(&mf, 1, 1.0).unwrap();
        let tagged: Vec<IntVect> = tba[0].tagged_cells().collect();
        assert_eq!(tagged, vec![IntVect::new(1, 1, 0)]);
        assert!(TagBoxArray::from_threshold(&mf, 2, 1.0).is_err());
    }
}
