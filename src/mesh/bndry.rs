//! Boundary registers: one FabSet per face orientation.

use std::ops::Index;

use super::fab::FArrayBox;
use super::index::Orientation;
use super::multifab::{BoxArray, MultiFab};

/// Ordered collection of arrays
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FabSet {
    fabs: Vec<FArrayBox>,
}

impl FabSet {
    pub fn new(fabs: Vec<FArrayBox>) -> Self {
        Self { fabs }
    }

    pub fn len(&self) -> usize {
        self.fabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fabs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FArrayBox> {
        self.fabs.iter()
    }
}

impl Index<usize> for FabSet {
    type Output = FArrayBox;

    fn index(&self, i: usize) -> &FArrayBox {
        &self.fabs[i]
    }
}

/// Face data around a set of grids.
///
/// For every orientation the register holds one array per grid covering
/// the one-cell layer just outside that face.
#[derive(Debug, Clone, PartialEq)]
pub struct BndryRegister {
    grids: BoxArray,
    faces: Vec<FabSet>,
}

impl BndryRegister {
    /// Zero-filled register around `grids`
    pub fn new(grids: &BoxArray, ncomp: usize) -> Self {
        let faces = Orientation::all()
            .map(|face| {
                FabSet::new(
                    grids
                        .iter()
                        .map(|b| FArrayBox::new(b.adj_cell(face, 1), ncomp))
                        .collect(),
                )
            })
            .collect();
        Self {
            grids: grids.clone(),
            faces,
        }
    }

    /// Register filled from whatever cells `mf` holds outside each face
    pub fn from_multifab(mf: &MultiFab) -> Self {
        let mut br = Self::new(mf.box_array(), mf.n_comp());
        for set in br.faces.iter_mut() {
            for (i, dst) in set.fabs.iter_mut().enumerate() {
                // Ghost cells of the owning grid first, then neighbours' valid cells
                dst.copy_from(mf.fab(i));
                for (j, src) in mf.fabs().enumerate() {
                    let valid = mf.valid_box(j);
                    if j != i && valid.intersects(dst.domain()) {
                        dst.copy_from_region(src, valid);
                    }
                }
            }
        }
        br
    }

    pub fn box_array(&self) -> &BoxArray {
        &self.grids
    }
}

impl Index<Orientation> for BndryRegister {
    type Output = FabSet;

    fn index(&self, face: Orientation) -> &FabSet {
        &self.faces[face.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::index::{IndexBox, IntVect, Side};

    #[test]
    fn test_faces_sit_outside_grid() {
        let grids = BoxArray::new(vec![IndexBox::new(
            IntVect::new(0, 0, 0),
            IntVect::new(3, 3, 3),
        )]);
        let br = BndryRegister::new(&grids, 1);
        for face in Orientation::all() {
            let fs = &br[face];
            assert_eq!(fs.len(), 1);
            assert!(!fs[0].domain().intersects(&grids[0]));
            assert_eq!(fs[0].domain().num_pts(), 16);
        }
    }

    #[test]
    fn test_from_multifab_copies_ghosts() {
        let grids = BoxArray::new(vec![IndexBox::new(
            IntVect::new(0, 0, 0),
            IntVect::new(1, 1, 1),
        )]);
        let mut mf = MultiFab::new(grids, 1, 1);
        mf.set_val(4.0);
        let br = BndryRegister::from_multifab(&mf);
        let low_x = &br[Orientation::new(0, Side::Low)][0];
        assert_eq!(low_x[(IntVect::new(-1, 0, 0), 0)], 4.0);
    }

    #[test]
    fn test_neighbour_ghosts_do_not_leak() {
        let grids = BoxArray::new(vec![
            IndexBox::new(IntVect::new(0, 0, 0), IntVect::new(1, 1, 1)),
            IndexBox::new(IntVect::new(2, 0, 0), IntVect::new(3, 1, 1)),
        ]);
        let mut mf = MultiFab::new(grids, 1, 1);
        for (i, val) in [1.0, 2.0].into_iter().enumerate() {
            mf.fab_mut(i).set_val(val);
        }
        let br = BndryRegister::from_multifab(&mf);

        // Grid 1's ghost layer covers (1,-1,0) but only grid 0's data belongs there
        let low_y = &br[Orientation::new(1, Side::Low)][0];
        assert_eq!(low_y[(IntVect::new(1, -1, 0), 0)], 1.0);

        // Neighbour's valid cells win over the owning grid's ghosts
        let high_x = &br[Orientation::new(0, Side::High)][0];
        assert_eq!(high_x[(IntVect::new(2, 0, 0), 0)], 2.0);
        assert_eq!(high_x[(IntVect::new(2, 1, 1), 0)], 2.0);
    }
}
