//! Mesh data model errors.

use thiserror::Error;

use super::index::{IndexBox, IntVect};

/// Errors raised while building, indexing or reading mesh containers
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Component {comp} out of range (ncomp = {ncomp})")]
    ComponentOutOfRange { comp: usize, ncomp: usize },

    #[error("Cell {cell} outside box {domain}")]
    CellOutOfBox { cell: IntVect, domain: IndexBox },

    #[error("Box {0} overlaps an existing box in the domain")]
    Overlap(IndexBox),

    #[error("Malformed index text '{0}'")]
    BadIndex(String),

    #[error("Malformed dump header: {0}")]
    BadHeader(String),

    #[error("Dump stores {found} but this build reads {expected}")]
    RealMismatch { found: String, expected: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
