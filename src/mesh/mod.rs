//! Mesh module - the AMR containers the diagnostics read
//!
//! Index space (`IntVect`, `IndexBox`, `Orientation`), per-box storage
//! (`FArrayBox`), grid collections (`BoxArray`, `BoxDomain`, `MultiFab`),
//! face registers (`BndryRegister`) and refinement tags (`TagBox`).

pub mod bndry;
pub mod error;
pub mod fab;
pub mod index;
pub mod multifab;
pub mod tagbox;

// Re-export common types
pub use bndry::{BndryRegister, FabSet};
pub use error::MeshError;
pub use fab::{FArrayBox, Real};
pub use index::{IndexBox, IntVect, Orientation, Side, SPACEDIM};
pub use multifab::{BoxArray, BoxDomain, MultiFab};
pub use tagbox::{Tag, TagBox, TagBoxArray};
