//! Fabview - debug dump and inspection helpers for AMR mesh data
//!
//! `diag` holds the printers, scans and dumps; `mesh` the containers they
//! read. The most used functions are re-exported here.

pub mod cli;
pub mod config;
pub mod diag;
pub mod mesh;

pub use config::ScanFormat;
pub use diag::*;
