//! Diag module - debug printers and dumps
//!
//! Plain free functions taking read-only references. None of them keep
//! state between calls, so each can be invoked directly while inspecting a
//! running simulation.

pub mod dump;
pub mod fpclass;
pub mod print;
pub mod scan;
pub mod stats;

pub use dump::{write_fab, write_multifab};
pub use fpclass::{bad_fp_class, fp_class, is_bad_class, FloatBits, FpClass};
pub use print::{
    print_bndry_register, print_box_array, print_box_domain, print_fab, print_multifab,
    print_tag_box, print_tag_box_array, tag_box_array_count, tag_box_count,
};
pub use scan::{
    fp_max, fp_min, scan_extreme, try_fp_max, try_fp_min, Extreme, ScanError, ScanOutcome,
    BAD_VALUE_MARKER,
};
pub use stats::{multifab_stats, write_fab_stats, write_multifab_stats};
