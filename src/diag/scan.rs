//! Bounded min/max scans
//!
//! A scan walks the overlap of a region with an array's box in cell order
//! and stops at the first bad value.

use thiserror::Error;

use super::fpclass::{bad_fp_class, FloatBits};
use crate::config::ScanFormat;
use crate::mesh::{FArrayBox, IndexBox, IntVect, Real};

/// Printed in place of a number when the region holds a bad value
pub const BAD_VALUE_MARKER: &str = "*** Bad Float Value ***";

/// Scan errors
#[derive(Error, Debug, PartialEq)]
pub enum ScanError {
    #[error("region {region} does not overlap {domain}")]
    EmptyRegion { region: IndexBox, domain: IndexBox },

    #[error("component {comp} out of range (ncomp = {ncomp})")]
    ComponentOutOfRange { comp: usize, ncomp: usize },

    #[error("'{text}' does not fit a {buffer_width}-byte buffer")]
    FormatOverflow { text: String, buffer_width: usize },
}

/// Which extreme a scan tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Min,
    Max,
}

impl Extreme {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Extreme::Min => "Min",
            Extreme::Max => "Max",
        }
    }
}

/// Result of a scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanOutcome {
    Value(Real),
    /// First bad value found at `at`, after visiting `visited` cells
    Bad { at: IntVect, visited: usize },
}

/// Min or max of `comp` over `region & fab.domain()`, in cell order.
///
/// Seeds from the first cell and stops at the first bad value, returning
/// where it was found. An empty overlap or a missing component is an error.
pub fn scan_extreme(
    fab: &FArrayBox,
    region: &IndexBox,
    comp: usize,
    which: Extreme,
) -> Result<ScanOutcome, ScanError> {
    if comp >= fab.n_comp() {
        return Err(ScanError::ComponentOutOfRange {
            comp,
            ncomp: fab.n_comp(),
        });
    }

    let area = region & fab.domain();
    if !area.ok() {
        return Err(ScanError::EmptyRegion {
            region: *region,
            domain: *fab.domain(),
        });
    }

    let mut extreme = fab[(area.small_end(), comp)];
    for (n, iv) in area.cells().enumerate() {
        let val = fab[(iv, comp)];
        if bad_fp_class(val) {
            log::debug!(
                "Bad value at {} comp {}: 0x{}",
                iv,
                comp,
                hex::encode(val.raw_bytes())
            );
            return Ok(ScanOutcome::Bad {
                at: iv,
                visited: n + 1,
            });
        }
        extreme = match which {
            Extreme::Min => extreme.min(val),
            Extreme::Max => extreme.max(val),
        };
    }

    Ok(ScanOutcome::Value(extreme))
}

/// Format like C's `%<min_width>.<precision>e`, e.g. `1.2345e+02`
pub fn format_exponential(val: Real, fmt: &ScanFormat) -> Result<String, ScanError> {
    let rust = format!("{:.*e}", fmt.precision, val);
    let (mantissa, exp) = rust.split_once('e').unwrap_or((rust.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    let text = format!(
        "{:>width$}",
        format!("{}e{}{:02}", mantissa, sign, exp.abs()),
        width = fmt.min_width
    );

    // Room is needed for the terminating NUL
    if text.len() >= fmt.buffer_width {
        return Err(ScanError::FormatOverflow {
            text,
            buffer_width: fmt.buffer_width,
        });
    }
    Ok(text)
}

fn try_fp_extreme(
    fab: &FArrayBox,
    region: &IndexBox,
    comp: usize,
    which: Extreme,
    fmt: &ScanFormat,
) -> Result<String, ScanError> {
    let body = match scan_extreme(fab, region, comp, which)? {
        ScanOutcome::Value(v) => format_exponential(v, fmt)?,
        ScanOutcome::Bad { .. } => BAD_VALUE_MARKER.to_string(),
    };
    Ok(format!("{}: {}", which.label(), body))
}

/// `"Min: <value>"` over `region & fab.domain()`
pub fn try_fp_min(
    fab: &FArrayBox,
    region: &IndexBox,
    comp: usize,
    fmt: &ScanFormat,
) -> Result<String, ScanError> {
    try_fp_extreme(fab, region, comp, Extreme::Min, fmt)
}

/// `"Max: <value>"` over `region & fab.domain()`
pub fn try_fp_max(
    fab: &FArrayBox,
    region: &IndexBox,
    comp: usize,
    fmt: &ScanFormat,
) -> Result<String, ScanError> {
    try_fp_extreme(fab, region, comp, Extreme::Max, fmt)
}

/// Render a scan result for display.
///
/// A number too wide for its buffer is a programming error and aborts the
/// process. Region and component mistakes are shown inline.
pub(crate) fn render_or_abort(which: Extreme, result: Result<String, ScanError>) -> String {
    match result {
        Ok(text) => text,
        Err(e @ ScanError::FormatOverflow { .. }) => {
            let msg = format!("fp_{}: buffer too small: {}", which.label().to_lowercase(), e);
            log::error!("{}", msg);
            eprintln!("{}", msg);
            std::process::abort()
        }
        Err(e) => format!("{}: {}", which.label(), e),
    }
}

pub(crate) fn fp_extreme_with(
    fab: &FArrayBox,
    region: &IndexBox,
    comp: usize,
    which: Extreme,
    fmt: &ScanFormat,
) -> String {
    render_or_abort(which, try_fp_extreme(fab, region, comp, which, fmt))
}

/// `"Min: <value>"` with the default format.
///
/// Region and component mistakes come back as text. Aborts the process if
/// the formatted value does not fit the format's buffer.
pub fn fp_min(fab: &FArrayBox, region: &IndexBox, comp: usize) -> String {
    fp_extreme_with(fab, region, comp, Extreme::Min, &ScanFormat::default())
}

/// `"Max: <value>"`; see [`fp_min`] for errors and the abort
pub fn fp_max(fab: &FArrayBox, region: &IndexBox, comp: usize) -> String {
    fp_extreme_with(fab, region, comp, Extreme::Max, &ScanFormat::default())
}
