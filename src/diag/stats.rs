//! Per-grid min/max statistics.

use std::io::{self, Write};

use super::scan::{fp_extreme_with, Extreme};
use crate::config::ScanFormat;
use crate::mesh::{FArrayBox, IndexBox, MultiFab};

fn components(ncomp: usize, comp: Option<usize>) -> Vec<usize> {
    match comp {
        Some(k) => vec![k],
        None => (0..ncomp).collect(),
    }
}

fn min_max(fab: &FArrayBox, region: &IndexBox, comp: usize, fmt: &ScanFormat) -> (String, String) {
    (
        fp_extreme_with(fab, region, comp, Extreme::Min, fmt),
        fp_extreme_with(fab, region, comp, Extreme::Max, fmt),
    )
}

/// Min/max of every grid, over its valid box and over its whole storage box.
///
/// `comp = None` reports every component.
pub fn write_multifab_stats<W: Write>(
    out: &mut W,
    mf: &MultiFab,
    comp: Option<usize>,
    fmt: &ScanFormat,
) -> io::Result<()> {
    writeln!(out, "MultiFab stats:")?;
    for k in components(mf.n_comp(), comp) {
        write!(out, "  comp: {}", k)?;
        if mf.is_empty() {
            writeln!(out)?;
        }
        for i in 0..mf.len() {
            let fab = mf.fab(i);
            let (vmin, vmax) = min_max(fab, mf.valid_box(i), k, fmt);
            let (tmin, tmax) = min_max(fab, fab.domain(), k, fmt);
            writeln!(
                out,
                " grid {}:  valid:: {}, {}, total::{}, {}",
                i, vmin, vmax, tmin, tmax
            )?;
        }
    }
    Ok(())
}

/// Min/max of every component (or just `comp`) over the whole array
pub fn write_fab_stats<W: Write>(
    out: &mut W,
    fab: &FArrayBox,
    comp: Option<usize>,
    fmt: &ScanFormat,
) -> io::Result<()> {
    writeln!(out, "FArrayBox stats: box = {}", fab.domain())?;
    for k in components(fab.n_comp(), comp) {
        let (min, max) = min_max(fab, fab.domain(), k, fmt);
        writeln!(out, "  comp: {} {}, {}", k, min, max)?;
    }
    Ok(())
}

/// Print `write_multifab_stats` to stdout with the default format
pub fn multifab_stats(mf: &MultiFab, comp: Option<usize>) -> bool {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match write_multifab_stats(&mut out, mf, comp, &ScanFormat::default()) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("MultiFab stats: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::scan::BAD_VALUE_MARKER;
    use crate::mesh::{BoxArray, IntVect, Real};

    fn grids() -> BoxArray {
        BoxArray::new(vec![
            IndexBox::new(IntVect::new(0, 0, 0), IntVect::new(1, 1, 0)),
            IndexBox::new(IntVect::new(2, 0, 0), IntVect::new(3, 1, 0)),
        ])
    }

    fn stats_text(mf: &MultiFab, comp: Option<usize>) -> String {
        let mut buf = Vec::new();
        write_multifab_stats(&mut buf, mf, comp, &ScanFormat::default()).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_valid_and_total_differ_in_ghosts() {
        let mut mf = MultiFab::new(grids(), 1, 1);
        mf.set_val(1.0);
        // Ghost cell of grid 0
        mf.fab_mut(0)[(IntVect::new(-1, 0, 0), 0)] = 50.0;

        let text = stats_text(&mf, Some(0));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "MultiFab stats:");
        assert_eq!(
            lines[1],
            "  comp: 0 grid 0:  valid:: Min: 1.0000e+00, Max: 1.0000e+00, total::Min: 1.0000e+00, Max: 5.0000e+01"
        );
        assert_eq!(
            lines[2],
            " grid 1:  valid:: Min: 1.0000e+00, Max: 1.0000e+00, total::Min: 1.0000e+00, Max: 1.0000e+00"
        );
    }

    #[test]
    fn test_all_components() {
        let mut mf = MultiFab::new(grids(), 3, 0);
        mf.fab_mut(1)[(IntVect::new(3, 1, 0), 2)] = Real::NAN;
        let text = stats_text(&mf, None);
        assert_eq!(text.matches("  comp: ").count(), 3);
        assert_eq!(text.matches(" grid ").count(), 6);
        assert_eq!(text.matches(BAD_VALUE_MARKER).count(), 4);
    }

    #[test]
    fn test_empty_multifab() {
        let mf = MultiFab::new(BoxArray::default(), 2, 0);
        assert_eq!(stats_text(&mf, None), "MultiFab stats:\n  comp: 0\n  comp: 1\n");
    }

    #[test]
    fn test_fab_stats() {
        let mut fab = FArrayBox::new(grids()[0], 1);
        fab[(IntVect::new(1, 1, 0), 0)] = -3.0;
        let mut buf = Vec::new();
        write_fab_stats(&mut buf, &fab, None, &ScanFormat::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("  comp: 0 Min: -3.0000e+00, Max: 0.0000e+00\n"));
    }
}
