//! Console printers for containers and tags.
//!
//! Every printer has a `*_to` form writing to any `io::Write` and a plain
//! form writing to stdout.

use std::io::{self, Write};

use crate::mesh::{BndryRegister, BoxArray, BoxDomain, FArrayBox, MultiFab, Orientation, TagBox, TagBoxArray};

fn with_stdout<T>(what: &str, f: impl FnOnce(&mut io::StdoutLock<'_>) -> io::Result<T>) -> Option<T> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match f(&mut out).and_then(|v| out.flush().map(|_| v)) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("{}: stdout write failed: {}", what, e);
            None
        }
    }
}

pub fn print_box_array_to<W: Write>(out: &mut W, ba: &BoxArray) -> io::Result<()> {
    writeln!(out, "{}", ba)
}

pub fn print_box_array(ba: &BoxArray) {
    with_stdout("PrintBoxArray", |out| print_box_array_to(out, ba));
}

pub fn print_box_domain_to<W: Write>(out: &mut W, bd: &BoxDomain) -> io::Result<()> {
    writeln!(out, "{}", bd)
}

pub fn print_box_domain(bd: &BoxDomain) {
    with_stdout("PrintBoxDomain", |out| print_box_domain_to(out, bd));
}

pub fn print_fab_to<W: Write>(out: &mut W, fab: &FArrayBox) -> io::Result<()> {
    writeln!(out, "{}", fab)
}

pub fn print_fab(fab: &FArrayBox) {
    with_stdout("PrintFab", |out| print_fab_to(out, fab));
}

pub fn print_multifab_to<W: Write>(out: &mut W, mf: &MultiFab) -> io::Result<()> {
    writeln!(out, "{}", mf)
}

pub fn print_multifab(mf: &MultiFab) {
    with_stdout("PrintMultiFab", |out| print_multifab_to(out, mf));
}

/// Every face array, face by face
pub fn print_bndry_register_to<W: Write>(out: &mut W, br: &BndryRegister) -> io::Result<()> {
    writeln!(out, "printing br")?;
    for face in Orientation::all() {
        let fs = &br[face];
        for (i, fab) in fs.iter().enumerate() {
            writeln!(out, "(face, number) = ( {}, {})", face, i)?;
            writeln!(out, "{}", fab)?;
        }
    }
    Ok(())
}

pub fn print_bndry_register(br: &BndryRegister) {
    with_stdout("PrintBndryRegister", |out| print_bndry_register_to(out, br));
}

fn write_tagged_cells<W: Write>(out: &mut W, tb: &TagBox) -> io::Result<u64> {
    let mut count = 0;
    for iv in tb.tagged_cells() {
        count += 1;
        write!(out, "{} ", iv)?;
    }
    Ok(count)
}

fn write_total<W: Write>(out: &mut W, count: u64) -> io::Result<()> {
    writeln!(out, "Total tagged cells = {}", count)
}

fn count_tags(tb: &TagBox) -> u64 {
    tb.tagged_cells().count() as u64
}

/// List the tagged cells of `tb`; returns how many there are
pub fn print_tag_box_to<W: Write>(out: &mut W, tb: &TagBox) -> io::Result<u64> {
    writeln!(out, "TagBox: box = {}:", tb.domain())?;
    let count = write_tagged_cells(out, tb)?;
    write_total(out, count)?;
    Ok(count)
}

pub fn print_tag_box(tb: &TagBox) -> u64 {
    with_stdout("PrintTagBox", |out| print_tag_box_to(out, tb)).unwrap_or_else(|| count_tags(tb))
}

pub fn tag_box_count_to<W: Write>(out: &mut W, tb: &TagBox) -> io::Result<u64> {
    let count = count_tags(tb);
    write_total(out, count)?;
    Ok(count)
}

/// Number of cells whose tag is not `Tag::Clear`
pub fn tag_box_count(tb: &TagBox) -> u64 {
    with_stdout("TagBoxCount", |out| tag_box_count_to(out, tb)).unwrap_or_else(|| count_tags(tb))
}

pub fn print_tag_box_array_to<W: Write>(out: &mut W, tba: &TagBoxArray) -> io::Result<u64> {
    writeln!(out, "TagBoxArray:")?;
    let mut count = 0;
    for (i, tb) in tba.iter().enumerate() {
        writeln!(out, "\ti = {}, box = {}:", i, tb.domain())?;
        count += write_tagged_cells(out, tb)?;
        writeln!(out)?;
    }
    write_total(out, count)?;
    Ok(count)
}

fn count_array_tags(tba: &TagBoxArray) -> u64 {
    tba.iter().map(count_tags).sum()
}

pub fn print_tag_box_array(tba: &TagBoxArray) -> u64 {
    with_stdout("PrintTagBoxArray", |out| print_tag_box_array_to(out, tba))
        .unwrap_or_else(|| count_array_tags(tba))
}

pub fn tag_box_array_count_to<W: Write>(out: &mut W, tba: &TagBoxArray) -> io::Result<u64> {
    let count = count_array_tags(tba);
    write_total(out, count)?;
    Ok(count)
}

pub fn tag_box_array_count(tba: &TagBoxArray) -> u64 {
    with_stdout("TagBoxArrayCount", |out| tag_box_array_count_to(out, tba))
        .unwrap_or_else(|| count_array_tags(tba))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{IndexBox, IntVect, Tag};

    fn bx(x0: i32, x1: i32) -> IndexBox {
        IndexBox::new(IntVect::new(x0, 0, 0), IntVect::new(x1, 1, 0))
    }

    fn text<F: FnOnce(&mut Vec<u8>) -> io::Result<u64>>(f: F) -> (String, u64) {
        let mut buf = Vec::new();
        let count = f(&mut buf).unwrap();
        (String::from_utf8(buf).unwrap(), count)
    }

    #[test]
    fn test_clear_tagbox_counts_zero() {
        let tb = TagBox::new(bx(0, 3));
        let (out, count) = text(|o| print_tag_box_to(o, &tb));
        assert_eq!(count, 0);
        assert_eq!(out, "TagBox: box = ((0,0,0) (3,1,0) (0,0,0)):\nTotal tagged cells = 0\n");
        assert_eq!(tag_box_count(&tb), 0);
    }

    #[test]
    fn test_tagbox_lists_tagged_cells() {
        let mut tb = TagBox::new(bx(0, 3));
        tb.set(&IntVect::new(3, 0, 0), Tag::Set).unwrap();
        tb.set(&IntVect::new(1, 1, 0), Tag::Buf).unwrap();
        let (out, count) = text(|o| print_tag_box_to(o, &tb));
        assert_eq!(count, 2);
        assert!(out.contains("(3,0,0) (1,1,0) Total tagged cells = 2\n"));

        let (out, count) = text(|o| tag_box_count_to(o, &tb));
        assert_eq!((out.as_str(), count), ("Total tagged cells = 2\n", 2));
    }

    #[test]
    fn test_tagbox_array_totals() {
        let grids = BoxArray::new(vec![bx(0, 1), bx(2, 3)]);
        let mut tba = TagBoxArray::new(&grids);
        tba.get_mut(0).unwrap().set(&IntVect::new(0, 0, 0), Tag::Set).unwrap();
        tba.get_mut(1).unwrap().set(&IntVect::new(2, 1, 0), Tag::Set).unwrap();
        tba.get_mut(1).unwrap().set(&IntVect::new(3, 1, 0), Tag::Set).unwrap();

        let (out, count) = text(|o| print_tag_box_array_to(o, &tba));
        assert_eq!(count, 3);
        assert!(out.starts_with("TagBoxArray:\n\ti = 0, box = ((0,0,0) (1,1,0) (0,0,0)):\n(0,0,0) \n"));
        assert!(out.ends_with("Total tagged cells = 3\n"));
        assert_eq!(tag_box_array_count(&tba), 3);
    }

    #[test]
    fn test_bndry_register_prints_every_face() {
        let grids = BoxArray::new(vec![bx(0, 0)]);
        let br = BndryRegister::new(&grids, 1);
        let mut buf = Vec::new();
        print_bndry_register_to(&mut buf, &br).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.starts_with("printing br\n"));
        assert_eq!(out.matches("(face, number) = ").count(), Orientation::COUNT);
        assert!(out.contains("(face, number) = ( (0,low), 0)"));
        assert!(out.contains("(face, number) = ( (2,high), 0)"));
    }

    #[test]
    fn test_box_printers() {
        let grids = BoxArray::new(vec![bx(0, 1), bx(2, 3)]);
        let mut buf = Vec::new();
        print_box_array_to(&mut buf, &grids).unwrap();
        print_box_domain_to(&mut buf, &BoxDomain::from_box_array(&grids).unwrap()).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("(BoxArray maxbox(2)"));
        assert!(out.contains("(BoxDomain ((0,0,0) (1,1,0) (0,0,0)) ((2,0,0) (3,1,0) (0,0,0)) )\n"));
    }
}
