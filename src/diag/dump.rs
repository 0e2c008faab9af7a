//! Binary dumps of arrays to files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::mesh::{FArrayBox, MultiFab};

fn dump_to<F>(path: &Path, who: &str, write_on: F) -> bool
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            println!("{}: Cannot write to output file!", who);
            log::error!("{}: open {} failed: {}", who, path.display(), e);
            return false;
        }
    };

    let mut out = BufWriter::new(file);
    if let Err(e) = write_on(&mut out).and_then(|_| out.flush()) {
        log::error!("{}: writing {} failed: {}", who, path.display(), e);
        return false;
    }

    log::info!("{}: wrote {}", who, path.display());
    true
}

/// Dump `fab` to `path`; false if the file could not be opened or written
pub fn write_fab<P: AsRef<Path>>(fab: &FArrayBox, path: P) -> bool {
    dump_to(path.as_ref(), "writeFab", |out| fab.write_on(out))
}

/// Dump `mf` to `path`; false if the file could not be opened or written
pub fn write_multifab<P: AsRef<Path>>(mf: &MultiFab, path: P) -> bool {
    dump_to(path.as_ref(), "writeMultiFab", |out| mf.write_on(out))
}
