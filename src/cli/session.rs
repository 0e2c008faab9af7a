//! Session state - the loaded dump and derived tags.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use super::commands::ParsedCommand;
use crate::config::ScanFormat;
use crate::diag::print::{
    print_bndry_register_to, print_box_array_to, print_box_domain_to, print_fab_to,
    print_multifab_to, print_tag_box_array_to, tag_box_array_count_to,
};
use crate::diag::scan::{fp_extreme_with, Extreme};
use crate::diag::{fp_class, is_bad_class, write_fab, write_fab_stats, write_multifab, write_multifab_stats, FloatBits};
use crate::mesh::{BndryRegister, BoxArray, BoxDomain, FArrayBox, IndexBox, MultiFab, Real, TagBoxArray};

/// A dump read from disk
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Fab(FArrayBox),
    MultiFab(MultiFab),
}

impl Loaded {
    fn kind(&self) -> &'static str {
        match self {
            Loaded::Fab(_) => "fab",
            Loaded::MultiFab(_) => "mf",
        }
    }

    /// View as a MultiFab; a single fab becomes one grid without ghosts
    fn as_multifab(&self) -> Cow<'_, MultiFab> {
        match self {
            Loaded::MultiFab(mf) => Cow::Borrowed(mf),
            Loaded::Fab(fab) => {
                let mut mf = MultiFab::new(BoxArray::new(vec![*fab.domain()]), fab.n_comp(), 0);
                mf.fab_mut(0).copy_from(fab);
                Cow::Owned(mf)
            }
        }
    }
}

/// Read a FAB or MULTIFAB dump, detected from its header
pub fn load_dump<P: AsRef<Path>>(path: P) -> Result<Loaded> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let head = reader.fill_buf()?;
    let loaded = if head.starts_with(b"FAB ") {
        Loaded::Fab(FArrayBox::read_from(&mut reader)?)
    } else if head.starts_with(b"MULTIFAB ") {
        Loaded::MultiFab(MultiFab::read_from(&mut reader)?)
    } else {
        bail!("{} is not a FAB or MULTIFAB dump", path.display());
    };

    log::info!("Loaded {} dump from {}", loaded.kind(), path.display());
    Ok(loaded)
}

/// What the REPL should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// REPL session
pub struct Session {
    format: ScanFormat,
    loaded: Option<Loaded>,
    path: Option<PathBuf>,
    tags: Option<TagBoxArray>,
}

impl Session {
    pub fn new(format: ScanFormat) -> Self {
        Self {
            format,
            loaded: None,
            path: None,
            tags: None,
        }
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let loaded = load_dump(&path)?;
        self.loaded = Some(loaded);
        self.path = Some(path.as_ref().to_path_buf());
        self.tags = None;
        Ok(())
    }

    pub fn loaded(&self) -> Option<&Loaded> {
        self.loaded.as_ref()
    }

    /// Short status for the prompt, e.g. `mf:plot.dump`
    pub fn status(&self) -> String {
        match (&self.loaded, &self.path) {
            (Some(loaded), Some(path)) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("{}:{}", loaded.kind(), name)
            }
            _ => "---".to_string(),
        }
    }

    fn require(&self) -> Result<&Loaded> {
        self.loaded
            .as_ref()
            .ok_or_else(|| anyhow!("Nothing loaded (use 'load <path>')"))
    }

    /// Run one command, writing its output to `out`
    pub fn execute<W: Write>(&mut self, out: &mut W, cmd: ParsedCommand) -> Result<Flow> {
        match cmd {
            ParsedCommand::Load(path) => {
                self.load(&path)?;
                writeln!(out, "[*] Loaded {}", self.status())?;
            }
            ParsedCommand::Info => self.info(out)?,
            ParsedCommand::Stats(comp) => match self.require()? {
                Loaded::Fab(fab) => write_fab_stats(out, fab, comp, &self.format)?,
                Loaded::MultiFab(mf) => write_multifab_stats(out, mf, comp, &self.format)?,
            },
            ParsedCommand::Min { comp, region } => self.extreme(out, comp, region, Extreme::Min)?,
            ParsedCommand::Max { comp, region } => self.extreme(out, comp, region, Extreme::Max)?,
            ParsedCommand::Print(grid) => match (self.require()?, grid) {
                (Loaded::Fab(fab), None) => print_fab_to(out, fab)?,
                (Loaded::MultiFab(mf), None) => print_multifab_to(out, mf)?,
                (Loaded::MultiFab(mf), Some(i)) if i < mf.len() => print_fab_to(out, mf.fab(i))?,
                (_, Some(i)) => bail!("No grid {}", i),
            },
            ParsedCommand::Boxes => {
                let mf = self.require()?.as_multifab();
                print_box_array_to(out, mf.box_array())?;
            }
            ParsedCommand::Domain => {
                let mf = self.require()?.as_multifab();
                let bd = BoxDomain::from_box_array(mf.box_array())?;
                print_box_domain_to(out, &bd)?;
            }
            ParsedCommand::Bndry => {
                let mf = self.require()?.as_multifab();
                print_bndry_register_to(out, &BndryRegister::from_multifab(&mf))?;
            }
            ParsedCommand::Tag { comp, threshold } => {
                let tags = {
                    let mf = self.require()?.as_multifab();
                    TagBoxArray::from_threshold(&mf, comp, threshold)?
                };
                let count = tag_box_array_count_to(out, &tags)?;
                log::debug!("Tagged {} cells with comp {} > {}", count, comp, threshold);
                self.tags = Some(tags);
            }
            ParsedCommand::Tags => {
                print_tag_box_array_to(out, self.require_tags()?)?;
            }
            ParsedCommand::TagCount => {
                tag_box_array_count_to(out, self.require_tags()?)?;
            }
            ParsedCommand::Write(path) => {
                let ok = match self.require()? {
                    Loaded::Fab(fab) => write_fab(fab, &path),
                    Loaded::MultiFab(mf) => write_multifab(mf, &path),
                };
                if !ok {
                    bail!("Failed to write {}", path);
                }
                writeln!(out, "[*] Wrote {}", path)?;
            }
            ParsedCommand::Class(text) => {
                let val = parse_real(&text)?;
                let class = fp_class(val);
                writeln!(
                    out,
                    "{:?} bits 0x{} bad = {}",
                    class,
                    hex::encode(val.raw_bytes()),
                    is_bad_class(class)
                )?;
            }
            ParsedCommand::Help => super::print_help(),
            ParsedCommand::Quit => return Ok(Flow::Quit),
            ParsedCommand::Unknown(input) => bail!("Unknown command: '{}'", input),
        }
        Ok(Flow::Continue)
    }

    fn require_tags(&self) -> Result<&TagBoxArray> {
        self.tags
            .as_ref()
            .ok_or_else(|| anyhow!("No tags (use 'tag <comp> <threshold>')"))
    }

    fn info<W: Write>(&self, out: &mut W) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        match self.require()? {
            Loaded::Fab(fab) => {
                writeln!(out, "FArrayBox from {}", path)?;
                writeln!(out, "  box   = {}", fab.domain())?;
                writeln!(out, "  ncomp = {}", fab.n_comp())?;
                writeln!(out, "  cells = {}", fab.domain().num_pts())?;
            }
            Loaded::MultiFab(mf) => {
                writeln!(out, "MultiFab from {}", path)?;
                writeln!(out, "  grids = {}", mf.len())?;
                writeln!(out, "  ncomp = {}", mf.n_comp())?;
                writeln!(out, "  ngrow = {}", mf.n_grow())?;
                writeln!(out, "  cells = {}", mf.box_array().num_pts())?;
            }
        }
        Ok(())
    }

    fn extreme<W: Write>(
        &self,
        out: &mut W,
        comp: usize,
        region: Option<IndexBox>,
        which: Extreme,
    ) -> Result<()> {
        match self.require()? {
            Loaded::Fab(fab) => {
                let region = region.unwrap_or(*fab.domain());
                writeln!(out, "{}", fp_extreme_with(fab, &region, comp, which, &self.format))?;
            }
            Loaded::MultiFab(mf) => {
                let mut shown = 0;
                for (i, fab) in mf.fabs().enumerate() {
                    let region = region.unwrap_or(*mf.valid_box(i));
                    if !region.intersects(fab.domain()) {
                        continue;
                    }
                    writeln!(
                        out,
                        "grid {}: {}",
                        i,
                        fp_extreme_with(fab, &region, comp, which, &self.format)
                    )?;
                    shown += 1;
                }
                if shown == 0 {
                    if let Some(region) = region {
                        writeln!(out, "{}: region {} overlaps no grid", which.label(), region)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// A decimal number, `nan`/`inf`, or a `0x` raw bit pattern
fn parse_real(text: &str) -> Result<Real> {
    let text = text.trim();
    if let Some(hex_bits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        let bits = u64::from_str_radix(hex_bits, 16)
            .with_context(|| format!("Invalid bit pattern '{}'", text))?;
        #[allow(clippy::useless_conversion)]
        let bits = bits
            .try_into()
            .map_err(|_| anyhow!("Bit pattern '{}' too wide for Real", text))?;
        return Ok(Real::from_bits(bits));
    }
    text.parse()
        .with_context(|| format!("Invalid number '{}'", text))
}
