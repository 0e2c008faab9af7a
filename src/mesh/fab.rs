//! FArrayBox - multi-component floating-point storage over a box.

use std::fmt;
use std::io::{self, BufRead, Read, Write};
use std::ops::{Index, IndexMut};

use super::error::MeshError;
use super::index::{IndexBox, IntVect};

/// Floating-point type stored in every array
#[cfg(not(feature = "float"))]
pub type Real = f64;

#[cfg(feature = "float")]
pub type Real = f32;

const REAL_BYTES: usize = std::mem::size_of::<Real>();

// Total bits, exponent bits, mantissa bits, and the exponent bias at the end
#[cfg(not(feature = "float"))]
const REAL_DESCRIPTOR: &str = "64 11 52 0 1 12 0 1023";

#[cfg(feature = "float")]
const REAL_DESCRIPTOR: &str = "32 8 23 0 1 9 0 127";

/// Header fragment describing the on-disk `Real` (little-endian byte order)
pub fn real_header() -> String {
    let order: Vec<String> = (1..=REAL_BYTES).map(|b| b.to_string()).collect();
    format!(
        "(({}, ({})),({}, ({})))",
        REAL_BYTES,
        REAL_DESCRIPTOR,
        REAL_BYTES,
        order.join(" ")
    )
}

/// Dense storage of `ncomp` components for every cell of a box
#[derive(Debug, Clone, PartialEq)]
pub struct FArrayBox {
    domain: IndexBox,
    ncomp: usize,
    /// Component-major; within a component, `domain.offset` order
    data: Vec<Real>,
}

impl FArrayBox {
    /// Zero-filled array
    pub fn new(domain: IndexBox, ncomp: usize) -> Self {
        Self {
            domain,
            ncomp,
            data: vec![0.0; domain.num_pts() * ncomp],
        }
    }

    pub fn domain(&self) -> &IndexBox {
        &self.domain
    }

    pub fn n_comp(&self) -> usize {
        self.ncomp
    }

    fn slot(&self, iv: &IntVect, comp: usize) -> Option<usize> {
        if comp >= self.ncomp || !self.domain.contains(iv) {
            return None;
        }
        Some(comp * self.domain.num_pts() + self.domain.offset(iv))
    }

    pub fn get(&self, iv: &IntVect, comp: usize) -> Option<Real> {
        self.slot(iv, comp).map(|i| self.data[i])
    }

    pub fn set(&mut self, iv: &IntVect, comp: usize, val: Real) -> Result<(), MeshError> {
        if comp >= self.ncomp {
            return Err(MeshError::ComponentOutOfRange {
                comp,
                ncomp: self.ncomp,
            });
        }
        let slot = self.slot(iv, comp).ok_or(MeshError::CellOutOfBox {
            cell: *iv,
            domain: self.domain,
        })?;
        self.data[slot] = val;
        Ok(())
    }

    /// Fill every component of every cell
    pub fn set_val(&mut self, val: Real) {
        self.data.iter_mut().for_each(|v| *v = val);
    }

    /// Copy all components on the overlap of the two boxes
    pub fn copy_from(&mut self, src: &FArrayBox) {
        let overlap = src.domain;
        self.copy_from_region(src, &overlap);
    }

    /// Copy all components on `region`, clipped to both boxes
    pub fn copy_from_region(&mut self, src: &FArrayBox, region: &IndexBox) {
        let overlap = *region & self.domain & src.domain;
        let ncomp = self.ncomp.min(src.ncomp);
        for iv in overlap.cells() {
            for comp in 0..ncomp {
                self[(iv, comp)] = src[(iv, comp)];
            }
        }
    }

    /// Binary dump: one text header line followed by raw little-endian values
    pub fn write_on<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "FAB {}{} {}", real_header(), self.domain, self.ncomp)?;
        let mut bytes = Vec::with_capacity(self.data.len() * REAL_BYTES);
        for v in &self.data {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        out.write_all(&bytes)
    }

    /// Read a dump produced by `write_on`
    pub fn read_from<R: BufRead>(input: &mut R) -> Result<Self, MeshError> {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(MeshError::BadHeader("unexpected end of input".into()));
        }
        let line = line.trim_end();

        let rest = line
            .strip_prefix("FAB ")
            .ok_or_else(|| MeshError::BadHeader(line.to_string()))?;

        let expected = real_header();
        let Some(rest) = rest.strip_prefix(expected.as_str()) else {
            let found = match rest.find(")))") {
                Some(end) => rest[..end + 3].to_string(),
                None => rest.to_string(),
            };
            return Err(MeshError::RealMismatch { found, expected });
        };

        let (box_text, ncomp_text) = rest
            .trim()
            .rsplit_once(' ')
            .ok_or_else(|| MeshError::BadHeader(line.to_string()))?;
        let domain: IndexBox = box_text.parse()?;
        let ncomp: usize = ncomp_text
            .parse()
            .map_err(|_| MeshError::BadHeader(line.to_string()))?;

        let len = domain
            .checked_num_pts()
            .and_then(|n| n.checked_mul(ncomp))
            .and_then(|n| n.checked_mul(REAL_BYTES))
            .ok_or_else(|| MeshError::BadHeader(format!("{} x {} is too large", domain, ncomp)))?;

        // Sized by the bytes present, not by the header
        let mut bytes = Vec::new();
        input.by_ref().take(len as u64).read_to_end(&mut bytes)?;
        if bytes.len() != len {
            return Err(MeshError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected {} bytes of data, found {}", len, bytes.len()),
            )));
        }

        let data = bytes
            .chunks_exact(REAL_BYTES)
            .map(|chunk| {
                let mut raw = [0u8; REAL_BYTES];
                raw.copy_from_slice(chunk);
                Real::from_le_bytes(raw)
            })
            .collect();

        Ok(Self {
            domain,
            ncomp,
            data,
        })
    }
}

impl Index<(IntVect, usize)> for FArrayBox {
    type Output = Real;

    fn index(&self, (iv, comp): (IntVect, usize)) -> &Real {
        match self.slot(&iv, comp) {
            Some(i) => &self.data[i],
            None => panic!("FArrayBox: ({}, {}) outside {} x {}", iv, comp, self.domain, self.ncomp),
        }
    }
}

impl IndexMut<(IntVect, usize)> for FArrayBox {
    fn index_mut(&mut self, (iv, comp): (IntVect, usize)) -> &mut Real {
        match self.slot(&iv, comp) {
            Some(i) => &mut self.data[i],
            None => panic!("FArrayBox: ({}, {}) outside {} x {}", iv, comp, self.domain, self.ncomp),
        }
    }
}

impl fmt::Display for FArrayBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FArrayBox: box = {}, ncomp = {}", self.domain, self.ncomp)?;
        for iv in self.domain.cells() {
            write!(f, "{}", iv)?;
            for comp in 0..self.ncomp {
                write!(f, " {:.6e}", self[(iv, comp)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
