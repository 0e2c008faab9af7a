//! Floating-point classification
//!
//! Values are classified from their IEEE-754 bit pattern. NaNs, infinities
//! and denormals are "bad"; normals and signed zeros are "good".

/// IEEE-754 value classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FpClass {
    SignalingNan,
    QuietNan,
    PosInf,
    NegInf,
    PosDenorm,
    NegDenorm,
    PosNorm,
    NegNorm,
    PosZero,
    NegZero,
}

/// Bit-level access to a binary floating-point type
pub trait FloatBits: Copy {
    fn fp_class(self) -> FpClass;

    /// Big-endian raw bytes, for hex dumps
    fn raw_bytes(self) -> Vec<u8>;
}

fn classify(negative: bool, exp_all_ones: bool, exp_zero: bool, mantissa: u64, quiet_bit: u64) -> FpClass {
    match (exp_all_ones, exp_zero, mantissa == 0, negative) {
        (true, _, true, false) => FpClass::PosInf,
        (true, _, true, true) => FpClass::NegInf,
        (true, _, false, _) if mantissa & quiet_bit != 0 => FpClass::QuietNan,
        (true, _, false, _) => FpClass::SignalingNan,
        (_, true, true, false) => FpClass::PosZero,
        (_, true, true, true) => FpClass::NegZero,
        (_, true, false, false) => FpClass::PosDenorm,
        (_, true, false, true) => FpClass::NegDenorm,
        (_, _, _, false) => FpClass::PosNorm,
        (_, _, _, true) => FpClass::NegNorm,
    }
}

impl FloatBits for f64 {
    fn fp_class(self) -> FpClass {
        let bits = self.to_bits();
        let exp = (bits >> 52) & 0x7ff;
        classify(
            bits >> 63 != 0,
            exp == 0x7ff,
            exp == 0,
            bits & ((1u64 << 52) - 1),
            1u64 << 51,
        )
    }

    fn raw_bytes(self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

impl FloatBits for f32 {
    fn fp_class(self) -> FpClass {
        let bits = self.to_bits();
        let exp = (bits >> 23) & 0xff;
        classify(
            bits >> 31 != 0,
            exp == 0xff,
            exp == 0,
            u64::from(bits & ((1u32 << 23) - 1)),
            1u64 << 22,
        )
    }

    fn raw_bytes(self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

/// Class of `x`, read from its bit pattern
pub fn fp_class<T: FloatBits>(x: T) -> FpClass {
    x.fp_class()
}

/// Only normals and signed zeros are good; anything else counts as bad
#[allow(unreachable_patterns)]
pub fn is_bad_class(class: FpClass) -> bool {
    match class {
        FpClass::PosNorm | FpClass::NegNorm | FpClass::PosZero | FpClass::NegZero => false,
        FpClass::SignalingNan
        | FpClass::QuietNan
        | FpClass::PosInf
        | FpClass::NegInf
        | FpClass::PosDenorm
        | FpClass::NegDenorm => true,
        _ => true,
    }
}

/// True for NaN, infinite and denormal values
pub fn bad_fp_class<T: FloatBits>(x: T) -> bool {
    is_bad_class(x.fp_class())
}
