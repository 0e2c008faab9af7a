//! Scan formatting settings
//!
//! Min/max values are printed like C's `%<min_width>.<precision>e` into a
//! NUL-terminated buffer of `buffer_width` bytes.

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("precision {precision} needs a buffer of at least {needed} bytes, got {buffer_width}")]
    BufferTooSmall {
        precision: usize,
        buffer_width: usize,
        needed: usize,
    },
}

/// Fixed-width exponential number format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanFormat {
    /// Digits after the decimal point
    pub precision: usize,
    /// Field width; shorter numbers are right-aligned
    pub min_width: usize,
    /// Buffer size including the terminating NUL
    pub buffer_width: usize,
}

impl Default for ScanFormat {
    fn default() -> Self {
        Self {
            precision: 4,
            min_width: 8,
            buffer_width: 14,
        }
    }
}

impl ScanFormat {
    /// Default layout with another precision, buffer grown to fit it
    pub fn with_precision(precision: usize) -> Self {
        let base = Self::default();
        let needed = Self::widest(precision, base.min_width) + 1;
        Self {
            precision,
            buffer_width: base.buffer_width.max(needed),
            ..base
        }
    }

    /// Longest text any finite value can produce: sign, digit, point,
    /// fraction, and a three-digit signed exponent
    fn widest(precision: usize, min_width: usize) -> usize {
        let point = if precision > 0 { 1 } else { 0 };
        (1 + 1 + point + precision + 5).max(min_width)
    }

    /// Check that every finite value fits the buffer
    pub fn validate(&self) -> Result<(), ConfigError> {
        let needed = Self::widest(self.precision, self.min_width) + 1;
        if needed > self.buffer_width {
            return Err(ConfigError::BufferTooSmall {
                precision: self.precision,
                buffer_width: self.buffer_width,
                needed,
            });
        }
        Ok(())
    }
}
