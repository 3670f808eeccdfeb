//! Quad-tree coordinate types and validation errors.

use std::fmt;

use thiserror::Error;

/// Maximum quad-tree level representable by the Morton codec.
///
/// Levels use one base-4 digit each plus a leading marker digit, so a
/// `u64` Morton value holds at most 31 levels.
pub const MAX_LEVEL: u8 = 31;

/// A node in a quad-tree spatial index, addressed by row, column and level.
///
/// Invariants: `level <= MAX_LEVEL`, `row < 2^level`, `column < 2^level`.
/// Construct through [`QuadKey::new`] to have the invariants checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuadKey {
    pub row: u32,
    pub column: u32,
    pub level: u8,
}

/// Errors for quad keys that violate the row/column/level invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuadKeyError {
    /// Level exceeds the maximum the codec can represent.
    #[error("Invalid quad key: level {0} exceeds maximum {MAX_LEVEL}")]
    InvalidLevel(u8),

    /// Row does not fit within the tile grid at this level.
    #[error("Invalid quad key: row {row} out of range for level {level}")]
    InvalidRow { row: u32, level: u8 },

    /// Column does not fit within the tile grid at this level.
    #[error("Invalid quad key: column {column} out of range for level {level}")]
    InvalidColumn { column: u32, level: u8 },
}

/// Errors for malformed Morton code strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MortonCodeError {
    /// The code is not a decimal number that fits in the codec's value range.
    #[error("Invalid Morton code: {0:?} is not a decimal number")]
    NotNumeric(String),

    /// The numeric value has no consistent leading marker digit, so the
    /// level cannot be recovered.
    #[error("Invalid Morton code: {0} has no valid level marker")]
    InvalidMarker(u64),
}

impl QuadKey {
    /// Creates a validated quad key.
    pub fn new(row: u32, column: u32, level: u8) -> Result<Self, QuadKeyError> {
        let key = QuadKey { row, column, level };
        key.validate()?;
        Ok(key)
    }

    /// The root of the quad tree (level 0).
    pub fn root() -> Self {
        QuadKey {
            row: 0,
            column: 0,
            level: 0,
        }
    }

    /// Checks the row/column/level invariants.
    pub fn validate(&self) -> Result<(), QuadKeyError> {
        if self.level > MAX_LEVEL {
            return Err(QuadKeyError::InvalidLevel(self.level));
        }
        let side = 1u64 << self.level;
        if u64::from(self.row) >= side {
            return Err(QuadKeyError::InvalidRow {
                row: self.row,
                level: self.level,
            });
        }
        if u64::from(self.column) >= side {
            return Err(QuadKeyError::InvalidColumn {
                column: self.column,
                level: self.level,
            });
        }
        Ok(())
    }
}

impl fmt::Display for QuadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.row, self.column, self.level)
    }
}

/// Linear string encoding of a [`QuadKey`], produced by
/// [`morton_code_from_quad_key`](crate::quadkey::morton_code_from_quad_key).
///
/// The string form is the decimal rendering of the marker-prefixed
/// interleaved value, e.g. `"70"` for `(row 1, column 2, level 3)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MortonCode(pub(crate) String);

impl MortonCode {
    /// The decimal string form of the code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MortonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<MortonCode> for String {
    fn from(code: MortonCode) -> Self {
        code.0
    }
}
