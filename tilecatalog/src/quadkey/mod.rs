//! Quad-tree addressing and the Morton code codec.
//!
//! Spatial partitions are addressed by a [`QuadKey`] (row, column, level).
//! On the wire a quad key travels as a [`MortonCode`]: the decimal rendering
//! of an interleaved base-4 value with a leading marker digit that encodes
//! the depth, so codes of different levels never collide.
//!
//! Encoding interleaves one base-4 digit per level, most significant level
//! first, with `(row_bit << 1) | column_bit` as the digit value:
//!
//! ```
//! use tilecatalog::quadkey::{morton_code_from_quad_key, quad_key_from_morton_code, QuadKey};
//!
//! let key = QuadKey::new(1, 2, 3).unwrap();
//! let code = morton_code_from_quad_key(&key).unwrap();
//! assert_eq!(code.as_str(), "70");
//! assert_eq!(quad_key_from_morton_code(code.as_str()).unwrap(), key);
//! ```

mod types;

pub use types::{MortonCode, MortonCodeError, QuadKey, QuadKeyError, MAX_LEVEL};

/// Encodes a quad key into its Morton code string.
///
/// Fails if the quad key violates its row/column/level invariants.
pub fn morton_code_from_quad_key(key: &QuadKey) -> Result<MortonCode, QuadKeyError> {
    key.validate()?;

    // Start from the marker digit, then append one base-4 digit per level.
    let mut value: u64 = 1;
    for i in (0..key.level).rev() {
        let row_bit = u64::from((key.row >> i) & 1);
        let column_bit = u64::from((key.column >> i) & 1);
        value = (value << 2) | (row_bit << 1) | column_bit;
    }

    Ok(MortonCode(value.to_string()))
}

/// Decodes a Morton code string back into the exact quad key it was
/// produced from.
///
/// Fails on non-numeric input or on a value whose bit length is
/// inconsistent with the leading marker digit.
pub fn quad_key_from_morton_code(code: &str) -> Result<QuadKey, MortonCodeError> {
    let value: u64 = code
        .parse()
        .map_err(|_| MortonCodeError::NotNumeric(code.to_string()))?;
    if value == 0 {
        return Err(MortonCodeError::InvalidMarker(0));
    }

    // The marker occupies the most significant set bit; everything below it
    // must split evenly into two-bit digits.
    let bits = 64 - value.leading_zeros();
    if (bits - 1) % 2 != 0 {
        return Err(MortonCodeError::InvalidMarker(value));
    }
    let level = ((bits - 1) / 2) as u8;

    let mut row = 0u32;
    let mut column = 0u32;
    for i in 0..level {
        let digit = (value >> (2 * i)) & 0b11;
        column |= ((digit & 1) as u32) << i;
        row |= (((digit >> 1) & 1) as u32) << i;
    }

    Ok(QuadKey { row, column, level })
}

/// Returns the four children of a quad key, one level deeper, or `None`
/// when the key is already at [`MAX_LEVEL`].
///
/// Children are ordered row-major: north-west, north-east, south-west,
/// south-east.
pub fn children(key: &QuadKey) -> Option<[QuadKey; 4]> {
    if key.level >= MAX_LEVEL {
        return None;
    }
    let level = key.level + 1;
    let row = key.row * 2;
    let column = key.column * 2;
    Some([
        QuadKey { row, column, level },
        QuadKey {
            row,
            column: column + 1,
            level,
        },
        QuadKey {
            row: row + 1,
            column,
            level,
        },
        QuadKey {
            row: row + 1,
            column: column + 1,
            level,
        },
    ])
}

/// Returns the parent of a quad key, one level shallower, or `None` at
/// the root.
pub fn parent(key: &QuadKey) -> Option<QuadKey> {
    if key.level == 0 {
        return None;
    }
    Some(QuadKey {
        row: key.row / 2,
        column: key.column / 2,
        level: key.level - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_value() {
        // (row 1, column 2, level 3): digits 0, 1, 2 behind the marker,
        // i.e. 0b1_00_01_10 = 70.
        let key = QuadKey::new(1, 2, 3).unwrap();
        let code = morton_code_from_quad_key(&key).unwrap();
        assert_eq!(code.as_str(), "70");
    }

    #[test]
    fn test_encode_root() {
        let code = morton_code_from_quad_key(&QuadKey::root()).unwrap();
        assert_eq!(code.as_str(), "1");
    }

    #[test]
    fn test_decode_known_value() {
        let key = quad_key_from_morton_code("70").unwrap();
        assert_eq!(key, QuadKey::new(1, 2, 3).unwrap());
    }

    #[test]
    fn test_decode_deep_code() {
        // A production-sized code decodes to a level-12 key.
        let key = quad_key_from_morton_code("23618403").unwrap();
        assert_eq!(key.level, 12);

        let code = morton_code_from_quad_key(&key).unwrap();
        assert_eq!(code.as_str(), "23618403");
    }

    #[test]
    fn test_decode_root() {
        let key = quad_key_from_morton_code("1").unwrap();
        assert_eq!(key, QuadKey::root());
    }

    #[test]
    fn test_decode_rejects_non_numeric() {
        let result = quad_key_from_morton_code("12ab");
        assert!(matches!(
            result.unwrap_err(),
            MortonCodeError::NotNumeric(_)
        ));
    }

    #[test]
    fn test_decode_rejects_empty() {
        let result = quad_key_from_morton_code("");
        assert!(matches!(
            result.unwrap_err(),
            MortonCodeError::NotNumeric(_)
        ));
    }

    #[test]
    fn test_decode_rejects_zero() {
        // Zero has no marker digit at all.
        let result = quad_key_from_morton_code("0");
        assert!(matches!(
            result.unwrap_err(),
            MortonCodeError::InvalidMarker(0)
        ));
    }

    #[test]
    fn test_decode_rejects_inconsistent_marker() {
        // 2 = 0b10: the bit below the marker cannot form a full base-4 digit.
        let result = quad_key_from_morton_code("2");
        assert!(matches!(
            result.unwrap_err(),
            MortonCodeError::InvalidMarker(2)
        ));
    }

    #[test]
    fn test_encode_rejects_invalid_key() {
        let key = QuadKey {
            row: 8,
            column: 0,
            level: 3,
        };
        assert!(morton_code_from_quad_key(&key).is_err());
    }

    #[test]
    fn test_children_of_root() {
        let kids = children(&QuadKey::root()).unwrap();
        assert_eq!(kids[0], QuadKey::new(0, 0, 1).unwrap());
        assert_eq!(kids[1], QuadKey::new(0, 1, 1).unwrap());
        assert_eq!(kids[2], QuadKey::new(1, 0, 1).unwrap());
        assert_eq!(kids[3], QuadKey::new(1, 1, 1).unwrap());
    }

    #[test]
    fn test_children_at_max_level() {
        let key = QuadKey::new(0, 0, MAX_LEVEL).unwrap();
        assert!(children(&key).is_none());
    }

    #[test]
    fn test_parent_of_root_is_none() {
        assert!(parent(&QuadKey::root()).is_none());
    }

    #[test]
    fn test_parent_inverts_children() {
        let key = QuadKey::new(5, 9, 6).unwrap();
        for child in children(&key).unwrap() {
            assert_eq!(parent(&child), Some(key));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_roundtrip_property(
                row_raw in 0u32..u32::MAX,
                column_raw in 0u32..u32::MAX,
                level in 0u8..=MAX_LEVEL
            ) {
                // Constrain row/column to the grid at this level.
                let side = 1u64 << level;
                let key = QuadKey {
                    row: (u64::from(row_raw) % side) as u32,
                    column: (u64::from(column_raw) % side) as u32,
                    level,
                };

                let code = morton_code_from_quad_key(&key)?;
                let decoded = quad_key_from_morton_code(code.as_str())?;
                prop_assert_eq!(decoded, key);
            }

            #[test]
            fn test_codes_of_distinct_keys_differ(
                a_raw in 0u32..1024,
                b_raw in 0u32..1024,
                level in 1u8..=10
            ) {
                let side = 1u64 << level;
                let a = QuadKey {
                    row: (u64::from(a_raw) % side) as u32,
                    column: 0,
                    level,
                };
                let b = QuadKey {
                    row: (u64::from(b_raw) % side) as u32,
                    column: 0,
                    level,
                };

                let code_a = morton_code_from_quad_key(&a)?;
                let code_b = morton_code_from_quad_key(&b)?;
                prop_assert_eq!(a == b, code_a == code_b);
            }

            #[test]
            fn test_parent_child_navigation(
                row_raw in 0u32..u32::MAX,
                column_raw in 0u32..u32::MAX,
                level in 0u8..MAX_LEVEL
            ) {
                let side = 1u64 << level;
                let key = QuadKey {
                    row: (u64::from(row_raw) % side) as u32,
                    column: (u64::from(column_raw) % side) as u32,
                    level,
                };

                // Every child must be valid, one level deeper, and lead back
                // to the key through `parent`.
                for child in children(&key).unwrap() {
                    prop_assert!(child.validate().is_ok());
                    prop_assert_eq!(child.level, level + 1);
                    prop_assert_eq!(parent(&child), Some(key));
                }
            }
        }
    }
}
