//! Column letters <-> 1-based column ordinals.
//!
//! Spreadsheet columns use bijective base-26: there is no zero digit, so
//! `Z` is 26 and the next column is `AA` (27), not `BA`.

use crate::error::{InputError, SheetError};

/// Largest row or column ordinal a sheet can address; indices go over the
/// wire as `i32`.
pub const MAX_ORDINAL: u32 = i32::MAX as u32;

/// Encode a 1-based column ordinal as letters (`1 -> "A"`, `27 -> "AA"`).
pub fn encode(ordinal: u32) -> Result<String, SheetError> {
    if ordinal == 0 {
        return Err(InputError::ZeroOrdinal.into());
    }

    let mut n = ordinal;
    let mut out = Vec::<u8>::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();

    Ok(out.into_iter().map(char::from).collect())
}

/// Decode uppercase column letters into a 1-based ordinal (`"AA" -> 27`).
///
/// Ordinals above [`MAX_ORDINAL`] are rejected.
pub fn decode(letters: &str) -> Result<u32, SheetError> {
    let invalid = || InputError::InvalidColumn(letters.to_owned());

    if letters.is_empty() {
        return Err(invalid().into());
    }

    let mut ordinal: u32 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_uppercase() {
            return Err(invalid().into());
        }
        let digit = u32::from(b - b'A') + 1;
        ordinal = ordinal
            .checked_mul(26)
            .and_then(|o| o.checked_add(digit))
            .filter(|&o| o <= MAX_ORDINAL)
            .ok_or_else(invalid)?;
    }

    Ok(ordinal)
}
