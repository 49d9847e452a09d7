// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Fixed-width text matrices.
//!
//! A sequence of strings is stored as an `N × max_len` byte matrix where row
//! `i` holds the UTF-8 bytes of string `i` followed by zero padding. Decoding
//! stops at the first zero byte of each row, which is why strings containing
//! a zero byte are rejected at encoding time.

use crate::{Error, Matrix};

/// Encode strings into a zero-padded byte matrix.
///
/// The width is the byte length of the longest string, never less than one
/// column so that an empty input (or a list of empty strings) still has a
/// well-formed shape.
///
/// # Example
/// ```
/// use annostore::text;
///
/// let m = text::encode(&["cat", "elephant", ""]).unwrap();
/// assert_eq!(m.shape(), (3, 8));
/// assert_eq!(text::decode(&m).unwrap(), vec!["cat", "elephant", ""]);
/// ```
pub fn encode<S: AsRef<str>>(strings: &[S]) -> Result<Matrix<u8>, Error> {
    let max_len = strings
        .iter()
        .map(|s| s.as_ref().len())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut matrix = Matrix::filled(strings.len(), max_len, 0u8);
    for (i, s) in strings.iter().enumerate() {
        let bytes = s.as_ref().as_bytes();
        if let Some(pos) = bytes.iter().position(|&b| b == 0) {
            return Err(Error::InvalidInput(format!(
                "String {} contains a zero byte at offset {}: {:?}",
                i,
                pos,
                s.as_ref()
            )));
        }
        matrix.row_mut(i)[..bytes.len()].copy_from_slice(bytes);
    }

    Ok(matrix)
}

/// Encode a single string as a `1 × len` matrix.
pub fn encode_one(s: &str) -> Result<Matrix<u8>, Error> {
    encode(&[s])
}

/// Decode a zero-padded byte matrix back into strings.
pub fn decode(matrix: &Matrix<u8>) -> Result<Vec<String>, Error> {
    matrix
        .iter_rows()
        .enumerate()
        .map(|(i, row)| {
            let end = row.iter().position(|&b| b == 0).unwrap_or(row.len());
            String::from_utf8(row[..end].to_vec()).map_err(|e| {
                Error::InvalidInput(format!("Row {} is not valid UTF-8: {}", i, e))
            })
        })
        .collect()
}
