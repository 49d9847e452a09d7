// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Sentinel-padded integer matrices.
//!
//! Variable-length identity lists (`list_boxes_per_image`,
//! `list_videos_per_activity`, ...) are persisted as rectangular `i32`
//! matrices. Each row is left-justified and the remainder is filled with
//! [`SENTINEL`]. Identities are always non-negative, so the original length
//! of a row is the number of values before the first sentinel.

use crate::{Error, Matrix};

/// Padding value for index lists and the "absent" marker in `object_ids`.
pub const SENTINEL: i32 = -1;

/// Pad integer lists into a rectangular matrix.
///
/// The width is the longest list. When every list is empty a single
/// sentinel-filled column is kept so the row count survives.
///
/// Fails with `SentinelCollision` if any value equals `sentinel`.
///
/// # Example
/// ```
/// use annostore::pad;
///
/// let m = pad::pad(&[vec![2, 5], vec![], vec![1]], -1).unwrap();
/// assert_eq!(m.row(1), &[-1, -1]);
/// assert_eq!(pad::unpad(&m, -1), vec![vec![2, 5], vec![], vec![1]]);
/// ```
pub fn pad<L: AsRef<[i32]>>(lists: &[L], sentinel: i32) -> Result<Matrix<i32>, Error> {
    let max_len = lists
        .iter()
        .map(|l| l.as_ref().len())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut matrix = Matrix::filled(lists.len(), max_len, sentinel);
    for (row, list) in lists.iter().enumerate() {
        let list = list.as_ref();
        if let Some(&value) = list.iter().find(|&&v| v == sentinel) {
            return Err(Error::SentinelCollision { row, value });
        }
        matrix.row_mut(row)[..list.len()].copy_from_slice(list);
    }

    Ok(matrix)
}

/// Recover the original lists from a padded matrix.
pub fn unpad(matrix: &Matrix<i32>, sentinel: i32) -> Vec<Vec<i32>> {
    matrix
        .iter_rows()
        .map(|row| row.iter().take_while(|&&v| v != sentinel).copied().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_mixed_lengths() {
        let lists = vec![vec![2, 5], vec![], vec![1]];
        let m = pad(&lists, SENTINEL).unwrap();

        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.row(0), &[2, 5]);
        assert_eq!(m.row(1), &[-1, -1]);
        assert_eq!(m.row(2), &[1, -1]);
        assert_eq!(unpad(&m, SENTINEL), lists);
    }

    #[test]
    fn test_all_empty_lists_keep_one_column() {
        let lists: Vec<Vec<i32>> = vec![vec![], vec![], vec![]];
        let m = pad(&lists, SENTINEL).unwrap();
        assert_eq!(m.shape(), (3, 1));
        assert_eq!(unpad(&m, SENTINEL), lists);
    }

    #[test]
    fn test_no_lists() {
        let m = pad::<Vec<i32>>(&[], SENTINEL).unwrap();
        assert_eq!(m.rows(), 0);
        assert!(unpad(&m, SENTINEL).is_empty());
    }

    #[test]
    fn test_sentinel_collision() {
        let err = pad(&[vec![0, 1], vec![4, -1, 2]], SENTINEL).unwrap_err();
        match err {
            Error::SentinelCollision { row, value } => {
                assert_eq!(row, 1);
                assert_eq!(value, -1);
            }
            other => panic!("Expected sentinel collision, got {:?}", other),
        }
    }

    #[test]
    fn test_full_rows_without_sentinel() {
        let m = Matrix::from_rows(&[[3, 4, 5]], 3).unwrap();
        assert_eq!(unpad(&m, SENTINEL), vec![vec![3, 4, 5]]);
    }

    #[test]
    fn test_custom_sentinel_roundtrip() {
        let lists = vec![vec![-1, -5, 7], vec![0]];
        let m = pad(&lists, i32::MIN).unwrap();
        assert_eq!(m.row(1), &[0, i32::MIN, i32::MIN]);
        assert_eq!(unpad(&m, i32::MIN), lists);
    }
}
