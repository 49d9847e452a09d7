// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Rectangular typed arrays stored as leaves of the hierarchical store.

use crate::Error;
use serde::{Deserialize, Serialize};

/// Row-major `rows × cols` matrix.
///
/// Every persisted value in the store is a matrix: text is a `u8` matrix
/// (one zero-padded string per row), identities and padded index lists are
/// `i32` matrices, and geometric fields are `f64` matrices. Scalar field
/// arrays are `N × 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Copy> Matrix<T> {
    /// Create a matrix filled with `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Build a matrix from row-major data.
    ///
    /// Fails with `InvalidInput` when `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, Error> {
        if rows * cols != data.len() {
            return Err(Error::InvalidInput(format!(
                "Matrix data has {} values, expected {}x{}",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from equally sized rows.
    ///
    /// `cols` is required so that an empty row set still has a width.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R], cols: usize) -> Result<Self, Error> {
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::InvalidInput(format!(
                    "Row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Build an `N × 1` column matrix.
    pub fn column(values: Vec<T>) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            data: values,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Borrow row `i`.
    ///
    /// # Panics
    /// Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Mutably borrow row `i`.
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows).map(move |i| self.row(i))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Check the shape against the data length. Used after deserializing.
    pub fn validate(&self) -> Result<(), Error> {
        if self.rows * self.cols != self.data.len() {
            return Err(Error::InvalidInput(format!(
                "Corrupt matrix: {} values for shape {}x{}",
                self.data.len(),
                self.rows,
                self.cols
            )));
        }
        Ok(())
    }
}

/// Typed leaf value of the hierarchical store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", rename_all = "lowercase")]
pub enum Array {
    /// Zero-padded text rows.
    U8(Matrix<u8>),
    /// Identities, padded index lists and integer fields.
    I32(Matrix<i32>),
    /// Floating point fields (boxes, occlusion).
    F64(Matrix<f64>),
}

impl Array {
    pub fn dtype(&self) -> &'static str {
        match self {
            Array::U8(_) => "u8",
            Array::I32(_) => "i32",
            Array::F64(_) => "f64",
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        match self {
            Array::U8(m) => m.shape(),
            Array::I32(m) => m.shape(),
            Array::F64(m) => m.shape(),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        match self {
            Array::U8(m) => m.validate(),
            Array::I32(m) => m.validate(),
            Array::F64(m) => m.validate(),
        }
    }

    pub fn as_u8(&self) -> Option<&Matrix<u8>> {
        match self {
            Array::U8(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<&Matrix<i32>> {
        match self {
            Array::I32(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&Matrix<f64>> {
        match self {
            Array::F64(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Matrix<u8>> for Array {
    fn from(m: Matrix<u8>) -> Self {
        Array::U8(m)
    }
}

impl From<Matrix<i32>> for Array {
    fn from(m: Matrix<i32>) -> Self {
        Array::I32(m)
    }
}

impl From<Matrix<f64>> for Array {
    fn from(m: Matrix<f64>) -> Self {
        Array::F64(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![1, 2], vec![3]];
        assert!(matches!(
            Matrix::from_rows(&rows, 2),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rows_access() {
        let m = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6]], 3).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.row(1), &[4, 5, 6]);
        assert_eq!(m.iter_rows().count(), 2);
    }

    #[test]
    fn test_empty_matrix_keeps_width() {
        let m: Matrix<i32> = Matrix::from_rows(&Vec::<Vec<i32>>::new(), 4).unwrap();
        assert_eq!(m.shape(), (0, 4));
        assert!(m.as_slice().is_empty());
    }

    #[test]
    fn test_array_serde_roundtrip() {
        let array = Array::F64(Matrix::from_rows(&[[0.0, 0.0, 9.0, 19.0]], 4).unwrap());
        let json = serde_json::to_string(&array).unwrap();
        assert!(json.contains("\"dtype\":\"f64\""));

        let restored: Array = serde_json::from_str(&json).unwrap();
        restored.validate().unwrap();
        assert_eq!(restored, array);
    }

    #[test]
    fn test_validate_detects_corrupt_shape() {
        let json = r#"{"dtype":"i32","rows":2,"cols":2,"data":[1,2,3]}"#;
        let array: Array = serde_json::from_str(json).unwrap();
        assert!(array.validate().is_err());
    }
}
