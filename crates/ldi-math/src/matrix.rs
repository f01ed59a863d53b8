//! `Matrix`: a two-dimensional matrix of reals.
//!
//! Thin newtype around `nalgebra::DMatrix<f64>`. Covariance matrices and the
//! time-step × scenario tables produced by the simulators (rates, prices,
//! returns) are `Matrix`es: row `t` is time step `t`, column `j` is
//! scenario `j`.

use crate::array::Array;
use ldi_core::{Real, Size};
use nalgebra::DMatrix;
use std::ops::{Index, IndexMut};

/// A dynamically-sized 2D matrix of `Real` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix(DMatrix<Real>);

impl Matrix {
    /// Create a zero-filled `rows × cols` matrix.
    pub fn zeros(rows: Size, cols: Size) -> Self {
        Self(DMatrix::zeros(rows, cols))
    }

    /// Create an identity matrix of size `n × n`.
    pub fn identity(n: Size) -> Self {
        Self(DMatrix::identity(n, n))
    }

    /// Create from a row-major data slice.
    pub fn from_row_slice(rows: Size, cols: Size, data: &[Real]) -> Self {
        Self(DMatrix::from_row_slice(rows, cols, data))
    }

    /// Create a matrix whose `(i, j)` entry is `f(i, j)`.
    pub fn from_fn<F: FnMut(Size, Size) -> Real>(rows: Size, cols: Size, f: F) -> Self {
        Self(DMatrix::from_fn(rows, cols, f))
    }

    /// Number of rows.
    pub fn rows(&self) -> Size {
        self.0.nrows()
    }

    /// Number of columns.
    pub fn cols(&self) -> Size {
        self.0.ncols()
    }

    /// Return `true` if the matrix is square.
    pub fn is_square(&self) -> bool {
        self.0.nrows() == self.0.ncols()
    }

    /// Return `true` if the matrix is square and `|m_ij − m_ji| ≤ tol`.
    pub fn is_symmetric(&self, tol: Real) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.rows();
        (0..n).all(|i| (i + 1..n).all(|j| (self.0[(i, j)] - self.0[(j, i)]).abs() <= tol))
    }

    /// Borrow the inner `DMatrix`.
    pub fn inner(&self) -> &DMatrix<Real> {
        &self.0
    }

    /// Diagonal elements as an `Array`.
    pub fn diagonal(&self) -> Array {
        Array::from(self.0.diagonal())
    }

    /// Extract a row as an `Array`.
    pub fn row(&self, i: Size) -> Array {
        Array::from_vec(self.0.row(i).iter().copied().collect())
    }

    /// Extract a column as an `Array`.
    pub fn column(&self, j: Size) -> Array {
        Array::from(self.0.column(j).clone_owned())
    }

    /// Overwrite row `i` with the values of `values`.
    pub fn set_row(&mut self, i: Size, values: &Array) {
        for (j, v) in values.iter().enumerate() {
            self.0[(i, j)] = *v;
        }
    }

    /// Matrix-vector product `M · v`.
    pub fn mul_vec(&self, v: &Array) -> Array {
        Array::from(&self.0 * v.inner())
    }

    /// Transposed product `Mᵀ · v`.
    pub fn tr_mul_vec(&self, v: &Array) -> Array {
        Array::from(self.0.tr_mul(v.inner()))
    }

    /// Quadratic form `vᵀ · M · v`.
    pub fn quadratic_form(&self, v: &Array) -> Real {
        v.inner().dot(&(&self.0 * v.inner()))
    }

    /// Element-wise apply.
    pub fn map<F: Fn(Real) -> Real>(&self, f: F) -> Self {
        Self(self.0.map(f))
    }

    /// Return `true` if every element satisfies `pred`.
    pub fn all<F: Fn(Real) -> bool>(&self, pred: F) -> bool {
        self.0.iter().all(|&x| pred(x))
    }
}

// ── From / Into ───────────────────────────────────────────────────────────────

impl From<DMatrix<Real>> for Matrix {
    fn from(m: DMatrix<Real>) -> Self {
        Self(m)
    }
}

impl From<Matrix> for DMatrix<Real> {
    fn from(m: Matrix) -> Self {
        m.0
    }
}

// ── Indexing ──────────────────────────────────────────────────────────────────

impl Index<(usize, usize)> for Matrix {
    type Output = Real;
    fn index(&self, (i, j): (usize, usize)) -> &Real {
        &self.0[(i, j)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Real {
        &mut self.0[(i, j)]
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl std::fmt::Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.0.nrows() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for j in 0..self.0.ncols() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.0[(i, j)])?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
