//! Dense integer matrices.

use std::fmt;
use std::ops::{Index, IndexMut, Mul};

use itertools::Itertools;

use crate::{Integer, MathsError, MathsResult};

/// Dense row-major matrix of [`Integer`]s.
///
/// Every elementary operation takes a start index and leaves entries before
/// it untouched, so that callers can restrict an operation to a trailing
/// submatrix.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct MatrixInt {
    rows: usize,
    cols: usize,
    elems: Vec<Integer>,
}

impl MatrixInt {
    /// Constructs a zero matrix.
    pub fn zero(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            elems: vec![Integer::ZERO; rows * cols],
        }
    }
    /// Constructs an identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut ret = Self::zero(n, n);
        for i in 0..n {
            ret[(i, i)] = Integer::ONE;
        }
        ret
    }
    /// Constructs a matrix from a function for each entry.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> Integer) -> Self {
        Self {
            rows,
            cols,
            elems: (0..rows)
                .cartesian_product(0..cols)
                .map(|(r, c)| f(r, c))
                .collect(),
        }
    }
    /// Constructs a matrix from a list of rows, which must all have the same
    /// length.
    pub fn from_rows<R, T>(rows: impl IntoIterator<Item = R>) -> MathsResult<Self>
    where
        R: IntoIterator<Item = T>,
        T: Into<Integer>,
    {
        let rows: Vec<Vec<Integer>> = rows
            .into_iter()
            .map(|r| r.into_iter().map(Into::into).collect())
            .collect();
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(MathsError::InvalidArgument(
                "matrix rows have different lengths".to_string(),
            ));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            elems: rows.into_iter().flatten().collect(),
        })
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }
    /// Returns the number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }
    /// Returns whether the matrix is square.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }
    /// Returns whether every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.elems.iter().all(Integer::is_zero)
    }

    /// Returns a row as a slice.
    pub fn row(&self, r: usize) -> &[Integer] {
        &self.elems[r * self.cols..(r + 1) * self.cols]
    }
    /// Returns an iterator over the rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Integer]> {
        (0..self.rows).map(|r| self.row(r))
    }

    /// Returns the transpose.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |r, c| self[(c, r)].clone())
    }

    /// Returns the matrix-vector product `self * v`.
    pub fn mul_vec(&self, v: &[Integer]) -> MathsResult<Vec<Integer>> {
        if v.len() != self.cols {
            return Err(MathsError::InvalidArgument(format!(
                "cannot multiply {}x{} matrix by vector of length {}",
                self.rows,
                self.cols,
                v.len(),
            )));
        }
        Ok(self
            .iter_rows()
            .map(|row| std::iter::zip(row, v).map(|(a, b)| a * b).sum())
            .collect())
    }

    /// Swaps two rows, starting from column `start`.
    pub fn swap_rows(&mut self, a: usize, b: usize, start: usize) {
        if a == b {
            return;
        }
        for c in start..self.cols {
            self.elems.swap(a * self.cols + c, b * self.cols + c);
        }
    }
    /// Swaps two columns, starting from row `start`.
    pub fn swap_cols(&mut self, a: usize, b: usize, start: usize) {
        if a == b {
            return;
        }
        for r in start..self.rows {
            self.elems.swap(r * self.cols + a, r * self.cols + b);
        }
    }
    /// Adds `mult` times row `src` to row `dst`, starting from column `start`.
    pub fn add_row(&mut self, src: usize, dst: usize, mult: &Integer, start: usize) {
        for c in start..self.cols {
            let delta = mult * &self[(src, c)];
            self[(dst, c)] += delta;
        }
    }
    /// Adds `mult` times column `src` to column `dst`, starting from row
    /// `start`.
    pub fn add_col(&mut self, src: usize, dst: usize, mult: &Integer, start: usize) {
        for r in start..self.rows {
            let delta = mult * &self[(r, src)];
            self[(r, dst)] += delta;
        }
    }
    /// Multiplies row `r` by `factor`, starting from column `start`.
    pub fn mult_row(&mut self, r: usize, factor: &Integer, start: usize) {
        for c in start..self.cols {
            self[(r, c)] *= factor;
        }
    }
    /// Multiplies column `c` by `factor`, starting from row `start`.
    pub fn mult_col(&mut self, c: usize, factor: &Integer, start: usize) {
        for r in start..self.rows {
            self[(r, c)] *= factor;
        }
    }
    /// Negates row `r`, starting from column `start`.
    pub fn negate_row(&mut self, r: usize, start: usize) {
        for c in start..self.cols {
            self[(r, c)].negate();
        }
    }
    /// Negates column `c`, starting from row `start`.
    pub fn negate_col(&mut self, c: usize, start: usize) {
        for r in start..self.rows {
            self[(r, c)].negate();
        }
    }
    /// Simultaneously replaces rows `a` and `b` by `(u a + v b)` and
    /// `(x a + y b)`, starting from column `start`. This is invertible over
    /// the integers exactly when `u y - v x = ±1`.
    pub fn comb_rows(&mut self, a: usize, b: usize, [u, v, x, y]: [&Integer; 4], start: usize) {
        for c in start..self.cols {
            let (ea, eb) = (&self[(a, c)], &self[(b, c)]);
            let new_a = u * ea + v * eb;
            let new_b = x * ea + y * eb;
            self[(a, c)] = new_a;
            self[(b, c)] = new_b;
        }
    }
    /// Simultaneously replaces columns `a` and `b` by `(u a + v b)` and
    /// `(x a + y b)`, starting from row `start`.
    pub fn comb_cols(&mut self, a: usize, b: usize, [u, v, x, y]: [&Integer; 4], start: usize) {
        for r in start..self.rows {
            let (ea, eb) = (&self[(r, a)], &self[(r, b)]);
            let new_a = u * ea + v * eb;
            let new_b = x * ea + y * eb;
            self[(r, a)] = new_a;
            self[(r, b)] = new_b;
        }
    }

    /// Returns the rank over ℚ.
    pub fn rank(&self) -> usize {
        let mut m = self.clone();
        m.hermite_normal_form().len()
    }

    /// Returns the determinant, computed by fraction-free Bareiss
    /// elimination. Returns an error if the matrix is not square.
    pub fn det(&self) -> MathsResult<Integer> {
        if !self.is_square() {
            return Err(MathsError::InvalidArgument(format!(
                "determinant of non-square {}x{} matrix",
                self.rows, self.cols,
            )));
        }
        let n = self.rows;
        let mut m = self.clone();
        let mut sign = Integer::ONE;
        let mut prev = Integer::ONE;
        for k in 0..n {
            let Some(pivot) = (k..n).find(|&r| !m[(r, k)].is_zero()) else {
                return Ok(Integer::ZERO);
            };
            if pivot != k {
                m.swap_rows(pivot, k, k);
                sign.negate();
            }
            for i in k + 1..n {
                for j in k + 1..n {
                    let value = &m[(k, k)] * &m[(i, j)] - &m[(i, k)] * &m[(k, j)];
                    m[(i, j)] = value.div_exact(&prev)?;
                }
            }
            prev = m[(k, k)].clone();
        }
        Ok(match n {
            0 => Integer::ONE,
            _ => sign * &m[(n - 1, n - 1)],
        })
    }
}

impl Index<(usize, usize)> for MatrixInt {
    type Output = Integer;

    fn index(&self, (r, c): (usize, usize)) -> &Integer {
        debug_assert!(r < self.rows && c < self.cols, "index ({r}, {c}) out of range");
        &self.elems[r * self.cols + c]
    }
}

impl IndexMut<(usize, usize)> for MatrixInt {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut Integer {
        debug_assert!(r < self.rows && c < self.cols, "index ({r}, {c}) out of range");
        &mut self.elems[r * self.cols + c]
    }
}

impl Mul for &MatrixInt {
    type Output = MathsResult<MatrixInt>;

    fn mul(self, rhs: &MatrixInt) -> MathsResult<MatrixInt> {
        if self.cols != rhs.rows {
            return Err(MathsError::InvalidArgument(format!(
                "cannot multiply {}x{} matrix by {}x{} matrix",
                self.rows, self.cols, rhs.rows, rhs.cols,
            )));
        }
        Ok(MatrixInt::from_fn(self.rows, rhs.cols, |r, c| {
            (0..self.cols).map(|k| &self[(r, k)] * &rhs[(k, c)]).sum()
        }))
    }
}

impl fmt::Display for MatrixInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            writeln!(f, "[{}]", row.iter().join(" "))?;
        }
        Ok(())
    }
}

impl fmt::Debug for MatrixInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatrixInt({}x{}) ", self.rows, self.cols)?;
        f.debug_list().entries(self.iter_rows()).finish()
    }
}
