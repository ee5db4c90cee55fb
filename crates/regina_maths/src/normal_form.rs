//! Smith and Hermite normal forms.

use crate::{Integer, MatrixInt};

impl MatrixInt {
    /// Reduces the matrix in place to Smith normal form and returns its
    /// diagonal.
    ///
    /// Afterwards the matrix is diagonal with non-negative entries
    /// `d₁ | d₂ | ... | dₖ` followed by zeros. The returned vector has length
    /// `min(rows, cols)` and includes the trailing zeros.
    pub fn smith_normal_form(&mut self) -> Vec<Integer> {
        let rows = self.rows();
        let cols = self.cols();
        let mut stage = 0;
        let mut restarts = 0_usize;
        'stage: while stage < rows && stage < cols {
            // Pivot on the smallest non-zero entry of the active block.
            let pivot = (stage..rows)
                .flat_map(|r| (stage..cols).map(move |c| (r, c)))
                .filter(|&(r, c)| !self[(r, c)].is_zero())
                .min_by_key(|&(r, c)| self[(r, c)].abs());
            let Some((pivot_row, pivot_col)) = pivot else {
                break;
            };
            self.swap_rows(stage, pivot_row, 0);
            self.swap_cols(stage, pivot_col, 0);

            // Clear the rest of the pivot row with column operations.
            for c in stage + 1..cols {
                if self[(stage, c)].is_zero() {
                    continue;
                }
                let [u, v, x, y] = unimodular_clearing(&self[(stage, stage)], &self[(stage, c)]);
                self.comb_cols(stage, c, [&u, &v, &x, &y], stage);
            }

            // Clear the rest of the pivot column with row operations, which
            // may reintroduce entries in the pivot row.
            let mut muddled = false;
            for r in stage + 1..rows {
                if self[(r, stage)].is_zero() {
                    continue;
                }
                muddled = true;
                let [u, v, x, y] = unimodular_clearing(&self[(stage, stage)], &self[(r, stage)]);
                self.comb_rows(stage, r, [&u, &v, &x, &y], stage);
            }
            if muddled && (stage + 1..cols).any(|c| !self[(stage, c)].is_zero()) {
                restarts += 1;
                continue 'stage;
            }

            // The pivot must divide everything that remains.
            for r in stage + 1..rows {
                for c in stage + 1..cols {
                    if !self[(stage, stage)].divides(&self[(r, c)]) {
                        self.add_row(r, stage, &Integer::ONE, stage + 1);
                        restarts += 1;
                        continue 'stage;
                    }
                }
            }

            if self[(stage, stage)].is_negative() {
                self.negate_row(stage, stage);
            }
            stage += 1;
        }
        log::trace!("smith normal form of {rows}x{cols} matrix took {restarts} restarts");

        (0..rows.min(cols)).map(|i| self[(i, i)].clone()).collect()
    }

    /// Reduces the matrix in place to Hermite normal form using row
    /// operations only, and returns the pivot columns.
    ///
    /// The result is in row echelon form: each non-zero row has a positive
    /// leading entry strictly to the right of the one above, every entry
    /// above a pivot lies in `[0, pivot)`, and zero rows come last.
    pub fn hermite_normal_form(&mut self) -> Vec<usize> {
        let rows = self.rows();
        let cols = self.cols();
        let mut pivots = vec![];
        let mut row = 0;
        for col in 0..cols {
            if row == rows {
                break;
            }
            // Gather the gcd of this column (from `row` down) into `row`.
            for r in row + 1..rows {
                if self[(r, col)].is_zero() {
                    continue;
                }
                if self[(row, col)].is_zero() {
                    self.swap_rows(row, r, col);
                    continue;
                }
                let [u, v, x, y] = unimodular_clearing(&self[(row, col)], &self[(r, col)]);
                self.comb_rows(row, r, [&u, &v, &x, &y], col);
            }
            if self[(row, col)].is_zero() {
                continue;
            }
            if self[(row, col)].is_negative() {
                self.negate_row(row, col);
            }
            // Reduce the entries above the pivot.
            let pivot = self[(row, col)].clone();
            for r in 0..row {
                if let Ok((q, _)) = self[(r, col)].div_with_remainder(&pivot) {
                    if !q.is_zero() {
                        self.add_row(row, r, &-q, col);
                    }
                }
            }
            pivots.push(col);
            row += 1;
        }
        pivots
    }
}

/// Returns `[u, v, x, y]` such that the combination `(u a + v b, x a + y b)`
/// is `(gcd(a, b), 0)` and `u y - v x = 1`.
///
/// `a` must be non-zero.
fn unimodular_clearing(a: &Integer, b: &Integer) -> [Integer; 4] {
    match a.gcd_with_coeffs(b) {
        Ok((g, u, v)) => {
            // `g` divides both, so these cannot fail.
            let a_g = a.try_div(&g).unwrap_or_default();
            let b_g = b.try_div(&g).unwrap_or_default();
            [u, v, -b_g, a_g]
        }
        Err(e) => {
            debug_panic!("unimodular clearing of a zero pair: {e}");
            [Integer::ONE, Integer::ZERO, Integer::ZERO, Integer::ONE]
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn ints(xs: &[i64]) -> Vec<Integer> {
        xs.iter().map(|&x| Integer::from(x)).collect()
    }

    #[test]
    fn test_snf_examples() {
        let mut m = MatrixInt::from_rows([[2, 4, 6], [8, 10, 12]]).unwrap();
        assert_eq!(m.smith_normal_form(), ints(&[2, 6]));

        let mut m = MatrixInt::from_rows([[0, 0], [0, 0]]).unwrap();
        assert_eq!(m.smith_normal_form(), ints(&[0, 0]));

        let mut m = MatrixInt::from_rows([[2, 0], [0, 3]]).unwrap();
        assert_eq!(m.smith_normal_form(), ints(&[1, 6]));

        let mut m = MatrixInt::from_rows([[0, 4], [6, 0], [0, 0]]).unwrap();
        assert_eq!(m.smith_normal_form(), ints(&[2, 12]));
    }

    #[test]
    fn test_hnf_example() {
        let mut m = MatrixInt::from_rows([[2, 3, 6], [4, 5, 9], [2, 2, 4]]).unwrap();
        let pivots = m.hermite_normal_form();
        assert_eq!(pivots, vec![0, 1, 2]);
        assert_eq!(
            m,
            MatrixInt::from_rows([[2, 0, 0], [0, 1, 0], [0, 0, 1]]).unwrap(),
        );
    }

    #[test]
    fn test_det() {
        let m = MatrixInt::from_rows([[2, 3, 6], [4, 5, 9], [2, 2, 4]]).unwrap();
        assert_eq!(m.det().unwrap(), Integer::from(-2));
        let m = MatrixInt::from_rows([[2, 3, 6], [4, 5, 9], [2, 2, 3]]).unwrap();
        assert_eq!(m.det().unwrap(), Integer::ZERO);
        let m = MatrixInt::from_rows([[0, 1], [1, 0]]).unwrap();
        assert_eq!(m.det().unwrap(), Integer::from(-1));
        assert!(MatrixInt::zero(2, 3).det().is_err());
    }

    fn matrix_strategy() -> impl Strategy<Value = MatrixInt> {
        (1_usize..5, 1_usize..5).prop_flat_map(|(rows, cols)| {
            proptest::collection::vec(-20_i64..20, rows * cols).prop_map(move |elems| {
                MatrixInt::from_fn(rows, cols, |r, c| Integer::from(elems[r * cols + c]))
            })
        })
    }

    proptest! {
        #[test]
        fn proptest_snf_divisibility_chain(m in matrix_strategy()) {
            let mut snf = m.clone();
            let diag = snf.smith_normal_form();

            // Diagonal, non-negative, and each entry divides the next.
            for r in 0..snf.rows() {
                for c in 0..snf.cols() {
                    if r != c {
                        prop_assert!(snf[(r, c)].is_zero());
                    }
                }
            }
            prop_assert!(diag.iter().all(|d| !d.is_negative()));
            for w in diag.windows(2) {
                prop_assert!(w[0].divides(&w[1]));
            }

            // Idempotent.
            let mut again = snf.clone();
            prop_assert_eq!(again.smith_normal_form(), diag.clone());
            prop_assert_eq!(again, snf);

            // Product of the diagonal is |det| for square matrices, and the
            // rank is preserved.
            if m.is_square() {
                let product: Integer = diag.iter().cloned().product();
                prop_assert_eq!(product, m.det().unwrap().abs());
            }
            prop_assert_eq!(diag.iter().filter(|d| !d.is_zero()).count(), m.rank());
        }

        #[test]
        fn proptest_hnf_is_echelon(m in matrix_strategy()) {
            let mut hnf = m.clone();
            let pivots = hnf.hermite_normal_form();
            for (row, &col) in pivots.iter().enumerate() {
                prop_assert!(hnf[(row, col)].is_positive());
                for c in 0..col {
                    prop_assert!(hnf[(row, c)].is_zero());
                }
                for r in 0..row {
                    prop_assert!(!hnf[(r, col)].is_negative());
                    prop_assert!(hnf[(r, col)] < hnf[(row, col)]);
                }
            }
            for r in pivots.len()..hnf.rows() {
                prop_assert!(hnf.row(r).iter().all(Integer::is_zero));
            }
        }
    }
}
