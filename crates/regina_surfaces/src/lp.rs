//! Exact feasibility tests over the normal surface cone.
//!
//! Every question asked during tree enumeration has the form: does the cone
//! `{ x : Mx = 0, x ≥ 0 }` contain a point with some columns forced to zero,
//! some forced to be at least one, and some sets of columns not all zero?
//!
//! The answer is kept up to date in a single rational tableau with a
//! feasible basis, so each new constraint costs a few pivots rather than a
//! fresh solve:
//!
//! - forcing a non-basic column to zero only bans it from entering the
//!   basis;
//! - forcing a basic column to zero minimises it with the primal simplex
//!   method and then pivots it out;
//! - forcing a column to be at least one substitutes `x = y + 1`, which moves
//!   the right hand side, and restores feasibility if any entry went
//!   negative;
//! - a non-zero constraint becomes one extra row `Σ x - s = 1` with a new
//!   slack column `s`.
//!
//! Feasibility is restored with a single artificial column, and every
//! simplex step uses Bland's rule so it always terminates. Popping a
//! constraint either reverses a cheap change in place or restores the
//! tableau saved before the pivots it caused.

use regina_maths::{Integer, MatrixInt, Rational};

/// Subtracts `factor * src` from `target`.
fn sub_scaled(target: &mut [Rational], src: &[Rational], factor: &Rational) {
    for (x, s) in target.iter_mut().zip(src) {
        if !s.is_zero() {
            *x -= factor * s;
        }
    }
}

/// Tableau `rows · x = rhs` whose basic columns are unit vectors and whose
/// right hand side is non-negative whenever the system is feasible.
#[derive(Debug, Clone)]
struct Tableau {
    rows: Vec<Vec<Rational>>,
    rhs: Vec<Rational>,
    /// Basic column of each row.
    basis: Vec<usize>,
    /// Row of each basic column.
    row_of: Vec<Option<usize>>,
    /// Columns fixed at zero, which may never enter the basis.
    dead: Vec<bool>,
    /// Columns substituted by `x = y + 1`.
    shifted: Vec<bool>,
}

impl Tableau {
    /// Brings the matching equations to reduced row echelon form. Linearly
    /// dependent rows are dropped, and the origin is the basic solution.
    fn new(matrix: &MatrixInt) -> Self {
        let width = matrix.cols();
        let mut ret = Self {
            rows: vec![],
            rhs: vec![],
            basis: vec![],
            row_of: vec![None; width],
            dead: vec![false; width],
            shifted: vec![false; width],
        };
        for source in matrix.iter_rows() {
            let mut row: Vec<Rational> = source.iter().cloned().map(Rational::from).collect();
            for (basic_row, &b) in ret.rows.iter().zip(&ret.basis) {
                let factor = row[b].clone();
                if !factor.is_zero() {
                    sub_scaled(&mut row, basic_row, &factor);
                }
            }
            let Some(lead) = row.iter().position(|x| !x.is_zero()) else {
                continue;
            };
            let r = ret.rows.len();
            ret.rows.push(row);
            ret.rhs.push(Rational::ZERO);
            ret.basis.push(lead);
            ret.row_of[lead] = Some(r);
            ret.eliminate(r, lead);
        }
        ret
    }

    fn width(&self) -> usize {
        self.dead.len()
    }

    /// Scales row `r` so that `col` has coefficient one there, and clears
    /// `col` from every other row.
    fn eliminate(&mut self, r: usize, col: usize) {
        let pivot = self.rows[r][col].clone();
        if pivot != Rational::ONE {
            for x in &mut self.rows[r] {
                if !x.is_zero() {
                    *x /= &pivot;
                }
            }
            self.rhs[r] /= &pivot;
        }
        let src = self.rows[r].clone();
        let src_rhs = self.rhs[r].clone();
        for (i, (row, rhs)) in self.rows.iter_mut().zip(&mut self.rhs).enumerate() {
            let factor = row[col].clone();
            if i == r || factor.is_zero() {
                continue;
            }
            sub_scaled(row, &src, &factor);
            *rhs -= &factor * &src_rhs;
        }
    }

    fn pivot(&mut self, r: usize, col: usize) {
        self.row_of[self.basis[r]] = None;
        self.eliminate(r, col);
        self.basis[r] = col;
        self.row_of[col] = Some(r);
    }

    /// Appends a non-basic column with the given entry in each row.
    fn add_column(&mut self, mut entry: impl FnMut(usize) -> Rational) -> usize {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.push(entry(i));
        }
        self.dead.push(false);
        self.shifted.push(false);
        self.row_of.push(None);
        self.width() - 1
    }
    /// Drops the last column, which must be non-basic.
    fn remove_last_column(&mut self) {
        for row in &mut self.rows {
            row.pop();
        }
        self.dead.pop();
        self.shifted.pop();
        self.row_of.pop();
    }
    fn remove_row(&mut self, r: usize) {
        self.rows.remove(r);
        self.rhs.remove(r);
        let b = self.basis.remove(r);
        self.row_of[b] = None;
        for (i, &b) in self.basis.iter().enumerate().skip(r) {
            self.row_of[b] = Some(i);
        }
    }

    /// Lowest live non-basic column whose entry in row `r` passes `accept`.
    fn entering(&self, r: usize, accept: impl Fn(&Rational) -> bool) -> Option<usize> {
        (0..self.width()).find(|&j| !self.dead[j] && self.row_of[j].is_none() && accept(&self.rows[r][j]))
    }
    /// Ratio test for column `col`, breaking ties by the lowest basic column.
    fn leaving(&self, col: usize) -> Option<usize> {
        let mut best: Option<(usize, Rational)> = None;
        for (i, row) in self.rows.iter().enumerate() {
            if row[col].sign() <= 0 {
                continue;
            }
            let ratio = &self.rhs[i] / &row[col];
            let better = match &best {
                None => true,
                Some((b, q)) => ratio < *q || (ratio == *q && self.basis[i] < self.basis[*b]),
            };
            if better {
                best = Some((i, ratio));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Returns whether column `col` can be fixed at zero without pivoting:
    /// it is non-basic, or basic at zero in a row with no live entries.
    fn is_zero_without_pivot(&self, col: usize) -> bool {
        match self.row_of[col] {
            None => true,
            Some(r) => self.rhs[r].is_zero() && self.entering(r, |x| !x.is_zero()).is_none(),
        }
    }

    /// Minimises column `col` over the current feasible region and returns
    /// whether it reaches zero. On success `col` is non-basic, or basic at
    /// zero in a row with no live entries.
    fn drive_to_zero(&mut self, col: usize) -> bool {
        while let Some(r) = self.row_of[col] {
            if self.rhs[r].is_zero() {
                if let Some(j) = self.entering(r, |x| !x.is_zero()) {
                    self.pivot(r, j);
                }
                return true;
            }
            let Some(j) = self.entering(r, |x| x.sign() > 0) else {
                return false;
            };
            let Some(leave) = self.leaving(j) else {
                debug_panic!("no leaving row for column {j}");
                return false;
            };
            self.pivot(leave, j);
        }
        true
    }

    /// Makes the right hand side non-negative again, or returns `false` if
    /// the system has no solution.
    fn repair(&mut self) -> bool {
        let mut worst: Option<usize> = None;
        for (i, x) in self.rhs.iter().enumerate() {
            if x.sign() < 0 && worst.is_none_or(|w| *x < self.rhs[w]) {
                worst = Some(i);
            }
        }
        let Some(worst) = worst else {
            return true;
        };
        let negative: Vec<bool> = self.rhs.iter().map(|x| x.sign() < 0).collect();
        let artificial = self.add_column(|i| match negative[i] {
            true => Rational::from(-1_i64),
            false => Rational::ZERO,
        });
        // Entering on the most negative row makes every row non-negative.
        self.pivot(worst, artificial);
        if !self.drive_to_zero(artificial) {
            return false;
        }
        // Stuck at zero in a row that only constrains dead columns.
        if let Some(r) = self.row_of[artificial] {
            self.remove_row(r);
        }
        self.remove_last_column();
        true
    }

    /// Applies (`up`) or reverses the substitution `x = y + 1` on `col`.
    fn shift(&mut self, col: usize, up: bool) {
        self.shifted[col] = up;
        for (row, rhs) in self.rows.iter().zip(&mut self.rhs) {
            let a = &row[col];
            if a.is_zero() {
                continue;
            }
            match up {
                true => *rhs -= a,
                false => *rhs += a,
            }
        }
    }

    /// Adds the row `Σ x - s = 1` over `cols`, none of which is shifted.
    fn require_nonzero(&mut self, cols: &[usize]) -> bool {
        let slack = self.add_column(|_| Rational::ZERO);
        let mut row = vec![Rational::ZERO; self.width()];
        for &c in cols {
            row[c] = Rational::from(-1_i64);
        }
        row[slack] = Rational::ONE;
        let mut rhs = Rational::from(-1_i64);
        for (basic_row, (&b, basic_rhs)) in self.rows.iter().zip(self.basis.iter().zip(&self.rhs)) {
            let factor = row[b].clone();
            if factor.is_zero() {
                continue;
            }
            sub_scaled(&mut row, basic_row, &factor);
            rhs -= &factor * basic_rhs;
        }
        let r = self.rows.len();
        self.rows.push(row);
        self.rhs.push(rhs);
        self.basis.push(slack);
        self.row_of[slack] = Some(r);
        self.repair()
    }
}

#[derive(Debug, Clone)]
enum Undo {
    Nothing,
    Revive(usize),
    Unshift(usize),
    Restore(Box<Tableau>),
}

#[derive(Debug, Clone)]
struct Step {
    was_feasible: bool,
    undo: Undo,
}

/// Constraint stack over the cone cut out by a matching matrix.
///
/// Constraints are pushed one at a time and popped in reverse order, so a
/// depth-first search can undo a branch after testing it. An infeasible push
/// leaves the stack usable: later pushes are recorded without effect until
/// it is popped.
#[derive(Debug, Clone)]
pub struct LpSystem {
    tableau: Tableau,
    feasible: bool,
    history: Vec<Step>,
}

impl LpSystem {
    /// Returns an unconstrained system over `{ Mx = 0, x ≥ 0 }`.
    pub fn new(matrix: &MatrixInt) -> Self {
        Self {
            tableau: Tableau::new(matrix),
            feasible: true,
            history: vec![],
        }
    }

    /// Returns the number of constraints on the stack.
    pub fn depth(&self) -> usize {
        self.history.len()
    }
    /// Returns whether the constrained cone has a point.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Forces column `c` to zero.
    pub fn push_zero(&mut self, c: usize) {
        let was_feasible = self.feasible;
        let t = &mut self.tableau;
        let undo = if !was_feasible || t.dead[c] {
            Undo::Nothing
        } else if t.shifted[c] {
            self.feasible = false;
            Undo::Nothing
        } else if t.is_zero_without_pivot(c) {
            t.dead[c] = true;
            Undo::Revive(c)
        } else {
            let saved = Box::new(t.clone());
            t.dead[c] = true;
            self.feasible = t.drive_to_zero(c);
            Undo::Restore(saved)
        };
        self.history.push(Step { was_feasible, undo });
    }

    /// Forces column `c` to be at least one.
    pub fn push_positive(&mut self, c: usize) {
        let was_feasible = self.feasible;
        let t = &mut self.tableau;
        let undo = if !was_feasible || t.shifted[c] {
            Undo::Nothing
        } else if t.dead[c] {
            self.feasible = false;
            Undo::Nothing
        } else {
            t.shift(c, true);
            if t.rhs.iter().all(|x| x.sign() >= 0) {
                Undo::Unshift(c)
            } else {
                t.shift(c, false);
                let saved = Box::new(t.clone());
                t.shift(c, true);
                self.feasible = t.repair();
                Undo::Restore(saved)
            }
        };
        self.history.push(Step { was_feasible, undo });
    }

    /// Forces at least one of `cols` to be non-zero.
    pub fn push_nonzero(&mut self, cols: impl IntoIterator<Item = usize>) {
        let cols: Vec<usize> = cols.into_iter().collect();
        let was_feasible = self.feasible;
        let t = &mut self.tableau;
        let undo = if !was_feasible || cols.iter().any(|&c| t.shifted[c]) {
            Undo::Nothing
        } else if cols.iter().all(|&c| t.dead[c]) {
            self.feasible = false;
            Undo::Nothing
        } else {
            let saved = Box::new(t.clone());
            self.feasible = t.require_nonzero(&cols);
            Undo::Restore(saved)
        };
        self.history.push(Step { was_feasible, undo });
    }

    /// Removes the most recently pushed constraint.
    pub fn pop(&mut self) {
        let Some(Step { was_feasible, undo }) = self.history.pop() else {
            return;
        };
        match undo {
            Undo::Nothing => (),
            Undo::Revive(c) => self.tableau.dead[c] = false,
            Undo::Unshift(c) => self.tableau.shift(c, false),
            Undo::Restore(saved) => self.tableau = *saved,
        }
        self.feasible = was_feasible;
    }
    /// Pops constraints until only `depth` remain.
    pub fn truncate(&mut self, depth: usize) {
        while self.history.len() > depth {
            self.pop();
        }
    }
}

/// Returns a basis for the rational kernel of the submatrix of `matrix` on
/// the given columns, as vectors indexed like `cols`.
pub(crate) fn kernel_basis(matrix: &MatrixInt, cols: &[usize]) -> Vec<Vec<Rational>> {
    let mut rows: Vec<Vec<Rational>> = matrix
        .iter_rows()
        .map(|row| cols.iter().map(|&c| Rational::from(row[c].clone())).collect())
        .filter(|row: &Vec<Rational>| row.iter().any(|x| !x.is_zero()))
        .collect();

    // Reduced row echelon form.
    let mut pivots = vec![];
    let mut r = 0;
    for c in 0..cols.len() {
        let Some(p) = (r..rows.len()).find(|&i| !rows[i][c].is_zero()) else {
            continue;
        };
        rows.swap(r, p);
        let lead = rows[r][c].clone();
        for x in &mut rows[r] {
            *x = &*x / &lead;
        }
        let pivot_row = rows[r].clone();
        for (i, row) in rows.iter_mut().enumerate() {
            if i == r || row[c].is_zero() {
                continue;
            }
            let factor = row[c].clone();
            for (x, p) in row.iter_mut().zip(&pivot_row) {
                *x = &*x - &(&factor * p);
            }
        }
        pivots.push(c);
        r += 1;
        if r == rows.len() {
            break;
        }
    }

    (0..cols.len())
        .filter(|c| !pivots.contains(c))
        .map(|free| {
            let mut v = vec![Rational::ZERO; cols.len()];
            v[free] = Rational::ONE;
            for (i, &p) in pivots.iter().enumerate() {
                v[p] = -&rows[i][free];
            }
            v
        })
        .collect()
}

/// Scales a rational vector to the primitive integer vector pointing the same
/// way, or returns `None` if it is zero or has entries of both signs.
pub(crate) fn primitive_nonnegative(v: &[Rational]) -> Option<Vec<Integer>> {
    let lcm = v.iter().fold(Integer::ONE, |acc, x| acc.lcm(x.denominator()));
    let mut ret: Vec<Integer> = v
        .iter()
        .map(|x| (x.numerator() * &lcm).div_exact(x.denominator()))
        .collect::<Result<_, _>>()
        .ok()?;
    let gcd = ret.iter().fold(Integer::ZERO, |acc, x| acc.gcd(x));
    if gcd.is_zero() {
        return None;
    }
    let flip = ret.iter().any(Integer::is_negative);
    for x in &mut ret {
        *x = (&*x).div_exact(&gcd).ok()?;
        if flip {
            x.negate();
        }
    }
    ret.iter().all(|x| !x.is_negative()).then_some(ret)
}

/// Divides an integer vector by the gcd of its entries.
pub(crate) fn make_primitive(v: &mut [Integer]) {
    let gcd = v.iter().fold(Integer::ZERO, |acc, x| acc.gcd(x));
    if gcd.is_zero() || gcd == 1 {
        return;
    }
    for x in v.iter_mut() {
        if let Ok(q) = x.div_exact(&gcd) {
            *x = q;
        }
    }
}
