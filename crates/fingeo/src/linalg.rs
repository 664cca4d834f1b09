//! Exact linear algebra over GF(p).
//!
//! [`ModMatrix`] is a dense row-major matrix of [`FieldElement`]s tied to the
//! [`PrimeField`] that produced them. Every elimination routine is the same
//! Gauss–Jordan pass ([`ModMatrix::rref`]): pick any nonzero pivot in the
//! column, scale the pivot row by its inverse, clear the column in every
//! other row.
//!
//! Floating-point matrices never enter this module. The one crossing point
//! into the real domain is [`ModMatrix::lift_to_real`].
//!
//! # Example
//!
//! ```
//! use fingeo::field::PrimeField;
//! use fingeo::linalg::ModMatrix;
//!
//! let f = PrimeField::new(3).unwrap();
//! let m = ModMatrix::from_rows(f, &[vec![1, 2], vec![2, 1]]).unwrap();
//! assert_eq!(m.rank(), 1); // second row = 2 · first row mod 3
//! let k = m.kernel_basis();
//! assert_eq!(k.len(), 1);
//! assert!(m.mul_vec(&k[0]).unwrap().iter().all(|x| x.is_zero()));
//! ```

use serde::Serialize;

use crate::error::{Error, Result};
use crate::field::{FieldElement, PrimeField};
use crate::spectral::RealMatrix;

/// Dense matrix over GF(p).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModMatrix {
    field: PrimeField,
    rows: usize,
    cols: usize,
    data: Vec<FieldElement>,
}

/// Reduced row echelon form together with its pivot columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Echelon {
    /// The reduced matrix.
    pub matrix: ModMatrix,
    /// Pivot column of each nonzero row, in row order.
    pub pivots: Vec<usize>,
}

impl ModMatrix {
    /// The `rows × cols` zero matrix.
    pub fn zeros(field: PrimeField, rows: usize, cols: usize) -> Self {
        Self {
            field,
            rows,
            cols,
            data: vec![FieldElement::ZERO; rows * cols],
        }
    }

    /// The `n × n` identity.
    pub fn identity(field: PrimeField, n: usize) -> Self {
        Self::from_fn(field, n, n, |i, j| {
            if i == j {
                FieldElement::ONE
            } else {
                FieldElement::ZERO
            }
        })
    }

    /// Build entry-by-entry.
    pub fn from_fn(
        field: PrimeField,
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> FieldElement,
    ) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self {
            field,
            rows,
            cols,
            data,
        }
    }

    /// Build from signed integer rows, reducing each entry mod p.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for ragged rows.
    pub fn from_rows(field: PrimeField, rows: &[Vec<i64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(Error::invalid(format!(
                "row {bad} has {} entries, expected {cols}",
                rows[bad].len()
            )));
        }
        Ok(Self::from_fn(field, rows.len(), cols, |i, j| {
            field.element_signed(rows[i][j])
        }))
    }

    /// Build from rows of field elements (e.g. coordinate vectors).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for ragged rows.
    pub fn from_element_rows(field: PrimeField, rows: &[Vec<FieldElement>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(Error::invalid("ragged element rows"));
        }
        Ok(Self {
            field,
            rows: rows.len(),
            cols,
            data: rows.iter().flatten().copied().collect(),
        })
    }

    /// Field of the entries.
    #[inline]
    pub const fn field(&self) -> PrimeField {
        self.field
    }

    /// Row count.
    #[inline]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    #[inline]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// True when `rows == cols`.
    #[inline]
    pub const fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Entry `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> FieldElement {
        self.data[i * self.cols + j]
    }

    /// Row `i` as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[FieldElement] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Integer representatives, row by row.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        (0..self.rows)
            .map(|i| self.row(i).iter().map(|x| x.value()).collect())
            .collect()
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, v: FieldElement) {
        self.data[i * self.cols + j] = v;
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for j in 0..self.cols {
            self.data.swap(a * self.cols + j, b * self.cols + j);
        }
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.field, self.cols, self.rows, |i, j| self.get(j, i))
    }

    /// Matrix product `self · rhs`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] on a field or shape mismatch.
    pub fn mul(&self, rhs: &Self) -> Result<Self> {
        self.check_field(rhs)?;
        if self.cols != rhs.rows {
            return Err(Error::invalid(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )));
        }
        let f = self.field;
        let mut out = Self::zeros(f, self.rows, rhs.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(i, k);
                if a.is_zero() {
                    continue;
                }
                for j in 0..rhs.cols {
                    let cur = out.get(i, j);
                    out.set(i, j, f.add(cur, f.mul(a, rhs.get(k, j))));
                }
            }
        }
        Ok(out)
    }

    /// Matrix–vector product `self · v`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when `v.len() != cols`.
    pub fn mul_vec(&self, v: &[FieldElement]) -> Result<Vec<FieldElement>> {
        if v.len() != self.cols {
            return Err(Error::invalid(format!(
                "vector of length {} against {} columns",
                v.len(),
                self.cols
            )));
        }
        Ok((0..self.rows).map(|i| self.field.dot(self.row(i), v)).collect())
    }

    fn check_field(&self, other: &Self) -> Result<()> {
        if self.field != other.field {
            return Err(Error::invalid(format!(
                "field mismatch: GF({}) vs GF({})",
                self.field.modulus(),
                other.field.modulus()
            )));
        }
        Ok(())
    }

    /// Reduced row echelon form by Gauss–Jordan elimination.
    pub fn rref(&self) -> Echelon {
        let f = self.field;
        let mut m = self.clone();
        let mut pivots = Vec::new();
        let mut row = 0;
        for col in 0..m.cols {
            if row == m.rows {
                break;
            }
            // Only zero has no inverse, so the pivot is the first invertible entry.
            let Some((pivot, inv)) =
                (row..m.rows).find_map(|r| f.inv(m.get(r, col)).ok().map(|inv| (r, inv)))
            else {
                continue;
            };
            m.swap_rows(row, pivot);
            for j in col..m.cols {
                let v = m.get(row, j);
                m.set(row, j, f.mul(v, inv));
            }
            for r in 0..m.rows {
                if r == row {
                    continue;
                }
                let factor = m.get(r, col);
                if factor.is_zero() {
                    continue;
                }
                for j in col..m.cols {
                    let v = f.sub(m.get(r, j), f.mul(factor, m.get(row, j)));
                    m.set(r, j, v);
                }
            }
            pivots.push(col);
            row += 1;
        }
        Echelon { matrix: m, pivots }
    }

    /// Rank over GF(p).
    pub fn rank(&self) -> usize {
        self.rref().pivots.len()
    }

    /// Basis of the right kernel `{v : self · v ≡ 0}`.
    ///
    /// One vector per non-pivot column: the free coordinate is set to 1 and
    /// each pivot coordinate is read off the reduced row by back-substitution.
    pub fn kernel_basis(&self) -> Vec<Vec<FieldElement>> {
        let f = self.field;
        let Echelon { matrix, pivots } = self.rref();
        let mut is_pivot = vec![false; self.cols];
        for &c in &pivots {
            is_pivot[c] = true;
        }
        (0..self.cols)
            .filter(|&c| !is_pivot[c])
            .map(|free| {
                let mut v = vec![FieldElement::ZERO; self.cols];
                v[free] = FieldElement::ONE;
                for (r, &pc) in pivots.iter().enumerate() {
                    v[pc] = f.neg(matrix.get(r, free));
                }
                v
            })
            .collect()
    }

    /// Inverse of a square full-rank matrix, with `A · A⁻¹ ≡ I (mod p)`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for non-square input,
    /// [`Error::SingularMatrix`] when the rank is below the dimension.
    pub fn invert(&self) -> Result<Self> {
        if !self.is_square() {
            return Err(Error::invalid(format!(
                "cannot invert a {}x{} matrix",
                self.rows, self.cols
            )));
        }
        let n = self.rows;
        let augmented = Self::from_fn(self.field, n, 2 * n, |i, j| {
            if j < n {
                self.get(i, j)
            } else if j - n == i {
                FieldElement::ONE
            } else {
                FieldElement::ZERO
            }
        });
        let Echelon { matrix, pivots } = augmented.rref();
        let rank = pivots.iter().take_while(|&&c| c < n).count();
        if rank < n {
            return Err(Error::SingularMatrix { rank, dimension: n });
        }
        Ok(Self::from_fn(self.field, n, n, |i, j| matrix.get(i, n + j)))
    }

    /// Determinant of a square matrix.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for non-square input.
    pub fn determinant(&self) -> Result<FieldElement> {
        if !self.is_square() {
            return Err(Error::invalid("determinant of a non-square matrix"));
        }
        let f = self.field;
        let n = self.rows;
        let mut m = self.clone();
        let mut det = FieldElement::ONE;
        for col in 0..n {
            let Some(pivot) = (col..n).find(|&r| !m.get(r, col).is_zero()) else {
                return Ok(FieldElement::ZERO);
            };
            if pivot != col {
                m.swap_rows(pivot, col);
                det = f.neg(det);
            }
            let p = m.get(col, col);
            det = f.mul(det, p);
            let inv = f.inv(p)?;
            for r in col + 1..n {
                let factor = f.mul(m.get(r, col), inv);
                if factor.is_zero() {
                    continue;
                }
                for j in col..n {
                    let v = f.sub(m.get(r, j), f.mul(factor, m.get(col, j)));
                    m.set(r, j, v);
                }
            }
        }
        Ok(det)
    }

    /// Lift the integer representatives into a real matrix.
    ///
    /// This is the only conversion between the exact and the floating-point
    /// domains. Representatives are taken in `[0, p)`, so a 0/1 incidence or
    /// adjacency matrix lifts to the same 0/1 real matrix.
    pub fn lift_to_real(&self) -> RealMatrix {
        RealMatrix::from_fn(self.rows, self.cols, |i, j| self.get(i, j).value() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gf(p: u32) -> PrimeField {
        PrimeField::new(p).unwrap()
    }

    #[test]
    fn rank_of_identity_and_zero() {
        let f = gf(5);
        assert_eq!(ModMatrix::identity(f, 4).rank(), 4);
        assert_eq!(ModMatrix::zeros(f, 3, 4).rank(), 0);
    }

    #[test]
    fn rank_depends_on_characteristic() {
        // det = 3: singular mod 3, invertible mod 2 and mod 5.
        let rows = [vec![1, 1], vec![-1, 2]];
        assert_eq!(ModMatrix::from_rows(gf(3), &rows).unwrap().rank(), 1);
        assert_eq!(ModMatrix::from_rows(gf(2), &rows).unwrap().rank(), 2);
        assert_eq!(ModMatrix::from_rows(gf(5), &rows).unwrap().rank(), 2);
    }

    #[test]
    fn ragged_rows_rejected() {
        assert!(ModMatrix::from_rows(gf(3), &[vec![1, 2], vec![1]]).is_err());
    }

    #[test]
    fn rref_pivots() {
        let m = ModMatrix::from_rows(gf(7), &[vec![0, 2, 4], vec![0, 1, 2], vec![3, 0, 1]]).unwrap();
        let e = m.rref();
        assert_eq!(e.pivots, vec![0, 1]);
        assert_eq!(e.matrix.get(0, 0).value(), 1);
        assert_eq!(e.matrix.get(1, 1).value(), 1);
        assert!(e.matrix.row(2).iter().all(|x| x.is_zero()));
    }

    #[test]
    fn rref_scales_every_pivot_row() {
        let f = gf(5);
        let m = ModMatrix::from_rows(f, &[vec![0, 2], vec![0, 0], vec![3, 1]]).unwrap();
        let e = m.rref();
        assert_eq!(e.pivots, vec![0, 1]);
        assert_eq!(
            e.matrix,
            ModMatrix::from_rows(f, &[vec![1, 0], vec![0, 1], vec![0, 0]]).unwrap()
        );
    }

    #[test]
    fn kernel_of_wide_matrix() {
        let f = gf(3);
        let m = ModMatrix::from_rows(f, &[vec![1, 1, 1, 0], vec![0, 1, 2, 1]]).unwrap();
        let k = m.kernel_basis();
        assert_eq!(k.len(), 2);
        for v in &k {
            assert!(m.mul_vec(v).unwrap().iter().all(|x| x.is_zero()));
        }
        let basis = ModMatrix::from_element_rows(f, &k).unwrap();
        assert_eq!(basis.rank(), 2);
    }

    #[test]
    fn kernel_of_full_rank_is_empty() {
        assert!(ModMatrix::identity(gf(11), 3).kernel_basis().is_empty());
    }

    #[test]
    fn inverse_round_trip() {
        let f = gf(7);
        let m = ModMatrix::from_rows(f, &[vec![2, 3, 1], vec![1, 0, 4], vec![5, 6, 0]]).unwrap();
        let inv = m.invert().unwrap();
        assert_eq!(m.mul(&inv).unwrap(), ModMatrix::identity(f, 3));
        assert_eq!(inv.mul(&m).unwrap(), ModMatrix::identity(f, 3));
        assert_eq!(inv.invert().unwrap(), m);
    }

    #[test]
    fn singular_inverse_reports_rank() {
        let m = ModMatrix::from_rows(gf(2), &[vec![1, 1], vec![1, 1]]).unwrap();
        assert_eq!(
            m.invert(),
            Err(Error::SingularMatrix {
                rank: 1,
                dimension: 2
            })
        );
    }

    #[test]
    fn non_square_inverse_rejected() {
        assert!(matches!(
            ModMatrix::zeros(gf(3), 2, 3).invert(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn determinant_matches_rank() {
        let f = gf(5);
        let m = ModMatrix::from_rows(f, &[vec![1, 2], vec![3, 4]]).unwrap();
        // 4 - 6 = -2 ≡ 3
        assert_eq!(m.determinant().unwrap().value(), 3);
        let s = ModMatrix::from_rows(f, &[vec![1, 2], vec![2, 4]]).unwrap();
        assert!(s.determinant().unwrap().is_zero());
    }

    #[test]
    fn mixed_fields_rejected() {
        let a = ModMatrix::identity(gf(3), 2);
        let b = ModMatrix::identity(gf(5), 2);
        assert!(a.mul(&b).is_err());
    }

    #[test]
    fn lift_preserves_representatives() {
        let m = ModMatrix::from_rows(gf(3), &[vec![0, 1], vec![-1, 0]]).unwrap();
        let r = m.lift_to_real();
        assert_eq!(r[(0, 1)], 1.0);
        assert_eq!(r[(1, 0)], 2.0);
    }
}
