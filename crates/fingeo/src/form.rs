//! Defining forms for incidence spaces.
//!
//! A [`Form`] is a pure evaluation function on coordinate vectors. Two points
//! are adjacent when the polar bilinear form vanishes on their
//! representatives; a point is singular when the form vanishes on it
//! (quadratic value for quadrics, `B(x, x)` otherwise).
//!
//! | Form | Polar `B(u, v)` | Singular when |
//! |------|-----------------|---------------|
//! | [`SymplecticForm`] | `Σ uᵢ v_{i+m} − u_{i+m} vᵢ` | always |
//! | [`SymmetricBilinearForm`] | `uᵀ G v` | `xᵀ G x = 0` |
//! | [`QuadraticForm`] | `uᵀ (C + Cᵀ) v` | `xᵀ C x = 0` |
//! | [`FnForm`] | caller-supplied | caller-supplied |

use core::fmt;

use crate::error::{Error, Result};
use crate::field::{FieldElement, PrimeField};
use crate::linalg::ModMatrix;

/// Pure evaluation of a form on GF(q)ⁿ.
pub trait Form: Send + Sync + fmt::Debug {
    /// The field the form is defined over.
    fn field(&self) -> PrimeField;

    /// Ambient dimension n.
    fn dimension(&self) -> usize;

    /// Polar bilinear form.
    fn polar(&self, u: &[FieldElement], v: &[FieldElement]) -> FieldElement;

    /// Whether `x` is a singular vector.
    fn is_singular(&self, x: &[FieldElement]) -> bool {
        self.polar(x, x).is_zero()
    }

    /// Stable textual identity, used as a memoization key and in reports.
    fn signature(&self) -> String;

    /// Closed-form number of singular projective points, where one is known.
    fn singular_point_count(&self) -> Option<u64> {
        None
    }
}

/// Standard alternating form on GF(q)^{2m}.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymplecticForm {
    field: PrimeField,
    half: usize,
}

impl SymplecticForm {
    /// Construct the form on GF(q)ⁿ.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for odd or zero `n`.
    pub fn new(field: PrimeField, n: usize) -> Result<Self> {
        if n == 0 || n % 2 != 0 {
            return Err(Error::invalid(format!(
                "symplectic form needs even positive dimension, got {n}"
            )));
        }
        Ok(Self { field, half: n / 2 })
    }

    /// Gram matrix `[[0, I], [−I, 0]]`.
    pub fn gram(&self) -> ModMatrix {
        let m = self.half;
        let f = self.field;
        ModMatrix::from_fn(f, 2 * m, 2 * m, |i, j| {
            if j == i + m {
                f.one()
            } else if i == j + m {
                f.neg(f.one())
            } else {
                f.zero()
            }
        })
    }
}

impl Form for SymplecticForm {
    fn field(&self) -> PrimeField {
        self.field
    }

    fn dimension(&self) -> usize {
        2 * self.half
    }

    fn polar(&self, u: &[FieldElement], v: &[FieldElement]) -> FieldElement {
        let f = self.field;
        let m = self.half;
        (0..m).fold(f.zero(), |acc, i| {
            let term = f.sub(f.mul(u[i], v[i + m]), f.mul(u[i + m], v[i]));
            f.add(acc, term)
        })
    }

    fn is_singular(&self, _x: &[FieldElement]) -> bool {
        true
    }

    fn signature(&self) -> String {
        format!("symplectic/{}", 2 * self.half)
    }

    fn singular_point_count(&self) -> Option<u64> {
        projective_point_count(self.field.modulus() as u64, 2 * self.half)
    }
}

/// Symmetric bilinear form `uᵀ G v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetricBilinearForm {
    gram: ModMatrix,
}

impl SymmetricBilinearForm {
    /// Wrap a symmetric Gram matrix.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when `gram` is not square and symmetric.
    pub fn new(gram: ModMatrix) -> Result<Self> {
        if !gram.is_square() || gram != gram.transpose() {
            return Err(Error::invalid("Gram matrix must be square and symmetric"));
        }
        Ok(Self { gram })
    }

    /// The Gram matrix.
    pub fn gram(&self) -> &ModMatrix {
        &self.gram
    }
}

impl Form for SymmetricBilinearForm {
    fn field(&self) -> PrimeField {
        self.gram.field()
    }

    fn dimension(&self) -> usize {
        self.gram.rows()
    }

    fn polar(&self, u: &[FieldElement], v: &[FieldElement]) -> FieldElement {
        bilinear(&self.gram, u, v)
    }

    fn signature(&self) -> String {
        format!("bilinear/{:?}", self.gram.to_rows())
    }

    fn singular_point_count(&self) -> Option<u64> {
        let det = self.gram.determinant().ok()?;
        quadric_point_count(self.field(), self.dimension(), det)
    }
}

/// Quadratic form `Q(x) = xᵀ C x` with polar form `uᵀ (C + Cᵀ) v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadraticForm {
    coefficients: ModMatrix,
    polar: ModMatrix,
}

impl QuadraticForm {
    /// Wrap a square coefficient matrix.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when `coefficients` is not square.
    pub fn new(coefficients: ModMatrix) -> Result<Self> {
        if !coefficients.is_square() {
            return Err(Error::invalid("quadratic form coefficients must be square"));
        }
        let f = coefficients.field();
        let t = coefficients.transpose();
        let n = coefficients.rows();
        let polar = ModMatrix::from_fn(f, n, n, |i, j| f.add(coefficients.get(i, j), t.get(i, j)));
        Ok(Self {
            coefficients,
            polar,
        })
    }

    /// `Q(x)`.
    pub fn value(&self, x: &[FieldElement]) -> FieldElement {
        bilinear(&self.coefficients, x, x)
    }

    /// Polar Gram matrix `C + Cᵀ`.
    pub fn polar_gram(&self) -> &ModMatrix {
        &self.polar
    }
}

impl Form for QuadraticForm {
    fn field(&self) -> PrimeField {
        self.coefficients.field()
    }

    fn dimension(&self) -> usize {
        self.coefficients.rows()
    }

    fn polar(&self, u: &[FieldElement], v: &[FieldElement]) -> FieldElement {
        bilinear(&self.polar, u, v)
    }

    fn is_singular(&self, x: &[FieldElement]) -> bool {
        self.value(x).is_zero()
    }

    fn signature(&self) -> String {
        format!("quadratic/{:?}", self.coefficients.to_rows())
    }

    fn singular_point_count(&self) -> Option<u64> {
        let f = self.field();
        if f.modulus() == 2 {
            return None;
        }
        // Symmetric Gram G = (C + Cᵀ)/2, so det G = det(C + Cᵀ) / 2ⁿ.
        let two_inv = f.inv(f.element(2)).ok()?;
        let det = f.mul(
            self.polar.determinant().ok()?,
            f.pow(two_inv, self.dimension() as u64),
        );
        quadric_point_count(f, self.dimension(), det)
    }
}

type PolarFn = dyn Fn(&[FieldElement], &[FieldElement]) -> FieldElement + Send + Sync;
type SingularFn = dyn Fn(&[FieldElement]) -> bool + Send + Sync;

/// A form given by caller-supplied evaluation closures.
pub struct FnForm {
    field: PrimeField,
    dimension: usize,
    label: String,
    polar: Box<PolarFn>,
    singular: Option<Box<SingularFn>>,
    singular_count: Option<u64>,
}

impl FnForm {
    /// Wrap a polar-form closure. `label` must identify the closure uniquely
    /// for memoization.
    pub fn new(
        field: PrimeField,
        dimension: usize,
        label: impl Into<String>,
        polar: impl Fn(&[FieldElement], &[FieldElement]) -> FieldElement + Send + Sync + 'static,
    ) -> Self {
        Self {
            field,
            dimension,
            label: label.into(),
            polar: Box::new(polar),
            singular: None,
            singular_count: None,
        }
    }

    /// Supply a dedicated singularity test (defaults to `B(x, x) = 0`).
    pub fn with_singular(
        mut self,
        singular: impl Fn(&[FieldElement]) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.singular = Some(Box::new(singular));
        self
    }

    /// Declare the expected number of singular projective points.
    pub fn with_singular_count(mut self, count: u64) -> Self {
        self.singular_count = Some(count);
        self
    }
}

impl fmt::Debug for FnForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnForm")
            .field("field", &self.field)
            .field("dimension", &self.dimension)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Form for FnForm {
    fn field(&self) -> PrimeField {
        self.field
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn polar(&self, u: &[FieldElement], v: &[FieldElement]) -> FieldElement {
        (self.polar)(u, v)
    }

    fn is_singular(&self, x: &[FieldElement]) -> bool {
        match &self.singular {
            Some(s) => s(x),
            None => self.polar(x, x).is_zero(),
        }
    }

    fn signature(&self) -> String {
        format!("fn/{}", self.label)
    }

    fn singular_point_count(&self) -> Option<u64> {
        self.singular_count
    }
}

fn bilinear(g: &ModMatrix, u: &[FieldElement], v: &[FieldElement]) -> FieldElement {
    let f = g.field();
    let mut acc = f.zero();
    for (i, &ui) in u.iter().enumerate() {
        if ui.is_zero() {
            continue;
        }
        acc = f.add(acc, f.mul(ui, f.dot(g.row(i), v)));
    }
    acc
}

/// Number of points of PG(n − 1, q): `(qⁿ − 1)/(q − 1)`.
pub fn projective_point_count(q: u64, n: usize) -> Option<u64> {
    if q < 2 || n == 0 {
        return Some(0);
    }
    let qn = q.checked_pow(u32::try_from(n).ok()?)?;
    Some((qn - 1) / (q - 1))
}

/// Kind of a non-degenerate quadric over an odd prime field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadricType {
    /// `n = 2m + 1`.
    Parabolic,
    /// `n = 2m`, maximal Witt index.
    Hyperbolic,
    /// `n = 2m`, Witt index `m − 1`.
    Elliptic,
}

/// Classify a non-degenerate quadric from the determinant of its symmetric Gram matrix.
///
/// Returns `None` for a degenerate quadric or characteristic 2.
pub fn classify_quadric(field: PrimeField, n: usize, gram_det: FieldElement) -> Option<QuadricType> {
    if field.modulus() == 2 || gram_det.is_zero() || n == 0 {
        return None;
    }
    if n % 2 == 1 {
        return Some(QuadricType::Parabolic);
    }
    let m = n / 2;
    let disc = if m % 2 == 0 {
        gram_det
    } else {
        field.neg(gram_det)
    };
    Some(if field.is_square(disc) {
        QuadricType::Hyperbolic
    } else {
        QuadricType::Elliptic
    })
}

/// Closed-form count of singular points on a non-degenerate quadric.
pub fn quadric_point_count(field: PrimeField, n: usize, gram_det: FieldElement) -> Option<u64> {
    let q = field.modulus() as u64;
    let kind = classify_quadric(field, n, gram_det)?;
    let m = u32::try_from(n / 2).ok()?;
    let count = match kind {
        QuadricType::Parabolic => (q.checked_pow(2 * m)? - 1) / (q - 1),
        QuadricType::Hyperbolic => (q.checked_pow(m)? - 1) * (q.checked_pow(m.checked_sub(1)?)? + 1) / (q - 1),
        QuadricType::Elliptic => (q.checked_pow(m)? + 1) * (q.checked_pow(m.checked_sub(1)?)? - 1) / (q - 1),
    };
    Some(count)
}
