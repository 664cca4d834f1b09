//! Incidence spaces over GF(q) built from a defining form.
//!
//! Construction enumerates every vector of GF(q)ⁿ, drops the zero vector,
//! normalizes the rest to canonical projective representatives (first
//! nonzero coordinate equal to 1), keeps the points selected by the
//! configuration, and joins two distinct points when the polar form
//! vanishes on them. Lines are the projective lines spanned by adjacent
//! singular points whose `q + 1` points are all present and mutually
//! adjacent.
//!
//! The result is checked against closed-form counts before it is returned:
//! a point count or line size that disagrees with the closed form is a
//! [`Error::StructuralMismatch`], never a partial structure.
//!
//! # Example
//!
//! ```
//! use fingeo::config::SpaceConfig;
//! use fingeo::incidence::IncidenceSpace;
//!
//! let w33 = IncidenceSpace::build(&SpaceConfig::symplectic(3, 4)).unwrap();
//! assert_eq!(w33.point_count(), 40);
//! assert_eq!(w33.lines().len(), 40);
//! assert!(w33.lines().iter().all(|l| l.points.len() == 4));
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{PointSelection, SpaceConfig};
use crate::error::{Error, Result};
use crate::field::{FieldElement, PrimeField};
use crate::form::{projective_point_count, Form};
use crate::graph::{EdgeRecord, Graph};
use crate::linalg::ModMatrix;
use crate::perm::Permutation;

/// Canonical representative of a point of PG(n − 1, q).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProjectivePoint {
    coords: Vec<FieldElement>,
}

impl ProjectivePoint {
    /// Normalize a vector so its first nonzero coordinate is 1.
    ///
    /// Returns `None` for the zero vector, which represents no point.
    pub fn normalize(field: PrimeField, v: &[FieldElement]) -> Option<Self> {
        let lead = v.iter().copied().find(|x| !x.is_zero())?;
        let inv = field.inv(lead).ok()?;
        Some(Self {
            coords: v.iter().map(|&x| field.mul(x, inv)).collect(),
        })
    }

    /// Canonical coordinates.
    #[inline]
    pub fn coords(&self) -> &[FieldElement] {
        &self.coords
    }
}

/// A line of the space: identifiers of its points, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Line {
    /// Point identifiers in ascending order.
    pub points: Vec<usize>,
}

/// Point table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointRecord {
    /// Point identifier.
    pub id: usize,
    /// Canonical coordinates.
    pub coordinates: Vec<u32>,
}

/// Line table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    /// Line identifier.
    pub id: usize,
    /// Identifiers of the points on the line.
    pub points: Vec<usize>,
}

/// Points, lines, and collinearity graph of a form over GF(q).
#[derive(Debug, Clone)]
pub struct IncidenceSpace {
    field: PrimeField,
    form: Arc<dyn Form>,
    selection: PointSelection,
    points: Vec<ProjectivePoint>,
    index: HashMap<ProjectivePoint, usize>,
    lines: Vec<Line>,
    graph: Graph,
}

impl IncidenceSpace {
    /// Build the space described by a configuration record.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for a malformed configuration,
    /// [`Error::StructuralMismatch`] when the construction disagrees with
    /// its closed-form counts.
    pub fn build(config: &SpaceConfig) -> Result<Self> {
        let (_, form) = config.instantiate()?;
        Self::from_form(form, config.points)
    }

    /// Build from an already instantiated form.
    ///
    /// # Errors
    ///
    /// As for [`IncidenceSpace::build`].
    pub fn from_form(form: Arc<dyn Form>, selection: PointSelection) -> Result<Self> {
        let field = form.field();
        let n = form.dimension();
        let q = field.modulus() as u64;
        let expected = match selection {
            PointSelection::All => projective_point_count(q, n),
            PointSelection::Singular => form.singular_point_count(),
        }
        .ok_or_else(|| {
            Error::invalid(format!(
                "no closed-form point count for {} with {selection:?} selection",
                form.signature()
            ))
        })?;

        let points = enumerate_points(field, n, |p| match selection {
            PointSelection::All => true,
            PointSelection::Singular => form.is_singular(p.coords()),
        })?;
        if points.len() as u64 != expected {
            return Err(Error::mismatch(
                format!("point count of {} over GF({q})", form.signature()),
                expected,
                points.len(),
            ));
        }
        let index: HashMap<_, _> = points
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, p)| (p, i))
            .collect();

        let graph = Graph::from_fn(points.len(), |i, j| {
            i != j && form.polar(points[i].coords(), points[j].coords()).is_zero()
        })?;
        debug!(
            points = points.len(),
            edges = graph.edge_count(),
            "collinearity graph built"
        );

        let mut space = Self {
            field,
            form,
            selection,
            points,
            index,
            lines: Vec::new(),
            graph,
        };
        space.lines = space.collect_lines()?;
        info!(
            form = %space.form.signature(),
            q,
            n,
            points = space.points.len(),
            lines = space.lines.len(),
            "incidence space constructed"
        );
        Ok(space)
    }

    fn collect_lines(&self) -> Result<Vec<Line>> {
        let f = self.field;
        let line_size = f.order() + 1;
        let mut lines = BTreeSet::new();
        for (a, b) in self.graph.edges() {
            let (u, v) = (self.points[a].coords(), self.points[b].coords());
            if !self.form.is_singular(u) || !self.form.is_singular(v) {
                continue;
            }
            let mut members = vec![a, b];
            let mut complete = true;
            for c in f.elements() {
                let w: Vec<_> = v.iter().zip(u).map(|(&y, &x)| f.add(y, f.mul(c, x))).collect();
                match ProjectivePoint::normalize(f, &w).and_then(|p| self.index.get(&p)) {
                    Some(&id) if id != b => members.push(id),
                    Some(_) => {}
                    None => complete = false,
                }
            }
            if !complete {
                continue;
            }
            members.sort_unstable();
            members.dedup();
            lines.insert(Line { points: members });
        }
        for line in &lines {
            if line.points.len() != line_size {
                return Err(Error::mismatch(
                    "line cardinality",
                    line_size,
                    line.points.len(),
                ));
            }
            for (i, &x) in line.points.iter().enumerate() {
                if let Some(&y) = line.points[i + 1..].iter().find(|&&y| !self.graph.is_adjacent(x, y)) {
                    return Err(Error::mismatch(
                        format!("collinearity of points {x} and {y} on a line"),
                        "adjacent",
                        "non-adjacent",
                    ));
                }
            }
        }
        Ok(lines.into_iter().collect())
    }

    /// Field of definition.
    pub fn field(&self) -> PrimeField {
        self.field
    }

    /// Defining form.
    pub fn form(&self) -> &Arc<dyn Form> {
        &self.form
    }

    /// Point selection rule used.
    pub fn selection(&self) -> PointSelection {
        self.selection
    }

    /// Ambient dimension n.
    pub fn dimension(&self) -> usize {
        self.form.dimension()
    }

    /// Number of points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Points in identifier order.
    pub fn points(&self) -> &[ProjectivePoint] {
        &self.points
    }

    /// Identifier of a point, if it belongs to the space.
    pub fn point_id(&self, p: &ProjectivePoint) -> Option<usize> {
        self.index.get(p).copied()
    }

    /// Lines in lexicographic order of their point sets.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Collinearity graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Point × line 0/1 incidence matrix over the field of definition.
    pub fn incidence_matrix(&self) -> ModMatrix {
        let mut on = vec![false; self.points.len() * self.lines.len()];
        for (j, line) in self.lines.iter().enumerate() {
            for &p in &line.points {
                on[p * self.lines.len() + j] = true;
            }
        }
        let cols = self.lines.len();
        ModMatrix::from_fn(self.field, self.points.len(), cols, |i, j| {
            if on[i * cols + j] {
                FieldElement::ONE
            } else {
                FieldElement::ZERO
            }
        })
    }

    /// Point table.
    pub fn point_records(&self) -> Vec<PointRecord> {
        self.points
            .iter()
            .enumerate()
            .map(|(id, p)| PointRecord {
                id,
                coordinates: p.coords().iter().map(|x| x.value()).collect(),
            })
            .collect()
    }

    /// Line table.
    pub fn line_records(&self) -> Vec<LineRecord> {
        self.lines
            .iter()
            .enumerate()
            .map(|(id, l)| LineRecord {
                id,
                points: l.points.clone(),
            })
            .collect()
    }

    /// Edge table of the collinearity graph.
    pub fn edge_records(&self) -> Vec<EdgeRecord> {
        self.graph.edge_records()
    }

    /// Permutation of points induced by `x ↦ M x`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for a matrix of the wrong shape or field,
    /// [`Error::SingularMatrix`] for a non-invertible matrix,
    /// [`Error::StructuralMismatch`] if some point is mapped outside the space.
    pub fn induced_permutation(&self, m: &ModMatrix) -> Result<Permutation> {
        let n = self.dimension();
        if m.rows() != n || m.cols() != n || m.field() != self.field {
            return Err(Error::invalid(format!(
                "expected a {n}x{n} matrix over GF({})",
                self.field.modulus()
            )));
        }
        let rank = m.rank();
        if rank < n {
            return Err(Error::SingularMatrix { rank, dimension: n });
        }
        let mut images = Vec::with_capacity(self.points.len());
        for (i, p) in self.points.iter().enumerate() {
            let w = m.mul_vec(p.coords())?;
            let id = ProjectivePoint::normalize(self.field, &w)
                .and_then(|img| self.point_id(&img))
                .ok_or_else(|| {
                    Error::mismatch(format!("image of point {i}"), "a point of the space", "outside")
                })?;
            images.push(id);
        }
        Permutation::new(images)
    }

    /// True if `M` is an isometry of the defining form (checked on basis pairs).
    pub fn preserves_form(&self, m: &ModMatrix) -> bool {
        let n = self.dimension();
        if m.rows() != n || m.cols() != n || m.field() != self.field {
            return false;
        }
        let basis: Vec<Vec<FieldElement>> = (0..n).map(|i| unit(n, i)).collect();
        let images: Vec<Vec<FieldElement>> = (0..n)
            .map(|j| (0..n).map(|i| m.get(i, j)).collect())
            .collect();
        (0..n).all(|i| {
            self.form.is_singular(&images[i]) == self.form.is_singular(&basis[i])
                && (0..n).all(|j| {
                    self.form.polar(&images[i], &images[j]) == self.form.polar(&basis[i], &basis[j])
                })
        })
    }

    /// Transvection `x ↦ x + c·B(x, v)·v` as a matrix.
    ///
    /// For an alternating form this is an isometry for every `c`, and the
    /// transvections generate the full symplectic group.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when `v` has the wrong length.
    pub fn transvection(&self, v: &[FieldElement], c: FieldElement) -> Result<ModMatrix> {
        let n = self.dimension();
        if v.len() != n {
            return Err(Error::invalid(format!("vector of length {} in dimension {n}", v.len())));
        }
        let f = self.field;
        Ok(ModMatrix::from_fn(f, n, n, |i, j| {
            let shift = f.mul(f.mul(c, self.form.polar(&unit(n, j), v)), v[i]);
            let delta = if i == j { f.one() } else { f.zero() };
            f.add(delta, shift)
        }))
    }

    /// Point permutations induced by the transvections along every point
    /// representative with `c = 1`.
    ///
    /// # Errors
    ///
    /// Propagates [`IncidenceSpace::induced_permutation`] failures, which
    /// occur when the transvections do not preserve the point set.
    pub fn transvection_generators(&self) -> Result<Vec<Permutation>> {
        self.points
            .iter()
            .map(|p| {
                let t = self.transvection(p.coords(), self.field.one())?;
                self.induced_permutation(&t)
            })
            .collect()
    }
}

fn unit(n: usize, i: usize) -> Vec<FieldElement> {
    let mut e = vec![FieldElement::ZERO; n];
    e[i] = FieldElement::ONE;
    e
}

/// Enumerate GF(q)ⁿ, skip the zero vector, normalize, dedupe, filter.
fn enumerate_points(
    field: PrimeField,
    n: usize,
    keep: impl Fn(&ProjectivePoint) -> bool,
) -> Result<Vec<ProjectivePoint>> {
    let q = field.modulus();
    let total = (q as u64)
        .checked_pow(u32::try_from(n).map_err(|_| Error::invalid("dimension too large"))?)
        .ok_or_else(|| Error::invalid(format!("GF({q})^{n} is too large to enumerate")))?;
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut seen = BTreeSet::new();
    let mut digits = vec![0u32; n];
    for _ in 0..total {
        let v: Vec<FieldElement> = digits.iter().map(|&d| field.element(d as u64)).collect();
        if let Some(p) = ProjectivePoint::normalize(field, &v) {
            if keep(&p) {
                seen.insert(p);
            }
        }
        // Odometer increment, last coordinate fastest.
        for d in digits.iter_mut().rev() {
            *d += 1;
            if *d < q {
                break;
            }
            *d = 0;
        }
    }
    Ok(seen.into_iter().collect())
}

/// Memo of constructed spaces keyed by field order, dimension, form
/// signature and point selection.
///
/// The cache is an ordinary owned value; callers decide its lifetime.
#[derive(Debug, Default)]
pub struct SpaceCache {
    spaces: HashMap<SpaceKey, Arc<IncidenceSpace>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SpaceKey {
    field_order: u32,
    dimension: usize,
    signature: String,
    selection: PointSelection,
}

impl SpaceCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached space for `config`, building it on first request.
    ///
    /// # Errors
    ///
    /// As for [`IncidenceSpace::build`]; failures are not cached.
    pub fn get_or_build(&mut self, config: &SpaceConfig) -> Result<Arc<IncidenceSpace>> {
        let (_, form) = config.instantiate()?;
        self.get_or_build_form(form, config.points)
    }

    /// As [`SpaceCache::get_or_build`] for an instantiated form.
    ///
    /// # Errors
    ///
    /// As for [`IncidenceSpace::from_form`].
    pub fn get_or_build_form(
        &mut self,
        form: Arc<dyn Form>,
        selection: PointSelection,
    ) -> Result<Arc<IncidenceSpace>> {
        let key = SpaceKey {
            field_order: form.field().modulus(),
            dimension: form.dimension(),
            signature: form.signature(),
            selection,
        };
        if let Some(space) = self.spaces.get(&key) {
            return Ok(Arc::clone(space));
        }
        let space = Arc::new(IncidenceSpace::from_form(form, selection)?);
        self.spaces.insert(key, Arc::clone(&space));
        Ok(space)
    }

    /// Number of cached spaces.
    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    /// True when nothing has been built yet.
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FnForm;

    #[test]
    fn normalize_rejects_zero_and_scales() {
        let f = PrimeField::new(5).unwrap();
        assert!(ProjectivePoint::normalize(f, &[f.zero(), f.zero()]).is_none());
        let p = ProjectivePoint::normalize(f, &[f.zero(), f.element(3), f.element(1)]).unwrap();
        assert_eq!(p.coords()[1], f.one());
        assert_eq!(p.coords()[2], f.element(2)); // 1 · 3⁻¹ = 2
        let q = ProjectivePoint::normalize(f, &[f.zero(), f.element(1), f.element(2)]).unwrap();
        assert_eq!(p, q);
    }

    #[test]
    fn projective_plane_counts() {
        // Orthogonality w.r.t. the dot product on all points of PG(2, 3).
        let space = IncidenceSpace::build(&SpaceConfig {
            field_order: 3,
            dimension: 3,
            form: crate::config::FormSpec::Bilinear {
                gram: vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]],
            },
            points: PointSelection::All,
        })
        .unwrap();
        assert_eq!(space.point_count(), 13);
        // Each point's polar is a line of 4 points; drop the point itself if isotropic.
        assert!(space.graph().edge_count() > 0);
    }

    #[test]
    fn symplectic_plane_lines() {
        // W(1, q): every pair of distinct points of PG(1, q) is non-orthogonal.
        let space = IncidenceSpace::build(&SpaceConfig::symplectic(5, 2)).unwrap();
        assert_eq!(space.point_count(), 6);
        assert_eq!(space.graph().edge_count(), 0);
        assert!(space.lines().is_empty());
    }

    #[test]
    fn missing_closed_form_is_invalid_input() {
        let f = PrimeField::new(3).unwrap();
        let form: Arc<dyn Form> = Arc::new(FnForm::new(f, 3, "dot", move |u, v| f.dot(u, v)));
        assert!(matches!(
            IncidenceSpace::from_form(form, PointSelection::Singular),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn wrong_declared_count_is_structural_mismatch() {
        let f = PrimeField::new(3).unwrap();
        let form: Arc<dyn Form> = Arc::new(
            FnForm::new(f, 3, "dot-wrong", move |u, v| f.dot(u, v)).with_singular_count(5),
        );
        // x² + y² + z² = 0 over GF(3) is a conic with 4 points.
        match IncidenceSpace::from_form(form, PointSelection::Singular) {
            Err(Error::StructuralMismatch { expected, found, .. }) => {
                assert_eq!(expected, "5");
                assert_eq!(found, "4");
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn cache_reuses_spaces() {
        let mut cache = SpaceCache::new();
        let a = cache.get_or_build(&SpaceConfig::symplectic(3, 4)).unwrap();
        let b = cache.get_or_build(&SpaceConfig::symplectic(3, 4)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let _ = cache.get_or_build(&SpaceConfig::symplectic(2, 4)).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn transvections_preserve_symplectic_form() {
        let space = IncidenceSpace::build(&SpaceConfig::symplectic(3, 4)).unwrap();
        let f = space.field();
        let v = space.points()[7].coords().to_vec();
        let t = space.transvection(&v, f.element(2)).unwrap();
        assert!(space.preserves_form(&t));
        let perm = space.induced_permutation(&t).unwrap();
        assert!(space.graph().is_automorphism(&perm));
        // The centre of the transvection is fixed.
        assert_eq!(perm.apply(7), 7);
    }

    #[test]
    fn singular_matrix_has_no_induced_permutation() {
        let space = IncidenceSpace::build(&SpaceConfig::symplectic(3, 4)).unwrap();
        let zero = ModMatrix::zeros(space.field(), 4, 4);
        assert!(matches!(
            space.induced_permutation(&zero),
            Err(Error::SingularMatrix { rank: 0, dimension: 4 })
        ));
    }

    #[test]
    fn records_are_consistent() {
        let space = IncidenceSpace::build(&SpaceConfig::symplectic(3, 4)).unwrap();
        let pts = space.point_records();
        assert_eq!(pts.len(), 40);
        assert_eq!(pts[0].coordinates.len(), 4);
        assert_eq!(space.line_records().len(), 40);
        assert_eq!(space.edge_records().len(), 240);
        let inc = space.incidence_matrix();
        assert_eq!((inc.rows(), inc.cols()), (40, 40));
    }
}
