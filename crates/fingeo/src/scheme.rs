//! Joint eigenspaces of commuting symmetric matrices.
//!
//! Given real symmetric matrices `M₁, …, M_r` that pairwise commute, the
//! space splits into joint eigenspaces on which every `Mᵢ` acts as an
//! integer scalar. The orthogonal projectors onto these spaces are the
//! primitive idempotents of the algebra the matrices generate.
//!
//! Splitting is iterative. Start from the whole space with the identity as
//! orthonormal basis `Q`. For each matrix in turn and each current piece,
//! restrict the matrix to the piece (`R = Qᵀ M Q`), diagonalize `R`, cluster
//! its eigenvalues to integers, and replace the piece by one sub-piece per
//! cluster (`Q · V_cluster`). The projector of a final piece is `Q Qᵀ`.
//!
//! # Example
//!
//! ```
//! use fingeo::config::Tolerance;
//! use fingeo::graph::Graph;
//! use fingeo::scheme::decompose;
//!
//! let c4 = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
//! let d = decompose(&[c4.adjacency_real()], Tolerance::default()).unwrap();
//! // Eigenvalues 2, 0, 0, -2.
//! let dims: Vec<usize> = d.idempotents().iter().map(|e| e.dimension).collect();
//! assert_eq!(dims, vec![1, 2, 1]);
//! assert!(d.verify(Tolerance::default()).passed);
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Tolerance;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::perm::Permutation;
use crate::spectral::{cluster_integral, is_symmetric, max_abs, symmetric_eigen, RealMatrix};

/// Orthogonal projector onto one joint eigenspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Idempotent {
    /// Eigenvalue of each input matrix on this space, in input order.
    pub eigenvalues: Vec<i64>,
    /// Dimension of the space (the trace of the projector).
    pub dimension: usize,
    /// The projector `E`.
    pub projector: RealMatrix,
}

/// Idempotent table row for the artifact writer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdempotentRecord {
    /// Position in the decomposition.
    pub index: usize,
    /// Eigenvalue signature.
    pub eigenvalues: Vec<i64>,
    /// Dimension.
    pub dimension: usize,
    /// Projector entries, row by row.
    pub coefficients: Vec<Vec<f64>>,
}

/// Residuals of the idempotent laws, each a maximal absolute entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IdempotentCheck {
    /// `max_i |Eᵢ Eᵢ − Eᵢ|`.
    pub idempotency: f64,
    /// `max_{i≠j} |Eᵢ Eⱼ|`.
    pub orthogonality: f64,
    /// `|Σ Eᵢ − I|`.
    pub completeness: f64,
    /// `max_{i,m} |Mₘ Eᵢ − θ_{m,i} Eᵢ|`.
    pub eigen_relation: f64,
    /// All residuals within the tolerance used for the check.
    pub passed: bool,
}

/// Primitive idempotents of a commuting family of symmetric matrices.
#[derive(Debug, Clone)]
pub struct Decomposition {
    order: usize,
    matrices: Vec<RealMatrix>,
    idempotents: Vec<Idempotent>,
}

impl Decomposition {
    /// Order of the matrices.
    pub fn order(&self) -> usize {
        self.order
    }

    /// The input matrices.
    pub fn matrices(&self) -> &[RealMatrix] {
        &self.matrices
    }

    /// Idempotents, ordered by descending eigenvalue of the first matrix,
    /// then of the second, and so on.
    pub fn idempotents(&self) -> &[Idempotent] {
        &self.idempotents
    }

    /// Number of joint eigenspaces.
    pub fn len(&self) -> usize {
        self.idempotents.len()
    }

    /// True for a decomposition of the zero-dimensional space.
    pub fn is_empty(&self) -> bool {
        self.idempotents.is_empty()
    }

    /// Eigenmatrix: row `i` holds the eigenvalue of every input matrix on idempotent `i`.
    pub fn eigenmatrix(&self) -> Vec<Vec<i64>> {
        self.idempotents.iter().map(|e| e.eigenvalues.clone()).collect()
    }

    /// `(eigenvalue signature, dimension)` of every idempotent.
    pub fn signature(&self) -> Vec<(Vec<i64>, usize)> {
        self.idempotents
            .iter()
            .map(|e| (e.eigenvalues.clone(), e.dimension))
            .collect()
    }

    /// Measure the idempotent laws.
    pub fn verify(&self, tol: Tolerance) -> IdempotentCheck {
        let n = self.order;
        let mut idempotency: f64 = 0.0;
        let mut orthogonality: f64 = 0.0;
        let mut eigen_relation: f64 = 0.0;
        let mut sum = RealMatrix::zeros(n, n);
        for (i, e) in self.idempotents.iter().enumerate() {
            let p = &e.projector;
            idempotency = idempotency.max(max_abs(&(p * p - p)));
            for other in &self.idempotents[i + 1..] {
                orthogonality = orthogonality.max(max_abs(&(p * &other.projector)));
            }
            for (m, &theta) in self.matrices.iter().zip(&e.eigenvalues) {
                eigen_relation = eigen_relation.max(max_abs(&(m * p - p * theta as f64)));
            }
            sum += p;
        }
        let completeness = max_abs(&(sum - RealMatrix::identity(n, n)));
        let t = tol.value();
        IdempotentCheck {
            idempotency,
            orthogonality,
            completeness,
            eigen_relation,
            passed: idempotency <= t && orthogonality <= t && completeness <= t && eigen_relation <= t,
        }
    }

    /// Idempotent table.
    pub fn records(&self) -> Vec<IdempotentRecord> {
        self.idempotents
            .iter()
            .enumerate()
            .map(|(index, e)| IdempotentRecord {
                index,
                eigenvalues: e.eigenvalues.clone(),
                dimension: e.dimension,
                coefficients: (0..self.order)
                    .map(|r| (0..self.order).map(|c| e.projector[(r, c)]).collect())
                    .collect(),
            })
            .collect()
    }
}

/// A piece of the space under refinement: orthonormal basis plus eigenvalues so far.
struct Piece {
    basis: RealMatrix,
    eigenvalues: Vec<i64>,
}

/// Split the space into joint integral eigenspaces of `matrices`.
///
/// # Errors
///
/// [`Error::InvalidInput`] for an empty family, non-square or unequal
/// orders, asymmetric or non-commuting matrices (within `tol`);
/// [`Error::NumericalInstability`] when a restricted eigenvalue is not
/// within `tol` of an integer.
pub fn decompose(matrices: &[RealMatrix], tol: Tolerance) -> Result<Decomposition> {
    let Some(first) = matrices.first() else {
        return Err(Error::invalid("no matrices to decompose"));
    };
    let n = first.nrows();
    for (i, m) in matrices.iter().enumerate() {
        if m.nrows() != n || m.ncols() != n {
            return Err(Error::invalid(format!(
                "matrix {i} is {}x{}, expected {n}x{n}",
                m.nrows(),
                m.ncols()
            )));
        }
        if !is_symmetric(m, tol) {
            return Err(Error::invalid(format!("matrix {i} is not symmetric")));
        }
    }
    for i in 0..matrices.len() {
        for j in i + 1..matrices.len() {
            let (a, b) = (&matrices[i], &matrices[j]);
            let defect = max_abs(&(a * b - b * a));
            if defect > tol.value() {
                return Err(Error::invalid(format!(
                    "matrices {i} and {j} do not commute (defect {defect:e})"
                )));
            }
        }
    }

    let mut pieces = if n == 0 {
        Vec::new()
    } else {
        vec![Piece {
            basis: RealMatrix::identity(n, n),
            eigenvalues: Vec::new(),
        }]
    };
    for (mi, m) in matrices.iter().enumerate() {
        let mut refined = Vec::with_capacity(pieces.len());
        for piece in pieces {
            let q = &piece.basis;
            let restricted = q.transpose() * m * q;
            let restricted = (&restricted + restricted.transpose()) * 0.5;
            let eig = symmetric_eigen(&restricted);
            let groups = cluster_integral(&eig.values, tol)?;
            if groups.len() > 1 {
                debug!(
                    matrix = mi,
                    dimension = q.ncols(),
                    parts = groups.len(),
                    "eigenspace split"
                );
            }
            for (value, members) in groups {
                let sub = RealMatrix::from_fn(eig.vectors.nrows(), members.len(), |r, c| {
                    eig.vectors[(r, members[c])]
                });
                let mut eigenvalues = piece.eigenvalues.clone();
                eigenvalues.push(value);
                refined.push(Piece {
                    basis: q * sub,
                    eigenvalues,
                });
            }
        }
        pieces = refined;
    }

    let idempotents: Vec<Idempotent> = pieces
        .into_iter()
        .map(|p| Idempotent {
            dimension: p.basis.ncols(),
            projector: &p.basis * p.basis.transpose(),
            eigenvalues: p.eigenvalues,
        })
        .collect();
    info!(
        order = n,
        matrices = matrices.len(),
        idempotents = idempotents.len(),
        "spectral decomposition complete"
    );
    Ok(Decomposition {
        order: n,
        matrices: matrices.to_vec(),
        idempotents,
    })
}

/// Real permutation matrix `P` with `P eᵢ = e_{π(i)}`.
///
/// Symmetric exactly when `π` is an involution; commutes with a graph's
/// adjacency matrix exactly when `π` is an automorphism.
pub fn permutation_matrix(perm: &Permutation) -> RealMatrix {
    let n = perm.len();
    let mut p = RealMatrix::zeros(n, n);
    for i in 0..n {
        p[(perm.apply(i), i)] = 1.0;
    }
    p
}

/// Adjacency matrices of the two non-identity relations of a graph:
/// adjacency and non-adjacency of distinct vertices.
///
/// For a strongly regular graph these span, with `I`, its Bose–Mesner
/// algebra, a commutative association scheme with three idempotents.
pub fn graph_relations(g: &Graph) -> [RealMatrix; 2] {
    [g.adjacency_real(), g.complement().adjacency_real()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    fn petersen() -> Graph {
        let mut edges = Vec::new();
        for i in 0..5 {
            edges.push((i, (i + 1) % 5));
            edges.push((i, i + 5));
            edges.push((5 + i, 5 + (i + 2) % 5));
        }
        Graph::from_edges(10, &edges).unwrap()
    }

    #[test]
    fn srg_scheme_has_three_idempotents() {
        let d = decompose(&graph_relations(&petersen()), tol()).unwrap();
        assert_eq!(
            d.signature(),
            vec![(vec![3, 6], 1), (vec![1, -2], 5), (vec![-2, 1], 4)]
        );
        let check = d.verify(tol());
        assert!(check.passed, "{check:?}");
    }

    #[test]
    fn involution_splits_eigenspaces() {
        // Reflection of the 4-cycle fixing 0 and 2.
        let c4 = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        let flip = Permutation::from_cycles(4, &[vec![1, 3]]).unwrap();
        let d = decompose(&[c4.adjacency_real(), permutation_matrix(&flip)], tol()).unwrap();
        assert_eq!(
            d.signature(),
            vec![(vec![2, 1], 1), (vec![0, 1], 1), (vec![0, -1], 1), (vec![-2, 1], 1)]
        );
        assert_eq!(d.eigenmatrix()[2], vec![0, -1]);
        assert!(d.verify(tol()).passed);
    }

    #[test]
    fn records_match_projectors() {
        let c4 = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        let d = decompose(&[c4.adjacency_real()], tol()).unwrap();
        let recs = d.records();
        assert_eq!(recs.len(), 3);
        // Projector onto the all-ones vector is J / 4.
        assert!(recs[0].coefficients.iter().flatten().all(|&x| (x - 0.25).abs() < 1e-9));
    }

    #[test]
    fn non_commuting_input_rejected() {
        let path = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let swap = permutation_matrix(&Permutation::from_cycles(3, &[vec![0, 1]]).unwrap());
        assert!(matches!(
            decompose(&[path.adjacency_real(), swap], tol()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn asymmetric_and_empty_input_rejected() {
        let cyc = permutation_matrix(&Permutation::new(vec![1, 2, 0]).unwrap());
        assert!(decompose(&[cyc], tol()).is_err());
        assert!(decompose(&[], tol()).is_err());
        let a = RealMatrix::identity(2, 2);
        let b = RealMatrix::identity(3, 3);
        assert!(decompose(&[a, b], tol()).is_err());
    }

    #[test]
    fn irrational_restriction_is_instability() {
        let c5 = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]).unwrap();
        assert!(matches!(
            decompose(&[c5.adjacency_real()], tol()),
            Err(Error::NumericalInstability { .. })
        ));
    }

    #[test]
    fn empty_space() {
        let d = decompose(&[RealMatrix::zeros(0, 0)], tol()).unwrap();
        assert!(d.is_empty());
        assert!(d.verify(tol()).passed);
    }
}
