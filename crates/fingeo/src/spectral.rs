//! Floating-point eigen-decomposition helpers.
//!
//! This is the real-arithmetic side of the exact/real boundary: it only ever
//! sees [`RealMatrix`] values, obtained from exact data through
//! [`crate::linalg::ModMatrix::lift_to_real`] or [`crate::graph::Graph::adjacency_real`].
//! Decomposition uses `nalgebra::SymmetricEigen`; eigenvalues are returned in
//! descending order with their eigenvectors as matching columns.

use nalgebra::{DMatrix, SymmetricEigen};

use crate::config::Tolerance;
use crate::error::{Error, Result};

/// Dense real matrix.
pub type RealMatrix = DMatrix<f64>;

/// Eigenvalues (descending) and orthonormal eigenvectors (matching columns).
#[derive(Debug, Clone)]
pub struct EigenPairs {
    /// Eigenvalues, largest first.
    pub values: Vec<f64>,
    /// Column `i` is the unit eigenvector for `values[i]`.
    pub vectors: RealMatrix,
}

/// Eigen-decomposition of a real symmetric matrix.
pub fn symmetric_eigen(m: &RealMatrix) -> EigenPairs {
    let n = m.nrows();
    if n == 0 {
        return EigenPairs {
            values: Vec::new(),
            vectors: RealMatrix::zeros(0, 0),
        };
    }
    let eigen = SymmetricEigen::new(m.clone());
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));
    let values = order.iter().map(|&i| eigen.eigenvalues[i]).collect();
    let vectors = RealMatrix::from_fn(n, n, |r, c| eigen.eigenvectors[(r, order[c])]);
    EigenPairs { values, vectors }
}

/// A run of eigenvalues equal within tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Mean of the members.
    pub value: f64,
    /// Positions of the members in the input slice.
    pub indices: Vec<usize>,
}

/// Group a descending slice into runs whose neighbours differ by at most `tol`.
pub fn cluster_real(sorted_desc: &[f64], tol: Tolerance) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut last = f64::INFINITY;
    for (i, &v) in sorted_desc.iter().enumerate() {
        match clusters.last_mut() {
            Some(c) if (last - v).abs() <= tol.value() => c.indices.push(i),
            _ => clusters.push(Cluster {
                value: v,
                indices: vec![i],
            }),
        }
        last = v;
    }
    for c in &mut clusters {
        c.value = c.indices.iter().map(|&i| sorted_desc[i]).sum::<f64>() / c.indices.len() as f64;
    }
    clusters
}

/// Round to the nearest integer, failing when the deviation exceeds `tol`.
///
/// # Errors
///
/// [`Error::NumericalInstability`] with the raw deviation.
pub fn nearest_integer(value: f64, tol: Tolerance) -> Result<i64> {
    let nearest = value.round();
    let deviation = (value - nearest).abs();
    if !deviation.is_finite() || deviation > tol.value() {
        return Err(Error::NumericalInstability {
            value,
            nearest: nearest as i64,
            deviation,
            tolerance: tol.value(),
        });
    }
    Ok(nearest as i64)
}

/// Group eigenvalues by their integer value. Each value must round within `tol`.
///
/// Output is ordered by descending integer, positions refer to the input slice.
///
/// # Errors
///
/// [`Error::NumericalInstability`] for the first non-integral value.
pub fn cluster_integral(values: &[f64], tol: Tolerance) -> Result<Vec<(i64, Vec<usize>)>> {
    let mut groups: Vec<(i64, Vec<usize>)> = Vec::new();
    for (i, &v) in values.iter().enumerate() {
        let k = nearest_integer(v, tol)?;
        match groups.iter_mut().find(|(g, _)| *g == k) {
            Some((_, members)) => members.push(i),
            None => groups.push((k, vec![i])),
        }
    }
    groups.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(groups)
}

/// Largest absolute entry (0 for an empty matrix).
pub fn max_abs(m: &RealMatrix) -> f64 {
    m.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}

/// True if `m` is square and `|m - mᵀ|∞ ≤ tol`.
pub fn is_symmetric(m: &RealMatrix, tol: Tolerance) -> bool {
    m.is_square() && max_abs(&(m - m.transpose())) <= tol.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eigen_of_diagonal_is_sorted() {
        let m = RealMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![1.0, 3.0, -2.0]));
        let e = symmetric_eigen(&m);
        assert_eq!(e.values.len(), 3);
        assert!((e.values[0] - 3.0).abs() < 1e-12);
        assert!((e.values[2] + 2.0).abs() < 1e-12);
        assert!((e.vectors[(1, 0)].abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clusters_merge_close_values() {
        let tol = Tolerance::default();
        let c = cluster_real(&[2.0, 2.0 + 1e-9, 0.5, -1.0, -1.0 - 1e-8], tol);
        assert_eq!(c.len(), 3);
        assert_eq!(c[0].indices, vec![0, 1]);
        assert_eq!(c[2].indices, vec![3, 4]);
    }

    #[test]
    fn integral_clustering_rejects_irrational() {
        let tol = Tolerance::default();
        let groups = cluster_integral(&[3.0, -1.0 + 1e-10, -1.0], tol).unwrap();
        assert_eq!(groups, vec![(3, vec![0]), (-1, vec![1, 2])]);
        match cluster_integral(&[1.618_033_988_7], tol) {
            Err(Error::NumericalInstability { nearest, .. }) => assert_eq!(nearest, 2),
            other => panic!("expected instability, got {other:?}"),
        }
    }

    #[test]
    fn symmetry_check() {
        let tol = Tolerance::default();
        let s = RealMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        let a = RealMatrix::from_row_slice(2, 2, &[0.0, 1.0, 0.0, 0.0]);
        assert!(is_symmetric(&s, tol));
        assert!(!is_symmetric(&a, tol));
    }
}
