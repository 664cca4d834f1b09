//! Graph invariants: degrees, spectra, SRG parameters, p-ranks.
//!
//! These are the oracles every combinatorial claim is checked against. A
//! failed claim is a value ([`SrgVerdict::NotStronglyRegular`] carrying the
//! violating pair), never an error. Errors are reserved for numerical
//! instability when integrality is demanded.
//!
//! # Example
//!
//! ```
//! use fingeo::graph::Graph;
//! use fingeo::invariants::{srg_parameters, SrgParameters, SrgVerdict};
//!
//! // The pentagon is SRG(5, 2, 0, 1).
//! let c5 = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]).unwrap();
//! assert_eq!(
//!     srg_parameters(&c5),
//!     SrgVerdict::StronglyRegular { parameters: SrgParameters::new(5, 2, 0, 1) }
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::config::Tolerance;
use crate::error::Result;
use crate::field::PrimeField;
use crate::graph::Graph;
use crate::spectral::{cluster_integral, cluster_real, symmetric_eigen};

/// Parameters `(n, k, λ, μ)` of a strongly regular graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SrgParameters {
    /// Order.
    pub n: usize,
    /// Common degree.
    pub k: usize,
    /// Common neighbours of adjacent pairs.
    pub lambda: usize,
    /// Common neighbours of non-adjacent pairs.
    pub mu: usize,
}

/// Eigenvalues `k > r > s` and multiplicities `1, f, g` forced by SRG parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictedSpectrum {
    /// `[k, r, s]`.
    pub eigenvalues: [f64; 3],
    /// `[1, f, g]`.
    pub multiplicities: [f64; 3],
}

impl SrgParameters {
    /// Bundle parameters.
    pub const fn new(n: usize, k: usize, lambda: usize, mu: usize) -> Self {
        Self { n, k, lambda, mu }
    }

    /// Spectrum implied by the parameters, or `None` when `n < 2` or the
    /// discriminant vanishes.
    pub fn predicted_spectrum(&self) -> Option<PredictedSpectrum> {
        if self.n < 2 {
            return None;
        }
        let (n, k, l, m) = (
            self.n as f64,
            self.k as f64,
            self.lambda as f64,
            self.mu as f64,
        );
        let delta = (l - m).powi(2) + 4.0 * (k - m);
        if delta <= 0.0 {
            return None;
        }
        let root = delta.sqrt();
        let r = ((l - m) + root) / 2.0;
        let s = ((l - m) - root) / 2.0;
        let skew = (2.0 * k + (n - 1.0) * (l - m)) / root;
        let f = ((n - 1.0) - skew) / 2.0;
        let g = ((n - 1.0) + skew) / 2.0;
        Some(PredictedSpectrum {
            eigenvalues: [k, r, s],
            multiplicities: [1.0, f, g],
        })
    }

    /// Standard feasibility: `k(k − λ − 1) = (n − k − 1)μ` and integral multiplicities.
    pub fn is_feasible(&self) -> bool {
        if self.k >= self.n || (self.k > 0 && self.lambda >= self.k) || self.mu > self.k {
            return false;
        }
        // Parameters may come from a suite file; overflow means infeasible.
        let lhs = self.k.checked_mul(self.k.saturating_sub(self.lambda.saturating_add(1)));
        let rhs = (self.n - self.k - 1).checked_mul(self.mu);
        match (lhs, rhs) {
            (Some(lhs), Some(rhs)) if lhs == rhs => {}
            _ => return false,
        }
        match self.predicted_spectrum() {
            Some(p) => p.multiplicities.iter().all(|&x| {
                x >= -1e-9 && (x - x.round()).abs() < 1e-9
            }),
            None => false,
        }
    }
}

impl core::fmt::Display for SrgParameters {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SRG({},{},{},{})", self.n, self.k, self.lambda, self.mu)
    }
}

/// Why a graph is not strongly regular.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SrgViolation {
    /// Complete, edgeless, or empty graph: λ or μ has no witnessing pair.
    Degenerate {
        /// What is missing.
        reason: String,
    },
    /// A vertex whose degree differs from vertex 0's.
    Degree {
        /// Offending vertex.
        vertex: usize,
        /// Its degree.
        degree: usize,
        /// Degree of vertex 0.
        expected: usize,
    },
    /// An adjacent pair with the wrong number of common neighbours.
    Lambda {
        /// First vertex.
        u: usize,
        /// Second vertex.
        v: usize,
        /// Common neighbours of `u`, `v`.
        common: usize,
        /// Count on the first adjacent pair.
        expected: usize,
    },
    /// A non-adjacent pair with the wrong number of common neighbours.
    Mu {
        /// First vertex.
        u: usize,
        /// Second vertex.
        v: usize,
        /// Common neighbours of `u`, `v`.
        common: usize,
        /// Count on the first non-adjacent pair.
        expected: usize,
    },
}

/// Outcome of [`srg_parameters`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum SrgVerdict {
    /// Degree, λ and μ are constant.
    StronglyRegular {
        /// The common values.
        parameters: SrgParameters,
    },
    /// The first violation found, for diagnostics.
    NotStronglyRegular {
        /// Counter-example.
        violation: SrgViolation,
    },
}

impl SrgVerdict {
    /// Parameters when strongly regular.
    pub fn parameters(&self) -> Option<SrgParameters> {
        match self {
            Self::StronglyRegular { parameters } => Some(*parameters),
            Self::NotStronglyRegular { .. } => None,
        }
    }
}

/// Integral eigenvalue with multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpectrumEntry {
    /// Eigenvalue.
    pub eigenvalue: i64,
    /// Multiplicity.
    pub multiplicity: usize,
}

/// Integral spectrum, largest eigenvalue first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spectrum {
    /// Distinct eigenvalues with multiplicities.
    pub entries: Vec<SpectrumEntry>,
}

impl Spectrum {
    /// Multiplicity of `eigenvalue` (0 if absent).
    pub fn multiplicity(&self, eigenvalue: i64) -> usize {
        self.entries
            .iter()
            .find(|e| e.eigenvalue == eigenvalue)
            .map_or(0, |e| e.multiplicity)
    }

    /// Sum of multiplicities.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.multiplicity).sum()
    }
}

impl core::fmt::Display for Spectrum {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{}^{}", e.eigenvalue, e.multiplicity))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Real eigenvalue cluster with multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RealSpectrumEntry {
    /// Cluster mean.
    pub eigenvalue: f64,
    /// Cluster size.
    pub multiplicity: usize,
}

/// Clustered real spectrum, largest eigenvalue first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealSpectrum {
    /// Distinct eigenvalue clusters.
    pub entries: Vec<RealSpectrumEntry>,
}

impl RealSpectrum {
    /// Same cluster count, same multiplicities, values within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: Tolerance) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().zip(&other.entries).all(|(a, b)| {
                a.multiplicity == b.multiplicity
                    && (a.eigenvalue - b.eigenvalue).abs() <= tol.value()
            })
    }
}

impl core::fmt::Display for RealSpectrum {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{:.6}^{}", e.eigenvalue, e.multiplicity))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Degree of every vertex, in vertex order.
pub fn degree_sequence(g: &Graph) -> Vec<usize> {
    (0..g.order()).map(|v| g.degree(v)).collect()
}

/// Degrees sorted in descending order (a relabelling invariant).
pub fn sorted_degree_sequence(g: &Graph) -> Vec<usize> {
    let mut d = degree_sequence(g);
    d.sort_unstable_by(|a, b| b.cmp(a));
    d
}

/// Common degree, if the graph is regular.
pub fn regular_degree(g: &Graph) -> Option<usize> {
    if g.order() == 0 {
        return Some(0);
    }
    let k = g.degree(0);
    (0..g.order()).all(|v| g.degree(v) == k).then_some(k)
}

/// Adjacency eigenvalues clustered to integers.
///
/// # Errors
///
/// [`crate::Error::NumericalInstability`] if some eigenvalue is farther than
/// `tol` from every integer.
pub fn eigen_spectrum(g: &Graph, tol: Tolerance) -> Result<Spectrum> {
    let eig = symmetric_eigen(&g.adjacency_real());
    let groups = cluster_integral(&eig.values, tol)?;
    Ok(Spectrum {
        entries: groups
            .into_iter()
            .map(|(eigenvalue, idx)| SpectrumEntry {
                eigenvalue,
                multiplicity: idx.len(),
            })
            .collect(),
    })
}

/// Adjacency eigenvalues clustered within `tol` without integrality.
pub fn real_spectrum(g: &Graph, tol: Tolerance) -> RealSpectrum {
    let eig = symmetric_eigen(&g.adjacency_real());
    RealSpectrum {
        entries: cluster_real(&eig.values, tol)
            .into_iter()
            .map(|c| RealSpectrumEntry {
                eigenvalue: c.value,
                multiplicity: c.indices.len(),
            })
            .collect(),
    }
}

/// SRG parameters if degree, λ and μ are constant; otherwise the first violation.
///
/// Reference values come from vertex 0, the first adjacent pair, and the
/// first non-adjacent pair in lexicographic order.
pub fn srg_parameters(g: &Graph) -> SrgVerdict {
    let n = g.order();
    let fail = |violation| SrgVerdict::NotStronglyRegular { violation };
    if n == 0 {
        return fail(SrgViolation::Degenerate {
            reason: "graph has no vertices".into(),
        });
    }
    let k = g.degree(0);
    if let Some(v) = (0..n).find(|&v| g.degree(v) != k) {
        return fail(SrgViolation::Degree {
            vertex: v,
            degree: g.degree(v),
            expected: k,
        });
    }
    let mut lambda = None;
    let mut mu = None;
    for u in 0..n {
        for v in u + 1..n {
            let c = g.common_neighbors(u, v);
            if g.is_adjacent(u, v) {
                match lambda {
                    None => lambda = Some(c),
                    Some(expected) if expected != c => {
                        return fail(SrgViolation::Lambda {
                            u,
                            v,
                            common: c,
                            expected,
                        })
                    }
                    Some(_) => {}
                }
            } else {
                match mu {
                    None => mu = Some(c),
                    Some(expected) if expected != c => {
                        return fail(SrgViolation::Mu {
                            u,
                            v,
                            common: c,
                            expected,
                        })
                    }
                    Some(_) => {}
                }
            }
        }
    }
    match (lambda, mu) {
        (Some(lambda), Some(mu)) => SrgVerdict::StronglyRegular {
            parameters: SrgParameters::new(n, k, lambda, mu),
        },
        (None, _) => fail(SrgViolation::Degenerate {
            reason: "no adjacent pair (edgeless graph)".into(),
        }),
        (_, None) => fail(SrgViolation::Degenerate {
            reason: "no non-adjacent pair (complete graph)".into(),
        }),
    }
}

/// Rank of the adjacency matrix over GF(p).
pub fn p_rank(g: &Graph, field: PrimeField) -> usize {
    g.adjacency_mod(field).rank()
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn petersen_is_srg_10_3_0_1() {
        let g = petersen();
        assert_eq!(degree_sequence(&g), vec![3; 10]);
        assert_eq!(
            srg_parameters(&g).parameters(),
            Some(SrgParameters::new(10, 3, 0, 1))
        );
    }

    #[test]
    fn petersen_spectrum() {
        let s = eigen_spectrum(&petersen(), Tolerance::default()).unwrap();
        assert_eq!(s.multiplicity(3), 1);
        assert_eq!(s.multiplicity(1), 5);
        assert_eq!(s.multiplicity(-2), 4);
        assert_eq!(s.total(), 10);
        assert_eq!(s.to_string(), "{3^1, 1^5, -2^4}");
    }

    #[test]
    fn predicted_spectrum_matches_petersen() {
        let p = SrgParameters::new(10, 3, 0, 1).predicted_spectrum().unwrap();
        assert!((p.eigenvalues[1] - 1.0).abs() < 1e-12);
        assert!((p.eigenvalues[2] + 2.0).abs() < 1e-12);
        assert!((p.multiplicities[1] - 5.0).abs() < 1e-12);
        assert!((p.multiplicities[2] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn feasibility() {
        assert!(SrgParameters::new(40, 12, 2, 4).is_feasible());
        assert!(SrgParameters::new(10, 3, 0, 1).is_feasible());
        assert!(SrgParameters::new(5, 2, 0, 1).is_feasible());
        assert!(!SrgParameters::new(40, 12, 2, 5).is_feasible());
        // Passes the counting identity but not integrality.
        assert!(!SrgParameters::new(7, 3, 0, 2).is_feasible());
    }

    #[test]
    fn huge_parameters_are_infeasible_not_overflowing() {
        let big = usize::MAX;
        assert!(!SrgParameters::new(big, big - 1, 0, big - 1).is_feasible());
        assert!(!SrgParameters::new(big, 2, 0, 1).is_feasible());
        // λ + 1 would wrap; k = 0 skips the λ < k guard.
        let _ = SrgParameters::new(5, 0, big, 0).is_feasible();
    }

    #[test]
    fn pentagon_spectrum_is_irrational() {
        let c5 = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]).unwrap();
        assert!(matches!(
            eigen_spectrum(&c5, Tolerance::default()),
            Err(crate::Error::NumericalInstability { .. })
        ));
        let real = real_spectrum(&c5, Tolerance::default());
        assert_eq!(real.entries.len(), 3);
        assert_eq!(real.entries[1].multiplicity, 2);
    }

    #[test]
    fn irregular_graph_reports_vertex() {
        let path = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(
            srg_parameters(&path),
            SrgVerdict::NotStronglyRegular {
                violation: SrgViolation::Degree {
                    vertex: 1,
                    degree: 2,
                    expected: 1
                }
            }
        );
    }

    #[test]
    fn hexagon_fails_on_mu() {
        let c6 = Graph::from_edges(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]).unwrap();
        // (0,2) has one common neighbour, (0,3) has none.
        assert_eq!(
            srg_parameters(&c6),
            SrgVerdict::NotStronglyRegular {
                violation: SrgViolation::Mu {
                    u: 0,
                    v: 3,
                    common: 0,
                    expected: 1
                }
            }
        );
    }

    #[test]
    fn complete_graph_is_degenerate() {
        let k4 = Graph::empty(4).complement();
        assert!(matches!(
            srg_parameters(&k4),
            SrgVerdict::NotStronglyRegular {
                violation: SrgViolation::Degenerate { .. }
            }
        ));
    }

    #[test]
    fn p_rank_of_petersen() {
        let g = petersen();
        // Eigenvalues 3, 1, -2: mod 2 the -2 eigenspace and mod 3 the 3 eigenspace collapse.
        assert_eq!(p_rank(&g, PrimeField::new(5).unwrap()), 10);
        assert!(p_rank(&g, PrimeField::new(2).unwrap()) < 10);
    }
}
