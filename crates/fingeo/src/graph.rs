//! Finite simple graphs.
//!
//! A [`Graph`] is a vertex set `{0, …, n − 1}` with a symmetric, loop-free
//! adjacency relation. Constructors validate both properties, so every
//! downstream analysis may rely on them.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::field::{FieldElement, PrimeField};
use crate::linalg::ModMatrix;
use crate::perm::Permutation;
use crate::spectral::RealMatrix;

/// An undirected edge `source < target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeRecord {
    /// Smaller endpoint.
    pub source: usize,
    /// Larger endpoint.
    pub target: usize,
}

/// Simple undirected graph with a dense adjacency matrix and sorted neighbour lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    n: usize,
    matrix: Vec<bool>,
    neighbors: Vec<Vec<usize>>,
}

impl Graph {
    /// The edgeless graph on `n` vertices.
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            matrix: vec![false; n * n],
            neighbors: vec![Vec::new(); n],
        }
    }

    /// Build from an edge list. Repeated edges are merged.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for loops or out-of-range endpoints.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut matrix = vec![false; n * n];
        for &(u, v) in edges {
            if u >= n || v >= n {
                return Err(Error::invalid(format!("edge ({u}, {v}) outside 0..{n}")));
            }
            if u == v {
                return Err(Error::invalid(format!("loop at vertex {u}")));
            }
            matrix[u * n + v] = true;
            matrix[v * n + u] = true;
        }
        Ok(Self::from_matrix(n, matrix))
    }

    /// Build from an adjacency predicate evaluated on every ordered pair.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the predicate is not symmetric or holds on a diagonal pair.
    pub fn from_fn(n: usize, mut adjacent: impl FnMut(usize, usize) -> bool) -> Result<Self> {
        let mut matrix = vec![false; n * n];
        for u in 0..n {
            for v in 0..n {
                matrix[u * n + v] = adjacent(u, v);
            }
        }
        for u in 0..n {
            if matrix[u * n + u] {
                return Err(Error::invalid(format!("loop at vertex {u}")));
            }
            for v in u + 1..n {
                if matrix[u * n + v] != matrix[v * n + u] {
                    return Err(Error::invalid(format!(
                        "adjacency is not symmetric at ({u}, {v})"
                    )));
                }
            }
        }
        Ok(Self::from_matrix(n, matrix))
    }

    /// Build from a 0/1 adjacency matrix.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for a non-square, asymmetric, or looped matrix.
    pub fn from_adjacency(rows: &[Vec<bool>]) -> Result<Self> {
        let n = rows.len();
        if rows.iter().any(|r| r.len() != n) {
            return Err(Error::invalid("adjacency matrix must be square"));
        }
        Self::from_fn(n, |u, v| rows[u][v])
    }

    fn from_matrix(n: usize, matrix: Vec<bool>) -> Self {
        let neighbors = (0..n)
            .map(|u| (0..n).filter(|&v| matrix[u * n + v]).collect())
            .collect();
        Self {
            n,
            matrix,
            neighbors,
        }
    }

    /// Number of vertices.
    #[inline]
    pub const fn order(&self) -> usize {
        self.n
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Adjacency test.
    #[inline]
    pub fn is_adjacent(&self, u: usize, v: usize) -> bool {
        self.matrix[u * self.n + v]
    }

    /// Sorted neighbours of `v`.
    #[inline]
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.neighbors[v]
    }

    /// Degree of `v`.
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.neighbors[v].len()
    }

    /// Edges with `u < v`, in lexicographic order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.n).flat_map(move |u| {
            self.neighbors[u]
                .iter()
                .copied()
                .filter(move |&v| v > u)
                .map(move |v| (u, v))
        })
    }

    /// Edge table for the artifact writer.
    pub fn edge_records(&self) -> Vec<EdgeRecord> {
        self.edges()
            .map(|(source, target)| EdgeRecord { source, target })
            .collect()
    }

    /// Number of common neighbours of `u` and `v`.
    pub fn common_neighbors(&self, u: usize, v: usize) -> usize {
        let (a, b) = (&self.neighbors[u], &self.neighbors[v]);
        let (mut i, mut j, mut count) = (0, 0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                core::cmp::Ordering::Less => i += 1,
                core::cmp::Ordering::Greater => j += 1,
                core::cmp::Ordering::Equal => {
                    count += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        count
    }

    /// Complement graph.
    pub fn complement(&self) -> Self {
        let n = self.n;
        let matrix = (0..n * n)
            .map(|idx| idx / n != idx % n && !self.matrix[idx])
            .collect();
        Self::from_matrix(n, matrix)
    }

    /// Graph with vertex `v` renamed to `perm(v)`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when the permutation degree differs from the order.
    pub fn relabel(&self, perm: &Permutation) -> Result<Self> {
        if perm.len() != self.n {
            return Err(Error::invalid(format!(
                "relabelling {} vertices with a permutation of degree {}",
                self.n,
                perm.len()
            )));
        }
        let edges: Vec<_> = self
            .edges()
            .map(|(u, v)| (perm.apply(u), perm.apply(v)))
            .collect();
        Self::from_edges(self.n, &edges)
    }

    /// True if `perm` maps edges to edges (and hence non-edges to non-edges).
    pub fn is_automorphism(&self, perm: &Permutation) -> bool {
        perm.len() == self.n
            && self
                .edges()
                .all(|(u, v)| self.is_adjacent(perm.apply(u), perm.apply(v)))
    }

    /// Connected components, each sorted, ordered by smallest vertex.
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.n];
        let mut out = Vec::new();
        for start in 0..self.n {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut component = vec![start];
            let mut head = 0;
            while head < component.len() {
                let v = component[head];
                head += 1;
                for &w in &self.neighbors[v] {
                    if !seen[w] {
                        seen[w] = true;
                        component.push(w);
                    }
                }
            }
            component.sort_unstable();
            out.push(component);
        }
        out
    }

    /// True for a graph with at most one component.
    pub fn is_connected(&self) -> bool {
        self.connected_components().len() <= 1
    }

    /// Exact 0/1 adjacency matrix over GF(p).
    pub fn adjacency_mod(&self, field: PrimeField) -> ModMatrix {
        ModMatrix::from_fn(field, self.n, self.n, |u, v| {
            if self.is_adjacent(u, v) {
                FieldElement::ONE
            } else {
                FieldElement::ZERO
            }
        })
    }

    /// Real 0/1 adjacency matrix.
    pub fn adjacency_real(&self) -> RealMatrix {
        RealMatrix::from_fn(self.n, self.n, |u, v| {
            if self.is_adjacent(u, v) {
                1.0
            } else {
                0.0
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(n: usize) -> Graph {
        let edges: Vec<_> = (0..n).map(|i| (i, (i + 1) % n)).collect();
        Graph::from_edges(n, &edges).unwrap()
    }

    #[test]
    fn construction_validates() {
        assert!(Graph::from_edges(3, &[(0, 0)]).is_err());
        assert!(Graph::from_edges(3, &[(0, 3)]).is_err());
        assert!(Graph::from_fn(3, |u, v| u == 0 && v == 1).is_err());
        assert!(Graph::from_adjacency(&[vec![false, true], vec![true, false]]).is_ok());
    }

    #[test]
    fn cycle_basics() {
        let c5 = cycle(5);
        assert_eq!(c5.edge_count(), 5);
        assert_eq!(c5.neighbors(0), &[1, 4]);
        assert_eq!(c5.common_neighbors(0, 2), 1);
        assert_eq!(c5.common_neighbors(0, 1), 0);
        assert!(c5.is_connected());
    }

    #[test]
    fn pentagon_is_self_complementary_in_size() {
        let c5 = cycle(5);
        let co = c5.complement();
        assert_eq!(co.edge_count(), 5);
        assert!(co.is_adjacent(0, 2));
        assert!(!co.is_adjacent(0, 1));
    }

    #[test]
    fn relabel_and_automorphism() {
        let c4 = cycle(4);
        let rot = Permutation::new(vec![1, 2, 3, 0]).unwrap();
        assert!(c4.is_automorphism(&rot));
        assert_eq!(c4.relabel(&rot).unwrap(), c4);
        let swap = Permutation::new(vec![1, 0, 2, 3]).unwrap();
        assert!(!c4.is_automorphism(&swap));
    }

    #[test]
    fn components() {
        let g = Graph::from_edges(5, &[(0, 1), (3, 4)]).unwrap();
        assert_eq!(g.connected_components(), vec![vec![0, 1], vec![2], vec![3, 4]]);
        assert!(!g.is_connected());
    }

    #[test]
    fn edge_records_are_ordered() {
        let recs = cycle(3).edge_records();
        assert_eq!(
            recs,
            vec![
                EdgeRecord { source: 0, target: 1 },
                EdgeRecord { source: 0, target: 2 },
                EdgeRecord { source: 1, target: 2 },
            ]
        );
    }
}
