//! Permutations of `{0, …, n − 1}`.
//!
//! A [`Permutation`] is validated on construction: its image table must be a
//! bijection. Composition follows left-to-right action, `(a.then(b))(x) =
//! b(a(x))`, matching how generator words are read when building orbits.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A bijection of `{0, …, n − 1}` stored as its image table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation {
    images: Vec<usize>,
}

impl Permutation {
    /// Validate an image table.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if an image is out of range or repeated.
    pub fn new(images: Vec<usize>) -> Result<Self> {
        let n = images.len();
        let mut seen = vec![false; n];
        for (i, &img) in images.iter().enumerate() {
            if img >= n {
                return Err(Error::invalid(format!(
                    "image {img} of {i} is outside 0..{n}"
                )));
            }
            if seen[img] {
                return Err(Error::invalid(format!("image {img} is hit twice")));
            }
            seen[img] = true;
        }
        Ok(Self { images })
    }

    /// Identity on `n` points.
    pub fn identity(n: usize) -> Self {
        Self {
            images: (0..n).collect(),
        }
    }

    /// Build from disjoint cycles; unlisted points are fixed.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if a point is out of range or listed twice.
    pub fn from_cycles(n: usize, cycles: &[Vec<usize>]) -> Result<Self> {
        let mut images: Vec<usize> = (0..n).collect();
        let mut touched = vec![false; n];
        for cycle in cycles {
            for (k, &x) in cycle.iter().enumerate() {
                if x >= n || touched[x] {
                    return Err(Error::invalid(format!("bad cycle entry {x}")));
                }
                touched[x] = true;
                images[x] = cycle[(k + 1) % cycle.len()];
            }
        }
        Self::new(images)
    }

    /// Degree n.
    #[inline]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// True for the permutation of the empty set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Image of `x`.
    #[inline]
    pub fn apply(&self, x: usize) -> usize {
        self.images[x]
    }

    /// Image table.
    #[inline]
    pub fn images(&self) -> &[usize] {
        &self.images
    }

    /// True if every point is fixed.
    pub fn is_identity(&self) -> bool {
        self.images.iter().enumerate().all(|(i, &x)| i == x)
    }

    /// Apply `self` first, then `next`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] on a degree mismatch.
    pub fn then(&self, next: &Self) -> Result<Self> {
        if self.len() != next.len() {
            return Err(Error::invalid(format!(
                "cannot compose degree {} with degree {}",
                self.len(),
                next.len()
            )));
        }
        Ok(Self {
            images: self.images.iter().map(|&x| next.images[x]).collect(),
        })
    }

    /// Inverse permutation.
    pub fn inverse(&self) -> Self {
        let mut images = vec![0; self.len()];
        for (i, &x) in self.images.iter().enumerate() {
            images[x] = i;
        }
        Self { images }
    }

    /// Disjoint cycles of length at least 2, each starting at its smallest point.
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.len()];
        let mut out = Vec::new();
        for start in 0..self.len() {
            if seen[start] {
                continue;
            }
            let mut cycle = vec![start];
            seen[start] = true;
            let mut x = self.images[start];
            while x != start {
                seen[x] = true;
                cycle.push(x);
                x = self.images[x];
            }
            if cycle.len() > 1 {
                out.push(cycle);
            }
        }
        out
    }

    /// Order in the symmetric group (lcm of cycle lengths).
    pub fn order(&self) -> u64 {
        self.cycles()
            .iter()
            .fold(1u64, |acc, c| lcm(acc, c.len() as u64))
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = Error;

    fn try_from(images: Vec<usize>) -> Result<Self> {
        Self::new(images)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(p: Permutation) -> Self {
        p.images
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn lcm(a: u64, b: u64) -> u64 {
    a / gcd(a, b) * b
}
