//! Orbits of a permutation group given by generators.
//!
//! The group is never enumerated. Orbits are found by breadth-first closure:
//! seed an unvisited element, push every generator image of every newly
//! discovered element until nothing new appears, then seed the next
//! unvisited element. Each element is visited once per generator, so the
//! cost is `O(|ground set| · |generators|)`.
//!
//! Orbit identifiers depend on the seed order; the partition itself does
//! not. [`OrbitPartition::same_partition`] compares partitions independently
//! of identifiers, and [`OrbitPartition::canonical`] renumbers orbits by
//! their smallest element.
//!
//! # Example
//!
//! ```
//! use fingeo::orbit::orbits;
//! use fingeo::perm::Permutation;
//!
//! // <(0 1 2), (3 4)> on six points.
//! let a = Permutation::from_cycles(6, &[vec![0, 1, 2]]).unwrap();
//! let b = Permutation::from_cycles(6, &[vec![3, 4]]).unwrap();
//! let part = orbits(6, &[a, b]).unwrap();
//! assert_eq!(part.sizes(), &[3, 2, 1]);
//! assert_eq!(part.orbits(), vec![vec![0, 1, 2], vec![3, 4], vec![5]]);
//! ```

use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::perm::Permutation;

/// Orbit assignment for every element of the ground set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrbitPartition {
    orbit_of: Vec<usize>,
    sizes: Vec<usize>,
}

/// One row of the orbit table for the artifact writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrbitRecord {
    /// Ground-set element.
    pub element: usize,
    /// Identifier of its orbit.
    pub orbit: usize,
}

impl OrbitPartition {
    /// Size of the ground set.
    #[inline]
    pub fn len(&self) -> usize {
        self.orbit_of.len()
    }

    /// True for the partition of the empty set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orbit_of.is_empty()
    }

    /// Number of orbits.
    #[inline]
    pub fn orbit_count(&self) -> usize {
        self.sizes.len()
    }

    /// Orbit identifier of `x`.
    #[inline]
    pub fn orbit_of(&self, x: usize) -> usize {
        self.orbit_of[x]
    }

    /// Orbit identifier of every element.
    #[inline]
    pub fn assignment(&self) -> &[usize] {
        &self.orbit_of
    }

    /// Orbit sizes, indexed by orbit identifier.
    #[inline]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Orbit sizes in descending order.
    pub fn size_multiset(&self) -> Vec<usize> {
        let mut s = self.sizes.clone();
        s.sort_unstable_by(|a, b| b.cmp(a));
        s
    }

    /// Members of every orbit, each sorted, indexed by orbit identifier.
    pub fn orbits(&self) -> Vec<Vec<usize>> {
        let mut out: Vec<Vec<usize>> = self.sizes.iter().map(|&s| Vec::with_capacity(s)).collect();
        for (x, &o) in self.orbit_of.iter().enumerate() {
            out[o].push(x);
        }
        out
    }

    /// True if every orbit is a single element.
    pub fn is_discrete(&self) -> bool {
        self.sizes.iter().all(|&s| s == 1)
    }

    /// True for a single orbit covering a non-empty ground set.
    pub fn is_transitive(&self) -> bool {
        self.sizes.len() == 1
    }

    /// The same partition with orbits numbered by increasing smallest element.
    pub fn canonical(&self) -> Self {
        let mut relabel: Vec<Option<usize>> = vec![None; self.sizes.len()];
        let mut next = 0;
        let mut orbit_of = Vec::with_capacity(self.orbit_of.len());
        for &o in &self.orbit_of {
            let id = *relabel[o].get_or_insert_with(|| {
                next += 1;
                next - 1
            });
            orbit_of.push(id);
        }
        let mut sizes = vec![0; self.sizes.len()];
        for &o in &orbit_of {
            sizes[o] += 1;
        }
        Self { orbit_of, sizes }
    }

    /// True if both describe the same partition of the same ground set,
    /// whatever the orbit identifiers.
    pub fn same_partition(&self, other: &Self) -> bool {
        self.len() == other.len() && self.canonical() == other.canonical()
    }

    /// True if every generator maps each orbit into itself.
    pub fn is_closed_under(&self, generators: &[Permutation]) -> bool {
        generators.iter().all(|g| {
            g.len() == self.len()
                && (0..self.len()).all(|x| self.orbit_of[g.apply(x)] == self.orbit_of[x])
        })
    }

    /// Orbit table.
    pub fn records(&self) -> Vec<OrbitRecord> {
        self.orbit_of
            .iter()
            .enumerate()
            .map(|(element, &orbit)| OrbitRecord { element, orbit })
            .collect()
    }
}

/// Orbits of `<generators>` on `{0, …, n − 1}`, seeding in ascending order.
///
/// # Errors
///
/// [`Error::InvalidInput`] when a generator has degree other than `n`.
pub fn orbits(n: usize, generators: &[Permutation]) -> Result<OrbitPartition> {
    let order: Vec<usize> = (0..n).collect();
    orbits_with_seed_order(n, generators, &order)
}

/// Orbits of `<generators>`, taking seeds from `seed_order`.
///
/// Orbit identifiers follow the order in which seeds open new orbits; the
/// partition is the same for every seed order.
///
/// # Errors
///
/// [`Error::InvalidInput`] when a generator has degree other than `n` or
/// `seed_order` is not an arrangement of `{0, …, n − 1}`.
pub fn orbits_with_seed_order(
    n: usize,
    generators: &[Permutation],
    seed_order: &[usize],
) -> Result<OrbitPartition> {
    if let Some((i, g)) = generators.iter().enumerate().find(|(_, g)| g.len() != n) {
        return Err(Error::invalid(format!(
            "generator {i} has degree {}, ground set has {n} elements",
            g.len()
        )));
    }
    Permutation::new(seed_order.to_vec())
        .map_err(|_| Error::invalid("seed order is not an arrangement of the ground set"))?;
    if seed_order.len() != n {
        return Err(Error::invalid(format!(
            "seed order lists {} elements, ground set has {n}",
            seed_order.len()
        )));
    }

    const UNSEEN: usize = usize::MAX;
    let mut orbit_of = vec![UNSEEN; n];
    let mut sizes = Vec::new();
    let mut queue = VecDeque::new();
    for &seed in seed_order {
        if orbit_of[seed] != UNSEEN {
            continue;
        }
        let id = sizes.len();
        orbit_of[seed] = id;
        queue.push_back(seed);
        let mut size = 0;
        while let Some(x) = queue.pop_front() {
            size += 1;
            for g in generators {
                let y = g.apply(x);
                if orbit_of[y] == UNSEEN {
                    orbit_of[y] = id;
                    queue.push_back(y);
                }
            }
        }
        debug!(orbit = id, seed, size, "orbit closed");
        sizes.push(size);
    }
    info!(
        elements = n,
        generators = generators.len(),
        orbits = sizes.len(),
        "orbit decomposition complete"
    );
    Ok(OrbitPartition { orbit_of, sizes })
}

/// Lift point permutations to a family of derived objects.
///
/// Each object is a sorted, duplicate-free set of points (an edge, a line,
/// an unordered triple, ...). Generator `g` sends object `S` to the object
/// `{g(x) : x ∈ S}`, which must itself be in the family.
///
/// # Errors
///
/// [`Error::InvalidInput`] for an unsorted, repeated, or out-of-range
/// object, or a repeated object; [`Error::StructuralMismatch`] when some
/// image is not in the family.
pub fn induced_action(
    generators: &[Permutation],
    objects: &[Vec<usize>],
) -> Result<Vec<Permutation>> {
    let mut index = HashMap::with_capacity(objects.len());
    for (i, obj) in objects.iter().enumerate() {
        if obj.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::invalid(format!("object {i} is not a sorted set")));
        }
        if index.insert(obj.as_slice(), i).is_some() {
            return Err(Error::invalid(format!("object {i} is listed twice")));
        }
    }
    generators
        .iter()
        .enumerate()
        .map(|(gi, g)| {
            let mut images = Vec::with_capacity(objects.len());
            for (i, obj) in objects.iter().enumerate() {
                if let Some(&x) = obj.iter().find(|&&x| x >= g.len()) {
                    return Err(Error::invalid(format!(
                        "object {i} contains {x}, outside the degree {} of generator {gi}",
                        g.len()
                    )));
                }
                let mut img: Vec<usize> = obj.iter().map(|&x| g.apply(x)).collect();
                img.sort_unstable();
                let j = index.get(img.as_slice()).copied().ok_or_else(|| {
                    Error::mismatch(
                        format!("image of object {i} under generator {gi}"),
                        "a member of the object family",
                        format!("{img:?}"),
                    )
                })?;
                images.push(j);
            }
            Permutation::new(images)
        })
        .collect()
}

/// All `k`-element subsets of `{0, …, n − 1}` in lexicographic order.
pub fn k_subsets(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        out.push(current.clone());
        let Some(i) = (0..k).rev().find(|&i| current[i] != i + n - k) else {
            return out;
        };
        current[i] += 1;
        for j in i + 1..k {
            current[j] = current[j - 1] + 1;
        }
    }
}
