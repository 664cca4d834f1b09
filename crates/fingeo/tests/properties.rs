//! Property-based tests for the exact and combinatorial layers.
//!
//! Uses proptest to check the algebraic laws on random inputs over a few
//! small primes.

use fingeo::config::{FormSpec, PointSelection, SpaceConfig};
use fingeo::error::Error;
use fingeo::form::projective_point_count;
use fingeo::incidence::IncidenceSpace;
use fingeo::orbit::{orbits, orbits_with_seed_order};
use fingeo::{ModMatrix, Permutation, PrimeField};
use proptest::prelude::*;

fn prime() -> impl Strategy<Value = u32> {
    prop::sample::select(vec![2u32, 3, 5, 7, 11, 13])
}

fn matrix(rows: usize, cols: usize) -> impl Strategy<Value = (u32, Vec<Vec<i64>>)> {
    (
        prime(),
        prop::collection::vec(prop::collection::vec(-20i64..20, cols), rows),
    )
}

fn permutation(n: usize) -> impl Strategy<Value = Permutation> {
    Just((0..n).collect::<Vec<usize>>())
        .prop_shuffle()
        .prop_map(|images| Permutation::new(images).unwrap())
}

// =============================================================================
// Field laws
// =============================================================================

proptest! {
    /// Results are canonical and the ring axioms hold.
    #[test]
    fn prop_field_laws(p in prime(), a in any::<u64>(), b in any::<u64>(), c in any::<u64>()) {
        let f = PrimeField::new(p).unwrap();
        let (a, b, c) = (f.element(a), f.element(b), f.element(c));
        for x in [f.add(a, b), f.sub(a, b), f.mul(a, b), f.neg(a)] {
            prop_assert!(x.value() < p);
        }
        prop_assert_eq!(f.add(a, b), f.add(b, a));
        prop_assert_eq!(f.mul(a, f.add(b, c)), f.add(f.mul(a, b), f.mul(a, c)));
        prop_assert_eq!(f.sub(f.add(a, b), b), a);
    }

    /// `a · a⁻¹ = 1` for every nonzero `a`; zero has no inverse.
    #[test]
    fn prop_inverse(p in prime(), a in any::<i64>()) {
        let f = PrimeField::new(p).unwrap();
        let a = f.element_signed(a);
        match f.inv(a) {
            Ok(inv) => prop_assert_eq!(f.mul(a, inv), f.one()),
            Err(e) => {
                prop_assert!(a.is_zero());
                prop_assert_eq!(e, Error::DivisionByZero { modulus: p });
            }
        }
    }
}

// =============================================================================
// Linear algebra laws
// =============================================================================

proptest! {
    /// Inverse round trip, or a singular-matrix error that agrees with the rank.
    #[test]
    fn prop_inverse_round_trip((p, rows) in (1usize..6).prop_flat_map(|n| matrix(n, n))) {
        let f = PrimeField::new(p).unwrap();
        let m = ModMatrix::from_rows(f, &rows).unwrap();
        let n = m.rows();
        match m.invert() {
            Ok(inv) => {
                prop_assert_eq!(m.mul(&inv).unwrap(), ModMatrix::identity(f, n));
                prop_assert_eq!(inv.invert().unwrap(), m.clone());
                prop_assert!(!m.determinant().unwrap().is_zero());
            }
            Err(Error::SingularMatrix { rank, dimension }) => {
                prop_assert_eq!(rank, m.rank());
                prop_assert_eq!(dimension, n);
                prop_assert!(m.determinant().unwrap().is_zero());
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    /// Every kernel vector is annihilated, and rank + nullity = columns.
    #[test]
    fn prop_kernel_law(
        (p, rows) in (1usize..6, 1usize..7).prop_flat_map(|(r, c)| matrix(r, c))
    ) {
        let f = PrimeField::new(p).unwrap();
        let m = ModMatrix::from_rows(f, &rows).unwrap();
        let kernel = m.kernel_basis();
        prop_assert_eq!(kernel.len() + m.rank(), m.cols());
        for v in &kernel {
            prop_assert!(m.mul_vec(v).unwrap().iter().all(|x| x.is_zero()));
        }
        if !kernel.is_empty() {
            let basis = ModMatrix::from_element_rows(f, &kernel).unwrap();
            prop_assert_eq!(basis.rank(), kernel.len());
        }
    }

    /// Rank is invariant under transposition.
    #[test]
    fn prop_row_rank_equals_column_rank(
        (p, rows) in (1usize..6, 1usize..6).prop_flat_map(|(r, c)| matrix(r, c))
    ) {
        let m = ModMatrix::from_rows(PrimeField::new(p).unwrap(), &rows).unwrap();
        prop_assert_eq!(m.rank(), m.transpose().rank());
    }
}

// =============================================================================
// Orbit laws
// =============================================================================

proptest! {
    /// Orbit sizes sum to the ground set and reseeding never changes the partition.
    #[test]
    fn prop_orbits_independent_of_seed_order(
        (gens, seeds) in (1usize..30).prop_flat_map(|n| {
            (prop::collection::vec(permutation(n), 0..4), permutation(n))
        })
    ) {
        let n = seeds.len();
        let part = orbits(n, &gens).unwrap();
        prop_assert_eq!(part.sizes().iter().sum::<usize>(), n);
        prop_assert!(part.is_closed_under(&gens));
        let reseeded = orbits_with_seed_order(n, &gens, seeds.images()).unwrap();
        prop_assert!(part.same_partition(&reseeded));

        let mut reversed = gens.clone();
        reversed.reverse();
        prop_assert!(part.same_partition(&orbits(n, &reversed).unwrap()));
    }
}

// =============================================================================
// Point counts
// =============================================================================

/// `(qⁿ − 1)/(q − 1)` points for every odd prime and small dimension.
#[test]
fn point_counts_match_closed_form() {
    for q in [3u32, 5, 7] {
        for n in 1usize..=4 {
            if q == 7 && n == 4 {
                continue;
            }
            let gram: Vec<Vec<i64>> = (0..n)
                .map(|i| (0..n).map(|j| i64::from(i == j)).collect())
                .collect();
            let space = IncidenceSpace::build(&SpaceConfig {
                field_order: q,
                dimension: n,
                form: FormSpec::Bilinear { gram },
                points: PointSelection::All,
            })
            .unwrap();
            assert_eq!(
                Some(space.point_count() as u64),
                projective_point_count(q as u64, n),
                "PG({}, {q})",
                n - 1
            );
        }
    }
}

/// Symplectic spaces W(2m − 1, q) keep every projective point.
#[test]
fn symplectic_counts_match_closed_form() {
    for (q, n) in [(3u32, 2usize), (5, 2), (3, 4), (5, 4), (3, 6)] {
        let space = IncidenceSpace::build(&SpaceConfig::symplectic(q, n)).unwrap();
        assert_eq!(
            Some(space.point_count() as u64),
            projective_point_count(q as u64, n)
        );
    }
}
