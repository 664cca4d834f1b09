//! Orbit validator.
//!
//! Resolves each declared action's generators, checks that they are
//! automorphisms of the collinearity graph, and compares the orbit
//! decomposition with the declared sizes. Orbits are recomputed from a
//! reversed seed order to confirm the partition does not depend on it.

use anyhow::{Context, Result};
use fingeo::orbit::{induced_action, orbits, orbits_with_seed_order};
use fingeo::{Error, IncidenceSpace, ModMatrix, OrbitPartition, Permutation};

use crate::report::{ConformanceReport, TestResult};
use crate::suite::{ActionClaim, ActionDomain, GeneratorSpec, SpaceClaim};

const VALIDATOR: &str = "space/orbits";

/// Point permutations for a generator specification.
///
/// # Errors
///
/// Returns an engine error for a malformed matrix or permutation, or
/// [`Error::StructuralMismatch`] when a matrix does not preserve the point
/// set.
pub fn resolve_generators(
    spec: &GeneratorSpec,
    space: &IncidenceSpace,
) -> fingeo::Result<Vec<Permutation>> {
    match spec {
        GeneratorSpec::Transvections => space.transvection_generators(),
        GeneratorSpec::Matrices { matrices } => matrices
            .iter()
            .map(|rows| {
                let m = ModMatrix::from_rows(space.field(), rows)?;
                if !space.preserves_form(&m) {
                    return Err(Error::mismatch("generator matrix", "an isometry", "not an isometry"));
                }
                space.induced_permutation(&m)
            })
            .collect(),
        GeneratorSpec::Permutations { images } => images
            .iter()
            .map(|img| {
                if img.len() != space.point_count() {
                    return Err(Error::invalid(format!(
                        "permutation of degree {} on {} points",
                        img.len(),
                        space.point_count()
                    )));
                }
                Permutation::new(img.clone())
            })
            .collect(),
    }
}

/// Validates every declared action on one space.
///
/// # Errors
///
/// Returns an error if a generator is malformed.
pub fn validate(claim: &SpaceClaim, space: &IncidenceSpace) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    for action in &claim.actions {
        let label = format!("{}: {}", claim.name, action.name);
        match partition(&label, action, space).with_context(|| label.clone())? {
            Ok(part) => check_partition(&label, action, &part, &mut report)?,
            Err(failure) => report.push(failure),
        }
    }
    Ok(report)
}

/// The orbit partition of an action, or the failure that prevents computing it.
pub(crate) fn partition(
    label: &str,
    action: &ActionClaim,
    space: &IncidenceSpace,
) -> Result<std::result::Result<(Vec<Permutation>, OrbitPartition), TestResult>> {
    let gens = match resolve_generators(&action.generators, space) {
        Ok(gens) => gens,
        Err(e @ Error::StructuralMismatch { .. }) => {
            return Ok(Err(TestResult::fail_with_details(
                VALIDATOR,
                format!("{label}: generators do not act on the space"),
                vec![e.to_string()],
            )));
        }
        Err(e) => return Err(e.into()),
    };
    let broken: Vec<String> = gens
        .iter()
        .enumerate()
        .filter(|(_, g)| !space.graph().is_automorphism(g))
        .map(|(i, _)| format!("generator {i} is not a graph automorphism"))
        .collect();
    if !broken.is_empty() {
        return Ok(Err(TestResult::fail_with_details(
            VALIDATOR,
            format!("{label}: generators do not preserve collinearity"),
            broken,
        )));
    }
    let (gens, n) = match action.domain {
        ActionDomain::Points => (gens, space.point_count()),
        ActionDomain::Lines => {
            let lines: Vec<Vec<usize>> = space.lines().iter().map(|l| l.points.clone()).collect();
            match induced_action(&gens, &lines) {
                Ok(on_lines) => (on_lines, lines.len()),
                Err(e @ Error::StructuralMismatch { .. }) => {
                    return Ok(Err(TestResult::fail_with_details(
                        VALIDATOR,
                        format!("{label}: generators do not permute the lines"),
                        vec![e.to_string()],
                    )));
                }
                Err(e) => return Err(e.into()),
            }
        }
    };
    let part = orbits(n, &gens)?;
    Ok(Ok((gens, part)))
}

fn check_partition(
    label: &str,
    action: &ActionClaim,
    (gens, part): &(Vec<Permutation>, OrbitPartition),
    report: &mut ConformanceReport,
) -> Result<()> {
    let n = part.len();
    let total: usize = part.sizes().iter().sum();
    if total != n || !part.is_closed_under(gens) {
        report.push(TestResult::fail(
            VALIDATOR,
            format!("{label}: orbits of {n} elements sum to {total} or are not closed"),
        ));
        return Ok(());
    }
    let reversed: Vec<usize> = (0..n).rev().collect();
    let reseeded = orbits_with_seed_order(n, gens, &reversed)?;
    report.push(TestResult::check(
        VALIDATOR,
        part.same_partition(&reseeded),
        format!("{label}: partition is independent of the seed order"),
    ));

    let sizes = part.size_multiset();
    match &action.expect_sizes {
        Some(expected) if *expected == sizes => report.push(TestResult::pass(
            VALIDATOR,
            format!("{label}: {} orbit(s) of sizes {sizes:?}", sizes.len()),
        )),
        Some(expected) => report.push(TestResult::fail_with_details(
            VALIDATOR,
            format!("{label}: orbit sizes differ from the declaration"),
            vec![
                format!("declared {expected:?}"),
                format!("computed {sizes:?}"),
            ],
        )),
        None => report.push(TestResult::pass(
            VALIDATOR,
            format!("{label}: {} orbit(s) summing to {n}", sizes.len()),
        )),
    }
    Ok(())
}
