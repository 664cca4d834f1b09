//! Idempotent validator.
//!
//! Decomposes the Bose–Mesner algebra of each strongly regular space, and
//! the algebra generated jointly by the adjacency matrix and commuting
//! involutive automorphisms where an action asks for it, then checks the idempotent
//! laws on the result.

use anyhow::{Context, Result};
use fingeo::config::Tolerance;
use fingeo::invariants::srg_parameters;
use fingeo::scheme::{decompose, graph_relations, permutation_matrix, Decomposition};
use fingeo::spectral::RealMatrix;
use fingeo::IncidenceSpace;

use crate::report::{ConformanceReport, TestResult};
use crate::suite::{ActionDomain, SpaceClaim};
use crate::validators::orbits::partition;

const VALIDATOR: &str = "space/idempotents";

/// Validates the idempotent decompositions of one space.
///
/// # Errors
///
/// Returns an error on numerical instability or malformed generators.
pub fn validate(
    claim: &SpaceClaim,
    space: &IncidenceSpace,
    tol: Tolerance,
) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    bose_mesner(claim, space, tol, &mut report)?;
    for action in claim.actions.iter().filter(|a| a.joint_idempotents) {
        let label = format!("{}: {} with adjacency", claim.name, action.name);
        if action.domain != ActionDomain::Points {
            report.push(TestResult::warn(
                VALIDATOR,
                format!("{label}: joint decomposition needs an action on points"),
            ));
            continue;
        }
        let gens = match partition(&label, action, space)? {
            Ok((gens, _)) => gens,
            Err(failure) => {
                report.push(failure);
                continue;
            }
        };
        // Permutation matrices are symmetric only for involutions.
        let mut clashes: Vec<String> = gens
            .iter()
            .enumerate()
            .filter(|(_, g)| g.order() > 2)
            .map(|(i, g)| format!("generator {i} has order {}, not an involution", g.order()))
            .collect();
        clashes.extend(
            pairs(gens.len())
                .filter(|&(i, j)| gens[i].then(&gens[j]).ok() != gens[j].then(&gens[i]).ok())
                .map(|(i, j)| format!("generators {i} and {j} do not commute")),
        );
        if !clashes.is_empty() {
            report.push(TestResult::fail_with_details(
                VALIDATOR,
                format!("{label}: generators must be commuting involutions"),
                clashes,
            ));
            continue;
        }
        let mut matrices: Vec<RealMatrix> = vec![space.graph().adjacency_real()];
        matrices.extend(gens.iter().map(permutation_matrix));
        let d = decompose(&matrices, tol).with_context(|| label.clone())?;
        report.push(laws(&label, &d, tol, space.point_count()));
    }
    Ok(report)
}

fn bose_mesner(
    claim: &SpaceClaim,
    space: &IncidenceSpace,
    tol: Tolerance,
    report: &mut ConformanceReport,
) -> Result<()> {
    let label = format!("{}: Bose-Mesner algebra", claim.name);
    let Some(parameters) = srg_parameters(space.graph()).parameters() else {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("{label}: not strongly regular, skipped"),
        ));
        return Ok(());
    };
    let Some(predicted) = parameters
        .predicted_spectrum()
        .filter(|p| p.eigenvalues.iter().all(|v| (v - v.round()).abs() <= tol.value()))
    else {
        report.push(TestResult::warn(
            VALIDATOR,
            format!("{label}: {parameters} has irrational eigenvalues, skipped"),
        ));
        return Ok(());
    };
    let d = decompose(&graph_relations(space.graph()), tol).with_context(|| label.clone())?;
    let dims: Vec<usize> = d.idempotents().iter().map(|e| e.dimension).collect();
    let expected: Vec<usize> = predicted
        .multiplicities
        .iter()
        .map(|m| m.round() as usize)
        .collect();
    report.push(TestResult::check(
        VALIDATOR,
        dims == expected,
        format!("{label}: idempotent ranks {dims:?} (predicted {expected:?})"),
    ));
    report.push(laws(&label, &d, tol, space.point_count()));
    Ok(())
}

fn laws(label: &str, d: &Decomposition, tol: Tolerance, n: usize) -> TestResult {
    let check = d.verify(tol);
    let total: usize = d.idempotents().iter().map(|e| e.dimension).sum();
    if check.passed && total == n {
        TestResult::pass(
            VALIDATOR,
            format!("{label}: {} idempotents satisfy the idempotent laws", d.len()),
        )
    } else {
        TestResult::fail_with_details(
            VALIDATOR,
            format!("{label}: idempotent laws violated"),
            vec![
                format!("idempotency residual {:e}", check.idempotency),
                format!("orthogonality residual {:e}", check.orthogonality),
                format!("completeness residual {:e}", check.completeness),
                format!("eigenvalue relation residual {:e}", check.eigen_relation),
                format!("ranks sum to {total} of {n}"),
            ],
        )
    }
}

fn pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}
