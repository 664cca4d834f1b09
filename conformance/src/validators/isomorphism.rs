//! Isomorphism-claim validator.
//!
//! Every correspondence claim goes through the certifier; the report
//! carries the certificate's verdict and the invariants it compared.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use fingeo::config::Tolerance;
use fingeo::iso::{Refutation, Witness};
use fingeo::{Certifier, IncidenceSpace, IsomorphismCertificate, Permutation, UniquenessHint, Verdict};

use crate::report::{ConformanceReport, TestResult};
use crate::suite::{Expectation, IsomorphismClaim};

const VALIDATOR: &str = "isomorphism";

/// Certifies every claim whose spaces were built, returning the report and
/// each claim's certificate in declaration order.
///
/// Claims naming a space that failed to build are skipped with a warning.
///
/// # Errors
///
/// Returns an error if a claim names an undeclared space or its
/// relabelling is not a permutation.
pub fn validate(
    claims: &[IsomorphismClaim],
    spaces: &SpaceTable,
    tol: Tolerance,
) -> Result<(ConformanceReport, Vec<Option<IsomorphismCertificate>>)> {
    let mut report = ConformanceReport::new();
    let mut certificates = Vec::with_capacity(claims.len());
    for claim in claims {
        let cert = certify(claim, spaces, tol)?;
        report.push(match &cert {
            Some(cert) => judge(claim, cert),
            None => TestResult::warn(
                VALIDATOR,
                format!("{}: skipped, a space failed to build", claim.name),
            ),
        });
        certificates.push(cert);
    }
    Ok((report, certificates))
}

/// Built spaces by name; `None` marks a space whose construction failed.
pub type SpaceTable = HashMap<String, Option<Arc<IncidenceSpace>>>;

/// Runs the certifier on one claim, or `None` if a space failed to build.
///
/// # Errors
///
/// Returns an error if the claim names an undeclared space or its
/// relabelling is not a permutation.
pub fn certify(
    claim: &IsomorphismClaim,
    spaces: &SpaceTable,
    tol: Tolerance,
) -> Result<Option<IsomorphismCertificate>> {
    let lookup = |name: &str| {
        spaces
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("{}: unknown space {name:?}", claim.name))
    };
    let (Some(left), Some(right)) = (lookup(&claim.left)?, lookup(&claim.right)?) else {
        return Ok(None);
    };
    let right_graph = match claim.relabel {
        Some(r) => {
            let perm = Permutation::new(r.images(right.point_count()))
                .with_context(|| format!("{}: relabelling", claim.name))?;
            right.graph().relabel(&perm)?
        }
        None => right.graph().clone(),
    };
    let mut certifier = Certifier::new()
        .with_tolerance(tol)
        .with_budget(claim.budget);
    if claim.catalogue {
        certifier = certifier.with_hints(UniquenessHint::catalogue());
    }
    Ok(Some(certifier.certify(left.graph(), &right_graph)))
}

/// Compares a certificate with the declared expectation.
pub fn judge(claim: &IsomorphismClaim, cert: &IsomorphismCertificate) -> TestResult {
    let mut details = cert.invariants.clone();
    details.push(format!("{} search node(s)", cert.nodes));
    let name = &claim.name;
    match (&cert.verdict, claim.expect) {
        (Verdict::Certified { witness }, Expectation::Isomorphic) => {
            TestResult::pass(VALIDATOR, format!("{name}: certified by {}", describe(witness)))
                .with_details(details)
        }
        (Verdict::Refuted { reason }, Expectation::NonIsomorphic) => {
            TestResult::pass(VALIDATOR, format!("{name}: refuted by {}", explain(reason)))
                .with_details(details)
        }
        (Verdict::Certified { witness }, Expectation::NonIsomorphic) => {
            TestResult::fail_with_details(
                VALIDATOR,
                format!("{name}: declared non-isomorphic, but certified by {}", describe(witness)),
                details,
            )
        }
        (Verdict::Refuted { reason }, Expectation::Isomorphic) => TestResult::fail_with_details(
            VALIDATOR,
            format!("{name}: declared isomorphic, but refuted by {}", explain(reason)),
            details,
        ),
        (Verdict::Undetermined { nodes, elapsed_ms }, _) => TestResult::warn(
            VALIDATOR,
            format!("{name}: undetermined after {nodes} nodes in {elapsed_ms} ms"),
        )
        .with_details(details),
    }
}

fn describe(witness: &Witness) -> String {
    match witness {
        Witness::Bijection { .. } => "an explicit bijection".into(),
        Witness::Uniqueness { parameters, theorem } => {
            format!("uniqueness of {parameters} ({theorem})")
        }
    }
}

fn explain(reason: &Refutation) -> String {
    match reason {
        Refutation::Invariant {
            invariant,
            left,
            right,
        } => format!("{invariant}: {left} vs {right}"),
        Refutation::ExhaustedSearch { nodes } => {
            format!("exhaustive search ({nodes} nodes)")
        }
    }
}
