//! fingeo conformance suite.
//!
//! Turns declared combinatorial properties of finite geometries into
//! pass/fail verdicts. A suite names incidence spaces, the parameters and
//! orbit structures they are claimed to have, and isomorphism claims
//! between them; every claim is recomputed by the `fingeo` engine.
//!
//! # Checks
//!
//! | Validator | Property |
//! |-----------|----------|
//! | `field/laws` | Ring axioms and inverses over GF(p) |
//! | `space/construction` | Point and line counts, partial linear space |
//! | `space/linalg` | Kernel law, inverse round trip, p-ranks |
//! | `space/srg` | Declared SRG parameters, feasibility |
//! | `space/spectrum` | Computed vs predicted adjacency spectrum |
//! | `space/orbits` | Orbit sizes, seed-order independence |
//! | `space/idempotents` | Bose–Mesner and joint idempotent laws |
//! | `isomorphism` | Certifier verdicts against declared outcomes |
//!
//! # Entry Point
//!
//! ```no_run
//! use fingeo_conformance::{run_all, SuiteConfig};
//!
//! let suite = SuiteConfig::builtin().expect("built-in suite parses");
//! let report = run_all(&suite).expect("Failed to run conformance");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod artifacts;
pub mod report;
pub mod suite;
pub mod validators;

pub use artifacts::{collect_artifacts, Artifacts};
pub use report::{render_json, render_text, ConformanceReport, Severity, TestResult};
pub use suite::SuiteConfig;

use fingeo::{IsomorphismCertificate, SpaceCache};
use tracing::info;

use crate::validators::isomorphism::SpaceTable;

/// Everything one pass over a suite produced.
///
/// [`collect_artifacts`] reads the built spaces and certificates from here
/// instead of constructing and certifying again.
#[derive(Debug)]
pub struct SuiteRun {
    /// Aggregated verdicts.
    pub report: ConformanceReport,
    /// Built spaces by declared name; `None` where construction failed.
    pub spaces: SpaceTable,
    /// One certificate per isomorphism claim, in declaration order; `None`
    /// where a space failed to build.
    pub certificates: Vec<Option<IsomorphismCertificate>>,
}

/// Runs all conformance validators and returns the aggregated report.
///
/// Shorthand for [`run_suite`] when only the report is wanted.
///
/// # Errors
///
/// As for [`run_suite`].
pub fn run_all(suite: &SuiteConfig) -> anyhow::Result<ConformanceReport> {
    Ok(run_suite(suite)?.report)
}

/// Runs all conformance validators, keeping the spaces and certificates.
///
/// Validators are run in this order:
/// 1. Field laws for every declared modulus
/// 2. Per space: construction, linear algebra, SRG parameters, spectrum,
///    orbits, idempotents
/// 3. Isomorphism claims
///
/// # Errors
///
/// Returns an error for malformed input (a non-prime modulus, a malformed
/// form or generator, an undeclared space name) or numerical instability.
/// False claims are failures in the report, not errors.
pub fn run_suite(suite: &SuiteConfig) -> anyhow::Result<SuiteRun> {
    let mut report = ConformanceReport::new();
    let tol = suite.tolerance;

    // 1. Field laws
    report.extend(validators::field::validate(&suite.moduli)?);

    // 2. Spaces
    let mut cache = SpaceCache::new();
    let mut spaces = SpaceTable::new();
    for claim in &suite.spaces {
        let (built, space) = validators::construction::validate(claim, &mut cache)?;
        report.extend(built);
        if let Some(space) = &space {
            report.extend(validators::linalg::validate(claim, space)?);
            report.extend(validators::srg::validate(claim, space)?);
            report.extend(validators::spectrum::validate(claim, space, tol)?);
            report.extend(validators::orbits::validate(claim, space)?);
            report.extend(validators::idempotents::validate(claim, space, tol)?);
        }
        spaces.insert(claim.name.clone(), space);
    }

    // 3. Isomorphism claims
    let (claims, certificates) =
        validators::isomorphism::validate(&suite.isomorphisms, &spaces, tol)?;
    report.extend(claims);

    info!(
        checks = report.results.len(),
        failures = report.failure_count(),
        "conformance run complete"
    );
    Ok(SuiteRun {
        report,
        spaces,
        certificates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::{ActionClaim, GeneratorSpec, SpaceClaim};
    use fingeo::config::SpaceConfig;
    use fingeo::SrgParameters;

    #[test]
    fn builtin_suite_passes() {
        let suite = SuiteConfig::builtin().unwrap();
        let report = run_all(&suite).unwrap();
        let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
        assert!(failures.is_empty(), "{failures:#?}");
        assert!(report
            .results
            .iter()
            .any(|r| r.message == "W(3,3): SRG(40,12,2,4) confirmed"));
        assert!(report
            .results
            .iter()
            .any(|r| r.validator == "isomorphism" && r.message.starts_with("W(3,3) relabelled: certified")));
        assert!(report.results.iter().any(|r| r.validator == "isomorphism"
            && r.message.starts_with("W(3,3) vs Q(4,3): refuted by pair closures")));
        assert_eq!(report.count(Severity::Warning), 0);
    }

    #[test]
    fn run_keeps_spaces_and_certificates() {
        let suite = SuiteConfig::builtin().unwrap();
        let run = run_suite(&suite).unwrap();
        assert_eq!(run.spaces.len(), 2);
        assert!(run.spaces.values().all(Option::is_some));
        assert_eq!(run.certificates.len(), suite.isomorphisms.len());
        assert!(run.certificates[0].as_ref().unwrap().is_certified());
        assert!(run.certificates[1].as_ref().unwrap().is_refuted());
    }

    #[test]
    fn wrong_declarations_are_failures_not_errors() {
        let suite = SuiteConfig {
            tolerance: Default::default(),
            moduli: vec![5],
            spaces: vec![SpaceClaim {
                name: "W(3,3)".into(),
                config: SpaceConfig::symplectic(3, 4),
                expect_points: Some(41),
                expect_srg: Some(SrgParameters::new(40, 12, 3, 4)),
                p_ranks: vec![3],
                actions: vec![ActionClaim {
                    name: "involution".into(),
                    generators: GeneratorSpec::Matrices {
                        matrices: vec![vec![
                            vec![1, 0, 0, 0],
                            vec![0, -1, 0, 0],
                            vec![0, 0, 1, 0],
                            vec![0, 0, 0, -1],
                        ]],
                    },
                    domain: Default::default(),
                    expect_sizes: Some(vec![40]),
                    joint_idempotents: false,
                }],
            }],
            isomorphisms: Vec::new(),
        };
        let report = run_all(&suite).unwrap();
        let failed: Vec<&str> = report
            .results
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| r.message.as_str())
            .collect();
        assert_eq!(failed.len(), 4, "{failed:#?}");
        assert!(failed.contains(&"W(3,3): 40 points (declared 41)"));
        assert!(failed.contains(&"W(3,3): declared SRG(40,12,3,4), found SRG(40,12,2,4)"));
        assert!(failed
            .iter()
            .any(|m| m.starts_with("W(3,3): adjacency 3-rank is")));
        assert!(failed.contains(&"W(3,3): involution: orbit sizes differ from the declaration"));
    }
}
