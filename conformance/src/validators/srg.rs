//! Strong-regularity validator.

use anyhow::Result;
use fingeo::invariants::{srg_parameters, SrgVerdict};
use fingeo::IncidenceSpace;

use crate::report::{ConformanceReport, TestResult};
use crate::suite::SpaceClaim;

const VALIDATOR: &str = "space/srg";

/// Checks the declared SRG parameters against the collinearity graph.
///
/// # Errors
///
/// This validator does not fail; the signature matches the other validators.
pub fn validate(claim: &SpaceClaim, space: &IncidenceSpace) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let verdict = srg_parameters(space.graph());
    match (&verdict, claim.expect_srg) {
        (SrgVerdict::StronglyRegular { parameters }, Some(expected)) if *parameters == expected => {
            report.push(TestResult::pass(
                VALIDATOR,
                format!("{}: {parameters} confirmed", claim.name),
            ));
        }
        (SrgVerdict::StronglyRegular { parameters }, Some(expected)) => {
            report.push(TestResult::fail_with_details(
                VALIDATOR,
                format!("{}: declared {expected}, found {parameters}", claim.name),
                vec![format!("computed parameters: {parameters}")],
            ));
        }
        (SrgVerdict::StronglyRegular { parameters }, None) => {
            report.push(TestResult::pass(
                VALIDATOR,
                format!("{}: collinearity graph is {parameters}", claim.name),
            ));
        }
        (SrgVerdict::NotStronglyRegular { violation }, Some(expected)) => {
            report.push(TestResult::fail_with_details(
                VALIDATOR,
                format!("{}: declared {expected}, graph is not strongly regular", claim.name),
                vec![format!("{violation:?}")],
            ));
        }
        (SrgVerdict::NotStronglyRegular { violation }, None) => {
            report.push(TestResult::pass(
                VALIDATOR,
                format!("{}: not strongly regular ({violation:?})", claim.name),
            ));
        }
    }
    if let Some(parameters) = verdict.parameters() {
        report.push(TestResult::check(
            VALIDATOR,
            parameters.is_feasible(),
            format!("{}: {parameters} satisfies the feasibility conditions", claim.name),
        ));
    }
    Ok(report)
}
