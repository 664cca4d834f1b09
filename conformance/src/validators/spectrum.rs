//! Spectrum validator: computed adjacency spectrum against the spectrum
//! predicted by the SRG parameters.

use anyhow::{Context, Result};
use fingeo::config::Tolerance;
use fingeo::invariants::{eigen_spectrum, real_spectrum, srg_parameters};
use fingeo::IncidenceSpace;

use crate::report::{ConformanceReport, TestResult};
use crate::suite::SpaceClaim;

const VALIDATOR: &str = "space/spectrum";

/// Compares computed and predicted spectra.
///
/// Integral predictions are compared exactly after clustering; irrational
/// ones (conference graphs) are compared within the tolerance.
///
/// # Errors
///
/// Returns an error on numerical instability: an integral spectrum was
/// predicted but some computed eigenvalue is not within tolerance of an
/// integer.
pub fn validate(
    claim: &SpaceClaim,
    space: &IncidenceSpace,
    tol: Tolerance,
) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let g = space.graph();
    let Some(parameters) = srg_parameters(g).parameters() else {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("{}: no SRG prediction to compare against", claim.name),
        ));
        return Ok(report);
    };
    let Some(predicted) = parameters.predicted_spectrum() else {
        report.push(TestResult::warn(
            VALIDATOR,
            format!("{}: {parameters} has no predicted spectrum", claim.name),
        ));
        return Ok(report);
    };

    let integral = predicted
        .eigenvalues
        .iter()
        .all(|v| (v - v.round()).abs() <= tol.value());
    let mut issues = Vec::new();
    let rendered;
    if integral {
        let spectrum = eigen_spectrum(g, tol)
            .with_context(|| format!("{}: adjacency spectrum", claim.name))?;
        for (value, mult) in predicted.eigenvalues.iter().zip(predicted.multiplicities) {
            let eigenvalue = value.round() as i64;
            let found = spectrum.multiplicity(eigenvalue);
            if (found as f64 - mult).abs() > tol.value() {
                issues.push(format!(
                    "eigenvalue {eigenvalue}: multiplicity {found}, predicted {mult}"
                ));
            }
        }
        if spectrum.total() != space.point_count() {
            issues.push(format!(
                "multiplicities sum to {}, not {}",
                spectrum.total(),
                space.point_count()
            ));
        }
        rendered = spectrum.to_string();
    } else {
        let spectrum = real_spectrum(g, tol);
        for (value, mult) in predicted.eigenvalues.iter().zip(predicted.multiplicities) {
            let found: usize = spectrum
                .entries
                .iter()
                .filter(|e| (e.eigenvalue - value).abs() <= tol.value())
                .map(|e| e.multiplicity)
                .sum();
            if (found as f64 - mult).abs() > tol.value() {
                issues.push(format!(
                    "eigenvalue {value:.6}: multiplicity {found}, predicted {mult}"
                ));
            }
        }
        rendered = spectrum.to_string();
    }

    report.push(if issues.is_empty() {
        TestResult::pass(
            VALIDATOR,
            format!("{}: spectrum {rendered} matches {parameters}", claim.name),
        )
    } else {
        TestResult::fail_with_details(
            VALIDATOR,
            format!("{}: spectrum {rendered} disagrees with {parameters}", claim.name),
            issues,
        )
    });
    Ok(report)
}
