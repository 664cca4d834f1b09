//! Construction validator.
//!
//! Builds each declared incidence space and checks point and line counts
//! and the partial-linear-space axiom. A construction that disagrees with
//! its closed-form counts is reported as a failure, not an abort.

use std::sync::Arc;

use anyhow::{Context, Result};
use fingeo::{Error, IncidenceSpace, SpaceCache};

use crate::report::{ConformanceReport, TestResult};
use crate::suite::SpaceClaim;

const VALIDATOR: &str = "space/construction";

/// Builds the space and validates its counts.
///
/// Returns the space when construction succeeded, so later validators can
/// reuse it.
///
/// # Errors
///
/// Returns an error if the configuration is malformed.
pub fn validate(
    claim: &SpaceClaim,
    cache: &mut SpaceCache,
) -> Result<(ConformanceReport, Option<Arc<IncidenceSpace>>)> {
    let mut report = ConformanceReport::new();
    let space = match cache.get_or_build(&claim.config) {
        Ok(space) => space,
        Err(e @ Error::StructuralMismatch { .. }) => {
            report.push(TestResult::fail_with_details(
                VALIDATOR,
                format!("{}: construction failed", claim.name),
                vec![e.to_string()],
            ));
            return Ok((report, None));
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to build {}", claim.name)),
    };

    validate_points(claim, &space, &mut report);
    validate_lines(claim, &space, &mut report);
    Ok((report, Some(space)))
}

fn validate_points(claim: &SpaceClaim, space: &IncidenceSpace, report: &mut ConformanceReport) {
    let count = space.point_count();
    match claim.expect_points {
        Some(expected) => report.push(TestResult::check(
            VALIDATOR,
            count == expected,
            format!("{}: {count} points (declared {expected})", claim.name),
        )),
        None => report.push(TestResult::pass(
            VALIDATOR,
            format!("{}: {count} points match the closed form", claim.name),
        )),
    }
}

fn validate_lines(claim: &SpaceClaim, space: &IncidenceSpace, report: &mut ConformanceReport) {
    let lines = space.lines();
    let size = space.field().order() + 1;
    let mut issues = Vec::new();
    for (i, a) in lines.iter().enumerate() {
        for (j, b) in lines.iter().enumerate().skip(i + 1) {
            let shared = a.points.iter().filter(|p| b.points.binary_search(p).is_ok()).count();
            if shared > 1 {
                issues.push(format!("lines {i} and {j} share {shared} points"));
            }
        }
    }
    let mut on = vec![0usize; space.point_count()];
    for line in lines {
        for &p in &line.points {
            on[p] += 1;
        }
    }
    let per_point = on.iter().min().copied().unwrap_or(0);
    let uniform = on.iter().all(|&c| c == per_point);
    if issues.is_empty() {
        let tail = if uniform {
            format!(", {per_point} through each point")
        } else {
            String::new()
        };
        report.push(TestResult::pass(
            VALIDATOR,
            format!("{}: {} lines of {size} points{tail}", claim.name, lines.len()),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            format!("{}: lines meet in more than one point", claim.name),
            issues,
        ));
    }
}
