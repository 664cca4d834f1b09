//! Exact linear-algebra validator.
//!
//! Checks the kernel law on the point-line incidence matrix, the inverse
//! round trip on the adjacency matrix, and declared nonsingularity of the
//! adjacency matrix at given primes.

use anyhow::{Context, Result};
use fingeo::invariants::p_rank;
use fingeo::{Error, IncidenceSpace, ModMatrix, PrimeField};

use crate::report::{ConformanceReport, TestResult};
use crate::suite::SpaceClaim;

const VALIDATOR: &str = "space/linalg";

/// Validates the linear-algebra laws on one space.
///
/// # Errors
///
/// Returns an error if a declared prime is not prime.
pub fn validate(claim: &SpaceClaim, space: &IncidenceSpace) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    report.push(kernel_law(&claim.name, &space.incidence_matrix()));
    report.push(inverse_law(
        &claim.name,
        &space.graph().adjacency_mod(space.field()),
    )?);
    for &p in &claim.p_ranks {
        let field = PrimeField::new(p).with_context(|| format!("{}: p-rank modulus", claim.name))?;
        let rank = p_rank(space.graph(), field);
        let n = space.point_count();
        report.push(TestResult::check(
            VALIDATOR,
            rank == n,
            format!("{}: adjacency {p}-rank is {rank} of {n}", claim.name),
        ));
    }
    Ok(report)
}

/// Every kernel vector is annihilated and rank + nullity equals the column count.
fn kernel_law(name: &str, m: &ModMatrix) -> TestResult {
    let kernel = m.kernel_basis();
    let mut issues = Vec::new();
    if kernel.len() + m.rank() != m.cols() {
        issues.push(format!(
            "rank {} + nullity {} != {} columns",
            m.rank(),
            kernel.len(),
            m.cols()
        ));
    }
    for (i, v) in kernel.iter().enumerate() {
        match m.mul_vec(v) {
            Ok(image) if image.iter().all(|x| x.is_zero()) => {}
            Ok(_) => issues.push(format!("kernel vector {i} is not annihilated")),
            Err(e) => issues.push(format!("kernel vector {i}: {e}")),
        }
    }
    if issues.is_empty() {
        TestResult::pass(
            VALIDATOR,
            format!(
                "{name}: incidence matrix over GF({}) has rank {} and a {}-dimensional kernel",
                m.field().modulus(),
                m.rank(),
                kernel.len()
            ),
        )
    } else {
        TestResult::fail_with_details(VALIDATOR, format!("{name}: kernel law violated"), issues)
    }
}

/// `M · M⁻¹ = I`, or a singular-matrix error whose rank agrees with the
/// echelon form and a vanishing determinant.
fn inverse_law(name: &str, m: &ModMatrix) -> Result<TestResult> {
    let f = m.field();
    let n = m.rows();
    let result = match m.invert() {
        Ok(inv) => {
            let ok = m.mul(&inv)? == ModMatrix::identity(f, n);
            TestResult::check(
                VALIDATOR,
                ok,
                format!("{name}: adjacency inverse over GF({}) round-trips", f.modulus()),
            )
        }
        Err(Error::SingularMatrix { rank, dimension }) => {
            let ok = rank == m.rank() && dimension == n && m.determinant()?.is_zero();
            TestResult::check(
                VALIDATOR,
                ok,
                format!(
                    "{name}: adjacency is singular over GF({}) with rank {rank} of {dimension}",
                    f.modulus()
                ),
            )
        }
        Err(e) => return Err(e.into()),
    };
    Ok(result)
}
