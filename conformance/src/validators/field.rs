//! Field-law validator.
//!
//! Checks the ring axioms and the existence of inverses over GF(p) for each
//! declared modulus: on every element for small p, on a fixed sample of
//! elements (the smallest ones and a few near p) otherwise.

use anyhow::{Context, Result};
use fingeo::{Error, PrimeField};

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "field/laws";

/// Moduli above this bound are checked on a sample instead of all triples.
const EXHAUSTIVE_LIMIT: u32 = 31;

/// Validates the field laws for every modulus.
///
/// # Errors
///
/// Returns an error if a modulus is not prime.
pub fn validate(moduli: &[u32]) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    for &p in moduli {
        let field = PrimeField::new(p).with_context(|| format!("modulus {p}"))?;
        let values = sample(field);
        let mut issues = Vec::new();
        check_ring_axioms(field, &values, &mut issues);
        check_inverses(field, &values, &mut issues);
        report.push(if issues.is_empty() {
            let scope = if p <= EXHAUSTIVE_LIMIT {
                String::new()
            } else {
                format!(" on {} sampled elements", values.len())
            };
            TestResult::pass(VALIDATOR, format!("GF({p}): ring axioms and inverses hold{scope}"))
        } else {
            TestResult::fail_with_details(
                VALIDATOR,
                format!("GF({p}): {} law violation(s)", issues.len()),
                issues,
            )
        });
    }
    Ok(report)
}

fn sample(field: PrimeField) -> Vec<u32> {
    let p = field.modulus();
    if p <= EXHAUSTIVE_LIMIT {
        (0..p).collect()
    } else {
        let mut s: Vec<u32> = (0..EXHAUSTIVE_LIMIT).collect();
        s.extend([p / 2, p - 2, p - 1]);
        s.sort_unstable();
        s.dedup();
        s
    }
}

fn check_ring_axioms(field: PrimeField, values: &[u32], issues: &mut Vec<String>) {
    for &a in values {
        for &b in values {
            let (x, y) = (field.element(a.into()), field.element(b.into()));
            if field.add(x, y) != field.add(y, x) || field.mul(x, y) != field.mul(y, x) {
                issues.push(format!("commutativity fails at ({a}, {b})"));
            }
            if field.sub(field.add(x, y), y) != x {
                issues.push(format!("(a + b) - b != a at ({a}, {b})"));
            }
            for &c in values {
                let z = field.element(c.into());
                if field.mul(x, field.add(y, z)) != field.add(field.mul(x, y), field.mul(x, z)) {
                    issues.push(format!("distributivity fails at ({a}, {b}, {c})"));
                }
            }
        }
    }
}

fn check_inverses(field: PrimeField, values: &[u32], issues: &mut Vec<String>) {
    for a in values.iter().filter(|&&v| v != 0).map(|&v| field.element(v.into())) {
        match field.inv(a) {
            Ok(inv) if field.mul(a, inv) == field.one() => {}
            Ok(inv) => issues.push(format!("{a} * {inv} != 1")),
            Err(e) => issues.push(format!("{a} has no inverse: {e}")),
        }
    }
    if field.inv(field.zero()) != Err(Error::DivisionByZero { modulus: field.modulus() }) {
        issues.push("inverse of zero did not report division by zero".into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_primes_pass() {
        let report = validate(&[2, 3, 5, 7]).unwrap();
        assert_eq!(report.results.len(), 4);
        assert!(report.all_passed());
    }

    #[test]
    fn large_prime_is_sampled() {
        let field = PrimeField::new(65_521).unwrap();
        let values = sample(field);
        assert_eq!(values.len(), 34);
        assert!(values.contains(&65_520));
        let report = validate(&[65_521]).unwrap();
        assert!(report.all_passed());
        assert_eq!(
            report.results[0].message,
            "GF(65521): ring axioms and inverses hold on 34 sampled elements"
        );
    }

    #[test]
    fn sample_has_no_duplicates_just_above_the_limit() {
        // 37 / 2 = 18 is already among the smallest elements.
        let values = sample(PrimeField::new(37).unwrap());
        assert_eq!(values.len(), 33);
    }

    #[test]
    fn composite_modulus_aborts() {
        assert!(validate(&[9]).is_err());
    }
}
