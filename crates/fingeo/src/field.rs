//! Exact arithmetic in the prime field GF(p).
//!
//! Elements are integer representatives in `[0, p)`. The only way to obtain
//! a [`FieldElement`] is through a [`PrimeField`], which reduces its input,
//! so every value in circulation is already canonical.
//!
//! # Example
//!
//! ```
//! use fingeo::field::PrimeField;
//!
//! let f = PrimeField::new(7).unwrap();
//! let a = f.element(3);
//! let b = f.element(5);
//! assert_eq!(f.mul(a, b).value(), 1); // 15 = 2·7 + 1
//! assert_eq!(f.inv(a).unwrap(), b);
//! assert!(f.inv(f.zero()).is_err());
//! ```

use serde::Serialize;

use crate::error::{Error, Result};

/// A canonical representative of GF(p), always in `[0, p)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FieldElement(u32);

impl FieldElement {
    /// Additive identity (valid in every prime field).
    pub const ZERO: Self = Self(0);

    /// Multiplicative identity (valid in every prime field).
    pub const ONE: Self = Self(1);

    /// Integer representative.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// True for the additive identity.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Display for FieldElement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The prime field GF(p).
///
/// Copy-sized handle carrying only the modulus. All operations are O(1)
/// except [`PrimeField::pow`] (O(log e)) and [`PrimeField::inv`]
/// (O(log p)); [`PrimeField::inv`] of zero is the single partial case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PrimeField {
    p: u32,
}

impl PrimeField {
    /// Construct GF(p).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when `p` is not prime.
    pub fn new(p: u32) -> Result<Self> {
        if !is_prime(p) {
            return Err(Error::invalid(format!("field order {p} is not prime")));
        }
        Ok(Self { p })
    }

    /// The modulus `p`.
    #[inline]
    pub const fn modulus(&self) -> u32 {
        self.p
    }

    /// Number of elements.
    #[inline]
    pub const fn order(&self) -> usize {
        self.p as usize
    }

    /// Reduce an unsigned integer into the field.
    #[inline]
    pub const fn element(&self, value: u64) -> FieldElement {
        FieldElement((value % self.p as u64) as u32)
    }

    /// Reduce a signed integer into the field (`-1 ↦ p - 1`).
    #[inline]
    pub const fn element_signed(&self, value: i64) -> FieldElement {
        FieldElement(value.rem_euclid(self.p as i64) as u32)
    }

    /// Additive identity.
    #[inline]
    pub const fn zero(&self) -> FieldElement {
        FieldElement::ZERO
    }

    /// Multiplicative identity.
    #[inline]
    pub const fn one(&self) -> FieldElement {
        FieldElement::ONE
    }

    /// `a + b mod p`.
    #[inline]
    pub const fn add(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        let s = a.0 as u64 + b.0 as u64;
        FieldElement((s % self.p as u64) as u32)
    }

    /// `a - b mod p`.
    #[inline]
    pub const fn sub(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        let s = a.0 as u64 + self.p as u64 - b.0 as u64;
        FieldElement((s % self.p as u64) as u32)
    }

    /// `-a mod p`.
    #[inline]
    pub const fn neg(&self, a: FieldElement) -> FieldElement {
        if a.0 == 0 {
            a
        } else {
            FieldElement(self.p - a.0)
        }
    }

    /// `a · b mod p`.
    #[inline]
    pub const fn mul(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        FieldElement(((a.0 as u64 * b.0 as u64) % self.p as u64) as u32)
    }

    /// Multiplicative inverse via the extended Euclidean algorithm.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] for `a = 0`.
    pub fn inv(&self, a: FieldElement) -> Result<FieldElement> {
        if a.is_zero() {
            return Err(Error::DivisionByZero { modulus: self.p });
        }
        let (mut old_r, mut r) = (a.0 as i64, self.p as i64);
        let (mut old_s, mut s) = (1i64, 0i64);
        while r != 0 {
            let q = old_r / r;
            (old_r, r) = (r, old_r - q * r);
            (old_s, s) = (s, old_s - q * s);
        }
        debug_assert_eq!(old_r, 1, "gcd(a, p) must be 1 for prime p");
        Ok(self.element_signed(old_s))
    }

    /// `a / b mod p`.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] for `b = 0`.
    pub fn div(&self, a: FieldElement, b: FieldElement) -> Result<FieldElement> {
        Ok(self.mul(a, self.inv(b)?))
    }

    /// `a^e mod p` by square-and-multiply. `0^0 = 1`.
    pub const fn pow(&self, a: FieldElement, mut e: u64) -> FieldElement {
        let mut base = a;
        let mut acc = FieldElement::ONE;
        while e > 0 {
            if e & 1 == 1 {
                acc = self.mul(acc, base);
            }
            base = self.mul(base, base);
            e >>= 1;
        }
        acc
    }

    /// Quadratic-residue test (Euler's criterion). Zero counts as a square.
    pub const fn is_square(&self, a: FieldElement) -> bool {
        if a.0 == 0 || self.p == 2 {
            return true;
        }
        self.pow(a, (self.p as u64 - 1) / 2).0 == 1
    }

    /// All elements `0, 1, …, p - 1` in order.
    pub fn elements(&self) -> impl Iterator<Item = FieldElement> {
        (0..self.p).map(FieldElement)
    }

    /// All nonzero elements `1, …, p - 1` in order.
    pub fn nonzero(&self) -> impl Iterator<Item = FieldElement> {
        (1..self.p).map(FieldElement)
    }

    /// Dot product of two equal-length coordinate slices.
    pub fn dot(&self, u: &[FieldElement], v: &[FieldElement]) -> FieldElement {
        u.iter()
            .zip(v)
            .fold(FieldElement::ZERO, |acc, (&a, &b)| self.add(acc, self.mul(a, b)))
    }
}

/// Trial-division primality test (inputs are small moduli).
pub const fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3u64;
    while d * d <= n as u64 {
        if n as u64 % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_composite_modulus() {
        assert!(PrimeField::new(0).is_err());
        assert!(PrimeField::new(1).is_err());
        assert!(PrimeField::new(9).is_err());
        assert!(PrimeField::new(91).is_err());
        assert!(PrimeField::new(2).is_ok());
        assert!(PrimeField::new(97).is_ok());
    }

    #[test]
    fn reduction_is_canonical() {
        let f = PrimeField::new(5).unwrap();
        assert_eq!(f.element(12).value(), 2);
        assert_eq!(f.element_signed(-1).value(), 4);
        assert_eq!(f.element_signed(-10).value(), 0);
    }

    #[test]
    fn add_sub_neg() {
        let f = PrimeField::new(3).unwrap();
        let two = f.element(2);
        assert_eq!(f.add(two, two).value(), 1);
        assert_eq!(f.sub(f.zero(), f.one()), two);
        assert_eq!(f.neg(two), f.one());
        assert_eq!(f.neg(f.zero()), f.zero());
    }

    #[test]
    fn every_nonzero_element_has_unique_inverse() {
        for p in [2u32, 3, 5, 7, 11, 13, 31] {
            let f = PrimeField::new(p).unwrap();
            for a in f.nonzero() {
                let inverses: Vec<_> = f.nonzero().filter(|&b| f.mul(a, b) == f.one()).collect();
                assert_eq!(inverses.len(), 1, "GF({p}) element {a}");
                assert_eq!(f.inv(a).unwrap(), inverses[0]);
            }
        }
    }

    #[test]
    fn inverse_of_zero_fails() {
        let f = PrimeField::new(11).unwrap();
        assert_eq!(f.inv(f.zero()), Err(Error::DivisionByZero { modulus: 11 }));
        assert!(f.div(f.one(), f.zero()).is_err());
    }

    #[test]
    fn fermat_little_theorem() {
        let f = PrimeField::new(13).unwrap();
        for a in f.nonzero() {
            assert_eq!(f.pow(a, 12), f.one());
        }
        assert_eq!(f.pow(f.zero(), 0), f.one());
    }

    #[test]
    fn squares_mod_7() {
        let f = PrimeField::new(7).unwrap();
        let squares: Vec<u32> = f
            .nonzero()
            .filter(|&a| f.is_square(a))
            .map(FieldElement::value)
            .collect();
        assert_eq!(squares, vec![1, 2, 4]);
    }

    #[test]
    fn large_prime_products_do_not_overflow() {
        let f = PrimeField::new(4_294_967_291).unwrap(); // largest u32 prime
        let a = f.element(4_294_967_290);
        assert_eq!(f.mul(a, a), f.one()); // (-1)² = 1
        assert_eq!(f.add(a, a).value(), 4_294_967_289);
    }
}
