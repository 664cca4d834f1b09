//! Immutable engine configuration.
//!
//! A [`SpaceConfig`] names everything an incidence-space construction
//! depends on: field order, ambient dimension, defining form, and which
//! projective points to keep. It is passed by reference into every
//! constructor; nothing is read from ambient state.
//!
//! ```
//! use fingeo::config::{FormSpec, PointSelection, SpaceConfig};
//!
//! let cfg: SpaceConfig = serde_json::from_str(
//!     r#"{ "field_order": 3, "dimension": 4, "form": { "type": "symplectic" } }"#,
//! ).unwrap();
//! assert_eq!(cfg.form, FormSpec::Symplectic);
//! assert_eq!(cfg.points, PointSelection::All);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::PrimeField;
use crate::form::{Form, QuadraticForm, SymmetricBilinearForm, SymplecticForm};
use crate::linalg::ModMatrix;

/// Absolute numerical tolerance for eigenvalue clustering and matrix identities.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tolerance(f64);

impl Tolerance {
    /// The customary `1e-6`.
    pub const DEFAULT: Self = Self(1e-6);

    /// Construct a tolerance.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] unless `value` is finite and positive.
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(Error::invalid(format!("tolerance {value} must be finite and positive")))
        }
    }

    /// Raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Tolerance> for f64 {
    fn from(t: Tolerance) -> f64 {
        t.0
    }
}

/// Limits on the backtracking isomorphism search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    /// Maximum number of search nodes (partial assignments) to expand.
    pub max_nodes: u64,
    /// Optional wall-clock limit in milliseconds.
    pub max_millis: Option<u64>,
}

impl SearchBudget {
    /// No node or time limit.
    pub const UNLIMITED: Self = Self {
        max_nodes: u64::MAX,
        max_millis: None,
    };
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_nodes: 1_000_000,
            max_millis: None,
        }
    }
}

/// Serializable description of the defining form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormSpec {
    /// Standard alternating form `Σ uᵢ v_{i+m} − u_{i+m} vᵢ` on `n = 2m`.
    Symplectic,
    /// Symmetric bilinear form `uᵀ G v`.
    Bilinear {
        /// Symmetric Gram matrix (integer entries, reduced mod p).
        gram: Vec<Vec<i64>>,
    },
    /// Quadratic form `Q(x) = xᵀ C x`, polar form `xᵀ (C + Cᵀ) y`.
    Quadratic {
        /// Coefficient matrix; `C[i][j]` multiplies `xᵢ xⱼ`.
        coefficients: Vec<Vec<i64>>,
    },
}

/// Which projective points enter the incidence space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointSelection {
    /// Every point of PG(n − 1, q).
    #[default]
    All,
    /// Only singular points (`Q(x) = 0`, resp. `B(x, x) = 0`).
    Singular,
}

/// Immutable construction record for one incidence space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceConfig {
    /// Prime field order q.
    pub field_order: u32,
    /// Ambient vector-space dimension n.
    pub dimension: usize,
    /// Defining form.
    pub form: FormSpec,
    /// Point selection rule.
    #[serde(default)]
    pub points: PointSelection,
}

impl SpaceConfig {
    /// Symplectic space `W(n − 1, q)` over all points.
    pub fn symplectic(field_order: u32, dimension: usize) -> Self {
        Self {
            field_order,
            dimension,
            form: FormSpec::Symplectic,
            points: PointSelection::All,
        }
    }

    /// Singular points of the quadric `Q(x) = xᵀ C x`.
    pub fn quadric(field_order: u32, coefficients: Vec<Vec<i64>>) -> Self {
        Self {
            field_order,
            dimension: coefficients.len(),
            form: FormSpec::Quadratic { coefficients },
            points: PointSelection::Singular,
        }
    }

    /// Instantiate the field and the form this record describes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for a non-prime order, a form whose matrix
    /// does not match `dimension`, or a form the field cannot carry.
    pub fn instantiate(&self) -> Result<(PrimeField, Arc<dyn Form>)> {
        let field = PrimeField::new(self.field_order)?;
        let form: Arc<dyn Form> = match &self.form {
            FormSpec::Symplectic => Arc::new(SymplecticForm::new(field, self.dimension)?),
            FormSpec::Bilinear { gram } => {
                let g = ModMatrix::from_rows(field, gram)?;
                Arc::new(SymmetricBilinearForm::new(g)?)
            }
            FormSpec::Quadratic { coefficients } => {
                let c = ModMatrix::from_rows(field, coefficients)?;
                Arc::new(QuadraticForm::new(c)?)
            }
        };
        if form.dimension() != self.dimension {
            return Err(Error::invalid(format!(
                "form has dimension {}, configuration says {}",
                form.dimension(),
                self.dimension
            )));
        }
        Ok((field, form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_validation() {
        assert!(Tolerance::new(0.0).is_err());
        assert!(Tolerance::new(f64::NAN).is_err());
        assert_eq!(Tolerance::new(1e-9).unwrap().value(), 1e-9);
        assert_eq!(Tolerance::default().value(), 1e-6);
    }

    #[test]
    fn instantiate_symplectic() {
        let (field, form) = SpaceConfig::symplectic(3, 4).instantiate().unwrap();
        assert_eq!(field.modulus(), 3);
        assert_eq!(form.dimension(), 4);
    }

    #[test]
    fn odd_symplectic_dimension_rejected() {
        assert!(SpaceConfig::symplectic(3, 5).instantiate().is_err());
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let cfg = SpaceConfig {
            field_order: 5,
            dimension: 3,
            form: FormSpec::Bilinear {
                gram: vec![vec![1, 0], vec![0, 1]],
            },
            points: PointSelection::All,
        };
        assert!(matches!(cfg.instantiate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn composite_order_rejected() {
        assert!(SpaceConfig::symplectic(4, 4).instantiate().is_err());
    }

    #[test]
    fn budget_defaults_from_partial_json() {
        let b: SearchBudget = serde_json::from_str(r#"{ "max_millis": 250 }"#).unwrap();
        assert_eq!(b.max_nodes, 1_000_000);
        assert_eq!(b.max_millis, Some(250));
    }
}
