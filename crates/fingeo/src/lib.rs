//! Finite-geometry verification engine.
//!
//! `fingeo` builds incidence structures over prime fields and checks
//! combinatorial claims about them with exact arithmetic where the claim is
//! exact and with explicit tolerances where it is spectral.
//!
//! # Components
//!
//! | Module | Role |
//! |--------|------|
//! | [`field`] | GF(p) arithmetic on canonical representatives |
//! | [`linalg`] | Rank, kernel, inverse, determinant over GF(p) |
//! | [`form`], [`incidence`] | Projective points, collinearity, and lines of a form |
//! | [`graph`], [`invariants`] | Degrees, spectra, SRG parameters, p-ranks |
//! | [`perm`], [`orbit`] | Permutations and orbits of generated groups |
//! | [`spectral`], [`scheme`] | Real eigen-decomposition and joint idempotents |
//! | [`iso`] | Isomorphism certificates |
//!
//! Exact and floating-point data never mix implicitly: [`linalg::ModMatrix`]
//! holds GF(p) entries only, [`spectral::RealMatrix`] holds `f64` only, and
//! the single crossing is [`linalg::ModMatrix::lift_to_real`] (or a graph's
//! 0/1 adjacency matrix).
//!
//! # Failure model
//!
//! Malformed input, arithmetic impossibilities, construction mismatches,
//! and numerical instability are [`Error`]s and propagate unchanged.
//! A mathematical claim that turns out false is an ordinary value:
//! [`invariants::SrgVerdict::NotStronglyRegular`] or
//! [`iso::Verdict::Refuted`].
//!
//! # Example: the symplectic quadrangle W(3, 3)
//!
//! ```
//! use fingeo::config::{SpaceConfig, Tolerance};
//! use fingeo::incidence::IncidenceSpace;
//! use fingeo::invariants::{eigen_spectrum, srg_parameters, SrgParameters};
//!
//! let space = IncidenceSpace::build(&SpaceConfig::symplectic(3, 4))?;
//! let g = space.graph();
//! assert_eq!(srg_parameters(g).parameters(), Some(SrgParameters::new(40, 12, 2, 4)));
//!
//! let spectrum = eigen_spectrum(g, Tolerance::default())?;
//! assert_eq!(spectrum.to_string(), "{12^1, 2^24, -4^15}");
//! # Ok::<(), fingeo::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_errors_doc
)]
#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod error;
pub mod field;
pub mod form;
pub mod graph;
pub mod incidence;
pub mod invariants;
pub mod iso;
pub mod linalg;
pub mod orbit;
pub mod perm;
pub mod scheme;
pub mod spectral;

pub use config::{FormSpec, PointSelection, SearchBudget, SpaceConfig, Tolerance};
pub use error::{Error, Result};
pub use field::{FieldElement, PrimeField};
pub use graph::Graph;
pub use incidence::{IncidenceSpace, SpaceCache};
pub use invariants::{SrgParameters, SrgVerdict};
pub use iso::{Certifier, IsomorphismCertificate, UniquenessHint, Verdict};
pub use linalg::ModMatrix;
pub use orbit::OrbitPartition;
pub use perm::Permutation;
pub use scheme::Decomposition;
