//! Conformance validators, one module per engine component.
//!
//! Each validator turns a declared property into `TestResult`s. A property
//! that turns out false is a `Failure` result with its counter-example in
//! `details`; only malformed input and numerical instability abort the run.

pub mod construction;
pub mod field;
pub mod idempotents;
pub mod isomorphism;
pub mod linalg;
pub mod orbits;
pub mod spectrum;
pub mod srg;
