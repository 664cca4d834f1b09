//! Suite configuration: the spaces to build and the claims to check.
//!
//! A suite is read from TOML. The built-in suite (`suites/default.toml`)
//! covers W(3, 3) and Q(4, 3) and is used when no file is given.

use std::path::Path;

use anyhow::{Context, Result};
use fingeo::config::{SearchBudget, SpaceConfig, Tolerance};
use fingeo::invariants::SrgParameters;
use serde::{Deserialize, Serialize};

const DEFAULT_SUITE: &str = include_str!("../suites/default.toml");

/// Top-level suite configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Spectral tolerance for every floating-point check.
    #[serde(default)]
    pub tolerance: Tolerance,
    /// Prime moduli whose field laws are checked.
    #[serde(default)]
    pub moduli: Vec<u32>,
    /// Incidence spaces and their declared properties.
    #[serde(default)]
    pub spaces: Vec<SpaceClaim>,
    /// Isomorphism claims between declared spaces.
    #[serde(default)]
    pub isomorphisms: Vec<IsomorphismClaim>,
}

/// One incidence space and what it is claimed to satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceClaim {
    /// Name used in reports and by isomorphism claims.
    pub name: String,
    /// Construction record.
    pub config: SpaceConfig,
    /// Declared number of points.
    #[serde(default)]
    pub expect_points: Option<usize>,
    /// Declared strongly regular parameters of the collinearity graph.
    #[serde(default)]
    pub expect_srg: Option<SrgParameters>,
    /// Primes at which the adjacency matrix is claimed to be nonsingular.
    #[serde(default)]
    pub p_ranks: Vec<u32>,
    /// Group actions on the space.
    #[serde(default)]
    pub actions: Vec<ActionClaim>,
}

/// What a group acts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionDomain {
    /// Points of the space.
    #[default]
    Points,
    /// Lines of the space, through the induced action.
    Lines,
}

/// How the generators of an action are given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorSpec {
    /// Transvections `x ↦ x + B(x, v) v` along every point `v` of the space.
    Transvections,
    /// Form-preserving linear maps (integer entries, reduced mod p).
    Matrices {
        /// One square matrix per generator.
        matrices: Vec<Vec<Vec<i64>>>,
    },
    /// Explicit permutations of the points, as image lists.
    Permutations {
        /// One image list per generator.
        images: Vec<Vec<usize>>,
    },
}

/// A group action and its declared orbit structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionClaim {
    /// Name used in reports.
    pub name: String,
    /// Generators, acting on points.
    pub generators: GeneratorSpec,
    /// Domain the orbits are computed on.
    #[serde(default)]
    pub domain: ActionDomain,
    /// Declared orbit sizes, in descending order.
    #[serde(default)]
    pub expect_sizes: Option<Vec<usize>>,
    /// Decompose the adjacency matrix jointly with the generators. Only
    /// meaningful for pairwise commuting involutions.
    #[serde(default)]
    pub joint_idempotents: bool,
}

/// Declared outcome of an isomorphism claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The graphs are claimed isomorphic.
    Isomorphic,
    /// The graphs are claimed non-isomorphic.
    NonIsomorphic,
}

/// Affine relabelling `i ↦ stride · i + offset (mod n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relabel {
    /// Multiplier, coprime to the order.
    pub stride: usize,
    /// Shift.
    #[serde(default)]
    pub offset: usize,
}

impl Relabel {
    /// Images of the relabelling on `0..n`.
    pub fn images(&self, n: usize) -> Vec<usize> {
        (0..n)
            .map(|i| (i * self.stride + self.offset) % n.max(1))
            .collect()
    }
}

/// A claim that two declared spaces have (non-)isomorphic collinearity graphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsomorphismClaim {
    /// Name used in reports.
    pub name: String,
    /// Name of the left space.
    pub left: String,
    /// Name of the right space.
    pub right: String,
    /// Optional relabelling of the right graph before comparison.
    #[serde(default)]
    pub relabel: Option<Relabel>,
    /// Declared outcome.
    pub expect: Expectation,
    /// Search limits.
    #[serde(default)]
    pub budget: SearchBudget,
    /// Consult the built-in catalogue of uniqueness theorems.
    #[serde(default = "default_true")]
    pub catalogue: bool,
}

fn default_true() -> bool {
    true
}

impl SuiteConfig {
    /// Parse a suite from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid suite.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse suite configuration")
    }

    /// Read and parse a suite file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In {}", path.display()))
    }

    /// The built-in suite.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded suite fails to parse.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(DEFAULT_SUITE)
    }

    /// Looks up a declared space by name.
    pub fn space(&self, name: &str) -> Option<&SpaceClaim> {
        self.spaces.iter().find(|s| s.name == name)
    }
}
