//! Artifact bundle: the plain records behind a conformance run.
//!
//! Points, lines, edges, orbit assignments, idempotent coefficients and
//! isomorphism certificates, ready for JSON output.

use anyhow::{Context, Result};
use fingeo::config::{SpaceConfig, Tolerance};
use fingeo::graph::{EdgeRecord, Graph};
use fingeo::incidence::{LineRecord, PointRecord};
use fingeo::invariants::{eigen_spectrum, real_spectrum, srg_parameters, SrgVerdict};
use fingeo::orbit::OrbitRecord;
use fingeo::scheme::{decompose, graph_relations, IdempotentRecord};
use fingeo::{Error, IsomorphismCertificate};
use serde::Serialize;

use crate::suite::SuiteConfig;
use crate::validators::orbits::partition;
use crate::SuiteRun;

/// Records for one declared space.
#[derive(Debug, Serialize)]
pub struct SpaceArtifacts {
    /// Declared name.
    pub name: String,
    /// Construction record.
    pub config: SpaceConfig,
    /// Normalized point coordinates.
    pub points: Vec<PointRecord>,
    /// Lines as point-id lists.
    pub lines: Vec<LineRecord>,
    /// Collinearity edges.
    pub edges: Vec<EdgeRecord>,
    /// Strong-regularity verdict.
    pub srg: SrgVerdict,
    /// Adjacency spectrum: clustered to integers when every eigenvalue is
    /// integral, otherwise clustered reals.
    pub spectrum: String,
    /// Orbit assignments per action.
    pub actions: Vec<ActionArtifacts>,
    /// Bose–Mesner idempotents, when the graph is strongly regular with
    /// integral eigenvalues.
    pub idempotents: Vec<IdempotentRecord>,
}

/// Orbit assignment of one action.
#[derive(Debug, Serialize)]
pub struct ActionArtifacts {
    /// Declared action name.
    pub name: String,
    /// Orbit of every element of the domain.
    pub orbits: Vec<OrbitRecord>,
}

/// Certificate for one isomorphism claim.
#[derive(Debug, Serialize)]
pub struct ClaimArtifacts {
    /// Declared claim name.
    pub name: String,
    /// Certificate, absent when a space failed to build.
    pub certificate: Option<IsomorphismCertificate>,
}

/// Full artifact bundle.
#[derive(Debug, Serialize)]
pub struct Artifacts {
    /// Per-space records.
    pub spaces: Vec<SpaceArtifacts>,
    /// Per-claim certificates.
    pub isomorphisms: Vec<ClaimArtifacts>,
}

/// Collects the records behind a finished run.
///
/// Spaces come from the run's table and certificates from its claims, so
/// nothing is built or certified twice. Spaces that failed to build and
/// actions whose generators do not act are left out; the report explains
/// why.
///
/// # Errors
///
/// Returns an error on malformed generators or numerical instability in
/// the Bose–Mesner decomposition.
pub fn collect_artifacts(suite: &SuiteConfig, run: &SuiteRun) -> Result<Artifacts> {
    let tol = suite.tolerance;
    let mut spaces = Vec::new();
    for claim in &suite.spaces {
        let Some(Some(space)) = run.spaces.get(&claim.name) else {
            continue;
        };
        let g = space.graph();
        let srg = srg_parameters(g);
        let (spectrum, integral) = spectrum_record(g, tol)?;
        let idempotents = if srg.parameters().is_some() && integral {
            decompose(&graph_relations(g), tol)
                .with_context(|| format!("{}: Bose-Mesner algebra", claim.name))?
                .records()
        } else {
            Vec::new()
        };
        let mut actions = Vec::new();
        for action in &claim.actions {
            if let Ok((_, part)) = partition(&action.name, action, space)? {
                actions.push(ActionArtifacts {
                    name: action.name.clone(),
                    orbits: part.records(),
                });
            }
        }
        spaces.push(SpaceArtifacts {
            name: claim.name.clone(),
            config: claim.config.clone(),
            points: space.point_records(),
            lines: space.line_records(),
            edges: space.edge_records(),
            srg,
            spectrum,
            actions,
            idempotents,
        });
    }
    let isomorphisms = suite
        .isomorphisms
        .iter()
        .zip(&run.certificates)
        .map(|(claim, cert)| ClaimArtifacts {
            name: claim.name.clone(),
            certificate: cert.clone(),
        })
        .collect();
    Ok(Artifacts {
        spaces,
        isomorphisms,
    })
}

/// Rendered spectrum and whether it is integral. Only a non-integral
/// eigenvalue falls back to the real clustering; other errors propagate.
fn spectrum_record(g: &Graph, tol: Tolerance) -> Result<(String, bool)> {
    match eigen_spectrum(g, tol) {
        Ok(spectrum) => Ok((spectrum.to_string(), true)),
        Err(Error::NumericalInstability { .. }) => Ok((real_spectrum(g, tol).to_string(), false)),
        Err(e) => Err(e.into()),
    }
}
