//! Isomorphism certificates for graphs.
//!
//! Certification runs a fixed state machine:
//!
//! ```text
//! Start → InvariantCheck → FastAccept → Certified
//!                        ↘ SlowSearch → Certified | Refuted | Undetermined
//!        (InvariantCheck may also go straight to Refuted)
//! ```
//!
//! The invariant check compares cheap invariants in increasing cost: order,
//! edge count, sorted degree sequence, strong regularity and its
//! parameters, colour-refinement class sizes, the clustered real spectrum,
//! and, for strongly regular pairs, the pair closures (for each
//! non-adjacent pair, how many vertices are adjacent to all of its common
//! neighbours). The first difference refutes isomorphism with that
//! invariant as witness.
//!
//! When both graphs are strongly regular with parameters covered by a
//! [`UniquenessHint`], the certificate is accepted on the matching
//! invariants alone. Otherwise a backtracking search assigns vertices one
//! at a time, keeping adjacency and non-adjacency to every placed vertex
//! consistent, and either produces a bijection (re-verified edge by edge)
//! or exhausts the search space. A [`SearchBudget`] caps the search; running
//! out yields [`Verdict::Undetermined`], never a guess.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{SearchBudget, Tolerance};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::invariants::{real_spectrum, sorted_degree_sequence, srg_parameters, SrgParameters};

/// States of the certification state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CertifierState {
    /// Nothing checked yet.
    Start,
    /// Comparing cheap invariants.
    InvariantCheck,
    /// Accepted by a uniqueness theorem.
    FastAccept,
    /// Backtracking search.
    SlowSearch,
    /// Terminal: isomorphic.
    Certified,
    /// Terminal: not isomorphic.
    Refuted,
    /// Terminal: nothing could be decided.
    Undetermined,
}

/// A uniqueness theorem: every strongly regular graph with these parameters
/// is isomorphic to every other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniquenessHint {
    /// Parameters covered by the theorem.
    pub parameters: SrgParameters,
    /// Citation or name of the theorem.
    pub theorem: String,
}

impl UniquenessHint {
    /// Declare a uniqueness theorem.
    pub fn new(parameters: SrgParameters, theorem: impl Into<String>) -> Self {
        Self {
            parameters,
            theorem: theorem.into(),
        }
    }

    /// Classical parameter sets known to determine their graph.
    pub fn catalogue() -> Vec<Self> {
        vec![
            Self::new(SrgParameters::new(5, 2, 0, 1), "pentagon"),
            Self::new(SrgParameters::new(10, 3, 0, 1), "Petersen graph"),
            Self::new(SrgParameters::new(16, 5, 0, 2), "Clebsch graph"),
            Self::new(SrgParameters::new(27, 10, 1, 5), "Schläfli graph complement"),
            Self::new(SrgParameters::new(27, 16, 10, 8), "Schläfli graph"),
            Self::new(SrgParameters::new(50, 7, 0, 1), "Hoffman–Singleton graph"),
            Self::new(SrgParameters::new(56, 10, 0, 2), "Gewirtz graph"),
            Self::new(SrgParameters::new(77, 16, 0, 4), "M22 graph"),
            Self::new(SrgParameters::new(100, 22, 0, 6), "Higman–Sims graph"),
        ]
    }
}

/// Evidence for an isomorphism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Witness {
    /// Explicit bijection: left vertex `i` maps to right vertex `mapping[i]`.
    Bijection {
        /// Image of every left vertex.
        mapping: Vec<usize>,
    },
    /// Both graphs are strongly regular with parameters fixed by a theorem.
    Uniqueness {
        /// Shared parameters.
        parameters: SrgParameters,
        /// Theorem invoked.
        theorem: String,
    },
}

/// Evidence against an isomorphism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Refutation {
    /// A cheap invariant differs.
    Invariant {
        /// Invariant name.
        invariant: String,
        /// Value on the left graph.
        left: String,
        /// Value on the right graph.
        right: String,
    },
    /// The search space was exhausted without finding a bijection.
    ExhaustedSearch {
        /// Search nodes expanded.
        nodes: u64,
    },
}

/// Outcome of certification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Isomorphic.
    Certified {
        /// Supporting evidence.
        witness: Witness,
    },
    /// Not isomorphic.
    Refuted {
        /// Supporting evidence.
        reason: Refutation,
    },
    /// The search budget ran out, or a mapping the search produced failed
    /// re-verification; nothing is claimed.
    Undetermined {
        /// Search nodes expanded.
        nodes: u64,
        /// Wall-clock time spent in the search.
        elapsed_ms: u64,
    },
}

/// Full record of one certification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsomorphismCertificate {
    /// Decision and evidence.
    pub verdict: Verdict,
    /// Invariants compared, in order, with their common value when they matched.
    pub invariants: Vec<String>,
    /// States visited.
    pub trace: Vec<CertifierState>,
    /// Search nodes expanded (0 unless the slow path ran).
    pub nodes: u64,
}

impl IsomorphismCertificate {
    /// True for [`Verdict::Certified`].
    pub fn is_certified(&self) -> bool {
        matches!(self.verdict, Verdict::Certified { .. })
    }

    /// True for [`Verdict::Refuted`].
    pub fn is_refuted(&self) -> bool {
        matches!(self.verdict, Verdict::Refuted { .. })
    }

    /// The explicit bijection, if the certificate carries one.
    pub fn bijection(&self) -> Option<&[usize]> {
        match &self.verdict {
            Verdict::Certified {
                witness: Witness::Bijection { mapping },
            } => Some(mapping),
            _ => None,
        }
    }

    /// Final state of the machine.
    pub fn final_state(&self) -> CertifierState {
        self.trace.last().copied().unwrap_or(CertifierState::Start)
    }

    /// Convert to a `Result` for callers that prefer `?`.
    ///
    /// Certified yields the witness, a refutation by exhausted search yields
    /// `None`.
    ///
    /// # Errors
    ///
    /// [`Error::SpectrumMismatch`] for a refutation by invariant,
    /// [`Error::SearchBudgetExceeded`] for an undetermined verdict.
    pub fn into_result(self) -> Result<Option<Witness>> {
        match self.verdict {
            Verdict::Certified { witness } => Ok(Some(witness)),
            Verdict::Refuted {
                reason: Refutation::ExhaustedSearch { .. },
            } => Ok(None),
            Verdict::Refuted {
                reason:
                    Refutation::Invariant {
                        invariant,
                        left,
                        right,
                    },
            } => Err(Error::SpectrumMismatch {
                invariant,
                left,
                right,
            }),
            Verdict::Undetermined { nodes, elapsed_ms } => {
                Err(Error::SearchBudgetExceeded { nodes, elapsed_ms })
            }
        }
    }
}

/// Decides isomorphism of graph pairs.
#[derive(Debug, Clone, Default)]
pub struct Certifier {
    tolerance: Tolerance,
    budget: SearchBudget,
    hints: Vec<UniquenessHint>,
}

impl Certifier {
    /// Certifier with default tolerance, default budget, and no hints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spectral tolerance.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the search budget.
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Add a uniqueness theorem.
    pub fn with_hint(mut self, hint: UniquenessHint) -> Self {
        self.hints.push(hint);
        self
    }

    /// Add several uniqueness theorems.
    pub fn with_hints(mut self, hints: impl IntoIterator<Item = UniquenessHint>) -> Self {
        self.hints.extend(hints);
        self
    }

    /// Decide whether `left` and `right` are isomorphic.
    pub fn certify(&self, left: &Graph, right: &Graph) -> IsomorphismCertificate {
        let mut trace = vec![CertifierState::Start, CertifierState::InvariantCheck];
        let mut invariants = Vec::new();

        let srg = match compare_invariants(left, right, self.tolerance, &mut invariants) {
            Ok(srg) => srg,
            Err(reason) => {
                trace.push(CertifierState::Refuted);
                info!(?reason, "isomorphism refuted by invariant");
                return IsomorphismCertificate {
                    verdict: Verdict::Refuted { reason },
                    invariants,
                    trace,
                    nodes: 0,
                };
            }
        };

        if let Some(hint) = srg.and_then(|p| self.hints.iter().find(|h| h.parameters == p)) {
            trace.extend([CertifierState::FastAccept, CertifierState::Certified]);
            info!(parameters = %hint.parameters, theorem = %hint.theorem, "isomorphism accepted by uniqueness");
            return IsomorphismCertificate {
                verdict: Verdict::Certified {
                    witness: Witness::Uniqueness {
                        parameters: hint.parameters,
                        theorem: hint.theorem.clone(),
                    },
                },
                invariants,
                trace,
                nodes: 0,
            };
        }

        trace.push(CertifierState::SlowSearch);
        let mut search = Search::new(left, right, self.budget);
        let outcome = search.run();
        let nodes = search.nodes;
        let verdict = search_verdict(left, right, outcome, nodes, search.elapsed_ms());
        trace.push(match verdict {
            Verdict::Certified { .. } => CertifierState::Certified,
            Verdict::Refuted { .. } => CertifierState::Refuted,
            Verdict::Undetermined { .. } => CertifierState::Undetermined,
        });
        info!(nodes, state = ?trace.last(), "isomorphism search finished");
        IsomorphismCertificate {
            verdict,
            invariants,
            trace,
            nodes,
        }
    }
}

/// Turn a search outcome into a verdict. Only an exhausted search refutes.
fn search_verdict(
    left: &Graph,
    right: &Graph,
    outcome: SearchOutcome,
    nodes: u64,
    elapsed_ms: u64,
) -> Verdict {
    match outcome {
        SearchOutcome::Found(mapping) if is_isomorphism(left, right, &mapping) => {
            Verdict::Certified {
                witness: Witness::Bijection { mapping },
            }
        }
        // Every assignment was checked against all placed vertices, so a
        // failing re-verification means the search is broken: claim nothing.
        SearchOutcome::Found(_) => {
            error!(nodes, "search produced a mapping that is not an isomorphism");
            Verdict::Undetermined { nodes, elapsed_ms }
        }
        SearchOutcome::Exhausted => Verdict::Refuted {
            reason: Refutation::ExhaustedSearch { nodes },
        },
        SearchOutcome::OutOfBudget { elapsed_ms } => {
            warn!(nodes, elapsed_ms, "isomorphism search budget exceeded");
            Verdict::Undetermined { nodes, elapsed_ms }
        }
    }
}

/// True if `mapping` is a bijection carrying the edges of `left` exactly onto those of `right`.
pub fn is_isomorphism(left: &Graph, right: &Graph, mapping: &[usize]) -> bool {
    let n = left.order();
    if right.order() != n || mapping.len() != n || left.edge_count() != right.edge_count() {
        return false;
    }
    let mut hit = vec![false; n];
    for &m in mapping {
        if m >= n || hit[m] {
            return false;
        }
        hit[m] = true;
    }
    left.edges()
        .all(|(u, v)| right.is_adjacent(mapping[u], mapping[v]))
}

/// Compare cheap invariants; on success return the shared SRG parameters, if any.
fn compare_invariants(
    left: &Graph,
    right: &Graph,
    tol: Tolerance,
    log: &mut Vec<String>,
) -> core::result::Result<Option<SrgParameters>, Refutation> {
    fn check<T: PartialEq + core::fmt::Debug>(
        name: &str,
        l: T,
        r: T,
        log: &mut Vec<String>,
    ) -> core::result::Result<(), Refutation> {
        if l == r {
            log.push(format!("{name} = {l:?}"));
            Ok(())
        } else {
            Err(Refutation::Invariant {
                invariant: name.to_string(),
                left: format!("{l:?}"),
                right: format!("{r:?}"),
            })
        }
    }

    check("order", left.order(), right.order(), log)?;
    check("edge count", left.edge_count(), right.edge_count(), log)?;
    check(
        "degree sequence",
        sorted_degree_sequence(left),
        sorted_degree_sequence(right),
        log,
    )?;
    let (ls, rs) = (srg_parameters(left).parameters(), srg_parameters(right).parameters());
    check("strong regularity", ls.is_some(), rs.is_some(), log)?;
    if let (Some(l), Some(r)) = (ls, rs) {
        check("SRG parameters", l.to_string(), r.to_string(), log)?;
    }
    let (lc, rc) = joint_refinement(left, right);
    check("colour classes", class_sizes(&lc), class_sizes(&rc), log)?;
    let (lspec, rspec) = (real_spectrum(left, tol), real_spectrum(right, tol));
    if lspec.approx_eq(&rspec, tol) {
        log.push(format!("spectrum = {lspec}"));
    } else {
        return Err(Refutation::Invariant {
            invariant: "spectrum".into(),
            left: lspec.to_string(),
            right: rspec.to_string(),
        });
    }
    if ls.is_some() {
        check("pair closures", pair_closures(left), pair_closures(right), log)?;
    }
    debug!(checked = log.len(), "invariants agree");
    Ok(ls)
}

/// Multiset, over non-adjacent pairs, of the number of vertices adjacent to
/// every common neighbour of the pair.
///
/// In a generalized quadrangle this is `|{x, y}^⊥⊥|`, which separates
/// W(3, q) (always `q + 1`) from Q(4, q) for odd q (always 2).
pub fn pair_closures(g: &Graph) -> BTreeMap<usize, usize> {
    let n = g.order();
    let mut sizes = BTreeMap::new();
    for x in 0..n {
        for y in x + 1..n {
            if g.is_adjacent(x, y) {
                continue;
            }
            let common: Vec<usize> = g
                .neighbors(x)
                .iter()
                .copied()
                .filter(|&c| g.is_adjacent(y, c))
                .collect();
            let closure = (0..n)
                .filter(|&z| common.iter().all(|&c| g.is_adjacent(z, c)))
                .count();
            *sizes.entry(closure).or_insert(0) += 1;
        }
    }
    sizes
}

/// Colour refinement run on both graphs at once, so colours are comparable.
///
/// Start from degrees; repeatedly recolour every vertex by its colour and
/// the sorted multiset of its neighbours' colours until the number of
/// classes stops growing.
fn joint_refinement(left: &Graph, right: &Graph) -> (Vec<usize>, Vec<usize>) {
    let graphs = [left, right];
    let mut colours: [Vec<usize>; 2] = [
        (0..left.order()).map(|v| left.degree(v)).collect(),
        (0..right.order()).map(|v| right.degree(v)).collect(),
    ];
    let mut classes = 0;
    loop {
        let mut palette: BTreeMap<(usize, Vec<usize>), usize> = BTreeMap::new();
        let signatures: Vec<Vec<(usize, Vec<usize>)>> = graphs
            .iter()
            .zip(&colours)
            .map(|(g, c)| {
                (0..g.order())
                    .map(|v| {
                        let mut around: Vec<usize> = g.neighbors(v).iter().map(|&w| c[w]).collect();
                        around.sort_unstable();
                        (c[v], around)
                    })
                    .collect()
            })
            .collect();
        for sig in signatures.iter().flatten() {
            let next = palette.len();
            palette.entry(sig.clone()).or_insert(next);
        }
        let refined: Vec<Vec<usize>> = signatures
            .iter()
            .map(|sigs| sigs.iter().map(|s| palette[s]).collect())
            .collect();
        let count = palette.len();
        colours = [refined[0].clone(), refined[1].clone()];
        if count == classes {
            return (colours[0].clone(), colours[1].clone());
        }
        classes = count;
    }
}

fn class_sizes(colours: &[usize]) -> BTreeMap<usize, usize> {
    let mut sizes = BTreeMap::new();
    for &c in colours {
        *sizes.entry(c).or_insert(0) += 1;
    }
    sizes
}

enum SearchOutcome {
    Found(Vec<usize>),
    Exhausted,
    OutOfBudget { elapsed_ms: u64 },
}

const UNMAPPED: usize = usize::MAX;

/// Depth-first vertex assignment with adjacency-consistency pruning.
struct Search<'a> {
    left: &'a Graph,
    right: &'a Graph,
    left_colour: Vec<usize>,
    right_colour: Vec<usize>,
    order: Vec<usize>,
    mapping: Vec<usize>,
    used: Vec<bool>,
    budget: SearchBudget,
    started: Instant,
    nodes: u64,
    out_of_budget: bool,
}

impl<'a> Search<'a> {
    fn new(left: &'a Graph, right: &'a Graph, budget: SearchBudget) -> Self {
        let (left_colour, right_colour) = joint_refinement(left, right);
        let order = placement_order(left, &left_colour);
        let n = left.order();
        Self {
            left,
            right,
            left_colour,
            right_colour,
            order,
            mapping: vec![UNMAPPED; n],
            used: vec![false; n],
            budget,
            started: Instant::now(),
            nodes: 0,
            out_of_budget: false,
        }
    }

    fn run(&mut self) -> SearchOutcome {
        if self.extend(0) {
            SearchOutcome::Found(self.mapping.clone())
        } else if self.out_of_budget {
            SearchOutcome::OutOfBudget {
                elapsed_ms: self.elapsed_ms(),
            }
        } else {
            SearchOutcome::Exhausted
        }
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn charge(&mut self) -> bool {
        self.nodes += 1;
        if self.nodes > self.budget.max_nodes {
            self.out_of_budget = true;
        } else if let Some(limit) = self.budget.max_millis {
            if self.nodes % 1024 == 0 && self.elapsed_ms() > limit {
                self.out_of_budget = true;
            }
        }
        !self.out_of_budget
    }

    fn extend(&mut self, depth: usize) -> bool {
        if depth == self.order.len() {
            return true;
        }
        let u = self.order[depth];
        for w in 0..self.right.order() {
            if self.used[w] || self.right_colour[w] != self.left_colour[u] {
                continue;
            }
            if !self.charge() {
                return false;
            }
            if !self.consistent(u, w, depth) {
                continue;
            }
            self.mapping[u] = w;
            self.used[w] = true;
            if self.extend(depth + 1) {
                return true;
            }
            self.mapping[u] = UNMAPPED;
            self.used[w] = false;
            if self.out_of_budget {
                return false;
            }
        }
        if depth > 0 && depth % 8 == 0 {
            debug!(depth, nodes = self.nodes, "backtracking");
        }
        false
    }

    fn consistent(&self, u: usize, w: usize, depth: usize) -> bool {
        self.order[..depth].iter().all(|&x| {
            self.left.is_adjacent(u, x) == self.right.is_adjacent(w, self.mapping[x])
        })
    }
}

/// Place vertices so each one has as many already-placed neighbours as
/// possible; ties go to the rarer colour, then the lower index.
fn placement_order(g: &Graph, colours: &[usize]) -> Vec<usize> {
    let n = g.order();
    let sizes = class_sizes(colours);
    let mut placed = vec![false; n];
    let mut links = vec![0usize; n];
    let mut order = Vec::with_capacity(n);
    for _ in 0..n {
        let next = (0..n)
            .filter(|&v| !placed[v])
            .min_by_key(|&v| (core::cmp::Reverse(links[v]), sizes[&colours[v]], v));
        let Some(v) = next else { break };
        placed[v] = true;
        order.push(v);
        for &w in g.neighbors(v) {
            links[w] += 1;
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perm::Permutation;

    fn petersen() -> Graph {
        let mut edges = Vec::new();
        for i in 0..5 {
            edges.push((i, (i + 1) % 5));
            edges.push((i, i + 5));
            edges.push((5 + i, 5 + (i + 2) % 5));
        }
        Graph::from_edges(10, &edges).unwrap()
    }

    /// K4 × K4: same row or same column.
    fn rook_4x4() -> Graph {
        Graph::from_fn(16, |a, b| a != b && (a / 4 == b / 4 || a % 4 == b % 4)).unwrap()
    }

    /// Cayley graph of Z4 × Z4 with connection set ±(1,0), ±(0,1), ±(1,1).
    fn shrikhande() -> Graph {
        let diffs = [(1, 0), (3, 0), (0, 1), (0, 3), (1, 1), (3, 3)];
        Graph::from_fn(16, |a, b| {
            let d = ((b / 4 + 4 - a / 4) % 4, (b % 4 + 4 - a % 4) % 4);
            diffs.contains(&d)
        })
        .unwrap()
    }

    #[test]
    fn relabelled_copy_is_certified_with_bijection() {
        let g = petersen();
        let perm = Permutation::new(vec![3, 7, 1, 9, 0, 2, 8, 4, 6, 5]).unwrap();
        let h = g.relabel(&perm).unwrap();
        let cert = Certifier::new().certify(&g, &h);
        assert!(cert.is_certified());
        let mapping = cert.bijection().unwrap();
        assert!(is_isomorphism(&g, &h, mapping));
        assert_eq!(
            cert.trace,
            vec![
                CertifierState::Start,
                CertifierState::InvariantCheck,
                CertifierState::SlowSearch,
                CertifierState::Certified
            ]
        );
        assert!(cert.nodes > 0);
    }

    #[test]
    fn uniqueness_hint_short_circuits() {
        let g = petersen();
        let h = g.relabel(&Permutation::from_cycles(10, &[vec![0, 9]]).unwrap()).unwrap();
        let cert = Certifier::new().with_hints(UniquenessHint::catalogue()).certify(&g, &h);
        assert_eq!(cert.final_state(), CertifierState::Certified);
        assert!(cert.trace.contains(&CertifierState::FastAccept));
        assert_eq!(cert.nodes, 0);
        assert!(matches!(
            cert.into_result(),
            Ok(Some(Witness::Uniqueness { .. }))
        ));
    }

    #[test]
    fn differing_degrees_refute_without_search() {
        let path = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let star = Graph::from_edges(4, &[(0, 1), (0, 2), (0, 3)]).unwrap();
        let cert = Certifier::new().certify(&path, &star);
        assert!(cert.is_refuted());
        assert_eq!(cert.nodes, 0);
        assert!(!cert.trace.contains(&CertifierState::SlowSearch));
        match cert.into_result() {
            Err(Error::SpectrumMismatch { invariant, .. }) => assert_eq!(invariant, "degree sequence"),
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn cospectral_srgs_are_refuted_by_search() {
        let rook = rook_4x4();
        let shr = shrikhande();
        assert_eq!(srg_parameters(&rook).parameters(), Some(SrgParameters::new(16, 6, 2, 2)));
        assert_eq!(srg_parameters(&shr).parameters(), Some(SrgParameters::new(16, 6, 2, 2)));
        let cert = Certifier::new()
            .with_budget(SearchBudget::UNLIMITED)
            .certify(&rook, &shr);
        assert!(matches!(
            cert.verdict,
            Verdict::Refuted {
                reason: Refutation::ExhaustedSearch { .. }
            }
        ));
        assert!(cert.invariants.iter().any(|s| s.starts_with("spectrum")));
        assert_eq!(cert.into_result(), Ok(None));
    }

    #[test]
    fn tiny_budget_is_undetermined() {
        let rook = rook_4x4();
        let shr = shrikhande();
        let budget = SearchBudget {
            max_nodes: 5,
            max_millis: None,
        };
        let cert = Certifier::new().with_budget(budget).certify(&rook, &shr);
        assert_eq!(cert.final_state(), CertifierState::Undetermined);
        assert!(matches!(
            cert.into_result(),
            Err(Error::SearchBudgetExceeded { .. })
        ));
    }

    #[test]
    fn regular_graphs_are_separated_by_spectrum() {
        let c8 = Graph::from_edges(8, &(0..8).map(|i| (i, (i + 1) % 8)).collect::<Vec<_>>()).unwrap();
        let two_squares = Graph::from_edges(
            8,
            &[(0, 1), (1, 2), (2, 3), (3, 0), (4, 5), (5, 6), (6, 7), (7, 4)],
        )
        .unwrap();
        // Colour refinement cannot split regular graphs; the spectrum can.
        let cert = Certifier::new().certify(&c8, &two_squares);
        match &cert.verdict {
            Verdict::Refuted {
                reason: Refutation::Invariant { invariant, .. },
            } => assert_eq!(invariant, "spectrum"),
            other => panic!("unexpected verdict {other:?}"),
        }
    }

    #[test]
    fn strong_regularity_is_an_invariant() {
        let two_triangles =
            Graph::from_edges(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]).unwrap();
        let hexagon =
            Graph::from_edges(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]).unwrap();
        let cert = Certifier::new().certify(&two_triangles, &hexagon);
        assert_eq!(
            cert.into_result(),
            Err(Error::SpectrumMismatch {
                invariant: "strong regularity".into(),
                left: "true".into(),
                right: "false".into(),
            })
        );
    }

    #[test]
    fn refinement_distinguishes_trees_with_equal_degrees() {
        // The degree-3 vertex has one degree-2 neighbour in `a` and two in `b`.
        let a = Graph::from_edges(6, &[(0, 1), (0, 2), (0, 3), (3, 4), (4, 5)]).unwrap();
        let b = Graph::from_edges(6, &[(0, 1), (0, 2), (0, 3), (1, 4), (3, 5)]).unwrap();
        assert_eq!(sorted_degree_sequence(&a), vec![3, 2, 2, 1, 1, 1]);
        assert_eq!(sorted_degree_sequence(&b), sorted_degree_sequence(&a));
        let cert = Certifier::new().certify(&a, &b);
        match &cert.verdict {
            Verdict::Refuted {
                reason: Refutation::Invariant { invariant, .. },
            } => assert_eq!(invariant, "colour classes"),
            other => panic!("unexpected verdict {other:?}"),
        }
    }

    #[test]
    fn unverified_mapping_is_undetermined_not_refuted() {
        let g = petersen();
        let swapped = vec![1, 0, 2, 3, 4, 5, 6, 7, 8, 9];
        assert!(!is_isomorphism(&g, &g, &swapped));
        assert_eq!(
            search_verdict(&g, &g, SearchOutcome::Found(swapped), 10, 2),
            Verdict::Undetermined {
                nodes: 10,
                elapsed_ms: 2
            }
        );
        assert_eq!(
            search_verdict(&g, &g, SearchOutcome::Exhausted, 10, 2),
            Verdict::Refuted {
                reason: Refutation::ExhaustedSearch { nodes: 10 }
            }
        );
        let identity: Vec<usize> = (0..10).collect();
        assert!(matches!(
            search_verdict(&g, &g, SearchOutcome::Found(identity), 10, 2),
            Verdict::Certified { .. }
        ));
    }

    #[test]
    fn pair_closures_of_small_srgs() {
        // Petersen: every non-adjacent pair has one common neighbour, of degree 3.
        assert_eq!(pair_closures(&petersen()), BTreeMap::from([(3, 30)]));
        // Rook's graph and Shrikhande graph agree here too; only search separates them.
        assert_eq!(pair_closures(&rook_4x4()), BTreeMap::from([(2, 72)]));
        assert_eq!(pair_closures(&shrikhande()), pair_closures(&rook_4x4()));
    }

    #[test]
    fn bijection_check() {
        let g = petersen();
        assert!(is_isomorphism(&g, &g, &(0..10).collect::<Vec<_>>()));
        assert!(!is_isomorphism(&g, &g, &[0, 0, 2, 3, 4, 5, 6, 7, 8, 9]));
        assert!(!is_isomorphism(&g, &g, &[1, 0, 2, 3, 4, 5, 6, 7, 8, 9]));
    }
}
