//! The multigraph of documents and their matches (C10/§4.8), ported from
//! `original_source/dphon/reuse.py::MatchGraph` (a thin `networkx.MultiGraph`
//! wrapper) rather than the simpler adjacency-list `graph.py::ReuseGraph`,
//! since only `reuse.py`'s stage pipeline (`extend`/`align`/`filter`) is
//! used downstream in the source project.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::align::Aligner;
use crate::document::Document;
use crate::error::{CoreError, CoreResult};
use crate::extend::Extender;
use crate::group::{group_matches, MatchGroup};
use crate::matching::Match;
use crate::reduce::reduce;

/// Documents keyed by id (`BTreeMap` for deterministic iteration, §5), plus
/// the current edge set. Each stage method (`extend`, `align`) replaces the
/// edge set wholesale rather than mutating in place, mirroring
/// `reuse.py`'s `self._graph = nx.MultiGraph(...)` reassignment pattern.
#[derive(Debug, Default)]
pub struct MatchGraph {
    docs: BTreeMap<String, Arc<Document>>,
    edges: Vec<Match>,
}

impl MatchGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, doc: Arc<Document>) {
        self.docs.insert(doc.id.clone(), doc);
    }

    pub fn documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.docs.values()
    }

    pub fn document(&self, id: &str) -> Option<&Arc<Document>> {
        self.docs.get(id)
    }

    /// Add a seed match as an edge, rejecting self-loops and endpoints
    /// referring to documents not registered in this graph (§3, §7).
    pub fn add_match(&mut self, m: Match) -> CoreResult<()> {
        if m.u_id() == m.v_id() {
            return Err(CoreError::SameDocument(m.u_id().to_string()));
        }
        if !self.docs.contains_key(m.u_id()) {
            return Err(CoreError::UnknownDocument(m.u_id().to_string()));
        }
        if !self.docs.contains_key(m.v_id()) {
            return Err(CoreError::UnknownDocument(m.v_id().to_string()));
        }
        self.edges.push(m);
        Ok(())
    }

    pub fn edges(&self) -> &[Match] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Replace the edge set with the reduced, extended matches for every
    /// document pair (C6-C8, §4.6). The reducer groups matches by unordered
    /// document pair via `pair_key`; see `reduce.rs` for why seed
    /// orientation (`u`/`v` side) is already consistent within a pair
    /// without an explicit swap step.
    pub fn extend<E: Extender>(&mut self, extender: &E) {
        let seeds = std::mem::take(&mut self.edges);
        self.edges = reduce(extender, seeds);
    }

    /// Replace the edge set with the aligned version of every current edge
    /// (C9, §4.7).
    pub fn align<A: Aligner>(&mut self, aligner: &A) -> CoreResult<()> {
        self.edges = self
            .edges
            .iter()
            .map(|m| aligner.align(m))
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(())
    }

    /// Retain only edges for which `predicate` holds (§4.1, §4.10: variant
    /// filtering and score thresholds are both implemented as predicates
    /// over the current edge set).
    pub fn filter<F: Fn(&Match) -> bool>(&mut self, predicate: F) {
        self.edges.retain(predicate);
    }

    /// Produce match groups from the current edge set (C11, §4.8). Does not
    /// consume or alter the graph's edges — grouping is a read of the
    /// current state, not a stage replacement like `extend`/`align`.
    pub fn group(&self) -> Vec<MatchGroup> {
        group_matches(self.edges.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::g2p::G2pTable;
    use crate::span::Span;

    #[test]
    fn rejects_self_loop() {
        let table = G2pTable::empty();
        let doc = Arc::new(Document::new("d1", "千室之邑", &table));
        let mut g = MatchGraph::new();
        g.add_document(doc.clone());
        let u = Span::new(doc.clone(), 0, 2).unwrap();
        let v = Span::new(doc, 2, 4).unwrap();
        let m = Match::seed(u, v);
        assert!(matches!(g.add_match(m), Err(CoreError::SameDocument(_))));
    }

    #[test]
    fn rejects_unknown_document() {
        let table = G2pTable::empty();
        let d1 = Arc::new(Document::new("d1", "千室之邑", &table));
        let d2 = Arc::new(Document::new("d2", "百乘之家", &table));
        let mut g = MatchGraph::new();
        g.add_document(d1.clone());
        // d2 is never registered
        let u = Span::new(d1, 0, 2).unwrap();
        let v = Span::new(d2, 0, 2).unwrap();
        let m = Match::seed(u, v);
        assert!(matches!(g.add_match(m), Err(CoreError::UnknownDocument(_))));
    }

    #[test]
    fn accepts_valid_cross_document_match() {
        let table = G2pTable::empty();
        let d1 = Arc::new(Document::new("d1", "千室之邑", &table));
        let d2 = Arc::new(Document::new("d2", "百乘之家", &table));
        let mut g = MatchGraph::new();
        g.add_document(d1.clone());
        g.add_document(d2.clone());
        let u = Span::new(d1, 0, 2).unwrap();
        let v = Span::new(d2, 0, 2).unwrap();
        let m = Match::seed(u, v);
        g.add_match(m).unwrap();
        assert_eq!(g.len(), 1);
    }
}
