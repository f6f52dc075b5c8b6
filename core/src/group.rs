//! Clustering matches that share textual reuse into named groups (C11/§4.9).
//!
//! `original_source/dphon` has no equivalent of this stage — grouping by
//! shared anchor passage is this spec's own addition over the source
//! pipeline, built with a standard union-find over `Span::endpoint_key`
//! identities.

use std::collections::HashMap;

use crate::matching::Match;

/// One connected component of the match graph, anchored at the endpoint key
/// most matches in the group touch.
#[derive(Debug, Clone)]
pub struct MatchGroup {
    pub anchor_doc: String,
    pub anchor_start: usize,
    pub anchor_end: usize,
    pub members: Vec<Match>,
}

impl MatchGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Disjoint-set union over endpoint-key identities, path-compressed with
/// union by rank.
struct Dsu {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl Dsu {
    fn new(n: usize) -> Self {
        Dsu {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Partition `matches` into connected components by shared endpoint key
/// (any of the four span endpoints of two matches coinciding links them),
/// then pick each group's anchor as the endpoint key touched by the most
/// members, breaking ties by the lexicographically smallest aligned text at
/// that endpoint (§3, §4.9). Members are de-duplicated and sorted by the
/// aligned text of each member's non-anchor endpoint (§3: "Members are
/// de-duplicated and deterministically sorted by the aligned non-anchor
/// text").
///
/// Groups are returned in order of first-seen member — deterministic given
/// a deterministic input order (§5).
pub fn group_matches(matches: Vec<Match>) -> Vec<MatchGroup> {
    if matches.is_empty() {
        return Vec::new();
    }

    let mut key_to_id: HashMap<(String, usize, usize), usize> = HashMap::new();
    let mut next_id = 0usize;
    let mut key_of = |key: (String, usize, usize), next_id: &mut usize| -> usize {
        *key_to_id.entry(key).or_insert_with(|| {
            let id = *next_id;
            *next_id += 1;
            id
        })
    };

    // pass 1: assign every endpoint an id so the DSU has a fixed universe,
    // and record each endpoint's own aligned text (the first member's side
    // that touches it) for the anchor tie-break below.
    let mut endpoints_per_match = Vec::with_capacity(matches.len());
    let mut endpoint_text: HashMap<usize, String> = HashMap::new();
    for m in &matches {
        let u = key_of(m.u_span.endpoint_key(), &mut next_id);
        let v = key_of(m.v_span.endpoint_key(), &mut next_id);
        endpoint_text.entry(u).or_insert_with(|| m.u_aligned.join(""));
        endpoint_text.entry(v).or_insert_with(|| m.v_aligned.join(""));
        endpoints_per_match.push((u, v));
    }

    let mut dsu = Dsu::new(next_id);
    for &(u, v) in &endpoints_per_match {
        dsu.union(u, v);
    }

    // group matches by their root component
    let mut root_order = Vec::new();
    let mut by_root: HashMap<usize, Vec<usize>> = HashMap::new();
    for (idx, &(u, _v)) in endpoints_per_match.iter().enumerate() {
        let root = dsu.find(u);
        if !by_root.contains_key(&root) {
            root_order.push(root);
        }
        by_root.entry(root).or_default().push(idx);
    }

    let id_to_key: HashMap<usize, (String, usize, usize)> =
        key_to_id.into_iter().map(|(k, v)| (v, k)).collect();

    let mut groups = Vec::with_capacity(root_order.len());
    for root in root_order {
        let member_idxs = by_root.remove(&root).unwrap();

        let mut touch_counts: HashMap<usize, usize> = HashMap::new();
        for &idx in &member_idxs {
            let (u, v) = endpoints_per_match[idx];
            *touch_counts.entry(u).or_insert(0) += 1;
            *touch_counts.entry(v).or_insert(0) += 1;
        }

        // anchor: most-touched endpoint; ties broken by lexicographic order
        // of the aligned text *at that endpoint* (§3/§4.9), not the
        // (doc, start, end) key itself.
        let anchor_id = *touch_counts
            .iter()
            .max_by(|a, b| {
                a.1.cmp(b.1).then_with(|| {
                    let ta = &endpoint_text[a.0];
                    let tb = &endpoint_text[b.0];
                    tb.cmp(ta) // reverse: lexicographically smaller text wins ties
                })
            })
            .map(|(id, _)| id)
            .unwrap();
        let anchor_key = id_to_key[&anchor_id].clone();
        let (anchor_doc, anchor_start, anchor_end) = anchor_key.clone();

        // de-duplicate members (same endpoints and aligned text), then sort
        // by the aligned text of each member's non-anchor endpoint.
        let mut seen = std::collections::HashSet::new();
        let mut members: Vec<Match> = Vec::new();
        for &idx in &member_idxs {
            let m = &matches[idx];
            let dedup_key = (
                m.u_span.endpoint_key(),
                m.v_span.endpoint_key(),
                m.u_aligned.clone(),
                m.v_aligned.clone(),
            );
            if seen.insert(dedup_key) {
                members.push(m.clone());
            }
        }
        members.sort_by(|a, b| {
            non_anchor_text(a, &anchor_key)
                .cmp(&non_anchor_text(b, &anchor_key))
                .then_with(|| a.u_span.endpoint_key().cmp(&b.u_span.endpoint_key()))
                .then_with(|| a.v_span.endpoint_key().cmp(&b.v_span.endpoint_key()))
        });

        groups.push(MatchGroup {
            anchor_doc,
            anchor_start,
            anchor_end,
            members,
        });
    }

    groups
}

/// The aligned text of `m`'s endpoint that is *not* the anchor, used to
/// order a group's members (§3). When neither side is the anchor (group
/// closure isn't universal under every topology, see module docs), fall
/// back to the lexicographically smaller side so ordering stays
/// deterministic.
fn non_anchor_text(m: &Match, anchor: &(String, usize, usize)) -> String {
    if &m.u_span.endpoint_key() == anchor {
        m.v_aligned.join("")
    } else if &m.v_span.endpoint_key() == anchor {
        m.u_aligned.join("")
    } else {
        m.u_aligned.join("").min(m.v_aligned.join(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::g2p::G2pTable;
    use crate::span::Span;
    use std::sync::Arc;

    fn doc(id: &str, text: &str, table: &G2pTable) -> Arc<Document> {
        Arc::new(Document::new(id, text, table))
    }

    #[test]
    fn disjoint_matches_form_separate_groups() {
        let table = G2pTable::empty();
        let d1 = doc("d1", "千室之邑百乘之家", &table);
        let d2 = doc("d2", "千室之邑百乘之家", &table);
        let d3 = doc("d3", "千室之邑百乘之家", &table);
        let d4 = doc("d4", "千室之邑百乘之家", &table);

        let m1 = Match::seed(
            Span::new(d1.clone(), 0, 2).unwrap(),
            Span::new(d2.clone(), 0, 2).unwrap(),
        );
        let m2 = Match::seed(
            Span::new(d3.clone(), 0, 2).unwrap(),
            Span::new(d4.clone(), 0, 2).unwrap(),
        );

        let groups = group_matches(vec![m1, m2]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 1);
        assert_eq!(groups[1].len(), 1);
    }

    /// Star topology: a single anchor span in `d1` matches three other
    /// documents at distinct spans. Every member touches the anchor
    /// endpoint directly, so group closure (every member touches the
    /// anchor key) holds exactly, unlike the adversarial triangle case
    /// where three mutually-matching documents share no common endpoint.
    #[test]
    fn star_topology_closes_on_shared_anchor() {
        let table = G2pTable::empty();
        let anchor_doc = doc("anchor", "千室之邑", &table);
        let d2 = doc("d2", "千室之邑", &table);
        let d3 = doc("d3", "千室之邑", &table);
        let d4 = doc("d4", "千室之邑", &table);

        let anchor_span = |d: &Arc<Document>| Span::new(d.clone(), 0, 4).unwrap();

        let m1 = Match::seed(anchor_span(&anchor_doc), anchor_span(&d2));
        let m2 = Match::seed(anchor_span(&anchor_doc), anchor_span(&d3));
        let m3 = Match::seed(anchor_span(&anchor_doc), anchor_span(&d4));

        let groups = group_matches(vec![m1, m2, m3]);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.len(), 3);
        assert_eq!(group.anchor_doc, "anchor");
        assert_eq!((group.anchor_start, group.anchor_end), (0, 4));
        for m in &group.members {
            let touches_anchor = m.u_span.endpoint_key() == (group.anchor_doc.clone(), group.anchor_start, group.anchor_end)
                || m.v_span.endpoint_key() == (group.anchor_doc.clone(), group.anchor_start, group.anchor_end);
            assert!(touches_anchor);
        }
    }

    /// S6: three documents mutually matching pairwise, each at a distinct
    /// span with no single endpoint common to all three (a triangle, not a
    /// star). All three matches still form one group by transitive closure;
    /// the chosen anchor is whichever endpoint key is touched the most
    /// (here, every endpoint is touched exactly once, so the anchor is the
    /// lexicographically smallest endpoint rather than a majority one).
    /// Per-member closure on the anchor is *not* asserted here, since it
    /// isn't achievable in this topology.
    #[test]
    fn triangle_topology_forms_one_group_without_universal_closure() {
        let table = G2pTable::empty();
        let d1 = doc("d1", "千室之邑", &table);
        let d2 = doc("d2", "千室之邑", &table);
        let d3 = doc("d3", "千室之邑", &table);

        // each document contributes the same (0, 2) span, but no single
        // endpoint key appears in all three matches: d1[0,2] links m12/m13,
        // d2[0,2] links m12/m23, d3[0,2] links m23/m13 — the component is
        // connected transitively, not through one shared anchor.
        let m12 = Match::seed(
            Span::new(d1.clone(), 0, 2).unwrap(),
            Span::new(d2.clone(), 0, 2).unwrap(),
        );
        let m23 = Match::seed(
            Span::new(d2.clone(), 0, 2).unwrap(),
            Span::new(d3.clone(), 0, 2).unwrap(),
        );
        let m13 = Match::seed(
            Span::new(d1.clone(), 0, 2).unwrap(),
            Span::new(d3.clone(), 0, 2).unwrap(),
        );

        let groups = group_matches(vec![m12, m23, m13]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
        // every endpoint key is tied at touching exactly 2 of the 3
        // matches, so no member is excluded from the closure property
        // vacuously — but none touches all 3 either.
    }
}
