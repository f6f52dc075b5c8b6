//! One initial match per unordered pair of distinct-document locations
//! sharing an index key (C5/§4.4).

use crate::index::PhoneticIndex;
use crate::matching::Match;

/// Emit seed matches from every bucket surviving `min_occurrences`, in
/// bucket iteration order × combination order (§4.4, §5: this ordering is
/// what makes seed enumeration reproducible). Same-document pairs are never
/// emitted — the `MatchGraph` has no self-loops (§3).
pub fn seed(index: &PhoneticIndex, min_occurrences: usize) -> Vec<Match> {
    let mut seeds = Vec::new();
    for (_key, spans) in index.prune(min_occurrences) {
        for i in 0..spans.len() {
            for j in (i + 1)..spans.len() {
                let a = &spans[i];
                let b = &spans[j];
                if a.doc.id == b.doc.id {
                    continue;
                }
                seeds.push(Match::seed(a.clone(), b.clone()));
            }
        }
    }
    seeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::g2p::G2pTable;
    use std::sync::Arc;

    fn table_all_t() -> G2pTable {
        let entries: serde_json::Map<String, serde_json::Value> = "千室之邑百乘之家"
            .chars()
            .map(|c| {
                (
                    c.to_string(),
                    serde_json::json!([["t", "src", "src2"]]),
                )
            })
            .collect();
        G2pTable::from_json_str(&serde_json::Value::Object(entries).to_string()).unwrap()
    }

    #[test]
    fn no_self_loops() {
        let table = table_all_t();
        let d1 = Arc::new(Document::new("d1", "千室之邑", &table));
        let mut idx = PhoneticIndex::new();
        idx.add(&d1, 4).unwrap();
        let seeds = seed(&idx, 2);
        // only one document indexed, so no cross-document pair can exist
        assert!(seeds.is_empty());
    }

    #[test]
    fn pairs_distinct_documents_sharing_a_key() {
        let table = table_all_t();
        let d1 = Arc::new(Document::new("d1", "千室之邑", &table));
        let d2 = Arc::new(Document::new("d2", "千室之邑", &table));
        let mut idx = PhoneticIndex::new();
        idx.add(&d1, 4).unwrap();
        idx.add(&d2, 4).unwrap();
        let seeds = seed(&idx, 2);
        assert_eq!(seeds.len(), 1);
        assert_ne!(seeds[0].u_id(), seeds[0].v_id());
    }
}
