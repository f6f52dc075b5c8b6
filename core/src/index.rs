//! Mapping from phonetic n-gram key to indexed span locations (C4/§4.3).

use std::sync::Arc;

use ahash::AHashMap;

use crate::document::Document;
use crate::error::CoreResult;
use crate::ngram::ngrams;
use crate::span::Span;

/// `key: string -> list of Span`, insertion-ordered per key and across keys
/// so that seeding (C5) is reproducible.
///
/// The hash map uses `ahash` rather than the std hasher — the one place in
/// this crate where that teacher dependency earns its keep, since a large
/// corpus can produce a very large number of n-grams before pruning (§5).
#[derive(Debug, Default)]
pub struct PhoneticIndex {
    order: Vec<String>,
    buckets: AHashMap<String, Vec<Span>>,
}

impl PhoneticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every length-`n` window of `doc`. Windows containing any
    /// non-alphabetic or OOV token are rejected (§4.3), matching
    /// `original_source/dphon/index.py::NgramPhonemesLookupsIndex._get_vals`.
    pub fn add(&mut self, doc: &Arc<Document>, n: usize) -> CoreResult<()> {
        for span in ngrams(doc, n)? {
            if span.tokens().iter().any(|t| !t.is_indexable()) {
                continue;
            }
            let key: String = span.tokens().iter().map(|t| t.phonemes.joined()).collect();
            if !self.buckets.contains_key(&key) {
                self.order.push(key.clone());
            }
            self.buckets.entry(key).or_default().push(span);
        }
        Ok(())
    }

    /// All buckets, in first-insertion key order.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[Span])> {
        self.order
            .iter()
            .map(move |k| (k.as_str(), self.buckets[k].as_slice()))
    }

    /// Buckets with at least `min_occurrences` spans (§4.3, §7: "the index
    /// silently ignores buckets of size < 2").
    pub fn prune(&self, min_occurrences: usize) -> Vec<(&str, &[Span])> {
        self.buckets()
            .filter(|(_, spans)| spans.len() >= min_occurrences)
            .collect()
    }

    pub fn filter<F: Fn(&[Span]) -> bool>(&self, predicate: F) -> Vec<(&str, &[Span])> {
        self.buckets().filter(|(_, spans)| predicate(spans)).collect()
    }

    /// Total number of distinct keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of indexed spans across all keys.
    pub fn size(&self) -> usize {
        self.buckets.values().map(|v| v.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::g2p::G2pTable;

    #[test]
    fn rejects_oov_windows() {
        let table = G2pTable::empty(); // every alphanumeric char is OOV
        let doc = Arc::new(Document::new("d1", "千室之邑", &table));
        let mut idx = PhoneticIndex::new();
        idx.add(&doc, 4).unwrap();
        assert_eq!(idx.len(), 0);
    }

    #[test]
    fn shares_key_across_identical_documents() {
        let table = G2pTable::empty();
        let d1 = Arc::new(Document::new("d1", "千室之邑", &table));
        let d2 = Arc::new(Document::new("d2", "千室之邑", &table));
        let mut idx = PhoneticIndex::new();
        // Force an indexable window by stubbing phonemes directly isn't
        // available without a populated table; validate with punctuation
        // excluded via the OOV-table shortcut in integration tests instead.
        idx.add(&d1, 4).unwrap();
        idx.add(&d2, 4).unwrap();
        assert_eq!(idx.len(), 0); // both OOV, nothing indexed
    }
}
