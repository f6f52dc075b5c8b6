//! The pairwise match record (§3), ported from `original_source/dphon/match.py`'s
//! `Match` `NamedTuple` (`u, v, utxt, vtxt, weight, au, av`) onto owned [`Span`]s.

use crate::span::Span;

/// A pair of phonetically similar regions in two documents.
///
/// A `Match` does not own its spans' tokens — the documents do (§3) — but it
/// does own `u_aligned`/`v_aligned`, the per-position aligned text produced
/// by the aligner (empty before alignment).
#[derive(Debug, Clone)]
pub struct Match {
    pub u_span: Span,
    pub v_span: Span,
    pub score: f64,
    pub u_aligned: Vec<String>,
    pub v_aligned: Vec<String>,
}

impl Match {
    /// A freshly seeded match: score 1.0, no aligned text yet (§4.4).
    pub fn seed(u_span: Span, v_span: Span) -> Self {
        Match {
            u_span,
            v_span,
            score: 1.0,
            u_aligned: Vec::new(),
            v_aligned: Vec::new(),
        }
    }

    pub fn new(
        u_span: Span,
        v_span: Span,
        score: f64,
        u_aligned: Vec<String>,
        v_aligned: Vec<String>,
    ) -> Self {
        Match {
            u_span,
            v_span,
            score,
            u_aligned,
            v_aligned,
        }
    }

    pub fn u_id(&self) -> &str {
        &self.u_span.doc.id
    }

    pub fn v_id(&self) -> &str {
        &self.v_span.doc.id
    }

    /// `len(match) = max(|u_span|, |v_span|)` (§3).
    pub fn len(&self) -> usize {
        self.u_span.len().max(self.v_span.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_aligned_text(&self) -> bool {
        !self.u_aligned.is_empty() || !self.v_aligned.is_empty()
    }

    /// Sort key used by the reducer (§4.6): `(u.start, u.end, v.start, v.end)`.
    pub fn sort_key(&self) -> (usize, usize, usize, usize) {
        (
            self.u_span.start,
            self.u_span.end,
            self.v_span.start,
            self.v_span.end,
        )
    }

    /// Swap the `u`/`v` sides. `reduce.rs`'s per-pair grouping doesn't need
    /// this — bucket insertion order already keeps orientation consistent
    /// within a document pair (see its module doc) — but callers outside
    /// this crate building their own pair groupings may still need to
    /// normalize orientation explicitly.
    pub fn swapped(self) -> Match {
        Match {
            u_span: self.v_span,
            v_span: self.u_span,
            score: self.score,
            u_aligned: self.v_aligned,
            v_aligned: self.u_aligned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::g2p::G2pTable;
    use std::sync::Arc;

    #[test]
    fn swap_exchanges_sides() {
        let table = G2pTable::empty();
        let d1 = Arc::new(Document::new("d1", "千室之邑", &table));
        let d2 = Arc::new(Document::new("d2", "百乘之家", &table));
        let u = Span::new(d1, 0, 2).unwrap();
        let v = Span::new(d2, 0, 2).unwrap();
        let m = Match::seed(u.clone(), v.clone());
        let swapped = m.swapped();
        assert_eq!(swapped.u_id(), "d2");
        assert_eq!(swapped.v_id(), "d1");
    }
}
