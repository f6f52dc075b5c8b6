//! Lazy length-n contiguous token windows over a [`Document`] (C3/§4.2).

use std::sync::Arc;

use crate::document::Document;
use crate::error::CoreResult;
use crate::span::Span;

/// Windows `doc[i : i+n]` for `i` in `[0, max(0, |doc| - n + 1))`.
///
/// Empty documents yield zero windows; documents shorter than `n` yield
/// exactly one window spanning the whole document — ported from
/// `original_source/dphon/ngrams.py::get_doc_ngrams`, whose
/// `range(max(len(doc) - n + 1, 1))` has the same short-document behavior.
pub fn ngrams(doc: &Arc<Document>, n: usize) -> CoreResult<Vec<Span>> {
    let len = doc.len();
    if len == 0 {
        return Ok(Vec::new());
    }
    if len <= n {
        return Ok(vec![Span::new(doc.clone(), 0, len)?]);
    }
    let count = len - n + 1;
    (0..count).map(|i| Span::new(doc.clone(), i, i + n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::g2p::G2pTable;

    #[test]
    fn empty_doc_yields_nothing() {
        let table = G2pTable::empty();
        let doc = Arc::new(Document::new("d1", "", &table));
        assert!(ngrams(&doc, 4).unwrap().is_empty());
    }

    #[test]
    fn short_doc_yields_one_window() {
        let table = G2pTable::empty();
        let doc = Arc::new(Document::new("d1", "千室", &table));
        let windows = ngrams(&doc, 4).unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!((windows[0].start, windows[0].end), (0, 2));
    }

    #[test]
    fn normal_doc_yields_sliding_windows() {
        let table = G2pTable::empty();
        let doc = Arc::new(Document::new("d1", "千室之邑百乘之家", &table));
        let windows = ngrams(&doc, 4).unwrap();
        assert_eq!(windows.len(), 5);
        assert_eq!((windows[0].start, windows[0].end), (0, 4));
        assert_eq!((windows[4].start, windows[4].end), (4, 8));
    }
}
