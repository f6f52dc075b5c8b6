//! Borrowed half-open windows into a document's token sequence (C2/§9).

use std::sync::Arc;

use crate::document::Document;
use crate::error::{CoreError, CoreResult};
use crate::token::Token;

/// A half-open interval `[start, end)` into a document's tokens.
///
/// A Span carries no copy of its tokens, only a shared reference to the
/// document it indexes into. We use `Arc` rather than a lifetime-bound
/// borrow so that Spans and the Matches built from them can move freely
/// between pipeline stages (index → seed → extend → align → group)
/// without threading a document arena lifetime through every type; it also
/// leaves per-document indexing and alignment open to later parallelization
/// (§5) without a rewrite.
#[derive(Debug, Clone)]
pub struct Span {
    pub doc: Arc<Document>,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(doc: Arc<Document>, start: usize, end: usize) -> CoreResult<Self> {
        if start >= end || end > doc.len() {
            return Err(CoreError::InvalidSpan {
                start,
                end,
                len: doc.len(),
            });
        }
        Ok(Span { doc, start, end })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn tokens(&self) -> &[Token] {
        &self.doc.tokens()[self.start..self.end]
    }

    pub fn text(&self) -> String {
        self.tokens().iter().map(|t| t.text.as_str()).collect()
    }

    /// True when this span has at least one more token available on the
    /// right within its document.
    pub fn can_grow_right(&self) -> bool {
        self.end < self.doc.len()
    }

    /// True when this span has at least one more token available on the
    /// left within its document.
    pub fn can_grow_left(&self) -> bool {
        self.start > 0
    }

    pub fn grow_right(&self) -> CoreResult<Span> {
        Span::new(self.doc.clone(), self.start, self.end + 1)
    }

    pub fn grow_left(&self) -> CoreResult<Span> {
        Span::new(self.doc.clone(), self.start - 1, self.end)
    }

    /// Endpoint key used by the index, the reducer, and the grouper:
    /// identifies this exact location regardless of which match it
    /// appears in.
    pub fn endpoint_key(&self) -> (String, usize, usize) {
        (self.doc.id.clone(), self.start, self.end)
    }

    /// True when at least one token in this span has no G2P entry.
    pub fn has_oov(&self) -> bool {
        self.tokens().iter().any(|t| t.is_oov)
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.doc, &other.doc) && self.start == other.start && self.end == other.end
    }
}
impl Eq for Span {}
