//! The immutable document model (C2).

use crate::g2p::G2pTable;
use crate::token::Token;

/// An immutable, ordered sequence of character tokens.
///
/// Built once when a corpus is loaded and never mutated afterward — the
/// G2P pass that fills in each token's phonemes happens during
/// construction, not as a later step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    tokens: Vec<Token>,
}

impl Document {
    /// Tokenize `text` one character at a time and resolve phonemes for
    /// each via `table`. Old Chinese corpora are the primary target and
    /// are conventionally tokenized per-character (the source pipeline runs
    /// a jieba-disabled Chinese tokenizer, which degrades to one token per
    /// codepoint); we take that as the tokenization rule directly rather
    /// than modeling a pluggable tokenizer.
    pub fn new(id: impl Into<String>, text: &str, table: &G2pTable) -> Self {
        let tokens = text
            .chars()
            .enumerate()
            .map(|(offset, ch)| {
                let s = ch.to_string();
                let phonemes = table.phonemes(&s);
                Token::new(s, offset, phonemes)
            })
            .collect();
        Document {
            id: id.into(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
