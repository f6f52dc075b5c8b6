//! The phoneme representation and the per-character `Token`.

/// A single token's phonetic content.
///
/// The source G2P table represents every case — punctuation, OOV, and real
/// syllables — as tuples of the same nominal shape, using a private-use
/// sentinel character to mark OOV. We use an enum instead: it makes the
/// three cases exhaustive and removes the sentinel-comparison footgun from
/// every call site that inspects a token's phonemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phonemes {
    /// Non-alphanumeric text (punctuation, whitespace survivors): the empty
    /// tuple in the source model.
    NonVoiced,
    /// Alphanumeric text with no G2P table entry.
    Oov,
    /// A real phoneme tuple, one slot per syllable position. Slots may be
    /// `None` when a reading leaves a position empty.
    Syllable(Vec<Option<String>>),
}

impl Phonemes {
    pub fn is_oov(&self) -> bool {
        matches!(self, Phonemes::Oov)
    }

    pub fn is_non_voiced(&self) -> bool {
        matches!(self, Phonemes::NonVoiced)
    }

    /// The non-empty phoneme symbols in slot order, for building index keys
    /// and phonetic comparison strings. Empty for `NonVoiced` and `Oov`.
    pub fn symbols(&self) -> Vec<&str> {
        match self {
            Phonemes::Syllable(slots) => slots.iter().filter_map(|s| s.as_deref()).collect(),
            _ => Vec::new(),
        }
    }

    /// Concatenation of `symbols()`, used as an index key fragment and as
    /// the phonetic comparison string in alignment and extension.
    pub fn joined(&self) -> String {
        self.symbols().concat()
    }
}

/// An immutable character token inside a [`crate::document::Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub offset: usize,
    pub is_alpha: bool,
    pub is_oov: bool,
    pub phonemes: Phonemes,
}

impl Token {
    pub fn new(text: impl Into<String>, offset: usize, phonemes: Phonemes) -> Self {
        let text = text.into();
        let is_alpha = text.chars().all(|c| c.is_alphanumeric());
        let is_oov = phonemes.is_oov();
        Token {
            text,
            offset,
            is_alpha,
            is_oov,
            phonemes,
        }
    }

    /// True when this token can contribute to a phonetic index key: it must
    /// be alphabetic and have a real phoneme tuple.
    pub fn is_indexable(&self) -> bool {
        self.is_alpha && !self.is_oov && !self.phonemes.is_non_voiced()
    }
}
