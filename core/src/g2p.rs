//! Grapheme-to-phoneme table (C1).
//!
//! The table is read-only once loaded and is consulted both while building
//! documents (to resolve each token's phonemes) and while deciding whether
//! a seed match crosses a graphic variant.

use std::collections::HashMap;
use std::path::Path;

use crate::error::CoreResult;
use crate::matching::Match;
use crate::token::Phonemes;

/// `character -> list of readings`, each reading an ordered list of raw
/// phoneme-slot strings whose last two entries are source metadata.
type RawTable = HashMap<String, Vec<Vec<String>>>;

#[derive(Debug, Clone, Default)]
pub struct G2pTable {
    entries: HashMap<String, Vec<Option<String>>>,
}

impl G2pTable {
    /// An empty table: every alphanumeric character resolves to OOV. Useful
    /// for tests and for documents that don't need phonetic comparison.
    pub fn empty() -> Self {
        G2pTable {
            entries: HashMap::new(),
        }
    }

    pub fn load_json(path: impl AsRef<Path>) -> CoreResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parse the table format described in spec §6: a JSON object mapping
    /// each character to a list of readings, each reading a flat list of
    /// strings terminated by two source-metadata slots the loader drops.
    /// Only the first reading is used (§9 open question, resolved from
    /// `original_source/dphon/g2p.py::get_sound_table_json`, which does the
    /// same: `*reading, _src, _src2 = readings[0]`).
    pub fn from_json_str(raw: &str) -> CoreResult<Self> {
        let table: RawTable = serde_json::from_str(raw)?;
        let mut entries = HashMap::with_capacity(table.len());
        let mut skipped = 0usize;
        let mut arity: Option<usize> = None;

        for (ch, readings) in table {
            let Some(first) = readings.first() else {
                skipped += 1;
                continue;
            };
            if first.len() < 2 {
                skipped += 1;
                continue;
            }
            let slots: Vec<Option<String>> = first[..first.len() - 2]
                .iter()
                .map(|s| if s.is_empty() { None } else { Some(s.clone()) })
                .collect();

            match arity {
                None => arity = Some(slots.len()),
                Some(n) if n != slots.len() => {
                    skipped += 1;
                    continue;
                }
                _ => {}
            }
            entries.insert(ch, slots);
        }

        if skipped > 0 {
            tracing::warn!(skipped, "skipped malformed g2p entries");
        }

        Ok(G2pTable { entries })
    }

    /// `phonemes(text)`: empty tuple for non-alphanumeric text, OOV for
    /// alphanumeric text with no entry, the stored tuple otherwise.
    pub fn phonemes(&self, text: &str) -> Phonemes {
        if !text.chars().all(|c| c.is_alphanumeric()) {
            return Phonemes::NonVoiced;
        }
        match self.entries.get(text) {
            Some(slots) => Phonemes::Syllable(slots.clone()),
            None => Phonemes::Oov,
        }
    }

    pub fn is_oov(&self, text: &str) -> bool {
        self.phonemes(text).is_oov()
    }

    /// True iff every token has a real (non-OOV, non-empty) phoneme tuple,
    /// all tuples are identical, and the surface texts are not all
    /// identical.
    pub fn are_graphic_variants(&self, texts: &[&str]) -> bool {
        if texts.len() < 2 {
            return false;
        }
        let first_phonemes = self.phonemes(texts[0]);
        if first_phonemes.is_oov() || first_phonemes.is_non_voiced() {
            return false;
        }
        let all_same_phonemes = texts
            .iter()
            .all(|t| self.phonemes(t) == first_phonemes);
        if !all_same_phonemes {
            return false;
        }
        let all_same_text = texts.iter().all(|t| *t == texts[0]);
        !all_same_text
    }

    /// `has_variant(match)`: true iff some aligned position is a graphic
    /// variant pair. Requires equal-length spans; designed to run on
    /// unextended seeds, per spec §4.1.
    pub fn has_variant(&self, m: &Match) -> CoreResult<bool> {
        let u_tokens = m.u_span.tokens();
        let v_tokens = m.v_span.tokens();
        if u_tokens.len() != v_tokens.len() {
            return Err(crate::error::CoreError::SpanLengthMismatch {
                u_len: u_tokens.len(),
                v_len: v_tokens.len(),
            });
        }
        for (u, v) in u_tokens.iter().zip(v_tokens.iter()) {
            if self.are_graphic_variants(&[u.text.as_str(), v.text.as_str()]) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
