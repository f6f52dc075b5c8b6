//! phonoreuse-core
//!
//! Phonetic n-gram indexing, extension, alignment, and grouping for
//! detecting textual reuse across a corpus of Old Chinese documents.
//!
//! The pipeline runs in stages, each its own module:
//!
//! 1. [`g2p`] resolves characters to phonemes via a grapheme-to-phoneme table.
//! 2. [`document`] and [`token`] hold the tokenized, phoneme-annotated corpus.
//! 3. [`ngram`] slides fixed-width windows ([`span::Span`]) over a document.
//! 4. [`index`] buckets windows by shared phonetic key.
//! 5. [`seed`] emits one [`matching::Match`] per cross-document pair sharing a key.
//! 6. [`extend`] grows seeds outward while phonetic similarity holds.
//! 7. [`reduce`] collapses overlapping extended matches per document pair.
//! 8. [`align`] produces a token-level alignment and score for each match.
//! 9. [`graph`] holds the corpus and its matches as a single structure.
//! 10. [`group`] clusters matches that share an anchor passage.
//!
//! Public API surface:
//! - [`G2pTable`] — grapheme-to-phoneme lookup
//! - [`Document`], [`Token`], [`Phonemes`] — the corpus model
//! - [`Span`] — a half-open window into a document
//! - [`Match`], [`MatchGroup`] — reuse candidates and their clusters
//! - [`PhoneticIndex`] — the n-gram key index
//! - [`MatchGraph`] — the corpus-plus-matches pipeline driver
//! - [`Extender`], [`Aligner`] — the pluggable scoring strategies

pub mod align;
pub mod document;
pub mod error;
pub mod extend;
pub mod g2p;
pub mod graph;
pub mod group;
pub mod index;
pub mod matching;
pub mod ngram;
pub mod reduce;
pub mod seed;
pub mod span;
pub mod token;

pub use align::{Aligner, SmithWatermanAligner};
pub use document::Document;
pub use error::{CoreError, CoreResult};
pub use extend::{Extender, PhoneticExtender, SurfaceExtender};
pub use g2p::G2pTable;
pub use graph::MatchGraph;
pub use group::{group_matches, MatchGroup};
pub use index::PhoneticIndex;
pub use matching::Match;
pub use ngram::ngrams;
pub use reduce::reduce;
pub use seed::seed;
pub use span::Span;
pub use token::{Phonemes, Token};
