//! Typed errors for programmer-facing misuse of the core API.
//!
//! Ordinary data problems (OOV tokens, empty alignments, malformed G2P
//! entries) are not modeled as errors — they are handled in place per the
//! component designs. These variants cover only the cases where a caller
//! has violated an invariant the core relies on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid span [{start}, {end}) for document of length {len}")]
    InvalidSpan {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("match endpoints must belong to distinct documents, got \"{0}\" on both sides")]
    SameDocument(String),

    #[error("document \"{0}\" is not a node in the match graph")]
    UnknownDocument(String),

    #[error("has_variant requires spans of equal length (u={u_len}, v={v_len})")]
    SpanLengthMismatch { u_len: usize, v_len: usize },

    #[error("failed to parse g2p table: {0}")]
    G2pTableParse(#[from] serde_json::Error),

    #[error("io error loading g2p table: {0}")]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
