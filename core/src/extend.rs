//! Bidirectional, threshold-bounded seed growth (C7/§4.5), ported from
//! `original_source/dphon/extend.py`'s `StringDistanceExtender` and its
//! `LevenshteinExtender`/`LevenshteinPhoneticExtender` subclasses.

use crate::error::CoreResult;
use crate::matching::Match;
use crate::span::Span;

/// Grows a match outward while a string-distance ratio stays above a
/// threshold, trimming the trailing decline (§4.5).
///
/// Implementors supply `score`, comparing the scored window of two spans:
/// `backward = false` measures the tail (last `len_limit` characters of the
/// comparison string), `backward = true` measures the head (first
/// `len_limit` characters) — matching `_score(..., rev: bool)` in the
/// source.
pub trait Extender {
    fn threshold(&self) -> f64;
    fn score(&self, u: &Span, v: &Span, backward: bool) -> f64;

    /// Extend in both directions and return the combined, rescored match.
    /// A seed that can't grow in either direction is returned unchanged in
    /// span (§8 property 3; §9: "extension returns the input match
    /// unchanged when no growth is possible").
    fn extend(&self, m: &Match) -> CoreResult<Match> {
        let fwd = self.extend_forward(m)?;
        let rev = self.extend_backward(m)?;
        let u_span = Span::new(m.u_span.doc.clone(), rev.u_span.start, fwd.u_span.end)?;
        let v_span = Span::new(m.v_span.doc.clone(), rev.v_span.start, fwd.v_span.end)?;
        let score = self.score(&u_span, &v_span, false);
        Ok(Match::new(u_span, v_span, score, Vec::new(), Vec::new()))
    }

    /// Grow on the right while the forward-scored ratio stays above
    /// threshold, then trim the trailing decline (§4.5 steps 1-3).
    fn extend_forward(&self, m: &Match) -> CoreResult<Match> {
        let mut u = m.u_span.clone();
        let mut v = m.v_span.clone();
        let mut score = self.score(&u, &v, false);
        let mut trail = 0usize;
        while score >= self.threshold() && u.can_grow_right() && v.can_grow_right() {
            let next_u = u.grow_right()?;
            let next_v = v.grow_right()?;
            let next_score = self.score(&next_u, &next_v, false);
            trail = if next_score < score { trail + 1 } else { 0 };
            score = next_score;
            u = next_u;
            v = next_v;
        }
        let u_span = Span::new(u.doc.clone(), u.start, u.end - trail)?;
        let v_span = Span::new(v.doc.clone(), v.start, v.end - trail)?;
        Ok(Match::new(u_span, v_span, score, Vec::new(), Vec::new()))
    }

    /// Symmetric backward pass, growing on the left.
    fn extend_backward(&self, m: &Match) -> CoreResult<Match> {
        let mut u = m.u_span.clone();
        let mut v = m.v_span.clone();
        let mut score = self.score(&u, &v, true);
        let mut trail = 0usize;
        while score >= self.threshold() && u.can_grow_left() && v.can_grow_left() {
            let next_u = u.grow_left()?;
            let next_v = v.grow_left()?;
            let next_score = self.score(&next_u, &next_v, true);
            trail = if next_score < score { trail + 1 } else { 0 };
            score = next_score;
            u = next_u;
            v = next_v;
        }
        let u_span = Span::new(u.doc.clone(), u.start + trail, u.end)?;
        let v_span = Span::new(v.doc.clone(), v.start + trail, v.end)?;
        Ok(Match::new(u_span, v_span, score, Vec::new(), Vec::new()))
    }
}

/// Compares the phonetic content of the two spans. An OOV token anywhere in
/// either span forces the ratio to -1, cleanly terminating extension at
/// that boundary (§4.5, §7).
pub struct PhoneticExtender {
    pub threshold: f64,
    pub len_limit: usize,
}

impl PhoneticExtender {
    pub fn new(threshold: f64, len_limit: usize) -> Self {
        PhoneticExtender { threshold, len_limit }
    }
}

impl Extender for PhoneticExtender {
    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn score(&self, u: &Span, v: &Span, backward: bool) -> f64 {
        if u.has_oov() || v.has_oov() {
            return -1.0;
        }
        let u_text: String = u.tokens().iter().map(|t| t.phonemes.joined()).collect();
        let v_text: String = v.tokens().iter().map(|t| t.phonemes.joined()).collect();
        score_window(&u_text, &v_text, self.len_limit, backward)
    }
}

/// Compares surface text directly, ignoring phonemes. Useful when
/// phonemes aren't available, and for the CLI's `--min/max-graphic-similarity`
/// filters which need a non-phonetic similarity measure (see
/// `original_source/dphon/extend.py::LevenshteinExtender`).
pub struct SurfaceExtender {
    pub threshold: f64,
    pub len_limit: usize,
}

impl SurfaceExtender {
    pub fn new(threshold: f64, len_limit: usize) -> Self {
        SurfaceExtender { threshold, len_limit }
    }
}

impl Extender for SurfaceExtender {
    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn score(&self, u: &Span, v: &Span, backward: bool) -> f64 {
        score_window(&u.text(), &v.text(), self.len_limit, backward)
    }
}

fn score_window(a: &str, b: &str, len_limit: usize, backward: bool) -> f64 {
    let a_window = take_window(a, len_limit, backward);
    let b_window = take_window(b, len_limit, backward);
    strsim::normalized_levenshtein(&a_window, &b_window)
}

/// `text[:len_limit]` when `backward` (comparing the head), `text[-len_limit:]`
/// otherwise (comparing the tail) — measured in characters, as the source
/// measures in Python string characters.
fn take_window(text: &str, len_limit: usize, backward: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    if backward {
        chars.into_iter().take(len_limit).collect()
    } else {
        let start = chars.len().saturating_sub(len_limit);
        chars[start..].iter().collect()
    }
}
