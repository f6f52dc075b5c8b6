//! Local sequence alignment of a match's two spans (C9/§4.7), ported from
//! `original_source/dphon/align.py::SmithWatermanAligner`, which wraps
//! `lingpy.align.pairwise.sw_align`.

use crate::error::CoreResult;
use crate::matching::Match;
use crate::span::Span;

const GAP: &str = "-";
const MATCH_SCORE: f64 = 2.0;
const MISMATCH_PENALTY: f64 = -1.0;
const GAP_PENALTY: f64 = -1.0;

/// Produces per-position aligned text for a match, adjusting its span bounds
/// down to the aligned (center) region and trimming leading/trailing
/// gap/non-alphanumeric positions so the result starts and ends on real
/// tokens (§4.7, §8 property 2: `|au| = |av|`).
pub trait Aligner {
    fn align(&self, m: &Match) -> CoreResult<Match>;
}

/// Standard local alignment: match/mismatch/gap scores as constants, full
/// dynamic-programming matrix with traceback from the highest-scoring cell
/// (§4.7).
pub struct SmithWatermanAligner;

impl Aligner for SmithWatermanAligner {
    fn align(&self, m: &Match) -> CoreResult<Match> {
        // The DP matrix compares phoneme content (falling back to surface
        // text for non-voiced/OOV tokens, same as the source's "or the
        // token text if it has none"), but emits surface token text in the
        // aligned output — matching §4.7 step 3 ("emit the corresponding
        // token from the trimmed spans").
        let u_keys: Vec<String> = m.u_span.tokens().iter().map(comparison_key).collect();
        let v_keys: Vec<String> = m.v_span.tokens().iter().map(comparison_key).collect();
        let u_surface: Vec<String> = m.u_span.tokens().iter().map(|t| t.text.clone()).collect();
        let v_surface: Vec<String> = m.v_span.tokens().iter().map(|t| t.text.clone()).collect();

        let alignment = sw_align(&u_keys, &v_keys, &u_surface, &v_surface);
        let mut au = alignment.au;
        let mut av = alignment.av;

        // Empty alignment (no positive-scoring region): §7 says this isn't
        // an error, just an empty-aligned Match with score 0. There is no
        // center region to narrow the spans to, so they pass through
        // unchanged.
        if au.is_empty() {
            return Ok(Match::new(m.u_span.clone(), m.v_span.clone(), 0.0, Vec::new(), Vec::new()));
        }

        // §4.7 step 2: adjust bounds to the aligned center region, dropping
        // the non-aligned prefix/suffix `sw_align` reported.
        let mut u_start = m.u_span.start + alignment.i_start;
        let mut u_end = m.u_span.start + alignment.i_end;
        let mut v_start = m.v_span.start + alignment.j_start;
        let mut v_end = m.v_span.start + alignment.j_end;

        trim_ends(&mut au, &mut av, &mut u_start, &mut u_end, &mut v_start, &mut v_end);

        if au.is_empty() {
            return Ok(Match::new(m.u_span.clone(), m.v_span.clone(), 0.0, Vec::new(), Vec::new()));
        }

        let u_span = Span::new(m.u_span.doc.clone(), u_start, u_end)?;
        let v_span = Span::new(m.v_span.doc.clone(), v_start, v_end)?;

        // §4.7 step 5: normalized_score = raw_score / max(|au|, |av|).
        let len = au.len().max(av.len());
        let score = alignment.raw_score / len as f64;

        Ok(Match::new(u_span, v_span, score, au, av))
    }
}

fn comparison_key(t: &crate::token::Token) -> String {
    let joined = t.phonemes.joined();
    if joined.is_empty() {
        t.text.clone()
    } else {
        joined
    }
}

/// The result of a single Smith-Waterman pass: the consumed (0-indexed,
/// half-open) ranges on each side, the emitted aligned surface sequences,
/// and the raw (un-normalized) score.
struct Alignment {
    i_start: usize,
    i_end: usize,
    j_start: usize,
    j_end: usize,
    au: Vec<String>,
    av: Vec<String>,
    raw_score: f64,
}

/// Full Smith-Waterman DP + traceback. `u_keys`/`v_keys` drive the scoring
/// comparisons; `u_surface`/`v_surface` (same length, position-aligned) are
/// what gets emitted into the aligned output sequences.
fn sw_align(
    u_keys: &[String],
    v_keys: &[String],
    u_surface: &[String],
    v_surface: &[String],
) -> Alignment {
    let rows = u_keys.len() + 1;
    let cols = v_keys.len() + 1;
    let mut h = vec![vec![0.0_f64; cols]; rows];
    let mut best = (0usize, 0usize, 0.0_f64);

    for i in 1..rows {
        for j in 1..cols {
            let sub = if u_keys[i - 1] == v_keys[j - 1] {
                MATCH_SCORE
            } else {
                MISMATCH_PENALTY
            };
            let diag = h[i - 1][j - 1] + sub;
            let up = h[i - 1][j] + GAP_PENALTY;
            let left = h[i][j - 1] + GAP_PENALTY;
            let cell = diag.max(up).max(left).max(0.0);
            h[i][j] = cell;
            if cell > best.2 {
                best = (i, j, cell);
            }
        }
    }

    let (i_end, j_end, score) = best;
    let (mut i, mut j) = (i_end, j_end);
    let mut au = Vec::new();
    let mut av = Vec::new();

    while i > 0 && j > 0 && h[i][j] > 0.0 {
        let sub = if u_keys[i - 1] == v_keys[j - 1] {
            MATCH_SCORE
        } else {
            MISMATCH_PENALTY
        };
        if (h[i][j] - (h[i - 1][j - 1] + sub)).abs() < 1e-9 {
            au.push(u_surface[i - 1].clone());
            av.push(v_surface[j - 1].clone());
            i -= 1;
            j -= 1;
        } else if (h[i][j] - (h[i - 1][j] + GAP_PENALTY)).abs() < 1e-9 {
            au.push(u_surface[i - 1].clone());
            av.push(GAP.to_string());
            i -= 1;
        } else {
            au.push(GAP.to_string());
            av.push(v_surface[j - 1].clone());
            j -= 1;
        }
    }

    au.reverse();
    av.reverse();
    Alignment {
        i_start: i,
        i_end,
        j_start: j,
        j_end,
        au,
        av,
        raw_score: score,
    }
}

/// Trim leading/trailing positions that aren't alphanumeric on both sides,
/// tracking gap consumption independently per side so `|au| == |av|`
/// continues to hold after trimming, and shrinking the span bounds by
/// exactly the real (non-gap) tokens removed from each side (§8 property 2).
///
/// `align.py` trims `utxt`/`vtxt` together by a single index whenever either
/// side's last character is non-alnum, which desyncs span length from
/// aligned-text length whenever only one side had a gap at that position.
/// Tracking each side's real-vs-gap consumption separately avoids that.
fn trim_ends(
    au: &mut Vec<String>,
    av: &mut Vec<String>,
    u_start: &mut usize,
    u_end: &mut usize,
    v_start: &mut usize,
    v_end: &mut usize,
) {
    while let (Some(u_last), Some(v_last)) = (au.last(), av.last()) {
        if is_alnum_token(u_last) && is_alnum_token(v_last) {
            break;
        }
        if u_last != GAP {
            *u_end -= 1;
        }
        if v_last != GAP {
            *v_end -= 1;
        }
        au.pop();
        av.pop();
    }
    au.reverse();
    av.reverse();
    while let (Some(u_first), Some(v_first)) = (au.last(), av.last()) {
        if is_alnum_token(u_first) && is_alnum_token(v_first) {
            break;
        }
        if u_first != GAP {
            *u_start += 1;
        }
        if v_first != GAP {
            *v_start += 1;
        }
        au.pop();
        av.pop();
    }
    au.reverse();
    av.reverse();
}

fn is_alnum_token(tok: &str) -> bool {
    tok != GAP && tok.chars().any(|c| c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::g2p::G2pTable;
    use crate::span::Span;
    use std::sync::Arc;

    #[test]
    fn identical_spans_align_with_no_gaps() {
        let table = G2pTable::empty();
        let text = "千室之邑";
        let d1 = Arc::new(Document::new("d1", text, &table));
        let d2 = Arc::new(Document::new("d2", text, &table));
        let u = Span::new(d1, 0, 4).unwrap();
        let v = Span::new(d2, 0, 4).unwrap();
        let m = Match::seed(u, v);

        let aligned = SmithWatermanAligner.align(&m).unwrap();
        assert_eq!(aligned.u_aligned.len(), aligned.v_aligned.len());
        assert_eq!(aligned.u_aligned, vec!["千", "室", "之", "邑"]);
        assert_eq!(aligned.v_aligned, vec!["千", "室", "之", "邑"]);
        assert_eq!((aligned.u_span.start, aligned.u_span.end), (0, 4));
        assert_eq!((aligned.v_span.start, aligned.v_span.end), (0, 4));
        assert!(aligned.score > 0.0);
    }

    #[test]
    fn insertion_produces_balanced_gap() {
        let table = G2pTable::empty();
        let d1 = Arc::new(Document::new("d1", "千室之邑", &table));
        let d2 = Arc::new(Document::new("d2", "千室國之邑", &table));
        let u = Span::new(d1, 0, 4).unwrap();
        let v = Span::new(d2, 0, 5).unwrap();
        let m = Match::seed(u, v);

        let aligned = SmithWatermanAligner.align(&m).unwrap();
        assert_eq!(aligned.u_aligned.len(), aligned.v_aligned.len());
        // trimmed ends must be alphanumeric on both sides
        assert!(is_alnum_token(aligned.u_aligned.first().unwrap()));
        assert!(is_alnum_token(aligned.v_aligned.first().unwrap()));
        assert!(is_alnum_token(aligned.u_aligned.last().unwrap()));
        assert!(is_alnum_token(aligned.v_aligned.last().unwrap()));
        // the match's own span bounds must narrow to the aligned region
        assert_eq!(aligned.u_span.len(), aligned.u_aligned.iter().filter(|t| *t != "-").count());
        assert_eq!(aligned.v_span.len(), aligned.v_aligned.iter().filter(|t| *t != "-").count());
    }

    #[test]
    fn no_overlap_yields_empty_alignment_and_original_spans() {
        let table = G2pTable::empty();
        let d1 = Arc::new(Document::new("d1", "千室之邑", &table));
        let d2 = Arc::new(Document::new("d2", "百乘國家", &table));
        let u = Span::new(d1, 0, 4).unwrap();
        let v = Span::new(d2, 0, 4).unwrap();
        let m = Match::seed(u, v);

        let aligned = SmithWatermanAligner.align(&m).unwrap();
        assert!(aligned.u_aligned.is_empty());
        assert!(aligned.v_aligned.is_empty());
        assert_eq!(aligned.score, 0.0);
        assert_eq!((aligned.u_span.start, aligned.u_span.end), (0, 4));
        assert_eq!((aligned.v_span.start, aligned.v_span.end), (0, 4));
    }
}
