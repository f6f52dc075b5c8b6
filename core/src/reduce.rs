//! Collapsing overlapping extended matches per document pair into a
//! maximal, non-redundant set (C8/§4.6), ported from
//! `original_source/dphon/extend.py::extend_matches`.

use std::collections::HashMap;

use crate::extend::Extender;
use crate::matching::Match;

/// Group seeds by unordered document pair, then run each pair's seeds
/// through the streaming reducer (§4.6).
///
/// Seed orientation is already consistent within a pair without explicit
/// normalization: `seed::seed` draws its pairs from `PhoneticIndex` buckets,
/// whose spans are appended document-by-document in full (`add` is called to
/// completion for one document before the next), so for any two documents in
/// the corpus the earlier-indexed one is always `u` across every seed
/// between them. `pair_key` only needs to group by unordered id pair, not
/// reorder fields.
///
/// Pair order in the output follows first-seen order among the input seeds,
/// tracked explicitly in `order` alongside the `HashMap` buckets (the same
/// pattern `index.rs` uses for its key buckets) — a bare `HashMap` iterates
/// in a per-process-random order, which would make the emitted match order,
/// and therefore every CLI output format, nondeterministic across runs
/// (§5, §8 property 6).
pub fn reduce<E: Extender>(extender: &E, seeds: Vec<Match>) -> Vec<Match> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut by_pair: HashMap<(String, String), Vec<Match>> = HashMap::new();
    for seed in seeds {
        let key = pair_key(seed.u_id(), seed.v_id());
        if !by_pair.contains_key(&key) {
            order.push(key.clone());
        }
        by_pair.entry(key).or_default().push(seed);
    }

    let mut out = Vec::new();
    for key in order {
        let matches = by_pair.remove(&key).unwrap();
        out.extend(reduce_pair(extender, matches));
    }
    out
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// The streaming queue algorithm from §4.6, ported directly from
/// `extend.py::extend_matches`: seeds are processed in ascending
/// `(u.start, u.end, v.start, v.end)` order against a queue of already
/// *extended* matches ("working"). A seed still inside the queue's u-range
/// is either dropped (its v-range is already covered by an active match) or
/// extended and appended as a distinct maximal match through the same
/// u-region. `spec.md` names "the rightmost end currently in the queue on
/// u" as the flush boundary; that reads as the max `u_span.end` across the
/// whole queue, not merely its first element (which is what the source's
/// literal `working[0].utxt.end` checks, and would under-subsume whenever
/// the queue isn't already sorted by end).
fn reduce_pair<E: Extender>(extender: &E, mut seeds: Vec<Match>) -> Vec<Match> {
    seeds.sort_by_key(|m| m.sort_key());

    let mut working: Vec<Match> = Vec::new();
    let mut done = Vec::new();

    for current in seeds {
        let rightmost_end = working.iter().map(|m| m.u_span.end).max();
        let flush = match rightmost_end {
            None => true,
            Some(end) => current.u_span.start >= end,
        };

        if flush {
            done.append(&mut working);
            if let Ok(extended) = extender.extend(&current) {
                working.push(extended);
            }
            continue;
        }

        // the seed's own (unextended) v-range against each active,
        // already-extended match's v-range: fully contained means this
        // seed is internal to a maximal match already captured.
        let internal = working.iter().any(|m| {
            current.v_span.start >= m.v_span.start
                && current.v_span.start <= m.v_span.end
                && current.v_span.end <= m.v_span.end
        });
        if internal {
            continue;
        }

        if let Ok(extended) = extender.extend(&current) {
            working.push(extended);
        }
    }
    done.append(&mut working);
    done
}
