//! End-to-end pipeline scenarios S1-S6 from `spec.md` §8, run against the
//! public API the same way a caller would drive the pipeline.

use std::sync::Arc;

use phonoreuse_core::{
    group_matches, seed, Aligner, Document, Extender, G2pTable, Match, PhoneticExtender,
    PhoneticIndex, Span, SmithWatermanAligner,
};

/// Every character in `text` maps to the fixed phoneme `"t"` — enough to
/// make identical/near-identical texts produce high phonetic similarity
/// without needing a real reconstructed G2P table.
fn uniform_table(text: &str) -> G2pTable {
    let entries: serde_json::Map<String, serde_json::Value> = text
        .chars()
        .map(|c| (c.to_string(), serde_json::json!([["t", "src", "src2"]])))
        .collect();
    G2pTable::from_json_str(&serde_json::Value::Object(entries).to_string()).unwrap()
}

/// Every character maps to a phoneme equal to itself — so a one-character
/// edit shows up as a real dissimilarity, not masked by the uniform table.
fn identity_table(text: &str) -> G2pTable {
    let entries: serde_json::Map<String, serde_json::Value> = text
        .chars()
        .map(|c| (c.to_string(), serde_json::json!([[c.to_string(), "s", "s"]])))
        .collect();
    G2pTable::from_json_str(&serde_json::Value::Object(entries).to_string()).unwrap()
}

#[test]
fn s1_identical_sequences_no_extension_needed() {
    let text = "千室之邑百乘之家";
    let table = identity_table(text);
    let u_doc = Arc::new(Document::new("u", text, &table));
    let v_doc = Arc::new(Document::new("v", text, &table));

    let u = Span::new(u_doc, 0, 8).unwrap();
    let v = Span::new(v_doc, 0, 8).unwrap();
    let seed = Match::seed(u, v);

    let extender = PhoneticExtender::new(0.7, 100);
    let extended = extender.extend(&seed).unwrap();
    assert_eq!((extended.u_span.start, extended.u_span.end), (0, 8));
    assert_eq!((extended.v_span.start, extended.v_span.end), (0, 8));
    assert!((extended.score - 1.0).abs() < 1e-9);

    let aligned = SmithWatermanAligner.align(&extended).unwrap();
    assert_eq!(aligned.u_aligned, text.chars().map(|c| c.to_string()).collect::<Vec<_>>());
    assert_eq!(aligned.v_aligned, aligned.u_aligned);
    assert!((aligned.score - 1.0).abs() < 1e-9);
}

#[test]
fn s2_graphic_variant_extension() {
    let text = "與朋友交言而有信雖曰未學吾必謂之學矣";
    let table = uniform_table(text);
    let u_doc = Arc::new(Document::new("u", text, &table));
    let v_doc = Arc::new(Document::new("v", text, &table));

    let u = Span::new(u_doc, 4, 8).unwrap();
    let v = Span::new(v_doc, 4, 8).unwrap();
    let seed = Match::seed(u, v);

    let extender = PhoneticExtender::new(0.75, 100);
    let extended = extender.extend(&seed).unwrap();
    assert_eq!((extended.u_span.start, extended.u_span.end), (0, 18));
    assert_eq!((extended.v_span.start, extended.v_span.end), (0, 18));
    assert!((extended.score - 1.0).abs() < 1e-9);
}

#[test]
fn s3_cutoff_at_similarity_drop() {
    let u_text = "行有餘力則以學文";
    let v_text = "行有餘力博學覽古";
    let table_text: String = u_text.chars().chain(v_text.chars()).collect();
    let table = identity_table(&table_text);
    let u_doc = Arc::new(Document::new("u", u_text, &table));
    let v_doc = Arc::new(Document::new("v", v_text, &table));

    let u = Span::new(u_doc, 0, 2).unwrap();
    let v = Span::new(v_doc, 0, 2).unwrap();
    let seed = Match::seed(u, v);

    let extender = PhoneticExtender::new(0.75, 100);
    let extended = extender.extend(&seed).unwrap();
    // both documents share "行有餘力" (positions 0..4) but diverge after;
    // §8 S3 names the exact cutoff as [0,4) on both sides.
    assert_eq!((extended.u_span.start, extended.u_span.end), (0, 4));
    assert_eq!((extended.v_span.start, extended.v_span.end), (0, 4));
}

#[test]
fn s4_dedup_of_submatches() {
    let u_text = "侯王若能守之萬物將自化化而欲作吾將闐之以無名之樸";
    // one-character variant near the end: 闐 vs 鎮, but identical phonemes
    let v_text = "侯王若能守之萬物將自化化而欲作吾將鎮之以無名之樸";
    let mut table_text: String = u_text.chars().collect();
    table_text.extend(v_text.chars());
    let table = uniform_table(&table_text);

    let u_doc = Arc::new(Document::new("u", u_text, &table));
    let v_doc = Arc::new(Document::new("v", v_text, &table));

    let seeds = vec![
        Match::seed(
            Span::new(u_doc.clone(), 3, 6).unwrap(),
            Span::new(v_doc.clone(), 3, 6).unwrap(),
        ),
        Match::seed(
            Span::new(u_doc.clone(), 12, 15).unwrap(),
            Span::new(v_doc.clone(), 12, 15).unwrap(),
        ),
        Match::seed(
            Span::new(u_doc.clone(), 20, 23).unwrap(),
            Span::new(v_doc.clone(), 20, 23).unwrap(),
        ),
    ];

    let extender = PhoneticExtender::new(0.7, 100);
    let reduced = phonoreuse_core::reduce(&extender, seeds);
    assert_eq!(reduced.len(), 1);
    let m = &reduced[0];
    assert_eq!((m.u_span.start, m.u_span.end), (0, u_doc.len()));
    assert_eq!((m.v_span.start, m.v_span.end), (0, v_doc.len()));
}

#[test]
fn s5_variant_detection_on_seeds() {
    // "回"/"迴" share a reconstructed phoneme tuple but differ in surface
    // form; "囧" is an unrelated OOV filler character.
    let table = {
        let obj = serde_json::json!({
            "回": [["h", "uei", "src", "src2"]],
            "迴": [["h", "uei", "src", "src2"]],
        });
        G2pTable::from_json_str(&obj.to_string()).unwrap()
    };

    let variant_u = Arc::new(Document::new("u1", "回", &table));
    let variant_v = Arc::new(Document::new("v1", "迴", &table));
    let variant_match = Match::seed(
        Span::new(variant_u, 0, 1).unwrap(),
        Span::new(variant_v, 0, 1).unwrap(),
    );
    assert!(table.has_variant(&variant_match).unwrap());

    let identical_u = Arc::new(Document::new("u2", "回", &table));
    let identical_v = Arc::new(Document::new("v2", "回", &table));
    let identical_match = Match::seed(
        Span::new(identical_u, 0, 1).unwrap(),
        Span::new(identical_v, 0, 1).unwrap(),
    );
    assert!(!table.has_variant(&identical_match).unwrap());

    let oov_u = Arc::new(Document::new("u3", "囧", &table));
    let oov_v = Arc::new(Document::new("v3", "迴", &table));
    let oov_match = Match::seed(
        Span::new(oov_u, 0, 1).unwrap(),
        Span::new(oov_v, 0, 1).unwrap(),
    );
    assert!(!table.has_variant(&oov_match).unwrap());
}

#[test]
fn s6_grouping() {
    let text = "與朋友交言而有信";
    let table = uniform_table(text);
    let d1 = Arc::new(Document::new("d1", text, &table));
    let d2 = Arc::new(Document::new("d2", text, &table));
    let d3 = Arc::new(Document::new("d3", text, &table));

    let span = |d: &Arc<Document>| Span::new(d.clone(), 0, text.chars().count()).unwrap();

    let m12 = Match::seed(span(&d1), span(&d2));
    let m23 = Match::seed(span(&d2), span(&d3));
    let m13 = Match::seed(span(&d1), span(&d3));

    let groups = group_matches(vec![m12, m23, m13]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].members.len(), 3);
}

#[test]
fn seeds_never_self_match() {
    let text = "千室之邑";
    let table = uniform_table(text);
    let doc = Arc::new(Document::new("d1", text, &table));
    let mut index = PhoneticIndex::new();
    index.add(&doc, 2).unwrap();
    for m in seed(&index, 2) {
        assert_ne!(m.u_id(), m.v_id());
    }
}
