//! The `Record` projection and the four output writers (spec.md §6.3),
//! grounded on `original_source/dphon/fmt.py`'s single intermediate shape
//! plus several `to_*` formatter functions.

use std::io::Write;

use phonoreuse_core::{Match, MatchGroup};
use serde::Serialize;

use crate::args::OutputFormat;

/// One flat, serializable row — the shape every writer consumes. Built
/// once per `Match` (ungrouped) or per group member (grouped), per
/// `SPEC_FULL.md` §6.3's "each member's record carries the group's anchor
/// doc/bounds as its own `u_id`/`u_start`/`u_end`" rule.
#[derive(Serialize, Clone)]
pub struct Record {
    pub u_id: String,
    pub v_id: String,
    pub u_text: String,
    pub v_text: String,
    pub u_text_aligned: String,
    pub v_text_aligned: String,
    pub u_start: usize,
    pub u_end: usize,
    pub v_start: usize,
    pub v_end: usize,
    pub phonetic_similarity: f64,
    pub graphic_similarity: f64,
}

impl Record {
    pub fn from_match(m: &Match) -> Self {
        Record {
            u_id: m.u_id().to_string(),
            v_id: m.v_id().to_string(),
            u_text: m.u_span.text(),
            v_text: m.v_span.text(),
            u_text_aligned: m.u_aligned.join(""),
            v_text_aligned: m.v_aligned.join(""),
            u_start: m.u_span.start,
            u_end: m.u_span.end,
            v_start: m.v_span.start,
            v_end: m.v_span.end,
            phonetic_similarity: m.score,
            graphic_similarity: graphic_similarity(m),
        }
    }
}

/// Levenshtein similarity of the aligned surface sequences, independent of
/// the aligner's phonetic score — used by the CLI's
/// `--min/max-graphic-similarity` filters (§6.1).
pub fn graphic_similarity(m: &Match) -> f64 {
    let u = m.u_aligned.join("");
    let v = m.v_aligned.join("");
    strsim::normalized_levenshtein(&u, &v)
}

/// Flatten either ungrouped matches or grouped match groups into the
/// records every writer consumes.
pub fn build_records(matches: &[Match], groups: Option<&[MatchGroup]>) -> Vec<Record> {
    match groups {
        Some(groups) => groups
            .iter()
            .flat_map(|g| g.members.iter().map(Record::from_match))
            .collect(),
        None => matches.iter().map(Record::from_match).collect(),
    }
}

/// Write `txt` output: one line (or group block) per record. Streamed
/// directly, record-at-a-time, since each line is independently valid
/// (§7: "txt output is streamed... since each line is independently
/// valid").
pub fn write_txt<W: Write>(
    mut w: W,
    matches: &[Match],
    groups: Option<&[MatchGroup]>,
    context: usize,
) -> std::io::Result<()> {
    if let Some(groups) = groups {
        for group in groups {
            writeln!(
                w,
                "# anchor {}[{}, {})",
                group.anchor_doc, group.anchor_start, group.anchor_end
            )?;
            for m in &group.members {
                write_txt_line(&mut w, m, context)?;
            }
        }
    } else {
        for m in matches {
            write_txt_line(&mut w, m, context)?;
        }
    }
    Ok(())
}

/// `-c <N>` tokens of surrounding text on either side of a span, per §6.1.
/// Clamped to document bounds rather than the source's raw slice (which can
/// request a negative start index).
fn context_window(span: &phonoreuse_core::Span, context: usize) -> (String, String) {
    let doc = &span.doc;
    let left_start = span.start.saturating_sub(context);
    let right_end = (span.end + context).min(doc.len());
    let left: String = doc.tokens()[left_start..span.start]
        .iter()
        .map(|t| t.text.as_str())
        .collect();
    let right: String = doc.tokens()[span.end..right_end]
        .iter()
        .map(|t| t.text.as_str())
        .collect();
    (left, right)
}

fn write_txt_line<W: Write>(w: &mut W, m: &Match, context: usize) -> std::io::Result<()> {
    let (u_left, u_right) = context_window(&m.u_span, context);
    let (v_left, v_right) = context_window(&m.v_span, context);
    writeln!(
        w,
        "{}[{},{}) <-> {}[{},{})  phon={:.3} graph={:.3}\n  u: {u_left}⟦{}⟧{u_right}\n  v: {v_left}⟦{}⟧{v_right}",
        m.u_id(),
        m.u_span.start,
        m.u_span.end,
        m.v_id(),
        m.v_span.start,
        m.v_span.end,
        m.score,
        graphic_similarity(m),
        m.u_aligned.join(""),
        m.v_aligned.join(""),
    )
}

/// Write `jsonl` output: one buffered pass, one JSON object per line.
/// Buffered before the first byte is written (§7: writers "never partially
/// write to the chosen destination on a fatal error").
pub fn write_jsonl<W: Write>(mut w: W, records: &[Record]) -> anyhow::Result<()> {
    let mut buf = String::new();
    for r in records {
        buf.push_str(&serde_json::to_string(r)?);
        buf.push('\n');
    }
    w.write_all(buf.as_bytes())?;
    Ok(())
}

/// Write `csv` output, buffered into memory before any byte reaches `w`.
pub fn write_csv<W: Write>(mut w: W, records: &[Record]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for r in records {
        writer.serialize(r)?;
    }
    let buf = writer.into_inner()?;
    w.write_all(&buf)?;
    Ok(())
}

/// Write a minimal `html` table, including the aligned text and `-c`
/// surrounding context so a reader can eyeball a match in context (§6.3:
/// html keeps the context the txt format carries, rather than being a
/// strictly-worse table).
pub fn write_html<W: Write>(
    mut w: W,
    matches: &[Match],
    groups: Option<&[MatchGroup]>,
    context: usize,
) -> std::io::Result<()> {
    let mut buf = String::new();
    buf.push_str("<table>\n<tr><th>u</th><th>v</th><th>u aligned</th><th>v aligned</th><th>phonetic</th><th>graphic</th></tr>\n");
    let rows: Box<dyn Iterator<Item = &Match>> = match groups {
        Some(groups) => Box::new(groups.iter().flat_map(|g| g.members.iter())),
        None => Box::new(matches.iter()),
    };
    for m in rows {
        let (u_left, u_right) = context_window(&m.u_span, context);
        let (v_left, v_right) = context_window(&m.v_span, context);
        buf.push_str(&format!(
            "<tr><td>{} [{}, {}) {}⟦{}⟧{}</td><td>{} [{}, {}) {}⟦{}⟧{}</td><td>{}</td><td>{}</td><td>{:.3}</td><td>{:.3}</td></tr>\n",
            html_escape(m.u_id()),
            m.u_span.start,
            m.u_span.end,
            html_escape(&u_left),
            html_escape(&m.u_span.text()),
            html_escape(&u_right),
            html_escape(m.v_id()),
            m.v_span.start,
            m.v_span.end,
            html_escape(&v_left),
            html_escape(&m.v_span.text()),
            html_escape(&v_right),
            html_escape(&m.u_aligned.join("")),
            html_escape(&m.v_aligned.join("")),
            m.score,
            graphic_similarity(m),
        ));
    }
    buf.push_str("</table>\n");
    w.write_all(buf.as_bytes())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Dispatch to the writer selected by `-o`.
pub fn write_output<W: Write>(
    w: W,
    format: OutputFormat,
    matches: &[Match],
    groups: Option<&[MatchGroup]>,
    context: usize,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Txt => Ok(write_txt(w, matches, groups, context)?),
        OutputFormat::Jsonl => write_jsonl(w, &build_records(matches, groups)),
        OutputFormat::Csv => write_csv(w, &build_records(matches, groups)),
        OutputFormat::Html => Ok(write_html(w, matches, groups, context)?),
    }
}
