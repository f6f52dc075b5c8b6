//! Corpus loading: glob expansion, per-path error skipping, txt/jsonl
//! parsing (spec.md §6, §7), grounded on `original_source/dphon/cli.py`'s
//! path collection and `loader.py`'s per-document construction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use phonoreuse_core::{Document, G2pTable};
use serde::Deserialize;

use crate::args::InputFormat;

#[derive(Deserialize)]
struct JsonlRecord {
    id: String,
    text: String,
    #[serde(flatten)]
    _meta: serde_json::Map<String, serde_json::Value>,
}

/// Resolve every CLI path argument into concrete file paths, expanding glob
/// patterns and falling back to the literal path for non-matching patterns
/// (§6: "`<path>...`: files or globs").
pub fn resolve_paths(patterns: &[String]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for pattern in patterns {
        match glob::glob(pattern) {
            Ok(paths) => {
                let mut matched = false;
                for entry in paths {
                    match entry {
                        Ok(path) => {
                            matched = true;
                            out.push(path);
                        }
                        Err(e) => tracing::warn!(%e, pattern, "failed to read glob entry"),
                    }
                }
                if !matched {
                    out.push(PathBuf::from(pattern));
                }
            }
            Err(e) => {
                tracing::warn!(%e, pattern, "invalid glob pattern, treating as literal path");
                out.push(PathBuf::from(pattern));
            }
        }
    }
    out
}

/// Load every resolvable path as one or more documents, skipping and
/// warning on any path that fails (§7: "invalid entries skipped").
pub fn load_documents(
    paths: &[PathBuf],
    format: InputFormat,
    table: &G2pTable,
) -> Vec<Arc<Document>> {
    let mut docs = Vec::new();
    for path in paths {
        match load_one(path, format, table) {
            Ok(mut loaded) => docs.append(&mut loaded),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable input"),
        }
    }
    docs
}

fn load_one(
    path: &Path,
    format: InputFormat,
    table: &G2pTable,
) -> Result<Vec<Arc<Document>>, String> {
    if !path.is_file() {
        return Err(format!("{} is not a file", path.display()));
    }
    match format {
        InputFormat::Txt => {
            let raw = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
            // §6: "All ASCII whitespace is stripped; all other characters
            // preserved" — full-width/ideographic whitespace in CJK source
            // text is content, not padding, so only ASCII whitespace goes.
            let text: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document")
                .to_string();
            Ok(vec![Arc::new(Document::new(id, &text, table))])
        }
        InputFormat::Jsonl => {
            let raw = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
            let mut docs = Vec::new();
            for (lineno, line) in raw.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<JsonlRecord>(line) {
                    Ok(rec) => docs.push(Arc::new(Document::new(rec.id, &rec.text, table))),
                    Err(e) => tracing::warn!(
                        path = %path.display(),
                        line = lineno + 1,
                        error = %e,
                        "skipping malformed jsonl line"
                    ),
                }
            }
            Ok(docs)
        }
    }
}
