//! Command-line flags (spec.md §6), parsed with `clap`'s derive API in the
//! style of `rano-oss-libchinese/libzhuyin/src/main.rs`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "reuse")]
#[command(about = "Detect phonetic textual reuse across a corpus of Old Chinese documents")]
#[command(version)]
pub struct Cli {
    /// Files or glob patterns to read as the corpus.
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Path to the grapheme-to-phoneme table (JSON).
    #[arg(long)]
    pub g2p_table: PathBuf,

    /// N-gram order.
    #[arg(short = 'n', default_value_t = 4)]
    pub n: usize,

    /// Extension similarity threshold.
    #[arg(short = 'k', default_value_t = 0.7)]
    pub k: f64,

    /// Extension length limit, in tokens.
    #[arg(short = 'l', default_value_t = 50)]
    pub l: usize,

    /// Context tokens displayed around each match.
    #[arg(short = 'c', default_value_t = 4)]
    pub context: usize,

    /// Include matches without graphic variation.
    #[arg(short = 'a', default_value_t = false)]
    pub all_variants: bool,

    /// Minimum match length.
    #[arg(long = "min-length", default_value_t = 8)]
    pub min_length: usize,

    /// Maximum match length.
    #[arg(long = "max-length", default_value_t = 64)]
    pub max_length: usize,

    /// Minimum graphic similarity of the aligned surface sequences.
    #[arg(long = "min-graphic-similarity", default_value_t = 0.0)]
    pub min_graphic_similarity: f64,

    /// Maximum graphic similarity of the aligned surface sequences.
    #[arg(long = "max-graphic-similarity", default_value_t = 0.9)]
    pub max_graphic_similarity: f64,

    /// Minimum phonetic similarity (the aligner's normalized score).
    #[arg(long = "min-phonetic-similarity", default_value_t = 0.7)]
    pub min_phonetic_similarity: f64,

    /// Maximum phonetic similarity (the aligner's normalized score).
    #[arg(long = "max-phonetic-similarity", default_value_t = 1.0)]
    pub max_phonetic_similarity: f64,

    /// Group output by shared anchor.
    #[arg(short = 'g', default_value_t = false)]
    pub group: bool,

    /// Input format.
    #[arg(short = 'i', value_enum, default_value_t = InputFormat::Txt)]
    pub input_format: InputFormat,

    /// Output format.
    #[arg(short = 'o', value_enum, default_value_t = OutputFormat::Txt)]
    pub output_format: OutputFormat,

    /// Increase verbosity (-v = info, -vv = debug).
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Argument-level sanity checks beyond what `clap` enforces structurally
    /// (§6: "malformed combinations...are an argument error, exit code 2").
    pub fn validate(&self) -> Result<(), String> {
        if self.min_length > self.max_length {
            return Err(format!(
                "--min-length ({}) must not exceed --max-length ({})",
                self.min_length, self.max_length
            ));
        }
        if self.min_graphic_similarity > self.max_graphic_similarity {
            return Err("--min-graphic-similarity must not exceed --max-graphic-similarity".into());
        }
        if self.min_phonetic_similarity > self.max_phonetic_similarity {
            return Err("--min-phonetic-similarity must not exceed --max-phonetic-similarity".into());
        }
        Ok(())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Txt,
    Jsonl,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Txt,
    Jsonl,
    Csv,
    Html,
}
