//! `reuse`: detect phonetic textual reuse across a corpus (spec.md §6).
//!
//! Single, subcommand-free pipeline: load → index → seed → filter variants
//! → extend/reduce → align → graph filters → (optional) group → write.
//! Grounded on `original_source/dphon/commands.py`'s top-level driver
//! function, which runs the same stage sequence over a `Typer` CLI.

mod args;
mod input;
mod output;

use std::io;

use anyhow::{bail, Context};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use phonoreuse_core::{seed, G2pTable, MatchGraph, PhoneticExtender, SmithWatermanAligner};

use args::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = cli.validate() {
        eprintln!("error: {e}");
        std::process::exit(2);
    }

    match run(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let table = G2pTable::load_json(&cli.g2p_table)
        .with_context(|| format!("loading g2p table from {}", cli.g2p_table.display()))?;
    tracing::info!("loaded g2p table");

    let paths = input::resolve_paths(&cli.paths);
    let docs = input::load_documents(&paths, cli.input_format, &table);
    if docs.is_empty() {
        bail!("no valid input documents found");
    }
    tracing::info!(count = docs.len(), "loaded documents");

    let mut graph = MatchGraph::new();
    for doc in &docs {
        graph.add_document(doc.clone());
    }

    let index_bar = ProgressBar::new(docs.len() as u64);
    index_bar.set_style(bar_style("indexing"));
    let mut index = phonoreuse_core::PhoneticIndex::new();
    for doc in &docs {
        index.add(doc, cli.n)?;
        index_bar.inc(1);
    }
    index_bar.finish_with_message("indexed");

    let seeds = seed(&index, 2);
    tracing::info!(count = seeds.len(), "generated seed matches");

    let seeds: Vec<_> = if cli.all_variants {
        seeds
    } else {
        seeds
            .into_iter()
            .filter(|m| table.has_variant(m).unwrap_or(false))
            .collect()
    };
    tracing::info!(count = seeds.len(), "seeds after variant filter");

    for m in seeds {
        graph.add_match(m)?;
    }

    let extend_bar = ProgressBar::new_spinner();
    extend_bar.set_message("extending matches");
    let extender = PhoneticExtender::new(cli.k, cli.l);
    graph.extend(&extender);
    extend_bar.finish_with_message(format!("extended to {} matches", graph.len()));

    let align_bar = ProgressBar::new_spinner();
    align_bar.set_message("aligning matches");
    graph.align(&SmithWatermanAligner)?;
    align_bar.finish_with_message("aligned");

    graph.filter(|m| {
        let len = m.len();
        if len < cli.min_length || len > cli.max_length {
            return false;
        }
        let graphic = output::graphic_similarity(m);
        if graphic < cli.min_graphic_similarity || graphic > cli.max_graphic_similarity {
            return false;
        }
        if m.score < cli.min_phonetic_similarity || m.score > cli.max_phonetic_similarity {
            return false;
        }
        true
    });
    tracing::info!(count = graph.len(), "matches after graph filters");

    let groups = if cli.group { Some(graph.group()) } else { None };

    let stdout = io::stdout();
    output::write_output(
        stdout.lock(),
        cli.output_format,
        graph.edges(),
        groups.as_deref(),
        cli.context,
    )?;

    Ok(())
}

fn bar_style(prefix: &str) -> ProgressStyle {
    ProgressStyle::with_template(&format!(
        "{{spinner}} {prefix} [{{bar:40}}] {{pos}}/{{len}}"
    ))
    .unwrap_or_else(|_| ProgressStyle::default_bar())
}
