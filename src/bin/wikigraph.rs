/*
 * SPDX-FileCopyrightText: 2026 wikilinknet contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A small demonstration CLI over [`wikilinknet`].
//!
//! Not a contractual interface of the graph store: the spec this crate
//! implements treats "the calling application's CLI" as an external
//! collaborator. This binary exists so the store can be exercised from a
//! shell without pulling in a full application.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use wikilinknet::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "wikigraph", about = "Build and query wikilinknet graph stores")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a store from a JSONL file of `{"title": ["dst", ...]}` objects,
    /// one object per line.
    Build {
        jsonl_path: PathBuf,
        bin_path: PathBuf,
        map_path: PathBuf,

        #[arg(long)]
        /// Keep duplicate destinations instead of collapsing them.
        no_dedup: bool,
    },
    /// Print the neighbor titles of one node, looked up by id or by title.
    Query {
        bin_path: PathBuf,
        map_path: PathBuf,

        #[arg(long, conflicts_with = "title")]
        id: Option<u64>,

        #[arg(long, conflicts_with = "id")]
        title: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Build { jsonl_path, bin_path, map_path, no_dedup } => {
            build(&jsonl_path, &bin_path, &map_path, !no_dedup)
        }
        Command::Query { bin_path, map_path, id, title } => {
            query(&bin_path, &map_path, id, title)
        }
    }
}

fn build(jsonl_path: &PathBuf, bin_path: &PathBuf, map_path: &PathBuf, dedup: bool) -> Result<()> {
    let file = std::fs::File::open(jsonl_path)
        .with_context(|| format!("opening {}", jsonl_path.display()))?;
    let reader = std::io::BufReader::new(file);

    let mut writer = GraphWriter::create(bin_path, map_path, dedup)
        .with_context(|| format!("creating store at {}", bin_path.display()))?;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: std::collections::HashMap<String, Vec<String>> = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid JSON record", jsonl_path.display(), lineno + 1))?;
        for (src_title, dst_titles) in &record {
            let dst_refs = dst_titles.iter().map(String::as_str);
            writer.ingest(src_title, dst_refs)?;
        }
    }

    writer.finalize()?;
    writer.close()?;
    Ok(())
}

fn query(bin_path: &PathBuf, map_path: &PathBuf, id: Option<u64>, title: Option<String>) -> Result<()> {
    let reader = GraphReader::open(bin_path, map_path)
        .with_context(|| format!("opening store at {}", bin_path.display()))?;

    let id = match (id, title) {
        (Some(id), _) => id,
        (None, Some(title)) => reader
            .id_of(&title)
            .with_context(|| format!("no such title: {title:?}"))?,
        (None, None) => anyhow::bail!("query requires --id or --title"),
    };

    let neighbors = reader.neighbors(id)?;
    for dst_id in neighbors {
        match reader.title_of(dst_id) {
            Some(title) => println!("{dst_id}\t{title}"),
            None => println!("{dst_id}\t<untitled>"),
        }
    }
    Ok(())
}
