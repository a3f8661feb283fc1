/*
 * SPDX-FileCopyrightText: 2026 wikilinknet contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Two-pass construction of a binary graph store.
//!
//! Pass 1 interns titles and accumulates `src_id -> Vec<dst_id>` in memory,
//! because the on-disk index must be sorted by id and the header's node
//! count is unknown until every input record has been seen. Pass 2, run
//! from [`GraphWriter::finalize`], emits one compressed block per source,
//! appends the sorted index, and patches the header.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use dsi_progress_logger::prelude::*;

use crate::compress;
use crate::edgelist;
use crate::error::GraphError;
use crate::titlemap::TitleInterner;
use crate::{MAGIC, VERSION};

/// Builds a binary graph store and its title sidecar from a sequence of
/// `(src_title, [dst_title])` records.
pub struct GraphWriter {
    out: File,
    interner: TitleInterner,
    // Keyed by BTreeMap so pass 2 can walk sources in id order for free;
    // the on-disk index is sorted regardless of iteration order, but this
    // keeps block layout close to id order, which is good for locality.
    edges: BTreeMap<u64, Vec<u64>>,
    dedup: bool,
    finalized: bool,
}

impl GraphWriter {
    /// Opens `bin_path` and `map_path` for writing. `dedup` controls
    /// whether duplicate destinations within one source's adjacency list
    /// are collapsed before encoding (the spec recommends this; readers
    /// must tolerate either choice).
    pub fn create(
        bin_path: impl AsRef<Path>,
        map_path: impl AsRef<Path>,
        dedup: bool,
    ) -> Result<Self, GraphError> {
        let mut out = File::create(bin_path)?;
        write_placeholder_header(&mut out)?;
        let interner = TitleInterner::create(map_path)?;
        Ok(Self {
            out,
            interner,
            edges: BTreeMap::new(),
            dedup,
            finalized: false,
        })
    }

    /// Ingests one `(src_title, dst_titles)` record.
    ///
    /// Interns `src_title` and every destination title, and records the
    /// resulting edges for pass 2. Sources with no destinations are
    /// interned but never get a block or an index entry, per the spec.
    pub fn ingest<'a>(
        &mut self,
        src_title: &str,
        dst_titles: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), GraphError> {
        if self.finalized {
            log::warn!("ingest called after finalize; ignoring record for {src_title:?}");
            return Err(GraphError::AlreadyFinalized);
        }

        let src_id = self.intern_or_reject(src_title)?;
        let mut dst_ids = Vec::new();
        for dst_title in dst_titles {
            dst_ids.push(self.intern_or_reject(dst_title)?);
        }

        if !dst_ids.is_empty() {
            self.edges.entry(src_id).or_default().extend(dst_ids);
        }
        Ok(())
    }

    fn intern_or_reject(&mut self, title: &str) -> Result<u64, GraphError> {
        match self.interner.intern(title) {
            Ok(id) => Ok(id),
            Err(e) => {
                log::debug!("rejecting invalid title {title:?}: {e}");
                Err(e)
            }
        }
    }

    /// Writes all blocks, the index, and patches the header's node count.
    /// Consumes nothing of `self` so callers can still inspect it, but no
    /// further `ingest` calls are accepted afterward.
    pub fn finalize(&mut self) -> Result<(), GraphError> {
        let mut pl = ProgressLogger::default();
        pl.item_name("block").expected_updates(Some(self.edges.len()));
        pl.start("writing blocks");

        let mut index: Vec<(u64, u64)> = Vec::with_capacity(self.edges.len());

        for (&src_id, dst_ids) in self.edges.iter_mut() {
            let offset = self.out.stream_position()?;
            let encoded = edgelist::encode(dst_ids, self.dedup);
            let compressed = compress::compress(&encoded);
            self.out.write_all(&(compressed.len() as u32).to_le_bytes())?;
            self.out.write_all(&compressed)?;
            index.push((src_id, offset));
            pl.light_update();
        }
        pl.done();

        // Index is already ascending because `edges` is a BTreeMap, but the
        // contract only requires sortedness, not insertion order, so sort
        // explicitly to stay correct regardless of how `edges` is built.
        index.sort_unstable_by_key(|&(id, _)| id);

        let index_pos = self.out.stream_position()?;
        for (id, offset) in &index {
            self.out.write_all(&id.to_le_bytes())?;
            self.out.write_all(&offset.to_le_bytes())?;
        }
        self.out.write_all(&index_pos.to_le_bytes())?;

        let node_count = self.interner.len();
        self.out.seek(SeekFrom::Start(12))?;
        self.out.write_all(&(node_count as u32).to_le_bytes())?;
        self.out.seek(SeekFrom::End(0))?;

        log::info!(
            "finalized store: {} nodes, {} indexed blocks",
            node_count,
            index.len()
        );

        self.finalized = true;
        Ok(())
    }

    /// Flushes and closes both underlying files.
    ///
    /// Must be called after [`finalize`](Self::finalize); dropping the
    /// writer mid-construction leaves the header node count undefined and
    /// the partial file must not be treated as a valid store.
    pub fn close(self) -> Result<(), GraphError> {
        self.out.sync_all()?;
        // `self.interner` was only ever used to produce the sidecar file
        // during `ingest`; flushing it here is a no-op once all writes
        // have already gone through `BufWriter`, but `finish` is the
        // explicit contract for releasing the handle.
        self.interner.finish()
    }
}

/// Writes the 16-byte header with a placeholder node count of 0; patched
/// in place by [`GraphWriter::finalize`].
fn write_placeholder_header(out: &mut File) -> Result<(), GraphError> {
    out.write_all(MAGIC)?;
    out.write_all(&VERSION.to_le_bytes())?;
    out.write_all(&0u32.to_le_bytes())?;
    Ok(())
}
