/*
 * SPDX-FileCopyrightText: 2026 wikilinknet contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Memory-mapped, random-access reads against a finalized store.
//!
//! Once the index and title map are loaded, [`GraphReader::neighbors`]
//! performs only read-only accesses over an immutable memory map and
//! read-only in-memory tables, so it is safe to call from any number of
//! threads without additional synchronization.

use std::num::NonZeroUsize;
use std::path::Path;

use mmap_rs::{Mmap, MmapOptions};
use parking_lot::Mutex;

use crate::edgelist;
use crate::error::GraphError;
use crate::titlemap::TitleMap;
use crate::{HEADER_LEN, INDEX_ENTRY_LEN, MAGIC, VERSION};

/// A loaded `(id, offset)` index entry; `offset` points at the `u32_le`
/// length prefix of that node's block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct IndexEntry {
    id: u64,
    offset: u64,
}

/// A read-only handle on a finalized graph store.
pub struct GraphReader {
    mmap: Mmap,
    node_count: u32,
    index: Vec<IndexEntry>,
    titles: TitleMap,
    cache: Option<Mutex<lru::LruCache<u64, Vec<u64>>>>,
}

impl GraphReader {
    /// Opens `bin_path` and `map_path`, validating the header and loading
    /// the index and title map into memory. No decoded-block cache.
    pub fn open(bin_path: impl AsRef<Path>, map_path: impl AsRef<Path>) -> Result<Self, GraphError> {
        Self::open_with_cache(bin_path, map_path, None)
    }

    /// Like [`open`](Self::open), but keeps up to `capacity` decoded
    /// adjacency lists in an LRU cache shared across threads behind a
    /// mutex, per the spec's "implementations MAY cache decoded blocks".
    pub fn with_cache(
        bin_path: impl AsRef<Path>,
        map_path: impl AsRef<Path>,
        capacity: NonZeroUsize,
    ) -> Result<Self, GraphError> {
        Self::open_with_cache(bin_path, map_path, Some(capacity))
    }

    fn open_with_cache(
        bin_path: impl AsRef<Path>,
        map_path: impl AsRef<Path>,
        cache_capacity: Option<NonZeroUsize>,
    ) -> Result<Self, GraphError> {
        let mmap = mmap_file(bin_path.as_ref())?;
        let bytes = &mmap[..];

        if bytes.len() < HEADER_LEN + 8 {
            return Err(GraphError::InvalidFormat);
        }
        if &bytes[0..8] != MAGIC {
            return Err(GraphError::InvalidFormat);
        }
        let version = u32::from_le_bytes(bytes[8..12].try_into().unwrap());
        if version != VERSION {
            return Err(GraphError::UnsupportedVersion(version));
        }
        let node_count = u32::from_le_bytes(bytes[12..16].try_into().unwrap());

        let index_pos_bytes = &bytes[bytes.len() - 8..];
        let index_pos = u64::from_le_bytes(index_pos_bytes.try_into().unwrap());

        let index = load_index(bytes, index_pos)?;

        log::info!(
            "opened store: {} nodes declared, {} indexed blocks",
            node_count,
            index.len()
        );

        let titles = TitleMap::load(map_path)?;

        Ok(Self {
            mmap,
            node_count,
            index,
            titles,
            cache: cache_capacity.map(|cap| Mutex::new(lru::LruCache::new(cap))),
        })
    }

    /// The node count recorded in the header at finalization.
    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    pub fn title_of(&self, id: u64) -> Option<&str> {
        self.titles.title_of(id)
    }

    pub fn id_of(&self, title: &str) -> Option<u64> {
        self.titles.id_of(title)
    }

    /// Returns `id`'s ascending neighbor list, or an empty sequence if `id`
    /// has no index entry — whether because it truly has no outgoing
    /// edges, or because it was never seen as a source at all; the two
    /// cases are indistinguishable by design (see the store's design
    /// notes).
    pub fn neighbors(&self, id: u64) -> Result<Vec<u64>, GraphError> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.lock().get(&id) {
                return Ok(hit.clone());
            }
        }

        let Some(entry) = binary_search_index(&self.index, id) else {
            return Ok(Vec::new());
        };

        let bytes = &self.mmap[..];
        let offset = entry.offset as usize;
        let len_end = offset
            .checked_add(4)
            .ok_or(GraphError::IndexCorrupt("block offset out of range"))?;
        if len_end > bytes.len() {
            return Err(GraphError::IndexCorrupt("block offset out of range"));
        }
        let len = u32::from_le_bytes(bytes[offset..len_end].try_into().unwrap()) as usize;
        let payload_end = len_end
            .checked_add(len)
            .ok_or(GraphError::IndexCorrupt("block length out of range"))?;
        if payload_end > bytes.len() {
            return Err(GraphError::IndexCorrupt("block length out of range"));
        }
        let compressed = &bytes[len_end..payload_end];
        let decompressed = crate::compress::decompress(compressed)?;
        let neighbors = edgelist::decode(&decompressed)?;

        if let Some(cache) = &self.cache {
            cache.lock().put(id, neighbors.clone());
        }

        Ok(neighbors)
    }
}

fn binary_search_index(index: &[IndexEntry], id: u64) -> Option<IndexEntry> {
    index
        .binary_search_by_key(&id, |e| e.id)
        .ok()
        .map(|pos| index[pos])
}

/// Scans `[index_pos, len - 8)` in 16-byte strides, failing cleanly if the
/// region's length is not a multiple of 16 or if ids are not
/// non-decreasing, per the spec's resolution of an ambiguity in the
/// original source.
fn load_index(bytes: &[u8], index_pos: u64) -> Result<Vec<IndexEntry>, GraphError> {
    let index_pos = index_pos as usize;
    let end = bytes
        .len()
        .checked_sub(8)
        .ok_or(GraphError::IndexCorrupt("file too short for trailer"))?;

    if index_pos > end {
        return Err(GraphError::IndexCorrupt("index_pos past end of file"));
    }

    let region = &bytes[index_pos..end];
    if region.len() % INDEX_ENTRY_LEN != 0 {
        return Err(GraphError::IndexCorrupt(
            "index region is not a multiple of 16 bytes",
        ));
    }

    let mut index = Vec::with_capacity(region.len() / INDEX_ENTRY_LEN);
    let mut prev_id: Option<u64> = None;
    for chunk in region.chunks_exact(INDEX_ENTRY_LEN) {
        let id = u64::from_le_bytes(chunk[0..8].try_into().unwrap());
        let offset = u64::from_le_bytes(chunk[8..16].try_into().unwrap());
        if let Some(prev) = prev_id {
            if id <= prev {
                return Err(GraphError::IndexCorrupt("index is not strictly ascending"));
            }
        }
        prev_id = Some(id);
        index.push(IndexEntry { id, offset });
    }
    Ok(index)
}

fn mmap_file(path: &Path) -> Result<Mmap, GraphError> {
    let file = std::fs::File::open(path)?;
    let len = file.metadata()?.len() as usize;
    // mmap-rs refuses to map a zero-length region; an empty store is still
    // a well-formed (if useless) file, so fall back to an anonymous empty
    // mapping in that case rather than failing the whole open.
    if len == 0 {
        let mmap = MmapOptions::new(0)
            .map_err(|e| GraphError::Io(std::io::Error::other(e)))?
            .map()
            .map_err(|e| GraphError::Io(std::io::Error::other(e)))?;
        return Ok(mmap);
    }
    let mmap = unsafe {
        MmapOptions::new(len)
            .map_err(|e| GraphError::Io(std::io::Error::other(e)))?
            .with_file(file, 0)
            .map()
            .map_err(|e| GraphError::Io(std::io::Error::other(e)))?
    };
    Ok(mmap)
}
