/*
 * SPDX-FileCopyrightText: 2026 wikilinknet contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]

//! `wikilinknet` turns a directed graph of inter-article links into a
//! compact, randomly-addressable on-disk store, and serves neighbor
//! lookups against it with minimal per-query work.
//!
//! See [`writer::GraphWriter`] to build a store and [`reader::GraphReader`]
//! to query one.

pub mod compress;
pub mod edgelist;
pub mod error;
pub mod reader;
pub mod titlemap;
pub mod varint;
pub mod writer;

pub use error::{GraphError, Result};
pub use reader::GraphReader;
pub use writer::GraphWriter;

/// The 8 ASCII magic bytes at the start of every binary store.
pub const MAGIC: &[u8; 8] = b"WLINKNET";

/// The only store format version this crate understands.
pub const VERSION: u32 = 1;

/// `MAGIC(8) || u32_le version(4) || u32_le node_count(4)`.
pub const HEADER_LEN: usize = 16;

/// `u64_le id || u64_le offset`.
pub const INDEX_ENTRY_LEN: usize = 16;

/// Prelude for callers who want the common types in scope without naming
/// each module.
pub mod prelude {
    pub use crate::error::{GraphError, Result};
    pub use crate::reader::GraphReader;
    pub use crate::writer::GraphWriter;
}

#[cfg(test)]
mod integration {
    use super::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn large_sparse_round_trip() {
        let dir = tempdir().unwrap();
        let bin_path = dir.path().join("g.bin");
        let map_path = dir.path().join("g.map");

        let mut w = GraphWriter::create(&bin_path, &map_path, true).unwrap();
        // A modest stand-in for the spec's 100k-source sanity scenario:
        // enough sources and a wide enough destination range to exercise
        // multi-byte varints and a non-trivial index.
        for src in 0..2000u64 {
            let dst = (src * 2654435761) % 50_000;
            w.ingest(&format!("n{src}"), [format!("n{dst}").as_str()])
                .unwrap();
        }
        w.finalize().unwrap();
        w.close().unwrap();

        let reader = GraphReader::open(&bin_path, &map_path).unwrap();
        for src in 0..2000u64 {
            let id = reader.id_of(&format!("n{src}")).unwrap();
            let neighbors = reader.neighbors(id).unwrap();
            assert_eq!(neighbors.len(), 1);
        }
    }
}
