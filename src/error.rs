/*
 * SPDX-FileCopyrightText: 2026 wikilinknet contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Error taxonomy for the graph store.
//!
//! Library code returns [`GraphError`]; the CLI binary wraps it in
//! [`anyhow::Error`] at the boundary, the same split the rest of this
//! codebase uses between its core crates and its `bin`/`cli` entry points.

/// Everything that can go wrong while building or querying a store.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The magic bytes at the start of the binary file do not match.
    #[error("invalid file format")]
    InvalidFormat,

    /// The store was written by a version of the format this reader does
    /// not understand.
    #[error("unsupported store version {0}")]
    UnsupportedVersion(u32),

    /// The index region is the wrong length, not sorted, or otherwise
    /// inconsistent.
    #[error("index is corrupt: {0}")]
    IndexCorrupt(&'static str),

    /// A block's compressed payload could not be decompressed.
    #[error("block is corrupt")]
    BlockCorrupt(#[source] std::io::Error),

    /// A varint ran past the end of its buffer or exceeded 10 bytes.
    #[error("malformed varint")]
    MalformedVarint,

    /// Bytes remained in a decompressed block after decoding the expected
    /// number of deltas.
    #[error("trailing garbage after decoded edge list")]
    TrailingGarbage,

    /// A title contained a tab or newline, which the sidecar format
    /// forbids.
    #[error("title contains a tab or newline")]
    InvalidTitle,

    /// `ingest` was called on a writer that already ran `finalize`.
    #[error("writer already finalized")]
    AlreadyFinalized,

    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
