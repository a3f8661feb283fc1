/*
 * SPDX-FileCopyrightText: 2026 wikilinknet contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A thin, deterministic wrapper over zlib-framed deflate.
//!
//! Each block is compressed independently with no cross-block dictionary,
//! so a single corrupted block never affects decoding of its neighbors.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::GraphError;

/// Compresses `data` with the default compression level.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    // Writing to a `Vec` through `ZlibEncoder` cannot fail.
    encoder.write_all(data).expect("in-memory compression cannot fail");
    encoder.finish().expect("in-memory compression cannot fail")
}

/// Decompresses a block previously produced by [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, GraphError> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(GraphError::BlockCorrupt)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(8);
        let compressed = compress(&data);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn empty_input_round_trips() {
        let compressed = compress(&[]);
        assert_eq!(decompress(&compressed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn corrupted_checksum_fails_cleanly() {
        let data = b"deterministic input for compression".to_vec();
        let mut compressed = compress(&data);
        // the trailing bytes of a zlib stream are its Adler-32 checksum;
        // flipping them is guaranteed to be caught, unlike a flip in the
        // middle of the deflate stream which may or may not still decode.
        let last = compressed.len() - 1;
        compressed[last] ^= 0xff;
        assert!(matches!(decompress(&compressed), Err(GraphError::BlockCorrupt(_))));
    }

    #[test]
    fn truncated_stream_fails_cleanly() {
        let data = b"deterministic input for compression".repeat(4);
        let mut compressed = compress(&data);
        compressed.truncate(compressed.len() / 2);
        assert!(matches!(decompress(&compressed), Err(GraphError::BlockCorrupt(_))));
    }

    #[test]
    fn compression_is_deterministic() {
        let data = b"repeat repeat repeat repeat".to_vec();
        assert_eq!(compress(&data), compress(&data));
    }
}
