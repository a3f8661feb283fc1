/*
 * SPDX-FileCopyrightText: 2026 wikilinknet contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! An injective title↔id mapping.
//!
//! At write time this is the [`TitleInterner`], which assigns dense ids by
//! order of first appearance and streams `id\ttitle\n` lines to the sidecar
//! file as it goes. At read time, [`TitleMap::load`] reads that sidecar
//! back into a structure queryable in both directions.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::GraphError;

/// Assigns ids to titles as they are first seen, and mirrors every
/// assignment into the sidecar file.
pub struct TitleInterner {
    sidecar: BufWriter<File>,
    title_to_id: HashMap<String, u64>,
    next_id: u64,
}

impl TitleInterner {
    pub fn create(sidecar_path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let sidecar = BufWriter::new(File::create(sidecar_path)?);
        Ok(Self {
            sidecar,
            title_to_id: HashMap::new(),
            next_id: 0,
        })
    }

    /// Returns the id for `title`, assigning a fresh one and appending a
    /// sidecar line if this is the first time it has been seen.
    ///
    /// Fails with [`GraphError::InvalidTitle`] if `title` contains a tab or
    /// a newline, which the sidecar's line format cannot represent.
    pub fn intern(&mut self, title: &str) -> Result<u64, GraphError> {
        if let Some(&id) = self.title_to_id.get(title) {
            return Ok(id);
        }
        if title.contains('\t') || title.contains('\n') {
            return Err(GraphError::InvalidTitle);
        }
        let id = self.next_id;
        self.next_id += 1;
        writeln!(self.sidecar, "{id}\t{title}")?;
        self.title_to_id.insert(title.to_string(), id);
        Ok(id)
    }

    /// The number of distinct titles interned so far; becomes the store's
    /// `node_count` at finalization.
    pub fn len(&self) -> u64 {
        self.next_id
    }

    pub fn is_empty(&self) -> bool {
        self.next_id == 0
    }

    pub fn finish(mut self) -> Result<(), GraphError> {
        self.sidecar.flush()?;
        Ok(())
    }
}

/// A bidirectional, read-only title↔id table loaded from the sidecar file.
#[derive(Debug, Default)]
pub struct TitleMap {
    id_to_title: HashMap<u64, String>,
    title_to_id: HashMap<String, u64>,
}

impl TitleMap {
    /// Loads a sidecar file written by [`TitleInterner`].
    ///
    /// Lines that do not parse as `<id>\t<title>` are skipped with a
    /// logged warning rather than failing the whole load: the format
    /// tolerates a sidecar that was hand-edited for a few benign entries.
    pub fn load(sidecar_path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let file = File::open(sidecar_path)?;
        let reader = BufReader::new(file);
        let mut map = TitleMap::default();

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            match line.split_once('\t') {
                Some((id_str, title)) if !title.is_empty() => match id_str.parse::<u64>() {
                    Ok(id) => {
                        map.id_to_title.insert(id, title.to_string());
                        map.title_to_id.insert(title.to_string(), id);
                    }
                    Err(_) => {
                        log::warn!("sidecar line {}: non-numeric id, skipping: {line:?}", lineno + 1);
                    }
                },
                _ => {
                    log::warn!("sidecar line {}: unparseable, skipping: {line:?}", lineno + 1);
                }
            }
        }
        Ok(map)
    }

    pub fn title_of(&self, id: u64) -> Option<&str> {
        self.id_to_title.get(&id).map(String::as_str)
    }

    pub fn id_of(&self, title: &str) -> Option<u64> {
        self.title_to_id.get(title).copied()
    }

    pub fn len(&self) -> usize {
        self.id_to_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_title.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn intern_is_idempotent_and_dense() {
        let tmp = NamedTempFile::new().unwrap();
        let mut interner = TitleInterner::create(tmp.path()).unwrap();
        assert_eq!(interner.intern("A").unwrap(), 0);
        assert_eq!(interner.intern("B").unwrap(), 1);
        assert_eq!(interner.intern("A").unwrap(), 0);
        assert_eq!(interner.len(), 2);
        interner.finish().unwrap();
    }

    #[test]
    fn rejects_tab_and_newline_titles() {
        let tmp = NamedTempFile::new().unwrap();
        let mut interner = TitleInterner::create(tmp.path()).unwrap();
        assert!(matches!(interner.intern("a\tb"), Err(GraphError::InvalidTitle)));
        assert!(matches!(interner.intern("a\nb"), Err(GraphError::InvalidTitle)));
    }

    #[test]
    fn round_trips_through_sidecar() {
        let tmp = NamedTempFile::new().unwrap();
        {
            let mut interner = TitleInterner::create(tmp.path()).unwrap();
            interner.intern("Apple").unwrap();
            interner.intern("Banana").unwrap();
            interner.intern("Cherry").unwrap();
            interner.finish().unwrap();
        }
        let map = TitleMap::load(tmp.path()).unwrap();
        assert_eq!(map.len(), 3);
        for i in 0..3u64 {
            let title = map.title_of(i).unwrap();
            assert_eq!(map.id_of(title), Some(i));
        }
    }

    #[test]
    fn tolerates_hand_edited_garbage_lines() {
        let tmp = NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "0\tApple\nnot a valid line\n1\tBanana\n\n2\t\n").unwrap();
        let map = TitleMap::load(tmp.path()).unwrap();
        // "2\t" has an empty title and is skipped too
        assert_eq!(map.len(), 2);
        assert_eq!(map.title_of(0), Some("Apple"));
        assert_eq!(map.title_of(1), Some("Banana"));
    }
}
