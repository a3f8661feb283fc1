/*
 * SPDX-FileCopyrightText: 2026 wikilinknet contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use wikilinknet::prelude::*;

#[test]
fn full_build_then_query_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let bin_path = dir.path().join("wiki.bin");
    let map_path = dir.path().join("wiki.map");

    let records: Vec<(&str, Vec<&str>)> = vec![
        ("Rust", vec!["Cargo", "LLVM"]),
        ("Cargo", vec!["Rust"]),
        ("LLVM", vec![]),
        ("Orphan", vec![]),
    ];

    let mut writer = GraphWriter::create(&bin_path, &map_path, true).unwrap();
    for (src, dsts) in &records {
        writer.ingest(src, dsts.iter().copied()).unwrap();
    }
    writer.finalize().unwrap();
    writer.close().unwrap();

    let reader = GraphReader::open(&bin_path, &map_path).unwrap();
    assert_eq!(reader.node_count(), 4);

    let rust = reader.id_of("Rust").unwrap();
    let cargo = reader.id_of("Cargo").unwrap();
    let llvm = reader.id_of("LLVM").unwrap();
    let orphan = reader.id_of("Orphan").unwrap();

    let mut rust_neighbors: Vec<&str> = reader
        .neighbors(rust)
        .unwrap()
        .into_iter()
        .map(|id| reader.title_of(id).unwrap())
        .collect();
    rust_neighbors.sort_unstable();
    assert_eq!(rust_neighbors, vec!["Cargo", "LLVM"]);

    assert_eq!(reader.neighbors(cargo).unwrap(), vec![rust]);
    assert_eq!(reader.neighbors(llvm).unwrap(), Vec::<u64>::new());
    assert_eq!(reader.neighbors(orphan).unwrap(), Vec::<u64>::new());

    // an id that was never interned at all behaves the same as a
    // known-but-edge-less one
    assert_eq!(reader.neighbors(999).unwrap(), Vec::<u64>::new());
}

#[test]
fn reopening_a_store_multiple_times_is_fine() {
    let dir = tempfile::tempdir().unwrap();
    let bin_path = dir.path().join("wiki.bin");
    let map_path = dir.path().join("wiki.map");

    let mut writer = GraphWriter::create(&bin_path, &map_path, true).unwrap();
    writer.ingest("A", ["B"]).unwrap();
    writer.finalize().unwrap();
    writer.close().unwrap();

    for _ in 0..3 {
        let reader = GraphReader::open(&bin_path, &map_path).unwrap();
        assert_eq!(reader.neighbors(0).unwrap(), vec![1]);
    }
}
