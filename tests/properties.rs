//! Property tests for parsing and fingerprinting

use std::collections::BTreeMap;

use proptest::prelude::*;
use vpk_solver::fingerprint::fast_hash::compute_fast_hash;
use vpk_solver::fingerprint::signature::compute_content_signature;
use vpk_solver::parsing::vpk::parse_bytes;
use vpk_solver::core::header::ContainerHeader;
use vpk_solver::parsing::writer::{write_tree, ContainerBuilder};
use vpk_solver::{FingerprintEngine, FingerprintOptions};

type Files = Vec<(String, Vec<u8>)>;

/// Distinct `dir/name.txt` paths with small payloads
fn files(max: usize) -> impl Strategy<Value = Files> {
    prop::collection::btree_map("[a-z]{1,8}", prop::collection::vec(any::<u8>(), 0..64), 1..max)
        .prop_map(|m: BTreeMap<String, Vec<u8>>| {
            m.into_iter()
                .map(|(name, data)| (format!("materials/{name}.vmt"), data))
                .collect()
        })
}

fn build(version: u32, files: &Files) -> Vec<u8> {
    files
        .iter()
        .fold(ContainerBuilder::new(version), |b, (path, data)| {
            b.add_file(path, data)
        })
        .build()
}

/// (name, crc, archive index, offset, length, preload)
type FileRecord = (String, u32, u16, u32, u32, Vec<u8>);
type Tree = Vec<(String, Vec<(String, Vec<FileRecord>)>)>;

fn file_record() -> impl Strategy<Value = FileRecord> {
    (
        "[a-z]{1,6}",
        any::<u32>(),
        any::<u16>(),
        any::<u32>(),
        any::<u32>(),
        prop::collection::vec(any::<u8>(), 0..8),
    )
}

/// Extension and directory groups as another tool might lay them out: names
/// may come back later in the tree, but never in the adjacent group
fn grouped_tree() -> impl Strategy<Value = Tree> {
    let directory = prop::sample::select(vec![" ", "materials", "models/props", "sound"]);
    let dir_group = (
        directory.prop_map(|s: &str| s.to_string()),
        prop::collection::vec(file_record(), 1..4),
    );
    let extension = prop::sample::select(vec!["txt", "vmt", "mdl"]);
    let ext_group = (
        extension.prop_map(|s: &str| s.to_string()),
        prop::collection::vec(dir_group, 1..4).prop_map(|mut dirs| {
            dirs.dedup_by(|a, b| a.0 == b.0);
            dirs
        }),
    );
    prop::collection::vec(ext_group, 0..5).prop_map(|mut exts| {
        exts.dedup_by(|a, b| a.0 == b.0);
        exts
    })
}

fn encode_tree(tree: &Tree) -> Vec<u8> {
    let mut out = Vec::new();
    for (extension, dirs) in tree {
        out.extend_from_slice(extension.as_bytes());
        out.push(0);
        for (directory, files) in dirs {
            out.extend_from_slice(directory.as_bytes());
            out.push(0);
            for (name, crc, index, offset, length, preload) in files {
                out.extend_from_slice(name.as_bytes());
                out.push(0);
                out.extend_from_slice(&crc.to_le_bytes());
                out.extend_from_slice(&u16::try_from(preload.len()).unwrap().to_le_bytes());
                out.extend_from_slice(&index.to_le_bytes());
                out.extend_from_slice(&offset.to_le_bytes());
                out.extend_from_slice(&length.to_le_bytes());
                out.extend_from_slice(&0xFFFFu16.to_le_bytes());
                out.extend_from_slice(preload);
            }
            out.push(0);
        }
        out.push(0);
    }
    out.push(0);
    out
}

proptest! {
    #[test]
    fn prop_grouped_tree_round_trips(tree in grouped_tree()) {
        let encoded = encode_tree(&tree);
        let mut raw = ContainerHeader::v1(u32::try_from(encoded.len()).unwrap()).to_bytes();
        raw.extend_from_slice(&encoded);

        let parsed = parse_bytes(&raw).unwrap();
        let file_count: usize = tree
            .iter()
            .flat_map(|(_, dirs)| dirs.iter().map(|(_, files)| files.len()))
            .sum();
        prop_assert_eq!(parsed.entry_count(), file_count);
        prop_assert_eq!(write_tree(&parsed.entries), encoded);
    }

    #[test]
    fn prop_content_signature_ignores_entry_order(
        (original, shuffled) in files(12).prop_flat_map(|f| (Just(f.clone()), Just(f).prop_shuffle()))
    ) {
        let a = parse_bytes(&build(2, &original)).unwrap();
        let b = parse_bytes(&build(2, &shuffled)).unwrap();
        prop_assert_eq!(
            compute_content_signature(&a.entries),
            compute_content_signature(&b.entries)
        );
    }

    #[test]
    fn prop_fast_hash_sees_entry_order(original in files(12)) {
        prop_assume!(original.len() >= 2);
        let mut reversed = original.clone();
        reversed.reverse();

        let a = parse_bytes(&build(2, &original)).unwrap();
        let b = parse_bytes(&build(2, &reversed)).unwrap();
        prop_assert_ne!(compute_fast_hash(&a.entries), compute_fast_hash(&b.entries));
    }

    #[test]
    fn prop_written_tree_parses_back(files in files(16), version in 1u32..=2) {
        let parsed = parse_bytes(&build(version, &files)).unwrap();

        prop_assert_eq!(parsed.header.version, version);
        prop_assert_eq!(parsed.entry_count(), files.len());
        for (entry, (path, data)) in parsed.entries.iter().zip(&files) {
            prop_assert_eq!(&entry.path(), path);
            prop_assert_eq!(entry.file_size(), data.len() as u64);
            prop_assert_eq!(entry.crc32, crc32fast::hash(data));
        }
    }

    #[test]
    fn prop_fingerprint_reflects_container(files in files(16)) {
        let raw = build(2, &files);
        let (container, fp) = FingerprintEngine::new(FingerprintOptions::full())
            .fingerprint_bytes(&raw)
            .unwrap();

        prop_assert_eq!(fp.entry_count, container.entries.len());
        prop_assert_eq!(fp.file_size, raw.len() as u64);
        prop_assert_eq!(fp.format_version, 2);
        prop_assert!(!fp.has_multiple_chunks);
        prop_assert_eq!(fp.content_signature.len(), 32);
        prop_assert_eq!(fp.fast_hash.len(), 16);
    }

    #[test]
    fn prop_parser_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = parse_bytes(&bytes);
    }

    #[test]
    fn prop_truncated_archive_is_rejected(files in files(8), cut in 1usize..64) {
        let raw = build(2, &files);
        let parsed = parse_bytes(&raw).unwrap();
        let tree_end = parsed.header.encoded_len() + parsed.tree_length;
        prop_assume!(cut < tree_end);
        prop_assert!(parse_bytes(&raw[..tree_end - cut]).is_err());
    }
}
