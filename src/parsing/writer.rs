//! Serialization of directory trees and whole containers.
//!
//! [`write_tree`] is the inverse of the tree walk in [`super::vpk`]: entries
//! that share an extension and directory with their predecessor are emitted
//! in the same group. The parser rejects empty groups and adjacent groups
//! that repeat a name, so every tree it accepts is reproduced byte-for-byte.

use crate::core::entry::{Entry, EMBEDDED_ARCHIVE_INDEX, EMPTY_COMPONENT, ENTRY_TERMINATOR};
use crate::core::header::ContainerHeader;

/// Serialize entries into directory tree bytes, including the root terminator
#[must_use]
pub fn write_tree(entries: &[Entry]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < entries.len() {
        let extension = &entries[i].extension;
        push_cstring(&mut out, extension);

        while i < entries.len() && entries[i].extension == *extension {
            let directory = &entries[i].directory;
            push_cstring(&mut out, directory);

            while i < entries.len()
                && entries[i].extension == *extension
                && entries[i].directory == *directory
            {
                write_entry(&mut out, &entries[i]);
                i += 1;
            }
            out.push(0);
        }
        out.push(0);
    }
    out.push(0);

    out
}

fn write_entry(out: &mut Vec<u8>, entry: &Entry) {
    push_cstring(out, &entry.name);
    out.extend_from_slice(&entry.crc32.to_le_bytes());
    out.extend_from_slice(&entry.preload_bytes().to_le_bytes());
    out.extend_from_slice(&entry.archive_index.to_le_bytes());
    out.extend_from_slice(&entry.entry_offset.to_le_bytes());
    out.extend_from_slice(&entry.entry_length.to_le_bytes());
    out.extend_from_slice(&ENTRY_TERMINATOR.to_le_bytes());
    out.extend_from_slice(&entry.preload);
}

fn push_cstring(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}

/// Split a logical path into (directory, name, extension) as stored in the tree
#[must_use]
pub fn split_path(path: &str) -> (String, String, String) {
    let (directory, file) = match path.rsplit_once('/') {
        Some((dir, file)) if !dir.is_empty() => (dir.to_string(), file),
        Some((_, file)) => (EMPTY_COMPONENT.to_string(), file),
        None => (EMPTY_COMPONENT.to_string(), path),
    };
    let (name, extension) = match file.rsplit_once('.') {
        Some((name, ext)) if !name.is_empty() && !ext.is_empty() => {
            (name.to_string(), ext.to_string())
        }
        _ => (file.to_string(), EMPTY_COMPONENT.to_string()),
    };
    (directory, name, extension)
}

struct PendingFile {
    path: String,
    data: Vec<u8>,
    preload_len: usize,
}

enum Pending {
    Embedded(PendingFile),
    External(Entry),
}

/// Builds a complete single-file container in memory.
///
/// Files are written in the order they are added. Embedded payloads are
/// stored after the tree with offsets assigned in the same order.
///
/// ```
/// use vpk_solver::parsing::writer::ContainerBuilder;
/// use vpk_solver::parsing::vpk::parse_bytes;
///
/// let bytes = ContainerBuilder::new(2)
///     .add_file("scripts/init.lua", b"print('hi')")
///     .build();
/// let parsed = parse_bytes(&bytes).unwrap();
/// assert_eq!(parsed.entries[0].path(), "scripts/init.lua");
/// ```
pub struct ContainerBuilder {
    version: u32,
    files: Vec<Pending>,
}

impl ContainerBuilder {
    /// Start a container of the given format version (1 or 2)
    #[must_use]
    pub fn new(version: u32) -> Self {
        Self {
            version,
            files: Vec::new(),
        }
    }

    /// Add a file whose payload is stored in the directory file
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_preload(path, data, 0)
    }

    /// Add a file with its first `preload_len` bytes stored inline in the tree
    #[must_use]
    pub fn add_file_with_preload(mut self, path: &str, data: &[u8], preload_len: usize) -> Self {
        let preload_len = preload_len.min(data.len()).min(usize::from(u16::MAX));
        self.files.push(Pending::Embedded(PendingFile {
            path: path.to_string(),
            data: data.to_vec(),
            preload_len,
        }));
        self
    }

    /// Add a file whose payload lives in an external chunk that is not part of this buffer
    #[must_use]
    pub fn add_chunk_file(
        mut self,
        path: &str,
        crc32: u32,
        archive_index: u16,
        entry_offset: u32,
        entry_length: u32,
    ) -> Self {
        let (directory, name, extension) = split_path(path);
        self.files.push(Pending::External(Entry {
            extension,
            directory,
            name,
            crc32,
            archive_index,
            entry_offset,
            entry_length,
            preload: Vec::new(),
        }));
        self
    }

    /// Assemble header, tree and embedded data section
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let mut entries = Vec::with_capacity(self.files.len());
        let mut data = Vec::new();

        for pending in self.files {
            match pending {
                Pending::Embedded(file) => {
                    let (directory, name, extension) = split_path(&file.path);
                    let (preload, payload) = file.data.split_at(file.preload_len);
                    entries.push(Entry {
                        extension,
                        directory,
                        name,
                        crc32: crc32fast::hash(&file.data),
                        archive_index: EMBEDDED_ARCHIVE_INDEX,
                        entry_offset: to_u32(data.len()),
                        entry_length: to_u32(payload.len()),
                        preload: preload.to_vec(),
                    });
                    data.extend_from_slice(payload);
                }
                Pending::External(entry) => entries.push(entry),
            }
        }

        let tree = write_tree(&entries);
        let header = if self.version == 1 {
            ContainerHeader::v1(to_u32(tree.len()))
        } else {
            ContainerHeader {
                version: self.version,
                ..ContainerHeader::v2(to_u32(tree.len()), to_u32(data.len()))
            }
        };

        let mut out = header.to_bytes();
        out.extend_from_slice(&tree);
        out.extend_from_slice(&data);
        out
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
