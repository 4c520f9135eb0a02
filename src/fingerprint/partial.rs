use crate::core::container::ParsedContainer;
use crate::core::entry::Entry;
use crate::parsing::vpk::ParseError;

/// Default block size for the partial-similarity digest
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// Largest block size accepted on the command line
pub const MAX_BLOCK_SIZE: usize = 64 * 1024 * 1024;

/// Root of a block tree plus the number of leaf blocks it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialDigest {
    pub root: blake3::Hash,
    pub block_count: usize,
}

impl PartialDigest {
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.root.to_hex().to_string()
    }
}

/// Compute the partial-similarity digest of a container.
///
/// Entries are visited sorted by (CRC, size) with parse order breaking ties.
/// Each contributes its CRC (u32 LE), size (u64 LE), preload bytes and, for
/// entries stored in the directory file, the payload. Paths never enter the
/// stream, so renamed or regrouped files still share blocks.
///
/// # Errors
///
/// Returns `ParseError::MalformedContainer` if an embedded payload lies
/// outside `raw`.
pub fn compute_partial_digest(
    container: &ParsedContainer,
    raw: &[u8],
    block_size: usize,
) -> Result<PartialDigest, ParseError> {
    let mut order: Vec<&Entry> = container.entries.iter().collect();
    order.sort_by_key(|e| (e.crc32, e.file_size()));

    let mut tree = BlockTree::new(block_size);
    for entry in order {
        tree.update(&entry.crc32.to_le_bytes());
        tree.update(&entry.file_size().to_le_bytes());
        tree.update(&entry.preload);
        if let Some(payload) = container.embedded_payload(raw, entry)? {
            tree.update(payload);
        }
    }
    Ok(tree.finish())
}

/// Incrementally cuts a byte stream into fixed-size blocks and hashes each one
pub struct BlockTree {
    block_size: usize,
    pending: Vec<u8>,
    leaves: Vec<blake3::Hash>,
}

impl BlockTree {
    #[must_use]
    pub fn new(block_size: usize) -> Self {
        let block_size = block_size.max(1);
        Self {
            block_size,
            // Grows on demand past the default, so oversized blocks cost only what is fed in
            pending: Vec::with_capacity(block_size.min(DEFAULT_BLOCK_SIZE)),
            leaves: Vec::new(),
        }
    }

    pub fn update(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            let room = self.block_size - self.pending.len();
            let (head, tail) = bytes.split_at(room.min(bytes.len()));
            self.pending.extend_from_slice(head);
            bytes = tail;
            if self.pending.len() == self.block_size {
                self.leaves.push(blake3::hash(&self.pending));
                self.pending.clear();
            }
        }
    }

    #[must_use]
    pub fn finish(mut self) -> PartialDigest {
        if !self.pending.is_empty() {
            self.leaves.push(blake3::hash(&self.pending));
        }
        PartialDigest {
            root: merkle_root(&self.leaves),
            block_count: self.leaves.len(),
        }
    }
}

/// Compute a binary Merkle root over BLAKE3 leaf hashes.
/// Duplicates the last node when a layer is odd.
#[must_use]
pub fn merkle_root(hashes: &[blake3::Hash]) -> blake3::Hash {
    if hashes.is_empty() {
        return blake3::hash(&[]);
    }
    let mut layer: Vec<[u8; 32]> = hashes.iter().map(|h| *h.as_bytes()).collect();
    while layer.len() > 1 {
        layer = layer
            .chunks(2)
            .map(|pair| {
                let left = pair[0];
                let right = pair.get(1).copied().unwrap_or(left);
                let mut cat = [0u8; 64];
                cat[..32].copy_from_slice(&left);
                cat[32..].copy_from_slice(&right);
                *blake3::hash(&cat).as_bytes()
            })
            .collect();
    }
    blake3::Hash::from(layer[0])
}
