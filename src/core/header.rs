use serde::{Deserialize, Serialize};

/// Magic signature at the start of every VPK directory file
pub const VPK_SIGNATURE: u32 = 0x55AA_1234;

/// Size of the fields shared by every format revision (signature, version, tree size)
pub const BASE_HEADER_LEN: usize = 12;

/// Size of the version 2 trailer following the shared fields
pub const V2_TRAILER_LEN: usize = 16;

/// Known format revisions
pub const SUPPORTED_VERSIONS: [u32; 2] = [1, 2];

/// Version-specific fields that follow the shared header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum HeaderTrailer {
    /// Version 1 carries nothing beyond the tree size
    V1,
    /// Version 2 describes the sections stored after the embedded data
    V2 {
        /// Bytes of file data stored in the directory file itself
        file_data_section_size: u32,
        /// Bytes of the per-chunk MD5 table
        archive_md5_section_size: u32,
        /// Bytes of the tree/whole-file MD5 section (always 48 when present)
        other_md5_section_size: u32,
        /// Bytes of the public key + signature block
        signature_section_size: u32,
    },
}

/// Fixed-size header at the front of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerHeader {
    pub signature: u32,
    pub version: u32,
    /// Declared byte size of the directory tree that follows the header
    pub tree_size: u32,
    pub trailer: HeaderTrailer,
}

impl ContainerHeader {
    /// Header for an empty-trailer version 1 container
    #[must_use]
    pub fn v1(tree_size: u32) -> Self {
        Self {
            signature: VPK_SIGNATURE,
            version: 1,
            tree_size,
            trailer: HeaderTrailer::V1,
        }
    }

    /// Header for a version 2 container with the given embedded data size and no hash sections
    #[must_use]
    pub fn v2(tree_size: u32, file_data_section_size: u32) -> Self {
        Self {
            signature: VPK_SIGNATURE,
            version: 2,
            tree_size,
            trailer: HeaderTrailer::V2 {
                file_data_section_size,
                archive_md5_section_size: 0,
                other_md5_section_size: 0,
                signature_section_size: 0,
            },
        }
    }

    /// Number of bytes this header occupies on disk
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        match self.trailer {
            HeaderTrailer::V1 => BASE_HEADER_LEN,
            HeaderTrailer::V2 { .. } => BASE_HEADER_LEN + V2_TRAILER_LEN,
        }
    }

    /// Offset of the first byte after the directory tree, where in-file payloads begin
    #[must_use]
    pub fn data_offset(&self) -> usize {
        self.encoded_len() + self.tree_size as usize
    }

    /// Whether the container declares a signature block (version 2 only)
    #[must_use]
    pub fn is_signed(&self) -> bool {
        matches!(
            self.trailer,
            HeaderTrailer::V2 {
                signature_section_size,
                ..
            } if signature_section_size > 0
        )
    }

    /// Serialize the header in its on-disk little-endian layout
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.signature.to_le_bytes());
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.tree_size.to_le_bytes());
        if let HeaderTrailer::V2 {
            file_data_section_size,
            archive_md5_section_size,
            other_md5_section_size,
            signature_section_size,
        } = self.trailer
        {
            out.extend_from_slice(&file_data_section_size.to_le_bytes());
            out.extend_from_slice(&archive_md5_section_size.to_le_bytes());
            out.extend_from_slice(&other_md5_section_size.to_le_bytes());
            out.extend_from_slice(&signature_section_size.to_le_bytes());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_len_per_version() {
        assert_eq!(ContainerHeader::v1(0).encoded_len(), 12);
        assert_eq!(ContainerHeader::v2(0, 0).encoded_len(), 28);
    }

    #[test]
    fn test_data_offset_follows_tree() {
        let header = ContainerHeader::v2(100, 0);
        assert_eq!(header.data_offset(), 128);
    }

    #[test]
    fn test_to_bytes_layout() {
        let bytes = ContainerHeader::v1(7).to_bytes();
        assert_eq!(bytes, [0x34, 0x12, 0xAA, 0x55, 1, 0, 0, 0, 7, 0, 0, 0]);
    }

    #[test]
    fn test_is_signed() {
        let mut header = ContainerHeader::v2(0, 0);
        assert!(!header.is_signed());
        header.trailer = HeaderTrailer::V2 {
            file_data_section_size: 0,
            archive_md5_section_size: 0,
            other_md5_section_size: 48,
            signature_section_size: 296,
        };
        assert!(header.is_signed());
        assert!(!ContainerHeader::v1(0).is_signed());
    }
}
