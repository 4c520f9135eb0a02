use serde::{Deserialize, Serialize};

/// Archive index meaning "payload is stored in the directory file itself"
pub const EMBEDDED_ARCHIVE_INDEX: u16 = 0x7FFF;

/// Marker written after every entry record
pub const ENTRY_TERMINATOR: u16 = 0xFFFF;

/// Placeholder the format uses for an empty directory or extension
pub const EMPTY_COMPONENT: &str = " ";

/// One file record from the directory tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Extension group the entry was listed under, as stored
    pub extension: String,

    /// Directory group the entry was listed under, as stored
    pub directory: String,

    /// Base file name without extension
    pub name: String,

    /// CRC-32 of the full file contents
    pub crc32: u32,

    /// Chunk holding the payload, or [`EMBEDDED_ARCHIVE_INDEX`]
    pub archive_index: u16,

    /// Byte offset of the payload inside its chunk
    pub entry_offset: u32,

    /// Byte length of the payload, excluding preload bytes
    pub entry_length: u32,

    /// Bytes stored inline in the directory tree
    #[serde(with = "preload_hex")]
    pub preload: Vec<u8>,
}

impl Entry {
    /// Logical path of the entry: `dir/name.ext`, omitting empty components
    #[must_use]
    pub fn path(&self) -> String {
        let mut path = String::new();
        if !is_empty_component(&self.directory) {
            path.push_str(&self.directory);
            path.push('/');
        }
        path.push_str(&self.name);
        if !is_empty_component(&self.extension) {
            path.push('.');
            path.push_str(&self.extension);
        }
        path
    }

    /// Number of preload bytes stored inline
    #[must_use]
    pub fn preload_bytes(&self) -> u16 {
        // The parser reads the count as u16, so the buffer never exceeds it
        u16::try_from(self.preload.len()).unwrap_or(u16::MAX)
    }

    /// True file size: preload bytes plus payload bytes
    #[must_use]
    pub fn file_size(&self) -> u64 {
        self.preload.len() as u64 + u64::from(self.entry_length)
    }

    /// Whether the payload lives after the tree in the directory file
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.archive_index == EMBEDDED_ARCHIVE_INDEX
    }

    /// Whether any content is stored inline in the tree
    #[must_use]
    pub fn has_preload(&self) -> bool {
        !self.preload.is_empty()
    }
}

/// Whether a stored directory/extension component denotes "nothing"
#[must_use]
pub fn is_empty_component(component: &str) -> bool {
    component.is_empty() || component == EMPTY_COMPONENT
}

mod preload_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
