use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::container::ParsedContainer;
use crate::core::entry::{Entry, ENTRY_TERMINATOR};
use crate::core::header::{ContainerHeader, HeaderTrailer, SUPPORTED_VERSIONS, VPK_SIGNATURE};
use crate::utils::validation::check_entry_limit;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    #[error("Unsupported container version: {0}")]
    UnsupportedVersion(u32),
}

/// Parse a VPK directory file from disk
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or any error
/// [`parse_bytes`] reports for its contents.
pub fn parse_file(path: &Path) -> Result<ParsedContainer, ParseError> {
    let bytes = std::fs::read(path)?;
    let container = parse_bytes(&bytes)?;
    Ok(container.with_source(path.display().to_string()))
}

/// Parse a VPK directory from an in-memory buffer
///
/// # Errors
///
/// Returns `ParseError::MalformedContainer` for a bad signature, a truncated
/// field, or a tree whose consumed length differs from the declared size, and
/// `ParseError::UnsupportedVersion` for an unknown format revision.
pub fn parse_bytes(bytes: &[u8]) -> Result<ParsedContainer, ParseError> {
    let header = parse_header(bytes)?;

    let tree_start = header.encoded_len();
    let tree_end = tree_start
        .checked_add(header.tree_size as usize)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| {
            ParseError::MalformedContainer(format!(
                "declared tree size {} exceeds input length {}",
                header.tree_size,
                bytes.len()
            ))
        })?;

    // The walk is bounded by the declared tree region so it can never read payload bytes
    let mut reader = Reader::new(&bytes[tree_start..tree_end]);
    let entries = read_tree(&mut reader)?;

    let tree_length = reader.position();
    if tree_length != header.tree_size as usize {
        return Err(ParseError::MalformedContainer(format!(
            "tree consumed {tree_length} bytes but header declares {}",
            header.tree_size
        )));
    }

    debug!(
        version = header.version,
        tree_size = header.tree_size,
        entries = entries.len(),
        "Parsed container"
    );

    Ok(ParsedContainer {
        source: None,
        header,
        entries,
        tree_length,
    })
}

/// Decode and validate the fixed-size header
///
/// # Errors
///
/// Returns `ParseError::MalformedContainer` if the input is too short or the
/// signature is wrong, and `ParseError::UnsupportedVersion` for an unknown
/// version.
pub fn parse_header(bytes: &[u8]) -> Result<ContainerHeader, ParseError> {
    let mut reader = Reader::new(bytes);

    let signature = reader.u32()?;
    if signature != VPK_SIGNATURE {
        return Err(ParseError::MalformedContainer(format!(
            "bad signature {signature:#010x}, expected {VPK_SIGNATURE:#010x}"
        )));
    }

    let version = reader.u32()?;
    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(ParseError::UnsupportedVersion(version));
    }

    let tree_size = reader.u32()?;
    let trailer = if version == 2 {
        HeaderTrailer::V2 {
            file_data_section_size: reader.u32()?,
            archive_md5_section_size: reader.u32()?,
            other_md5_section_size: reader.u32()?,
            signature_section_size: reader.u32()?,
        }
    } else {
        HeaderTrailer::V1
    };

    Ok(ContainerHeader {
        signature,
        version,
        tree_size,
        trailer,
    })
}

/// Walk extension -> directory -> file groups until the root terminator.
///
/// Every group must hold at least one file, and a group may not repeat the
/// extension or directory of the group right before it. Trees of that shape
/// have a single canonical encoding, which [`super::writer::write_tree`]
/// reproduces.
fn read_tree(reader: &mut Reader<'_>) -> Result<Vec<Entry>, ParseError> {
    let mut entries = Vec::new();
    let mut previous_extension: Option<String> = None;

    loop {
        let extension = reader.cstring()?;
        if extension.is_empty() {
            break;
        }
        if previous_extension.as_deref() == Some(extension.as_str()) {
            return Err(ParseError::MalformedContainer(format!(
                "extension '{extension}' is split across adjacent groups"
            )));
        }

        let mut previous_directory: Option<String> = None;
        loop {
            let directory = reader.cstring()?;
            if directory.is_empty() {
                break;
            }
            if previous_directory.as_deref() == Some(directory.as_str()) {
                return Err(ParseError::MalformedContainer(format!(
                    "directory '{directory}' is split across adjacent groups under '{extension}'"
                )));
            }

            let group_start = entries.len();
            loop {
                let name = reader.cstring()?;
                if name.is_empty() {
                    break;
                }
                if let Some(msg) = check_entry_limit(entries.len()) {
                    return Err(ParseError::MalformedContainer(msg));
                }
                entries.push(read_entry(reader, &extension, &directory, name)?);
            }
            if entries.len() == group_start {
                return Err(ParseError::MalformedContainer(format!(
                    "directory '{directory}' under '{extension}' has no files"
                )));
            }
            previous_directory = Some(directory);
        }
        if previous_directory.is_none() {
            return Err(ParseError::MalformedContainer(format!(
                "extension '{extension}' has no directories"
            )));
        }
        previous_extension = Some(extension);
    }

    Ok(entries)
}

fn read_entry(
    reader: &mut Reader<'_>,
    extension: &str,
    directory: &str,
    name: String,
) -> Result<Entry, ParseError> {
    let crc32 = reader.u32()?;
    let preload_bytes = reader.u16()?;
    let archive_index = reader.u16()?;
    let entry_offset = reader.u32()?;
    let entry_length = reader.u32()?;

    let terminator = reader.u16()?;
    if terminator != ENTRY_TERMINATOR {
        return Err(ParseError::MalformedContainer(format!(
            "entry '{name}' has terminator {terminator:#06x}, expected {ENTRY_TERMINATOR:#06x}"
        )));
    }

    let preload = reader.take(usize::from(preload_bytes))?.to_vec();

    Ok(Entry {
        extension: extension.to_string(),
        directory: directory.to_string(),
        name,
        crc32,
        archive_index,
        entry_offset,
        entry_length,
        preload,
    })
}

/// Conventional path of an external chunk next to a `*_dir.vpk` file.
///
/// `pak01_dir.vpk` with index 3 maps to `pak01_003.vpk`. Returns `None` when
/// the directory file does not follow the `_dir` naming scheme.
#[must_use]
pub fn chunk_path(dir_path: &Path, index: u16) -> Option<PathBuf> {
    let stem = dir_path.file_stem()?.to_str()?;
    let base = stem.strip_suffix("_dir")?;
    let extension = dir_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("vpk");
    Some(dir_path.with_file_name(format!("{base}_{index:03}.{extension}")))
}

/// Bounds-checked little-endian cursor over a byte slice
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ParseError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                ParseError::MalformedContainer(format!(
                    "truncated: needed {len} bytes at offset {}, {} available",
                    self.pos,
                    self.bytes.len().saturating_sub(self.pos)
                ))
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u16(&mut self) -> Result<u16, ParseError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, ParseError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// NUL-terminated UTF-8 string; the terminator is consumed but not returned
    fn cstring(&mut self) -> Result<String, ParseError> {
        let rest = &self.bytes[self.pos..];
        let len = rest.iter().position(|&b| b == 0).ok_or_else(|| {
            ParseError::MalformedContainer(format!(
                "unterminated string at offset {}",
                self.pos
            ))
        })?;
        let raw = self.take(len)?;
        self.take(1)?;
        String::from_utf8(raw.to_vec()).map_err(|_| {
            ParseError::MalformedContainer(format!(
                "invalid UTF-8 in string ending at offset {}",
                self.pos
            ))
        })
    }
}
