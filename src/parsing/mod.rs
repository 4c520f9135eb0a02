//! Parser for VPK directory files.
//!
//! This module provides:
//!
//! - [`vpk`]: Decoding of the header and directory tree into a
//!   [`ParsedContainer`](crate::core::container::ParsedContainer)
//! - [`writer`]: Serialization of trees and whole containers
//!
//! ## Example
//!
//! ```rust,no_run
//! use vpk_solver::parsing::vpk::{parse_bytes, parse_file};
//! use std::path::Path;
//!
//! // Parse from a file on disk
//! let container = parse_file(Path::new("pak01_dir.vpk")).unwrap();
//!
//! // Or from bytes already in memory
//! let bytes = std::fs::read("pak01_dir.vpk").unwrap();
//! let container = parse_bytes(&bytes).unwrap();
//! ```
//!
//! ## Layout
//!
//! All integers are little-endian.
//!
//! | Field | Type | Versions |
//! |-------|------|----------|
//! | Signature (`0x55AA1234`) | u32 | 1, 2 |
//! | Version | u32 | 1, 2 |
//! | Tree size | u32 | 1, 2 |
//! | File data section size | u32 | 2 |
//! | Archive MD5 section size | u32 | 2 |
//! | Other MD5 section size | u32 | 2 |
//! | Signature section size | u32 | 2 |
//!
//! The tree follows: extension strings, each followed by directory strings,
//! each followed by file records, every level closed by an empty string.
//! A file record is its name, CRC-32 (u32), preload count (u16), archive
//! index (u16, `0x7FFF` = this file), offset (u32), length (u32), a `0xFFFF`
//! terminator, and then the preload bytes.

pub mod vpk;
pub mod writer;
