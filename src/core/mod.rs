//! Core data types for archive identification.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`ContainerHeader`](header::ContainerHeader): The fixed-size header of a VPK directory file
//! - [`Entry`](entry::Entry): One file record from the directory tree
//! - [`ParsedContainer`](container::ParsedContainer): Header plus entries in on-disk order
//! - [`Fingerprint`](fingerprint::Fingerprint): Identity digests derived from a container
//! - [`CandidateRecord`](candidate::CandidateRecord): A known archive returned by a store
//! - [`ArchiveId`](types::ArchiveId), [`MatchType`](types::MatchType): Result classification types
//!
//! ## Logical paths
//!
//! The directory tree groups entries by extension, then by directory. An
//! empty group is written as a single space:
//!
//! | Directory | Name | Extension | Logical path |
//! |-----------|------|-----------|--------------|
//! | `materials/props` | `crate` | `vmt` | `materials/props/crate.vmt` |
//! | ` ` | `addoninfo` | `txt` | `addoninfo.txt` |
//! | `scripts` | `LICENSE` | ` ` | `scripts/LICENSE` |

pub mod candidate;
pub mod container;
pub mod entry;
pub mod fingerprint;
pub mod header;
pub mod types;
