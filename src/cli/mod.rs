//! Command-line interface for vpk-solver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **inspect**: Show the header and directory tree of an archive
//! - **fingerprint**: Compute the identity digests of an archive
//! - **identify**: Match an archive against a catalog of known archives
//! - **catalog**: Add archives to, list, or show entries of a catalog
//!
//! ## Usage
//!
//! ```text
//! # Look inside an archive
//! vpk-solver inspect pak01_dir.vpk --entries
//!
//! # Fingerprint, including the partial-similarity digest
//! vpk-solver fingerprint pak01_dir.vpk --partial
//!
//! # Identify against a catalog, JSON output for scripting
//! vpk-solver identify pak01_dir.vpk --catalog known_mods.json --format json
//!
//! # Record an archive in a catalog
//! vpk-solver catalog add pak01_dir.vpk --catalog known_mods.json --id workshop-123456
//! ```

use clap::{Parser, Subcommand};

use crate::fingerprint::partial::{DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE};
use crate::fingerprint::FingerprintOptions;

pub mod catalog;
pub mod fingerprint;
pub mod identify;
pub mod inspect;

#[derive(Parser)]
#[command(name = "vpk-solver")]
#[command(version)]
#[command(about = "Identify game-mod VPK archives by content")]
#[command(
    long_about = "vpk-solver recognises game-mod archives regardless of file name or packing order.\n\nIt parses the archive's directory tree, derives content fingerprints, and looks them up in a catalog of known archives:\n- Exact byte-for-byte matches\n- Repacked archives with the same files in a different order\n- Structurally identical archives\n- Near-duplicates that share file contents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the header and entries of an archive
    Inspect(inspect::InspectArgs),

    /// Compute the fingerprint of an archive
    Fingerprint(fingerprint::FingerprintArgs),

    /// Identify an archive against a catalog
    Identify(identify::IdentifyArgs),

    /// Manage the archive catalog
    Catalog(catalog::CatalogArgs),
}

/// Digest selection shared by every command that fingerprints
#[derive(clap::Args, Clone, Debug)]
pub struct DigestArgs {
    /// Skip the SHA-256 digest of the whole file
    #[arg(long)]
    pub no_exact: bool,

    /// Also compute the partial-similarity digest
    #[arg(long)]
    pub partial: bool,

    /// Block size in bytes for the partial-similarity digest (at most 64 MiB)
    #[arg(
        long,
        default_value_t = DEFAULT_BLOCK_SIZE as u64,
        value_parser = clap::value_parser!(u64).range(1..=MAX_BLOCK_SIZE as u64)
    )]
    pub block_size: u64,
}

impl DigestArgs {
    #[must_use]
    pub fn options(&self) -> FingerprintOptions {
        FingerprintOptions {
            include_exact_digest: !self.no_exact,
            include_partial_digest: self.partial,
            block_size: usize::try_from(self.block_size).unwrap_or(DEFAULT_BLOCK_SIZE),
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
