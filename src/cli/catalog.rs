use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::store::ArchiveCatalog;
use crate::cli::{DigestArgs, OutputFormat};
use crate::core::candidate::CandidateRecord;
use crate::core::types::ArchiveId;
use crate::fingerprint::FingerprintEngine;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Fingerprint an archive and record it in a catalog
    Add {
        /// Archive to add
        #[arg(required = true)]
        input: PathBuf,

        /// Catalog file to update (created if missing)
        #[arg(long, required = true)]
        catalog: PathBuf,

        /// Unique archive ID (e.g., "workshop-123456")
        #[arg(long, required = true)]
        id: String,

        /// Display name (e.g., "HD Crates")
        #[arg(long)]
        name: Option<String>,

        /// Replace an existing record with the same ID
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        digests: DigestArgs,
    },

    /// List all archives in the catalog
    List {
        /// Path to catalog file
        #[arg(long, required = true)]
        catalog: PathBuf,
    },

    /// Show details of a specific archive
    Show {
        /// Archive ID
        #[arg(required = true)]
        id: String,

        /// Path to catalog file
        #[arg(long, required = true)]
        catalog: PathBuf,
    },
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or written, the archive is
/// invalid, or the requested ID is missing or already taken.
pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::Add {
            input,
            catalog,
            id,
            name,
            force,
            digests,
        } => {
            let existing = if catalog.exists() {
                ArchiveCatalog::load_from_file(&catalog)?
            } else {
                ArchiveCatalog::new()
            };

            let archive_id = ArchiveId::new(&id);
            if existing.contains(&archive_id) && !force {
                anyhow::bail!("Archive ID '{id}' already exists in catalog (use --force to replace)");
            }

            let engine = FingerprintEngine::new(digests.options());
            let (container, fingerprint) = engine.fingerprint_file(&input)?;

            let mut record = CandidateRecord::new(id, fingerprint);
            if let Some(name) = name {
                record = record.with_display_name(name);
            }

            // Rebuild so a replaced record drops out of every index
            let mut updated = ArchiveCatalog::new();
            for r in existing.records.into_iter().filter(|r| r.id != archive_id) {
                updated.add_record(r);
            }
            updated.add_record(record.clone());
            updated.save_to_file(&catalog)?;

            if verbose {
                eprintln!(
                    "Recorded {} entries from {}",
                    container.entry_count(),
                    input.display()
                );
            }

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                OutputFormat::Text | OutputFormat::Tsv => {
                    println!(
                        "Added {} to {} ({} archives)",
                        record.id,
                        catalog.display(),
                        updated.len()
                    );
                }
            }
        }

        CatalogCommands::List { catalog } => {
            let catalog = ArchiveCatalog::load_from_file(&catalog)?;
            list_records(&catalog, format)?;
        }

        CatalogCommands::Show { id, catalog } => {
            let catalog = ArchiveCatalog::load_from_file(&catalog)?;
            let record = catalog
                .get(&ArchiveId::new(&id))
                .ok_or_else(|| anyhow::anyhow!("Archive not found: {id}"))?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
                OutputFormat::Text | OutputFormat::Tsv => {
                    println!("ID:                 {}", record.id);
                    if let Some(name) = &record.display_name {
                        println!("Name:               {name}");
                    }
                    crate::cli::fingerprint::print_text(&record.fingerprint);
                }
            }
        }
    }

    Ok(())
}

fn list_records(catalog: &ArchiveCatalog, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{:<30} {:<40} {:>8} {:>12}", "ID", "Name", "Entries", "Bytes");
            println!("{}", "-".repeat(93));
            for r in &catalog.records {
                println!(
                    "{:<30} {:<40} {:>8} {:>12}",
                    r.id,
                    r.display_name.as_deref().unwrap_or("-"),
                    r.fingerprint.entry_count,
                    r.fingerprint.file_size
                );
            }
            println!();
            println!("Total: {} archives", catalog.len());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&catalog.records)?);
        }
        OutputFormat::Tsv => {
            println!("id\tdisplay_name\tentry_count\tfile_size\tcontent_signature");
            for r in &catalog.records {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    r.id,
                    r.display_name.as_deref().unwrap_or(""),
                    r.fingerprint.entry_count,
                    r.fingerprint.file_size,
                    r.fingerprint.content_signature
                );
            }
        }
    }
    Ok(())
}
