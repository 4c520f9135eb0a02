use std::path::{Path, PathBuf};

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::container::ParsedContainer;
use crate::core::entry::Entry;
use crate::core::header::HeaderTrailer;
use crate::parsing::vpk::{chunk_path, parse_bytes};

#[derive(Args)]
pub struct InspectArgs {
    /// Archive to inspect (the `_dir.vpk` file for multi-chunk archives)
    #[arg(required = true)]
    pub input: PathBuf,

    /// List every entry
    #[arg(long)]
    pub entries: bool,

    /// Check stored CRC-32 values of entries stored in this file
    #[arg(long)]
    pub verify_crc: bool,
}

/// Per-entry CRC verification result
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
enum CrcStatus {
    Ok,
    Mismatch,
    /// Payload lives in another chunk
    Unavailable,
}

/// Execute inspect subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a valid archive.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: InspectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let raw = std::fs::read(&args.input)?;
    let container = parse_bytes(&raw)?.with_source(args.input.display().to_string());

    if verbose {
        eprintln!(
            "Parsed {} entries from {} ({} byte tree)",
            container.entry_count(),
            args.input.display(),
            container.tree_length
        );
    }

    let crc = if args.verify_crc {
        Some(
            container
                .entries
                .iter()
                .map(|e| crc_status(&container, &raw, e))
                .collect::<anyhow::Result<Vec<_>>>()?,
        )
    } else {
        None
    };

    match format {
        OutputFormat::Text => print_text(&args, &container, crc.as_deref()),
        OutputFormat::Json => print_json(&args, &container, crc.as_deref())?,
        OutputFormat::Tsv => print_tsv(&container, crc.as_deref()),
    }

    Ok(())
}

fn crc_status(container: &ParsedContainer, raw: &[u8], entry: &Entry) -> anyhow::Result<CrcStatus> {
    Ok(match container.verify_entry_crc(raw, entry)? {
        Some(true) => CrcStatus::Ok,
        Some(false) => CrcStatus::Mismatch,
        None => CrcStatus::Unavailable,
    })
}

/// Chunk ids whose conventional file is missing next to the directory file
fn missing_chunks(input: &Path, container: &ParsedContainer) -> Vec<u16> {
    container
        .chunk_ids()
        .into_iter()
        .filter(|&id| chunk_path(input, id).is_some_and(|p| !p.exists()))
        .collect()
}

fn print_text(args: &InspectArgs, container: &ParsedContainer, crc: Option<&[CrcStatus]>) {
    let header = &container.header;
    println!("Archive: {}", args.input.display());
    println!("Version: {}", header.version);
    println!("Tree size: {} bytes", header.tree_size);
    if let HeaderTrailer::V2 {
        file_data_section_size,
        archive_md5_section_size,
        other_md5_section_size,
        signature_section_size,
    } = header.trailer
    {
        println!("Embedded data: {file_data_section_size} bytes");
        println!(
            "Hash sections: {archive_md5_section_size} + {other_md5_section_size} bytes"
        );
        println!("Signature block: {signature_section_size} bytes");
    }
    println!("Entries: {}", container.entry_count());
    println!("Total content: {} bytes", container.total_content_size());
    println!("Inline data: {}", yes_no(container.has_inline_data()));

    let chunks = container.chunk_ids();
    if !chunks.is_empty() {
        let ids: Vec<String> = chunks.iter().map(|id| format!("{id:03}")).collect();
        println!("External chunks: {}", ids.join(", "));
        let missing = missing_chunks(&args.input, container);
        if !missing.is_empty() {
            let ids: Vec<String> = missing.iter().map(|id| format!("{id:03}")).collect();
            println!("Missing chunk files: {}", ids.join(", "));
        }
    }

    if let Some(statuses) = crc {
        let bad = statuses.iter().filter(|s| **s == CrcStatus::Mismatch).count();
        let checked = statuses.iter().filter(|s| **s != CrcStatus::Unavailable).count();
        println!("CRC check: {checked} checked, {bad} mismatched");
    }

    if args.entries {
        println!();
        for (i, entry) in container.entries.iter().enumerate() {
            let status = crc.map_or(String::new(), |s| format!("  [{:?}]", s[i]));
            println!(
                "  {:<60} {:>10}  {:08x}  {}{status}",
                entry.path(),
                entry.file_size(),
                entry.crc32,
                location(entry)
            );
        }
    }
}

fn print_json(
    args: &InspectArgs,
    container: &ParsedContainer,
    crc: Option<&[CrcStatus]>,
) -> anyhow::Result<()> {
    let entries: Vec<serde_json::Value> = container
        .entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut json = serde_json::json!({
                "path": e.path(),
                "crc32": format!("{:08x}", e.crc32),
                "size": e.file_size(),
                "preload_bytes": e.preload_bytes(),
                "archive_index": e.archive_index,
                "entry_offset": e.entry_offset,
                "entry_length": e.entry_length,
            });
            if let Some(statuses) = crc {
                json["crc_status"] = serde_json::to_value(statuses[i]).unwrap_or_default();
            }
            json
        })
        .collect();

    let output = serde_json::json!({
        "source": container.source,
        "header": container.header,
        "tree_length": container.tree_length,
        "entry_count": container.entry_count(),
        "total_content_size": container.total_content_size(),
        "has_inline_data": container.has_inline_data(),
        "has_multiple_chunks": container.has_multiple_chunks(),
        "chunk_ids": container.chunk_ids(),
        "missing_chunks": missing_chunks(&args.input, container),
        "entries": entries,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(container: &ParsedContainer, crc: Option<&[CrcStatus]>) {
    println!("path\tsize\tcrc32\tpreload_bytes\tarchive_index\tentry_offset\tentry_length\tcrc_status");
    for (i, e) in container.entries.iter().enumerate() {
        let status = crc.map_or(String::new(), |s| format!("{:?}", s[i]).to_lowercase());
        println!(
            "{}\t{}\t{:08x}\t{}\t{}\t{}\t{}\t{status}",
            e.path(),
            e.file_size(),
            e.crc32,
            e.preload_bytes(),
            e.archive_index,
            e.entry_offset,
            e.entry_length
        );
    }
}

fn location(entry: &Entry) -> String {
    if entry.is_embedded() {
        "this file".to_string()
    } else {
        format!("chunk {:03} @ {}", entry.archive_index, entry.entry_offset)
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}
