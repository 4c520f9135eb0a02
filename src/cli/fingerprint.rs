use std::path::PathBuf;

use clap::Args;

use crate::cli::{DigestArgs, OutputFormat};
use crate::core::fingerprint::Fingerprint;
use crate::fingerprint::FingerprintEngine;

#[derive(Args)]
pub struct FingerprintArgs {
    /// Archive to fingerprint
    #[arg(required = true)]
    pub input: PathBuf,

    #[command(flatten)]
    pub digests: DigestArgs,
}

/// Execute fingerprint subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a valid archive.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FingerprintArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let engine = FingerprintEngine::new(args.digests.options());
    let (container, fingerprint) = engine.fingerprint_file(&args.input)?;

    if verbose {
        eprintln!(
            "Fingerprinted {} entries ({} bytes)",
            container.entry_count(),
            fingerprint.file_size
        );
    }

    match format {
        OutputFormat::Text => print_text(&fingerprint),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&fingerprint)?),
        OutputFormat::Tsv => print_tsv(&fingerprint),
    }

    Ok(())
}

/// Print fingerprint fields as aligned `label: value` lines
pub fn print_text(fp: &Fingerprint) {
    println!("Exact digest:       {}", fp.exact_digest.as_deref().unwrap_or("-"));
    println!("Content signature:  {}", fp.content_signature);
    println!("Fast hash:          {}", fp.fast_hash);
    println!("File size:          {}", fp.file_size);
    println!("Entries:            {}", fp.entry_count);
    println!("Format version:     {}", fp.format_version);
    println!("Multiple chunks:    {}", fp.has_multiple_chunks);
    println!("Inline data:        {}", fp.has_inline_data);
    println!("Partial digest:     {}", fp.partial_digest.as_deref().unwrap_or("-"));
}

fn print_tsv(fp: &Fingerprint) {
    println!("exact_digest\tcontent_signature\tfast_hash\tfile_size\tentry_count\tformat_version\thas_multiple_chunks\thas_inline_data\tpartial_digest");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        fp.exact_digest.as_deref().unwrap_or(""),
        fp.content_signature,
        fp.fast_hash,
        fp.file_size,
        fp.entry_count,
        fp.format_version,
        fp.has_multiple_chunks,
        fp.has_inline_data,
        fp.partial_digest.as_deref().unwrap_or("")
    );
}
