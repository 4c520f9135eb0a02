use std::path::PathBuf;

use clap::Args;

use crate::analysis::{analyse_file, Analysis, AnalysisError};
use crate::catalog::store::ArchiveCatalog;
use crate::cli::{DigestArgs, OutputFormat};
use crate::core::candidate::CandidateRecord;
use crate::fingerprint::FingerprintEngine;
use crate::matching::engine::{ArchiveMatch, MatchOutcome, MatchingConfig, MatchingEngine};
use crate::matching::scoring::ScoringWeights;

/// Exit status for input that is not a valid archive
pub const EXIT_INVALID_INPUT: i32 = 2;

#[derive(Args)]
pub struct IdentifyArgs {
    /// Archive to identify
    #[arg(required = true)]
    pub input: PathBuf,

    /// Path to catalog file (JSON, optionally .gz)
    #[arg(long, required = true)]
    pub catalog: PathBuf,

    #[command(flatten)]
    pub digests: DigestArgs,

    /// Number of alternatives to show
    #[arg(short = 'n', long, default_value = "5")]
    pub max_alternatives: usize,
}

/// Execute identify subcommand
///
/// Invalid archives are reported and the process exits with
/// [`EXIT_INVALID_INPUT`]; an unknown archive is not an error.
///
/// # Errors
///
/// Returns an error if the catalog or input cannot be read, or a store lookup fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: IdentifyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = ArchiveCatalog::load_from_file(&args.catalog)?;

    if verbose {
        eprintln!("Loaded catalog with {} archives", catalog.len());
    }

    if catalog.is_empty() {
        eprintln!("Warning: Catalog is empty, no archives to match against.");
    }

    let fingerprinter = FingerprintEngine::new(args.digests.options());
    let config = MatchingConfig {
        scoring_weights: ScoringWeights::default(),
    };
    let matcher = MatchingEngine::with_config(&catalog, config);

    let analysis = match analyse_file(&args.input, &fingerprinter, &matcher) {
        Ok(analysis) => analysis,
        Err(err) if err.is_invalid_input() => {
            eprintln!("Invalid archive: {err}");
            std::process::exit(EXIT_INVALID_INPUT);
        }
        Err(AnalysisError::Fingerprint(err)) => return Err(err.into()),
        Err(AnalysisError::Store(err)) => {
            return Err(anyhow::Error::new(err).context("Catalog lookup failed"))
        }
    };

    if verbose {
        eprintln!(
            "Fingerprinted {} entries (signature {})",
            analysis.fingerprint.entry_count, analysis.fingerprint.content_signature
        );
    }

    match format {
        OutputFormat::Text => print_text_result(&analysis, args.max_alternatives),
        OutputFormat::Json => print_json_result(&analysis)?,
        OutputFormat::Tsv => print_tsv_result(&analysis, args.max_alternatives),
    }

    Ok(())
}

fn print_text_result(analysis: &Analysis, max_alternatives: usize) {
    let m = match &analysis.outcome {
        MatchOutcome::NoMatch => {
            println!("No matching archive found.");
            return;
        }
        MatchOutcome::Matched(m) => m,
    };

    println!("Match: {} [{}]", m.candidate.label(), m.candidate.id);
    println!("Match type: {}", m.match_type);
    println!("Certainty: {}%", m.certainty);
    if let Some(score) = &m.score {
        println!(
            "Score: {} (version {}, entry count diff {}, chunks {}, inline {})",
            score.total,
            match_mark(score.format_version_match),
            score.entry_count_difference,
            match_mark(score.multiple_chunks_match),
            match_mark(score.inline_data_match),
        );
    }

    if !m.alternatives.is_empty() {
        println!();
        println!("Alternatives ({}):", m.alternatives.len());
        for alt in m.alternatives.iter().take(max_alternatives) {
            print_alternative(alt);
        }
        if m.alternatives.len() > max_alternatives {
            println!("  ... and {} more", m.alternatives.len() - max_alternatives);
        }
    }
}

fn print_alternative(alt: &CandidateRecord) {
    println!(
        "  {} [{}] ({} entries, {} bytes)",
        alt.label(),
        alt.id,
        alt.fingerprint.entry_count,
        alt.fingerprint.file_size
    );
}

fn match_mark(matched: bool) -> &'static str {
    if matched {
        "match"
    } else {
        "differs"
    }
}

fn print_json_result(analysis: &Analysis) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "source": analysis.container.source,
        "fingerprint": analysis.fingerprint,
        "result": analysis.outcome,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_result(analysis: &Analysis, max_alternatives: usize) {
    println!("rank\tid\tdisplay_name\tmatch_type\tcertainty\tscore");
    if let MatchOutcome::Matched(m) = &analysis.outcome {
        print_tsv_row(1, &m.candidate, m);
        for (i, alt) in m.alternatives.iter().take(max_alternatives).enumerate() {
            print_tsv_row(i + 2, alt, m);
        }
    }
}

fn print_tsv_row(rank: usize, record: &CandidateRecord, m: &ArchiveMatch) {
    let score = if rank == 1 {
        m.score.as_ref().map_or(String::new(), |s| s.total.to_string())
    } else {
        String::new()
    };
    println!(
        "{rank}\t{}\t{}\t{}\t{}\t{score}",
        record.id,
        record.display_name.as_deref().unwrap_or(""),
        m.match_type,
        m.certainty
    );
}
