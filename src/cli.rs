//! Command-line driver.
//!
//! The binary plays the role of the file-selection surface: it expands the
//! input patterns, filters to PDF paths, reads the bytes and hands them to
//! a [`Session`]. Everything after that is the library core.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use futures::stream::{self, StreamExt};
use serde_json::json;

use crate::candidate::CandidateFile;
use crate::config::SessionConfig;
use crate::output::{DirectoryTarget, SaveTarget, merged_file_name, split_output_path};
use crate::session::Session;

/// How many input files to read from disk at once.
const READ_CONCURRENCY: usize = 4;

#[derive(Parser)]
#[command(name = "pdfdeck")]
#[command(about = "Merge PDF files into a single document", long_about = None)]
#[command(version)]
struct Cli {
    /// Input PDF files or glob patterns, merged in the order given
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file path (defaults to a timestamped name in the current
    /// directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a JSON summary of the session instead of plain text
    #[arg(long)]
    json: bool,

    /// Verbose output - show per-file details as inspections finish
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    quiet: bool,
}

/// Run the CLI to completion.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let resolved = resolve_inputs(&cli.inputs)?;
    let (pdf_paths, skipped): (Vec<_>, Vec<_>) =
        resolved.into_iter().partition(|p| has_pdf_extension(p));

    for path in &skipped {
        eprintln!("Skipping non-PDF input: {}", path.display());
    }
    if pdf_paths.is_empty() {
        bail!("no PDF files matched the given inputs");
    }

    let candidates = read_candidates(&pdf_paths).await?;

    let mut session = Session::new(SessionConfig::default());
    let report = session.add_files(candidates);
    if report.duplicates > 0 && !cli.quiet {
        println!("Skipped {} duplicate file(s)", report.duplicates);
    }

    if !cli.quiet && !cli.json {
        println!("Inspecting {} PDF file(s)...", report.accepted);
    }
    while let Some(event) = session.next_event().await {
        if cli.quiet || cli.json {
            continue;
        }
        match (&event.error, event.applied) {
            (None, true) => println!("  ✓ {} ({} pages)", event.name, event.page_count),
            (Some(e), true) => eprintln!("  ✗ {e}"),
            (_, false) => {
                if cli.verbose {
                    println!("  - {} (removed before inspection finished)", event.name);
                }
            }
        }
    }

    let merged = session.merge()?;

    let (target, file_name) = match &cli.output {
        Some(path) => split_output_path(path)
            .with_context(|| format!("invalid output path: {}", path.display()))?,
        None => (DirectoryTarget::new("."), merged_file_name()),
    };
    let output_path = target.save(&file_name, &merged.bytes)?;

    if cli.json {
        let summary = json!({
            "files": session.snapshot(),
            "totalPages": merged.statistics.total_pages,
            "inputSize": merged.statistics.input_size,
            "outputSize": merged.bytes.len(),
            "output": output_path,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !cli.quiet {
        println!(
            "✓ Merged {} file(s), {} pages ({}) into {}",
            merged.statistics.files_merged,
            merged.statistics.total_pages,
            merged.statistics.format_input_size(),
            output_path.display()
        );
        if cli.verbose {
            println!("  Merge took {:?}", merged.statistics.merge_time);
        }
    }

    Ok(())
}

/// Expand shell-style patterns into concrete paths. A pattern that matches
/// nothing falls through as a literal path so the later read error names it.
fn resolve_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut resolved = Vec::new();

    for pattern in patterns {
        let entries = glob::glob(pattern)
            .with_context(|| format!("invalid input pattern: {pattern}"))?;

        let mut matched = false;
        for entry in entries {
            let path = entry.with_context(|| format!("failed to read glob entry: {pattern}"))?;
            resolved.push(path);
            matched = true;
        }
        if !matched {
            resolved.push(PathBuf::from(pattern));
        }
    }

    Ok(resolved)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Read all input files concurrently, preserving the input order.
async fn read_candidates(paths: &[PathBuf]) -> Result<Vec<CandidateFile>> {
    let tasks = paths.iter().enumerate().map(|(idx, path)| {
        let path = path.clone();
        async move {
            let data = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok::<_, anyhow::Error>((idx, CandidateFile::new(name, data)))
        }
    });

    let mut indexed: Vec<(usize, CandidateFile)> = stream::iter(tasks)
        .buffer_unordered(READ_CONCURRENCY)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<_>>()?;

    indexed.sort_by_key(|(idx, _)| *idx);
    Ok(indexed.into_iter().map(|(_, candidate)| candidate).collect())
}
