//! Batch pagination command implementation

use super::{decode_file, layout, LayoutArgs};
use anyhow::{bail, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tategaki_core::capacity::Viewport;
use tategaki_core::decoder::decoder_for_extension;
use tategaki_core::{DocumentSummary, Page, ReaderSettings};

/// One paginated text as written to disk
#[derive(Serialize)]
struct PaginatedText {
    summary: DocumentSummary,
    pages: Vec<Page>,
}

/// Paginate every supported text in a directory
pub fn batch(input_dir: &str, output_dir: &str, args: &LayoutArgs, jobs: usize) -> Result<()> {
    let input_path = Path::new(input_dir);
    let output_path = Path::new(output_dir);
    let settings = args.reader_settings()?;
    let viewport = args.viewport();

    // Ensure output directory exists
    fs::create_dir_all(output_path)?;

    // Find all supported files
    let files: Vec<_> = fs::read_dir(input_path)
        .with_context(|| format!("Failed to read directory {}", input_dir))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|ext| decoder_for_extension(ext).is_some())
                .unwrap_or(false)
        })
        .collect();

    if files.is_empty() {
        println!("No supported files found in {}", input_dir);
        return Ok(());
    }

    println!("Found {} files to paginate", files.len());

    // Set up progress tracking
    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
            .progress_chars("##-"),
    );

    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    // Configure thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
        .ok(); // Ignore if already configured

    // Process files in parallel
    files.par_iter().for_each(|file_path| {
        match process_file(file_path, output_path, &settings, viewport) {
            Ok(_) => {
                success_count.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                tracing::error!("Failed to paginate {:?}: {:#}", file_path, e);
            }
        }

        overall_pb.inc(1);
    });

    overall_pb.finish();

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    println!("\nBatch pagination complete:");
    println!("  Success: {}", success);
    println!("  Errors:  {}", errors);

    if errors > 0 {
        bail!("Batch pagination completed with {} errors", errors);
    }

    Ok(())
}

fn process_file(
    input_path: &Path,
    output_dir: &Path,
    settings: &ReaderSettings,
    viewport: Viewport,
) -> Result<()> {
    let document = decode_file(input_path)?;
    let (_, pages) = layout(&document, settings, viewport)?;

    // Build output path
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .context("Could not determine output filename from input")?;
    let output_file = output_dir.join(format!("{}.pages.json", stem));

    let page_count = pages.len();
    let output = BufWriter::new(File::create(&output_file)?);
    serde_json::to_writer_pretty(
        output,
        &PaginatedText {
            summary: document.summary(),
            pages,
        },
    )?;

    tracing::info!("Paginated {:?} -> {:?} ({} pages)", input_path, output_file, page_count);

    Ok(())
}
